//! Error types of the domain layer.

use thiserror::Error;

/// Validation failure when constructing a value object
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{0} exceeds the maximum length of {1}")]
    TooLong(&'static str, usize),

    #[error("{0} contains invalid characters")]
    InvalidChars(&'static str),
}

/// Failure of an operation on a single room entity
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error("connection '{0}' is already a member of the room")]
    DuplicateConnection(String),

    #[error("room is full")]
    CapacityExceeded,
}

/// Failure of a registry operation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("room '{0}' is not registered")]
    RoomNotFound(String),

    #[error("connection '{0}' is not a member of the room")]
    MemberNotFound(String),

    #[error("connection '{0}' is already a member of the room")]
    DuplicateConnection(String),

    #[error("room is full")]
    RoomCapacityExceeded,
}

/// Credential verification failure.
///
/// Both variants are fatal to the connection: the upgrade is rejected and
/// no room state is ever created for the socket.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("no credential")]
    MissingCredential,

    #[error("invalid or expired credential")]
    InvalidCredential,
}

/// Delivery failure towards a single connection.
///
/// Never propagates to sibling connections; the failed connection is torn
/// down through its own lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("connection '{0}' is not registered")]
    ConnectionNotFound(String),

    #[error("outbound queue for connection '{0}' is closed or full")]
    QueueUnavailable(String),
}

/// Failure talking to the external snapshot/room store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("snapshot store request failed: {0}")]
    RequestFailed(String),

    #[error("snapshot store returned an invalid response: {0}")]
    InvalidResponse(String),
}
