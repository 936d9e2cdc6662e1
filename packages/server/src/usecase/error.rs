//! Error types of the use case layer.

use thiserror::Error;

/// Why a join was refused. All variants are fatal to the connection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    /// The external system does not recognize the room
    #[error("room '{0}' does not exist")]
    RoomNotFound(String),

    /// The room is at member capacity
    #[error("room is full")]
    RoomFull,

    /// The connection already joined a room
    #[error("already joined")]
    AlreadyJoined,
}

/// Why a leave could not be processed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeaveError {
    #[error("connection is not a member of the room")]
    NotJoined,
}

/// Why a drawing-state change could not be processed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PresenceError {
    #[error("connection is not a member of the room")]
    NotJoined,
}
