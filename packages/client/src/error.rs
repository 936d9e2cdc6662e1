//! Error types for the whiteboard CLI client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The relay refused the credential during the upgrade
    #[error("credential rejected by the relay")]
    AuthRejected,

    /// The relay refused the join (unknown room, room full)
    #[error("join refused: {0}")]
    RoomRejected(String),

    /// Connection error
    #[error("connection error: {0}")]
    ConnectionError(String),
}
