//! External room/shape store trait.
//!
//! The relay keeps no authoritative copy of the board: shape durability is
//! delegated to an external REST collaborator that is consulted at join
//! time for room existence and the initial shape snapshot.

use async_trait::async_trait;

use super::error::SnapshotError;
use super::value_object::RoomId;

/// Read-only view of the external room/shape store.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Whether the external system recognizes the room
    async fn room_exists(&self, room_id: &RoomId) -> Result<bool, SnapshotError>;

    /// Current shape snapshot of the room, opaque to the relay
    async fn fetch_shapes(&self, room_id: &RoomId)
    -> Result<Vec<serde_json::Value>, SnapshotError>;
}
