//! Registry trait for live connections, grouped by room.
//!
//! The domain layer defines the interface it needs; the infrastructure
//! layer provides the concrete implementation (dependency inversion).

use async_trait::async_trait;

use super::entity::{Member, Room};
use super::error::RegistryError;
use super::value_object::{ConnectionId, RoomId};

/// Registry of live connections, grouped by room.
///
/// Rooms are created implicitly when the first member is added and removed
/// when the last member leaves. Mutating operations return the roster of
/// the room *after* the mutation, taken under the same room lock, so that
/// a presence broadcast computed from the returned snapshot always equals
/// the registered set at that instant.
#[async_trait]
pub trait RoomRegistry: Send + Sync {
    /// Add a member to a room, creating the room on first join.
    ///
    /// Returns the roster including the new member.
    async fn add_member(&self, room_id: RoomId, member: Member)
    -> Result<Vec<Member>, RegistryError>;

    /// Remove a member from a room. The room entry is dropped when the
    /// last member leaves.
    ///
    /// Returns the roster of the remaining members.
    async fn remove_member(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
    ) -> Result<Vec<Member>, RegistryError>;

    /// Consistent snapshot of a room's members. Empty if the room does not
    /// exist.
    async fn members(&self, room_id: &RoomId) -> Vec<Member>;

    /// Flip the drawing flag of a member.
    ///
    /// Returns the updated roster.
    async fn set_drawing(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
        drawing: bool,
    ) -> Result<Vec<Member>, RegistryError>;

    /// Number of rooms currently holding at least one connection
    async fn room_count(&self) -> usize;

    /// Snapshot of all active rooms (for the HTTP introspection endpoints)
    async fn rooms(&self) -> Vec<Room>;
}
