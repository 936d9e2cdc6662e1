//! UseCase: joining a room.
//!
//! Checks room existence against the external collaborator, registers the
//! member and its outbound queue, and fetches the shape snapshot for the
//! `init` event. Admission is all-or-nothing: a refused join leaves no
//! trace in the registry or the pusher.

use std::sync::Arc;

use crate::domain::{
    ConnectionId, Identity, Member, MessagePusher, PusherChannel, RegistryError, RoomId,
    RoomRegistry, SnapshotStore, Timestamp,
};
use hakuban_shared::time::now_utc_millis;

use super::error::JoinError;

/// Result of an accepted join
#[derive(Debug, Clone, PartialEq)]
pub struct JoinAccepted {
    /// Roster including the new member, taken under the room lock
    pub roster: Vec<Member>,
    /// Shape snapshot for the `init` event (empty when the store has none)
    pub shapes: Vec<serde_json::Value>,
}

/// UseCase for admitting a connection into a room
pub struct JoinRoomUseCase {
    registry: Arc<dyn RoomRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
    snapshot_store: Arc<dyn SnapshotStore>,
}

impl JoinRoomUseCase {
    pub fn new(
        registry: Arc<dyn RoomRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
        snapshot_store: Arc<dyn SnapshotStore>,
    ) -> Self {
        Self {
            registry,
            message_pusher,
            snapshot_store,
        }
    }

    /// Execute the join.
    ///
    /// # Arguments
    ///
    /// * `room_id` - Room the connection wants to join
    /// * `connection_id` - Id of the joining connection
    /// * `identity` - Verified identity from the credential
    /// * `sender` - Sending half of the connection's outbound queue
    pub async fn execute(
        &self,
        room_id: RoomId,
        connection_id: ConnectionId,
        identity: Identity,
        sender: PusherChannel,
    ) -> Result<JoinAccepted, JoinError> {
        // 1. Room existence is owned by the external collaborator. An
        //    unreachable collaborator degrades softly; only an
        //    authoritative "no" refuses the join.
        match self.snapshot_store.room_exists(&room_id).await {
            Ok(true) => {}
            Ok(false) => {
                return Err(JoinError::RoomNotFound(room_id.as_str().to_string()));
            }
            Err(e) => {
                tracing::warn!(
                    "Room existence check failed for '{}', admitting join: {}",
                    room_id.as_str(),
                    e
                );
            }
        }

        // 2. Register the member; the returned roster is the presence list
        //    to broadcast.
        let member = Member::new(connection_id, identity, Timestamp::new(now_utc_millis()));
        let roster = self
            .registry
            .add_member(room_id.clone(), member)
            .await
            .map_err(|e| match e {
                RegistryError::RoomCapacityExceeded => JoinError::RoomFull,
                RegistryError::DuplicateConnection(_) | RegistryError::MemberNotFound(_) => {
                    JoinError::AlreadyJoined
                }
                RegistryError::RoomNotFound(id) => JoinError::RoomNotFound(id),
            })?;

        // 3. Register the outbound queue for broadcasts.
        self.message_pusher.register(connection_id, sender).await;

        // 4. Shape snapshot for the joiner's `init` event.
        let shapes = match self.snapshot_store.fetch_shapes(&room_id).await {
            Ok(shapes) => shapes,
            Err(e) => {
                tracing::warn!(
                    "Shape snapshot fetch failed for '{}', starting empty: {}",
                    room_id.as_str(),
                    e
                );
                Vec::new()
            }
        };

        Ok(JoinAccepted { roster, shapes })
    }

    /// Broadcast the serialized `user_joined` message to the given targets
    /// (all room members including the joiner).
    ///
    /// Returns the connection ids whose delivery failed.
    pub async fn broadcast_user_joined(
        &self,
        targets: Vec<ConnectionId>,
        message: &str,
    ) -> Vec<ConnectionId> {
        self.message_pusher.broadcast(targets, message).await
    }
}
