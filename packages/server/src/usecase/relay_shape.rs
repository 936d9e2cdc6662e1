//! UseCase: relaying shape events (`draw`, `update`, `delete`, `clear`).
//!
//! The relay has no authoritative copy of the board; shape events are
//! opaque pass-through, fanned out to every room member except the
//! sender so clients never re-apply their own operations.

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, RoomId, RoomRegistry};

/// UseCase for fanning a serialized shape event out to a room
pub struct RelayShapeUseCase {
    registry: Arc<dyn RoomRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl RelayShapeUseCase {
    pub fn new(registry: Arc<dyn RoomRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// Fan the serialized event out to every member of the room except
    /// the sender.
    ///
    /// Delivery is best-effort: failed connections are logged and torn
    /// down through their own lifecycle, never retried.
    ///
    /// # Returns
    ///
    /// The connection ids the event was addressed to.
    pub async fn execute(
        &self,
        room_id: &RoomId,
        sender_id: &ConnectionId,
        message: &str,
    ) -> Vec<ConnectionId> {
        let targets: Vec<ConnectionId> = self
            .registry
            .members(room_id)
            .await
            .into_iter()
            .map(|m| m.connection_id)
            .filter(|id| id != sender_id)
            .collect();

        let failed = self
            .message_pusher
            .broadcast(targets.clone(), message)
            .await;
        if !failed.is_empty() {
            tracing::debug!(
                "Shape event delivery failed for {} connection(s) in room '{}'",
                failed.len(),
                room_id.as_str()
            );
        }

        targets
    }
}
