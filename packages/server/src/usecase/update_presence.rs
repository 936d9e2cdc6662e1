//! UseCase: flipping a member's drawing flag.
//!
//! `drawing_start` and `drawing_end` only touch the in-memory presence
//! state; the refreshed roster is re-broadcast to the whole room so every
//! client can render who is currently drawing.

use std::sync::Arc;

use crate::domain::{ConnectionId, Member, MessagePusher, RoomId, RoomRegistry};

use super::error::PresenceError;

/// UseCase for drawing-state presence updates
pub struct UpdatePresenceUseCase {
    registry: Arc<dyn RoomRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl UpdatePresenceUseCase {
    pub fn new(registry: Arc<dyn RoomRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// Flip the sender's drawing flag.
    ///
    /// Returns the refreshed roster, taken under the room lock.
    pub async fn execute(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
        drawing: bool,
    ) -> Result<Vec<Member>, PresenceError> {
        self.registry
            .set_drawing(room_id, connection_id, drawing)
            .await
            .map_err(|_| PresenceError::NotJoined)
    }

    /// Broadcast the serialized drawing-state message to the room.
    ///
    /// Returns the connection ids whose delivery failed.
    pub async fn broadcast_presence(
        &self,
        targets: Vec<ConnectionId>,
        message: &str,
    ) -> Vec<ConnectionId> {
        self.message_pusher.broadcast(targets, message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Identity, Timestamp, UserId, UserName};
    use crate::infrastructure::{
        message_pusher::WebSocketMessagePusher, registry::InMemoryRoomRegistry,
    };

    fn test_member(user_id: &str) -> Member {
        Member::new(
            ConnectionId::generate(),
            Identity::new(
                UserId::new(user_id.to_string()).unwrap(),
                UserName::new(user_id.to_string()).unwrap(),
                None,
            ),
            Timestamp::new(1000),
        )
    }

    fn room_id(code: &str) -> RoomId {
        RoomId::new(code.to_string()).unwrap()
    }

    fn test_usecase() -> (UpdatePresenceUseCase, Arc<InMemoryRoomRegistry>) {
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        (
            UpdatePresenceUseCase::new(registry.clone(), pusher),
            registry,
        )
    }

    #[tokio::test]
    async fn test_drawing_start_flips_flag_in_roster() {
        // テスト項目: drawing_start で roster の描画フラグが立つ
        // given (前提条件):
        let (usecase, registry) = test_usecase();
        let alice = test_member("alice");
        registry
            .add_member(room_id("ABCDE"), alice.clone())
            .await
            .unwrap();

        // when (操作):
        let roster = usecase
            .execute(&room_id("ABCDE"), &alice.connection_id, true)
            .await
            .unwrap();

        // then (期待する結果):
        assert!(roster[0].drawing);
    }

    #[tokio::test]
    async fn test_drawing_end_clears_flag() {
        // テスト項目: drawing_end で描画フラグが下りる
        // given (前提条件):
        let (usecase, registry) = test_usecase();
        let alice = test_member("alice");
        registry
            .add_member(room_id("ABCDE"), alice.clone())
            .await
            .unwrap();
        usecase
            .execute(&room_id("ABCDE"), &alice.connection_id, true)
            .await
            .unwrap();

        // when (操作):
        let roster = usecase
            .execute(&room_id("ABCDE"), &alice.connection_id, false)
            .await
            .unwrap();

        // then (期待する結果):
        assert!(!roster[0].drawing);
    }

    #[tokio::test]
    async fn test_presence_update_for_unknown_connection() {
        // テスト項目: 参加していない接続の presence 更新が NotJoined になる
        // given (前提条件):
        let (usecase, registry) = test_usecase();
        registry
            .add_member(room_id("ABCDE"), test_member("alice"))
            .await
            .unwrap();

        // when (操作):
        let result = usecase
            .execute(&room_id("ABCDE"), &ConnectionId::generate(), true)
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(PresenceError::NotJoined));
    }
}
