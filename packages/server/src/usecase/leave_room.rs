//! UseCase: leaving a room.
//!
//! Runs on explicit close, network failure and send failure alike. The
//! registry drops the room entry when the last member leaves.

use std::sync::Arc;

use crate::domain::{ConnectionId, Member, MessagePusher, RoomId, RoomRegistry};

use super::error::LeaveError;

/// UseCase for removing a connection from its room
pub struct LeaveRoomUseCase {
    registry: Arc<dyn RoomRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl LeaveRoomUseCase {
    pub fn new(registry: Arc<dyn RoomRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// Execute the leave.
    ///
    /// Returns the roster of the remaining members, taken under the room
    /// lock, for the `user_left` broadcast.
    pub async fn execute(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
    ) -> Result<Vec<Member>, LeaveError> {
        let roster = self
            .registry
            .remove_member(room_id, connection_id)
            .await
            .map_err(|_| LeaveError::NotJoined)?;

        self.message_pusher.unregister(connection_id).await;

        Ok(roster)
    }

    /// Broadcast the serialized `user_left` message to the remaining
    /// members.
    ///
    /// Returns the connection ids whose delivery failed.
    pub async fn broadcast_user_left(
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
    use crate::domain::{Identity, Timestamp, UserId, UserName, OUTBOUND_QUEUE_CAPACITY};
    use crate::infrastructure::{
        message_pusher::WebSocketMessagePusher, registry::InMemoryRoomRegistry,
    };
    use tokio::sync::mpsc;

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

    fn test_usecase() -> (
        LeaveRoomUseCase,
        Arc<InMemoryRoomRegistry>,
        Arc<WebSocketMessagePusher>,
    ) {
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        (
            LeaveRoomUseCase::new(registry.clone(), pusher.clone()),
            registry,
            pusher,
        )
    }

    #[tokio::test]
    async fn test_leave_returns_remaining_roster() {
        // テスト項目: 退出後に残りのメンバーの roster が返される
        // given (前提条件):
        let (usecase, registry, _pusher) = test_usecase();
        let alice = test_member("alice");
        let bob = test_member("bob");
        registry
            .add_member(room_id("ABCDE"), alice.clone())
            .await
            .unwrap();
        registry
            .add_member(room_id("ABCDE"), bob.clone())
            .await
            .unwrap();

        // when (操作):
        let result = usecase
            .execute(&room_id("ABCDE"), &alice.connection_id)
            .await;

        // then (期待する結果):
        let roster = result.unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].connection_id, bob.connection_id);
    }

    #[tokio::test]
    async fn test_leave_last_member_removes_room() {
        // テスト項目: 最後のメンバーの退出で roster が空になりルームが消える
        // given (前提条件):
        let (usecase, registry, _pusher) = test_usecase();
        let alice = test_member("alice");
        registry
            .add_member(room_id("ABCDE"), alice.clone())
            .await
            .unwrap();

        // when (操作):
        let roster = usecase
            .execute(&room_id("ABCDE"), &alice.connection_id)
            .await
            .unwrap();

        // then (期待する結果):
        assert!(roster.is_empty());
        assert_eq!(registry.room_count().await, 0);
    }

    #[tokio::test]
    async fn test_leave_not_joined_is_an_error() {
        // テスト項目: 参加していない接続の退出が NotJoined になる
        // given (前提条件):
        let (usecase, _registry, _pusher) = test_usecase();

        // when (操作):
        let result = usecase
            .execute(&room_id("ABCDE"), &ConnectionId::generate())
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(LeaveError::NotJoined));
    }

    #[tokio::test]
    async fn test_leave_unregisters_from_pusher() {
        // テスト項目: 退出した接続が MessagePusher から登録解除される
        // given (前提条件):
        let (usecase, registry, pusher) = test_usecase();
        let alice = test_member("alice");
        let (tx, _rx) = mpsc::channel(OUTBOUND_QUEUE_CAPACITY);
        registry
            .add_member(room_id("ABCDE"), alice.clone())
            .await
            .unwrap();
        pusher.register(alice.connection_id, tx).await;

        // when (操作):
        usecase
            .execute(&room_id("ABCDE"), &alice.connection_id)
            .await
            .unwrap();

        // then (期待する結果): 配信対象から外れている
        let result = pusher.push_to(&alice.connection_id, "late").await;
        assert!(result.is_err());
    }
}
