//! UseCase: sending a chat message.
//!
//! The server assigns the message id and timestamp at arrival; ordering is
//! arrival order at the broadcaster. Chat echoes back to the sender so
//! every member renders the same append-only transcript.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{
    ChatMessage, ChatText, ConnectionId, Identity, MessagePusher, RoomId, RoomRegistry, Timestamp,
};
use hakuban_shared::time::now_utc_millis;

/// UseCase for stamping and fanning out a chat message
pub struct SendChatUseCase {
    registry: Arc<dyn RoomRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl SendChatUseCase {
    pub fn new(registry: Arc<dyn RoomRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// Stamp the message with a server id and timestamp and compute the
    /// broadcast targets (every room member including the sender).
    pub async fn execute(
        &self,
        room_id: &RoomId,
        from: Identity,
        text: ChatText,
    ) -> (ChatMessage, Vec<ConnectionId>) {
        let message = ChatMessage::new(
            Uuid::new_v4().to_string(),
            from,
            text,
            Timestamp::new(now_utc_millis()),
        );

        let targets: Vec<ConnectionId> = self
            .registry
            .members(room_id)
            .await
            .into_iter()
            .map(|m| m.connection_id)
            .collect();

        (message, targets)
    }

    /// Broadcast the serialized `chat` message.
    ///
    /// Returns the connection ids whose delivery failed.
    pub async fn broadcast_chat(
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
    use crate::domain::{Member, UserId, UserName, OUTBOUND_QUEUE_CAPACITY};
    use crate::infrastructure::{
        message_pusher::WebSocketMessagePusher, registry::InMemoryRoomRegistry,
    };
    use tokio::sync::mpsc;

    fn test_identity(user_id: &str) -> Identity {
        Identity::new(
            UserId::new(user_id.to_string()).unwrap(),
            UserName::new(user_id.to_string()).unwrap(),
            None,
        )
    }

    fn test_member(user_id: &str) -> Member {
        Member::new(
            ConnectionId::generate(),
            test_identity(user_id),
            Timestamp::new(1000),
        )
    }

    fn room_id(code: &str) -> RoomId {
        RoomId::new(code.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_chat_targets_include_sender() {
        // テスト項目: チャットの配信対象に送信者自身が含まれる
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = SendChatUseCase::new(registry.clone(), pusher);
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
        let (_message, targets) = usecase
            .execute(
                &room_id("ABCDE"),
                alice.identity.clone(),
                ChatText::new("hi".to_string()).unwrap(),
            )
            .await;

        // then (期待する結果):
        assert_eq!(targets.len(), 2);
        assert!(targets.contains(&alice.connection_id));
        assert!(targets.contains(&bob.connection_id));
    }

    #[tokio::test]
    async fn test_chat_is_stamped_with_id_and_timestamp() {
        // テスト項目: サーバーが id とタイムスタンプを付与する
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = SendChatUseCase::new(registry.clone(), pusher);
        let alice = test_member("alice");
        registry
            .add_member(room_id("ABCDE"), alice.clone())
            .await
            .unwrap();

        // when (操作):
        let before = now_utc_millis();
        let (message, _targets) = usecase
            .execute(
                &room_id("ABCDE"),
                alice.identity.clone(),
                ChatText::new("hi".to_string()).unwrap(),
            )
            .await;
        let after = now_utc_millis();

        // then (期待する結果):
        assert!(!message.id.is_empty());
        assert!(message.timestamp.value() >= before);
        assert!(message.timestamp.value() <= after);
        assert_eq!(message.text.as_str(), "hi");
    }

    #[tokio::test]
    async fn test_chat_ids_are_unique() {
        // テスト項目: 連続するメッセージの id が一意である
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = SendChatUseCase::new(registry.clone(), pusher);

        // when (操作):
        let (first, _) = usecase
            .execute(
                &room_id("ABCDE"),
                test_identity("alice"),
                ChatText::new("one".to_string()).unwrap(),
            )
            .await;
        let (second, _) = usecase
            .execute(
                &room_id("ABCDE"),
                test_identity("alice"),
                ChatText::new("two".to_string()).unwrap(),
            )
            .await;

        // then (期待する結果):
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_broadcast_chat_delivers_to_targets() {
        // テスト項目: broadcast_chat が全対象に配信する
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = SendChatUseCase::new(registry, pusher.clone());
        let (tx, mut rx) = mpsc::channel(OUTBOUND_QUEUE_CAPACITY);
        let conn = ConnectionId::generate();
        pusher.register(conn, tx).await;

        // when (操作):
        let failed = usecase
            .broadcast_chat(vec![conn], r#"{"type":"chat"}"#)
            .await;

        // then (期待する結果):
        assert!(failed.is_empty());
        assert_eq!(rx.recv().await, Some(r#"{"type":"chat"}"#.to_string()));
    }
}
