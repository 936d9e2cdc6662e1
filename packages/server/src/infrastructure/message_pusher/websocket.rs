//! WebSocket implementation of the `MessagePusher` trait.
//!
//! The socket itself is created in the UI layer
//! (`src/ui/handler/websocket.rs`); this implementation holds the sending
//! halves of the per-connection outbound queues and pushes serialized
//! messages into them. Each queue is drained by that connection's writer
//! task, which keeps delivery FIFO per connection and lets a slow or dead
//! connection fail alone.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::sync::mpsc::error::TrySendError;

use crate::domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel};

/// Pusher backed by per-connection bounded queues
pub struct WebSocketMessagePusher {
    /// Outbound queue senders of the currently registered connections
    clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self {
            clients: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(connection_id, sender);
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
    }

    async fn unregister(&self, connection_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(connection_id);
        tracing::debug!(
            "Connection '{}' unregistered from MessagePusher",
            connection_id
        );
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;

        let Some(sender) = clients.get(connection_id) else {
            return Err(MessagePushError::ConnectionNotFound(
                connection_id.to_string(),
            ));
        };
        sender
            .try_send(content.to_string())
            .map_err(|_| MessagePushError::QueueUnavailable(connection_id.to_string()))
    }

    async fn broadcast(&self, targets: Vec<ConnectionId>, content: &str) -> Vec<ConnectionId> {
        let clients = self.clients.lock().await;

        let mut failed = Vec::new();
        for target in targets {
            let Some(sender) = clients.get(&target) else {
                // already torn down, nothing to deliver
                tracing::debug!("Connection '{}' not found during broadcast, skipping", target);
                continue;
            };
            match sender.try_send(content.to_string()) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(
                        "Outbound queue of connection '{}' is full, scheduling teardown",
                        target
                    );
                    failed.push(target);
                }
                Err(TrySendError::Closed(_)) => {
                    tracing::warn!(
                        "Outbound queue of connection '{}' is closed, scheduling teardown",
                        target
                    );
                    failed.push(target);
                }
            }
        }
        failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OUTBOUND_QUEUE_CAPACITY;
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - WebSocketMessagePusher の push_to / broadcast
    // - 失敗した接続がブロードキャストの戻り値として報告されること
    // - 一部の接続の失敗が他の接続への配信を妨げないこと
    //
    // 【なぜこのテストが必要か】
    // - ブロードキャストは relay の中核であり、1 つの遅い接続が
    //   兄弟接続を巻き込んではならない
    //
    // 【どのようなシナリオをテストするか】
    // 1. push_to の成功／接続未登録
    // 2. broadcast の成功（複数接続）
    // 3. queue が閉じた接続が failed として返るケース
    // 4. queue が満杯の接続が failed として返るケース
    // ========================================

    fn test_channel() -> (PusherChannel, mpsc::Receiver<String>) {
        mpsc::channel(OUTBOUND_QUEUE_CAPACITY)
    }

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 特定の接続にメッセージを送信できる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, mut rx) = test_channel();
        let connection_id = ConnectionId::generate();
        pusher.register(connection_id, tx).await;

        // when (操作):
        let result = pusher.push_to(&connection_id, "hello").await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx.recv().await, Some("hello".to_string()));
    }

    #[tokio::test]
    async fn test_push_to_unknown_connection() {
        // テスト項目: 未登録の接続への送信はエラーを返す
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let connection_id = ConnectionId::generate();

        // when (操作):
        let result = pusher.push_to(&connection_id, "hello").await;

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(MessagePushError::ConnectionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_broadcast_delivers_to_all_targets() {
        // テスト項目: 複数の接続にメッセージをブロードキャストできる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx1, mut rx1) = test_channel();
        let (tx2, mut rx2) = test_channel();
        let conn1 = ConnectionId::generate();
        let conn2 = ConnectionId::generate();
        pusher.register(conn1, tx1).await;
        pusher.register(conn2, tx2).await;

        // when (操作):
        let failed = pusher.broadcast(vec![conn1, conn2], "event").await;

        // then (期待する結果):
        assert!(failed.is_empty());
        assert_eq!(rx1.recv().await, Some("event".to_string()));
        assert_eq!(rx2.recv().await, Some("event".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_reports_closed_connection() {
        // テスト項目: queue が閉じた接続が failed として返り、他への配信は続く
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx1, mut rx1) = test_channel();
        let (tx2, rx2) = test_channel();
        let alive = ConnectionId::generate();
        let dead = ConnectionId::generate();
        pusher.register(alive, tx1).await;
        pusher.register(dead, tx2).await;
        drop(rx2); // 受信側が終了した状態を作る

        // when (操作):
        let failed = pusher.broadcast(vec![dead, alive], "event").await;

        // then (期待する結果):
        assert_eq!(failed, vec![dead]);
        assert_eq!(rx1.recv().await, Some("event".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_reports_full_queue() {
        // テスト項目: queue が満杯の接続が failed として返る
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, _rx) = mpsc::channel(1);
        let slow = ConnectionId::generate();
        pusher.register(slow, tx).await;
        pusher.push_to(&slow, "first").await.unwrap(); // queue を満杯にする

        // when (操作):
        let failed = pusher.broadcast(vec![slow], "second").await;

        // then (期待する結果):
        assert_eq!(failed, vec![slow]);
    }

    #[tokio::test]
    async fn test_broadcast_skips_unregistered_targets() {
        // テスト項目: 未登録の接続はスキップされ failed には含まれない
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, mut rx) = test_channel();
        let registered = ConnectionId::generate();
        let gone = ConnectionId::generate();
        pusher.register(registered, tx).await;

        // when (操作):
        let failed = pusher.broadcast(vec![gone, registered], "event").await;

        // then (期待する結果):
        assert!(failed.is_empty());
        assert_eq!(rx.recv().await, Some("event".to_string()));
    }
}
