//! Message delivery trait: pushing serialized events to connections.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::error::MessagePushError;
use super::value_object::ConnectionId;

/// Capacity of the per-connection outbound queue.
///
/// A connection whose queue fills up is treated as failed rather than
/// allowed to stall deliveries to its siblings.
pub const OUTBOUND_QUEUE_CAPACITY: usize = 256;

/// Sending half of a connection's outbound queue.
///
/// The receiving half is drained by that connection's writer task, which
/// gives FIFO delivery per connection.
pub type PusherChannel = mpsc::Sender<String>;

/// Delivery seam between the use case layer and the transport.
///
/// Delivery is best-effort and fire-and-forget per connection: pushing to
/// one connection never blocks on, or fails because of, another.
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Register a connection's outbound queue
    async fn register(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// Unregister a connection's outbound queue
    async fn unregister(&self, connection_id: &ConnectionId);

    /// Push a message to a single connection
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError>;

    /// Push a message to each target connection.
    ///
    /// Returns the connection ids whose queue was closed or full; those
    /// connections are torn down by their own lifecycle, not retried.
    async fn broadcast(&self, targets: Vec<ConnectionId>, content: &str) -> Vec<ConnectionId>;
}
