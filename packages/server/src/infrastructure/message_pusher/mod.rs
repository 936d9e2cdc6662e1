//! Message delivery implementations.
//!
//! - `websocket`: pushes into per-connection outbound queues drained by
//!   the WebSocket writer tasks
//! - future: external pub/sub fan-out can implement the same
//!   `MessagePusher` trait

pub mod websocket;

pub use websocket::WebSocketMessagePusher;
