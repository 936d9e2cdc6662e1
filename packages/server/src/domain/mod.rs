//! Domain layer for the room relay.
//!
//! Entities, value objects and the trait seams the use case layer depends
//! on. Concrete implementations live in the infrastructure layer.

pub mod auth;
pub mod entity;
pub mod error;
pub mod pusher;
pub mod registry;
pub mod snapshot;
pub mod value_object;

pub use auth::Authenticator;
pub use entity::{ChatMessage, Identity, Member, Room};
pub use error::{AuthError, MessagePushError, RegistryError, RoomError, SnapshotError};
pub use pusher::{MessagePusher, PusherChannel, OUTBOUND_QUEUE_CAPACITY};
pub use registry::RoomRegistry;
pub use snapshot::SnapshotStore;
pub use value_object::{ChatText, ConnectionId, RoomId, ShapeId, Timestamp, UserId, UserName};
