//! Use case layer: one use case per relay operation.
//!
//! Use cases depend on the domain trait seams (`RoomRegistry`,
//! `MessagePusher`, `SnapshotStore`) and never on concrete infrastructure.
//! Serialization of wire messages stays in the UI layer; use cases take
//! and broadcast pre-serialized JSON like the rest of the delivery path.

mod error;
mod get_rooms;
mod join_room;
mod leave_room;
mod relay_shape;
mod send_chat;
mod update_presence;

pub use error::{JoinError, LeaveError, PresenceError};
pub use get_rooms::GetRoomsUseCase;
pub use join_room::{JoinAccepted, JoinRoomUseCase};
pub use leave_room::LeaveRoomUseCase;
pub use relay_shape::RelayShapeUseCase;
pub use send_chat::SendChatUseCase;
pub use update_presence::UpdatePresenceUseCase;
