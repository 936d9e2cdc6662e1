//! Server state shared across connection handlers.

use std::sync::Arc;

use crate::domain::Authenticator;
use crate::usecase::{
    GetRoomsUseCase, JoinRoomUseCase, LeaveRoomUseCase, RelayShapeUseCase, SendChatUseCase,
    UpdatePresenceUseCase,
};

/// Shared application state
pub struct AppState {
    /// Credential verification (consumed during the upgrade)
    pub authenticator: Arc<dyn Authenticator>,
    /// UseCase for admitting a connection into a room
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// UseCase for removing a connection from its room
    pub leave_room_usecase: Arc<LeaveRoomUseCase>,
    /// UseCase for fanning shape events out to a room
    pub relay_shape_usecase: Arc<RelayShapeUseCase>,
    /// UseCase for stamping and fanning out chat messages
    pub send_chat_usecase: Arc<SendChatUseCase>,
    /// UseCase for drawing-state presence updates
    pub update_presence_usecase: Arc<UpdatePresenceUseCase>,
    /// UseCase backing the HTTP introspection endpoints
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
}
