//! WebSocket wire messages.
//!
//! Every frame on the socket is a JSON envelope with a `type`, a `roomId`
//! and a kind-specific `payload`. Outbound messages are one struct per
//! kind so the required payload fields are enforced by the type, not by
//! runtime checks.

use serde::{Deserialize, Serialize};

/// Event kind carried in the envelope's `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Join,
    Draw,
    Update,
    Delete,
    Clear,
    DrawingStart,
    DrawingEnd,
    Chat,
    UserJoined,
    UserLeft,
    Error,
    Init,
}

/// One room member as carried in presence lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPresenceDto {
    pub user_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    pub drawing: bool,
    pub connected_at: i64,
}

/// A chat message as broadcast to the room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageDto {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    pub message: String,
    pub timestamp: i64,
}

// ========================================
// Inbound payloads
// ========================================

/// Payload of an inbound `draw` / `update` event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapePayload {
    /// Opaque drawing primitive; the relay never interprets its geometry
    pub shape: serde_json::Value,
}

/// Payload of an inbound `delete` event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeDeletePayload {
    pub shape_id: String,
}

/// Payload of an inbound `chat` event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSendPayload {
    pub message: String,
}

/// Payload without fields (`clear`, `drawing_start`, `drawing_end`)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EmptyPayload {}

// ========================================
// Outbound messages
// ========================================

/// `init`: sent to a joiner right after a successful join
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitMessage {
    pub r#type: MessageType,
    pub room_id: String,
    pub payload: InitPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitPayload {
    /// Current shape snapshot from the external store (may be empty)
    pub shapes: Vec<serde_json::Value>,
    /// Presence list including the joiner
    pub users: Vec<UserPresenceDto>,
}

/// `user_joined`: updated presence list after a join
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserJoinedMessage {
    pub r#type: MessageType,
    pub room_id: String,
    pub payload: UserJoinedPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserJoinedPayload {
    /// The member that joined
    pub user: UserPresenceDto,
    /// Presence list including the joiner
    pub users: Vec<UserPresenceDto>,
}

/// `user_left`: updated presence list after a leave
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLeftMessage {
    pub r#type: MessageType,
    pub room_id: String,
    pub payload: UserLeftPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLeftPayload {
    /// User id of the member that left
    pub user_id: String,
    /// Presence list of the remaining members
    pub users: Vec<UserPresenceDto>,
}

/// `drawing_start` / `drawing_end`: a member's drawing flag flipped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingStateMessage {
    pub r#type: MessageType,
    pub room_id: String,
    pub payload: DrawingStatePayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingStatePayload {
    /// User id of the member whose flag flipped
    pub user_id: String,
    /// Presence list with the refreshed drawing flags
    pub users: Vec<UserPresenceDto>,
}

/// `draw` / `update`: a shape relayed to the other room members
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeUpsertMessage {
    pub r#type: MessageType,
    /// Display name of the sender
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub room_id: String,
    pub payload: ShapePayload,
}

/// `delete`: a shape removal relayed to the other room members
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeDeleteMessage {
    pub r#type: MessageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub room_id: String,
    pub payload: ShapeDeletePayload,
}

/// `clear`: the whole board was cleared
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardClearMessage {
    pub r#type: MessageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub room_id: String,
    pub payload: EmptyPayload,
}

/// `chat`: a chat message with the server-assigned id and timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatBroadcastMessage {
    pub r#type: MessageType,
    pub room_id: String,
    pub payload: ChatBroadcastPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatBroadcastPayload {
    pub chat_message: ChatMessageDto,
}

/// `error`: reported to the offending connection only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorMessage {
    pub r#type: MessageType,
    /// Room the error relates to; empty when the offending frame did not
    /// carry a usable room id
    pub room_id: String,
    pub payload: ErrorPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub message: String,
}

impl ErrorMessage {
    /// Build an `error` event for the given room (empty if unknown)
    pub fn new(room_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            r#type: MessageType::Error,
            room_id: room_id.into(),
            payload: ErrorPayload {
                message: message.into(),
            },
        }
    }
}
