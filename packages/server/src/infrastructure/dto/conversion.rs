//! Conversion logic between DTOs and domain entities.

use crate::domain::entity;
use crate::infrastructure::dto::websocket as dto;

// ========================================
// Domain Entity → DTO
// ========================================

impl From<entity::Member> for dto::UserPresenceDto {
    fn from(member: entity::Member) -> Self {
        Self {
            user_id: member.identity.user_id.into_string(),
            name: member.identity.name.into_string(),
            photo: member.identity.photo,
            drawing: member.drawing,
            connected_at: member.connected_at.value(),
        }
    }
}

impl From<entity::ChatMessage> for dto::ChatMessageDto {
    fn from(message: entity::ChatMessage) -> Self {
        Self {
            id: message.id,
            user_id: message.from.user_id.into_string(),
            name: message.from.name.into_string(),
            photo: message.from.photo,
            message: message.text.into_string(),
            timestamp: message.timestamp.value(),
        }
    }
}

/// Convert a roster snapshot into the wire presence list
pub fn presence_list(members: Vec<entity::Member>) -> Vec<dto::UserPresenceDto> {
    members.into_iter().map(Into::into).collect()
}
