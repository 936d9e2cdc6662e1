//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::RoomId,
    infrastructure::dto::http::{HealthDto, MemberDetailDto, RoomDetailDto, RoomSummaryDto},
    ui::state::AppState,
};
use hakuban_shared::time::timestamp_to_rfc3339;

/// Health check endpoint, polled by external keep-alive pingers
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
        active_rooms: state.get_rooms_usecase.room_count().await,
    })
}

/// Get list of active rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.get_rooms_usecase.execute().await;

    let room_summaries: Vec<RoomSummaryDto> = rooms
        .into_iter()
        .map(|room| RoomSummaryDto {
            id: room.id.as_str().to_string(),
            member_count: room.member_count(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        })
        .collect();

    Json(room_summaries)
}

/// Get room detail by room code
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    let room_id = match RoomId::new(room_id) {
        Ok(room_id) => room_id,
        Err(_) => return Err(StatusCode::BAD_REQUEST),
    };

    match state.get_rooms_usecase.find(&room_id).await {
        Some(room) => {
            let room_detail = RoomDetailDto {
                id: room.id.as_str().to_string(),
                members: room
                    .members()
                    .iter()
                    .map(|m| MemberDetailDto {
                        user_id: m.identity.user_id.as_str().to_string(),
                        name: m.identity.name.as_str().to_string(),
                        drawing: m.drawing,
                        connected_at: timestamp_to_rfc3339(m.connected_at.value()),
                    })
                    .collect(),
                created_at: timestamp_to_rfc3339(room.created_at.value()),
            };
            Ok(Json(room_detail))
        }
        None => Err(StatusCode::NOT_FOUND),
    }
}
