//! Inbound frame decoding.
//!
//! Turns a raw text frame into a typed [`ClientEvent`] or a precise decode
//! error. Unknown kinds and missing fields are explicit errors reported
//! back to the sender, never silently dropped.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::websocket::{ChatSendPayload, ShapeDeletePayload, ShapePayload};

/// A decoded inbound event.
///
/// One variant per client-originated kind; the payload fields each kind
/// requires are part of the variant, so dispatch never checks for
/// optional fields at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    Join {
        room_id: String,
    },
    Draw {
        room_id: String,
        shape: serde_json::Value,
    },
    Update {
        room_id: String,
        shape: serde_json::Value,
    },
    Delete {
        room_id: String,
        shape_id: String,
    },
    Clear {
        room_id: String,
    },
    DrawingStart {
        room_id: String,
    },
    DrawingEnd {
        room_id: String,
    },
    Chat {
        room_id: String,
        message: String,
    },
}

impl ClientEvent {
    /// Room id declared by the event
    pub fn room_id(&self) -> &str {
        match self {
            ClientEvent::Join { room_id }
            | ClientEvent::Draw { room_id, .. }
            | ClientEvent::Update { room_id, .. }
            | ClientEvent::Delete { room_id, .. }
            | ClientEvent::Clear { room_id }
            | ClientEvent::DrawingStart { room_id }
            | ClientEvent::DrawingEnd { room_id }
            | ClientEvent::Chat { room_id, .. } => room_id,
        }
    }

    /// Wire name of the event kind
    pub fn kind(&self) -> &'static str {
        match self {
            ClientEvent::Join { .. } => "join",
            ClientEvent::Draw { .. } => "draw",
            ClientEvent::Update { .. } => "update",
            ClientEvent::Delete { .. } => "delete",
            ClientEvent::Clear { .. } => "clear",
            ClientEvent::DrawingStart { .. } => "drawing_start",
            ClientEvent::DrawingEnd { .. } => "drawing_end",
            ClientEvent::Chat { .. } => "chat",
        }
    }
}

/// Why an inbound frame could not be decoded
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("malformed frame: {0}")]
    MalformedJson(String),

    #[error("missing or empty roomId")]
    MissingRoomId,

    #[error("unknown event kind '{0}'")]
    UnknownKind(String),

    #[error("invalid payload for '{kind}': {reason}")]
    InvalidPayload { kind: &'static str, reason: String },
}

/// Envelope as it arrives on the wire, before kind dispatch
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEnvelope {
    r#type: String,
    #[serde(default)]
    room_id: Option<String>,
    #[serde(default)]
    payload: serde_json::Value,
}

fn parse_payload<T: DeserializeOwned>(
    payload: serde_json::Value,
    kind: &'static str,
) -> Result<T, DecodeError> {
    serde_json::from_value(payload).map_err(|e| DecodeError::InvalidPayload {
        kind,
        reason: e.to_string(),
    })
}

/// Decode a text frame into a typed client event.
///
/// `roomId` must be present and non-empty for every inbound event; the
/// match against the sender's joined room happens in the relay server.
pub fn decode_client_event(text: &str) -> Result<ClientEvent, DecodeError> {
    let raw: RawEnvelope =
        serde_json::from_str(text).map_err(|e| DecodeError::MalformedJson(e.to_string()))?;

    let room_id = match raw.room_id {
        Some(room_id) if !room_id.is_empty() => room_id,
        _ => return Err(DecodeError::MissingRoomId),
    };

    match raw.r#type.as_str() {
        "join" => Ok(ClientEvent::Join { room_id }),
        "draw" => {
            let payload: ShapePayload = parse_payload(raw.payload, "draw")?;
            Ok(ClientEvent::Draw {
                room_id,
                shape: payload.shape,
            })
        }
        "update" => {
            let payload: ShapePayload = parse_payload(raw.payload, "update")?;
            Ok(ClientEvent::Update {
                room_id,
                shape: payload.shape,
            })
        }
        "delete" => {
            let payload: ShapeDeletePayload = parse_payload(raw.payload, "delete")?;
            Ok(ClientEvent::Delete {
                room_id,
                shape_id: payload.shape_id,
            })
        }
        "clear" => Ok(ClientEvent::Clear { room_id }),
        "drawing_start" => Ok(ClientEvent::DrawingStart { room_id }),
        "drawing_end" => Ok(ClientEvent::DrawingEnd { room_id }),
        "chat" => {
            let payload: ChatSendPayload = parse_payload(raw.payload, "chat")?;
            Ok(ClientEvent::Chat {
                room_id,
                message: payload.message,
            })
        }
        other => Err(DecodeError::UnknownKind(other.to_string())),
    }
}
