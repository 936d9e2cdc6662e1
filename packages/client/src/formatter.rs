//! Rendering of incoming relay messages for the terminal.

use hakuban_server::infrastructure::dto::websocket::{
    BoardClearMessage, ChatBroadcastMessage, DrawingStateMessage, ErrorMessage, InitMessage,
    ShapeDeleteMessage, ShapeUpsertMessage, UserJoinedMessage, UserLeftMessage, UserPresenceDto,
};
use hakuban_shared::time::timestamp_to_rfc3339;

/// What category of message was rendered; the session uses this to track
/// join progress and to detect fatal pre-join errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderedKind {
    /// The `init` event confirming the join
    Init,
    /// An `error` event from the relay
    Error,
    /// Any other recognized event
    Other,
    /// A frame the client could not recognize
    Raw,
}

/// A rendered message ready for the terminal
#[derive(Debug, Clone)]
pub struct RenderedMessage {
    pub kind: RenderedKind,
    pub display: String,
}

/// Formats incoming relay messages
pub struct MessageFormatter;

impl MessageFormatter {
    /// Render one text frame from the relay.
    ///
    /// Frames that do not parse as a known message are rendered raw
    /// rather than dropped.
    pub fn render(text: &str) -> RenderedMessage {
        let Ok(value) = serde_json::from_str::<serde_json::Value>(text) else {
            return Self::raw(text);
        };

        let Some(kind) = value["type"].as_str() else {
            return Self::raw(text);
        };

        match kind {
            "init" => match serde_json::from_value::<InitMessage>(value.clone()) {
                Ok(msg) => RenderedMessage {
                    kind: RenderedKind::Init,
                    display: Self::format_init(&msg),
                },
                Err(_) => Self::raw(text),
            },
            "user_joined" => match serde_json::from_value::<UserJoinedMessage>(value.clone()) {
                Ok(msg) => Self::other(Self::format_user_joined(&msg)),
                Err(_) => Self::raw(text),
            },
            "user_left" => match serde_json::from_value::<UserLeftMessage>(value.clone()) {
                Ok(msg) => Self::other(Self::format_user_left(&msg)),
                Err(_) => Self::raw(text),
            },
            "chat" => match serde_json::from_value::<ChatBroadcastMessage>(value.clone()) {
                Ok(msg) => Self::other(Self::format_chat(&msg)),
                Err(_) => Self::raw(text),
            },
            "draw" | "update" => {
                match serde_json::from_value::<ShapeUpsertMessage>(value.clone()) {
                    Ok(msg) => Self::other(Self::format_shape_upsert(kind, &msg)),
                    Err(_) => Self::raw(text),
                }
            }
            "delete" => match serde_json::from_value::<ShapeDeleteMessage>(value.clone()) {
                Ok(msg) => Self::other(Self::format_shape_delete(&msg)),
                Err(_) => Self::raw(text),
            },
            "clear" => match serde_json::from_value::<BoardClearMessage>(value.clone()) {
                Ok(msg) => Self::other(Self::format_clear(&msg)),
                Err(_) => Self::raw(text),
            },
            "drawing_start" | "drawing_end" => {
                match serde_json::from_value::<DrawingStateMessage>(value.clone()) {
                    Ok(msg) => Self::other(Self::format_drawing_state(kind, &msg)),
                    Err(_) => Self::raw(text),
                }
            }
            "error" => match serde_json::from_value::<ErrorMessage>(value.clone()) {
                Ok(msg) => RenderedMessage {
                    kind: RenderedKind::Error,
                    display: format!("\n! error: {}\n", msg.payload.message),
                },
                Err(_) => Self::raw(text),
            },
            _ => Self::raw(text),
        }
    }

    fn other(display: String) -> RenderedMessage {
        RenderedMessage {
            kind: RenderedKind::Other,
            display,
        }
    }

    fn raw(text: &str) -> RenderedMessage {
        RenderedMessage {
            kind: RenderedKind::Raw,
            display: format!("\n* unrecognized message: {text}\n"),
        }
    }

    fn member_names(users: &[UserPresenceDto]) -> String {
        users
            .iter()
            .map(|u| u.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn format_init(msg: &InitMessage) -> String {
        format!(
            "\n* connected to room '{}' with {} member(s): {}\n* board has {} shape(s)\n",
            msg.room_id,
            msg.payload.users.len(),
            Self::member_names(&msg.payload.users),
            msg.payload.shapes.len(),
        )
    }

    fn format_user_joined(msg: &UserJoinedMessage) -> String {
        format!(
            "\n* {} joined ({} member(s))\n",
            msg.payload.user.name,
            msg.payload.users.len(),
        )
    }

    fn format_user_left(msg: &UserLeftMessage) -> String {
        format!(
            "\n* {} left ({} member(s) remaining)\n",
            msg.payload.user_id,
            msg.payload.users.len(),
        )
    }

    fn format_chat(msg: &ChatBroadcastMessage) -> String {
        let chat = &msg.payload.chat_message;
        format!(
            "\n[{}] {}: {}\n",
            timestamp_to_rfc3339(chat.timestamp),
            chat.name,
            chat.message,
        )
    }

    fn format_shape_upsert(kind: &str, msg: &ShapeUpsertMessage) -> String {
        let verb = if kind == "draw" { "drew" } else { "updated" };
        let shape_id = msg.payload.shape["id"].as_str().unwrap_or("?");
        format!(
            "\n* {} {} shape '{}'\n",
            msg.name.as_deref().unwrap_or("someone"),
            verb,
            shape_id,
        )
    }

    fn format_shape_delete(msg: &ShapeDeleteMessage) -> String {
        format!(
            "\n* {} deleted shape '{}'\n",
            msg.name.as_deref().unwrap_or("someone"),
            msg.payload.shape_id,
        )
    }

    fn format_clear(msg: &BoardClearMessage) -> String {
        format!(
            "\n* {} cleared the board\n",
            msg.name.as_deref().unwrap_or("someone"),
        )
    }

    fn format_drawing_state(kind: &str, msg: &DrawingStateMessage) -> String {
        let name = msg
            .payload
            .users
            .iter()
            .find(|u| u.user_id == msg.payload.user_id)
            .map(|u| u.name.as_str())
            .unwrap_or(msg.payload.user_id.as_str());
        let verb = if kind == "drawing_start" {
            "started drawing"
        } else {
            "stopped drawing"
        };
        format!("\n* {name} {verb}\n")
    }
}
