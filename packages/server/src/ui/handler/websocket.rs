//! WebSocket connection handlers.
//!
//! Connection lifecycle: `Upgrading → Authenticating → AwaitingJoin →
//! Active → Closed`. Authentication and join validation failures are fatal
//! to the connection; protocol errors inside `Active` are reported back to
//! the offender as an `error` event and the connection stays open.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::{
    domain::{
        AuthError, ChatText, ConnectionId, Identity, Member, OUTBOUND_QUEUE_CAPACITY, RoomId,
    },
    infrastructure::dto::{
        codec::{ClientEvent, decode_client_event},
        conversion::presence_list,
        websocket::{
            BoardClearMessage, ChatBroadcastMessage, ChatBroadcastPayload, DrawingStateMessage,
            DrawingStatePayload, EmptyPayload, ErrorMessage, InitMessage, InitPayload,
            MessageType, ShapeDeleteMessage, ShapeDeletePayload, ShapePayload,
            ShapeUpsertMessage, UserJoinedMessage, UserJoinedPayload, UserLeftMessage,
            UserLeftPayload,
        },
    },
    ui::state::AppState,
};

/// How long a single socket write may take before the connection is
/// treated as failed and torn down.
const WRITE_TIMEOUT: Duration = Duration::from_secs(10);

/// Query parameters of the connection upgrade request
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub token: Option<String>,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    // Authenticate before the upgrade completes; a refused socket never
    // creates any room state.
    let Some(token) = query.token else {
        tracing::warn!("Upgrade rejected: {}", AuthError::MissingCredential);
        return Err((
            StatusCode::UNAUTHORIZED,
            AuthError::MissingCredential.to_string(),
        ));
    };

    let identity = match state.authenticator.verify(&token).await {
        Ok(identity) => identity,
        Err(e) => {
            tracing::warn!("Upgrade rejected: {}", e);
            return Err((StatusCode::UNAUTHORIZED, e.to_string()));
        }
    };

    tracing::info!(
        "User '{}' authenticated, upgrading connection",
        identity.user_id.as_str()
    );
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, identity)))
}

/// Spawns the writer task that drains a connection's outbound queue into
/// the WebSocket sink.
///
/// One queue, one writer per connection: delivery stays FIFO for that
/// connection, and a failed or timed-out write only ends this task. The
/// closed queue is then reported by the pusher on the next broadcast and
/// the `select!` in `handle_socket` tears the connection down.
fn pusher_loop(
    mut rx: mpsc::Receiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match tokio::time::timeout(WRITE_TIMEOUT, sender.send(Message::Text(msg.into()))).await
            {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::debug!("Socket write failed: {}", e);
                    break;
                }
                Err(_) => {
                    tracing::warn!("Socket write timed out after {:?}", WRITE_TIMEOUT);
                    break;
                }
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, identity: Identity) {
    let connection_id = ConnectionId::generate();
    let (tx, rx) = mpsc::channel::<String>(OUTBOUND_QUEUE_CAPACITY);

    let (sender, mut receiver) = socket.split();
    let mut send_task = pusher_loop(rx, sender);

    // AwaitingJoin: read frames until the first valid join event
    let Some(room_id) = await_join(&state, &mut receiver, &tx, connection_id, &identity).await
    else {
        // Drop the queue sender so the writer drains any queued error
        // frame before the socket goes away.
        drop(tx);
        if tokio::time::timeout(WRITE_TIMEOUT, &mut send_task).await.is_err() {
            send_task.abort();
        }
        return;
    };

    // Active: spawn the message loop and race it against the writer
    let state_clone = state.clone();
    let tx_clone = tx.clone();
    let identity_clone = identity.clone();
    let room_id_clone = room_id.clone();
    let mut recv_task = tokio::spawn(async move {
        message_loop(
            state_clone,
            receiver,
            tx_clone,
            connection_id,
            identity_clone,
            room_id_clone,
        )
        .await;
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Closed: deregister and broadcast user_left exactly once
    match state
        .leave_room_usecase
        .execute(&room_id, &connection_id)
        .await
    {
        Ok(roster) => {
            let left_msg = UserLeftMessage {
                r#type: MessageType::UserLeft,
                room_id: room_id.as_str().to_string(),
                payload: UserLeftPayload {
                    user_id: identity.user_id.as_str().to_string(),
                    users: presence_list(roster.clone()),
                },
            };
            let left_json = serde_json::to_string(&left_msg).unwrap();
            let targets = roster.iter().map(|m| m.connection_id).collect();
            state
                .leave_room_usecase
                .broadcast_user_left(targets, &left_json)
                .await;
            tracing::info!(
                "User '{}' left room '{}'",
                identity.user_id.as_str(),
                room_id.as_str()
            );
        }
        Err(_) => {
            tracing::warn!("Connection '{}' was not registered at close", connection_id);
        }
    }
}

/// AwaitingJoin phase: reads frames until the first valid `join`.
///
/// Returns the joined room, or `None` when the connection ended or the
/// join was refused (fatal). Non-join events and undecodable frames are
/// answered with an `error` event and the phase continues.
async fn await_join(
    state: &Arc<AppState>,
    receiver: &mut SplitStream<WebSocket>,
    tx: &mpsc::Sender<String>,
    connection_id: ConnectionId,
    identity: &Identity,
) -> Option<RoomId> {
    while let Some(msg) = receiver.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                tracing::debug!("WebSocket error before join: {}", e);
                return None;
            }
        };

        match msg {
            Message::Text(text) => match decode_client_event(&text) {
                Ok(ClientEvent::Join { room_id }) => {
                    let room_id = match RoomId::new(room_id) {
                        Ok(room_id) => room_id,
                        Err(e) => {
                            // join validation failure: fatal
                            send_error(tx, "", &e.to_string()).await;
                            return None;
                        }
                    };
                    match state
                        .join_room_usecase
                        .execute(room_id.clone(), connection_id, identity.clone(), tx.clone())
                        .await
                    {
                        Ok(accepted) => {
                            let announced = announce_join(
                                state,
                                tx,
                                &room_id,
                                connection_id,
                                accepted.roster,
                                accepted.shapes,
                            )
                            .await;
                            if announced {
                                tracing::info!(
                                    "User '{}' joined room '{}'",
                                    identity.user_id.as_str(),
                                    room_id.as_str()
                                );
                                return Some(room_id);
                            }
                            // init could not be delivered; undo the join
                            let _ = state
                                .leave_room_usecase
                                .execute(&room_id, &connection_id)
                                .await;
                            return None;
                        }
                        Err(e) => {
                            tracing::warn!(
                                "Join of user '{}' to room '{}' refused: {}",
                                identity.user_id.as_str(),
                                room_id.as_str(),
                                e
                            );
                            send_error(tx, room_id.as_str(), &e.to_string()).await;
                            return None;
                        }
                    }
                }
                Ok(other) => {
                    send_error(tx, other.room_id(), "not joined").await;
                }
                Err(e) => {
                    send_error(tx, "", &e.to_string()).await;
                }
            },
            Message::Ping(_) => {
                // Ping/pong is handled automatically by the WebSocket protocol
            }
            Message::Close(_) => {
                tracing::info!("Connection '{}' closed before join", connection_id);
                return None;
            }
            _ => {}
        }
    }
    None
}

/// Send `init` to the joiner and broadcast `user_joined` to the room
/// (including the joiner). Returns `false` when the joiner's queue is
/// already gone.
async fn announce_join(
    state: &Arc<AppState>,
    tx: &mpsc::Sender<String>,
    room_id: &RoomId,
    connection_id: ConnectionId,
    roster: Vec<Member>,
    shapes: Vec<serde_json::Value>,
) -> bool {
    let users = presence_list(roster.clone());

    let init_msg = InitMessage {
        r#type: MessageType::Init,
        room_id: room_id.as_str().to_string(),
        payload: InitPayload {
            shapes,
            users: users.clone(),
        },
    };
    if tx
        .send(serde_json::to_string(&init_msg).unwrap())
        .await
        .is_err()
    {
        return false;
    }

    // The roster came from the add under the room lock, so the joiner is
    // always present; guard anyway rather than panic the handler.
    let Some(joiner) = roster
        .iter()
        .find(|m| m.connection_id == connection_id)
        .cloned()
    else {
        return false;
    };

    let joined_msg = UserJoinedMessage {
        r#type: MessageType::UserJoined,
        room_id: room_id.as_str().to_string(),
        payload: UserJoinedPayload {
            user: joiner.into(),
            users,
        },
    };
    let joined_json = serde_json::to_string(&joined_msg).unwrap();
    let targets = roster.iter().map(|m| m.connection_id).collect();
    state
        .join_room_usecase
        .broadcast_user_joined(targets, &joined_json)
        .await;
    true
}

/// Active phase: decode and dispatch frames until the connection ends
async fn message_loop(
    state: Arc<AppState>,
    mut receiver: SplitStream<WebSocket>,
    tx: mpsc::Sender<String>,
    connection_id: ConnectionId,
    identity: Identity,
    room_id: RoomId,
) {
    while let Some(msg) = receiver.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                tracing::debug!("WebSocket error: {}", e);
                break;
            }
        };

        match msg {
            Message::Text(text) => {
                let event = match decode_client_event(&text) {
                    Ok(event) => event,
                    Err(e) => {
                        // protocol error: report to the sender only, stay open
                        send_error(&tx, room_id.as_str(), &e.to_string()).await;
                        continue;
                    }
                };

                // Every inbound event must name the room this connection
                // joined.
                if event.room_id() != room_id.as_str() {
                    send_error(&tx, room_id.as_str(), "room mismatch").await;
                    continue;
                }

                dispatch_event(&state, &tx, connection_id, &identity, &room_id, event).await;
            }
            Message::Ping(_) => {
                // Ping/pong is handled automatically by the WebSocket protocol
            }
            Message::Close(_) => {
                tracing::info!("Connection '{}' requested close", connection_id);
                break;
            }
            _ => {}
        }
    }
}

/// Dispatch a decoded event to its use case
async fn dispatch_event(
    state: &Arc<AppState>,
    tx: &mpsc::Sender<String>,
    connection_id: ConnectionId,
    identity: &Identity,
    room_id: &RoomId,
    event: ClientEvent,
) {
    let sender_name = Some(identity.name.as_str().to_string());

    match event {
        ClientEvent::Join { .. } => {
            send_error(tx, room_id.as_str(), "already joined").await;
        }
        ClientEvent::Draw { shape, .. } => {
            let msg = ShapeUpsertMessage {
                r#type: MessageType::Draw,
                name: sender_name,
                room_id: room_id.as_str().to_string(),
                payload: ShapePayload { shape },
            };
            relay_shape(state, room_id, connection_id, &msg).await;
        }
        ClientEvent::Update { shape, .. } => {
            let msg = ShapeUpsertMessage {
                r#type: MessageType::Update,
                name: sender_name,
                room_id: room_id.as_str().to_string(),
                payload: ShapePayload { shape },
            };
            relay_shape(state, room_id, connection_id, &msg).await;
        }
        ClientEvent::Delete { shape_id, .. } => {
            let msg = ShapeDeleteMessage {
                r#type: MessageType::Delete,
                name: sender_name,
                room_id: room_id.as_str().to_string(),
                payload: ShapeDeletePayload { shape_id },
            };
            relay_shape(state, room_id, connection_id, &msg).await;
        }
        ClientEvent::Clear { .. } => {
            let msg = BoardClearMessage {
                r#type: MessageType::Clear,
                name: sender_name,
                room_id: room_id.as_str().to_string(),
                payload: EmptyPayload {},
            };
            relay_shape(state, room_id, connection_id, &msg).await;
        }
        ClientEvent::DrawingStart { .. } => {
            update_drawing_state(
                state,
                tx,
                connection_id,
                identity,
                room_id,
                true,
                MessageType::DrawingStart,
            )
            .await;
        }
        ClientEvent::DrawingEnd { .. } => {
            update_drawing_state(
                state,
                tx,
                connection_id,
                identity,
                room_id,
                false,
                MessageType::DrawingEnd,
            )
            .await;
        }
        ClientEvent::Chat { message, .. } => {
            let text = match ChatText::new(message) {
                Ok(text) => text,
                Err(e) => {
                    send_error(tx, room_id.as_str(), &e.to_string()).await;
                    return;
                }
            };
            let (chat, targets) = state
                .send_chat_usecase
                .execute(room_id, identity.clone(), text)
                .await;
            let msg = ChatBroadcastMessage {
                r#type: MessageType::Chat,
                room_id: room_id.as_str().to_string(),
                payload: ChatBroadcastPayload {
                    chat_message: chat.into(),
                },
            };
            let json = serde_json::to_string(&msg).unwrap();
            state.send_chat_usecase.broadcast_chat(targets, &json).await;
        }
    }
}

/// Fan a serialized shape event out to the room, excluding the sender
async fn relay_shape<T: serde::Serialize>(
    state: &Arc<AppState>,
    room_id: &RoomId,
    connection_id: ConnectionId,
    message: &T,
) {
    let json = serde_json::to_string(message).unwrap();
    state
        .relay_shape_usecase
        .execute(room_id, &connection_id, &json)
        .await;
}

/// Flip the sender's drawing flag and re-broadcast the presence list
async fn update_drawing_state(
    state: &Arc<AppState>,
    tx: &mpsc::Sender<String>,
    connection_id: ConnectionId,
    identity: &Identity,
    room_id: &RoomId,
    drawing: bool,
    kind: MessageType,
) {
    match state
        .update_presence_usecase
        .execute(room_id, &connection_id, drawing)
        .await
    {
        Ok(roster) => {
            let msg = DrawingStateMessage {
                r#type: kind,
                room_id: room_id.as_str().to_string(),
                payload: DrawingStatePayload {
                    user_id: identity.user_id.as_str().to_string(),
                    users: presence_list(roster.clone()),
                },
            };
            let json = serde_json::to_string(&msg).unwrap();
            let targets = roster.iter().map(|m| m.connection_id).collect();
            state
                .update_presence_usecase
                .broadcast_presence(targets, &json)
                .await;
        }
        Err(e) => {
            send_error(tx, room_id.as_str(), &e.to_string()).await;
        }
    }
}

/// Report an error to the offending connection only
async fn send_error(tx: &mpsc::Sender<String>, room_id: &str, message: &str) {
    let error_msg = ErrorMessage::new(room_id, message);
    if tx
        .send(serde_json::to_string(&error_msg).unwrap())
        .await
        .is_err()
    {
        tracing::debug!("Could not report error to connection, writer is gone");
    }
}
