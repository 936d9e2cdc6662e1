//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use crate::error::ClientError;
use crate::formatter::{MessageFormatter, RenderedKind};

use super::ui::redisplay_prompt;

/// Turn one input line into the wire event to send.
///
/// Plain lines become chat; a few slash commands drive the whiteboard
/// protocol directly, which makes the CLI usable for manual relay testing.
pub fn input_to_event(line: &str, room: &str) -> serde_json::Value {
    match line {
        "/start" => serde_json::json!({"type": "drawing_start", "roomId": room, "payload": {}}),
        "/stop" => serde_json::json!({"type": "drawing_end", "roomId": room, "payload": {}}),
        "/clear" => serde_json::json!({"type": "clear", "roomId": room, "payload": {}}),
        _ => serde_json::json!({"type": "chat", "roomId": room, "payload": {"message": line}}),
    }
}

/// Run one WebSocket client session: connect, join, relay terminal input
/// until the connection or the user ends it.
pub async fn run_client_session(
    url: &str,
    token: &str,
    room: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    // The credential rides on the upgrade request as a query parameter
    let connect_url = format!("{url}?token={token}");

    let (ws_stream, _response) = match connect_async(&connect_url).await {
        Ok(result) => result,
        Err(e) => {
            let error_msg = e.to_string();
            // A rejected upgrade surfaces as an HTTP 401 handshake error
            if error_msg.contains("401") || error_msg.contains("Unauthorized") {
                return Err(Box::new(ClientError::AuthRejected));
            }
            return Err(Box::new(ClientError::ConnectionError(error_msg)));
        }
    };

    tracing::info!("Connected to relay");

    let (mut write, mut read) = ws_stream.split();

    // Join the room before anything else; the relay rejects other events
    // until the join is accepted.
    let join = serde_json::json!({"type": "join", "roomId": room});
    write.send(Message::Text(join.to_string().into())).await?;

    println!(
        "\nJoining room '{room}'. Type to chat; /start, /stop and /clear drive the board. Ctrl+C to exit.\n"
    );

    // Spawn a task to render incoming messages
    let room_for_read = room.to_string();
    let mut read_task = tokio::spawn(async move {
        let mut joined = false;

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let rendered = MessageFormatter::render(&text);
                    match rendered.kind {
                        RenderedKind::Init => joined = true,
                        RenderedKind::Error if !joined => {
                            // A pre-join error is a refused join; the relay
                            // closes the connection right after it.
                            print!("{}", rendered.display);
                            return Some(ClientError::RoomRejected(rendered.display.trim().to_string()));
                        }
                        _ => {}
                    }
                    print!("{}", rendered.display);
                    redisplay_prompt(&room_for_read);
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    return Some(ClientError::ConnectionError(
                        "server closed the connection".to_string(),
                    ));
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    return Some(ClientError::ConnectionError(e.to_string()));
                }
                _ => {}
            }
        }

        None
    });

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    let prompt_room = room.to_string();
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        let prompt = format!("{}> ", prompt_room);

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Spawn a task to turn input lines into wire events
    let room_for_write = room.to_string();
    let mut write_task = tokio::spawn(async move {
        while let Some(line) = input_rx.recv().await {
            let event = input_to_event(&line, &room_for_write);

            if let Err(e) = write.send(Message::Text(event.to_string().into())).await {
                tracing::warn!("Failed to send event: {}", e);
                return Some(ClientError::ConnectionError(e.to_string()));
            }
        }
        None
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        read_result = &mut read_task => {
            write_task.abort();
            if let Ok(Some(error)) = read_result {
                return Err(Box::new(error));
            }
        }
        write_result = &mut write_task => {
            read_task.abort();
            if let Ok(Some(error)) = write_result {
                return Err(Box::new(error));
            }
        }
    }

    Ok(())
}
