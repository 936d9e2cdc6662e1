//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::domain::Authenticator;
use crate::usecase::{
    GetRoomsUseCase, JoinRoomUseCase, LeaveRoomUseCase, RelayShapeUseCase, SendChatUseCase,
    UpdatePresenceUseCase,
};

use super::{
    handler::{get_room_detail, get_rooms, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Whiteboard relay server
///
/// Encapsulates the wired-up use cases and runs the axum application.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     authenticator,
///     join_room_usecase,
///     leave_room_usecase,
///     relay_shape_usecase,
///     send_chat_usecase,
///     update_presence_usecase,
///     get_rooms_usecase,
/// );
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    authenticator: Arc<dyn Authenticator>,
    join_room_usecase: Arc<JoinRoomUseCase>,
    leave_room_usecase: Arc<LeaveRoomUseCase>,
    relay_shape_usecase: Arc<RelayShapeUseCase>,
    send_chat_usecase: Arc<SendChatUseCase>,
    update_presence_usecase: Arc<UpdatePresenceUseCase>,
    get_rooms_usecase: Arc<GetRoomsUseCase>,
}

impl Server {
    /// Create a new Server instance from the wired-up use cases
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        authenticator: Arc<dyn Authenticator>,
        join_room_usecase: Arc<JoinRoomUseCase>,
        leave_room_usecase: Arc<LeaveRoomUseCase>,
        relay_shape_usecase: Arc<RelayShapeUseCase>,
        send_chat_usecase: Arc<SendChatUseCase>,
        update_presence_usecase: Arc<UpdatePresenceUseCase>,
        get_rooms_usecase: Arc<GetRoomsUseCase>,
    ) -> Self {
        Self {
            authenticator,
            join_room_usecase,
            leave_room_usecase,
            relay_shape_usecase,
            send_chat_usecase,
            update_presence_usecase,
            get_rooms_usecase,
        }
    }

    /// Run the relay server.
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified
    /// address or if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app_state = Arc::new(AppState {
            authenticator: self.authenticator,
            join_room_usecase: self.join_room_usecase,
            leave_room_usecase: self.leave_room_usecase,
            relay_shape_usecase: self.relay_shape_usecase,
            send_chat_usecase: self.send_chat_usecase,
            update_presence_usecase: self.update_presence_usecase,
            get_rooms_usecase: self.get_rooms_usecase,
        });

        // Define handlers
        let app = Router::new()
            // WebSocket endpoint
            .route("/ws", get(websocket_handler))
            // HTTP endpoints
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .route("/api/rooms/{room_id}", get(get_room_detail))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state);

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!(
            "Whiteboard relay server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws?token=<credential>", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
