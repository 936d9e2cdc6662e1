//! Whiteboard relay server binary.
//!
//! Accepts authenticated WebSocket connections, scopes them to rooms and
//! rebroadcasts drawing, chat and presence events to the other members.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hakuban-server
//! cargo run --bin hakuban-server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;

use clap::Parser;

use hakuban_server::{
    domain::SnapshotStore,
    infrastructure::{
        auth::JwtAuthenticator,
        message_pusher::WebSocketMessagePusher,
        registry::InMemoryRoomRegistry,
        snapshot::{HttpSnapshotStore, NullSnapshotStore},
    },
    ui::Server,
    usecase::{
        GetRoomsUseCase, JoinRoomUseCase, LeaveRoomUseCase, RelayShapeUseCase, SendChatUseCase,
        UpdatePresenceUseCase,
    },
};
use hakuban_shared::logger::setup_logger;

/// Development fallback; a deployment must set its own secret
const DEV_AUTH_SECRET: &str = "hakuban-dev-secret-change-in-production";

#[derive(Parser, Debug)]
#[command(name = "hakuban-server")]
#[command(about = "Real-time room relay server for the hakuban whiteboard", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Shared secret for credential verification
    /// (falls back to the HAKUBAN_AUTH_SECRET environment variable)
    #[arg(long)]
    auth_secret: Option<String>,

    /// Base URL of the REST snapshot store
    /// (falls back to the HAKUBAN_SNAPSHOT_URL environment variable)
    #[arg(long)]
    snapshot_url: Option<String>,
}

fn resolve_auth_secret(arg: Option<String>) -> String {
    arg.or_else(|| std::env::var("HAKUBAN_AUTH_SECRET").ok())
        .unwrap_or_else(|| {
            tracing::warn!(
                "No auth secret configured, using the development fallback. \
                 Set --auth-secret or HAKUBAN_AUTH_SECRET in production."
            );
            DEV_AUTH_SECRET.to_string()
        })
}

fn resolve_snapshot_store(arg: Option<String>) -> Arc<dyn SnapshotStore> {
    match arg.or_else(|| std::env::var("HAKUBAN_SNAPSHOT_URL").ok()) {
        Some(url) => {
            tracing::info!("Using snapshot store at {}", url);
            Arc::new(HttpSnapshotStore::new(url))
        }
        None => {
            tracing::info!("No snapshot store configured, boards start empty");
            Arc::new(NullSnapshotStore)
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Registry + MessagePusher + SnapshotStore + Authenticator
    // 2. UseCases
    // 3. Server

    // 1. Infrastructure
    let registry = Arc::new(InMemoryRoomRegistry::new());
    let message_pusher = Arc::new(WebSocketMessagePusher::new());
    let snapshot_store = resolve_snapshot_store(args.snapshot_url);
    let authenticator = Arc::new(JwtAuthenticator::new(&resolve_auth_secret(
        args.auth_secret,
    )));

    // 2. UseCases
    let join_room_usecase = Arc::new(JoinRoomUseCase::new(
        registry.clone(),
        message_pusher.clone(),
        snapshot_store,
    ));
    let leave_room_usecase = Arc::new(LeaveRoomUseCase::new(
        registry.clone(),
        message_pusher.clone(),
    ));
    let relay_shape_usecase = Arc::new(RelayShapeUseCase::new(
        registry.clone(),
        message_pusher.clone(),
    ));
    let send_chat_usecase = Arc::new(SendChatUseCase::new(
        registry.clone(),
        message_pusher.clone(),
    ));
    let update_presence_usecase = Arc::new(UpdatePresenceUseCase::new(
        registry.clone(),
        message_pusher.clone(),
    ));
    let get_rooms_usecase = Arc::new(GetRoomsUseCase::new(registry.clone()));

    // 3. Create and run the server
    let server = Server::new(
        authenticator,
        join_room_usecase,
        leave_room_usecase,
        relay_shape_usecase,
        send_chat_usecase,
        update_presence_usecase,
        get_rooms_usecase,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
