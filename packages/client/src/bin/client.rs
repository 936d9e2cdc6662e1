//! Whiteboard CLI client with reconnection support.
//!
//! Connects to a hakuban relay, joins a room and renders the event stream.
//! Plain input lines are sent as chat; /start, /stop and /clear drive the
//! board. Automatically reconnects on disconnection (max 5 attempts with
//! 5 second interval); a rejected credential or join exits immediately.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hakuban-client -- --room ABCDE --token <jwt>
//! ```

use clap::Parser;

use hakuban_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "hakuban-client")]
#[command(about = "CLI participant for hakuban whiteboard rooms", long_about = None)]
struct Args {
    /// Room code to join
    #[arg(short = 'r', long)]
    room: String,

    /// Bearer credential issued by the external token issuer
    #[arg(short = 't', long)]
    token: String,

    /// WebSocket relay URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Run the client
    if let Err(e) = hakuban_client::run_client(args.url, args.token, args.room).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
