//! Client execution logic with reconnection support.

use std::time::Duration;

use crate::{
    domain::{should_attempt_reconnect, should_exit_immediately},
    error::ClientError,
    session::run_client_session,
};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Run the whiteboard client with reconnection logic
pub async fn run_client(
    url: String,
    token: String,
    room: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} for room '{}' (attempt {}/{})",
            url,
            room,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        match run_client_session(&url, &token, &room).await {
            Ok(_) => {
                tracing::info!("Client session ended normally");
                // If connection ended normally (user exit), don't reconnect
                break;
            }
            Err(e) => {
                if let Some(client_err) = e.downcast_ref::<ClientError>()
                    && should_exit_immediately(client_err)
                {
                    tracing::error!("{}", e);
                    tracing::error!("This failure repeats on every retry. Exiting.");
                    std::process::exit(1);
                }

                tracing::warn!("Connection lost: {}", e);

                let reconnect = e
                    .downcast_ref::<ClientError>()
                    .map(|client_err| {
                        should_attempt_reconnect(client_err, reconnect_count, MAX_RECONNECT_ATTEMPTS)
                    })
                    .unwrap_or(reconnect_count < MAX_RECONNECT_ATTEMPTS);
                reconnect_count += 1;

                if !reconnect {
                    tracing::error!(
                        "Failed to reconnect after {} attempts. Exiting.",
                        MAX_RECONNECT_ATTEMPTS
                    );
                    std::process::exit(1);
                }

                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL_SECS,
                    reconnect_count + 1,
                    MAX_RECONNECT_ATTEMPTS
                );

                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    }

    Ok(())
}
