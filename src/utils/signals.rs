//! Signal handling for graceful shutdown

use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
use signal_hook_tokio::Signals;
use futures::stream::StreamExt;
use tracing::{error, info};

/// Wait for a shutdown signal (SIGTERM, SIGINT or SIGHUP).
///
/// Kiosk supervisors restart the display session with SIGHUP, so it is
/// treated like the other two.
pub async fn shutdown_signal() {
    let mut signals = match Signals::new([SIGTERM, SIGINT, SIGHUP]) {
        Ok(signals) => signals,
        Err(e) => {
            error!("Failed to create signal handler: {}", e);
            // Without signal handling the server runs until killed
            std::future::pending::<()>().await;
            return;
        }
    };

    if let Some(signal) = signals.next().await {
        let name = match signal {
            SIGTERM => "SIGTERM",
            SIGINT => "SIGINT",
            SIGHUP => "SIGHUP",
            _ => "unknown",
        };
        info!("Received signal: {} ({})", name, signal);
    }
}
