//! Kiosk Idle - idle-screen controller daemon for kiosk displays
//!
//! This is the main entry point for the kiosk-idle application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use kiosk_idle::{
    config::Config,
    state::{AppState, Preferences},
    api::create_router,
    tasks::idle_timer_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("kiosk_idle={},tower_http=info", config.log_level()))
        .init();

    let idle_config = config.idle_config();
    let preferences = Preferences::new(config.initial_language(), config.text_size);

    info!("Starting kiosk-idle server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, idle={}s, warning={}s, countdown={}, language={}",
          config.host, config.port, config.idle_timeout, config.warning_timeout,
          config.countdown, preferences.language);

    // Create application state; the kiosk starts on its idle screen
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        idle_config,
        preferences,
    ));

    // Start the idle timer background task
    let timer_state = Arc::clone(&state);
    let timer_task = tokio::spawn(async move {
        idle_timer_task(timer_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /interaction    - Visitor interaction");
    info!("  POST /video          - Video playing/stopped");
    info!("  POST /idle/dismiss   - Leave the idle screen");
    info!("  POST /idle/force     - Show the idle screen");
    info!("  POST /warning/cancel - Stay on content");
    info!("  GET  /status         - Idle state and preferences");
    info!("  GET  /events         - Idle state stream (SSE)");
    info!("  GET  /health         - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    if let Err(e) = state.shutdown() {
        tracing::error!("Failed to cancel idle timers: {}", e);
    }
    timer_task.abort();

    info!("Server shutdown complete");
    Ok(())
}
