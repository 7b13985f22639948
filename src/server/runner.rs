//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use chrono::Utc;
use tokio::sync::Mutex;

use crate::infrastructure::pusher::WebSocketEventPusher;

use super::{
    dispatcher::Dispatcher,
    handler::{get_stats, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Run the pairing server
///
/// # Arguments
///
/// * `host` - The host address to bind to (e.g., "127.0.0.1")
/// * `port` - The port number to bind to (e.g., 8080)
pub async fn run_server(host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app_state = Arc::new(AppState {
        dispatcher: Mutex::new(Dispatcher::new()),
        pusher: Arc::new(WebSocketEventPusher::new()),
        started_at: Utc::now(),
    });

    let app = Router::new()
        .route("/ws", get(websocket_handler))
        .route("/api/health", get(health_check))
        .route("/api/stats", get(get_stats))
        .with_state(app_state);

    let bind_addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("Pairing server listening on {}", listener.local_addr()?);
    tracing::info!("Connect to: ws://{}/ws", bind_addr);
    tracing::info!("Press Ctrl+C to shutdown gracefully");

    // Set up graceful shutdown signal handler
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
