//! Local HTTP endpoint.
//!
//! Provides three endpoints:
//! - `GET /data` - the `getData` payload (optionally `?tab=<id>`)
//! - `POST /event` - a host event for the service loop
//! - `GET /status` - uptime, cache sizes and failure counters
//!
//! The server only binds to localhost.

mod handlers;
mod types;

use axum::routing::{get, post};
use axum::Router;

use handlers::{data_handler, event_handler, status_handler};
pub use types::StatusState;

/// Builds the router.
pub fn router(state: StatusState) -> Router {
    Router::new()
        .route("/data", get(data_handler))
        .route("/event", post(event_handler))
        .route("/status", get(status_handler))
        .with_state(state)
}

/// Creates and starts the status server
pub async fn start_status_server(port: u16, state: StatusState) -> Result<(), anyhow::Error> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind status server to port {}: {}", port, e))?;

    log::info!("Status server listening on http://127.0.0.1:{}/", port);
    log::info!("  - Data: http://127.0.0.1:{}/data", port);
    log::info!("  - Events: POST http://127.0.0.1:{}/event", port);
    log::info!("  - Status: http://127.0.0.1:{}/status", port);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Status server error: {}", e))?;

    Ok(())
}
