//! Host events over HTTP.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::super::types::StatusState;
use crate::background::{self, Event};

/// Queues a host event (`{"event": "request_completed", "tabId": 1, ...}`).
pub async fn event_handler(State(state): State<StatusState>, Json(event): Json<Event>) -> Response {
    match state.events.send_event(event).await {
        Ok(()) => (StatusCode::ACCEPTED, Json(background::Response::Ack {})).into_response(),
        Err(e) => {
            log::warn!("Dropped posted event: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(background::Response::Error {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}
