//! JSON status handler.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::super::types::{FailureCounts, StatusResponse, StatusState};

/// JSON status endpoint with uptime, cache sizes and failure counters
pub async fn status_handler(State(state): State<StatusState>) -> Response {
    let background = &state.background;
    let response = StatusResponse {
        uptime_seconds: state.start_time.elapsed().as_secs_f64(),
        token_set: background.token().is_some(),
        active_tab: background.active_tab(),
        tracked_tabs: background.tracked_tabs(),
        cached_details: background.cached_details(),
        failures: FailureCounts {
            total: background.stats().total(),
            by_kind: background.stats().snapshot(),
        },
    };

    (StatusCode::OK, Json(response)).into_response()
}
