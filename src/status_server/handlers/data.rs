//! `getData` over HTTP.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::super::types::{DataQuery, StatusState};
use crate::background::{self, Request};

/// Same payload as the `getData` message, for `?tab=<id>` or the active tab.
///
/// Answered by the service loop, so events posted earlier are already applied.
pub async fn data_handler(
    State(state): State<StatusState>,
    Query(query): Query<DataQuery>,
) -> Response {
    let response = match state
        .events
        .request(Request::GetData { active_tab: query.tab })
        .await
    {
        Ok(response) => response,
        Err(e) => {
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(background::Response::Error {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    };
    let status = match response {
        background::Response::Error { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::OK,
    };
    (status, Json(response)).into_response()
}
