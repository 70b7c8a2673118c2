//! Failure categorization.

use super::types::{FailureKind, FetchError};

/// Categorizes a `reqwest::Error` into a `FailureKind`.
///
/// Status codes are checked first because `error_for_status` errors carry one;
/// transport-level errors fall through to the reqwest error flags.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> FailureKind {
    if let Some(status) = error.status() {
        return match status.as_u16() {
            401 | 403 => FailureKind::Unauthorized,
            429 => FailureKind::TooManyRequests,
            _ => FailureKind::Status,
        };
    }

    if error.is_timeout() {
        FailureKind::Timeout
    } else if error.is_connect() {
        FailureKind::Connect
    } else if error.is_status() {
        FailureKind::Status
    } else if error.is_decode() {
        FailureKind::Decode
    } else if error.is_body() {
        FailureKind::Body
    } else {
        FailureKind::Other
    }
}

/// Categorizes a `FetchError` into a `FailureKind`.
pub fn categorize_fetch_error(error: &FetchError) -> FailureKind {
    match error {
        FetchError::Request(e) => categorize_reqwest_error(e),
        FetchError::EmptyBody(_) => FailureKind::EmptyBody,
        FetchError::Unexpected { .. } => FailureKind::Decode,
    }
}
