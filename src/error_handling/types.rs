//! Error type definitions.
//!
//! This module defines the error types and failure categories used throughout the
//! application.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// Error opening a store.
    #[error("Store initialization error: {0}")]
    StoreError(#[from] StoreError),
}

/// Error types for key-value store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be encoded or decoded.
    #[error("Store serialization error for key '{key}': {source}")]
    Serialization {
        /// Key being read or written
        key: String,
        /// Underlying JSON error
        source: serde_json::Error,
    },

    /// The backing file is not a JSON object.
    #[error("Store file {0} is corrupt: {1}")]
    Corrupt(String, serde_json::Error),

    /// A lock guarding the store was poisoned by a panicking writer.
    #[error("Store lock poisoned")]
    LockPoisoned,
}

/// Error types for outbound HTTP fetches.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request failed (connect, timeout, non-2xx status, body read).
    #[error("Request failed: {0}")]
    Request(#[from] ReqwestError),

    /// The endpoint answered with an empty body.
    #[error("Empty response body from {0}")]
    EmptyBody(String),

    /// The response did not carry the expected data.
    #[error("Unexpected response from {url}: {reason}")]
    Unexpected {
        /// Requested URL
        url: String,
        /// What was wrong with the response
        reason: String,
    },
}

/// Categories of outbound request failures.
///
/// Every failure is swallowed by the caller (the affected data is simply absent),
/// so these categories only feed logging and the `/status` counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum FailureKind {
    /// The request exceeded its timeout
    Timeout,
    /// TCP/TLS connection could not be established
    Connect,
    /// The server answered with a non-success status
    Status,
    /// 429 Too Many Requests (usually an exhausted API quota)
    TooManyRequests,
    /// 401/403 (usually a bad token)
    Unauthorized,
    /// The body could not be decoded
    Decode,
    /// The body could not be read
    Body,
    /// The endpoint answered with an empty body
    EmptyBody,
    /// Anything else
    Other,
}

impl FailureKind {
    /// Stable snake_case name used in logs and JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::Timeout => "timeout",
            FailureKind::Connect => "connect",
            FailureKind::Status => "status",
            FailureKind::TooManyRequests => "too_many_requests",
            FailureKind::Unauthorized => "unauthorized",
            FailureKind::Decode => "decode",
            FailureKind::Body => "body",
            FailureKind::EmptyBody => "empty_body",
            FailureKind::Other => "other",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_failure_kind_names_are_unique() {
        let names: std::collections::HashSet<_> = FailureKind::iter().map(|k| k.as_str()).collect();
        assert_eq!(names.len(), FailureKind::iter().count());
    }

    #[test]
    fn test_store_error_display() {
        let err = StoreError::LockPoisoned;
        assert_eq!(err.to_string(), "Store lock poisoned");

        let source = serde_json::from_str::<u32>("x").unwrap_err();
        let err = StoreError::Serialization {
            key: "tab_ips".to_string(),
            source,
        };
        assert!(err.to_string().contains("tab_ips"));
    }

    #[test]
    fn test_fetch_error_display() {
        let err = FetchError::EmptyBody("https://4.ipw.cn".to_string());
        assert_eq!(err.to_string(), "Empty response body from https://4.ipw.cn");
    }
}
