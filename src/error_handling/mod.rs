//! Error handling and failure statistics.
//!
//! This module provides:
//! - Error type definitions (initialization, store, fetch)
//! - Categorization of request failures
//! - Atomic failure counters
//!
//! Request failures never propagate past the component that issued the request:
//! the data is treated as absent, the failure is logged and counted.

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::{categorize_fetch_error, categorize_reqwest_error};
pub use stats::FailureStats;
pub use types::{FailureKind, FetchError, InitializationError, StoreError};

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_failure_stats_initialization() {
        let stats = FailureStats::new();
        for kind in FailureKind::iter() {
            assert_eq!(stats.count(kind), 0);
        }
        assert_eq!(stats.total(), 0);
        assert!(stats.snapshot().is_empty());
    }

    #[test]
    fn test_failure_stats_record() {
        let stats = FailureStats::new();
        stats.record(FailureKind::Timeout);
        stats.record(FailureKind::Timeout);
        stats.record(FailureKind::Unauthorized);

        assert_eq!(stats.count(FailureKind::Timeout), 2);
        assert_eq!(stats.count(FailureKind::Unauthorized), 1);
        assert_eq!(stats.total(), 3);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.get("timeout"), Some(&2));
        assert_eq!(snapshot.get("unauthorized"), Some(&1));
        assert!(!snapshot.contains_key("connect"));
    }
}
