//! Failure statistics printing.

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::{FailureKind, FailureStats};

/// Logs the non-zero failure counters at info level.
pub fn print_failure_statistics(stats: &FailureStats) {
    let total = stats.total();
    if total == 0 {
        return;
    }

    info!("Failure Counts ({} total):", total);
    for kind in FailureKind::iter() {
        let count = stats.count(kind);
        if count > 0 {
            info!("   {}: {}", kind.as_str(), count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_failure_statistics_does_not_panic() {
        let stats = FailureStats::new();
        print_failure_statistics(&stats);
        stats.record(FailureKind::Timeout);
        stats.record(FailureKind::Timeout);
        print_failure_statistics(&stats);
        assert_eq!(stats.total(), 2);
    }
}
