//! Failure statistics tracking.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use strum::IntoEnumIterator;

use super::types::FailureKind;

/// Thread-safe failure counters.
///
/// Tracks swallowed request failures per `FailureKind` using atomic counters so
/// the egress fetches can record concurrently. All kinds start at zero.
pub struct FailureStats {
    failures: HashMap<FailureKind, AtomicUsize>,
}

impl FailureStats {
    /// Creates a tracker with every counter at zero.
    pub fn new() -> Self {
        let mut failures = HashMap::new();
        for kind in FailureKind::iter() {
            failures.insert(kind, AtomicUsize::new(0));
        }
        FailureStats { failures }
    }

    /// Increment the counter for a failure kind.
    pub fn record(&self, kind: FailureKind) {
        if let Some(counter) = self.failures.get(&kind) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to record failure {:?} which is not in the map",
                kind
            );
        }
    }

    /// Get the count for a failure kind.
    pub fn count(&self, kind: FailureKind) -> usize {
        self.failures
            .get(&kind)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Total failures across all kinds.
    pub fn total(&self) -> usize {
        FailureKind::iter().map(|k| self.count(k)).sum()
    }

    /// Snapshot of all non-zero counters keyed by kind name.
    pub fn snapshot(&self) -> HashMap<&'static str, usize> {
        FailureKind::iter()
            .map(|k| (k.as_str(), self.count(k)))
            .filter(|(_, n)| *n > 0)
            .collect()
    }
}

impl Default for FailureStats {
    fn default() -> Self {
        Self::new()
    }
}
