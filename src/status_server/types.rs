//! Status server data structures.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::background::{Background, BackgroundHandle};
use crate::tabs::TabId;

/// Shared state for the status server
#[derive(Clone)]
pub struct StatusState {
    /// Service whose state is reported
    pub background: Arc<Background>,
    /// Channel into the running service loop
    pub events: BackgroundHandle,
    /// Server start
    pub start_time: Arc<Instant>,
}

impl StatusState {
    /// Wraps a running background service, starting the uptime clock now.
    ///
    /// `events` must be the handle returned by spawning `background`.
    pub fn new(background: Arc<Background>, events: BackgroundHandle) -> Self {
        Self {
            background,
            events,
            start_time: Arc::new(Instant::now()),
        }
    }
}

/// Query string of `/data`
#[derive(Debug, Default, Deserialize)]
pub struct DataQuery {
    /// Tab to report; the last activated tab when absent
    pub tab: Option<TabId>,
}

/// JSON response for `/status` endpoint
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Seconds since the server started
    pub uptime_seconds: f64,
    /// Whether a token is stored
    pub token_set: bool,
    /// Last activated tab
    pub active_tab: Option<TabId>,
    /// Tabs with a tracked IP
    pub tracked_tabs: usize,
    /// Cached detail records
    pub cached_details: usize,
    /// Failure counters
    pub failures: FailureCounts,
}

/// Failure counters by kind
#[derive(Debug, Serialize)]
pub struct FailureCounts {
    /// All failures
    pub total: usize,
    /// Non-zero counts keyed by kind
    pub by_kind: HashMap<&'static str, usize>,
}
