//! Application initialization and resource setup.
//!
//! This module provides functions to initialize the shared resources:
//! - Logger
//! - HTTP client
//! - Session and durable stores
//!
//! All initialization functions return proper error types for error handling.

mod client;
mod logger;

use std::sync::Arc;

use crate::config::Config;
use crate::error_handling::InitializationError;
use crate::store::{FileStore, MemoryStore, Store};

// Re-export public API
pub use client::init_client;
pub use logger::init_logger_with;

/// Session and durable stores used by the background service.
pub struct Stores {
    /// Ephemeral store, dropped with the process
    pub session: Arc<dyn Store>,
    /// Durable store backed by a JSON file in the state directory
    pub durable: Arc<dyn Store>,
}

/// Opens the stores described by the configuration.
///
/// The session store always starts empty. The durable store is read from
/// `<state_dir>/sync.json`, which is created on first write.
///
/// # Errors
///
/// Returns `InitializationError::StoreError` if an existing durable file is
/// unreadable or not a JSON object.
pub fn init_stores(config: &Config) -> Result<Stores, InitializationError> {
    let durable = FileStore::open(config.sync_store_path())?;
    Ok(Stores {
        session: Arc::new(MemoryStore::new()),
        durable: Arc::new(durable),
    })
}
