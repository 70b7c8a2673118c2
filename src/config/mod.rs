//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (endpoints, timeouts, storage keys, assets)
//! - The library configuration struct
//! - CLI argument types and parsing

mod cli;
mod constants;
mod types;

// Re-export all constants
pub use cli::{Cli, Command, GlobalArgs, TokenAction};
pub use constants::*;
pub use types::{Config, EgressEndpoints, LogFormat, LogLevel};
