//! Configuration types.
//!
//! This module defines the library configuration struct and the enums shared with
//! the command-line interface.

use std::path::PathBuf;

use clap::ValueEnum;

use crate::config::constants::{
    DEFAULT_ASSET_DIR, DEFAULT_STATE_DIR, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
    DETAIL_API_BASE, DOMESTIC_IPV4_URL, DOMESTIC_IPV6_URL, GLOBAL_IPV4_URL, GLOBAL_IPV6_URL,
    SYNC_STORE_FILE,
};
use crate::egress::EgressSlot;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// The four plaintext egress-IP endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EgressEndpoints {
    /// Domestic IPv4 endpoint
    pub domestic_v4: String,
    /// Domestic IPv6 endpoint
    pub domestic_v6: String,
    /// Global IPv4 endpoint
    pub global_v4: String,
    /// Global IPv6 endpoint
    pub global_v6: String,
}

impl EgressEndpoints {
    /// Returns the endpoint URL for a slot.
    pub fn url(&self, slot: EgressSlot) -> &str {
        match slot {
            EgressSlot::DomesticV4 => &self.domestic_v4,
            EgressSlot::DomesticV6 => &self.domestic_v6,
            EgressSlot::GlobalV4 => &self.global_v4,
            EgressSlot::GlobalV6 => &self.global_v6,
        }
    }
}

impl Default for EgressEndpoints {
    fn default() -> Self {
        Self {
            domestic_v4: DOMESTIC_IPV4_URL.to_string(),
            domestic_v6: DOMESTIC_IPV6_URL.to_string(),
            global_v4: GLOBAL_IPV4_URL.to_string(),
            global_v6: GLOBAL_IPV6_URL.to_string(),
        }
    }
}

/// Library configuration (no CLI dependencies).
///
/// This is the core configuration struct used by the library. It can be
/// constructed programmatically without any CLI dependencies.
///
/// # Examples
///
/// ```no_run
/// use ipscope::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     state_dir: PathBuf::from("/tmp/ipscope"),
///     timeout_seconds: 5,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Directory holding the durable store
    pub state_dir: PathBuf,

    /// Directory holding icon assets (`icon.png`, `flags-png/`, `flags/`)
    pub asset_dir: PathBuf,

    /// Optional colo directory (`cloudflare.json` format)
    pub colo_directory: Option<PathBuf>,

    /// Client-wide request timeout in seconds
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    pub user_agent: String,

    /// Base URL of the IP-intelligence API
    pub detail_api_base: String,

    /// Plaintext egress-IP endpoints
    pub endpoints: EgressEndpoints,

    /// Local endpoint port (optional, disabled by default)
    pub status_port: Option<u16>,
}

impl Config {
    /// Path of the JSON file backing the durable store.
    pub fn sync_store_path(&self) -> PathBuf {
        self.state_dir.join(SYNC_STORE_FILE)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
            asset_dir: PathBuf::from(DEFAULT_ASSET_DIR),
            colo_directory: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            detail_api_base: DETAIL_API_BASE.to_string(),
            endpoints: EgressEndpoints::default(),
            status_port: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_level_is_quieter_than_library_default() {
        let cli_default: log::LevelFilter = LogLevel::Warn.into();
        let lib_default: log::LevelFilter = Config::default().log_level.into();
        assert!(cli_default < lib_default);
        assert_eq!(log::LevelFilter::from(LogLevel::Trace), log::LevelFilter::max());
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.timeout_seconds, 10);
        assert_eq!(config.state_dir, PathBuf::from(".ipscope"));
        assert_eq!(config.detail_api_base, "https://ipinfo.io");
        assert!(config.colo_directory.is_none());
        assert!(config.status_port.is_none());
        assert_eq!(
            crate::config::EGRESS_TIMEOUT,
            std::time::Duration::from_secs(5)
        );
        assert_eq!(
            config.sync_store_path(),
            PathBuf::from(".ipscope").join("sync.json")
        );
    }

    #[test]
    fn test_endpoints_map_to_slots() {
        let endpoints = EgressEndpoints::default();
        assert_eq!(endpoints.url(EgressSlot::DomesticV4), "https://4.ipw.cn");
        assert_eq!(endpoints.url(EgressSlot::DomesticV6), "https://6.ipw.cn");
        assert_eq!(endpoints.url(EgressSlot::GlobalV4), "https://ipv4.agi.li");
        assert_eq!(endpoints.url(EgressSlot::GlobalV6), "https://ipv6.agi.li");
    }
}
