//! Configuration constants.
//!
//! This module defines the endpoints, timeouts, storage keys, and asset names used
//! throughout the application.

use std::time::Duration;

// Network operation timeouts
/// Timeout for each plaintext egress-IP request.
///
/// The global endpoints are unreachable from some networks without a proxy, so the
/// request is abandoned quickly instead of waiting for the client-wide timeout.
pub const EGRESS_TIMEOUT: Duration = Duration::from_secs(5);
/// Timeout for the Cloudflare trace probe on a site's own IP
pub const COLO_PROBE_TIMEOUT: Duration = Duration::from_secs(3);
/// Client-wide request timeout in seconds (applies to detail lookups and navigation)
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

// Remote endpoints
/// Domestic IPv4 egress endpoint (plaintext body)
pub const DOMESTIC_IPV4_URL: &str = "https://4.ipw.cn";
/// Domestic IPv6 egress endpoint (plaintext body)
pub const DOMESTIC_IPV6_URL: &str = "https://6.ipw.cn";
/// Global IPv4 egress endpoint (plaintext body)
pub const GLOBAL_IPV4_URL: &str = "https://ipv4.agi.li";
/// Global IPv6 egress endpoint (plaintext body)
pub const GLOBAL_IPV6_URL: &str = "https://ipv6.agi.li";
/// Base URL of the IP-intelligence API. Requests go to `<base>/<ip>?token=<token>`.
pub const DETAIL_API_BASE: &str = "https://ipinfo.io";
/// Path of the Cloudflare trace endpoint that discloses the serving colo
pub const TRACE_PATH: &str = "/cdn-cgi/trace";

// Storage keys
/// Durable key holding the API token
pub const TOKEN_KEY: &str = "ipinfo_token";
/// Session key for the domestic IPv4 record
pub const DOM_IPV4_KEY: &str = "dom_ipv4_data";
/// Session key for the domestic IPv6 record
pub const DOM_IPV6_KEY: &str = "dom_ipv6_data";
/// Session key for the global IPv4 record
pub const GLOB_IPV4_KEY: &str = "glob_ipv4_data";
/// Session key for the global IPv6 record
pub const GLOB_IPV6_KEY: &str = "glob_ipv6_data";
/// Session key for the tab -> IP map
pub const TAB_IPS_KEY: &str = "tab_ips";
/// Prefix of session keys holding cached detail records (`ip_cache_<ip>`)
pub const DETAIL_CACHE_PREFIX: &str = "ip_cache_";

// Local state
/// Default directory for durable state
pub const DEFAULT_STATE_DIR: &str = ".ipscope";
/// File (inside the state directory) backing the durable store
pub const SYNC_STORE_FILE: &str = "sync.json";
/// Default directory holding icon assets
pub const DEFAULT_ASSET_DIR: &str = "assets";
/// Environment variable that seeds the token when none is stored
pub const TOKEN_ENV_VAR: &str = "IPINFO_TOKEN";
/// Port of the local endpoint in `serve` mode
pub const DEFAULT_STATUS_PORT: u16 = 8787;

// Icon assets
/// Generic toolbar icon shown when no IP is known for a tab
pub const DEFAULT_ICON: &str = "icon.png";
/// Directory (inside the asset directory) of toolbar flag PNGs
pub const FLAGS_PNG_DIR: &str = "flags-png";
/// Directory (inside the asset directory) of card flag SVGs
pub const FLAGS_SVG_DIR: &str = "flags";
/// Icon code used when nothing better is known
pub const UNKNOWN_FLAG: &str = "unknown";
/// Text drawn on the generated badge when an icon asset is missing
pub const FALLBACK_BADGE_TEXT: &str = "IP";
/// Background colour of the generated badge
pub const FALLBACK_BADGE_COLOR: &str = "#4a5568";
/// Edge length in pixels of the generated badge
pub const FALLBACK_BADGE_SIZE: u32 = 32;

// Background dispatcher
/// Capacity of the background event channel
pub const EVENT_CHANNEL_CAPACITY: usize = 64;
/// Tab identifier the host uses for requests that belong to no tab
pub const NO_TAB_ID: i64 = -1;

/// Default User-Agent string for HTTP requests.
pub const DEFAULT_USER_AGENT: &str = concat!("ipscope/", env!("CARGO_PKG_VERSION"));
