//! Command-line interface definition.
//!
//! The binary parses [`Cli`] and converts it into the library [`Config`] with
//! [`Cli::to_config`].

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::constants::{
    DEFAULT_ASSET_DIR, DEFAULT_STATE_DIR, DEFAULT_STATUS_PORT, DEFAULT_TIMEOUT_SECS,
    DEFAULT_USER_AGENT,
};
use crate::config::types::{Config, LogFormat, LogLevel};

/// Command-line arguments.
///
/// # Examples
///
/// ```bash
/// # Show domestic and global egress IPs
/// ipscope network
///
/// # Visit two sites, one tab each, and show where they are served from
/// ipscope site https://example.com https://cloudflare.com
///
/// # Store the ipinfo.io token
/// ipscope token set 0123456789abcd
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "ipscope",
    version,
    about = "Shows your egress IPs and where the sites you visit are served from."
)]
pub struct Cli {
    /// Options shared by every command
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Warn, global = true)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain, global = true)]
    pub log_format: LogFormat,

    /// Directory holding durable state (the token)
    #[arg(long, default_value = DEFAULT_STATE_DIR, global = true)]
    pub state_dir: PathBuf,

    /// Directory holding icon assets
    #[arg(long, default_value = DEFAULT_ASSET_DIR, global = true)]
    pub asset_dir: PathBuf,

    /// Colo directory JSON (code -> { name, cca2 })
    #[arg(long, global = true)]
    pub colo_directory: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT, global = true)]
    pub user_agent: String,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve the domestic and global egress IPs and print them
    Network,

    /// Visit one or more URLs (one tab each) and print the popup for each
    Site {
        /// URLs to visit
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Look up a single IP and print its card and icon code
    Lookup {
        /// IP address to look up
        ip: String,
    },

    /// Manage the ipinfo.io token
    Token {
        /// Token action
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Run the background service with a local endpoint
    Serve {
        /// Port for the local endpoint
        #[arg(long, default_value_t = DEFAULT_STATUS_PORT)]
        port: u16,
    },
}

/// Token sub-commands.
#[derive(Debug, Subcommand)]
pub enum TokenAction {
    /// Store a token (surrounding whitespace is trimmed)
    Set {
        /// The token value
        token: String,
    },
    /// Print whether a token is stored
    Show,
    /// Remove the stored token
    Clear,
}

impl Cli {
    /// Builds the library configuration from the parsed arguments.
    pub fn to_config(&self) -> Config {
        let global = &self.global;
        Config {
            log_level: global.log_level.clone(),
            log_format: global.log_format.clone(),
            state_dir: global.state_dir.clone(),
            asset_dir: global.asset_dir.clone(),
            colo_directory: global.colo_directory.clone(),
            timeout_seconds: global.timeout_seconds,
            user_agent: global.user_agent.clone(),
            status_port: match self.command {
                Command::Serve { port } => Some(port),
                _ => None,
            },
            ..Default::default()
        }
    }
}
