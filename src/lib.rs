//! ipscope library: egress and site IP intelligence
//!
//! This library resolves the machine's domestic and global egress addresses,
//! tracks which IP each browser tab's page was served from, looks those addresses
//! up in the ipinfo.io API with a session cache, and classifies anycast operators
//! to pick the icon shown for a tab.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use ipscope::background::{Background, Event, Request};
//! use ipscope::initialization::{init_client, init_stores};
//! use ipscope::Config;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let stores = init_stores(&config)?;
//! let client = init_client(&config)?;
//! let background = Background::new(&config, stores, client);
//!
//! background.handle_event(&Event::Startup).await;
//! let data = background.handle_request(&Request::GetData { active_tab: None });
//! println!("{}", serde_json::to_string_pretty(&data)?);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

pub mod anycast;
pub mod app;
pub mod background;
pub mod colo;
pub mod config;
pub mod egress;
pub mod error_handling;
pub mod icon;
pub mod initialization;
pub mod lookup;
pub mod popup;
pub mod status_server;
pub mod store;
pub mod tabs;

// Re-export public API
pub use background::{Background, DataResponse, Event, Request, Response};
pub use config::{Cli, Config, LogFormat, LogLevel};
pub use lookup::{IpDetails, IpRecord};
