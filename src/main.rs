//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `ipscope` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use ipscope::initialization::init_logger_with;
use ipscope::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists), so IPINFO_TOKEN can
    // live there. Falls back to a .env next to the executable.
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let cli = Cli::parse();
    let config = cli.to_config();

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    if let Err(e) = ipscope::app::run(&cli.command, config).await {
        eprintln!("ipscope error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}
