//! Logger initialization.

use std::io::Write;

use colored::*;
use log::{Level, LevelFilter};

use crate::config::LogFormat;
use crate::error_handling::InitializationError;

// HTTP stack crates are chatty at debug level.
const CAPPED_MODULES: &[&str] = &["reqwest", "hyper", "hyper_util", "h2"];

/// Initializes the logger with the specified level and format.
///
/// `RUST_LOG` is read first; `level` then applies globally and to this crate.
/// The HTTP stack is capped at info. `plain` writes coloured lines with a local
/// time of day, `json` writes one object per line (`ts`, `level`, `target`, `msg`).
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already installed.
///
/// # Examples
///
/// ```bash
/// RUST_LOG=ipscope=debug ipscope --log-format json network
/// ```
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    let mut builder = env_logger::Builder::from_default_env();

    builder.filter_level(level);
    for module in CAPPED_MODULES {
        builder.filter_module(module, LevelFilter::Info.min(level));
    }
    builder.filter_module("ipscope", level);

    match format {
        LogFormat::Json => builder.format(|buf, record| {
            let line = json_line(
                chrono::Utc::now().timestamp_millis(),
                record.level(),
                record.target(),
                &record.args().to_string(),
            );
            writeln!(buf, "{}", line)
        }),
        LogFormat::Plain => builder.format(|buf, record| {
            writeln!(
                buf,
                "{} {} {} {}",
                chrono::Local::now().format("%H:%M:%S").to_string().dimmed(),
                level_label(record.level()),
                record.target().cyan(),
                record.args()
            )
        }),
    };

    builder.try_init()?;
    Ok(())
}

fn level_label(level: Level) -> ColoredString {
    let label = format!("{:<5}", level);
    match level {
        Level::Error => label.red().bold(),
        Level::Warn => label.yellow(),
        Level::Info => label.green(),
        Level::Debug => label.blue(),
        Level::Trace => label.purple(),
    }
}

fn json_line(ts_millis: i64, level: Level, target: &str, msg: &str) -> String {
    serde_json::json!({
        "ts": ts_millis,
        "level": level.as_str(),
        "target": target,
        "msg": msg,
    })
    .to_string()
}
