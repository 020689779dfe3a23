//! Logger initialization.
//!
//! Diagnostics go to stderr through `env_logger`; stdout is reserved for the
//! check report so it can be piped or mailed by cron.

use std::io::Write;

use crate::config::LogFormat;
use crate::error_handling::InitializationError;
use colored::*;
use log::{Level, LevelFilter, Record};

/// Initializes the logger with the specified level and format.
///
/// The logger reads `RUST_LOG` first and the provided `level` then overrides
/// the global filter, so `--log-level` always wins while `RUST_LOG` can still
/// tune individual modules.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already installed.
///
/// # Examples
///
/// ```bash
/// # Use RUST_LOG for quick debugging (no CLI args needed)
/// RUST_LOG=debug uptime_monitor check --urls urls.txt
///
/// # Per-module filtering via RUST_LOG
/// RUST_LOG=uptime_monitor=debug,reqwest=info uptime_monitor check --urls urls.txt
/// ```
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    let mut builder = env_logger::Builder::from_default_env();

    builder.filter_level(level);
    builder.filter_module("reqwest", LevelFilter::Info);
    builder.filter_module("hyper", LevelFilter::Info);
    builder.filter_module("hyper_util", LevelFilter::Info);
    builder.filter_module("rustls", LevelFilter::Warn);
    builder.filter_module("lettre", LevelFilter::Warn);
    builder.filter_module("uptime_monitor", level);

    match format {
        LogFormat::Json => {
            builder.format(|buf, record| writeln!(buf, "{}", json_line(record)));
        }
        LogFormat::Plain => {
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{} {} [{}] {}",
                    chrono::Local::now().format("%H:%M:%S%.3f"),
                    record.target().cyan(),
                    colored_level(record.level()),
                    record.args()
                )
            });
        }
    }

    // try_init so a second initialization (tests, embedding) returns an error
    // instead of panicking.
    builder.try_init().map_err(InitializationError::from)?;

    Ok(())
}

fn colored_level(level: Level) -> ColoredString {
    let text = level.to_string();
    match level {
        Level::Error => text.red(),
        Level::Warn => text.yellow(),
        Level::Info => text.green(),
        Level::Debug => text.blue(),
        Level::Trace => text.purple(),
    }
}

/// One JSON object per record: `{"ts":<millis>,"level":..,"target":..,"msg":..}`.
fn json_line(record: &Record) -> String {
    format!(
        "{{\"ts\":{},\"level\":\"{}\",\"target\":{},\"msg\":{}}}",
        chrono::Utc::now().timestamp_millis(),
        record.level(),
        serde_json::to_string(record.target()).unwrap_or_else(|_| "\"\"".into()),
        serde_json::to_string(&record.args().to_string()).unwrap_or_else(|_| "\"\"".into())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_line_escapes_message() {
        let line = json_line(
            &Record::builder()
                .level(Level::Warn)
                .target("uptime_monitor::batch")
                .args(format_args!("probe for \"https://example.com\" faulted"))
                .build(),
        );

        let parsed: serde_json::Value = serde_json::from_str(&line).expect("valid JSON");
        assert_eq!(parsed["level"], "WARN");
        assert_eq!(parsed["target"], "uptime_monitor::batch");
        assert_eq!(parsed["msg"], "probe for \"https://example.com\" faulted");
        assert!(parsed["ts"].as_i64().is_some());
    }

    #[test]
    fn test_second_initialization_fails_gracefully() {
        // Whichever call runs first may install the logger; the second must
        // report an error rather than panic.
        let _ = init_logger_with(LevelFilter::Info, LogFormat::Plain);
        let result = init_logger_with(LevelFilter::Debug, LogFormat::Json);
        assert!(matches!(result, Err(InitializationError::LoggerError(_))));
    }
}
