//! Append-only CSV result log.
//!
//! Layout:
//!
//! ```text
//! timestamp,status,url,status_code,ok,total_time_ms,error
//! 2025-01-01 09:00:00,UP,https://example.com,200,1,132,
//! 2025-01-01 09:00:00,DOWN,https://example.org,404,0,88,HTTP 404 (Not Found)
//!
//! 2025-01-01 10:00:00,UP,https://example.com,200,1,120,
//! ```
//!
//! The header is written when the file is created (or found empty); every
//! later batch is preceded by exactly one blank line.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use csv::{Terminator, WriterBuilder};
use log::debug;

use crate::models::CheckResult;

/// Column names of the log.
pub const CSV_HEADER: [&str; 7] = [
    "timestamp",
    "status",
    "url",
    "status_code",
    "ok",
    "total_time_ms",
    "error",
];

/// Appends one batch of results to the log at `path`, creating it if needed.
/// An empty batch leaves the file untouched.
pub fn append_batch(path: &Path, results: &[CheckResult]) -> Result<()> {
    if results.is_empty() {
        return Ok(());
    }

    let has_content = std::fs::metadata(path)
        .map(|meta| meta.len() > 0)
        .unwrap_or(false);

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open CSV log {}", path.display()))?;

    if has_content {
        file.write_all(b"\n")
            .with_context(|| format!("Failed to write to CSV log {}", path.display()))?;
    }

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(file);

    if !has_content {
        writer
            .write_record(CSV_HEADER)
            .context("Failed to write CSV header")?;
    }

    for result in results {
        writer
            .write_record(csv_row(result))
            .with_context(|| format!("Failed to write CSV row for {}", result.url))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush CSV log {}", path.display()))?;

    debug!("Appended {} rows to {}", results.len(), path.display());
    Ok(())
}

fn csv_row(result: &CheckResult) -> [String; 7] {
    [
        result.formatted_timestamp(),
        result.status.to_string(),
        result.url.clone(),
        result.http_status_code.to_string(),
        result.ok_flag().to_string(),
        result.elapsed_millis.to_string(),
        result.error_description.clone(),
    ]
}
