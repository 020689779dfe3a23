//! Console summary of a batch.

use std::io::{self, Write};
use std::path::Path;

use chrono::NaiveDateTime;

use crate::models::{format_timestamp, CheckResult};

/// Writes the per-URL lines and the totals for one batch.
///
/// ```text
/// === Website Check @ 2025-01-01 09:00:00 ===
/// [2025-01-01 09:00:00] UP    https://example.com code=200 time=132ms
/// [2025-01-01 09:00:00] DOWN  https://example.org code=404 time=88ms (err: HTTP 404 (Not Found))
/// --------------------------------------
/// Total: 2 | Up: 1 | Down: 1
/// Log: results.csv
/// ```
pub fn write_console_report<W: Write>(
    out: &mut W,
    batch_timestamp: &NaiveDateTime,
    results: &[CheckResult],
    log_file: &Path,
) -> io::Result<()> {
    writeln!(out, "=== Website Check @ {} ===", format_timestamp(batch_timestamp))?;
    for result in results {
        writeln!(out, "{}", result_line(result))?;
    }
    let up = results.iter().filter(|r| r.is_up()).count();
    writeln!(out, "--------------------------------------")?;
    writeln!(
        out,
        "Total: {} | Up: {} | Down: {}",
        results.len(),
        up,
        results.len() - up
    )?;
    writeln!(out, "Log: {}", log_file.display())?;
    Ok(())
}

/// `[ts] STATUS url code=N time=Nms` plus ` (err: ...)` when there is a reason.
pub fn result_line(result: &CheckResult) -> String {
    let mut line = format!(
        "[{}] {:<5} {} code={} time={}ms",
        result.formatted_timestamp(),
        result.status,
        result.url,
        result.http_status_code,
        result.elapsed_millis
    );
    if !result.error_description.is_empty() {
        line.push_str(&format!(" (err: {})", result.error_description));
    }
    line
}
