use chrono::NaiveDateTime;

use crate::classify::{classify, StatusLabel, UNKNOWN_ERROR};
use crate::config::{UpPolicy, TIMESTAMP_FORMAT};
use crate::probe::ProbeOutcome;

/// One row of a batch: the classified result for a single input URL.
///
/// Built once from a probe outcome (or synthesized for a faulted probe) and not
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    /// Shared by every result of the batch
    pub batch_timestamp: NaiveDateTime,
    pub url: String,
    pub status: StatusLabel,
    /// 0 if no response
    pub http_status_code: u16,
    pub elapsed_millis: u64,
    /// Empty when UP
    pub error_description: String,
}

impl CheckResult {
    /// Classifies a finished probe.
    pub fn from_outcome(
        batch_timestamp: NaiveDateTime,
        outcome: ProbeOutcome,
        policy: &UpPolicy,
    ) -> Self {
        let classification = classify(outcome.http_status_code, &outcome.transport_error, policy);
        Self {
            batch_timestamp,
            url: outcome.url,
            status: classification.label,
            http_status_code: outcome.http_status_code,
            elapsed_millis: outcome.elapsed_millis,
            error_description: classification.error_description,
        }
    }

    /// A DOWN row for a probe that never produced an outcome. An empty
    /// `reason` becomes `Unknown error`.
    pub fn synthesized_down(
        batch_timestamp: NaiveDateTime,
        url: &str,
        elapsed_millis: u64,
        reason: &str,
    ) -> Self {
        let error_description = if reason.is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            reason.to_string()
        };
        Self {
            batch_timestamp,
            url: url.to_string(),
            status: StatusLabel::Down,
            http_status_code: 0,
            elapsed_millis,
            error_description,
        }
    }

    pub fn is_up(&self) -> bool {
        self.status == StatusLabel::Up
    }

    /// `"1"` for UP, `"0"` for DOWN, as written to the `ok` column.
    pub fn ok_flag(&self) -> &'static str {
        if self.is_up() {
            "1"
        } else {
            "0"
        }
    }

    pub fn formatted_timestamp(&self) -> String {
        format_timestamp(&self.batch_timestamp)
    }
}

/// Formats a batch timestamp as `YYYY-MM-DD HH:MM:SS`.
pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}
