//! Probe attempt and outcome types.

use std::time::Duration;

use crate::error_handling::{categorize_reqwest_error, describe_transport_error, ErrorType};

/// HTTP method used for an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeMethod {
    Head,
    Get,
}

impl ProbeMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeMethod::Head => "HEAD",
            ProbeMethod::Get => "GET",
        }
    }
}

impl std::fmt::Display for ProbeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What one HTTP attempt observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    /// 0 when the transport failed before a status line arrived
    pub status_code: u16,
    pub elapsed: Duration,
    /// Empty on success
    pub transport_error: String,
    /// Category of the transport failure, if any
    pub error_type: Option<ErrorType>,
}

impl Attempt {
    /// A complete response.
    pub fn response(status_code: u16, elapsed: Duration) -> Self {
        Self {
            status_code,
            elapsed,
            transport_error: String::new(),
            error_type: None,
        }
    }

    /// A transport failure. `status_code` is kept when the status line had
    /// already arrived (e.g. the body download timed out).
    pub fn failed(status_code: u16, elapsed: Duration, error: &reqwest::Error) -> Self {
        Self {
            status_code,
            elapsed,
            transport_error: describe_transport_error(error),
            error_type: Some(categorize_reqwest_error(error)),
        }
    }

    /// True when HEAD looks rejected (403/405) or silently dropped
    /// (no status, no error) and the URL deserves one GET.
    pub fn looks_like_head_rejection(&self) -> bool {
        matches!(self.status_code, 403 | 405)
            || (self.status_code == 0 && self.transport_error.is_empty())
    }
}

/// Final result of probing one URL. Only the last attempt is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub url: String,
    /// 0 if no response
    pub http_status_code: u16,
    /// Round-trip time of the kept attempt, rounded to the nearest millisecond
    pub elapsed_millis: u64,
    /// Empty if none
    pub transport_error: String,
    pub error_type: Option<ErrorType>,
    pub method_used: ProbeMethod,
    /// The HEAD attempt was replaced by a GET
    pub retried: bool,
}

impl ProbeOutcome {
    pub(crate) fn from_attempt(
        url: &str,
        method_used: ProbeMethod,
        attempt: Attempt,
        retried: bool,
    ) -> Self {
        Self {
            url: url.to_string(),
            http_status_code: attempt.status_code,
            elapsed_millis: round_millis(attempt.elapsed),
            transport_error: attempt.transport_error,
            error_type: attempt.error_type,
            method_used,
            retried,
        }
    }
}

/// Rounds a duration to the nearest whole millisecond.
pub fn round_millis(elapsed: Duration) -> u64 {
    (elapsed.as_secs_f64() * 1000.0).round() as u64
}
