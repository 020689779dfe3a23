//! Configuration constants.
//!
//! This module defines the defaults used throughout the application, taken from
//! the deployment the monitor was first written for.

use std::time::Duration;

/// Default number of probes allowed in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Total per-request timeout (connect + TLS + headers + body).
pub const DEFAULT_TOTAL_TIMEOUT: Duration = Duration::from_secs(20);

/// TCP connect timeout. Lower than the total timeout so dead hosts fail fast.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Longest connect or total timeout accepted by `Config::validate`.
pub const MAX_REQUEST_TIMEOUT: Duration = Duration::from_secs(3600);

/// Maximum number of redirect hops followed when redirects are enabled.
pub const MAX_REDIRECT_HOPS: usize = 5;

/// Extra time granted to a probe task on top of its request timeouts before the
/// batch gives up on it and synthesizes a DOWN result.
pub const PROBE_ENVELOPE_SLACK: Duration = Duration::from_secs(5);

/// Inclusive lower bound of the status codes counted as UP.
pub const DEFAULT_UP_RANGE_MIN: u16 = 200;
/// Inclusive upper bound of the status codes counted as UP.
pub const DEFAULT_UP_RANGE_MAX: u16 = 399;

/// `418 I'm a Teapot`. Some bot filters answer with it; operators may choose to
/// count it as reachable.
pub const HTTP_STATUS_TEAPOT: u16 = 418;

/// Default User-Agent string for probe requests.
pub const DEFAULT_USER_AGENT: &str = concat!("UptimeMonitor/", env!("CARGO_PKG_VERSION"));

/// Default URL list path.
pub const DEFAULT_URLS_FILE: &str = "urls.txt";
/// Default CSV log path.
pub const DEFAULT_LOG_FILE: &str = "results.csv";

/// Timestamp format used for batch timestamps in the CSV log, console and emails.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// Email
pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_SMTP_FROM_NAME: &str = "Website Monitor Alerts";
pub const DEFAULT_ALERT_SUBJECT: &str = "Client Website DOWN Alert";
pub const DEFAULT_DIGEST_SUBJECT: &str = "Daily Uptime Report";
/// SMTP command timeout so a stuck relay cannot hold up the run.
pub const SMTP_TIMEOUT: Duration = Duration::from_secs(30);
