//! Configuration types.
//!
//! This module defines the library configuration structs and the enums shared
//! with the command-line interface. Everything here can be constructed
//! programmatically; the CLI in `src/cli.rs` only fills these in.

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;

use crate::config::constants::*;
use crate::error_handling::ConfigError;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// How the batch runner bounds the number of probes in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Schedule {
    /// Split the list into consecutive groups of `concurrency_limit` URLs and
    /// run the groups one after another.
    Chunked,
    /// One semaphore of `concurrency_limit` permits over the whole list. A slow
    /// URL only holds its own permit instead of stalling the rest of its group.
    Pooled,
}

/// Transport security used for the SMTP connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SmtpSecurity {
    /// Plain connection upgraded with STARTTLS (port 587 / 2525)
    Starttls,
    /// Implicit TLS from the first byte (port 465)
    Tls,
    /// No encryption. Only for local relays and test servers.
    None,
}

/// Per-request settings shared by every probe in a batch.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// Timeout for the whole request, body included
    pub total_timeout: Duration,
    /// Follow 3xx responses (up to `MAX_REDIRECT_HOPS`)
    pub follow_redirects: bool,
    /// Verify TLS certificates and host names
    pub verify_tls: bool,
    /// User-Agent header value
    pub user_agent: String,
    /// Try HEAD first and fall back to GET once when HEAD is rejected
    pub head_first: bool,
}

impl ProbeConfig {
    /// Upper bound on how long one probe task may take: two attempts (HEAD and
    /// the GET retry) plus slack. Saturates at `Duration::MAX`.
    pub fn envelope(&self) -> Duration {
        let attempts = if self.head_first { 2 } else { 1 };
        self.total_timeout
            .checked_mul(attempts)
            .unwrap_or(Duration::MAX)
            .saturating_add(PROBE_ENVELOPE_SLACK)
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            total_timeout: DEFAULT_TOTAL_TIMEOUT,
            follow_redirects: true,
            verify_tls: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            head_first: false,
        }
    }
}

/// Which status codes count as UP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpPolicy {
    /// Inclusive lower bound
    pub min: u16,
    /// Inclusive upper bound
    pub max: u16,
    /// Count `418 I'm a Teapot` as UP regardless of the range
    pub teapot_is_up: bool,
}

impl Default for UpPolicy {
    fn default() -> Self {
        Self {
            min: DEFAULT_UP_RANGE_MIN,
            max: DEFAULT_UP_RANGE_MAX,
            teapot_is_up: true,
        }
    }
}

/// SMTP relay settings.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub security: SmtpSecurity,
    /// Username; authentication is skipped when empty
    pub username: String,
    pub password: String,
    /// Envelope and header sender address
    pub from_address: String,
    pub from_name: String,
}

/// Alert email settings for DOWN results.
#[derive(Debug, Clone)]
pub struct AlertConfig {
    /// Recipient; alerts are skipped when `None`
    pub to: Option<String>,
    pub subject: String,
    /// Master switch, independent of recipient/SMTP configuration
    pub enabled: bool,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            to: None,
            subject: DEFAULT_ALERT_SUBJECT.to_string(),
            enabled: true,
        }
    }
}

/// Configuration for one check run.
///
/// # Examples
///
/// ```no_run
/// use uptime_monitor::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     urls_file: PathBuf::from("sites.txt"),
///     concurrency_limit: 20,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Newline-delimited URL list
    pub urls_file: PathBuf,

    /// Append-only CSV log
    pub log_file: PathBuf,

    /// Maximum number of probes in flight
    pub concurrency_limit: usize,

    /// Group-sequential or pooled scheduling
    pub schedule: Schedule,

    /// Request settings
    pub probe: ProbeConfig,

    /// UP/DOWN classification policy
    pub policy: UpPolicy,

    /// SMTP relay; alerts are skipped when `None`
    pub smtp: Option<SmtpConfig>,

    /// Alert settings
    pub alert: AlertConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            urls_file: PathBuf::from(DEFAULT_URLS_FILE),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            concurrency_limit: DEFAULT_CONCURRENCY,
            schedule: Schedule::Chunked,
            probe: ProbeConfig::default(),
            policy: UpPolicy::default(),
            smtp: None,
            alert: AlertConfig::default(),
        }
    }
}

impl Config {
    /// Rejects settings that would make a run meaningless. Called before any
    /// file is read or request sent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency_limit == 0 {
            return Err(ConfigError::InvalidConcurrency(self.concurrency_limit));
        }
        if self.policy.min > self.policy.max {
            return Err(ConfigError::InvalidUpRange {
                min: self.policy.min,
                max: self.policy.max,
            });
        }
        let timeouts = [self.probe.total_timeout, self.probe.connect_timeout];
        if timeouts
            .iter()
            .any(|t| t.is_zero() || *t > MAX_REQUEST_TIMEOUT)
        {
            return Err(ConfigError::InvalidTimeout);
        }
        Ok(())
    }
}

/// Configuration for the digest email.
#[derive(Debug, Clone)]
pub struct DigestConfig {
    /// CSV log whose content is mailed
    pub log_file: PathBuf,
    pub to: String,
    pub subject: String,
    /// Also attach the CSV file
    pub attach: bool,
    pub smtp: SmtpConfig,
}
