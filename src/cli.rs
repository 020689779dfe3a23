//! Command-line interface.
//!
//! Every option can also be set through an environment variable (or a `.env`
//! file loaded by the binary). The parsed arguments are converted into the
//! library's `Config` / `DigestConfig`; nothing here is needed to use the
//! library programmatically.

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::config::{
    AlertConfig, Config, DigestConfig, LogFormat, LogLevel, ProbeConfig, Schedule, SmtpConfig,
    SmtpSecurity, UpPolicy, DEFAULT_ALERT_SUBJECT, DEFAULT_CONCURRENCY, DEFAULT_DIGEST_SUBJECT,
    DEFAULT_LOG_FILE, DEFAULT_SMTP_FROM_NAME, DEFAULT_SMTP_PORT, DEFAULT_UP_RANGE_MAX,
    DEFAULT_UP_RANGE_MIN, DEFAULT_URLS_FILE, DEFAULT_USER_AGENT,
};
use crate::error_handling::DeliveryError;

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # Check every URL in urls.txt and alert on DOWN results
/// uptime_monitor check --alert-to ops@example.com
///
/// # Mail the accumulated log with the CSV attached
/// uptime_monitor digest --to boss@example.com --attach
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "uptime_monitor",
    version,
    about = "Checks a list of websites, logs UP/DOWN results to CSV and emails alerts."
)]
pub struct Cli {
    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, global = true, env = "MONITOR_LOG_LEVEL", default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, global = true, env = "MONITOR_LOG_FORMAT", default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Probe every URL once, append the batch to the CSV log and alert on DOWN results
    Check(CheckArgs),
    /// Email the CSV log as a daily report
    Digest(DigestArgs),
}

/// SMTP relay options shared by both commands.
#[derive(Debug, Clone, Args)]
pub struct SmtpArgs {
    /// SMTP relay host; email is disabled when unset
    #[arg(long, env = "SMTP_HOST")]
    pub smtp_host: Option<String>,

    #[arg(long, env = "SMTP_PORT", default_value_t = DEFAULT_SMTP_PORT)]
    pub smtp_port: u16,

    /// Connection security: starttls|tls|none
    #[arg(long, value_enum, env = "SMTP_SECURITY", default_value_t = SmtpSecurity::Starttls)]
    pub smtp_security: SmtpSecurity,

    #[arg(long, env = "SMTP_USER", default_value = "")]
    pub smtp_user: String,

    #[arg(long, env = "SMTP_PASS", default_value = "", hide_env_values = true)]
    pub smtp_pass: String,

    /// Sender address (defaults to the SMTP user)
    #[arg(long, env = "SMTP_FROM")]
    pub smtp_from: Option<String>,

    #[arg(long, env = "SMTP_FROM_NAME", default_value = DEFAULT_SMTP_FROM_NAME)]
    pub smtp_from_name: String,
}

impl SmtpArgs {
    /// Relay settings, or `None` when no host is configured.
    pub fn to_smtp_config(&self) -> Option<SmtpConfig> {
        let host = self.smtp_host.as_deref().map(str::trim).unwrap_or_default();
        if host.is_empty() {
            return None;
        }
        Some(SmtpConfig {
            host: host.to_string(),
            port: self.smtp_port,
            security: self.smtp_security,
            username: self.smtp_user.clone(),
            password: self.smtp_pass.clone(),
            from_address: self
                .smtp_from
                .clone()
                .unwrap_or_else(|| self.smtp_user.clone()),
            from_name: self.smtp_from_name.clone(),
        })
    }
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Newline-delimited URL list
    #[arg(long, env = "URLS_FILE", default_value = DEFAULT_URLS_FILE)]
    pub urls: PathBuf,

    /// CSV log the batch is appended to
    #[arg(long, env = "LOG_FILE", default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// Maximum concurrent probes
    #[arg(long, env = "CONCURRENCY", default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// chunked: groups of `concurrency` URLs one after another; pooled: one shared pool
    #[arg(long, value_enum, env = "SCHEDULE", default_value_t = Schedule::Chunked)]
    pub schedule: Schedule,

    /// Per-request timeout in seconds, body included
    #[arg(long, env = "TIMEOUT_SECONDS", default_value_t = 20)]
    pub timeout_seconds: u64,

    /// TCP connect timeout in seconds
    #[arg(long, env = "CONNECT_TIMEOUT_SECONDS", default_value_t = 5)]
    pub connect_timeout_seconds: u64,

    #[arg(long, env = "FOLLOW_REDIRECTS", action = ArgAction::Set, default_value_t = true)]
    pub follow_redirects: bool,

    #[arg(long, env = "VERIFY_TLS", action = ArgAction::Set, default_value_t = true)]
    pub verify_tls: bool,

    #[arg(long, env = "USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Send HEAD first and retry once with GET when HEAD is rejected
    #[arg(long, env = "HEAD_FIRST")]
    pub head_first: bool,

    /// Lowest status code counted as UP
    #[arg(long, env = "UP_RANGE_MIN", default_value_t = DEFAULT_UP_RANGE_MIN)]
    pub up_range_min: u16,

    /// Highest status code counted as UP
    #[arg(long, env = "UP_RANGE_MAX", default_value_t = DEFAULT_UP_RANGE_MAX)]
    pub up_range_max: u16,

    /// Count 418 as UP whatever the range
    #[arg(long, env = "TEAPOT_IS_UP", action = ArgAction::Set, default_value_t = true)]
    pub teapot_is_up: bool,

    /// Alert recipient; no alerts are sent when unset
    #[arg(long, env = "ALERT_TO")]
    pub alert_to: Option<String>,

    #[arg(long, env = "ALERT_SUBJECT", default_value = DEFAULT_ALERT_SUBJECT)]
    pub alert_subject: String,

    /// Never send alert emails
    #[arg(long, env = "NO_ALERTS")]
    pub no_alerts: bool,

    #[command(flatten)]
    pub smtp: SmtpArgs,
}

impl From<CheckArgs> for Config {
    fn from(args: CheckArgs) -> Self {
        let smtp = args.smtp.to_smtp_config();
        Config {
            urls_file: args.urls,
            log_file: args.log_file,
            concurrency_limit: args.concurrency,
            schedule: args.schedule,
            probe: ProbeConfig {
                connect_timeout: Duration::from_secs(args.connect_timeout_seconds),
                total_timeout: Duration::from_secs(args.timeout_seconds),
                follow_redirects: args.follow_redirects,
                verify_tls: args.verify_tls,
                user_agent: args.user_agent,
                head_first: args.head_first,
            },
            policy: UpPolicy {
                min: args.up_range_min,
                max: args.up_range_max,
                teapot_is_up: args.teapot_is_up,
            },
            smtp,
            alert: AlertConfig {
                to: args.alert_to.filter(|to| !to.trim().is_empty()),
                subject: args.alert_subject,
                enabled: !args.no_alerts,
            },
        }
    }
}

#[derive(Debug, Args)]
pub struct DigestArgs {
    /// CSV log to send
    #[arg(long, env = "LOG_FILE", default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// Report recipient
    #[arg(long, env = "REPORT_TO")]
    pub to: String,

    #[arg(long, env = "REPORT_SUBJECT", default_value = DEFAULT_DIGEST_SUBJECT)]
    pub subject: String,

    /// Also attach the CSV file
    #[arg(long, env = "REPORT_ATTACH")]
    pub attach: bool,

    #[command(flatten)]
    pub smtp: SmtpArgs,
}

impl TryFrom<DigestArgs> for DigestConfig {
    type Error = DeliveryError;

    fn try_from(args: DigestArgs) -> Result<Self, Self::Error> {
        let smtp = args
            .smtp
            .to_smtp_config()
            .ok_or(DeliveryError::NotConfigured("SMTP_HOST is not set"))?;
        Ok(DigestConfig {
            log_file: args.log_file,
            to: args.to,
            subject: args.subject,
            attach: args.attach,
            smtp,
        })
    }
}
