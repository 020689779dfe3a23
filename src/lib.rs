//! uptime_monitor library: scheduled website reachability checks
//!
//! This library probes a list of URLs, classifies each as UP or DOWN, appends
//! the batch to a CSV log, prints a console summary and emails an alert for
//! every DOWN result. A separate digest operation mails the accumulated log.
//!
//! # Example
//!
//! ```no_run
//! use uptime_monitor::{run_check, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     urls_file: std::path::PathBuf::from("urls.txt"),
//!     concurrency_limit: 20,
//!     ..Default::default()
//! };
//!
//! let report = run_check(config).await?;
//! println!("{} URLs: {} up, {} down", report.total, report.up, report.down);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

mod batch;
pub mod classify;
pub mod cli;
pub mod config;
pub mod error_handling;
pub mod initialization;
pub mod input;
mod models;
pub mod notify;
pub mod probe;
pub mod report;

// Re-export public API
pub use batch::BatchRunner;
pub use classify::{classify, Classification, StatusLabel};
pub use config::{Config, DigestConfig, LogFormat, LogLevel, Schedule};
pub use models::{format_timestamp, CheckResult};
pub use run::{run_check, run_digest, CheckReport};

// Internal run module (one check batch, one digest)
mod run {
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::Arc;

    use anyhow::{Context, Result};
    use chrono::NaiveDateTime;
    use log::{info, warn};

    use crate::batch::BatchRunner;
    use crate::config::{Config, DigestConfig};
    use crate::error_handling::{DeliveryError, ProcessingStats};
    use crate::input::load_urls;
    use crate::models::CheckResult;
    use crate::notify::{dispatch_alerts, digest_email, AlertSummary, Notifier, SmtpNotifier};
    use crate::probe::HttpTransport;
    use crate::report::{append_batch, write_console_report};

    /// Results of one check batch.
    #[derive(Debug, Clone)]
    pub struct CheckReport {
        /// Timestamp shared by every result of the batch
        pub batch_timestamp: NaiveDateTime,
        /// One result per input URL, in input order
        pub results: Vec<CheckResult>,
        /// Number of URLs checked
        pub total: usize,
        /// Number of UP results
        pub up: usize,
        /// Number of DOWN results
        pub down: usize,
        /// CSV log the batch was appended to
        pub log_file: PathBuf,
        /// Alert emails delivered
        pub alerts_sent: usize,
        /// Alert emails that could not be delivered
        pub alerts_failed: usize,
    }

    /// Runs one check batch.
    ///
    /// Reads the URL list, probes every URL, appends the batch to the CSV log,
    /// prints the console summary to stdout and sends one alert per DOWN result
    /// when SMTP and a recipient are configured.
    ///
    /// # Errors
    ///
    /// Returns an error, before any URL is probed, if the configuration is
    /// invalid, the URL list is missing or empty, or the HTTP client cannot be
    /// built. Also fails if the CSV log cannot be written. Probe and alert
    /// failures never fail the run: they become DOWN results and log warnings.
    pub async fn run_check(config: Config) -> Result<CheckReport> {
        config.validate().context("Invalid configuration")?;
        let urls = load_urls(&config.urls_file).await?;

        let transport =
            HttpTransport::new(&config.probe).context("Failed to initialize HTTP client")?;
        let stats = Arc::new(ProcessingStats::new());
        let runner = BatchRunner::new(transport, &config).with_stats(Arc::clone(&stats));

        let results = runner.run(&urls).await;
        let batch_timestamp = results
            .first()
            .map(|r| r.batch_timestamp)
            .unwrap_or_else(|| chrono::Local::now().naive_local());

        append_batch(&config.log_file, &results)?;

        {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            write_console_report(&mut out, &batch_timestamp, &results, &config.log_file)
                .and_then(|_| out.flush())
                .context("Failed to write console report")?;
        }

        let alerts = send_alerts(&config, &results, &stats).await;

        stats.log_summary();

        let up = results.iter().filter(|r| r.is_up()).count();
        Ok(CheckReport {
            batch_timestamp,
            total: results.len(),
            up,
            down: results.len() - up,
            results,
            log_file: config.log_file,
            alerts_sent: alerts.sent,
            alerts_failed: alerts.failed,
        })
    }

    async fn send_alerts(
        config: &Config,
        results: &[CheckResult],
        stats: &ProcessingStats,
    ) -> AlertSummary {
        if !config.alert.enabled || results.iter().all(|r| r.is_up()) {
            return AlertSummary::default();
        }
        let (Some(smtp), Some(_)) = (&config.smtp, &config.alert.to) else {
            info!("Email not configured, skipping DOWN alerts");
            return AlertSummary::default();
        };
        match SmtpNotifier::new(smtp) {
            Ok(notifier) => dispatch_alerts(&notifier, results, &config.alert, stats).await,
            Err(e) => {
                warn!("Cannot send DOWN alerts: {e}");
                AlertSummary::default()
            }
        }
    }

    /// Emails the CSV log as the daily report.
    ///
    /// A missing or empty log still produces a report with a placeholder body.
    ///
    /// # Errors
    ///
    /// Returns an error if no recipient is configured or the SMTP relay rejects
    /// the message.
    pub async fn run_digest(config: DigestConfig) -> Result<()> {
        if config.to.trim().is_empty() {
            return Err(DeliveryError::NotConfigured("report recipient is empty").into());
        }
        let notifier = SmtpNotifier::new(&config.smtp).context("Invalid SMTP settings")?;
        let email = digest_email(&config.log_file, &config.to, &config.subject, config.attach).await;
        notifier
            .send(email)
            .await
            .with_context(|| format!("Failed to send daily report to {}", config.to))?;
        info!("Daily report sent to {}", config.to);
        Ok(())
    }
}
