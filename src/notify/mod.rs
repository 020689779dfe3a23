//! Email notifications: one alert per DOWN result, and the daily digest.
//!
//! Delivery failures are logged and counted. They never change the results of
//! a batch or abort the run that produced them.

mod message;
mod smtp;

use std::future::Future;

use log::{info, warn};

pub use message::{digest_body, digest_email, down_alert, Email, EmailAttachment};
pub use smtp::SmtpNotifier;

use crate::config::AlertConfig;
use crate::error_handling::{DeliveryError, ErrorType, InfoType, ProcessingStats};
use crate::models::CheckResult;

/// Delivers one email.
pub trait Notifier: Send + Sync {
    fn send(&self, email: Email) -> impl Future<Output = Result<(), DeliveryError>> + Send;
}

/// How many alerts a dispatch delivered and how many failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlertSummary {
    pub sent: usize,
    pub failed: usize,
}

/// Sends one alert per DOWN result, in result order, one at a time.
///
/// Nothing is sent when alerts are disabled or no recipient is configured.
pub async fn dispatch_alerts<N: Notifier>(
    notifier: &N,
    results: &[CheckResult],
    alert: &AlertConfig,
    stats: &ProcessingStats,
) -> AlertSummary {
    let mut summary = AlertSummary::default();
    let to = match (&alert.to, alert.enabled) {
        (Some(to), true) if !to.is_empty() => to,
        _ => return summary,
    };

    for result in results.iter().filter(|r| !r.is_up()) {
        match notifier.send(down_alert(result, to, &alert.subject)).await {
            Ok(()) => {
                info!("Alert sent for {} to {}", result.url, to);
                stats.increment_info(InfoType::AlertSent);
                summary.sent += 1;
            }
            Err(e) => {
                warn!("Alert for {} not delivered: {}", result.url, e);
                stats.increment_error(ErrorType::AlertDeliveryError);
                summary.failed += 1;
            }
        }
    }
    summary
}
