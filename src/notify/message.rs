//! Alert and digest message composition.

use std::path::Path;

use crate::models::CheckResult;

/// A plain-text email ready to hand to a `Notifier`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub attachment: Option<EmailAttachment>,
}

/// File attached to an email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAttachment {
    pub filename: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

/// Alert for one DOWN result.
pub fn down_alert(result: &CheckResult, to: &str, subject: &str) -> Email {
    let body = format!(
        "ALERT: Website is DOWN\n\n\
         Time: {}\n\
         URL: {}\n\
         Status Code: {}\n\
         Reason: {}\n\
         Response Time: {} ms\n",
        result.formatted_timestamp(),
        result.url,
        result.http_status_code,
        result.error_description,
        result.elapsed_millis
    );
    Email {
        to: to.to_string(),
        subject: subject.to_string(),
        body,
        attachment: None,
    }
}

/// Digest body: the full CSV log, or a placeholder when there is nothing yet.
pub fn digest_body(log_content: Option<&str>, log_name: &str) -> String {
    let mut body = String::from("Daily Uptime Report\n\n");
    match log_content {
        Some(content) if !content.is_empty() => body.push_str(content),
        _ => body.push_str(&format!(
            "(No results yet — {log_name} not found or empty)"
        )),
    }
    body
}

/// Builds the digest email for the log at `log_file`, attaching it as
/// `text/csv` when `attach` is set and the file exists.
pub async fn digest_email(
    log_file: &Path,
    to: &str,
    subject: &str,
    attach: bool,
) -> Email {
    let log_name = log_file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| log_file.display().to_string());

    // A missing or unreadable log is reported in the body, not as an error.
    let content = tokio::fs::read_to_string(log_file).await.ok();
    let body = digest_body(content.as_deref(), &log_name);

    let attachment = match (attach, content) {
        (true, Some(content)) => Some(EmailAttachment {
            filename: log_name,
            content_type: "text/csv".to_string(),
            content: content.into_bytes(),
        }),
        _ => None,
    };

    Email {
        to: to.to_string(),
        subject: subject.to_string(),
        body,
        attachment,
    }
}
