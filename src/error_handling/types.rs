//! Error type definitions.
//!
//! This module defines the typed errors returned at module seams and the
//! categories counted in run statistics.

use std::path::PathBuf;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Configuration problems that abort a run before any URL is probed.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The URL list does not exist.
    #[error("URL list not found at: {}", .0.display())]
    UrlsFileNotFound(PathBuf),

    /// The URL list exists but could not be read.
    #[error("Failed to read URL list {}: {source}", .path.display())]
    UrlsFileRead {
        /// Path of the URL list
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The URL list contains no URLs after trimming and skipping blank lines.
    #[error("No URLs found in {}", .0.display())]
    NoUrls(PathBuf),

    /// Concurrency limit must be at least 1.
    #[error("Concurrency limit must be greater than 0 (got {0})")]
    InvalidConcurrency(usize),

    /// UP range bounds are inverted.
    #[error("UP range minimum {min} is greater than maximum {max}")]
    InvalidUpRange {
        /// Configured lower bound
        min: u16,
        /// Configured upper bound
        max: u16,
    },

    /// Connect and total timeouts must be non-zero and at most one hour.
    #[error("Request timeouts must be greater than zero and at most 3600 seconds")]
    InvalidTimeout,
}

/// Failures delivering an alert or digest email.
///
/// These are logged and counted; they never abort a check run.
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// No SMTP relay or recipient configured.
    #[error("Email delivery is not configured: {0}")]
    NotConfigured(&'static str),

    /// A sender or recipient address could not be parsed.
    #[error("Invalid email address '{address}': {source}")]
    Address {
        /// The rejected address
        address: String,
        /// Parser error
        #[source]
        source: lettre::address::AddressError,
    },

    /// The message could not be assembled.
    #[error("Failed to build email: {0}")]
    Message(#[from] lettre::error::Error),

    /// The SMTP relay rejected the message or could not be reached.
    #[error("SMTP delivery failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The attachment could not be read or typed.
    #[error("Failed to attach {}: {reason}", .path.display())]
    Attachment {
        /// File that was being attached
        path: PathBuf,
        /// What went wrong
        reason: String,
    },
}

/// Categories of probe failures counted during a run.
///
/// Transport categories mirror the `reqwest::Error` predicates; the last two are
/// faults synthesized by the batch runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    HttpRequestTimeoutError,
    HttpRequestConnectError,
    HttpRequestRedirectError,
    HttpRequestBuilderError,
    HttpRequestBodyError,
    HttpRequestDecodeError,
    HttpRequestRequestError,
    HttpRequestOtherError,
    /// Probe task exceeded its envelope and was abandoned
    ProbeEnvelopeTimeout,
    /// Probe task panicked or was cancelled
    ProbeTaskFault,
    /// Alert email could not be delivered
    AlertDeliveryError,
}

/// Informational events counted during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum InfoType {
    /// HEAD was rejected or dropped and the probe was repeated with GET
    HeadRetriedWithGet,
    /// 418 counted as UP by the teapot override
    TeapotAccepted,
    /// Alert email delivered
    AlertSent,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    /// Human-readable label, also used as the prefix of transport error text.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::HttpRequestTimeoutError => "Operation timed out",
            ErrorType::HttpRequestConnectError => "Connection failed",
            ErrorType::HttpRequestRedirectError => "Redirect error",
            ErrorType::HttpRequestBuilderError => "Invalid request",
            ErrorType::HttpRequestBodyError => "Failed reading response body",
            ErrorType::HttpRequestDecodeError => "Failed decoding response",
            ErrorType::HttpRequestRequestError => "Request error",
            ErrorType::HttpRequestOtherError => "HTTP error",
            ErrorType::ProbeEnvelopeTimeout => "Probe abandoned after timeout",
            ErrorType::ProbeTaskFault => "Probe task fault",
            ErrorType::AlertDeliveryError => "Alert delivery failed",
        }
    }
}

impl InfoType {
    /// Human-readable label for statistics output.
    pub fn as_str(&self) -> &'static str {
        match self {
            InfoType::HeadRetriedWithGet => "HEAD retried with GET",
            InfoType::TeapotAccepted => "418 accepted as UP",
            InfoType::AlertSent => "Alert emails sent",
        }
    }
}
