//! Error handling and run statistics.
//!
//! This module provides:
//! - Typed errors for initialization, configuration and email delivery
//! - Transport error categorization and rendering
//! - Run statistics (failure categories, retries, alerts)
//!
//! Transport failures are never returned as errors: they are rendered to text
//! and carried inside the probe outcome so every URL still gets a result.

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::{categorize_reqwest_error, describe_transport_error};
pub use stats::ProcessingStats;
pub use types::{ConfigError, DeliveryError, ErrorType, InfoType, InitializationError};
