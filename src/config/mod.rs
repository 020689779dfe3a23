//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, defaults, formats)
//! - Library configuration structs for check and digest runs

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{
    AlertConfig, Config, DigestConfig, LogFormat, LogLevel, ProbeConfig, Schedule, SmtpConfig,
    SmtpSecurity, UpPolicy,
};
