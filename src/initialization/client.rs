//! HTTP client initialization.

use std::sync::Arc;

use reqwest::redirect::Policy;
use reqwest::ClientBuilder;

use crate::config::{ProbeConfig, MAX_REDIRECT_HOPS};

/// Initializes the HTTP client used for probing.
///
/// Creates a `reqwest::Client` configured with:
/// - Connect and total timeouts from the probe config
/// - Redirect following up to `MAX_REDIRECT_HOPS`, or none
/// - Certificate and host name verification, unless disabled
/// - The configured User-Agent (omitted when empty)
/// - No idle connection pool, so each attempt gets a fresh connection
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails (e.g. the TLS backend
/// cannot be initialized or the User-Agent is not a valid header value).
pub fn init_client(config: &ProbeConfig) -> Result<Arc<reqwest::Client>, reqwest::Error> {
    let redirect = if config.follow_redirects {
        Policy::limited(MAX_REDIRECT_HOPS)
    } else {
        Policy::none()
    };

    let mut builder = ClientBuilder::new()
        .connect_timeout(config.connect_timeout)
        .timeout(config.total_timeout)
        .redirect(redirect)
        .danger_accept_invalid_certs(!config.verify_tls)
        .danger_accept_invalid_hostnames(!config.verify_tls)
        .pool_max_idle_per_host(0);

    if !config.user_agent.is_empty() {
        builder = builder.user_agent(config.user_agent.clone());
    }

    Ok(Arc::new(builder.build()?))
}
