//! HTTP transport used by the prober.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use crate::config::ProbeConfig;
use crate::error_handling::InitializationError;
use crate::initialization::init_client;

use super::outcome::{Attempt, ProbeMethod};

/// Sends one request and reports what happened. Implementations never fail:
/// transport problems are carried inside the returned `Attempt`.
pub trait Transport: Send + Sync + 'static {
    fn send(&self, url: &str, method: ProbeMethod) -> impl Future<Output = Attempt> + Send;
}

/// `reqwest`-backed transport.
///
/// Connection pooling is disabled so every attempt opens its own connection.
#[derive(Clone)]
pub struct HttpTransport {
    client: Arc<reqwest::Client>,
}

impl HttpTransport {
    pub fn new(config: &ProbeConfig) -> Result<Self, InitializationError> {
        Ok(Self {
            client: init_client(config)?,
        })
    }
}

impl Transport for HttpTransport {
    async fn send(&self, url: &str, method: ProbeMethod) -> Attempt {
        let start = Instant::now();
        let request = match method {
            ProbeMethod::Head => self.client.head(url),
            ProbeMethod::Get => self.client.get(url),
        };

        let mut response = match request.send().await {
            Ok(response) => response,
            Err(e) => return Attempt::failed(0, start.elapsed(), &e),
        };
        let status_code = response.status().as_u16();

        // Download and discard the body so the timing covers the full transfer
        // and a stalled body surfaces as a timeout.
        loop {
            match response.chunk().await {
                Ok(Some(_)) => continue,
                Ok(None) => break,
                Err(e) => return Attempt::failed(status_code, start.elapsed(), &e),
            }
        }

        Attempt::response(status_code, start.elapsed())
    }
}
