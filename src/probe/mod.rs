//! Single-URL probing.
//!
//! A probe is a small state machine:
//!
//! ```text
//! Pending -> Attempted(HEAD|GET) -> [Attempted(GET, retried)] -> Finalized
//! ```
//!
//! The GET retry fires only after a HEAD attempt that looks rejected (403/405)
//! or silently dropped (no status and no error), and at most once per URL. The
//! retry's outcome replaces the HEAD outcome entirely.

mod outcome;
mod transport;

pub use outcome::{round_millis, Attempt, ProbeMethod, ProbeOutcome};
pub use transport::{HttpTransport, Transport};

use log::debug;

use crate::config::ProbeConfig;

enum ProbeState {
    Pending,
    Attempted {
        method: ProbeMethod,
        attempt: Attempt,
        retried: bool,
    },
    Finalized(ProbeOutcome),
}

/// Probes `url` through `transport`, applying the HEAD-then-GET fallback when
/// `config.head_first` is set. Always returns an outcome; transport failures are
/// reported in `transport_error` with `http_status_code == 0`.
pub async fn probe<T: Transport>(transport: &T, url: &str, config: &ProbeConfig) -> ProbeOutcome {
    let mut state = ProbeState::Pending;
    loop {
        state = match state {
            ProbeState::Pending => {
                let method = if config.head_first {
                    ProbeMethod::Head
                } else {
                    ProbeMethod::Get
                };
                ProbeState::Attempted {
                    method,
                    attempt: transport.send(url, method).await,
                    retried: false,
                }
            }
            ProbeState::Attempted {
                method: ProbeMethod::Head,
                attempt,
                retried: false,
            } if attempt.looks_like_head_rejection() => {
                debug!(
                    "HEAD {} returned {} in {:?}, retrying with GET",
                    url, attempt.status_code, attempt.elapsed
                );
                ProbeState::Attempted {
                    method: ProbeMethod::Get,
                    attempt: transport.send(url, ProbeMethod::Get).await,
                    retried: true,
                }
            }
            ProbeState::Attempted {
                method,
                attempt,
                retried,
            } => ProbeState::Finalized(ProbeOutcome::from_attempt(url, method, attempt, retried)),
            ProbeState::Finalized(outcome) => return outcome,
        };
    }
}
