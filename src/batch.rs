//! Batch probing with bounded concurrency.
//!
//! A batch probes every URL of the input list exactly once and returns exactly
//! one `CheckResult` per input URL, all stamped with one timestamp captured when
//! the batch starts.
//!
//! Two schedules cap the number of probes in flight at `concurrency_limit`:
//! - `Chunked`: consecutive groups of `concurrency_limit` URLs; all probes of a
//!   group run concurrently and the next group starts once the group drains.
//! - `Pooled`: a semaphore over the whole list; a new probe starts as soon as
//!   any probe finishes.
//!
//! Each probe runs in its own task. A task that panics, or that outlives its
//! timeout envelope, is turned into a synthesized DOWN result instead of being
//! lost. Results are collected by a single consumer and returned in input
//! order, whatever order the probes finish in.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use chrono::NaiveDateTime;
use futures::stream::FuturesUnordered;
use futures::StreamExt;
use log::{debug, info, warn};
use tokio::sync::OwnedSemaphorePermit;

use crate::classify::is_up_status;
use crate::config::{Config, ProbeConfig, Schedule, UpPolicy, HTTP_STATUS_TEAPOT};
use crate::error_handling::{ErrorType, InfoType, ProcessingStats};
use crate::initialization::init_semaphore;
use crate::models::CheckResult;
use crate::probe::{probe, round_millis, ProbeOutcome, Transport};

/// Drives probes over a URL list.
pub struct BatchRunner<T: Transport> {
    transport: Arc<T>,
    probe_config: Arc<ProbeConfig>,
    policy: UpPolicy,
    concurrency_limit: usize,
    schedule: Schedule,
    stats: Arc<ProcessingStats>,
}

impl<T: Transport> BatchRunner<T> {
    /// Creates a runner using the probe, policy and scheduling settings of `config`.
    pub fn new(transport: T, config: &Config) -> Self {
        Self {
            transport: Arc::new(transport),
            probe_config: Arc::new(config.probe.clone()),
            policy: config.policy,
            concurrency_limit: config.concurrency_limit.max(1),
            schedule: config.schedule,
            stats: Arc::new(ProcessingStats::new()),
        }
    }

    /// Shares an existing statistics tracker instead of a private one.
    pub fn with_stats(mut self, stats: Arc<ProcessingStats>) -> Self {
        self.stats = stats;
        self
    }

    pub fn stats(&self) -> &Arc<ProcessingStats> {
        &self.stats
    }

    /// Probes every URL and returns one result per URL, in input order.
    pub async fn run(&self, urls: &[String]) -> Vec<CheckResult> {
        let batch_timestamp = chrono::Local::now().naive_local();
        info!(
            "Checking {} URLs (concurrency {}, {:?} schedule)",
            urls.len(),
            self.concurrency_limit,
            self.schedule
        );

        let mut collected: Vec<(usize, CheckResult)> = Vec::with_capacity(urls.len());

        match self.schedule {
            Schedule::Chunked => {
                for (group, chunk) in urls.chunks(self.concurrency_limit).enumerate() {
                    let offset = group * self.concurrency_limit;
                    let mut tasks: FuturesUnordered<_> = chunk
                        .iter()
                        .enumerate()
                        .map(|(i, url)| self.spawn_probe(offset + i, url, None, batch_timestamp))
                        .collect();
                    while let Some(entry) = tasks.next().await {
                        collected.push(entry);
                    }
                    debug!("Group {} drained ({} URLs)", group + 1, chunk.len());
                }
            }
            Schedule::Pooled => {
                // Never more permits than URLs
                let semaphore = init_semaphore(self.concurrency_limit.min(urls.len()).max(1));
                let mut tasks = FuturesUnordered::new();
                for (index, url) in urls.iter().enumerate() {
                    match Arc::clone(&semaphore).acquire_owned().await {
                        Ok(permit) => {
                            tasks.push(self.spawn_probe(index, url, Some(permit), batch_timestamp))
                        }
                        Err(_) => {
                            warn!("Semaphore closed, recording {url} as DOWN");
                            self.stats.increment_error(ErrorType::ProbeTaskFault);
                            collected.push((
                                index,
                                CheckResult::synthesized_down(batch_timestamp, url, 0, ""),
                            ));
                        }
                    }
                }
                while let Some(entry) = tasks.next().await {
                    collected.push(entry);
                }
            }
        }

        collected.sort_by_key(|(index, _)| *index);
        collected.into_iter().map(|(_, result)| result).collect()
    }

    /// Spawns the probe task for one URL and returns a future resolving to its
    /// (input index, result) pair. The permit, if any, is held until the task
    /// ends, including when the envelope timeout drops the probe.
    fn spawn_probe(
        &self,
        index: usize,
        url: &str,
        permit: Option<OwnedSemaphorePermit>,
        batch_timestamp: NaiveDateTime,
    ) -> impl Future<Output = (usize, CheckResult)> {
        let transport = Arc::clone(&self.transport);
        let probe_config = Arc::clone(&self.probe_config);
        let envelope = probe_config.envelope();
        let task_url = url.to_string();

        let handle = tokio::spawn(async move {
            let _permit = permit;
            let start = Instant::now();
            tokio::time::timeout(envelope, probe(transport.as_ref(), &task_url, &probe_config))
                .await
                .map_err(|_| start.elapsed())
        });

        let url = url.to_string();
        let policy = self.policy;
        let stats = Arc::clone(&self.stats);

        async move {
            let result = match handle.await {
                Ok(Ok(outcome)) => {
                    record_outcome(&stats, &outcome, &policy);
                    CheckResult::from_outcome(batch_timestamp, outcome, &policy)
                }
                Ok(Err(elapsed)) => {
                    warn!("Probe for {url} did not finish within {envelope:?}, recording DOWN");
                    stats.increment_error(ErrorType::ProbeEnvelopeTimeout);
                    let elapsed_millis = round_millis(elapsed);
                    CheckResult::synthesized_down(
                        batch_timestamp,
                        &url,
                        elapsed_millis,
                        &format!(
                            "{}: no outcome within {} ms",
                            ErrorType::ProbeEnvelopeTimeout.as_str(),
                            elapsed_millis
                        ),
                    )
                }
                Err(join_error) => {
                    warn!("Probe task for {url} failed: {join_error}");
                    stats.increment_error(ErrorType::ProbeTaskFault);
                    CheckResult::synthesized_down(batch_timestamp, &url, 0, "")
                }
            };
            debug!(
                "{} {} code={} time={}ms",
                result.status, result.url, result.http_status_code, result.elapsed_millis
            );
            (index, result)
        }
    }
}

fn record_outcome(stats: &ProcessingStats, outcome: &ProbeOutcome, policy: &UpPolicy) {
    if outcome.retried {
        stats.increment_info(InfoType::HeadRetriedWithGet);
    }
    if let Some(error_type) = outcome.error_type {
        stats.increment_error(error_type);
    }
    let in_range = (policy.min..=policy.max).contains(&outcome.http_status_code);
    if outcome.http_status_code == HTTP_STATUS_TEAPOT
        && outcome.transport_error.is_empty()
        && !in_range
        && is_up_status(outcome.http_status_code, policy)
    {
        stats.increment_info(InfoType::TeapotAccepted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::classify::StatusLabel;
    use crate::probe::{Attempt, ProbeMethod};

    /// Answers with the status code encoded as the last path segment
    /// (`https://host/503` -> 503), after an optional delay, and tracks how many
    /// sends are in flight.
    #[derive(Default)]
    struct StubTransport {
        delay: Duration,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        sends: AtomicUsize,
    }

    impl StubTransport {
        fn with_delay(delay: Duration) -> Self {
            Self {
                delay,
                ..Default::default()
            }
        }
    }

    impl Transport for StubTransport {
        async fn send(&self, url: &str, _method: ProbeMethod) -> Attempt {
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(current, Ordering::SeqCst);
            self.sends.fetch_add(1, Ordering::SeqCst);

            if url.ends_with("/panic") {
                panic!("stub transport fault");
            }
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if url.ends_with("/refused") {
                return Attempt {
                    status_code: 0,
                    elapsed: Duration::from_millis(3),
                    transport_error: "Connection failed: Connection refused".to_string(),
                    error_type: Some(ErrorType::HttpRequestConnectError),
                };
            }
            let code = url
                .rsplit('/')
                .next()
                .and_then(|segment| segment.parse().ok())
                .unwrap_or(200);
            Attempt::response(code, Duration::from_millis(7))
        }
    }

    fn config(limit: usize, schedule: Schedule) -> Config {
        Config {
            concurrency_limit: limit,
            schedule,
            ..Default::default()
        }
    }

    fn urls(paths: &[&str]) -> Vec<String> {
        paths
            .iter()
            .map(|p| format!("https://site.test/{p}"))
            .collect()
    }

    #[tokio::test]
    async fn test_one_result_per_url_in_input_order() {
        let input = urls(&["200", "404", "refused", "301", "503", "418", "200"]);
        for schedule in [Schedule::Chunked, Schedule::Pooled] {
            let runner = BatchRunner::new(StubTransport::default(), &config(3, schedule));
            let results = runner.run(&input).await;

            assert_eq!(results.len(), input.len());
            let result_urls: Vec<&str> = results.iter().map(|r| r.url.as_str()).collect();
            let input_urls: Vec<&str> = input.iter().map(String::as_str).collect();
            assert_eq!(result_urls, input_urls, "{schedule:?}");

            let labels: Vec<StatusLabel> = results.iter().map(|r| r.status).collect();
            assert_eq!(
                labels,
                vec![
                    StatusLabel::Up,
                    StatusLabel::Down,
                    StatusLabel::Down,
                    StatusLabel::Up,
                    StatusLabel::Down,
                    StatusLabel::Up,
                    StatusLabel::Up,
                ]
            );
            assert_eq!(results[1].error_description, "HTTP 404 (Not Found)");
            assert_eq!(
                results[2].error_description,
                "Connection failed: Connection refused"
            );
            assert_eq!(results[2].http_status_code, 0);
        }
    }

    #[tokio::test]
    async fn test_all_results_share_one_timestamp() {
        let input = urls(&["200", "500", "200", "302", "404"]);
        let runner = BatchRunner::new(
            StubTransport::with_delay(Duration::from_millis(5)),
            &config(2, Schedule::Chunked),
        );
        let results = runner.run(&input).await;
        let first = results[0].batch_timestamp;
        assert!(results.iter().all(|r| r.batch_timestamp == first));
    }

    #[tokio::test]
    async fn test_panicking_probe_becomes_unknown_error() {
        let input = urls(&["200", "panic", "404"]);
        for schedule in [Schedule::Chunked, Schedule::Pooled] {
            let runner = BatchRunner::new(StubTransport::default(), &config(2, schedule));
            let results = runner.run(&input).await;

            assert_eq!(results.len(), 3);
            assert_eq!(results[1].url, "https://site.test/panic");
            assert_eq!(results[1].status, StatusLabel::Down);
            assert_eq!(results[1].http_status_code, 0);
            assert_eq!(results[1].error_description, "Unknown error");
            assert!(results[0].is_up());
            assert_eq!(runner.stats().get_error_count(ErrorType::ProbeTaskFault), 1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_probe_is_abandoned_after_envelope() {
        let mut cfg = config(2, Schedule::Chunked);
        cfg.probe.total_timeout = Duration::from_secs(1);
        let runner = BatchRunner::new(StubTransport::with_delay(Duration::from_secs(3600)), &cfg);

        let results = runner.run(&urls(&["200"])).await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, StatusLabel::Down);
        assert!(
            results[0]
                .error_description
                .starts_with("Probe abandoned after timeout"),
            "{}",
            results[0].error_description
        );
        assert_eq!(
            runner.stats().get_error_count(ErrorType::ProbeEnvelopeTimeout),
            1
        );
    }

    #[tokio::test]
    async fn test_concurrency_never_exceeds_limit() {
        let limit = 4;
        let input: Vec<String> = (0..25).map(|i| format!("https://site.test/{i}/200")).collect();

        for schedule in [Schedule::Chunked, Schedule::Pooled] {
            let runner = BatchRunner::new(
                StubTransport::with_delay(Duration::from_millis(20)),
                &config(limit, schedule),
            );
            let results = runner.run(&input).await;
            let transport = &runner.transport;

            assert_eq!(results.len(), input.len());
            assert_eq!(transport.sends.load(Ordering::SeqCst), input.len());
            let max = transport.max_in_flight.load(Ordering::SeqCst);
            assert!(max <= limit, "{schedule:?}: {max} probes in flight, limit {limit}");
            assert!(max > 1, "{schedule:?}: probes should overlap");
        }
    }

    #[tokio::test]
    async fn test_statistics_are_recorded() {
        let mut cfg = config(5, Schedule::Pooled);
        cfg.probe.head_first = true;
        let runner = BatchRunner::new(StubTransport::default(), &cfg);
        // 405 on HEAD triggers a GET, which the stub also answers with 405.
        runner.run(&urls(&["405", "refused", "418"])).await;

        let stats = runner.stats();
        assert_eq!(stats.get_info_count(InfoType::HeadRetriedWithGet), 1);
        assert_eq!(stats.get_info_count(InfoType::TeapotAccepted), 1);
        assert_eq!(stats.get_error_count(ErrorType::HttpRequestConnectError), 1);
    }

    #[tokio::test]
    async fn test_huge_concurrency_limit_runs_every_url() {
        let input = urls(&["200", "404", "503"]);
        for schedule in [Schedule::Chunked, Schedule::Pooled] {
            let runner = BatchRunner::new(StubTransport::default(), &config(usize::MAX, schedule));
            let results = runner.run(&input).await;

            assert_eq!(results.len(), 3, "{schedule:?}");
            assert_eq!(results[2].http_status_code, 503);
        }
    }

    #[tokio::test]
    async fn test_empty_list_yields_no_results() {
        let runner = BatchRunner::new(StubTransport::default(), &config(3, Schedule::Chunked));
        assert!(runner.run(&[]).await.is_empty());
    }
}
