//! Prober tests against a local mock server.
//!
//! These exercise the real `reqwest` transport: the HEAD-then-GET fallback,
//! redirect policy, timeouts and connection failures.

use std::time::Duration;

use uptime_monitor::classify::classify;
use uptime_monitor::config::{ProbeConfig, UpPolicy};
use uptime_monitor::probe::{probe, HttpTransport, ProbeMethod};
use uptime_monitor::StatusLabel;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn probe_config(head_first: bool) -> ProbeConfig {
    ProbeConfig {
        connect_timeout: Duration::from_secs(2),
        total_timeout: Duration::from_secs(5),
        user_agent: "uptime_monitor_test/1.0".to_string(),
        head_first,
        ..Default::default()
    }
}

fn transport(config: &ProbeConfig) -> HttpTransport {
    HttpTransport::new(config).expect("Failed to build HTTP transport")
}

#[tokio::test]
async fn test_head_rejected_then_get_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(405))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .expect(1)
        .mount(&server)
        .await;

    let config = probe_config(true);
    let url = format!("{}/health", server.uri());
    let outcome = probe(&transport(&config), &url, &config).await;

    assert_eq!(outcome.http_status_code, 200);
    assert_eq!(outcome.method_used, ProbeMethod::Get);
    assert!(outcome.retried);
    assert!(outcome.transport_error.is_empty());
    assert!(classify(outcome.http_status_code, &outcome.transport_error, &UpPolicy::default()).is_up());
}

#[tokio::test]
async fn test_get_retry_happens_at_most_once() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(405))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(405))
        .expect(1)
        .mount(&server)
        .await;

    let config = probe_config(true);
    let outcome = probe(&transport(&config), &server.uri(), &config).await;

    assert_eq!(outcome.http_status_code, 405);
    assert!(outcome.retried);
    let classification = classify(405, &outcome.transport_error, &UpPolicy::default());
    assert_eq!(classification.label, StatusLabel::Down);
    assert_eq!(classification.error_description, "HTTP 405");
}

#[tokio::test]
async fn test_head_accepted_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = probe_config(true);
    let outcome = probe(&transport(&config), &server.uri(), &config).await;

    assert_eq!(outcome.http_status_code, 204);
    assert_eq!(outcome.method_used, ProbeMethod::Head);
    assert!(!outcome.retried);
}

#[tokio::test]
async fn test_get_only_when_head_first_is_off() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let config = probe_config(false);
    let outcome = probe(&transport(&config), &server.uri(), &config).await;

    assert_eq!(outcome.http_status_code, 503);
    assert_eq!(outcome.method_used, ProbeMethod::Get);
    assert!(!outcome.retried);
    assert_eq!(
        classify(503, &outcome.transport_error, &UpPolicy::default()).error_description,
        "HTTP 503 (Service Unavailable)"
    );
}

#[tokio::test]
async fn test_redirects_are_followed_or_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("Location", format!("{}/new", server.uri())),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    let url = format!("{}/old", server.uri());

    let following = probe_config(false);
    let outcome = probe(&transport(&following), &url, &following).await;
    assert_eq!(outcome.http_status_code, 200);

    let not_following = ProbeConfig {
        follow_redirects: false,
        ..probe_config(false)
    };
    let outcome = probe(&transport(&not_following), &url, &not_following).await;
    assert_eq!(outcome.http_status_code, 301);
    // 3xx is inside the default UP range
    assert!(classify(301, &outcome.transport_error, &UpPolicy::default()).is_up());
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let config = ProbeConfig {
        total_timeout: Duration::from_millis(500),
        ..probe_config(false)
    };
    let outcome = probe(&transport(&config), &server.uri(), &config).await;

    assert_eq!(outcome.http_status_code, 0);
    assert!(
        outcome.transport_error.starts_with("Operation timed out"),
        "unexpected error: {}",
        outcome.transport_error
    );
    let classification = classify(0, &outcome.transport_error, &UpPolicy::default());
    assert_eq!(classification.label, StatusLabel::Down);
    assert_eq!(classification.error_description, outcome.transport_error);
}

#[tokio::test]
async fn test_connection_refused_is_not_retried() {
    // Bind and drop to get a port with nothing listening
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("local addr").port()
    };
    let url = format!("http://127.0.0.1:{port}/");

    let config = probe_config(true);
    let outcome = probe(&transport(&config), &url, &config).await;

    assert_eq!(outcome.http_status_code, 0);
    assert!(!outcome.retried);
    assert_eq!(outcome.method_used, ProbeMethod::Head);
    assert!(
        outcome.transport_error.starts_with("Connection failed"),
        "unexpected error: {}",
        outcome.transport_error
    );
}
