//! Transport error categorization.
//!
//! Turns `reqwest::Error` values into a statistics category and the
//! human-readable text stored in the `error` column of the CSV log.

use super::types::ErrorType;

/// Categorizes a `reqwest::Error` into an `ErrorType`.
///
/// Timeouts are checked first because reqwest reports a connect timeout as both
/// `is_connect()` and `is_timeout()`.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> ErrorType {
    if error.is_timeout() {
        ErrorType::HttpRequestTimeoutError
    } else if error.is_connect() {
        ErrorType::HttpRequestConnectError
    } else if error.is_redirect() {
        ErrorType::HttpRequestRedirectError
    } else if error.is_builder() {
        ErrorType::HttpRequestBuilderError
    } else if error.is_body() {
        ErrorType::HttpRequestBodyError
    } else if error.is_decode() {
        ErrorType::HttpRequestDecodeError
    } else if error.is_request() {
        ErrorType::HttpRequestRequestError
    } else {
        ErrorType::HttpRequestOtherError
    }
}

/// Renders a transport failure as a single line: the category label followed by
/// the error's source chain (DNS, TLS and socket errors live in the sources).
///
/// The top-level reqwest message is skipped because it only repeats the URL.
/// The result is never empty.
pub fn describe_transport_error(error: &reqwest::Error) -> String {
    let label = categorize_reqwest_error(error).as_str();
    let mut description = label.to_string();

    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        let text = cause.to_string();
        if !text.is_empty() && !text.eq_ignore_ascii_case(label) && !description.ends_with(&text) {
            description.push_str(": ");
            description.push_str(&text);
        }
        source = cause.source();
    }

    description
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn connection_refused_error() -> reqwest::Error {
        // Bind then drop a listener so the port is known to be closed.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);
        reqwest::Client::new()
            .get(format!("http://{addr}/"))
            .send()
            .await
            .expect_err("closed port should refuse the connection")
    }

    #[tokio::test]
    async fn test_connect_error_is_categorized() {
        let err = connection_refused_error().await;
        assert_eq!(
            categorize_reqwest_error(&err),
            ErrorType::HttpRequestConnectError
        );
    }

    #[tokio::test]
    async fn test_description_starts_with_label_and_keeps_cause() {
        let err = connection_refused_error().await;
        let description = describe_transport_error(&err);
        assert!(description.starts_with("Connection failed"), "{description}");
        assert!(
            description.len() > "Connection failed".len(),
            "source chain should be appended: {description}"
        );
    }

    #[test]
    fn test_builder_error_description_is_not_empty() {
        let err = reqwest::Client::new()
            .get("not a url")
            .build()
            .expect_err("relative URL should not build");
        assert_eq!(
            categorize_reqwest_error(&err),
            ErrorType::HttpRequestBuilderError
        );
        assert!(!describe_transport_error(&err).is_empty());
    }
}
