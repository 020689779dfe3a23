//! UP/DOWN classification.
//!
//! A pure mapping from (status code, transport error) to a status label and the
//! reason text written to the log and alert emails.

use crate::config::{UpPolicy, HTTP_STATUS_TEAPOT};

/// Binary reachability status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusLabel {
    Up,
    Down,
}

impl StatusLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusLabel::Up => "UP",
            StatusLabel::Down => "DOWN",
        }
    }
}

impl std::fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // `pad` so width specifiers like `{:<5}` apply.
        f.pad(self.as_str())
    }
}

/// Result of classifying one probe outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub label: StatusLabel,
    /// Empty when UP
    pub error_description: String,
}

impl Classification {
    pub fn is_up(&self) -> bool {
        self.label == StatusLabel::Up
    }
}

/// Short reason phrase for the status codes worth explaining in an alert.
/// Codes outside this table get no suffix.
pub fn http_description(code: u16) -> Option<&'static str> {
    let description = match code {
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        408 => "Request Timeout",
        418 => "I'm a Teapot",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => return None,
    };
    Some(description)
}

/// Returns true when `code` counts as UP under `policy`, ignoring transport errors.
pub fn is_up_status(code: u16, policy: &UpPolicy) -> bool {
    (policy.min..=policy.max).contains(&code) || (policy.teapot_is_up && code == HTTP_STATUS_TEAPOT)
}

/// Classifies a probe outcome.
///
/// UP iff there is no transport error and the code is inside the policy range
/// (or is 418 with the teapot override on). A DOWN result always carries a
/// non-empty reason: the transport error verbatim, `HTTP <code>` with an
/// optional reason phrase, or `Unknown error` when neither is available.
pub fn classify(http_status_code: u16, transport_error: &str, policy: &UpPolicy) -> Classification {
    if transport_error.is_empty() && is_up_status(http_status_code, policy) {
        return Classification {
            label: StatusLabel::Up,
            error_description: String::new(),
        };
    }

    let error_description = if !transport_error.is_empty() {
        transport_error.to_string()
    } else if http_status_code > 0 {
        match http_description(http_status_code) {
            Some(text) => format!("HTTP {http_status_code} ({text})"),
            None => format!("HTTP {http_status_code}"),
        }
    } else {
        UNKNOWN_ERROR.to_string()
    };

    Classification {
        label: StatusLabel::Down,
        error_description,
    }
}

/// Reason used when a probe produced neither a status code nor an error, and
/// for probe tasks that faulted.
pub const UNKNOWN_ERROR: &str = "Unknown error";

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> UpPolicy {
        UpPolicy::default()
    }

    #[test]
    fn test_success_and_redirect_range_is_up() {
        for code in 200..=399 {
            let c = classify(code, "", &policy());
            assert!(c.is_up(), "code {code} should be UP");
            assert!(c.error_description.is_empty());
        }
    }

    #[test]
    fn test_teapot_is_up_with_override() {
        let c = classify(418, "", &policy());
        assert_eq!(c.label, StatusLabel::Up);
    }

    #[test]
    fn test_teapot_is_down_without_override() {
        let strict = UpPolicy {
            teapot_is_up: false,
            ..policy()
        };
        let c = classify(418, "", &strict);
        assert_eq!(c.label, StatusLabel::Down);
        assert_eq!(c.error_description, "HTTP 418 (I'm a Teapot)");
    }

    #[test]
    fn test_everything_else_is_down() {
        for code in (0..200).chain(400..418).chain(419..=999) {
            let c = classify(code, "", &policy());
            assert!(!c.is_up(), "code {code} should be DOWN");
            assert!(!c.error_description.is_empty());
        }
    }

    #[test]
    fn test_transport_error_wins_over_status() {
        let c = classify(200, "Operation timed out", &policy());
        assert_eq!(c.label, StatusLabel::Down);
        assert_eq!(c.error_description, "Operation timed out");
    }

    #[test]
    fn test_transport_error_is_copied_verbatim() {
        let text = "Connection failed: tcp connect error: Connection refused (os error 111)";
        let c = classify(0, text, &policy());
        assert_eq!(c.error_description, text);
    }

    #[test]
    fn test_mapped_code_gets_reason_suffix() {
        assert_eq!(
            classify(404, "", &policy()).error_description,
            "HTTP 404 (Not Found)"
        );
        assert_eq!(
            classify(503, "", &policy()).error_description,
            "HTTP 503 (Service Unavailable)"
        );
    }

    #[test]
    fn test_unmapped_code_has_no_suffix() {
        assert_eq!(classify(599, "", &policy()).error_description, "HTTP 599");
        assert_eq!(classify(410, "", &policy()).error_description, "HTTP 410");
    }

    #[test]
    fn test_no_code_no_error_is_unknown() {
        let c = classify(0, "", &policy());
        assert_eq!(c.label, StatusLabel::Down);
        assert_eq!(c.error_description, "Unknown error");
    }

    #[test]
    fn test_custom_range() {
        let narrow = UpPolicy {
            min: 200,
            max: 299,
            teapot_is_up: false,
        };
        assert!(classify(204, "", &narrow).is_up());
        let c = classify(301, "", &narrow);
        assert!(!c.is_up());
        assert_eq!(c.error_description, "HTTP 301");
    }

    #[test]
    fn test_status_label_display_pads() {
        assert_eq!(format!("{:<5}|", StatusLabel::Up), "UP   |");
        assert_eq!(format!("{}", StatusLabel::Down), "DOWN");
    }
}
