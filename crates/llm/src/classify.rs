//! Mapping of backend-native failures onto [`FailureKind`].
//!
//! Two policies live here and nowhere else:
//!
//! - **Structured**: the backend reports a typed outcome (an HTTP status, a
//!   transport error, an undecodable body) and the mapping is direct.
//!   Both adapters route every non-2xx response through [`classify_status`].
//! - **Keyword heuristic**: the backend's failure is only available as text,
//!   so the text is searched case-insensitively. `quota`, `rate`, or `limit`
//!   means `rate_limit`; `api` or `status` means `api_error`; anything else
//!   is `generic_error`. Precision is best-effort: the substrings also occur
//!   inside unrelated words.

use pipeline::{FailureKind, ProviderFailure, ProviderKind};
use reqwest::StatusCode;

const RATE_LIMIT_KEYWORDS: [&str; 3] = ["quota", "rate", "limit"];
const API_ERROR_KEYWORDS: [&str; 2] = ["api", "status"];

/// `error.status` Google APIs report for quota exhaustion.
const QUOTA_STATUS: &str = "RESOURCE_EXHAUSTED";

/// Maximum characters of an upstream body copied into a failure detail.
const MAX_DETAIL_CHARS: usize = 500;

/// Classifies a non-success HTTP status.
///
/// 429, or a Google-style `error.status` of `RESOURCE_EXHAUSTED`, is
/// `rate_limit`; every other status is `api_error`. The message text is never
/// consulted.
pub fn classify_status(
    provider: ProviderKind,
    model: &str,
    status: StatusCode,
    body: &str,
) -> ProviderFailure {
    let quota_exhausted = upstream_status(body).as_deref() == Some(QUOTA_STATUS);
    let kind = if status == StatusCode::TOO_MANY_REQUESTS || quota_exhausted {
        FailureKind::RateLimit
    } else {
        FailureKind::ApiError
    };
    let detail = format!("HTTP {status}: {}", upstream_message(body));
    ProviderFailure::new(kind, provider.as_str(), model, detail)
}

/// Classifies a transport-level failure (connect, timeout, TLS, ...) from a
/// backend with a structured error surface.
pub fn classify_transport(
    provider: ProviderKind,
    model: &str,
    error: reqwest::Error,
) -> ProviderFailure {
    let kind = if error.is_decode() {
        FailureKind::UnknownError
    } else {
        FailureKind::GenericError
    };
    ProviderFailure::new(kind, provider.as_str(), model, error.without_url().to_string())
}

/// Classifies a failure known only by its message text.
pub fn classify_message(provider: ProviderKind, model: &str, message: &str) -> ProviderFailure {
    let lowered = message.to_lowercase();
    let kind = if RATE_LIMIT_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        FailureKind::RateLimit
    } else if API_ERROR_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        FailureKind::ApiError
    } else {
        FailureKind::GenericError
    };
    ProviderFailure::new(kind, provider.as_str(), model, message)
}

/// Pulls the human-readable message out of an error body.
///
/// Both supported backends use `{"error": {"message": "..."}}`; anything else
/// is returned verbatim, truncated.
pub fn upstream_message(body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        });
    let message = from_json.unwrap_or_else(|| body.trim().to_string());
    truncate(&message, MAX_DETAIL_CHARS)
}

fn upstream_status(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .pointer("/error/status")?
        .as_str()
        .map(str::to_string)
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_429_is_rate_limit_and_others_are_api_errors() {
        let body = r#"{"error":{"message":"Rate limit reached for model","type":"tokens"}}"#;
        let failure = classify_status(ProviderKind::Groq, "m", StatusCode::TOO_MANY_REQUESTS, body);
        assert_eq!(failure.kind, FailureKind::RateLimit);
        assert_eq!(failure.detail, "HTTP 429 Too Many Requests: Rate limit reached for model");

        let failure = classify_status(ProviderKind::Groq, "m", StatusCode::BAD_GATEWAY, "oops");
        assert_eq!(failure.kind, FailureKind::ApiError);
        assert_eq!(failure.provider, "groq");
    }

    #[test]
    fn google_status_decides_over_message_text() {
        let not_found = r#"{"error":{"code":404,"message":"models/gemini-typo is not found for API version v1beta, or is not supported for generateContent.","status":"NOT_FOUND"}}"#;
        let failure = classify_status(ProviderKind::Gemini, "gemini-typo", StatusCode::NOT_FOUND, not_found);
        assert_eq!(failure.kind, FailureKind::ApiError);

        let exhausted = r#"{"error":{"code":403,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
        let failure = classify_status(ProviderKind::Gemini, "m", StatusCode::FORBIDDEN, exhausted);
        assert_eq!(failure.kind, FailureKind::RateLimit);
    }

    #[test]
    fn keyword_heuristic_is_case_insensitive_and_ordered() {
        let classify = |msg: &str| classify_message(ProviderKind::Gemini, "m", msg).kind;

        assert_eq!(classify("Resource has been exhausted (check QUOTA)"), FailureKind::RateLimit);
        assert_eq!(classify("Request LIMIT exceeded"), FailureKind::RateLimit);
        // Rate-limit keywords win over api keywords.
        assert_eq!(classify("API rate exceeded"), FailureKind::RateLimit);
        assert_eq!(classify("HTTP status 503: backend unavailable"), FailureKind::ApiError);
        assert_eq!(classify("invalid API key"), FailureKind::ApiError);
        assert_eq!(classify("connection reset by peer"), FailureKind::GenericError);
    }

    #[test]
    fn heuristic_keeps_the_original_detail() {
        let failure = classify_message(ProviderKind::Gemini, "gemini-1.5-flash", "Boom");
        assert_eq!(failure.detail, "Boom");
        assert_eq!(failure.model, "gemini-1.5-flash");
    }

    #[test]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(MAX_DETAIL_CHARS + 10);
        let message = upstream_message(&body);
        assert!(message.ends_with("..."));
        assert_eq!(message.chars().count(), MAX_DETAIL_CHARS + 3);
    }
}
