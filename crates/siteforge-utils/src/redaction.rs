//! Secret redaction for log lines and user-facing error output.
//!
//! Backend error bodies sometimes echo request headers or URLs; everything
//! that ends up in a log line or on stderr passes through here first.

use once_cell::sync::Lazy;
use regex::Regex;

static API_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:sk-|sk-ant-|pk_|AIza|Bearer )[a-zA-Z0-9_\-]{20,}").expect("static regex")
});

static LONG_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[a-zA-Z0-9_\-]{32,}\b").expect("static regex"));

static URL_WITH_CREDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://[a-zA-Z0-9_]+:[^:@\s]+@").expect("static regex"));

static KEY_QUERY_PARAM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([?&]key=)[^&\s]+").expect("static regex"));

/// Redact API keys, credentialed URLs and `?key=` query parameters.
#[must_use]
pub fn redact_error_message(message: &str) -> String {
    let redacted = URL_WITH_CREDS.replace_all(message, "[REDACTED]@");
    let redacted = KEY_QUERY_PARAM.replace_all(&redacted, "${1}[REDACTED]");
    let redacted = API_KEY.replace_all(&redacted, "[REDACTED]");
    LONG_KEY.replace_all(&redacted, "[REDACTED]").into_owned()
}

/// Redact and cap a backend response body so it can be logged.
#[must_use]
pub fn redact_body_for_log(body: &str, max_chars: usize) -> String {
    let redacted = redact_error_message(body);
    if redacted.chars().count() <= max_chars {
        return redacted;
    }
    let mut truncated: String = redacted.chars().take(max_chars).collect();
    truncated.push_str("...");
    truncated
}
