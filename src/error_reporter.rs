//! Rendering of errors for the terminal.
//!
//! Errors that implement [`UserFriendlyError`] get their message, context and
//! numbered suggestions; anything else is printed as a redacted cause chain.

use std::fmt::Write as _;

use siteforge_utils::redaction::redact_error_message;
use siteforge_utils::{
    ConfigError, GenerationError, ProviderError, UserFriendlyError, WireError,
};

/// Multi-line report for one user-facing error.
#[must_use]
pub fn render_report<E: UserFriendlyError + ?Sized>(error: &E, operation: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "✗ {} error during {operation}: {}",
        error.category(),
        redact_error_message(&error.user_message())
    );
    if let Some(context) = error.context() {
        let _ = writeln!(out, "\n  Context: {context}");
    }
    let suggestions = error.suggestions();
    if !suggestions.is_empty() {
        let _ = writeln!(out, "\n  Suggestions:");
        for (i, suggestion) in suggestions.iter().enumerate() {
            let _ = writeln!(out, "    {}. {suggestion}", i + 1);
        }
    }
    out.trim_end().to_string()
}

/// Report for an error returned by a command handler.
#[must_use]
pub fn report_anyhow(error: &anyhow::Error, operation: &str) -> String {
    if let Some(e) = error.downcast_ref::<GenerationError>() {
        return render_report(e, operation);
    }
    if let Some(e) = error.downcast_ref::<ConfigError>() {
        return render_report(e, operation);
    }
    if let Some(e) = error.downcast_ref::<ProviderError>() {
        return render_report(e, operation);
    }
    if let Some(e) = error.downcast_ref::<WireError>() {
        return format!(
            "✗ Protocol error during {operation}: {}\n\n  Suggestions:\n    1. Pass the raw wire string, optionally prefixed with CHAIN:",
            redact_error_message(&e.to_string())
        );
    }

    let mut out = format!(
        "✗ Error during {operation}: {}",
        redact_error_message(&error.to_string())
    );
    for cause in error.chain().skip(1) {
        let _ = write!(out, "\n  Caused by: {}", redact_error_message(&cause.to_string()));
    }
    let _ = write!(out, "\n\n  Run with --verbose for more detailed output");
    out
}
