//! Logging infrastructure for siteforge
//!
//! Sets up a `tracing` subscriber on stderr and provides the span/event helpers
//! the pipeline uses so every stage logs with the same structured fields.

use std::io::IsTerminal;
use tracing::{Level, error, info, span, warn};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::redaction::redact_error_message;

fn use_color() -> bool {
    std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// Default filter directive for the given verbosity.
#[must_use]
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "siteforge=debug,info"
    } else {
        "siteforge=info,warn"
    }
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins over the defaults. With `json` set, events are emitted as
/// one JSON object per line; otherwise a compact human format is used.
/// Output always goes to stderr so stdout stays clean for generated content.
pub fn init_tracing(verbose: bool, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter(verbose)))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else if verbose {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(use_color())
                    .with_span_events(FmtSpan::CLOSE)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(use_color())
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()?;
    }

    Ok(())
}

/// Span wrapping one pipeline stage of one run.
pub fn stage_span(run_id: &str, stage: &str) -> tracing::Span {
    span!(Level::INFO, "stage", run_id = %run_id, stage = %stage)
}

pub fn log_stage_start(run_id: &str, stage: &str) {
    info!(run_id = %run_id, stage = %stage, "Stage started");
}

pub fn log_stage_complete(run_id: &str, stage: &str, duration_ms: u128) {
    info!(
        run_id = %run_id,
        stage = %stage,
        duration_ms = %duration_ms,
        "Stage completed"
    );
}

/// Log a stage failure. The message is redacted before it is recorded.
pub fn log_stage_error(run_id: &str, stage: &str, message: &str) {
    let sanitized = redact_error_message(message);
    error!(run_id = %run_id, stage = %stage, error = %sanitized, "Stage failed");
}

/// Log a backend failure that the pipeline will recover from.
pub fn log_backend_failure(backend: &str, message: &str) {
    let sanitized = redact_error_message(message);
    warn!(backend = %backend, error = %sanitized, "Backend request failed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_by_verbosity() {
        assert_eq!(default_filter(false), "siteforge=info,warn");
        assert_eq!(default_filter(true), "siteforge=debug,info");
    }

    #[test]
    fn test_stage_helpers_do_not_panic_without_subscriber() {
        let span = stage_span("run-1", "intent");
        let _guard = span.enter();
        log_stage_start("run-1", "intent");
        log_stage_complete("run-1", "intent", 12);
        log_stage_error("run-1", "intent", "sk-abcdefghijklmnopqrstuvwxyz0123");
        log_backend_failure("openai", "HTTP 500");
    }
}
