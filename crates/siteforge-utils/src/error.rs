use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::types::TaskCategory;

/// Trait for providing user-friendly error reporting with context and suggestions
pub trait UserFriendlyError {
    /// Get a user-friendly error message
    fn user_message(&self) -> String;

    /// Get contextual information about the error
    fn context(&self) -> Option<String>;

    /// Get suggested actions to resolve the error
    fn suggestions(&self) -> Vec<String>;

    /// Get the error category for grouping similar errors
    fn category(&self) -> ErrorCategory;
}

/// Categories of errors for better organization and handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Provider,
    Generation,
    Protocol,
    Cancellation,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "Configuration"),
            Self::Provider => write!(f, "Provider"),
            Self::Generation => write!(f, "Generation"),
            Self::Protocol => write!(f, "Protocol"),
            Self::Cancellation => write!(f, "Cancellation"),
        }
    }
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration file {path}: {reason}")]
    InvalidFile { path: String, reason: String },

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration validation failed: {error_count} error(s)")]
    ValidationFailed {
        errors: Vec<String>,
        error_count: usize,
    },
}

impl UserFriendlyError for ConfigError {
    fn user_message(&self) -> String {
        match self {
            Self::InvalidFile { path, reason } => {
                format!("Configuration file {path} could not be read: {reason}")
            }
            Self::MissingRequired(key) => format!("Required configuration '{key}' is missing"),
            Self::InvalidValue { key, value } => {
                format!("Configuration '{key}' has invalid value: {value}")
            }
            Self::ValidationFailed { errors, .. } => format!(
                "Configuration validation failed with {} errors: {}",
                errors.len(),
                errors.join(", ")
            ),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::InvalidFile { .. } => Some(
                "siteforge reads TOML from --config, SITEFORGE_CONFIG, or the nearest .siteforge/config.toml."
                    .to_string(),
            ),
            Self::InvalidValue { key, .. } => Some(format!(
                "The '{key}' option has specific format requirements."
            )),
            _ => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidFile { .. } => vec![
                "Check the file for TOML syntax errors".to_string(),
                "Run 'siteforge config' to see which file is being loaded".to_string(),
            ],
            Self::MissingRequired(key) => vec![format!("Set '{key}' in the config file")],
            Self::InvalidValue { .. } | Self::ValidationFailed { .. } => vec![
                "Thresholds must be between 0 and 1; windows and capacities must be positive"
                    .to_string(),
            ],
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Configuration
    }
}

/// Errors raised by the provider router and backend adapters.
///
/// Every variant except `NoProviderAvailable` is tagged with the backend id so
/// the orchestrator can decide whether to advance to the next backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// No configured, non-exhausted backend exists for the category.
    #[error("No provider available for category '{category}'")]
    NoProviderAvailable { category: TaskCategory },

    /// Backend answered with a non-2xx status.
    #[error("{backend} returned HTTP {status}: {body}")]
    RequestFailed {
        backend: String,
        status: u16,
        body: String,
    },

    /// Network-level failure before a response arrived.
    #[error("{backend} transport error: {message}")]
    Transport { backend: String, message: String },

    #[error("{backend} timed out after {duration:?}")]
    Timeout { backend: String, duration: Duration },

    /// Response arrived but its envelope could not be unwrapped.
    #[error("{backend} returned an unusable response: {message}")]
    InvalidResponse { backend: String, message: String },

    #[error("Provider misconfiguration: {0}")]
    Misconfiguration(String),
}

impl ProviderError {
    /// Backend id this error is tagged with, if any.
    #[must_use]
    pub fn backend(&self) -> Option<&str> {
        match self {
            Self::RequestFailed { backend, .. }
            | Self::Transport { backend, .. }
            | Self::Timeout { backend, .. }
            | Self::InvalidResponse { backend, .. } => Some(backend),
            Self::NoProviderAvailable { .. } | Self::Misconfiguration(_) => None,
        }
    }

    /// True when the backend signalled quota or billing exhaustion (429/402).
    #[must_use]
    pub fn indicates_exhaustion(&self) -> bool {
        matches!(
            self,
            Self::RequestFailed {
                status: 429 | 402,
                ..
            }
        )
    }
}

impl UserFriendlyError for ProviderError {
    fn user_message(&self) -> String {
        match self {
            Self::NoProviderAvailable { category } => {
                format!("No text-generation backend is configured for '{category}' tasks")
            }
            Self::RequestFailed { backend, status, .. } => {
                format!("Backend '{backend}' rejected the request with HTTP {status}")
            }
            Self::Transport { backend, message } => {
                format!("Backend '{backend}' could not be reached: {message}")
            }
            Self::Timeout { backend, duration } => {
                format!("Backend '{backend}' did not answer within {duration:?}")
            }
            Self::InvalidResponse { backend, message } => {
                format!("Backend '{backend}' sent a response siteforge could not read: {message}")
            }
            Self::Misconfiguration(msg) => format!("Provider configuration error: {msg}"),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::NoProviderAvailable { .. } => Some(
                "A backend counts as configured when its API key environment variable is set."
                    .to_string(),
            ),
            Self::RequestFailed { status: 401 | 403, .. } => {
                Some("Authentication failed; the API key may be invalid or revoked.".to_string())
            }
            Self::RequestFailed { status: 429, .. } => {
                Some("The backend is rate limiting or out of quota.".to_string())
            }
            _ => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::NoProviderAvailable { .. } => vec![
                "Export ANTHROPIC_API_KEY, OPENAI_API_KEY, OPENROUTER_API_KEY or GEMINI_API_KEY"
                    .to_string(),
                "Run 'siteforge providers' to see which backends are configured".to_string(),
            ],
            Self::Timeout { .. } => {
                vec!["Raise [llm] request_timeout_secs in the config file".to_string()]
            }
            _ => Vec::new(),
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Provider
    }
}

/// Errors raised while appending to or restoring a generation log.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LogError {
    /// The log already carries `isComplete = true`.
    #[error("Generation log is sealed; no further steps may be appended")]
    Sealed,

    #[error("No in-progress text or thought step to extend")]
    NoInProgressStep,

    /// A live run refused to be reinitialized from persisted state.
    #[error("Run is in flight with {steps} steps; refusing to restore persisted log")]
    RunInFlight { steps: usize },
}

/// Errors raised while decoding the progress-log wire format.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    #[error("No progress log payload found in input")]
    MissingPayload,

    #[error("Malformed progress log payload: {0}")]
    Malformed(String),
}

/// Terminal failure of a generation run.
///
/// Only conditions the pipeline cannot recover from locally end up here; every
/// variant is reported to the caller together with a terminal `error` step.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(#[source] ProviderError),

    #[error("Generation cancelled during {stage}")]
    Cancelled { stage: String },

    #[error("Failed to assemble project: {reason}")]
    Assembly { reason: String },

    #[error("Generation log error: {0}")]
    Log(#[from] LogError),

    #[error("Failed to reload run {run_id}: {reason}")]
    Reload { run_id: String, reason: String },
}

impl UserFriendlyError for GenerationError {
    fn user_message(&self) -> String {
        match self {
            Self::ProviderUnavailable(inner) => inner.user_message(),
            Self::Cancelled { stage } => format!("Generation was cancelled during {stage}"),
            Self::Assembly { reason } => format!("The project could not be assembled: {reason}"),
            Self::Log(inner) => format!("The progress log rejected an update: {inner}"),
            Self::Reload { run_id, reason } => format!("Run {run_id} could not be reloaded: {reason}"),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::ProviderUnavailable(inner) => inner.context(),
            Self::Cancelled { .. } => {
                Some("Files generated before cancellation were discarded.".to_string())
            }
            _ => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ProviderUnavailable(inner) => inner.suggestions(),
            _ => Vec::new(),
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::ProviderUnavailable(_) => ErrorCategory::Provider,
            Self::Cancelled { .. } => ErrorCategory::Cancellation,
            Self::Assembly { .. } => ErrorCategory::Generation,
            Self::Log(_) => ErrorCategory::Protocol,
            Self::Reload { .. } => ErrorCategory::Generation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhaustion_detection_covers_429_and_402() {
        let quota = ProviderError::RequestFailed {
            backend: "openai".to_string(),
            status: 429,
            body: "slow down".to_string(),
        };
        let billing = ProviderError::RequestFailed {
            backend: "openai".to_string(),
            status: 402,
            body: "pay up".to_string(),
        };
        let server = ProviderError::RequestFailed {
            backend: "openai".to_string(),
            status: 500,
            body: String::new(),
        };

        assert!(quota.indicates_exhaustion());
        assert!(billing.indicates_exhaustion());
        assert!(!server.indicates_exhaustion());
    }

    #[test]
    fn test_backend_tag_is_exposed() {
        let err = ProviderError::Transport {
            backend: "gemini".to_string(),
            message: "connection reset".to_string(),
        };
        assert_eq!(err.backend(), Some("gemini"));

        let none = ProviderError::NoProviderAvailable {
            category: TaskCategory::Code,
        };
        assert_eq!(none.backend(), None);
        assert!(none.to_string().contains("code"));
    }

    #[test]
    fn test_generation_error_keeps_original_cause() {
        use std::error::Error as _;

        let err = GenerationError::ProviderUnavailable(ProviderError::NoProviderAvailable {
            category: TaskCategory::Code,
        });
        let source = err.source().expect("cause attached");
        assert!(source.to_string().contains("No provider available"));
        assert_eq!(err.category(), ErrorCategory::Provider);
        assert!(!err.suggestions().is_empty());
    }
}
