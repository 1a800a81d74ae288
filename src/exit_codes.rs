//! Process exit codes and the mapping from domain errors onto them.

use siteforge_utils::{ConfigError, GenerationError, ProviderError, WireError};

/// Exit code returned by `cli::run()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExitCode(i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);

    /// Generation failed, or any error without a more specific code.
    pub const FAILURE: ExitCode = ExitCode(1);

    /// Invalid configuration or provider setup.
    pub const CONFIG: ExitCode = ExitCode(2);

    /// The run was cancelled (SIGINT convention).
    pub const CANCELLED: ExitCode = ExitCode(130);

    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }
}

impl From<&GenerationError> for ExitCode {
    fn from(err: &GenerationError) -> Self {
        match err {
            GenerationError::Cancelled { .. } => Self::CANCELLED,
            _ => Self::FAILURE,
        }
    }
}

impl From<&ConfigError> for ExitCode {
    fn from(_: &ConfigError) -> Self {
        Self::CONFIG
    }
}

impl From<&ProviderError> for ExitCode {
    fn from(err: &ProviderError) -> Self {
        match err {
            ProviderError::Misconfiguration(_) => Self::CONFIG,
            _ => Self::FAILURE,
        }
    }
}

impl From<&WireError> for ExitCode {
    fn from(_: &WireError) -> Self {
        Self::FAILURE
    }
}

/// Exit code for an error coming out of a command handler.
#[must_use]
pub fn exit_code_for(error: &anyhow::Error) -> ExitCode {
    if let Some(e) = error.downcast_ref::<GenerationError>() {
        e.into()
    } else if let Some(e) = error.downcast_ref::<ConfigError>() {
        e.into()
    } else if let Some(e) = error.downcast_ref::<ProviderError>() {
        e.into()
    } else if let Some(e) = error.downcast_ref::<WireError>() {
        e.into()
    } else {
        ExitCode::FAILURE
    }
}
