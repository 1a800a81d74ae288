//! siteforge: prompt-to-site generation with provider routing, design
//! de-duplication and a replayable progress log.
//!
//! The binary is a thin shell over the workspace crates:
//!
//! - [`siteforge_engine`] runs the staged pipeline
//! - [`siteforge_llm`] routes requests across text-generation backends
//! - [`siteforge_design`] drafts design briefs and guards against repeats
//! - [`siteforge_progress`] owns the progress log and its wire format
//! - [`siteforge_config`] discovers and validates configuration
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use siteforge::{CancelHandle, Config, GenerationOrchestrator, GenerationRequest, ProgressEmitter};
//! use siteforge_llm::ProviderRouter;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let config = Config::minimal_for_testing();
//! let router = Arc::new(ProviderRouter::from_config(&config)?);
//! let orchestrator = GenerationOrchestrator::new(router, &config);
//! let outcome = orchestrator
//!     .run(
//!         &GenerationRequest::new("skate shop, dark and edgy"),
//!         &ProgressEmitter::disabled(),
//!         &CancelHandle::new(),
//!     )
//!     .await?;
//! println!("{} files", outcome.files.len());
//! # Ok(())
//! # }
//! ```

pub use siteforge_config::{CliArgs, Config};
pub use siteforge_design::DesignBrief;
pub use siteforge_engine::{
    CancelHandle, GenerationOrchestrator, GenerationOutcome, GenerationRequest, ProgressEmitter,
    ProgressEvent, Stage,
};
pub use siteforge_progress::{GenerationLog, GenerationLogStep, StepKind};
pub use siteforge_utils::{ErrorCategory, GenerationError, UserFriendlyError};

pub mod exit_codes;
pub use exit_codes::ExitCode;

#[doc(hidden)]
pub mod cli;
#[doc(hidden)]
pub mod error_reporter;
