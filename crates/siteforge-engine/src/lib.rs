//! Generation orchestration for siteforge.
//!
//! [`GenerationOrchestrator`] turns a prompt into a file set: it enhances the
//! prompt, extracts an [`IntentManifest`](siteforge_utils::types::IntentManifest),
//! drafts a design brief that avoids recent duplicates, scaffolds the project,
//! generates one component per section through the provider router (with
//! template fallbacks), and assembles the app. Progress is reported as an
//! append-only log over a channel; cancellation is a shared flag.

pub mod blueprint;
pub mod collaborators;
pub mod dispatch;
pub mod fallback;
pub mod intent;
pub mod orchestrator;
pub mod scaffold;

pub use collaborators::{
    AssetProvider, CollaboratorError, InMemoryStore, NoAssets, NoopStore, PersistenceStore,
    RunSnapshot,
};
pub use dispatch::request_with_fallback;
pub use fallback::FallbackArtifactGenerator;
pub use intent::{IntentAnalysis, IntentAnalyzer, ManifestSource, PromptEnhancer, parse_manifest};
pub use orchestrator::{
    CancelHandle, GenerationOrchestrator, GenerationOutcome, GenerationRequest, ProgressEmitter,
    ProgressEvent, Stage,
};
