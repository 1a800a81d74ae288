//! Seams to the outside world: run persistence and image lookup.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use siteforge_design::DesignBrief;
use siteforge_progress::GenerationLog;
use siteforge_utils::types::{GeneratedFile, IntentManifest};

/// Failure reported by a collaborator. Never fatal to a run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    #[error("Persistence failed: {0}")]
    Persistence(String),

    #[error("Asset lookup failed: {0}")]
    Asset(String),
}

/// Everything the persistence collaborator stores for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSnapshot {
    pub run_id: Uuid,
    pub prompt: String,
    pub manifest: Option<IntentManifest>,
    pub brief: Option<DesignBrief>,
    pub files: Vec<GeneratedFile>,
    pub log: GenerationLog,
    pub updated_at: DateTime<Utc>,
}

#[async_trait]
pub trait PersistenceStore: Send + Sync {
    async fn save(&self, run_id: Uuid, snapshot: &RunSnapshot) -> Result<(), CollaboratorError>;

    async fn load(&self, run_id: Uuid) -> Result<Option<RunSnapshot>, CollaboratorError>;
}

#[async_trait]
pub trait AssetProvider: Send + Sync {
    /// URL of an image matching `prompt`, if the provider has one.
    async fn request_image(&self, prompt: &str) -> Result<Option<String>, CollaboratorError>;
}

/// Process-local store, last write wins.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    runs: Mutex<HashMap<Uuid, RunSnapshot>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.runs.lock().map_or(0, |runs| runs.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PersistenceStore for InMemoryStore {
    async fn save(&self, run_id: Uuid, snapshot: &RunSnapshot) -> Result<(), CollaboratorError> {
        let mut runs = self
            .runs
            .lock()
            .map_err(|e| CollaboratorError::Persistence(e.to_string()))?;
        runs.insert(run_id, snapshot.clone());
        Ok(())
    }

    async fn load(&self, run_id: Uuid) -> Result<Option<RunSnapshot>, CollaboratorError> {
        let runs = self
            .runs
            .lock()
            .map_err(|e| CollaboratorError::Persistence(e.to_string()))?;
        Ok(runs.get(&run_id).cloned())
    }
}

/// Discards every snapshot.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopStore;

#[async_trait]
impl PersistenceStore for NoopStore {
    async fn save(&self, _run_id: Uuid, _snapshot: &RunSnapshot) -> Result<(), CollaboratorError> {
        Ok(())
    }

    async fn load(&self, _run_id: Uuid) -> Result<Option<RunSnapshot>, CollaboratorError> {
        Ok(None)
    }
}

/// Never has an image; the orchestrator falls back to its own table.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAssets;

#[async_trait]
impl AssetProvider for NoAssets {
    async fn request_image(&self, _prompt: &str) -> Result<Option<String>, CollaboratorError> {
        Ok(None)
    }
}
