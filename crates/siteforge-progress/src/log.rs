//! The append-only generation log.

use serde::{Deserialize, Serialize};
use tracing::debug;

use siteforge_utils::LogError;

use crate::step::{GenerationLogStep, StepKind};

/// Ordered steps plus the completion flag; the unit the wire format carries.
///
/// Appends are rejected once the log is sealed. A `complete` or `error` step
/// seals it, so a terminal step is always the last one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationLog {
    log: Vec<GenerationLogStep>,
    #[serde(rename = "isComplete")]
    is_complete: bool,
}

impl GenerationLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a log from decoded parts.
    #[must_use]
    pub fn from_parts(log: Vec<GenerationLogStep>, is_complete: bool) -> Self {
        Self { log, is_complete }
    }

    #[must_use]
    pub fn steps(&self) -> &[GenerationLogStep] {
        &self.log
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.log.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    #[must_use]
    pub fn last(&self) -> Option<&GenerationLogStep> {
        self.log.last()
    }

    /// Append a step, closing any open text/thought step first.
    pub fn push(&mut self, mut step: GenerationLogStep) -> Result<(), LogError> {
        if self.is_complete {
            return Err(LogError::Sealed);
        }
        self.close_in_progress();
        if !step.kind.is_extendable() {
            step.in_progress = false;
        }
        if step.kind.is_terminal() {
            self.is_complete = true;
        }
        self.log.push(step);
        Ok(())
    }

    /// Append a text or thought step that later deltas can extend.
    pub fn open(&mut self, mut step: GenerationLogStep) -> Result<(), LogError> {
        step.in_progress = step.kind.is_extendable();
        self.push(step)
    }

    /// Append `delta` to the open text/thought step.
    pub fn extend(&mut self, delta: &str) -> Result<(), LogError> {
        if self.is_complete {
            return Err(LogError::Sealed);
        }
        match self.log.last_mut() {
            Some(step) if step.in_progress => {
                step.message.push_str(delta);
                Ok(())
            }
            _ => Err(LogError::NoInProgressStep),
        }
    }

    /// Mark the open step, if any, as finished.
    pub fn close_in_progress(&mut self) {
        if let Some(step) = self.log.last_mut() {
            step.in_progress = false;
        }
    }

    /// Append the terminal `complete` step.
    pub fn complete(&mut self, message: impl Into<String>, duration_ms: u64) -> Result<(), LogError> {
        self.push(GenerationLogStep::complete(message, duration_ms))
    }

    /// Append the terminal `error` step.
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), LogError> {
        self.push(GenerationLogStep::error(message))
    }

    /// Seal without appending; used when a terminal step cannot be written.
    pub fn seal(&mut self) {
        self.close_in_progress();
        self.is_complete = true;
    }

    /// Replace this log with a persisted one.
    ///
    /// Refused while a run is live: more than one step recorded and no
    /// terminal step yet.
    pub fn restore(&mut self, persisted: GenerationLog) -> Result<(), LogError> {
        if !self.is_complete && self.log.len() > 1 {
            return Err(LogError::RunInFlight {
                steps: self.log.len(),
            });
        }
        debug!(
            steps = persisted.len(),
            complete = persisted.is_complete,
            "Restoring generation log from persisted state"
        );
        *self = persisted;
        Ok(())
    }

    /// Number of steps of `kind`.
    #[must_use]
    pub fn count(&self, kind: StepKind) -> usize {
        self.log.iter().filter(|s| s.kind == kind).count()
    }
}
