use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use siteforge_utils::types::GeneratedFile;

/// Discriminator of a log step; serialized as the step's `type` field.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StepKind {
    Plan,
    Thought,
    File,
    Text,
    Image,
    Summary,
    Complete,
    Error,
}

impl StepKind {
    /// `complete` and `error` seal the log.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Error)
    }

    /// Only free text may be streamed into an open step.
    #[must_use]
    pub const fn is_extendable(self) -> bool {
        matches!(self, Self::Text | Self::Thought)
    }
}

/// Optional structured data attached to a step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<GeneratedFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// Pipeline stage that emitted the step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
}

/// One entry of the generation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationLogStep {
    #[serde(rename = "type")]
    pub kind: StepKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<StepPayload>,
    /// Set while a text/thought step is still receiving content.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub in_progress: bool,
}

impl GenerationLogStep {
    #[must_use]
    pub fn new(kind: StepKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            payload: None,
            in_progress: false,
        }
    }

    #[must_use]
    pub fn plan(message: impl Into<String>) -> Self {
        Self::new(StepKind::Plan, message)
    }

    #[must_use]
    pub fn thought(message: impl Into<String>) -> Self {
        Self::new(StepKind::Thought, message)
    }

    #[must_use]
    pub fn text(message: impl Into<String>) -> Self {
        Self::new(StepKind::Text, message)
    }

    #[must_use]
    pub fn summary(message: impl Into<String>) -> Self {
        Self::new(StepKind::Summary, message)
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(StepKind::Error, message)
    }

    #[must_use]
    pub fn file(message: impl Into<String>, file: GeneratedFile) -> Self {
        Self::new(StepKind::File, message).with_payload(StepPayload {
            file: Some(file),
            ..StepPayload::default()
        })
    }

    #[must_use]
    pub fn image(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(StepKind::Image, message).with_payload(StepPayload {
            image_url: Some(url.into()),
            ..StepPayload::default()
        })
    }

    #[must_use]
    pub fn complete(message: impl Into<String>, duration_ms: u64) -> Self {
        Self::new(StepKind::Complete, message).with_payload(StepPayload {
            duration_ms: Some(duration_ms),
            ..StepPayload::default()
        })
    }

    #[must_use]
    pub fn with_payload(mut self, payload: StepPayload) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Tag the step with the stage that produced it.
    #[must_use]
    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.payload.get_or_insert_with(StepPayload::default).stage = Some(stage.into());
        self
    }

    #[must_use]
    pub fn stage(&self) -> Option<&str> {
        self.payload.as_ref()?.stage.as_deref()
    }

    #[must_use]
    pub fn generated_file(&self) -> Option<&GeneratedFile> {
        self.payload.as_ref()?.file.as_ref()
    }
}

impl fmt::Display for GenerationLogStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        if let Some(file) = self.generated_file() {
            if self.message.contains(&file.path) {
                write!(f, " ({} bytes)", file.content.len())?;
            } else {
                write!(f, " ({}, {} bytes)", file.path, file.content.len())?;
            }
        }
        if let Some(url) = self.payload.as_ref().and_then(|p| p.image_url.as_deref()) {
            write!(f, " <{url}>")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_as_type() {
        let step = GenerationLogStep::plan("Outline the site").with_stage("analyzing-intent");
        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["type"], "plan");
        assert_eq!(json["payload"]["stage"], "analyzing-intent");
        assert!(json.get("inProgress").is_none());
    }

    #[test]
    fn test_file_step_carries_language() {
        let step = GenerationLogStep::file(
            "Wrote hero",
            GeneratedFile::new("src/components/Hero.tsx", "export {}"),
        );
        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["payload"]["file"]["language"], "tsx");
        assert!(step.to_string().contains("src/components/Hero.tsx"));
    }

    #[test]
    fn test_display_names_file_path_once() {
        let step = GenerationLogStep::file(
            "Created Hero",
            GeneratedFile::new("src/components/Hero.tsx", ""),
        );
        assert_eq!(
            step.to_string(),
            "[file] Created Hero (src/components/Hero.tsx, 0 bytes)"
        );

        let named = GenerationLogStep::file(
            "Created package.json",
            GeneratedFile::new("package.json", "{}"),
        );
        assert_eq!(named.to_string(), "[file] Created package.json (2 bytes)");
    }

    #[test]
    fn test_terminal_and_extendable_kinds() {
        assert!(StepKind::Complete.is_terminal());
        assert!(StepKind::Error.is_terminal());
        assert!(!StepKind::Summary.is_terminal());
        assert!(StepKind::Thought.is_extendable());
        assert!(!StepKind::File.is_extendable());
    }

    #[test]
    fn test_unknown_payload_fields_are_tolerated() {
        let raw = r#"{"type":"image","message":"hero","payload":{"imageUrl":"u","extra":1}}"#;
        let step: GenerationLogStep = serde_json::from_str(raw).unwrap();
        assert_eq!(step.kind, StepKind::Image);
        assert_eq!(step.payload.unwrap().image_url.as_deref(), Some("u"));
    }
}
