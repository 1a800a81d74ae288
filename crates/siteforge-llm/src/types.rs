//! Core types for backend routing

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use siteforge_utils::error::ProviderError;
use siteforge_utils::types::TaskCategory;

/// Wire dialect a backend speaks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BackendKind {
    /// Messages API, `x-api-key` header.
    Anthropic,
    /// Chat completions, bearer token.
    OpenAi,
    /// Chat completions, bearer token plus attribution headers.
    OpenRouter,
    /// generateContent, key in the query string.
    Gemini,
}

/// Everything needed to call one backend.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendDescriptor {
    pub id: String,
    pub kind: BackendKind,
    pub base_url: String,
    pub model: String,
    /// `None` means the backend is registered but has no credentials.
    pub api_key: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl BackendDescriptor {
    /// A backend is usable only once its credentials are present.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    pub(crate) fn api_key_or_err(&self) -> Result<&str, ProviderError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                ProviderError::Misconfiguration(format!("backend '{}' has no API key", self.id))
            })
    }
}

/// One routed request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRequest {
    pub category: TaskCategory,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt_override: Option<String>,
}

impl ProviderRequest {
    #[must_use]
    pub fn new(category: TaskCategory, prompt: impl Into<String>) -> Self {
        Self {
            category,
            prompt: prompt.into(),
            system_prompt_override: None,
        }
    }

    #[must_use]
    pub fn with_system_prompt(mut self, system: impl Into<String>) -> Self {
        self.system_prompt_override = Some(system.into());
        self
    }

    /// The override if present, otherwise the category default.
    #[must_use]
    pub fn system_prompt(&self) -> &str {
        self.system_prompt_override
            .as_deref()
            .unwrap_or_else(|| default_system_prompt(self.category))
    }
}

/// Normalized backend answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderResponse {
    pub content: String,
    /// Id of the backend that produced `content`.
    pub backend: String,
    pub model: String,
}

/// System prompt used when a request does not carry its own.
#[must_use]
pub fn default_system_prompt(category: TaskCategory) -> &'static str {
    match category {
        TaskCategory::Code => {
            "You are a senior front-end engineer writing React + TypeScript components styled with Tailwind CSS. Reply with a single fenced code block and nothing else."
        }
        TaskCategory::Prose => {
            "You are a brand copywriter. Reply with plain prose, no markdown headings."
        }
        TaskCategory::Analysis => {
            "You are a product strategist. Reply with strict JSON only, no commentary."
        }
        TaskCategory::Vision => "You describe and critique visual designs precisely.",
        TaskCategory::Chat => "You are a helpful assistant.",
    }
}

/// The seam between the pipeline and the backends.
///
/// [`crate::ProviderRouter`] is the production implementation. Retry policy is
/// not part of this trait: callers walk [`ProviderGateway::candidates`] and
/// decide what to do with each failure.
#[async_trait]
pub trait ProviderGateway: Send + Sync {
    /// Ordered chain of usable backends for a category.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::NoProviderAvailable` when the chain is empty.
    async fn candidates(
        &self,
        category: TaskCategory,
        override_id: Option<&str>,
    ) -> Result<Vec<BackendDescriptor>, ProviderError>;

    /// Send one request to one backend. No retry, no fallback.
    async fn execute_request(
        &self,
        backend: &BackendDescriptor,
        request: &ProviderRequest,
    ) -> Result<ProviderResponse, ProviderError>;

    /// Skip this backend for the rest of the process.
    fn mark_exhausted(&self, backend_id: &str);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_backend_kind_strings() {
        assert_eq!(BackendKind::OpenAi.as_ref(), "openai");
        assert_eq!(BackendKind::from_str("openrouter").unwrap(), BackendKind::OpenRouter);
        assert_eq!(BackendKind::from_str("gemini").unwrap(), BackendKind::Gemini);
        assert!(BackendKind::from_str("cohere").is_err());
    }

    #[test]
    fn test_system_prompt_override_wins() {
        let req = ProviderRequest::new(TaskCategory::Code, "hero");
        assert!(req.system_prompt().contains("React"));

        let req = req.with_system_prompt("custom");
        assert_eq!(req.system_prompt(), "custom");
    }

    #[test]
    fn test_request_serializes_camel_case() {
        let req = ProviderRequest::new(TaskCategory::Analysis, "x").with_system_prompt("s");
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["category"], "analysis");
        assert_eq!(value["systemPromptOverride"], "s");
    }

    #[test]
    fn test_empty_key_is_unconfigured() {
        let mut backend = BackendDescriptor {
            id: "openai".to_string(),
            kind: BackendKind::OpenAi,
            base_url: String::new(),
            model: String::new(),
            api_key: Some(String::new()),
            max_tokens: 1,
            temperature: 0.0,
        };
        assert!(!backend.is_configured());
        backend.api_key = Some("k".to_string());
        assert!(backend.is_configured());
    }
}
