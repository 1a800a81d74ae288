use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Backend kinds siteforge knows how to talk to.
pub const KNOWN_PROVIDER_KINDS: &[&str] = &["anthropic", "openai", "openrouter", "gemini"];

/// Default ceiling for a single backend request in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// One `[llm.providers.<id>]` table.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// One of [`KNOWN_PROVIDER_KINDS`].
    pub kind: String,
    pub base_url: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub enabled: bool,
}

impl ProviderConfig {
    fn builtin(kind: &str, base_url: &str, api_key_env: &str, model: &str) -> Self {
        Self {
            kind: kind.to_string(),
            base_url: base_url.to_string(),
            api_key_env: api_key_env.to_string(),
            model: model.to_string(),
            max_tokens: 4096,
            temperature: 0.7,
            enabled: true,
        }
    }

    /// Read the API key from the configured environment variable.
    ///
    /// Empty values count as unset.
    #[must_use]
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

/// Built-in provider table, keyed by backend id.
#[must_use]
pub fn builtin_providers() -> BTreeMap<String, ProviderConfig> {
    let mut providers = BTreeMap::new();
    providers.insert(
        "anthropic".to_string(),
        ProviderConfig::builtin(
            "anthropic",
            "https://api.anthropic.com/v1/messages",
            "ANTHROPIC_API_KEY",
            "claude-sonnet-4-20250514",
        ),
    );
    providers.insert(
        "openai".to_string(),
        ProviderConfig::builtin(
            "openai",
            "https://api.openai.com/v1/chat/completions",
            "OPENAI_API_KEY",
            "gpt-4o",
        ),
    );
    providers.insert(
        "openrouter".to_string(),
        ProviderConfig::builtin(
            "openrouter",
            "https://openrouter.ai/api/v1/chat/completions",
            "OPENROUTER_API_KEY",
            "google/gemini-2.0-flash-lite-001",
        ),
    );
    providers.insert(
        "gemini".to_string(),
        ProviderConfig::builtin(
            "gemini",
            "https://generativelanguage.googleapis.com/v1beta",
            "GEMINI_API_KEY",
            "gemini-2.0-flash",
        ),
    );
    providers
}

/// `[llm]` section
#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    pub request_timeout_secs: u64,
    pub providers: BTreeMap<String, ProviderConfig>,
    /// Category name to ordered backend ids.
    pub routing: BTreeMap<String, Vec<String>>,
}

impl LlmConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            providers: builtin_providers(),
            routing: BTreeMap::new(),
        }
    }
}

/// `[design]` section
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DesignConfig {
    /// Overall similarity strictly above this rejects a brief.
    pub similarity_threshold: f64,
    /// Most recent same-industry records compared against.
    pub history_window: usize,
    /// Ring buffer capacity of the design history.
    pub history_capacity: usize,
    pub max_regenerations: u32,
    pub seed: Option<u64>,
}

impl Default for DesignConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.75,
            history_window: 10,
            history_capacity: 50,
            max_regenerations: 1,
            seed: None,
        }
    }
}

/// `[generation]` section
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GenerationConfig {
    pub max_components: usize,
    pub enhance_prompt: bool,
    pub request_images: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_components: 12,
            enhance_prompt: true,
            request_images: true,
        }
    }
}

// File-side shapes: every field optional so a partial file only overrides what it names.

#[derive(Debug, Default, Deserialize)]
pub(super) struct TomlConfig {
    pub llm: Option<LlmToml>,
    pub design: Option<DesignToml>,
    pub generation: Option<GenerationToml>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct LlmToml {
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub providers: BTreeMap<String, ProviderToml>,
    #[serde(default)]
    pub routing: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct ProviderToml {
    pub kind: Option<String>,
    pub base_url: Option<String>,
    pub api_key_env: Option<String>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub enabled: Option<bool>,
}

impl ProviderToml {
    /// Overlay onto an existing entry, or build a fresh one for a new id.
    pub(super) fn apply(self, id: &str, base: Option<ProviderConfig>) -> ProviderConfig {
        let kind = self
            .kind
            .or_else(|| base.as_ref().map(|b| b.kind.clone()))
            .unwrap_or_else(|| id.to_string());
        let mut merged = base.unwrap_or_else(|| ProviderConfig {
            kind: kind.clone(),
            base_url: String::new(),
            api_key_env: format!("{}_API_KEY", id.to_uppercase().replace('-', "_")),
            model: String::new(),
            max_tokens: 4096,
            temperature: 0.7,
            enabled: true,
        });
        merged.kind = kind;
        if let Some(v) = self.base_url {
            merged.base_url = v;
        }
        if let Some(v) = self.api_key_env {
            merged.api_key_env = v;
        }
        if let Some(v) = self.model {
            merged.model = v;
        }
        if let Some(v) = self.max_tokens {
            merged.max_tokens = v;
        }
        if let Some(v) = self.temperature {
            merged.temperature = v;
        }
        if let Some(v) = self.enabled {
            merged.enabled = v;
        }
        merged
    }
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct DesignToml {
    pub similarity_threshold: Option<f64>,
    pub history_window: Option<usize>,
    pub history_capacity: Option<usize>,
    pub max_regenerations: Option<u32>,
    pub seed: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct GenerationToml {
    pub max_components: Option<usize>,
    pub enhance_prompt: Option<bool>,
    pub request_images: Option<bool>,
}
