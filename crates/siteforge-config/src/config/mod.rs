use std::collections::HashMap;
use std::path::PathBuf;

use siteforge_utils::types::{ConfigSource, TaskCategory};

mod discovery;
mod model;
mod sources;
mod validation;

pub use discovery::{CONFIG_ENV, REQUEST_TIMEOUT_ENV, SEED_ENV, SIMILARITY_THRESHOLD_ENV};
pub use model::{DesignConfig, GenerationConfig, KNOWN_PROVIDER_KINDS, LlmConfig, ProviderConfig};

/// Configuration for a siteforge run.
///
/// `Config` provides hierarchical configuration with discovery and precedence:
/// CLI arguments > environment variables > config file > built-in defaults.
///
/// # Discovery
///
/// Use [`Config::discover()`] for CLI-like behavior that:
/// - Honors an explicit `--config` path
/// - Respects the `SITEFORGE_CONFIG` environment variable
/// - Searches for `.siteforge/config.toml` upward from the current directory
/// - Applies built-in defaults for unspecified values
///
/// Every value that was set from somewhere other than the defaults is recorded
/// in `source_attribution` under a stable key.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm: LlmConfig,
    pub design: DesignConfig,
    pub generation: GenerationConfig,
    /// Preferred backend id for every routed request, if any.
    pub provider_override: Option<String>,
    /// The config file that was loaded, if any.
    pub config_path: Option<PathBuf>,
    pub source_attribution: HashMap<String, ConfigSource>,
}

/// Values the command line can override.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config_path: Option<PathBuf>,
    pub seed: Option<u64>,
    pub provider: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub similarity_threshold: Option<f64>,
}

impl Config {
    /// Defaults only, with no file or environment lookup.
    ///
    /// Used by tests and by library consumers that want deterministic behavior
    /// independent of the user's environment.
    #[must_use]
    pub fn minimal_for_testing() -> Self {
        Self {
            llm: LlmConfig::default(),
            design: DesignConfig::default(),
            generation: GenerationConfig::default(),
            provider_override: None,
            config_path: None,
            source_attribution: HashMap::new(),
        }
    }

    /// Ordered backend ids for a category, if the config overrides the built-in order.
    #[must_use]
    pub fn routing_for(&self, category: TaskCategory) -> Option<&[String]> {
        self.llm.routing.get(category.as_ref()).map(Vec::as_slice)
    }

    /// Enabled provider entries in id order.
    pub fn enabled_providers(&self) -> impl Iterator<Item = (&String, &ProviderConfig)> {
        self.llm.providers.iter().filter(|(_, p)| p.enabled)
    }

    /// Source of a given key, defaulting to `ConfigSource::Default`.
    #[must_use]
    pub fn source_of(&self, key: &str) -> ConfigSource {
        self.source_attribution
            .get(key)
            .cloned()
            .unwrap_or(ConfigSource::Default)
    }
}
