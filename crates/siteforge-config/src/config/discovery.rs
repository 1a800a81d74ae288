use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use siteforge_utils::error::ConfigError;
use siteforge_utils::types::ConfigSource;
use tracing::debug;

use super::model::TomlConfig;
use super::{CliArgs, Config, DesignConfig, GenerationConfig, LlmConfig};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "SITEFORGE_CONFIG";
pub const SEED_ENV: &str = "SITEFORGE_SEED";
pub const SIMILARITY_THRESHOLD_ENV: &str = "SITEFORGE_SIMILARITY_THRESHOLD";
pub const REQUEST_TIMEOUT_ENV: &str = "SITEFORGE_REQUEST_TIMEOUT";

fn env_value(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T: FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    match env_value(name) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                key: name.to_string(),
                value: raw,
            }),
        None => Ok(None),
    }
}

impl Config {
    /// Discover and load configuration with precedence: CLI > env > file > defaults
    ///
    /// Uses the current working directory for the upward config file search.
    pub fn discover(cli_args: &CliArgs) -> Result<Self, ConfigError> {
        let start_dir = env::current_dir().map_err(|e| ConfigError::InvalidFile {
            path: ".".to_string(),
            reason: format!("failed to get current directory: {e}"),
        })?;
        Self::discover_from(&start_dir, cli_args)
    }

    /// Discover and load configuration starting from a specific directory
    pub fn discover_from(start_dir: &Path, cli_args: &CliArgs) -> Result<Self, ConfigError> {
        let mut source_attribution = HashMap::new();
        let mut llm = LlmConfig::default();
        let mut design = DesignConfig::default();
        let mut generation = GenerationConfig::default();
        let mut provider_override = None;

        let config_path = if let Some(explicit) = &cli_args.config_path {
            Some(explicit.clone())
        } else if let Some(from_env) = env_value(CONFIG_ENV) {
            Some(PathBuf::from(from_env))
        } else {
            Self::discover_config_file_from(start_dir)
        };

        if let Some(path) = &config_path {
            debug!(path = %path.display(), "Loading config file");
            let file = Self::load_config_file(path)?;
            let src = ConfigSource::Config;

            if let Some(file_llm) = file.llm {
                if let Some(v) = file_llm.request_timeout_secs {
                    llm.request_timeout_secs = v;
                    source_attribution.insert("request_timeout_secs".to_string(), src.clone());
                }
                if !file_llm.providers.is_empty() {
                    for (id, table) in file_llm.providers {
                        let base = llm.providers.remove(&id);
                        let merged = table.apply(&id, base);
                        llm.providers.insert(id, merged);
                    }
                    source_attribution.insert("llm_providers".to_string(), src.clone());
                }
                if !file_llm.routing.is_empty() {
                    llm.routing = file_llm.routing;
                    source_attribution.insert("llm_routing".to_string(), src.clone());
                }
            }

            if let Some(file_design) = file.design {
                if let Some(v) = file_design.similarity_threshold {
                    design.similarity_threshold = v;
                    source_attribution.insert("similarity_threshold".to_string(), src.clone());
                }
                if let Some(v) = file_design.history_window {
                    design.history_window = v;
                    source_attribution.insert("history_window".to_string(), src.clone());
                }
                if let Some(v) = file_design.history_capacity {
                    design.history_capacity = v;
                    source_attribution.insert("history_capacity".to_string(), src.clone());
                }
                if let Some(v) = file_design.max_regenerations {
                    design.max_regenerations = v;
                    source_attribution.insert("max_regenerations".to_string(), src.clone());
                }
                if file_design.seed.is_some() {
                    design.seed = file_design.seed;
                    source_attribution.insert("seed".to_string(), src.clone());
                }
            }

            if let Some(file_generation) = file.generation {
                if let Some(v) = file_generation.max_components {
                    generation.max_components = v;
                    source_attribution.insert("max_components".to_string(), src.clone());
                }
                if let Some(v) = file_generation.enhance_prompt {
                    generation.enhance_prompt = v;
                    source_attribution.insert("enhance_prompt".to_string(), src.clone());
                }
                if let Some(v) = file_generation.request_images {
                    generation.request_images = v;
                    source_attribution.insert("request_images".to_string(), src.clone());
                }
            }
        }

        // Environment overrides the file
        if let Some(seed) = parse_env::<u64>(SEED_ENV)? {
            design.seed = Some(seed);
            source_attribution.insert("seed".to_string(), ConfigSource::Env);
        }
        if let Some(threshold) = parse_env::<f64>(SIMILARITY_THRESHOLD_ENV)? {
            design.similarity_threshold = threshold;
            source_attribution.insert("similarity_threshold".to_string(), ConfigSource::Env);
        }
        if let Some(timeout) = parse_env::<u64>(REQUEST_TIMEOUT_ENV)? {
            llm.request_timeout_secs = timeout;
            source_attribution.insert("request_timeout_secs".to_string(), ConfigSource::Env);
        }

        // CLI flags override everything
        if let Some(seed) = cli_args.seed {
            design.seed = Some(seed);
            source_attribution.insert("seed".to_string(), ConfigSource::Cli);
        }
        if let Some(threshold) = cli_args.similarity_threshold {
            design.similarity_threshold = threshold;
            source_attribution.insert("similarity_threshold".to_string(), ConfigSource::Cli);
        }
        if let Some(timeout) = cli_args.request_timeout_secs {
            llm.request_timeout_secs = timeout;
            source_attribution.insert("request_timeout_secs".to_string(), ConfigSource::Cli);
        }
        if let Some(provider) = &cli_args.provider {
            provider_override = Some(provider.clone());
            source_attribution.insert("provider_override".to_string(), ConfigSource::Cli);
        }

        let config = Self {
            llm,
            design,
            generation,
            provider_override,
            config_path,
            source_attribution,
        };

        config.validate()?;

        Ok(config)
    }

    /// Search upward from `start_dir` for `.siteforge/config.toml`.
    ///
    /// Stops at repository root markers (.git, .hg, .svn) or the filesystem root.
    #[must_use]
    pub fn discover_config_file_from(start_dir: &Path) -> Option<PathBuf> {
        let mut current_dir = start_dir.to_path_buf();

        loop {
            let config_path = current_dir.join(".siteforge").join("config.toml");
            if config_path.is_file() {
                return Some(config_path);
            }

            if current_dir.join(".git").exists()
                || current_dir.join(".hg").exists()
                || current_dir.join(".svn").exists()
            {
                return None;
            }

            match current_dir.parent() {
                Some(parent) => current_dir = parent.to_path_buf(),
                None => return None,
            }
        }
    }

    fn load_config_file(path: &Path) -> Result<TomlConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::InvalidFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::InvalidFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}
