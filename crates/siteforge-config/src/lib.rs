//! Configuration management for siteforge
//!
//! Hierarchical configuration with precedence CLI > environment > config file >
//! built-in defaults, plus per-key source attribution for `siteforge config`.

mod config;

pub use config::{
    CONFIG_ENV, CliArgs, Config, DesignConfig, GenerationConfig, KNOWN_PROVIDER_KINDS, LlmConfig,
    ProviderConfig, REQUEST_TIMEOUT_ENV, SEED_ENV, SIMILARITY_THRESHOLD_ENV,
};
