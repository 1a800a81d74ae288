use std::str::FromStr;

use siteforge_utils::error::ConfigError;
use siteforge_utils::types::TaskCategory;

use super::Config;
use super::model::KNOWN_PROVIDER_KINDS;

impl Config {
    /// Validate configuration values
    ///
    /// All problems are collected so a single run reports every bad key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        let threshold = self.design.similarity_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            errors.push(format!(
                "similarity_threshold must be between 0 and 1 (got {threshold})"
            ));
        }
        if self.design.history_window == 0 {
            errors.push("history_window must be greater than 0".to_string());
        }
        if self.design.history_capacity == 0 {
            errors.push("history_capacity must be greater than 0".to_string());
        }
        if self.design.history_window > self.design.history_capacity {
            errors.push(format!(
                "history_window ({}) exceeds history_capacity ({})",
                self.design.history_window, self.design.history_capacity
            ));
        }
        if self.llm.request_timeout_secs == 0 {
            errors.push("request_timeout_secs must be greater than 0".to_string());
        }
        if self.generation.max_components == 0 {
            errors.push("max_components must be greater than 0".to_string());
        }

        for (id, provider) in &self.llm.providers {
            if !KNOWN_PROVIDER_KINDS.contains(&provider.kind.as_str()) {
                errors.push(format!(
                    "provider '{id}' has unknown kind '{}' (expected one of: {})",
                    provider.kind,
                    KNOWN_PROVIDER_KINDS.join(", ")
                ));
            }
            if provider.enabled && provider.base_url.trim().is_empty() {
                errors.push(format!("provider '{id}' has no base_url"));
            }
            if !(0.0..=2.0).contains(&provider.temperature) {
                errors.push(format!(
                    "provider '{id}' temperature must be between 0 and 2"
                ));
            }
        }

        for category in self.llm.routing.keys() {
            if TaskCategory::from_str(category).is_err() {
                errors.push(format!("unknown routing category '{category}'"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::ValidationFailed {
                error_count: errors.len(),
                errors,
            })
        }
    }
}
