use std::collections::BTreeMap;

use super::Config;

impl Config {
    /// Get effective configuration as key-value pairs with source attribution
    ///
    /// Keys are sorted so the output is stable across runs.
    #[must_use]
    pub fn effective_config(&self) -> BTreeMap<String, (String, String)> {
        let mut config = BTreeMap::new();

        let mut add = |key: &str, value: String| {
            let source = self.source_of(key).label().to_string();
            config.insert(key.to_string(), (value, source));
        };

        add(
            "request_timeout_secs",
            self.llm.request_timeout_secs.to_string(),
        );
        add(
            "similarity_threshold",
            self.design.similarity_threshold.to_string(),
        );
        add("history_window", self.design.history_window.to_string());
        add("history_capacity", self.design.history_capacity.to_string());
        add(
            "max_regenerations",
            self.design.max_regenerations.to_string(),
        );
        add(
            "seed",
            self.design
                .seed
                .map_or_else(|| "random".to_string(), |s| s.to_string()),
        );
        add(
            "max_components",
            self.generation.max_components.to_string(),
        );
        add(
            "enhance_prompt",
            self.generation.enhance_prompt.to_string(),
        );
        add(
            "request_images",
            self.generation.request_images.to_string(),
        );
        add(
            "provider_override",
            self.provider_override
                .clone()
                .unwrap_or_else(|| "none".to_string()),
        );
        add(
            "llm_providers",
            self.enabled_providers()
                .map(|(id, p)| format!("{id}({})", p.kind))
                .collect::<Vec<_>>()
                .join(", "),
        );
        add(
            "llm_routing",
            if self.llm.routing.is_empty() {
                "built-in".to_string()
            } else {
                self.llm
                    .routing
                    .iter()
                    .map(|(cat, ids)| format!("{cat}=[{}]", ids.join(",")))
                    .collect::<Vec<_>>()
                    .join(" ")
            },
        );

        config
    }
}
