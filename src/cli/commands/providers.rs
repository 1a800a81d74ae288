//! `siteforge providers`

use anyhow::{Context, Result};
use serde_json::json;

use siteforge_llm::ProviderRouter;

use crate::Config;

pub fn execute_providers_command(json: bool, config: &Config) -> Result<()> {
    let router = ProviderRouter::from_config(config).context("Failed to set up provider router")?;
    let status = router.status();
    let selection = router.selection_table();

    if json {
        let selection: serde_json::Map<String, serde_json::Value> = selection
            .iter()
            .map(|(category, id)| (category.to_string(), json!(id)))
            .collect();
        let doc = json!({ "backends": status, "selection": selection });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    println!("Backends:");
    if status.is_empty() {
        println!("  (none enabled)");
    }
    for backend in &status {
        let state = match (backend.configured, backend.exhausted) {
            (false, _) => "no API key",
            (true, true) => "exhausted",
            (true, false) => "ready",
        };
        println!(
            "  {:<12} {:<11} {:<32} {state}",
            backend.id,
            backend.kind.as_ref(),
            backend.model
        );
    }
    println!("\nSelection:");
    for (category, id) in &selection {
        println!(
            "  {:<9} -> {}",
            category.as_ref(),
            id.as_deref().unwrap_or("(none)")
        );
    }
    Ok(())
}
