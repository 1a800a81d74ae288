//! Prompt enhancement and intent analysis.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info, warn};

use siteforge_extraction::{ExtractionError, parse_lenient};
use siteforge_llm::{ProviderGateway, ProviderRequest};
use siteforge_utils::types::{Audience, IntentManifest, TaskCategory};

use crate::blueprint::{blueprint, classify_industry, heuristic_manifest, knowledge_snippet};
use crate::dispatch::request_with_fallback;

const ENHANCE_SYSTEM_PROMPT: &str = "You rewrite short website requests into a fuller brief. \
Keep every fact the user gave, add plausible detail about audience, tone and sections, \
and reply with two short paragraphs of plain prose.";

/// Where a manifest came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestSource {
    Backend { backend: String },
    Heuristic { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentAnalysis {
    pub manifest: IntentManifest,
    pub source: ManifestSource,
}

impl IntentAnalysis {
    #[must_use]
    pub fn is_heuristic(&self) -> bool {
        matches!(self.source, ManifestSource::Heuristic { .. })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WireManifest {
    core: WireCore,
    audience: WireAudience,
    content: WireContent,
    design: WireDesign,
    market: WireMarket,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WireCore {
    goal: String,
    industry: String,
    sub_category: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WireAudience {
    age_range: String,
    income: String,
    values: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WireContent {
    sections: Vec<String>,
    tone: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WireDesign {
    personality: String,
    layout_style: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WireMarket {
    competitors: Vec<String>,
    differentiators: Vec<String>,
}

fn or_default(value: String, fallback: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

fn slug(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Parse a backend reply into a manifest.
///
/// The reply may wrap the JSON in prose or fences. Missing fields are filled
/// from the blueprint of the reported (or keyword-classified) industry; an
/// object with no goal and no industry is rejected.
pub fn parse_manifest(raw: &str, prompt: &str) -> Result<IntentManifest, ExtractionError> {
    let wire: WireManifest = parse_lenient(raw)?;
    if wire.core.goal.trim().is_empty() && wire.core.industry.trim().is_empty() {
        return Err(ExtractionError::InvalidJson(
            "manifest has neither goal nor industry".to_string(),
        ));
    }

    let industry = match slug(&wire.core.industry) {
        s if s.is_empty() => classify_industry(prompt).to_string(),
        s => s,
    };
    let bp = blueprint(&industry);
    let sections: Vec<String> = wire
        .content
        .sections
        .iter()
        .map(|s| slug(s))
        .filter(|s| !s.is_empty())
        .collect();

    Ok(IntentManifest {
        goal: or_default(wire.core.goal, bp.goal),
        audience: Audience {
            age_range: or_default(wire.audience.age_range, bp.age_range),
            income: or_default(wire.audience.income, bp.income),
            values: wire.audience.values,
        },
        personality: or_default(wire.design.personality, bp.personality),
        sub_category: or_default(wire.core.sub_category, bp.sub_category),
        sections: if sections.is_empty() {
            bp.sections.iter().map(ToString::to_string).collect()
        } else {
            sections
        },
        layout_style: or_default(wire.design.layout_style, bp.layout_style),
        competitors: wire.market.competitors,
        tone: or_default(wire.content.tone, bp.tone),
        differentiators: wire.market.differentiators,
        industry,
    })
}

fn analysis_prompt(prompt: &str) -> String {
    format!(
        "Analyze this website request and reply with one JSON object of the form\n\
         {{\"core\":{{\"goal\":\"\",\"industry\":\"kebab-case slug\",\"subCategory\":\"\"}},\
         \"audience\":{{\"ageRange\":\"\",\"income\":\"\",\"values\":[]}},\
         \"content\":{{\"sections\":[\"hero\",\"...\",\"footer\"],\"tone\":\"\"}},\
         \"design\":{{\"personality\":\"\",\"layoutStyle\":\"\"}},\
         \"market\":{{\"competitors\":[],\"differentiators\":[]}}}}\n\n\
         {}\n\
         Request: {prompt}",
        knowledge_snippet()
    )
}

/// Turns a prompt into an [`IntentManifest`].
///
/// One routed `analysis` request; any failure falls back to the keyword
/// heuristic, so analysis itself never fails.
pub struct IntentAnalyzer {
    gateway: Arc<dyn ProviderGateway>,
    provider_override: Option<String>,
}

impl IntentAnalyzer {
    #[must_use]
    pub fn new(gateway: Arc<dyn ProviderGateway>) -> Self {
        Self {
            gateway,
            provider_override: None,
        }
    }

    #[must_use]
    pub fn with_provider_override(mut self, id: Option<String>) -> Self {
        self.provider_override = id;
        self
    }

    /// `prompt` is what the backend sees; `original` drives the heuristic.
    pub async fn analyze_intent(&self, prompt: &str, original: &str) -> IntentAnalysis {
        let request = ProviderRequest::new(TaskCategory::Analysis, analysis_prompt(prompt));
        let reason = match request_with_fallback(
            self.gateway.as_ref(),
            &request,
            self.provider_override.as_deref(),
        )
        .await
        {
            Ok(response) => match parse_manifest(&response.content, original) {
                Ok(manifest) => {
                    info!(
                        backend = %response.backend,
                        industry = %manifest.industry,
                        "Intent extracted"
                    );
                    return IntentAnalysis {
                        manifest,
                        source: ManifestSource::Backend {
                            backend: response.backend,
                        },
                    };
                }
                Err(e) => {
                    warn!(backend = %response.backend, error = %e, "Manifest parse failed");
                    format!("manifest from {} could not be parsed", response.backend)
                }
            },
            Err(e) => {
                debug!(error = %e, "Intent request failed");
                "no backend answered the analysis request".to_string()
            }
        };

        let manifest = heuristic_manifest(original);
        info!(industry = %manifest.industry, "Using heuristic intent");
        IntentAnalysis {
            manifest,
            source: ManifestSource::Heuristic { reason },
        }
    }
}

/// Rewrites a terse prompt into a richer brief via one `prose` request.
pub struct PromptEnhancer {
    gateway: Arc<dyn ProviderGateway>,
    provider_override: Option<String>,
}

impl PromptEnhancer {
    #[must_use]
    pub fn new(gateway: Arc<dyn ProviderGateway>) -> Self {
        Self {
            gateway,
            provider_override: None,
        }
    }

    #[must_use]
    pub fn with_provider_override(mut self, id: Option<String>) -> Self {
        self.provider_override = id;
        self
    }

    /// The enhanced prompt, or `None` when no backend produced usable text.
    pub async fn enhance(&self, prompt: &str) -> Option<String> {
        let request = ProviderRequest::new(TaskCategory::Prose, prompt)
            .with_system_prompt(ENHANCE_SYSTEM_PROMPT);
        match request_with_fallback(
            self.gateway.as_ref(),
            &request,
            self.provider_override.as_deref(),
        )
        .await
        {
            Ok(response) => {
                let text = response.content.trim();
                (!text.is_empty()).then(|| text.to_string())
            }
            Err(e) => {
                debug!(error = %e, "Prompt enhancement failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_manifest_with_leading_prose() {
        let raw = r#"Sure, here you go: {"core":{"goal":"sell boards","industry":"Skate Shop"},"content":{"sections":["Hero","Products","Footer"]}} Hope that helps!"#;
        let manifest = parse_manifest(raw, "skate shop").unwrap();
        assert_eq!(manifest.industry, "skate-shop");
        assert_eq!(manifest.goal, "sell boards");
        assert_eq!(manifest.sections, vec!["hero", "products", "footer"]);
        // Filled from the blueprint
        assert_eq!(manifest.tone, "irreverent");
    }

    #[test]
    fn test_parse_manifest_fenced() {
        let raw = "```json\n{\"core\":{\"goal\":\"book tables\"},\"design\":{\"personality\":\"warm\"}}\n```";
        let manifest = parse_manifest(raw, "a family restaurant").unwrap();
        assert_eq!(manifest.industry, "restaurant");
        assert_eq!(manifest.personality, "warm");
        assert!(!manifest.sections.is_empty());
    }

    #[test]
    fn test_parse_manifest_rejects_empty_objects() {
        assert!(parse_manifest("{}", "x").is_err());
        assert_eq!(
            parse_manifest("no json at all", "x"),
            Err(ExtractionError::NoJsonObject)
        );
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("  Practice Areas "), "practice-areas");
        assert_eq!(slug("e-commerce"), "e-commerce");
        assert_eq!(slug("!!"), "");
    }
}
