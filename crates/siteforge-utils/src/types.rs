use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Task category used to pick a text-generation backend.
///
/// Each category maps to an ordered preference list of backends in the router.
/// The string form is the lowercase variant name and is what appears in
/// configuration files (`[llm.routing] code = ["anthropic", "openai"]`).
///
/// # Example
///
/// ```rust
/// use siteforge_utils::types::TaskCategory;
/// use std::str::FromStr;
///
/// assert_eq!(TaskCategory::Code.as_ref(), "code");
/// assert_eq!(TaskCategory::from_str("analysis").unwrap(), TaskCategory::Analysis);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TaskCategory {
    /// Source-code generation (components, pages).
    Code,
    /// Marketing copy and prompt enhancement.
    Prose,
    /// Structured analysis, e.g. intent extraction.
    Analysis,
    /// Image understanding.
    Vision,
    /// Free-form conversation.
    Chat,
}

/// Where a configuration value came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Cli,
    Env,
    Config,
    Default,
}

impl ConfigSource {
    /// Stable label used in `siteforge config` output.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Cli => "cli",
            Self::Env => "env",
            Self::Config => "config",
            Self::Default => "default",
        }
    }
}

/// Target audience description inside an [`IntentManifest`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Audience {
    pub age_range: String,
    pub income: String,
    #[serde(default)]
    pub values: Vec<String>,
}

/// Structured interpretation of a raw prompt.
///
/// Produced once per prompt by the intent analyzer (either from a backend
/// response or from the keyword heuristic) and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentManifest {
    /// Core purpose of the site, e.g. "sell handmade boards online".
    pub goal: String,
    pub audience: Audience,
    /// Free-form brand personality, e.g. "dark, edgy, rebellious".
    pub personality: String,
    /// Industry slug, e.g. `skate-shop`, `restaurant`, `saas`.
    pub industry: String,
    pub sub_category: String,
    /// Content sections in display order.
    pub sections: Vec<String>,
    pub layout_style: String,
    #[serde(default)]
    pub competitors: Vec<String>,
    pub tone: String,
    #[serde(default)]
    pub differentiators: Vec<String>,
}

impl IntentManifest {
    /// Lowercased goal + industry + personality, used for keyword rules.
    #[must_use]
    pub fn keyword_haystack(&self) -> String {
        format!("{} {} {}", self.goal, self.industry, self.personality).to_lowercase()
    }
}

/// One generated output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFile {
    /// Project-relative path using `/` separators.
    pub path: String,
    pub content: String,
    /// Language tag, e.g. `tsx`, `json`, `css`.
    pub language: String,
}

impl GeneratedFile {
    /// Create a file, deriving the language tag from the path extension.
    #[must_use]
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        let path = path.into();
        let language = language_for_path(&path).to_string();
        Self {
            path,
            content: content.into(),
            language,
        }
    }
}

/// Map a file extension to a language tag.
#[must_use]
pub fn language_for_path(path: &str) -> &'static str {
    match path.rsplit_once('.').map(|(_, ext)| ext) {
        Some("tsx") => "tsx",
        Some("ts") => "typescript",
        Some("jsx") => "jsx",
        Some("js") | Some("mjs") | Some("cjs") => "javascript",
        Some("json") => "json",
        Some("css") => "css",
        Some("html") => "html",
        Some("md") => "markdown",
        _ => "plaintext",
    }
}
