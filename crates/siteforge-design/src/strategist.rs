//! Deterministic layout rules derived from an intent manifest.
//!
//! No randomness and no I/O: the same manifest always yields the same
//! recommendation. The variation generator applies these as overrides.

use serde::{Deserialize, Serialize};
use siteforge_utils::types::IntentManifest;

/// Section count above which grids go dense and footers go mega.
const DENSE_SECTION_THRESHOLD: usize = 6;

const CONVERSION_KEYWORDS: &[&str] = &[
    "sign up", "signup", "sign-up", "lead", "booking", "book a", "subscribe", "subscription", "waitlist",
    "register", "registration", "quote", "demo", "free trial", "conversion", "convert", "get started",
];

const CREATIVE_KEYWORDS: &[&str] = &["portfolio", "creative", "artist", "designer", "gallery"];

/// Matched as prefixes: `photographer`, `photography`, `illustration`.
const CREATIVE_STEMS: &[&str] = &["photograph", "illustrat"];

const TECH_KEYWORDS: &[&str] = &[
    "saas", "software", "platform", "api", "startup", "dashboard", "analytics", "devtool",
    "developer", "cloud", "tech", "technology",
];

/// Layout decisions for the four major page regions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutRecommendation {
    pub hero: HeroRecommendation,
    pub features: String,
    pub products: String,
    pub footer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroRecommendation {
    pub variant: String,
    pub alignment: String,
    /// Decoration hint, e.g. `floating-form`.
    pub accent: Option<String>,
}

fn starts_word(haystack: &str, at: usize) -> bool {
    haystack[..at]
        .chars()
        .next_back()
        .is_none_or(|c| !c.is_alphanumeric())
}

fn ends_word(haystack: &str, at: usize) -> bool {
    let rest = &haystack[at..];
    let rest = rest.strip_prefix('s').unwrap_or(rest);
    rest.chars().next().is_none_or(|c| !c.is_alphanumeric())
}

/// Whole-word keyword match, with an optional plural `s`.
///
/// `api` does not fire on `rapid`, `app` does not fire on `appointment`,
/// `cafe` still fires on `cafes`.
#[must_use]
pub fn mentions_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| {
        haystack
            .match_indices(keyword)
            .any(|(i, m)| starts_word(haystack, i) && ends_word(haystack, i + m.len()))
    })
}

/// Match anchored at a word start only, for stems such as `photograph`.
#[must_use]
pub fn mentions_stem(haystack: &str, stems: &[&str]) -> bool {
    stems.iter().any(|stem| {
        haystack
            .match_indices(stem)
            .any(|(i, _)| starts_word(haystack, i))
    })
}

fn has_conversion_intent(manifest: &IntentManifest) -> bool {
    let text = format!("{} {}", manifest.goal, manifest.layout_style).to_lowercase();
    mentions_any(&text, CONVERSION_KEYWORDS)
}

fn hero_for(manifest: &IntentManifest) -> HeroRecommendation {
    let haystack = manifest.keyword_haystack();

    if has_conversion_intent(manifest) {
        return HeroRecommendation {
            variant: "split-screen".to_string(),
            alignment: "left".to_string(),
            accent: Some("floating-form".to_string()),
        };
    }
    if manifest.industry == "portfolio" || mentions_any(&haystack, CREATIVE_KEYWORDS)
        || mentions_stem(&haystack, CREATIVE_STEMS)
    {
        return HeroRecommendation {
            variant: "centered-typography".to_string(),
            alignment: "center".to_string(),
            accent: Some("oversized-type".to_string()),
        };
    }
    if manifest.industry == "saas" || mentions_any(&haystack, TECH_KEYWORDS) {
        return HeroRecommendation {
            variant: "dashboard-preview".to_string(),
            alignment: "center".to_string(),
            accent: Some("bottom-anchored-screenshot".to_string()),
        };
    }
    HeroRecommendation {
        variant: "classic-two-column".to_string(),
        alignment: "left".to_string(),
        accent: None,
    }
}

fn features_for(manifest: &IntentManifest) -> &'static str {
    if manifest.sections.len() > DENSE_SECTION_THRESHOLD {
        "bento-grid"
    } else if manifest.personality.to_lowercase().contains("playful") {
        "zig-zag"
    } else {
        "three-column-cards"
    }
}

fn products_for(manifest: &IntentManifest) -> &'static str {
    match manifest.industry.as_str() {
        "ecommerce" | "skate-shop" | "retail" | "fashion" => "product-grid-quickview",
        "restaurant" | "cafe" => "menu-list",
        "saas" => "pricing-tiers",
        "portfolio" | "agency" => "project-gallery",
        "real-estate" | "hospitality" => "listing-carousel",
        _ => "feature-cards",
    }
}

fn footer_for(manifest: &IntentManifest) -> &'static str {
    if manifest.sections.len() > DENSE_SECTION_THRESHOLD {
        "mega-footer"
    } else if has_conversion_intent(manifest) {
        "cta-footer"
    } else {
        "simple-footer"
    }
}

/// Map a manifest onto hero, feature-grid, product and footer layouts.
///
/// Hero rules are checked in order and the first match wins: conversion intent,
/// then creative/portfolio, then SaaS/tech, then the classic default.
#[must_use]
pub fn recommend_layouts(manifest: &IntentManifest) -> LayoutRecommendation {
    LayoutRecommendation {
        hero: hero_for(manifest),
        features: features_for(manifest).to_string(),
        products: products_for(manifest).to_string(),
        footer: footer_for(manifest).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(goal: &str, industry: &str, personality: &str, sections: usize) -> IntentManifest {
        IntentManifest {
            goal: goal.to_string(),
            industry: industry.to_string(),
            personality: personality.to_string(),
            sections: (0..sections).map(|i| format!("section-{i}")).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_conversion_beats_everything() {
        let m = manifest("collect waitlist signups", "saas", "technical", 3);
        let rec = recommend_layouts(&m);
        assert_eq!(rec.hero.variant, "split-screen");
        assert_eq!(rec.hero.accent.as_deref(), Some("floating-form"));
        assert_eq!(rec.footer, "cta-footer");
    }

    #[test]
    fn test_portfolio_is_typography_led() {
        let m = manifest("show my illustration work", "portfolio", "quiet", 4);
        assert_eq!(recommend_layouts(&m).hero.variant, "centered-typography");
    }

    #[test]
    fn test_saas_gets_dashboard_preview() {
        let m = manifest("explain our product", "saas", "modern", 4);
        let rec = recommend_layouts(&m);
        assert_eq!(rec.hero.variant, "dashboard-preview");
        assert_eq!(rec.products, "pricing-tiers");
    }

    #[test]
    fn test_default_is_classic() {
        let m = manifest("tell people about our bakery", "bakery", "warm", 4);
        let rec = recommend_layouts(&m);
        assert_eq!(rec.hero.variant, "classic-two-column");
        assert_eq!(rec.features, "three-column-cards");
        assert_eq!(rec.footer, "simple-footer");
    }

    #[test]
    fn test_many_sections_go_dense() {
        let m = manifest("sell boards", "skate-shop", "playful", 7);
        let rec = recommend_layouts(&m);
        assert_eq!(rec.features, "bento-grid");
        assert_eq!(rec.footer, "mega-footer");
        assert_eq!(rec.products, "product-grid-quickview");
    }

    #[test]
    fn test_playful_zig_zag_when_sparse() {
        let m = manifest("sell boards", "skate-shop", "Playful and loud", 6);
        assert_eq!(recommend_layouts(&m).features, "zig-zag");
    }

    #[test]
    fn test_keywords_match_whole_words_only() {
        assert!(mentions_any("our api docs", TECH_KEYWORDS));
        assert!(mentions_any("public apis", TECH_KEYWORDS));
        assert!(!mentions_any("rapid therapist", TECH_KEYWORDS));
        assert!(!mentions_any("capital", &["api"]));
        assert!(!mentions_any("appointment booking", &["app"]));
        assert!(!mentions_any("funeral home", &["fun"]));
        assert!(mentions_any("two cafes", &["cafe"]));
        assert!(mentions_any("skate-shop", &["skate"]));
    }

    #[test]
    fn test_stems_match_at_word_start() {
        assert!(mentions_stem("photography studio", CREATIVE_STEMS));
        assert!(mentions_stem("children's illustration", CREATIVE_STEMS));
        assert!(!mentions_stem("telephotograph", CREATIVE_STEMS));
        assert!(!mentions_any("photography studio", CREATIVE_KEYWORDS));
    }

    #[test]
    fn test_creative_stem_picks_typography_hero() {
        let m = manifest("show my photography", "studio", "calm", 4);
        assert_eq!(recommend_layouts(&m).hero.variant, "centered-typography");
    }

    #[test]
    fn test_identical_input_identical_output() {
        let m = manifest("book a table", "restaurant", "warm", 5);
        assert_eq!(recommend_layouts(&m), recommend_layouts(&m.clone()));
    }
}
