//! Integration tests for drafting briefs against the design history.

use chrono::Utc;
use proptest::prelude::*;
use siteforge_design::similarity::{color_similarity, font_similarity, layout_similarity};
use siteforge_design::{DesignDirector, DesignRecord, DirectorSettings, check_similarity};
use siteforge_utils::types::IntentManifest;

fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(64);
    ProptestConfig::with_cases(cases)
}

const FONT_KEYS: &[&str] = &[
    "Playfair Display|Lato",
    "Playfair Display|Source Sans 3",
    "Inter|Inter",
    "Space Grotesk|Inter",
    "Bebas Neue|Roboto",
    "JetBrains Mono|Inter",
    "Lora|Lato",
];

const LAYOUTS: &[&str] = &[
    "split-screen",
    "bento-hero",
    "full-bleed-image",
    "video-background",
    "scroll-story",
    "diagonal-split",
    "unknown-layout",
];

/// Test that eleven consecutive restaurant drafts trigger at least one regeneration
#[test]
fn test_eleven_restaurant_briefs_regenerate_at_least_once() {
    for seed in [1_u64, 7, 42, 1234, 9999] {
        let mut director = DesignDirector::new(DirectorSettings {
            seed: Some(seed),
            ..DirectorSettings::default()
        });
        let total: u32 = (0..11)
            .map(|_| director.draft("restaurant", "warm", "warm", None).regenerations)
            .sum();
        assert!(total >= 1, "seed {seed} never regenerated");
        assert_eq!(director.guard().len(), 11);
    }
}

/// Test that regeneration is bounded by the configured budget
#[test]
fn test_regeneration_respects_budget() {
    let mut director = DesignDirector::new(DirectorSettings {
        similarity_threshold: 0.0,
        max_regenerations: 2,
        seed: Some(3),
        ..DirectorSettings::default()
    });
    director.draft("restaurant", "warm", "warm", None);
    for _ in 0..5 {
        let outcome = director.draft("restaurant", "warm", "warm", None);
        assert!(outcome.regenerations <= 2);
    }
}

/// Test that manifest-driven drafts keep strategist layouts through regeneration
#[test]
fn test_manifest_layout_survives_regeneration() {
    let manifest = IntentManifest {
        goal: "take table bookings".to_string(),
        industry: "restaurant".to_string(),
        personality: "warm".to_string(),
        ..Default::default()
    };
    let mut director = DesignDirector::new(DirectorSettings {
        similarity_threshold: 0.0,
        seed: Some(5),
        ..DirectorSettings::default()
    });
    for _ in 0..3 {
        let outcome = director.draft("restaurant", "warm", "warm", Some(&manifest));
        assert_eq!(outcome.brief.layout.hero.variant, "split-screen");
        assert_eq!(outcome.brief.layout.products, "menu-list");
    }
}

/// Test that an accepted brief serializes with camelCase keys and a full ramp
#[test]
fn test_brief_json_shape() {
    let mut director = DesignDirector::new(DirectorSettings {
        seed: Some(11),
        ..DirectorSettings::default()
    });
    let outcome = director.draft("skate-shop", "dark and edgy", "dark", None);
    let json = serde_json::to_value(&outcome.brief).unwrap();
    assert_eq!(json["industry"], "skate-shop");
    assert_eq!(json["personality"], "bold");
    assert!(json["fonts"]["typeScale"].is_string());
    assert_eq!(json["palette"]["primary"].as_object().unwrap().len(), 10);
    assert!(json["spacing"]["sectionPadding"].is_string());
}

fn hex_strategy() -> impl Strategy<Value = String> {
    (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(r, g, b)| format!("#{r:02x}{g:02x}{b:02x}"))
}

proptest! {
    #![proptest_config(proptest_config())]

    #[test]
    fn prop_component_similarity_is_symmetric(
        a in hex_strategy(),
        b in hex_strategy(),
        fa in 0..FONT_KEYS.len(),
        fb in 0..FONT_KEYS.len(),
        la in 0..LAYOUTS.len(),
        lb in 0..LAYOUTS.len(),
    ) {
        prop_assert!((color_similarity(&a, &b) - color_similarity(&b, &a)).abs() < 1e-12);
        prop_assert_eq!(
            font_similarity(FONT_KEYS[fa], FONT_KEYS[fb]),
            font_similarity(FONT_KEYS[fb], FONT_KEYS[fa])
        );
        prop_assert_eq!(
            layout_similarity(LAYOUTS[la], LAYOUTS[lb]),
            layout_similarity(LAYOUTS[lb], LAYOUTS[la])
        );
    }

    #[test]
    fn prop_scores_stay_in_unit_range(a in hex_strategy(), b in hex_strategy()) {
        let record = |primary: &str| DesignRecord {
            industry: "cafe".to_string(),
            primary: primary.to_string(),
            font_key: "Inter|Inter".to_string(),
            layout: "split-screen".to_string(),
            timestamp: Utc::now(),
        };
        let candidate = record(&a);
        let other = record(&b);
        let score = check_similarity(&candidate, &[&other], 10, 0.75);
        prop_assert!((0.0..=1.0).contains(&score.color));
        prop_assert!((0.0..=1.0).contains(&score.overall));
        prop_assert_eq!(color_similarity(&a, &a), 1.0);
    }
}
