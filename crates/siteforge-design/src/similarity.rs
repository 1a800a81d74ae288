//! Near-duplicate detection against recent designs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use siteforge_utils::RingBuffer;

use crate::brief::DesignBrief;
use crate::catalog::{font_category, layout_group};
use crate::color::{MAX_RGB_DISTANCE, hex_to_rgb, rgb_distance};

/// Compact fingerprint of an accepted brief.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignRecord {
    pub industry: String,
    /// Primary-500 hex.
    pub primary: String,
    /// `Heading|Body`.
    pub font_key: String,
    /// Hero layout variant.
    pub layout: String,
    pub timestamp: DateTime<Utc>,
}

impl DesignRecord {
    #[must_use]
    pub fn from_brief(brief: &DesignBrief) -> Self {
        Self {
            industry: brief.industry.clone(),
            primary: brief.palette.primary.base().to_string(),
            font_key: brief.fonts.key(),
            layout: brief.layout.hero.variant.clone(),
            timestamp: Utc::now(),
        }
    }
}

/// Component and overall similarity of a candidate against history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityScore {
    pub color: f64,
    pub font: f64,
    pub layout: f64,
    pub overall: f64,
    pub too_similar: bool,
}

impl SimilarityScore {
    const NONE: Self = Self {
        color: 0.0,
        font: 0.0,
        layout: 0.0,
        overall: 0.0,
        too_similar: false,
    };
}

/// 1.0 for identical colors, 0.0 at maximal RGB distance or unparsable hex.
#[must_use]
pub fn color_similarity(a: &str, b: &str) -> f64 {
    if a.eq_ignore_ascii_case(b) {
        return 1.0;
    }
    match (hex_to_rgb(a), hex_to_rgb(b)) {
        (Some(x), Some(y)) => 1.0 - rgb_distance(x, y) / MAX_RGB_DISTANCE,
        _ => 0.0,
    }
}

/// Compare two `Heading|Body` keys.
#[must_use]
pub fn font_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    let heading = |key: &str| key.split('|').next().unwrap_or_default().to_string();
    let (ha, hb) = (heading(a), heading(b));
    if ha == hb {
        0.7
    } else if font_category(&ha) == font_category(&hb) {
        0.3
    } else {
        0.0
    }
}

#[must_use]
pub fn layout_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    match (layout_group(a), layout_group(b)) {
        (Some(x), Some(y)) if x == y => 0.5,
        _ => 0.0,
    }
}

/// Score `candidate` against the last `window` same-industry records.
///
/// Each component is averaged over the compared records; `overall` is the
/// unweighted mean of the three averages. An empty comparison set scores 0.
#[must_use]
pub fn check_similarity(
    candidate: &DesignRecord,
    history: &[&DesignRecord],
    window: usize,
    threshold: f64,
) -> SimilarityScore {
    let same_industry: Vec<&DesignRecord> = history
        .iter()
        .copied()
        .filter(|r| r.industry == candidate.industry)
        .collect();
    let start = same_industry.len().saturating_sub(window);
    let compared = &same_industry[start..];
    if compared.is_empty() {
        return SimilarityScore::NONE;
    }

    let n = compared.len() as f64;
    let color = compared
        .iter()
        .map(|r| color_similarity(&candidate.primary, &r.primary))
        .sum::<f64>()
        / n;
    let font = compared
        .iter()
        .map(|r| font_similarity(&candidate.font_key, &r.font_key))
        .sum::<f64>()
        / n;
    let layout = compared
        .iter()
        .map(|r| layout_similarity(&candidate.layout, &r.layout))
        .sum::<f64>()
        / n;
    let overall = (color + font + layout) / 3.0;

    SimilarityScore {
        color,
        font,
        layout,
        overall,
        too_similar: overall > threshold,
    }
}

/// Bounded history of accepted designs plus the rejection threshold.
#[derive(Debug)]
pub struct SimilarityGuard {
    history: RingBuffer<DesignRecord>,
    threshold: f64,
    window: usize,
}

impl SimilarityGuard {
    #[must_use]
    pub fn new(capacity: usize, window: usize, threshold: f64) -> Self {
        Self {
            history: RingBuffer::new(capacity),
            threshold,
            window,
        }
    }

    #[must_use]
    pub fn evaluate(&self, brief: &DesignBrief) -> SimilarityScore {
        let candidate = DesignRecord::from_brief(brief);
        let history: Vec<&DesignRecord> = self.history.iter().collect();
        let score = check_similarity(&candidate, &history, self.window, self.threshold);
        debug!(
            industry = %candidate.industry,
            overall = score.overall,
            too_similar = score.too_similar,
            "Scored design candidate"
        );
        score
    }

    /// Record an accepted brief, evicting the oldest beyond capacity.
    pub fn record(&mut self, brief: &DesignBrief) {
        self.history.push(DesignRecord::from_brief(brief));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.history.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Records, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &DesignRecord> {
        self.history.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(industry: &str, primary: &str, font_key: &str, layout: &str) -> DesignRecord {
        DesignRecord {
            industry: industry.to_string(),
            primary: primary.to_string(),
            font_key: font_key.to_string(),
            layout: layout.to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_same_hex_is_exactly_one() {
        assert_eq!(color_similarity("#aabbcc", "#AABBCC"), 1.0);
        assert_eq!(color_similarity("#000000", "#ffffff"), 0.0);
        assert_eq!(color_similarity("nope", "#ffffff"), 0.0);
    }

    #[test]
    fn test_font_tiers() {
        assert_eq!(font_similarity("Lora|Lato", "Lora|Lato"), 1.0);
        assert_eq!(font_similarity("Lora|Lato", "Lora|Inter"), 0.7);
        assert_eq!(
            font_similarity("Playfair Display|Lato", "Fraunces|Inter"),
            0.3
        );
        assert_eq!(font_similarity("Playfair Display|Lato", "Inter|Inter"), 0.0);
    }

    #[test]
    fn test_layout_tiers() {
        assert_eq!(layout_similarity("split-screen", "split-screen"), 1.0);
        assert_eq!(layout_similarity("split-screen", "bento-hero"), 0.5);
        assert_eq!(layout_similarity("split-screen", "scroll-story"), 0.0);
        assert_eq!(layout_similarity("mystery", "other-mystery"), 0.0);
    }

    #[test]
    fn test_exactly_threshold_is_not_too_similar() {
        let candidate = record("cafe", "#102030", "Lora|Lato", "split-screen");
        let a = record("cafe", "#102030", "Lora|Lato", "scroll-story");
        let b = record("cafe", "#102030", "Inter|Inter", "split-screen");
        // color 1.0, font (1.0 + 0.0) / 2 = 0.5, layout (0.0 + 1.0) / 2 = 0.5
        let score = check_similarity(&candidate, &[&a, &b], 10, 0.75);
        assert!((score.overall - 2.0 / 3.0).abs() < 1e-9);
        assert!(!score.too_similar);

        let c = record("cafe", "#102030", "Lora|Inter", "bento-hero");
        // color 1.0, font 0.7, layout 0.5: overall 0.733
        let near = check_similarity(&candidate, &[&c], 10, 0.75);
        assert!(!near.too_similar);

        let identical = record("cafe", "#102030", "Lora|Lato", "split-screen");
        let exact = check_similarity(&candidate, &[&identical], 10, 1.0);
        assert_eq!(exact.overall, 1.0);
        assert!(!exact.too_similar, "equal to threshold must pass");
        assert!(check_similarity(&candidate, &[&identical], 10, 0.75).too_similar);
    }

    #[test]
    fn test_other_industries_and_old_entries_are_ignored() {
        let candidate = record("cafe", "#102030", "Lora|Lato", "split-screen");
        let other = record("legal", "#102030", "Lora|Lato", "split-screen");
        assert_eq!(
            check_similarity(&candidate, &[&other], 10, 0.75),
            SimilarityScore::NONE
        );

        let old_match = record("cafe", "#102030", "Lora|Lato", "split-screen");
        let recent = record("cafe", "#ffffff", "Inter|Inter", "scroll-story");
        let score = check_similarity(&candidate, &[&old_match, &recent], 1, 0.75);
        assert!(score.overall < 0.2);
    }

    #[test]
    fn test_guard_evicts_beyond_capacity() {
        use crate::variation::DesignVariationGenerator;

        let mut generator = DesignVariationGenerator::with_seed(2);
        let mut guard = SimilarityGuard::new(3, 10, 0.75);
        for _ in 0..5 {
            let brief = generator.generate_design_brief("saas", "modern", "calm", None);
            guard.record(&brief);
        }
        assert_eq!(guard.len(), 3);
        assert!(!guard.is_empty());
    }
}
