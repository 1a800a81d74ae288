//! Procedural design direction for siteforge.
//!
//! - [`strategist`]: deterministic layout rules from an intent manifest
//! - [`variation`]: seeded palette, font and layout generation
//! - [`similarity`]: near-duplicate detection over a bounded history
//! - [`director`]: drafts a brief and regenerates it when it is too similar

pub mod brief;
pub mod catalog;
pub mod color;
pub mod director;
pub mod similarity;
pub mod strategist;
pub mod variation;

pub use brief::{
    ArtisticStyle, ColorPalette, DesignBrief, FontPairing, HeroLayout, LayoutChoices,
    PersonalityCategory, SpacingTokens, TintRamp,
};
pub use director::{DesignDirector, DirectorSettings, DraftOutcome};
pub use similarity::{DesignRecord, SimilarityGuard, SimilarityScore, check_similarity};
pub use strategist::{HeroRecommendation, LayoutRecommendation, recommend_layouts};
pub use variation::DesignVariationGenerator;
