//! Procedural design variation with an injectable, seedable random source.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use siteforge_utils::types::IntentManifest;

use crate::brief::{
    ArtisticStyle, ColorPalette, DesignBrief, FontPairing, HeroLayout, LayoutChoices,
    PersonalityCategory, SpacingTokens, TintRamp,
};
use crate::catalog::{
    FEATURE_POOL, FOOTER_POOL, PRODUCT_POOL, RADIUS_POOL, font_pool, font_weights, hero_pool,
    industry_profile, layout_group, mood_profile, spacing_profile, style_pool, type_scale,
};
use crate::color::{normalize_hue, tint_ramp};
use crate::strategist::recommend_layouts;

/// Relative jitter applied to saturation and lightness.
const JITTER: f64 = 0.15;

/// Saturation of the neutral ramp.
const NEUTRAL_SATURATION: f64 = 8.0;

/// Generates palettes, font pairings and layouts from curated pools.
///
/// All randomness flows through one `StdRng`; two generators built with the
/// same seed produce the same sequence of briefs.
#[derive(Debug, Clone)]
pub struct DesignVariationGenerator {
    rng: StdRng,
}

impl Default for DesignVariationGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl DesignVariationGenerator {
    /// Seeded from OS entropy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn jitter(&mut self, value: f64) -> f64 {
        let factor = 1.0 + self.rng.gen_range(-JITTER..=JITTER);
        (value * factor).clamp(0.0, 100.0)
    }

    fn pick<T: Copy>(&mut self, pool: &[T], fallback: T) -> T {
        pool.choose(&mut self.rng).copied().unwrap_or(fallback)
    }

    /// Base hue from the industry pool, saturation/lightness from the mood,
    /// complementary (+180°) and triadic (+120°) ramps alongside.
    pub fn generate_color_palette(&mut self, industry: &str, mood: &str) -> ColorPalette {
        let profile = industry_profile(industry);
        let hue = self.pick(profile.hues, 210.0);
        let (base_s, base_l) = mood_profile(mood);
        let s = self.jitter(base_s);
        let l = self.jitter(base_l);

        debug!(industry, mood, hue, s, l, "Generated palette base");

        ColorPalette {
            primary: TintRamp {
                shades: tint_ramp(hue, s, l),
            },
            secondary: TintRamp {
                shades: tint_ramp(normalize_hue(hue + 180.0), s, l),
            },
            accent: TintRamp {
                shades: tint_ramp(normalize_hue(hue + 120.0), s, l),
            },
            neutral: TintRamp {
                shades: tint_ramp(hue, NEUTRAL_SATURATION, 50.0),
            },
        }
    }

    /// Uniform draw from the personality pool, or the industry's signature
    /// pool when the personality is that industry's native one.
    pub fn select_font_pairing(&mut self, personality: &str, industry: &str) -> FontPairing {
        let category = PersonalityCategory::from_personality(personality);
        self.font_pairing_for(category, industry, true)
    }

    fn font_pairing_for(
        &mut self,
        category: PersonalityCategory,
        industry: &str,
        allow_signature: bool,
    ) -> FontPairing {
        let profile = industry_profile(industry);
        let pool = if allow_signature
            && category == profile.native
            && !profile.signature_fonts.is_empty()
        {
            profile.signature_fonts
        } else {
            font_pool(category)
        };
        let (heading, body) = self.pick(pool, ("Inter", "Inter"));

        FontPairing {
            heading: heading.to_string(),
            body: body.to_string(),
            weights: font_weights(category).to_vec(),
            type_scale: type_scale(category).to_string(),
        }
    }

    /// Uniform draw from the hero pool for the personality.
    pub fn generate_hero_layout(&mut self, industry: &str, personality: &str) -> HeroLayout {
        let category = PersonalityCategory::from_personality(personality);
        self.hero_for(category, industry, true)
    }

    fn hero_for(
        &mut self,
        category: PersonalityCategory,
        industry: &str,
        allow_signature: bool,
    ) -> HeroLayout {
        let profile = industry_profile(industry);
        let pool = if allow_signature
            && category == profile.native
            && !profile.signature_heroes.is_empty()
        {
            profile.signature_heroes
        } else {
            hero_pool(category)
        };
        let variant = self.pick(pool, "classic-two-column");
        let alignment = layout_group(variant).map_or("left", |g| g.alignment());

        HeroLayout {
            variant: variant.to_string(),
            alignment: alignment.to_string(),
        }
    }

    /// Compose a full brief.
    ///
    /// Hero, feature-grid and footer choices come from the strategist when a
    /// manifest is supplied; otherwise they are drawn at random.
    pub fn generate_design_brief(
        &mut self,
        industry: &str,
        personality: &str,
        mood: &str,
        manifest: Option<&IntentManifest>,
    ) -> DesignBrief {
        let category = PersonalityCategory::from_personality(personality);
        self.compose(industry, category, mood, manifest, true)
    }

    /// Regenerate with a different personality bucket and no signature pools.
    pub fn regenerate_with_alternate_personality(
        &mut self,
        previous: &DesignBrief,
        manifest: Option<&IntentManifest>,
    ) -> DesignBrief {
        let category = previous.personality.alternate();
        debug!(
            from = %previous.personality,
            to = %category,
            "Regenerating brief with alternate personality"
        );
        self.compose(&previous.industry, category, &previous.mood, manifest, false)
    }

    fn compose(
        &mut self,
        industry: &str,
        category: PersonalityCategory,
        mood: &str,
        manifest: Option<&IntentManifest>,
        allow_signature: bool,
    ) -> DesignBrief {
        let palette = self.generate_color_palette(industry, mood);
        let fonts = self.font_pairing_for(category, industry, allow_signature);
        let style = self.pick(style_pool(category), ArtisticStyle::Minimalist);
        let (section_padding, container_width, grid_gap) = spacing_profile(category);
        let border_radius = self.pick(RADIUS_POOL, "rounded-md");

        let layout = match manifest {
            Some(manifest) => {
                let rec = recommend_layouts(manifest);
                LayoutChoices {
                    hero: HeroLayout {
                        variant: rec.hero.variant,
                        alignment: rec.hero.alignment,
                    },
                    features: rec.features,
                    products: rec.products,
                    footer: rec.footer,
                }
            }
            None => {
                let hero = self.hero_for(category, industry, allow_signature);
                LayoutChoices {
                    hero,
                    features: self.pick(FEATURE_POOL, "three-column-cards").to_string(),
                    products: self.pick(PRODUCT_POOL, "feature-cards").to_string(),
                    footer: self.pick(FOOTER_POOL, "simple-footer").to_string(),
                }
            }
        };

        DesignBrief {
            style,
            personality: category,
            industry: industry.to_string(),
            mood: mood.to_string(),
            palette,
            fonts,
            spacing: SpacingTokens {
                section_padding: section_padding.to_string(),
                container_width: container_width.to_string(),
                border_radius: border_radius.to_string(),
                grid_gap: grid_gap.to_string(),
            },
            layout,
        }
    }
}
