//! Curated option pools.
//!
//! Every random choice the variation generator makes is a uniform draw from one
//! of these fixed tables.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

use crate::brief::{ArtisticStyle, PersonalityCategory};

/// Per-industry palette and signature choices.
#[derive(Debug, Clone, Copy)]
pub struct IndustryProfile {
    /// Candidate base hues in degrees.
    pub hues: &'static [f64],
    /// Personality the signature pools belong to.
    pub native: PersonalityCategory,
    pub signature_fonts: &'static [(&'static str, &'static str)],
    pub signature_heroes: &'static [&'static str],
}

const DEFAULT_PROFILE: IndustryProfile = IndustryProfile {
    hues: &[200.0, 210.0, 160.0, 30.0, 260.0, 340.0],
    native: PersonalityCategory::Modern,
    signature_fonts: &[],
    signature_heroes: &[],
};

#[must_use]
pub fn industry_profile(industry: &str) -> IndustryProfile {
    match industry {
        "restaurant" => IndustryProfile {
            hues: &[4.0, 12.0, 20.0, 28.0, 356.0],
            native: PersonalityCategory::Friendly,
            signature_fonts: &[
                ("Playfair Display", "Lato"),
                ("Playfair Display", "Source Sans 3"),
            ],
            signature_heroes: &["full-bleed-image", "video-background"],
        },
        "cafe" => IndustryProfile {
            hues: &[20.0, 25.0, 30.0, 35.0, 40.0],
            native: PersonalityCategory::Friendly,
            signature_fonts: &[("Fraunces", "Inter"), ("Fraunces", "Nunito Sans")],
            signature_heroes: &["full-bleed-image", "split-screen"],
        },
        "skate-shop" => IndustryProfile {
            hues: &[0.0, 90.0, 200.0, 280.0, 330.0],
            native: PersonalityCategory::Bold,
            signature_fonts: &[("Bebas Neue", "Inter"), ("Anton", "Roboto")],
            signature_heroes: &["asymmetric-collage", "video-background"],
        },
        "saas" => IndustryProfile {
            hues: &[190.0, 210.0, 220.0, 230.0, 250.0],
            native: PersonalityCategory::Technical,
            ..DEFAULT_PROFILE
        },
        "portfolio" => IndustryProfile {
            hues: &[0.0, 30.0, 160.0, 200.0, 260.0],
            native: PersonalityCategory::Minimal,
            ..DEFAULT_PROFILE
        },
        "legal" => IndustryProfile {
            hues: &[215.0, 220.0, 225.0, 30.0, 45.0],
            native: PersonalityCategory::Elegant,
            ..DEFAULT_PROFILE
        },
        "fitness" => IndustryProfile {
            hues: &[0.0, 15.0, 100.0, 195.0, 280.0],
            native: PersonalityCategory::Bold,
            ..DEFAULT_PROFILE
        },
        "ecommerce" => IndustryProfile {
            hues: &[340.0, 200.0, 160.0, 30.0, 260.0],
            ..DEFAULT_PROFILE
        },
        "healthcare" => IndustryProfile {
            hues: &[150.0, 180.0, 190.0, 200.0, 210.0],
            native: PersonalityCategory::Friendly,
            ..DEFAULT_PROFILE
        },
        _ => DEFAULT_PROFILE,
    }
}

/// Saturation and lightness (percent) for a mood keyword.
#[must_use]
pub fn mood_profile(mood: &str) -> (f64, f64) {
    let mood = mood.to_lowercase();
    let has = |w: &str| mood.contains(w);
    if has("dark") || has("edgy") {
        (55.0, 35.0)
    } else if has("warm") {
        (65.0, 50.0)
    } else if has("calm") {
        (40.0, 60.0)
    } else if has("bold") {
        (85.0, 50.0)
    } else if has("minimal") || has("elegant") {
        (20.0, 45.0)
    } else if has("playful") {
        (75.0, 60.0)
    } else if has("professional") {
        (50.0, 45.0)
    } else {
        (60.0, 50.0)
    }
}

#[must_use]
pub fn font_pool(category: PersonalityCategory) -> &'static [(&'static str, &'static str)] {
    match category {
        PersonalityCategory::Playful => &[
            ("Fredoka", "Nunito"),
            ("Baloo 2", "Quicksand"),
            ("Chewy", "Poppins"),
            ("Bubblegum Sans", "Open Sans"),
        ],
        PersonalityCategory::Elegant => &[
            ("Cormorant Garamond", "Montserrat"),
            ("Libre Baskerville", "Source Sans 3"),
            ("DM Serif Display", "Inter"),
            ("Playfair Display", "Raleway"),
        ],
        PersonalityCategory::Bold => &[
            ("Bebas Neue", "Roboto"),
            ("Anton", "Open Sans"),
            ("Archivo Black", "Work Sans"),
            ("Oswald", "Inter"),
        ],
        PersonalityCategory::Minimal => &[
            ("Inter", "Inter"),
            ("Manrope", "Manrope"),
            ("DM Sans", "DM Sans"),
            ("Outfit", "Karla"),
        ],
        PersonalityCategory::Technical => &[
            ("JetBrains Mono", "Inter"),
            ("Space Grotesk", "IBM Plex Sans"),
            ("IBM Plex Mono", "IBM Plex Sans"),
            ("Sora", "Inter"),
        ],
        PersonalityCategory::Friendly => &[
            ("Poppins", "Open Sans"),
            ("Nunito", "Nunito Sans"),
            ("Rubik", "Karla"),
            ("Lora", "Lato"),
        ],
        PersonalityCategory::Modern => &[
            ("Space Grotesk", "Inter"),
            ("Outfit", "Inter"),
            ("Plus Jakarta Sans", "Inter"),
            ("Syne", "DM Sans"),
        ],
    }
}

#[must_use]
pub fn hero_pool(category: PersonalityCategory) -> &'static [&'static str] {
    match category {
        PersonalityCategory::Playful => &[
            "floating-cards",
            "asymmetric-collage",
            "bento-hero",
            "gradient-spotlight",
        ],
        PersonalityCategory::Elegant => &[
            "full-bleed-image",
            "editorial-stack",
            "minimal-statement",
            "classic-two-column",
        ],
        PersonalityCategory::Bold => &[
            "diagonal-split",
            "video-background",
            "asymmetric-collage",
            "split-screen",
        ],
        PersonalityCategory::Minimal => &[
            "minimal-statement",
            "centered-typography",
            "classic-two-column",
            "editorial-stack",
        ],
        PersonalityCategory::Technical => &[
            "dashboard-preview",
            "split-screen",
            "bento-hero",
            "gradient-spotlight",
        ],
        PersonalityCategory::Friendly => &[
            "classic-two-column",
            "full-bleed-image",
            "floating-cards",
            "scroll-story",
        ],
        PersonalityCategory::Modern => &[
            "bento-hero",
            "gradient-spotlight",
            "split-screen",
            "editorial-stack",
        ],
    }
}

pub const FEATURE_POOL: &[&str] = &["three-column-cards", "bento-grid", "zig-zag", "icon-list"];
pub const PRODUCT_POOL: &[&str] = &["feature-cards", "product-grid-quickview", "carousel"];
pub const FOOTER_POOL: &[&str] = &["simple-footer", "cta-footer", "mega-footer"];

#[must_use]
pub fn style_pool(category: PersonalityCategory) -> &'static [ArtisticStyle] {
    match category {
        PersonalityCategory::Playful => &[ArtisticStyle::Playful, ArtisticStyle::Retro],
        PersonalityCategory::Elegant => &[ArtisticStyle::Editorial, ArtisticStyle::Minimalist],
        PersonalityCategory::Bold => &[ArtisticStyle::Brutalist, ArtisticStyle::Retro],
        PersonalityCategory::Minimal => &[ArtisticStyle::Minimalist, ArtisticStyle::Glassmorphism],
        PersonalityCategory::Technical => &[ArtisticStyle::Glassmorphism, ArtisticStyle::Corporate],
        PersonalityCategory::Friendly => &[ArtisticStyle::Organic, ArtisticStyle::Playful],
        PersonalityCategory::Modern => &[
            ArtisticStyle::Glassmorphism,
            ArtisticStyle::Minimalist,
            ArtisticStyle::Editorial,
        ],
    }
}

#[must_use]
pub fn type_scale(category: PersonalityCategory) -> &'static str {
    match category {
        PersonalityCategory::Elegant | PersonalityCategory::Modern => "perfect-fourth",
        PersonalityCategory::Bold => "golden-ratio",
        PersonalityCategory::Minimal => "minor-third",
        PersonalityCategory::Technical => "major-second",
        PersonalityCategory::Playful | PersonalityCategory::Friendly => "major-third",
    }
}

#[must_use]
pub fn font_weights(category: PersonalityCategory) -> &'static [u16] {
    match category {
        PersonalityCategory::Bold => &[400, 700, 900],
        PersonalityCategory::Minimal => &[300, 400, 600],
        _ => &[400, 600, 700],
    }
}

/// (section padding, container width, grid gap) per personality.
#[must_use]
pub fn spacing_profile(category: PersonalityCategory) -> (&'static str, &'static str, &'static str) {
    match category {
        PersonalityCategory::Minimal | PersonalityCategory::Elegant => ("py-32", "max-w-5xl", "gap-16"),
        PersonalityCategory::Bold => ("py-16", "max-w-7xl", "gap-4"),
        PersonalityCategory::Technical => ("py-20", "max-w-7xl", "gap-8"),
        _ => ("py-24", "max-w-6xl", "gap-10"),
    }
}

pub const RADIUS_POOL: &[&str] = &["rounded-none", "rounded-md", "rounded-xl", "rounded-3xl"];

/// Hero layout families used for partial layout similarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum LayoutGroup {
    Grid,
    Centered,
    Creative,
}

impl LayoutGroup {
    /// Text alignment that suits the group.
    #[must_use]
    pub const fn alignment(self) -> &'static str {
        match self {
            Self::Grid => "left",
            Self::Centered => "center",
            Self::Creative => "offset",
        }
    }
}

#[must_use]
pub fn layout_group(variant: &str) -> Option<LayoutGroup> {
    match variant {
        "split-screen" | "classic-two-column" | "dashboard-preview" | "bento-hero" => {
            Some(LayoutGroup::Grid)
        }
        "centered-typography" | "minimal-statement" | "video-background" | "full-bleed-image"
        | "gradient-spotlight" => Some(LayoutGroup::Centered),
        "asymmetric-collage" | "editorial-stack" | "diagonal-split" | "floating-cards"
        | "scroll-story" => Some(LayoutGroup::Creative),
        _ => None,
    }
}

/// Typeface classification used for partial font similarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontCategory {
    Serif,
    Sans,
    Mono,
    Display,
}

#[must_use]
pub fn font_category(family: &str) -> FontCategory {
    match family {
        "Playfair Display" | "Cormorant Garamond" | "Libre Baskerville" | "DM Serif Display"
        | "Lora" | "Fraunces" | "Merriweather" | "Source Serif 4" => FontCategory::Serif,
        "JetBrains Mono" | "IBM Plex Mono" => FontCategory::Mono,
        "Bebas Neue" | "Anton" | "Archivo Black" | "Oswald" | "Chewy" | "Bubblegum Sans"
        | "Fredoka" | "Baloo 2" | "Syne" => FontCategory::Display,
        _ => FontCategory::Sans,
    }
}
