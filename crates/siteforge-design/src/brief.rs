//! Design brief data model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::strategist::mentions_any;

/// Visual direction of a brief.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ArtisticStyle {
    Minimalist,
    Brutalist,
    Editorial,
    Organic,
    Glassmorphism,
    Retro,
    Corporate,
    Playful,
}

/// Coarse personality bucket used to key the curated option pools.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PersonalityCategory {
    Playful,
    Elegant,
    Bold,
    Minimal,
    Technical,
    Friendly,
    Modern,
}

impl PersonalityCategory {
    const KEYWORDS: &'static [(PersonalityCategory, &'static [&'static str])] = &[
        (
            Self::Playful,
            &["playful", "fun", "quirky", "whimsical", "vibrant", "energetic"],
        ),
        (
            Self::Elegant,
            &["elegant", "luxury", "sophisticated", "refined", "premium", "classic"],
        ),
        (
            Self::Bold,
            &["bold", "edgy", "dark", "rebellious", "loud", "gritty", "raw"],
        ),
        (Self::Minimal, &["minimal", "clean", "simple", "calm", "zen"]),
        (
            Self::Technical,
            &["technical", "tech", "precise", "developer", "futuristic", "data"],
        ),
        (
            Self::Friendly,
            &["friendly", "warm", "welcoming", "cozy", "approachable", "homey"],
        ),
        (Self::Modern, &["modern", "sleek", "fresh", "contemporary"]),
    ];

    /// Classify a free-form personality string; first matching bucket wins.
    #[must_use]
    pub fn from_personality(personality: &str) -> Self {
        let lowered = personality.to_lowercase();
        Self::KEYWORDS
            .iter()
            .find(|(_, words)| mentions_any(&lowered, words))
            .map_or(Self::Modern, |(category, _)| *category)
    }

    /// A different bucket, used when a brief must be regenerated.
    #[must_use]
    pub fn alternate(self) -> Self {
        match self {
            Self::Playful => Self::Minimal,
            Self::Elegant => Self::Modern,
            Self::Bold => Self::Elegant,
            Self::Minimal => Self::Bold,
            Self::Technical => Self::Friendly,
            Self::Friendly => Self::Technical,
            Self::Modern => Self::Playful,
        }
    }
}

/// Tint ramp keyed by weight (50..900).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TintRamp {
    pub shades: BTreeMap<u16, String>,
}

impl TintRamp {
    #[must_use]
    pub fn shade(&self, weight: u16) -> Option<&str> {
        self.shades.get(&weight).map(String::as_str)
    }

    /// The 500 weight.
    #[must_use]
    pub fn base(&self) -> &str {
        self.shade(500).unwrap_or("#000000")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPalette {
    pub primary: TintRamp,
    pub secondary: TintRamp,
    pub accent: TintRamp,
    pub neutral: TintRamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontPairing {
    pub heading: String,
    pub body: String,
    pub weights: Vec<u16>,
    /// Named modular scale, e.g. `major-third`.
    pub type_scale: String,
}

impl FontPairing {
    /// `Heading|Body`, the identity used by the similarity guard.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}|{}", self.heading, self.body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacingTokens {
    pub section_padding: String,
    pub container_width: String,
    pub border_radius: String,
    pub grid_gap: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroLayout {
    /// Layout variant id, e.g. `split-screen`.
    pub variant: String,
    pub alignment: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutChoices {
    pub hero: HeroLayout,
    pub features: String,
    pub products: String,
    pub footer: String,
}

/// Complete visual direction for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignBrief {
    pub style: ArtisticStyle,
    pub personality: PersonalityCategory,
    pub industry: String,
    pub mood: String,
    pub palette: ColorPalette,
    pub fonts: FontPairing,
    pub spacing: SpacingTokens,
    pub layout: LayoutChoices,
}
