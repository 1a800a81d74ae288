//! Template artifacts used when a backend cannot produce a component.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use siteforge_design::DesignBrief;
use siteforge_design::strategist::mentions_any;
use siteforge_utils::types::{GeneratedFile, IntentManifest};

const BRAND_SUFFIXES: &[&str] = &["Co", "Studio", "Labs", "Collective", "House", "Works", "Hub"];

/// Canned marketing copy for one industry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CannedCopy {
    pub headline: &'static str,
    pub tagline: &'static str,
    pub cta: &'static str,
}

const COPY_TABLE: &[(&[&str], CannedCopy)] = &[
    (
        &["skate", "skateboard"],
        CannedCopy {
            headline: "Built for the streets",
            tagline: "Decks, wheels and gear picked by riders who skate every day.",
            cta: "Shop the drop",
        },
    ),
    (
        &["restaurant", "food", "dining"],
        CannedCopy {
            headline: "A table is waiting for you",
            tagline: "Seasonal plates, honest cooking and a room full of good company.",
            cta: "Book a table",
        },
    ),
    (
        &["cafe", "coffee", "bakery"],
        CannedCopy {
            headline: "Your new favourite corner",
            tagline: "Freshly roasted coffee and bakes made every morning.",
            cta: "Visit us",
        },
    ),
    (
        &["saas", "software", "tech", "technology"],
        CannedCopy {
            headline: "Ship faster with less busywork",
            tagline: "One workspace that keeps your team, data and releases in sync.",
            cta: "Start free trial",
        },
    ),
    (
        &["portfolio", "creative", "design", "designer"],
        CannedCopy {
            headline: "Selected work",
            tagline: "Projects made with care for people who notice the details.",
            cta: "Get in touch",
        },
    ),
    (
        &["legal", "law"],
        CannedCopy {
            headline: "Clear advice when it matters",
            tagline: "Experienced counsel that keeps you informed at every step.",
            cta: "Book a consultation",
        },
    ),
    (
        &["fitness", "gym"],
        CannedCopy {
            headline: "Stronger starts today",
            tagline: "Coaching, classes and a community that shows up with you.",
            cta: "Claim a free class",
        },
    ),
    (
        &["health", "healthcare", "clinic", "dental"],
        CannedCopy {
            headline: "Care that puts you first",
            tagline: "Friendly professionals and appointments that fit your week.",
            cta: "Book an appointment",
        },
    ),
];

const DEFAULT_COPY: CannedCopy = CannedCopy {
    headline: "Welcome",
    tagline: "Everything you need to know about what we do, in one place.",
    cta: "Get started",
};

/// Fallback hero imagery keyed by industry keyword.
const IMAGE_TABLE: &[(&[&str], &str)] = &[
    (&["skate", "skateboard"], "https://images.unsplash.com/featured/1600x900/?skateboarding"),
    (&["restaurant", "food"], "https://images.unsplash.com/featured/1600x900/?restaurant,food"),
    (&["cafe", "coffee", "bakery"], "https://images.unsplash.com/featured/1600x900/?coffee,cafe"),
    (&["saas", "software", "tech", "technology"], "https://images.unsplash.com/featured/1600x900/?workspace,technology"),
    (&["portfolio", "creative"], "https://images.unsplash.com/featured/1600x900/?studio,art"),
    (&["legal", "law"], "https://images.unsplash.com/featured/1600x900/?office,library"),
    (&["fitness", "gym"], "https://images.unsplash.com/featured/1600x900/?gym,fitness"),
    (&["health", "healthcare", "clinic"], "https://images.unsplash.com/featured/1600x900/?clinic,wellness"),
];

const DEFAULT_IMAGE: &str = "https://images.unsplash.com/featured/1600x900/?business";

/// Canned copy for the first matching industry keyword.
#[must_use]
pub fn canned_copy(industry: &str) -> CannedCopy {
    let lowered = industry.to_lowercase();
    COPY_TABLE
        .iter()
        .find(|(keywords, _)| mentions_any(&lowered, keywords))
        .map_or(DEFAULT_COPY, |(_, copy)| *copy)
}

/// Deterministic hero image for an industry.
#[must_use]
pub fn fallback_image_url(industry: &str) -> &'static str {
    let lowered = industry.to_lowercase();
    IMAGE_TABLE
        .iter()
        .find(|(keywords, _)| mentions_any(&lowered, keywords))
        .map_or(DEFAULT_IMAGE, |(_, url)| url)
}

fn capitalized_words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
}

/// `hero` → `Hero`, `practice-areas` → `PracticeAreas`.
#[must_use]
pub fn component_name(section: &str) -> String {
    capitalized_words(section).collect()
}

#[must_use]
pub fn component_path(section: &str) -> String {
    format!("src/components/{}.tsx", component_name(section))
}

fn industry_word(industry: &str) -> String {
    component_name(industry.split('-').next().unwrap_or(industry))
}

/// Builds structurally valid components from the brief and manifest alone.
#[derive(Debug, Clone)]
pub struct FallbackArtifactGenerator {
    rng: StdRng,
}

impl Default for FallbackArtifactGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl FallbackArtifactGenerator {
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

    /// Industry word plus a random suffix, e.g. `Skate Collective`.
    pub fn brand_name(&mut self, industry: &str) -> String {
        let word = industry_word(industry);
        let word = if word.is_empty() { "Studio".to_string() } else { word };
        let suffix = BRAND_SUFFIXES.choose(&mut self.rng).copied().unwrap_or("Co");
        format!("{word} {suffix}")
    }

    /// A self-contained component for `section`.
    pub fn component(
        &mut self,
        section: &str,
        brand: &str,
        brief: &DesignBrief,
        manifest: &IntentManifest,
    ) -> GeneratedFile {
        let name = component_name(section);
        let copy = canned_copy(&manifest.industry);
        let primary = brief.palette.primary.base();
        let accent = brief.palette.accent.base();
        let neutral = brief.palette.neutral.shade(900).unwrap_or("#111827");
        let surface = brief.palette.neutral.shade(50).unwrap_or("#f9fafb");
        let heading_font = &brief.fonts.heading;
        let body_font = &brief.fonts.body;
        let padding = &brief.spacing.section_padding;
        let width = &brief.spacing.container_width;
        let radius = &brief.spacing.border_radius;

        let (title, body) = match section {
            "hero" => (copy.headline.to_string(), copy.tagline.to_string()),
            "footer" => (
                brand.to_string(),
                format!("© {brand}. All rights reserved."),
            ),
            other => (
                title_case(other),
                format!("{} {}", goal_sentence(&manifest.goal), copy.tagline),
            ),
        };

        let content = format!(
            r##"export default function {name}() {{
  return (
    <section
      id="{section}"
      className="{padding} px-6"
      style={{{{ backgroundColor: "{surface}", color: "{neutral}", fontFamily: "'{body_font}', sans-serif" }}}}
    >
      <div className="{width} mx-auto">
        <h2 className="text-4xl font-bold mb-4" style={{{{ fontFamily: "'{heading_font}', serif", color: "{primary}" }}}}>
          {title}
        </h2>
        <p className="text-lg opacity-80 mb-8">{body}</p>
        <a
          href="#contact"
          className="inline-block px-6 py-3 {radius} text-white font-semibold"
          style={{{{ backgroundColor: "{accent}" }}}}
        >
          {cta}
        </a>
      </div>
    </section>
  );
}}
"##,
            cta = copy.cta,
        );

        GeneratedFile::new(component_path(section), content)
    }
}

fn title_case(section: &str) -> String {
    capitalized_words(section).collect::<Vec<_>>().join(" ")
}

/// `sell boards online` → `Sell boards online.`
fn goal_sentence(goal: &str) -> String {
    let goal = goal.trim().trim_end_matches('.');
    let mut chars = goal.chars();
    chars.next().map_or_else(String::new, |first| {
        format!("{}{}.", first.to_uppercase(), chars.as_str())
    })
}
