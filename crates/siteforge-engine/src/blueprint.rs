//! Keyword classification and per-industry blueprints for the heuristic path.

use siteforge_design::strategist::mentions_any;
use siteforge_utils::types::{Audience, IntentManifest};

/// Ordered keyword → industry rules; the first rule with a matching keyword wins.
const INDUSTRY_RULES: &[(&str, &[&str])] = &[
    ("skate-shop", &["skate", "skateboard"]),
    ("restaurant", &["restaurant", "bistro", "diner", "pizzeria", "pizza", "sushi", "taqueria", "food truck"]),
    ("cafe", &["cafe", "café", "coffee", "bakery", "tea house", "espresso"]),
    ("saas", &["saas", "software", "startup", "platform", "app", "api", "dashboard"]),
    ("portfolio", &["portfolio", "photographer", "illustrator", "designer", "artist"]),
    ("legal", &["law firm", "lawyer", "attorney", "legal"]),
    ("fitness", &["gym", "fitness", "yoga", "pilates", "personal trainer", "crossfit"]),
    ("healthcare", &["clinic", "dental", "dentist", "doctor", "health", "healthcare", "therapy", "therapist"]),
    ("ecommerce", &["shop", "store", "boutique", "ecommerce", "e-commerce", "merch", "apparel"]),
];

const FALLBACK_INDUSTRY: &str = "business";

/// Personality adjectives lifted verbatim from a prompt.
const PERSONALITY_WORDS: &[&str] = &[
    "dark", "edgy", "rebellious", "bold", "gritty", "playful", "fun", "quirky", "elegant",
    "luxury", "minimal", "clean", "calm", "warm", "cozy", "friendly", "modern", "sleek",
    "technical", "professional", "vibrant", "retro",
];

/// Fixed defaults used to synthesize a manifest for an industry.
#[derive(Debug, Clone, Copy)]
pub struct Blueprint {
    pub industry: &'static str,
    pub sub_category: &'static str,
    pub goal: &'static str,
    pub personality: &'static str,
    pub sections: &'static [&'static str],
    pub layout_style: &'static str,
    pub tone: &'static str,
    pub age_range: &'static str,
    pub income: &'static str,
    pub values: &'static [&'static str],
    pub differentiators: &'static [&'static str],
}

const GENERIC: Blueprint = Blueprint {
    industry: FALLBACK_INDUSTRY,
    sub_category: "local business",
    goal: "introduce the business and drive enquiries",
    personality: "modern, trustworthy",
    sections: &["hero", "features", "about", "testimonials", "contact", "footer"],
    layout_style: "balanced",
    tone: "confident",
    age_range: "25-54",
    income: "middle",
    values: &["reliability", "quality"],
    differentiators: &["personal service"],
};

#[must_use]
pub fn blueprint(industry: &str) -> Blueprint {
    match industry {
        "skate-shop" => Blueprint {
            industry: "skate-shop",
            sub_category: "street skate retail",
            goal: "sell boards and gear online and build the local scene",
            personality: "rebellious, energetic",
            sections: &["hero", "products", "team", "events", "gallery", "footer"],
            layout_style: "bold",
            tone: "irreverent",
            age_range: "14-30",
            income: "low to middle",
            values: &["authenticity", "community", "self-expression"],
            differentiators: &["rider-owned", "local team videos"],
        },
        "restaurant" => Blueprint {
            industry: "restaurant",
            sub_category: "casual dining",
            goal: "fill tables with online booking",
            personality: "warm, welcoming",
            sections: &["hero", "menu", "about", "gallery", "testimonials", "reservations", "footer"],
            layout_style: "image-led",
            tone: "inviting",
            age_range: "25-60",
            income: "middle",
            values: &["fresh ingredients", "hospitality"],
            differentiators: &["seasonal menu", "family recipes"],
        },
        "cafe" => Blueprint {
            industry: "cafe",
            sub_category: "specialty coffee",
            goal: "bring people in and sell beans online",
            personality: "cozy, friendly",
            sections: &["hero", "menu", "about", "location", "footer"],
            layout_style: "image-led",
            tone: "friendly",
            age_range: "20-45",
            income: "middle",
            values: &["craft", "community"],
            differentiators: &["single-origin roasts"],
        },
        "saas" => Blueprint {
            industry: "saas",
            sub_category: "b2b software",
            goal: "convert visitors into free trial signups",
            personality: "modern, technical",
            sections: &["hero", "features", "integrations", "pricing", "testimonials", "faq", "footer"],
            layout_style: "conversion",
            tone: "clear",
            age_range: "25-50",
            income: "upper middle",
            values: &["efficiency", "reliability"],
            differentiators: &["fast onboarding", "transparent pricing"],
        },
        "portfolio" => Blueprint {
            industry: "portfolio",
            sub_category: "creative portfolio",
            goal: "showcase creative work and win commissions",
            personality: "minimal, elegant",
            sections: &["hero", "gallery", "about", "contact", "footer"],
            layout_style: "typography-led",
            tone: "personal",
            age_range: "25-55",
            income: "varied",
            values: &["craft", "originality"],
            differentiators: &["distinct visual voice"],
        },
        "legal" => Blueprint {
            industry: "legal",
            sub_category: "law firm",
            goal: "generate qualified consultation requests",
            personality: "elegant, professional",
            sections: &["hero", "practice-areas", "team", "testimonials", "contact", "footer"],
            layout_style: "classic",
            tone: "authoritative",
            age_range: "30-65",
            income: "upper middle",
            values: &["trust", "discretion"],
            differentiators: &["decades of experience"],
        },
        "fitness" => Blueprint {
            industry: "fitness",
            sub_category: "gym",
            goal: "sign up new members for a free trial class",
            personality: "bold, energetic",
            sections: &["hero", "classes", "trainers", "pricing", "testimonials", "footer"],
            layout_style: "bold",
            tone: "motivating",
            age_range: "18-45",
            income: "middle",
            values: &["health", "discipline"],
            differentiators: &["small group coaching"],
        },
        "healthcare" => Blueprint {
            industry: "healthcare",
            sub_category: "clinic",
            goal: "make booking an appointment easy",
            personality: "calm, friendly",
            sections: &["hero", "services", "team", "testimonials", "contact", "footer"],
            layout_style: "balanced",
            tone: "reassuring",
            age_range: "all ages",
            income: "varied",
            values: &["care", "trust"],
            differentiators: &["same-week appointments"],
        },
        "ecommerce" => Blueprint {
            industry: "ecommerce",
            sub_category: "online store",
            goal: "sell products online",
            personality: "modern, vibrant",
            sections: &["hero", "products", "features", "testimonials", "newsletter", "footer"],
            layout_style: "product-led",
            tone: "upbeat",
            age_range: "18-45",
            income: "middle",
            values: &["quality", "value"],
            differentiators: &["free shipping"],
        },
        _ => GENERIC,
    }
}

/// First industry with a keyword appearing as a whole word in the prompt.
#[must_use]
pub fn classify_industry(prompt: &str) -> &'static str {
    let lowered = prompt.to_lowercase();
    INDUSTRY_RULES
        .iter()
        .find(|(_, keywords)| mentions_any(&lowered, keywords))
        .map_or(FALLBACK_INDUSTRY, |(industry, _)| industry)
}

/// Personality adjectives present in the prompt, in table order.
#[must_use]
pub fn personality_words(prompt: &str) -> Vec<&'static str> {
    let lowered = prompt.to_lowercase();
    PERSONALITY_WORDS
        .iter()
        .copied()
        .filter(|word| mentions_any(&lowered, &[word]))
        .collect()
}

/// Build a manifest from the prompt alone. Never fails.
#[must_use]
pub fn heuristic_manifest(prompt: &str) -> IntentManifest {
    let bp = blueprint(classify_industry(prompt));
    let words = personality_words(prompt);
    let personality = if words.is_empty() {
        bp.personality.to_string()
    } else {
        words.join(", ")
    };
    let owned = |items: &[&str]| items.iter().map(ToString::to_string).collect::<Vec<_>>();

    IntentManifest {
        goal: bp.goal.to_string(),
        audience: Audience {
            age_range: bp.age_range.to_string(),
            income: bp.income.to_string(),
            values: owned(bp.values),
        },
        personality,
        industry: bp.industry.to_string(),
        sub_category: bp.sub_category.to_string(),
        sections: owned(bp.sections),
        layout_style: bp.layout_style.to_string(),
        competitors: Vec::new(),
        tone: bp.tone.to_string(),
        differentiators: owned(bp.differentiators),
    }
}

/// Compact archetype notes embedded in the analysis prompt.
#[must_use]
pub fn knowledge_snippet() -> String {
    let mut out = String::from("Industry archetypes (slug: typical sections | layout):\n");
    for (industry, _) in INDUSTRY_RULES {
        let bp = blueprint(industry);
        out.push_str(&format!(
            "- {}: {} | {}\n",
            bp.industry,
            bp.sections.join(", "),
            bp.layout_style
        ));
    }
    out.push_str(
        "Layout heuristics: conversion goals want a split hero with a form; \
         portfolios lead with typography; software shows a product preview; \
         more than six sections calls for a dense grid.\n",
    );
    out
}
