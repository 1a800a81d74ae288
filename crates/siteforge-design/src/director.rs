//! Brief drafting with duplicate avoidance.

use serde::Serialize;
use tracing::{debug, info};

use siteforge_utils::types::IntentManifest;

use crate::brief::DesignBrief;
use crate::similarity::{SimilarityGuard, SimilarityScore};
use crate::variation::DesignVariationGenerator;

/// Tunables for [`DesignDirector`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectorSettings {
    pub similarity_threshold: f64,
    pub history_window: usize,
    pub history_capacity: usize,
    pub max_regenerations: u32,
    pub seed: Option<u64>,
}

impl Default for DirectorSettings {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.75,
            history_window: 10,
            history_capacity: 50,
            max_regenerations: 1,
            seed: None,
        }
    }
}

/// Result of one drafting pass.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftOutcome {
    pub brief: DesignBrief,
    /// Score of the accepted brief.
    pub score: SimilarityScore,
    pub regenerations: u32,
}

/// Owns the variation generator and the similarity guard for a process.
///
/// A brief leaves `draft` only after it passed the guard or the regeneration
/// budget ran out, and every returned brief has been recorded.
#[derive(Debug)]
pub struct DesignDirector {
    generator: DesignVariationGenerator,
    guard: SimilarityGuard,
    max_regenerations: u32,
}

impl DesignDirector {
    #[must_use]
    pub fn new(settings: DirectorSettings) -> Self {
        let generator = match settings.seed {
            Some(seed) => DesignVariationGenerator::with_seed(seed),
            None => DesignVariationGenerator::new(),
        };
        Self {
            generator,
            guard: SimilarityGuard::new(
                settings.history_capacity,
                settings.history_window,
                settings.similarity_threshold,
            ),
            max_regenerations: settings.max_regenerations,
        }
    }

    pub fn draft(
        &mut self,
        industry: &str,
        personality: &str,
        mood: &str,
        manifest: Option<&IntentManifest>,
    ) -> DraftOutcome {
        let mut brief = self
            .generator
            .generate_design_brief(industry, personality, mood, manifest);
        let mut score = self.guard.evaluate(&brief);
        let mut regenerations = 0;

        while score.too_similar && regenerations < self.max_regenerations {
            info!(
                industry,
                overall = score.overall,
                "Design brief too similar to recent history, regenerating"
            );
            brief = self
                .generator
                .regenerate_with_alternate_personality(&brief, manifest);
            score = self.guard.evaluate(&brief);
            regenerations += 1;
        }

        if score.too_similar {
            debug!(industry, "Regeneration budget spent, accepting brief");
        }

        self.guard.record(&brief);
        DraftOutcome {
            brief,
            score,
            regenerations,
        }
    }

    #[must_use]
    pub fn guard(&self) -> &SimilarityGuard {
        &self.guard
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> DesignDirector {
        DesignDirector::new(DirectorSettings {
            seed: Some(seed),
            ..DirectorSettings::default()
        })
    }

    #[test]
    fn test_first_draft_never_regenerates() {
        let mut director = seeded(1);
        let outcome = director.draft("saas", "technical", "calm", None);
        assert_eq!(outcome.regenerations, 0);
        assert_eq!(outcome.score.overall, 0.0);
        assert_eq!(director.guard().len(), 1);
    }

    #[test]
    fn test_every_draft_is_recorded() {
        let mut director = seeded(4);
        for _ in 0..5 {
            director.draft("cafe", "warm", "warm", None);
        }
        assert_eq!(director.guard().len(), 5);
    }

    #[test]
    fn test_zero_budget_accepts_immediately() {
        let mut director = DesignDirector::new(DirectorSettings {
            max_regenerations: 0,
            similarity_threshold: 0.0,
            seed: Some(8),
            ..DirectorSettings::default()
        });
        director.draft("legal", "elegant", "elegant", None);
        let second = director.draft("legal", "elegant", "elegant", None);
        assert!(second.score.too_similar);
        assert_eq!(second.regenerations, 0);
    }
}
