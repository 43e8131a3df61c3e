//! Weighted scoring and deterministic ranking of underwriters against a risk
//! profile. Scoring is a pure function of its inputs: no caching across
//! profiles, no dependence on directory iteration order.

mod config;
mod rules;

pub use config::RoutingConfig;
pub use rules::{ScoreComponent, ScoringCriterion};

use serde::{Deserialize, Serialize};

use super::directory::UnderwriterRecord;
use super::domain::RiskProfile;

/// One underwriter's score with its contributing-factor trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub underwriter: UnderwriterRecord,
    pub score: f64,
    /// One entry per non-zero scoring term, in evaluation order.
    pub justification: Vec<ScoreComponent>,
}

impl ScoredCandidate {
    /// Human-readable digest of the trace, for views and demo output.
    pub fn summary(&self) -> String {
        if self.justification.is_empty() {
            return "no scoring criteria matched".to_string();
        }

        self.justification
            .iter()
            .map(|component| format!("{} ({:+.1})", component.notes, component.points))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Routing decision attached to a submission once ranking completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingOutcome {
    pub profile: RiskProfile,
    pub ranked: Vec<ScoredCandidate>,
}

impl RoutingOutcome {
    pub fn recommended(&self) -> Option<&ScoredCandidate> {
        self.ranked.first()
    }
}

/// Stateless scorer applying the configured weights.
#[derive(Debug, Clone, Default)]
pub struct RoutingEngine {
    config: RoutingConfig,
}

impl RoutingEngine {
    pub fn new(config: RoutingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    /// Score a single underwriter. Never fails; a candidate with nothing in
    /// common simply scores at or below zero.
    pub fn score(&self, profile: &RiskProfile, underwriter: &UnderwriterRecord) -> ScoredCandidate {
        let (justification, score) = rules::score_terms(profile, underwriter, &self.config);
        ScoredCandidate {
            underwriter: underwriter.clone(),
            score,
            justification,
        }
    }

    /// Rank a directory against a profile, best first.
    ///
    /// Ties break by higher acceptance rate, then lower turnaround, then
    /// underwriter id, so the ordering is reproducible regardless of input
    /// permutation. An empty directory yields an empty list.
    pub fn rank(
        &self,
        profile: &RiskProfile,
        underwriters: &[UnderwriterRecord],
        top_n: usize,
    ) -> Vec<ScoredCandidate> {
        let mut candidates: Vec<ScoredCandidate> = underwriters
            .iter()
            .map(|underwriter| self.score(profile, underwriter))
            .collect();

        candidates.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| {
                    b.underwriter
                        .acceptance_rate
                        .total_cmp(&a.underwriter.acceptance_rate)
                })
                .then_with(|| {
                    a.underwriter
                        .avg_turnaround_days
                        .total_cmp(&b.underwriter.avg_turnaround_days)
                })
                .then_with(|| a.underwriter.id.cmp(&b.underwriter.id))
        });

        candidates.truncate(top_n);
        candidates
    }
}
