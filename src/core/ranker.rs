use crate::core::scoring::{score_agency, MatchError};
use crate::models::{Agency, MatchPreferences, ScoredAgency, ScoringWeights};

/// Result of one ranking pass.
#[derive(Debug)]
pub struct RankResult {
    pub matches: Vec<ScoredAgency>,
    pub total_candidates: usize,
}

/// Smart Match orchestrator: scores every candidate agency against one
/// customer's preferences and orders them best-first.
///
/// Pure and stateless; the agency list is treated as an immutable snapshot
/// for the duration of one call.
#[derive(Debug, Clone)]
pub struct Ranker {
    weights: ScoringWeights,
}

impl Ranker {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    /// Rank agencies by Smart Match score, descending.
    ///
    /// Every agency in the input appears in the output, zero-score entries
    /// included. The sort is stable: agencies with equal scores keep their
    /// input order.
    pub fn rank(
        &self,
        preferences: &MatchPreferences,
        agencies: Vec<Agency>,
    ) -> Result<RankResult, MatchError> {
        let total_candidates = agencies.len();

        let mut matches: Vec<ScoredAgency> = agencies
            .into_iter()
            .map(|agency| {
                let breakdown = score_agency(&agency, preferences, &self.weights)?;
                Ok(ScoredAgency {
                    match_score: breakdown.score(),
                    breakdown,
                    position: 0,
                    id: agency.id,
                    name: agency.name,
                    location: agency.location,
                    description: agency.description,
                    event_types: agency.event_types,
                    budget_range: agency.budget_range,
                    rating: agency.rating,
                    review_count: agency.review_count,
                    image_url: agency.image_url,
                })
            })
            .collect::<Result<_, MatchError>>()?;

        // Vec::sort_by is stable, so ties preserve input order.
        matches.sort_by(|a, b| b.match_score.cmp(&a.match_score));

        for (index, scored) in matches.iter_mut().enumerate() {
            scored.position = index as u32 + 1;
        }

        Ok(RankResult {
            matches,
            total_candidates,
        })
    }
}

impl Default for Ranker {
    fn default() -> Self {
        Self::with_default_weights()
    }
}
