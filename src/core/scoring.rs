use crate::models::{Agency, MatchBreakdown, MatchPreferences, ScoringWeights};
use thiserror::Error;

/// Review count at which the review-volume component saturates.
const REVIEW_SATURATION: f64 = 50.0;

/// Top of the rating scale agencies are reviewed on.
const RATING_SCALE: f64 = 5.0;

/// Tolerance band applied when the stated budget falls outside an agency's
/// quoted range: [min * 0.8, max * 1.2] still earns partial credit.
const BUDGET_STRETCH_LOWER: f64 = 0.8;
const BUDGET_STRETCH_UPPER: f64 = 1.2;

/// Malformed preference input. A missing or nonsensical field never scores;
/// the caller gets a typed error instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("event type must not be empty")]
    EmptyEventType,
    #[error("location must not be empty")]
    EmptyLocation,
    #[error("budget must be a positive, finite number")]
    InvalidBudget,
}

/// Reject preferences the scoring formula cannot honestly evaluate.
pub fn validate_preferences(preferences: &MatchPreferences) -> Result<(), MatchError> {
    if preferences.event_type.trim().is_empty() {
        return Err(MatchError::EmptyEventType);
    }
    if preferences.location.trim().is_empty() {
        return Err(MatchError::EmptyLocation);
    }
    if !preferences.budget.is_finite() || preferences.budget <= 0.0 {
        return Err(MatchError::InvalidBudget);
    }
    Ok(())
}

/// Calculate the Smart Match breakdown for one agency.
///
/// Score composition (with default weights, maximum 100):
/// - Event type match: 40, all or nothing
/// - Location match: 30 for a substring hit, 15 otherwise, never 0
/// - Budget compatibility: 20 in range, 10 in the stretch band, else 0
/// - Rating & review volume: up to 8 + 2, fractional
///
/// Pure and deterministic: identical inputs always produce the identical
/// breakdown.
pub fn score_agency(
    agency: &Agency,
    preferences: &MatchPreferences,
    weights: &ScoringWeights,
) -> Result<MatchBreakdown, MatchError> {
    validate_preferences(preferences)?;

    // Event type: exact tag equality, case-insensitive. No partial credit
    // for related categories.
    let wanted_type = preferences.event_type.to_lowercase();
    let event_type_points = if agency
        .event_types
        .iter()
        .any(|t| t.to_lowercase() == wanted_type)
    {
        weights.event_type
    } else {
        0.0
    };

    // Location: substring containment, case-insensitive. A miss still earns
    // partial credit since the agency could travel.
    let location_points = if agency
        .location
        .to_lowercase()
        .contains(&preferences.location.to_lowercase())
    {
        weights.location_full
    } else {
        weights.location_partial
    };

    // Budget: full points inside the quoted range, partial inside the
    // stretch band, nothing beyond that.
    let range = agency.budget_range;
    let budget_points = if preferences.budget >= range.min && preferences.budget <= range.max {
        weights.budget_in_range
    } else if preferences.budget >= range.min * BUDGET_STRETCH_LOWER
        && preferences.budget <= range.max * BUDGET_STRETCH_UPPER
    {
        weights.budget_stretch
    } else {
        0.0
    };

    // Rating and review volume, both fractional.
    let rating_points = (agency.rating / RATING_SCALE) * weights.rating;
    let review_points =
        (f64::from(agency.review_count) / REVIEW_SATURATION).min(1.0) * weights.reviews;

    Ok(MatchBreakdown {
        event_type_points,
        location_points,
        budget_points,
        rating_points,
        review_points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BudgetRange;
    use uuid::Uuid;

    fn mumbai_wedding_agency() -> Agency {
        Agency {
            id: Uuid::new_v4(),
            name: "Elite Marriages".to_string(),
            location: "Mumbai, Maharashtra".to_string(),
            description: "Premium wedding planning.".to_string(),
            event_types: vec!["Wedding".to_string()],
            budget_range: BudgetRange {
                min: 200_000.0,
                max: 800_000.0,
            },
            rating: 4.7,
            review_count: 80,
            image_url: None,
        }
    }

    fn preferences(event_type: &str, location: &str, budget: f64) -> MatchPreferences {
        MatchPreferences {
            event_type: event_type.to_string(),
            location: location.to_string(),
            budget,
        }
    }

    #[test]
    fn test_exact_match_scores_100() {
        let agency = mumbai_wedding_agency();
        let prefs = preferences("Wedding", "Mumbai", 500_000.0);
        let weights = ScoringWeights::default();

        let breakdown = score_agency(&agency, &prefs, &weights).unwrap();

        assert_eq!(breakdown.event_type_points, 40.0);
        assert_eq!(breakdown.location_points, 30.0);
        assert_eq!(breakdown.budget_points, 20.0);
        assert!((breakdown.rating_points - 7.52).abs() < 1e-9);
        assert_eq!(breakdown.review_points, 2.0);
        // 40 + 30 + 20 + 7.52 + 2 = 99.52 -> 100
        assert_eq!(breakdown.score(), 100);
    }

    #[test]
    fn test_stretch_budget_no_type_match_scores_50() {
        let agency = mumbai_wedding_agency();
        // 900000 exceeds the max of 800000 but sits inside max * 1.2.
        let prefs = preferences("Corporate", "Mumbai", 900_000.0);
        let weights = ScoringWeights::default();

        let breakdown = score_agency(&agency, &prefs, &weights).unwrap();

        assert_eq!(breakdown.event_type_points, 0.0);
        assert_eq!(breakdown.location_points, 30.0);
        assert_eq!(breakdown.budget_points, 10.0);
        // 0 + 30 + 10 + 7.52 + 2 = 49.52 -> 50
        assert_eq!(breakdown.score(), 50);
    }

    #[test]
    fn test_event_type_is_case_insensitive() {
        let agency = mumbai_wedding_agency();
        let weights = ScoringWeights::default();

        let exact = score_agency(&agency, &preferences("WEDDING", "Mumbai", 500_000.0), &weights)
            .unwrap();
        assert_eq!(exact.event_type_points, 40.0);

        // Related categories earn nothing.
        let related =
            score_agency(&agency, &preferences("Weddings", "Mumbai", 500_000.0), &weights)
                .unwrap();
        assert_eq!(related.event_type_points, 0.0);
    }

    #[test]
    fn test_location_miss_keeps_partial_credit() {
        let agency = mumbai_wedding_agency();
        let prefs = preferences("Wedding", "Delhi", 500_000.0);
        let weights = ScoringWeights::default();

        let breakdown = score_agency(&agency, &prefs, &weights).unwrap();
        assert_eq!(breakdown.location_points, 15.0);
    }

    #[test]
    fn test_budget_outside_stretch_band_scores_zero() {
        let agency = mumbai_wedding_agency();
        let weights = ScoringWeights::default();

        // Below min * 0.8 = 160000.
        let low = score_agency(&agency, &preferences("Wedding", "Mumbai", 100_000.0), &weights)
            .unwrap();
        assert_eq!(low.budget_points, 0.0);

        // Above max * 1.2 = 960000.
        let high =
            score_agency(&agency, &preferences("Wedding", "Mumbai", 1_000_000.0), &weights)
                .unwrap();
        assert_eq!(high.budget_points, 0.0);
    }

    #[test]
    fn test_budget_band_edges_inclusive() {
        let agency = mumbai_wedding_agency();
        let weights = ScoringWeights::default();

        let at_min = score_agency(&agency, &preferences("Wedding", "Mumbai", 200_000.0), &weights)
            .unwrap();
        assert_eq!(at_min.budget_points, 20.0);

        let at_stretch_max =
            score_agency(&agency, &preferences("Wedding", "Mumbai", 960_000.0), &weights)
                .unwrap();
        assert_eq!(at_stretch_max.budget_points, 10.0);
    }

    #[test]
    fn test_review_volume_saturates() {
        let mut agency = mumbai_wedding_agency();
        let prefs = preferences("Wedding", "Mumbai", 500_000.0);
        let weights = ScoringWeights::default();

        agency.review_count = 25;
        let halfway = score_agency(&agency, &prefs, &weights).unwrap();
        assert!((halfway.review_points - 1.0).abs() < 1e-9);

        agency.review_count = 500;
        let saturated = score_agency(&agency, &prefs, &weights).unwrap();
        assert_eq!(saturated.review_points, 2.0);
    }

    #[test]
    fn test_rating_monotonicity() {
        let prefs = preferences("Wedding", "Mumbai", 500_000.0);
        let weights = ScoringWeights::default();

        let mut previous = 0.0;
        for tenths in 0..=50 {
            let mut agency = mumbai_wedding_agency();
            agency.rating = f64::from(tenths) / 10.0;
            let breakdown = score_agency(&agency, &prefs, &weights).unwrap();
            assert!(
                breakdown.rating_points >= previous,
                "rating points decreased at rating {}",
                agency.rating
            );
            previous = breakdown.rating_points;
        }
    }

    #[test]
    fn test_determinism() {
        let agency = mumbai_wedding_agency();
        let prefs = preferences("Wedding", "Mumbai", 500_000.0);
        let weights = ScoringWeights::default();

        let first = score_agency(&agency, &prefs, &weights).unwrap().score();
        let second = score_agency(&agency, &prefs, &weights).unwrap().score();
        assert_eq!(first, second);
    }

    #[test]
    fn test_malformed_preferences_rejected() {
        let agency = mumbai_wedding_agency();
        let weights = ScoringWeights::default();

        let empty_type = preferences("", "Mumbai", 500_000.0);
        assert_eq!(
            score_agency(&agency, &empty_type, &weights),
            Err(MatchError::EmptyEventType)
        );

        let empty_location = preferences("Wedding", "   ", 500_000.0);
        assert_eq!(
            score_agency(&agency, &empty_location, &weights),
            Err(MatchError::EmptyLocation)
        );

        let nan_budget = preferences("Wedding", "Mumbai", f64::NAN);
        assert_eq!(
            score_agency(&agency, &nan_budget, &weights),
            Err(MatchError::InvalidBudget)
        );

        let negative_budget = preferences("Wedding", "Mumbai", -1.0);
        assert_eq!(
            score_agency(&agency, &negative_budget, &weights),
            Err(MatchError::InvalidBudget)
        );
    }
}
