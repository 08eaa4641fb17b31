// Unit tests for Utsav Core

use chrono::TimeZone;
use utsav_core::core::scoring::{score_agency, validate_preferences, MatchError};
use utsav_core::models::{Agency, BookingStatus, BudgetRange, MatchPreferences, ScoringWeights};
use utsav_core::services::day_bounds;
use uuid::Uuid;

fn agency(
    name: &str,
    location: &str,
    event_types: &[&str],
    budget: (f64, f64),
    rating: f64,
    review_count: u32,
) -> Agency {
    Agency {
        id: Uuid::new_v4(),
        name: name.to_string(),
        location: location.to_string(),
        description: String::new(),
        event_types: event_types.iter().map(|t| t.to_string()).collect(),
        budget_range: BudgetRange {
            min: budget.0,
            max: budget.1,
        },
        rating,
        review_count,
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
fn test_exact_match_scenario_scores_100() {
    let agency = agency(
        "Elite Marriages",
        "Mumbai, Maharashtra",
        &["Wedding"],
        (200_000.0, 800_000.0),
        4.7,
        80,
    );
    let prefs = preferences("Wedding", "Mumbai", 500_000.0);

    let breakdown = score_agency(&agency, &prefs, &ScoringWeights::default()).unwrap();

    // 40 + 30 + 20 + 7.52 + 2 = 99.52 -> 100
    assert_eq!(breakdown.score(), 100);
}

#[test]
fn test_stretch_band_scenario_scores_50() {
    let agency = agency(
        "Elite Marriages",
        "Mumbai, Maharashtra",
        &["Wedding"],
        (200_000.0, 800_000.0),
        4.7,
        80,
    );
    // Wrong event type; budget above max but inside max * 1.2.
    let prefs = preferences("Corporate", "Mumbai", 900_000.0);

    let breakdown = score_agency(&agency, &prefs, &ScoringWeights::default()).unwrap();

    // 0 + 30 + 10 + 7.52 + 2 = 49.52 -> 50
    assert_eq!(breakdown.score(), 50);
}

#[test]
fn test_score_is_deterministic() {
    let agency = agency(
        "Heritage Celebrations",
        "Chennai, Tamil Nadu",
        &["Wedding", "Cultural"],
        (300_000.0, 1_000_000.0),
        4.8,
        110,
    );
    let prefs = preferences("Cultural", "Chennai", 400_000.0);
    let weights = ScoringWeights::default();

    let first = score_agency(&agency, &prefs, &weights).unwrap().score();
    let second = score_agency(&agency, &prefs, &weights).unwrap().score();

    assert_eq!(first, second);
}

#[test]
fn test_more_reviews_never_lower_score() {
    let prefs = preferences("Wedding", "Mumbai", 500_000.0);
    let weights = ScoringWeights::default();

    let mut previous = 0;
    for review_count in [0, 1, 10, 25, 49, 50, 51, 200] {
        let candidate = agency(
            "Elite Marriages",
            "Mumbai, Maharashtra",
            &["Wedding"],
            (200_000.0, 800_000.0),
            4.7,
            review_count,
        );
        let score = score_agency(&candidate, &prefs, &weights).unwrap().score();
        assert!(
            score >= previous,
            "score decreased going to {} reviews",
            review_count
        );
        previous = score;
    }
}

#[test]
fn test_higher_rating_never_lower_score() {
    let prefs = preferences("Wedding", "Mumbai", 500_000.0);
    let weights = ScoringWeights::default();

    let low = agency(
        "A",
        "Mumbai",
        &["Wedding"],
        (200_000.0, 800_000.0),
        3.0,
        80,
    );
    let high = agency(
        "B",
        "Mumbai",
        &["Wedding"],
        (200_000.0, 800_000.0),
        4.9,
        80,
    );

    let low_score = score_agency(&low, &prefs, &weights).unwrap().score();
    let high_score = score_agency(&high, &prefs, &weights).unwrap().score();

    assert!(high_score >= low_score);
}

#[test]
fn test_preferences_validation() {
    assert!(validate_preferences(&preferences("Wedding", "Mumbai", 1.0)).is_ok());

    assert_eq!(
        validate_preferences(&preferences("", "Mumbai", 1.0)),
        Err(MatchError::EmptyEventType)
    );
    assert_eq!(
        validate_preferences(&preferences("Wedding", "", 1.0)),
        Err(MatchError::EmptyLocation)
    );
    assert_eq!(
        validate_preferences(&preferences("Wedding", "Mumbai", 0.0)),
        Err(MatchError::InvalidBudget)
    );
    assert_eq!(
        validate_preferences(&preferences("Wedding", "Mumbai", f64::INFINITY)),
        Err(MatchError::InvalidBudget)
    );
}

#[test]
fn test_day_bounds_same_day() {
    let morning = chrono::Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 30).unwrap();
    let night = chrono::Utc.with_ymd_and_hms(2024, 5, 1, 23, 59, 59).unwrap();

    let (start_a, end_a) = day_bounds(morning);
    let (start_b, end_b) = day_bounds(night);

    // Same calendar day -> same window.
    assert_eq!(start_a, start_b);
    assert_eq!(end_a, end_b);
}

#[test]
fn test_day_bounds_adjacent_days() {
    let late = chrono::Utc.with_ymd_and_hms(2024, 5, 1, 23, 59, 59).unwrap();
    let early = chrono::Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 1).unwrap();

    let (_, end_first) = day_bounds(late);
    let (start_second, _) = day_bounds(early);

    assert!(end_first < start_second, "adjacent day windows must not overlap");
}

#[test]
fn test_status_lifecycle() {
    use BookingStatus::*;

    // The two-step happy path plus cancellation branches.
    assert!(Pending.can_transition_to(Confirmed));
    assert!(Confirmed.can_transition_to(Completed));
    assert!(Pending.can_transition_to(Cancelled));
    assert!(Confirmed.can_transition_to(Cancelled));

    // Terminal states admit nothing.
    for target in [Pending, Confirmed, Completed, Cancelled] {
        assert!(!Completed.can_transition_to(target));
        assert!(!Cancelled.can_transition_to(target));
    }
}
