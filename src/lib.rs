//! Utsav Core - booking and agency-matching service for the Utsav events marketplace
//!
//! This library provides the two load-bearing pieces of the marketplace
//! backend: the booking conflict guard (one active booking per agency per
//! calendar day, enforced transactionally) and the Smart Match ranker.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{score_agency, MatchError, RankResult, Ranker};
pub use crate::models::{
    Agency, Booking, BookingStatus, BudgetRange, MatchPreferences, ScoredAgency, ScoringWeights,
};
pub use crate::services::day_bounds;
