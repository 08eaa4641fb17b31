// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Agency, Booking, BookingStatus, BudgetRange, MatchBreakdown, MatchPreferences, ScoredAgency,
    ScoringWeights,
};
pub use requests::{CreateBookingRequest, MatchAgenciesRequest, UpdateBookingStatusRequest};
pub use responses::{ErrorResponse, HealthResponse, MatchAgenciesResponse};
