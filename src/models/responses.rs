use crate::models::domain::ScoredAgency;
use serde::{Deserialize, Serialize};

/// Response for the agency match endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchAgenciesResponse {
    pub matches: Vec<ScoredAgency>,
    pub total_results: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
///
/// `error` is the machine-readable indicator clients branch on (for example
/// `AGENCY_UNAVAILABLE` on a booking conflict); `message` is for humans.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
