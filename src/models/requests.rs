use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request to reserve an agency for a date.
///
/// `agencyId`, `date` and `totalAmount` are required; a body missing any of
/// them is rejected by the JSON layer before a handler runs. Amount
/// positivity is checked in the handler so the error message can name the
/// field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    #[serde(alias = "agency_id", rename = "agencyId")]
    pub agency_id: Uuid,
    #[serde(alias = "event_date", rename = "date")]
    pub date: chrono::DateTime<chrono::Utc>,
    #[serde(alias = "total_amount", rename = "totalAmount")]
    pub total_amount: f64,
    #[serde(default)]
    #[serde(alias = "package_type", rename = "packageType")]
    pub package_type: Option<String>,
    #[serde(default)]
    #[serde(alias = "event_type", rename = "eventType")]
    pub event_type: Option<String>,
}

/// Request to move a booking to a new status.
///
/// The status arrives as a string and is matched against the known lifecycle
/// states in the handler; anything else is a 400.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateBookingStatusRequest {
    #[validate(length(min = 1))]
    pub status: String,
}

/// Request to rank the agency catalog against one customer's preferences.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MatchAgenciesRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "event_type", rename = "eventType")]
    pub event_type: String,
    #[validate(length(min = 1))]
    pub location: String,
    pub budget: f64,
}
