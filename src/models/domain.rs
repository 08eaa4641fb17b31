use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of a booking.
///
/// `PENDING -> CONFIRMED -> COMPLETED`, with `CANCELLED` reachable from any
/// non-terminal state. Cancelled bookings free the agency's day slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "booking_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    /// Whether a booking in this status occupies its agency's day slot.
    pub fn blocks_slot(self) -> bool {
        self != BookingStatus::Cancelled
    }

    /// Legal transitions: agencies accept or complete, either party cancels.
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Pending, BookingStatus::Confirmed)
                | (BookingStatus::Pending, BookingStatus::Cancelled)
                | (BookingStatus::Confirmed, BookingStatus::Completed)
                | (BookingStatus::Confirmed, BookingStatus::Cancelled)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Completed => "COMPLETED",
            BookingStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reservation of an agency by a customer.
///
/// `event_date` keeps the caller's full-precision timestamp; only the
/// conflict check truncates it to a calendar day.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Booking {
    pub id: Uuid,
    #[serde(rename = "agencyId")]
    pub agency_id: Uuid,
    #[serde(rename = "customerId")]
    pub customer_id: Uuid,
    #[serde(rename = "date")]
    pub event_date: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "totalAmount")]
    pub total_amount: f64,
    #[serde(rename = "packageType")]
    pub package_type: String,
    #[serde(rename = "eventType", default)]
    pub event_type: Option<String>,
    pub status: BookingStatus,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Inclusive price band an agency quotes for its packages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BudgetRange {
    pub min: f64,
    pub max: f64,
}

/// Read-only agency projection consumed by the ranker and the catalog routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agency {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "eventTypes", default)]
    pub event_types: Vec<String>,
    #[serde(rename = "budgetRange")]
    pub budget_range: BudgetRange,
    pub rating: f64,
    #[serde(rename = "reviewCount")]
    pub review_count: u32,
    #[serde(rename = "imageUrl", default)]
    pub image_url: Option<String>,
}

/// A customer's stated preferences for one match request. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchPreferences {
    #[serde(rename = "eventType")]
    pub event_type: String,
    pub location: String,
    pub budget: f64,
}

/// Per-factor points awarded to one agency. Kept so callers can explain a
/// score instead of presenting a bare number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchBreakdown {
    #[serde(rename = "eventTypePoints")]
    pub event_type_points: f64,
    #[serde(rename = "locationPoints")]
    pub location_points: f64,
    #[serde(rename = "budgetPoints")]
    pub budget_points: f64,
    #[serde(rename = "ratingPoints")]
    pub rating_points: f64,
    #[serde(rename = "reviewPoints")]
    pub review_points: f64,
}

impl MatchBreakdown {
    /// Final integer score: component sum rounded half-away-from-zero
    /// (`f64::round`), clamped to [0, 100].
    pub fn score(&self) -> u32 {
        let sum = self.event_type_points
            + self.location_points
            + self.budget_points
            + self.rating_points
            + self.review_points;
        sum.clamp(0.0, 100.0).round() as u32
    }
}

/// Agency annotated with its Smart Match score and rank position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredAgency {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub description: String,
    #[serde(rename = "eventTypes")]
    pub event_types: Vec<String>,
    #[serde(rename = "budgetRange")]
    pub budget_range: BudgetRange,
    pub rating: f64,
    #[serde(rename = "reviewCount")]
    pub review_count: u32,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
    #[serde(rename = "matchScore")]
    pub match_score: u32,
    pub breakdown: MatchBreakdown,
    /// 1-based position in the ranked list.
    pub position: u32,
}

/// Scoring weights. Maximum awardable points sum to 100 with the defaults;
/// each factor's ceiling is a named figure rather than a literal in the
/// formula so deployments can tune them from configuration.
#[derive(Debug, Clone, Copy)]
pub struct ScoringWeights {
    pub event_type: f64,
    pub location_full: f64,
    pub location_partial: f64,
    pub budget_in_range: f64,
    pub budget_stretch: f64,
    pub rating: f64,
    pub reviews: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            event_type: 40.0,
            location_full: 30.0,
            location_partial: 15.0,
            budget_in_range: 20.0,
            budget_stretch: 10.0,
            rating: 8.0,
            reviews: 2.0,
        }
    }
}
