use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Agency, Booking, BookingStatus, BudgetRange};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The requested agency already holds an active booking on that day.
    /// Distinct from generic failures so callers can offer another date
    /// instead of a retry.
    #[error("agency {agency_id} already has an active booking on {day}")]
    AgencyUnavailable { agency_id: Uuid, day: NaiveDate },

    #[error("illegal status transition: {from} -> {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Input for one booking attempt. The event date keeps whatever precision
/// the caller supplied.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub agency_id: Uuid,
    pub event_date: DateTime<Utc>,
    pub total_amount: f64,
    pub package_type: Option<String>,
    pub event_type: Option<String>,
}

/// Closed calendar-day window around a timestamp, in UTC.
///
/// Both bounds are derived from the original timestamp's date, never from a
/// shared mutable value: start is the day at midnight, end is the last
/// representable microsecond of the same day.
pub fn day_bounds(ts: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let day_start = ts.date_naive().and_time(NaiveTime::MIN).and_utc();
    let day_end = day_start + chrono::Duration::days(1) - chrono::Duration::microseconds(1);
    (day_start, day_end)
}

/// PostgreSQL client owning the booking ledger and the agency catalog.
///
/// The ledger is the only shared mutable state in the service and is written
/// exclusively through [`PostgresClient::create_booking`] and
/// [`PostgresClient::update_status`].
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL with URL: {}", url);

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
        )
        .await
    }

    /// Reserve an agency for the calendar day around `event_date`.
    ///
    /// The existence check and the insert run inside one transaction,
    /// serialized per (agency, day) by an advisory transaction lock, so two
    /// concurrent attempts for the same slot cannot both succeed. Attempts
    /// for other agencies or other days take different locks and proceed
    /// independently. A partial unique index on the ledger backstops the
    /// check; a violation there is reported as the same conflict.
    ///
    /// On success exactly one row is created, storing the caller's original
    /// un-truncated timestamp. Every failure path rolls back completely.
    pub async fn create_booking(
        &self,
        customer_id: Uuid,
        new: NewBooking,
    ) -> Result<Booking, PostgresError> {
        if !new.total_amount.is_finite() || new.total_amount <= 0.0 {
            return Err(PostgresError::InvalidInput(
                "totalAmount must be a positive number".to_string(),
            ));
        }

        let agency_id = new.agency_id;
        let (day_start, day_end) = day_bounds(new.event_date);
        let day = day_start.date_naive();

        let mut tx = self.pool.begin().await?;

        let agency_exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM agencies WHERE id = $1")
            .bind(agency_id)
            .fetch_optional(&mut *tx)
            .await?;
        if agency_exists.is_none() {
            return Err(PostgresError::NotFound(format!("agency {agency_id}")));
        }

        // Serialize concurrent attempts for this agency and day. Released
        // automatically at commit or rollback.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(format!("bookings:{agency_id}:{day}"))
            .execute(&mut *tx)
            .await?;

        let occupied: Option<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT id FROM bookings
            WHERE agency_id = $1
              AND event_date BETWEEN $2 AND $3
              AND status <> 'CANCELLED'
            LIMIT 1
            "#,
        )
        .bind(agency_id)
        .bind(day_start)
        .bind(day_end)
        .fetch_optional(&mut *tx)
        .await?;

        if occupied.is_some() {
            // Dropping the transaction rolls it back; nothing was written.
            return Err(PostgresError::AgencyUnavailable { agency_id, day });
        }

        let booking: Booking = sqlx::query_as(
            r#"
            INSERT INTO bookings
                (id, agency_id, customer_id, event_date, total_amount, package_type, event_type, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'PENDING')
            RETURNING id, agency_id, customer_id, event_date, total_amount,
                      package_type, event_type, status, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(agency_id)
        .bind(customer_id)
        .bind(new.event_date)
        .bind(new.total_amount)
        .bind(new.package_type.unwrap_or_else(|| "CUSTOM".to_string()))
        .bind(new.event_type)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_day_slot_violation(e, agency_id, day))?;

        tx.commit().await?;

        tracing::info!(
            "Booking created: {} for agency {} on {}",
            booking.id,
            booking.agency_id,
            day
        );

        Ok(booking)
    }

    /// Apply a status transition to an existing booking.
    ///
    /// Enforces the lifecycle state machine but deliberately does not re-run
    /// the day-slot conflict check.
    pub async fn update_status(
        &self,
        id: Uuid,
        target: BookingStatus,
    ) -> Result<Booking, PostgresError> {
        let mut tx = self.pool.begin().await?;

        let current: Option<(BookingStatus,)> =
            sqlx::query_as("SELECT status FROM bookings WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some((current,)) = current else {
            return Err(PostgresError::NotFound(format!("booking {id}")));
        };

        if !current.can_transition_to(target) {
            return Err(PostgresError::InvalidTransition {
                from: current,
                to: target,
            });
        }

        let booking: Booking = sqlx::query_as(
            r#"
            UPDATE bookings SET status = $2 WHERE id = $1
            RETURNING id, agency_id, customer_id, event_date, total_amount,
                      package_type, event_type, status, created_at
            "#,
        )
        .bind(id)
        .bind(target)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!("Booking {} moved {} -> {}", id, current, target);

        Ok(booking)
    }

    /// A customer's bookings, newest first.
    pub async fn list_bookings_for_customer(
        &self,
        customer_id: Uuid,
    ) -> Result<Vec<Booking>, PostgresError> {
        let bookings = sqlx::query_as(
            r#"
            SELECT id, agency_id, customer_id, event_date, total_amount,
                   package_type, event_type, status, created_at
            FROM bookings
            WHERE customer_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    /// An agency's incoming bookings, newest first.
    pub async fn list_bookings_for_agency(
        &self,
        agency_id: Uuid,
    ) -> Result<Vec<Booking>, PostgresError> {
        let bookings = sqlx::query_as(
            r#"
            SELECT id, agency_id, customer_id, event_date, total_amount,
                   package_type, event_type, status, created_at
            FROM bookings
            WHERE agency_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(agency_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    /// The full agency catalog, best-rated first.
    pub async fn list_agencies(&self) -> Result<Vec<Agency>, PostgresError> {
        let rows: Vec<AgencyRow> = sqlx::query_as(
            r#"
            SELECT id, name, location, description, event_types,
                   budget_min, budget_max, rating, review_count, image_url
            FROM agencies
            ORDER BY rating DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// One agency projection.
    pub async fn get_agency(&self, id: Uuid) -> Result<Agency, PostgresError> {
        let row: Option<AgencyRow> = sqlx::query_as(
            r#"
            SELECT id, name, location, description, event_types,
                   budget_min, budget_max, rating, review_count, image_url
            FROM agencies
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Into::into)
            .ok_or_else(|| PostgresError::NotFound(format!("agency {id}")))
    }

    /// Underlying pool, for fixtures and ad-hoc queries in tests.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

/// Flat row shape for the agencies table; the domain type nests the budget
/// band.
#[derive(Debug, sqlx::FromRow)]
struct AgencyRow {
    id: Uuid,
    name: String,
    location: String,
    description: String,
    event_types: Vec<String>,
    budget_min: f64,
    budget_max: f64,
    rating: f64,
    review_count: i32,
    image_url: Option<String>,
}

impl From<AgencyRow> for Agency {
    fn from(row: AgencyRow) -> Self {
        Agency {
            id: row.id,
            name: row.name,
            location: row.location,
            description: row.description,
            event_types: row.event_types,
            budget_range: BudgetRange {
                min: row.budget_min,
                max: row.budget_max,
            },
            rating: row.rating,
            review_count: row.review_count.max(0) as u32,
            image_url: row.image_url,
        }
    }
}

/// A unique violation on the day-slot index means another transaction won
/// the slot between our check and insert; report it as the same conflict.
fn map_day_slot_violation(err: sqlx::Error, agency_id: Uuid, day: NaiveDate) -> PostgresError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.code().as_deref() == Some("23505")
            && db_err.constraint() == Some("bookings_agency_day_active_idx")
        {
            return PostgresError::AgencyUnavailable { agency_id, day };
        }
    }
    PostgresError::SqlxError(err)
}
