use actix_web::{web, HttpRequest, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

use crate::models::{BookingStatus, CreateBookingRequest, ErrorResponse, UpdateBookingStatusRequest};
use crate::routes::AppState;
use crate::services::{AuthError, NewBooking, PostgresError};

/// Configure all booking-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/bookings", web::post().to(create_booking))
        .route("/bookings", web::get().to(list_my_bookings))
        .route("/bookings/{id}", web::patch().to(update_booking_status))
        .route("/agency/bookings", web::get().to(list_agency_bookings));
}

/// Create a booking
///
/// POST /api/v1/bookings
///
/// Request body:
/// ```json
/// {
///   "agencyId": "uuid",
///   "date": "2024-12-25T10:00:00Z",
///   "totalAmount": 500000,
///   "packageType": "PREMIUM",
///   "eventType": "Wedding"
/// }
/// ```
///
/// Responds 409 with error `AGENCY_UNAVAILABLE` when the agency already has
/// an active booking on that calendar day.
async fn create_booking(
    state: web::Data<AppState>,
    req: web::Json<CreateBookingRequest>,
    http_req: HttpRequest,
) -> impl Responder {
    // Identity is checked before any data access.
    let claims = match state.verifier.authenticate_customer(&http_req) {
        Ok(claims) => claims,
        Err(e) => return unauthorized(e),
    };

    let body = req.into_inner();

    if !body.total_amount.is_finite() || body.total_amount <= 0.0 {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "INVALID_AMOUNT".to_string(),
            message: "totalAmount must be a positive number".to_string(),
            status_code: 400,
        });
    }

    tracing::info!(
        "Booking request: customer {} -> agency {} on {}",
        claims.sub,
        body.agency_id,
        body.date
    );

    let new = NewBooking {
        agency_id: body.agency_id,
        event_date: body.date,
        total_amount: body.total_amount,
        package_type: body.package_type,
        event_type: body.event_type,
    };

    match state.postgres.create_booking(claims.sub, new).await {
        Ok(booking) => HttpResponse::Ok().json(booking),
        Err(e) => booking_error_response(e),
    }
}

/// Update a booking's status
///
/// PATCH /api/v1/bookings/{id}
///
/// Request body:
/// ```json
/// { "status": "CONFIRMED" }
/// ```
///
/// The transition is validated against the booking lifecycle; the per-day
/// conflict check is not re-run here.
async fn update_booking_status(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<UpdateBookingStatusRequest>,
    http_req: HttpRequest,
) -> impl Responder {
    let claims = match state.verifier.authenticate(&http_req) {
        Ok(claims) => claims,
        Err(e) => return unauthorized(e),
    };

    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let target = match req.status.to_uppercase().as_str() {
        "CONFIRMED" => BookingStatus::Confirmed,
        "CANCELLED" => BookingStatus::Cancelled,
        "COMPLETED" => BookingStatus::Completed,
        "PENDING" => BookingStatus::Pending,
        _ => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Invalid status".to_string(),
                message: "Status must be one of: PENDING, CONFIRMED, COMPLETED, CANCELLED"
                    .to_string(),
                status_code: 400,
            });
        }
    };

    let id = path.into_inner();

    tracing::info!("Status update: booking {} -> {} by {}", id, target, claims.sub);

    match state.postgres.update_status(id, target).await {
        Ok(booking) => HttpResponse::Ok().json(booking),
        Err(e) => booking_error_response(e),
    }
}

/// List the calling customer's bookings
///
/// GET /api/v1/bookings
async fn list_my_bookings(state: web::Data<AppState>, http_req: HttpRequest) -> impl Responder {
    let claims = match state.verifier.authenticate_customer(&http_req) {
        Ok(claims) => claims,
        Err(e) => return unauthorized(e),
    };

    match state.postgres.list_bookings_for_customer(claims.sub).await {
        Ok(bookings) => HttpResponse::Ok().json(bookings),
        Err(e) => booking_error_response(e),
    }
}

/// List the calling agency owner's incoming bookings
///
/// GET /api/v1/agency/bookings
async fn list_agency_bookings(state: web::Data<AppState>, http_req: HttpRequest) -> impl Responder {
    let (_claims, agency_id) = match state.verifier.authenticate_agency(&http_req) {
        Ok(ok) => ok,
        Err(e) => return unauthorized(e),
    };

    match state.postgres.list_bookings_for_agency(agency_id).await {
        Ok(bookings) => HttpResponse::Ok().json(bookings),
        Err(e) => booking_error_response(e),
    }
}

fn unauthorized(err: AuthError) -> HttpResponse {
    tracing::info!("Rejected caller: {}", err);
    HttpResponse::Unauthorized().json(ErrorResponse {
        error: "Unauthorized".to_string(),
        message: err.to_string(),
        status_code: 401,
    })
}

/// Map storage errors onto the HTTP surface. Conflicts get their own
/// indicator so clients can offer a different date instead of a retry.
fn booking_error_response(err: PostgresError) -> HttpResponse {
    match err {
        PostgresError::AgencyUnavailable { .. } => HttpResponse::Conflict().json(ErrorResponse {
            error: "AGENCY_UNAVAILABLE".to_string(),
            message: err.to_string(),
            status_code: 409,
        }),
        PostgresError::NotFound(_) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Not found".to_string(),
            message: err.to_string(),
            status_code: 404,
        }),
        PostgresError::InvalidTransition { .. } => {
            HttpResponse::UnprocessableEntity().json(ErrorResponse {
                error: "INVALID_TRANSITION".to_string(),
                message: err.to_string(),
                status_code: 422,
            })
        }
        PostgresError::InvalidInput(_) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "INVALID_INPUT".to_string(),
            message: err.to_string(),
            status_code: 400,
        }),
        PostgresError::SqlxError(_) | PostgresError::MigrateError(_) => {
            tracing::error!("Storage failure: {}", err);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Storage failure".to_string(),
                message: err.to_string(),
                status_code: 500,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_maps_to_409() {
        let err = PostgresError::AgencyUnavailable {
            agency_id: Uuid::nil(),
            day: chrono::NaiveDate::from_ymd_opt(2024, 12, 25).unwrap(),
        };
        let response = booking_error_response(err);
        assert_eq!(response.status(), actix_web::http::StatusCode::CONFLICT);
    }

    #[test]
    fn test_illegal_transition_maps_to_422() {
        let err = PostgresError::InvalidTransition {
            from: BookingStatus::Completed,
            to: BookingStatus::Cancelled,
        };
        let response = booking_error_response(err);
        assert_eq!(
            response.status(),
            actix_web::http::StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
