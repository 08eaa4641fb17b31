use actix_web::{web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    Agency, ErrorResponse, MatchAgenciesRequest, MatchAgenciesResponse, MatchPreferences,
};
use crate::routes::AppState;
use crate::services::{CacheKey, PostgresError};

/// Configure all agency-catalog routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/agencies", web::get().to(list_agencies))
        .route("/agencies/match", web::post().to(match_agencies))
        .route("/agencies/{id}", web::get().to(get_agency));
}

/// List the agency catalog, best-rated first
///
/// GET /api/v1/agencies
async fn list_agencies(state: web::Data<AppState>) -> impl Responder {
    match load_catalog(&state).await {
        Ok(agencies) => HttpResponse::Ok().json(agencies),
        Err(e) => catalog_error_response(e),
    }
}

/// Fetch one agency
///
/// GET /api/v1/agencies/{id}
async fn get_agency(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let id = path.into_inner();

    let cache_key = CacheKey::agency(id);
    if let Ok(agency) = state.cache.get::<Agency>(&cache_key).await {
        return HttpResponse::Ok().json(agency);
    }

    match state.postgres.get_agency(id).await {
        Ok(agency) => {
            if let Err(e) = state.cache.set(&cache_key, &agency).await {
                tracing::warn!("Failed to cache agency {}: {}", id, e);
            }
            HttpResponse::Ok().json(agency)
        }
        Err(e) => catalog_error_response(e),
    }
}

/// Rank the catalog against a customer's preferences
///
/// POST /api/v1/agencies/match
///
/// Request body:
/// ```json
/// {
///   "eventType": "Wedding",
///   "location": "Mumbai",
///   "budget": 500000
/// }
/// ```
///
/// Returns every agency annotated with its Smart Match score, sorted
/// best-first. Nothing is filtered out; ties keep catalog order.
async fn match_agencies(
    state: web::Data<AppState>,
    req: web::Json<MatchAgenciesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for match request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let preferences = MatchPreferences {
        event_type: req.event_type.clone(),
        location: req.location.clone(),
        budget: req.budget,
    };

    let agencies = match load_catalog(&state).await {
        Ok(agencies) => agencies,
        Err(e) => return catalog_error_response(e),
    };

    let candidate_count = agencies.len();

    match state.ranker.rank(&preferences, agencies) {
        Ok(result) => {
            tracing::info!(
                "Ranked {} agencies for event type {:?}",
                candidate_count,
                preferences.event_type
            );
            HttpResponse::Ok().json(MatchAgenciesResponse {
                matches: result.matches,
                total_results: result.total_candidates,
            })
        }
        Err(e) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "Invalid preferences".to_string(),
            message: e.to_string(),
            status_code: 400,
        }),
    }
}

/// Catalog read-through: L1/L2 cache first, PostgreSQL on a miss.
async fn load_catalog(state: &web::Data<AppState>) -> Result<Vec<Agency>, PostgresError> {
    let cache_key = CacheKey::agencies();

    if let Ok(agencies) = state.cache.get::<Vec<Agency>>(&cache_key).await {
        return Ok(agencies);
    }

    let agencies = state.postgres.list_agencies().await?;

    if let Err(e) = state.cache.set(&cache_key, &agencies).await {
        tracing::warn!("Failed to cache agency catalog: {}", e);
    }

    Ok(agencies)
}

fn catalog_error_response(err: PostgresError) -> HttpResponse {
    match err {
        PostgresError::NotFound(_) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Not found".to_string(),
            message: err.to_string(),
            status_code: 404,
        }),
        other => {
            tracing::error!("Failed to load agencies: {}", other);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to load agencies".to_string(),
                message: other.to_string(),
                status_code: 500,
            })
        }
    }
}
