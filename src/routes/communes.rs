use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use tracing::Instrument;
use validator::Validate;
use crate::core::Engine;
use crate::models::{
    CountResponse, ErrorResponse, GeoJsonQuery, HealthResponse, SampleQuery, SampleResponse,
    ScoreWeights, WeightBounds,
};
use crate::services::{CatalogueCache, CommuneStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CommuneStore>,
    pub cache: Arc<CatalogueCache>,
    pub engine: Engine,
    pub default_weights: ScoreWeights,
    pub weight_bounds: WeightBounds,
}

/// Configure all commune-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/communes/count", web::get().to(communes_count))
        .route("/communes/sample", web::get().to(communes_sample))
        .route("/communes/geojson", web::get().to(communes_geojson));
}

fn bad_request(error: &str, message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: 400,
    })
}

fn server_error(error: &str) -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorResponse {
        error: error.to_string(),
        message: "Internal server error".to_string(),
        status_code: 500,
    })
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let db_healthy = match state.store.health_check().await {
        Ok(healthy) => healthy,
        Err(e) => {
            tracing::warn!("Store health check failed: {}", e);
            false
        }
    };

    let status = if db_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Number of communes in the catalogue
///
/// GET /api/v1/communes/count
async fn communes_count(state: web::Data<AppState>) -> impl Responder {
    match state.cache.commune_count(state.store.as_ref()).await {
        Ok(count) => HttpResponse::Ok().json(CountResponse { count }),
        Err(e) => {
            tracing::error!("Failed to count communes: {}", e);
            server_error("Failed to count communes")
        }
    }
}

/// Small unfiltered sample, for debugging
///
/// GET /api/v1/communes/sample?limit=10
async fn communes_sample(
    state: web::Data<AppState>,
    query: web::Query<SampleQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return bad_request("Validation failed", errors.to_string());
    }

    match state.store.sample_communes(query.limit).await {
        Ok(items) => HttpResponse::Ok().json(SampleResponse { items }),
        Err(e) => {
            tracing::error!("Failed to sample communes: {}", e);
            server_error("Failed to sample communes")
        }
    }
}

/// Filtered and scored communes as GeoJSON
///
/// GET /api/v1/communes/geojson
///
/// Query parameters:
/// `limit`, `littoral`, `montagne`, `rayon_km`, `lat`, `lon`, `densite`,
/// `prix_min`, `prix_max`, `w_sante`, `w_mag`, `w_asso`, `w_sun`, `sun_pref`.
///
/// An unknown `densite` returns an empty collection with 200.
async fn communes_geojson(
    state: web::Data<AppState>,
    query: web::Query<GeoJsonQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        tracing::info!("Validation failed for geojson request: field_errors={:?}", errors);
        return bad_request("Validation failed", errors.to_string());
    }

    let weights = match query.score_weights(&state.default_weights, state.weight_bounds) {
        Ok(weights) => weights,
        Err(message) => return bad_request("Validation failed", message),
    };
    let request = query.filter_request();

    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("communes_geojson", %request_id);

    let result = state
        .engine
        .run(state.store.as_ref(), &request, &weights)
        .instrument(span.clone())
        .await;

    span.in_scope(|| match result {
        Ok(result) => {
            tracing::info!(
                "Returning {} communes (from {} candidates)",
                result.collection.features.len(),
                result.total_candidates
            );
            HttpResponse::Ok().json(result.collection)
        }
        Err(e) => {
            tracing::error!("Failed to query communes: {}", e);
            server_error("Failed to query communes")
        }
    })
}
