// Route-level tests against in-memory stores

use actix_web::{http::StatusCode, test, web, App};
use async_trait::async_trait;
use retraite_algo::core::{Engine, FilterPlan};
use retraite_algo::models::{
    CommuneSummary, DensityClass, MunicipalityRecord, ScoreWeights, WeightBounds,
};
use retraite_algo::routes::{self, handle_query_payload_error, AppState};
use retraite_algo::services::{CatalogueCache, CommuneStore, InMemoryStore, StoreError};
use std::sync::Arc;
use std::time::Duration;

const POLYGON: &str =
    r#"{"type":"MultiPolygon","coordinates":[[[[-1.55,47.2],[-1.5,47.2],[-1.5,47.25],[-1.55,47.2]]]]}"#;

/// Store whose every query fails, as with a lost database connection
struct UnreachableStore;

#[async_trait]
impl CommuneStore for UnreachableStore {
    async fn fetch_communes(&self, _plan: &FilterPlan) -> Result<Vec<MunicipalityRecord>, StoreError> {
        Err(StoreError::Timeout(Duration::from_secs(30)))
    }

    async fn count_communes(&self) -> Result<i64, StoreError> {
        Err(StoreError::Timeout(Duration::from_secs(30)))
    }

    async fn sample_communes(&self, _limit: u16) -> Result<Vec<CommuneSummary>, StoreError> {
        Err(StoreError::Timeout(Duration::from_secs(30)))
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Err(StoreError::Timeout(Duration::from_secs(30)))
    }
}

fn create_commune(insee: &str, price: f64, sea_km: f64) -> MunicipalityRecord {
    MunicipalityRecord {
        insee: insee.to_string(),
        name: format!("Commune {}", insee),
        department_code: Some("44".to_string()),
        price_per_m2: Some(price),
        density: Some(DensityClass::Ville),
        health_score: Some(0.8),
        commerce_scaled: Some(0.6),
        association_scaled: None,
        temperature_scaled: Some(0.5),
        sunshine_scaled: Some(0.5),
        sunshine_raw: Some(1900.0),
        coastal: Some(sea_km < 5.0),
        sea_distance_km: Some(sea_km),
        mountainous: Some(false),
        mountain_distance_km: Some(300.0),
        geometry: Some(POLYGON.to_string()),
    }
}

fn create_state(store: Arc<dyn CommuneStore>) -> AppState {
    AppState {
        store,
        cache: Arc::new(CatalogueCache::new(16, 60)),
        engine: Engine::default(),
        default_weights: ScoreWeights::default(),
        weight_bounds: WeightBounds::default(),
    }
}

fn catalogue() -> Arc<dyn CommuneStore> {
    Arc::new(InMemoryStore::new(vec![
        create_commune("44109", 3900.0, 45.0),
        create_commune("44184", 5200.0, 0.2),
        create_commune("44055", 2000.0, 10.0),
    ]))
}

macro_rules! init_app {
    ($store:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(create_state($store)))
                .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
                .configure(routes::configure_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn test_ping() {
    let app = init_app!(catalogue());
    let req = test::TestRequest::get().uri("/ping").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["message"], "pong");
}

#[actix_web::test]
async fn test_geojson_scored_collection() {
    let app = init_app!(catalogue());
    let req = test::TestRequest::get()
        .uri("/api/v1/communes/geojson?w_sante=2&w_mag=1&w_asso=1&w_sun=3&sun_pref=0.5")
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["type"], "FeatureCollection");
    let features = body["features"].as_array().unwrap();
    assert_eq!(features.len(), 3);
    assert_eq!(features[0]["properties"]["insee"], "44109");
    assert_eq!(features[0]["properties"]["score_global"], 17.33);
    assert_eq!(features[0]["geometry"]["type"], "MultiPolygon");
}

#[actix_web::test]
async fn test_geojson_filters_from_query_string() {
    let app = init_app!(catalogue());
    let req = test::TestRequest::get()
        .uri("/api/v1/communes/geojson?littoral=1&prix_max=2000")
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    let features = body["features"].as_array().unwrap();
    assert_eq!(features.len(), 1);
    assert_eq!(features[0]["properties"]["insee"], "44055");
}

#[actix_web::test]
async fn test_geojson_unknown_density_is_empty_success() {
    let app = init_app!(catalogue());
    let req = test::TestRequest::get()
        .uri("/api/v1/communes/geojson?densite=inconnue")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["features"].as_array().map(Vec::len), Some(0));
}

#[actix_web::test]
async fn test_geojson_weight_out_of_bounds() {
    let app = init_app!(catalogue());
    let req = test::TestRequest::get()
        .uri("/api/v1/communes/geojson?w_sun=5")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status_code"], 400);
}

#[actix_web::test]
async fn test_geojson_malformed_query() {
    let app = init_app!(catalogue());
    let req = test::TestRequest::get()
        .uri("/api/v1/communes/geojson?prix_max=cheap")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_query");
}

#[actix_web::test]
async fn test_geojson_store_failure_is_server_error() {
    let app = init_app!(Arc::new(UnreachableStore));
    let req = test::TestRequest::get()
        .uri("/api/v1/communes/geojson")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Internal server error");
}

#[actix_web::test]
async fn test_count_and_sample() {
    let app = init_app!(catalogue());

    let req = test::TestRequest::get().uri("/api/v1/communes/count").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 3);

    let req = test::TestRequest::get()
        .uri("/api/v1/communes/sample?limit=2")
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["nom"], "Commune 44109");
}

#[actix_web::test]
async fn test_sample_limit_validated() {
    let app = init_app!(catalogue());
    let req = test::TestRequest::get()
        .uri("/api/v1/communes/sample?limit=500")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_health_reports_degraded_store() {
    let app = init_app!(Arc::new(UnreachableStore));
    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "degraded");
}

#[actix_web::test]
async fn test_geojson_rejects_non_finite_numbers() {
    let app = init_app!(catalogue());

    for uri in [
        "/api/v1/communes/geojson?sun_pref=NaN",
        "/api/v1/communes/geojson?littoral=1&rayon_km=NaN",
        "/api/v1/communes/geojson?prix_max=NaN",
        "/api/v1/communes/geojson?prix_min=inf",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{} should be rejected", uri);
    }
}
