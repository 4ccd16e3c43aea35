use thiserror::Error;
use crate::core::{
    filters::{plan_filters, FilterDefaults, FilterPlan},
    scoring::calculate_composite_score,
};
use crate::models::{
    FeatureCollection, FeatureProperties, FilterRequest, MunicipalityRecord, ScoreWeights,
    ScoredFeature,
};
use crate::models::domain::FeatureType;
use crate::services::{CommuneStore, StoreError};

/// Errors that abort a query
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Store query failed: {0}")]
    Store(#[from] StoreError),
}

/// Result of one filtering-and-scoring pass
#[derive(Debug)]
pub struct QueryResult {
    pub collection: FeatureCollection,
    pub total_candidates: usize,
}

/// Filtering and scoring orchestrator
///
/// # Pipeline Stages
/// 1. Plan predicates from the filter request
/// 2. Fetch matching communes from the store
/// 3. Score each commune and build its feature
///
/// Results keep the store order; they are not ranked by score.
#[derive(Debug, Clone)]
pub struct Engine {
    defaults: FilterDefaults,
}

impl Engine {
    pub fn new(defaults: FilterDefaults) -> Self {
        Self { defaults }
    }

    pub fn with_default_settings() -> Self {
        Self {
            defaults: FilterDefaults::default(),
        }
    }

    pub fn plan(&self, request: &FilterRequest) -> FilterPlan {
        plan_filters(request, &self.defaults)
    }

    /// Run the full pipeline against a store
    ///
    /// The store call is the only await point; dropping the returned future
    /// abandons the in-flight query. Store errors are returned unchanged and
    /// no partial collection is produced.
    pub async fn run<S>(
        &self,
        store: &S,
        request: &FilterRequest,
        weights: &ScoreWeights,
    ) -> Result<QueryResult, EngineError>
    where
        S: CommuneStore + ?Sized,
    {
        let plan = self.plan(request);
        tracing::debug!("Filter plan: {:?}", plan);

        if plan.matches_nothing() {
            tracing::debug!("Plan matches nothing, skipping store query");
            return Ok(QueryResult {
                collection: FeatureCollection::empty(),
                total_candidates: 0,
            });
        }

        let records = store.fetch_communes(&plan).await?;
        let total_candidates = records.len();

        Ok(QueryResult {
            collection: self.score_records(records, weights),
            total_candidates,
        })
    }

    /// Score every record, keeping input order
    pub fn score_records(
        &self,
        records: Vec<MunicipalityRecord>,
        weights: &ScoreWeights,
    ) -> FeatureCollection {
        FeatureCollection::new(
            records
                .into_iter()
                .map(|record| score_record(record, weights))
                .collect(),
        )
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::with_default_settings()
    }
}

/// Build the scored feature of one commune
pub fn score_record(record: MunicipalityRecord, weights: &ScoreWeights) -> ScoredFeature {
    let score = calculate_composite_score(&record, weights);
    let geometry = parse_geometry(&record.insee, record.geometry.as_deref());
    let coastal = record.is_coastal();
    let mountainous = record.is_mountainous();

    ScoredFeature {
        kind: FeatureType::Feature,
        geometry,
        properties: FeatureProperties {
            insee: record.insee,
            name: record.name,
            department_code: record.department_code,
            score,
            price_per_m2: record.price_per_m2,
            density: record.density,
            health_score: record.health_score,
            commerce_scaled: record.commerce_scaled,
            association_scaled: record.association_scaled,
            temperature_scaled: record.temperature_scaled,
            sunshine_scaled: record.sunshine_scaled,
            sunshine_raw: record.sunshine_raw,
            coastal,
            mountainous,
            sea_distance_km: record.sea_distance_km,
            mountain_distance_km: record.mountain_distance_km,
        },
    }
}

/// Decode the store's GeoJSON text; missing or unreadable geometry becomes null
fn parse_geometry(insee: &str, geometry: Option<&str>) -> Option<serde_json::Value> {
    let raw = geometry?;
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Commune {} has unreadable geometry: {}", insee, e);
            None
        }
    }
}
