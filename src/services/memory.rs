use async_trait::async_trait;
use crate::core::filters::FilterPlan;
use crate::models::{CommuneSummary, MunicipalityRecord};
use crate::services::store::{CommuneStore, StoreError};

/// Commune store over a fixed in-memory list
///
/// Used by tests and local runs without PostGIS. Attribute predicates are
/// evaluated in process; spatial predicates are refused since no projected
/// geometry is held here.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    records: Vec<MunicipalityRecord>,
}

impl InMemoryStore {
    pub fn new(records: Vec<MunicipalityRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl CommuneStore for InMemoryStore {
    async fn fetch_communes(&self, plan: &FilterPlan) -> Result<Vec<MunicipalityRecord>, StoreError> {
        if plan.has_spatial_predicates() {
            return Err(StoreError::Unsupported(
                "point-radius filters need the spatial store".to_string(),
            ));
        }

        Ok(self
            .records
            .iter()
            .filter(|record| plan.admits(record).unwrap_or(false))
            .take(plan.limit)
            .cloned()
            .collect())
    }

    async fn count_communes(&self) -> Result<i64, StoreError> {
        i64::try_from(self.records.len()).map_err(|e| StoreError::InvalidRow(e.to_string()))
    }

    async fn sample_communes(&self, limit: u16) -> Result<Vec<CommuneSummary>, StoreError> {
        Ok(self
            .records
            .iter()
            .take(usize::from(limit))
            .map(|record| CommuneSummary {
                insee: record.insee.clone(),
                name: record.name.clone(),
                department_code: record.department_code.clone(),
                price_per_m2: record.price_per_m2,
                density: record.density,
                health_score: record.health_score,
            })
            .collect())
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}
