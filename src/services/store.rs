use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use crate::core::filters::FilterPlan;
use crate::models::{CommuneSummary, MunicipalityRecord};

/// Errors raised by a commune store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Query timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid row: {0}")]
    InvalidRow(String),

    #[error("Unsupported predicate: {0}")]
    Unsupported(String),
}

/// Read access to the commune catalogue
///
/// Implementations evaluate every predicate of a [`FilterPlan`], including
/// the spatial ones, and return records in their own order, capped at
/// `plan.limit`.
#[async_trait]
pub trait CommuneStore: Send + Sync {
    async fn fetch_communes(&self, plan: &FilterPlan) -> Result<Vec<MunicipalityRecord>, StoreError>;

    async fn count_communes(&self) -> Result<i64, StoreError>;

    async fn sample_communes(&self, limit: u16) -> Result<Vec<CommuneSummary>, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError>;
}
