use std::time::Duration;
use crate::services::store::{CommuneStore, StoreError};

const COUNT_KEY: &str = "communes:count";

/// In-process cache for catalogue-level figures
///
/// The catalogue only changes with a re-import, so its size is kept for
/// `ttl_secs` instead of counting rows on every call. Scored results are
/// never cached here.
pub struct CatalogueCache {
    counts: moka::future::Cache<&'static str, i64>,
}

impl CatalogueCache {
    /// Create a new catalogue cache
    pub fn new(capacity: u64, ttl_secs: u64) -> Self {
        let counts = moka::future::CacheBuilder::new(capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { counts }
    }

    /// Catalogue size, from cache or from the store
    pub async fn commune_count<S>(&self, store: &S) -> Result<i64, StoreError>
    where
        S: CommuneStore + ?Sized,
    {
        if let Some(count) = self.counts.get(COUNT_KEY).await {
            tracing::trace!("Cache hit: {}", COUNT_KEY);
            return Ok(count);
        }

        let count = store.count_communes().await?;
        self.counts.insert(COUNT_KEY, count).await;
        tracing::trace!("Cache set: {} = {}", COUNT_KEY, count);

        Ok(count)
    }

    /// Drop every cached figure
    pub fn invalidate_all(&self) {
        self.counts.invalidate_all();
    }
}
