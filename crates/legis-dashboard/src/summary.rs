//! Summary query cache using moka
//!
//! Summary panels are small and shared by every view of a dashboard, so
//! their rows are cached per `(procedure, params)` with bounded capacity and
//! optional expiry. Concurrent misses on one key share a single store call.

use crate::config::DashboardConfig;
use crate::error::{DashboardError, DashboardResult, StoreError};
use crate::store::{decode_rows, DataStore};
use moka::future::Cache;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Cache of summary query results
#[derive(Clone)]
pub struct SummaryCache {
    store: Arc<dyn DataStore>,
    inner: Cache<String, Arc<[Value]>>,
}

impl SummaryCache {
    /// Create cache over a store
    #[must_use]
    pub fn new(store: Arc<dyn DataStore>, config: &DashboardConfig) -> Self {
        let builder = Cache::builder().max_capacity(config.summary_capacity);
        let inner = match config.summary_ttl() {
            Some(ttl) => builder.time_to_live(ttl).build(),
            None => builder.build(),
        };
        Self { store, inner }
    }

    /// Raw rows of a procedure call, from cache or the store
    ///
    /// # Errors
    /// `DashboardError::Summary` if the store call fails; failures are not cached
    pub async fn rows(&self, procedure: &str, params: &Value) -> DashboardResult<Arc<[Value]>> {
        let key = cache_key(procedure, params);
        if let Some(rows) = self.inner.get(&key).await {
            tracing::debug!(procedure, "summary cache hit");
            return Ok(rows);
        }
        let store = Arc::clone(&self.store);
        self.inner
            .try_get_with(key, async move {
                let rows = store.call(procedure, params).await?;
                tracing::info!(procedure, rows = rows.len(), "summary loaded");
                Ok::<_, StoreError>(Arc::from(rows))
            })
            .await
            .map_err(|err| {
                tracing::warn!(procedure, error = %err, "summary query failed");
                DashboardError::Summary(err)
            })
    }

    /// Decoded rows of a procedure call
    ///
    /// # Errors
    /// As [`rows`](Self::rows), or `DashboardError::Store` if a row fails to decode
    pub async fn get<T: DeserializeOwned>(
        &self,
        procedure: &str,
        params: &Value,
    ) -> DashboardResult<Vec<T>> {
        let rows = self.rows(procedure, params).await?;
        Ok(decode_rows(procedure, rows.to_vec())?)
    }

    /// Drop one cached query
    pub async fn invalidate(&self, procedure: &str, params: &Value) {
        self.inner.invalidate(&cache_key(procedure, params)).await;
    }

    /// Drop every cached query
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }

    /// Approximate number of cached queries
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }

    /// Apply pending cache maintenance, making `entry_count` exact
    pub async fn sync(&self) {
        self.inner.run_pending_tasks().await;
    }
}

impl std::fmt::Debug for SummaryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummaryCache")
            .field("entries", &self.inner.entry_count())
            .finish_non_exhaustive()
    }
}

// serde_json maps are ordered, so equal params render identically
fn cache_key(procedure: &str, params: &Value) -> String {
    format!("{procedure}?{params}")
}
