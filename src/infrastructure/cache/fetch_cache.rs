//! Positive and negative in-memory caches for fetched assets, using moka

use std::sync::Arc;

use moka::future::Cache as MokaCache;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::fetch::FetchError;

/// Configuration for the in-memory fetch cache
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FetchCacheConfig {
    /// Optional bound on the URLs held in each of the two caches, at least 1.
    /// Unset keeps every entry for the life of the process.
    pub max_capacity: Option<u64>,
}

impl FetchCacheConfig {
    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = Some(capacity);
        self
    }
}

fn build_cache<V>(max_capacity: Option<u64>) -> MokaCache<String, V>
where
    V: Clone + Send + Sync + 'static,
{
    let builder = MokaCache::builder();
    match max_capacity {
        Some(capacity) => builder.max_capacity(capacity.max(1)).build(),
        None => builder.build(),
    }
}

/// Successful payloads and last failures, both keyed by URL
///
/// Entries never expire; a failure record is dropped only when a later
/// fetch of the same URL succeeds or it is cleared explicitly. Eviction can
/// only happen when `max_capacity` is configured.
#[derive(Debug, Clone)]
pub struct FetchCache {
    values: MokaCache<String, Arc<Value>>,
    failures: MokaCache<String, FetchError>,
}

impl FetchCache {
    pub fn new() -> Self {
        Self::with_config(FetchCacheConfig::default())
    }

    pub fn with_config(config: FetchCacheConfig) -> Self {
        Self {
            values: build_cache(config.max_capacity),
            failures: build_cache(config.max_capacity),
        }
    }

    pub async fn get(&self, url: &str) -> Option<Arc<Value>> {
        self.values.get(url).await
    }

    pub async fn failure(&self, url: &str) -> Option<FetchError> {
        self.failures.get(url).await
    }

    /// Stores a payload and forgets any failure recorded for the URL
    pub async fn record_success(&self, url: &str, value: Arc<Value>) {
        self.values.insert(url.to_string(), value).await;
        self.failures.invalidate(url).await;
    }

    pub async fn record_failure(&self, url: &str, error: FetchError) {
        self.failures.insert(url.to_string(), error).await;
    }

    /// Forgets a recorded failure so the next fetch hits the network again
    pub async fn clear_failure(&self, url: &str) -> bool {
        self.failures.remove(url).await.is_some()
    }

    pub async fn value_count(&self) -> u64 {
        self.values.run_pending_tasks().await;
        self.values.entry_count()
    }

    pub async fn failure_count(&self) -> u64 {
        self.failures.run_pending_tasks().await;
        self.failures.entry_count()
    }
}

impl Default for FetchCache {
    fn default() -> Self {
        Self::new()
    }
}
