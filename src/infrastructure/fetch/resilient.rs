//! Cached, retrying JSON fetcher

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::domain::fetch::{FetchError, HttpTransport, RetryPolicy};
use crate::infrastructure::cache::{FetchCache, PersistentCache};
use crate::infrastructure::http::fetch_with_timeout;

/// Fetches JSON through the in-memory, failure and persistent caches,
/// retrying the network with jittered linear backoff
///
/// Lookup order: cached payload, cached failure, persisted payload, network.
/// Concurrent callers for the same uncached URL each run their own retry
/// loop; requests are not coalesced.
#[derive(Debug)]
pub struct ResilientFetcher {
    transport: Arc<dyn HttpTransport>,
    policy: RetryPolicy,
    cache: Arc<FetchCache>,
    persistent: Arc<PersistentCache>,
}

impl ResilientFetcher {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        policy: RetryPolicy,
        cache: Arc<FetchCache>,
        persistent: Arc<PersistentCache>,
    ) -> Self {
        Self {
            transport,
            policy,
            cache,
            persistent,
        }
    }

    pub fn cache(&self) -> &Arc<FetchCache> {
        &self.cache
    }

    pub fn persistent(&self) -> &Arc<PersistentCache> {
        &self.persistent
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub async fn fetch_json(&self, url: &str) -> Result<Arc<Value>, FetchError> {
        if let Some(value) = self.cache.get(url).await {
            debug!(url = %url, "Memory cache hit");
            return Ok(value);
        }

        if let Some(error) = self.cache.failure(url).await {
            debug!(url = %url, kind = error.kind.name(), "Replaying cached failure");
            return Err(error);
        }

        if let Some(value) = self.persistent.read(url).await {
            let value = Arc::new(value);
            self.cache.record_success(url, value.clone()).await;
            return Ok(value);
        }

        self.fetch_with_retry(url).await
    }

    /// Network retry loop; records the outcome in the in-memory caches and
    /// persists a successful payload
    async fn fetch_with_retry(&self, url: &str) -> Result<Arc<Value>, FetchError> {
        let attempts = self.policy.attempts();
        let mut attempt = 1;

        loop {
            debug!(url = %url, attempt, "Fetching");

            match fetch_with_timeout(self.transport.as_ref(), url, attempt, self.policy.timeout())
                .await
            {
                Ok(value) => {
                    let value = Arc::new(value);
                    self.cache.record_success(url, value.clone()).await;
                    self.persistent.write(url, &value).await;
                    info!(url = %url, attempt, "Fetched");
                    return Ok(value);
                }
                Err(e) if attempt < attempts => {
                    let delay = self.policy.backoff_delay(attempt);
                    warn!(
                        url = %url,
                        attempt,
                        kind = e.kind.name(),
                        delay_ms = delay.as_millis() as u64,
                        "Fetch attempt failed, retrying: {}",
                        e
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    error!(url = %url, attempt, kind = e.kind.name(), "Giving up: {}", e);
                    self.cache.record_failure(url, e.clone()).await;
                    return Err(e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::{CacheVersion, DurableStore, MockDurableStore, PersistentKeys};
    use crate::domain::fetch::{FetchErrorKind, MockTransport};
    use crate::domain::DomainError;
    use crate::infrastructure::cache::InMemoryStore;
    use serde_json::json;
    use std::time::Duration;
    use tokio::time::Instant;

    const URL: &str = "assets/data/data.json";

    fn keys() -> PersistentKeys {
        PersistentKeys::new("map:", CacheVersion::from_millis(1))
    }

    fn policy() -> RetryPolicy {
        RetryPolicy::new(3).with_base_delay(100).with_timeout(1_000)
    }

    fn fetcher(transport: Arc<MockTransport>, persistent: PersistentCache) -> ResilientFetcher {
        ResilientFetcher::new(
            transport,
            policy(),
            Arc::new(FetchCache::new()),
            Arc::new(persistent),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_on_third_attempt_with_growing_delays() {
        let transport = Arc::new(
            MockTransport::new()
                .with_error(URL, FetchErrorKind::bad_response(500))
                .with_error(URL, FetchErrorKind::bad_response(500))
                .with_response(URL, json!({"1": {"name": "X"}})),
        );
        let fetcher = fetcher(transport.clone(), PersistentCache::disabled(keys()));

        let started = Instant::now();
        let value = fetcher.fetch_json(URL).await.unwrap();
        let elapsed = started.elapsed();

        assert_eq!(*value, json!({"1": {"name": "X"}}));
        assert_eq!(transport.calls(URL), 3);
        // 100..200 ms after the first failure, 200..300 ms after the second.
        assert!(elapsed >= Duration::from_millis(300), "elapsed {:?}", elapsed);
        assert!(elapsed < Duration::from_millis(500), "elapsed {:?}", elapsed);
        assert!(fetcher.cache().failure(URL).await.is_none());
        assert_eq!(fetcher.cache().get(URL).await, Some(value));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_caches_the_returned_error() {
        let transport = Arc::new(
            MockTransport::new()
                .with_error(URL, FetchErrorKind::bad_response(500))
                .with_error(URL, FetchErrorKind::network("connection reset"))
                .with_error(URL, FetchErrorKind::bad_response(503)),
        );
        let fetcher = fetcher(transport.clone(), PersistentCache::disabled(keys()));

        let error = fetcher.fetch_json(URL).await.unwrap_err();

        assert_eq!(error, FetchError::new(URL, 3, FetchErrorKind::bad_response(503)));
        assert_eq!(fetcher.cache().failure(URL).await, Some(error));
        assert_eq!(transport.calls(URL), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cached_failure_short_circuits() {
        let transport = Arc::new(MockTransport::new());
        let fetcher = fetcher(transport.clone(), PersistentCache::disabled(keys()));

        let first = fetcher.fetch_json(URL).await.unwrap_err();
        transport.push(URL, Ok(json!({"late": true})));
        let second = fetcher.fetch_json(URL).await.unwrap_err();

        assert_eq!(first, second);
        assert_eq!(transport.calls(URL), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_later_success_clears_failure_and_persists() {
        let store = Arc::new(InMemoryStore::new());
        let transport = Arc::new(MockTransport::new());
        let fetcher = fetcher(transport.clone(), PersistentCache::new(store.clone(), keys()));

        fetcher.fetch_json(URL).await.unwrap_err();
        transport.push(URL, Ok(json!({"ok": true})));

        let value = fetcher.fetch_with_retry(URL).await.unwrap();

        assert_eq!(*value, json!({"ok": true}));
        assert!(fetcher.cache().failure(URL).await.is_none());
        assert_eq!(fetcher.fetch_json(URL).await.unwrap(), value);
        assert_eq!(
            store.get_item(&keys().entry(URL)).await.unwrap().as_deref(),
            Some("{\"ok\":true}")
        );
    }

    #[tokio::test]
    async fn test_memory_hit_skips_network() {
        let transport = Arc::new(MockTransport::new().with_response(URL, json!([1])));
        let fetcher = fetcher(transport.clone(), PersistentCache::disabled(keys()));

        let first = fetcher.fetch_json(URL).await.unwrap();
        let second = fetcher.fetch_json(URL).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(transport.calls(URL), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeouts_are_retried() {
        let transport = Arc::new(
            MockTransport::new()
                .with_response(URL, json!({"slow": true}))
                .with_delay(URL, Duration::from_secs(10)),
        );
        let fetcher = fetcher(transport.clone(), PersistentCache::disabled(keys()));

        let error = fetcher.fetch_json(URL).await.unwrap_err();

        assert_eq!(error, FetchError::timeout(URL, 3));
        assert_eq!(transport.calls(URL), 3);
        assert_eq!(transport.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_persisted_payload_served_without_network() {
        let store = Arc::new(InMemoryStore::new());
        let payload = json!({"1": {"code": "UA01", "name": "X", "risk": "Високий"}});

        let writer = fetcher(
            Arc::new(MockTransport::new().with_response(URL, payload.clone())),
            PersistentCache::new(store.clone(), keys()),
        );
        writer.fetch_json(URL).await.unwrap();

        let offline = Arc::new(MockTransport::new());
        let reader = fetcher(offline.clone(), PersistentCache::new(store, keys()));

        assert_eq!(*reader.fetch_json(URL).await.unwrap(), payload);
        assert_eq!(offline.calls(URL), 0);
        assert!(reader.cache().get(URL).await.is_some());
    }

    #[tokio::test]
    async fn test_storage_read_failure_falls_through_to_network() {
        let mut store = MockDurableStore::new();
        store.expect_is_available().return_const(true);
        store
            .expect_get_item()
            .returning(|_| Err(DomainError::storage("SecurityError: storage disabled")));
        store.expect_remove_prefixed().returning(|_| Ok(0));
        store.expect_set_item().returning(|_, _| Ok(()));

        let transport = Arc::new(MockTransport::new().with_response(URL, json!({"1": {}})));
        let fetcher = fetcher(transport.clone(), PersistentCache::new(Arc::new(store), keys()));

        let value = fetcher.fetch_json(URL).await.unwrap();

        assert_eq!(*value, json!({"1": {}}));
        assert_eq!(transport.calls(URL), 1);
    }

    #[tokio::test]
    async fn test_successful_fetch_is_persisted() {
        let store = Arc::new(InMemoryStore::new());
        let transport = Arc::new(MockTransport::new().with_response(URL, json!({"a": 1})));
        let fetcher = fetcher(transport, PersistentCache::new(store.clone(), keys()));

        fetcher.fetch_json(URL).await.unwrap();

        assert_eq!(
            store.get_item(&keys().entry(URL)).await.unwrap().as_deref(),
            Some("{\"a\":1}")
        );
    }
}
