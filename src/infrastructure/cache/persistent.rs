//! Versioned persistent cache over a durable store

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::domain::cache::{DurableStore, PersistentKeys};
use crate::domain::DomainError;

/// Persists fetched payloads across restarts, stamped with a version
///
/// Before the first read or write, the stored version marker is compared
/// with the current one; on mismatch every key under the prefix is purged.
/// Store failures never escape: they are logged and treated as misses, and a
/// missing or unusable store turns every operation into a no-op.
pub struct PersistentCache {
    store: Option<Arc<dyn DurableStore>>,
    keys: PersistentKeys,
    usable: OnceCell<bool>,
}

impl std::fmt::Debug for PersistentCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistentCache")
            .field("enabled", &self.store.is_some())
            .field("keys", &self.keys)
            .field("usable", &self.usable.get())
            .finish()
    }
}

impl PersistentCache {
    pub fn new(store: Arc<dyn DurableStore>, keys: PersistentKeys) -> Self {
        Self {
            store: Some(store),
            keys,
            usable: OnceCell::new(),
        }
    }

    /// A cache with no backing store; every operation is a no-op
    pub fn disabled(keys: PersistentKeys) -> Self {
        Self {
            store: None,
            keys,
            usable: OnceCell::new(),
        }
    }

    pub fn keys(&self) -> &PersistentKeys {
        &self.keys
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    /// Reconciles the stored version marker, at most once per instance
    ///
    /// Returns whether the store is usable.
    pub async fn ensure_cache_version(&self) -> bool {
        *self.usable.get_or_init(|| self.reconcile()).await
    }

    async fn reconcile(&self) -> bool {
        let Some(store) = &self.store else {
            return false;
        };

        if !store.is_available().await {
            warn!("Persistent storage unavailable, continuing without it");
            return false;
        }

        let marker_key = self.keys.version_marker();
        let current = self.keys.version().to_string();

        let stored = match store.get_item(&marker_key).await {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "Failed to read persistent cache version");
                return true;
            }
        };

        if stored.as_deref() == Some(current.as_str()) {
            debug!(version = %current, "Persistent cache version is current");
            return true;
        }

        match store.remove_prefixed(self.keys.prefix()).await {
            Ok(removed) => info!(
                previous = stored.as_deref().unwrap_or("none"),
                current = %current,
                removed,
                "Persistent cache version changed, purged stale entries"
            ),
            Err(e) => warn!(error = %e, "Failed to purge stale persistent cache entries"),
        }

        if let Err(e) = store.set_item(&marker_key, &current).await {
            warn!(error = %e, "Failed to write persistent cache version");
        }

        true
    }

    fn usable_store(&self, usable: bool) -> Option<&Arc<dyn DurableStore>> {
        if usable {
            self.store.as_ref()
        } else {
            None
        }
    }

    /// Reads a persisted payload, `None` on miss or any storage problem
    pub async fn read(&self, url: &str) -> Option<Value> {
        let usable = self.ensure_cache_version().await;
        let store = self.usable_store(usable)?;
        let key = self.keys.entry(url);

        let raw = match store.get_item(&key).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(url = %url, error = %e, "Failed to read persistent cache entry");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                debug!(url = %url, "Persistent cache hit");
                Some(value)
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Discarding unreadable persistent cache entry");
                if let Err(e) = store.remove_item(&key).await {
                    warn!(url = %url, error = %e, "Failed to remove unreadable persistent cache entry");
                }
                None
            }
        }
    }

    /// Best-effort write of a payload; failures are only logged
    pub async fn write(&self, url: &str, value: &Value) {
        let usable = self.ensure_cache_version().await;
        let Some(store) = self.usable_store(usable) else {
            return;
        };

        let serialized = match serde_json::to_string(value) {
            Ok(serialized) => serialized,
            Err(e) => {
                warn!(url = %url, error = %e, "Failed to serialize payload for persistent cache");
                return;
            }
        };

        if let Err(e) = store.set_item(&self.keys.entry(url), &serialized).await {
            warn!(url = %url, error = %e, "Failed to persist payload");
        }
    }

    /// Removes every persisted entry under the prefix, whatever its version
    pub async fn purge(&self) -> Result<usize, DomainError> {
        match &self.store {
            Some(store) => store.remove_prefixed(self.keys.prefix()).await,
            None => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::{CacheVersion, MockDurableStore};
    use crate::infrastructure::cache::{FileStore, InMemoryStore};
    use serde_json::json;

    const URL: &str = "assets/data/data.json";

    fn keys(version: i64) -> PersistentKeys {
        PersistentKeys::new("map:", CacheVersion::from_millis(version))
    }

    #[tokio::test]
    async fn test_version_mismatch_purges_prefixed_entries() {
        let store = Arc::new(InMemoryStore::with_items([
            ("map:version", "1"),
            ("map:1:assets/data/data.json", "{}"),
            ("map:1:assets/data/adm1.json", "{}"),
            ("unrelated", "keep"),
        ]));
        let cache = PersistentCache::new(store.clone(), keys(2));

        assert!(cache.ensure_cache_version().await);

        let mut remaining = store.keys().await.unwrap();
        remaining.sort();
        assert_eq!(remaining, vec!["map:version".to_string(), "unrelated".to_string()]);
        assert_eq!(store.get_item("map:version").await.unwrap().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_missing_marker_is_written() {
        let store = Arc::new(InMemoryStore::with_items([("map:0:old", "{}")]));
        let cache = PersistentCache::new(store.clone(), keys(5));

        cache.ensure_cache_version().await;

        assert!(store.get_item("map:0:old").await.unwrap().is_none());
        assert_eq!(store.get_item("map:version").await.unwrap().as_deref(), Some("5"));
    }

    #[tokio::test]
    async fn test_matching_version_removes_nothing() {
        let store = Arc::new(InMemoryStore::with_items([
            ("map:version", "7"),
            ("map:7:assets/data/data.json", "{\"1\":{}}"),
        ]));
        let cache = PersistentCache::new(store.clone(), keys(7));

        cache.ensure_cache_version().await;

        assert_eq!(store.keys().await.unwrap().len(), 2);
        assert_eq!(cache.read(URL).await, Some(json!({"1": {}})));
    }

    #[tokio::test]
    async fn test_reconciliation_runs_once() {
        let store = Arc::new(InMemoryStore::new());
        let cache = PersistentCache::new(store.clone(), keys(3));

        cache.ensure_cache_version().await;
        // A stale entry appearing later is not purged by a second call.
        store.set_item("map:2:late", "{}").await.unwrap();
        cache.ensure_cache_version().await;

        assert!(store.get_item("map:2:late").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_write_then_read_round_trip() {
        let store = Arc::new(InMemoryStore::new());
        let payload = json!({
            "type": "FeatureCollection",
            "features": [{"properties": {"id": "1"}, "geometry": null}]
        });

        PersistentCache::new(store.clone(), keys(9)).write(URL, &payload).await;

        // A fresh instance stands in for a restarted process.
        let reopened = PersistentCache::new(store, keys(9));
        assert_eq!(reopened.read(URL).await, Some(payload));
    }

    #[tokio::test]
    async fn test_unreadable_entry_is_discarded() {
        let store = Arc::new(InMemoryStore::with_items([
            ("map:version", "4"),
            ("map:4:assets/data/data.json", "{broken"),
        ]));
        let cache = PersistentCache::new(store.clone(), keys(4));

        assert_eq!(cache.read(URL).await, None);
        assert!(store.get_item("map:4:assets/data/data.json").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_disabled_cache_is_a_no_op() {
        let cache = PersistentCache::disabled(keys(1));

        assert!(!cache.ensure_cache_version().await);
        cache.write(URL, &json!(1)).await;
        assert_eq!(cache.read(URL).await, None);
        assert_eq!(cache.purge().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unavailable_store_is_never_touched_again() {
        let mut store = MockDurableStore::new();
        store.expect_is_available().times(1).return_const(false);
        store.expect_get_item().never();
        store.expect_set_item().never();

        let cache = PersistentCache::new(Arc::new(store), keys(1));

        assert_eq!(cache.read(URL).await, None);
        cache.write(URL, &json!({"a": 1})).await;
    }

    #[tokio::test]
    async fn test_failing_writes_are_swallowed() {
        let mut store = MockDurableStore::new();
        store.expect_is_available().return_const(true);
        store
            .expect_get_item()
            .returning(|_| Ok(Some(CacheVersion::from_millis(1).to_string())));
        store
            .expect_set_item()
            .returning(|_, _| Err(DomainError::storage("quota exceeded")));

        let cache = PersistentCache::new(Arc::new(store), keys(1));

        cache.write(URL, &json!({"a": 1})).await;
    }

    #[tokio::test]
    async fn test_purge_ignores_version() {
        let store = Arc::new(InMemoryStore::with_items([
            ("map:version", "1"),
            ("map:1:a", "{}"),
            ("other", "x"),
        ]));
        let cache = PersistentCache::new(store.clone(), keys(1));

        assert_eq!(cache.purge().await.unwrap(), 2);
        assert_eq!(store.keys().await.unwrap(), vec!["other".to_string()]);
    }

    #[tokio::test]
    async fn test_corrupt_file_store_recovers() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{truncated").unwrap();
        let cache = PersistentCache::new(Arc::new(FileStore::new(&path)), keys(1));

        assert_eq!(cache.purge().await.unwrap(), 0);
        assert!(cache.ensure_cache_version().await);

        cache.write(URL, &json!({"1": {"risk": "Високий"}})).await;
        assert_eq!(cache.read(URL).await, Some(json!({"1": {"risk": "Високий"}})));

        let reopened = PersistentCache::new(Arc::new(FileStore::new(&path)), keys(1));
        assert_eq!(reopened.read(URL).await, Some(json!({"1": {"risk": "Високий"}})));
    }
}
