//! Durable key-value store trait

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::domain::DomainError;

/// Key used by the default availability probe
pub const PROBE_KEY: &str = "__edu_risk_map_probe__";

/// String key-value storage that survives process restarts
///
/// Values are opaque text (serialized JSON). Every method may fail; callers
/// in the loading layer treat failures as cache misses.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DurableStore: Send + Sync {
    /// Gets the value stored under a key
    async fn get_item(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Stores a value, replacing any previous one
    async fn set_item(&self, key: &str, value: &str) -> Result<(), DomainError>;

    /// Removes a key, returning whether it existed
    async fn remove_item(&self, key: &str) -> Result<bool, DomainError>;

    /// Lists every key in the store
    async fn keys(&self) -> Result<Vec<String>, DomainError>;

    /// Removes every key starting with `prefix`, returning how many were removed
    async fn remove_prefixed(&self, prefix: &str) -> Result<usize, DomainError> {
        let mut removed = 0;

        for key in self.keys().await? {
            if key.starts_with(prefix) && self.remove_item(&key).await? {
                removed += 1;
            }
        }

        Ok(removed)
    }

    /// Round-trips a throwaway key to check the store accepts writes
    async fn is_available(&self) -> bool {
        if self.set_item(PROBE_KEY, PROBE_KEY).await.is_err() {
            return false;
        }

        self.remove_item(PROBE_KEY).await.is_ok()
    }
}
