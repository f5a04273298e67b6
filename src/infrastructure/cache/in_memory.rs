//! In-memory durable store, for tests and ephemeral runs

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::cache::DurableStore;
use crate::domain::DomainError;

/// Thread-safe map implementing [`DurableStore`]
///
/// Data is lost when the process terminates.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    items: RwLock<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with items
    pub fn with_items<K, V>(items: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            items: RwLock::new(
                items
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl DurableStore for InMemoryStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, DomainError> {
        let items = self.items.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(items.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let mut items = self.items.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<bool, DomainError> {
        let mut items = self.items.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(items.remove(key).is_some())
    }

    async fn keys(&self) -> Result<Vec<String>, DomainError> {
        let items = self.items.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(items.keys().cloned().collect())
    }

    async fn remove_prefixed(&self, prefix: &str) -> Result<usize, DomainError> {
        let mut items = self.items.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let before = items.len();
        items.retain(|key, _| !key.starts_with(prefix));
        Ok(before - items.len())
    }
}
