//! File-backed durable store

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::warn;

use crate::domain::cache::DurableStore;
use crate::domain::DomainError;

/// Durable store kept as one JSON object on disk
///
/// The document is loaded lazily on first use and rewritten through a
/// temporary file plus rename on every mutation, so a crash never leaves a
/// half-written document behind. An unparseable document is treated as empty
/// and replaced by the next write. The held map only changes once the
/// rewrite has succeeded.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    items: Mutex<Option<BTreeMap<String, String>>>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            items: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<BTreeMap<String, String>, DomainError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => match serde_json::from_str(&content) {
                Ok(items) => Ok(items),
                Err(e) => {
                    warn!(
                        path = %self.path.display(),
                        error = %e,
                        "Corrupt cache file, starting from an empty store"
                    );
                    Ok(BTreeMap::new())
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(DomainError::storage(format!(
                "Failed to read cache file {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn persist(&self, items: &BTreeMap<String, String>) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                DomainError::storage(format!(
                    "Failed to create cache directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let json = serde_json::to_string(items)
            .map_err(|e| DomainError::storage(format!("Failed to serialize cache file: {}", e)))?;

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, json).await.map_err(|e| {
            DomainError::storage(format!("Failed to write {}: {}", tmp.display(), e))
        })?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            DomainError::storage(format!(
                "Failed to replace cache file {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    async fn read_items<R>(
        &self,
        f: impl FnOnce(&BTreeMap<String, String>) -> R,
    ) -> Result<R, DomainError> {
        let mut guard = self.items.lock().await;

        if guard.is_none() {
            *guard = Some(self.load().await?);
        }

        Ok(f(guard.get_or_insert_with(BTreeMap::new)))
    }

    /// Runs `f` against a copy of the document and keeps the copy once it is
    /// persisted, when `f` reports a change
    async fn with_items<R>(
        &self,
        f: impl FnOnce(&mut BTreeMap<String, String>) -> (R, bool),
    ) -> Result<R, DomainError> {
        let mut guard = self.items.lock().await;

        if guard.is_none() {
            *guard = Some(self.load().await?);
        }

        let items = guard.get_or_insert_with(BTreeMap::new);
        let mut next = items.clone();
        let (result, changed) = f(&mut next);

        if changed {
            self.persist(&next).await?;
            *items = next;
        }

        Ok(result)
    }
}

#[async_trait]
impl DurableStore for FileStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, DomainError> {
        self.read_items(|items| items.get(key).cloned()).await
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), DomainError> {
        self.with_items(|items| {
            items.insert(key.to_string(), value.to_string());
            ((), true)
        })
        .await
    }

    async fn remove_item(&self, key: &str) -> Result<bool, DomainError> {
        self.with_items(|items| {
            let removed = items.remove(key).is_some();
            (removed, removed)
        })
        .await
    }

    async fn keys(&self) -> Result<Vec<String>, DomainError> {
        self.read_items(|items| items.keys().cloned().collect()).await
    }

    async fn remove_prefixed(&self, prefix: &str) -> Result<usize, DomainError> {
        self.with_items(|items| {
            let before = items.len();
            items.retain(|key, _| !key.starts_with(prefix));
            let removed = before - items.len();
            (removed, removed > 0)
        })
        .await
    }
}
