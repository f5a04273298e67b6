//! Durable store factory for runtime selection

use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};

use crate::domain::cache::{
    CacheVersion, DurableStore, PersistentKeys, DEFAULT_CACHE_VERSION_DATE, DEFAULT_KEY_PREFIX,
};
use crate::domain::DomainError;

use super::file::FileStore;
use super::in_memory::InMemoryStore;
use super::persistent::PersistentCache;
use super::redis::{RedisStore, RedisStoreConfig};

/// Supported durable store backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    /// Persistent caching disabled
    None,
    /// Process-local map
    InMemory,
    /// JSON document on disk
    #[default]
    File,
    /// Redis strings
    Redis,
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::None => write!(f, "none"),
            StoreBackend::InMemory => write!(f, "in_memory"),
            StoreBackend::File => write!(f, "file"),
            StoreBackend::Redis => write!(f, "redis"),
        }
    }
}

impl std::str::FromStr for StoreBackend {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "disabled" | "off" => Ok(StoreBackend::None),
            "in_memory" | "inmemory" | "memory" => Ok(StoreBackend::InMemory),
            "file" => Ok(StoreBackend::File),
            "redis" => Ok(StoreBackend::Redis),
            _ => Err(DomainError::configuration(format!(
                "Unknown persistent cache backend: {}. Valid backends: none, in_memory, file, redis",
                s
            ))),
        }
    }
}

/// Persistent cache settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PersistentCacheConfig {
    pub backend: String,
    pub key_prefix: String,
    /// Deployment date (`YYYY-MM-DD`) the version stamp is derived from
    pub version_date: String,
    /// Document path for the `file` backend
    pub file_path: PathBuf,
    /// Connection URL for the `redis` backend
    pub redis_url: Option<String>,
}

impl Default for PersistentCacheConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default().to_string(),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            version_date: DEFAULT_CACHE_VERSION_DATE.to_string(),
            file_path: PathBuf::from(".cache/edu-risk-map.json"),
            redis_url: None,
        }
    }
}

impl PersistentCacheConfig {
    pub fn in_memory() -> Self {
        Self {
            backend: StoreBackend::InMemory.to_string(),
            ..Default::default()
        }
    }

    pub fn disabled() -> Self {
        Self {
            backend: StoreBackend::None.to_string(),
            ..Default::default()
        }
    }

    pub fn redis(url: impl Into<String>) -> Self {
        Self {
            backend: StoreBackend::Redis.to_string(),
            redis_url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    pub fn with_version_date(mut self, date: impl Into<String>) -> Self {
        self.version_date = date.into();
        self
    }

    pub fn with_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = path.into();
        self
    }

    pub fn backend(&self) -> Result<StoreBackend, DomainError> {
        self.backend.parse()
    }

    pub fn keys(&self) -> Result<PersistentKeys, DomainError> {
        let version: CacheVersion = self.version_date.parse()?;
        Ok(PersistentKeys::new(self.key_prefix.clone(), version))
    }
}

/// Factory for durable stores and the persistent cache over them
#[derive(Debug, Default)]
pub struct StoreFactory;

impl StoreFactory {
    pub fn new() -> Self {
        Self
    }

    /// Creates the configured store, `None` when persistence is disabled
    pub async fn create_store(
        &self,
        config: &PersistentCacheConfig,
    ) -> Result<Option<Arc<dyn DurableStore>>, DomainError> {
        let store: Arc<dyn DurableStore> = match config.backend()? {
            StoreBackend::None => return Ok(None),
            StoreBackend::InMemory => Arc::new(InMemoryStore::new()),
            StoreBackend::File => Arc::new(FileStore::new(config.file_path.clone())),
            StoreBackend::Redis => {
                let url = config.redis_url.clone().ok_or_else(|| {
                    DomainError::configuration("Redis URL is required for the redis backend")
                })?;
                Arc::new(RedisStore::new(RedisStoreConfig::new(url)).await?)
            }
        };

        Ok(Some(store))
    }

    /// Builds the persistent cache, degrading to a disabled one if the store
    /// cannot be created
    ///
    /// Configuration mistakes in the key layout are still reported.
    pub async fn create_persistent_cache(
        &self,
        config: &PersistentCacheConfig,
    ) -> Result<PersistentCache, DomainError> {
        let keys = config.keys()?;

        match self.create_store(config).await {
            Ok(Some(store)) => {
                info!(backend = %config.backend, version = %keys.version(), "Persistent cache enabled");
                Ok(PersistentCache::new(store, keys))
            }
            Ok(None) => {
                info!("Persistent cache disabled");
                Ok(PersistentCache::disabled(keys))
            }
            Err(e) => {
                warn!(error = %e, "Persistent cache unavailable, continuing without it");
                Ok(PersistentCache::disabled(keys))
            }
        }
    }
}
