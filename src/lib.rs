//! Education-security risk map - asset loading
//!
//! Loads the attribute dataset and the two boundary layers behind the risk
//! map of Ukrainian communities, with:
//! - Per-attempt timeouts and jittered linear retry backoff
//! - In-memory caching of payloads and of exhausted failures
//! - A versioned persistent cache (file, Redis or in-memory store)
//! - A typed view of risk levels, community records and search entries

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use domain::DomainError;
use infrastructure::{
    cache::{FetchCache, StoreFactory},
    fetch::ResilientFetcher,
    http::ReqwestTransport,
    loader::AssetLoader,
};
use tracing::info;

/// Create the asset loader from `config/` files and `APP__` environment variables
pub async fn create_asset_loader() -> anyhow::Result<AssetLoader> {
    create_asset_loader_with_config(&AppConfig::load()?).await
}

/// Create the asset loader with its caches and transport wired from configuration
///
/// The HTTP transport needs absolute URLs, so `assets.base_url` must be set.
pub async fn create_asset_loader_with_config(config: &AppConfig) -> anyhow::Result<AssetLoader> {
    if config.assets.base_url.trim().is_empty() {
        return Err(DomainError::configuration(
            "assets.base_url must be set (config/default.toml or APP__ASSETS__BASE_URL)",
        )
        .into());
    }

    let fetcher = create_fetcher(config).await?;

    info!(
        base_url = %config.assets.base_url,
        max_attempts = config.fetch.attempts(),
        timeout_ms = config.fetch.timeout_ms,
        "Asset loader ready"
    );

    Ok(AssetLoader::new(Arc::new(fetcher), config.assets.clone()))
}

/// Create the cached, retrying fetcher
pub async fn create_fetcher(config: &AppConfig) -> anyhow::Result<ResilientFetcher> {
    let persistent = StoreFactory::new()
        .create_persistent_cache(&config.persistent_cache)
        .await?;

    Ok(ResilientFetcher::new(
        Arc::new(ReqwestTransport::new()),
        config.fetch.clone(),
        Arc::new(FetchCache::with_config(config.memory_cache.clone())),
        Arc::new(persistent),
    ))
}
