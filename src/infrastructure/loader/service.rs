//! Asset loader - attribute data first, then the two geometry layers

use std::sync::Arc;

use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::domain::asset::{AssetPaths, AssetPhase, LoadError};
use crate::infrastructure::fetch::ResilientFetcher;

/// A geometry fetch running in the background
#[derive(Debug)]
pub struct PendingGeometry {
    phase: AssetPhase,
    handle: JoinHandle<Result<Arc<Value>, LoadError>>,
}

impl PendingGeometry {
    pub fn phase(&self) -> AssetPhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the fetch to settle
    pub async fn wait(self) -> Result<Arc<Value>, LoadError> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) => Err(LoadError::aborted(self.phase, e.to_string())),
        }
    }
}

/// Attribute data, resolved, plus geometry fetches still in flight
#[derive(Debug)]
pub struct LoadedAssets {
    pub data: Arc<Value>,
    pub adm1: PendingGeometry,
    pub adm3: PendingGeometry,
}

/// All three payloads, resolved
#[derive(Debug, Clone)]
pub struct Assets {
    pub data: Arc<Value>,
    pub adm1: Arc<Value>,
    pub adm3: Arc<Value>,
}

impl LoadedAssets {
    /// Waits for both geometries; the first failure (ADM1 before ADM3) wins
    pub async fn resolve_all(self) -> Result<Assets, LoadError> {
        let (adm1, adm3) = tokio::join!(self.adm1.wait(), self.adm3.wait());

        Ok(Assets {
            data: self.data,
            adm1: adm1?,
            adm3: adm3?,
        })
    }
}

/// Loads the payloads the map needs before it can initialize
#[derive(Debug, Clone)]
pub struct AssetLoader {
    fetcher: Arc<ResilientFetcher>,
    paths: AssetPaths,
}

impl AssetLoader {
    pub fn new(fetcher: Arc<ResilientFetcher>, paths: AssetPaths) -> Self {
        Self { fetcher, paths }
    }

    pub fn fetcher(&self) -> &Arc<ResilientFetcher> {
        &self.fetcher
    }

    pub fn paths(&self) -> &AssetPaths {
        &self.paths
    }

    /// Fetches attribute data, then starts both geometry fetches
    ///
    /// Attribute failures abort the load. Geometry failures surface only
    /// when the corresponding [`PendingGeometry`] is awaited.
    pub async fn load_assets(&self) -> Result<LoadedAssets, LoadError> {
        let url = self.paths.url(AssetPhase::Data);
        let data = self.fetcher.fetch_json(&url).await.map_err(|e| {
            error!(phase = %AssetPhase::Data, "Failed to load attribute data: {}", e);
            LoadError::fetch(AssetPhase::Data, e)
        })?;

        info!(url = %url, "Attribute data loaded");

        Ok(LoadedAssets {
            data,
            adm1: self.spawn_geometry(AssetPhase::Adm1),
            adm3: self.spawn_geometry(AssetPhase::Adm3),
        })
    }

    fn spawn_geometry(&self, phase: AssetPhase) -> PendingGeometry {
        let fetcher = self.fetcher.clone();
        let url = self.paths.url(phase);

        let handle = tokio::spawn(async move {
            fetcher.fetch_json(&url).await.map_err(|e| {
                error!(phase = %phase, "Failed to load geometries: {}", e);
                LoadError::fetch(phase, e)
            })
        });

        PendingGeometry { phase, handle }
    }
}
