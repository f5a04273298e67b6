//! Loader infrastructure - orchestrates the three asset fetches

mod service;

pub use service::{AssetLoader, Assets, LoadedAssets, PendingGeometry};
