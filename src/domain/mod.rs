//! Domain layer - Core types and seams of the asset loading pipeline

pub mod asset;
pub mod cache;
pub mod error;
pub mod fetch;
pub mod risk;

pub use asset::{AssetPaths, AssetPhase, LoadError};
pub use cache::{CacheVersion, DurableStore, PersistentKeys};
pub use error::DomainError;
pub use fetch::{FetchError, FetchErrorKind, HttpTransport, RetryPolicy};
pub use risk::{CommunityRecord, DatasetSummary, RiskDataset, RiskLevel, SearchEntry};
