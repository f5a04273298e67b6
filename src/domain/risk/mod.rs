//! Risk domain - typed view over the attribute dataset

mod dataset;
mod level;
mod search;
mod summary;

pub use dataset::{CommunityRecord, RiskDataset};
pub use level::RiskLevel;
pub use search::{extract_search_entries, feature_id, features, SearchEntries, SearchEntry};
pub use summary::{DatasetSummary, LevelCount};
