//! Dataset summary reported after a load

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use super::dataset::RiskDataset;
use super::level::RiskLevel;
use super::search::{extract_search_entries, feature_id, features};
use crate::domain::DomainError;

/// Number of communities rated at one level
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelCount {
    pub level: RiskLevel,
    pub label: &'static str,
    pub communities: usize,
}

/// What a loaded dataset contains and what it is missing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    pub records: usize,
    pub regions: usize,
    pub communities: usize,
    pub searchable: usize,
    /// Most severe level first
    pub distribution: Vec<LevelCount>,
    /// Community features without a record
    pub without_data: usize,
    pub missing_data_ids: Vec<String>,
    pub skipped_search_entries: Vec<String>,
}

impl DatasetSummary {
    pub fn build(data: &Value, adm1: &Value, adm3: &Value) -> Result<Self, DomainError> {
        let mut dataset = RiskDataset::from_value(data)?;

        let mut distribution: Vec<LevelCount> = RiskLevel::ALL
            .into_iter()
            .map(|level| LevelCount {
                level,
                label: level.label(),
                communities: 0,
            })
            .collect();
        let mut without_data = 0;

        for feature in features(adm3) {
            let level = feature_id(feature).and_then(|id| dataset.risk_level(&id));

            match level {
                Some(level) => {
                    if let Some(count) = distribution.iter_mut().find(|c| c.level == level) {
                        count.communities += 1;
                    }
                }
                None => without_data += 1,
            }
        }

        let search = extract_search_entries(adm3, &mut dataset);

        let summary = Self {
            records: dataset.len(),
            regions: features(adm1).len(),
            communities: features(adm3).len(),
            searchable: search.entries.len(),
            distribution,
            without_data,
            missing_data_ids: dataset.missing_ids().iter().cloned().collect(),
            skipped_search_entries: search.skipped.into_iter().collect(),
        };

        if !summary.missing_data_ids.is_empty() {
            info!(count = summary.missing_data_ids.len(), "Communities without attribute data");
        }

        Ok(summary)
    }
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Attribute records:   {}", self.records)?;
        writeln!(f, "Regions (ADM1):      {}", self.regions)?;
        writeln!(f, "Communities (ADM3):  {}", self.communities)?;
        writeln!(f, "Searchable:          {}", self.searchable)?;
        writeln!(f, "Risk levels:")?;

        for count in &self.distribution {
            writeln!(f, "  {:<14} {}", count.label, count.communities)?;
        }

        writeln!(f, "Without data:        {}", self.without_data)?;
        write!(f, "Skipped in search:   {}", self.skipped_search_entries.len())
    }
}
