//! Search entries extracted from community geometries

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use super::dataset::RiskDataset;

/// A community the search box can match on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchEntry {
    pub id: String,
    pub code: String,
    pub name: String,
}

/// Entries ready for indexing plus the features that had to be skipped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchEntries {
    pub entries: Vec<SearchEntry>,
    pub skipped: BTreeSet<String>,
    /// Features without a usable `properties.id`
    pub unidentified: usize,
}

/// Reads `properties.id` of a GeoJSON feature as a string
pub fn feature_id(feature: &Value) -> Option<String> {
    match feature.get("properties")?.get("id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Features of a GeoJSON `FeatureCollection`, empty for anything else
pub fn features(collection: &Value) -> &[Value] {
    collection
        .get("features")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Builds search entries for every community feature with a complete record
pub fn extract_search_entries(adm3: &Value, dataset: &mut RiskDataset) -> SearchEntries {
    let mut result = SearchEntries::default();

    for feature in features(adm3) {
        let Some(id) = feature_id(feature) else {
            result.unidentified += 1;
            continue;
        };

        let entry = dataset.feature_data(&id).and_then(|record| {
            Some(SearchEntry {
                id: id.clone(),
                code: record.code.clone()?,
                name: record.name.clone()?,
            })
        });

        match entry {
            Some(entry) => result.entries.push(entry),
            None => {
                if result.skipped.insert(id.clone()) {
                    warn!(feature_id = %id, "Search entry missing or incomplete");
                }
            }
        }
    }

    info!(
        entries = result.entries.len(),
        skipped = result.skipped.len(),
        "Search entries prepared"
    );

    result
}
