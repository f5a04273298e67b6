//! Attribute dataset keyed by community feature id

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use super::level::RiskLevel;
use crate::domain::DomainError;

/// One community's attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommunityRecord {
    pub code: Option<String>,
    pub name: Option<String>,
    pub risk: Option<String>,
}

impl CommunityRecord {
    /// Reads a record, accepting numeric codes as well as strings
    pub fn from_value(value: &Value) -> Self {
        Self {
            code: scalar_field(value, "code"),
            name: scalar_field(value, "name"),
            risk: scalar_field(value, "risk"),
        }
    }

    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::resolve(self.risk.as_deref())
    }

    /// Searchable records carry both a code and a name
    pub fn is_searchable(&self) -> bool {
        self.code.is_some() && self.name.is_some()
    }
}

fn scalar_field(value: &Value, field: &str) -> Option<String> {
    match value.get(field)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Attribute records plus the ids that were asked for but are absent
#[derive(Debug, Clone, Default)]
pub struct RiskDataset {
    records: HashMap<String, CommunityRecord>,
    missing: BTreeSet<String>,
}

impl RiskDataset {
    /// Parses an `{"<id>": {...}}` payload
    pub fn from_value(value: &Value) -> Result<Self, DomainError> {
        let object = value.as_object().ok_or_else(|| {
            DomainError::validation("Attribute payload must be a JSON object keyed by feature id")
        })?;

        let records = object
            .iter()
            .map(|(id, record)| (id.clone(), CommunityRecord::from_value(record)))
            .collect();

        Ok(Self {
            records,
            missing: BTreeSet::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Looks up a record without tracking misses
    pub fn get(&self, id: &str) -> Option<&CommunityRecord> {
        self.records.get(id)
    }

    /// Looks up the record for a map feature, remembering absent ids
    ///
    /// Each absent id is logged once; empty ids are ignored.
    pub fn feature_data(&mut self, id: &str) -> Option<&CommunityRecord> {
        if !self.records.contains_key(id) {
            if !id.is_empty() && self.missing.insert(id.to_string()) {
                warn!(feature_id = %id, "No attribute data for community");
            }
            return None;
        }

        self.records.get(id)
    }

    /// Risk level of a feature, `None` when it has no record
    pub fn risk_level(&mut self, id: &str) -> Option<RiskLevel> {
        self.feature_data(id).map(CommunityRecord::risk_level)
    }

    pub fn missing_ids(&self) -> &BTreeSet<String> {
        &self.missing
    }
}
