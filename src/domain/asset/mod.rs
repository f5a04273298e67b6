//! Asset domain - the three payloads the map needs and their load errors

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use crate::domain::fetch::FetchError;

/// Which of the three payloads a load step is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetPhase {
    /// Attribute (risk) dataset
    Data,
    /// Region boundaries
    Adm1,
    /// Community boundaries
    Adm3,
}

impl AssetPhase {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::Adm1 => "geometries:adm1",
            Self::Adm3 => "geometries:adm3",
        }
    }
}

impl fmt::Display for AssetPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A load failure tagged with the phase it happened in
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The fetch itself failed; the kind is passed through unchanged
    #[error("[{phase}] {source}")]
    Fetch {
        phase: AssetPhase,
        #[source]
        source: FetchError,
    },

    /// The background task driving the fetch did not complete
    #[error("[{phase}] load task aborted: {message}")]
    Aborted { phase: AssetPhase, message: String },
}

impl LoadError {
    pub fn fetch(phase: AssetPhase, source: FetchError) -> Self {
        Self::Fetch { phase, source }
    }

    pub fn aborted(phase: AssetPhase, message: impl Into<String>) -> Self {
        Self::Aborted {
            phase,
            message: message.into(),
        }
    }

    pub fn phase(&self) -> AssetPhase {
        match self {
            Self::Fetch { phase, .. } | Self::Aborted { phase, .. } => *phase,
        }
    }

    pub fn fetch_error(&self) -> Option<&FetchError> {
        match self {
            Self::Fetch { source, .. } => Some(source),
            Self::Aborted { .. } => None,
        }
    }
}

/// Where the three payloads live
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    /// Prepended to every path; empty keeps the paths relative
    pub base_url: String,
    pub data_path: String,
    pub adm1_path: String,
    pub adm3_path: String,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            data_path: "assets/data/data.json".to_string(),
            adm1_path: "assets/data/adm1.json".to_string(),
            adm3_path: "assets/data/adm3.json".to_string(),
        }
    }
}

impl AssetPaths {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn path(&self, phase: AssetPhase) -> &str {
        match phase {
            AssetPhase::Data => &self.data_path,
            AssetPhase::Adm1 => &self.adm1_path,
            AssetPhase::Adm3 => &self.adm3_path,
        }
    }

    /// Full URL of a payload
    pub fn url(&self, phase: AssetPhase) -> String {
        let path = self.path(phase);
        let base = self.base_url.trim_end_matches('/');

        if base.is_empty() {
            path.to_string()
        } else {
            format!("{}/{}", base, path.trim_start_matches('/'))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fetch::FetchErrorKind;

    #[test]
    fn test_phase_labels() {
        assert_eq!(AssetPhase::Data.to_string(), "data");
        assert_eq!(AssetPhase::Adm1.to_string(), "geometries:adm1");
        assert_eq!(AssetPhase::Adm3.to_string(), "geometries:adm3");
    }

    #[test]
    fn test_relative_urls_by_default() {
        let paths = AssetPaths::default();
        assert_eq!(paths.url(AssetPhase::Data), "assets/data/data.json");
        assert_eq!(paths.url(AssetPhase::Adm3), "assets/data/adm3.json");
    }

    #[test]
    fn test_base_url_joining() {
        let paths = AssetPaths::default().with_base_url("https://example.org/map/");
        assert_eq!(
            paths.url(AssetPhase::Adm1),
            "https://example.org/map/assets/data/adm1.json"
        );

        let paths = AssetPaths {
            data_path: "/data.json".to_string(),
            ..AssetPaths::default().with_base_url("http://localhost:8000")
        };
        assert_eq!(paths.url(AssetPhase::Data), "http://localhost:8000/data.json");
    }

    #[test]
    fn test_load_error_keeps_kind() {
        let source = FetchError::new("assets/data/adm1.json", 3, FetchErrorKind::bad_response(503));
        let error = LoadError::fetch(AssetPhase::Adm1, source.clone());

        assert_eq!(error.phase(), AssetPhase::Adm1);
        assert_eq!(error.fetch_error(), Some(&source));
        assert!(error.to_string().starts_with("[geometries:adm1] Failed to load"));
    }
}
