//! Fetch error taxonomy

use thiserror::Error;

/// Why a single fetch attempt failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchErrorKind {
    /// No response arrived within the configured wait
    #[error("request timed out")]
    Timeout,

    /// A response arrived but its status code indicates failure
    #[error("unexpected HTTP status {status}")]
    BadResponse { status: u16 },

    /// Any other transport failure, including unparseable bodies
    #[error("network failure: {cause}")]
    Network { cause: String },
}

impl FetchErrorKind {
    pub fn bad_response(status: u16) -> Self {
        Self::BadResponse { status }
    }

    pub fn network(cause: impl Into<String>) -> Self {
        Self::Network {
            cause: cause.into(),
        }
    }

    /// Stable machine-readable name, used as a structured log field
    pub fn name(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::BadResponse { .. } => "bad_response",
            Self::Network { .. } => "network",
        }
    }
}

/// A failed fetch, carrying the URL and the attempt it happened on
///
/// Cloneable so the failure cache can hand the same error to every later
/// caller of the same URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to load {url} (attempt {attempt}): {kind}")]
pub struct FetchError {
    pub url: String,
    pub attempt: u32,
    pub kind: FetchErrorKind,
}

impl FetchError {
    pub fn new(url: impl Into<String>, attempt: u32, kind: FetchErrorKind) -> Self {
        Self {
            url: url.into(),
            attempt,
            kind,
        }
    }

    pub fn timeout(url: impl Into<String>, attempt: u32) -> Self {
        Self::new(url, attempt, FetchErrorKind::Timeout)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self.kind, FetchErrorKind::Timeout)
    }

    /// HTTP status code, for `bad_response` failures
    pub fn status(&self) -> Option<u16> {
        match self.kind {
            FetchErrorKind::BadResponse { status } => Some(status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_response_display() {
        let error = FetchError::new(
            "assets/data/data.json",
            3,
            FetchErrorKind::bad_response(500),
        );

        assert_eq!(
            error.to_string(),
            "Failed to load assets/data/data.json (attempt 3): unexpected HTTP status 500"
        );
        assert_eq!(error.status(), Some(500));
        assert!(!error.is_timeout());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(FetchErrorKind::Timeout.name(), "timeout");
        assert_eq!(FetchErrorKind::bad_response(404).name(), "bad_response");
        assert_eq!(FetchErrorKind::network("reset").name(), "network");
    }

    #[test]
    fn test_timeout_has_no_status() {
        let error = FetchError::timeout("assets/data/adm3.json", 1);
        assert!(error.is_timeout());
        assert_eq!(error.status(), None);
    }
}
