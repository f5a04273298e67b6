//! Single fetch attempt bounded by a timeout

use std::time::Duration;

use tracing::debug;

use crate::domain::fetch::{FetchError, FetchErrorKind, HttpTransport};

/// Races one request against a timer
///
/// Whichever branch loses is dropped when the select completes: an expired
/// timer drops the in-flight request (closing its connection), and an early
/// response drops the timer.
pub async fn fetch_with_timeout(
    transport: &dyn HttpTransport,
    url: &str,
    attempt: u32,
    timeout: Duration,
) -> Result<serde_json::Value, FetchError> {
    let outcome = tokio::select! {
        result = transport.get_json(url) => result,
        _ = tokio::time::sleep(timeout) => {
            debug!(url = %url, attempt, timeout_ms = timeout.as_millis() as u64, "Request aborted after timeout");
            Err(FetchErrorKind::Timeout)
        }
    };

    outcome.map_err(|kind| FetchError::new(url, attempt, kind))
}
