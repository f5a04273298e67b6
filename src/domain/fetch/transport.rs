//! Transport seam for JSON retrieval

use async_trait::async_trait;

use super::error::FetchErrorKind;

/// Issues a single GET and parses the body as JSON
///
/// Implementations classify their own failures as `bad_response` or
/// `network`; timeouts are imposed by the caller.
#[async_trait]
pub trait HttpTransport: Send + Sync + std::fmt::Debug {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, FetchErrorKind>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::{HashMap, VecDeque};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Scripted transport: each URL answers from a queue of outcomes
    #[derive(Debug, Default)]
    pub struct MockTransport {
        scripts: Mutex<HashMap<String, VecDeque<Result<serde_json::Value, FetchErrorKind>>>>,
        delays: Mutex<HashMap<String, Duration>>,
        calls: Mutex<HashMap<String, usize>>,
        in_flight: Arc<AtomicUsize>,
    }

    /// Decrements the in-flight counter when a request future is dropped
    struct InFlightGuard(Arc<AtomicUsize>);

    impl Drop for InFlightGuard {
        fn drop(&mut self) {
            self.0.fetch_sub(1, Ordering::SeqCst);
        }
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_response(self, url: impl Into<String>, value: serde_json::Value) -> Self {
            self.push(url, Ok(value));
            self
        }

        pub fn with_error(self, url: impl Into<String>, kind: FetchErrorKind) -> Self {
            self.push(url, Err(kind));
            self
        }

        /// Delays every answer for the URL by the given duration
        pub fn with_delay(self, url: impl Into<String>, delay: Duration) -> Self {
            self.delays.lock().unwrap().insert(url.into(), delay);
            self
        }

        pub fn push(&self, url: impl Into<String>, outcome: Result<serde_json::Value, FetchErrorKind>) {
            self.scripts
                .lock()
                .unwrap()
                .entry(url.into())
                .or_default()
                .push_back(outcome);
        }

        pub fn calls(&self, url: &str) -> usize {
            self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
        }

        pub fn in_flight(&self) -> usize {
            self.in_flight.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl HttpTransport for MockTransport {
        async fn get_json(&self, url: &str) -> Result<serde_json::Value, FetchErrorKind> {
            *self.calls.lock().unwrap().entry(url.to_string()).or_default() += 1;

            self.in_flight.fetch_add(1, Ordering::SeqCst);
            let _guard = InFlightGuard(self.in_flight.clone());

            let delay = self.delays.lock().unwrap().get(url).copied();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            let outcome = self
                .scripts
                .lock()
                .unwrap()
                .get_mut(url)
                .and_then(|queue| queue.pop_front());

            outcome.unwrap_or_else(|| {
                Err(FetchErrorKind::network(format!("No mock response for {}", url)))
            })
        }
    }
}
