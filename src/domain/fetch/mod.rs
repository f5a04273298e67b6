//! Fetch domain - error taxonomy, transport seam and retry policy

mod error;
mod retry;
mod transport;

pub use error::{FetchError, FetchErrorKind};
pub use retry::RetryPolicy;
pub use transport::HttpTransport;

#[cfg(test)]
pub use transport::mock::MockTransport;
