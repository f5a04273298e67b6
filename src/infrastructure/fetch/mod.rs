//! Fetch infrastructure - the cached retry loop

mod resilient;

pub use resilient::ResilientFetcher;
