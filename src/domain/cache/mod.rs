//! Cache domain - persistent keys, version stamps and the durable store seam

mod key;
mod store;

pub use key::{CacheVersion, PersistentKeys, DEFAULT_CACHE_VERSION_DATE, DEFAULT_KEY_PREFIX};
pub use store::{DurableStore, PROBE_KEY};

#[cfg(test)]
pub use store::MockDurableStore;
