//! Cache infrastructure - in-memory fetch cache, persistent cache and stores

mod factory;
mod fetch_cache;
mod file;
mod in_memory;
mod persistent;
mod redis;

pub use factory::{PersistentCacheConfig, StoreBackend, StoreFactory};
pub use fetch_cache::{FetchCache, FetchCacheConfig};
pub use file::FileStore;
pub use in_memory::InMemoryStore;
pub use persistent::PersistentCache;
pub use redis::{RedisStore, RedisStoreConfig};
