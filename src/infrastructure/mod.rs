//! Infrastructure layer - transports, caches, stores and orchestration

pub mod cache;
pub mod fetch;
pub mod http;
pub mod loader;
pub mod logging;
