//! HTTP infrastructure - reqwest transport and the timeout race

mod client;
mod timeout;

pub use client::ReqwestTransport;
pub use timeout::fetch_with_timeout;
