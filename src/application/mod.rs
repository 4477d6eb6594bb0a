//! Application layer - discovery and pool queries

pub mod discovery;
pub mod services;

pub use discovery::{DiscoveryOptions, PoolDiscovery};
pub use services::PoolService;
