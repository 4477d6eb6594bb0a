//! utxo-pools - UTxO AMM pool state and swap quotes
//! Constant product and stableswap pools, reconciled from raw ledger outputs

pub mod domain;
pub mod infrastructure;
pub mod application;
pub mod shared;

// Re-export main types for convenience
pub use application::discovery::{DiscoveryOptions, PoolDiscovery};
pub use application::services::PoolService;
pub use domain::asset::AssetClass;
pub use domain::pool::{PoolAddressIndex, PoolConstants, PoolIdentity, PoolState, PoolType, ReserveReconciler};
pub use domain::swap::{expected_raw_swap_amount, SwapParams, SwapQuote};
pub use shared::errors::AppError;
