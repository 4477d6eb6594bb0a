//! Pool domain - identities, discovery index and reserve snapshots

pub mod address_index;
pub mod datum;
pub mod identity;
pub mod reserves;
pub mod state;

pub use address_index::{PoolAddressEntry, PoolAddressIndex};
pub use datum::PoolDatum;
pub use identity::{asset_hash, pool_identity, pool_identity_for_units, PoolIdentity};
pub use reserves::{CandidateDatum, PoolCandidate, ReserveReconciler, SkipReason};
pub use state::{CandidatePolicy, PoolConstants, PoolState, PoolType};
