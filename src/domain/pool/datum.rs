//! Decoded pool datum

use num_bigint::BigUint;

use crate::domain::asset::AssetClass;
use crate::domain::pool::identity::{pool_identity, PoolIdentity};
use crate::shared::types::Value;

/// The fields of an on-chain pool datum the engine needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolDatum {
    pub asset_a: AssetClass,
    pub asset_b: AssetClass,
    /// Protocol-retained value, not part of the swappable reserves
    pub treasury: Value,
}

impl PoolDatum {
    pub fn identity(&self) -> PoolIdentity {
        pool_identity(&self.asset_a, &self.asset_b)
    }

    pub fn treasury_of(&self, asset: &AssetClass) -> BigUint {
        self.treasury.quantity(&asset.to_unit())
    }
}
