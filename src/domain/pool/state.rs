//! Pool types, venue constants and the reconciled pool state

use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::shared::errors::QuoteError;

/// Policy of the constant-product LP tokens
pub const LIQUIDITY_POLICY_ID: &str = "026a18d04a0c642759bb3d83b12e3344894e5c1c7b2aeb1a2113a570";

/// Asset name of the pool validity token (`L`)
pub const VALIDITY_ASSET_NAME_HEX: &str = "4c";

/// Native currency the contract keeps locked in every pool UTxO
pub const LIQUIDITY_POOL_MIN_ADA: u64 = 3_000_000;

/// LP supply is held as `INT_MAX_64 - issued`
pub const INT_MAX_64: u64 = i64::MAX as u64;

pub const SWAP_FEE_IN_BASIS: u32 = 35;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolType {
    ConstantProduct,
    Stableswap,
}

impl PoolType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PoolType::ConstantProduct => "constant_product",
            PoolType::Stableswap => "stableswap",
        }
    }
}

impl fmt::Display for PoolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PoolType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "constant_product" | "constantproduct" | "cp" => Ok(PoolType::ConstantProduct),
            "stableswap" | "stable" => Ok(PoolType::Stableswap),
            _ => Err(anyhow::anyhow!("Unknown pool type: {}", s)),
        }
    }
}

/// What to do when more than one UTxO at a pool address validates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidatePolicy {
    /// Fail with `MultiplePoolCandidates`
    #[default]
    Strict,
    /// Keep the last validated candidate
    LastWins,
}

/// Per-venue constants. Everything here is configuration, not behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolConstants {
    pub pool_type: PoolType,
    /// Policy id (hex) the LP tokens are minted under
    pub lp_policy_id: String,
    /// Unit of the token marking a live pool UTxO
    pub validity_asset: String,
    pub min_deposit: BigUint,
    pub swap_fee_bps: u32,
    /// Stableswap amplification coefficient `A`
    pub amplification: Option<BigDecimal>,
    pub lp_supply_ceiling: BigUint,
    pub candidate_policy: CandidatePolicy,
}

impl PoolConstants {
    /// Constants of the live constant-product venue
    pub fn constant_product() -> Self {
        Self {
            pool_type: PoolType::ConstantProduct,
            lp_policy_id: LIQUIDITY_POLICY_ID.to_string(),
            validity_asset: format!("{}{}", LIQUIDITY_POLICY_ID, VALIDITY_ASSET_NAME_HEX),
            min_deposit: BigUint::from(LIQUIDITY_POOL_MIN_ADA),
            swap_fee_bps: SWAP_FEE_IN_BASIS,
            amplification: None,
            lp_supply_ceiling: BigUint::from(INT_MAX_64),
            candidate_policy: CandidatePolicy::Strict,
        }
    }

    /// Stableswap venue under `lp_policy_id` with amplification `a`
    pub fn stableswap(lp_policy_id: &str, amplification: BigDecimal) -> Self {
        Self {
            pool_type: PoolType::Stableswap,
            lp_policy_id: lp_policy_id.to_string(),
            validity_asset: format!("{}{}", lp_policy_id, VALIDITY_ASSET_NAME_HEX),
            amplification: Some(amplification),
            ..Self::constant_product()
        }
    }

    /// LP token unit of the pool with the given identity hex
    pub fn lp_unit(&self, identity_hex: &str) -> String {
        format!("{}{}", self.lp_policy_id, identity_hex)
    }

    pub fn amplification(&self) -> Result<&BigDecimal, QuoteError> {
        self.amplification.as_ref().ok_or(QuoteError::MissingAmplification)
    }
}

/// Verified reserve snapshot of one pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolState {
    pub address: String,
    pub unit_a: String,
    pub unit_b: String,
    pub unit_lp: String,
    pub quantity_a: BigUint,
    pub quantity_b: BigUint,
    pub issued_lp_tokens: BigUint,
}

impl PoolState {
    /// Reserves oriented for a swap from `unit_from`: `(from, to)`
    pub fn oriented_reserves(&self, unit_from: &str) -> (&BigUint, &BigUint) {
        if unit_from == self.unit_a {
            (&self.quantity_a, &self.quantity_b)
        } else {
            (&self.quantity_b, &self.quantity_a)
        }
    }
}
