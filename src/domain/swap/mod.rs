//! Swap domain - quote engines for the supported invariant families

pub mod constant_product;
pub mod stableswap;

use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::domain::pool::{PoolConstants, PoolType};
use crate::shared::errors::QuoteError;
use crate::shared::utils::ceil_div;

pub const BPS_SCALE: u32 = 10_000;

/// Raw, oriented inputs of one trade
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapParams {
    pub lp_from_raw: BigUint,
    pub lp_to_raw: BigUint,
    pub swap_raw: BigUint,
    pub fee_basis_points: u32,
}

impl SwapParams {
    pub fn new(
        lp_from_raw: impl Into<BigUint>,
        lp_to_raw: impl Into<BigUint>,
        swap_raw: impl Into<BigUint>,
        fee_basis_points: u32,
    ) -> Self {
        Self {
            lp_from_raw: lp_from_raw.into(),
            lp_to_raw: lp_to_raw.into(),
            swap_raw: swap_raw.into(),
            fee_basis_points,
        }
    }
}

/// Result of a quote. Raw amounts are decimal strings of on-chain integers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapQuote {
    pub swap_raw_amount: String,
    pub expected_raw_amount: String,
    /// `expected_raw_amount` scaled by the target decimals
    pub expected_amount: f64,
}

/// `ceil(swap * fee_bps / 10000)`, rounded in the protocol's favor
pub fn swap_fee(swap_raw: &BigUint, fee_basis_points: u32) -> Result<BigUint, QuoteError> {
    if fee_basis_points > BPS_SCALE {
        return Err(QuoteError::InvalidFee(fee_basis_points));
    }
    let scaled = swap_raw * BigUint::from(fee_basis_points);
    // BPS_SCALE is non-zero
    Ok(ceil_div(&scaled, &BigUint::from(BPS_SCALE)).unwrap_or_default())
}

/// Route a trade to the engine matching the pool type
pub fn expected_raw_swap_amount(constants: &PoolConstants, params: &SwapParams) -> Result<BigUint, QuoteError> {
    if params.swap_raw.is_zero() {
        return Err(QuoteError::NonPositiveSwapAmount);
    }
    match constants.pool_type {
        PoolType::ConstantProduct => constant_product::expected_raw_amount(params),
        PoolType::Stableswap => stableswap::expected_raw_amount(params, constants.amplification()?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::swap::stableswap::parse_amplification;

    #[test]
    fn test_swap_fee_rounds_up() {
        assert_eq!(swap_fee(&BigUint::from(10_000_000u64), 35).unwrap(), BigUint::from(35_000u32));
        assert_eq!(swap_fee(&BigUint::from(1u32), 35).unwrap(), BigUint::from(1u32));
        assert_eq!(swap_fee(&BigUint::from(1u32), 0).unwrap(), BigUint::zero());
        assert_eq!(swap_fee(&BigUint::from(1u32), 10_001), Err(QuoteError::InvalidFee(10_001)));
    }

    #[test]
    fn test_dispatch_by_pool_type() {
        let params = SwapParams::new(1_000_000_000u64, 1_200_000_000u64, 10_000_000u64, 35);

        let cp = PoolConstants::constant_product();
        assert_eq!(
            expected_raw_swap_amount(&cp, &params).unwrap(),
            constant_product::expected_raw_amount(&params).unwrap()
        );

        let sts = PoolConstants::stableswap(
            "980e8c567670d34d4ec13a0c3b6de6199f260ae5dc9dc9e867bc5c93",
            parse_amplification("100").unwrap(),
        );
        assert_eq!(expected_raw_swap_amount(&sts, &params).unwrap(), BigUint::from(9_973_697u64));

        let mut missing = sts.clone();
        missing.amplification = None;
        assert_eq!(
            expected_raw_swap_amount(&missing, &params),
            Err(QuoteError::MissingAmplification)
        );
    }

    #[test]
    fn test_zero_swap_is_rejected() {
        let params = SwapParams::new(1_000u64, 1_000u64, 0u64, 35);
        assert_eq!(
            expected_raw_swap_amount(&PoolConstants::constant_product(), &params),
            Err(QuoteError::NonPositiveSwapAmount)
        );
    }
}
