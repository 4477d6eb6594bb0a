//! Constant product swap with a fee on the input (x·y=k)

use num_bigint::BigUint;
use num_traits::Zero;

use crate::domain::swap::{swap_fee, SwapParams};
use crate::shared::errors::QuoteError;
use crate::shared::utils::ceil_div;

/// Expected raw output of a constant-product trade.
///
/// ```text
/// fee         = ceil(swap * feeBps / 10000)
/// expectedRaw = to - ceil(from * to / (from + swap - fee))
/// ```
///
/// Every division rounds up so the pool never pays out more than the
/// contract would.
pub fn expected_raw_amount(params: &SwapParams) -> Result<BigUint, QuoteError> {
    if params.lp_from_raw.is_zero() || params.lp_to_raw.is_zero() {
        return Err(QuoteError::EmptyReserve);
    }
    let fee = swap_fee(&params.swap_raw, params.fee_basis_points)?;

    let k = &params.lp_from_raw * &params.lp_to_raw;
    let new_from = &params.lp_from_raw + &params.swap_raw - &fee;
    let new_to = ceil_div(&k, &new_from).ok_or(QuoteError::EmptyReserve)?;

    // new_from >= from, hence new_to <= to
    if new_to > params.lp_to_raw {
        return Err(QuoteError::InvalidSwapAmount(params.swap_raw.to_string()));
    }
    Ok(&params.lp_to_raw - new_to)
}
