//! Utility functions and helpers

use bigdecimal::{BigDecimal, RoundingMode};
use num_bigint::{BigInt, BigUint};
use num_traits::{One, ToPrimitive, Zero};

/// Ceiling division; `None` for a zero divisor.
pub fn ceil_div(numerator: &BigUint, denominator: &BigUint) -> Option<BigUint> {
    if denominator.is_zero() {
        return None;
    }
    let quotient = numerator / denominator;
    if (&quotient * denominator) == *numerator {
        Some(quotient)
    } else {
        Some(quotient + BigUint::one())
    }
}

/// Round toward negative infinity to an integral decimal
pub fn floor(value: &BigDecimal) -> BigDecimal {
    // with_scale truncates toward zero
    let truncated = value.with_scale(0);
    if *value < BigDecimal::zero() && truncated != *value {
        truncated - BigDecimal::one()
    } else {
        truncated
    }
}

/// Round toward positive infinity to an integral decimal
pub fn ceil(value: &BigDecimal) -> BigDecimal {
    -floor(&-value.clone())
}

pub fn to_decimal(value: &BigUint) -> BigDecimal {
    BigDecimal::new(BigInt::from(value.clone()), 0)
}

/// Integral, non-negative decimal back to an unsigned integer
pub fn to_biguint(value: &BigDecimal) -> Option<BigUint> {
    if *value < BigDecimal::zero() || floor(value) != *value {
        return None;
    }
    let (digits, scale) = value.with_scale(0).into_bigint_and_exponent();
    debug_assert_eq!(scale, 0);
    digits.to_biguint()
}

/// `10^exponent` as a decimal
pub fn pow10(exponent: u32) -> BigDecimal {
    BigDecimal::new(BigInt::from(10u32).pow(exponent), 0)
}

/// Decimal token amount to its raw integer, `amount * 10^decimals` rounded half-up.
/// `None` for negative amounts.
pub fn to_raw_amount(amount: &BigDecimal, decimals: u8) -> Option<BigUint> {
    let scaled = amount * pow10(decimals as u32);
    to_biguint(&scaled.with_scale_round(0, RoundingMode::HalfUp))
}

/// Raw integer amount scaled down by `decimals`
pub fn from_raw_amount(raw: &BigUint, decimals: u8) -> f64 {
    (to_decimal(raw) / pow10(decimals as u32)).to_f64().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_ceil_div() {
        let ten = BigUint::from(10u32);
        assert_eq!(ceil_div(&ten, &BigUint::from(3u32)), Some(BigUint::from(4u32)));
        assert_eq!(ceil_div(&ten, &BigUint::from(5u32)), Some(BigUint::from(2u32)));
        assert_eq!(ceil_div(&BigUint::zero(), &ten), Some(BigUint::zero()));
        assert_eq!(ceil_div(&ten, &BigUint::zero()), None);
    }

    #[test]
    fn test_floor_and_ceil() {
        let value = BigDecimal::from_str("11.89").unwrap();
        assert_eq!(floor(&value), BigDecimal::from(11));
        assert_eq!(ceil(&value), BigDecimal::from(12));

        let negative = BigDecimal::from_str("-2.5").unwrap();
        assert_eq!(floor(&negative), BigDecimal::from(-3));
        assert_eq!(ceil(&negative), BigDecimal::from(-2));

        let integral = BigDecimal::from(7);
        assert_eq!(floor(&integral), integral);
        assert_eq!(ceil(&integral), integral);
    }

    #[test]
    fn test_to_biguint() {
        assert_eq!(to_biguint(&BigDecimal::from(42)), Some(BigUint::from(42u32)));
        assert_eq!(to_biguint(&BigDecimal::from(-1)), None);
        assert_eq!(to_biguint(&BigDecimal::from_str("1.5").unwrap()), None);
    }

    #[test]
    fn test_raw_amount_conversion() {
        let amount = BigDecimal::from_str("10.5").unwrap();
        assert_eq!(to_raw_amount(&amount, 6), Some(BigUint::from(10_500_000u32)));
        assert_eq!(to_raw_amount(&BigDecimal::from_str("0.0000005").unwrap(), 6), Some(BigUint::one()));
        assert_eq!(to_raw_amount(&BigDecimal::from_str("0.0000004").unwrap(), 6), Some(BigUint::zero()));
        assert_eq!(to_raw_amount(&BigDecimal::from_str("2.5").unwrap(), 0), Some(BigUint::from(3u32)));
        assert_eq!(to_raw_amount(&BigDecimal::from(-1), 6), None);

        assert!((from_raw_amount(&BigUint::from(19_733_357u64), 6) - 19.733357).abs() < 1e-9);
        assert!((from_raw_amount(&BigUint::from(42u32), 0) - 42.0).abs() < 1e-9);
    }
}
