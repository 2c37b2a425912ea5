//! Collateral and share units.
//!
//! Both collateral and shares are counted in integer base units with six
//! decimal places, so `UNIT` base units of collateral are one whole unit of
//! currency and `UNIT` base units of shares pay out exactly that on a win.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::error::EngineError;

/// Decimal places of the collateral currency.
pub const DECIMALS: u32 = 6;

/// Base units in one whole collateral unit (and one whole share).
pub const UNIT: u64 = 1_000_000;

/// Basis points in 100%.
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Convert base units to a decimal amount for display.
#[must_use]
pub fn to_decimal(base_units: u64) -> Decimal {
    Decimal::from_i128_with_scale(i128::from(base_units), DECIMALS)
}

/// Convert a decimal amount to base units, truncating sub-unit digits.
///
/// # Errors
///
/// `InvalidAmount` for negative amounts or amounts that do not fit in `u64`.
pub fn from_decimal(amount: Decimal) -> Result<u64, EngineError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(EngineError::invalid_amount(format!("{amount} is negative")));
    }
    amount
        .checked_mul(Decimal::from(UNIT))
        .and_then(|scaled| scaled.trunc().to_u64())
        .ok_or_else(|| EngineError::invalid_amount(format!("{amount} is out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn to_decimal_scales_by_six_places() {
        assert_eq!(to_decimal(UNIT), dec!(1));
        assert_eq!(to_decimal(100_000), dec!(0.1));
        assert_eq!(to_decimal(u64::MAX), dec!(18446744073709.551615));
    }

    #[test]
    fn from_decimal_truncates_extra_places() {
        assert_eq!(from_decimal(dec!(1.5)).unwrap(), 1_500_000);
        assert_eq!(from_decimal(dec!(0.0000019)).unwrap(), 1);
        assert!(from_decimal(dec!(-1)).is_err());
    }
}
