//! Deterministic fixed-point arithmetic for prices, fees and trade amounts.
//!
//! Every helper works on `u64` base units with a `u128` intermediate, so a
//! product of two `u64` values never overflows; only a quotient that does not
//! fit back into `u64` is reported as [`EngineError::ArithmeticOverflow`].
//!
//! Rounding always favours the pool: [`mul_div`] floors (used for amounts
//! paid out), [`mul_div_ceil`] rounds up (used for amounts paid in).

use super::money::BPS_DENOMINATOR;
use crate::error::EngineError;

/// `floor(a * b / c)`.
///
/// # Errors
///
/// `DivisionByZero` when `c == 0`, `ArithmeticOverflow` when the quotient does
/// not fit in `u64`.
pub fn mul_div(a: u64, b: u64, c: u64) -> Result<u64, EngineError> {
    if c == 0 {
        return Err(EngineError::DivisionByZero);
    }
    let quotient = u128::from(a) * u128::from(b) / u128::from(c);
    u64::try_from(quotient).map_err(|_| EngineError::ArithmeticOverflow)
}

/// `ceil(a * b / c)`.
///
/// # Errors
///
/// Same as [`mul_div`].
pub fn mul_div_ceil(a: u64, b: u64, c: u64) -> Result<u64, EngineError> {
    if c == 0 {
        return Err(EngineError::DivisionByZero);
    }
    let numerator = u128::from(a) * u128::from(b);
    let divisor = u128::from(c);
    let quotient = numerator.div_ceil(divisor);
    u64::try_from(quotient).map_err(|_| EngineError::ArithmeticOverflow)
}

/// `floor(amount * bps / 10000)`.
///
/// # Errors
///
/// `ArithmeticOverflow` if `bps` is large enough to push the result past
/// `u64::MAX`.
pub fn percentage_of(amount: u64, bps: u64) -> Result<u64, EngineError> {
    mul_div(amount, bps, BPS_DENOMINATOR)
}

pub fn checked_add(a: u64, b: u64) -> Result<u64, EngineError> {
    a.checked_add(b).ok_or(EngineError::ArithmeticOverflow)
}

pub fn checked_sub(a: u64, b: u64) -> Result<u64, EngineError> {
    a.checked_sub(b).ok_or(EngineError::ArithmeticOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_div_floors() {
        assert_eq!(mul_div(10, 10, 3).unwrap(), 33);
        assert_eq!(mul_div(7, 1, 2).unwrap(), 3);
        assert_eq!(mul_div(0, 5, 7).unwrap(), 0);
    }

    #[test]
    fn mul_div_ceil_rounds_up_only_on_remainder() {
        assert_eq!(mul_div_ceil(10, 10, 3).unwrap(), 34);
        assert_eq!(mul_div_ceil(9, 10, 3).unwrap(), 30);
        assert_eq!(mul_div_ceil(0, 10, 3).unwrap(), 0);
    }

    #[test]
    fn mul_div_uses_wide_intermediate() {
        // u64::MAX * u64::MAX overflows u64 but the quotient fits.
        assert_eq!(mul_div(u64::MAX, u64::MAX, u64::MAX).unwrap(), u64::MAX);
        assert_eq!(mul_div(u64::MAX, 4, 8).unwrap(), u64::MAX / 2);
    }

    #[test]
    fn mul_div_reports_overflowing_quotient() {
        assert_eq!(mul_div(u64::MAX, 2, 1), Err(EngineError::ArithmeticOverflow));
        assert_eq!(
            mul_div_ceil(u64::MAX, 3, 2),
            Err(EngineError::ArithmeticOverflow)
        );
    }

    #[test]
    fn zero_denominator_is_division_by_zero() {
        assert_eq!(mul_div(1, 1, 0), Err(EngineError::DivisionByZero));
        assert_eq!(mul_div_ceil(1, 1, 0), Err(EngineError::DivisionByZero));
    }

    #[test]
    fn percentage_of_basis_points() {
        // 0.1% of $100 is $0.10
        assert_eq!(percentage_of(100_000_000, 10).unwrap(), 100_000);
        assert_eq!(percentage_of(999, 10).unwrap(), 0);
        assert_eq!(percentage_of(12_345, 10_000).unwrap(), 12_345);
    }

    #[test]
    fn checked_helpers() {
        assert_eq!(checked_add(u64::MAX, 1), Err(EngineError::ArithmeticOverflow));
        assert_eq!(checked_sub(0, 1), Err(EngineError::ArithmeticOverflow));
        assert_eq!(checked_add(2, 3).unwrap(), 5);
    }
}
