//! Quantity arithmetic.
//!
//! Quantities are unsigned integers in base units. Human-facing amounts
//! (config files, log lines) are whole-token [`Decimal`]s with up to
//! [`DECIMALS`] fractional digits.

use rust_decimal::{Decimal, prelude::ToPrimitive};

use crate::{
    CliffvestError, Result,
    constants::{DECIMALS, UNITS_PER_TOKEN},
};

/// An amount of the fungible unit, in base units.
pub type Quantity = u128;

/// Convert a whole-token decimal amount to base units.
///
/// # Errors
/// - `Configuration` if the amount is negative or has more than
///   [`DECIMALS`] fractional digits
/// - `ArithmeticOverflow` if the result does not fit a [`Quantity`]
pub fn tokens_to_units(tokens: Decimal) -> Result<Quantity> {
    if tokens.is_sign_negative() && !tokens.is_zero() {
        return Err(CliffvestError::Configuration(format!(
            "negative token amount {tokens}"
        )));
    }
    let tokens = tokens.normalize();
    if tokens.scale() > DECIMALS {
        return Err(CliffvestError::Configuration(format!(
            "token amount {tokens} has more than {DECIMALS} decimal places"
        )));
    }

    let whole = tokens
        .trunc()
        .to_u128()
        .ok_or(CliffvestError::ArithmeticOverflow)?;
    let fract = tokens.fract();
    let fract_units = u128::try_from(fract.mantissa())
        .map_err(|_| CliffvestError::ArithmeticOverflow)?
        .checked_mul(10u128.pow(DECIMALS - fract.scale()))
        .ok_or(CliffvestError::ArithmeticOverflow)?;

    whole
        .checked_mul(UNITS_PER_TOKEN)
        .and_then(|units| units.checked_add(fract_units))
        .ok_or(CliffvestError::ArithmeticOverflow)
}

/// Convert base units to a whole-token decimal (for display).
///
/// # Errors
/// Returns `ArithmeticOverflow` if `units` exceeds what [`Decimal`] can hold.
pub fn units_to_tokens(units: Quantity) -> Result<Decimal> {
    let mantissa = i128::try_from(units).map_err(|_| CliffvestError::ArithmeticOverflow)?;
    Decimal::try_from_i128_with_scale(mantissa, DECIMALS)
        .map(|d| d.normalize())
        .map_err(|_| CliffvestError::ArithmeticOverflow)
}

/// Sum quantities, failing on overflow.
///
/// # Errors
/// Returns `ArithmeticOverflow` if the running total exceeds `u128::MAX`.
pub fn checked_sum<I>(amounts: I) -> Result<Quantity>
where
    I: IntoIterator<Item = Quantity>,
{
    amounts
        .into_iter()
        .try_fold(0u128, Quantity::checked_add)
        .ok_or(CliffvestError::ArithmeticOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{TOTAL_SUPPLY, TOTAL_SUPPLY_TOKENS};

    #[test]
    fn whole_tokens_scale_by_decimals() {
        assert_eq!(
            tokens_to_units(Decimal::new(10, 0)).unwrap(),
            10 * UNITS_PER_TOKEN
        );
    }

    #[test]
    fn fractional_tokens_convert_exactly() {
        // 1.5 tokens
        assert_eq!(
            tokens_to_units(Decimal::new(15, 1)).unwrap(),
            UNITS_PER_TOKEN + UNITS_PER_TOKEN / 2
        );
        // one base unit
        assert_eq!(tokens_to_units(Decimal::new(1, 18)).unwrap(), 1);
    }

    #[test]
    fn trailing_zeros_beyond_decimals_are_accepted() {
        // 1.000...0 with 20 fractional zeros normalizes to 1.
        let d = Decimal::from_i128_with_scale(100_000_000_000_000_000_000, 20);
        assert_eq!(tokens_to_units(d).unwrap(), UNITS_PER_TOKEN);
    }

    #[test]
    fn too_many_decimals_rejected() {
        let err = tokens_to_units(Decimal::new(1, 19)).unwrap_err();
        assert!(matches!(err, CliffvestError::Configuration(_)));
    }

    #[test]
    fn negative_rejected() {
        let err = tokens_to_units(Decimal::new(-1, 0)).unwrap_err();
        assert!(matches!(err, CliffvestError::Configuration(_)));
    }

    #[test]
    fn total_supply_roundtrips_through_decimal() {
        let tokens = units_to_tokens(TOTAL_SUPPLY).unwrap();
        assert_eq!(tokens, Decimal::new(12_500_000_000, 0));
        assert_eq!(TOTAL_SUPPLY_TOKENS, 12_500_000_000);
        assert_eq!(tokens_to_units(tokens).unwrap(), TOTAL_SUPPLY);
    }

    #[test]
    fn units_to_tokens_overflow() {
        assert!(units_to_tokens(u128::MAX).is_err());
    }

    #[test]
    fn checked_sum_detects_overflow() {
        assert_eq!(checked_sum([1, 2, 3]).unwrap(), 6);
        assert_eq!(checked_sum(std::iter::empty()).unwrap(), 0);
        assert!(matches!(
            checked_sum([u128::MAX, 1]),
            Err(CliffvestError::ArithmeticOverflow)
        ));
    }
}
