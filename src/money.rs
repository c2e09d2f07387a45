//! Monetary rounding and whole-share arithmetic
//!
//! All cent quantization in the engine goes through [`round2`] so the
//! rounding convention (half away from zero) is uniform. Share counts are
//! whole units; the direction of the final rounding step is always an
//! explicit [`ShareRounding`] at the call site, never implicit state.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{SimError, SimResult};

/// Round to the nearest cent, half away from zero.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Direction to round a fractional share count to a whole number of shares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareRounding {
    /// Round down: invest at most `amount` (buying).
    Floor,
    /// Round up: raise at least `amount` (selling to cover a shortfall).
    Ceiling,
}

/// Number of whole shares corresponding to `amount` at `price`.
///
/// `Floor` answers "how many shares can `amount` buy", `Ceiling` answers
/// "how many shares must be sold to raise `amount`".
pub fn shares_for_amount(
    amount: Decimal,
    price: Decimal,
    rounding: ShareRounding,
) -> SimResult<u64> {
    if amount < Decimal::ZERO || price <= Decimal::ZERO {
        return Err(SimError::ShareCount { amount, price });
    }
    let fractional = amount / price;
    let whole = match rounding {
        ShareRounding::Floor => fractional.floor(),
        ShareRounding::Ceiling => fractional.ceil(),
    };
    whole.to_u64().ok_or(SimError::ShareCount { amount, price })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round2_half_away_from_zero() {
        assert_eq!(round2(dec!(2.675)), dec!(2.68));
        assert_eq!(round2(dec!(2.674)), dec!(2.67));
        assert_eq!(round2(dec!(-2.675)), dec!(-2.68));
        assert_eq!(round2(dec!(0.005)), dec!(0.01));
        assert_eq!(round2(dec!(100)), dec!(100));
    }

    #[test]
    fn test_shares_floor_and_ceiling() {
        assert_eq!(
            shares_for_amount(dec!(1000), dec!(100), ShareRounding::Floor).unwrap(),
            10
        );
        assert_eq!(
            shares_for_amount(dec!(1050), dec!(100), ShareRounding::Floor).unwrap(),
            10
        );
        assert_eq!(
            shares_for_amount(dec!(1050), dec!(100), ShareRounding::Ceiling).unwrap(),
            11
        );
        assert_eq!(
            shares_for_amount(dec!(0), dec!(100), ShareRounding::Ceiling).unwrap(),
            0
        );
    }

    #[test]
    fn test_shares_rejects_bad_inputs() {
        assert!(shares_for_amount(dec!(-1), dec!(100), ShareRounding::Floor).is_err());
        assert!(shares_for_amount(dec!(100), dec!(0), ShareRounding::Floor).is_err());
    }
}
