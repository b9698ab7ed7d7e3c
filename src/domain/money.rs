//! Monetary types for odds and stake representation.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal odds: gross payout multiple per unit staked.
pub type Odds = Decimal;

/// Stake, profit and payout amounts, in the caller's budget unit.
pub type Amount = Decimal;

/// Round to two decimal places, halves away from zero.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert a float to a decimal, rejecting NaN and infinities.
pub fn finite_decimal(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64(value)
}

/// Convert a float to a decimal, saturating finite values outside the
/// decimal range. NaN and infinities are rejected.
pub fn saturating_decimal(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    let saturated = if value.abs() < 1.0 {
        Decimal::ZERO
    } else if value > 0.0 {
        Decimal::MAX
    } else {
        Decimal::MIN
    };
    Some(Decimal::from_f64(value).unwrap_or(saturated))
}

/// Odds that can contribute to an arbitrage: strictly above 1.
pub fn is_usable_odds(odds: Odds) -> bool {
    odds > Decimal::ONE
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn round2_rounds_halves_away_from_zero() {
        assert_eq!(round2(dec!(1.005)), dec!(1.01));
        assert_eq!(round2(dec!(49.994)), dec!(49.99));
        assert_eq!(round2(dec!(-0.125)), dec!(-0.13));
    }

    #[test]
    fn finite_decimal_rejects_non_finite() {
        assert_eq!(finite_decimal(f64::NAN), None);
        assert_eq!(finite_decimal(f64::INFINITY), None);
        assert_eq!(finite_decimal(2.5), Some(dec!(2.5)));
    }

    #[test]
    fn saturating_decimal_clamps_out_of_range_values() {
        assert_eq!(saturating_decimal(1e29), Some(Decimal::MAX));
        assert_eq!(saturating_decimal(-1e29), Some(Decimal::MIN));
        assert_eq!(saturating_decimal(1.5), Some(dec!(1.5)));
        assert_eq!(saturating_decimal(f64::NAN), None);
        assert_eq!(saturating_decimal(f64::NEG_INFINITY), None);
    }

    #[test]
    fn usable_odds_must_exceed_one() {
        assert!(!is_usable_odds(dec!(1)));
        assert!(!is_usable_odds(dec!(0.5)));
        assert!(!is_usable_odds(dec!(-2)));
        assert!(is_usable_odds(dec!(1.01)));
    }
}
