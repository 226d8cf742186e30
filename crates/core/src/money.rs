//! Monetary rounding helpers.
//!
//! CRITICAL: All amounts are stored with two fractional digits.
//! Use banker's rounding (round half to even) to minimize cumulative errors.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of fractional digits for stored monetary amounts.
pub const MONEY_DP: u32 = 2;

/// Rounds an amount to monetary precision.
///
/// Uses banker's rounding (round half to even).
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointNearestEven)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_money_passthrough() {
        assert_eq!(round_money(dec!(10.25)), dec!(10.25));
    }

    #[test]
    fn test_round_money_truncates_extra_digits() {
        assert_eq!(round_money(dec!(33.3333)), dec!(33.33));
    }

    #[test]
    fn test_bankers_rounding() {
        // round half to even: 0.125 -> 0.12, 0.135 -> 0.14
        assert_eq!(round_money(dec!(0.125)), dec!(0.12));
        assert_eq!(round_money(dec!(0.135)), dec!(0.14));
    }
}
