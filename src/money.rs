//! Exact decimal currency amounts.
//!
//! Values keep the full precision they were parsed with; rounding to two
//! decimal places happens only when an amount is rendered.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::ops::Neg;
use std::str::FromStr;

/// A currency amount backed by `rust_decimal::Decimal`.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use ledger_validator::Money;
///
/// let amount = Money::from_str("10.5").unwrap();
/// assert_eq!(amount.to_string(), "10.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Money(Decimal);

impl Money {
    /// Decimal places used when rendering.
    pub const DISPLAY_SCALE: u32 = 2;

    /// Returns `true` if the amount is strictly below zero.
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Sum of two amounts, or `None` if it does not fit in a `Decimal`.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Returns the underlying decimal.
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Money)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self
            .0
            .round_dp_with_strategy(Self::DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero);
        write!(f, "{:.2}", rounded)
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Money::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    #[test]
    fn test_display_pads_to_two_places() {
        assert_eq!(money("1").to_string(), "1.00");
        assert_eq!(money("1.5").to_string(), "1.50");
        assert_eq!(money("  2.25  ").to_string(), "2.25");
    }

    #[test]
    fn test_display_rounds_half_away_from_zero() {
        assert_eq!(money("0.125").to_string(), "0.13");
        assert_eq!(money("-0.125").to_string(), "-0.13");
        assert_eq!(money("10.004").to_string(), "10.00");
    }

    #[test]
    fn test_arithmetic_keeps_full_precision() {
        let a = money("0.001");
        let b = money("0.004");
        let sum = a.checked_add(b).unwrap();
        assert_eq!(sum.as_decimal(), Decimal::from_str("0.005").unwrap());
        assert_eq!(sum.to_string(), "0.01");
    }

    #[test]
    fn test_negative_values() {
        assert!(money("-1.0").is_negative());
        assert!(!money("0").is_negative());
        assert_eq!((-money("3.5")).to_string(), "-3.50");
        assert_eq!(money("1").checked_add(-money("3")).unwrap().to_string(), "-2.00");
    }

    #[test]
    fn test_checked_add_overflow() {
        let max = Money(Decimal::MAX);
        assert_eq!(max.checked_add(money("1")), None);
        assert!(max.checked_add(money("-1")).is_some());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(Money::from_str("ten").is_err());
    }
}
