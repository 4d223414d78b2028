//! Money type for representing currency amounts
//!
//! Wraps an arbitrary-precision [`Decimal`] so amounts never pass through
//! floating point. Two amounts compare equal when they are numerically equal,
//! whatever their scale (`1.0 == 1.00`).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

/// A monetary amount backed by an exact decimal
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Wrap an existing decimal value
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Create a Money amount from minor units (cents)
    ///
    /// # Examples
    /// ```
    /// use finledger::models::Money;
    /// let amount = Money::from_cents(1050); // 10.50
    /// assert_eq!(amount.to_string(), "$10.50");
    /// ```
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Get the underlying decimal
    pub const fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Strictly less than zero
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Addition that returns `None` instead of panicking when the sum
    /// leaves the representable range
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Parse a money amount from a string
    ///
    /// Accepts formats: "10.50", "-10.50", "$10.50", "$-10.50", "1,250.00", "10"
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let trimmed = s.trim();

        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, trimmed),
        };
        let rest = rest.strip_prefix('$').unwrap_or(rest);
        let cleaned: String = rest.chars().filter(|c| *c != ',').collect();

        if cleaned.is_empty() {
            return Err(MoneyParseError::InvalidFormat(s.to_string()));
        }

        let value = Decimal::from_str(&cleaned)
            .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?;

        Ok(Self(if negative { -value } else { value }))
    }

    /// Format with a currency symbol, always showing at least two decimals
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let mut magnitude = self.0.abs().normalize();
        if magnitude.scale() < 2 {
            magnitude.rescale(2);
        }

        if self.is_negative() {
            format!("-{}{}", symbol, magnitude)
        } else {
            format!("{}{}", symbol, magnitude)
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl FromStr for Money {
    type Err = MoneyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_with_symbol("$"))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_cents() {
        assert_eq!(Money::from_cents(1050).value(), dec!(10.50));
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1050).to_string(), "$10.50");
        assert_eq!(Money::zero().to_string(), "$0.00");
        assert_eq!(Money::from_cents(-1050).to_string(), "-$10.50");
        assert_eq!(Money::new(dec!(0.125)).to_string(), "$0.125");
        assert_eq!(Money::new(dec!(3500)).to_string(), "$3500.00");
    }

    #[test]
    fn test_scale_insensitive_equality() {
        assert_eq!(Money::new(dec!(1.0)), Money::new(dec!(1.00)));
        assert_eq!(Money::new(dec!(3500.00)), Money::new(dec!(3500)));
    }

    #[test]
    fn test_arithmetic_is_exact() {
        let a = Money::new(dec!(0.1));
        let b = Money::new(dec!(0.2));
        assert_eq!(a + b, Money::new(dec!(0.3)));
        assert_eq!((a - b).value(), dec!(-0.1));
        assert_eq!((-a).value(), dec!(-0.1));
    }

    #[test]
    fn test_checked_arithmetic() {
        let max = Money::new(Decimal::MAX);
        assert_eq!(max.checked_add(Money::new(Decimal::ONE)), None);
        assert_eq!(Money::new(Decimal::MIN).checked_sub(Money::new(Decimal::ONE)), None);
        assert_eq!(
            Money::new(dec!(10.50)).checked_add(Money::new(dec!(-0.50))),
            Some(Money::new(dec!(10)))
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("10.50").unwrap().value(), dec!(10.50));
        assert_eq!(Money::parse("$10.50").unwrap().value(), dec!(10.50));
        assert_eq!(Money::parse("-10.50").unwrap().value(), dec!(-10.50));
        assert_eq!(Money::parse("1,250.00").unwrap().value(), dec!(1250));
        assert_eq!(Money::parse("10").unwrap().value(), dec!(10));
        assert!(Money::parse("").is_err());
        assert!(Money::parse("ten").is_err());
    }

    #[test]
    fn test_is_checks() {
        assert!(Money::zero().is_zero());
        assert!(!Money::zero().is_positive());
        assert!(Money::from_cents(100).is_positive());
        assert!(Money::from_cents(-100).is_negative());
    }

    #[test]
    fn test_sum() {
        let total: Money = vec![
            Money::new(dec!(100.10)),
            Money::new(dec!(200.20)),
            Money::new(dec!(-0.30)),
        ]
        .into_iter()
        .sum();
        assert_eq!(total.value(), dec!(300));
    }

    #[test]
    fn test_serialization_keeps_precision() {
        let m = Money::new(dec!(10.505));
        let json = serde_json::to_string(&m).unwrap();
        let deserialized: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(m, deserialized);
    }
}
