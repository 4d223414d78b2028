//! Income/expense classification shared by categories and transactions

use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

/// Direction of money flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Money flowing into an account
    Income,
    /// Money flowing out of an account
    Expense,
}

impl EntryKind {
    /// Parse a kind from text, case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }

    /// Apply this kind's sign to a magnitude: income is positive, expense negative
    pub fn signed(&self, amount: Money) -> Money {
        match self {
            Self::Income => amount.abs(),
            Self::Expense => -amount.abs(),
        }
    }

    /// Whether a stored signed amount agrees with this kind
    pub fn matches_sign(&self, amount: Money) -> bool {
        match self {
            Self::Income => amount.is_positive(),
            Self::Expense => amount.is_negative(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(EntryKind::parse("Income"), Some(EntryKind::Income));
        assert_eq!(EntryKind::parse(" EXPENSE "), Some(EntryKind::Expense));
        assert_eq!(EntryKind::parse("transfer"), None);
    }

    #[test]
    fn test_signed() {
        let amount = Money::from_cents(2500);
        assert_eq!(EntryKind::Income.signed(amount), amount);
        assert_eq!(EntryKind::Expense.signed(amount), -amount);
        assert_eq!(EntryKind::Income.signed(-amount), amount);
    }

    #[test]
    fn test_matches_sign() {
        assert!(EntryKind::Income.matches_sign(Money::from_cents(1)));
        assert!(!EntryKind::Income.matches_sign(Money::zero()));
        assert!(EntryKind::Expense.matches_sign(Money::from_cents(-1)));
    }

    #[test]
    fn test_serialization() {
        assert_eq!(serde_json::to_string(&EntryKind::Expense).unwrap(), "\"expense\"");
    }
}
