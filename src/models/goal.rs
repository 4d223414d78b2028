//! Savings goal model
//!
//! Completion is derived from the amounts on every read rather than stored,
//! so it can never drift from `current_amount` and `target_amount`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{GoalId, UserId};
use super::money::Money;
use super::Owned;

/// A savings goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialGoal {
    pub id: GoalId,

    pub owner_id: UserId,

    pub name: String,

    /// Amount to reach
    pub target_amount: Money,

    /// Amount saved so far
    pub current_amount: Money,

    /// Date the goal should be reached by
    pub deadline: NaiveDate,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl FinancialGoal {
    pub fn new(
        owner_id: UserId,
        name: impl Into<String>,
        target_amount: Money,
        current_amount: Money,
        deadline: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: GoalId::new(),
            owner_id,
            name: name.into(),
            target_amount,
            current_amount,
            deadline,
            created_at: now,
            updated_at: now,
        }
    }

    /// A goal is complete once the saved amount reaches the target
    pub fn is_completed(&self) -> bool {
        self.current_amount >= self.target_amount
    }

    /// Amount still needed, never negative
    pub fn remaining(&self) -> Money {
        if self.is_completed() {
            Money::zero()
        } else {
            self.target_amount - self.current_amount
        }
    }

    /// Add a contribution to the saved amount
    pub fn contribute(&mut self, amount: Money) -> Result<(), GoalValidationError> {
        self.current_amount = self
            .current_amount
            .checked_add(amount)
            .ok_or(GoalValidationError::AmountOverflow)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Validate the amount fields
    pub fn validate(&self) -> Result<(), GoalValidationError> {
        if self.name.trim().is_empty() {
            return Err(GoalValidationError::EmptyName);
        }

        if !self.target_amount.is_positive() {
            return Err(GoalValidationError::NonPositiveTarget);
        }

        if self.current_amount.is_negative() {
            return Err(GoalValidationError::NegativeCurrent);
        }

        Ok(())
    }
}

impl Owned for FinancialGoal {
    type Id = GoalId;

    fn id(&self) -> GoalId {
        self.id
    }

    fn owner_id(&self) -> UserId {
        self.owner_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl fmt::Display for FinancialGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} of {} by {}",
            self.name, self.current_amount, self.target_amount, self.deadline
        )
    }
}

/// Validation errors for goals
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalValidationError {
    EmptyName,
    NonPositiveTarget,
    NegativeCurrent,
    AmountOverflow,
}

impl fmt::Display for GoalValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Financial goal name cannot be empty"),
            Self::NonPositiveTarget => write!(f, "Target amount must be positive"),
            Self::NegativeCurrent => write!(f, "Current amount cannot be negative"),
            Self::AmountOverflow => write!(f, "Saved amount would exceed the supported range"),
        }
    }
}

impl std::error::Error for GoalValidationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn goal(target: Money, current: Money) -> FinancialGoal {
        FinancialGoal::new(
            UserId::new(),
            "Vacation",
            target,
            current,
            NaiveDate::from_ymd_opt(2030, 6, 1).unwrap(),
        )
    }

    #[test]
    fn test_completed_is_derived() {
        let mut g = goal(Money::new(dec!(500)), Money::new(dec!(500)));
        assert!(g.is_completed());

        g.target_amount = Money::new(dec!(750));
        assert!(!g.is_completed());
        assert_eq!(g.remaining(), Money::new(dec!(250)));
    }

    #[test]
    fn test_contribute() {
        let mut g = goal(Money::new(dec!(100)), Money::zero());
        g.contribute(Money::new(dec!(60))).unwrap();
        assert!(!g.is_completed());
        g.contribute(Money::new(dec!(40.00))).unwrap();
        assert!(g.is_completed());
        assert_eq!(g.remaining(), Money::zero());
    }

    #[test]
    fn test_contribute_overflow() {
        let max = Money::new(rust_decimal::Decimal::MAX);
        let mut g = goal(max, max);
        assert_eq!(
            g.contribute(Money::new(rust_decimal::Decimal::ONE)),
            Err(GoalValidationError::AmountOverflow)
        );
        assert_eq!(g.current_amount, max);
    }

    #[test]
    fn test_validation() {
        assert!(goal(Money::new(dec!(1)), Money::zero()).validate().is_ok());
        assert_eq!(
            goal(Money::zero(), Money::zero()).validate(),
            Err(GoalValidationError::NonPositiveTarget)
        );
        assert_eq!(
            goal(Money::new(dec!(1)), Money::new(dec!(-1))).validate(),
            Err(GoalValidationError::NegativeCurrent)
        );
    }
}
