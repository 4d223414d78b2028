//! Budget model
//!
//! A budget caps spending over a set of expense categories for a date range.
//! Spend-vs-limit is computed at report time, never stored.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{BudgetId, CategoryId, UserId};
use super::money::Money;
use super::Owned;

/// A spending limit over a set of expense categories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: BudgetId,

    pub owner_id: UserId,

    pub name: String,

    /// Maximum spending allowed within the range
    pub limit_amount: Money,

    /// First day covered (inclusive)
    pub start_date: NaiveDate,

    /// Last day covered (inclusive)
    pub end_date: NaiveDate,

    /// Expense categories counted against the limit
    pub category_ids: Vec<CategoryId>,

    pub active: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Budget {
    /// Create a new active budget; duplicate category ids are collapsed
    pub fn new(
        owner_id: UserId,
        name: impl Into<String>,
        limit_amount: Money,
        start_date: NaiveDate,
        end_date: NaiveDate,
        category_ids: Vec<CategoryId>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: BudgetId::new(),
            owner_id,
            name: name.into(),
            limit_amount,
            start_date,
            end_date,
            category_ids: dedup_preserving_order(category_ids),
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the category set, collapsing duplicates
    pub fn set_categories(&mut self, category_ids: Vec<CategoryId>) {
        self.category_ids = dedup_preserving_order(category_ids);
    }

    /// Whether the budget's range contains `date`
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    pub fn includes_category(&self, category_id: CategoryId) -> bool {
        self.category_ids.contains(&category_id)
    }

    /// Validate the fields that don't require a category lookup
    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if self.name.trim().is_empty() {
            return Err(BudgetValidationError::EmptyName);
        }

        if !self.limit_amount.is_positive() {
            return Err(BudgetValidationError::NonPositiveLimit(self.limit_amount));
        }

        if self.end_date < self.start_date {
            return Err(BudgetValidationError::InvalidRange {
                start: self.start_date,
                end: self.end_date,
            });
        }

        if self.category_ids.is_empty() {
            return Err(BudgetValidationError::NoCategories);
        }

        Ok(())
    }
}

fn dedup_preserving_order(ids: Vec<CategoryId>) -> Vec<CategoryId> {
    let mut seen = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.contains(&id) {
            seen.push(id);
        }
    }
    seen
}

impl Owned for Budget {
    type Id = BudgetId;

    fn id(&self) -> BudgetId {
        self.id
    }

    fn owner_id(&self) -> UserId {
        self.owner_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} from {} to {})",
            self.name, self.limit_amount, self.start_date, self.end_date
        )
    }
}

/// Validation errors for budgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    EmptyName,
    NonPositiveLimit(Money),
    InvalidRange { start: NaiveDate, end: NaiveDate },
    NoCategories,
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Budget name cannot be empty"),
            Self::NonPositiveLimit(amount) => {
                write!(f, "Budget amount must be positive, got {}", amount)
            }
            Self::InvalidRange { start, end } => write!(
                f,
                "Invalid budget period: start date {} is after end date {}",
                start, end
            ),
            Self::NoCategories => write!(f, "Budget must include at least one category"),
        }
    }
}

impl std::error::Error for BudgetValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn test_budget() -> Budget {
        Budget::new(
            UserId::new(),
            "Groceries",
            Money::from_cents(50000),
            date(2025, 1, 1),
            date(2025, 1, 31),
            vec![CategoryId::new()],
        )
    }

    #[test]
    fn test_covers_is_inclusive() {
        let budget = test_budget();
        assert!(budget.covers(date(2025, 1, 1)));
        assert!(budget.covers(date(2025, 1, 31)));
        assert!(!budget.covers(date(2025, 2, 1)));
    }

    #[test]
    fn test_duplicate_categories_collapse() {
        let cat = CategoryId::new();
        let mut budget = test_budget();
        budget.set_categories(vec![cat, cat, cat]);
        assert_eq!(budget.category_ids, vec![cat]);
    }

    #[test]
    fn test_validation() {
        let mut budget = test_budget();
        assert!(budget.validate().is_ok());

        budget.limit_amount = Money::zero();
        assert!(matches!(
            budget.validate(),
            Err(BudgetValidationError::NonPositiveLimit(_))
        ));

        budget.limit_amount = Money::from_cents(100);
        budget.end_date = date(2024, 12, 31);
        assert!(matches!(
            budget.validate(),
            Err(BudgetValidationError::InvalidRange { .. })
        ));

        budget.end_date = budget.start_date;
        assert!(budget.validate().is_ok());

        budget.category_ids.clear();
        assert_eq!(budget.validate(), Err(BudgetValidationError::NoCategories));
    }
}
