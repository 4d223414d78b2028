//! Budget status
//!
//! Spend against a budget's limit, computed from the ledger at report time
//! by joining the budget's categories with its date range.

use serde::Serialize;

use crate::models::{Budget, BudgetId, DateRange, Money, Transaction};

/// How much of a budget has been used
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetStatus {
    pub budget_id: BudgetId,
    pub name: String,
    pub range: DateRange,
    pub limit: Money,
    /// Expense spent in the budget's categories and range (magnitude)
    pub spent: Money,
    /// Limit minus spent; negative once over the limit
    pub remaining: Money,
    pub over_limit: bool,
    pub transaction_count: usize,
}

impl BudgetStatus {
    /// Compute status from the owner's transactions
    pub fn from_transactions(budget: &Budget, range: DateRange, transactions: &[Transaction]) -> Self {
        let mut spent = Money::zero();
        let mut transaction_count = 0;

        for txn in transactions.iter().filter(|t| {
            t.is_expense() && range.contains(t.date) && budget.includes_category(t.category_id)
        }) {
            spent += txn.magnitude();
            transaction_count += 1;
        }

        let remaining = budget.limit_amount - spent;
        Self {
            budget_id: budget.id,
            name: budget.name.clone(),
            range,
            limit: budget.limit_amount,
            spent,
            remaining,
            over_limit: spent > budget.limit_amount,
            transaction_count,
        }
    }

    /// Format the status for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = format!(
            "Budget: {} ({} to {})\n",
            self.name,
            self.range.start(),
            self.range.end()
        );
        output.push_str(&format!("  Limit:     {}\n", self.limit));
        output.push_str(&format!(
            "  Spent:     {} ({} transactions)\n",
            self.spent, self.transaction_count
        ));
        output.push_str(&format!("  Remaining: {}\n", self.remaining));
        if self.over_limit {
            output.push_str("  OVER LIMIT\n");
        }
        output
    }
}
