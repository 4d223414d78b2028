//! Spending Report
//!
//! Expense transactions in a date range, grouped by category.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Category, CategoryId, DateRange, Money, Transaction};

/// Spending for one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySpending {
    pub category_id: CategoryId,
    /// Category name, or the id if the category is gone
    pub category_name: String,
    /// Total spent (magnitude)
    pub total: Money,
    pub transaction_count: usize,
    /// Share of total spending, one decimal place
    pub percentage: Decimal,
}

/// Spending Report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingReport {
    pub range: DateRange,
    /// Categories with spending, largest first
    pub categories: Vec<CategorySpending>,
    /// Total spent across all categories (magnitude)
    pub total_spending: Money,
    pub total_transactions: usize,
}

impl SpendingReport {
    /// Fold a set of transactions into a spending report
    ///
    /// Income transactions and transactions outside `range` are ignored.
    pub fn from_transactions(
        range: DateRange,
        transactions: &[Transaction],
        categories: &[Category],
    ) -> Self {
        let mut by_category: HashMap<CategoryId, (Money, usize)> = HashMap::new();
        let mut total_spending = Money::zero();
        let mut total_transactions = 0;

        for txn in transactions
            .iter()
            .filter(|t| t.is_expense() && range.contains(t.date))
        {
            let entry = by_category
                .entry(txn.category_id)
                .or_insert((Money::zero(), 0));
            entry.0 += txn.magnitude();
            entry.1 += 1;
            total_spending += txn.magnitude();
            total_transactions += 1;
        }

        let names: HashMap<CategoryId, &str> = categories
            .iter()
            .map(|c| (c.id, c.name.as_str()))
            .collect();

        let mut rows: Vec<CategorySpending> = by_category
            .into_iter()
            .map(|(category_id, (total, transaction_count))| CategorySpending {
                category_id,
                category_name: names
                    .get(&category_id)
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| category_id.to_string()),
                total,
                transaction_count,
                percentage: percentage(total, total_spending),
            })
            .collect();

        // Largest first; ties by name so output is stable
        rows.sort_by(|a, b| {
            b.total
                .cmp(&a.total)
                .then_with(|| a.category_name.cmp(&b.category_name))
        });

        Self {
            range,
            categories: rows,
            total_spending,
            total_transactions,
        }
    }

    /// Get top spending categories
    pub fn top_categories(&self, limit: usize) -> &[CategorySpending] {
        &self.categories[..limit.min(self.categories.len())]
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Spending Report: {} to {}\n",
            self.range.start(),
            self.range.end()
        ));
        output.push_str(&"=".repeat(64));
        output.push('\n');
        output.push_str(&format!(
            "{:<32} {:>14} {:>8} {:>7}\n",
            "Category", "Amount", "Count", "%"
        ));
        output.push_str(&"-".repeat(64));
        output.push('\n');

        for row in &self.categories {
            output.push_str(&format!(
                "{:<32} {:>14} {:>8} {:>6}%\n",
                row.category_name,
                row.total.to_string(),
                row.transaction_count,
                row.percentage
            ));
        }

        output.push_str(&"-".repeat(64));
        output.push('\n');
        output.push_str(&format!(
            "{:<32} {:>14} {:>8}\n",
            "TOTAL SPENDING",
            self.total_spending.to_string(),
            self.total_transactions
        ));

        output
    }
}

fn percentage(part: Money, whole: Money) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    (part.value() * Decimal::ONE_HUNDRED / whole.value()).round_dp(1)
}
