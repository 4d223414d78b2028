//! Income vs. expense report

use serde::Serialize;

use crate::models::{DateRange, Money, Transaction};

/// Money in and out over a date range
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncomeVsExpenseReport {
    pub range: DateRange,
    /// Total income (magnitude)
    pub total_income: Money,
    /// Total expense (magnitude)
    pub total_expense: Money,
    /// Income minus expense
    pub net_flow: Money,
    pub income_count: usize,
    pub expense_count: usize,
}

impl IncomeVsExpenseReport {
    /// Fold a set of transactions; those outside `range` are ignored
    pub fn from_transactions(range: DateRange, transactions: &[Transaction]) -> Self {
        let mut report = Self {
            range,
            total_income: Money::zero(),
            total_expense: Money::zero(),
            net_flow: Money::zero(),
            income_count: 0,
            expense_count: 0,
        };

        for txn in transactions.iter().filter(|t| range.contains(t.date)) {
            if txn.is_income() {
                report.total_income += txn.magnitude();
                report.income_count += 1;
            } else {
                report.total_expense += txn.magnitude();
                report.expense_count += 1;
            }
        }

        report.net_flow = report.total_income - report.total_expense;
        report
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Income vs Expense: {} to {}\n",
            self.range.start(),
            self.range.end()
        ));
        output.push_str(&"=".repeat(48));
        output.push('\n');
        output.push_str(&format!(
            "{:<20} {:>16} {:>8}\n",
            "Income",
            self.total_income.to_string(),
            self.income_count
        ));
        output.push_str(&format!(
            "{:<20} {:>16} {:>8}\n",
            "Expense",
            self.total_expense.to_string(),
            self.expense_count
        ));
        output.push_str(&"-".repeat(48));
        output.push('\n');
        output.push_str(&format!(
            "{:<20} {:>16}\n",
            "Net",
            self.net_flow.to_string()
        ));

        output
    }
}
