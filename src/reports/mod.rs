//! Reports module for finledger
//!
//! Read-only folds over the ledger's query output: spending by category,
//! income vs. expense, and budget status.

pub mod budget_status;
pub mod cash_flow;
pub mod spending;

pub use budget_status::BudgetStatus;
pub use cash_flow::IncomeVsExpenseReport;
pub use spending::{CategorySpending, SpendingReport};

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Kinds of report the aggregator can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    SpendingByCategory,
    IncomeVsExpense,
}

impl ReportKind {
    pub const ALL: [ReportKind; 2] = [Self::SpendingByCategory, Self::IncomeVsExpense];

    /// Parse a report kind name, case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "spending_by_category" => Some(Self::SpendingByCategory),
            "income_vs_expense" | "income_vs_expense_trend" => Some(Self::IncomeVsExpense),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SpendingByCategory => "spending_by_category",
            Self::IncomeVsExpense => "income_vs_expense",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Unsupported report kind: {}", s))
    }
}

/// A generated report
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Report {
    SpendingByCategory(SpendingReport),
    IncomeVsExpense(IncomeVsExpenseReport),
}

impl Report {
    pub fn kind(&self) -> ReportKind {
        match self {
            Self::SpendingByCategory(_) => ReportKind::SpendingByCategory,
            Self::IncomeVsExpense(_) => ReportKind::IncomeVsExpense,
        }
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        match self {
            Self::SpendingByCategory(report) => report.format_terminal(),
            Self::IncomeVsExpense(report) => report.format_terminal(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind() {
        assert_eq!(
            ReportKind::parse("spending_by_category"),
            Some(ReportKind::SpendingByCategory)
        );
        assert_eq!(
            ReportKind::parse("INCOME_VS_EXPENSE"),
            Some(ReportKind::IncomeVsExpense)
        );
        assert_eq!(
            ReportKind::parse("income_vs_expense_trend"),
            Some(ReportKind::IncomeVsExpense)
        );
        assert_eq!(ReportKind::parse("net_worth"), None);
    }

    #[test]
    fn test_kind_round_trips() {
        for kind in ReportKind::ALL {
            assert_eq!(kind.as_str().parse::<ReportKind>(), Ok(kind));
        }
    }
}
