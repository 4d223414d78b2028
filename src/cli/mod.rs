//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod account;
pub mod budget;
pub mod category;
pub mod goal;
pub mod report;
pub mod transaction;
pub mod user;

pub use account::{handle_account_command, AccountCommands};
pub use budget::{handle_budget_command, BudgetCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use goal::{handle_goal_command, GoalCommands};
pub use report::{handle_report_command, ReportArgs};
pub use transaction::{handle_transaction_command, TransactionCommands};
pub use user::{handle_user_command, resolve_acting_user, UserCommands};

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{CategoryId, DateRange, Money};
use crate::storage::Storage;

/// Parse a money argument such as "1000", "12.50" or "$1,250.00"
pub(crate) fn parse_money(field: &str, value: &str) -> LedgerResult<Money> {
    Money::parse(value).map_err(|e| {
        LedgerError::Validation(format!(
            "Invalid {} '{}': {}. Use a format like '1000.00' or '1000'",
            field, value, e
        ))
    })
}

/// Parse a YYYY-MM-DD date argument
pub(crate) fn parse_date(field: &str, value: &str) -> LedgerResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        LedgerError::Validation(format!(
            "Invalid {} '{}'. Use format YYYY-MM-DD",
            field, value
        ))
    })
}

/// Resolve `--month` or `--from/--to` into a date range
///
/// With neither given, falls back to the month containing `today`.
pub(crate) fn parse_range(
    month: Option<&str>,
    from: Option<&str>,
    to: Option<&str>,
    today: NaiveDate,
) -> LedgerResult<DateRange> {
    let invalid = |e: crate::models::period::DateRangeError| LedgerError::Validation(e.to_string());

    match (month, from, to) {
        (Some(month), None, None) => DateRange::parse(month).map_err(invalid),
        (Some(_), _, _) => Err(LedgerError::Validation(
            "Use either --month or --from/--to, not both".into(),
        )),
        (None, Some(from), Some(to)) => {
            DateRange::new(parse_date("start date", from)?, parse_date("end date", to)?)
                .map_err(invalid)
        }
        (None, Some(_), None) | (None, None, Some(_)) => Err(LedgerError::Validation(
            "Both --from and --to are required".into(),
        )),
        (None, None, None) => DateRange::month_of(today).map_err(invalid),
    }
}

/// Map of category id to name, for rendering
pub(crate) fn category_names(storage: &Storage) -> LedgerResult<HashMap<CategoryId, String>> {
    Ok(storage
        .categories
        .list()?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect())
}
