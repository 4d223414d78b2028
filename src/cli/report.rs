//! Report CLI command

use clap::Args;

use crate::error::LedgerResult;
use crate::models::UserId;
use crate::services::{
    AccountService, CategoryService, Clock, ReportService, SystemClock, TransactionFilter,
};
use crate::storage::Storage;

use super::parse_range;

/// Arguments for `finledger report`
#[derive(Args)]
pub struct ReportArgs {
    /// Report kind: spending_by_category or income_vs_expense
    pub kind: String,
    /// Calendar month (YYYY-MM); defaults to the current month
    #[arg(long)]
    pub month: Option<String>,
    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,
    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,
    /// Only include transactions on this account (name or ID)
    #[arg(short, long)]
    pub account: Option<String>,
    /// Only include transactions in this category (name or ID)
    #[arg(short, long)]
    pub category: Option<String>,
    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Handle the report command
pub fn handle_report_command(storage: &Storage, owner: UserId, args: ReportArgs) -> LedgerResult<()> {
    let range = parse_range(
        args.month.as_deref(),
        args.from.as_deref(),
        args.to.as_deref(),
        SystemClock.today(),
    )?;

    let mut scope = TransactionFilter::new();
    if let Some(account) = &args.account {
        scope = scope.account(AccountService::new(storage).find(owner, account)?.id);
    }
    if let Some(category) = &args.category {
        scope = scope.category(CategoryService::new(storage).find(category)?.id);
    }

    let report = ReportService::new(storage).generate(
        owner,
        &args.kind,
        range.start(),
        range.end(),
        &scope,
    )?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.format_terminal());
    }

    Ok(())
}
