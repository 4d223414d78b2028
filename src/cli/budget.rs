//! Budget CLI commands
//!
//! Implements CLI commands for spending limits over expense categories.

use clap::Subcommand;

use crate::display::budget::{format_budget_details, format_budget_list};
use crate::error::LedgerResult;
use crate::models::{CategoryId, UserId};
use crate::services::{
    BudgetInput, BudgetService, CategoryService, Clock, ReportService, SystemClock,
};
use crate::storage::Storage;

use super::{category_names, parse_date, parse_money, parse_range};

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Create a budget
    Create {
        /// Budget name
        name: String,
        /// Spending limit
        #[arg(short, long)]
        limit: String,
        /// Expense category name or ID (repeatable)
        #[arg(short, long = "category", required = true)]
        categories: Vec<String>,
        /// Calendar month (YYYY-MM); defaults to the current month
        #[arg(long)]
        month: Option<String>,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },
    /// List budgets
    List {
        /// Only budgets active today
        #[arg(long)]
        current: bool,
    },
    /// Show budget details
    Show {
        /// Budget name or ID
        budget: String,
    },
    /// Edit a budget
    Edit {
        /// Budget name or ID
        budget: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New limit
        #[arg(short, long)]
        limit: Option<String>,
        /// Replace the category set (repeatable)
        #[arg(short, long = "category")]
        categories: Vec<String>,
        /// New start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// New end date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Mark the budget active
        #[arg(long, conflicts_with = "deactivate")]
        activate: bool,
        /// Mark the budget inactive
        #[arg(long)]
        deactivate: bool,
    },
    /// Delete a budget
    Delete {
        /// Budget name or ID
        budget: String,
    },
    /// Show spending against a budget's limit
    Status {
        /// Budget name or ID
        budget: String,
    },
}

fn resolve_categories(storage: &Storage, names: &[String]) -> LedgerResult<Vec<CategoryId>> {
    let service = CategoryService::new(storage);
    names
        .iter()
        .map(|name| service.find(name).map(|c| c.id))
        .collect()
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    owner: UserId,
    cmd: BudgetCommands,
) -> LedgerResult<()> {
    let service = BudgetService::new(storage);

    match cmd {
        BudgetCommands::Create {
            name,
            limit,
            categories,
            month,
            from,
            to,
        } => {
            let range = parse_range(
                month.as_deref(),
                from.as_deref(),
                to.as_deref(),
                SystemClock.today(),
            )?;

            let budget = service.create(
                owner,
                BudgetInput {
                    name,
                    limit_amount: parse_money("limit", &limit)?,
                    start_date: range.start(),
                    end_date: range.end(),
                    category_ids: resolve_categories(storage, &categories)?,
                },
            )?;

            println!("Created budget: {}", budget.name);
            println!("  Limit: {}", budget.limit_amount);
            println!("  Period: {} to {}", budget.start_date, budget.end_date);
            println!("  ID: {}", budget.id.as_uuid());
        }

        BudgetCommands::List { current } => {
            let budgets = if current {
                service.active_on(owner, SystemClock.today())?
            } else {
                service.list(owner)?
            };
            print!("{}", format_budget_list(&budgets));
        }

        BudgetCommands::Show { budget } => {
            let found = service.find(owner, &budget)?;
            print!(
                "{}",
                format_budget_details(&found, &category_names(storage)?)
            );
        }

        BudgetCommands::Edit {
            budget,
            name,
            limit,
            categories,
            from,
            to,
            activate,
            deactivate,
        } => {
            let found = service.find(owner, &budget)?;
            let mut input = BudgetInput::from_existing(&found);

            if let Some(name) = name {
                input.name = name;
            }
            if let Some(limit) = limit {
                input.limit_amount = parse_money("limit", &limit)?;
            }
            if !categories.is_empty() {
                input.category_ids = resolve_categories(storage, &categories)?;
            }
            if let Some(from) = from {
                input.start_date = parse_date("start date", &from)?;
            }
            if let Some(to) = to {
                input.end_date = parse_date("end date", &to)?;
            }

            let active = match (activate, deactivate) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };

            let updated = service.update(found.id, owner, input, active)?;
            println!("Updated budget: {}", updated.name);
        }

        BudgetCommands::Delete { budget } => {
            let found = service.find(owner, &budget)?;
            let deleted = service.delete(found.id, owner)?;
            println!("Deleted budget: {}", deleted.name);
        }

        BudgetCommands::Status { budget } => {
            let found = service.find(owner, &budget)?;
            let status = ReportService::new(storage).budget_status(owner, found.id)?;
            print!("{}", status.format_terminal());
        }
    }

    Ok(())
}
