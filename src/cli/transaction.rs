//! Transaction CLI commands
//!
//! Amounts are entered as positive magnitudes; the sign comes from the
//! transaction kind.

use clap::Subcommand;

use crate::display::transaction::{format_transaction_details, format_transaction_register};
use crate::error::LedgerResult;
use crate::models::UserId;
use crate::services::{
    AccountService, CategoryService, Clock, CreateTransactionInput, SystemClock, TransactionFilter,
    TransactionService, UpdateTransactionInput,
};
use crate::storage::Storage;

use super::{category_names, parse_date, parse_money, parse_range};

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a new transaction
    Add {
        /// Account name or ID
        account: String,
        /// Amount (e.g., "42.50")
        amount: String,
        /// Category name or ID
        #[arg(short, long)]
        category: String,
        /// Kind: income or expense (defaults to the category's kind)
        #[arg(short, long)]
        kind: Option<String>,
        /// Transaction date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// Description
        #[arg(short = 'm', long, default_value = "")]
        description: String,
    },
    /// Show a transaction
    Show {
        /// Transaction ID
        id: String,
    },
    /// Edit a transaction
    Edit {
        /// Transaction ID
        id: String,
        /// Move to another account
        #[arg(short, long)]
        account: Option<String>,
        /// New category (must have the same kind)
        #[arg(short, long)]
        category: Option<String>,
        /// New amount
        #[arg(long)]
        amount: Option<String>,
        /// New date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
        /// New description
        #[arg(short = 'm', long)]
        description: Option<String>,
    },
    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
    },
    /// List transactions, newest first
    List {
        /// Filter by account
        #[arg(short, long)]
        account: Option<String>,
        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,
        /// Filter by kind
        #[arg(short, long)]
        kind: Option<String>,
        /// Calendar month (YYYY-MM)
        #[arg(long)]
        month: Option<String>,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    owner: UserId,
    cmd: TransactionCommands,
) -> LedgerResult<()> {
    let service = TransactionService::new(storage);
    let accounts = AccountService::new(storage);
    let categories = CategoryService::new(storage);

    match cmd {
        TransactionCommands::Add {
            account,
            amount,
            category,
            kind,
            date,
            description,
        } => {
            let account = accounts.find(owner, &account)?;
            let category = categories.find(&category)?;
            let amount = parse_money("amount", &amount)?;
            let date = match date {
                Some(d) => parse_date("date", &d)?,
                None => SystemClock.today(),
            };
            let kind = kind.unwrap_or_else(|| category.kind.as_str().to_string());

            let txn = service.create(
                owner,
                CreateTransactionInput {
                    account_id: account.id,
                    category_id: category.id,
                    amount,
                    date,
                    description,
                    kind,
                },
            )?;

            println!("Recorded {} of {} in {}", txn.kind, txn.amount, account.name);
            println!("  Category: {}", category.name);
            println!("  ID: {}", txn.id.as_uuid());
        }

        TransactionCommands::Show { id } => {
            let txn = service.find(owner, &id)?;
            let account = accounts.get(txn.account_id, owner)?;
            let category = categories.get(txn.category_id)?;
            print!(
                "{}",
                format_transaction_details(&txn, &account.name, &category.name)
            );
        }

        TransactionCommands::Edit {
            id,
            account,
            category,
            amount,
            date,
            description,
        } => {
            let existing = service.find(owner, &id)?;
            let mut input = UpdateTransactionInput::from_existing(&existing);

            if let Some(account) = account {
                input.account_id = accounts.find(owner, &account)?.id;
            }
            if let Some(category) = category {
                input.category_id = categories.find(&category)?.id;
            }
            if let Some(amount) = amount {
                input.amount = parse_money("amount", &amount)?;
            }
            if let Some(date) = date {
                input.date = parse_date("date", &date)?;
            }
            if let Some(description) = description {
                input.description = description;
            }

            let updated = service.update(existing.id, owner, input)?;
            println!("Updated transaction: {} on {}", updated.amount, updated.date);
        }

        TransactionCommands::Delete { id } => {
            let existing = service.find(owner, &id)?;
            let deleted = service.delete(existing.id, owner)?;
            println!("Deleted transaction: {} on {}", deleted.amount, deleted.date);
        }

        TransactionCommands::List {
            account,
            category,
            kind,
            month,
            from,
            to,
            limit,
        } => {
            let mut filter = TransactionFilter::new().limit(limit);

            if let Some(account) = account {
                filter = filter.account(accounts.find(owner, &account)?.id);
            }
            if let Some(category) = category {
                filter = filter.category(categories.find(&category)?.id);
            }
            if let Some(kind) = kind {
                filter = filter.kind(crate::services::category::parse_kind(&kind)?);
            }
            if month.is_some() || from.is_some() || to.is_some() {
                filter = filter.date_range(parse_range(
                    month.as_deref(),
                    from.as_deref(),
                    to.as_deref(),
                    SystemClock.today(),
                )?);
            }

            let transactions = service.query(owner, &filter)?;
            print!(
                "{}",
                format_transaction_register(&transactions, &category_names(storage)?)
            );
        }
    }

    Ok(())
}
