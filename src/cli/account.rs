//! Account CLI commands
//!
//! Implements CLI commands for account management.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::account::{format_account_details, format_account_list};
use crate::error::LedgerResult;
use crate::models::UserId;
use crate::services::{AccountService, AccountUpdate};
use crate::storage::Storage;

use super::parse_money;

/// Account subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// Create a new account
    Create {
        /// Account name
        name: String,
        /// Free-form account type (defaults to the configured type)
        #[arg(short = 't', long)]
        account_type: Option<String>,
        /// Opening balance (e.g., "1000.00" or "1000")
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        balance: String,
    },
    /// List all accounts
    List,
    /// Show account details
    Show {
        /// Account name or ID
        account: String,
    },
    /// Edit an account
    Edit {
        /// Account name or ID
        account: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New account type
        #[arg(short = 't', long)]
        account_type: Option<String>,
        /// Mark the account active
        #[arg(long, conflicts_with = "deactivate")]
        activate: bool,
        /// Mark the account inactive
        #[arg(long)]
        deactivate: bool,
    },
    /// Delete an empty account
    Delete {
        /// Account name or ID
        account: String,
    },
}

/// Handle an account command
pub fn handle_account_command(
    storage: &Storage,
    settings: &Settings,
    owner: UserId,
    cmd: AccountCommands,
) -> LedgerResult<()> {
    let service = AccountService::new(storage);

    match cmd {
        AccountCommands::Create {
            name,
            account_type,
            balance,
        } => {
            let opening = parse_money("balance", &balance)?;
            let account_type = account_type.unwrap_or_else(|| settings.default_account_type.clone());

            let account = service.create(owner, &name, opening, &account_type)?;

            println!("Created account: {}", account.name);
            println!("  Type: {}", account.account_type);
            println!("  Opening Balance: {}", account.opening_balance);
            println!("  ID: {}", account.id.as_uuid());
        }

        AccountCommands::List => {
            let accounts = service.list(owner)?;
            print!("{}", format_account_list(&accounts));
        }

        AccountCommands::Show { account } => {
            let found = service.find(owner, &account)?;
            print!("{}", format_account_details(&found));
        }

        AccountCommands::Edit {
            account,
            name,
            account_type,
            activate,
            deactivate,
        } => {
            let found = service.find(owner, &account)?;

            let active = match (activate, deactivate) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };

            if name.is_none() && account_type.is_none() && active.is_none() {
                println!("No changes specified. Use --name, --account-type, --activate or --deactivate.");
                return Ok(());
            }

            let updated = service.update(
                found.id,
                owner,
                AccountUpdate {
                    name,
                    account_type,
                    active,
                },
            )?;
            println!("Updated account: {}", updated.name);
        }

        AccountCommands::Delete { account } => {
            let found = service.find(owner, &account)?;
            let deleted = service.delete(found.id, owner)?;
            println!("Deleted account: {}", deleted.name);
        }
    }

    Ok(())
}
