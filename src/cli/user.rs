//! User CLI commands
//!
//! Registers users and resolves the acting user for every other command.

use clap::Subcommand;

use crate::error::{LedgerError, LedgerResult};
use crate::models::UserId;
use crate::services::UserService;
use crate::storage::Storage;

/// User subcommands
#[derive(Subcommand)]
pub enum UserCommands {
    /// Register a new user
    Add {
        /// Display name
        name: String,
    },
    /// List registered users
    List,
}

/// Handle a user command
pub fn handle_user_command(storage: &Storage, cmd: UserCommands) -> LedgerResult<()> {
    let service = UserService::new(storage);

    match cmd {
        UserCommands::Add { name } => {
            let user = service.register(&name)?;
            println!("Registered user: {}", user.name);
            println!("  ID: {}", user.id.as_uuid());
            println!();
            println!("Pass --user {} (or set FINLEDGER_USER) to act as this user.", user.id.as_uuid());
        }

        UserCommands::List => {
            let users = service.list()?;
            if users.is_empty() {
                println!("No users registered. Run 'finledger user add <name>' first.");
                return Ok(());
            }
            for user in users {
                let name: &str = if user.name.is_empty() { "(external)" } else { &user.name };
                println!("{:<20}  {}", name, user.id.as_uuid());
            }
        }
    }

    Ok(())
}

/// Resolve the `--user` argument to a registered user
///
/// Accepts a user id or a registered name (case-insensitive).
pub fn resolve_acting_user(storage: &Storage, user: Option<&str>) -> LedgerResult<UserId> {
    let identifier = user.map(str::trim).filter(|s| !s.is_empty()).ok_or_else(|| {
        LedgerError::Validation("No acting user. Pass --user or set FINLEDGER_USER".into())
    })?;

    let service = UserService::new(storage);

    if let Ok(id) = identifier.parse::<UserId>() {
        return service.require(id).map(|u| u.id);
    }

    let wanted = identifier.to_lowercase();
    service
        .list()?
        .into_iter()
        .find(|u| u.name.to_lowercase() == wanted)
        .map(|u| u.id)
        .ok_or_else(|| LedgerError::user_not_found(identifier.to_string()))
}
