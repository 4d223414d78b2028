//! Savings goal CLI commands

use clap::Subcommand;

use crate::display::goal::{format_goal_details, format_goal_list};
use crate::error::LedgerResult;
use crate::models::{Money, UserId};
use crate::services::{GoalInput, GoalService};
use crate::storage::Storage;

use super::{parse_date, parse_money};

/// Goal subcommands
#[derive(Subcommand)]
pub enum GoalCommands {
    /// Create a savings goal
    Create {
        /// Goal name
        name: String,
        /// Target amount
        #[arg(short, long)]
        target: String,
        /// Amount already saved
        #[arg(short, long, default_value = "0")]
        saved: String,
        /// Deadline (YYYY-MM-DD)
        #[arg(short, long)]
        deadline: String,
    },
    /// List goals
    List,
    /// Show goal details
    Show {
        /// Goal name or ID
        goal: String,
    },
    /// Edit a goal
    Edit {
        /// Goal name or ID
        goal: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New target amount
        #[arg(short, long)]
        target: Option<String>,
        /// New saved amount (clamped to the target)
        #[arg(short, long)]
        saved: Option<String>,
        /// New deadline (YYYY-MM-DD)
        #[arg(short, long)]
        deadline: Option<String>,
    },
    /// Add money to a goal
    Contribute {
        /// Goal name or ID
        goal: String,
        /// Amount to add
        amount: String,
    },
    /// Delete a goal
    Delete {
        /// Goal name or ID
        goal: String,
    },
}

/// Handle a goal command
pub fn handle_goal_command(storage: &Storage, owner: UserId, cmd: GoalCommands) -> LedgerResult<()> {
    let service = GoalService::new(storage);

    match cmd {
        GoalCommands::Create {
            name,
            target,
            saved,
            deadline,
        } => {
            let goal = service.create(
                owner,
                GoalInput {
                    name,
                    target_amount: parse_money("target", &target)?,
                    current_amount: parse_money("saved amount", &saved)?,
                    deadline: parse_date("deadline", &deadline)?,
                },
            )?;

            println!("Created goal: {}", goal.name);
            println!("  Target: {} by {}", goal.target_amount, goal.deadline);
            println!("  ID: {}", goal.id.as_uuid());
        }

        GoalCommands::List => {
            let goals = service.list(owner)?;
            print!("{}", format_goal_list(&goals));
        }

        GoalCommands::Show { goal } => {
            let found = service.find(owner, &goal)?;
            print!("{}", format_goal_details(&found));
        }

        GoalCommands::Edit {
            goal,
            name,
            target,
            saved,
            deadline,
        } => {
            let found = service.find(owner, &goal)?;
            let mut input = GoalInput::from_existing(&found);

            if let Some(name) = name {
                input.name = name;
            }
            if let Some(target) = target {
                input.target_amount = parse_money("target", &target)?;
            }
            if let Some(saved) = saved {
                input.current_amount = parse_money("saved amount", &saved)?;
            }
            if let Some(deadline) = deadline {
                input.deadline = parse_date("deadline", &deadline)?;
            }

            let updated = service.update(found.id, owner, input)?;
            println!("Updated goal: {}", updated.name);
        }

        GoalCommands::Contribute { goal, amount } => {
            let found = service.find(owner, &goal)?;
            let amount: Money = parse_money("amount", &amount)?;
            let updated = service.add_contribution(found.id, owner, amount)?;

            println!(
                "Added {} to {}: {} of {}",
                amount, updated.name, updated.current_amount, updated.target_amount
            );
            if updated.is_completed() {
                println!("Goal reached!");
            }
        }

        GoalCommands::Delete { goal } => {
            let found = service.find(owner, &goal)?;
            let deleted = service.delete(found.id, owner)?;
            println!("Deleted goal: {}", deleted.name);
        }
    }

    Ok(())
}
