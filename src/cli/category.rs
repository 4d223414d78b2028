//! Category CLI commands
//!
//! The category registry is shared by all users, so these commands do not
//! take an acting user.

use clap::Subcommand;

use crate::display::category::{
    format_category_details, format_category_list, format_category_tree,
};
use crate::error::LedgerResult;
use crate::services::CategoryService;
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// Create a new category
    Create {
        /// Category name
        name: String,
        /// Kind: income or expense
        #[arg(short, long)]
        kind: String,
        /// Optional icon
        #[arg(short, long, default_value = "")]
        icon: String,
    },
    /// List categories
    List {
        /// Show as a tree grouped by kind
        #[arg(long)]
        tree: bool,
    },
    /// Show category details
    Show {
        /// Category name or ID
        category: String,
    },
    /// Edit a category
    Edit {
        /// Category name or ID
        category: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New kind
        #[arg(short, long)]
        kind: Option<String>,
        /// New icon
        #[arg(short, long)]
        icon: Option<String>,
    },
    /// Delete an unused category
    Delete {
        /// Category name or ID
        category: String,
    },
}

/// Handle a category command
pub fn handle_category_command(storage: &Storage, cmd: CategoryCommands) -> LedgerResult<()> {
    let service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::Create { name, kind, icon } => {
            let category = service.create(&name, &kind, &icon)?;
            println!("Created category: {} ({})", category.name, category.kind);
            println!("  ID: {}", category.id.as_uuid());
        }

        CategoryCommands::List { tree } => {
            let categories = service.list()?;
            if tree {
                print!("{}", format_category_tree(&categories));
            } else {
                print!("{}", format_category_list(&categories));
            }
        }

        CategoryCommands::Show { category } => {
            let found = service.find(&category)?;
            print!("{}", format_category_details(&found));
        }

        CategoryCommands::Edit {
            category,
            name,
            kind,
            icon,
        } => {
            let found = service.find(&category)?;

            if name.is_none() && kind.is_none() && icon.is_none() {
                println!("No changes specified. Use --name, --kind or --icon.");
                return Ok(());
            }

            let updated =
                service.update(found.id, name.as_deref(), kind.as_deref(), icon.as_deref())?;
            println!("Updated category: {} ({})", updated.name, updated.kind);
        }

        CategoryCommands::Delete { category } => {
            let found = service.find(&category)?;
            let deleted = service.delete(found.id)?;
            println!("Deleted category: {}", deleted.name);
        }
    }

    Ok(())
}
