//! Display formatting for terminal output
//!
//! Provides utilities for formatting data models for terminal display,
//! including tables, trees and progress bars.

pub mod account;
pub mod budget;
pub mod category;
pub mod goal;
pub mod transaction;

pub use account::{format_account_details, format_account_list};
pub use budget::{format_budget_details, format_budget_list};
pub use category::{format_category_details, format_category_list, format_category_tree};
pub use goal::{format_goal_details, format_goal_list};
pub use transaction::{format_transaction_details, format_transaction_register};
