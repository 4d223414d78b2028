//! Core data models for finledger
//!
//! Users, accounts, categories, transactions, budgets and savings goals.

pub mod account;
pub mod budget;
pub mod category;
pub mod goal;
pub mod ids;
pub mod kind;
pub mod money;
pub mod period;
pub mod transaction;
pub mod user;

pub use account::Account;
pub use budget::Budget;
pub use category::Category;
pub use goal::FinancialGoal;
pub use ids::{AccountId, BudgetId, CategoryId, GoalId, IdParseError, TransactionId, UserId};
pub use kind::EntryKind;
pub use money::Money;
pub use period::DateRange;
pub use transaction::Transaction;
pub use user::User;

/// An entity that lives in its owner's partition
pub trait Owned {
    type Id: Copy + Eq + Ord + std::hash::Hash + std::fmt::Display;

    fn id(&self) -> Self::Id;

    fn owner_id(&self) -> UserId;

    /// Creation time, used to list a partition in a stable order
    fn created_at(&self) -> chrono::DateTime<chrono::Utc>;
}
