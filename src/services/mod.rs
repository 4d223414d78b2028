//! Service layer for finledger
//!
//! The service layer holds the ledger's rules on top of the storage layer:
//! validation, ownership checks, and the cross-entity operations that keep
//! account balances consistent with their transactions.

pub mod account;
pub mod budget;
pub mod category;
pub mod clock;
pub mod goal;
pub mod report;
pub mod transaction;
pub mod user;

pub use account::{AccountService, AccountUpdate};
pub use budget::{BudgetInput, BudgetService};
pub use category::CategoryService;
pub use clock::{Clock, FixedClock, SystemClock};
pub use goal::{GoalInput, GoalService};
pub use report::ReportService;
pub use transaction::{
    CreateTransactionInput, TransactionFilter, TransactionService, UpdateTransactionInput,
};
pub use user::UserService;
