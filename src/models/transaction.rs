//! Transaction model
//!
//! A transaction moves money into or out of a single account. The stored
//! amount is signed by its kind (income positive, expense negative) and the
//! kind never changes after creation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, CategoryId, TransactionId, UserId};
use super::kind::EntryKind;
use super::money::Money;
use super::Owned;

/// A recorded transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// Owner of the account this transaction belongs to
    pub owner_id: UserId,

    /// The account this transaction belongs to
    pub account_id: AccountId,

    /// The category this transaction is assigned to
    pub category_id: CategoryId,

    /// Signed amount (positive for income, negative for expense)
    pub amount: Money,

    /// Transaction date
    pub date: NaiveDate,

    /// Free-text description
    #[serde(default)]
    pub description: String,

    /// Income or expense, fixed at creation
    pub kind: EntryKind,

    /// When the transaction was created
    pub created_at: DateTime<Utc>,

    /// When the transaction was last modified
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction; the sign of `magnitude` is replaced by the kind's sign
    pub fn new(
        owner_id: UserId,
        account_id: AccountId,
        category_id: CategoryId,
        kind: EntryKind,
        magnitude: Money,
        date: NaiveDate,
        description: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            owner_id,
            account_id,
            category_id,
            amount: kind.signed(magnitude),
            date,
            description: description.into(),
            kind,
            created_at: now,
            updated_at: now,
        }
    }

    /// Unsigned size of the transaction
    pub fn magnitude(&self) -> Money {
        self.amount.abs()
    }

    pub fn is_income(&self) -> bool {
        self.kind == EntryKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == EntryKind::Expense
    }

    /// Validate the transaction
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if self.amount.is_zero() {
            return Err(TransactionValidationError::ZeroAmount);
        }

        if !self.kind.matches_sign(self.amount) {
            return Err(TransactionValidationError::SignMismatch {
                kind: self.kind,
                amount: self.amount,
            });
        }

        Ok(())
    }
}

impl Owned for Transaction {
    type Id = TransactionId;

    fn id(&self) -> TransactionId {
        self.id
    }

    fn owner_id(&self) -> UserId {
        self.owner_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.date, self.amount, self.description)
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    ZeroAmount,
    SignMismatch { kind: EntryKind, amount: Money },
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroAmount => write!(f, "Transaction amount must be positive"),
            Self::SignMismatch { kind, amount } => {
                write!(f, "Amount {} does not match {} transaction", amount, kind)
            }
        }
    }
}

impl std::error::Error for TransactionValidationError {}
