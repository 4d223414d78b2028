//! Account model
//!
//! A user-owned account whose balance moves only through the ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, UserId};
use super::money::Money;
use super::Owned;

/// A financial account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier
    pub id: AccountId,

    /// The user that owns this account
    pub owner_id: UserId,

    /// Account name (e.g., "Chase Checking")
    pub name: String,

    /// Free-text account type (e.g., "Checking", "Savings", "Credit Card")
    #[serde(rename = "type")]
    pub account_type: String,

    /// Current balance: opening balance plus the signed sum of live transactions
    pub balance: Money,

    /// Balance the account was opened with
    #[serde(default)]
    pub opening_balance: Money,

    /// Whether the account is active
    pub active: bool,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last modified
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new active account with an opening balance
    pub fn new(
        owner_id: UserId,
        name: impl Into<String>,
        account_type: impl Into<String>,
        opening_balance: Money,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: AccountId::new(),
            owner_id,
            name: name.into(),
            account_type: account_type.into(),
            balance: opening_balance,
            opening_balance,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a signed delta to the balance
    ///
    /// Leaves the account untouched if the new balance would overflow.
    pub(crate) fn apply_delta(&mut self, delta: Money) -> Result<(), AccountValidationError> {
        self.balance = self
            .balance
            .checked_add(delta)
            .ok_or(AccountValidationError::BalanceOverflow)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Validate the account
    pub fn validate(&self) -> Result<(), AccountValidationError> {
        if self.name.trim().is_empty() {
            return Err(AccountValidationError::EmptyName);
        }

        if self.name.len() > 100 {
            return Err(AccountValidationError::NameTooLong(self.name.len()));
        }

        if self.account_type.trim().is_empty() {
            return Err(AccountValidationError::EmptyType);
        }

        if self.opening_balance.is_negative() {
            return Err(AccountValidationError::NegativeOpeningBalance);
        }

        Ok(())
    }
}

impl Owned for Account {
    type Id = AccountId;

    fn id(&self) -> AccountId {
        self.id
    }

    fn owner_id(&self) -> UserId {
        self.owner_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.account_type)
    }
}

/// Validation errors for accounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    EmptyName,
    NameTooLong(usize),
    EmptyType,
    NegativeOpeningBalance,
    BalanceOverflow,
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Account name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Account name too long ({} chars, max 100)", len)
            }
            Self::EmptyType => write!(f, "Account type cannot be empty"),
            Self::NegativeOpeningBalance => write!(f, "Initial balance cannot be negative"),
            Self::BalanceOverflow => write!(f, "Balance would exceed the supported range"),
        }
    }
}

impl std::error::Error for AccountValidationError {}
