//! Account service
//!
//! Per-user accounts. The balance is owned by the ledger: outside this
//! module it only moves through [`AccountService::adjust_balance`], which
//! requires proof that the caller holds the account's lock.

use tracing::{debug, info};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Account, AccountId, Money, UserId};
use crate::storage::{AccountLockGuard, Storage};

/// Service for account management
pub struct AccountService<'a> {
    storage: &'a Storage,
}

/// Fields that may change on an existing account
#[derive(Debug, Clone, Default)]
pub struct AccountUpdate {
    pub name: Option<String>,
    pub account_type: Option<String>,
    pub active: Option<bool>,
}

impl<'a> AccountService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Open a new account for `owner`
    pub fn create(
        &self,
        owner: UserId,
        name: &str,
        initial_balance: Money,
        account_type: &str,
    ) -> LedgerResult<Account> {
        self.storage.users.require(owner)?;

        let account = Account::new(owner, name.trim(), account_type.trim(), initial_balance);
        account.validate().map_err(|e| {
            debug!(owner = %owner, error = %e, "rejected account");
            LedgerError::Validation(e.to_string())
        })?;

        self.storage.accounts.commit_put(account.clone())?;

        info!(
            account_id = %account.id,
            owner = %owner,
            balance = %account.balance,
            "created account"
        );
        Ok(account)
    }

    /// Get one of `owner`'s accounts
    pub fn get(&self, id: AccountId, owner: UserId) -> LedgerResult<Account> {
        self.storage.users.require(owner)?;
        self.resolve(id, owner)
    }

    /// Find one of `owner`'s accounts by ID string or name (case-insensitive)
    pub fn find(&self, owner: UserId, identifier: &str) -> LedgerResult<Account> {
        if let Ok(id) = identifier.parse::<AccountId>() {
            return self.get(id, owner);
        }

        let wanted = identifier.trim().to_lowercase();
        self.list(owner)?
            .into_iter()
            .find(|a| a.name.to_lowercase() == wanted)
            .ok_or_else(|| LedgerError::account_not_found(identifier.to_string()))
    }

    /// All of `owner`'s accounts, oldest first
    pub fn list(&self, owner: UserId) -> LedgerResult<Vec<Account>> {
        self.storage.users.require(owner)?;
        self.storage.accounts.list(owner)
    }

    /// Sum of the balances of `owner`'s active accounts
    pub fn total_balance(&self, owner: UserId) -> LedgerResult<Money> {
        Ok(self
            .list(owner)?
            .iter()
            .filter(|a| a.active)
            .map(|a| a.balance)
            .sum())
    }

    /// Rename, retype or (de)activate an account
    pub fn update(&self, id: AccountId, owner: UserId, changes: AccountUpdate) -> LedgerResult<Account> {
        self.storage.users.require(owner)?;
        self.resolve(id, owner)?;

        let _guard = self.storage.lock_accounts(&[id])?;
        let mut account = self.resolve(id, owner)?;

        if let Some(name) = changes.name {
            account.name = name.trim().to_string();
        }
        if let Some(account_type) = changes.account_type {
            account.account_type = account_type.trim().to_string();
        }
        if let Some(active) = changes.active {
            account.active = active;
        }

        account
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        account.updated_at = chrono::Utc::now();
        self.storage.accounts.commit_put(account.clone())?;

        info!(account_id = %id, owner = %owner, "updated account");
        Ok(account)
    }

    /// Delete an account whose balance is exactly zero
    ///
    /// Its transactions stay in the ledger for reporting; the ledger can
    /// still edit or delete them, with no balance effect on the removed
    /// account.
    pub fn delete(&self, id: AccountId, owner: UserId) -> LedgerResult<Account> {
        self.storage.users.require(owner)?;
        self.resolve(id, owner)?;

        let _guard = self.storage.lock_accounts(&[id])?;
        let account = self.resolve(id, owner)?;

        if !account.balance.is_zero() {
            debug!(account_id = %id, balance = %account.balance, "refused to delete account");
            return Err(LedgerError::Validation(format!(
                "Cannot delete account with non-zero balance. Balance: {}",
                account.balance
            )));
        }

        self.storage.accounts.commit_remove(owner, id)?;

        info!(account_id = %id, owner = %owner, "deleted account");
        Ok(account)
    }

    /// Apply a signed delta to an account's balance
    ///
    /// The guard must cover `id`; this is the only path by which the ledger
    /// changes a balance.
    pub(crate) fn adjust_balance(
        &self,
        guard: &AccountLockGuard<'_>,
        id: AccountId,
        owner: UserId,
        delta: Money,
    ) -> LedgerResult<Account> {
        if !guard.covers(id) {
            return Err(LedgerError::Storage(format!(
                "Balance change on account {} without holding its lock",
                id
            )));
        }

        let mut account = self.resolve(id, owner)?;
        account.apply_delta(delta).map_err(|e| {
            debug!(account_id = %id, delta = %delta, "rejected balance change");
            LedgerError::Validation(e.to_string())
        })?;
        self.storage.accounts.put(account.clone())?;

        debug!(account_id = %id, delta = %delta, balance = %account.balance, "adjusted balance");
        Ok(account)
    }

    /// Look up an account in `owner`'s partition
    ///
    /// A row filed under `owner` but recording a different owner means the
    /// store is inconsistent; it is refused rather than returned.
    pub(crate) fn resolve(&self, id: AccountId, owner: UserId) -> LedgerResult<Account> {
        let account = self
            .storage
            .accounts
            .get(owner, id)?
            .ok_or_else(|| LedgerError::account_not_found(id.to_string()))?;

        if account.owner_id != owner {
            return Err(LedgerError::Authorization(format!(
                "Account {} does not belong to user {}",
                id, owner
            )));
        }
        Ok(account)
    }
}
