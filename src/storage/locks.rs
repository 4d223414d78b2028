//! Per-account lock table
//!
//! Ledger writes hold the locks of every account they touch for the whole
//! read-validate-write sequence. All ids are taken in one step, so two
//! writers touching overlapping accounts can never deadlock.

use std::collections::HashSet;
use std::sync::{Condvar, Mutex};

use crate::error::{LedgerError, LedgerResult};
use crate::models::AccountId;

/// Set of currently locked accounts
#[derive(Debug, Default)]
pub struct AccountLocks {
    held: Mutex<HashSet<AccountId>>,
    released: Condvar,
}

impl AccountLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until every account in `ids` is free, then lock them all
    pub fn acquire(&self, ids: &[AccountId]) -> LedgerResult<AccountLockGuard<'_>> {
        let mut wanted = ids.to_vec();
        wanted.sort();
        wanted.dedup();

        let mut held = self.held.lock().map_err(LedgerError::lock_poisoned)?;
        while wanted.iter().any(|id| held.contains(id)) {
            held = self
                .released
                .wait(held)
                .map_err(LedgerError::lock_poisoned)?;
        }
        held.extend(wanted.iter().copied());

        Ok(AccountLockGuard {
            locks: self,
            ids: wanted,
        })
    }

    /// Whether `id` is currently locked by anyone
    pub fn is_locked(&self, id: AccountId) -> LedgerResult<bool> {
        let held = self.held.lock().map_err(LedgerError::lock_poisoned)?;
        Ok(held.contains(&id))
    }
}

/// Proof that a set of accounts is locked; releases them on drop
#[derive(Debug)]
pub struct AccountLockGuard<'a> {
    locks: &'a AccountLocks,
    ids: Vec<AccountId>,
}

impl AccountLockGuard<'_> {
    /// Whether this guard holds `id`
    pub fn covers(&self, id: AccountId) -> bool {
        self.ids.binary_search(&id).is_ok()
    }
}

impl Drop for AccountLockGuard<'_> {
    fn drop(&mut self) {
        // Release even after a panic elsewhere poisoned the mutex
        let mut held = match self.locks.held.lock() {
            Ok(held) => held,
            Err(poisoned) => poisoned.into_inner(),
        };
        for id in &self.ids {
            held.remove(id);
        }
        drop(held);
        self.locks.released.notify_all();
    }
}
