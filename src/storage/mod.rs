//! Storage layer for finledger
//!
//! Each entity kind sits behind a store trait, so the services never depend
//! on how data is kept. The default backends hold everything in memory and,
//! when opened on a directory, persist each store as a JSON file with atomic
//! writes.

pub mod categories;
pub mod file_io;
pub mod locks;
pub mod partition;
pub mod users;

pub use categories::{CategoryRepository, CategoryStore};
pub use file_io::StoreFile;
pub use locks::{AccountLockGuard, AccountLocks};
pub use partition::{JsonPartitionRepository, PartitionStore};
pub use users::{UserDirectory, UserRepository};

use std::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::paths::LedgerPaths;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Account, AccountId, Budget, FinancialGoal, Transaction};

/// The set of backends a `Storage` is assembled from
pub struct Stores {
    pub users: Box<dyn UserDirectory>,
    pub categories: Box<dyn CategoryStore>,
    pub accounts: Box<dyn PartitionStore<Account>>,
    pub transactions: Box<dyn PartitionStore<Transaction>>,
    pub budgets: Box<dyn PartitionStore<Budget>>,
    pub goals: Box<dyn PartitionStore<FinancialGoal>>,
}

impl Stores {
    /// Memory-only backends
    pub fn in_memory() -> Self {
        Self {
            users: Box::new(UserRepository::in_memory()),
            categories: Box::new(CategoryRepository::in_memory()),
            accounts: Box::new(JsonPartitionRepository::in_memory()),
            transactions: Box::new(JsonPartitionRepository::in_memory()),
            budgets: Box::new(JsonPartitionRepository::in_memory()),
            goals: Box::new(JsonPartitionRepository::in_memory()),
        }
    }

    /// JSON-file backends under `paths`
    pub fn json(paths: &LedgerPaths) -> Self {
        Self {
            users: Box::new(UserRepository::new(paths.users_file())),
            categories: Box::new(CategoryRepository::new(paths.categories_file())),
            accounts: Box::new(JsonPartitionRepository::new(paths.accounts_file())),
            transactions: Box::new(JsonPartitionRepository::new(paths.transactions_file())),
            budgets: Box::new(JsonPartitionRepository::new(paths.budgets_file())),
            goals: Box::new(JsonPartitionRepository::new(paths.goals_file())),
        }
    }
}

/// Main storage coordinator shared by all services
pub struct Storage {
    paths: Option<LedgerPaths>,
    pub users: Box<dyn UserDirectory>,
    pub categories: Box<dyn CategoryStore>,
    pub accounts: Box<dyn PartitionStore<Account>>,
    pub transactions: Box<dyn PartitionStore<Transaction>>,
    pub budgets: Box<dyn PartitionStore<Budget>>,
    pub goals: Box<dyn PartitionStore<FinancialGoal>>,
    account_locks: AccountLocks,
    /// Write side held by category mutations; read side by writers that
    /// depend on a category staying as validated until they commit
    registry: RwLock<()>,
    /// Serializes budget read-modify-write sequences
    budget_writes: Mutex<()>,
    /// Serializes goal read-modify-write sequences
    goal_writes: Mutex<()>,
}

impl Storage {
    /// Assemble storage from arbitrary backends
    pub fn with_stores(stores: Stores) -> Self {
        Self {
            paths: None,
            users: stores.users,
            categories: stores.categories,
            accounts: stores.accounts,
            transactions: stores.transactions,
            budgets: stores.budgets,
            goals: stores.goals,
            account_locks: AccountLocks::new(),
            registry: RwLock::new(()),
            budget_writes: Mutex::new(()),
            goal_writes: Mutex::new(()),
        }
    }

    /// Storage that lives only for the life of the process
    pub fn in_memory() -> Self {
        Self::with_stores(Stores::in_memory())
    }

    /// Open JSON-backed storage under `paths`, loading any existing data
    pub fn open(paths: LedgerPaths) -> LedgerResult<Self> {
        paths.ensure_directories()?;

        let mut storage = Self::with_stores(Stores::json(&paths));
        storage.paths = Some(paths);
        storage.load_all()?;
        Ok(storage)
    }

    /// Paths of a file-backed storage
    pub fn paths(&self) -> Option<&LedgerPaths> {
        self.paths.as_ref()
    }

    /// Reload every store from its backend
    pub fn load_all(&self) -> LedgerResult<()> {
        self.users.load()?;
        self.categories.load()?;
        self.accounts.load()?;
        self.transactions.load()?;
        self.budgets.load()?;
        self.goals.load()?;
        Ok(())
    }

    /// Flush every store to its backend
    pub fn save_all(&self) -> LedgerResult<()> {
        self.users.save()?;
        self.categories.save()?;
        self.accounts.save()?;
        self.transactions.save()?;
        self.budgets.save()?;
        self.goals.save()?;
        Ok(())
    }

    /// Lock a set of accounts for a read-validate-write sequence
    pub(crate) fn lock_accounts(&self, ids: &[AccountId]) -> LedgerResult<AccountLockGuard<'_>> {
        self.account_locks.acquire(ids)
    }

    /// Shared access to the category registry
    pub(crate) fn registry_read(&self) -> LedgerResult<RwLockReadGuard<'_, ()>> {
        self.registry.read().map_err(LedgerError::lock_poisoned)
    }

    /// Exclusive access to budget mutations
    pub(crate) fn lock_budgets(&self) -> LedgerResult<MutexGuard<'_, ()>> {
        self.budget_writes.lock().map_err(LedgerError::lock_poisoned)
    }

    /// Exclusive access to goal mutations
    pub(crate) fn lock_goals(&self) -> LedgerResult<MutexGuard<'_, ()>> {
        self.goal_writes.lock().map_err(LedgerError::lock_poisoned)
    }

    /// Exclusive access to the category registry
    pub(crate) fn registry_write(&self) -> LedgerResult<RwLockWriteGuard<'_, ()>> {
        self.registry.write().map_err(LedgerError::lock_poisoned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, User};
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(storage.paths().is_some());
    }

    #[test]
    fn test_save_all_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        let user = User::new("dana");
        let account = Account::new(user.id, "Checking", "Checking", Money::from_cents(500));
        {
            let storage = Storage::open(paths.clone()).unwrap();
            storage.users.insert(user.clone()).unwrap();
            storage.accounts.put(account.clone()).unwrap();
            storage.save_all().unwrap();
        }

        let storage = Storage::open(paths).unwrap();
        assert!(storage.users.exists(user.id).unwrap());
        assert_eq!(storage.accounts.get(user.id, account.id).unwrap(), Some(account));
    }

    #[test]
    fn test_in_memory_has_no_paths() {
        let storage = Storage::in_memory();
        assert!(storage.paths().is_none());
        assert!(storage.users.list().unwrap().is_empty());
    }
}
