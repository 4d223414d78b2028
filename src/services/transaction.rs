//! Transaction service
//!
//! The ledger. Every mutation writes the transaction record and moves the
//! affected account balances as one unit, under the locks of every account
//! involved. If any step of a unit fails, including flushing it to disk,
//! the earlier steps are undone before the error is returned, so callers
//! never observe a record without its balance effect.
//!
//! A transaction may outlive its account: accounts are deleted once their
//! balance is zero, and their transactions stay behind for reporting. Such
//! a transaction can still be edited or deleted; the missing account simply
//! takes no balance change.

use chrono::{NaiveDate, Utc};
use tracing::{debug, error, info, warn};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    Account, AccountId, Category, CategoryId, DateRange, EntryKind, Money, Transaction,
    TransactionId, UserId,
};
use crate::storage::Storage;

use super::account::AccountService;
use super::category::parse_kind;

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

/// Options for filtering transactions; all set filters must match
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Filter by account
    pub account_id: Option<AccountId>,
    /// Filter by category
    pub category_id: Option<CategoryId>,
    /// Filter by date range (inclusive)
    pub date_range: Option<DateRange>,
    /// Filter by kind
    pub kind: Option<EntryKind>,
    /// Maximum number of transactions to return
    pub limit: Option<usize>,
}

impl TransactionFilter {
    /// Create a new empty filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by account
    pub fn account(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    /// Filter by category
    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Filter by date range
    pub fn date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    /// Filter by kind
    pub fn kind(mut self, kind: EntryKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Limit results
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether a transaction passes every set filter
    pub fn matches(&self, txn: &Transaction) -> bool {
        self.account_id.map_or(true, |id| txn.account_id == id)
            && self.category_id.map_or(true, |id| txn.category_id == id)
            && self.date_range.map_or(true, |range| range.contains(txn.date))
            && self.kind.map_or(true, |kind| txn.kind == kind)
    }
}

/// Input for recording a new transaction
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    pub account_id: AccountId,
    pub category_id: CategoryId,
    /// Magnitude; the sign is derived from `kind`
    pub amount: Money,
    pub date: NaiveDate,
    pub description: String,
    /// "income" or "expense", case-insensitive
    pub kind: String,
}

/// Replacement values for an existing transaction; the kind is fixed
#[derive(Debug, Clone)]
pub struct UpdateTransactionInput {
    pub account_id: AccountId,
    pub category_id: CategoryId,
    /// Only the magnitude is used
    pub amount: Money,
    pub date: NaiveDate,
    pub description: String,
}

impl UpdateTransactionInput {
    /// Start from a transaction's current values
    pub fn from_existing(txn: &Transaction) -> Self {
        Self {
            account_id: txn.account_id,
            category_id: txn.category_id,
            amount: txn.magnitude(),
            date: txn.date,
            description: txn.description.clone(),
        }
    }
}

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    fn accounts(&self) -> AccountService<'a> {
        AccountService::new(self.storage)
    }

    /// Record a transaction and apply it to its account's balance
    pub fn create(&self, owner: UserId, input: CreateTransactionInput) -> LedgerResult<Transaction> {
        self.storage.users.require(owner)?;
        let accounts = self.accounts();

        // Held until commit so the category cannot change kind or vanish
        let _registry = self.storage.registry_read()?;

        accounts.resolve(input.account_id, owner)?;
        let category = self.category(input.category_id)?;
        let kind = parse_kind(&input.kind)?;

        if !input.amount.is_positive() {
            debug!(owner = %owner, amount = %input.amount, "rejected transaction amount");
            return Err(LedgerError::Validation(format!(
                "Transaction amount must be positive, got {}",
                input.amount
            )));
        }
        ensure_kind_matches(&category, kind)?;

        let guard = self.storage.lock_accounts(&[input.account_id])?;
        // The account may have been deleted while we waited
        let account = accounts.resolve(input.account_id, owner)?;

        let txn = Transaction::new(
            owner,
            input.account_id,
            input.category_id,
            kind,
            input.amount,
            input.date,
            input.description.trim(),
        );
        txn.validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        let result = self
            .storage
            .transactions
            .put(txn.clone())
            .and_then(|_| accounts.adjust_balance(&guard, txn.account_id, owner, txn.amount))
            .and_then(|_| self.persist());

        if let Err(e) = result {
            warn!(txn_id = %txn.id, error = %e, "create failed, rolling back");
            self.rollback("create", || {
                self.storage.transactions.remove(owner, txn.id)?;
                self.restore_accounts(&[account])
            });
            return Err(e);
        }

        info!(
            txn_id = %txn.id,
            account_id = %txn.account_id,
            owner = %owner,
            delta = %txn.amount,
            "recorded transaction"
        );
        Ok(txn)
    }

    /// Get one of `owner`'s transactions
    pub fn get(&self, id: TransactionId, owner: UserId) -> LedgerResult<Transaction> {
        self.storage.users.require(owner)?;
        self.resolve(id, owner)
    }

    /// Find a transaction by ID string
    pub fn find(&self, owner: UserId, identifier: &str) -> LedgerResult<Transaction> {
        let id = identifier
            .parse::<TransactionId>()
            .map_err(|_| LedgerError::transaction_not_found(identifier.to_string()))?;
        self.get(id, owner)
    }

    /// Snapshot of `owner`'s transactions matching `filter`, newest first
    pub fn query(&self, owner: UserId, filter: &TransactionFilter) -> LedgerResult<Vec<Transaction>> {
        self.storage.users.require(owner)?;

        let mut transactions: Vec<Transaction> = self
            .storage
            .transactions
            .list(owner)?
            .into_iter()
            .filter(|t| filter.matches(t))
            .collect();

        transactions.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });

        if let Some(limit) = filter.limit {
            transactions.truncate(limit);
        }

        Ok(transactions)
    }

    /// All transactions on one of `owner`'s accounts, newest first
    pub fn list_for_account(&self, account_id: AccountId, owner: UserId) -> LedgerResult<Vec<Transaction>> {
        self.accounts().get(account_id, owner)?;
        self.query(owner, &TransactionFilter::new().account(account_id))
    }

    /// Replace a transaction's account, category, amount, date and description
    pub fn update(
        &self,
        id: TransactionId,
        owner: UserId,
        input: UpdateTransactionInput,
    ) -> LedgerResult<Transaction> {
        self.storage.users.require(owner)?;
        let accounts = self.accounts();
        let magnitude = input.amount.abs();

        let _registry = self.storage.registry_read()?;

        loop {
            let existing = self.resolve(id, owner)?;
            accounts.resolve(input.account_id, owner)?;
            let category = self.category(input.category_id)?;
            ensure_kind_matches(&category, existing.kind)?;

            if magnitude.is_zero() {
                debug!(txn_id = %id, "rejected zero amount update");
                return Err(LedgerError::Validation(
                    "Transaction amount cannot be zero".into(),
                ));
            }

            let guard = self
                .storage
                .lock_accounts(&[existing.account_id, input.account_id])?;

            let current = self.resolve(id, owner)?;
            if current.account_id != existing.account_id {
                // Moved by a concurrent update; lock the right accounts
                debug!(txn_id = %id, "transaction moved while locking, retrying");
                continue;
            }

            let old_account = self.live_account(current.account_id, owner)?;
            let new_account = accounts.resolve(input.account_id, owner)?;

            let old_signed = current.amount;
            let new_signed = current.kind.signed(magnitude);

            let mut updated = current.clone();
            updated.account_id = input.account_id;
            updated.category_id = input.category_id;
            updated.amount = new_signed;
            updated.date = input.date;
            updated.description = input.description.trim().to_string();
            updated.updated_at = Utc::now();
            updated
                .validate()
                .map_err(|e| LedgerError::Validation(e.to_string()))?;

            // Reverse on the old account, then apply on the new one
            let reversed = match &old_account {
                Some(old) => accounts
                    .adjust_balance(&guard, old.id, owner, -old_signed)
                    .map(drop),
                None => Ok(()),
            };
            let result = reversed
                .and_then(|_| accounts.adjust_balance(&guard, input.account_id, owner, new_signed))
                .and_then(|_| self.storage.transactions.put(updated.clone()))
                .and_then(|_| self.persist());

            if let Err(e) = result {
                warn!(txn_id = %id, error = %e, "update failed, rolling back");
                let snapshots: Vec<Account> = old_account.into_iter().chain([new_account]).collect();
                self.rollback("update", || {
                    self.restore_accounts(&snapshots)?;
                    self.storage.transactions.put(current)
                });
                return Err(e);
            }

            info!(
                txn_id = %id,
                from_account = %existing.account_id,
                to_account = %updated.account_id,
                old_amount = %old_signed,
                new_amount = %new_signed,
                "updated transaction"
            );
            return Ok(updated);
        }
    }

    /// Delete a transaction and reverse its balance effect
    pub fn delete(&self, id: TransactionId, owner: UserId) -> LedgerResult<Transaction> {
        self.storage.users.require(owner)?;
        let accounts = self.accounts();

        loop {
            let existing = self.resolve(id, owner)?;
            let guard = self.storage.lock_accounts(&[existing.account_id])?;

            let current = self.resolve(id, owner)?;
            if current.account_id != existing.account_id {
                debug!(txn_id = %id, "transaction moved while locking, retrying");
                continue;
            }

            let account = self.live_account(current.account_id, owner)?;
            let reversed = match &account {
                Some(account) => accounts
                    .adjust_balance(&guard, account.id, owner, -current.amount)
                    .map(drop),
                None => Ok(()),
            };
            let result = reversed
                .and_then(|_| self.storage.transactions.remove(owner, id).map(drop))
                .and_then(|_| self.persist());

            if let Err(e) = result {
                warn!(txn_id = %id, error = %e, "delete failed, rolling back");
                let snapshots: Vec<Account> = account.into_iter().collect();
                self.rollback("delete", || {
                    self.restore_accounts(&snapshots)?;
                    self.storage.transactions.put(current)
                });
                return Err(e);
            }

            info!(
                txn_id = %id,
                account_id = %current.account_id,
                owner = %owner,
                delta = %(-current.amount),
                "deleted transaction"
            );
            return Ok(current);
        }
    }

    /// Number of `owner`'s transactions
    pub fn count(&self, owner: UserId) -> LedgerResult<usize> {
        Ok(self.query(owner, &TransactionFilter::new())?.len())
    }

    fn resolve(&self, id: TransactionId, owner: UserId) -> LedgerResult<Transaction> {
        let txn = self
            .storage
            .transactions
            .get(owner, id)?
            .ok_or_else(|| LedgerError::transaction_not_found(id.to_string()))?;

        if txn.owner_id != owner {
            return Err(LedgerError::Authorization(format!(
                "Transaction {} does not belong to user {}",
                id, owner
            )));
        }
        Ok(txn)
    }

    fn category(&self, id: CategoryId) -> LedgerResult<Category> {
        self.storage
            .categories
            .get(id)?
            .ok_or_else(|| LedgerError::category_not_found(id.to_string()))
    }

    /// The transaction's account, or `None` once it has been deleted
    fn live_account(&self, id: AccountId, owner: UserId) -> LedgerResult<Option<Account>> {
        match self.accounts().resolve(id, owner) {
            Ok(account) => Ok(Some(account)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn restore_accounts(&self, snapshots: &[Account]) -> LedgerResult<()> {
        for account in snapshots {
            self.storage.accounts.put(account.clone())?;
        }
        Ok(())
    }

    /// Put memory back to its state before a failed unit, then re-flush so
    /// a store that did reach the disk matches memory again
    fn rollback(&self, operation: &str, restore: impl FnOnce() -> LedgerResult<()>) {
        if let Err(e) = restore() {
            error!(operation, error = %e, "rollback failed");
            return;
        }
        if let Err(e) = self.persist() {
            warn!(operation, error = %e, "rolled back in memory; files keep their last good state");
        }
    }

    fn persist(&self) -> LedgerResult<()> {
        self.storage.transactions.save()?;
        self.storage.accounts.save()
    }
}

fn ensure_kind_matches(category: &Category, kind: EntryKind) -> LedgerResult<()> {
    if category.kind != kind {
        debug!(category_id = %category.id, category_kind = %category.kind, kind = %kind, "kind mismatch");
        return Err(LedgerError::Validation(format!(
            "Category '{}' is an {} category but the transaction is {}",
            category.name, category.kind, kind
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LedgerPaths;
    use crate::models::User;
    use crate::services::CategoryService;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    struct Fixture {
        storage: Storage,
        owner: UserId,
    }

    impl Fixture {
        fn new() -> Self {
            Self::with_storage(Storage::in_memory())
        }

        fn on_disk(dir: &TempDir) -> Self {
            let paths = LedgerPaths::with_base_dir(dir.path().to_path_buf());
            Self::with_storage(Storage::open(paths).unwrap())
        }

        fn with_storage(storage: Storage) -> Self {
            let owner = storage.users.insert(User::new("alice")).unwrap().id;
            Self { storage, owner }
        }

        /// Put a directory where the transactions file goes, so every
        /// flush of the ledger fails
        fn block_transactions_file(&self) {
            let path = self.storage.paths().unwrap().transactions_file();
            let _ = std::fs::remove_file(&path);
            std::fs::create_dir(&path).unwrap();
        }

        fn account(&self, name: &str, balance: Money) -> Account {
            AccountService::new(&self.storage)
                .create(self.owner, name, balance, "Checking")
                .unwrap()
        }

        fn category(&self, name: &str, kind: &str) -> Category {
            CategoryService::new(&self.storage)
                .create(name, kind, "")
                .unwrap()
        }

        fn balance(&self, id: AccountId) -> Money {
            AccountService::new(&self.storage)
                .get(id, self.owner)
                .unwrap()
                .balance
        }

        fn input(&self, account: &Account, category: &Category, amount: Money) -> CreateTransactionInput {
            CreateTransactionInput {
                account_id: account.id,
                category_id: category.id,
                amount,
                date: date(2025, 1, 15),
                description: "test".into(),
                kind: category.kind.as_str().into(),
            }
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_income_raises_balance() {
        let fx = Fixture::new();
        let account = fx.account("Checking", Money::new(dec!(1000.00)));
        let salary = fx.category("Salary", "income");
        let service = TransactionService::new(&fx.storage);

        let txn = service
            .create(fx.owner, fx.input(&account, &salary, Money::new(dec!(2500.00))))
            .unwrap();

        assert_eq!(txn.amount, Money::new(dec!(2500)));
        assert_eq!(fx.balance(account.id), Money::new(dec!(3500.00)));
        assert_eq!(service.get(txn.id, fx.owner).unwrap(), txn);
    }

    #[test]
    fn test_expense_round_trip_is_exact() {
        let fx = Fixture::new();
        let account = fx.account("Checking", Money::new(dec!(100.10)));
        let food = fx.category("Food", "expense");
        let service = TransactionService::new(&fx.storage);

        let txn = service
            .create(fx.owner, fx.input(&account, &food, Money::new(dec!(0.3))))
            .unwrap();
        assert_eq!(txn.amount, Money::new(dec!(-0.30)));
        assert_eq!(fx.balance(account.id), Money::new(dec!(99.80)));

        service.delete(txn.id, fx.owner).unwrap();
        assert_eq!(fx.balance(account.id), Money::new(dec!(100.10)));
        assert!(service.get(txn.id, fx.owner).unwrap_err().is_not_found());
    }

    #[test]
    fn test_create_rejects_kind_mismatch() {
        let fx = Fixture::new();
        let account = fx.account("Checking", Money::zero());
        let food = fx.category("Food", "expense");
        let service = TransactionService::new(&fx.storage);

        let mut input = fx.input(&account, &food, Money::from_cents(500));
        input.kind = "income".into();

        assert!(service.create(fx.owner, input).unwrap_err().is_validation());
        assert_eq!(fx.balance(account.id), Money::zero());
        assert_eq!(service.count(fx.owner).unwrap(), 0);
    }

    #[test]
    fn test_create_rejects_bad_input() {
        let fx = Fixture::new();
        let account = fx.account("Checking", Money::zero());
        let food = fx.category("Food", "expense");
        let service = TransactionService::new(&fx.storage);

        let zero = fx.input(&account, &food, Money::zero());
        assert!(service.create(fx.owner, zero).unwrap_err().is_validation());

        let negative = fx.input(&account, &food, Money::from_cents(-100));
        assert!(service.create(fx.owner, negative).unwrap_err().is_validation());

        let mut bad_kind = fx.input(&account, &food, Money::from_cents(100));
        bad_kind.kind = "transfer".into();
        assert!(service.create(fx.owner, bad_kind).unwrap_err().is_validation());

        let mut missing_category = fx.input(&account, &food, Money::from_cents(100));
        missing_category.category_id = CategoryId::new();
        assert!(service
            .create(fx.owner, missing_category)
            .unwrap_err()
            .is_not_found());

        let mut missing_account = fx.input(&account, &food, Money::from_cents(100));
        missing_account.account_id = AccountId::new();
        assert!(service
            .create(fx.owner, missing_account)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_cannot_post_to_other_users_account() {
        let fx = Fixture::new();
        let bob = fx.storage.users.insert(User::new("bob")).unwrap().id;
        let account = fx.account("Checking", Money::zero());
        let food = fx.category("Food", "expense");
        let service = TransactionService::new(&fx.storage);

        let err = service
            .create(bob, fx.input(&account, &food, Money::from_cents(100)))
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(fx.balance(account.id), Money::zero());
    }

    #[test]
    fn test_update_moves_between_accounts() {
        let fx = Fixture::new();
        let checking = fx.account("Checking", Money::new(dec!(500)));
        let savings = fx.account("Savings", Money::new(dec!(200)));
        let food = fx.category("Food", "expense");
        let service = TransactionService::new(&fx.storage);

        let txn = service
            .create(fx.owner, fx.input(&checking, &food, Money::new(dec!(50))))
            .unwrap();
        assert_eq!(fx.balance(checking.id), Money::new(dec!(450)));

        let mut change = UpdateTransactionInput::from_existing(&txn);
        change.account_id = savings.id;
        change.amount = Money::new(dec!(-75)); // magnitude is used
        let updated = service.update(txn.id, fx.owner, change).unwrap();

        assert_eq!(updated.amount, Money::new(dec!(-75)));
        assert_eq!(updated.kind, EntryKind::Expense);
        assert_eq!(fx.balance(checking.id), Money::new(dec!(500)));
        assert_eq!(fx.balance(savings.id), Money::new(dec!(125)));
    }

    #[test]
    fn test_update_same_account_nets_out() {
        let fx = Fixture::new();
        let account = fx.account("Checking", Money::new(dec!(100)));
        let salary = fx.category("Salary", "income");
        let service = TransactionService::new(&fx.storage);

        let txn = service
            .create(fx.owner, fx.input(&account, &salary, Money::new(dec!(10))))
            .unwrap();

        let mut change = UpdateTransactionInput::from_existing(&txn);
        change.amount = Money::new(dec!(25.50));
        service.update(txn.id, fx.owner, change).unwrap();

        assert_eq!(fx.balance(account.id), Money::new(dec!(125.50)));
    }

    #[test]
    fn test_update_rejects_kind_change_and_zero() {
        let fx = Fixture::new();
        let account = fx.account("Checking", Money::zero());
        let food = fx.category("Food", "expense");
        let salary = fx.category("Salary", "income");
        let service = TransactionService::new(&fx.storage);

        let txn = service
            .create(fx.owner, fx.input(&account, &food, Money::from_cents(100)))
            .unwrap();

        let mut to_income = UpdateTransactionInput::from_existing(&txn);
        to_income.category_id = salary.id;
        assert!(service
            .update(txn.id, fx.owner, to_income)
            .unwrap_err()
            .is_validation());

        let mut zero = UpdateTransactionInput::from_existing(&txn);
        zero.amount = Money::zero();
        assert!(service
            .update(txn.id, fx.owner, zero)
            .unwrap_err()
            .is_validation());

        assert_eq!(fx.balance(account.id), Money::from_cents(-100));
        assert_eq!(service.get(txn.id, fx.owner).unwrap(), txn);
    }

    #[test]
    fn test_query_filters() {
        let fx = Fixture::new();
        let checking = fx.account("Checking", Money::zero());
        let savings = fx.account("Savings", Money::zero());
        let food = fx.category("Food", "expense");
        let salary = fx.category("Salary", "income");
        let service = TransactionService::new(&fx.storage);

        let mut early = fx.input(&checking, &food, Money::from_cents(100));
        early.date = date(2025, 1, 1);
        let mut late = fx.input(&checking, &salary, Money::from_cents(900));
        late.date = date(2025, 1, 31);
        let mut other = fx.input(&savings, &food, Money::from_cents(300));
        other.date = date(2025, 2, 1);

        let early = service.create(fx.owner, early).unwrap();
        let late = service.create(fx.owner, late).unwrap();
        service.create(fx.owner, other).unwrap();

        let all = service.query(fx.owner, &TransactionFilter::new()).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].date, date(2025, 2, 1));

        let january = DateRange::month(2025, 1).unwrap();
        let in_january = service
            .query(fx.owner, &TransactionFilter::new().date_range(january))
            .unwrap();
        assert_eq!(
            in_january.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![late.id, early.id]
        );

        let checking_expenses = service
            .query(
                fx.owner,
                &TransactionFilter::new()
                    .account(checking.id)
                    .kind(EntryKind::Expense),
            )
            .unwrap();
        assert_eq!(checking_expenses.len(), 1);
        assert_eq!(checking_expenses[0].id, early.id);

        let food_only = service
            .query(fx.owner, &TransactionFilter::new().category(food.id).limit(1))
            .unwrap();
        assert_eq!(food_only.len(), 1);

        assert_eq!(service.list_for_account(savings.id, fx.owner).unwrap().len(), 1);
    }

    #[test]
    fn test_query_is_owner_scoped() {
        let fx = Fixture::new();
        let bob = fx.storage.users.insert(User::new("bob")).unwrap().id;
        let account = fx.account("Checking", Money::zero());
        let food = fx.category("Food", "expense");
        let service = TransactionService::new(&fx.storage);

        let txn = service
            .create(fx.owner, fx.input(&account, &food, Money::from_cents(100)))
            .unwrap();

        assert!(service.query(bob, &TransactionFilter::new()).unwrap().is_empty());
        assert!(service.get(txn.id, bob).unwrap_err().is_not_found());
        assert!(service.delete(txn.id, bob).unwrap_err().is_not_found());
        assert!(service
            .query(UserId::new(), &TransactionFilter::new())
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_failed_flush_rolls_back_create() {
        let dir = TempDir::new().unwrap();
        let fx = Fixture::on_disk(&dir);
        let account = fx.account("Checking", Money::new(dec!(1000)));
        let salary = fx.category("Salary", "income");
        let service = TransactionService::new(&fx.storage);

        fx.block_transactions_file();

        let err = service
            .create(fx.owner, fx.input(&account, &salary, Money::new(dec!(2500))))
            .unwrap_err();
        assert!(matches!(err, LedgerError::Storage(_)));
        assert_eq!(service.count(fx.owner).unwrap(), 0);
        assert_eq!(fx.balance(account.id), Money::new(dec!(1000)));
    }

    #[test]
    fn test_failed_flush_rolls_back_update_and_delete() {
        let dir = TempDir::new().unwrap();
        let fx = Fixture::on_disk(&dir);
        let checking = fx.account("Checking", Money::new(dec!(500)));
        let savings = fx.account("Savings", Money::new(dec!(200)));
        let food = fx.category("Food", "expense");
        let service = TransactionService::new(&fx.storage);

        let txn = service
            .create(fx.owner, fx.input(&checking, &food, Money::new(dec!(50))))
            .unwrap();
        fx.block_transactions_file();

        let mut change = UpdateTransactionInput::from_existing(&txn);
        change.account_id = savings.id;
        change.amount = Money::new(dec!(80));
        assert!(service.update(txn.id, fx.owner, change).is_err());

        assert!(service.delete(txn.id, fx.owner).is_err());

        assert_eq!(service.get(txn.id, fx.owner).unwrap(), txn);
        assert_eq!(fx.balance(checking.id), Money::new(dec!(450)));
        assert_eq!(fx.balance(savings.id), Money::new(dec!(200)));
    }

    #[test]
    fn test_balance_overflow_leaves_no_record() {
        let fx = Fixture::new();
        let vault = fx.account("Vault", Money::new(Decimal::MAX));
        let salary = fx.category("Salary", "income");
        let service = TransactionService::new(&fx.storage);

        let err = service
            .create(fx.owner, fx.input(&vault, &salary, Money::new(Decimal::ONE)))
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(service.count(fx.owner).unwrap(), 0);
        assert_eq!(fx.balance(vault.id), Money::new(Decimal::MAX));
    }

    #[test]
    fn test_transactions_outlive_their_account() {
        let fx = Fixture::new();
        let closing = fx.account("Closing", Money::zero());
        let other = fx.account("Other", Money::new(dec!(10)));
        let salary = fx.category("Salary", "income");
        let food = fx.category("Food", "expense");
        let service = TransactionService::new(&fx.storage);

        let pay = service
            .create(fx.owner, fx.input(&closing, &salary, Money::new(dec!(100))))
            .unwrap();
        let spend = service
            .create(fx.owner, fx.input(&closing, &food, Money::new(dec!(100))))
            .unwrap();
        assert_eq!(fx.balance(closing.id), Money::zero());

        AccountService::new(&fx.storage)
            .delete(closing.id, fx.owner)
            .unwrap();
        assert_eq!(service.count(fx.owner).unwrap(), 2);

        // Moving onto a live account applies only the new side
        let mut change = UpdateTransactionInput::from_existing(&pay);
        change.account_id = other.id;
        service.update(pay.id, fx.owner, change).unwrap();
        assert_eq!(fx.balance(other.id), Money::new(dec!(110)));

        service.delete(spend.id, fx.owner).unwrap();
        assert_eq!(service.count(fx.owner).unwrap(), 1);
        assert_eq!(fx.balance(other.id), Money::new(dec!(110)));
    }
}
