//! Budget service
//!
//! Spending limits over a set of expense categories. Spend-vs-limit is not
//! tracked here; the report service computes it from the ledger on demand.

use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Budget, BudgetId, CategoryId, EntryKind, Money, UserId};
use crate::storage::Storage;

/// Service for budget management
pub struct BudgetService<'a> {
    storage: &'a Storage,
}

/// Input for creating or replacing a budget
#[derive(Debug, Clone)]
pub struct BudgetInput {
    pub name: String,
    pub limit_amount: Money,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub category_ids: Vec<CategoryId>,
}

impl BudgetInput {
    /// Start from a budget's current values
    pub fn from_existing(budget: &Budget) -> Self {
        Self {
            name: budget.name.clone(),
            limit_amount: budget.limit_amount,
            start_date: budget.start_date,
            end_date: budget.end_date,
            category_ids: budget.category_ids.clone(),
        }
    }
}

impl<'a> BudgetService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a budget for `owner`
    pub fn create(&self, owner: UserId, input: BudgetInput) -> LedgerResult<Budget> {
        self.storage.users.require(owner)?;

        let budget = Budget::new(
            owner,
            input.name.trim(),
            input.limit_amount,
            input.start_date,
            input.end_date,
            input.category_ids,
        );

        let _registry = self.storage.registry_read()?;
        self.validate(&budget)?;

        self.storage.budgets.commit_put(budget.clone())?;

        info!(
            budget_id = %budget.id,
            owner = %owner,
            limit = %budget.limit_amount,
            categories = budget.category_ids.len(),
            "created budget"
        );
        Ok(budget)
    }

    /// Get one of `owner`'s budgets
    pub fn get(&self, id: BudgetId, owner: UserId) -> LedgerResult<Budget> {
        self.storage.users.require(owner)?;
        self.resolve(id, owner)
    }

    /// Find a budget by ID string or name (case-insensitive)
    pub fn find(&self, owner: UserId, identifier: &str) -> LedgerResult<Budget> {
        if let Ok(id) = identifier.parse::<BudgetId>() {
            return self.get(id, owner);
        }

        let wanted = identifier.trim().to_lowercase();
        self.list(owner)?
            .into_iter()
            .find(|b| b.name.to_lowercase() == wanted)
            .ok_or_else(|| LedgerError::budget_not_found(identifier.to_string()))
    }

    /// All of `owner`'s budgets, oldest first
    pub fn list(&self, owner: UserId) -> LedgerResult<Vec<Budget>> {
        self.storage.users.require(owner)?;
        self.storage.budgets.list(owner)
    }

    /// Active budgets whose range contains `date`
    pub fn active_on(&self, owner: UserId, date: NaiveDate) -> LedgerResult<Vec<Budget>> {
        Ok(self
            .list(owner)?
            .into_iter()
            .filter(|b| b.active && b.covers(date))
            .collect())
    }

    /// Replace a budget's definition, optionally (de)activating it
    pub fn update(
        &self,
        id: BudgetId,
        owner: UserId,
        input: BudgetInput,
        active: Option<bool>,
    ) -> LedgerResult<Budget> {
        self.storage.users.require(owner)?;

        // Held through the write so a concurrent delete cannot be undone
        let _writes = self.storage.lock_budgets()?;
        let mut budget = self.resolve(id, owner)?;

        budget.name = input.name.trim().to_string();
        budget.limit_amount = input.limit_amount;
        budget.start_date = input.start_date;
        budget.end_date = input.end_date;
        budget.set_categories(input.category_ids);
        if let Some(active) = active {
            budget.active = active;
        }

        let _registry = self.storage.registry_read()?;
        self.validate(&budget)?;

        budget.updated_at = Utc::now();
        self.storage.budgets.commit_put(budget.clone())?;

        info!(budget_id = %id, owner = %owner, "updated budget");
        Ok(budget)
    }

    /// Delete one of `owner`'s budgets
    pub fn delete(&self, id: BudgetId, owner: UserId) -> LedgerResult<Budget> {
        self.storage.users.require(owner)?;

        let _writes = self.storage.lock_budgets()?;
        let budget = self.resolve(id, owner)?;
        self.storage.budgets.commit_remove(owner, id)?;

        info!(budget_id = %id, owner = %owner, "deleted budget");
        Ok(budget)
    }

    /// Whether any user's budget references `category_id`
    ///
    /// Takes no registry lock: category mutations call this while holding
    /// the registry write side.
    pub fn is_category_used(&self, category_id: CategoryId) -> LedgerResult<bool> {
        Ok(self
            .storage
            .budgets
            .list_all()?
            .iter()
            .any(|b| b.includes_category(category_id)))
    }

    fn validate(&self, budget: &Budget) -> LedgerResult<()> {
        budget.validate().map_err(|e| {
            debug!(budget_id = %budget.id, error = %e, "rejected budget");
            LedgerError::Validation(e.to_string())
        })?;

        for &category_id in &budget.category_ids {
            let category = self
                .storage
                .categories
                .get(category_id)?
                .ok_or_else(|| LedgerError::category_not_found(category_id.to_string()))?;

            if category.kind != EntryKind::Expense {
                debug!(budget_id = %budget.id, category_id = %category_id, "rejected non-expense category");
                return Err(LedgerError::Validation(format!(
                    "Category '{}' ({}) is not an expense category",
                    category.name, category_id
                )));
            }
        }

        Ok(())
    }

    fn resolve(&self, id: BudgetId, owner: UserId) -> LedgerResult<Budget> {
        let budget = self
            .storage
            .budgets
            .get(owner, id)?
            .ok_or_else(|| LedgerError::budget_not_found(id.to_string()))?;

        if budget.owner_id != owner {
            return Err(LedgerError::Authorization(format!(
                "Budget {} does not belong to user {}",
                id, owner
            )));
        }
        Ok(budget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, User};
    use crate::services::CategoryService;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn setup() -> (Storage, UserId, Category, Category) {
        let storage = Storage::in_memory();
        let owner = storage.users.insert(User::new("alice")).unwrap().id;
        let categories = CategoryService::new(&storage);
        let food = categories.create("Food", "expense", "").unwrap();
        let salary = categories.create("Salary", "income", "").unwrap();
        (storage, owner, food, salary)
    }

    fn input(categories: Vec<CategoryId>) -> BudgetInput {
        BudgetInput {
            name: "January".into(),
            limit_amount: Money::from_cents(40000),
            start_date: date(2025, 1, 1),
            end_date: date(2025, 1, 31),
            category_ids: categories,
        }
    }

    #[test]
    fn test_create_budget() {
        let (storage, owner, food, _) = setup();
        let service = BudgetService::new(&storage);

        let budget = service
            .create(owner, input(vec![food.id, food.id]))
            .unwrap();
        assert_eq!(budget.category_ids, vec![food.id]);
        assert_eq!(service.get(budget.id, owner).unwrap(), budget);
        assert!(service.is_category_used(food.id).unwrap());
    }

    #[test]
    fn test_income_category_rejected_by_name() {
        let (storage, owner, food, salary) = setup();
        let service = BudgetService::new(&storage);

        let err = service
            .create(owner, input(vec![food.id, salary.id]))
            .unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("Salary"));
    }

    #[test]
    fn test_unknown_category_not_found() {
        let (storage, owner, food, _) = setup();
        let service = BudgetService::new(&storage);

        let missing = CategoryId::new();
        let err = service.create(owner, input(vec![food.id, missing])).unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains(&missing.to_string()));
    }

    #[test]
    fn test_field_validation() {
        let (storage, owner, food, _) = setup();
        let service = BudgetService::new(&storage);

        let mut blank = input(vec![food.id]);
        blank.name = "  ".into();
        assert!(service.create(owner, blank).unwrap_err().is_validation());

        let mut zero = input(vec![food.id]);
        zero.limit_amount = Money::zero();
        assert!(service.create(owner, zero).unwrap_err().is_validation());

        let mut reversed = input(vec![food.id]);
        reversed.end_date = date(2024, 12, 1);
        assert!(service.create(owner, reversed).unwrap_err().is_validation());

        assert!(service.create(owner, input(vec![])).unwrap_err().is_validation());
    }

    #[test]
    fn test_update_and_active_on() {
        let (storage, owner, food, _) = setup();
        let service = BudgetService::new(&storage);
        let budget = service.create(owner, input(vec![food.id])).unwrap();

        assert_eq!(service.active_on(owner, date(2025, 1, 15)).unwrap().len(), 1);
        assert!(service.active_on(owner, date(2025, 2, 1)).unwrap().is_empty());

        let mut change = BudgetInput::from_existing(&budget);
        change.limit_amount = Money::from_cents(50000);
        let updated = service.update(budget.id, owner, change, Some(false)).unwrap();
        assert_eq!(updated.limit_amount, Money::from_cents(50000));
        assert!(service.active_on(owner, date(2025, 1, 15)).unwrap().is_empty());
    }

    #[test]
    fn test_budgets_are_owner_scoped() {
        let (storage, owner, food, _) = setup();
        let bob = storage.users.insert(User::new("bob")).unwrap().id;
        let service = BudgetService::new(&storage);
        let budget = service.create(owner, input(vec![food.id])).unwrap();

        assert!(service.get(budget.id, bob).unwrap_err().is_not_found());
        assert!(service.list(bob).unwrap().is_empty());

        service.delete(budget.id, owner).unwrap();
        assert!(service.get(budget.id, owner).unwrap_err().is_not_found());
        assert!(!service.is_category_used(food.id).unwrap());
    }

    #[test]
    fn test_update_never_resurrects_deleted_budget() {
        let (storage, owner, food, _) = setup();
        let service = BudgetService::new(&storage);
        let budget = service.create(owner, input(vec![food.id])).unwrap();

        std::thread::scope(|scope| {
            for worker in 0..4i64 {
                let storage = &storage;
                let budget = &budget;
                scope.spawn(move || {
                    let service = BudgetService::new(storage);
                    for round in 0..50 {
                        let mut change = BudgetInput::from_existing(budget);
                        change.limit_amount = Money::from_cents(40000 + worker * 100 + round);
                        match service.update(budget.id, owner, change, None) {
                            Ok(_) => {}
                            Err(e) => assert!(e.is_not_found(), "unexpected error: {}", e),
                        }
                    }
                });
            }

            let storage = &storage;
            let id = budget.id;
            scope.spawn(move || {
                BudgetService::new(storage).delete(id, owner).unwrap();
            });
        });

        assert!(service.get(budget.id, owner).unwrap_err().is_not_found());
        assert!(service.list(owner).unwrap().is_empty());
    }
}
