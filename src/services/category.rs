//! Category service
//!
//! The global category catalog. Mutations hold the registry write lock so
//! that ledger and budget writers, which hold the read side, never commit
//! against a category that changed kind or vanished after they validated it.

use tracing::{debug, info};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Category, CategoryId, EntryKind};
use crate::storage::Storage;

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

/// Parse a category kind, rejecting anything but income or expense
pub fn parse_kind(kind: &str) -> LedgerResult<EntryKind> {
    EntryKind::parse(kind).ok_or_else(|| {
        LedgerError::Validation(format!(
            "Invalid category kind '{}': expected income or expense",
            kind
        ))
    })
}

impl<'a> CategoryService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new category
    pub fn create(&self, name: &str, kind: &str, icon: &str) -> LedgerResult<Category> {
        let kind = parse_kind(kind)?;
        let category = Category::new(name.trim(), kind, icon.trim());
        category
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        let _registry = self.storage.registry_write()?;
        self.ensure_slot_free(&category.name, kind, None)?;

        self.storage.categories.commit_put(category.clone())?;

        info!(category_id = %category.id, name = %category.name, kind = %kind, "created category");
        Ok(category)
    }

    /// Get a category by ID
    pub fn get(&self, id: CategoryId) -> LedgerResult<Category> {
        self.storage
            .categories
            .get(id)?
            .ok_or_else(|| LedgerError::category_not_found(id.to_string()))
    }

    /// Get a category by name (case-insensitive)
    ///
    /// When an income and an expense category share a name, the older one
    /// wins; use [`get_by_name_and_kind`](Self::get_by_name_and_kind) to pick.
    pub fn get_by_name(&self, name: &str) -> LedgerResult<Category> {
        let wanted = name.trim().to_lowercase();
        self.storage
            .categories
            .list()?
            .into_iter()
            .find(|c| c.name.to_lowercase() == wanted)
            .ok_or_else(|| LedgerError::category_not_found(name.to_string()))
    }

    /// Get a category by name and kind (case-insensitive name)
    pub fn get_by_name_and_kind(&self, name: &str, kind: EntryKind) -> LedgerResult<Category> {
        self.storage
            .categories
            .list()?
            .into_iter()
            .find(|c| c.same_slot(name, kind))
            .ok_or_else(|| LedgerError::category_not_found(format!("{} ({})", name, kind)))
    }

    /// Find a category by ID string or name
    pub fn find(&self, identifier: &str) -> LedgerResult<Category> {
        if let Ok(id) = identifier.parse::<CategoryId>() {
            if let Some(category) = self.storage.categories.get(id)? {
                return Ok(category);
            }
        }
        self.get_by_name(identifier)
    }

    /// All categories, oldest first
    pub fn list(&self) -> LedgerResult<Vec<Category>> {
        self.storage.categories.list()
    }

    /// Update a category's name, kind or icon
    pub fn update(
        &self,
        id: CategoryId,
        name: Option<&str>,
        kind: Option<&str>,
        icon: Option<&str>,
    ) -> LedgerResult<Category> {
        let new_kind = kind.map(parse_kind).transpose()?;

        let _registry = self.storage.registry_write()?;
        let mut category = self.get(id)?;

        if let Some(name) = name {
            category.name = name.trim().to_string();
        }
        if let Some(icon) = icon {
            category.icon = icon.trim().to_string();
        }

        if let Some(new_kind) = new_kind {
            if new_kind != category.kind {
                self.ensure_kind_change_allowed(&category, new_kind)?;
                category.kind = new_kind;
            }
        }

        category
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;
        self.ensure_slot_free(&category.name, category.kind, Some(id))?;

        category.updated_at = chrono::Utc::now();
        self.storage.categories.commit_put(category.clone())?;

        info!(category_id = %category.id, name = %category.name, kind = %category.kind, "updated category");
        Ok(category)
    }

    /// Delete a category that nothing references
    pub fn delete(&self, id: CategoryId) -> LedgerResult<Category> {
        let _registry = self.storage.registry_write()?;
        let category = self.get(id)?;

        let txn_count = self.transaction_count(id)?;
        if txn_count > 0 {
            debug!(category_id = %id, txn_count, "refused to delete category in use");
            return Err(LedgerError::Validation(format!(
                "Category '{}' is used by {} transaction(s)",
                category.name, txn_count
            )));
        }

        if self.used_by_budgets(id)? {
            debug!(category_id = %id, "refused to delete category in a budget");
            return Err(LedgerError::Validation(format!(
                "Category '{}' is used by a budget",
                category.name
            )));
        }

        self.storage.categories.commit_remove(id)?;

        info!(category_id = %id, name = %category.name, "deleted category");
        Ok(category)
    }

    fn ensure_slot_free(
        &self,
        name: &str,
        kind: EntryKind,
        exclude: Option<CategoryId>,
    ) -> LedgerResult<()> {
        let taken = self
            .storage
            .categories
            .list()?
            .into_iter()
            .any(|c| Some(c.id) != exclude && c.same_slot(name, kind));

        if taken {
            debug!(name, kind = %kind, "category name already taken");
            return Err(LedgerError::Validation(format!(
                "A {} category named '{}' already exists",
                kind, name
            )));
        }
        Ok(())
    }

    fn ensure_kind_change_allowed(&self, category: &Category, new_kind: EntryKind) -> LedgerResult<()> {
        let txn_count = self.transaction_count(category.id)?;
        if txn_count > 0 {
            return Err(LedgerError::Validation(format!(
                "Cannot change kind of category '{}': used by {} transaction(s)",
                category.name, txn_count
            )));
        }

        if new_kind == EntryKind::Income && self.used_by_budgets(category.id)? {
            return Err(LedgerError::Validation(format!(
                "Cannot change category '{}' to income: it is part of a budget",
                category.name
            )));
        }
        Ok(())
    }

    fn transaction_count(&self, id: CategoryId) -> LedgerResult<usize> {
        Ok(self
            .storage
            .transactions
            .list_all()?
            .iter()
            .filter(|t| t.category_id == id)
            .count())
    }

    fn used_by_budgets(&self, id: CategoryId) -> LedgerResult<bool> {
        super::BudgetService::new(self.storage).is_category_used(id)
    }
}
