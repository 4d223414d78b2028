//! Category repository for JSON storage
//!
//! Categories are global, so unlike the owner-scoped stores this is a single
//! map. Listing order is creation order.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use tracing::{error, warn};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Category, CategoryId};

use super::file_io::StoreFile;

/// Storage backend for the category catalog
pub trait CategoryStore: Send + Sync {
    fn get(&self, id: CategoryId) -> LedgerResult<Option<Category>>;

    /// All categories, oldest first
    fn list(&self) -> LedgerResult<Vec<Category>>;

    /// Insert or replace a category
    fn put(&self, category: Category) -> LedgerResult<()>;

    fn remove(&self, id: CategoryId) -> LedgerResult<Option<Category>>;

    fn load(&self) -> LedgerResult<()>;

    fn save(&self) -> LedgerResult<()>;

    /// Put a category and flush, restoring the previous entry if the flush fails
    fn commit_put(&self, category: Category) -> LedgerResult<()> {
        let id = category.id;
        let previous = self.get(id)?;
        self.put(category)?;

        if let Err(e) = self.save() {
            warn!(category_id = %id, error = %e, "flush failed, restoring category");
            let restored = match previous {
                Some(old) => self.put(old),
                None => self.remove(id).map(drop),
            };
            if let Err(undo) = restored {
                error!(category_id = %id, error = %undo, "could not restore category");
            }
            return Err(e);
        }
        Ok(())
    }

    /// Remove a category and flush, putting it back if the flush fails
    fn commit_remove(&self, id: CategoryId) -> LedgerResult<Option<Category>> {
        let Some(removed) = self.remove(id)? else {
            return Ok(None);
        };

        if let Err(e) = self.save() {
            warn!(category_id = %id, error = %e, "flush failed, restoring category");
            if let Err(undo) = self.put(removed) {
                error!(category_id = %id, error = %undo, "could not restore category");
            }
            return Err(e);
        }
        Ok(Some(removed))
    }
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct CategoryData {
    categories: Vec<Category>,
}

/// Repository for category persistence
pub struct CategoryRepository {
    file: StoreFile,
    data: RwLock<HashMap<CategoryId, Category>>,
}

impl CategoryRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: StoreFile::at(path),
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            file: StoreFile::memory(),
            data: RwLock::new(HashMap::new()),
        }
    }
}

impl CategoryStore for CategoryRepository {
    fn get(&self, id: CategoryId) -> LedgerResult<Option<Category>> {
        let data = self.data.read().map_err(LedgerError::lock_poisoned)?;
        Ok(data.get(&id).cloned())
    }

    fn list(&self) -> LedgerResult<Vec<Category>> {
        let data = self.data.read().map_err(LedgerError::lock_poisoned)?;
        let mut categories: Vec<_> = data.values().cloned().collect();
        categories.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(categories)
    }

    fn put(&self, category: Category) -> LedgerResult<()> {
        let mut data = self.data.write().map_err(LedgerError::lock_poisoned)?;
        data.insert(category.id, category);
        Ok(())
    }

    fn remove(&self, id: CategoryId) -> LedgerResult<Option<Category>> {
        let mut data = self.data.write().map_err(LedgerError::lock_poisoned)?;
        Ok(data.remove(&id))
    }

    fn load(&self) -> LedgerResult<()> {
        let Some(file_data) = self.file.read::<CategoryData>()? else {
            return Ok(());
        };

        let mut data = self.data.write().map_err(LedgerError::lock_poisoned)?;
        data.clear();
        for category in file_data.categories {
            data.insert(category.id, category);
        }

        Ok(())
    }

    fn save(&self) -> LedgerResult<()> {
        self.file.write_with(|| {
            Ok(CategoryData {
                categories: self.list()?,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryKind;
    use tempfile::TempDir;

    #[test]
    fn test_crud() {
        let repo = CategoryRepository::in_memory();
        let food = Category::new("Food", EntryKind::Expense, "");
        repo.put(food.clone()).unwrap();

        assert_eq!(repo.get(food.id).unwrap(), Some(food.clone()));
        assert_eq!(repo.remove(food.id).unwrap(), Some(food.clone()));
        assert_eq!(repo.get(food.id).unwrap(), None);
    }

    #[test]
    fn test_list_in_creation_order() {
        let repo = CategoryRepository::in_memory();
        let mut first = Category::new("Salary", EntryKind::Income, "");
        let mut second = Category::new("Rent", EntryKind::Expense, "");
        first.created_at = chrono::Utc::now() - chrono::Duration::seconds(10);
        second.created_at = chrono::Utc::now();
        repo.put(second.clone()).unwrap();
        repo.put(first.clone()).unwrap();

        let names: Vec<_> = repo.list().unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Salary", "Rent"]);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("categories.json");
        let gifts = Category::new("Gifts", EntryKind::Income, "🎁");

        {
            let repo = CategoryRepository::new(path.clone());
            repo.put(gifts.clone()).unwrap();
            repo.save().unwrap();
        }

        let repo = CategoryRepository::new(path);
        repo.load().unwrap();
        assert_eq!(repo.list().unwrap(), vec![gifts]);
    }

    #[test]
    fn test_failed_flush_restores_registry() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("categories.json");
        std::fs::create_dir(&path).unwrap();
        let repo = CategoryRepository::new(path);

        let rent = Category::new("Rent", EntryKind::Expense, "");
        assert!(repo.commit_put(rent.clone()).is_err());
        assert!(repo.list().unwrap().is_empty());

        repo.put(rent.clone()).unwrap();
        assert!(repo.commit_remove(rent.id).is_err());
        assert_eq!(repo.get(rent.id).unwrap(), Some(rent));
    }
}
