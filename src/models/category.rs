//! Category model
//!
//! Categories form a global catalog shared by all users. Each category is
//! either an income or an expense category, and `(name, kind)` is unique
//! case-insensitively.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CategoryId;
use super::kind::EntryKind;

/// A spending or income category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,

    /// Category name
    pub name: String,

    /// Income or expense
    pub kind: EntryKind,

    /// Icon name or glyph, empty when unset
    #[serde(default)]
    pub icon: String,

    /// When the category was created
    pub created_at: DateTime<Utc>,

    /// When the category was last modified
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Create a new category
    pub fn new(name: impl Into<String>, kind: EntryKind, icon: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: CategoryId::new(),
            name: name.into(),
            kind,
            icon: icon.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this category occupies the given `(name, kind)` slot
    pub fn same_slot(&self, name: &str, kind: EntryKind) -> bool {
        self.kind == kind && self.name.trim().to_lowercase() == name.trim().to_lowercase()
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        if self.name.len() > 50 {
            return Err(CategoryValidationError::NameTooLong(self.name.len()));
        }

        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.icon.is_empty() {
            write!(f, "{} [{}]", self.name, self.kind)
        } else {
            write!(f, "{} {} [{}]", self.icon, self.name, self.kind)
        }
    }
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Category name too long ({} chars, max 50)", len)
            }
        }
    }
}

impl std::error::Error for CategoryValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_category() {
        let category = Category::new("Salary", EntryKind::Income, "");
        assert_eq!(category.name, "Salary");
        assert_eq!(category.kind, EntryKind::Income);
        assert!(category.icon.is_empty());
    }

    #[test]
    fn test_same_slot_is_case_insensitive() {
        let category = Category::new("Food", EntryKind::Expense, "");
        assert!(category.same_slot("food", EntryKind::Expense));
        assert!(category.same_slot(" FOOD ", EntryKind::Expense));
        assert!(!category.same_slot("food", EntryKind::Income));
    }

    #[test]
    fn test_validation() {
        let mut category = Category::new("Rent", EntryKind::Expense, "");
        assert!(category.validate().is_ok());

        category.name = " ".into();
        assert_eq!(category.validate(), Err(CategoryValidationError::EmptyName));

        category.name = "x".repeat(51);
        assert_eq!(
            category.validate(),
            Err(CategoryValidationError::NameTooLong(51))
        );
    }

    #[test]
    fn test_display() {
        let category = Category::new("Food", EntryKind::Expense, "🍔");
        assert_eq!(category.to_string(), "🍔 Food [expense]");
    }
}
