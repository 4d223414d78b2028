//! User service
//!
//! Registers users and answers "does this user exist" for the rest of the
//! ledger. Authentication happens outside the ledger.

use tracing::info;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{User, UserId};
use crate::storage::Storage;

/// Service for the user directory
pub struct UserService<'a> {
    storage: &'a Storage,
}

impl<'a> UserService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Register a new user with a fresh id
    pub fn register(&self, name: &str) -> LedgerResult<User> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::Validation("User name cannot be empty".into()));
        }

        let user = self.storage.users.commit_insert(User::new(name))?;

        info!(user_id = %user.id, name = %user.name, "registered user");
        Ok(user)
    }

    /// Make sure an externally issued user id is known; idempotent
    pub fn ensure(&self, id: UserId) -> LedgerResult<User> {
        if let Some(user) = self.storage.users.get(id)? {
            return Ok(user);
        }

        let user = self.storage.users.commit_insert(User::with_id(id, ""))?;

        info!(user_id = %user.id, "registered external user");
        Ok(user)
    }

    pub fn exists(&self, id: UserId) -> LedgerResult<bool> {
        self.storage.users.exists(id)
    }

    /// Fail with `NotFound` unless the user is registered
    pub fn require(&self, id: UserId) -> LedgerResult<User> {
        self.storage.users.require(id)
    }

    pub fn list(&self) -> LedgerResult<Vec<User>> {
        self.storage.users.list()
    }
}
