//! User directory
//!
//! The one place that knows which users exist. Every component asks it
//! before touching an owner's partition.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use tracing::{error, warn};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{User, UserId};

use super::file_io::StoreFile;

/// Source of truth for user existence
pub trait UserDirectory: Send + Sync {
    /// Look up a user
    fn get(&self, id: UserId) -> LedgerResult<Option<User>>;

    /// Insert a user if its id is not already known; returns the stored user
    fn insert(&self, user: User) -> LedgerResult<User>;

    /// All known users, oldest first
    fn list(&self) -> LedgerResult<Vec<User>>;

    fn remove(&self, id: UserId) -> LedgerResult<Option<User>>;

    fn load(&self) -> LedgerResult<()>;

    fn save(&self) -> LedgerResult<()>;

    fn exists(&self, id: UserId) -> LedgerResult<bool> {
        Ok(self.get(id)?.is_some())
    }

    /// Fail with `NotFound` unless the user exists
    fn require(&self, id: UserId) -> LedgerResult<User> {
        self.get(id)?
            .ok_or_else(|| LedgerError::user_not_found(id.to_string()))
    }

    /// Insert and flush; a user added by this call is dropped again if the
    /// flush fails
    fn commit_insert(&self, user: User) -> LedgerResult<User> {
        let id = user.id;
        let is_new = self.get(id)?.is_none();
        let stored = self.insert(user)?;

        if let Err(e) = self.save() {
            if is_new {
                warn!(user_id = %id, error = %e, "flush failed, dropping new user");
                if let Err(undo) = self.remove(id) {
                    error!(user_id = %id, error = %undo, "could not drop user");
                }
            }
            return Err(e);
        }
        Ok(stored)
    }
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct UserData {
    users: Vec<User>,
}

/// Repository for user persistence
pub struct UserRepository {
    file: StoreFile,
    data: RwLock<HashMap<UserId, User>>,
}

impl UserRepository {
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

impl UserDirectory for UserRepository {
    fn get(&self, id: UserId) -> LedgerResult<Option<User>> {
        let data = self.data.read().map_err(LedgerError::lock_poisoned)?;
        Ok(data.get(&id).cloned())
    }

    fn insert(&self, user: User) -> LedgerResult<User> {
        let mut data = self.data.write().map_err(LedgerError::lock_poisoned)?;
        Ok(data.entry(user.id).or_insert(user).clone())
    }

    fn list(&self) -> LedgerResult<Vec<User>> {
        let data = self.data.read().map_err(LedgerError::lock_poisoned)?;
        let mut users: Vec<_> = data.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(users)
    }

    fn remove(&self, id: UserId) -> LedgerResult<Option<User>> {
        let mut data = self.data.write().map_err(LedgerError::lock_poisoned)?;
        Ok(data.remove(&id))
    }

    fn load(&self) -> LedgerResult<()> {
        let Some(file_data) = self.file.read::<UserData>()? else {
            return Ok(());
        };

        let mut data = self.data.write().map_err(LedgerError::lock_poisoned)?;
        data.clear();
        for user in file_data.users {
            data.insert(user.id, user);
        }

        Ok(())
    }

    fn save(&self) -> LedgerResult<()> {
        self.file.write_with(|| {
            Ok(UserData {
                users: self.list()?,
            })
        })
    }
}
