//! Owner-partitioned repositories
//!
//! Accounts, transactions, budgets and goals are stored in one partition per
//! owner. A lookup never leaves the caller's partition, so another user's id
//! resolves to "not found" rather than to their data.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{error, warn};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Owned, UserId};

use super::file_io::StoreFile;

/// Storage backend for one kind of owner-scoped entity
///
/// Implementations must be safe to share between threads. Writes are
/// whole-value replacements; the services provide the cross-entity atomicity.
pub trait PartitionStore<T: Owned>: Send + Sync {
    /// Look up an entity inside `owner`'s partition
    fn get(&self, owner: UserId, id: T::Id) -> LedgerResult<Option<T>>;

    /// All entities in `owner`'s partition, oldest first
    fn list(&self, owner: UserId) -> LedgerResult<Vec<T>>;

    /// Every entity across all partitions
    fn list_all(&self) -> LedgerResult<Vec<T>>;

    /// Insert or replace an entity in its owner's partition
    fn put(&self, value: T) -> LedgerResult<()>;

    /// Remove an entity from `owner`'s partition, returning it if present
    fn remove(&self, owner: UserId, id: T::Id) -> LedgerResult<Option<T>>;

    /// Reload from the backing file, if any
    fn load(&self) -> LedgerResult<()>;

    /// Flush to the backing file, if any
    fn save(&self) -> LedgerResult<()>;

    /// Put `value` and flush
    ///
    /// If the flush fails the row that was there before (or its absence) is
    /// restored in memory, so the store matches the file again.
    fn commit_put(&self, value: T) -> LedgerResult<()> {
        let (owner, id) = (value.owner_id(), value.id());
        let previous = self.get(owner, id)?;
        self.put(value)?;

        if let Err(e) = self.save() {
            warn!(%id, error = %e, "flush failed, restoring previous row");
            let restored = match previous {
                Some(row) => self.put(row),
                None => self.remove(owner, id).map(drop),
            };
            if let Err(undo) = restored {
                error!(%id, error = %undo, "could not restore row after failed flush");
            }
            return Err(e);
        }
        Ok(())
    }

    /// Remove a row and flush, putting the row back if the flush fails
    fn commit_remove(&self, owner: UserId, id: T::Id) -> LedgerResult<Option<T>> {
        let Some(removed) = self.remove(owner, id)? else {
            return Ok(None);
        };

        if let Err(e) = self.save() {
            warn!(%id, error = %e, "flush failed, restoring removed row");
            if let Err(undo) = self.put(removed) {
                error!(%id, error = %undo, "could not restore row after failed flush");
            }
            return Err(e);
        }
        Ok(Some(removed))
    }
}

/// File contents: entities grouped under their partition key
#[derive(Debug, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: DeserializeOwned"))]
struct PartitionData<T> {
    #[serde(default)]
    partitions: BTreeMap<UserId, Vec<T>>,
}

/// In-memory partitioned repository, optionally persisted to a JSON file
pub struct JsonPartitionRepository<T: Owned> {
    file: StoreFile,
    data: RwLock<HashMap<UserId, HashMap<T::Id, T>>>,
}

impl<T: Owned> JsonPartitionRepository<T> {
    /// Create a repository persisted at `path`
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: StoreFile::at(path),
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Create a repository that lives only in memory
    pub fn in_memory() -> Self {
        Self {
            file: StoreFile::memory(),
            data: RwLock::new(HashMap::new()),
        }
    }
}

fn sort_oldest_first<T: Owned>(items: &mut [T]) {
    items.sort_by(|a, b| {
        a.created_at()
            .cmp(&b.created_at())
            .then_with(|| a.id().cmp(&b.id()))
    });
}

impl<T> PartitionStore<T> for JsonPartitionRepository<T>
where
    T: Owned + Clone + Serialize + DeserializeOwned + Send + Sync,
    T::Id: Send + Sync,
{
    fn get(&self, owner: UserId, id: T::Id) -> LedgerResult<Option<T>> {
        let data = self.data.read().map_err(LedgerError::lock_poisoned)?;
        Ok(data.get(&owner).and_then(|p| p.get(&id)).cloned())
    }

    fn list(&self, owner: UserId) -> LedgerResult<Vec<T>> {
        let data = self.data.read().map_err(LedgerError::lock_poisoned)?;
        let mut items: Vec<T> = data
            .get(&owner)
            .map(|p| p.values().cloned().collect())
            .unwrap_or_default();
        sort_oldest_first(&mut items);
        Ok(items)
    }

    fn list_all(&self) -> LedgerResult<Vec<T>> {
        let data = self.data.read().map_err(LedgerError::lock_poisoned)?;
        let mut items: Vec<T> = data.values().flat_map(|p| p.values().cloned()).collect();
        sort_oldest_first(&mut items);
        Ok(items)
    }

    fn put(&self, value: T) -> LedgerResult<()> {
        let mut data = self.data.write().map_err(LedgerError::lock_poisoned)?;
        data.entry(value.owner_id())
            .or_default()
            .insert(value.id(), value);
        Ok(())
    }

    fn remove(&self, owner: UserId, id: T::Id) -> LedgerResult<Option<T>> {
        let mut data = self.data.write().map_err(LedgerError::lock_poisoned)?;
        let removed = data.get_mut(&owner).and_then(|p| p.remove(&id));
        if data.get(&owner).is_some_and(|p| p.is_empty()) {
            data.remove(&owner);
        }
        Ok(removed)
    }

    fn load(&self) -> LedgerResult<()> {
        let Some(file_data) = self.file.read::<PartitionData<T>>()? else {
            return Ok(());
        };

        let mut data = self.data.write().map_err(LedgerError::lock_poisoned)?;
        data.clear();
        // Rows are filed under the partition they were saved in, not the
        // owner recorded on the row; services check the two agree.
        for (owner, items) in file_data.partitions {
            let partition = data.entry(owner).or_default();
            for item in items {
                partition.insert(item.id(), item);
            }
        }

        Ok(())
    }

    fn save(&self) -> LedgerResult<()> {
        self.file.write_with(|| {
            let data = self.data.read().map_err(LedgerError::lock_poisoned)?;
            let mut partitions = BTreeMap::new();
            for (owner, partition) in data.iter() {
                let mut items: Vec<T> = partition.values().cloned().collect();
                sort_oldest_first(&mut items);
                partitions.insert(*owner, items);
            }
            Ok(PartitionData { partitions })
        })
    }
}
