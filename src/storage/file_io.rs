//! Backing files for the JSON stores
//!
//! Every store is written as a versioned envelope:
//!
//! ```json
//! { "format": 1, "data": { ... } }
//! ```
//!
//! Files written before the envelope existed (the bare `data` object) are
//! still read. Writes go to a sibling temp file that is synced and renamed
//! over the target, so a failed or interrupted flush leaves the previous
//! contents on disk and the caller can roll its in-memory state back to
//! match.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::error::{LedgerError, LedgerResult};

/// Envelope version written by this build
pub const FORMAT_VERSION: u32 = 1;

const FORMAT_KEY: &str = "format";
const DATA_KEY: &str = "data";

#[derive(Serialize)]
struct Envelope<'a, T> {
    format: u32,
    data: &'a T,
}

/// The file behind one store, or nothing for a memory-only store
pub struct StoreFile {
    path: Option<PathBuf>,
    /// Held for the whole snapshot-and-write so the last flush on disk is
    /// also the most recent state
    writer: Mutex<()>,
}

impl StoreFile {
    /// A store persisted at `path`
    pub fn at(path: PathBuf) -> Self {
        Self {
            path: Some(path),
            writer: Mutex::new(()),
        }
    }

    /// A store that never touches the disk
    pub fn memory() -> Self {
        Self {
            path: None,
            writer: Mutex::new(()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Read the stored data
    ///
    /// `None` for a memory-only store or a file that does not exist yet.
    pub fn read<T: DeserializeOwned>(&self) -> LedgerResult<Option<T>> {
        let Some(path) = &self.path else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }

        let file = File::open(path).map_err(|e| storage_error(path, "open", e))?;
        let raw: Value = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| storage_error(path, "parse", e))?;

        decode(path, raw).map(Some)
    }

    /// Flush the state returned by `snapshot`
    ///
    /// `snapshot` runs under the writer lock, after any earlier flush of
    /// this store has finished. A memory-only store skips it entirely.
    pub fn write_with<T, F>(&self, snapshot: F) -> LedgerResult<()>
    where
        T: Serialize,
        F: FnOnce() -> LedgerResult<T>,
    {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let _writer = self.writer.lock().map_err(LedgerError::lock_poisoned)?;

        let data = snapshot()?;
        write_atomic(
            path,
            &Envelope {
                format: FORMAT_VERSION,
                data: &data,
            },
        )
    }
}

fn decode<T: DeserializeOwned>(path: &Path, raw: Value) -> LedgerResult<T> {
    let data = match raw {
        Value::Object(mut fields) if fields.contains_key(FORMAT_KEY) => {
            let format = fields
                .get(FORMAT_KEY)
                .and_then(Value::as_u64)
                .ok_or_else(|| {
                    LedgerError::Storage(format!("{} has an invalid format marker", path.display()))
                })?;
            if format > u64::from(FORMAT_VERSION) {
                return Err(LedgerError::Storage(format!(
                    "{} was written in format {}, newer than the supported {}",
                    path.display(),
                    format,
                    FORMAT_VERSION
                )));
            }
            fields
                .remove(DATA_KEY)
                .unwrap_or_else(|| Value::Object(Default::default()))
        }
        legacy => legacy,
    };

    serde_json::from_value(data).map_err(|e| storage_error(path, "parse", e))
}

fn write_atomic<T: Serialize>(path: &Path, data: &T) -> LedgerResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| storage_error(parent, "create", e))?;
    }

    // Sibling of the target so the rename never crosses filesystems
    let temp_path = path.with_extension("json.tmp");

    let result = (|| {
        let mut writer = BufWriter::new(
            File::create(&temp_path).map_err(|e| storage_error(&temp_path, "create", e))?,
        );
        serde_json::to_writer_pretty(&mut writer, data)
            .map_err(|e| storage_error(&temp_path, "serialize", e))?;
        writer
            .flush()
            .map_err(|e| storage_error(&temp_path, "flush", e))?;
        writer
            .get_ref()
            .sync_all()
            .map_err(|e| storage_error(&temp_path, "sync", e))?;
        fs::rename(&temp_path, path).map_err(|e| storage_error(path, "replace", e))
    })();

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn storage_error(path: &Path, action: &str, err: impl std::fmt::Display) -> LedgerError {
    LedgerError::Storage(format!("Failed to {} {}: {}", action, path.display(), err))
}
