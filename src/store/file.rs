//! JSON-file durable store.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::Value;

use super::{StorageKey, Store};
use crate::error_handling::StoreError;

/// Durable store persisted as one pretty-printed JSON object.
///
/// The whole object is held in memory and rewritten on every change; the file
/// only ever holds a handful of keys.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, Value>>,
}

impl FileStore {
    /// Opens the store at `path`. A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the file exists but cannot be read, and
    /// `StoreError::Corrupt` if it is not a JSON object.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content)
                .map_err(|e| StoreError::Corrupt(path.display().to_string(), e))?
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &BTreeMap<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content =
            serde_json::to_string_pretty(values).map_err(|source| StoreError::Serialization {
                key: self.path.display().to_string(),
                source,
            })?;
        // The target is only ever replaced by a complete file.
        let temp_path = temp_path(&self.path);
        let mut file = std::fs::File::create(&temp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        drop(file);
        std::fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

/// Sibling path used while rewriting `path` (`sync.json` -> `sync.json.tmp`).
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

impl Store for FileStore {
    fn get_value(&self, key: &StorageKey) -> Result<Option<Value>, StoreError> {
        let values = self.values.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(values.get(&key.as_key()).cloned())
    }

    fn set_value(&self, key: &StorageKey, value: Value) -> Result<(), StoreError> {
        let mut values = self.values.lock().map_err(|_| StoreError::LockPoisoned)?;
        values.insert(key.as_key(), value);
        self.persist(&values)
    }

    fn delete(&self, key: &StorageKey) -> Result<(), StoreError> {
        let mut values = self.values.lock().map_err(|_| StoreError::LockPoisoned)?;
        if values.remove(&key.as_key()).is_some() {
            self.persist(&values)?;
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let values = self.values.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(values.keys().cloned().collect())
    }
}
