//! In-memory session store.

use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;

use super::{StorageKey, Store};
use crate::error_handling::StoreError;

/// Ephemeral store; its contents live as long as the value.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get_value(&self, key: &StorageKey) -> Result<Option<Value>, StoreError> {
        let values = self.values.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(values.get(&key.as_key()).cloned())
    }

    fn set_value(&self, key: &StorageKey, value: Value) -> Result<(), StoreError> {
        let mut values = self.values.write().map_err(|_| StoreError::LockPoisoned)?;
        values.insert(key.as_key(), value);
        Ok(())
    }

    fn delete(&self, key: &StorageKey) -> Result<(), StoreError> {
        let mut values = self.values.write().map_err(|_| StoreError::LockPoisoned)?;
        values.remove(&key.as_key());
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let values = self.values.read().map_err(|_| StoreError::LockPoisoned)?;
        let mut keys: Vec<String> = values.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}
