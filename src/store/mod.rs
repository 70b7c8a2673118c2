//! Key-value stores.
//!
//! Two stores back the application:
//! - a session store ([`MemoryStore`]) holding egress records, the tab map and the
//!   detail cache, dropped with the process;
//! - a durable store ([`FileStore`]) holding the API token across runs.
//!
//! Both are used through the [`Store`] trait with typed [`StorageKey`]s, and the
//! [`StoreExt`] helpers (de)serialize values with `serde_json`. Each get/set is
//! atomic on its own; read-modify-write sequences are serialized by the caller.

mod file;
mod memory;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::{
    DETAIL_CACHE_PREFIX, DOM_IPV4_KEY, DOM_IPV6_KEY, GLOB_IPV4_KEY, GLOB_IPV6_KEY, TAB_IPS_KEY,
    TOKEN_KEY,
};
use crate::egress::EgressSlot;
use crate::error_handling::StoreError;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Typed storage keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// API token (durable)
    Token,
    /// `{ip, details}` record for one egress slot (session)
    Egress(EgressSlot),
    /// Tab -> IP map (session)
    TabIps,
    /// Cached detail record for one IP (session)
    DetailCache(String),
}

impl StorageKey {
    /// The raw string key this typed key is stored under.
    pub fn as_key(&self) -> String {
        match self {
            StorageKey::Token => TOKEN_KEY.to_string(),
            StorageKey::Egress(slot) => match slot {
                EgressSlot::DomesticV4 => DOM_IPV4_KEY,
                EgressSlot::DomesticV6 => DOM_IPV6_KEY,
                EgressSlot::GlobalV4 => GLOB_IPV4_KEY,
                EgressSlot::GlobalV6 => GLOB_IPV6_KEY,
            }
            .to_string(),
            StorageKey::TabIps => TAB_IPS_KEY.to_string(),
            StorageKey::DetailCache(ip) => format!("{}{}", DETAIL_CACHE_PREFIX, ip),
        }
    }
}

/// A key-value store of JSON values.
pub trait Store: Send + Sync {
    /// Reads the raw value under `key`.
    fn get_value(&self, key: &StorageKey) -> Result<Option<Value>, StoreError>;

    /// Writes `value` under `key`, replacing any previous value.
    fn set_value(&self, key: &StorageKey, value: Value) -> Result<(), StoreError>;

    /// Removes `key`. Removing a missing key is not an error.
    fn delete(&self, key: &StorageKey) -> Result<(), StoreError>;

    /// All raw keys currently present.
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

/// Typed helpers over any [`Store`].
pub trait StoreExt: Store {
    /// Reads and decodes the value under `key`.
    fn get<T: DeserializeOwned>(&self, key: &StorageKey) -> Result<Option<T>, StoreError> {
        match self.get_value(key)? {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|source| StoreError::Serialization {
                    key: key.as_key(),
                    source,
                }),
            None => Ok(None),
        }
    }

    /// Encodes and writes `value` under `key`.
    fn set<T: Serialize>(&self, key: &StorageKey, value: &T) -> Result<(), StoreError> {
        let value = serde_json::to_value(value).map_err(|source| StoreError::Serialization {
            key: key.as_key(),
            source,
        })?;
        self.set_value(key, value)
    }
}

impl<S: Store + ?Sized> StoreExt for S {}

/// Reads the stored API token. Missing or blank tokens read as `None`.
pub fn read_token(store: &dyn Store) -> Result<Option<String>, StoreError> {
    let token: Option<String> = store.get(&StorageKey::Token)?;
    Ok(token.filter(|t| !t.trim().is_empty()))
}

/// Stores the API token, trimmed. A blank token removes the key.
pub fn write_token(store: &dyn Store, token: &str) -> Result<(), StoreError> {
    let token = token.trim();
    if token.is_empty() {
        store.delete(&StorageKey::Token)
    } else {
        store.set(&StorageKey::Token, &token)
    }
}
