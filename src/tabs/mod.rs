//! Per-tab IP tracking.
//!
//! Each tab moves from "no IP known" to "IP known" when its main-frame request
//! completes with a remote address; later completions overwrite the entry. The map
//! lives in the session store under `tab_ips` and is never pruned.

mod navigate;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error_handling::StoreError;
use crate::store::{StorageKey, Store, StoreExt};

pub use navigate::{visit, PageVisit};

/// Host tab identifier. `-1` marks requests that belong to no tab.
pub type TabId = i64;

/// Tab -> last observed main-frame IP.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabIpMap(BTreeMap<TabId, String>);

impl TabIpMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// IP tracked for `tab`.
    pub fn get(&self, tab: TabId) -> Option<&str> {
        self.0.get(&tab).map(String::as_str)
    }

    /// Records `ip` for `tab`. Returns `true` if the map changed.
    pub fn observe(&mut self, tab: TabId, ip: &str) -> bool {
        match self.0.get(&tab) {
            Some(existing) if existing == ip => false,
            _ => {
                self.0.insert(tab, ip.to_string());
                true
            }
        }
    }

    /// Number of tracked tabs.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no tab is tracked.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Reads the tab map from the session store. An unreadable entry reads as empty.
pub fn load_tab_ips(session: &dyn Store) -> TabIpMap {
    match session.get::<TabIpMap>(&StorageKey::TabIps) {
        Ok(map) => map.unwrap_or_default(),
        Err(e) => {
            log::warn!("Ignoring unreadable tab map: {}", e);
            TabIpMap::new()
        }
    }
}

/// Writes the tab map to the session store.
pub fn save_tab_ips(session: &dyn Store, map: &TabIpMap) -> Result<(), StoreError> {
    session.set(&StorageKey::TabIps, map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    #[test]
    fn test_observe_is_last_write_wins() {
        let mut map = TabIpMap::new();
        assert!(map.observe(7, "93.184.216.34"));
        assert!(!map.observe(7, "93.184.216.34"));
        assert!(map.observe(7, "2606:2800:220:1::"));
        assert_eq!(map.get(7), Some("2606:2800:220:1::"));
        assert_eq!(map.get(8), None);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_serializes_with_string_keys() {
        let mut map = TabIpMap::new();
        map.observe(12, "1.1.1.1");
        assert_eq!(
            serde_json::to_value(&map).expect("serialize"),
            json!({ "12": "1.1.1.1" })
        );
        let back: TabIpMap = serde_json::from_value(json!({ "12": "1.1.1.1" })).expect("parse");
        assert_eq!(back, map);
    }

    #[test]
    fn test_load_and_save() {
        let session = MemoryStore::new();
        assert!(load_tab_ips(&session).is_empty());

        let mut map = TabIpMap::new();
        map.observe(3, "8.8.8.8");
        save_tab_ips(&session, &map).expect("save");
        assert_eq!(load_tab_ips(&session).get(3), Some("8.8.8.8"));
    }

    #[test]
    fn test_unreadable_map_loads_empty() {
        let session = MemoryStore::new();
        session
            .set_value(&StorageKey::TabIps, json!(["not", "a", "map"]))
            .expect("set");
        assert!(load_tab_ips(&session).is_empty());
    }
}
