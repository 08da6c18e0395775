//! In-process key-value storage, used when embedding without a data
//! directory and throughout the tests.

use anyhow::Result;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::traits::KeyValueStorage;

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        Ok(entries.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("subscription").unwrap(), None);

        storage.set("subscription", "{}").unwrap();
        storage.set("subscription", "{\"isActive\":true}").unwrap();
        assert_eq!(storage.get("subscription").unwrap().as_deref(), Some("{\"isActive\":true}"));

        let clone = storage.clone();
        assert_eq!(clone.get("subscription").unwrap().as_deref(), Some("{\"isActive\":true}"));

        assert!(storage.remove("subscription").unwrap());
        assert!(!storage.remove("subscription").unwrap());
        assert_eq!(clone.get("subscription").unwrap(), None);
    }
}
