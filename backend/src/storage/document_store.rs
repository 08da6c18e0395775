//! Single-value entries (profile, subscription). Unlike collections these are
//! edited in place and written unconditionally on every change.

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Arc, RwLock};

use super::traits::KeyValueStorage;

/// What was found under the key when the document was opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentLoad {
    Missing,
    Loaded,
    /// Present but unreadable; the value starts out empty
    Corrupt,
}

#[derive(Clone)]
pub struct DocumentStore<T> {
    storage: Arc<dyn KeyValueStorage>,
    key: &'static str,
    value: Arc<RwLock<Option<T>>>,
}

impl<T> DocumentStore<T>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    pub fn open(storage: Arc<dyn KeyValueStorage>, key: &'static str) -> (Self, DocumentLoad) {
        let (value, load) = match storage.get(key) {
            Ok(Some(json)) => match serde_json::from_str::<T>(&json) {
                Ok(value) => (Some(value), DocumentLoad::Loaded),
                Err(e) => {
                    warn!("Ignoring corrupt data under '{}': {}", key, e);
                    (None, DocumentLoad::Corrupt)
                }
            },
            Ok(None) => (None, DocumentLoad::Missing),
            Err(e) => {
                warn!("Could not read '{}': {}", key, e);
                (None, DocumentLoad::Corrupt)
            }
        };

        let store = Self {
            storage,
            key,
            value: Arc::new(RwLock::new(value)),
        };
        (store, load)
    }

    pub fn get(&self) -> Option<T> {
        self.value.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn exists(&self) -> bool {
        self.value.read().unwrap_or_else(|e| e.into_inner()).is_some()
    }

    /// Persist and replace the value. Storage is written first.
    pub fn save(&self, value: T) -> Result<()> {
        let json = serde_json::to_string(&value).with_context(|| format!("Failed to serialize '{}'", self.key))?;
        let mut current = self.value.write().unwrap_or_else(|e| e.into_inner());
        self.storage
            .set(self.key, &json)
            .with_context(|| format!("Failed to persist '{}'", self.key))?;
        *current = Some(value);

        debug!("Saved '{}'", self.key);
        Ok(())
    }

    /// Delete the stored entry and forget the value
    pub fn clear(&self) -> Result<()> {
        let mut current = self.value.write().unwrap_or_else(|e| e.into_inner());
        self.storage
            .remove(self.key)
            .with_context(|| format!("Failed to remove '{}'", self.key))?;
        *current = None;

        debug!("Cleared '{}'", self.key);
        Ok(())
    }
}
