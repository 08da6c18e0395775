//! # Record Store
//!
//! One in-memory collection per record kind, newest first, mirrored to the
//! key-value storage on every change.
//!
//! ## Persistence
//!
//! - Write-through: every successful `add`/`remove` writes the *whole*
//!   collection under the kind's key (never a delta).
//! - A failed write leaves the in-memory collection untouched.
//! - Kinds persist independently; there is no atomicity across kinds.
//! - With [`WritePolicy::SkipEmpty`] (the default) an empty collection is
//!   never written, so deleting the last record leaves the previous snapshot
//!   in storage. [`WritePolicy::WriteEmpty`] writes `[]` instead.
//! - Stored JSON that does not parse is ignored with a warning and the
//!   collection starts empty.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use shared::{FeedingRecord, GrowthRecord, Medicine, Observation, SleepRecord};

use super::keys;
use super::traits::KeyValueStorage;

/// A record kind that lives in its own storage key
pub trait StoredRecord: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    const STORAGE_KEY: &'static str;
    const ID_PREFIX: &'static str;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);

    fn generate_id() -> String {
        format!("{}::{}", Self::ID_PREFIX, Uuid::new_v4())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WritePolicy {
    #[default]
    SkipEmpty,
    WriteEmpty,
}

impl WritePolicy {
    pub fn from_flag(persist_empty_collections: bool) -> Self {
        if persist_empty_collections {
            WritePolicy::WriteEmpty
        } else {
            WritePolicy::SkipEmpty
        }
    }
}

#[derive(Clone)]
pub struct RecordStore<T: StoredRecord> {
    storage: Arc<dyn KeyValueStorage>,
    records: Arc<RwLock<Vec<T>>>,
    policy: WritePolicy,
}

impl<T: StoredRecord> RecordStore<T> {
    /// Load the collection from storage, starting empty if it is missing or unreadable
    pub fn load(storage: Arc<dyn KeyValueStorage>, policy: WritePolicy) -> Self {
        let records = match storage.get(T::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Vec<T>>(&json) {
                Ok(records) => {
                    info!("Loaded {} records from '{}'", records.len(), T::STORAGE_KEY);
                    records
                }
                Err(e) => {
                    warn!("Ignoring corrupt data under '{}': {}", T::STORAGE_KEY, e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Could not read '{}', starting empty: {}", T::STORAGE_KEY, e);
                Vec::new()
            }
        };

        Self {
            storage,
            records: Arc::new(RwLock::new(records)),
            policy,
        }
    }

    /// Assign a fresh id, put the record first and persist the collection
    pub fn add(&self, mut record: T) -> Result<T> {
        record.set_id(T::generate_id());

        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        let mut updated = Vec::with_capacity(records.len() + 1);
        updated.push(record.clone());
        updated.extend(records.iter().cloned());

        self.persist(&updated)?;
        *records = updated;

        debug!("Added {} to '{}'", record.id(), T::STORAGE_KEY);
        Ok(record)
    }

    /// Remove by id. Unknown ids are a no-op and return false.
    pub fn remove(&self, id: &str) -> Result<bool> {
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        if !records.iter().any(|record| record.id() == id) {
            return Ok(false);
        }

        let updated: Vec<T> = records.iter().filter(|record| record.id() != id).cloned().collect();
        self.persist(&updated)?;
        *records = updated;

        debug!("Removed {} from '{}'", id, T::STORAGE_KEY);
        Ok(true)
    }

    /// Newest first
    pub fn list(&self) -> Vec<T> {
        self.records.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// The most recently added record
    pub fn latest(&self) -> Option<T> {
        self.records.read().unwrap_or_else(|e| e.into_inner()).first().cloned()
    }

    pub fn get(&self, id: &str) -> Option<T> {
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        records.iter().find(|record| record.id() == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn persist(&self, records: &[T]) -> Result<()> {
        if records.is_empty() && self.policy == WritePolicy::SkipEmpty {
            debug!("Collection '{}' is empty, leaving stored snapshot as is", T::STORAGE_KEY);
            return Ok(());
        }

        let json = serde_json::to_string(records)
            .with_context(|| format!("Failed to serialize '{}'", T::STORAGE_KEY))?;
        self.storage
            .set(T::STORAGE_KEY, &json)
            .with_context(|| format!("Failed to persist '{}'", T::STORAGE_KEY))
    }
}

impl StoredRecord for FeedingRecord {
    const STORAGE_KEY: &'static str = keys::FEEDING_RECORDS;
    const ID_PREFIX: &'static str = "feeding";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl StoredRecord for SleepRecord {
    const STORAGE_KEY: &'static str = keys::SLEEP_RECORDS;
    const ID_PREFIX: &'static str = "sleep";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl StoredRecord for GrowthRecord {
    const STORAGE_KEY: &'static str = keys::GROWTH_RECORDS;
    const ID_PREFIX: &'static str = "growth";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl StoredRecord for Observation {
    const STORAGE_KEY: &'static str = keys::OBSERVATIONS;
    const ID_PREFIX: &'static str = "observation";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl StoredRecord for Medicine {
    const STORAGE_KEY: &'static str = keys::MEDICINES;
    const ID_PREFIX: &'static str = "medicine";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}
