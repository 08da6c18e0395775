use anyhow::Result;
use log::info;
use std::sync::Arc;

use shared::FeedingRecord;

use crate::clock::Clock;
use crate::domain::access_gate::AccessGate;
use crate::domain::commands::feeding::CreateFeedingCommand;
use crate::domain::formatting::{display_date, display_time};
use crate::errors::Feature;
use crate::storage::{KeyValueStorage, RecordStore, WritePolicy};

#[derive(Clone)]
pub struct FeedingService {
    store: RecordStore<FeedingRecord>,
    gate: AccessGate,
    clock: Arc<dyn Clock>,
}

impl FeedingService {
    pub fn new(
        storage: Arc<dyn KeyValueStorage>,
        policy: WritePolicy,
        gate: AccessGate,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store: RecordStore::load(storage, policy),
            gate,
            clock,
        }
    }

    /// Record a feeding dated now
    pub fn add_feeding(&self, command: CreateFeedingCommand) -> Result<FeedingRecord> {
        self.gate.ensure(Feature::Feeding)?;

        let now = self.clock.now();
        let record = self.store.add(FeedingRecord {
            id: String::new(),
            date: display_date(now),
            time: display_time(now),
            feeding: command.feeding,
            notes: command.notes,
        })?;

        info!("Added feeding {} at {} {}", record.id, record.date, record.time);
        Ok(record)
    }

    pub fn delete_feeding(&self, id: &str) -> Result<bool> {
        self.gate.ensure(Feature::Feeding)?;
        let removed = self.store.remove(id)?;
        if removed {
            info!("Deleted feeding {}", id);
        }
        Ok(removed)
    }

    /// Newest first
    pub fn list_feedings(&self) -> Vec<FeedingRecord> {
        self.store.list()
    }
}
