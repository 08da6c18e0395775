use anyhow::Result;
use log::info;
use std::sync::Arc;

use shared::Observation;

use crate::clock::Clock;
use crate::domain::access_gate::AccessGate;
use crate::domain::commands::observation::CreateObservationCommand;
use crate::domain::formatting::display_date;
use crate::errors::Feature;
use crate::storage::{KeyValueStorage, RecordStore, WritePolicy};

/// Daily behavior check-ins. The newest one drives the suggestions.
#[derive(Clone)]
pub struct ObservationService {
    store: RecordStore<Observation>,
    gate: AccessGate,
    clock: Arc<dyn Clock>,
}

impl ObservationService {
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

    pub fn add_observation(&self, command: CreateObservationCommand) -> Result<Observation> {
        self.gate.ensure(Feature::Observations)?;

        let record = self.store.add(Observation {
            id: String::new(),
            date: display_date(self.clock.now()),
            flags: command.flags,
            notes: command.notes.trim().to_string(),
        })?;

        info!("Added observation {} for {}", record.id, record.date);
        Ok(record)
    }

    pub fn delete_observation(&self, id: &str) -> Result<bool> {
        self.gate.ensure(Feature::Observations)?;
        let removed = self.store.remove(id)?;
        if removed {
            info!("Deleted observation {}", id);
        }
        Ok(removed)
    }

    pub fn list_observations(&self) -> Vec<Observation> {
        self.store.list()
    }

    pub fn latest(&self) -> Option<Observation> {
        self.store.latest()
    }
}
