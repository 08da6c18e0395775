use anyhow::Result;
use log::info;
use std::sync::Arc;

use shared::{Medicine, MedicineStatus};

use crate::clock::Clock;
use crate::domain::access_gate::AccessGate;
use crate::domain::commands::medicine::CreateMedicineCommand;
use crate::errors::{Feature, ValidationError};
use crate::storage::{KeyValueStorage, RecordStore, WritePolicy};

#[derive(Clone)]
pub struct MedicineService {
    store: RecordStore<Medicine>,
    gate: AccessGate,
    clock: Arc<dyn Clock>,
}

impl MedicineService {
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

    pub fn add_medicine(&self, command: CreateMedicineCommand) -> Result<Medicine> {
        self.gate.ensure(Feature::Medicines)?;

        let name = required("name", &command.name)?;
        let dosage = required("dosage", &command.dosage)?;
        let frequency = required("frequency", &command.frequency)?;
        let purpose = required("purpose", &command.purpose)?;

        let start_date = command.start_date.unwrap_or_else(|| self.clock.now().date_naive());
        if let Some(end_date) = command.end_date {
            if end_date < start_date {
                return Err(ValidationError::EndBeforeStart.into());
            }
        }

        let record = self.store.add(Medicine {
            id: String::new(),
            name,
            dosage,
            frequency,
            start_date,
            end_date: command.end_date,
            purpose,
            notes: command.notes.filter(|notes| !notes.trim().is_empty()),
        })?;

        info!("Added medicine {} ({})", record.name, record.id);
        Ok(record)
    }

    pub fn delete_medicine(&self, id: &str) -> Result<bool> {
        self.gate.ensure(Feature::Medicines)?;
        let removed = self.store.remove(id)?;
        if removed {
            info!("Deleted medicine {}", id);
        }
        Ok(removed)
    }

    pub fn list_medicines(&self) -> Vec<Medicine> {
        self.store.list()
    }

    /// Medicines with no end date or one still ahead
    pub fn active(&self) -> Vec<Medicine> {
        self.with_status(MedicineStatus::Active)
    }

    pub fn historical(&self) -> Vec<Medicine> {
        self.with_status(MedicineStatus::Historical)
    }

    fn with_status(&self, status: MedicineStatus) -> Vec<Medicine> {
        let now = self.clock.now().naive_local();
        self.store
            .list()
            .into_iter()
            .filter(|medicine| medicine.status_at(now) == status)
            .collect()
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField { field });
    }
    Ok(trimmed.to_string())
}
