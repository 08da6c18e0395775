use anyhow::Result;
use log::info;
use std::sync::Arc;

use shared::GrowthRecord;

use crate::clock::Clock;
use crate::domain::access_gate::AccessGate;
use crate::domain::commands::growth::CreateGrowthCommand;
use crate::domain::formatting::display_date;
use crate::domain::profile_service::ProfileService;
use crate::errors::{AccessError, Feature, ValidationError};
use crate::storage::{KeyValueStorage, RecordStore, WritePolicy};

/// Weight/height measurements, each tagged with the baby's age at the time
#[derive(Clone)]
pub struct GrowthService {
    store: RecordStore<GrowthRecord>,
    profile: ProfileService,
    gate: AccessGate,
    clock: Arc<dyn Clock>,
}

impl GrowthService {
    pub fn new(
        storage: Arc<dyn KeyValueStorage>,
        policy: WritePolicy,
        profile: ProfileService,
        gate: AccessGate,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store: RecordStore::load(storage, policy),
            profile,
            gate,
            clock,
        }
    }

    pub fn add_growth(&self, command: CreateGrowthCommand) -> Result<GrowthRecord> {
        self.gate.ensure(Feature::Growth)?;
        validate_measurement("weight", command.weight_kg)?;
        validate_measurement("height", command.height_cm)?;

        let age = self.profile.age_in_months().ok_or(AccessError::OnboardingRequired)?;
        let record = self.store.add(GrowthRecord {
            id: String::new(),
            date: display_date(self.clock.now()),
            weight: command.weight_kg,
            height: command.height_cm,
            age,
        })?;

        info!(
            "Added growth {}: {} kg, {} cm at {} months",
            record.id, record.weight, record.height, record.age
        );
        Ok(record)
    }

    pub fn delete_growth(&self, id: &str) -> Result<bool> {
        self.gate.ensure(Feature::Growth)?;
        let removed = self.store.remove(id)?;
        if removed {
            info!("Deleted growth {}", id);
        }
        Ok(removed)
    }

    pub fn list_growth(&self) -> Vec<GrowthRecord> {
        self.store.list()
    }

    pub fn latest(&self) -> Option<GrowthRecord> {
        self.store.latest()
    }
}

fn validate_measurement(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::InvalidMeasurement { field });
    }
    Ok(())
}
