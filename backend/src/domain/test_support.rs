//! Shared fixture for the service tests: in-memory storage and a clock pinned
//! to 15/06/2024 09:00.

use chrono::{Local, NaiveDate, TimeZone};
use std::sync::Arc;

use shared::Gender;

use crate::clock::{Clock, ManualClock};
use crate::domain::access_gate::AccessGate;
use crate::domain::commands::profile::CreateProfileCommand;
use crate::domain::feeding_service::FeedingService;
use crate::domain::growth_service::GrowthService;
use crate::domain::medicine_service::MedicineService;
use crate::domain::observation_service::ObservationService;
use crate::domain::profile_service::ProfileService;
use crate::domain::recommendation::RecommendationService;
use crate::domain::sleep_service::SleepService;
use crate::domain::subscription_service::SubscriptionService;
use crate::storage::{KeyValueStorage, MemoryStorage, WritePolicy};

pub struct TestContext {
    pub storage: Arc<MemoryStorage>,
    pub clock: Arc<ManualClock>,
    pub profile: ProfileService,
    pub subscription: SubscriptionService,
    pub gate: AccessGate,
}

impl TestContext {
    pub fn new() -> Self {
        let storage = Arc::new(MemoryStorage::new());
        let clock = Arc::new(ManualClock::new(Local.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap()));

        let profile = ProfileService::new(storage.clone(), clock.clone());
        let subscription = SubscriptionService::new(storage.clone(), clock.clone(), 5).unwrap();
        let gate = AccessGate::new(profile.clone(), subscription.clone());

        Self { storage, clock, profile, subscription, gate }
    }

    /// A context whose baby (born 20/03/2024) is 3 months old
    pub fn onboarded() -> Self {
        let ctx = Self::new();
        ctx.profile
            .create_profile(CreateProfileCommand {
                name: "Helena".to_string(),
                birth_date: NaiveDate::from_ymd_opt(2024, 3, 20),
                gender: Some(Gender::Female),
                photo: None,
            })
            .unwrap();
        ctx
    }

    fn storage(&self) -> Arc<dyn KeyValueStorage> {
        self.storage.clone()
    }

    fn clock(&self) -> Arc<dyn Clock> {
        self.clock.clone()
    }

    pub fn feeding_service(&self) -> FeedingService {
        FeedingService::new(self.storage(), WritePolicy::SkipEmpty, self.gate.clone(), self.clock())
    }

    pub fn sleep_service(&self) -> SleepService {
        SleepService::new(self.storage(), WritePolicy::SkipEmpty, self.gate.clone(), self.clock(), 60)
    }

    pub fn growth_service(&self) -> GrowthService {
        GrowthService::new(
            self.storage(),
            WritePolicy::SkipEmpty,
            self.profile.clone(),
            self.gate.clone(),
            self.clock(),
        )
    }

    pub fn observation_service(&self) -> ObservationService {
        ObservationService::new(self.storage(), WritePolicy::SkipEmpty, self.gate.clone(), self.clock())
    }

    pub fn medicine_service(&self) -> MedicineService {
        MedicineService::new(self.storage(), WritePolicy::SkipEmpty, self.gate.clone(), self.clock())
    }

    pub fn recommendation_service(&self) -> RecommendationService {
        RecommendationService::new(
            self.observation_service(),
            self.profile.clone(),
            self.gate.clone(),
            self.clock(),
        )
    }
}
