//! # Tilly Backend
//!
//! Core services for the Tilly baby tracker. The crate has no UI and no
//! network layer: a host application drives it through [`Backend`], which owns
//! one service per record kind plus the feeding and sleep trackers.
//!
//! ## Layout
//!
//! - `domain`: services, trackers, recommendation engine and command types
//! - `storage`: key-value persistence (in-memory or one JSON file per key)
//! - `config`, `logging`, `clock`, `errors`: ambient plumbing

use anyhow::Result;
use log::info;
use std::sync::Arc;

pub mod clock;
pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod storage;

use clock::{Clock, SystemClock};
use config::AppConfig;
use domain::commands::feeding::FeedingForm;
use domain::commands::sleep::SleepForm;
use domain::models::tracker::TrackerKind;
use domain::{
    AccessGate, ElapsedTicker, ElapsedTracker, FeedingService, GrowthService, MedicineService, ObservationService,
    ProfileService, RecommendationService, SleepService, SubscriptionService,
};
use shared::DailySummary;
use storage::{JsonFileStorage, KeyValueStorage, WritePolicy};

/// Root controller holding every service
pub struct Backend {
    pub config: AppConfig,
    pub profile_service: ProfileService,
    pub subscription_service: SubscriptionService,
    pub access_gate: AccessGate,
    pub feeding_service: FeedingService,
    pub sleep_service: SleepService,
    pub growth_service: GrowthService,
    pub observation_service: ObservationService,
    pub medicine_service: MedicineService,
    pub recommendation_service: RecommendationService,
    pub feeding_tracker: ElapsedTracker,
    pub sleep_tracker: ElapsedTracker,
    clock: Arc<dyn Clock>,
}

impl Backend {
    /// Open the JSON store in the configured data directory using the system clock
    pub fn new(config: AppConfig) -> Result<Self> {
        logging::init_logging(&config.log_level)?;

        let data_directory = config.resolve_data_directory()?;
        let storage = Arc::new(JsonFileStorage::new(&data_directory)?);
        info!("Using data directory {}", data_directory.display());
        Self::with_storage(storage, Arc::new(SystemClock), config)
    }

    pub fn with_storage(storage: Arc<dyn KeyValueStorage>, clock: Arc<dyn Clock>, config: AppConfig) -> Result<Self> {
        let policy = WritePolicy::from_flag(config.persist_empty_collections);

        // Initialize all services
        let profile_service = ProfileService::new(storage.clone(), clock.clone());
        let subscription_service = SubscriptionService::new(storage.clone(), clock.clone(), config.trial_days)?;
        let access_gate = AccessGate::new(profile_service.clone(), subscription_service.clone());

        let feeding_service = FeedingService::new(storage.clone(), policy, access_gate.clone(), clock.clone());
        let sleep_service = SleepService::new(
            storage.clone(),
            policy,
            access_gate.clone(),
            clock.clone(),
            config.default_sleep_minutes,
        );
        let growth_service = GrowthService::new(
            storage.clone(),
            policy,
            profile_service.clone(),
            access_gate.clone(),
            clock.clone(),
        );
        let observation_service = ObservationService::new(storage.clone(), policy, access_gate.clone(), clock.clone());
        let medicine_service = MedicineService::new(storage, policy, access_gate.clone(), clock.clone());
        let recommendation_service = RecommendationService::new(
            observation_service.clone(),
            profile_service.clone(),
            access_gate.clone(),
            clock.clone(),
        );

        Ok(Self {
            feeding_tracker: ElapsedTracker::new(TrackerKind::Feeding, clock.clone()),
            sleep_tracker: ElapsedTracker::new(TrackerKind::Sleep, clock.clone()),
            config,
            profile_service,
            subscription_service,
            access_gate,
            feeding_service,
            sleep_service,
            growth_service,
            observation_service,
            medicine_service,
            recommendation_service,
            clock,
        })
    }

    /// True until a baby profile exists
    pub fn is_onboarding(&self) -> bool {
        !self.profile_service.has_profile()
    }

    /// Stop the feeding tracker and pre-fill a feeding form with its duration
    pub fn finish_feeding_session(&mut self) -> Result<FeedingForm> {
        let stop = self.feeding_tracker.stop()?;
        Ok(FeedingForm::from_tracker(&stop))
    }

    /// Stop the sleep tracker and pre-fill a sleep form with its times
    pub fn finish_sleep_session(&mut self) -> Result<SleepForm> {
        let stop = self.sleep_tracker.stop()?;
        Ok(SleepForm::from_tracker(&stop))
    }

    /// Publish the running feeding tracker's minutes at the configured cadence
    pub fn spawn_feeding_ticker(&self) -> Result<ElapsedTicker> {
        Ok(self.feeding_tracker.spawn_ticker(self.config.tracker_tick())?)
    }

    pub fn spawn_sleep_ticker(&self) -> Result<ElapsedTicker> {
        Ok(self.sleep_tracker.spawn_ticker(self.config.tracker_tick())?)
    }

    pub fn daily_summary(&self) -> DailySummary {
        let today = domain::formatting::display_date(self.clock.now());
        domain::daily_summary::summarize_day(
            &self.feeding_service.list_feedings(),
            &self.sleep_service.list_sleeps(),
            &today,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::domain::commands::observation::CreateObservationCommand;
    use crate::domain::commands::profile::CreateProfileCommand;
    use crate::errors::{AccessError, Feature, InvalidStateError};
    use crate::storage::{keys, MemoryStorage};
    use chrono::{Duration, Local, TimeZone};
    use shared::{BehaviorFlags, DailyRange, Feeding, Gender, SubscriptionPlan};
    use tempfile::TempDir;

    fn setup_test() -> (Backend, Arc<ManualClock>, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let clock = Arc::new(ManualClock::new(Local.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap()));
        let backend = Backend::with_storage(storage.clone(), clock.clone(), AppConfig::default()).unwrap();
        (backend, clock, storage)
    }

    fn onboard(backend: &Backend, clock: &ManualClock) {
        backend
            .profile_service
            .create_profile(CreateProfileCommand {
                name: "Helena".to_string(),
                birth_date: Some(clock.now().date_naive() - Duration::days(90)),
                gender: Some(Gender::Female),
                photo: None,
            })
            .unwrap();
    }

    #[test]
    fn test_end_to_end_recommendations() {
        let (backend, clock, _storage) = setup_test();
        assert!(backend.is_onboarding());
        onboard(&backend, &clock);
        assert!(!backend.is_onboarding());

        let overview = backend.recommendation_service.routine_overview().unwrap();
        assert_eq!(overview.age_months, 3);
        assert_eq!(overview.routine.breast_feedings, DailyRange::new(7, 9));

        backend
            .observation_service
            .add_observation(CreateObservationCommand {
                flags: BehaviorFlags { colic: true, sleeps_well: true, eats_well: true, ..BehaviorFlags::default() },
                notes: String::new(),
            })
            .unwrap();

        let suggestions = backend.recommendation_service.suggestions().unwrap();
        assert_eq!(suggestions.len(), 3);
        assert!(suggestions.iter().all(|s| s.contains("cólicas") || s.contains("gases") || s.contains("barriga")));
        assert_eq!(backend.recommendation_service.medicine_recommendations().unwrap().len(), 2);
    }

    #[test]
    fn test_tracker_hand_off_to_records() {
        let (mut backend, clock, _storage) = setup_test();
        onboard(&backend, &clock);

        backend.feeding_tracker.start().unwrap();
        backend.sleep_tracker.start().unwrap();
        clock.advance(Duration::minutes(25));
        assert_eq!(backend.feeding_tracker.elapsed_minutes(), Some(25));

        let feeding = backend.finish_feeding_session().unwrap().into_command().unwrap();
        assert_eq!(feeding.feeding.duration_minutes(), Some(25));
        backend.feeding_service.add_feeding(feeding).unwrap();

        clock.advance(Duration::minutes(35));
        let sleep = backend.finish_sleep_session().unwrap();
        assert_eq!(sleep.start_time, "09:00");
        assert_eq!(sleep.end_time, "10:00");
        backend.sleep_service.add_sleep(sleep.into_command().unwrap()).unwrap();

        let summary = backend.daily_summary();
        assert_eq!(summary.feedings_today, 1);
        assert_eq!(summary.sleep_minutes_today, 60);
        assert_eq!(summary.formatted_sleep_today, "1h 0min");

        let err = backend.finish_sleep_session().unwrap_err();
        assert_eq!(
            err.downcast_ref::<InvalidStateError>(),
            Some(&InvalidStateError::TrackerNotRunning { tracker: TrackerKind::Sleep })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_tickers_use_configured_cadence() {
        let storage = Arc::new(MemoryStorage::new());
        let clock = Arc::new(ManualClock::new(Local.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap()));
        let config = AppConfig { tracker_tick_millis: 250, ..AppConfig::default() };
        let mut backend = Backend::with_storage(storage, clock.clone(), config).unwrap();

        assert!(backend.spawn_sleep_ticker().is_err());

        backend.sleep_tracker.start().unwrap();
        let ticker = backend.spawn_sleep_ticker().unwrap();
        let mut updates = ticker.subscribe();
        // Let the first immediate tick run
        tokio::time::advance(std::time::Duration::from_millis(1)).await;
        tokio::task::yield_now().await;

        clock.advance(Duration::minutes(12));
        tokio::time::advance(std::time::Duration::from_millis(100)).await;
        tokio::task::yield_now().await;
        assert!(!updates.has_changed().unwrap());

        tokio::time::advance(std::time::Duration::from_millis(150)).await;
        updates.changed().await.unwrap();
        assert_eq!(*updates.borrow(), 12);

        ticker.stop();
        assert!(backend.spawn_feeding_ticker().is_err());
    }

    #[test]
    fn test_new_rejects_invalid_log_level() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig {
            data_directory: Some(dir.path().to_path_buf()),
            log_level: "tilly_backend=loud".to_string(),
            ..AppConfig::default()
        };
        assert!(Backend::new(config).is_err());
    }

    #[test]
    fn test_trial_lock_and_upgrade() {
        let (backend, clock, _storage) = setup_test();
        onboard(&backend, &clock);

        clock.advance(Duration::days(5) + Duration::seconds(1));
        let status = backend.subscription_service.evaluate().unwrap();
        assert!(status.prompt_required);

        let command = Feeding::Formula { amount_ml: Some(100) };
        let err = backend
            .feeding_service
            .add_feeding(domain::commands::feeding::CreateFeedingCommand { feeding: command.clone(), notes: None })
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<AccessError>(),
            Some(&AccessError::Locked { feature: Feature::Feeding })
        );
        assert!(backend.access_gate.can_access(Feature::Profile));

        backend.subscription_service.subscribe_to(SubscriptionPlan::Yearly).unwrap();
        backend
            .feeding_service
            .add_feeding(domain::commands::feeding::CreateFeedingCommand { feeding: command, notes: None })
            .unwrap();
    }

    #[test]
    fn test_empty_collection_write_policy() {
        let (backend, clock, storage) = setup_test();
        onboard(&backend, &clock);

        let record = backend
            .observation_service
            .add_observation(CreateObservationCommand::default())
            .unwrap();
        backend.observation_service.delete_observation(&record.id).unwrap();

        // The last non-empty snapshot stays behind by default
        let reloaded = Backend::with_storage(storage.clone(), clock.clone(), AppConfig::default()).unwrap();
        assert_eq!(reloaded.observation_service.list_observations(), vec![record]);

        let config = AppConfig { persist_empty_collections: true, ..AppConfig::default() };
        let fixed = Backend::with_storage(storage.clone(), clock.clone(), config).unwrap();
        let id = fixed.observation_service.latest().unwrap().id;
        fixed.observation_service.delete_observation(&id).unwrap();
        assert_eq!(storage.get(keys::OBSERVATIONS).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_json_files_survive_restart() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig { data_directory: Some(dir.path().to_path_buf()), ..AppConfig::default() };

        let backend = Backend::new(config.clone()).unwrap();
        backend
            .profile_service
            .create_profile(CreateProfileCommand {
                name: "Theo".to_string(),
                birth_date: Some(Local::now().date_naive() - Duration::days(30)),
                gender: Some(Gender::Male),
                photo: None,
            })
            .unwrap();
        drop(backend);

        let reopened = Backend::new(config).unwrap();
        assert!(!reopened.is_onboarding());
        assert!(dir.path().join("babyProfile.json").exists());
        assert!(dir.path().join("subscription.json").exists());
    }
}
