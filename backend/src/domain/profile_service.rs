//! The single baby profile.
//!
//! Until a profile exists the app is onboarding-only. The profile is the one
//! record (besides the subscription) that is edited in place.

use anyhow::Result;
use log::{info, warn};
use std::sync::Arc;

use shared::BabyProfile;

use crate::clock::Clock;
use crate::domain::commands::profile::{CreateProfileCommand, UpdateProfileCommand};
use crate::domain::recommendation::age_in_months;
use crate::errors::{AccessError, ValidationError};
use crate::storage::{keys, DocumentLoad, DocumentStore, KeyValueStorage};

#[derive(Clone)]
pub struct ProfileService {
    store: DocumentStore<BabyProfile>,
    clock: Arc<dyn Clock>,
}

impl ProfileService {
    pub fn new(storage: Arc<dyn KeyValueStorage>, clock: Arc<dyn Clock>) -> Self {
        let (store, load) = DocumentStore::open(storage, keys::BABY_PROFILE);
        if load == DocumentLoad::Corrupt {
            warn!("Stored profile is unreadable, starting onboarding again");
            if let Err(e) = store.clear() {
                warn!("Could not remove the unreadable profile: {:#}", e);
            }
        }
        Self { store, clock }
    }

    pub fn profile(&self) -> Option<BabyProfile> {
        self.store.get()
    }

    pub fn has_profile(&self) -> bool {
        self.store.exists()
    }

    /// Finish onboarding
    pub fn create_profile(&self, command: CreateProfileCommand) -> Result<BabyProfile> {
        if self.has_profile() {
            return Err(anyhow::anyhow!("A profile already exists; edit it instead"));
        }

        let name = command.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingField { field: "name" }.into());
        }
        let birth_date = command
            .birth_date
            .ok_or(ValidationError::MissingField { field: "birth_date" })?;
        let gender = command.gender.ok_or(ValidationError::MissingField { field: "gender" })?;
        self.validate_birth_date(birth_date)?;
        if let Some(photo) = &command.photo {
            Self::validate_photo(photo)?;
        }

        let profile = BabyProfile {
            name: name.to_string(),
            birth_date,
            gender,
            photo: command.photo,
        };
        self.store.save(profile.clone())?;

        info!("Created profile for {} born {}", profile.name, profile.birth_date);
        Ok(profile)
    }

    pub fn update_profile(&self, command: UpdateProfileCommand) -> Result<BabyProfile> {
        let mut profile = self.require_profile()?;

        if let Some(name) = command.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(ValidationError::MissingField { field: "name" }.into());
            }
            profile.name = name.to_string();
        }
        if let Some(birth_date) = command.birth_date {
            self.validate_birth_date(birth_date)?;
            profile.birth_date = birth_date;
        }
        if let Some(gender) = command.gender {
            profile.gender = gender;
        }

        self.store.save(profile.clone())?;
        info!("Updated profile for {}", profile.name);
        Ok(profile)
    }

    /// Store the data URI produced by the host's image codec
    pub fn set_photo(&self, data_uri: String) -> Result<BabyProfile> {
        let mut profile = self.require_profile()?;
        Self::validate_photo(&data_uri)?;
        profile.photo = Some(data_uri);
        self.store.save(profile.clone())?;
        info!("Updated profile photo");
        Ok(profile)
    }

    pub fn clear_photo(&self) -> Result<BabyProfile> {
        let mut profile = self.require_profile()?;
        profile.photo = None;
        self.store.save(profile.clone())?;
        Ok(profile)
    }

    /// Current age in whole calendar months, if onboarded
    pub fn age_in_months(&self) -> Option<i32> {
        self.profile()
            .map(|profile| age_in_months(profile.birth_date, self.clock.now().date_naive()))
    }

    fn require_profile(&self) -> Result<BabyProfile> {
        self.profile().ok_or_else(|| AccessError::OnboardingRequired.into())
    }

    fn validate_birth_date(&self, birth_date: chrono::NaiveDate) -> Result<(), ValidationError> {
        if birth_date > self.clock.now().date_naive() {
            return Err(ValidationError::BirthDateInFuture);
        }
        Ok(())
    }

    fn validate_photo(photo: &str) -> Result<(), ValidationError> {
        if !photo.starts_with("data:") {
            return Err(ValidationError::InvalidPhoto);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::storage::MemoryStorage;
    use chrono::{Local, NaiveDate, TimeZone};
    use shared::Gender;

    fn setup_test() -> (ProfileService, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let clock = ManualClock::new(Local.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap());
        (ProfileService::new(storage.clone(), Arc::new(clock)), storage)
    }

    fn command() -> CreateProfileCommand {
        CreateProfileCommand {
            name: "  Helena ".to_string(),
            birth_date: NaiveDate::from_ymd_opt(2024, 3, 20),
            gender: Some(Gender::Female),
            photo: None,
        }
    }

    #[test]
    fn test_create_profile() {
        let (service, storage) = setup_test();
        assert!(!service.has_profile());
        assert_eq!(service.age_in_months(), None);

        let profile = service.create_profile(command()).unwrap();
        assert_eq!(profile.name, "Helena");
        assert_eq!(service.age_in_months(), Some(3));

        let raw = storage.get(keys::BABY_PROFILE).unwrap().unwrap();
        assert!(raw.contains("\"birthDate\":\"2024-03-20\""));
        assert!(raw.contains("\"gender\":\"girl\""));
    }

    #[test]
    fn test_create_profile_names_missing_field() {
        let (service, _storage) = setup_test();

        let err = service.create_profile(CreateProfileCommand { name: " ".to_string(), ..command() }).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::MissingField { field: "name" })
        );

        let err = service.create_profile(CreateProfileCommand { birth_date: None, ..command() }).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::MissingField { field: "birth_date" })
        );

        let err = service.create_profile(CreateProfileCommand { gender: None, ..command() }).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::MissingField { field: "gender" })
        );

        let future = NaiveDate::from_ymd_opt(2024, 7, 1);
        let err = service.create_profile(CreateProfileCommand { birth_date: future, ..command() }).unwrap_err();
        assert_eq!(err.downcast_ref::<ValidationError>(), Some(&ValidationError::BirthDateInFuture));

        assert!(!service.has_profile());
    }

    #[test]
    fn test_only_one_profile() {
        let (service, _storage) = setup_test();
        service.create_profile(command()).unwrap();
        assert!(service.create_profile(command()).is_err());
    }

    #[test]
    fn test_update_in_place() {
        let (service, storage) = setup_test();
        assert!(service.update_profile(UpdateProfileCommand::default()).is_err());

        service.create_profile(command()).unwrap();
        let updated = service
            .update_profile(UpdateProfileCommand {
                name: Some("Helena Maria".to_string()),
                gender: None,
                birth_date: NaiveDate::from_ymd_opt(2024, 2, 29),
            })
            .unwrap();

        assert_eq!(updated.name, "Helena Maria");
        assert_eq!(updated.gender, Gender::Female);
        assert_eq!(service.age_in_months(), Some(4));

        let reloaded = ProfileService::new(storage, Arc::new(ManualClock::new(Local::now())));
        assert_eq!(reloaded.profile(), Some(updated));
    }

    #[test]
    fn test_photo() {
        let (service, _storage) = setup_test();
        service.create_profile(command()).unwrap();

        assert!(service.set_photo("not-a-data-uri".to_string()).is_err());

        let profile = service.set_photo("data:image/png;base64,iVBORw0KGgo=".to_string()).unwrap();
        assert!(profile.photo.is_some());

        let profile = service.clear_photo().unwrap();
        assert_eq!(profile.photo, None);
    }

    #[test]
    fn test_corrupt_profile_means_onboarding() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(keys::BABY_PROFILE, "{\"name\": 42}").unwrap();

        let service = ProfileService::new(storage.clone(), Arc::new(ManualClock::new(Local::now())));
        assert!(!service.has_profile());
        assert_eq!(storage.get(keys::BABY_PROFILE).unwrap(), None);

        let clock = ManualClock::new(Local.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap());
        let service = ProfileService::new(storage.clone(), Arc::new(clock));
        service.create_profile(command()).unwrap();
        assert!(storage.get(keys::BABY_PROFILE).unwrap().is_some());
    }
}
