//! Domain-level command types.
//!
//! Commands carry validated, typed input into the services. The `*Form`
//! types mirror what a data-entry screen holds (free text, a type selector)
//! and turn it into a command, which is where irrelevant fields get dropped:
//! a formula feeding never carries a breast side, a breast feeding never
//! carries an amount.

use chrono::{NaiveDate, NaiveTime};

use shared::{BehaviorFlags, BreastSide, Feeding, Gender, SleepKind, SleepQuality, SubscriptionPlan};

use crate::domain::models::tracker::TrackerStop;
use crate::errors::ValidationError;

/// Parse a free-form minutes/milliliters field: blank means "not given"
pub fn parse_whole_number(input: &str) -> Result<Option<u32>, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<u32>()
        .map(Some)
        .map_err(|_| ValidationError::InvalidNumber { value: trimmed.to_string() })
}

/// Parse an `HH:MM` field: blank means "not given"
pub fn parse_time_of_day(input: &str) -> Result<Option<NaiveTime>, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .map(Some)
        .map_err(|_| ValidationError::InvalidTime { value: trimmed.to_string() })
}

pub mod profile {
    use super::*;

    /// Onboarding input. Optional fields exist so that missing input can be
    /// reported by name instead of being unrepresentable upstream.
    #[derive(Debug, Clone, Default)]
    pub struct CreateProfileCommand {
        pub name: String,
        pub birth_date: Option<NaiveDate>,
        pub gender: Option<Gender>,
        pub photo: Option<String>,
    }

    /// In-place edit; `None` leaves the field as is
    #[derive(Debug, Clone, Default)]
    pub struct UpdateProfileCommand {
        pub name: Option<String>,
        pub birth_date: Option<NaiveDate>,
        pub gender: Option<Gender>,
    }
}

pub mod feeding {
    use super::*;

    #[derive(Debug, Clone)]
    pub struct CreateFeedingCommand {
        pub feeding: Feeding,
        pub notes: Option<String>,
    }

    /// Type selector on the feeding form
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum FeedingType {
        #[default]
        Breast,
        Formula,
        Both,
    }

    /// Raw feeding form state
    #[derive(Debug, Clone, Default)]
    pub struct FeedingForm {
        pub feeding_type: FeedingType,
        pub duration: String,
        pub amount: String,
        pub side: BreastSide,
        pub notes: String,
    }

    impl FeedingForm {
        /// Pre-fill from a stopped feeding tracker
        pub fn from_tracker(stop: &TrackerStop) -> Self {
            Self {
                duration: stop.duration_minutes.to_string(),
                ..Self::default()
            }
        }

        pub fn into_command(self) -> Result<CreateFeedingCommand, ValidationError> {
            let duration_minutes = parse_whole_number(&self.duration)?;
            let amount_ml = parse_whole_number(&self.amount)?;

            let feeding = match self.feeding_type {
                FeedingType::Breast => Feeding::Breast { duration_minutes, side: self.side },
                FeedingType::Formula => Feeding::Formula { amount_ml },
                FeedingType::Both => Feeding::Both { amount_ml, duration_minutes, side: self.side },
            };

            let notes = self.notes.trim();
            Ok(CreateFeedingCommand {
                feeding,
                notes: (!notes.is_empty()).then(|| notes.to_string()),
            })
        }
    }
}

pub mod sleep {
    use super::*;

    #[derive(Debug, Clone)]
    pub struct CreateSleepCommand {
        pub kind: SleepKind,
        pub duration_minutes: Option<u32>,
        pub start_time: Option<NaiveTime>,
        pub end_time: Option<NaiveTime>,
        pub quality: Option<SleepQuality>,
        pub wake_ups: Option<u32>,
        pub notes: Option<String>,
    }

    impl CreateSleepCommand {
        pub fn new(kind: SleepKind) -> Self {
            Self {
                kind,
                duration_minutes: None,
                start_time: None,
                end_time: None,
                quality: None,
                wake_ups: None,
                notes: None,
            }
        }
    }

    /// Raw sleep form state
    #[derive(Debug, Clone)]
    pub struct SleepForm {
        pub kind: SleepKind,
        pub start_time: String,
        pub end_time: String,
        pub duration: String,
    }

    impl Default for SleepForm {
        fn default() -> Self {
            Self {
                kind: SleepKind::Nap,
                start_time: String::new(),
                end_time: String::new(),
                duration: String::new(),
            }
        }
    }

    impl SleepForm {
        /// Pre-fill duration and both times from a stopped sleep tracker
        pub fn from_tracker(stop: &TrackerStop) -> Self {
            Self {
                kind: SleepKind::Nap,
                start_time: stop.start_time_of_day().format("%H:%M").to_string(),
                end_time: stop.end_time_of_day().format("%H:%M").to_string(),
                duration: stop.duration_minutes.to_string(),
            }
        }

        pub fn into_command(self) -> Result<CreateSleepCommand, ValidationError> {
            Ok(CreateSleepCommand {
                duration_minutes: parse_whole_number(&self.duration)?,
                start_time: parse_time_of_day(&self.start_time)?,
                end_time: parse_time_of_day(&self.end_time)?,
                ..CreateSleepCommand::new(self.kind)
            })
        }
    }
}

pub mod growth {
    #[derive(Debug, Clone, Copy)]
    pub struct CreateGrowthCommand {
        pub weight_kg: f64,
        pub height_cm: f64,
    }
}

pub mod observation {
    use super::*;

    #[derive(Debug, Clone, Default)]
    pub struct CreateObservationCommand {
        pub flags: BehaviorFlags,
        pub notes: String,
    }
}

pub mod medicine {
    use super::*;

    #[derive(Debug, Clone, Default)]
    pub struct CreateMedicineCommand {
        pub name: String,
        pub dosage: String,
        pub frequency: String,
        pub purpose: String,
        /// Defaults to today
        pub start_date: Option<NaiveDate>,
        pub end_date: Option<NaiveDate>,
        pub notes: Option<String>,
    }
}

pub mod subscription {
    use super::*;

    #[derive(Debug, Clone, Copy)]
    pub struct SubscribeCommand {
        pub plan: SubscriptionPlan,
    }
}
