//! Typed domain errors.
//!
//! Services return `anyhow::Result`; these types travel inside it so callers
//! can recover them with `downcast_ref` when they need to react to a specific
//! failure (e.g. show the plan prompt on [`AccessError::Locked`]).

use std::fmt;

use crate::domain::models::tracker::TrackerKind;

/// Input that the data layer refuses to turn into a record
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },
    #[error("'{value}' is not a whole number")]
    InvalidNumber { value: String },
    #[error("'{value}' is not a time of day (HH:MM)")]
    InvalidTime { value: String },
    #[error("{field} must be a finite, non-negative number")]
    InvalidMeasurement { field: &'static str },
    #[error("Birth date cannot be in the future")]
    BirthDateInFuture,
    #[error("End date cannot be before the start date")]
    EndBeforeStart,
    #[error("Photo must be a data URI")]
    InvalidPhoto,
}

/// A tracker was asked to make a transition its current state does not allow
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidStateError {
    #[error("The {tracker} tracker is not running")]
    TrackerNotRunning { tracker: TrackerKind },
    #[error("The {tracker} tracker is already running")]
    TrackerAlreadyRunning { tracker: TrackerKind },
}

/// Sections of the app guarded by the onboarding and subscription gates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Profile,
    Feeding,
    Sleep,
    Growth,
    Observations,
    Medicines,
    Routine,
}

impl Feature {
    pub const ALL: [Feature; 7] = [
        Feature::Profile,
        Feature::Feeding,
        Feature::Sleep,
        Feature::Growth,
        Feature::Observations,
        Feature::Medicines,
        Feature::Routine,
    ];

    /// Every feature except the profile sits behind the trial/premium gate
    pub fn is_gated(&self) -> bool {
        !matches!(self, Feature::Profile)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Feature::Profile => "profile",
            Feature::Feeding => "feeding",
            Feature::Sleep => "sleep",
            Feature::Growth => "growth",
            Feature::Observations => "observations",
            Feature::Medicines => "medicines",
            Feature::Routine => "routine",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AccessError {
    #[error("Create the baby profile first")]
    OnboardingRequired,
    #[error("The {feature} section is locked until a plan is chosen")]
    Locked { feature: Feature },
}
