//! Storage keys. These names are the existing on-device layout and must not change.

pub const BABY_PROFILE: &str = "babyProfile";
pub const GROWTH_RECORDS: &str = "growthRecords";
pub const FEEDING_RECORDS: &str = "feedingRecords";
pub const SLEEP_RECORDS: &str = "sleepRecords";
pub const OBSERVATIONS: &str = "observations";
pub const MEDICINES: &str = "medicines";
pub const SUBSCRIPTION: &str = "subscription";
