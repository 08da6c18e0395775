use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Profile of the single child being tracked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BabyProfile {
    pub name: String,
    /// Calendar birth date (YYYY-MM-DD)
    pub birth_date: NaiveDate,
    pub gender: Gender,
    /// Opaque data-URI produced by the host's image picker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

/// Gender of the child, stored as "boy" / "girl" for compatibility with existing data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "boy", alias = "male")]
    Male,
    #[serde(rename = "girl", alias = "female")]
    Female,
}

/// Which breast was offered during a feeding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreastSide {
    #[default]
    Left,
    Right,
    Both,
}

/// The closed set of feeding shapes.
///
/// Side and duration only exist when breastfeeding is involved, amount only
/// when formula is involved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Feeding {
    Breast {
        #[serde(rename = "duration", default, skip_serializing_if = "Option::is_none")]
        duration_minutes: Option<u32>,
        #[serde(default)]
        side: BreastSide,
    },
    Formula {
        #[serde(rename = "amount", default, skip_serializing_if = "Option::is_none")]
        amount_ml: Option<u32>,
    },
    Both {
        #[serde(rename = "amount", default, skip_serializing_if = "Option::is_none")]
        amount_ml: Option<u32>,
        #[serde(rename = "duration", default, skip_serializing_if = "Option::is_none")]
        duration_minutes: Option<u32>,
        #[serde(default)]
        side: BreastSide,
    },
}

impl Feeding {
    pub fn amount_ml(&self) -> Option<u32> {
        match self {
            Feeding::Breast { .. } => None,
            Feeding::Formula { amount_ml } | Feeding::Both { amount_ml, .. } => *amount_ml,
        }
    }

    pub fn duration_minutes(&self) -> Option<u32> {
        match self {
            Feeding::Formula { .. } => None,
            Feeding::Breast { duration_minutes, .. } | Feeding::Both { duration_minutes, .. } => {
                *duration_minutes
            }
        }
    }

    pub fn side(&self) -> Option<BreastSide> {
        match self {
            Feeding::Formula { .. } => None,
            Feeding::Breast { side, .. } | Feeding::Both { side, .. } => Some(*side),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedingRecord {
    pub id: String,
    /// Display date (dd/mm/yyyy)
    pub date: String,
    /// Display time of day (HH:MM)
    pub time: String,
    #[serde(flatten)]
    pub feeding: Feeding,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SleepKind {
    Nap,
    Night,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SleepQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepRecord {
    pub id: String,
    pub date: String,
    #[serde(with = "lenient_timestamp")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "lenient_timestamp")]
    pub end_time: DateTime<Utc>,
    /// Minutes slept; may be supplied independently of start/end
    pub duration: i64,
    #[serde(rename = "type")]
    pub kind: SleepKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<SleepQuality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wake_ups: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthRecord {
    pub id: String,
    pub date: String,
    /// Kilograms
    pub weight: f64,
    /// Centimeters
    pub height: f64,
    /// Age in months when the measurement was taken
    pub age: i32,
}

/// The behaviour checklist filled in with each observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorFlags {
    #[serde(default)]
    pub smiles: bool,
    #[serde(default)]
    pub cries: bool,
    #[serde(default)]
    pub colic: bool,
    #[serde(default)]
    pub sleeps_well: bool,
    #[serde(default)]
    pub eats_well: bool,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub calm: bool,
    #[serde(default)]
    pub fussy: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub id: String,
    pub date: String,
    #[serde(flatten)]
    pub flags: BehaviorFlags,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medicine {
    pub id: String,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub purpose: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Whether a medicine is still being given. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MedicineStatus {
    Active,
    Historical,
}

impl Medicine {
    /// Active while there is no end date or the end date is still ahead of `now`
    pub fn status_at(&self, now: NaiveDateTime) -> MedicineStatus {
        match self.end_date {
            None => MedicineStatus::Active,
            Some(end) if end.and_time(chrono::NaiveTime::MIN) > now => MedicineStatus::Active,
            Some(_) => MedicineStatus::Historical,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionPlan {
    Monthly,
    Yearly,
}

impl fmt::Display for SubscriptionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubscriptionPlan::Monthly => write!(f, "monthly"),
            SubscriptionPlan::Yearly => write!(f, "yearly"),
        }
    }
}

/// Local entitlement flags. There is no payment verification behind these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub is_active: bool,
    pub is_premium: bool,
    pub trial_ends_at: Option<DateTime<Utc>>,
    /// `None` is persisted as `null` (no plan chosen)
    pub subscription_type: Option<SubscriptionPlan>,
}

impl Subscription {
    /// A running trial ending at `ends_at`
    pub fn trial(ends_at: DateTime<Utc>) -> Self {
        Self {
            is_active: true,
            is_premium: false,
            trial_ends_at: Some(ends_at),
            subscription_type: None,
        }
    }

    pub fn premium(plan: SubscriptionPlan) -> Self {
        Self {
            is_active: true,
            is_premium: true,
            trial_ends_at: None,
            subscription_type: Some(plan),
        }
    }

    /// A trial that can no longer be used
    pub fn expired() -> Self {
        Self {
            is_active: false,
            is_premium: false,
            trial_ends_at: None,
            subscription_type: None,
        }
    }

    pub fn is_locked(&self) -> bool {
        !self.is_active && !self.is_premium
    }

    pub fn state(&self) -> SubscriptionState {
        if self.is_premium {
            SubscriptionState::Premium
        } else if self.is_active {
            SubscriptionState::TrialActive
        } else {
            SubscriptionState::TrialExpired
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubscriptionState {
    TrialActive,
    TrialExpired,
    Premium,
}

/// Snapshot returned every time the subscription is evaluated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionStatus {
    pub state: SubscriptionState,
    pub subscription: Subscription,
    pub days_left_in_trial: i64,
    /// The host must show the blocking plan prompt
    pub prompt_required: bool,
}

/// Inclusive recommended range, e.g. 8-12 feedings per day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRange {
    pub min: u32,
    pub max: u32,
}

impl DailyRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub const fn exactly(value: u32) -> Self {
        Self { min: value, max: value }
    }

    pub fn contains(&self, value: u32) -> bool {
        value >= self.min && value <= self.max
    }
}

impl fmt::Display for DailyRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{}-{}", self.min, self.max)
        }
    }
}

/// Age-appropriate feeding routine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedingRoutine {
    pub age_months: i32,
    pub breast_feedings: DailyRange,
    /// Formula per day, in milliliters
    pub formula_amount: DailyRange,
    /// Hours between feeds
    pub interval: DailyRange,
    pub night_feedings: DailyRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicineRecommendation {
    pub name: String,
    pub purpose: String,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepTip {
    pub title: String,
    pub detail: String,
}

/// Everything the routine view shows for the current age
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutineOverview {
    pub age_months: i32,
    pub routine: FeedingRoutine,
    pub milestones: Vec<String>,
    pub sleep_tips: Vec<SleepTip>,
}

/// Today's totals for the dashboard header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub feedings_today: usize,
    pub sleep_minutes_today: i64,
    pub formatted_sleep_today: String,
}

/// RFC 3339 timestamps on write; also accepts the zone-less
/// `YYYY-MM-DDTHH:MM:SS` form found in older data, which holds local
/// wall-clock time.
pub mod lenient_timestamp {
    use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(parsed.with_timezone(&Utc));
        }
        let naive = NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S").map_err(serde::de::Error::custom)?;
        // A wall-clock time skipped by a DST jump has no local instant
        Ok(Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|local| local.with_timezone(&Utc))
            .unwrap_or_else(|| naive.and_utc()))
    }
}
