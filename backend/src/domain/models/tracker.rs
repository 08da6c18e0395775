//! Domain model for timed sessions.

use chrono::{DateTime, Local, NaiveTime};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackerKind {
    Feeding,
    Sleep,
}

impl fmt::Display for TrackerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackerKind::Feeding => write!(f, "feeding"),
            TrackerKind::Sleep => write!(f, "sleep"),
        }
    }
}

/// Result of stopping a tracker, handed to the record form
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerStop {
    pub kind: TrackerKind,
    pub started_at: DateTime<Local>,
    pub stopped_at: DateTime<Local>,
    pub duration_minutes: u32,
}

impl TrackerStop {
    pub fn start_time_of_day(&self) -> NaiveTime {
        truncate_to_minute(self.started_at.time())
    }

    pub fn end_time_of_day(&self) -> NaiveTime {
        truncate_to_minute(self.stopped_at.time())
    }
}

/// Whole minutes between `start` and `now`, never negative
pub fn elapsed_minutes(start: DateTime<Local>, now: DateTime<Local>) -> u32 {
    let minutes = (now - start).num_minutes();
    u32::try_from(minutes.max(0)).unwrap_or(u32::MAX)
}

fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    use chrono::Timelike;
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}
