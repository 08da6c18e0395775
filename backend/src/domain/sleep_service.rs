//! Sleep records.
//!
//! A sleep entry can be described by a duration, by a start/end time-of-day
//! pair, or by both. [`build_sleep_record`] resolves them in this order:
//!
//! 1. Duration given: used as is. Start/end come from the time pair when both
//!    are given, otherwise the sleep ends now and started `duration` ago.
//! 2. No duration but both times: the duration is the gap between them.
//! 3. Neither: a default-length sleep ending now.
//!
//! Time pairs sit on today's date. An end before the start means the sleep
//! crossed midnight, so the start moves to the previous day.

use anyhow::Result;
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use log::info;
use std::sync::Arc;

use shared::SleepRecord;

use crate::clock::Clock;
use crate::domain::access_gate::AccessGate;
use crate::domain::commands::sleep::CreateSleepCommand;
use crate::domain::formatting::display_date;
use crate::errors::Feature;
use crate::storage::{KeyValueStorage, RecordStore, WritePolicy};

/// Place a wall-clock time on a date in the local zone
fn local_at(date: NaiveDate, time: NaiveTime) -> DateTime<Local> {
    let naive = date.and_time(time);
    Local
        .from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| Local.from_utc_datetime(&naive))
}

/// Start and end instants for a time-of-day pair entered today
fn place_time_pair(today: NaiveDate, start: NaiveTime, end: NaiveTime) -> (DateTime<Local>, DateTime<Local>) {
    let end_at = local_at(today, end);
    let start_day = if end < start { today.pred_opt().unwrap_or(today) } else { today };
    (local_at(start_day, start), end_at)
}

/// Turn a sleep command into a record (without id) as of `now`
pub fn build_sleep_record(command: CreateSleepCommand, now: DateTime<Local>, default_minutes: u32) -> SleepRecord {
    let today = now.date_naive();
    let pair = match (command.start_time, command.end_time) {
        (Some(start), Some(end)) => Some(place_time_pair(today, start, end)),
        _ => None,
    };

    let (start_at, end_at, duration) = match (command.duration_minutes, pair) {
        (Some(minutes), Some((start_at, end_at))) => (start_at, end_at, i64::from(minutes)),
        (Some(minutes), None) => (now - Duration::minutes(i64::from(minutes)), now, i64::from(minutes)),
        (None, Some((start_at, end_at))) => (start_at, end_at, (end_at - start_at).num_minutes()),
        (None, None) => {
            let minutes = i64::from(default_minutes);
            (now - Duration::minutes(minutes), now, minutes)
        }
    };

    SleepRecord {
        id: String::new(),
        date: display_date(now),
        start_time: start_at.with_timezone(&Utc),
        end_time: end_at.with_timezone(&Utc),
        duration,
        kind: command.kind,
        quality: command.quality,
        wake_ups: command.wake_ups,
        notes: command.notes,
    }
}

#[derive(Clone)]
pub struct SleepService {
    store: RecordStore<SleepRecord>,
    gate: AccessGate,
    clock: Arc<dyn Clock>,
    default_minutes: u32,
}

impl SleepService {
    pub fn new(
        storage: Arc<dyn KeyValueStorage>,
        policy: WritePolicy,
        gate: AccessGate,
        clock: Arc<dyn Clock>,
        default_minutes: u32,
    ) -> Self {
        Self {
            store: RecordStore::load(storage, policy),
            gate,
            clock,
            default_minutes,
        }
    }

    pub fn add_sleep(&self, command: CreateSleepCommand) -> Result<SleepRecord> {
        self.gate.ensure(Feature::Sleep)?;

        let record = build_sleep_record(command, self.clock.now(), self.default_minutes);
        let record = self.store.add(record)?;

        info!("Added {:?} sleep {} lasting {} minutes", record.kind, record.id, record.duration);
        Ok(record)
    }

    pub fn delete_sleep(&self, id: &str) -> Result<bool> {
        self.gate.ensure(Feature::Sleep)?;
        let removed = self.store.remove(id)?;
        if removed {
            info!("Deleted sleep {}", id);
        }
        Ok(removed)
    }

    pub fn list_sleeps(&self) -> Vec<SleepRecord> {
        self.store.list()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_support::TestContext;
    use shared::{SleepKind, SleepQuality};

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap()
    }

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Local.with_ymd_and_hms(y, m, d, h, min, 0).unwrap().with_timezone(&Utc)
    }

    fn hm(h: u32, m: u32) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(h, m, 0)
    }

    #[test]
    fn test_duration_only_ends_now() {
        let command = CreateSleepCommand { duration_minutes: Some(45), ..CreateSleepCommand::new(SleepKind::Nap) };
        let record = build_sleep_record(command, now(), 60);

        assert_eq!(record.duration, 45);
        assert_eq!(record.end_time, utc(2024, 6, 15, 9, 0));
        assert_eq!(record.start_time, utc(2024, 6, 15, 8, 15));
        assert_eq!(record.date, "15/06/2024");
    }

    #[test]
    fn test_times_only_derive_duration() {
        let command = CreateSleepCommand {
            start_time: hm(13, 0),
            end_time: hm(14, 40),
            ..CreateSleepCommand::new(SleepKind::Nap)
        };
        let record = build_sleep_record(command, now(), 60);

        assert_eq!(record.duration, 100);
        assert_eq!(record.start_time, utc(2024, 6, 15, 13, 0));
        assert_eq!(record.end_time, utc(2024, 6, 15, 14, 40));
    }

    #[test]
    fn test_overnight_times() {
        let command = CreateSleepCommand {
            start_time: hm(22, 0),
            end_time: hm(6, 30),
            ..CreateSleepCommand::new(SleepKind::Night)
        };
        let record = build_sleep_record(command, now(), 60);

        assert_eq!(record.start_time, utc(2024, 6, 14, 22, 0));
        assert_eq!(record.end_time, utc(2024, 6, 15, 6, 30));
        assert_eq!(record.duration, 510);
    }

    #[test]
    fn test_duration_wins_over_inconsistent_times() {
        let command = CreateSleepCommand {
            duration_minutes: Some(30),
            start_time: hm(13, 0),
            end_time: hm(15, 0),
            ..CreateSleepCommand::new(SleepKind::Nap)
        };
        let record = build_sleep_record(command, now(), 60);

        assert_eq!(record.duration, 30);
        assert_eq!(record.start_time, utc(2024, 6, 15, 13, 0));
        assert_eq!(record.end_time, utc(2024, 6, 15, 15, 0));
    }

    #[test]
    fn test_single_time_is_ignored() {
        let command = CreateSleepCommand { start_time: hm(7, 0), ..CreateSleepCommand::new(SleepKind::Nap) };
        let record = build_sleep_record(command, now(), 90);

        assert_eq!(record.duration, 90);
        assert_eq!(record.start_time, utc(2024, 6, 15, 7, 30));
        assert_eq!(record.end_time, utc(2024, 6, 15, 9, 0));
    }

    #[test]
    fn test_add_and_delete_sleep() {
        let ctx = TestContext::onboarded();
        let service = ctx.sleep_service();

        let record = service
            .add_sleep(CreateSleepCommand {
                quality: Some(SleepQuality::Good),
                wake_ups: Some(2),
                ..CreateSleepCommand::new(SleepKind::Night)
            })
            .unwrap();
        assert!(record.id.starts_with("sleep::"));
        assert_eq!(record.duration, 60);
        assert_eq!(ctx.sleep_service().list_sleeps(), vec![record.clone()]);

        assert!(service.delete_sleep(&record.id).unwrap());
        assert!(!service.delete_sleep(&record.id).unwrap());
        assert!(service.list_sleeps().is_empty());
    }
}
