use shared::{DailySummary, FeedingRecord, SleepRecord};

use crate::domain::formatting::format_duration;

/// Today's totals for the home screen. Records are matched on their stored
/// `dd/mm/yyyy` label.
pub fn summarize_day(feedings: &[FeedingRecord], sleeps: &[SleepRecord], today_label: &str) -> DailySummary {
    let feedings_today = feedings.iter().filter(|record| record.date == today_label).count();
    let sleep_minutes_today: i64 = sleeps
        .iter()
        .filter(|record| record.date == today_label)
        .map(|record| record.duration)
        .sum();

    DailySummary {
        feedings_today,
        sleep_minutes_today,
        formatted_sleep_today: format_duration(sleep_minutes_today),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use shared::{Feeding, SleepKind};

    fn feeding(date: &str) -> FeedingRecord {
        FeedingRecord {
            id: format!("feeding::{}", date),
            date: date.to_string(),
            time: "08:00".to_string(),
            feeding: Feeding::Formula { amount_ml: Some(90) },
            notes: None,
        }
    }

    fn sleep(date: &str, duration: i64) -> SleepRecord {
        let at = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        SleepRecord {
            id: format!("sleep::{}", duration),
            date: date.to_string(),
            start_time: at,
            end_time: at,
            duration,
            kind: SleepKind::Nap,
            quality: None,
            wake_ups: None,
            notes: None,
        }
    }

    #[test]
    fn test_summarize_day() {
        let feedings = vec![feeding("15/06/2024"), feeding("14/06/2024"), feeding("15/06/2024")];
        let sleeps = vec![sleep("15/06/2024", 45), sleep("15/06/2024", 90), sleep("14/06/2024", 600)];

        let summary = summarize_day(&feedings, &sleeps, "15/06/2024");
        assert_eq!(summary.feedings_today, 2);
        assert_eq!(summary.sleep_minutes_today, 135);
        assert_eq!(summary.formatted_sleep_today, "2h 15min");
    }

    #[test]
    fn test_empty_day() {
        let summary = summarize_day(&[], &[], "15/06/2024");
        assert_eq!(summary.feedings_today, 0);
        assert_eq!(summary.formatted_sleep_today, "0min");
    }
}
