//! Fixed-locale (pt-BR) display formatting.

use chrono::{DateTime, Local};

/// Date label stored on every record, e.g. `05/03/2024`
pub fn display_date(at: DateTime<Local>) -> String {
    at.format("%d/%m/%Y").to_string()
}

/// Time-of-day label, e.g. `08:15`
pub fn display_time(at: DateTime<Local>) -> String {
    at.format("%H:%M").to_string()
}

/// `1h 30min`, or just `45min` under an hour
pub fn format_duration(minutes: i64) -> String {
    let minutes = minutes.max(0);
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{}h {}min", hours, mins)
    } else {
        format!("{}min", mins)
    }
}
