//! Time utilities: parsing HH:MM, formatting durations and the live clock.

use chrono::{DateTime, Local, NaiveTime, Utc};

pub fn parse_time(t: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(t.trim(), "%H:%M").ok()
}

/// Clock face for an elapsed duration: `MM:SS`, or `H:MM:SS` past the hour.
/// Negative input (clock skew) shows as zero.
pub fn format_elapsed(secs: i64) -> String {
    let s = secs.max(0);
    let (h, m, s) = (s / 3600, (s % 3600) / 60, s % 60);
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{:02}:{:02}", m, s)
    }
}

/// Local wall-clock "HH:MM" of a stored timestamp.
pub fn local_hhmm(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%H:%M").to_string()
}

pub fn local_datetime(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}
