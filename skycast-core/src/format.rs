//! Timestamp presentation helpers: weekday labels and wall-clock strings.

use chrono::{DateTime, Datelike, Local, Timelike, Utc};

const WEEKDAYS: [&str; 7] =
    ["Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday"];

/// Local calendar weekday for a unix-seconds timestamp, shifted forward by
/// `offset` days (wraps modulo 7).
pub fn weekday_of(ts: i64, offset: usize) -> &'static str {
    let day = local_time(ts).weekday().num_days_from_sunday() as usize;
    WEEKDAYS[(day + offset) % 7]
}

/// Local wall-clock time for a unix-seconds timestamp, 24-hour `"HH:MM"`
/// with both fields zero-padded.
pub fn clock_of(ts: i64) -> String {
    let t = local_time(ts);
    format!("{:02}:{:02}", t.hour(), t.minute())
}

fn local_time(ts: i64) -> DateTime<Local> {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .unwrap_or_else(Utc::now)
        .with_timezone(&Local)
}
