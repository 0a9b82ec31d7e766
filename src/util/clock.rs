//! Virtual-time helpers.

use chrono::{DateTime, Datelike, Duration, Timelike, Utc};

/// Midnight (UTC) of the Monday on or before `now`.
pub fn most_recent_monday(now: DateTime<Utc>) -> DateTime<Utc> {
    let days_back = i64::from(now.weekday().num_days_from_monday());
    let since_midnight = Duration::seconds(i64::from(now.num_seconds_from_midnight()))
        + Duration::nanoseconds(i64::from(now.nanosecond()));
    now - since_midnight - Duration::days(days_back)
}

/// Compact human form: `45s`, `30m`, `2h5m`.
pub fn format_duration(d: Duration) -> String {
    if d < Duration::minutes(1) {
        return format!("{}s", d.num_seconds());
    }
    if d < Duration::hours(1) {
        return format!("{}m", d.num_minutes());
    }
    format!("{}h{}m", d.num_hours(), d.num_minutes() % 60)
}
