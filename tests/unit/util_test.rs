//! Tests for utility functions

use chrono::{Duration, TimeZone, Utc};
use lease_sim::util::{format_duration, most_recent_monday};

#[test]
fn test_format_duration() {
    assert_eq!(format_duration(Duration::seconds(45)), "45s");
    assert_eq!(format_duration(Duration::minutes(30)), "30m");
    assert_eq!(format_duration(Duration::minutes(125)), "2h5m");
    assert_eq!(format_duration(Duration::hours(8)), "8h0m");
}

#[test]
fn test_most_recent_monday_from_friday() {
    let friday = Utc.with_ymd_and_hms(2024, 3, 8, 9, 15, 0).unwrap();
    assert_eq!(
        most_recent_monday(friday),
        Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap()
    );
}
