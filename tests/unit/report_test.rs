//! Tests for text reports

use chrono::{Duration, TimeZone, Utc};
use lease_sim::core::{sample, Event, EventKind};
use lease_sim::report::{event_summary, lease_chart, timeline, warning_list};

fn log() -> Vec<Event> {
    let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    vec![
        Event::new(t0, EventKind::LeaseAcquired, 0, "a", 1, "Job 'a' acquired lease"),
        Event::new(t0, EventKind::Waiting, 1, "b", 1, "Job 'b' waiting for lease"),
        Event::new(
            t0 + Duration::minutes(30),
            EventKind::WaitTimeout,
            1,
            "b",
            1,
            "Job 'b' timed out waiting for lease (waited 30m)",
        ),
        Event::new(
            t0 + Duration::hours(1),
            EventKind::LeaseReleased,
            0,
            "a",
            0,
            "Job 'a' completed and released lease",
        ),
    ]
}

#[test]
fn test_summary_lists_every_kind() {
    let text = event_summary(&log());
    for label in [
        "Leases Acquired: 1",
        "Leases Released: 1",
        "Jobs Waiting: 1",
        "Wait Timeouts: 1",
        "Execution Timeouts: 0",
        "Max Exceeded: 0",
    ] {
        assert!(text.contains(label), "missing {label}");
    }
}

#[test]
fn test_warning_list_contains_only_warnings() {
    let text = warning_list(&log());
    assert!(text.contains("Total Warnings: 2"));
    assert!(!text.contains("completed and released"));
    assert!(text.contains("[2024-01-01 00:30:00] Job 'b' timed out"));
}

#[test]
fn test_timeline_icons() {
    let text = timeline(&log(), 0);
    assert!(text.contains("+ [1] Job 'a' acquired lease"));
    assert!(text.contains("W [1] Job 'b' waiting"));
    assert!(text.contains("T [1] Job 'b' timed out"));
    assert!(text.contains("- [0] Job 'a' completed"));
}

#[test]
fn test_chart_from_sampled_log() {
    let events = log();
    let t0 = events[0].timestamp;
    let samples = sample(&events, t0, t0 + Duration::hours(2), Duration::minutes(30));
    let chart = lease_chart(&samples, &events, 2);

    assert!(chart.contains("Lease Usage Over Time"));
    assert!(chart.contains('█'));
    assert!(chart.contains('!'));
}
