//! Replays an event log into periodic occupancy samples.

use chrono::{DateTime, Duration, Utc};

use super::event::{Event, EventKind, TimeSample};

/// Reference sampling interval in minutes.
pub const DEFAULT_SAMPLE_INTERVAL_MINS: u32 = 30;

/// Sample `events` every `interval` from `start` through `end` inclusive.
///
/// The active count is taken from the latest event at or before each sampling
/// instant. The waiting count is approximate: it rises on every `Waiting`
/// event and falls on every `LeaseAcquired` while positive, without tracking
/// which queued instance was promoted. Wait timeouts are not subtracted.
///
/// An empty log yields no samples.
pub fn sample(
    events: &[Event],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    interval: Duration,
) -> Vec<TimeSample> {
    if events.is_empty() || interval <= Duration::zero() {
        return Vec::new();
    }

    let mut samples = Vec::new();
    let mut running_active = 0u32;
    let mut running_waiting = 0u32;
    let mut replay = events.iter().peekable();
    let mut at = start;

    while at <= end {
        while let Some(event) = replay.next_if(|e| e.timestamp <= at) {
            running_active = event.active_count_after;
            match event.kind {
                EventKind::Waiting => running_waiting += 1,
                EventKind::LeaseAcquired => running_waiting = running_waiting.saturating_sub(1),
                _ => {}
            }
        }

        samples.push(TimeSample {
            timestamp: at,
            active_count: running_active,
            waiting_count: running_waiting,
        });
        at = at + interval;
    }

    samples
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn t(mins: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(mins)
    }

    fn ev(mins: i64, kind: EventKind, active: u32) -> Event {
        Event::new(t(mins), kind, 0, "job", active, "")
    }

    #[test]
    fn test_empty_log_has_no_samples() {
        assert!(sample(&[], t(0), t(120), Duration::minutes(30)).is_empty());
    }

    #[test]
    fn test_samples_cover_window_inclusive() {
        let events = vec![ev(0, EventKind::LeaseAcquired, 1)];
        let samples = sample(&events, t(0), t(120), Duration::minutes(30));
        assert_eq!(samples.len(), 5);
        assert_eq!(samples.first().unwrap().timestamp, t(0));
        assert_eq!(samples.last().unwrap().timestamp, t(120));
        assert!(samples.iter().all(|s| s.active_count == 1));
    }

    #[test]
    fn test_waiting_count_approximation() {
        let events = vec![
            ev(0, EventKind::LeaseAcquired, 1),
            ev(0, EventKind::Waiting, 1),
            ev(0, EventKind::Waiting, 1),
            ev(40, EventKind::LeaseReleased, 0),
            ev(40, EventKind::LeaseAcquired, 1),
            ev(50, EventKind::WaitTimeout, 1),
            ev(70, EventKind::LeaseReleased, 0),
        ];
        let samples = sample(&events, t(0), t(90), Duration::minutes(30));

        let waiting: Vec<_> = samples.iter().map(|s| s.waiting_count).collect();
        let active: Vec<_> = samples.iter().map(|s| s.active_count).collect();
        // The first acquisition happens while nothing is counted as waiting.
        assert_eq!(waiting, vec![2, 2, 1, 1]);
        assert_eq!(active, vec![1, 1, 1, 0]);
    }

    #[test]
    fn test_events_between_samples_fold_into_next() {
        let events = vec![
            ev(5, EventKind::LeaseAcquired, 1),
            ev(10, EventKind::LeaseAcquired, 2),
            ev(20, EventKind::LeaseReleased, 1),
        ];
        let samples = sample(&events, t(0), t(30), Duration::minutes(30));
        assert_eq!(samples[0].active_count, 0);
        assert_eq!(samples[1].active_count, 1);
    }
}
