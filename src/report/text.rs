//! Textual summaries of an event log.

use std::fmt::Write;

use super::chart::CHART_WIDTH;
use crate::core::{Event, EventKind};

fn header(out: &mut String, title: &str) {
    let _ = writeln!(out);
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", "=".repeat(CHART_WIDTH));
    let _ = writeln!(out);
}

const fn summary_label(kind: EventKind) -> &'static str {
    match kind {
        EventKind::LeaseAcquired => "Leases Acquired",
        EventKind::LeaseReleased => "Leases Released",
        EventKind::Waiting => "Jobs Waiting",
        EventKind::WaitTimeout => "Wait Timeouts",
        EventKind::ExecutionTimeout => "Execution Timeouts",
        EventKind::CapacityExceeded => "Max Exceeded",
    }
}

const fn icon(kind: EventKind) -> char {
    match kind {
        EventKind::LeaseAcquired => '+',
        EventKind::LeaseReleased => '-',
        EventKind::Waiting => 'W',
        EventKind::WaitTimeout => 'T',
        EventKind::ExecutionTimeout => 'X',
        EventKind::CapacityExceeded => '!',
    }
}

/// Event totals per kind.
pub fn event_summary(events: &[Event]) -> String {
    let mut out = String::new();
    header(&mut out, "Event Summary");
    let _ = writeln!(out, "Total Events: {}", events.len());
    for kind in EventKind::ALL {
        let n = events.iter().filter(|e| e.kind == kind).count();
        let _ = writeln!(out, "  - {}: {n}", summary_label(kind));
    }
    let _ = writeln!(out);
    out
}

/// Timestamped list of warning events.
pub fn warning_list(events: &[Event]) -> String {
    let mut out = String::new();
    header(&mut out, "Warnings");

    let warnings: Vec<_> = events.iter().filter(|e| e.is_warning).collect();
    if warnings.is_empty() {
        let _ = writeln!(out, "No warnings!");
        return out;
    }

    for w in &warnings {
        let _ = writeln!(out, "[{}] {}", w.timestamp.format("%Y-%m-%d %H:%M:%S"), w.message);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Total Warnings: {}", warnings.len());
    let _ = writeln!(out);
    out
}

/// One line per event, at most `limit` lines (`0` means all).
pub fn timeline(events: &[Event], limit: usize) -> String {
    let truncated = limit > 0 && limit < events.len();
    let shown = if truncated { limit } else { events.len() };

    let mut out = String::new();
    if truncated {
        header(&mut out, &format!("Detailed Timeline (showing first {limit} events)"));
    } else {
        header(&mut out, "Detailed Timeline");
    }

    for event in &events[..shown] {
        let _ = writeln!(
            out,
            "[{}] {} [{}] {}",
            event.timestamp.format("%a %H:%M"),
            icon(event.kind),
            event.active_count_after,
            event.message
        );
    }

    if truncated {
        let _ = writeln!(out);
        let _ = writeln!(out, "... and {} more events", events.len() - limit);
    }
    let _ = writeln!(out);
    out
}
