//! ASCII lease-occupancy chart.

use std::fmt::Write;

use chrono::Duration;

use crate::core::{Event, EventKind, TimeSample};

/// Total chart width in columns, axis included.
pub const CHART_WIDTH: usize = 80;

const AXIS_WIDTH: usize = 6;

#[derive(Debug, Clone, Copy)]
struct Column {
    active: u32,
    waiting: u32,
    timeouts: u32,
}

/// Render lease usage over time.
///
/// Rows `1..=max_leases` show held leases (`█`). Rows above show, per
/// sample, timeouts (`!`) stacked under waiting instances (`*`).
pub fn lease_chart(samples: &[TimeSample], events: &[Event], max_leases: u32) -> String {
    if samples.is_empty() {
        return "No data to display".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(out, "Lease Usage Over Time");
    let _ = writeln!(out, "{}", "=".repeat(CHART_WIDTH));
    let _ = writeln!(out);

    let columns: Vec<Column> = samples
        .iter()
        .map(|s| Column {
            active: s.active_count,
            waiting: s.waiting_count,
            timeouts: timeouts_at(events, s),
        })
        .collect();

    let plot_width = CHART_WIDTH - AXIS_WIDTH;
    let plotted = columns.len().min(plot_width);
    let column_at = |x: usize| -> Column {
        if columns.len() <= plot_width {
            columns[x]
        } else {
            columns[x * (columns.len() - 1) / (plot_width - 1)]
        }
    };

    let overflow = columns
        .iter()
        .map(|c| c.waiting + c.timeouts)
        .max()
        .unwrap_or(0);
    let total_rows = max_leases + overflow;

    for row in (max_leases + 1..=total_rows).rev() {
        let _ = write!(out, "{row:3} |");
        let level = row - max_leases;
        for x in 0..plotted {
            let col = column_at(x);
            let cell = if level <= col.timeouts {
                '!'
            } else if level <= col.timeouts + col.waiting {
                '*'
            } else {
                ' '
            };
            out.push(cell);
        }
        out.push('\n');
    }

    if overflow > 0 {
        let _ = writeln!(out, "    {}", "-".repeat(CHART_WIDTH - 4));
    }

    for slot in (1..=max_leases).rev() {
        let _ = write!(out, "{slot:3} |");
        for x in 0..plotted {
            out.push(if column_at(x).active >= slot { '█' } else { ' ' });
        }
        out.push('\n');
    }

    let _ = writeln!(out, "    +{}", "-".repeat(plot_width));
    let _ = writeln!(out, "    {}", day_markers(samples, plot_width));

    let _ = writeln!(out);
    let _ = writeln!(out, "Legend:");
    let _ = writeln!(out, "  Lease slots (1-{max_leases}):");
    let _ = writeln!(out, "    █ - Active lease");
    let _ = writeln!(out, "    (space) - Free lease");
    if overflow > 0 {
        let _ = writeln!(out, "  Waiting/Timeout rows (>{max_leases}):");
        let _ = writeln!(out, "    * - Job waiting for lease");
        let _ = writeln!(out, "    ! - Job timed out");
    }
    let _ = writeln!(out);

    out
}

fn timeouts_at(events: &[Event], sample: &TimeSample) -> u32 {
    let n = events
        .iter()
        .filter(|e| {
            e.timestamp == sample.timestamp
                && matches!(e.kind, EventKind::WaitTimeout | EventKind::ExecutionTimeout)
        })
        .count();
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// `0d 1d 2d ...` markers spread over the plotted width.
fn day_markers(samples: &[TimeSample], width: usize) -> String {
    let mut line = vec![' '; width];
    let (Some(first), Some(last)) = (samples.first(), samples.last()) else {
        return String::new();
    };
    let total = (last.timestamp - first.timestamp).num_minutes();
    let span = i64::try_from(width).unwrap_or(i64::MAX);

    let mut day = 0i64;
    while Duration::days(day).num_minutes() <= total {
        let position = if total > 0 {
            usize::try_from(Duration::days(day).num_minutes() * span / total).unwrap_or(width)
        } else {
            0
        };
        let marker = format!("{day}d");
        if position + marker.len() <= width {
            for (i, ch) in marker.chars().enumerate() {
                line[position + i] = ch;
            }
        }
        day += 1;
    }

    line.into_iter().collect()
}
