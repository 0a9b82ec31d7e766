//! Event log entries and occupancy samples.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::job::InstanceId;

/// Kind of state transition recorded in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// An instance took a lease, on arrival or on promotion from the queue.
    LeaseAcquired,
    /// An instance gave its lease back.
    LeaseReleased,
    /// An instance joined the waiting queue.
    Waiting,
    /// A queued instance gave up.
    WaitTimeout,
    /// A running instance passed the job timeout.
    ExecutionTimeout,
    /// More leases are held than the pool allows.
    CapacityExceeded,
}

impl EventKind {
    /// All kinds, in log-summary order.
    pub const ALL: [Self; 6] = [
        Self::LeaseAcquired,
        Self::LeaseReleased,
        Self::Waiting,
        Self::WaitTimeout,
        Self::ExecutionTimeout,
        Self::CapacityExceeded,
    ];

    /// Whether events of this kind are reported as warnings.
    pub const fn is_warning(self) -> bool {
        matches!(
            self,
            Self::Waiting | Self::WaitTimeout | Self::ExecutionTimeout | Self::CapacityExceeded
        )
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::LeaseAcquired => "lease-acquired",
            Self::LeaseReleased => "lease-released",
            Self::Waiting => "waiting",
            Self::WaitTimeout => "wait-timeout",
            Self::ExecutionTimeout => "execution-timeout",
            Self::CapacityExceeded => "capacity-exceeded",
        };
        f.write_str(label)
    }
}

/// Immutable entry of the simulation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Virtual time of the tick that produced the event.
    pub timestamp: DateTime<Utc>,
    /// Transition kind.
    pub kind: EventKind,
    /// Arena id of the instance involved.
    pub instance: InstanceId,
    /// Name of the job the instance belongs to.
    pub job_name: String,
    /// Leases held once the transition was applied.
    pub active_count_after: u32,
    /// Human-readable description.
    pub message: String,
    /// Whether reporting should surface this event as a warning.
    pub is_warning: bool,
}

impl Event {
    /// Build an event whose warning flag follows its kind.
    pub fn new(
        timestamp: DateTime<Utc>,
        kind: EventKind,
        instance: InstanceId,
        job_name: impl Into<String>,
        active_count_after: u32,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            kind,
            instance,
            job_name: job_name.into(),
            active_count_after,
            message: message.into(),
            is_warning: kind.is_warning(),
        }
    }
}

/// Occupancy snapshot at a sampling instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSample {
    /// Sampling instant.
    pub timestamp: DateTime<Utc>,
    /// Leases held.
    pub active_count: u32,
    /// Approximate queue length.
    pub waiting_count: u32,
}

/// Warning subsequence of an event log, in log order.
pub fn warnings(events: &[Event]) -> Vec<&Event> {
    events.iter().filter(|e| e.is_warning).collect()
}
