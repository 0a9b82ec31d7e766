//! Job definitions and the concrete instances generated from them.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Index of an instance in the engine arena.
pub type InstanceId = usize;

/// How a job is triggered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TriggerKind {
    /// Fires on every occurrence of a five-field cron expression.
    Cron {
        /// Cron expression, e.g. `0 */12 * * *`.
        schedule: String,
    },
    /// Fires on every upstream release of the job's version.
    #[serde(alias = "release_controller")]
    ReleaseTriggered,
}

/// Immutable description of a recurring job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDefinition {
    /// Job name, unique within a configuration.
    pub name: String,
    /// Version the job belongs to; release-triggered jobs sharing it fire together.
    pub version: String,
    /// Free-form scenario label.
    pub scenario: Option<String>,
    /// Free-form payload label.
    pub payload_type: Option<String>,
    /// Nominal run time while holding a lease.
    pub duration: Duration,
    /// Trigger kind.
    pub trigger: TriggerKind,
}

impl JobDefinition {
    /// Cron-triggered definition with an empty version.
    pub fn cron(name: impl Into<String>, schedule: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            version: String::new(),
            scenario: None,
            payload_type: None,
            duration,
            trigger: TriggerKind::Cron {
                schedule: schedule.into(),
            },
        }
    }

    /// Release-triggered definition for `version`.
    pub fn release_triggered(
        name: impl Into<String>,
        version: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            scenario: None,
            payload_type: None,
            duration,
            trigger: TriggerKind::ReleaseTriggered,
        }
    }

    /// Whether this job holds reserved capacity under release-priority admission.
    pub const fn is_release_triggered(&self) -> bool {
        matches!(self.trigger, TriggerKind::ReleaseTriggered)
    }
}

/// Which bound an instance exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeoutKind {
    /// Waited in the queue for at least the lease wait timeout.
    Wait,
    /// Held a lease for at least the job timeout.
    Execution,
}

/// Lifecycle state of an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstanceState {
    /// Not yet reached its start time.
    Pending,
    /// Holding a lease.
    Active,
    /// Queued for a lease.
    Waiting,
    /// Released its lease normally.
    Completed,
    /// Gave up waiting, or overran and has since released its lease.
    TimedOut(TimeoutKind),
}

impl InstanceState {
    /// Terminal states never transition again.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::TimedOut(_))
    }
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Active => f.write_str("active"),
            Self::Waiting => f.write_str("waiting"),
            Self::Completed => f.write_str("completed"),
            Self::TimedOut(TimeoutKind::Wait) => f.write_str("timed-out(wait)"),
            Self::TimedOut(TimeoutKind::Execution) => f.write_str("timed-out(execution)"),
        }
    }
}

/// One scheduled occurrence of a [`JobDefinition`].
#[derive(Debug, Clone)]
pub struct JobInstance {
    /// Definition this instance was generated from.
    pub job: Arc<JobDefinition>,
    /// Scheduled start.
    pub start_time: DateTime<Utc>,
    /// Expected release time; re-timed when promoted from the queue.
    pub end_time: DateTime<Utc>,
    /// Current lifecycle state.
    pub state: InstanceState,
    /// Time spent in the waiting queue.
    pub wait_accumulated: Duration,
    /// Instant the execution timeout is measured from, once a lease is held.
    pub running_since: Option<DateTime<Utc>>,
    /// Set once the execution timeout has been reported.
    pub execution_timed_out: bool,
}

impl JobInstance {
    /// Pending instance starting at `start_time` and lasting the job's duration.
    pub fn new(job: Arc<JobDefinition>, start_time: DateTime<Utc>) -> Self {
        let end_time = start_time + job.duration;
        Self {
            job,
            start_time,
            end_time,
            state: InstanceState::Pending,
            wait_accumulated: Duration::zero(),
            running_since: None,
            execution_timed_out: false,
        }
    }

    /// Job name, for messages.
    pub fn name(&self) -> &str {
        &self.job.name
    }
}
