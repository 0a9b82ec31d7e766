//! Job instance generation.
//!
//! Expands job definitions into concrete, time-bounded instances covering a
//! simulation window:
//!
//! - cron jobs get one instance per schedule occurrence in the window,
//! - release-triggered jobs are grouped by version; each version gets its own
//!   random release train and every job of the version fires on every release.
//!
//! The output is sorted by start time. The sort is stable, so instances that
//! start at the same instant keep their generation order (cron jobs in
//! definition order, then release groups in order of first appearance).

pub mod cron;
pub mod release;

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::core::{JobDefinition, JobInstance, SimulationError, TriggerKind};

pub use self::cron::{CronParser, CronSchedule, OccurrenceOracle, ScheduleParser};
pub use self::release::ReleaseCadence;

/// Half-open simulated interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationWindow {
    /// First simulated instant.
    pub start: DateTime<Utc>,
    /// End of the window, exclusive for job generation.
    pub end: DateTime<Utc>,
}

impl SimulationWindow {
    /// Window of `duration` starting at `start`.
    pub fn new(start: DateTime<Utc>, duration: Duration) -> Self {
        Self {
            start,
            end: start + duration,
        }
    }

    /// Window length.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// A job that was skipped during generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Name of the skipped job.
    pub job: String,
    /// Why it was skipped.
    pub message: String,
}

/// Generator output.
#[derive(Debug, Clone, Default)]
pub struct GeneratedInstances {
    /// Instances sorted by start time.
    pub instances: Vec<JobInstance>,
    /// Jobs skipped because their schedule could not be used.
    pub diagnostics: Vec<Diagnostic>,
}

/// Expands job definitions into instances.
#[derive(Debug, Clone, Default)]
pub struct InstanceGenerator<P = CronParser> {
    parser: P,
    cadence: ReleaseCadence,
}

impl InstanceGenerator {
    /// Generator using the standard cron parser.
    pub fn new(cadence: ReleaseCadence) -> Result<Self, SimulationError> {
        Self::with_parser(CronParser, cadence)
    }
}

impl<P: ScheduleParser> InstanceGenerator<P> {
    /// Generator using a custom schedule parser.
    ///
    /// Rejects a cadence whose bounds are inverted or zero.
    pub fn with_parser(parser: P, cadence: ReleaseCadence) -> Result<Self, SimulationError> {
        cadence.validate().map_err(SimulationError::Config)?;
        Ok(Self { parser, cadence })
    }

    /// Release cadence used for release-triggered jobs.
    pub const fn cadence(&self) -> ReleaseCadence {
        self.cadence
    }

    /// Generate every instance of `definitions` within `window`.
    ///
    /// Only release trains draw from `rng`; with a seeded source the whole
    /// output is reproducible.
    pub fn generate<R: Rng>(
        &self,
        definitions: &[Arc<JobDefinition>],
        window: SimulationWindow,
        rng: &mut R,
    ) -> GeneratedInstances {
        let mut out = GeneratedInstances::default();
        let mut release_groups: Vec<(&str, Vec<Arc<JobDefinition>>)> = Vec::new();

        for def in definitions {
            match &def.trigger {
                TriggerKind::Cron { schedule } => match self.parser.parse(schedule) {
                    Ok(oracle) => {
                        out.instances.extend(
                            cron_occurrences(&oracle, window)
                                .into_iter()
                                .map(|at| JobInstance::new(Arc::clone(def), at)),
                        );
                    }
                    Err(err) => {
                        tracing::warn!(job = %def.name, "skipping job: {err}");
                        out.diagnostics.push(Diagnostic {
                            job: def.name.clone(),
                            message: err.to_string(),
                        });
                    }
                },
                TriggerKind::ReleaseTriggered => {
                    let group = release_groups.iter().position(|(v, _)| *v == def.version);
                    match group {
                        Some(pos) => release_groups[pos].1.push(Arc::clone(def)),
                        None => release_groups.push((def.version.as_str(), vec![Arc::clone(def)])),
                    }
                }
            }
        }

        for (version, jobs) in release_groups {
            let train = match self.cadence.release_train(window, rng) {
                Ok(train) => train,
                Err(err) => {
                    tracing::warn!(version, "skipping release group: {err}");
                    out.diagnostics.extend(jobs.iter().map(|job| Diagnostic {
                        job: job.name.clone(),
                        message: err.to_string(),
                    }));
                    continue;
                }
            };
            tracing::debug!(version, releases = train.len(), jobs = jobs.len(), "release train");
            for at in train {
                out.instances
                    .extend(jobs.iter().map(|job| JobInstance::new(Arc::clone(job), at)));
            }
        }

        out.instances.sort_by_key(|i| i.start_time);
        tracing::info!(
            instances = out.instances.len(),
            skipped = out.diagnostics.len(),
            "generated job instances"
        );
        out
    }
}

/// Occurrences of `oracle` inside `window`.
///
/// The search cursor moves one minute past each hit so the same slot is never
/// matched twice.
pub fn cron_occurrences(oracle: &impl OccurrenceOracle, window: SimulationWindow) -> Vec<DateTime<Utc>> {
    let mut occurrences = Vec::new();
    let mut cursor = window.start;
    while cursor < window.end {
        let Some(next) = oracle.next_at_or_after(cursor) else {
            break;
        };
        if next >= window.end {
            break;
        }
        occurrences.push(next);
        cursor = next + Duration::minutes(1);
    }
    occurrences
}
