//! Simulation and job configuration structures.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{
    AdmissionPolicy, JobDefinition, SimulationError, TriggerKind, DEFAULT_SAMPLE_INTERVAL_MINS,
    DEFAULT_TICK_MINS,
};
use crate::generator::ReleaseCadence;

const fn default_tick_mins() -> u32 {
    DEFAULT_TICK_MINS
}

const fn default_sample_interval_mins() -> u32 {
    DEFAULT_SAMPLE_INTERVAL_MINS
}

/// One job entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobConfig {
    /// Job name.
    pub name: String,
    /// Version label; release-triggered jobs of one version fire together.
    #[serde(default)]
    pub version: String,
    /// Optional scenario label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario: Option<String>,
    /// Optional payload label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload_type: Option<String>,
    /// Run time in minutes.
    pub duration_mins: u32,
    /// Trigger kind.
    pub trigger: TriggerKind,
}

impl JobConfig {
    /// Validate job values.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name is required".into());
        }
        if self.duration_mins == 0 {
            return Err("duration_mins must be greater than 0".into());
        }
        if let TriggerKind::Cron { schedule } = &self.trigger {
            if schedule.trim().is_empty() {
                return Err("cron schedule is required for cron jobs".into());
            }
        }
        Ok(())
    }

    /// Immutable definition used by the generator.
    pub fn to_definition(&self) -> JobDefinition {
        JobDefinition {
            name: self.name.clone(),
            version: self.version.clone(),
            scenario: self.scenario.clone(),
            payload_type: self.payload_type.clone(),
            duration: Duration::minutes(i64::from(self.duration_mins)),
            trigger: self.trigger.clone(),
        }
    }
}

/// Root simulation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Size of the lease pool.
    pub max_active_leases: u32,
    /// Running time in minutes after which a job is reported as overrunning.
    pub job_timeout_mins: u32,
    /// Queue time in minutes after which a waiting job gives up.
    pub lease_wait_timeout_mins: u32,
    /// Length of the simulated window in hours.
    pub simulation_duration_hours: u32,
    /// Engine tick in minutes.
    #[serde(default = "default_tick_mins")]
    pub tick_mins: u32,
    /// Sampling interval in minutes.
    #[serde(default = "default_sample_interval_mins")]
    pub sample_interval_mins: u32,
    /// Window start; defaults to the most recent Monday at midnight UTC.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    /// Seed for release trains; unseeded runs draw from the OS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Admission rule.
    #[serde(default)]
    pub admission: AdmissionPolicy,
    /// Gap bounds between upstream releases.
    #[serde(default)]
    pub release_interval: ReleaseCadence,
    /// Job definitions.
    pub jobs: Vec<JobConfig>,
}

impl SimulationConfig {
    /// Validate scalar values and every job.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_active_leases == 0 {
            return Err("max_active_leases must be greater than 0".into());
        }
        if self.job_timeout_mins == 0 {
            return Err("job_timeout_mins must be greater than 0".into());
        }
        if self.lease_wait_timeout_mins == 0 {
            return Err("lease_wait_timeout_mins must be greater than 0".into());
        }
        if self.simulation_duration_hours == 0 {
            return Err("simulation_duration_hours must be greater than 0".into());
        }
        if self.tick_mins == 0 {
            return Err("tick_mins must be greater than 0".into());
        }
        if self.sample_interval_mins < self.tick_mins {
            return Err("sample_interval_mins must be at least tick_mins".into());
        }
        self.release_interval.validate()?;
        if self.jobs.is_empty() {
            return Err("at least one job must be defined".into());
        }
        for (i, job) in self.jobs.iter().enumerate() {
            job.validate().map_err(|e| {
                if job.name.is_empty() {
                    format!("job {i}: {e}")
                } else {
                    format!("job `{}` invalid: {e}", job.name)
                }
            })?;
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON configuration file.
    ///
    /// Read failures surface as [`SimulationError::Io`]; parse and validation
    /// failures as [`SimulationError::Config`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SimulationError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_json_str(&input).map_err(SimulationError::Config)
    }

    /// Job timeout as a duration.
    pub fn job_timeout(&self) -> Duration {
        Duration::minutes(i64::from(self.job_timeout_mins))
    }

    /// Lease wait timeout as a duration.
    pub fn lease_wait_timeout(&self) -> Duration {
        Duration::minutes(i64::from(self.lease_wait_timeout_mins))
    }

    /// Simulated window length.
    pub fn simulation_duration(&self) -> Duration {
        Duration::hours(i64::from(self.simulation_duration_hours))
    }

    /// Engine tick.
    pub fn tick(&self) -> Duration {
        Duration::minutes(i64::from(self.tick_mins))
    }

    /// Sampling interval.
    pub fn sample_interval(&self) -> Duration {
        Duration::minutes(i64::from(self.sample_interval_mins))
    }
}
