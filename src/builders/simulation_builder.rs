//! Builds a runnable simulation from configuration.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::config::SimulationConfig;
use crate::core::{
    sample, warnings, EngineParams, Event, EventKind, JobDefinition, JobInstance, LeaseEngine,
    SimulationError, TimeSample,
};
use crate::generator::{Diagnostic, InstanceGenerator, SimulationWindow};
use crate::util::most_recent_monday;

/// Turns a [`SimulationConfig`] into a [`Simulation`].
#[derive(Debug, Clone)]
pub struct SimulationBuilder {
    config: SimulationConfig,
}

impl SimulationBuilder {
    /// Start from a configuration.
    pub const fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    /// Configuration being built.
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Override the window start.
    #[must_use]
    pub fn with_start(mut self, start: DateTime<Utc>) -> Self {
        self.config.start = Some(start);
        self
    }

    /// Override the release-train seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Validate the configuration and assemble the simulation.
    pub fn build(self) -> Result<Simulation, SimulationError> {
        let cfg = self.config;
        cfg.validate()
            .map_err(|e| SimulationError::Config(format!("config invalid: {e}")))?;

        let params = EngineParams::new(
            cfg.max_active_leases,
            cfg.job_timeout(),
            cfg.lease_wait_timeout(),
        )
        .with_tick(cfg.tick())
        .with_admission(cfg.admission);
        let engine = LeaseEngine::new(params)?;

        let start = cfg.start.unwrap_or_else(|| most_recent_monday(Utc::now()));
        let window = SimulationWindow::new(start, cfg.simulation_duration());
        let definitions = cfg
            .jobs
            .iter()
            .map(|job| Arc::new(job.to_definition()))
            .collect();

        let generator = InstanceGenerator::new(cfg.release_interval)?;

        Ok(Simulation {
            definitions,
            window,
            engine,
            generator,
            sample_interval: cfg.sample_interval(),
            seed: cfg.seed,
        })
    }
}

/// A configured run: generator, engine and sampler over one window.
#[derive(Debug, Clone)]
pub struct Simulation {
    definitions: Vec<Arc<JobDefinition>>,
    window: SimulationWindow,
    engine: LeaseEngine,
    generator: InstanceGenerator,
    sample_interval: Duration,
    seed: Option<u64>,
}

impl Simulation {
    /// Simulated window.
    pub const fn window(&self) -> SimulationWindow {
        self.window
    }

    /// Job definitions in configuration order.
    pub fn definitions(&self) -> &[Arc<JobDefinition>] {
        &self.definitions
    }

    /// Lease engine.
    pub const fn engine(&self) -> &LeaseEngine {
        &self.engine
    }

    /// Run with the configured seed, or OS entropy when unseeded.
    pub fn run(&self) -> Result<SimulationReport, SimulationError> {
        let mut rng = self
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        self.run_with_rng(&mut rng)
    }

    /// Run drawing release trains from `rng`.
    pub fn run_with_rng<R: Rng>(&self, rng: &mut R) -> Result<SimulationReport, SimulationError> {
        let generated = self.generator.generate(&self.definitions, self.window, rng);
        let outcome = self.engine.run(self.window.start, generated.instances)?;
        let samples = sample(
            &outcome.events,
            self.window.start,
            self.window.end,
            self.sample_interval,
        );

        Ok(SimulationReport {
            window: self.window,
            max_active_leases: self.engine.params().max_active_leases,
            instances: outcome.instances,
            events: outcome.events,
            samples,
            diagnostics: generated.diagnostics,
            ticks: outcome.ticks,
        })
    }
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct SimulationReport {
    /// Simulated window.
    pub window: SimulationWindow,
    /// Pool size the run was checked against.
    pub max_active_leases: u32,
    /// Instances in their terminal states.
    pub instances: Vec<JobInstance>,
    /// Chronological event log.
    pub events: Vec<Event>,
    /// Occupancy samples.
    pub samples: Vec<TimeSample>,
    /// Jobs skipped during generation.
    pub diagnostics: Vec<Diagnostic>,
    /// Engine ticks executed.
    pub ticks: u64,
}

#[derive(Serialize)]
struct ReportDocument<'a> {
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    max_active_leases: u32,
    events: &'a [Event],
    samples: &'a [TimeSample],
    warnings: Vec<&'a Event>,
}

impl SimulationReport {
    /// Warning subsequence of the log.
    pub fn warnings(&self) -> Vec<&Event> {
        warnings(&self.events)
    }

    /// Whether any warning was produced.
    pub fn has_warnings(&self) -> bool {
        self.events.iter().any(|e| e.is_warning)
    }

    /// Number of events of `kind`.
    pub fn count(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }

    /// Pretty JSON with the events, samples and warnings.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&ReportDocument {
            window_start: self.window.start,
            window_end: self.window.end,
            max_active_leases: self.max_active_leases,
            events: &self.events,
            samples: &self.samples,
            warnings: self.warnings(),
        })
    }
}
