//! # Lease Sim
//!
//! A discrete-event simulator for a shared pool of execution leases contended
//! by scheduled (cron) jobs and release-triggered jobs.
//!
//! Given a pool size, a job timeout, a lease-wait timeout and a set of job
//! definitions, the simulator replays a window of virtual time and reports
//! whether the pool is large enough: every acquisition, release, queueing,
//! timeout and overcommit lands in a chronological event log that is then
//! sampled, charted and summarized.
//!
//! ## Pipeline
//!
//! 1. [`generator`] expands job definitions into time-bounded instances. Cron
//!    jobs fire on every schedule occurrence inside the window; release-triggered
//!    jobs fire together on a random release train per version.
//! 2. [`core::LeaseEngine`] advances a fixed-step clock over the instances,
//!    granting leases FIFO and timing out queued or overrunning work.
//! 3. [`core::sample`] replays the log into periodic occupancy samples.
//! 4. [`report`] renders the samples and events as text.
//!
//! ```rust,ignore
//! use lease_sim::builders::SimulationBuilder;
//! use lease_sim::config::SimulationConfig;
//! use lease_sim::report::{event_summary, lease_chart};
//!
//! let config = SimulationConfig::from_path("config.json")?;
//! let report = SimulationBuilder::new(config).with_seed(42).build()?.run()?;
//!
//! println!("{}", lease_chart(&report.samples, &report.events, report.max_active_leases));
//! println!("{}", event_summary(&report.events));
//! ```
//!
//! ## Determinism
//!
//! The engine is a pure function of its parameters and instances. Randomness
//! only enters through release trains, so a seeded run is fully reproducible.

#![deny(warnings)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Simulation assembly from configuration.
pub mod builders;
/// Configuration models for the simulation and its jobs.
pub mod config;
/// Job model, lease engine, event log and sampler.
pub mod core;
/// Expansion of job definitions into instances.
pub mod generator;
/// Text rendering of simulation results.
pub mod report;
/// Shared utilities.
pub mod util;
