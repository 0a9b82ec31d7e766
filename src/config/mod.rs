//! Configuration models for the simulation and its jobs.

pub mod simulation;

pub use simulation::{JobConfig, SimulationConfig};
