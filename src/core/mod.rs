//! Core simulation model, lease allocation engine and sampler.

pub mod engine;
pub mod error;
pub mod event;
pub mod job;
pub mod sampler;

pub use engine::{
    AdmissionPolicy, EngineOutcome, EngineParams, EngineState, LeaseEngine, DEFAULT_TICK_MINS,
};
pub use error::{AppResult, SimulationError};
pub use event::{warnings, Event, EventKind, TimeSample};
pub use job::{InstanceId, InstanceState, JobDefinition, JobInstance, TimeoutKind, TriggerKind};
pub use sampler::{sample, DEFAULT_SAMPLE_INTERVAL_MINS};
