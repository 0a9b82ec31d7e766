//! Discrete-event lease allocation engine.
//!
//! The engine owns every instance in an arena ([`EngineState::instances`]);
//! the active set and the FIFO waiting queue hold [`InstanceId`]s into it.
//! A run is a sequence of [`LeaseEngine::step`] calls, each consuming the
//! current state and returning the next one together with the events of that
//! tick. Every tick applies four sub-phases at the same virtual instant:
//!
//! 1. admission of instances whose start time has arrived,
//! 2. release of finished instances, each followed by one promotion from the queue,
//! 3. wait-timeout accounting for queued instances,
//! 4. execution-timeout flagging for running instances,
//!
//! and then advances the clock by one tick.

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::error::SimulationError;
use super::event::{Event, EventKind};
use super::job::{InstanceId, InstanceState, JobInstance, TimeoutKind};
use crate::util::format_duration;

/// Reference tick length in minutes.
pub const DEFAULT_TICK_MINS: u32 = 5;

/// Admission rule applied when an instance reaches its start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionPolicy {
    /// One global pool; instances queue whenever every lease is held.
    #[default]
    Fifo,
    /// Release-triggered instances hold reserved leases and are admitted on
    /// arrival even when the pool is full, which reports `CapacityExceeded`.
    ReleasePriority,
}

/// Configuration values for the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineParams {
    /// Maximum concurrent leases.
    pub max_active_leases: u32,
    /// Running time after which an instance is flagged as overrunning.
    pub job_timeout: Duration,
    /// Queue time after which a waiting instance gives up.
    pub lease_wait_timeout: Duration,
    /// Virtual time advanced per step.
    pub tick: Duration,
    /// Admission rule.
    pub admission: AdmissionPolicy,
}

impl EngineParams {
    /// FIFO parameters with the reference tick.
    pub fn new(max_active_leases: u32, job_timeout: Duration, lease_wait_timeout: Duration) -> Self {
        Self {
            max_active_leases,
            job_timeout,
            lease_wait_timeout,
            tick: Duration::minutes(i64::from(DEFAULT_TICK_MINS)),
            admission: AdmissionPolicy::Fifo,
        }
    }

    /// Override the tick length.
    #[must_use]
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    /// Override the admission rule.
    #[must_use]
    pub fn with_admission(mut self, admission: AdmissionPolicy) -> Self {
        self.admission = admission;
        self
    }

    /// Validate engine parameter values.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_active_leases == 0 {
            return Err("max_active_leases must be greater than 0".into());
        }
        if self.job_timeout <= Duration::zero() {
            return Err("job timeout must be positive".into());
        }
        if self.lease_wait_timeout <= Duration::zero() {
            return Err("lease wait timeout must be positive".into());
        }
        if self.tick <= Duration::zero() {
            return Err("tick must be positive".into());
        }
        Ok(())
    }
}

/// Complete simulation state between two ticks.
#[derive(Debug, Clone)]
pub struct EngineState {
    now: DateTime<Utc>,
    instances: Vec<JobInstance>,
    /// Instances are start-ordered; everything from here on is still pending.
    next_pending: usize,
    active: Vec<InstanceId>,
    waiting: VecDeque<InstanceId>,
    active_count: u32,
}

impl EngineState {
    /// Initial state with the clock at `start`.
    ///
    /// Instances are stably sorted by start time; their positions after the
    /// sort become their [`InstanceId`]s.
    pub fn new(start: DateTime<Utc>, mut instances: Vec<JobInstance>) -> Self {
        instances.sort_by_key(|i| i.start_time);
        Self {
            now: start,
            instances,
            next_pending: 0,
            active: Vec::new(),
            waiting: VecDeque::new(),
            active_count: 0,
        }
    }

    /// Current virtual time.
    pub const fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// All instances, indexed by [`InstanceId`].
    pub fn instances(&self) -> &[JobInstance] {
        &self.instances
    }

    /// Instance by id.
    pub fn instance(&self, id: InstanceId) -> Option<&JobInstance> {
        self.instances.get(id)
    }

    /// Leases currently held.
    pub const fn active_count(&self) -> u32 {
        self.active_count
    }

    /// Ids holding a lease, in acquisition order.
    pub fn active(&self) -> &[InstanceId] {
        &self.active
    }

    /// Ids in the waiting queue, head first.
    pub fn waiting(&self) -> impl Iterator<Item = InstanceId> + '_ {
        self.waiting.iter().copied()
    }

    /// Number of queued instances.
    pub fn waiting_len(&self) -> usize {
        self.waiting.len()
    }

    /// True once no instance is pending, active or waiting.
    pub fn is_drained(&self) -> bool {
        self.next_pending >= self.instances.len() && self.active.is_empty() && self.waiting.is_empty()
    }

    /// Give the arena back to the caller.
    pub fn into_instances(self) -> Vec<JobInstance> {
        self.instances
    }
}

/// Result of a full engine run.
#[derive(Debug, Clone)]
pub struct EngineOutcome {
    /// Instances in their terminal states, indexed by [`InstanceId`].
    pub instances: Vec<JobInstance>,
    /// Chronological event log.
    pub events: Vec<Event>,
    /// Number of ticks executed.
    pub ticks: u64,
    /// Clock value after the last tick.
    pub finished_at: DateTime<Utc>,
}

/// Lease allocation engine. Holds only parameters; all mutable data lives in
/// [`EngineState`].
#[derive(Debug, Clone)]
pub struct LeaseEngine {
    params: EngineParams,
}

impl LeaseEngine {
    /// Create an engine after validating its parameters.
    pub fn new(params: EngineParams) -> Result<Self, SimulationError> {
        params.validate().map_err(SimulationError::Config)?;
        Ok(Self { params })
    }

    /// Engine parameters.
    pub const fn params(&self) -> &EngineParams {
        &self.params
    }

    /// Run from `start` until every instance reached a terminal state.
    pub fn run(
        &self,
        start: DateTime<Utc>,
        instances: Vec<JobInstance>,
    ) -> Result<EngineOutcome, SimulationError> {
        let mut state = EngineState::new(start, instances);
        let mut events = Vec::new();
        let mut ticks = 0u64;

        while !state.is_drained() {
            let (next, mut tick_events) = self.step(state)?;
            events.append(&mut tick_events);
            state = next;
            ticks += 1;
        }

        tracing::info!(
            ticks,
            events = events.len(),
            instances = state.instances.len(),
            "lease simulation finished"
        );

        Ok(EngineOutcome {
            finished_at: state.now,
            instances: state.into_instances(),
            events,
            ticks,
        })
    }

    /// Apply one tick to `state` and return the next state with the tick's events.
    pub fn step(&self, mut state: EngineState) -> Result<(EngineState, Vec<Event>), SimulationError> {
        let mut events = Vec::new();

        self.admit_arrivals(&mut state, &mut events)?;
        self.release_finished(&mut state, &mut events)?;
        self.expire_waiting(&mut state, &mut events);
        self.flag_overruns(&mut state, &mut events);
        self.check_invariants(&state)?;

        for event in &events {
            tracing::debug!(
                at = %event.timestamp,
                kind = %event.kind,
                active = event.active_count_after,
                "{}",
                event.message
            );
        }

        state.now = state.now + self.params.tick;
        Ok((state, events))
    }

    fn admit_arrivals(
        &self,
        state: &mut EngineState,
        events: &mut Vec<Event>,
    ) -> Result<(), SimulationError> {
        let now = state.now;
        let max = self.params.max_active_leases;

        while let Some(inst) = state.instances.get(state.next_pending) {
            if inst.start_time > now {
                break;
            }
            let id = state.next_pending;
            state.next_pending += 1;

            if inst.state != InstanceState::Pending {
                return Err(SimulationError::invariant(
                    now,
                    format!("instance {id} arrived in state {}", inst.state),
                ));
            }

            let reserved = self.params.admission == AdmissionPolicy::ReleasePriority
                && inst.job.is_release_triggered();

            if reserved || state.active_count < max {
                let since = inst.start_time;
                Self::grant(state, id, since);
                state.active.push(id);
                let name = state.instances[id].name();
                events.push(Event::new(
                    now,
                    EventKind::LeaseAcquired,
                    id,
                    name,
                    state.active_count,
                    format!("Job '{name}' acquired lease"),
                ));
                if state.active_count > max {
                    events.push(Event::new(
                        now,
                        EventKind::CapacityExceeded,
                        id,
                        name,
                        state.active_count,
                        format!("Max active leases exceeded: {}/{max}", state.active_count),
                    ));
                }
            } else {
                let inst = &mut state.instances[id];
                inst.state = InstanceState::Waiting;
                inst.wait_accumulated = Duration::zero();
                state.waiting.push_back(id);
                let name = inst.name();
                events.push(Event::new(
                    now,
                    EventKind::Waiting,
                    id,
                    name,
                    state.active_count,
                    format!("Job '{name}' waiting for lease"),
                ));
            }
        }
        Ok(())
    }

    fn release_finished(
        &self,
        state: &mut EngineState,
        events: &mut Vec<Event>,
    ) -> Result<(), SimulationError> {
        let now = state.now;
        let running = std::mem::take(&mut state.active);
        let mut still_running = Vec::with_capacity(running.len());

        for id in running {
            if state.instances[id].end_time > now {
                still_running.push(id);
                continue;
            }

            state.active_count = state.active_count.checked_sub(1).ok_or_else(|| {
                SimulationError::invariant(now, "active lease count would drop below zero")
            })?;

            let inst = &mut state.instances[id];
            let message = if inst.execution_timed_out {
                inst.state = InstanceState::TimedOut(TimeoutKind::Execution);
                format!("Job '{}' released lease after overrunning", inst.name())
            } else {
                inst.state = InstanceState::Completed;
                format!("Job '{}' completed and released lease", inst.name())
            };
            events.push(Event::new(
                now,
                EventKind::LeaseReleased,
                id,
                inst.name(),
                state.active_count,
                message,
            ));

            if state.active_count >= self.params.max_active_leases {
                continue;
            }
            if let Some(next) = state.waiting.pop_front() {
                if state.instances[next].state != InstanceState::Waiting {
                    return Err(SimulationError::invariant(
                        now,
                        format!("queued instance {next} is {}", state.instances[next].state),
                    ));
                }
                Self::grant(state, next, now);
                let inst = &mut state.instances[next];
                inst.end_time = now + inst.job.duration;
                let name = inst.name();
                events.push(Event::new(
                    now,
                    EventKind::LeaseAcquired,
                    next,
                    name,
                    state.active_count,
                    format!(
                        "Job '{name}' acquired lease after waiting {}",
                        format_duration(inst.wait_accumulated)
                    ),
                ));
                still_running.push(next);
            }
        }

        state.active = still_running;
        Ok(())
    }

    fn expire_waiting(&self, state: &mut EngineState, events: &mut Vec<Event>) {
        let now = state.now;
        let queued = std::mem::take(&mut state.waiting);
        let mut still_queued = VecDeque::with_capacity(queued.len());

        for id in queued {
            let inst = &mut state.instances[id];
            inst.wait_accumulated = inst.wait_accumulated + self.params.tick;
            if inst.wait_accumulated < self.params.lease_wait_timeout {
                still_queued.push_back(id);
                continue;
            }
            inst.state = InstanceState::TimedOut(TimeoutKind::Wait);
            let name = inst.name();
            events.push(Event::new(
                now,
                EventKind::WaitTimeout,
                id,
                name,
                state.active_count,
                format!(
                    "Job '{name}' timed out waiting for lease (waited {})",
                    format_duration(inst.wait_accumulated)
                ),
            ));
        }

        state.waiting = still_queued;
    }

    fn flag_overruns(&self, state: &mut EngineState, events: &mut Vec<Event>) {
        let now = state.now;
        for &id in &state.active {
            let inst = &mut state.instances[id];
            if inst.execution_timed_out {
                continue;
            }
            let Some(since) = inst.running_since else {
                continue;
            };
            if now - since < self.params.job_timeout {
                continue;
            }
            inst.execution_timed_out = true;
            let name = inst.name();
            events.push(Event::new(
                now,
                EventKind::ExecutionTimeout,
                id,
                name,
                state.active_count,
                format!(
                    "Job '{name}' exceeded execution timeout ({})",
                    format_duration(self.params.job_timeout)
                ),
            ));
        }
    }

    fn grant(state: &mut EngineState, id: InstanceId, running_since: DateTime<Utc>) {
        let inst = &mut state.instances[id];
        inst.state = InstanceState::Active;
        inst.running_since = Some(running_since);
        state.active_count += 1;
    }

    fn check_invariants(&self, state: &EngineState) -> Result<(), SimulationError> {
        let held = u32::try_from(state.active.len()).unwrap_or(u32::MAX);
        if held != state.active_count {
            return Err(SimulationError::invariant(
                state.now,
                format!(
                    "active count {} does not match {held} active instances",
                    state.active_count
                ),
            ));
        }
        if self.params.admission == AdmissionPolicy::Fifo
            && state.active_count > self.params.max_active_leases
        {
            return Err(SimulationError::invariant(
                state.now,
                format!(
                    "capacity exceeded under FIFO admission: {}/{}",
                    state.active_count, self.params.max_active_leases
                ),
            ));
        }
        Ok(())
    }
}
