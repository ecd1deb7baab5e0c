//! Simulation clock
//!
//! Drives the tick loop. Each tick runs, in this order:
//!
//! 1. arrival admission
//! 2. the priority boost, if one is due
//! 3. dispatch of at most one unit of work
//! 4. a queue snapshot
//!
//! Ticks run from 0 to the horizon inclusive. The simulation can be driven
//! one tick at a time with [`Simulation::step`], consumed as an iterator of
//! events, or drained in one go with [`Simulation::run`].

use crate::admission::ArrivalAdmitter;
use crate::boost::BoostController;
use crate::config::SimulationConfig;
use crate::dispatcher::{DispatchOutcome, Dispatcher};
use crate::error::SchedulerError;
use crate::event::{EventTrace, SimEvent};
use crate::process::Process;
use crate::queues::QueueHierarchy;
use crate::state::SchedulerState;
use core_types::{ProcessId, Tick};
use std::collections::VecDeque;

/// Everything that happened during one tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub tick: Tick,
    /// Process that executed, if the CPU was busy
    pub executed: Option<ProcessId>,
    pub boosted: bool,
    pub events: Vec<SimEvent>,
}

/// A single deterministic simulation run
///
/// Built from a configuration; restarting means building a new one.
#[derive(Debug, Clone)]
pub struct Simulation {
    state: SchedulerState,
    admitter: ArrivalAdmitter,
    boost: BoostController,
    dispatcher: Dispatcher,
    /// Next tick to simulate; `None` once the run is over
    next_tick: Option<Tick>,
    busy_ticks: u64,
    idle_ticks: u64,
    /// Set on the first inconsistent-state error
    failure: Option<SchedulerError>,
    pending: VecDeque<SimEvent>,
}

impl Simulation {
    /// Validates the configuration and prepares tick 0
    pub fn new(config: SimulationConfig) -> Result<Self, SchedulerError> {
        config.validate()?;

        let boost = BoostController::new(config.boost_period, config.boost_order);
        Ok(Self {
            state: SchedulerState::new(config),
            admitter: ArrivalAdmitter::new(),
            boost,
            dispatcher: Dispatcher::new(),
            next_tick: Some(0),
            busy_ticks: 0,
            idle_ticks: 0,
            failure: None,
            pending: VecDeque::new(),
        })
    }

    /// Runs a configuration to the end and returns its trace
    pub fn run_config(config: SimulationConfig) -> Result<EventTrace, SchedulerError> {
        Self::new(config)?.run()
    }

    /// Runs every remaining tick
    pub fn run(mut self) -> Result<EventTrace, SchedulerError> {
        let mut trace = EventTrace::new();
        trace.extend(self.pending.drain(..));
        while let Some(report) = self.step()? {
            trace.extend(report.events);
        }
        Ok(trace)
    }

    /// Simulates the next tick
    ///
    /// Returns `Ok(None)` once the horizon has been passed, or once every
    /// process has completed when `stop_when_finished` is set.
    pub fn step(&mut self) -> Result<Option<TickReport>, SchedulerError> {
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }

        let now = match self.next_tick {
            Some(tick) if tick <= self.state.config.horizon => tick,
            _ => {
                self.next_tick = None;
                return Ok(None);
            }
        };

        match self.run_tick(now) {
            Ok(report) => {
                self.next_tick = now.checked_add(1);
                if self.state.config.stop_when_finished && self.state.all_completed() {
                    self.next_tick = None;
                }
                Ok(Some(report))
            }
            Err(err) => {
                self.failure = Some(err.clone());
                self.next_tick = None;
                Err(err)
            }
        }
    }

    fn run_tick(&mut self, now: Tick) -> Result<TickReport, SchedulerError> {
        let mut events = Vec::new();

        self.admitter.admit(&mut self.state, now, &mut events)?;

        let boosted = self.boost.is_due(now);
        if boosted {
            self.boost.boost(&mut self.state, now, &mut events)?;
        }

        let executed = match self.dispatcher.dispatch(&mut self.state, now, &mut events)? {
            DispatchOutcome::Executed { id, .. } => {
                self.busy_ticks += 1;
                Some(id)
            }
            DispatchOutcome::Idle => {
                self.idle_ticks += 1;
                None
            }
        };

        events.push(SimEvent::QueueSnapshot {
            time: now,
            executed,
            levels: self.state.queues.snapshot(),
        });

        Ok(TickReport {
            tick: now,
            executed,
            boosted,
            events,
        })
    }

    /// Next tick to be simulated, `None` once finished
    pub fn next_tick(&self) -> Option<Tick> {
        self.next_tick
    }

    pub fn is_finished(&self) -> bool {
        self.next_tick.is_none()
    }

    pub fn config(&self) -> &SimulationConfig {
        self.state.config()
    }

    pub fn queues(&self) -> &QueueHierarchy {
        self.state.queues()
    }

    pub fn process(&self, process_id: ProcessId) -> Option<&Process> {
        self.state.process(process_id)
    }

    /// All processes in ascending id order
    pub fn processes(&self) -> impl Iterator<Item = &Process> + '_ {
        self.state.processes()
    }

    pub fn all_completed(&self) -> bool {
        self.state.all_completed()
    }

    /// Ticks on which a process executed
    pub fn busy_ticks(&self) -> u64 {
        self.busy_ticks
    }

    /// Ticks on which the CPU had nothing to run
    pub fn idle_ticks(&self) -> u64 {
        self.idle_ticks
    }
}

impl Iterator for Simulation {
    type Item = Result<SimEvent, SchedulerError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(Ok(event));
            }
            if self.is_finished() {
                return None;
            }
            match self.step() {
                Ok(Some(report)) => self.pending.extend(report.events),
                Ok(None) => return None,
                Err(err) => return Some(Err(err)),
            }
        }
    }
}
