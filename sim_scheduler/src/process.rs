//! Process records and their state machine
//!
//! A process moves through `Pending -> Ready -> Running -> Ready ... -> Completed`.
//! `Running` spans a whole burst: the process keeps it (and `in_progress`)
//! from the first unit of a slice until the slice is exhausted or the
//! process completes.

use crate::config::LevelQuantum;
use crate::error::SchedulerError;
use core_types::{ProcessId, ProcessSpec, Tick};
use serde::{Deserialize, Serialize};

/// Scheduling state of a process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessState {
    /// Not yet arrived
    Pending,
    /// Queued, waiting for the CPU
    Ready,
    /// Holding the CPU for the current burst
    Running,
    /// All work done; never scheduled again
    Completed,
}

/// Result of executing one unit of a process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitOutcome {
    /// The burst continues on the next tick
    Continuing,
    /// The process finished its last unit of work
    Completed,
    /// The time slice ran out before the work did
    SliceExhausted {
        /// The level allotment ran out as well
        allotment_exhausted: bool,
    },
}

/// A simulated process and its mutable scheduling state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    id: ProcessId,
    arrival_time: Tick,
    total_execution_time: Tick,
    remaining_time: Tick,
    current_queue_level: usize,
    time_slice_remaining: Tick,
    allotment_remaining: Tick,
    in_progress: bool,
    execution_start_time: Tick,
    state: ProcessState,
    first_run_time: Option<Tick>,
    completion_time: Option<Tick>,
}

impl Process {
    /// Creates a process that has not arrived yet
    pub fn from_spec(spec: &ProcessSpec) -> Self {
        Self {
            id: spec.id,
            arrival_time: spec.arrival_time,
            total_execution_time: spec.execution_time,
            remaining_time: spec.execution_time,
            current_queue_level: 0,
            time_slice_remaining: 0,
            allotment_remaining: 0,
            in_progress: false,
            execution_start_time: 0,
            state: ProcessState::Pending,
            first_run_time: None,
            completion_time: None,
        }
    }

    pub fn id(&self) -> ProcessId {
        self.id
    }

    pub fn arrival_time(&self) -> Tick {
        self.arrival_time
    }

    pub fn total_execution_time(&self) -> Tick {
        self.total_execution_time
    }

    pub fn remaining_time(&self) -> Tick {
        self.remaining_time
    }

    pub fn current_queue_level(&self) -> usize {
        self.current_queue_level
    }

    pub fn time_slice_remaining(&self) -> Tick {
        self.time_slice_remaining
    }

    pub fn allotment_remaining(&self) -> Tick {
        self.allotment_remaining
    }

    pub fn in_progress(&self) -> bool {
        self.in_progress
    }

    pub fn execution_start_time(&self) -> Tick {
        self.execution_start_time
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn first_run_time(&self) -> Option<Tick> {
        self.first_run_time
    }

    pub fn completion_time(&self) -> Option<Tick> {
        self.completion_time
    }

    pub fn is_completed(&self) -> bool {
        self.state == ProcessState::Completed
    }

    /// Arrived and not yet completed
    pub fn is_active(&self) -> bool {
        matches!(self.state, ProcessState::Ready | ProcessState::Running)
    }

    /// Places the process at a level with fresh quantums
    ///
    /// Used for admission, demotion and boost. Any partially run slice is
    /// discarded; remaining work is untouched.
    pub(crate) fn enter_level(&mut self, level: usize, quantum: LevelQuantum) {
        self.current_queue_level = level;
        self.time_slice_remaining = quantum.time_slice;
        self.allotment_remaining = quantum.allotment;
        self.in_progress = false;
        self.state = ProcessState::Ready;
    }

    /// Starts a new slice at the current level
    ///
    /// The allotment carries over unless it is exhausted, which only
    /// happens at the lowest level where there is nowhere to demote to.
    pub(crate) fn refresh_slice(&mut self, quantum: LevelQuantum) {
        self.time_slice_remaining = quantum.time_slice;
        if self.allotment_remaining == 0 {
            self.allotment_remaining = quantum.allotment;
        }
    }

    /// Executes one unit of work at tick `now`
    pub(crate) fn execute_unit(&mut self, now: Tick) -> Result<UnitOutcome, SchedulerError> {
        if !self.is_active() || self.remaining_time == 0 {
            return Err(SchedulerError::inconsistent(format!(
                "{} dispatched in state {:?} with {} units left",
                self.id, self.state, self.remaining_time
            )));
        }
        if self.time_slice_remaining == 0 {
            return Err(SchedulerError::inconsistent(format!(
                "{} dispatched with an empty time slice",
                self.id
            )));
        }

        if !self.in_progress {
            self.in_progress = true;
            self.execution_start_time = now;
            self.state = ProcessState::Running;
            self.first_run_time.get_or_insert(now);
        }

        self.remaining_time -= 1;
        self.time_slice_remaining -= 1;
        // Allotments that are not a multiple of the slice run out mid-burst.
        self.allotment_remaining = self.allotment_remaining.saturating_sub(1);

        if self.remaining_time == 0 {
            self.in_progress = false;
            self.state = ProcessState::Completed;
            self.completion_time = Some(now + 1);
            return Ok(UnitOutcome::Completed);
        }

        if self.time_slice_remaining == 0 {
            self.in_progress = false;
            self.state = ProcessState::Ready;
            return Ok(UnitOutcome::SliceExhausted {
                allotment_exhausted: self.allotment_remaining == 0,
            });
        }

        Ok(UnitOutcome::Continuing)
    }
}
