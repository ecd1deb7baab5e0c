//! Arrival admission

use crate::error::SchedulerError;
use crate::event::SimEvent;
use crate::process::ProcessState;
use crate::state::SchedulerState;
use core_types::{ProcessId, Tick};

/// Moves newly arrived processes into the top-priority level
///
/// Simultaneous arrivals are admitted in ascending id order, each at the
/// tail of level 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrivalAdmitter;

impl ArrivalAdmitter {
    pub fn new() -> Self {
        Self
    }

    /// Admits every pending process whose arrival time is `now`
    ///
    /// Returns the number of processes admitted.
    pub fn admit(
        &self,
        state: &mut SchedulerState,
        now: Tick,
        events: &mut Vec<SimEvent>,
    ) -> Result<usize, SchedulerError> {
        let arrivals: Vec<ProcessId> = state
            .processes()
            .filter(|p| p.state() == ProcessState::Pending && p.arrival_time() == now)
            .map(|p| p.id())
            .collect();

        for &id in &arrivals {
            state.place(id, 0)?;
            events.push(SimEvent::Arrival { id, time: now });
        }

        Ok(arrivals.len())
    }
}
