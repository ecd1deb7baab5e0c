//! Periodic priority boost
//!
//! Every `period` ticks all arrived, unfinished processes return to level 0
//! with fresh quantums. This is the only way a process ever moves up.

use crate::config::BoostOrder;
use crate::error::SchedulerError;
use crate::event::SimEvent;
use crate::state::SchedulerState;
use core_types::{ProcessId, Tick};

/// Resets the queue hierarchy on boost ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoostController {
    period: Option<Tick>,
    order: BoostOrder,
}

impl BoostController {
    pub fn new(period: Option<Tick>, order: BoostOrder) -> Self {
        Self { period, order }
    }

    pub fn period(&self) -> Option<Tick> {
        self.period
    }

    pub fn order(&self) -> BoostOrder {
        self.order
    }

    /// True when `now` is a positive multiple of the period
    pub fn is_due(&self, now: Tick) -> bool {
        match self.period {
            Some(period) if period > 0 => now > 0 && now % period == 0,
            _ => false,
        }
    }

    /// Moves every active process to level 0
    ///
    /// A burst cut short by the boost is reported as ending at `now`.
    /// Returns the number of processes boosted.
    pub fn boost(
        &self,
        state: &mut SchedulerState,
        now: Tick,
        events: &mut Vec<SimEvent>,
    ) -> Result<usize, SchedulerError> {
        let order = self.placement_order(state)?;

        for process in state.processes().filter(|p| p.in_progress()) {
            events.push(SimEvent::Burst {
                id: process.id(),
                level: process.current_queue_level(),
                start: process.execution_start_time(),
                end_exclusive: now,
                remaining_after: process.remaining_time(),
            });
        }

        state.queues.clear_all();
        for &id in &order {
            state.place(id, 0)?;
        }

        events.push(SimEvent::Boost { time: now });
        Ok(order.len())
    }

    fn placement_order(&self, state: &SchedulerState) -> Result<Vec<ProcessId>, SchedulerError> {
        let active: Vec<ProcessId> = state
            .processes()
            .filter(|p| p.is_active())
            .map(|p| p.id())
            .collect();

        let order = match self.order {
            BoostOrder::AscendingId => active,
            BoostOrder::DescendingId => active.into_iter().rev().collect(),
            BoostOrder::QueueOrder => {
                let queued: Vec<ProcessId> = state.queues().iter().collect();
                if queued.len() != active.len() {
                    return Err(SchedulerError::inconsistent(format!(
                        "{} active processes but {} queued",
                        active.len(),
                        queued.len()
                    )));
                }
                queued
            }
        };

        Ok(order)
    }
}
