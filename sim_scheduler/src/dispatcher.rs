//! Dispatcher
//!
//! Decides which process runs for the current tick and applies the
//! slice, allotment and demotion rules to it.
//!
//! ## Rules
//!
//! 1. A process in the middle of a burst always runs, whatever its level.
//!    New arrivals never preempt it.
//! 2. Otherwise the head of the highest-priority non-empty level starts a
//!    new burst.
//! 3. Completion is checked before slice exhaustion.
//! 4. An exhausted slice ends the burst. If the level allotment is also
//!    exhausted the process is demoted one level; otherwise it goes to
//!    the back of its current level.
//!
//! A running process stays at the head of its level until the burst ends.

use crate::error::SchedulerError;
use crate::event::SimEvent;
use crate::process::UnitOutcome;
use crate::state::SchedulerState;
use core_types::{ProcessId, Tick};

/// What the CPU did during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No process was ready
    Idle,
    /// One unit of a process was executed
    Executed {
        id: ProcessId,
        level: usize,
        outcome: UnitOutcome,
    },
}

/// Runs exactly one unit of work per tick
#[derive(Debug, Clone, Copy, Default)]
pub struct Dispatcher;

impl Dispatcher {
    pub fn new() -> Self {
        Self
    }

    /// Selects a process for tick `now` and executes one unit of it
    pub fn dispatch(
        &self,
        state: &mut SchedulerState,
        now: Tick,
        events: &mut Vec<SimEvent>,
    ) -> Result<DispatchOutcome, SchedulerError> {
        let (level, id) = match self.select(state)? {
            Some(selected) => selected,
            None => return Ok(DispatchOutcome::Idle),
        };

        let process = state.process_mut(id)?;
        if process.current_queue_level() != level {
            return Err(SchedulerError::inconsistent(format!(
                "{} queued at level {} but records level {}",
                id,
                level,
                process.current_queue_level()
            )));
        }

        let outcome = process.execute_unit(now)?;
        let burst = SimEvent::Burst {
            id,
            level,
            start: process.execution_start_time(),
            end_exclusive: now + 1,
            remaining_after: process.remaining_time(),
        };

        match outcome {
            UnitOutcome::Continuing => {}
            UnitOutcome::Completed => {
                state.queues.dequeue_from(level, id)?;
                events.push(burst);
                events.push(SimEvent::Completion { id, time: now + 1 });
            }
            UnitOutcome::SliceExhausted {
                allotment_exhausted,
            } => {
                state.queues.dequeue_from(level, id)?;
                events.push(burst);

                if allotment_exhausted && level < state.config.lowest_level() {
                    state.place(id, level + 1)?;
                    events.push(SimEvent::Demotion {
                        id,
                        from_level: level,
                        to_level: level + 1,
                        time: now + 1,
                    });
                } else {
                    self.requeue_same_level(state, id, level)?;
                }
            }
        }

        Ok(DispatchOutcome::Executed { id, level, outcome })
    }

    /// Continuation first, then the head of the highest non-empty level
    fn select(&self, state: &SchedulerState) -> Result<Option<(usize, ProcessId)>, SchedulerError> {
        if let Some(id) = state.in_progress_process()? {
            let level = state.queues().level_of(id).ok_or_else(|| {
                SchedulerError::inconsistent(format!("{} is mid-burst but not queued", id))
            })?;
            return Ok(Some((level, id)));
        }

        Ok(state.queues().peek_highest_non_empty())
    }

    fn requeue_same_level(
        &self,
        state: &mut SchedulerState,
        id: ProcessId,
        level: usize,
    ) -> Result<(), SchedulerError> {
        let quantum = state.config.quantum(level).ok_or_else(|| {
            SchedulerError::inconsistent(format!("{} ran at missing level {}", id, level))
        })?;
        state.process_mut(id)?.refresh_slice(quantum);
        state.queues.enqueue(level, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LevelQuantum, SimulationConfig};
    use core_types::ProcessSpec;

    fn pid(raw: u32) -> ProcessId {
        ProcessId::new(raw)
    }

    fn state_with(levels: Vec<LevelQuantum>, specs: &[ProcessSpec]) -> SchedulerState {
        let mut config = SimulationConfig::new(levels, 100);
        config.processes = specs.to_vec();
        let mut state = SchedulerState::new(config);
        for spec in specs {
            state.place(spec.id, 0).unwrap();
        }
        state
    }

    #[test]
    fn test_idle_when_nothing_queued() {
        let mut state = state_with(vec![LevelQuantum::new(2, 2)], &[]);
        let mut events = Vec::new();
        assert_eq!(
            Dispatcher::new().dispatch(&mut state, 0, &mut events),
            Ok(DispatchOutcome::Idle)
        );
        assert!(events.is_empty());
    }

    #[test]
    fn test_running_process_stays_at_head() {
        let mut state = state_with(
            vec![LevelQuantum::new(3, 3)],
            &[ProcessSpec::new(1, 0, 10), ProcessSpec::new(2, 0, 10)],
        );
        let mut events = Vec::new();
        let dispatcher = Dispatcher::new();

        dispatcher.dispatch(&mut state, 0, &mut events).unwrap();
        assert_eq!(state.queues().snapshot(), vec![vec![pid(1), pid(2)]]);
        assert!(state.process(pid(1)).unwrap().in_progress());
        assert!(events.is_empty());
    }

    #[test]
    fn test_slice_end_requeues_at_tail() {
        let mut state = state_with(
            vec![LevelQuantum::new(2, 6)],
            &[ProcessSpec::new(1, 0, 10), ProcessSpec::new(2, 0, 10)],
        );
        let mut events = Vec::new();
        let dispatcher = Dispatcher::new();

        dispatcher.dispatch(&mut state, 0, &mut events).unwrap();
        dispatcher.dispatch(&mut state, 1, &mut events).unwrap();

        assert_eq!(state.queues().snapshot(), vec![vec![pid(2), pid(1)]]);
        assert_eq!(
            events,
            vec![SimEvent::Burst {
                id: pid(1),
                level: 0,
                start: 0,
                end_exclusive: 2,
                remaining_after: 8,
            }]
        );
        let process = state.process(pid(1)).unwrap();
        assert_eq!(process.time_slice_remaining(), 2);
        assert_eq!(process.allotment_remaining(), 4);
    }

    #[test]
    fn test_allotment_exhaustion_demotes() {
        let mut state = state_with(
            vec![LevelQuantum::new(2, 2), LevelQuantum::new(4, 8)],
            &[ProcessSpec::new(1, 0, 10)],
        );
        let mut events = Vec::new();
        let dispatcher = Dispatcher::new();

        dispatcher.dispatch(&mut state, 0, &mut events).unwrap();
        let outcome = dispatcher.dispatch(&mut state, 1, &mut events).unwrap();
        assert_eq!(
            outcome,
            DispatchOutcome::Executed {
                id: pid(1),
                level: 0,
                outcome: UnitOutcome::SliceExhausted {
                    allotment_exhausted: true
                },
            }
        );

        assert_eq!(state.queues().snapshot(), vec![vec![], vec![pid(1)]]);
        let process = state.process(pid(1)).unwrap();
        assert_eq!(process.current_queue_level(), 1);
        assert_eq!(process.time_slice_remaining(), 4);
        assert_eq!(process.allotment_remaining(), 8);
        assert!(events.contains(&SimEvent::Demotion {
            id: pid(1),
            from_level: 0,
            to_level: 1,
            time: 2,
        }));
    }

    #[test]
    fn test_lowest_level_never_demotes() {
        let mut state = state_with(vec![LevelQuantum::new(2, 2)], &[ProcessSpec::new(1, 0, 10)]);
        let mut events = Vec::new();
        let dispatcher = Dispatcher::new();

        for tick in 0..4 {
            dispatcher.dispatch(&mut state, tick, &mut events).unwrap();
        }

        let process = state.process(pid(1)).unwrap();
        assert_eq!(process.current_queue_level(), 0);
        assert_eq!(process.allotment_remaining(), 2);
        assert!(!events
            .iter()
            .any(|event| matches!(event, SimEvent::Demotion { .. })));
    }

    #[test]
    fn test_mid_burst_process_beats_higher_level() {
        let mut config = SimulationConfig::new(
            vec![LevelQuantum::new(1, 1), LevelQuantum::new(5, 5)],
            100,
        );
        config.processes = vec![ProcessSpec::new(1, 0, 10), ProcessSpec::new(2, 3, 10)];
        let mut state = SchedulerState::new(config);
        state.place(pid(1), 0).unwrap();

        let dispatcher = Dispatcher::new();
        let mut events = Vec::new();

        // P1 demotes after one tick, then starts a 5-tick burst at level 1
        dispatcher.dispatch(&mut state, 0, &mut events).unwrap();
        dispatcher.dispatch(&mut state, 1, &mut events).unwrap();
        assert!(state.process(pid(1)).unwrap().in_progress());

        // P2 arriving at level 0 does not preempt the burst
        state.place(pid(2), 0).unwrap();
        let outcome = dispatcher.dispatch(&mut state, 2, &mut events).unwrap();
        assert!(matches!(
            outcome,
            DispatchOutcome::Executed { id, level: 1, .. } if id == pid(1)
        ));
        assert_eq!(
            state.process(pid(2)).unwrap().remaining_time(),
            10
        );
    }

    #[test]
    fn test_completion_removes_process() {
        let mut state = state_with(
            vec![LevelQuantum::new(10, 10)],
            &[ProcessSpec::new(1, 0, 2), ProcessSpec::new(2, 0, 2)],
        );
        let mut events = Vec::new();
        let dispatcher = Dispatcher::new();

        dispatcher.dispatch(&mut state, 0, &mut events).unwrap();
        dispatcher.dispatch(&mut state, 1, &mut events).unwrap();

        assert_eq!(state.queues().snapshot(), vec![vec![pid(2)]]);
        assert_eq!(
            events,
            vec![
                SimEvent::Burst {
                    id: pid(1),
                    level: 0,
                    start: 0,
                    end_exclusive: 2,
                    remaining_after: 0,
                },
                SimEvent::Completion { id: pid(1), time: 2 },
            ]
        );
        assert!(state.process(pid(1)).unwrap().is_completed());
    }
}
