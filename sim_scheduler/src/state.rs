//! Shared scheduler state
//!
//! Process records and the queue hierarchy, owned by the simulation and
//! lent to each component in turn during a tick.

use crate::config::SimulationConfig;
use crate::error::SchedulerError;
use crate::process::Process;
use crate::queues::QueueHierarchy;
use core_types::ProcessId;
use std::collections::BTreeMap;

/// Everything the scheduling components read and mutate
#[derive(Debug, Clone)]
pub struct SchedulerState {
    pub(crate) config: SimulationConfig,
    /// Keyed by id so iteration is always in ascending id order
    pub(crate) processes: BTreeMap<ProcessId, Process>,
    pub(crate) queues: QueueHierarchy,
}

impl SchedulerState {
    /// Builds fresh state from a validated configuration
    pub fn new(config: SimulationConfig) -> Self {
        let processes = config
            .processes
            .iter()
            .map(|spec| (spec.id, Process::from_spec(spec)))
            .collect();
        let queues = QueueHierarchy::new(config.num_levels());

        Self {
            config,
            processes,
            queues,
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn queues(&self) -> &QueueHierarchy {
        &self.queues
    }

    pub fn process(&self, process_id: ProcessId) -> Option<&Process> {
        self.processes.get(&process_id)
    }

    /// All processes in ascending id order
    pub fn processes(&self) -> impl Iterator<Item = &Process> + '_ {
        self.processes.values()
    }

    pub fn all_completed(&self) -> bool {
        self.processes.values().all(Process::is_completed)
    }

    pub(crate) fn process_mut(&mut self, process_id: ProcessId) -> Result<&mut Process, SchedulerError> {
        self.processes
            .get_mut(&process_id)
            .ok_or_else(|| SchedulerError::inconsistent(format!("unknown process {}", process_id)))
    }

    /// The process holding a partially run slice, if any
    pub(crate) fn in_progress_process(&self) -> Result<Option<ProcessId>, SchedulerError> {
        let mut running = self.processes.values().filter(|p| p.in_progress());
        let first = running.next().map(Process::id);
        if let Some(second) = running.next() {
            return Err(SchedulerError::inconsistent(format!(
                "{} and {} are both mid-burst",
                first.map_or_else(String::new, |id| id.to_string()),
                second.id()
            )));
        }
        Ok(first)
    }

    /// Gives a process fresh quantums at `level` and appends it to that level
    pub(crate) fn place(&mut self, process_id: ProcessId, level: usize) -> Result<(), SchedulerError> {
        let quantum = self.config.quantum(level).ok_or_else(|| {
            SchedulerError::inconsistent(format!("{} placed at missing level {}", process_id, level))
        })?;

        let process = self
            .processes
            .get_mut(&process_id)
            .ok_or_else(|| SchedulerError::inconsistent(format!("unknown process {}", process_id)))?;
        if process.is_completed() {
            return Err(SchedulerError::inconsistent(format!(
                "completed process {} cannot be re-enqueued",
                process_id
            )));
        }

        process.enter_level(level, quantum);
        self.queues.enqueue(level, process_id)
    }
}
