//! Queue hierarchy
//!
//! One FIFO per priority level, level 0 first. Processes are enqueued at
//! the back and taken from the front. A process that is executing stays at
//! the head of its level until its burst ends, so the hierarchy is the
//! single record of which processes are ready.

use crate::error::SchedulerError;
use core_types::ProcessId;
use std::collections::VecDeque;

/// Ordered set of priority levels holding ready processes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueHierarchy {
    levels: Vec<VecDeque<ProcessId>>,
}

impl QueueHierarchy {
    /// Creates a hierarchy with `num_levels` empty levels
    pub fn new(num_levels: usize) -> Self {
        Self {
            levels: vec![VecDeque::new(); num_levels],
        }
    }

    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    /// Appends a process to the tail of a level
    ///
    /// Fails if the level does not exist or the process is already queued
    /// anywhere in the hierarchy.
    pub fn enqueue(&mut self, level: usize, process_id: ProcessId) -> Result<(), SchedulerError> {
        if level >= self.levels.len() {
            return Err(SchedulerError::inconsistent(format!(
                "{} enqueued at level {} of a {}-level hierarchy",
                process_id,
                level,
                self.levels.len()
            )));
        }
        if let Some(existing) = self.level_of(process_id) {
            return Err(SchedulerError::inconsistent(format!(
                "{} is already queued at level {}",
                process_id, existing
            )));
        }
        self.levels[level].push_back(process_id);
        Ok(())
    }

    /// Returns the head of the lowest-indexed non-empty level
    pub fn peek_highest_non_empty(&self) -> Option<(usize, ProcessId)> {
        self.levels
            .iter()
            .enumerate()
            .find_map(|(level, queue)| queue.front().map(|&id| (level, id)))
    }

    /// Removes and returns the head of the lowest-indexed non-empty level
    pub fn dequeue_highest_non_empty(&mut self) -> Option<(usize, ProcessId)> {
        self.levels
            .iter_mut()
            .enumerate()
            .find_map(|(level, queue)| queue.pop_front().map(|id| (level, id)))
    }

    /// Removes `process_id` from the head of `level`
    ///
    /// The head is where an executing process always sits; anything else
    /// there means the hierarchy and the process records disagree.
    pub fn dequeue_from(&mut self, level: usize, process_id: ProcessId) -> Result<(), SchedulerError> {
        let head = self.levels.get(level).and_then(|queue| queue.front().copied());
        if head != Some(process_id) {
            return Err(SchedulerError::inconsistent(format!(
                "expected {} at the head of level {}, found {:?}",
                process_id, level, head
            )));
        }
        self.levels[level].pop_front();
        Ok(())
    }

    /// Empties every level
    pub fn clear_all(&mut self) {
        for queue in &mut self.levels {
            queue.clear();
        }
    }

    /// Level currently holding the process
    pub fn level_of(&self, process_id: ProcessId) -> Option<usize> {
        self.levels
            .iter()
            .position(|queue| queue.contains(&process_id))
    }

    pub fn contains(&self, process_id: ProcessId) -> bool {
        self.level_of(process_id).is_some()
    }

    /// Total number of queued processes
    pub fn len(&self) -> usize {
        self.levels.iter().map(VecDeque::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.iter().all(VecDeque::is_empty)
    }

    pub fn level_len(&self, level: usize) -> usize {
        self.levels.get(level).map_or(0, VecDeque::len)
    }

    /// All queued processes, highest level first, FIFO within a level
    pub fn iter(&self) -> impl Iterator<Item = ProcessId> + '_ {
        self.levels.iter().flat_map(|queue| queue.iter().copied())
    }

    /// Per-level id sequences
    pub fn snapshot(&self) -> Vec<Vec<ProcessId>> {
        self.levels
            .iter()
            .map(|queue| queue.iter().copied().collect())
            .collect()
    }
}
