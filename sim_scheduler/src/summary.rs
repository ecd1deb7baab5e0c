//! Per-run statistics
//!
//! Derived purely from the configuration and the event trace, so a summary
//! can be recomputed from a saved trace.

use crate::config::SimulationConfig;
use crate::event::EventTrace;
use core_types::{ProcessId, Tick};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Timing figures for one process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessSummary {
    pub id: ProcessId,
    pub arrival_time: Tick,
    pub execution_time: Tick,
    /// First tick the process executed
    pub first_run: Option<Tick>,
    pub completion: Option<Tick>,
    /// `completion - arrival`
    pub turnaround: Option<Tick>,
    /// `turnaround - execution_time`
    pub waiting: Option<Tick>,
    /// `first_run - arrival`
    pub response: Option<Tick>,
    pub bursts: usize,
    pub demotions: usize,
}

/// Aggregate statistics of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub processes: Vec<ProcessSummary>,
    pub ticks_simulated: u64,
    pub busy_ticks: u64,
    pub idle_ticks: u64,
    /// Busy ticks over simulated ticks, 0.0 for an empty run
    pub cpu_utilization: f64,
    pub boosts: usize,
    /// Averages over completed processes only
    pub average_turnaround: Option<f64>,
    pub average_waiting: Option<f64>,
    pub average_response: Option<f64>,
    /// Processes still unfinished when the run ended
    pub unfinished: Vec<ProcessId>,
}

impl SimulationSummary {
    /// Builds the summary of a finished (or interrupted) run
    ///
    /// A burst still open when the run ended is not counted in `bursts`,
    /// but its ticks are counted as busy.
    pub fn from_trace(config: &SimulationConfig, trace: &EventTrace) -> Self {
        let mut first_run: BTreeMap<ProcessId, Tick> = BTreeMap::new();
        let mut ticks_simulated = 0;
        let mut busy_ticks = 0;
        for (time, executed) in trace.executions() {
            ticks_simulated += 1;
            if let Some(id) = executed {
                busy_ticks += 1;
                first_run.entry(id).or_insert(time);
            }
        }

        let mut bursts: BTreeMap<ProcessId, usize> = BTreeMap::new();
        for burst in trace.bursts() {
            *bursts.entry(burst.id).or_default() += 1;
        }

        let mut demotions: BTreeMap<ProcessId, usize> = BTreeMap::new();
        for (id, _, _) in trace.demotions() {
            *demotions.entry(id).or_default() += 1;
        }

        let completions: BTreeMap<ProcessId, Tick> = trace.completions().collect();

        let mut specs = config.processes.clone();
        specs.sort_by_key(|spec| spec.id);

        let processes: Vec<ProcessSummary> = specs
            .iter()
            .map(|spec| {
                let first_run = first_run.get(&spec.id).copied();
                let completion = completions.get(&spec.id).copied();
                let turnaround = completion.map(|done| done - spec.arrival_time);
                ProcessSummary {
                    id: spec.id,
                    arrival_time: spec.arrival_time,
                    execution_time: spec.execution_time,
                    first_run,
                    completion,
                    turnaround,
                    waiting: turnaround.map(|t| t.saturating_sub(spec.execution_time)),
                    response: first_run.map(|start| start - spec.arrival_time),
                    bursts: bursts.get(&spec.id).copied().unwrap_or(0),
                    demotions: demotions.get(&spec.id).copied().unwrap_or(0),
                }
            })
            .collect();

        let cpu_utilization = if ticks_simulated == 0 {
            0.0
        } else {
            busy_ticks as f64 / ticks_simulated as f64
        };

        let completed: Vec<&ProcessSummary> =
            processes.iter().filter(|p| p.completion.is_some()).collect();

        Self {
            ticks_simulated,
            busy_ticks,
            idle_ticks: ticks_simulated.saturating_sub(busy_ticks),
            cpu_utilization,
            boosts: trace.boosts().count(),
            average_turnaround: average(completed.iter().filter_map(|p| p.turnaround)),
            average_waiting: average(completed.iter().filter_map(|p| p.waiting)),
            average_response: average(completed.iter().filter_map(|p| p.response)),
            unfinished: processes
                .iter()
                .filter(|p| p.completion.is_none())
                .map(|p| p.id)
                .collect(),
            processes,
        }
    }

    pub fn process(&self, id: ProcessId) -> Option<&ProcessSummary> {
        self.processes.iter().find(|p| p.id == id)
    }
}

fn average(values: impl Iterator<Item = Tick>) -> Option<f64> {
    let (sum, count) = values.fold((0u64, 0u64), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum as f64 / count as f64)
    }
}
