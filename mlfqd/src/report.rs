//! Text and JSON rendering of run results

use crate::runtime::HostRuntimeError;
use core_types::Tick;
use sim_scheduler::{EventTrace, SimulationSummary};

fn cell(value: Option<Tick>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn mean(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v))
}

/// Per-process table followed by the aggregate figures
pub fn render_summary(summary: &SimulationSummary) -> String {
    let mut lines = vec![format!(
        "{:<8} {:>8} {:>6} {:>6} {:>6} {:>10} {:>8} {:>8} {:>6} {:>9}",
        "process",
        "arrival",
        "exec",
        "first",
        "done",
        "turnaround",
        "waiting",
        "response",
        "bursts",
        "demotions"
    )];

    for p in &summary.processes {
        lines.push(format!(
            "{:<8} {:>8} {:>6} {:>6} {:>6} {:>10} {:>8} {:>8} {:>6} {:>9}",
            p.id.to_string(),
            p.arrival_time,
            p.execution_time,
            cell(p.first_run),
            cell(p.completion),
            cell(p.turnaround),
            cell(p.waiting),
            cell(p.response),
            p.bursts,
            p.demotions
        ));
    }

    lines.push(String::new());
    lines.push(format!(
        "ticks={} busy={} idle={} utilization={:.1}% boosts={}",
        summary.ticks_simulated,
        summary.busy_ticks,
        summary.idle_ticks,
        summary.cpu_utilization * 100.0,
        summary.boosts
    ));
    lines.push(format!(
        "avg_turnaround={} avg_waiting={} avg_response={}",
        mean(summary.average_turnaround),
        mean(summary.average_waiting),
        mean(summary.average_response)
    ));

    if !summary.unfinished.is_empty() {
        let ids: Vec<String> = summary.unfinished.iter().map(|id| id.to_string()).collect();
        lines.push(format!("unfinished={}", ids.join(",")));
    }

    lines.join("\n")
}

/// One JSON object per event, newline separated
pub fn render_json_lines(trace: &EventTrace) -> Result<String, HostRuntimeError> {
    let mut lines = Vec::with_capacity(trace.len());
    for event in trace.events() {
        let line =
            serde_json::to_string(event).map_err(|e| HostRuntimeError::Encode(e.to_string()))?;
        lines.push(line);
    }
    Ok(lines.join("\n"))
}
