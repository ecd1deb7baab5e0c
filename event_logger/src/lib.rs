//! # Event Logger
//!
//! Structured logging for simulation runs.
//!
//! ## Philosophy
//!
//! The scheduling engine never logs. It emits [`SimEvent`]s, and this crate
//! turns them into structured entries that a host can filter and render.
//! Entries carry fields, not preformatted text.

use core_types::{ProcessId, Tick};
use serde::{Deserialize, Serialize};
use sim_scheduler::SimEvent;
use std::fmt;

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LogLevel {
    /// Per-tick queue snapshots
    Debug,
    /// Scheduling decisions
    Info,
    /// Warnings
    Warn,
    /// Errors
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Simulated tick the entry refers to (if any)
    pub tick: Option<Tick>,
    /// Log message
    pub message: String,
    /// Structured fields
    pub fields: Vec<(String, String)>,
}

impl LogEntry {
    /// Creates a new log entry
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            tick: None,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// Sets the tick
    pub fn at_tick(mut self, tick: Tick) -> Self {
        self.tick = Some(tick);
        self
    }

    /// Adds a field to the log entry
    pub fn with_field(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.fields.push((key.into(), value.to_string()));
        self
    }

    /// Looks up a field value by key
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Formats the entry as `[tick] LEVEL message key=value ...`
    pub fn render(&self) -> String {
        let mut line = match self.tick {
            Some(tick) => format!("[{}] {} {}", tick, self.level, self.message),
            None => format!("[-] {} {}", self.level, self.message),
        };
        for (key, value) in &self.fields {
            line.push(' ');
            line.push_str(key);
            line.push('=');
            line.push_str(value);
        }
        line
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&SimEvent> for LogEntry {
    fn from(event: &SimEvent) -> Self {
        match event {
            SimEvent::Arrival { id, time } => LogEntry::new(LogLevel::Info, "arrival")
                .at_tick(*time)
                .with_field("id", id),
            SimEvent::Boost { time } => LogEntry::new(LogLevel::Info, "boost").at_tick(*time),
            SimEvent::Burst {
                id,
                level,
                start,
                end_exclusive,
                remaining_after,
            } => LogEntry::new(LogLevel::Info, "burst")
                .at_tick(*end_exclusive)
                .with_field("id", id)
                .with_field("level", level)
                .with_field("start", start)
                .with_field("end", end_exclusive)
                .with_field("remaining", remaining_after),
            SimEvent::Demotion {
                id,
                from_level,
                to_level,
                time,
            } => LogEntry::new(LogLevel::Info, "demotion")
                .at_tick(*time)
                .with_field("id", id)
                .with_field("from", from_level)
                .with_field("to", to_level),
            SimEvent::Completion { id, time } => LogEntry::new(LogLevel::Info, "completion")
                .at_tick(*time)
                .with_field("id", id),
            SimEvent::QueueSnapshot {
                time,
                executed,
                levels,
            } => {
                let running = executed.map_or_else(|| "idle".to_string(), |id| id.to_string());
                let mut entry = LogEntry::new(LogLevel::Debug, "queues")
                    .at_tick(*time)
                    .with_field("cpu", running);
                for (level, queue) in levels.iter().enumerate() {
                    entry = entry.with_field(format!("q{}", level), format_queue(queue));
                }
                entry
            }
        }
    }
}

fn format_queue(queue: &[ProcessId]) -> String {
    if queue.is_empty() {
        return "-".to_string();
    }
    queue
        .iter()
        .map(ProcessId::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Collects entries at or above a minimum level
#[derive(Debug, Clone)]
pub struct EventLogger {
    min_level: LogLevel,
    entries: Vec<LogEntry>,
}

impl EventLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self {
            min_level,
            entries: Vec::new(),
        }
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    pub fn set_min_level(&mut self, level: LogLevel) {
        self.min_level = level;
    }

    /// Whether entries at `level` are kept
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    /// Records an entry; returns false if it was filtered out
    pub fn log(&mut self, entry: LogEntry) -> bool {
        if !self.enabled(entry.level) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Records the entry for a simulation event
    pub fn log_event(&mut self, event: &SimEvent) -> bool {
        self.log(LogEntry::from(event))
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Removes and returns every recorded entry
    pub fn drain(&mut self) -> Vec<LogEntry> {
        std::mem::take(&mut self.entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One rendered line per entry
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(LogEntry::render)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for EventLogger {
    fn default() -> Self {
        Self::new(LogLevel::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_scheduler::{LevelQuantum, Simulation, SimulationConfig};
    use core_types::ProcessSpec;

    fn pid(raw: u32) -> ProcessId {
        ProcessId::new(raw)
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn test_log_entry_creation() {
        let entry = LogEntry::new(LogLevel::Info, "test message");
        assert_eq!(entry.level, LogLevel::Info);
        assert_eq!(entry.message, "test message");
        assert!(entry.tick.is_none());
        assert!(entry.fields.is_empty());
        assert_eq!(entry.render(), "[-] INFO test message");
    }

    #[test]
    fn test_log_entry_with_fields() {
        let entry = LogEntry::new(LogLevel::Warn, "test")
            .at_tick(4)
            .with_field("key1", "value1")
            .with_field("key2", 2);

        assert_eq!(entry.fields.len(), 2);
        assert_eq!(entry.field("key2"), Some("2"));
        assert_eq!(entry.field("missing"), None);
        assert_eq!(entry.render(), "[4] WARN test key1=value1 key2=2");
    }

    #[test]
    fn test_burst_entry() {
        let entry = LogEntry::from(&SimEvent::Burst {
            id: pid(3),
            level: 1,
            start: 4,
            end_exclusive: 9,
            remaining_after: 2,
        });
        assert_eq!(entry.level, LogLevel::Info);
        assert_eq!(
            entry.render(),
            "[9] INFO burst id=P3 level=1 start=4 end=9 remaining=2"
        );
    }

    #[test]
    fn test_snapshot_entry_is_debug() {
        let entry = LogEntry::from(&SimEvent::QueueSnapshot {
            time: 2,
            executed: None,
            levels: vec![vec![pid(1), pid(2)], vec![]],
        });
        assert_eq!(entry.level, LogLevel::Debug);
        assert_eq!(entry.render(), "[2] DEBUG queues cpu=idle q0=P1,P2 q1=-");
    }

    #[test]
    fn test_logger_filters_by_level() {
        let mut logger = EventLogger::default();
        assert!(!logger.log(LogEntry::new(LogLevel::Debug, "dropped")));
        assert!(logger.log(LogEntry::new(LogLevel::Error, "kept")));
        assert_eq!(logger.len(), 1);

        logger.set_min_level(LogLevel::Debug);
        assert!(logger.enabled(LogLevel::Debug));
    }

    #[test]
    fn test_logger_records_run() {
        let config = SimulationConfig::new(vec![LevelQuantum::new(10, 10)], 6)
            .with_process(ProcessSpec::new(1, 0, 5));
        let trace = Simulation::run_config(config).unwrap();

        let mut logger = EventLogger::new(LogLevel::Info);
        for event in trace.events() {
            logger.log_event(event);
        }

        assert_eq!(
            logger.render(),
            "[0] INFO arrival id=P1\n\
             [5] INFO burst id=P1 level=0 start=0 end=5 remaining=0\n\
             [5] INFO completion id=P1"
        );

        let drained = logger.drain();
        assert_eq!(drained.len(), 3);
        assert!(logger.is_empty());
    }

    #[test]
    fn test_entry_serializes() {
        let entry = LogEntry::new(LogLevel::Info, "boost").at_tick(400);
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["level"], "Info");
        assert_eq!(value["tick"], 400);
    }
}
