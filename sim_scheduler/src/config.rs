//! Simulation configuration
//!
//! The configuration is the only input to a run: the queue hierarchy's
//! quantums, the boost policy, the horizon and the workload. It is passed
//! explicitly to the simulation at construction; nothing is read from
//! global state.
//!
//! Configurations are stored as versioned JSON.

use crate::error::ConfigError;
use core_types::{ProcessSpec, Tick};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Time slice and allotment for one priority level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelQuantum {
    /// Maximum contiguous ticks per burst at this level
    pub time_slice: Tick,
    /// Cumulative ticks a process may spend at this level before demotion
    pub allotment: Tick,
}

impl LevelQuantum {
    pub fn new(time_slice: Tick, allotment: Tick) -> Self {
        Self {
            time_slice,
            allotment,
        }
    }
}

/// Order in which boosted processes are placed back into level 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoostOrder {
    /// Highest id first
    #[default]
    DescendingId,
    /// Lowest id first, matching the arrival tie-break
    AscendingId,
    /// Keep the current queue order, highest level first, FIFO within a level
    QueueOrder,
}

/// Complete configuration of one simulation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Version of the configuration format
    pub version: u32,
    /// Quantums per level, index 0 is the highest priority
    pub levels: Vec<LevelQuantum>,
    /// Ticks between priority boosts; `None` disables boosting
    #[serde(default)]
    pub boost_period: Option<Tick>,
    /// Placement order used by the boost
    #[serde(default)]
    pub boost_order: BoostOrder,
    /// Last tick simulated (inclusive)
    pub horizon: Tick,
    /// Stop at the end of the tick on which the last process completes
    #[serde(default)]
    pub stop_when_finished: bool,
    /// The workload
    pub processes: Vec<ProcessSpec>,
}

impl SimulationConfig {
    /// Current version of the configuration format
    pub const CURRENT_VERSION: u32 = 1;

    /// Creates a configuration with no processes and boosting disabled
    pub fn new(levels: Vec<LevelQuantum>, horizon: Tick) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            levels,
            boost_period: None,
            boost_order: BoostOrder::default(),
            horizon,
            stop_when_finished: false,
            processes: Vec::new(),
        }
    }

    /// The reference workload: three levels, boost every 400 ticks,
    /// six processes arriving between tick 10 and tick 445.
    pub fn reference_workload() -> Self {
        Self::new(
            vec![
                LevelQuantum::new(10, 30),
                LevelQuantum::new(50, 100),
                LevelQuantum::new(60, 120),
            ],
            1000,
        )
        .with_boost_period(400)
        .with_process(ProcessSpec::new(53, 10, 130))
        .with_process(ProcessSpec::new(165, 10, 125))
        .with_process(ProcessSpec::new(472, 80, 128))
        .with_process(ProcessSpec::new(305, 90, 90))
        .with_process(ProcessSpec::new(235, 175, 85))
        .with_process(ProcessSpec::new(366, 445, 80))
    }

    pub fn with_boost_period(mut self, period: Tick) -> Self {
        self.boost_period = Some(period);
        self
    }

    pub fn with_boost_order(mut self, order: BoostOrder) -> Self {
        self.boost_order = order;
        self
    }

    pub fn with_process(mut self, spec: ProcessSpec) -> Self {
        self.processes.push(spec);
        self
    }

    pub fn stop_when_finished(mut self, stop: bool) -> Self {
        self.stop_when_finished = stop;
        self
    }

    /// Number of priority levels
    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    /// Index of the lowest priority level
    pub fn lowest_level(&self) -> usize {
        self.levels.len().saturating_sub(1)
    }

    /// Quantums of a level, if it exists
    pub fn quantum(&self, level: usize) -> Option<LevelQuantum> {
        self.levels.get(level).copied()
    }

    /// Checks every constraint the engine relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != Self::CURRENT_VERSION {
            return Err(ConfigError::UnsupportedVersion(self.version));
        }

        if self.levels.is_empty() {
            return Err(ConfigError::NoLevels);
        }

        for (level, quantum) in self.levels.iter().enumerate() {
            if quantum.time_slice == 0 {
                return Err(ConfigError::ZeroTimeSlice { level });
            }
            if quantum.allotment < quantum.time_slice {
                return Err(ConfigError::AllotmentBelowSlice {
                    level,
                    time_slice: quantum.time_slice,
                    allotment: quantum.allotment,
                });
            }
        }

        if self.boost_period == Some(0) {
            return Err(ConfigError::ZeroBoostPeriod);
        }

        let mut seen = BTreeSet::new();
        for spec in &self.processes {
            if spec.execution_time == 0 {
                return Err(ConfigError::ZeroExecutionTime(spec.id));
            }
            if !seen.insert(spec.id) {
                return Err(ConfigError::DuplicateProcessId(spec.id));
            }
        }

        Ok(())
    }

    /// Parses and validates a JSON configuration
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: SimulationConfig =
            serde_json::from_slice(bytes).map_err(|e| ConfigError::Deserialize(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Encodes the configuration as pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::ProcessId;

    fn two_levels() -> Vec<LevelQuantum> {
        vec![LevelQuantum::new(10, 10), LevelQuantum::new(20, 20)]
    }

    #[test]
    fn test_reference_workload_is_valid() {
        let config = SimulationConfig::reference_workload();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.num_levels(), 3);
        assert_eq!(config.lowest_level(), 2);
        assert_eq!(config.processes.len(), 6);
        assert_eq!(config.boost_period, Some(400));
        assert_eq!(config.boost_order, BoostOrder::DescendingId);
    }

    #[test]
    fn test_reference_slices_grow_with_level() {
        let config = SimulationConfig::reference_workload();
        let slices: Vec<Tick> = config.levels.iter().map(|q| q.time_slice).collect();
        assert_eq!(slices, vec![10, 50, 60]);
    }

    #[test]
    fn test_no_levels_rejected() {
        let config = SimulationConfig::new(Vec::new(), 10);
        assert_eq!(config.validate(), Err(ConfigError::NoLevels));
    }

    #[test]
    fn test_zero_slice_rejected() {
        let config = SimulationConfig::new(vec![LevelQuantum::new(0, 5)], 10);
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroTimeSlice { level: 0 })
        );
    }

    #[test]
    fn test_allotment_below_slice_rejected() {
        let config = SimulationConfig::new(
            vec![LevelQuantum::new(10, 30), LevelQuantum::new(50, 20)],
            10,
        );
        assert_eq!(
            config.validate(),
            Err(ConfigError::AllotmentBelowSlice {
                level: 1,
                time_slice: 50,
                allotment: 20,
            })
        );
    }

    #[test]
    fn test_zero_boost_period_rejected() {
        let config = SimulationConfig::new(two_levels(), 10).with_boost_period(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroBoostPeriod));
    }

    #[test]
    fn test_zero_execution_time_rejected() {
        let config =
            SimulationConfig::new(two_levels(), 10).with_process(ProcessSpec::new(4, 0, 0));
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroExecutionTime(ProcessId::new(4)))
        );
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let config = SimulationConfig::new(two_levels(), 10)
            .with_process(ProcessSpec::new(1, 0, 5))
            .with_process(ProcessSpec::new(1, 3, 5));
        assert_eq!(
            config.validate(),
            Err(ConfigError::DuplicateProcessId(ProcessId::new(1)))
        );
    }

    #[test]
    fn test_json_roundtrip() {
        let config = SimulationConfig::reference_workload();
        let json = config.to_json_pretty().unwrap();
        let parsed = SimulationConfig::from_json_slice(json.as_bytes()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_json_defaults_for_optional_fields() {
        let json = r#"
        {
          "version": 1,
          "levels": [ { "time_slice": 10, "allotment": 10 } ],
          "horizon": 20,
          "processes": [ { "id": 1, "arrival_time": 0, "execution_time": 5 } ]
        }
        "#;

        let config = SimulationConfig::from_json_slice(json.as_bytes()).unwrap();
        assert_eq!(config.boost_period, None);
        assert_eq!(config.boost_order, BoostOrder::DescendingId);
        assert!(!config.stop_when_finished);
    }

    #[test]
    fn test_json_boost_order_names() {
        let json = r#"
        {
          "version": 1,
          "levels": [ { "time_slice": 10, "allotment": 10 } ],
          "boost_period": 50,
          "boost_order": "queue_order",
          "horizon": 20,
          "processes": []
        }
        "#;

        let config = SimulationConfig::from_json_slice(json.as_bytes()).unwrap();
        assert_eq!(config.boost_order, BoostOrder::QueueOrder);
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let mut config = SimulationConfig::reference_workload();
        config.version = 99;
        let json = serde_json::to_vec(&config).unwrap();
        assert_eq!(
            SimulationConfig::from_json_slice(&json),
            Err(ConfigError::UnsupportedVersion(99))
        );
    }

    #[test]
    fn test_malformed_json_rejected() {
        let result = SimulationConfig::from_json_slice(b"{ not json");
        assert!(matches!(result, Err(ConfigError::Deserialize(_))));
    }
}
