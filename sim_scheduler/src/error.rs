//! Scheduler error types

use core_types::ProcessId;
use thiserror::Error;

/// Reasons a simulation configuration is rejected
///
/// All of these are detected before the first tick runs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The queue hierarchy has no levels
    #[error("At least one priority level is required")]
    NoLevels,

    /// A level has a zero-length time slice
    #[error("Level {level} has a zero time slice")]
    ZeroTimeSlice { level: usize },

    /// A level's allotment cannot hold a single slice
    #[error("Level {level} allotment {allotment} is smaller than its time slice {time_slice}")]
    AllotmentBelowSlice {
        level: usize,
        time_slice: u64,
        allotment: u64,
    },

    /// Boosting was enabled with a period of zero
    #[error("Boost period must be positive")]
    ZeroBoostPeriod,

    /// A process requires no work
    #[error("Process {0} has zero execution time")]
    ZeroExecutionTime(ProcessId),

    /// Two processes share an identifier
    #[error("Duplicate process id: {0}")]
    DuplicateProcessId(ProcessId),

    /// The configuration file was written by an unknown format version
    #[error("Unsupported configuration version: {0}")]
    UnsupportedVersion(u32),

    /// The configuration could not be parsed
    #[error("Failed to parse configuration: {0}")]
    Deserialize(String),

    /// The configuration could not be encoded
    #[error("Failed to serialize configuration: {0}")]
    Serialize(String),
}

/// Errors surfaced by the scheduling engine
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchedulerError {
    /// Configuration failed validation; nothing was simulated
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),

    /// An internal invariant was violated; the simulation cannot continue
    #[error("Inconsistent scheduler state: {0}")]
    InconsistentState(String),
}

impl SchedulerError {
    pub(crate) fn inconsistent(message: impl Into<String>) -> Self {
        SchedulerError::InconsistentState(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_converts() {
        let err: SchedulerError = ConfigError::ZeroBoostPeriod.into();
        assert_eq!(
            err,
            SchedulerError::InvalidConfiguration(ConfigError::ZeroBoostPeriod)
        );
    }

    #[test]
    fn test_error_messages() {
        let err = ConfigError::AllotmentBelowSlice {
            level: 1,
            time_slice: 50,
            allotment: 20,
        };
        assert_eq!(
            err.to_string(),
            "Level 1 allotment 20 is smaller than its time slice 50"
        );

        let err = SchedulerError::inconsistent("P1 queued twice");
        assert_eq!(err.to_string(), "Inconsistent scheduler state: P1 queued twice");
    }
}
