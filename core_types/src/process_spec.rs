//! Static process descriptions

use crate::{ProcessId, Tick};
use serde::{Deserialize, Serialize};

/// Input record describing one process of a workload
///
/// A spec is immutable; the scheduler builds its own mutable state from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSpec {
    /// Process identifier
    pub id: ProcessId,
    /// Tick at which the process becomes ready
    pub arrival_time: Tick,
    /// Total units of CPU work required
    pub execution_time: Tick,
}

impl ProcessSpec {
    /// Creates a new process spec from a raw id
    pub fn new(id: u32, arrival_time: Tick, execution_time: Tick) -> Self {
        Self {
            id: ProcessId::new(id),
            arrival_time,
            execution_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_creation() {
        let spec = ProcessSpec::new(53, 10, 130);
        assert_eq!(spec.id, ProcessId::new(53));
        assert_eq!(spec.arrival_time, 10);
        assert_eq!(spec.execution_time, 130);
    }

    #[test]
    fn test_spec_json_shape() {
        let spec = ProcessSpec::new(1, 0, 5);
        let value = serde_json::to_value(spec).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["arrival_time"], 0);
        assert_eq!(value["execution_time"], 5);
    }
}
