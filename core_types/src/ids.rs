//! Identifiers for simulated entities

use serde::{Deserialize, Serialize};
use std::fmt;

/// One unit of simulated time
///
/// The simulator advances in whole ticks; there is no sub-tick time.
pub type Tick = u64;

/// Unique identifier for a simulated process
///
/// Unlike an OS pid, this identifier is chosen by the workload author and
/// never reused. Its ordering is the tie-break key whenever several
/// processes become ready on the same tick.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ProcessId(u32);

impl ProcessId {
    /// Creates a process ID from its raw value
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw value
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl From<u32> for ProcessId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}
