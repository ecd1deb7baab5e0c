//! Simulation events
//!
//! The engine never performs I/O. Everything observable about a run is an
//! event, produced in tick order. A trace can be fingerprinted so two runs
//! can be compared without keeping both event lists around.

use core_types::{ProcessId, Tick};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Something observable that happened during a tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimEvent {
    /// A process was admitted into level 0
    Arrival { id: ProcessId, time: Tick },
    /// Every active process was reset to level 0
    Boost { time: Tick },
    /// A contiguous run of one process ended
    Burst {
        id: ProcessId,
        level: usize,
        start: Tick,
        end_exclusive: Tick,
        remaining_after: Tick,
    },
    /// A process moved to a lower priority level
    Demotion {
        id: ProcessId,
        from_level: usize,
        to_level: usize,
        time: Tick,
    },
    /// A process finished its last unit of work
    Completion { id: ProcessId, time: Tick },
    /// Queue contents at the end of a tick
    QueueSnapshot {
        time: Tick,
        /// Process that executed during the tick
        executed: Option<ProcessId>,
        levels: Vec<Vec<ProcessId>>,
    },
}

impl SimEvent {
    /// Tick the event is reported at
    pub fn time(&self) -> Tick {
        match self {
            SimEvent::Arrival { time, .. }
            | SimEvent::Boost { time }
            | SimEvent::Demotion { time, .. }
            | SimEvent::Completion { time, .. }
            | SimEvent::QueueSnapshot { time, .. } => *time,
            SimEvent::Burst { end_exclusive, .. } => *end_exclusive,
        }
    }

    /// Process the event is about, if any
    pub fn process_id(&self) -> Option<ProcessId> {
        match self {
            SimEvent::Arrival { id, .. }
            | SimEvent::Burst { id, .. }
            | SimEvent::Demotion { id, .. }
            | SimEvent::Completion { id, .. } => Some(*id),
            SimEvent::Boost { .. } | SimEvent::QueueSnapshot { .. } => None,
        }
    }

    fn hash_into(&self, hasher: &mut Sha256) {
        match self {
            SimEvent::Arrival { id, time } => {
                hasher.update([0u8]);
                hasher.update(id.as_u32().to_le_bytes());
                hasher.update(time.to_le_bytes());
            }
            SimEvent::Boost { time } => {
                hasher.update([1u8]);
                hasher.update(time.to_le_bytes());
            }
            SimEvent::Burst {
                id,
                level,
                start,
                end_exclusive,
                remaining_after,
            } => {
                hasher.update([2u8]);
                hasher.update(id.as_u32().to_le_bytes());
                hasher.update((*level as u64).to_le_bytes());
                hasher.update(start.to_le_bytes());
                hasher.update(end_exclusive.to_le_bytes());
                hasher.update(remaining_after.to_le_bytes());
            }
            SimEvent::Demotion {
                id,
                from_level,
                to_level,
                time,
            } => {
                hasher.update([3u8]);
                hasher.update(id.as_u32().to_le_bytes());
                hasher.update((*from_level as u64).to_le_bytes());
                hasher.update((*to_level as u64).to_le_bytes());
                hasher.update(time.to_le_bytes());
            }
            SimEvent::Completion { id, time } => {
                hasher.update([4u8]);
                hasher.update(id.as_u32().to_le_bytes());
                hasher.update(time.to_le_bytes());
            }
            SimEvent::QueueSnapshot {
                time,
                executed,
                levels,
            } => {
                hasher.update([5u8]);
                hasher.update(time.to_le_bytes());
                match executed {
                    Some(id) => {
                        hasher.update([1u8]);
                        hasher.update(id.as_u32().to_le_bytes());
                    }
                    None => hasher.update([0u8]),
                }
                for level in levels {
                    hasher.update((level.len() as u64).to_le_bytes());
                    for id in level {
                        hasher.update(id.as_u32().to_le_bytes());
                    }
                }
            }
        }
    }
}

/// Burst fields pulled out of a [`SimEvent::Burst`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BurstRecord {
    pub id: ProcessId,
    pub level: usize,
    pub start: Tick,
    pub end_exclusive: Tick,
    pub remaining_after: Tick,
}

impl BurstRecord {
    pub fn len(&self) -> Tick {
        self.end_exclusive - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ordered record of every event of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventTrace {
    events: Vec<SimEvent>,
}

impl EventTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<SimEvent> {
        self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Admissions as `(id, time)`
    pub fn arrivals(&self) -> impl Iterator<Item = (ProcessId, Tick)> + '_ {
        self.events.iter().filter_map(|event| match event {
            SimEvent::Arrival { id, time } => Some((*id, *time)),
            _ => None,
        })
    }

    pub fn bursts(&self) -> impl Iterator<Item = BurstRecord> + '_ {
        self.events.iter().filter_map(|event| match event {
            SimEvent::Burst {
                id,
                level,
                start,
                end_exclusive,
                remaining_after,
            } => Some(BurstRecord {
                id: *id,
                level: *level,
                start: *start,
                end_exclusive: *end_exclusive,
                remaining_after: *remaining_after,
            }),
            _ => None,
        })
    }

    /// Completions as `(id, time)`
    pub fn completions(&self) -> impl Iterator<Item = (ProcessId, Tick)> + '_ {
        self.events.iter().filter_map(|event| match event {
            SimEvent::Completion { id, time } => Some((*id, *time)),
            _ => None,
        })
    }

    /// Demotions as `(id, to_level, time)`
    pub fn demotions(&self) -> impl Iterator<Item = (ProcessId, usize, Tick)> + '_ {
        self.events.iter().filter_map(|event| match event {
            SimEvent::Demotion {
                id, to_level, time, ..
            } => Some((*id, *to_level, *time)),
            _ => None,
        })
    }

    pub fn boosts(&self) -> impl Iterator<Item = Tick> + '_ {
        self.events.iter().filter_map(|event| match event {
            SimEvent::Boost { time } => Some(*time),
            _ => None,
        })
    }

    /// Queue snapshots as `(time, levels)`
    pub fn snapshots(&self) -> impl Iterator<Item = (Tick, &[Vec<ProcessId>])> + '_ {
        self.events.iter().filter_map(|event| match event {
            SimEvent::QueueSnapshot { time, levels, .. } => Some((*time, levels.as_slice())),
            _ => None,
        })
    }

    /// Per-tick CPU usage as `(time, executed)`, one entry per simulated tick
    pub fn executions(&self) -> impl Iterator<Item = (Tick, Option<ProcessId>)> + '_ {
        self.events.iter().filter_map(|event| match event {
            SimEvent::QueueSnapshot { time, executed, .. } => Some((*time, *executed)),
            _ => None,
        })
    }

    /// Completion time of a process, if it completed
    pub fn completion_time(&self, process_id: ProcessId) -> Option<Tick> {
        self.completions()
            .find(|(id, _)| *id == process_id)
            .map(|(_, time)| time)
    }

    /// Hex-encoded SHA-256 over every event in order
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        for event in &self.events {
            event.hash_into(&mut hasher);
        }
        hasher
            .finalize()
            .iter()
            .map(|byte| format!("{:02x}", byte))
            .collect()
    }
}

impl Extend<SimEvent> for EventTrace {
    fn extend<T: IntoIterator<Item = SimEvent>>(&mut self, iter: T) {
        self.events.extend(iter);
    }
}

impl FromIterator<SimEvent> for EventTrace {
    fn from_iter<T: IntoIterator<Item = SimEvent>>(iter: T) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(raw: u32) -> ProcessId {
        ProcessId::new(raw)
    }

    fn sample_trace() -> EventTrace {
        vec![
            SimEvent::Arrival { id: pid(1), time: 0 },
            SimEvent::QueueSnapshot {
                time: 0,
                executed: Some(pid(1)),
                levels: vec![vec![pid(1)]],
            },
            SimEvent::Burst {
                id: pid(1),
                level: 0,
                start: 0,
                end_exclusive: 2,
                remaining_after: 0,
            },
            SimEvent::Completion { id: pid(1), time: 2 },
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_event_accessors() {
        let burst = SimEvent::Burst {
            id: pid(3),
            level: 1,
            start: 4,
            end_exclusive: 9,
            remaining_after: 2,
        };
        assert_eq!(burst.time(), 9);
        assert_eq!(burst.process_id(), Some(pid(3)));
        assert_eq!(SimEvent::Boost { time: 5 }.process_id(), None);
    }

    #[test]
    fn test_trace_filters() {
        let trace = sample_trace();
        assert_eq!(trace.len(), 4);
        assert_eq!(trace.arrivals().collect::<Vec<_>>(), vec![(pid(1), 0)]);
        assert_eq!(trace.completions().collect::<Vec<_>>(), vec![(pid(1), 2)]);
        assert_eq!(trace.completion_time(pid(1)), Some(2));
        assert_eq!(trace.completion_time(pid(2)), None);
        assert_eq!(trace.snapshots().count(), 1);
        assert_eq!(trace.executions().collect::<Vec<_>>(), vec![(0, Some(pid(1)))]);

        let bursts: Vec<BurstRecord> = trace.bursts().collect();
        assert_eq!(bursts.len(), 1);
        assert_eq!(bursts[0].len(), 2);
    }

    #[test]
    fn test_digest_deterministic() {
        let a = sample_trace();
        let b = sample_trace();
        assert_eq!(a.digest(), b.digest());
        assert_eq!(a.digest().len(), 64);
    }

    #[test]
    fn test_digest_sensitive_to_content() {
        let a = sample_trace();
        let mut b = sample_trace();
        b.push(SimEvent::Boost { time: 3 });
        assert_ne!(a.digest(), b.digest());
    }

    #[test]
    fn test_event_json_is_tagged() {
        let event = SimEvent::Completion { id: pid(7), time: 12 };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], "completion");
        assert_eq!(value["id"], 7);
        assert_eq!(value["time"], 12);
    }
}
