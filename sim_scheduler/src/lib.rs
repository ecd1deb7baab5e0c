//! # Multi-Level Feedback Queue Simulator
//!
//! A discrete-time simulation of an MLFQ CPU scheduler.
//!
//! ## Philosophy
//!
//! - **Determinism first**: Same configuration => same event sequence.
//! - **Events, not output**: The engine never prints; it produces events and
//!   the host decides what to show.
//! - **Invariants are fatal**: A broken invariant stops the run with
//!   [`SchedulerError::InconsistentState`] instead of being papered over.
//!
//! ## Model
//!
//! - One CPU, one unit of work per tick.
//! - Level 0 is the highest priority. Each level has a time slice (the
//!   longest contiguous burst) and an allotment (the total time a process
//!   may spend at that level before it is demoted).
//! - A burst, once started, is never preempted by arrivals or by other
//!   ready work. It ends when its slice runs out or the process completes,
//!   or is cut short between ticks by a boost.
//! - A periodic boost returns every active process to level 0.
//!
//! ## Example
//!
//! ```
//! use core_types::{ProcessId, ProcessSpec};
//! use sim_scheduler::{LevelQuantum, Simulation, SimulationConfig};
//!
//! let config = SimulationConfig::new(vec![LevelQuantum::new(10, 10)], 10)
//!     .with_process(ProcessSpec::new(1, 0, 5));
//!
//! let trace = Simulation::run_config(config).unwrap();
//! assert_eq!(trace.completion_time(ProcessId::new(1)), Some(5));
//! ```

pub mod admission;
pub mod boost;
pub mod clock;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod process;
pub mod queues;
pub mod state;
pub mod summary;

pub use admission::ArrivalAdmitter;
pub use boost::BoostController;
pub use clock::{Simulation, TickReport};
pub use config::{BoostOrder, LevelQuantum, SimulationConfig};
pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use error::{ConfigError, SchedulerError};
pub use event::{BurstRecord, EventTrace, SimEvent};
pub use process::{Process, ProcessState, UnitOutcome};
pub use queues::QueueHierarchy;
pub use state::SchedulerState;
pub use summary::{ProcessSummary, SimulationSummary};
