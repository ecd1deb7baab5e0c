//! # MLFQ Host
//!
//! Command-line host for the scheduler simulator.
//!
//! ## Philosophy
//!
//! - **Host owns I/O**: The engine never prints or reads files
//! - **Configuration is data**: A JSON file or the built-in reference workload
//! - **Deterministic output**: The same flags and file give the same bytes
//!
//! ## Responsibilities
//!
//! The host:
//! - Loads a configuration and applies command-line overrides
//! - Runs the simulation to the end
//! - Feeds the event logger and renders logs, JSON events and the summary

pub mod report;
pub mod runtime;

pub use report::{render_json_lines, render_summary};
pub use runtime::{BoostSetting, HostConfig, HostRuntime, HostRuntimeError, OutputMode, RunReport};
