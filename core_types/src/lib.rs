//! # Core Types
//!
//! This crate defines the fundamental types shared by the scheduler simulator.
//!
//! ## Philosophy
//!
//! Core types are designed with these principles:
//! - **Explicit over implicit**: Process identity and simulated time are distinct types.
//! - **Determinism first**: Identifiers are ordered so ties always break the same way.
//! - **Plain data**: Everything here is serializable and free of behavior.
//!
//! ## Key Types
//!
//! - [`ProcessId`]: Stable identifier for a simulated process
//! - [`Tick`]: One unit of simulated time
//! - [`ProcessSpec`]: Static description of a process supplied as input

pub mod ids;
pub mod process_spec;

pub use ids::{ProcessId, Tick};
pub use process_spec::ProcessSpec;
