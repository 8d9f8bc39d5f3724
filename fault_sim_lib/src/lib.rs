//! # Fault Simulation Library
//!
//! Shared types and utilities for the lander fault injection tooling.
//! This library is used by all nodes in the dora-rs dataflow that read or
//! produce fault-injected telemetry.

pub mod types;
pub mod utils;

// Re-export everything for convenience
pub use types::*;
pub use utils::*;
