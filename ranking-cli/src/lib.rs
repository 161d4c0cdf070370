//! Support library for the `ranking` binary.
//!
//! Exposes the command pipeline, the results store and logging setup so tests
//! can drive them without spawning a subprocess.

pub mod cli;
pub mod logging;
pub mod store;
