//! Benchmark support crate for the RANKING estimator.
//!
//! Provides parameter types and seeded fixtures for the Criterion benchmarks
//! covering template generation, greedy matching and full estimates.

pub mod error;
pub mod fixtures;
pub mod params;
