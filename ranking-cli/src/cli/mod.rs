//! Command-line interface for the RANKING estimator.
//!
//! `estimate` runs a single Monte Carlo estimate; `sweep` walks a grid of
//! thresholds and appends one row per pair to a CSV results store.

mod commands;

pub use commands::{
    Cli, CliError, Command, DEFAULT_SWEEP_N, DEFAULT_SWEEP_TRIALS, EstimateCommand,
    ExecutionSummary, SweepCommand, SweepSummary, default_alphas, default_betas, render_summary,
    run_cli, run_sweep,
};
