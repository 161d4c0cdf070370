//! Command implementations and argument parsing for the `ranking` binary.

use std::{
    io::{self, Write},
    path::PathBuf,
    time::Duration,
};

use clap::{Args, Parser, Subcommand};
use ranking_core::{DEFAULT_TRIALS, Estimate, EstimatorBuilder, RankingError};
use thiserror::Error;
use tracing::{Span, field, info, instrument, warn};

use crate::store::{CsvResultSink, ResultRow, ResultSink, StoreError};

const DEFAULT_ESTIMATE_N: usize = 1_000;
/// Vertex count used by `sweep` when `-n` is omitted.
pub const DEFAULT_SWEEP_N: usize = 10_000;
/// Trial count used by `sweep` when `--trials` is omitted.
pub const DEFAULT_SWEEP_TRIALS: usize = 2_500;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "ranking",
    about = "Estimate the competitive ratio of RANKING on block-structured graphs."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run one Monte Carlo estimate and print a summary.
    Estimate(EstimateCommand),
    /// Estimate every (alpha, beta) pair of a grid and append the results to a CSV file.
    Sweep(SweepCommand),
}

/// Options accepted by the `estimate` command.
#[derive(Debug, Args, Clone)]
pub struct EstimateCommand {
    /// Lower threshold; the first block ends at floor(alpha * n) - 1.
    #[arg(long, allow_negative_numbers = true)]
    pub alpha: f64,

    /// Upper threshold; the middle block ends at floor(beta * n) - 1.
    #[arg(long, allow_negative_numbers = true)]
    pub beta: f64,

    /// Vertices on each side of the graph.
    #[arg(short = 'n', long = "n", default_value_t = DEFAULT_ESTIMATE_N)]
    pub n: usize,

    /// Number of independent trials.
    #[arg(long, default_value_t = DEFAULT_TRIALS)]
    pub trials: usize,

    /// Worker threads (defaults to the available parallelism).
    #[arg(long)]
    pub workers: Option<usize>,

    /// Base seed for reproducible runs.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Abort the estimate after this many seconds.
    #[arg(long = "time-budget-secs", value_parser = parse_budget)]
    pub time_budget: Option<Duration>,
}

/// Options accepted by the `sweep` command.
#[derive(Debug, Args, Clone)]
pub struct SweepCommand {
    /// CSV file receiving one row per estimate; created when missing.
    #[arg(long)]
    pub output: PathBuf,

    /// Comma-separated alphas (defaults to 0.25..=0.35 in steps of 0.01).
    #[arg(long, value_delimiter = ',', default_values_t = default_alphas())]
    pub alphas: Vec<f64>,

    /// Comma-separated betas (defaults to 0.65..=0.75 in steps of 0.01).
    #[arg(long, value_delimiter = ',', default_values_t = default_betas())]
    pub betas: Vec<f64>,

    /// Vertices on each side of the graph.
    #[arg(short = 'n', long = "n", default_value_t = DEFAULT_SWEEP_N)]
    pub n: usize,

    /// Trials per (alpha, beta) pair.
    #[arg(long, default_value_t = DEFAULT_SWEEP_TRIALS)]
    pub trials: usize,

    /// Worker threads (defaults to the available parallelism).
    #[arg(long)]
    pub workers: Option<usize>,

    /// Base seed shared by every pair.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Abort each pair's estimate after this many seconds.
    #[arg(long = "time-budget-secs", value_parser = parse_budget)]
    pub time_budget: Option<Duration>,

    /// Log and skip pairs with invalid thresholds instead of aborting.
    #[arg(long)]
    pub skip_invalid: bool,
}

/// Default sweep alphas: 0.25, 0.26, ..., 0.35.
#[must_use]
pub fn default_alphas() -> Vec<f64> {
    hundredths(25..=35)
}

/// Default sweep betas: 0.65, 0.66, ..., 0.75.
#[must_use]
pub fn default_betas() -> Vec<f64> {
    hundredths(65..=75)
}

fn hundredths(range: std::ops::RangeInclusive<u32>) -> Vec<f64> {
    range.map(|step| f64::from(step) / 100.0).collect()
}

fn parse_budget(raw: &str) -> Result<Duration, String> {
    let seconds: f64 = raw
        .trim()
        .parse()
        .map_err(|error| format!("invalid number of seconds: {error}"))?;
    Duration::try_from_secs_f64(seconds).map_err(|error| format!("invalid time budget: {error}"))
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Estimation failed or was misconfigured.
    #[error(transparent)]
    Core(#[from] RankingError),
    /// The results store could not be written.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The sweep grid had no alphas or no betas.
    #[error("sweep grid is empty: supply at least one alpha and one beta")]
    EmptyGrid,
}

impl CliError {
    /// Stable machine-readable code for logging.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Core(error) => error.code().as_str(),
            Self::Store(_) => "CLI_STORE",
            Self::EmptyGrid => "CLI_EMPTY_GRID",
        }
    }
}

/// Outcome of one sweep.
#[derive(Debug, Clone)]
pub struct SweepSummary {
    /// CSV file the rows were appended to.
    pub output: PathBuf,
    /// Whether this sweep created the header row.
    pub header_written: bool,
    /// Estimates appended to the store, in grid order.
    pub written: Vec<Estimate>,
    /// `(alpha, beta)` pairs skipped because they failed validation.
    pub skipped: Vec<(f64, f64)>,
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub enum ExecutionSummary {
    /// Result of the `estimate` command.
    Estimate(Estimate),
    /// Result of the `sweep` command.
    Sweep(SweepSummary),
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when configuration, estimation or persistence fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use ranking_cli::cli::{Cli, Command, EstimateCommand, ExecutionSummary, run_cli};
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let cli = Cli {
///     command: Command::Estimate(EstimateCommand {
///         alpha: 0.3,
///         beta: 0.7,
///         n: 40,
///         trials: 20,
///         workers: Some(2),
///         seed: Some(1),
///         time_budget: None,
///     }),
/// };
/// let ExecutionSummary::Estimate(estimate) = run_cli(cli)? else {
///     unreachable!("estimate command yields an estimate");
/// };
/// assert_eq!(estimate.trials(), 20);
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    let span = Span::current();
    match cli.command {
        Command::Estimate(command) => {
            span.record("command", "estimate");
            run_estimate(&command).map(ExecutionSummary::Estimate)
        }
        Command::Sweep(command) => {
            span.record("command", "sweep");
            let mut sink = CsvResultSink::open(&command.output)?;
            run_sweep(&command, &mut sink).map(ExecutionSummary::Sweep)
        }
    }
}

#[instrument(
    name = "cli.estimate",
    err,
    skip(command),
    fields(alpha = command.alpha, beta = command.beta, n = command.n),
)]
pub(super) fn run_estimate(command: &EstimateCommand) -> Result<Estimate, CliError> {
    let estimate = EstimatorBuilder::new()
        .with_trials(command.trials)
        .with_workers(command.workers)
        .with_seed(command.seed)
        .with_time_budget(command.time_budget)
        .build()?
        .estimate(command.alpha, command.beta, command.n)?;
    Ok(estimate)
}

/// Runs every pair of `command`'s grid and appends each estimate to `sink`.
///
/// Pairs are visited alpha-major. Rows already appended stay in the sink
/// when a later pair fails.
///
/// # Errors
/// Returns [`CliError::EmptyGrid`] for an empty grid, [`CliError::Store`]
/// when the sink fails, and [`CliError::Core`] for estimator failures other
/// than skipped validation errors.
#[instrument(
    name = "cli.sweep",
    err,
    skip(command, sink),
    fields(
        output = %command.output.display(),
        pairs = command.alphas.len() * command.betas.len(),
        n = command.n,
        trials = command.trials,
    ),
)]
pub fn run_sweep(
    command: &SweepCommand,
    sink: &mut impl ResultSink,
) -> Result<SweepSummary, CliError> {
    if command.alphas.is_empty() || command.betas.is_empty() {
        return Err(CliError::EmptyGrid);
    }
    let estimator = EstimatorBuilder::new()
        .with_trials(command.trials)
        .with_workers(command.workers)
        .with_seed(command.seed)
        .with_time_budget(command.time_budget)
        .build()?;
    let header_written = sink.ensure_header()?;

    let mut written = Vec::new();
    let mut skipped = Vec::new();
    for &alpha in &command.alphas {
        for &beta in &command.betas {
            match estimator.estimate(alpha, beta, command.n) {
                Ok(estimate) => {
                    sink.append(&ResultRow::from(&estimate))?;
                    info!(alpha, beta, ratio = estimate.ratio(), "pair recorded");
                    written.push(estimate);
                }
                Err(error) if command.skip_invalid && error.is_validation() => {
                    warn!(alpha, beta, code = %error.code(), error = %error, "skipping pair");
                    skipped.push((alpha, beta));
                }
                Err(error) => return Err(error.into()),
            }
        }
    }

    info!(
        written = written.len(),
        skipped = skipped.len(),
        "sweep completed"
    );
    Ok(SweepSummary {
        output: command.output.clone(),
        header_written,
        written,
        skipped,
    })
}

/// Renders `summary` to `writer` in a human-readable text format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    match summary {
        ExecutionSummary::Estimate(estimate) => {
            writeln!(writer, "alpha: {}", estimate.alpha())?;
            writeln!(writer, "beta: {}", estimate.beta())?;
            writeln!(writer, "n: {}", estimate.n())?;
            writeln!(writer, "trials: {}", estimate.trials())?;
            writeln!(writer, "mean matches: {:.3}", estimate.mean_matches())?;
            writeln!(writer, "ratio: {:.6}", estimate.ratio())?;
            match estimate.standard_error() {
                Some(error) => writeln!(writer, "standard error: {error:.6}")?,
                None => writeln!(writer, "standard error: n/a")?,
            }
        }
        ExecutionSummary::Sweep(sweep) => {
            writeln!(writer, "output: {}", sweep.output.display())?;
            writeln!(writer, "rows written: {}", sweep.written.len())?;
            writeln!(writer, "pairs skipped: {}", sweep.skipped.len())?;
            for estimate in &sweep.written {
                writeln!(
                    writer,
                    "{}\t{}\t{:.6}",
                    estimate.alpha(),
                    estimate.beta(),
                    estimate.ratio()
                )?;
            }
        }
    }
    Ok(())
}
