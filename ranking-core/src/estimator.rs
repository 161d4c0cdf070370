//! Monte Carlo estimation of the RANKING competitive ratio.
//!
//! Builds one immutable template per `(alpha, beta, n)`, fans trials out over
//! a bounded Rayon pool, and reduces their match counts into an [`Estimate`].
//! Every trial works on its own permuted copy, so the template is only ever
//! shared by reference.

use std::{
    num::NonZeroUsize,
    sync::atomic::{AtomicUsize, Ordering},
    time::{Duration, Instant},
};

use rand::rngs::SmallRng;
use rayon::{ThreadPool, ThreadPoolBuilder, prelude::*};
use tracing::{info, instrument, warn};

use crate::{
    Result,
    builder::EstimatorBuilder,
    cancellation::Cancellation,
    error::{RankingError, TrialError},
    estimate::{Estimate, TrialTally},
    graph::{AdjacencyMatrix, generate},
    rng::trial_rng,
    trial::run_trial_cancellable,
};

/// Runs many independent RANKING trials and aggregates them.
///
/// # Examples
/// ```
/// use ranking_core::EstimatorBuilder;
///
/// let estimator = EstimatorBuilder::new()
///     .with_trials(64)
///     .with_workers(Some(2))
///     .build()
///     .expect("builder must succeed");
/// let estimate = estimator.estimate(0.3, 0.7, 60).expect("estimate must succeed");
/// assert_eq!(estimate.trials(), 64);
/// assert!(estimate.ratio() > 0.0 && estimate.ratio() <= 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct MonteCarloEstimator {
    trials: NonZeroUsize,
    workers: Option<NonZeroUsize>,
    seed: Option<u64>,
    time_budget: Option<Duration>,
}

impl MonteCarloEstimator {
    pub(crate) fn new(
        trials: NonZeroUsize,
        workers: Option<NonZeroUsize>,
        seed: Option<u64>,
        time_budget: Option<Duration>,
    ) -> Self {
        Self {
            trials,
            workers,
            seed,
            time_budget,
        }
    }

    /// Returns the number of trials run per estimate.
    #[must_use]
    pub fn trials(&self) -> NonZeroUsize {
        self.trials
    }

    /// Returns the worker-pool size, or `None` for the available parallelism.
    #[must_use]
    pub fn workers(&self) -> Option<NonZeroUsize> {
        self.workers
    }

    /// Returns the fixed base seed, if one was configured.
    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Returns the wall-clock budget applied to each estimate.
    #[must_use]
    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget
    }

    /// Estimates the normalised expected matching size for `(alpha, beta, n)`.
    ///
    /// # Errors
    /// Returns the validation errors of [`generate`], [`RankingError::Trial`]
    /// when any trial fails, and [`RankingError::TimedOut`] when the time
    /// budget elapses first. No partial mean is ever returned.
    pub fn estimate(&self, alpha: f64, beta: f64, n: usize) -> Result<Estimate> {
        self.estimate_with_cancellation(alpha, beta, n, &Cancellation::new())
    }

    /// Like [`Self::estimate`], but also stops when `cancellation` trips.
    ///
    /// # Errors
    /// Returns [`RankingError::Cancelled`] when the token is cancelled before
    /// every trial completes, plus the errors of [`Self::estimate`].
    ///
    /// # Examples
    /// ```
    /// use ranking_core::{Cancellation, EstimatorBuilder, RankingError};
    ///
    /// let estimator = EstimatorBuilder::new().build().expect("defaults are valid");
    /// let token = Cancellation::new();
    /// token.cancel();
    /// let err = estimator
    ///     .estimate_with_cancellation(0.3, 0.7, 100, &token)
    ///     .unwrap_err();
    /// assert!(matches!(err, RankingError::Cancelled { completed: 0, .. }));
    /// ```
    #[instrument(
        name = "estimator.estimate",
        err,
        skip(self, cancellation),
        fields(
            trials = self.trials.get(),
            workers = ?self.workers,
            seeded = self.seed.is_some()
        ),
    )]
    pub fn estimate_with_cancellation(
        &self,
        alpha: f64,
        beta: f64,
        n: usize,
        cancellation: &Cancellation,
    ) -> Result<Estimate> {
        let started = Instant::now();
        let template = generate(alpha, beta, n)?;
        let tally = self.run_trials(&template, cancellation, run_trial_cancellable::<SmallRng>)?;
        let estimate = Estimate::new(alpha, beta, n, tally);
        info!(
            ratio = estimate.ratio(),
            standard_error = ?estimate.standard_error(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "estimate completed"
        );
        Ok(estimate)
    }

    fn run_trials<F>(
        &self,
        template: &AdjacencyMatrix,
        cancellation: &Cancellation,
        trial_fn: F,
    ) -> Result<TrialTally>
    where
        F: Fn(&AdjacencyMatrix, &mut SmallRng, &Cancellation) -> core::result::Result<usize, TrialError>
            + Sync,
    {
        let requested = self.trials.get();
        let token = cancellation.with_budget(self.time_budget);
        let base_seed = self.seed.unwrap_or_else(rand::random);
        let completed = AtomicUsize::new(0);
        let pool = self.worker_pool()?;

        let outcome = pool.install(|| {
            (0..requested)
                .into_par_iter()
                .try_fold(TrialTally::default, |tally, trial| {
                    if token.should_stop() {
                        return Err((trial, TrialError::Cancelled));
                    }
                    let mut rng = trial_rng(base_seed, trial);
                    let count =
                        trial_fn(template, &mut rng, &token).map_err(|error| (trial, error))?;
                    completed.fetch_add(1, Ordering::Relaxed);
                    Ok(tally.record(count))
                })
                .try_reduce(TrialTally::default, |left, right| Ok(left.merge(right)))
        });

        match outcome {
            Ok(tally) if tally.trials == requested => Ok(tally),
            Ok(tally) => Err(RankingError::Cancelled {
                completed: tally.trials,
                requested,
            }),
            Err((_, TrialError::Cancelled)) => Err(self.stopped_error(
                &token,
                completed.load(Ordering::Relaxed),
                requested,
            )),
            Err((trial, error)) => {
                warn!(trial, code = %error.code(), error = %error, "trial failed");
                Err(RankingError::Trial { trial, error })
            }
        }
    }

    fn stopped_error(&self, token: &Cancellation, completed: usize, requested: usize) -> RankingError {
        match self.time_budget {
            Some(budget) if !token.is_cancelled() && token.deadline_passed() => {
                warn!(?budget, completed, requested, "time budget exhausted");
                RankingError::TimedOut { budget }
            }
            _ => RankingError::Cancelled {
                completed,
                requested,
            },
        }
    }

    fn worker_pool(&self) -> Result<ThreadPool> {
        ThreadPoolBuilder::new()
            .num_threads(self.workers.map_or(0, NonZeroUsize::get))
            .thread_name(|index| format!("ranking-trial-{index}"))
            .build()
            .map_err(|error| RankingError::WorkerPool {
                message: error.to_string(),
            })
    }
}

/// Estimates the competitive ratio of RANKING on the `(alpha, beta, n)`
/// block graph from `num_trials` trials using default settings.
///
/// # Errors
/// Returns [`RankingError::ZeroTrials`] when `num_trials` is zero, plus the
/// errors of [`MonteCarloEstimator::estimate`].
///
/// # Examples
/// ```
/// let ratio = ranking_core::estimate(0.3, 0.7, 50, 100).expect("estimate succeeds");
/// assert!(ratio > 0.0 && ratio <= 1.0);
/// ```
pub fn estimate(alpha: f64, beta: f64, n: usize, num_trials: usize) -> Result<f64> {
    EstimatorBuilder::new()
        .with_trials(num_trials)
        .build()?
        .estimate(alpha, beta, n)
        .map(|estimate| estimate.ratio())
}
