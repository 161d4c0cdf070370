//! Builder utilities for configuring Monte Carlo estimation.
//!
//! Exposes the trial count, worker-pool size, seed and time budget, and
//! validates them before constructing [`MonteCarloEstimator`] instances.

use std::{num::NonZeroUsize, time::Duration};

use crate::{Result, error::RankingError, estimator::MonteCarloEstimator};

/// Default number of trials per estimate.
pub const DEFAULT_TRIALS: usize = 1_000;

/// Configures and constructs [`MonteCarloEstimator`] instances.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use ranking_core::EstimatorBuilder;
///
/// let estimator = EstimatorBuilder::new()
///     .with_trials(500)
///     .with_workers(Some(4))
///     .with_time_budget(Some(Duration::from_secs(60)))
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(estimator.trials().get(), 500);
/// assert_eq!(estimator.workers().map(|w| w.get()), Some(4));
/// ```
#[derive(Debug, Clone)]
pub struct EstimatorBuilder {
    trials: usize,
    workers: Option<usize>,
    seed: Option<u64>,
    time_budget: Option<Duration>,
}

impl Default for EstimatorBuilder {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            workers: None,
            seed: None,
            time_budget: None,
        }
    }
}

impl EstimatorBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use ranking_core::{DEFAULT_TRIALS, EstimatorBuilder};
    ///
    /// let builder = EstimatorBuilder::new();
    /// assert_eq!(builder.trials(), DEFAULT_TRIALS);
    /// assert_eq!(builder.workers(), None);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the number of trials per estimate.
    #[must_use]
    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    /// Returns the configured number of trials.
    #[must_use]
    pub fn trials(&self) -> usize {
        self.trials
    }

    /// Sets the worker-pool size; `None` uses the available parallelism.
    #[must_use]
    pub fn with_workers(mut self, workers: Option<usize>) -> Self {
        self.workers = workers;
        self
    }

    /// Returns the configured worker-pool size.
    #[must_use]
    pub fn workers(&self) -> Option<usize> {
        self.workers
    }

    /// Sets the base seed for trial RNG streams; `None` draws one per estimate.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Returns the configured base seed.
    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Bounds the wall-clock time of each estimate.
    #[must_use]
    pub fn with_time_budget(mut self, budget: Option<Duration>) -> Self {
        self.time_budget = budget;
        self
    }

    /// Returns the configured time budget.
    #[must_use]
    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget
    }

    /// Validates the configuration and constructs a [`MonteCarloEstimator`].
    ///
    /// # Errors
    /// Returns [`RankingError::ZeroTrials`] when no trials are requested and
    /// [`RankingError::ZeroWorkers`] when an explicit worker count of zero is
    /// given.
    ///
    /// # Examples
    /// ```
    /// use ranking_core::{EstimatorBuilder, RankingError};
    ///
    /// let err = EstimatorBuilder::new().with_trials(0).build().unwrap_err();
    /// assert_eq!(err, RankingError::ZeroTrials);
    /// ```
    pub fn build(self) -> Result<MonteCarloEstimator> {
        let trials = NonZeroUsize::new(self.trials).ok_or(RankingError::ZeroTrials)?;
        let workers = match self.workers {
            Some(count) => Some(NonZeroUsize::new(count).ok_or(RankingError::ZeroWorkers)?),
            None => None,
        };

        Ok(MonteCarloEstimator::new(
            trials,
            workers,
            self.seed,
            self.time_budget,
        ))
    }
}
