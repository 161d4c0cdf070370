//! Aggregated Monte Carlo results.

/// Running totals over completed trials.
///
/// Tallies merge associatively, so per-worker partial tallies can be reduced
/// in any order.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct TrialTally {
    pub(crate) trials: usize,
    pub(crate) matches: u64,
    pub(crate) squared_matches: u128,
}

impl TrialTally {
    pub(crate) fn record(mut self, count: usize) -> Self {
        let count = count as u64;
        self.trials += 1;
        self.matches += count;
        self.squared_matches += u128::from(count) * u128::from(count);
        self
    }

    pub(crate) fn merge(self, other: Self) -> Self {
        Self {
            trials: self.trials + other.trials,
            matches: self.matches + other.matches,
            squared_matches: self.squared_matches + other.squared_matches,
        }
    }
}

/// Normalised expected matching size for one `(alpha, beta, n)` point.
///
/// # Examples
/// ```
/// use ranking_core::EstimatorBuilder;
///
/// let estimator = EstimatorBuilder::new()
///     .with_trials(32)
///     .with_seed(Some(9))
///     .build()
///     .expect("configuration is valid");
/// let estimate = estimator.estimate(0.3, 0.7, 40).expect("estimate succeeds");
/// assert_eq!(estimate.trials(), 32);
/// assert!(estimate.ratio() > 0.0 && estimate.ratio() <= 1.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Estimate {
    alpha: f64,
    beta: f64,
    n: usize,
    tally: TrialTally,
}

impl Estimate {
    pub(crate) fn new(alpha: f64, beta: f64, n: usize, tally: TrialTally) -> Self {
        Self {
            alpha,
            beta,
            n,
            tally,
        }
    }

    /// Lower block threshold used for the template.
    #[must_use]
    #[rustfmt::skip]
    pub fn alpha(&self) -> f64 { self.alpha }

    /// Upper block threshold used for the template.
    #[must_use]
    #[rustfmt::skip]
    pub fn beta(&self) -> f64 { self.beta }

    /// Number of vertices on each side of the graph.
    #[must_use]
    #[rustfmt::skip]
    pub fn n(&self) -> usize { self.n }

    /// Number of trials aggregated into this estimate.
    #[must_use]
    #[rustfmt::skip]
    pub fn trials(&self) -> usize { self.tally.trials }

    /// Sum of match counts over every trial.
    #[must_use]
    #[rustfmt::skip]
    pub fn total_matches(&self) -> u64 { self.tally.matches }

    /// Mean match count per trial.
    #[must_use]
    pub fn mean_matches(&self) -> f64 {
        if self.tally.trials == 0 {
            return 0.0;
        }
        self.tally.matches as f64 / self.tally.trials as f64
    }

    /// Mean match count divided by `n`: the estimated competitive ratio.
    #[must_use]
    pub fn ratio(&self) -> f64 {
        if self.n == 0 {
            return 0.0;
        }
        self.mean_matches() / self.n as f64
    }

    /// Standard error of [`Self::ratio`], or `None` with fewer than two trials.
    #[must_use]
    pub fn standard_error(&self) -> Option<f64> {
        let trials = self.tally.trials;
        if trials < 2 || self.n == 0 {
            return None;
        }
        let count = trials as f64;
        let mean = self.mean_matches();
        let mean_square = self.tally.squared_matches as f64 / count;
        let variance = ((mean_square - mean * mean) * count / (count - 1.0)).max(0.0);
        Some((variance / count).sqrt() / self.n as f64)
    }
}
