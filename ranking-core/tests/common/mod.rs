use ranking_core::{EstimatorBuilder, MonteCarloEstimator};

/// Seeded estimator with a small fixed pool so runs are repeatable.
#[must_use]
pub fn seeded_estimator(trials: usize, seed: u64) -> MonteCarloEstimator {
    EstimatorBuilder::new()
        .with_trials(trials)
        .with_workers(Some(4))
        .with_seed(Some(seed))
        .build()
        .expect("test configuration must be valid")
}
