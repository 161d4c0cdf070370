//! Benchmark setup error type.
//!
//! Lets setup code propagate core failures with `?` instead of `.expect()`.

use ranking_core::{RankingError, TrialError};

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Template generation or estimator configuration failed.
    #[error("estimator setup failed: {0}")]
    Ranking(#[from] RankingError),
    /// Building a permuted instance failed.
    #[error("trial setup failed: {0}")]
    Trial(#[from] TrialError),
}
