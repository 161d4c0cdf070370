//! Error types for the RANKING estimator core.
//!
//! Defines the validation and execution errors exposed by the public API, the
//! stable machine-readable codes attached to each variant, and a convenient
//! result alias.

use std::{fmt, time::Duration};

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error raised while executing a single RANKING trial.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum TrialError {
    /// A rank or arrival permutation did not cover the template's vertices.
    #[error("permutation has length {got} but the template has {expected} vertices")]
    PermutationLength {
        /// Vertex count of the template.
        expected: usize,
        /// Length of the offending permutation.
        got: usize,
    },
    /// The matcher credited more matches than there are arriving vertices.
    #[error("matcher reported {count} matches on a graph with {n} arriving vertices")]
    MatchOverflow {
        /// Match count reported by the matcher.
        count: usize,
        /// Number of arriving vertices.
        n: usize,
    },
    /// The trial observed a cancellation request before finishing.
    #[error("trial was cancelled before completion")]
    Cancelled,
}

define_error_codes! {
    /// Stable codes describing [`TrialError`] variants.
    enum TrialErrorCode for TrialError {
        /// A permutation did not match the template size.
        PermutationLength => PermutationLength { .. } => "TRIAL_PERMUTATION_LENGTH",
        /// The matcher credited more matches than arriving vertices.
        MatchOverflow => MatchOverflow { .. } => "TRIAL_MATCH_OVERFLOW",
        /// The trial was cancelled.
        Cancelled => Cancelled => "TRIAL_CANCELLED",
    }
}

/// Error type produced when generating templates or running estimates.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RankingError {
    /// Thresholds must satisfy `0 <= alpha < beta < 1` and be finite.
    #[error("thresholds must satisfy 0 <= alpha < beta < 1 (got alpha={alpha}, beta={beta})")]
    InvalidThresholds {
        /// Lower threshold supplied by the caller.
        alpha: f64,
        /// Upper threshold supplied by the caller.
        beta: f64,
    },
    /// `n` is too small for the thresholds to produce three well-formed blocks.
    #[error(
        "n={n} is too small for alpha={alpha}, beta={beta}: block boundaries require \
         floor(alpha*n) >= 1"
    )]
    DegenerateBlocks {
        /// Requested vertex count.
        n: usize,
        /// Lower threshold supplied by the caller.
        alpha: f64,
        /// Upper threshold supplied by the caller.
        beta: f64,
    },
    /// At least one trial must be requested.
    #[error("trial count must be at least 1")]
    ZeroTrials,
    /// At least one worker must be configured.
    #[error("worker count must be at least 1")]
    ZeroWorkers,
    /// The worker pool could not be constructed.
    #[error("failed to build worker pool: {message}")]
    WorkerPool {
        /// Message reported by the thread-pool builder.
        message: String,
    },
    /// A trial failed, so the estimate cannot be trusted.
    #[error("trial {trial} failed: {error}")]
    Trial {
        /// Index of the failing trial.
        trial: usize,
        #[source]
        /// Underlying trial failure.
        error: TrialError,
    },
    /// The estimate was cancelled before every trial completed.
    #[error("estimate cancelled after {completed} of {requested} trials")]
    Cancelled {
        /// Trials that finished before cancellation was observed.
        completed: usize,
        /// Trials that were requested.
        requested: usize,
    },
    /// The configured wall-clock budget elapsed before every trial completed.
    #[error("estimate exceeded its time budget of {budget:?}")]
    TimedOut {
        /// Configured wall-clock budget.
        budget: Duration,
    },
}

define_error_codes! {
    /// Stable codes describing [`RankingError`] variants.
    enum RankingErrorCode for RankingError {
        /// Thresholds violate `0 <= alpha < beta < 1`.
        InvalidThresholds => InvalidThresholds { .. } => "RANKING_INVALID_THRESHOLDS",
        /// `n` is too small for the block structure.
        DegenerateBlocks => DegenerateBlocks { .. } => "RANKING_DEGENERATE_BLOCKS",
        /// No trials were requested.
        ZeroTrials => ZeroTrials => "RANKING_ZERO_TRIALS",
        /// No workers were configured.
        ZeroWorkers => ZeroWorkers => "RANKING_ZERO_WORKERS",
        /// The worker pool could not be constructed.
        WorkerPool => WorkerPool { .. } => "RANKING_WORKER_POOL",
        /// A trial failed.
        TrialFailure => Trial { .. } => "RANKING_TRIAL_FAILURE",
        /// The estimate was cancelled.
        Cancelled => Cancelled { .. } => "RANKING_CANCELLED",
        /// The time budget elapsed.
        TimedOut => TimedOut { .. } => "RANKING_TIMED_OUT",
    }
}

impl RankingError {
    /// Retrieve the inner [`TrialErrorCode`] when the error originated in a trial.
    pub const fn trial_code(&self) -> Option<TrialErrorCode> {
        match self {
            Self::Trial { error, .. } => Some(error.code()),
            _ => None,
        }
    }

    /// Returns `true` for errors raised while validating caller input.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidThresholds { .. }
                | Self::DegenerateBlocks { .. }
                | Self::ZeroTrials
                | Self::ZeroWorkers
        )
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, RankingError>;
