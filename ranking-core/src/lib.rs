//! RANKING estimator core library.
//!
//! Estimates the competitive ratio of the RANKING algorithm for online
//! bipartite matching on block-structured graphs parameterised by
//! `(alpha, beta, n)`:
//!
//! - [`generate`] builds the immutable block template.
//! - [`sample_permutation`] draws random ranks and arrival orders.
//! - [`greedy_match`] applies the RANKING rule to a permuted copy.
//! - [`run_trial`] composes one randomised trial.
//! - [`MonteCarloEstimator`] runs many trials in parallel and averages them.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod cancellation;
mod error;
mod estimate;
mod estimator;
mod graph;
mod greedy;
mod permutation;
mod rng;
mod trial;

#[cfg(test)]
mod test_utils;

pub use crate::{
    builder::{DEFAULT_TRIALS, EstimatorBuilder},
    cancellation::Cancellation,
    error::{RankingError, RankingErrorCode, Result, TrialError, TrialErrorCode},
    estimate::Estimate,
    estimator::{MonteCarloEstimator, estimate},
    graph::{AdjacencyMatrix, BlockStructure, Entry, generate, generate_from_blocks},
    greedy::{greedy_match, greedy_match_cancellable, matched_pairs},
    permutation::{Permutation, sample_permutation},
    trial::{run_trial, run_trial_cancellable, run_trial_with},
};
