//! A single randomised RANKING trial.
//!
//! A trial draws random ranks for the fixed vertices and a random arrival
//! order for the online vertices, applies both to a private copy of the
//! template, and runs the greedy rule on that copy.

use rand::Rng;

use crate::{
    cancellation::Cancellation,
    error::TrialError,
    graph::AdjacencyMatrix,
    greedy::greedy_match_cancellable,
    permutation::{Permutation, sample_permutation},
};

/// Runs one trial against `template` using randomness from `rng`.
///
/// # Errors
/// Propagates the errors of [`run_trial_cancellable`]; with a live token the
/// only failures are internal invariant violations.
///
/// # Examples
/// ```
/// use rand::{SeedableRng, rngs::SmallRng};
/// use ranking_core::{generate, run_trial};
///
/// let template = generate(0.3, 0.7, 50).expect("thresholds are valid");
/// let mut rng = SmallRng::seed_from_u64(1);
/// let matches = run_trial(&template, &mut rng).expect("trial succeeds");
/// assert!(matches > 0 && matches <= 50);
/// ```
pub fn run_trial<R: Rng + ?Sized>(
    template: &AdjacencyMatrix,
    rng: &mut R,
) -> Result<usize, TrialError> {
    run_trial_cancellable(template, rng, &Cancellation::new())
}

/// Runs one trial, stopping early when `cancellation` asks to.
///
/// The rank permutation is drawn before the arrival permutation.
///
/// # Errors
/// Returns [`TrialError::Cancelled`] when the token trips mid-trial and
/// [`TrialError::MatchOverflow`] if the matcher credits more than `n` matches.
pub fn run_trial_cancellable<R: Rng + ?Sized>(
    template: &AdjacencyMatrix,
    rng: &mut R,
    cancellation: &Cancellation,
) -> Result<usize, TrialError> {
    let n = template.n();
    let ranks = sample_permutation(n, rng);
    let arrivals = sample_permutation(n, rng);
    run_trial_with(template, &ranks, &arrivals, cancellation)
}

/// Runs one trial with caller-chosen permutations.
///
/// # Errors
/// Returns [`TrialError::PermutationLength`] when a permutation does not
/// match the template size, plus the errors of [`run_trial_cancellable`].
///
/// # Examples
/// ```
/// use ranking_core::{Cancellation, Permutation, generate, run_trial_with};
///
/// let template = generate(0.5, 0.75, 4).expect("thresholds are valid");
/// let identity = Permutation::identity(4);
/// let matches = run_trial_with(&template, &identity, &identity, &Cancellation::new())
///     .expect("trial succeeds");
/// assert_eq!(matches, 4);
/// ```
pub fn run_trial_with(
    template: &AdjacencyMatrix,
    ranks: &Permutation,
    arrivals: &Permutation,
    cancellation: &Cancellation,
) -> Result<usize, TrialError> {
    let mut matrix = template.permuted(ranks, arrivals)?;
    let count = greedy_match_cancellable(&mut matrix, cancellation)?;
    if count > template.n() {
        return Err(TrialError::MatchOverflow {
            count,
            n: template.n(),
        });
    }
    Ok(count)
}
