//! Seeded inputs shared by the benchmarks.

use rand::{SeedableRng, rngs::SmallRng};
use ranking_core::{AdjacencyMatrix, generate, sample_permutation};

use crate::{error::BenchSetupError, params::GraphBenchParams};

/// A template plus one randomly permuted copy ready for matching.
#[derive(Clone, Debug)]
pub struct MatchingInstance {
    /// The unpermuted block template.
    pub template: AdjacencyMatrix,
    /// The template reordered by one seeded rank and arrival draw.
    pub permuted: AdjacencyMatrix,
}

/// Builds a reproducible matching instance for `params`.
///
/// # Errors
/// Returns [`BenchSetupError`] when the thresholds are invalid for `n`.
pub fn matching_instance(
    params: &GraphBenchParams,
    seed: u64,
) -> Result<MatchingInstance, BenchSetupError> {
    let template = generate(params.alpha, params.beta, params.n)?;
    let mut rng = SmallRng::seed_from_u64(seed);
    let ranks = sample_permutation(params.n, &mut rng);
    let arrivals = sample_permutation(params.n, &mut rng);
    let permuted = template.permuted(&ranks, &arrivals)?;
    Ok(MatchingInstance { template, permuted })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ranking_core::Entry;
    use rstest::rstest;

    #[rstest]
    fn instances_are_reproducible() -> Result<(), BenchSetupError> {
        let params = GraphBenchParams {
            n: 64,
            alpha: 0.3,
            beta: 0.7,
        };
        let first = matching_instance(&params, 7)?;
        let second = matching_instance(&params, 7)?;
        assert_eq!(first.permuted, second.permuted);
        assert_eq!(
            first.permuted.count(Entry::Available),
            first.template.count(Entry::Available)
        );
        Ok(())
    }

    #[rstest]
    fn invalid_thresholds_surface_as_setup_errors() {
        let params = GraphBenchParams {
            n: 64,
            alpha: 0.7,
            beta: 0.3,
        };
        assert!(matches!(
            matching_instance(&params, 1),
            Err(BenchSetupError::Ranking(_))
        ));
    }
}
