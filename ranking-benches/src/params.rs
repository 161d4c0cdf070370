//! Benchmark parameter types.
//!
//! Each type renders a compact label used as the Criterion benchmark id.

use std::fmt;

/// Graph shape for generation and matching benchmarks.
#[derive(Clone, Copy, Debug)]
pub struct GraphBenchParams {
    /// Vertices on each side of the graph.
    pub n: usize,
    /// Lower block threshold.
    pub alpha: f64,
    /// Upper block threshold.
    pub beta: f64,
}

impl fmt::Display for GraphBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},a={},b={}", self.n, self.alpha, self.beta)
    }
}

/// Configuration for a full Monte Carlo estimate benchmark.
#[derive(Clone, Copy, Debug)]
pub struct EstimatorBenchParams {
    /// Graph shape.
    pub graph: GraphBenchParams,
    /// Trials per estimate.
    pub trials: usize,
    /// Worker threads.
    pub workers: usize,
}

impl fmt::Display for EstimatorBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},trials={},workers={}",
            self.graph, self.trials, self.workers
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn labels_are_compact() {
        let graph = GraphBenchParams {
            n: 500,
            alpha: 0.3,
            beta: 0.7,
        };
        assert_eq!(graph.to_string(), "n=500,a=0.3,b=0.7");
        let estimate = EstimatorBenchParams {
            graph,
            trials: 64,
            workers: 4,
        };
        assert_eq!(estimate.to_string(), "n=500,a=0.3,b=0.7,trials=64,workers=4");
    }
}
