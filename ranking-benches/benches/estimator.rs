//! End-to-end Monte Carlo estimate benchmarks.
//!
//! Compares a single worker with a small pool on the same seeded workload so
//! parallel scaling of the trial fan-out is visible.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]
#![expect(
    clippy::shadow_reuse,
    reason = "Criterion bench_with_input closures rebind parameter names"
)]
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use ranking_benches::{
    error::BenchSetupError,
    params::{EstimatorBenchParams, GraphBenchParams},
};
use ranking_core::EstimatorBuilder;

const SEED: u64 = 7;

const TRIALS: usize = 64;

const WORKERS: &[usize] = &[1, 4];

fn estimate_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let mut group = c.benchmark_group("estimate");
    group.sample_size(10);

    for &workers in WORKERS {
        let params = EstimatorBenchParams {
            graph: GraphBenchParams {
                n: 500,
                alpha: 0.3,
                beta: 0.7,
            },
            trials: TRIALS,
            workers,
        };
        let estimator = EstimatorBuilder::new()
            .with_trials(params.trials)
            .with_workers(Some(params.workers))
            .with_seed(Some(SEED))
            .build()?;
        group.bench_with_input(BenchmarkId::from_parameter(params), &params, |b, params| {
            b.iter(|| estimator.estimate(params.graph.alpha, params.graph.beta, params.graph.n));
        });
    }

    group.finish();
    Ok(())
}

fn estimate(c: &mut Criterion) {
    if let Err(err) = estimate_impl(c) {
        panic!("estimate benchmark setup failed: {err}");
    }
}

criterion_group!(benches, estimate);
criterion_main!(benches);
