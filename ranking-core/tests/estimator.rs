mod common;

use std::time::Duration;

use common::seeded_estimator;
use ranking_core::{
    Cancellation, DEFAULT_TRIALS, EstimatorBuilder, RankingError, RankingErrorCode, estimate,
};
use ranking_test_support::tracing::RecordingLayer;
use rstest::rstest;
use tracing::Level;

#[rstest]
#[case::narrow_middle(0.3, 0.7, 40)]
#[case::wide_middle(0.1, 0.9, 50)]
#[case::late_thresholds(0.5, 0.75, 16)]
#[case::four_vertices(0.5, 0.75, 4)]
#[case::three_vertices(0.34, 0.67, 3)]
fn ratio_lies_in_unit_interval(#[case] alpha: f64, #[case] beta: f64, #[case] n: usize) {
    let estimate = seeded_estimator(200, 9)
        .estimate(alpha, beta, n)
        .expect("estimate must succeed");
    assert!(estimate.ratio() > 0.0, "ratio {}", estimate.ratio());
    assert!(estimate.ratio() <= 1.0, "ratio {}", estimate.ratio());
    assert_eq!(estimate.trials(), 200);
    assert_eq!(estimate.n(), n);
    assert!((estimate.mean_matches() - estimate.ratio() * n as f64).abs() < 1e-9);
}

#[rstest]
fn independent_estimates_agree() {
    let first = seeded_estimator(2_000, 1)
        .estimate(0.3, 0.7, 200)
        .expect("estimate must succeed");
    let second = seeded_estimator(2_000, 2)
        .estimate(0.3, 0.7, 200)
        .expect("estimate must succeed");
    let gap = (first.ratio() - second.ratio()).abs();
    assert!(gap < 0.02, "ratios {} and {} differ by {gap}", first.ratio(), second.ratio());
    let error = first.standard_error().expect("many trials give an error bar");
    assert!(error < 0.01, "standard error {error}");
}

#[rstest]
fn free_function_matches_builder_defaults() {
    let ratio = estimate(0.3, 0.7, 30, 50).expect("estimate must succeed");
    assert!(ratio > 0.0 && ratio <= 1.0);
}

#[rstest]
#[case::inverted(0.7, 0.3, 100, RankingErrorCode::InvalidThresholds)]
#[case::equal(0.5, 0.5, 100, RankingErrorCode::InvalidThresholds)]
#[case::beta_one(0.2, 1.0, 100, RankingErrorCode::InvalidThresholds)]
#[case::negative(-0.1, 0.5, 100, RankingErrorCode::InvalidThresholds)]
#[case::nan(f64::NAN, 0.5, 100, RankingErrorCode::InvalidThresholds)]
#[case::alpha_zero(0.0, 0.5, 100, RankingErrorCode::DegenerateBlocks)]
#[case::tiny_n(0.3, 0.7, 2, RankingErrorCode::DegenerateBlocks)]
#[case::empty(0.3, 0.7, 0, RankingErrorCode::DegenerateBlocks)]
fn invalid_inputs_are_rejected(
    #[case] alpha: f64,
    #[case] beta: f64,
    #[case] n: usize,
    #[case] expected: RankingErrorCode,
) {
    let err = seeded_estimator(10, 0)
        .estimate(alpha, beta, n)
        .expect_err("invalid input must fail");
    assert_eq!(err.code(), expected);
    assert!(err.is_validation());
}

#[rstest]
fn builder_defaults() {
    let builder = EstimatorBuilder::default();
    assert_eq!(builder.trials(), DEFAULT_TRIALS);
    assert_eq!(builder.workers(), None);
    assert_eq!(builder.seed(), None);
    assert_eq!(builder.time_budget(), None);

    let estimator = builder.build().expect("defaults are valid");
    assert_eq!(estimator.trials().get(), DEFAULT_TRIALS);
    assert_eq!(estimator.workers(), None);
}

#[rstest]
#[case::zero_trials(EstimatorBuilder::new().with_trials(0), RankingError::ZeroTrials)]
#[case::zero_workers(EstimatorBuilder::new().with_workers(Some(0)), RankingError::ZeroWorkers)]
fn builder_rejects_empty_configuration(
    #[case] builder: EstimatorBuilder,
    #[case] expected: RankingError,
) {
    assert_eq!(builder.build().expect_err("build must fail"), expected);
}

#[rstest]
fn pre_cancelled_token_runs_no_trials() {
    let token = Cancellation::new();
    token.cancel();
    let err = seeded_estimator(100, 3)
        .estimate_with_cancellation(0.3, 0.7, 50, &token)
        .expect_err("cancelled estimate must fail");
    assert_eq!(
        err,
        RankingError::Cancelled {
            completed: 0,
            requested: 100
        }
    );
}

#[rstest]
fn generous_budget_does_not_interfere() {
    let estimate = EstimatorBuilder::new()
        .with_trials(50)
        .with_seed(Some(5))
        .with_time_budget(Some(Duration::from_secs(600)))
        .build()
        .expect("configuration is valid")
        .estimate(0.3, 0.7, 30)
        .expect("estimate must finish within budget");
    assert_eq!(estimate.trials(), 50);
}

#[rstest]
fn estimate_emits_span_and_summary_event() {
    let (result, layer) =
        RecordingLayer::capture(|| seeded_estimator(64, 11).estimate(0.3, 0.7, 30));
    let estimate = result.expect("estimate must succeed");

    let span = layer
        .span_named("estimator.estimate")
        .expect("estimate span must be recorded");
    assert_eq!(span.field("trials"), Some("64"));
    assert_eq!(span.field("seeded"), Some("true"));
    assert_eq!(span.field("workers"), Some("Some(4)"));
    assert_eq!(span.field("n"), Some("30"));

    let event = layer
        .event_with_message("estimate completed")
        .expect("summary event must be recorded");
    assert_eq!(event.level, Level::INFO);
    assert_eq!(event.field("ratio"), Some(estimate.ratio().to_string().as_str()));
    assert!(event.field("elapsed_ms").is_some());
}

#[rstest]
fn failed_estimate_records_the_error_on_its_span() {
    let (result, layer) =
        RecordingLayer::capture(|| seeded_estimator(8, 11).estimate(0.9, 0.1, 30));
    let err = result.expect_err("inverted thresholds must fail");
    let errors = layer.events_at(Level::ERROR);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field("error"), Some(err.to_string().as_str()));
    assert!(layer.event_with_message("estimate completed").is_none());
}
