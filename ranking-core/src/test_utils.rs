//! Shared test utilities for `ranking-core`.

use proptest::test_runner::Config as ProptestConfig;
use ranking_test_support::proptest_profile::ProptestRunProfile;

/// Builds the proptest configuration for a suite, honouring the
/// `PROGTEST_CASES` and `RANKING_PBT_FORK` overrides.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    ProptestRunProfile::load(default_cases, false).config()
}
