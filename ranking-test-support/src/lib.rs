//! Shared test utilities used across the ranking crates.
//!
//! - [`env`] serialises environment-variable overrides between tests.
//! - [`proptest_profile`] turns `PROGTEST_CASES` and `RANKING_PBT_FORK` into
//!   a proptest configuration.
//! - [`tracing`] captures spans and events for instrumentation assertions.

pub mod env;
pub mod proptest_profile;
pub mod tracing;
