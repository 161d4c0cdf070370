//! Cooperative cancellation shared between an estimate and its trials.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

/// Cancellation token checked before each trial and once per arriving vertex.
///
/// Clones share the same flag, so cancelling any clone stops every holder.
/// A token may also carry a deadline after which [`Self::should_stop`]
/// reports `true` without an explicit cancel.
///
/// # Examples
/// ```
/// use ranking_core::Cancellation;
///
/// let token = Cancellation::new();
/// let observer = token.clone();
/// assert!(!observer.should_stop());
/// token.cancel();
/// assert!(observer.is_cancelled());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Cancellation {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl Cancellation {
    /// Creates a token that is neither cancelled nor time-bounded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a token sharing this flag that also stops at `deadline`.
    ///
    /// An existing earlier deadline is kept.
    #[must_use]
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        };
        Self {
            flag: Arc::clone(&self.flag),
            deadline: Some(deadline),
        }
    }

    /// Returns a token sharing this flag that stops once `budget` has elapsed
    /// from now. `None` keeps the current deadline.
    #[must_use]
    pub fn with_budget(&self, budget: Option<Duration>) -> Self {
        match budget.and_then(|budget| Instant::now().checked_add(budget)) {
            Some(deadline) => self.with_deadline(deadline),
            None => self.clone(),
        }
    }

    /// Requests cancellation for every clone of this token.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Returns `true` once [`Self::cancel`] has been called on any clone.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Returns `true` once the deadline, if any, has passed.
    #[must_use]
    pub fn deadline_passed(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Returns `true` when work should stop for either reason.
    #[must_use]
    pub fn should_stop(&self) -> bool {
        self.is_cancelled() || self.deadline_passed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    fn fresh_token_does_not_stop() {
        let token = Cancellation::new();
        assert!(!token.is_cancelled());
        assert!(!token.deadline_passed());
        assert!(!token.should_stop());
    }

    #[rstest]
    fn derived_tokens_share_the_flag() {
        let parent = Cancellation::new();
        let child = parent.with_budget(Some(Duration::from_secs(3600)));
        parent.cancel();
        assert!(child.is_cancelled());
        assert!(child.should_stop());
    }

    #[rstest]
    fn elapsed_deadline_stops_without_cancel() {
        let token = Cancellation::new().with_deadline(Instant::now());
        assert!(token.deadline_passed());
        assert!(token.should_stop());
        assert!(!token.is_cancelled());
    }

    #[rstest]
    fn earlier_deadline_wins() {
        let now = Instant::now();
        let token = Cancellation::new()
            .with_deadline(now)
            .with_budget(Some(Duration::from_secs(3600)));
        assert!(token.deadline_passed());
    }

    #[rstest]
    fn missing_budget_keeps_token_unbounded() {
        let token = Cancellation::new().with_budget(None);
        assert!(!token.deadline_passed());
    }
}
