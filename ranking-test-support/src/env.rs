//! Scoped environment-variable overrides.
//!
//! The process environment is global, so every override must hold the lock
//! returned by [`lock`] for as long as its [`EnvVarGuard`] lives.

use std::{
    env,
    sync::{Mutex, MutexGuard, PoisonError},
};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Acquires the process-wide environment lock.
///
/// A poisoned lock is recovered because the guarded data is `()`.
#[must_use]
pub fn lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Restores a variable to its previous value when dropped.
///
/// # Examples
/// ```
/// use ranking_test_support::env::{EnvVarGuard, lock};
///
/// let _lock = lock();
/// {
///     let _guard = EnvVarGuard::set("RANKING_DOCTEST_VAR", "1");
///     assert_eq!(std::env::var("RANKING_DOCTEST_VAR").as_deref(), Ok("1"));
/// }
/// assert!(std::env::var("RANKING_DOCTEST_VAR").is_err());
/// ```
#[derive(Debug)]
pub struct EnvVarGuard {
    key: &'static str,
    original: Option<String>,
}

impl EnvVarGuard {
    /// Sets `key` to `value` until the guard is dropped.
    #[must_use]
    pub fn set(key: &'static str, value: &str) -> Self {
        let original = env::var(key).ok();
        // SAFETY: callers hold the lock returned by `lock`.
        unsafe { env::set_var(key, value) };
        Self { key, original }
    }

    /// Removes `key` until the guard is dropped.
    #[must_use]
    pub fn unset(key: &'static str) -> Self {
        let original = env::var(key).ok();
        // SAFETY: callers hold the lock returned by `lock`.
        unsafe { env::remove_var(key) };
        Self { key, original }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        match &self.original {
            // SAFETY: callers hold the lock returned by `lock`.
            Some(value) => unsafe { env::set_var(self.key, value) },
            // SAFETY: callers hold the lock returned by `lock`.
            None => unsafe { env::remove_var(self.key) },
        }
    }
}
