use std::sync::{self, MutexGuard, PoisonError};
use std::time::Duration;

/// Adapter for `std::Condvar` that removes the poisoning aspects
/// from its API, matching [`Mutex`](super::mutex::Mutex).
#[derive(Debug)]
pub(crate) struct Condvar(sync::Condvar);

impl Condvar {
    #[inline]
    pub(crate) fn new() -> Self {
        Self(sync::Condvar::new())
    }

    /// Blocks until notified. Spurious wakeups are possible, so callers
    /// re-check their predicate.
    #[inline]
    pub(crate) fn wait<'a, T>(&self, guard: MutexGuard<'a, T>) -> MutexGuard<'a, T> {
        self.0.wait(guard).unwrap_or_else(PoisonError::into_inner)
    }

    /// Blocks until notified or until `dur` elapses.
    /// The returned flag is `true` if the wait timed out.
    #[inline]
    pub(crate) fn wait_timeout<'a, T>(
        &self,
        guard: MutexGuard<'a, T>,
        dur: Duration,
    ) -> (MutexGuard<'a, T>, bool) {
        let (guard, result) = self
            .0
            .wait_timeout(guard, dur)
            .unwrap_or_else(PoisonError::into_inner);

        (guard, result.timed_out())
    }

    #[inline]
    pub(crate) fn notify_one(&self) {
        self.0.notify_one();
    }

    #[inline]
    pub(crate) fn notify_all(&self) {
        self.0.notify_all();
    }
}
