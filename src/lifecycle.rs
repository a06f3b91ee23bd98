//! This module provides the [`Lifecycle`] trait and the [`LifecycleState`]
//! that every queue uses to track whether it is still open.
use crate::loom_bindings::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering::{Acquire, Relaxed, Release};

/// The two states of a queue. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// Producers may push.
    Open,
    /// No more values will ever be accepted. Queued values can still be popped.
    Closed,
}

/// The open/closed side of a queue.
pub trait Lifecycle {
    /// Closes the queue and wakes every blocked caller.
    ///
    /// Values already queued stay available to consumers. Returns `true` if
    /// this call closed the queue and `false` if it was already closed.
    fn close(&self) -> bool;

    /// Returns whether the queue has been closed.
    ///
    /// The answer may be stale by the time it is used, except that once it
    /// is `true` it stays `true`.
    fn is_closed(&self) -> bool;

    /// Returns the current [`State`].
    #[inline]
    fn state(&self) -> State {
        if self.is_closed() {
            State::Closed
        } else {
            State::Open
        }
    }
}

/// The closed flag owned by a queue.
///
/// Queues only call [`close`](Self::close) while holding every lock that
/// guards a wait predicate, and only read it with [`is_closed`](Self::is_closed)
/// under such a lock when they decide whether to wait. Unlocked reads are
/// advisory.
#[derive(Debug)]
pub(crate) struct LifecycleState {
    closed: AtomicBool,
}

impl LifecycleState {
    pub(crate) fn new() -> Self {
        Self {
            closed: AtomicBool::new(false),
        }
    }

    /// Moves to [`State::Closed`]. Returns `false` if already closed.
    #[inline]
    pub(crate) fn close(&self) -> bool {
        // Writers are serialized by the caller's locks.
        if self.closed.load(Relaxed) {
            return false;
        }

        self.closed.store(true, Release);

        true
    }

    #[inline]
    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Acquire)
    }
}
