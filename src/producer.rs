//! Provides the [`Producer`] trait.
use crate::{PushError, Queue};

/// The producing side of a queue.
///
/// Producers never block in [`push`](Self::push). Only
/// [`wait_push`](Self::wait_push) waits, and only on a full bounded queue.
pub trait Producer<T>: Queue {
    /// Pushes a value without blocking.
    ///
    /// # Errors
    ///
    /// Returns [`PushError::Closed`] if the queue is closed and
    /// [`PushError::Full`] if it is bounded and full. The value is handed back
    /// in both cases and is never observed by a consumer.
    fn push(&self, value: T) -> Result<(), PushError<T>>;

    /// Pushes a value, waiting while a bounded queue is full.
    ///
    /// On an unbounded queue it is the same as [`push`](Self::push).
    ///
    /// # Errors
    ///
    /// Returns [`PushError::Closed`] if the queue is closed before the value
    /// could be pushed. It never returns [`PushError::Full`].
    fn wait_push(&self, value: T) -> Result<(), PushError<T>>;
}
