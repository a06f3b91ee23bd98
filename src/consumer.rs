//! This module provides the [`Consumer`] trait and the [`BlockingIter`].
use crate::{PopError, Queue};
use std::marker::PhantomData;
use std::time::Duration;

/// The consuming side of a queue.
pub trait Consumer<T>: Queue {
    /// Pops the head value if there is one. Never blocks, and does not care
    /// whether the queue is open or closed.
    fn try_pop(&self) -> Option<T>;

    /// Pops the head value, blocking until one is available.
    ///
    /// Returns `None` only once the queue is closed and empty. That `None` is
    /// the signal for a consumer loop to stop.
    fn wait_pop(&self) -> Option<T>;

    /// Like [`wait_pop`](Self::wait_pop), but gives up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`PopError::Closed`] if the queue is closed and empty and
    /// [`PopError::Timeout`] if `timeout` elapsed first.
    fn wait_pop_timeout(&self, timeout: Duration) -> Result<T, PopError>;

    /// Returns an iterator that calls [`wait_pop`](Self::wait_pop) until
    /// the queue is closed and drained.
    #[inline]
    fn iter(&self) -> BlockingIter<'_, T, Self>
    where
        Self: Sized,
    {
        BlockingIter {
            consumer: self,
            _marker: PhantomData,
        }
    }
}

/// A blocking iterator over the values of a queue.
/// Created by [`Consumer::iter`].
pub struct BlockingIter<'a, T, C: Consumer<T>> {
    consumer: &'a C,
    _marker: PhantomData<fn() -> T>,
}

impl<T, C: Consumer<T>> Iterator for BlockingIter<'_, T, C> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.consumer.wait_pop()
    }
}
