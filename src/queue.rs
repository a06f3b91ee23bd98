//! Provides the [`Queue`] and [`BlockingQueue`] traits.
use crate::{Capacity, Consumer, Lifecycle, Producer};

/// Queries shared by every queue handle.
pub trait Queue {
    /// Returns the [`Capacity`] the queue was built with.
    fn capacity(&self) -> Capacity;

    /// Returns the number of queued values.
    ///
    /// It is for diagnostics; under concurrent use it may be stale as soon
    /// as it returns.
    fn len(&self) -> usize;

    /// Returns whether the queue is empty. Advisory, like [`len`](Self::len).
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A cloneable handle to a multi-producer, multi-consumer queue.
///
/// Every clone refers to the same queue; the queue and any values still in
/// it are dropped with the last handle.
pub trait BlockingQueue<T>:
    Producer<T> + Consumer<T> + Lifecycle + Clone + Send + Sync
{
}
