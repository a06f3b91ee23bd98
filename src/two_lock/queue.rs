//! This module provides [`TwoLockQueue`].
use super::storage::{Dequeued, SpareNode, Storage, TailGuard};
use crate::lifecycle::LifecycleState;
use crate::loom_bindings::sync::{Arc, Condvar};
use crate::trace::{debug, trace};
use crate::{BlockingQueue, Capacity, Consumer, Lifecycle, PopError, Producer, PushError, Queue};
use std::fmt;
use std::time::{Duration, Instant};

/// A multi-producer, multi-consumer FIFO queue built on two locks.
///
/// Producers serialize on a tail lock and consumers on a head lock, so a
/// producer and a consumer rarely wait for each other. Consumers block in
/// [`wait_pop`](Self::wait_pop) without spinning until a value arrives or
/// the queue is [closed](Self::close).
///
/// `TwoLockQueue` is a handle: clones refer to the same queue.
///
/// # Examples
///
/// ```
/// use blockq::{Consumer, TwoLockQueue};
/// use std::thread;
///
/// let queue = TwoLockQueue::new();
/// let consumer = queue.clone();
///
/// let handle = thread::spawn(move || consumer.iter().sum::<u32>());
///
/// for i in 1..=10 {
///     queue.push(i).unwrap();
/// }
///
/// queue.close();
///
/// assert_eq!(handle.join().unwrap(), 55);
/// ```
pub struct TwoLockQueue<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    storage: Storage<T>,
    lifecycle: LifecycleState,
    capacity: Capacity,
    /// Consumers wait here holding the head lock.
    not_empty: Condvar,
    /// Producers of a full bounded queue wait here holding the tail lock.
    not_full: Condvar,
}

impl<T> TwoLockQueue<T> {
    /// Creates a new unbounded, open queue.
    pub fn new() -> Self {
        Self::from_capacity(Capacity::Unbounded)
    }

    /// Creates a new open queue holding at most `capacity` values.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[track_caller]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_capacity(Capacity::bounded(capacity))
    }

    /// Creates a new open queue with the given [`Capacity`].
    pub fn from_capacity(capacity: Capacity) -> Self {
        trace!(%capacity, "two-lock queue created");

        Self {
            inner: Arc::new(Inner {
                storage: Storage::new(),
                lifecycle: LifecycleState::new(),
                capacity,
                not_empty: Condvar::new(),
                not_full: Condvar::new(),
            }),
        }
    }

    /// Returns the [`Capacity`] of the queue.
    #[inline]
    pub fn capacity(&self) -> Capacity {
        self.inner.capacity
    }

    /// Returns the number of queued values. Advisory under concurrent use.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.storage.len()
    }

    /// Returns whether the queue is empty. Advisory under concurrent use.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.storage.peek_empty()
    }

    /// Pushes a value without blocking.
    ///
    /// # Errors
    ///
    /// Returns [`PushError::Closed`] if the queue is closed and
    /// [`PushError::Full`] if it is bounded and full.
    pub fn push(&self, value: T) -> Result<(), PushError<T>> {
        let inner = &*self.inner;
        let spare = SpareNode::new();
        let tail = inner.storage.lock_tail();

        if inner.lifecycle.is_closed() {
            drop(tail);
            trace!("push rejected, the queue is closed");

            return Err(PushError::Closed(value));
        }

        if inner.capacity.is_reached_by(inner.storage.len()) {
            drop(tail);
            trace!("push rejected, the queue is full");

            return Err(PushError::Full(value));
        }

        inner.enqueue(tail, value, spare);

        Ok(())
    }

    /// Pushes a value, waiting while a bounded queue is full.
    ///
    /// # Errors
    ///
    /// Returns [`PushError::Closed`] if the queue is closed before there is
    /// room for the value.
    pub fn wait_push(&self, value: T) -> Result<(), PushError<T>> {
        let inner = &*self.inner;
        let spare = SpareNode::new();
        let mut tail = inner.storage.lock_tail();

        loop {
            if inner.lifecycle.is_closed() {
                drop(tail);
                trace!("push rejected, the queue is closed");

                return Err(PushError::Closed(value));
            }

            if !inner.capacity.is_reached_by(inner.storage.len()) {
                break;
            }

            tail = inner.not_full.wait(tail);
        }

        inner.enqueue(tail, value, spare);

        Ok(())
    }

    /// Pops the head value if there is one. Never blocks.
    pub fn try_pop(&self) -> Option<T> {
        let inner = &*self.inner;

        inner
            .storage
            .dequeue_if_available()
            .map(|dequeued| inner.finish_pop(dequeued))
    }

    /// Pops the head value, blocking until one is available.
    ///
    /// Returns `None` once the queue is closed and drained.
    pub fn wait_pop(&self) -> Option<T> {
        let inner = &*self.inner;
        let mut head = inner.storage.lock_head();

        loop {
            if let Some(dequeued) = inner.storage.dequeue(&mut head) {
                drop(head);

                return Some(inner.finish_pop(dequeued));
            }

            if inner.lifecycle.is_closed() {
                return None;
            }

            head = inner.not_empty.wait(head);
        }
    }

    /// Pops the head value, blocking for at most `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`PopError::Closed`] if the queue is closed and drained and
    /// [`PopError::Timeout`] if `timeout` elapsed first.
    pub fn wait_pop_timeout(&self, timeout: Duration) -> Result<T, PopError> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return self.wait_pop().ok_or(PopError::Closed);
        };

        let inner = &*self.inner;
        let mut head = inner.storage.lock_head();

        loop {
            if let Some(dequeued) = inner.storage.dequeue(&mut head) {
                drop(head);

                return Ok(inner.finish_pop(dequeued));
            }

            if inner.lifecycle.is_closed() {
                return Err(PopError::Closed);
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(PopError::Timeout);
            }

            head = inner.not_empty.wait_timeout(head, deadline - now).0;
        }
    }

    /// Closes the queue. See [`Lifecycle::close`].
    pub fn close(&self) -> bool {
        let inner = &*self.inner;
        let head = inner.storage.lock_head();
        let tail = inner.storage.lock_tail();
        let closed_now = inner.lifecycle.close();

        drop(tail);
        drop(head);

        if !closed_now {
            return false;
        }

        debug!(backlog = inner.storage.len(), "two-lock queue closed");

        inner.not_empty.notify_all();
        inner.not_full.notify_all();

        true
    }

    /// Returns whether the queue has been closed.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.inner.lifecycle.is_closed()
    }
}

impl<T> Inner<T> {
    /// Links a value that passed admission, then wakes whoever it unblocks.
    fn enqueue(&self, mut tail: TailGuard<'_, T>, value: T, spare: SpareNode<T>) {
        let len = self.storage.enqueue(&mut tail, value, spare);

        drop(tail);

        if matches!(self.capacity, Capacity::Bounded(_)) && !self.capacity.is_reached_by(len) {
            // Room is left, pass it on to the next waiting producer.
            self.not_full.notify_one();
        }

        // A consumer that saw the queue empty holds the head lock until it
        // waits. Taking the head lock here orders this notification after it.
        drop(self.storage.lock_head());
        self.not_empty.notify_one();
    }

    /// Wakes a producer if this pop made room in a full queue.
    fn finish_pop(&self, dequeued: Dequeued<T>) -> T {
        if self.capacity.is_reached_by(dequeued.prev_len) {
            drop(self.storage.lock_tail());
            self.not_full.notify_one();
        }

        dequeued.value
    }
}

impl<T> Default for TwoLockQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for TwoLockQueue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> fmt::Debug for TwoLockQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwoLockQueue")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("state", &self.state())
            .finish()
    }
}

impl<T> Queue for TwoLockQueue<T> {
    #[inline]
    fn capacity(&self) -> Capacity {
        TwoLockQueue::capacity(self)
    }

    #[inline]
    fn len(&self) -> usize {
        TwoLockQueue::len(self)
    }

    #[inline]
    fn is_empty(&self) -> bool {
        TwoLockQueue::is_empty(self)
    }
}

impl<T> Producer<T> for TwoLockQueue<T> {
    #[inline]
    fn push(&self, value: T) -> Result<(), PushError<T>> {
        TwoLockQueue::push(self, value)
    }

    #[inline]
    fn wait_push(&self, value: T) -> Result<(), PushError<T>> {
        TwoLockQueue::wait_push(self, value)
    }
}

impl<T> Consumer<T> for TwoLockQueue<T> {
    #[inline]
    fn try_pop(&self) -> Option<T> {
        TwoLockQueue::try_pop(self)
    }

    #[inline]
    fn wait_pop(&self) -> Option<T> {
        TwoLockQueue::wait_pop(self)
    }

    #[inline]
    fn wait_pop_timeout(&self, timeout: Duration) -> Result<T, PopError> {
        TwoLockQueue::wait_pop_timeout(self, timeout)
    }
}

impl<T> Lifecycle for TwoLockQueue<T> {
    #[inline]
    fn close(&self) -> bool {
        TwoLockQueue::close(self)
    }

    #[inline]
    fn is_closed(&self) -> bool {
        TwoLockQueue::is_closed(self)
    }
}

impl<T: Send> BlockingQueue<T> for TwoLockQueue<T> {}
