//! This module provides the [`MutexQueue`].
use crate::lifecycle::LifecycleState;
use crate::loom_bindings::sync::{Arc, Condvar, Mutex, MutexGuard};
use crate::trace::{debug, trace};
use crate::{BlockingQueue, Capacity, Consumer, Lifecycle, PopError, Producer, PushError, Queue};
use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

/// A multi-producer, multi-consumer FIFO queue guarded by a single mutex.
///
/// It has the same contracts as [`TwoLockQueue`](crate::TwoLockQueue) but
/// serializes producers and consumers on one lock. It is simpler and works
/// well when contention is low.
///
/// `MutexQueue` is a handle: clones refer to the same queue.
pub struct MutexQueue<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    items: Mutex<VecDeque<T>>,
    lifecycle: LifecycleState,
    capacity: Capacity,
    not_empty: Condvar,
    not_full: Condvar,
}

impl<T> MutexQueue<T> {
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
        trace!(%capacity, "mutex queue created");

        Self {
            inner: Arc::new(Inner {
                items: Mutex::new(VecDeque::new()),
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

    /// Returns the number of queued values.
    pub fn len(&self) -> usize {
        self.inner.items.lock().len()
    }

    /// Returns whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.items.lock().is_empty()
    }

    /// Pushes a value without blocking.
    ///
    /// # Errors
    ///
    /// Returns [`PushError::Closed`] if the queue is closed and
    /// [`PushError::Full`] if it is bounded and full.
    pub fn push(&self, value: T) -> Result<(), PushError<T>> {
        let inner = &*self.inner;
        let items = inner.items.lock();

        if inner.lifecycle.is_closed() {
            drop(items);
            trace!("push rejected, the queue is closed");

            return Err(PushError::Closed(value));
        }

        if inner.capacity.is_reached_by(items.len()) {
            drop(items);
            trace!("push rejected, the queue is full");

            return Err(PushError::Full(value));
        }

        inner.push_back(items, value);

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
        let mut items = inner.items.lock();

        loop {
            if inner.lifecycle.is_closed() {
                drop(items);
                trace!("push rejected, the queue is closed");

                return Err(PushError::Closed(value));
            }

            if !inner.capacity.is_reached_by(items.len()) {
                break;
            }

            items = inner.not_full.wait(items);
        }

        inner.push_back(items, value);

        Ok(())
    }

    /// Pops the head value if there is one. Never blocks.
    pub fn try_pop(&self) -> Option<T> {
        let inner = &*self.inner;
        let popped = inner.pop_front(&mut inner.items.lock());

        popped.map(|popped| inner.finish_pop(popped))
    }

    /// Pops the head value, blocking until one is available.
    ///
    /// Returns `None` once the queue is closed and drained.
    pub fn wait_pop(&self) -> Option<T> {
        let inner = &*self.inner;
        let mut items = inner.items.lock();

        loop {
            if let Some(popped) = inner.pop_front(&mut items) {
                drop(items);

                return Some(inner.finish_pop(popped));
            }

            if inner.lifecycle.is_closed() {
                return None;
            }

            items = inner.not_empty.wait(items);
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
        let mut items = inner.items.lock();

        loop {
            if let Some(popped) = inner.pop_front(&mut items) {
                drop(items);

                return Ok(inner.finish_pop(popped));
            }

            if inner.lifecycle.is_closed() {
                return Err(PopError::Closed);
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(PopError::Timeout);
            }

            items = inner.not_empty.wait_timeout(items, deadline - now).0;
        }
    }

    /// Closes the queue. See [`Lifecycle::close`].
    pub fn close(&self) -> bool {
        let inner = &*self.inner;
        let items = inner.items.lock();

        if !inner.lifecycle.close() {
            return false;
        }

        drop(items);

        debug!(backlog = self.len(), "mutex queue closed");

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
    fn push_back(&self, mut items: MutexGuard<'_, VecDeque<T>>, value: T) {
        items.push_back(value);

        let has_room = !self.capacity.is_reached_by(items.len());

        drop(items);

        if has_room && matches!(self.capacity, Capacity::Bounded(_)) {
            self.not_full.notify_one();
        }

        self.not_empty.notify_one();
    }

    /// Pops under the lock. The flag tells whether the queue was full.
    #[inline]
    fn pop_front(&self, items: &mut MutexGuard<'_, VecDeque<T>>) -> Option<(T, bool)> {
        let was_full = self.capacity.is_reached_by(items.len());

        items.pop_front().map(|value| (value, was_full))
    }

    /// Wakes a producer if the pop made room in a full queue.
    /// Called after the lock is released.
    #[inline]
    fn finish_pop(&self, (value, was_full): (T, bool)) -> T {
        if was_full {
            self.not_full.notify_one();
        }

        value
    }
}

impl<T> Default for MutexQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for MutexQueue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> fmt::Debug for MutexQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutexQueue")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("state", &self.state())
            .finish()
    }
}

impl<T> Queue for MutexQueue<T> {
    #[inline]
    fn capacity(&self) -> Capacity {
        MutexQueue::capacity(self)
    }

    #[inline]
    fn len(&self) -> usize {
        MutexQueue::len(self)
    }

    #[inline]
    fn is_empty(&self) -> bool {
        MutexQueue::is_empty(self)
    }
}

impl<T> Producer<T> for MutexQueue<T> {
    #[inline]
    fn push(&self, value: T) -> Result<(), PushError<T>> {
        MutexQueue::push(self, value)
    }

    #[inline]
    fn wait_push(&self, value: T) -> Result<(), PushError<T>> {
        MutexQueue::wait_push(self, value)
    }
}

impl<T> Consumer<T> for MutexQueue<T> {
    #[inline]
    fn try_pop(&self) -> Option<T> {
        MutexQueue::try_pop(self)
    }

    #[inline]
    fn wait_pop(&self) -> Option<T> {
        MutexQueue::wait_pop(self)
    }

    #[inline]
    fn wait_pop_timeout(&self, timeout: Duration) -> Result<T, PopError> {
        MutexQueue::wait_pop_timeout(self, timeout)
    }
}

impl<T> Lifecycle for MutexQueue<T> {
    #[inline]
    fn close(&self) -> bool {
        MutexQueue::close(self)
    }

    #[inline]
    fn is_closed(&self) -> bool {
        MutexQueue::is_closed(self)
    }
}

impl<T: Send> BlockingQueue<T> for MutexQueue<T> {}
