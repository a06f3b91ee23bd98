//! The node chain behind [`TwoLockQueue`](super::TwoLockQueue).
use crate::loom_bindings::sync::atomic::AtomicUsize;
use crate::loom_bindings::sync::{Mutex, MutexGuard};
use std::ptr::NonNull;
use std::sync::atomic::Ordering::{AcqRel, Acquire};

// Implementation notes for the two-lock chain.
//
// The chain always holds one node more than there are values. The node
// `tail` points at is a sentinel: no value, no successor. Because of it,
// `head` and `tail` are never null and "the queue just became non-empty"
// is not a special case.
//
// A producer holds the tail lock, writes its value into the sentinel, links
// a fresh sentinel behind it and moves `tail` forward. It never touches a
// node once `tail` has left it.
//
// A consumer holds the head lock and compares `head` with `tail`, reading
// `tail` under the tail lock. If they differ, the head node is complete:
// every write to it happened under the tail lock before `tail` moved past
// it, and the consumer's tail lock acquisition makes those writes visible.
// The consumer takes the value, moves `head` to the successor and frees the
// old head.
//
// So enqueue and dequeue contend only on the short tail-lock read of the
// emptiness check. Locks are always taken head first, then tail.
//
// `len` is maintained inside the locks for diagnostics and for the admission
// check of bounded queues. Emptiness is never decided by it.

pub(crate) struct Node<T> {
    value: Option<T>,
    next: Option<NonNull<Node<T>>>,
}

/// A node allocated before the tail lock is taken, so that an allocation
/// failure leaves the queue untouched. It becomes the next sentinel.
pub(crate) struct SpareNode<T>(Box<Node<T>>);

impl<T> SpareNode<T> {
    #[inline]
    pub(crate) fn new() -> Self {
        Self(Box::new(Node {
            value: None,
            next: None,
        }))
    }

    fn into_ptr(self) -> NonNull<Node<T>> {
        NonNull::from(Box::leak(self.0))
    }
}

/// A value taken from the head of the chain.
pub(crate) struct Dequeued<T> {
    pub(crate) value: T,
    /// The number of values queued right before this one was taken.
    pub(crate) prev_len: usize,
}

pub(crate) type HeadGuard<'a, T> = MutexGuard<'a, NonNull<Node<T>>>;
pub(crate) type TailGuard<'a, T> = MutexGuard<'a, NonNull<Node<T>>>;

/// The synchronized storage core of the two-lock queue.
pub(crate) struct Storage<T> {
    head: Mutex<NonNull<Node<T>>>,
    tail: Mutex<NonNull<Node<T>>>,
    len: AtomicUsize,
}

impl<T> Storage<T> {
    pub(crate) fn new() -> Self {
        let sentinel = SpareNode::new().into_ptr();

        Self {
            head: Mutex::new(sentinel),
            tail: Mutex::new(sentinel),
            len: AtomicUsize::new(0),
        }
    }

    #[inline]
    pub(crate) fn lock_head(&self) -> HeadGuard<'_, T> {
        self.head.lock()
    }

    #[inline]
    pub(crate) fn lock_tail(&self) -> TailGuard<'_, T> {
        self.tail.lock()
    }

    /// Returns the number of queued values as of the last completed mutation.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len.load(Acquire)
    }

    /// Returns whether the chain holds no values. Advisory.
    pub(crate) fn peek_empty(&self) -> bool {
        let head = self.lock_head();

        self.is_empty_locked(&head)
    }

    /// Checks emptiness from the head side. Takes the tail lock briefly.
    #[inline]
    pub(crate) fn is_empty_locked(&self, head: &HeadGuard<'_, T>) -> bool {
        **head == *self.lock_tail()
    }

    /// Appends `value` at the tail and returns the new length.
    pub(crate) fn enqueue(&self, tail: &mut TailGuard<'_, T>, value: T, spare: SpareNode<T>) -> usize {
        let sentinel = **tail;
        let next = spare.into_ptr();

        // SAFETY: the sentinel is only ever accessed by the holder of the tail
        // lock, and consumers never read the node `tail` points at.
        unsafe {
            let node = &mut *sentinel.as_ptr();

            node.value = Some(value);
            node.next = Some(next);
        }

        **tail = next;

        self.len.fetch_add(1, AcqRel) + 1
    }

    /// Removes the head value if there is one. Never blocks beyond the brief
    /// tail lock of the emptiness check.
    pub(crate) fn dequeue(&self, head: &mut HeadGuard<'_, T>) -> Option<Dequeued<T>> {
        if self.is_empty_locked(head) {
            return None;
        }

        let old_head = **head;

        // SAFETY: `tail` has moved past `old_head`, so its producer is done
        // with it and only the holder of the head lock can reach it.
        let mut node = unsafe { Box::from_raw(old_head.as_ptr()) };
        let (Some(value), Some(next)) = (node.value.take(), node.next) else {
            unreachable!("a node behind the tail is always filled and linked");
        };

        **head = next;
        drop(node);

        let prev_len = self.len.fetch_sub(1, AcqRel);

        Some(Dequeued { value, prev_len })
    }

    /// Locks the head and removes the head value if there is one.
    #[inline]
    pub(crate) fn dequeue_if_available(&self) -> Option<Dequeued<T>> {
        let mut head = self.lock_head();

        self.dequeue(&mut head)
    }
}

impl<T> Drop for Storage<T> {
    fn drop(&mut self) {
        let mut cursor = Some(*self.head.get_mut());

        while let Some(ptr) = cursor {
            // SAFETY: `&mut self` means no handle can reach the chain anymore.
            let node = unsafe { Box::from_raw(ptr.as_ptr()) };

            cursor = node.next;
        }
    }
}

// SAFETY: nodes are only reached through the head and tail locks, and the
// values they hold are moved between threads, never shared.
unsafe impl<T: Send> Send for Storage<T> {}
unsafe impl<T: Send> Sync for Storage<T> {}
