//! This module contains the two-lock queue: a linked chain of nodes with a
//! standing sentinel, where producers only take the tail lock and consumers
//! only take the head lock.
//!
//! Use [`TwoLockQueue`].
mod queue;
mod storage;

pub use queue::*;
