//! Blocking multi-producer, multi-consumer FIFO queues with a cooperative
//! close protocol.
//!
//! Producers [`push`](Producer::push) without ever blocking, consumers
//! either poll with [`try_pop`](Consumer::try_pop) or block in
//! [`wait_pop`](Consumer::wait_pop). [`close`](Lifecycle::close) stops
//! production, wakes every waiter and leaves the backlog to be drained;
//! `wait_pop` returning `None` tells a consumer there is no more work.
//!
//! Two implementations share these contracts:
//!
//! * [`TwoLockQueue`]: a linked chain with separate head and tail locks,
//!   so producers and consumers rarely contend.
//! * [`MutexQueue`]: one mutex over a `VecDeque`, simpler and fine under
//!   low contention.
//!
//! Both may be unbounded or bounded, see [`Capacity`].
#![deny(clippy::all)]
#![deny(clippy::assertions_on_result_states)]
#![deny(clippy::match_wild_err_arm)]
#![deny(clippy::allow_attributes_without_reason)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::cargo)]
#![allow(
    clippy::missing_const_for_fn,
    reason = "Since we cannot make a constant function non-constant after its release,
    we need to look for a reason to make it constant, and not vice versa."
)]
#![allow(
    clippy::must_use_candidate,
    reason = "It is better to developer think about it."
)]
#![allow(
    clippy::module_name_repetitions,
    reason = "This is acceptable most of the time."
)]
#![allow(clippy::redundant_pub_crate, reason = "It improves readability.")]

mod capacity;
mod consumer;
mod error;
mod lifecycle;
#[cfg(all(blockq_loom, test))]
mod loom;
mod loom_bindings;
mod mutex_queue;
mod producer;
mod queue;
#[cfg(all(test, not(blockq_loom)))]
mod test_utils;
pub mod trace;
mod two_lock;

pub use capacity::Capacity;
pub use consumer::{BlockingIter, Consumer};
pub use error::{PopError, PushError};
pub use lifecycle::{Lifecycle, State};
pub use mutex_queue::MutexQueue;
pub use producer::Producer;
pub use queue::{BlockingQueue, Queue};
pub use two_lock::TwoLockQueue;
