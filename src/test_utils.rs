//! Checks shared by every queue implementation. Each takes a constructor so
//! the same suite runs against [`TwoLockQueue`](crate::TwoLockQueue) and
//! [`MutexQueue`](crate::MutexQueue).
use crate::test_lock::TEST_LOCK;
use crate::{BlockingQueue, Capacity, PopError, PushError, State};
use crossbeam_utils::Backoff;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread::{self, sleep, spawn};
use std::time::{Duration, Instant};

/// Long enough for a spawned thread to reach its blocking call.
const SETTLE: Duration = Duration::from_millis(50);
/// Upper bound for anything that is expected to wake up.
const WAKE_LIMIT: Duration = Duration::from_secs(5);

pub(crate) fn check_single_threaded<Q: BlockingQueue<usize>>(creator: fn() -> Q) {
    let queue = creator();

    assert_eq!(queue.len(), 0);
    assert!(queue.is_empty());
    assert_eq!(queue.state(), State::Open);
    assert_eq!(queue.try_pop(), None);

    for i in 1..=3 {
        queue.push(i).unwrap();
    }

    assert_eq!(queue.len(), 3);
    assert!(!queue.is_empty());

    for i in 1..=3 {
        assert_eq!(queue.try_pop(), Some(i));
    }

    assert_eq!(queue.try_pop(), None);
    assert!(queue.is_empty());

    queue.push(4).unwrap();
    assert_eq!(queue.wait_pop(), Some(4));
}

pub(crate) fn check_close_drains_backlog<Q: BlockingQueue<usize>>(creator: fn() -> Q) {
    let queue = creator();

    for i in 0..5 {
        queue.push(i).unwrap();
    }

    assert!(queue.close());
    assert!(queue.is_closed());
    assert_eq!(queue.len(), 5);

    for i in 0..5 {
        assert_eq!(queue.wait_pop(), Some(i));
    }

    assert_eq!(queue.wait_pop(), None);
    assert_eq!(queue.try_pop(), None);
    assert_eq!(queue.wait_pop_timeout(WAKE_LIMIT), Err(PopError::Closed));
}

pub(crate) fn check_post_close_push_rejected<Q: BlockingQueue<usize>>(creator: fn() -> Q) {
    let queue = creator();

    queue.push(1).unwrap();
    queue.close();

    let err = queue.push(42).unwrap_err();
    assert!(err.is_closed());
    assert_eq!(err.into_inner(), 42);
    assert_eq!(queue.wait_push(43), Err(PushError::Closed(43)));

    assert_eq!(queue.len(), 1);
    assert_eq!(queue.wait_pop(), Some(1));
    assert_eq!(queue.wait_pop(), None);
}

pub(crate) fn check_idempotent_close<Q: BlockingQueue<usize> + 'static>(creator: fn() -> Q) {
    let queue = creator();

    assert!(queue.close());
    assert!(!queue.close());
    assert_eq!(queue.state(), State::Closed);
    assert_eq!(queue.wait_pop(), None);

    let queue = creator();
    let closed_by = Arc::new(AtomicUsize::new(0));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let queue = queue.clone();
            let closed_by = closed_by.clone();

            spawn(move || {
                if queue.close() {
                    closed_by.fetch_add(1, Ordering::Relaxed);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(closed_by.load(Ordering::Relaxed), 1);
    assert!(queue.is_closed());
}

pub(crate) fn check_bounded<Q: BlockingQueue<usize>>(creator: fn() -> Q) {
    let queue = creator();

    assert_eq!(queue.capacity(), Capacity::bounded(4));

    for i in 0..4 {
        queue.push(i).unwrap();
    }

    assert_eq!(queue.push(4), Err(PushError::Full(4)));
    assert_eq!(queue.try_pop(), Some(0));
    queue.push(4).unwrap();

    for i in 1..=4 {
        assert_eq!(queue.try_pop(), Some(i));
    }

    assert_eq!(queue.try_pop(), None);
}

pub(crate) fn check_wait_push_released_by_pop<Q: BlockingQueue<usize> + 'static>(
    creator: fn() -> Q,
) {
    let queue = creator();

    queue.push(0).unwrap();

    let producer = {
        let queue = queue.clone();

        spawn(move || queue.wait_push(1))
    };

    sleep(SETTLE);
    assert!(!producer.is_finished(), "wait_push returned on a full queue");

    assert_eq!(queue.try_pop(), Some(0));
    assert_eq!(producer.join().unwrap(), Ok(()));
    assert_eq!(queue.try_pop(), Some(1));
}

pub(crate) fn check_wait_push_released_by_close<Q: BlockingQueue<usize> + 'static>(
    creator: fn() -> Q,
) {
    let queue = creator();

    queue.push(0).unwrap();

    let producer = {
        let queue = queue.clone();

        spawn(move || queue.wait_push(1))
    };

    sleep(SETTLE);
    queue.close();

    assert_eq!(producer.join().unwrap(), Err(PushError::Closed(1)));
    assert_eq!(queue.try_pop(), Some(0));
    assert_eq!(queue.try_pop(), None);
}

pub(crate) fn check_wait_pop_timeout<Q: BlockingQueue<usize> + 'static>(creator: fn() -> Q) {
    let queue = creator();
    let timeout = Duration::from_millis(20);

    let start = Instant::now();
    assert_eq!(queue.wait_pop_timeout(timeout), Err(PopError::Timeout));
    assert!(start.elapsed() >= timeout);

    queue.push(5).unwrap();
    assert_eq!(queue.wait_pop_timeout(timeout), Ok(5));

    queue.push(6).unwrap();
    assert_eq!(queue.wait_pop_timeout(Duration::MAX), Ok(6));

    let producer = {
        let queue = queue.clone();

        spawn(move || {
            sleep(timeout);
            queue.push(7).unwrap();
        })
    };

    assert_eq!(queue.wait_pop_timeout(WAKE_LIMIT), Ok(7));
    producer.join().unwrap();

    queue.close();
    assert_eq!(queue.wait_pop_timeout(WAKE_LIMIT), Err(PopError::Closed));
}

/// Blocks consumers first, then pushes one value per consumer.
pub(crate) fn check_no_lost_wakeup<Q: BlockingQueue<usize> + 'static>(creator: fn() -> Q) {
    const CONSUMERS: usize = 8;

    let test_guard = TEST_LOCK.lock();
    let queue = creator();
    let (tx, rx) = mpsc::channel();

    for _ in 0..CONSUMERS {
        let queue = queue.clone();
        let tx = tx.clone();

        spawn(move || tx.send(queue.wait_pop()).unwrap());
    }

    sleep(SETTLE);

    for i in 0..CONSUMERS {
        queue.push(i).unwrap();
    }

    let mut received: Vec<usize> = (0..CONSUMERS)
        .map(|_| rx.recv_timeout(WAKE_LIMIT).unwrap().unwrap())
        .collect();
    received.sort_unstable();

    assert_eq!(received, (0..CONSUMERS).collect::<Vec<_>>());

    drop(test_guard);
}

pub(crate) fn check_close_wakes_all_consumers<Q: BlockingQueue<usize> + 'static>(
    creator: fn() -> Q,
) {
    const CONSUMERS: usize = 8;

    let test_guard = TEST_LOCK.lock();
    let queue = creator();
    let (tx, rx) = mpsc::channel();

    for _ in 0..CONSUMERS {
        let queue = queue.clone();
        let tx = tx.clone();

        spawn(move || tx.send(queue.wait_pop()).unwrap());
    }

    sleep(SETTLE);
    assert!(queue.close());

    for _ in 0..CONSUMERS {
        assert_eq!(rx.recv_timeout(WAKE_LIMIT).unwrap(), None);
    }

    drop(test_guard);
}

pub(crate) fn check_drops_remaining_values<Q: BlockingQueue<Arc<()>>>(creator: fn() -> Q) {
    let tracker = Arc::new(());
    let queue = creator();
    let other_handle = queue.clone();

    for _ in 0..10 {
        queue.push(tracker.clone()).unwrap();
    }

    drop(other_handle.try_pop());
    drop(other_handle.try_pop());
    assert_eq!(Arc::strong_count(&tracker), 9);

    drop(queue);
    assert_eq!(Arc::strong_count(&tracker), 9);

    drop(other_handle);
    assert_eq!(Arc::strong_count(&tracker), 1);
}

/// Many producers, many blocking consumers. Every value arrives once, and
/// each consumer sees every producer's values in push order.
pub(crate) fn check_mpmc_no_loss_per_producer_fifo<Q: BlockingQueue<(usize, usize)> + 'static>(
    creator: fn() -> Q,
) {
    const PRODUCERS: usize = 8;
    const CONSUMERS: usize = 8;
    const N: usize = 10_000;

    let test_guard = TEST_LOCK.lock();
    let queue = creator();

    let producers: Vec<_> = (0..PRODUCERS)
        .map(|producer| {
            let queue = queue.clone();

            spawn(move || {
                for i in 0..N {
                    queue.wait_push((producer, i)).unwrap();
                }
            })
        })
        .collect();

    let consumers: Vec<_> = (0..CONSUMERS)
        .map(|_| {
            let queue = queue.clone();

            spawn(move || {
                let mut last_seen = [None; PRODUCERS];
                let mut received = Vec::new();

                for (producer, i) in queue.iter() {
                    assert!(
                        last_seen[producer].is_none_or(|last| last < i),
                        "values of producer {producer} arrived out of order"
                    );

                    last_seen[producer] = Some(i);
                    received.push((producer, i));
                }

                received
            })
        })
        .collect();

    for producer in producers {
        producer.join().unwrap();
    }

    queue.close();

    let mut all: Vec<(usize, usize)> = consumers
        .into_iter()
        .flat_map(|consumer| consumer.join().unwrap())
        .collect();

    assert_eq!(all.len(), PRODUCERS * N);

    all.sort_unstable();

    let expected: Vec<_> = (0..PRODUCERS)
        .flat_map(|producer| (0..N).map(move |i| (producer, i)))
        .collect();

    assert_eq!(all, expected);
    assert!(queue.is_empty());

    drop(test_guard);
}

/// Consumers poll with `try_pop` and back off instead of blocking.
pub(crate) fn check_try_pop_polling<Q: BlockingQueue<usize> + 'static>(creator: fn() -> Q) {
    const PRODUCERS: usize = 4;
    const N: usize = 10_000;

    let test_guard = TEST_LOCK.lock();
    let queue = creator();
    let sum = Arc::new(AtomicUsize::new(0));
    let mut handles = Vec::new();

    for _ in 0..PRODUCERS {
        let producer = queue.clone();

        handles.push(spawn(move || {
            for i in 1..=N {
                producer.wait_push(i).unwrap();
            }
        }));

        let consumer = queue.clone();
        let sum = sum.clone();

        handles.push(spawn(move || {
            for _ in 0..N {
                let backoff = Backoff::new();

                loop {
                    if let Some(value) = consumer.try_pop() {
                        sum.fetch_add(value, Ordering::Relaxed);

                        break;
                    }

                    if backoff.is_completed() {
                        thread::yield_now();
                    } else {
                        backoff.snooze();
                    }
                }
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(sum.load(Ordering::Relaxed), PRODUCERS * N * (N + 1) / 2);
    assert_eq!(queue.try_pop(), None);

    drop(test_guard);
}
