//! Model-checking tests. Run with
//! `RUSTFLAGS="--cfg blockq_loom" cargo test --release loom`.
use crate::{BlockingQueue, MutexQueue, PushError, TwoLockQueue};
use loom::thread;

fn loom_push_then_wait_pop<Q: BlockingQueue<usize> + 'static>(creator: fn() -> Q) {
    loom::model(move || {
        let queue = creator();
        let producer = queue.clone();

        let th = thread::spawn(move || {
            producer.push(1).unwrap();
            producer.push(2).unwrap();
        });

        assert_eq!(queue.wait_pop(), Some(1));
        assert_eq!(queue.wait_pop(), Some(2));

        th.join().unwrap();
    });
}

fn loom_close_releases_waiter<Q: BlockingQueue<usize> + 'static>(creator: fn() -> Q) {
    loom::model(move || {
        let queue = creator();
        let consumer = queue.clone();

        let th = thread::spawn(move || consumer.iter().collect::<Vec<_>>());

        queue.push(1).unwrap();
        queue.close();

        assert_eq!(th.join().unwrap(), vec![1]);
    });
}

fn loom_push_races_close<Q: BlockingQueue<usize> + 'static>(creator: fn() -> Q) {
    loom::model(move || {
        let queue = creator();
        let producer = queue.clone();

        let th = thread::spawn(move || producer.push(1).is_ok());

        queue.close();

        let pushed = th.join().unwrap();
        let mut delivered = 0;

        while queue.wait_pop().is_some() {
            delivered += 1;
        }

        assert_eq!(delivered, usize::from(pushed));
        assert_eq!(queue.push(2), Err(PushError::Closed(2)));
    });
}

fn loom_one_value_two_consumers<Q: BlockingQueue<usize> + 'static>(creator: fn() -> Q) {
    loom::model(move || {
        let queue = creator();
        let consumer1 = queue.clone();
        let consumer2 = queue.clone();

        let th1 = thread::spawn(move || consumer1.wait_pop());
        let th2 = thread::spawn(move || consumer2.wait_pop());

        queue.push(7).unwrap();
        queue.close();

        let results = [th1.join().unwrap(), th2.join().unwrap()];

        assert_eq!(results.iter().flatten().count(), 1);
        assert!(results.contains(&Some(7)));
    });
}

fn loom_wait_push_on_full<Q: BlockingQueue<usize> + 'static>(creator: fn() -> Q) {
    loom::model(move || {
        let queue = creator();
        let producer = queue.clone();

        queue.push(1).unwrap();

        let th = thread::spawn(move || producer.wait_push(2));

        assert_eq!(queue.wait_pop(), Some(1));
        assert_eq!(queue.wait_pop(), Some(2));
        assert_eq!(th.join().unwrap(), Ok(()));
    });
}

#[test]
fn loom_two_lock_push_then_wait_pop() {
    loom_push_then_wait_pop(TwoLockQueue::<usize>::new);
}

#[test]
fn loom_two_lock_close_releases_waiter() {
    loom_close_releases_waiter(TwoLockQueue::<usize>::new);
}

#[test]
fn loom_two_lock_push_races_close() {
    loom_push_races_close(TwoLockQueue::<usize>::new);
}

#[test]
fn loom_two_lock_one_value_two_consumers() {
    loom_one_value_two_consumers(TwoLockQueue::<usize>::new);
}

#[test]
fn loom_two_lock_wait_push_on_full() {
    loom_wait_push_on_full(|| TwoLockQueue::<usize>::with_capacity(1));
}

#[test]
fn loom_mutex_push_then_wait_pop() {
    loom_push_then_wait_pop(MutexQueue::<usize>::new);
}

#[test]
fn loom_mutex_close_releases_waiter() {
    loom_close_releases_waiter(MutexQueue::<usize>::new);
}

#[test]
fn loom_mutex_push_races_close() {
    loom_push_races_close(MutexQueue::<usize>::new);
}

#[test]
fn loom_mutex_one_value_two_consumers() {
    loom_one_value_two_consumers(MutexQueue::<usize>::new);
}

#[test]
fn loom_mutex_wait_push_on_full() {
    loom_wait_push_on_full(|| MutexQueue::<usize>::with_capacity(1));
}
