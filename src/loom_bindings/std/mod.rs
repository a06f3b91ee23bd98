mod condvar;
mod mutex;

pub(crate) mod sync {
    pub(crate) use std::sync::{Arc, MutexGuard};

    pub(crate) use crate::loom_bindings::std::condvar::Condvar;
    pub(crate) use crate::loom_bindings::std::mutex::Mutex;

    pub(crate) mod atomic {
        pub(crate) use std::sync::atomic::{AtomicBool, AtomicUsize};
    }
}
