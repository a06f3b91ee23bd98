use std::sync::{self, MutexGuard, PoisonError};

/// Adapter for `std::Mutex` that removes the poisoning aspects
/// from its API.
#[derive(Debug)]
pub(crate) struct Mutex<T: ?Sized>(sync::Mutex<T>);

impl<T> Mutex<T> {
    #[inline]
    pub(crate) fn new(t: T) -> Self {
        Self(sync::Mutex::new(t))
    }

    #[inline]
    #[cfg_attr(not(test), allow(dead_code, reason = "only the test lock needs a const mutex"))]
    pub(crate) const fn const_new(t: T) -> Self {
        Self(sync::Mutex::new(t))
    }
}

impl<T: ?Sized> Mutex<T> {
    #[inline]
    pub(crate) fn lock(&self) -> MutexGuard<'_, T> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self) -> &mut T {
        self.0.get_mut().unwrap_or_else(PoisonError::into_inner)
    }
}
