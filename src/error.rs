//! Errors returned by the queue operations.
//!
//! Running out of room or finding the queue closed is ordinary control flow
//! for a pipeline, so these are values, not panics.
use thiserror::Error;

/// The reason a value could not be pushed. The rejected value is handed back.
#[derive(Error, Clone, Copy, PartialEq, Eq)]
pub enum PushError<T> {
    /// The queue is bounded and currently full.
    #[error("queue is full")]
    Full(T),
    /// The queue has been closed and accepts no more values.
    #[error("queue is closed")]
    Closed(T),
}

impl<T> PushError<T> {
    /// Returns the value that was not pushed.
    pub fn into_inner(self) -> T {
        match self {
            Self::Full(value) | Self::Closed(value) => value,
        }
    }

    /// Returns `true` if the push failed because the queue was full.
    pub fn is_full(&self) -> bool {
        matches!(self, Self::Full(_))
    }

    /// Returns `true` if the push failed because the queue was closed.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed(_))
    }
}

// Written by hand so that `T` does not need to be `Debug`.
impl<T> std::fmt::Debug for PushError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Full(_) => write!(f, "Full(..)"),
            Self::Closed(_) => write!(f, "Closed(..)"),
        }
    }
}

/// The reason a timed pop returned without a value.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopError {
    /// The timeout elapsed while the queue stayed empty and open.
    #[error("timed out waiting for a value")]
    Timeout,
    /// The queue is closed and every queued value has been taken.
    #[error("queue is closed and drained")]
    Closed,
}
