//! This module provides [`Capacity`], the size limit a queue is built with.
use std::fmt;
use std::num::NonZeroUsize;

/// How many values a queue may hold at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Capacity {
    /// No limit; `push` only fails once the queue is closed.
    #[default]
    Unbounded,
    /// At most the given number of values.
    Bounded(NonZeroUsize),
}

impl Capacity {
    /// Returns a bounded capacity.
    ///
    /// # Panics
    ///
    /// Panics if `limit` is zero.
    #[track_caller]
    pub fn bounded(limit: usize) -> Self {
        match NonZeroUsize::new(limit) {
            Some(limit) => Self::Bounded(limit),
            None => panic!("a bounded queue needs a capacity of at least one"),
        }
    }

    /// Returns the limit, or `None` if unbounded.
    pub fn get(self) -> Option<usize> {
        match self {
            Self::Unbounded => None,
            Self::Bounded(limit) => Some(limit.get()),
        }
    }

    /// Returns whether `len` values fill a queue of this capacity.
    #[inline]
    pub(crate) fn is_reached_by(self, len: usize) -> bool {
        match self {
            Self::Unbounded => false,
            Self::Bounded(limit) => len >= limit.get(),
        }
    }
}

impl From<NonZeroUsize> for Capacity {
    fn from(limit: NonZeroUsize) -> Self {
        Self::Bounded(limit)
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbounded => f.write_str("unbounded"),
            Self::Bounded(limit) => write!(f, "{limit}"),
        }
    }
}
