//! This module abstracts over `loom` and `std::sync` depending on whether we
//! are running model-checking tests or not.

#[cfg(not(all(test, blockq_loom)))]
mod std;
#[cfg(not(all(test, blockq_loom)))]
pub(crate) use self::std::*;

#[cfg(all(test, blockq_loom))]
pub(crate) use self::mocked::*;
