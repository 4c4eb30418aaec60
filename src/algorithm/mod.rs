//! Generic algorithms over cursors.
//!
//! Every algorithm states the capability it needs as a trait bound, so
//! handing it a weaker cursor is rejected at compile time. Callers holding
//! only a runtime shape can check first with [`crate::concept::ensure`].
//!
//! Ranges are half-open `[first, last)`. An algorithm that walks off its
//! container without meeting the range end reports `Unreachable`.

mod copy;
mod inserter;
mod motion;
mod search;

pub use copy::{copy, copy_backward};
pub use inserter::{back_inserter, front_inserter, BackInserter, FrontInserter};
pub use motion::{advance, distance, rewind, try_advance, try_rewind};
pub use search::{find, iterate, rewind_until, Iterate};
