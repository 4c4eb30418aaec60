//! Scans: find, rewind_until, iterate.

use core::iter::FusedIterator;

use super::motion::unreachable_on;
use crate::cursor::{BidirectionalCursor, ForwardCursor};
use crate::error::{Result, Violation};

/// Moves `current` forward to the first element matching `predicate`.
///
/// Returns `Ok(false)` with `current == end` when nothing matches.
///
/// # Errors
///
/// `Unreachable` when `current` runs off its container before meeting `end`.
pub fn find<C, P>(current: &mut C, end: &C, mut predicate: P) -> Result<bool>
where
    C: ForwardCursor,
    P: FnMut(&C::Item) -> bool,
{
    while !current.equals(end) {
        if predicate(&current.value()?) {
            return Ok(true);
        }
        current.step().map_err(unreachable_on(Violation::PastEnd, "find"))?;
    }
    Ok(false)
}

/// Walks `cursor` backward to the nearest element matching `predicate`,
/// starting with the element under the cursor.
///
/// Returns `Ok(false)` with the cursor at begin when nothing matches.
///
/// # Errors
///
/// `PastEnd` when started at the end position, which holds no element.
pub fn rewind_until<C, P>(cursor: &mut C, mut predicate: P) -> Result<bool>
where
    C: BidirectionalCursor,
    P: FnMut(&C::Item) -> bool,
{
    loop {
        if predicate(&cursor.value()?) {
            return Ok(true);
        }
        match cursor.step_back() {
            Ok(()) => {}
            Err(err) if err.violation() == Some(&Violation::BeforeBegin) => return Ok(false),
            Err(err) => return Err(err),
        }
    }
}

/// Lazy pass over `[current, end)`, advancing `current` as it is consumed.
///
/// Yields `Err` once and then stops if a step fails.
pub fn iterate<C: ForwardCursor>(current: &mut C, end: C) -> Iterate<'_, C> {
    Iterate { current, end, done: false }
}

/// Iterator returned by [`iterate`].
#[derive(Debug)]
pub struct Iterate<'a, C> {
    current: &'a mut C,
    end: C,
    done: bool,
}

impl<C: ForwardCursor> Iterator for Iterate<'_, C> {
    type Item = Result<C::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.current.equals(&self.end) {
            self.done = true;
            return None;
        }
        let item = self.current.value().and_then(|value| {
            self.current.step()?;
            Ok(value)
        });
        self.done = item.is_err();
        Some(item)
    }
}

impl<C: ForwardCursor> FusedIterator for Iterate<'_, C> {}
