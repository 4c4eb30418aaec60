//! Cursor movement: advance, rewind, distance.

use tracing::trace;

use crate::cursor::{BidirectionalCursor, ForwardCursor};
use crate::error::{CursorError, Result, Violation};

/// Maps running off the range into `Unreachable` for `operation`.
pub(crate) fn unreachable_on(violation: Violation, operation: &'static str) -> impl Fn(CursorError) -> CursorError {
    move |err| {
        if err.violation() == Some(&violation) {
            CursorError::precondition(operation, Violation::Unreachable)
        } else {
            err
        }
    }
}

fn is_violation(err: &CursorError, violation: &Violation) -> bool {
    err.violation() == Some(violation)
}

/// Steps `cursor` forward exactly `n` times.
///
/// # Errors
///
/// `PastEnd` when the end is reached first. The cursor stays where the
/// failing step left it.
pub fn advance<C: ForwardCursor>(cursor: &mut C, n: usize) -> Result<()> {
    for _ in 0..n {
        cursor.step()?;
    }
    Ok(())
}

/// Like [`advance`], but all-or-nothing.
///
/// Returns `Ok(false)` with the cursor back at its starting position when
/// fewer than `n` steps were possible.
///
/// # Errors
///
/// Failures other than running off the end (stale or released cursors);
/// the cursor is restored in that case too.
pub fn try_advance<C: ForwardCursor>(cursor: &mut C, n: usize) -> Result<bool> {
    let origin = cursor.clone();
    match advance(cursor, n) {
        Ok(()) => Ok(true),
        Err(err) => {
            *cursor = origin;
            if is_violation(&err, &Violation::PastEnd) {
                trace!(steps = n, "try_advance rolled back");
                Ok(false)
            } else {
                Err(err)
            }
        }
    }
}

/// Steps `cursor` back exactly `n` times.
///
/// # Errors
///
/// `BeforeBegin` when the begin is reached first; no rollback.
pub fn rewind<C: BidirectionalCursor>(cursor: &mut C, n: usize) -> Result<()> {
    for _ in 0..n {
        cursor.step_back()?;
    }
    Ok(())
}

/// Like [`rewind`], but all-or-nothing.
///
/// # Errors
///
/// As [`try_advance`].
pub fn try_rewind<C: BidirectionalCursor>(cursor: &mut C, n: usize) -> Result<bool> {
    let origin = cursor.clone();
    match rewind(cursor, n) {
        Ok(()) => Ok(true),
        Err(err) => {
            *cursor = origin;
            if is_violation(&err, &Violation::BeforeBegin) {
                trace!(steps = n, "try_rewind rolled back");
                Ok(false)
            } else {
                Err(err)
            }
        }
    }
}

/// Number of steps from `begin` to `end`. Leaves `begin` equal to `end`.
///
/// Always a linear scan, whatever the cursor's capability.
///
/// # Errors
///
/// `Unreachable` when `begin` runs off its container without meeting `end`,
/// for instance when `end` lies before it or belongs to another container.
pub fn distance<C: ForwardCursor>(begin: &mut C, end: &C) -> Result<usize> {
    let mut steps = 0;
    while !begin.equals(end) {
        begin.step().map_err(unreachable_on(Violation::PastEnd, "distance"))?;
        steps += 1;
    }
    Ok(steps)
}
