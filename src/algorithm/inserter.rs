//! Output cursors that grow a container instead of overwriting it.
//!
//! Each `set` inserts immediately; `step` only re-arms the cursor. Calling
//! `set` twice in a row, or `step` before any `set`, is a usage error.

use std::fmt;

use crate::concepts;
use crate::container::{RewindContainer, SequenceContainer};
use crate::cursor::OutputCursor;
use crate::error::{CursorError, Result};
use macros::capability;

const SET_TWICE: &str = "set called twice without step";
const STEP_FIRST: &str = "step called before set";

/// Appends every value at the back of a container.
pub struct BackInserter<'a, C> {
    container: &'a mut C,
    armed: bool,
}

/// Prepends every value at the front of a container, so a copied range
/// lands reversed.
pub struct FrontInserter<'a, C> {
    container: &'a mut C,
    armed: bool,
}

#[must_use]
pub fn back_inserter<C: RewindContainer>(container: &mut C) -> BackInserter<'_, C> {
    BackInserter { container, armed: false }
}

/// # Note
///
/// `set` fails with `Unsupported` when the container stubs `unshift`.
#[must_use]
pub fn front_inserter<C: SequenceContainer>(container: &mut C) -> FrontInserter<'_, C> {
    FrontInserter { container, armed: false }
}

fn arm(armed: &mut bool) -> Result<()> {
    if *armed {
        return Err(CursorError::misuse("set", SET_TWICE));
    }
    *armed = true;
    Ok(())
}

fn disarm(armed: &mut bool) -> Result<()> {
    if !*armed {
        return Err(CursorError::misuse("step", STEP_FIRST));
    }
    *armed = false;
    Ok(())
}

#[capability(concepts::OutputCursor)]
impl<C: RewindContainer> OutputCursor for BackInserter<'_, C> {
    type Item = C::Item;

    fn set(&mut self, value: C::Item) -> Result<()> {
        arm(&mut self.armed)?;
        self.container.push(value).inspect_err(|_| self.armed = false)
    }

    fn step(&mut self) -> Result<()> {
        disarm(&mut self.armed)
    }
}

#[capability(concepts::OutputCursor)]
impl<C: SequenceContainer> OutputCursor for FrontInserter<'_, C> {
    type Item = C::Item;

    fn set(&mut self, value: C::Item) -> Result<()> {
        arm(&mut self.armed)?;
        self.container.unshift(value).inspect_err(|_| self.armed = false)
    }

    fn step(&mut self) -> Result<()> {
        disarm(&mut self.armed)
    }
}

impl<C> fmt::Debug for BackInserter<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackInserter").field("armed", &self.armed).finish_non_exhaustive()
    }
}

impl<C> fmt::Debug for FrontInserter<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrontInserter").field("armed", &self.armed).finish_non_exhaustive()
    }
}
