//! # Cursors
//!
//! A cursor is a position inside one container instance. Capability levels
//! are cumulative:
//!
//! ```text
//! ForwardCursor         value, set_value, step, equals
//!   └─ BidirectionalCursor   step_back
//!        └─ IndexableCursor      at, set_at, index, jump
//!             └─ ContiguousCursor    read_at, data
//!
//! OutputCursor          set, step            (action stream, never equal)
//! ```
//!
//! Cursors reach their container through a [`handle::StoreRef`]. They never
//! own it and never name a concrete container type; a mutation that moves
//! positions makes every outstanding cursor fail with `StaleCursor`.
//!
//! ## Module Structure
//!
//! ```text
//! cursor/
//! ├── mod.rs     - cursor traits, Overwrite adaptor
//! ├── handle.rs  - Tracked/Store cells, StoreRef (Weak + generation)
//! ├── index.rs   - IndexedStore, ElementStore, IndexCursor
//! ├── bytes.rs   - RawBytes, ByteCursor, ByteView
//! └── layout.rs  - IntLayout, Endian
//! ```

pub mod bytes;
pub(crate) mod handle;
pub mod index;
pub mod layout;

use core::fmt;

use crate::concepts;
use crate::concept::{Composed, Composer};
use crate::error::{CompositionError, CursorError, Result};
use macros::capability;

pub use bytes::{ByteCursor, ByteView, RawBytes};
pub use index::{ElementStore, IndexCursor, IndexedStore};
pub use layout::{Endian, IntLayout};

// =============================================================================
// Position Cursors
// =============================================================================

/// Single-step, comparable position.
pub trait ForwardCursor: Clone + fmt::Debug {
    type Item;

    /// The element at this position.
    ///
    /// # Errors
    ///
    /// `PastEnd` at the end position, or a stale/released handle.
    fn value(&self) -> Result<Self::Item>;

    /// Overwrites the element at this position.
    ///
    /// Read-only cursors keep this default, which fails with `Unsupported`.
    ///
    /// # Errors
    ///
    /// `Unsupported`, `PastEnd`, or a stale/released handle.
    fn set_value(&mut self, value: Self::Item) -> Result<()> {
        let _ = value;
        Err(CursorError::unsupported::<Self>("set_value"))
    }

    /// Moves one position forward.
    ///
    /// # Errors
    ///
    /// `PastEnd` when already at the end; the cursor does not move.
    fn step(&mut self) -> Result<()>;

    /// Same container, same position.
    fn equals(&self, other: &Self) -> bool;
}

/// Forward cursor that can also move back.
pub trait BidirectionalCursor: ForwardCursor {
    /// Moves one position back.
    ///
    /// # Errors
    ///
    /// `BeforeBegin` when already at the first position.
    fn step_back(&mut self) -> Result<()>;
}

/// Bidirectional cursor with O(1) access relative to its position.
pub trait IndexableCursor: BidirectionalCursor {
    /// The element `offset` positions away.
    ///
    /// # Errors
    ///
    /// `IndexOutOfBounds` when the target is not an element.
    fn at(&self, offset: isize) -> Result<Self::Item>;

    /// Overwrites the element `offset` positions away.
    ///
    /// # Errors
    ///
    /// `Unsupported` for read-only cursors, otherwise as [`at`](Self::at).
    fn set_at(&mut self, offset: isize, value: Self::Item) -> Result<()> {
        let _ = (offset, value);
        Err(CursorError::unsupported::<Self>("set_at"))
    }

    /// Absolute position, `0` at begin.
    fn index(&self) -> usize;

    /// Moves `offset` positions at once. Landing on the end is allowed.
    ///
    /// # Errors
    ///
    /// `IndexOutOfBounds` when the target lies outside `[begin, end]`; the
    /// cursor does not move.
    fn jump(&mut self, offset: isize) -> Result<()>;
}

/// Byte cursor over a contiguous buffer.
pub trait ContiguousCursor: IndexableCursor<Item = u8> {
    /// Decodes an integer `offset` bytes past this position.
    ///
    /// # Errors
    ///
    /// `UnsupportedWidth` or `OffsetOutOfBounds`.
    fn read_at(&self, offset: usize, layout: IntLayout) -> Result<i64>;

    /// Zero-copy view of the bytes in `[self, other)`.
    ///
    /// # Errors
    ///
    /// `ForeignCursor` for cursors of another buffer, `Unreachable` when
    /// `other` lies before `self`.
    fn data(&self, other: &Self) -> Result<ByteView>;
}

// =============================================================================
// Output Cursors
// =============================================================================

/// Write-only action stream: `set` a value, then `step` past it.
pub trait OutputCursor: fmt::Debug {
    type Item;

    /// # Errors
    ///
    /// Whatever the underlying sink reports.
    fn set(&mut self, value: Self::Item) -> Result<()>;

    /// # Errors
    ///
    /// Whatever the underlying sink reports.
    fn step(&mut self) -> Result<()>;

    /// Output cursors are never comparable.
    fn equals(&self, other: &Self) -> bool {
        let _ = other;
        false
    }
}

/// Writes through a forward cursor, one position per value.
#[derive(Debug, Clone)]
pub struct Overwrite<C> {
    cursor: C,
}

/// Wraps a writable cursor so it can be handed to output algorithms.
#[must_use]
pub fn overwrite<C: ForwardCursor>(cursor: C) -> Overwrite<C> {
    Overwrite { cursor }
}

impl<C> Overwrite<C> {
    /// The wrapped cursor at its current position.
    pub fn into_inner(self) -> C {
        self.cursor
    }

    pub fn get_ref(&self) -> &C {
        &self.cursor
    }
}

#[capability(concepts::OutputCursor)]
impl<C: ForwardCursor> OutputCursor for Overwrite<C> {
    type Item = C::Item;

    fn set(&mut self, value: C::Item) -> Result<()> {
        self.cursor.set_value(value)
    }

    fn step(&mut self) -> Result<()> {
        self.cursor.step()
    }
}

impl<C: ForwardCursor + 'static> Composed for Overwrite<C> {
    fn compose(composer: &mut Composer<Self>) -> Result<(), CompositionError> {
        composer.implement::<concepts::OutputCursor>()?;
        Ok(())
    }
}
