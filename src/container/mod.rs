//! # Containers
//!
//! Containers own their elements and hand out cursors. Capability levels are
//! cumulative; each level fixes the capability of the cursor it produces.
//!
//! ```text
//! SequenceContainer ─┬─ PrologContainer                        ForwardList
//!                    └─ RewindContainer ─┬─ IndexableContainer  Vector, Deque
//!                                        │    └─ ContiguousContainer  ByteBuffer
//!                                        └─ SegmentContainer    Segmented
//! ```
//!
//! Operations a container does not support keep the trait's default body,
//! which fails with `Unsupported`, and are listed as stubs in its capability
//! bundle.

pub mod array;
pub mod bytes;
pub mod forward_list;
pub mod segment;

use crate::cursor::{
    BidirectionalCursor, ContiguousCursor, ForwardCursor, IndexableCursor, IntLayout,
};
use crate::error::{CursorError, Result};

pub use array::{Array, Deque, Vector};
pub use bytes::ByteBuffer;
pub use forward_list::{ForwardList, ListCursor};
pub use segment::{SegmentCursor, Segmented};

/// Owns a sequence and produces forward cursors over it.
pub trait SequenceContainer {
    type Item;
    type Cursor: ForwardCursor<Item = Self::Item>;

    fn begin(&self) -> Self::Cursor;

    /// One past the last element; never dereferenceable.
    fn end(&self) -> Self::Cursor;

    /// # Errors
    ///
    /// `EmptyContainer` when empty.
    fn front(&self) -> Result<Self::Item>;

    fn is_empty(&self) -> bool;

    /// Inserts at the front.
    ///
    /// # Errors
    ///
    /// `Unsupported` unless the container overrides it.
    fn unshift(&mut self, value: Self::Item) -> Result<()> {
        let _ = value;
        Err(CursorError::unsupported::<Self>("unshift"))
    }

    /// Removes the first element.
    ///
    /// # Errors
    ///
    /// `Unsupported` unless overridden, `EmptyContainer` when empty.
    fn shift(&mut self) -> Result<Self::Item> {
        Err(CursorError::unsupported::<Self>("shift"))
    }
}

/// Sequence with a position before its first element.
pub trait PrologContainer: SequenceContainer {
    /// Steps to `begin`; never dereferenceable.
    fn before_begin(&self) -> Self::Cursor;

    /// Inserts after `position` and returns a cursor to the new element.
    ///
    /// # Errors
    ///
    /// `PastEnd` when `position` is the end, or a stale/foreign cursor.
    fn insert_after(&mut self, position: &Self::Cursor, value: Self::Item) -> Result<Self::Cursor>;

    /// Removes the element after `position`.
    ///
    /// # Errors
    ///
    /// `PastEnd` when nothing follows `position`, or a stale/foreign cursor.
    fn erase_after(&mut self, position: &Self::Cursor) -> Result<Self::Item>;
}

/// Sequence with back-end push/pop and bidirectional cursors.
pub trait RewindContainer: SequenceContainer<Cursor: BidirectionalCursor> {
    /// # Errors
    ///
    /// `EmptyContainer` when empty.
    fn back(&self) -> Result<Self::Item>;

    /// # Errors
    ///
    /// Allocation failures of growable buffers.
    fn push(&mut self, value: Self::Item) -> Result<()>;

    /// # Errors
    ///
    /// `EmptyContainer` when empty.
    fn pop(&mut self) -> Result<Self::Item>;

    fn count(&self) -> usize;
}

/// Random-access container.
pub trait IndexableContainer: RewindContainer<Cursor: IndexableCursor> {
    /// # Errors
    ///
    /// `IndexOutOfBounds` unless `index < count()`.
    fn at(&self, index: usize) -> Result<Self::Item>;

    /// Overwrites in place; outstanding cursors stay valid.
    ///
    /// # Errors
    ///
    /// `IndexOutOfBounds` unless `index < count()`.
    fn set_at(&mut self, index: usize, value: Self::Item) -> Result<()>;

    /// Inserts before `index`; `index == count()` appends.
    ///
    /// # Errors
    ///
    /// `Unsupported` unless overridden, `IndexOutOfBounds` past the end.
    fn insert(&mut self, index: usize, value: Self::Item) -> Result<()> {
        let _ = (index, value);
        Err(CursorError::unsupported::<Self>("insert"))
    }

    /// # Errors
    ///
    /// `Unsupported` unless overridden, `IndexOutOfBounds` unless
    /// `index < count()`.
    fn remove(&mut self, index: usize) -> Result<Self::Item> {
        let _ = index;
        Err(CursorError::unsupported::<Self>("remove"))
    }
}

/// Growable byte buffer.
pub trait ContiguousContainer: IndexableContainer<Item = u8, Cursor: ContiguousCursor> {
    /// Allocated bytes, always `>= count()`.
    fn capacity(&self) -> usize;

    /// Reallocates to exactly `new_capacity` bytes, preserving content.
    ///
    /// The only operation that invalidates byte views. Atomic: on failure the
    /// old buffer is untouched.
    ///
    /// # Errors
    ///
    /// `ShrinkBelowLength`, `CapacityOverflow` or `BufferBorrowed`.
    fn expand(&mut self, new_capacity: usize) -> Result<()>;

    /// # Errors
    ///
    /// `UnsupportedWidth` or `OffsetOutOfBounds`.
    fn read_int(&self, offset: usize, layout: IntLayout) -> Result<i64>;

    /// Writes `value` at `offset`, growing the buffer when the write ends
    /// past the current length. `offset` may not lie past the end.
    ///
    /// # Errors
    ///
    /// `UnsupportedWidth`, `ValueOutOfRange` or `OffsetOutOfBounds`.
    fn write_int(&mut self, offset: usize, value: i64, layout: IntLayout) -> Result<()>;
}

/// Container of sub-containers presenting one logical sequence.
pub trait SegmentContainer: RewindContainer {
    fn segment_count(&self) -> usize;

    /// # Errors
    ///
    /// `IndexOutOfBounds` unless `segment < segment_count()`.
    fn segment_len(&self, segment: usize) -> Result<usize>;
}
