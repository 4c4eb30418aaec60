//! Raw byte storage, byte cursors and zero-copy byte views.
//!
//! Cursors hold byte offsets. They survive `expand`, but appends bump the
//! store generation and stale them. A [`ByteView`] remembers the allocation
//! epoch it was taken in and fails once the buffer has been reallocated.

use std::cell::Ref;
use std::ops::Range;

use super::handle::{borrow, Shared};
use super::index::{IndexCursor, IndexedStore};
use super::{BidirectionalCursor, ContiguousCursor, ForwardCursor, IndexableCursor, IntLayout};
use crate::concept::{Composed, Composer};
use crate::concepts;
use crate::error::{CompositionError, CursorError, Result, Violation};
use macros::capability;

// =============================================================================
// RawBytes
// =============================================================================

/// A fixed allocation with a logical length.
#[derive(Debug, Clone, Default)]
pub struct RawBytes {
    bytes: Box<[u8]>,
    len: usize,
    epoch: u64,
}

impl RawBytes {
    pub(crate) fn empty() -> Self {
        Self { bytes: Box::default(), len: 0, epoch: 0 }
    }

    pub(crate) fn from_vec(bytes: Vec<u8>) -> Self {
        let len = bytes.len();
        Self { bytes: bytes.into_boxed_slice(), len, epoch: 0 }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Result<Self, Violation> {
        Ok(Self { bytes: allocate(capacity, &[])?, len: 0, epoch: 0 })
    }

    pub(crate) fn capacity(&self) -> usize {
        self.bytes.len()
    }

    pub(crate) fn epoch(&self) -> u64 {
        self.epoch
    }

    /// The written bytes.
    pub(crate) fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Swaps in a fresh allocation of exactly `capacity` bytes.
    ///
    /// Allocation and copy happen before the swap, so on error `self` is
    /// untouched.
    pub(crate) fn reallocate(&mut self, capacity: usize) -> Result<(), Violation> {
        if capacity < self.len {
            return Err(Violation::ShrinkBelowLength { requested: capacity, len: self.len });
        }
        self.bytes = allocate(capacity, self.as_slice())?;
        self.epoch += 1;
        Ok(())
    }

    /// Appends one byte; the caller grows the allocation first.
    pub(crate) fn push(&mut self, byte: u8) -> Result<(), Violation> {
        let slot = self
            .bytes
            .get_mut(self.len)
            .ok_or(Violation::CapacityOverflow { requested: self.len + 1 })?;
        *slot = byte;
        self.len += 1;
        Ok(())
    }

    pub(crate) fn pop(&mut self) -> Option<u8> {
        let last = self.len.checked_sub(1)?;
        self.len = last;
        Some(self.bytes[last])
    }

    pub(crate) fn truncate(&mut self) {
        self.len = 0;
    }

    /// Runs `write` over the allocation prefix ending at `offset + width`,
    /// then extends the logical length to cover the span. The span must start
    /// at or before the end and fit the allocation; nothing changes on error.
    pub(crate) fn write_span(
        &mut self,
        offset: usize,
        width: usize,
        operation: &'static str,
        write: impl FnOnce(&mut [u8]) -> Result<()>,
    ) -> Result<()> {
        let len = self.len;
        let end = offset
            .checked_add(width)
            .filter(|&end| offset <= len && end <= self.bytes.len())
            .ok_or_else(|| {
                CursorError::precondition(operation, Violation::OffsetOutOfBounds { offset, width, len })
            })?;
        write(&mut self.bytes[..end])?;
        self.len = len.max(end);
        Ok(())
    }
}

fn allocate(capacity: usize, prefix: &[u8]) -> Result<Box<[u8]>, Violation> {
    let mut fresh = Vec::new();
    fresh
        .try_reserve_exact(capacity)
        .map_err(|_| Violation::CapacityOverflow { requested: capacity })?;
    fresh.extend_from_slice(prefix);
    fresh.resize(capacity, 0);
    Ok(fresh.into_boxed_slice())
}

impl IndexedStore for RawBytes {
    type Item = u8;

    fn length(&self) -> usize {
        self.len
    }

    fn fetch(&self, index: usize) -> Option<u8> {
        self.as_slice().get(index).copied()
    }

    fn assign(&mut self, index: usize, value: u8) -> bool {
        match self.bytes[..self.len].get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}

// =============================================================================
// ByteView
// =============================================================================

/// Zero-copy view of a byte range, valid until the buffer is reallocated.
#[derive(Debug, Clone)]
pub struct ByteView {
    store: Shared<RawBytes>,
    epoch: u64,
    range: Range<usize>,
}

impl ByteView {
    #[must_use]
    pub fn len(&self) -> usize {
        self.range.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// Borrows the viewed bytes.
    ///
    /// While the returned guard lives, operations that mutate the buffer fail
    /// with `BufferBorrowed`.
    ///
    /// # Errors
    ///
    /// `StaleCursor` after the buffer was reallocated, `ContainerReleased`
    /// after it was dropped.
    pub fn bytes(&self) -> Result<Ref<'_, [u8]>> {
        if self.store.is_released() {
            return Err(CursorError::precondition("bytes", Violation::ContainerReleased));
        }
        let tracked = borrow(&self.store, "bytes")?;
        if tracked.data.epoch != self.epoch {
            return Err(CursorError::precondition("bytes", Violation::StaleCursor));
        }
        let range = self.range.clone();
        Ok(Ref::map(tracked, |tracked| &tracked.data.bytes[range]))
    }

    /// Copies the viewed bytes out.
    ///
    /// # Errors
    ///
    /// As [`bytes`](Self::bytes).
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        Ok(self.bytes()?.to_vec())
    }
}

// =============================================================================
// ByteCursor
// =============================================================================

/// Contiguous cursor over a byte buffer.
#[derive(Debug, Clone)]
pub struct ByteCursor {
    inner: IndexCursor<RawBytes>,
}

impl ByteCursor {
    pub(crate) fn new(store: &Shared<RawBytes>, index: usize) -> Self {
        Self { inner: IndexCursor::new(store, index) }
    }
}

#[capability(concepts::ForwardCursor)]
impl ForwardCursor for ByteCursor {
    type Item = u8;

    #[getter]
    fn value(&self) -> Result<u8> {
        self.inner.value()
    }

    #[setter]
    fn set_value(&mut self, value: u8) -> Result<()> {
        self.inner.set_value(value)
    }

    fn step(&mut self) -> Result<()> {
        self.inner.step()
    }

    fn equals(&self, other: &Self) -> bool {
        self.inner.equals(&other.inner)
    }
}

#[capability(concepts::BidirectionalCursor)]
impl BidirectionalCursor for ByteCursor {
    fn step_back(&mut self) -> Result<()> {
        self.inner.step_back()
    }
}

#[capability(concepts::IndexableCursor)]
impl IndexableCursor for ByteCursor {
    fn at(&self, offset: isize) -> Result<u8> {
        self.inner.at(offset)
    }

    fn set_at(&mut self, offset: isize, value: u8) -> Result<()> {
        self.inner.set_at(offset, value)
    }

    #[getter]
    fn index(&self) -> usize {
        self.inner.index()
    }

    fn jump(&mut self, offset: isize) -> Result<()> {
        self.inner.jump(offset)
    }
}

#[capability(concepts::ContiguousCursor)]
impl ContiguousCursor for ByteCursor {
    fn read_at(&self, offset: usize, layout: IntLayout) -> Result<i64> {
        let index = self.inner.index();
        let start = index.checked_add(offset).ok_or_else(|| {
            CursorError::precondition(
                "read_at",
                Violation::OffsetOutOfBounds { offset, width: layout.byte_length, len: index },
            )
        })?;
        self.inner
            .handle()
            .read("read_at", |raw| layout.decode(raw.as_slice(), start, "read_at"))
    }

    fn data(&self, other: &Self) -> Result<ByteView> {
        let handle = self.inner.handle();
        handle.ensure_same(other.inner.handle(), "data")?;
        other.inner.handle().upgrade("data")?;
        let store = handle.upgrade("data")?;

        let (start, end) = (self.inner.index(), other.inner.index());
        if end < start {
            return Err(CursorError::precondition("data", Violation::Unreachable));
        }
        let epoch = borrow(&store, "data")?.data.epoch;
        Ok(ByteView { store, epoch, range: start..end })
    }
}

impl PartialEq for ByteCursor {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Composed for ByteCursor {
    fn compose(composer: &mut Composer<Self>) -> Result<(), CompositionError> {
        composer
            .implement::<concepts::ForwardCursor>()?
            .implement::<concepts::BidirectionalCursor>()?
            .implement::<concepts::IndexableCursor>()?
            .implement::<concepts::ContiguousCursor>()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::handle::shared;

    fn filled(bytes: &[u8]) -> Shared<RawBytes> {
        let mut raw = RawBytes::with_capacity(8).unwrap();
        for &byte in bytes {
            raw.push(byte).unwrap();
        }
        shared(raw)
    }

    #[test]
    fn reallocate_preserves_bytes_and_bumps_epoch() {
        let mut raw = RawBytes::with_capacity(2).unwrap();
        raw.push(7).unwrap();
        raw.push(9).unwrap();
        assert!(raw.push(1).is_err());
        raw.reallocate(4).unwrap();
        assert_eq!(raw.as_slice(), &[7, 9]);
        assert_eq!(raw.capacity(), 4);
        assert_eq!(raw.epoch(), 1);
        assert_eq!(
            raw.reallocate(1).unwrap_err(),
            Violation::ShrinkBelowLength { requested: 1, len: 2 }
        );
        assert_eq!(raw.capacity(), 4);
    }

    #[test]
    fn write_span_extends_from_the_end_only() {
        let mut raw = RawBytes::with_capacity(8).unwrap();
        raw.write_span(0, 4, "w", |bytes| {
            bytes.copy_from_slice(&[1; 4]);
            Ok(())
        })
        .unwrap();
        assert_eq!(raw.length(), 4);
        assert!(raw.write_span(5, 1, "w", |_| Ok(())).is_err());
        assert!(raw.write_span(6, 4, "w", |_| Ok(())).is_err());
    }

    #[test]
    fn failed_write_leaves_length_alone() {
        let mut raw = RawBytes::with_capacity(8).unwrap();
        let err = raw
            .write_span(0, 1, "w", |bytes| IntLayout::U8.encode(bytes, 0, 300, "w"))
            .unwrap_err();
        assert_eq!(err.violation(), Some(&Violation::ValueOutOfRange { value: 300, width: 1 }));
        assert_eq!(raw.length(), 0);
    }

    #[test]
    fn read_at_is_relative_to_the_cursor() {
        let store = filled(&[0xaa, 0x01, 0x02, 0x03, 0x04]);
        let cursor = ByteCursor::new(&store, 1);
        assert_eq!(cursor.read_at(0, IntLayout::U32_BE).unwrap(), 0x0102_0304);
        assert_eq!(cursor.read_at(2, IntLayout::U16_LE).unwrap(), 0x0403);
        let err = cursor.read_at(2, IntLayout::U32_LE).unwrap_err();
        assert_eq!(
            err.violation(),
            Some(&Violation::OffsetOutOfBounds { offset: 3, width: 4, len: 5 })
        );
    }

    #[test]
    fn view_covers_range_between_cursors() {
        let store = filled(&[1, 2, 3, 4]);
        let first = ByteCursor::new(&store, 1);
        let last = ByteCursor::new(&store, 3);
        let view = first.data(&last).unwrap();
        assert_eq!(view.len(), 2);
        assert_eq!(&*view.bytes().unwrap(), &[2, 3]);
        assert_eq!(
            last.data(&first).unwrap_err().violation(),
            Some(&Violation::Unreachable)
        );
    }

    #[test]
    fn view_goes_stale_after_reallocation() {
        let store = filled(&[1, 2]);
        let begin = ByteCursor::new(&store, 0);
        let end = ByteCursor::new(&store, 2);
        let view = begin.data(&end).unwrap();
        store.borrow_mut().data.reallocate(16).unwrap();
        assert_eq!(view.bytes().unwrap_err().violation(), Some(&Violation::StaleCursor));
        assert_eq!(begin.value().unwrap(), 1);
    }

    #[test]
    fn foreign_cursors_cannot_form_a_view() {
        let a = filled(&[1]);
        let b = filled(&[1]);
        let err = ByteCursor::new(&a, 0).data(&ByteCursor::new(&b, 1)).unwrap_err();
        assert_eq!(err.violation(), Some(&Violation::ForeignCursor));
    }
}
