//! Growable contiguous byte buffer.

use std::fmt;

use tracing::debug;

use super::{ContiguousContainer, IndexableContainer, RewindContainer, SequenceContainer};
use crate::concept::{Composed, Composer};
use crate::concepts;
use crate::config::BufferConfig;
use crate::cursor::handle::{borrow, borrow_mut, shared, Shared, Tracked};
use crate::cursor::index::signed;
use crate::cursor::{ByteCursor, IndexedStore, IntLayout, RawBytes};
use crate::error::{CursorError, CompositionError, Result, Violation};
use macros::capability;

/// Byte buffer whose capacity grows by the configured factor on overflow.
///
/// Cursors hold byte offsets and survive `expand`; appends stale them.
/// [`ByteView`]s survive appends that fit the capacity but not reallocation.
///
/// [`ByteView`]: crate::cursor::ByteView
pub struct ByteBuffer {
    store: Shared<RawBytes>,
    config: BufferConfig,
}

impl ByteBuffer {
    /// Empty buffer with the default policy; nothing is allocated until the
    /// first write.
    #[must_use]
    pub fn new() -> Self {
        Self { store: shared(RawBytes::empty()), config: BufferConfig::default() }
    }

    /// Allocates `config.initial_capacity` bytes up front.
    ///
    /// # Errors
    ///
    /// `CapacityOverflow` when the allocation fails.
    pub fn with_config(config: BufferConfig) -> Result<Self> {
        let raw = RawBytes::with_capacity(config.initial_capacity)
            .map_err(|violation| CursorError::precondition("with_config", violation))?;
        Ok(Self { store: shared(raw), config })
    }

    /// # Errors
    ///
    /// `CapacityOverflow` when the allocation fails.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::with_config(BufferConfig { initial_capacity: capacity, ..BufferConfig::default() })
    }

    #[must_use]
    pub fn config(&self) -> &BufferConfig {
        &self.config
    }

    /// Copy of the written bytes.
    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        self.store.borrow().data.as_slice().to_vec()
    }

    /// Forgets every byte; capacity is kept.
    ///
    /// # Errors
    ///
    /// `BufferBorrowed` while a view guard is alive.
    pub fn clear(&mut self) -> Result<()> {
        let mut tracked = borrow_mut(&self.store, "clear")?;
        tracked.data.truncate();
        tracked.invalidate();
        Ok(())
    }

    /// Appends `bytes`, growing at most once.
    ///
    /// # Errors
    ///
    /// `CapacityOverflow` or `BufferBorrowed`.
    pub fn extend_from_slice(&mut self, bytes: &[u8]) -> Result<()> {
        let mut tracked = borrow_mut(&self.store, "extend_from_slice")?;
        let required = tracked.data.length().saturating_add(bytes.len());
        self.reserve(&mut tracked, required, "extend_from_slice")?;
        for &byte in bytes {
            tracked
                .data
                .push(byte)
                .map_err(|violation| CursorError::precondition("extend_from_slice", violation))?;
        }
        tracked.invalidate();
        Ok(())
    }

    /// Grows per policy until `required` bytes fit.
    fn reserve(&self, tracked: &mut Tracked<RawBytes>, required: usize, operation: &'static str) -> Result<()> {
        let capacity = tracked.data.capacity();
        if required <= capacity {
            return Ok(());
        }
        let base = capacity.max(self.config.initial_capacity);
        let target = self.config.grown_capacity(base, required);
        tracked
            .data
            .reallocate(target)
            .map_err(|violation| CursorError::precondition(operation, violation))?;
        debug!(from = capacity, to = target, epoch = tracked.data.epoch(), "grew byte buffer");
        Ok(())
    }

    /// Frees the allocation. Cursors and views fail with `ContainerReleased`
    /// afterwards, even when a view guard is still alive.
    pub fn release(self) {
        let capacity = self.capacity();
        self.store.release();
        debug!(capacity, "released byte buffer");
    }

    fn read<R>(&self, operation: &'static str, f: impl FnOnce(&RawBytes) -> Result<R>) -> Result<R> {
        let tracked = borrow(&self.store, operation)?;
        f(&tracked.data)
    }

    fn len(&self) -> usize {
        self.store.borrow().data.length()
    }
}

impl Default for ByteBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ByteBuffer {
    fn clone(&self) -> Self {
        Self { store: shared(self.store.borrow().data.clone()), config: self.config }
    }
}

impl Drop for ByteBuffer {
    /// Live views hold the storage; releasing makes them fail.
    fn drop(&mut self) {
        self.store.release();
    }
}

impl fmt::Debug for ByteBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.store.try_borrow() {
            Ok(tracked) => f
                .debug_struct("ByteBuffer")
                .field("len", &tracked.data.length())
                .field("capacity", &tracked.data.capacity())
                .field("bytes", &tracked.data.as_slice())
                .finish(),
            Err(_) => f.write_str("ByteBuffer(<borrowed>)"),
        }
    }
}

impl From<&[u8]> for ByteBuffer {
    fn from(bytes: &[u8]) -> Self {
        bytes.iter().copied().collect()
    }
}

impl FromIterator<u8> for ByteBuffer {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        Self {
            store: shared(RawBytes::from_vec(iter.into_iter().collect())),
            config: BufferConfig::default(),
        }
    }
}

#[capability(concepts::SequenceContainer, stubs(unshift, shift))]
impl SequenceContainer for ByteBuffer {
    type Item = u8;
    type Cursor = ByteCursor;

    fn begin(&self) -> ByteCursor {
        ByteCursor::new(&self.store, 0)
    }

    fn end(&self) -> ByteCursor {
        ByteCursor::new(&self.store, self.len())
    }

    #[getter]
    fn front(&self) -> Result<u8> {
        self.read("front", |raw| raw.fetch(0).ok_or_else(|| CursorError::empty("front")))
    }

    #[getter]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[capability(concepts::RewindContainer)]
impl RewindContainer for ByteBuffer {
    #[getter]
    fn back(&self) -> Result<u8> {
        self.read("back", |raw| {
            raw.as_slice().last().copied().ok_or_else(|| CursorError::empty("back"))
        })
    }

    fn push(&mut self, value: u8) -> Result<()> {
        let mut tracked = borrow_mut(&self.store, "push")?;
        let required = tracked.data.length().saturating_add(1);
        self.reserve(&mut tracked, required, "push")?;
        tracked
            .data
            .push(value)
            .map_err(|violation| CursorError::precondition("push", violation))?;
        tracked.invalidate();
        Ok(())
    }

    fn pop(&mut self) -> Result<u8> {
        let mut tracked = borrow_mut(&self.store, "pop")?;
        let byte = tracked.data.pop().ok_or_else(|| CursorError::empty("pop"))?;
        tracked.invalidate();
        Ok(byte)
    }

    #[getter]
    fn count(&self) -> usize {
        self.len()
    }
}

#[capability(concepts::IndexableContainer, stubs(insert, remove))]
impl IndexableContainer for ByteBuffer {
    fn at(&self, index: usize) -> Result<u8> {
        self.read("at", |raw| {
            raw.fetch(index).ok_or_else(|| {
                CursorError::precondition(
                    "at",
                    Violation::IndexOutOfBounds { index: signed(index), len: raw.length() },
                )
            })
        })
    }

    fn set_at(&mut self, index: usize, value: u8) -> Result<()> {
        let mut tracked = borrow_mut(&self.store, "set_at")?;
        let len = tracked.data.length();
        if tracked.data.assign(index, value) {
            Ok(())
        } else {
            Err(CursorError::precondition(
                "set_at",
                Violation::IndexOutOfBounds { index: signed(index), len },
            ))
        }
    }
}

#[capability(concepts::ContiguousContainer)]
impl ContiguousContainer for ByteBuffer {
    #[getter]
    fn capacity(&self) -> usize {
        self.store.borrow().data.capacity()
    }

    fn expand(&mut self, new_capacity: usize) -> Result<()> {
        let mut tracked = borrow_mut(&self.store, "expand")?;
        let (capacity, len) = (tracked.data.capacity(), tracked.data.length());
        if new_capacity < len {
            return Err(CursorError::precondition(
                "expand",
                Violation::ShrinkBelowLength { requested: new_capacity, len },
            ));
        }
        if new_capacity <= capacity {
            return Ok(());
        }
        tracked
            .data
            .reallocate(new_capacity)
            .map_err(|violation| CursorError::precondition("expand", violation))?;
        debug!(from = capacity, to = new_capacity, epoch = tracked.data.epoch(), "expanded byte buffer");
        Ok(())
    }

    fn read_int(&self, offset: usize, layout: IntLayout) -> Result<i64> {
        self.read("read_int", |raw| layout.decode(raw.as_slice(), offset, "read_int"))
    }

    fn write_int(&mut self, offset: usize, value: i64, layout: IntLayout) -> Result<()> {
        let width = layout.fits(value, "write_int")?;
        let mut tracked = borrow_mut(&self.store, "write_int")?;
        let len = tracked.data.length();
        let end = offset
            .checked_add(width)
            .filter(|_| offset <= len)
            .ok_or_else(|| {
                CursorError::precondition("write_int", Violation::OffsetOutOfBounds { offset, width, len })
            })?;
        self.reserve(&mut tracked, end, "write_int")?;
        tracked.data.write_span(offset, width, "write_int", |bytes| {
            layout.encode(bytes, offset, value, "write_int")
        })?;
        if end > len {
            tracked.invalidate();
        }
        Ok(())
    }
}

impl Composed for ByteBuffer {
    fn compose(composer: &mut Composer<Self>) -> Result<(), CompositionError> {
        composer
            .implement::<concepts::SequenceContainer>()?
            .implement::<concepts::RewindContainer>()?
            .implement::<concepts::IndexableContainer>()?
            .implement::<concepts::ContiguousContainer>()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concept::{shape_of, MemberDecl};
    use crate::cursor::{ContiguousCursor, ForwardCursor};

    #[test]
    fn u32_round_trip_survives_growth() {
        let mut buffer = ByteBuffer::with_capacity(4).unwrap();
        buffer.write_int(0, 0x0102_0304, IntLayout::U32_LE).unwrap();
        assert_eq!(buffer.read_int(0, IntLayout::U32_LE).unwrap(), 16_909_060);

        for byte in 0..32u8 {
            buffer.push(byte).unwrap();
        }
        assert!(buffer.capacity() >= 36);
        assert_eq!(buffer.read_int(0, IntLayout::U32_LE).unwrap(), 16_909_060);
        assert_eq!(buffer.to_vec()[..4], [4, 3, 2, 1]);
    }

    #[test]
    fn growth_follows_policy() {
        let config = BufferConfig { initial_capacity: 2, growth_factor: 3 };
        let mut buffer = ByteBuffer::with_config(config).unwrap();
        buffer.extend_from_slice(&[1, 2, 3]).unwrap();
        assert_eq!(buffer.capacity(), 6);
        buffer.extend_from_slice(&[0; 4]).unwrap();
        assert_eq!(buffer.capacity(), 18);
    }

    #[test]
    fn expand_stales_views_but_not_cursors() {
        let mut buffer = ByteBuffer::from(&[9u8, 8, 7][..]);
        let begin = buffer.begin();
        let view = begin.data(&buffer.end()).unwrap();
        assert_eq!(view.to_vec().unwrap(), vec![9, 8, 7]);

        buffer.expand(64).unwrap();
        assert_eq!(view.bytes().unwrap_err().violation(), Some(&Violation::StaleCursor));
        assert_eq!(begin.value().unwrap(), 9);
        assert_eq!(buffer.capacity(), 64);
    }

    #[test]
    fn expand_refuses_to_drop_bytes() {
        let mut buffer = ByteBuffer::from(&[1u8, 2, 3][..]);
        let err = buffer.expand(2).unwrap_err();
        assert_eq!(err.violation(), Some(&Violation::ShrinkBelowLength { requested: 2, len: 3 }));
        buffer.expand(3).unwrap();
        assert_eq!(buffer.to_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn live_view_guard_blocks_mutation() {
        let mut buffer = ByteBuffer::from(&[1u8][..]);
        let view = buffer.begin().data(&buffer.end()).unwrap();
        let guard = view.bytes().unwrap();
        let err = buffer.push(2).unwrap_err();
        assert_eq!(err.violation(), Some(&Violation::BufferBorrowed));
        drop(guard);
        buffer.push(2).unwrap();
    }

    #[test]
    fn dropping_the_buffer_releases_views() {
        let buffer = ByteBuffer::from(&[1u8, 2][..]);
        let view = buffer.begin().data(&buffer.end()).unwrap();
        drop(buffer);
        assert_eq!(view.bytes().unwrap_err().violation(), Some(&Violation::ContainerReleased));
    }

    #[test]
    fn dropping_under_a_view_guard_still_releases() {
        let buffer = ByteBuffer::from(&[1u8, 2, 3][..]);
        let cursor = buffer.begin();
        let view = buffer.begin().data(&buffer.end()).unwrap();
        let guard = view.bytes().unwrap();
        drop(buffer);
        assert_eq!(&*guard, &[1, 2, 3]);
        drop(guard);

        assert_eq!(cursor.value().unwrap_err().violation(), Some(&Violation::ContainerReleased));
        assert_eq!(view.to_vec().unwrap_err().violation(), Some(&Violation::ContainerReleased));
    }

    #[test]
    fn write_int_cannot_leave_a_gap() {
        let mut buffer = ByteBuffer::new();
        let err = buffer.write_int(1, 5, IntLayout::U8).unwrap_err();
        assert_eq!(err.violation(), Some(&Violation::OffsetOutOfBounds { offset: 1, width: 1, len: 0 }));
        buffer.write_int(0, -1, IntLayout::I16_BE).unwrap();
        assert_eq!(buffer.to_vec(), vec![0xff, 0xff]);
        assert_eq!(buffer.capacity(), 16);
    }

    #[test]
    fn front_operations_are_stubs() {
        let mut buffer = ByteBuffer::new();
        assert!(matches!(buffer.unshift(1).unwrap_err(), CursorError::Unsupported { operation: "unshift", .. }));
        assert!(matches!(buffer.remove(0).unwrap_err(), CursorError::Unsupported { operation: "remove", .. }));

        let shape = shape_of::<ByteBuffer>().unwrap();
        assert!(shape.is_stub(&MemberDecl::method("shift")));
        assert!(shape.is_stub(&MemberDecl::method("insert")));
        assert!(!shape.is_stub(&MemberDecl::method("push")));
    }
}
