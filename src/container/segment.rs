//! Segmented container: a vector of vectors read as one sequence.
//!
//! `push` fills the last segment up to `segment_capacity` elements and then
//! starts a new one, so stored elements are never relocated by growth. Empty
//! segments never exist; `pop` drops a segment once it runs dry.

use std::fmt;

use tracing::debug;

use super::{IndexableContainer, RewindContainer, SegmentContainer, SequenceContainer, Vector};
use crate::concept::{Composed, Composer};
use crate::concepts;
use crate::config::SegmentConfig;
use crate::cursor::handle::StoreRef;
use crate::cursor::index::signed;
use crate::cursor::{BidirectionalCursor, ForwardCursor};
use crate::error::{CompositionError, CursorError, Result, Violation};
use macros::capability;

type Segments<T> = Vec<Vector<T>>;

// =============================================================================
// SegmentCursor
// =============================================================================

/// Bidirectional cursor over a [`Segmented`] container.
///
/// The end position is `(segment_count, 0)`.
pub struct SegmentCursor<T> {
    store: StoreRef<Segments<T>>,
    segment: usize,
    offset: usize,
}

impl<T> Clone for SegmentCursor<T> {
    fn clone(&self) -> Self {
        Self { store: self.store.clone(), segment: self.segment, offset: self.offset }
    }
}

impl<T> fmt::Debug for SegmentCursor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SegmentCursor")
            .field("segment", &self.segment)
            .field("offset", &self.offset)
            .finish()
    }
}

impl<T: Clone + 'static> SegmentCursor<T> {
    /// Segment this cursor points into, or `PastEnd` at the end.
    fn current<'a>(&self, segments: &'a Segments<T>, operation: &'static str) -> Result<&'a Vector<T>> {
        segments
            .get(self.segment)
            .ok_or_else(|| CursorError::precondition(operation, Violation::PastEnd))
    }
}

#[capability(concepts::ForwardCursor)]
impl<T: Clone + 'static> ForwardCursor for SegmentCursor<T> {
    type Item = T;

    #[getter]
    fn value(&self) -> Result<T> {
        self.store.read("value", |segments| self.current(segments, "value")?.at(self.offset))
    }

    #[setter]
    fn set_value(&mut self, value: T) -> Result<()> {
        let (segment, offset) = (self.segment, self.offset);
        self.store.write("set_value", |segments| {
            segments
                .get_mut(segment)
                .ok_or_else(|| CursorError::precondition("set_value", Violation::PastEnd))?
                .set_at(offset, value)
        })
    }

    fn step(&mut self) -> Result<()> {
        let len = self.store.read("step", |segments| Ok(self.current(segments, "step")?.count()))?;
        if self.offset + 1 < len {
            self.offset += 1;
        } else {
            self.segment += 1;
            self.offset = 0;
        }
        Ok(())
    }

    fn equals(&self, other: &Self) -> bool {
        self.store.same_store(&other.store) && self.segment == other.segment && self.offset == other.offset
    }
}

#[capability(concepts::BidirectionalCursor)]
impl<T: Clone + 'static> BidirectionalCursor for SegmentCursor<T> {
    fn step_back(&mut self) -> Result<()> {
        self.store.upgrade("step_back")?;
        if self.offset > 0 {
            self.offset -= 1;
            return Ok(());
        }
        let previous = self
            .segment
            .checked_sub(1)
            .ok_or_else(|| CursorError::precondition("step_back", Violation::BeforeBegin))?;
        let len = self.store.read("step_back", |segments| {
            segments
                .get(previous)
                .map(Vector::count)
                .ok_or_else(|| CursorError::precondition("step_back", Violation::StaleCursor))
        })?;
        self.segment = previous;
        self.offset = len.saturating_sub(1);
        Ok(())
    }
}

impl<T: Clone + 'static> PartialEq for SegmentCursor<T> {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl<T: Clone + 'static> Composed for SegmentCursor<T> {
    fn compose(composer: &mut Composer<Self>) -> Result<(), CompositionError> {
        composer
            .implement::<concepts::ForwardCursor>()?
            .implement::<concepts::BidirectionalCursor>()?;
        Ok(())
    }
}

// =============================================================================
// Segmented
// =============================================================================

/// Sequence stored as a [`Vector`] of fixed-capacity [`Vector`] segments.
pub struct Segmented<T> {
    segments: Vector<Vector<T>>,
    config: SegmentConfig,
}

impl<T: Clone + 'static> Segmented<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SegmentConfig::default())
    }

    /// A `segment_capacity` of zero is treated as one.
    #[must_use]
    pub fn with_config(config: SegmentConfig) -> Self {
        let config = SegmentConfig { segment_capacity: config.segment_capacity.max(1) };
        Self { segments: Vector::new(), config }
    }

    #[must_use]
    pub fn config(&self) -> &SegmentConfig {
        &self.config
    }

    /// Removes every element and invalidates every cursor.
    ///
    /// # Errors
    ///
    /// `BufferBorrowed` while the store is borrowed.
    pub fn clear(&mut self) -> Result<()> {
        self.segments.clear()
    }

    /// Snapshot of the elements in order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.inspect(|segments| segments.iter().flat_map(Vector::to_vec).collect())
    }

    /// Segment lengths in order.
    #[must_use]
    pub fn segment_lengths(&self) -> Vec<usize> {
        self.inspect(|segments| segments.iter().map(Vector::count).collect())
    }

    /// Frees every segment; cursors fail with `ContainerReleased` afterwards.
    pub fn release(self) {
        self.segments.release();
    }

    fn inspect<R>(&self, f: impl FnOnce(&Segments<T>) -> R) -> R {
        f(&self.segments.store.borrow().data)
    }

    fn cursor(&self, segment: usize) -> SegmentCursor<T> {
        SegmentCursor { store: StoreRef::new(&self.segments.store), segment, offset: 0 }
    }
}

impl<T: Clone + 'static> Default for Segmented<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> Clone for Segmented<T> {
    fn clone(&self) -> Self {
        Self { segments: self.segments.clone(), config: self.config }
    }
}

impl<T: Clone + fmt::Debug + 'static> fmt::Debug for Segmented<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Segmented")
            .field("segment_capacity", &self.config.segment_capacity)
            .field("segments", &self.segments)
            .finish()
    }
}

impl<T: Clone + 'static> FromIterator<T> for Segmented<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let config = SegmentConfig::default();
        let capacity = config.segment_capacity.max(1);
        let mut values = iter.into_iter().peekable();
        let mut segments: Segments<T> = Vec::new();
        while values.peek().is_some() {
            segments.push(values.by_ref().take(capacity).collect());
        }
        Self { segments: segments.into_iter().collect(), config }
    }
}

#[capability(concepts::SequenceContainer, stubs(unshift, shift))]
impl<T: Clone + 'static> SequenceContainer for Segmented<T> {
    type Item = T;
    type Cursor = SegmentCursor<T>;

    fn begin(&self) -> SegmentCursor<T> {
        self.cursor(0)
    }

    fn end(&self) -> SegmentCursor<T> {
        self.cursor(self.segments.count())
    }

    #[getter]
    fn front(&self) -> Result<T> {
        self.segments.read("front", |segments| match segments.first() {
            Some(segment) => segment.front(),
            None => Err(CursorError::empty("front")),
        })
    }

    #[getter]
    fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

#[capability(concepts::RewindContainer)]
impl<T: Clone + 'static> RewindContainer for Segmented<T> {
    #[getter]
    fn back(&self) -> Result<T> {
        self.segments.read("back", |segments| match segments.last() {
            Some(segment) => segment.back(),
            None => Err(CursorError::empty("back")),
        })
    }

    fn push(&mut self, value: T) -> Result<()> {
        let capacity = self.config.segment_capacity;
        let started = self.segments.mutate("push", |segments| {
            if let Some(last) = segments.last_mut().filter(|last| last.count() < capacity) {
                last.push(value)?;
                return Ok(false);
            }
            segments.push(std::iter::once(value).collect());
            Ok(true)
        })?;
        if started {
            debug!(segments = self.segments.count(), capacity, "started segment");
        }
        Ok(())
    }

    fn pop(&mut self) -> Result<T> {
        self.segments.mutate("pop", |segments| {
            let last = segments.last_mut().ok_or_else(|| CursorError::empty("pop"))?;
            let value = last.pop()?;
            if last.is_empty() {
                segments.pop();
            }
            Ok(value)
        })
    }

    #[getter]
    fn count(&self) -> usize {
        self.inspect(|segments| segments.iter().map(Vector::count).sum())
    }
}

#[capability(concepts::SegmentContainer)]
impl<T: Clone + 'static> SegmentContainer for Segmented<T> {
    #[getter]
    fn segment_count(&self) -> usize {
        self.segments.count()
    }

    fn segment_len(&self, segment: usize) -> Result<usize> {
        self.segments.read("segment_len", |segments| {
            segments.get(segment).map(Vector::count).ok_or_else(|| {
                CursorError::precondition(
                    "segment_len",
                    Violation::IndexOutOfBounds { index: signed(segment), len: segments.len() },
                )
            })
        })
    }
}

impl<T: Clone + 'static> Composed for Segmented<T> {
    fn compose(composer: &mut Composer<Self>) -> Result<(), CompositionError> {
        composer
            .implement::<concepts::SequenceContainer>()?
            .implement::<concepts::RewindContainer>()?
            .implement::<concepts::SegmentContainer>()?;
        Ok(())
    }
}
