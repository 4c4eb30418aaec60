//! Index-addressed stores and their cursor.
//!
//! [`IndexCursor`] is the one cursor type behind `Vector`, `Deque` and (by
//! delegation) `ByteBuffer`. Its position token is a plain index; validity is
//! guarded by the store generation.

use std::collections::VecDeque;

use super::handle::{Shared, StoreRef};
use super::{BidirectionalCursor, ForwardCursor, IndexableCursor};
use crate::concept::{Composed, Composer};
use crate::concepts;
use crate::error::{CompositionError, CursorError, Result, Violation};
use macros::capability;

// =============================================================================
// Store Traits
// =============================================================================

/// Random-access storage a cursor can address by index.
pub trait IndexedStore: 'static {
    type Item: Clone;

    /// Logical number of elements.
    fn length(&self) -> usize;

    fn fetch(&self, index: usize) -> Option<Self::Item>;

    /// Overwrites an existing element; `false` when `index` is out of range.
    fn assign(&mut self, index: usize, value: Self::Item) -> bool;
}

/// Indexed storage that can also grow and shrink at either end.
pub trait ElementStore: IndexedStore {
    fn push_back(&mut self, value: Self::Item);
    fn pop_back(&mut self) -> Option<Self::Item>;
    fn push_front(&mut self, value: Self::Item);
    fn pop_front(&mut self) -> Option<Self::Item>;
    /// `index <= length()`.
    fn insert_at(&mut self, index: usize, value: Self::Item);
    fn remove_at(&mut self, index: usize) -> Option<Self::Item>;
    fn clear_all(&mut self);
}

impl<T: Clone + 'static> IndexedStore for Vec<T> {
    type Item = T;

    fn length(&self) -> usize {
        self.len()
    }

    fn fetch(&self, index: usize) -> Option<T> {
        self.get(index).cloned()
    }

    fn assign(&mut self, index: usize, value: T) -> bool {
        match self.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}

impl<T: Clone + 'static> ElementStore for Vec<T> {
    fn push_back(&mut self, value: T) {
        self.push(value);
    }

    fn pop_back(&mut self) -> Option<T> {
        self.pop()
    }

    fn push_front(&mut self, value: T) {
        self.insert(0, value);
    }

    fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() { None } else { Some(self.remove(0)) }
    }

    fn insert_at(&mut self, index: usize, value: T) {
        self.insert(index, value);
    }

    fn remove_at(&mut self, index: usize) -> Option<T> {
        if index < self.len() { Some(self.remove(index)) } else { None }
    }

    fn clear_all(&mut self) {
        self.clear();
    }
}

impl<T: Clone + 'static> IndexedStore for VecDeque<T> {
    type Item = T;

    fn length(&self) -> usize {
        self.len()
    }

    fn fetch(&self, index: usize) -> Option<T> {
        self.get(index).cloned()
    }

    fn assign(&mut self, index: usize, value: T) -> bool {
        match self.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}

impl<T: Clone + 'static> ElementStore for VecDeque<T> {
    fn push_back(&mut self, value: T) {
        VecDeque::push_back(self, value);
    }

    fn pop_back(&mut self) -> Option<T> {
        VecDeque::pop_back(self)
    }

    fn push_front(&mut self, value: T) {
        VecDeque::push_front(self, value);
    }

    fn pop_front(&mut self) -> Option<T> {
        VecDeque::pop_front(self)
    }

    fn insert_at(&mut self, index: usize, value: T) {
        self.insert(index, value);
    }

    fn remove_at(&mut self, index: usize) -> Option<T> {
        self.remove(index)
    }

    fn clear_all(&mut self) {
        self.clear();
    }
}

// =============================================================================
// IndexCursor
// =============================================================================

pub(crate) fn signed(index: usize) -> isize {
    isize::try_from(index).unwrap_or(isize::MAX)
}

/// `index + offset`, or the out-of-bounds violation naming the target.
pub(crate) fn offset_index(index: usize, offset: isize, limit: usize, len: usize) -> Result<usize, Violation> {
    match index.checked_add_signed(offset) {
        Some(target) if target < limit => Ok(target),
        _ => Err(Violation::IndexOutOfBounds { index: signed(index).saturating_add(offset), len }),
    }
}

/// Cursor addressing an [`IndexedStore`] by position.
pub struct IndexCursor<S> {
    store: StoreRef<S>,
    index: usize,
}

impl<S: IndexedStore> IndexCursor<S> {
    pub(crate) fn new(store: &Shared<S>, index: usize) -> Self {
        Self { store: StoreRef::new(store), index }
    }

    pub(crate) fn handle(&self) -> &StoreRef<S> {
        &self.store
    }

    fn len(&self, operation: &'static str) -> Result<usize> {
        self.store.read(operation, |store| Ok(store.length()))
    }

    fn target(&self, offset: isize, operation: &'static str) -> Result<usize> {
        let len = self.len(operation)?;
        offset_index(self.index, offset, len, len)
            .map_err(|violation| CursorError::precondition(operation, violation))
    }
}

impl<S> Clone for IndexCursor<S> {
    fn clone(&self) -> Self {
        Self { store: self.store.clone(), index: self.index }
    }
}

impl<S> core::fmt::Debug for IndexCursor<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IndexCursor").field("index", &self.index).finish()
    }
}

#[capability(concepts::ForwardCursor)]
impl<S: IndexedStore> ForwardCursor for IndexCursor<S> {
    type Item = S::Item;

    #[getter]
    fn value(&self) -> Result<S::Item> {
        self.store.read("value", |store| {
            store
                .fetch(self.index)
                .ok_or_else(|| CursorError::precondition("value", Violation::PastEnd))
        })
    }

    #[setter]
    fn set_value(&mut self, value: S::Item) -> Result<()> {
        let index = self.index;
        self.store.write("set_value", |store| {
            if store.assign(index, value) {
                Ok(())
            } else {
                Err(CursorError::precondition("set_value", Violation::PastEnd))
            }
        })
    }

    fn step(&mut self) -> Result<()> {
        if self.index >= self.len("step")? {
            return Err(CursorError::precondition("step", Violation::PastEnd));
        }
        self.index += 1;
        Ok(())
    }

    fn equals(&self, other: &Self) -> bool {
        self.store.same_store(&other.store) && self.index == other.index
    }
}

#[capability(concepts::BidirectionalCursor)]
impl<S: IndexedStore> BidirectionalCursor for IndexCursor<S> {
    fn step_back(&mut self) -> Result<()> {
        self.store.upgrade("step_back")?;
        if self.index == 0 {
            return Err(CursorError::precondition("step_back", Violation::BeforeBegin));
        }
        self.index -= 1;
        Ok(())
    }
}

#[capability(concepts::IndexableCursor)]
impl<S: IndexedStore> IndexableCursor for IndexCursor<S> {
    fn at(&self, offset: isize) -> Result<S::Item> {
        let target = self.target(offset, "at")?;
        self.store.read("at", |store| {
            store
                .fetch(target)
                .ok_or_else(|| CursorError::precondition("at", Violation::PastEnd))
        })
    }

    fn set_at(&mut self, offset: isize, value: S::Item) -> Result<()> {
        let target = self.target(offset, "set_at")?;
        self.store.write("set_at", |store| {
            store.assign(target, value);
            Ok(())
        })
    }

    #[getter]
    fn index(&self) -> usize {
        self.index
    }

    fn jump(&mut self, offset: isize) -> Result<()> {
        let len = self.len("jump")?;
        self.index = offset_index(self.index, offset, len + 1, len)
            .map_err(|violation| CursorError::precondition("jump", violation))?;
        Ok(())
    }
}

impl<S: IndexedStore> PartialEq for IndexCursor<S> {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl<S: IndexedStore> Composed for IndexCursor<S> {
    fn compose(composer: &mut Composer<Self>) -> Result<(), CompositionError> {
        composer
            .implement::<concepts::ForwardCursor>()?
            .implement::<concepts::BidirectionalCursor>()?
            .implement::<concepts::IndexableCursor>()?;
        Ok(())
    }
}
