//! Index-addressed containers: [`Vector`] and [`Deque`].
//!
//! Both are one generic [`Array`] over an [`ElementStore`]. `Vector` is
//! `Vec` backed (front insertion is O(n)); `Deque` is a growable ring buffer
//! with O(1) work at both ends.

use std::collections::VecDeque;
use std::fmt;

use tracing::debug;

use super::{IndexableContainer, RewindContainer, SequenceContainer};
use crate::concept::{Composed, Composer};
use crate::concepts;
use crate::cursor::handle::{borrow, borrow_mut, shared, Shared};
use crate::cursor::index::signed;
use crate::cursor::{ElementStore, IndexCursor};
use crate::error::{CompositionError, CursorError, Result, Violation};
use macros::capability;

/// Random-access container over an element store.
pub struct Array<S> {
    pub(crate) store: Shared<S>,
}

/// `Vec` backed indexable container.
pub type Vector<T> = Array<Vec<T>>;

/// Ring-buffer backed indexable container.
pub type Deque<T> = Array<VecDeque<T>>;

impl<S: ElementStore + Default> Array<S> {
    #[must_use]
    pub fn new() -> Self {
        Self { store: shared(S::default()) }
    }

    /// Frees the elements; cursors fail with `ContainerReleased` afterwards.
    pub fn release(self) {
        let released = self.len();
        self.store.release();
        debug!(released, "released array");
    }
}

impl<S: ElementStore> Array<S> {
    /// Removes every element and invalidates every cursor.
    ///
    /// # Errors
    ///
    /// `BufferBorrowed` while the store is borrowed.
    pub fn clear(&mut self) -> Result<()> {
        let removed = self.mutate("clear", |store| {
            let removed = store.length();
            store.clear_all();
            Ok(removed)
        })?;
        debug!(removed, "cleared array");
        Ok(())
    }

    /// Snapshot of the elements in order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<S::Item> {
        let tracked = self.store.borrow();
        (0..tracked.data.length()).filter_map(|i| tracked.data.fetch(i)).collect()
    }

    fn len(&self) -> usize {
        self.store.borrow().data.length()
    }

    pub(crate) fn read<R>(&self, operation: &'static str, f: impl FnOnce(&S) -> Result<R>) -> Result<R> {
        let tracked = borrow(&self.store, operation)?;
        f(&tracked.data)
    }

    /// Applies a position-moving mutation; bumps the generation on success.
    pub(crate) fn mutate<R>(&mut self, operation: &'static str, f: impl FnOnce(&mut S) -> Result<R>) -> Result<R> {
        let mut tracked = borrow_mut(&self.store, operation)?;
        let out = f(&mut tracked.data)?;
        tracked.invalidate();
        Ok(out)
    }
}

fn out_of_bounds(operation: &'static str, index: usize, len: usize) -> CursorError {
    CursorError::precondition(operation, Violation::IndexOutOfBounds { index: signed(index), len })
}

impl<S: ElementStore + Default> Default for Array<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ElementStore + Clone> Clone for Array<S> {
    /// Deep copy with a fresh store; cursors of `self` do not apply to it.
    fn clone(&self) -> Self {
        Self { store: shared(self.store.borrow().data.clone()) }
    }
}

impl<S: fmt::Debug> fmt::Debug for Array<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.store.try_borrow() {
            Ok(tracked) => f.debug_tuple("Array").field(&tracked.data).finish(),
            Err(_) => f.write_str("Array(<borrowed>)"),
        }
    }
}

impl<S> FromIterator<S::Item> for Array<S>
where
    S: ElementStore + FromIterator<S::Item>,
{
    fn from_iter<I: IntoIterator<Item = S::Item>>(iter: I) -> Self {
        Self { store: shared(iter.into_iter().collect()) }
    }
}

#[capability(concepts::SequenceContainer)]
impl<S: ElementStore> SequenceContainer for Array<S> {
    type Item = S::Item;
    type Cursor = IndexCursor<S>;

    fn begin(&self) -> IndexCursor<S> {
        IndexCursor::new(&self.store, 0)
    }

    fn end(&self) -> IndexCursor<S> {
        IndexCursor::new(&self.store, self.len())
    }

    #[getter]
    fn front(&self) -> Result<S::Item> {
        self.read("front", |store| store.fetch(0).ok_or_else(|| CursorError::empty("front")))
    }

    #[getter]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn unshift(&mut self, value: S::Item) -> Result<()> {
        self.mutate("unshift", |store| {
            store.push_front(value);
            Ok(())
        })
    }

    fn shift(&mut self) -> Result<S::Item> {
        self.mutate("shift", |store| store.pop_front().ok_or_else(|| CursorError::empty("shift")))
    }
}

#[capability(concepts::RewindContainer)]
impl<S: ElementStore> RewindContainer for Array<S> {
    #[getter]
    fn back(&self) -> Result<S::Item> {
        self.read("back", |store| {
            let last = store.length().checked_sub(1).ok_or_else(|| CursorError::empty("back"))?;
            store.fetch(last).ok_or_else(|| CursorError::empty("back"))
        })
    }

    fn push(&mut self, value: S::Item) -> Result<()> {
        self.mutate("push", |store| {
            store.push_back(value);
            Ok(())
        })
    }

    fn pop(&mut self) -> Result<S::Item> {
        self.mutate("pop", |store| store.pop_back().ok_or_else(|| CursorError::empty("pop")))
    }

    #[getter]
    fn count(&self) -> usize {
        self.len()
    }
}

#[capability(concepts::IndexableContainer)]
impl<S: ElementStore> IndexableContainer for Array<S> {
    fn at(&self, index: usize) -> Result<S::Item> {
        self.read("at", |store| {
            store.fetch(index).ok_or_else(|| out_of_bounds("at", index, store.length()))
        })
    }

    fn set_at(&mut self, index: usize, value: S::Item) -> Result<()> {
        let mut tracked = borrow_mut(&self.store, "set_at")?;
        let len = tracked.data.length();
        if tracked.data.assign(index, value) {
            Ok(())
        } else {
            Err(out_of_bounds("set_at", index, len))
        }
    }

    fn insert(&mut self, index: usize, value: S::Item) -> Result<()> {
        self.mutate("insert", |store| {
            let len = store.length();
            if index > len {
                return Err(out_of_bounds("insert", index, len));
            }
            store.insert_at(index, value);
            Ok(())
        })
    }

    fn remove(&mut self, index: usize) -> Result<S::Item> {
        self.mutate("remove", |store| {
            let len = store.length();
            store.remove_at(index).ok_or_else(|| out_of_bounds("remove", index, len))
        })
    }
}

impl<S: ElementStore> Composed for Array<S> {
    fn compose(composer: &mut Composer<Self>) -> Result<(), CompositionError> {
        composer
            .implement::<concepts::SequenceContainer>()?
            .implement::<concepts::RewindContainer>()?
            .implement::<concepts::IndexableContainer>()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::{BidirectionalCursor, ForwardCursor};

    #[test]
    fn empty_vector_reads_fail_with_empty_container() {
        let mut v: Vector<i32> = Vector::new();
        assert!(v.is_empty());
        assert_eq!(v.begin(), v.end());
        for err in [v.front().unwrap_err(), v.back().unwrap_err(), v.pop().unwrap_err(), v.shift().unwrap_err()] {
            assert!(matches!(err, CursorError::EmptyContainer { .. }), "{err}");
        }
    }

    #[test]
    fn deque_works_at_both_ends() {
        let mut d: Deque<i32> = Deque::new();
        d.push(2).unwrap();
        d.unshift(1).unwrap();
        d.push(3).unwrap();
        assert_eq!(d.to_vec(), vec![1, 2, 3]);
        assert_eq!(d.shift().unwrap(), 1);
        assert_eq!(d.pop().unwrap(), 3);
        assert_eq!(d.count(), 1);
    }

    #[test]
    fn structural_mutation_stales_cursors_but_set_at_does_not() {
        let mut v: Vector<i32> = [1, 2, 3].into_iter().collect();
        let cursor = v.begin();
        v.set_at(0, 10).unwrap();
        assert_eq!(cursor.value().unwrap(), 10);

        v.push(4).unwrap();
        let err = cursor.value().unwrap_err();
        assert_eq!(err.violation(), Some(&Violation::StaleCursor));
    }

    #[test]
    fn cursor_of_dropped_vector_reports_released() {
        let v: Vector<i32> = [1].into_iter().collect();
        let mut cursor = v.end();
        drop(v);
        let err = cursor.step_back().unwrap_err();
        assert_eq!(err.violation(), Some(&Violation::ContainerReleased));
    }

    #[test]
    fn insert_and_remove_check_bounds() {
        let mut v: Vector<char> = "ac".chars().collect();
        v.insert(1, 'b').unwrap();
        v.insert(3, 'd').unwrap();
        assert_eq!(v.to_vec(), vec!['a', 'b', 'c', 'd']);
        let err = v.insert(9, 'x').unwrap_err();
        assert_eq!(err.violation(), Some(&Violation::IndexOutOfBounds { index: 9, len: 4 }));
        assert_eq!(v.remove(0).unwrap(), 'a');
        let err = v.remove(3).unwrap_err();
        assert_eq!(err.violation(), Some(&Violation::IndexOutOfBounds { index: 3, len: 3 }));
    }

    #[test]
    fn clone_is_independent() {
        let v: Vector<i32> = [1, 2].into_iter().collect();
        let mut copy = v.clone();
        copy.push(3).unwrap();
        assert_eq!(v.count(), 2);
        assert!(!v.begin().equals(&copy.begin()));
    }

    #[test]
    fn vector_and_deque_compose_as_indexable() {
        assert!(crate::concept::conforms::<Vector<u8>, concepts::IndexableContainer>());
        assert!(crate::concept::conforms::<Deque<u8>, concepts::IndexableContainer>());
        assert!(!crate::concept::conforms::<Vector<u8>, concepts::ContiguousContainer>());
    }
}
