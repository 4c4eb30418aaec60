//! Singly linked list over an arena.
//!
//! Nodes live in a `Vec` of slots addressed by index; slot 0 is the
//! before-begin sentinel. Each slot carries its own generation, so erasing a
//! node only stales the cursors that point at it.

use std::fmt;

use tracing::debug;

use super::{PrologContainer, SequenceContainer};
use crate::concept::{Composed, Composer};
use crate::concepts;
use crate::cursor::handle::{borrow, borrow_mut, shared, Shared, StoreRef};
use crate::cursor::ForwardCursor;
use crate::error::{CompositionError, CursorError, Result, Violation};
use macros::capability;

const HEAD: usize = 0;

#[derive(Debug, Clone)]
struct Slot<T> {
    value: Option<T>,
    next: Option<usize>,
    generation: u64,
}

/// Arena of list nodes.
#[derive(Debug, Clone)]
struct ListStore<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    len: usize,
}

impl<T> ListStore<T> {
    fn new() -> Self {
        Self {
            slots: vec![Slot { value: None, next: None, generation: 0 }],
            free: Vec::new(),
            len: 0,
        }
    }

    fn generation_of(&self, node: usize) -> u64 {
        self.slots.get(node).map_or(0, |slot| slot.generation)
    }

    fn next_of(&self, node: usize) -> Option<usize> {
        self.slots.get(node).and_then(|slot| slot.next)
    }

    /// Links a new node after `after`.
    fn link_after(&mut self, after: usize, value: T) -> usize {
        let next = self.next_of(after);
        let node = match self.free.pop() {
            Some(reused) => {
                let slot = &mut self.slots[reused];
                slot.value = Some(value);
                slot.next = next;
                reused
            }
            None => {
                self.slots.push(Slot { value: Some(value), next, generation: 0 });
                self.slots.len() - 1
            }
        };
        self.slots[after].next = Some(node);
        self.len += 1;
        node
    }

    /// Unlinks the node after `after` and retires its slot.
    fn unlink_after(&mut self, after: usize) -> Option<T> {
        let node = self.next_of(after)?;
        let slot = &mut self.slots[node];
        let value = slot.value.take();
        let next = slot.next.take();
        slot.generation += 1;
        self.slots[after].next = next;
        self.free.push(node);
        self.len -= 1;
        value
    }

    fn tail(&self) -> usize {
        let mut node = HEAD;
        while let Some(next) = self.next_of(node) {
            node = next;
        }
        node
    }

    fn values(&self) -> impl Iterator<Item = &T> + '_ {
        let mut node = self.next_of(HEAD);
        core::iter::from_fn(move || {
            let current = node?;
            node = self.next_of(current);
            self.slots[current].value.as_ref()
        })
    }
}

impl<T> Default for ListStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// ListCursor
// =============================================================================

/// Forward cursor over a [`ForwardList`].
///
/// `node` is `None` at the end and `Some(0)` at before-begin.
pub struct ListCursor<T> {
    store: StoreRef<ListStore<T>>,
    node: Option<usize>,
    generation: u64,
}

impl<T: Clone + 'static> ListCursor<T> {
    fn new(list: &Shared<ListStore<T>>, node: Option<usize>) -> Self {
        let generation = node.map_or(0, |n| list.borrow().data.generation_of(n));
        Self { store: StoreRef::new(list), node, generation }
    }

    /// The live node this cursor points at, checked against its slot.
    fn node(&self, store: &ListStore<T>, operation: &'static str) -> Result<Option<usize>> {
        match self.node {
            Some(node) if store.generation_of(node) != self.generation => {
                Err(CursorError::precondition(operation, Violation::StaleCursor))
            }
            other => Ok(other),
        }
    }

    fn element(&self, store: &ListStore<T>, operation: &'static str) -> Result<usize> {
        match self.node(store, operation)? {
            None => Err(CursorError::precondition(operation, Violation::PastEnd)),
            Some(HEAD) => Err(CursorError::precondition(operation, Violation::NotDereferenceable)),
            Some(node) => Ok(node),
        }
    }
}

impl<T> Clone for ListCursor<T> {
    fn clone(&self) -> Self {
        Self { store: self.store.clone(), node: self.node, generation: self.generation }
    }
}

impl<T> fmt::Debug for ListCursor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListCursor").field("node", &self.node).finish()
    }
}

#[capability(concepts::ForwardCursor)]
impl<T: Clone + 'static> ForwardCursor for ListCursor<T> {
    type Item = T;

    #[getter]
    fn value(&self) -> Result<T> {
        self.store.read("value", |store| {
            let node = self.element(store, "value")?;
            store.slots[node]
                .value
                .clone()
                .ok_or_else(|| CursorError::precondition("value", Violation::StaleCursor))
        })
    }

    #[setter]
    fn set_value(&mut self, value: T) -> Result<()> {
        self.store.write("set_value", |store| {
            let node = self.element(store, "set_value")?;
            store.slots[node].value = Some(value);
            Ok(())
        })
    }

    fn step(&mut self) -> Result<()> {
        let (next, generation) = self.store.read("step", |store| {
            let node = self
                .node(store, "step")?
                .ok_or_else(|| CursorError::precondition("step", Violation::PastEnd))?;
            let next = store.next_of(node);
            Ok((next, next.map_or(0, |n| store.generation_of(n))))
        })?;
        self.node = next;
        self.generation = generation;
        Ok(())
    }

    fn equals(&self, other: &Self) -> bool {
        self.store.same_store(&other.store) && self.node == other.node && self.generation == other.generation
    }
}

impl<T: Clone + 'static> PartialEq for ListCursor<T> {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl<T: Clone + 'static> Composed for ListCursor<T> {
    fn compose(composer: &mut Composer<Self>) -> Result<(), CompositionError> {
        composer.implement::<concepts::ForwardCursor>()?;
        Ok(())
    }
}

// =============================================================================
// ForwardList
// =============================================================================

/// Singly linked list with O(1) front insertion and removal.
pub struct ForwardList<T> {
    store: Shared<ListStore<T>>,
}

impl<T: Clone + 'static> ForwardList<T> {
    #[must_use]
    pub fn new() -> Self {
        Self { store: shared(ListStore::new()) }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.store.borrow().data.len
    }

    /// Removes every element and invalidates every cursor.
    ///
    /// # Errors
    ///
    /// `BufferBorrowed` while the store is borrowed.
    pub fn clear(&mut self) -> Result<()> {
        let mut tracked = borrow_mut(&self.store, "clear")?;
        let removed = tracked.data.len;
        tracked.data = ListStore::new();
        tracked.invalidate();
        debug!(removed, "cleared forward list");
        Ok(())
    }

    /// Frees every node; cursors fail with `ContainerReleased` afterwards.
    pub fn release(self) {
        let released = self.len();
        self.store.release();
        debug!(released, "released forward list");
    }

    /// Appends at the tail. O(n).
    ///
    /// # Errors
    ///
    /// `BufferBorrowed` while the store is borrowed.
    pub fn push_back(&mut self, value: T) -> Result<()> {
        let mut tracked = borrow_mut(&self.store, "push_back")?;
        let tail = tracked.data.tail();
        tracked.data.link_after(tail, value);
        Ok(())
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.store.borrow().data.values().cloned().collect()
    }

    /// Node `position` points at, after checking it belongs to this list.
    fn anchor(&self, position: &ListCursor<T>, operation: &'static str) -> Result<usize> {
        StoreRef::new(&self.store).ensure_same(&position.store, operation)?;
        position.store.upgrade(operation)?;
        let tracked = borrow(&self.store, operation)?;
        position
            .node(&tracked.data, operation)?
            .ok_or_else(|| CursorError::precondition(operation, Violation::PastEnd))
    }
}

impl<T: Clone + 'static> Default for ForwardList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> Clone for ForwardList<T> {
    fn clone(&self) -> Self {
        self.to_vec().into_iter().collect()
    }
}

impl<T: fmt::Debug> fmt::Debug for ForwardList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.store.try_borrow() {
            Ok(tracked) => f.debug_list().entries(tracked.data.values()).finish(),
            Err(_) => f.write_str("ForwardList(<borrowed>)"),
        }
    }
}

impl<T: Clone + 'static> FromIterator<T> for ForwardList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut store = ListStore::new();
        let mut tail = HEAD;
        for value in iter {
            tail = store.link_after(tail, value);
        }
        Self { store: shared(store) }
    }
}

#[capability(concepts::SequenceContainer)]
impl<T: Clone + 'static> SequenceContainer for ForwardList<T> {
    type Item = T;
    type Cursor = ListCursor<T>;

    fn begin(&self) -> ListCursor<T> {
        let first = self.store.borrow().data.next_of(HEAD);
        ListCursor::new(&self.store, first)
    }

    fn end(&self) -> ListCursor<T> {
        ListCursor::new(&self.store, None)
    }

    #[getter]
    fn front(&self) -> Result<T> {
        let tracked = borrow(&self.store, "front")?;
        tracked
            .data
            .values()
            .next()
            .cloned()
            .ok_or_else(|| CursorError::empty("front"))
    }

    #[getter]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn unshift(&mut self, value: T) -> Result<()> {
        borrow_mut(&self.store, "unshift")?.data.link_after(HEAD, value);
        Ok(())
    }

    fn shift(&mut self) -> Result<T> {
        borrow_mut(&self.store, "shift")?
            .data
            .unlink_after(HEAD)
            .ok_or_else(|| CursorError::empty("shift"))
    }
}

#[capability(concepts::PrologContainer)]
impl<T: Clone + 'static> PrologContainer for ForwardList<T> {
    fn before_begin(&self) -> ListCursor<T> {
        ListCursor::new(&self.store, Some(HEAD))
    }

    fn insert_after(&mut self, position: &ListCursor<T>, value: T) -> Result<ListCursor<T>> {
        let after = self.anchor(position, "insert_after")?;
        let node = borrow_mut(&self.store, "insert_after")?.data.link_after(after, value);
        Ok(ListCursor::new(&self.store, Some(node)))
    }

    fn erase_after(&mut self, position: &ListCursor<T>) -> Result<T> {
        let after = self.anchor(position, "erase_after")?;
        borrow_mut(&self.store, "erase_after")?
            .data
            .unlink_after(after)
            .ok_or_else(|| CursorError::precondition("erase_after", Violation::PastEnd))
    }
}

impl<T: Clone + 'static> Composed for ForwardList<T> {
    fn compose(composer: &mut Composer<Self>) -> Result<(), CompositionError> {
        composer
            .implement::<concepts::SequenceContainer>()?
            .implement::<concepts::PrologContainer>()?;
        Ok(())
    }
}
