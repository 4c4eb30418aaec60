//! Generation-checked store handles.
//!
//! Containers keep their storage in an `Rc<Store<S>>`: a `RefCell<Tracked<S>>`
//! plus a released flag that lives outside the cell, so a container can be
//! released while a view guard still borrows its bytes. Cursors hold a
//! [`StoreRef`]: a `Weak` back-reference plus the generation observed when the
//! cursor was made. Any mutation that can move, destroy or re-purpose
//! positions bumps the generation, so stale cursors fail instead of reading
//! the wrong slot.

use std::cell::{BorrowError, BorrowMutError, Cell, Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::trace;

use crate::error::{CursorError, Result, Violation};

/// Storage plus its position generation.
#[derive(Debug)]
pub struct Tracked<S> {
    pub(crate) data: S,
    generation: u64,
}

impl<S> Tracked<S> {
    pub(crate) fn invalidate(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        trace!(generation = self.generation, "positions invalidated");
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }
}

/// Storage cell shared by a container, its cursors and its byte views.
#[derive(Debug)]
pub struct Store<S> {
    cell: RefCell<Tracked<S>>,
    released: Cell<bool>,
}

impl<S> Store<S> {
    pub(crate) fn borrow(&self) -> Ref<'_, Tracked<S>> {
        self.cell.borrow()
    }

    pub(crate) fn borrow_mut(&self) -> RefMut<'_, Tracked<S>> {
        self.cell.borrow_mut()
    }

    pub(crate) fn try_borrow(&self) -> core::result::Result<Ref<'_, Tracked<S>>, BorrowError> {
        self.cell.try_borrow()
    }

    pub(crate) fn try_borrow_mut(&self) -> core::result::Result<RefMut<'_, Tracked<S>>, BorrowMutError> {
        self.cell.try_borrow_mut()
    }

    /// Marks the store dead; every handle fails from now on.
    ///
    /// The data is freed at once unless a guard borrows it, in which case it
    /// goes with the last strong reference.
    pub(crate) fn release(&self)
    where
        S: Default,
    {
        if self.released.replace(true) {
            return;
        }
        if let Ok(mut tracked) = self.cell.try_borrow_mut() {
            tracked.data = S::default();
            tracked.invalidate();
        }
        trace!("store released");
    }

    pub(crate) fn is_released(&self) -> bool {
        self.released.get()
    }
}

pub(crate) type Shared<S> = Rc<Store<S>>;

pub(crate) fn shared<S>(data: S) -> Shared<S> {
    Rc::new(Store {
        cell: RefCell::new(Tracked { data, generation: 0 }),
        released: Cell::new(false),
    })
}

pub(crate) fn borrow<'a, S>(store: &'a Shared<S>, operation: &'static str) -> Result<Ref<'a, Tracked<S>>> {
    store
        .try_borrow()
        .map_err(|_| CursorError::precondition(operation, Violation::BufferBorrowed))
}

pub(crate) fn borrow_mut<'a, S>(
    store: &'a Shared<S>,
    operation: &'static str,
) -> Result<RefMut<'a, Tracked<S>>> {
    store
        .try_borrow_mut()
        .map_err(|_| CursorError::precondition(operation, Violation::BufferBorrowed))
}

/// Non-owning, generation-checked reference from a cursor to its store.
pub struct StoreRef<S> {
    store: Weak<Store<S>>,
    generation: u64,
}

impl<S> StoreRef<S> {
    pub(crate) fn new(store: &Shared<S>) -> Self {
        let generation = store.borrow().generation;
        Self { store: Rc::downgrade(store), generation }
    }

    /// Upgrades and validates the handle.
    pub(crate) fn upgrade(&self, operation: &'static str) -> Result<Shared<S>> {
        let store = self
            .store
            .upgrade()
            .ok_or_else(|| CursorError::precondition(operation, Violation::ContainerReleased))?;
        if store.is_released() {
            return Err(CursorError::precondition(operation, Violation::ContainerReleased));
        }
        if borrow(&store, operation)?.generation != self.generation {
            return Err(CursorError::precondition(operation, Violation::StaleCursor));
        }
        Ok(store)
    }

    pub(crate) fn read<R>(&self, operation: &'static str, f: impl FnOnce(&S) -> Result<R>) -> Result<R> {
        let store = self.upgrade(operation)?;
        let tracked = borrow(&store, operation)?;
        f(&tracked.data)
    }

    pub(crate) fn write<R>(&self, operation: &'static str, f: impl FnOnce(&mut S) -> Result<R>) -> Result<R> {
        let store = self.upgrade(operation)?;
        let mut tracked = borrow_mut(&store, operation)?;
        f(&mut tracked.data)
    }

    /// Same container, same generation.
    pub(crate) fn same_store(&self, other: &Self) -> bool {
        self.store.ptr_eq(&other.store) && self.generation == other.generation
    }

    pub(crate) fn ensure_same(&self, other: &Self, operation: &'static str) -> Result<()> {
        if self.store.ptr_eq(&other.store) {
            Ok(())
        } else {
            Err(CursorError::precondition(operation, Violation::ForeignCursor))
        }
    }
}

impl<S> Clone for StoreRef<S> {
    fn clone(&self) -> Self {
        Self { store: self.store.clone(), generation: self.generation }
    }
}

impl<S> fmt::Debug for StoreRef<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreRef")
            .field("store", &self.store.as_ptr())
            .field("generation", &self.generation)
            .finish()
    }
}
