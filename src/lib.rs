//! # tola-cursors
//!
//! Cursor-based sequence containers whose capabilities are composed from
//! named concepts.
//!
//! ## Architecture
//!
//! Containers hand out *cursors*: small handles naming a position. What a
//! cursor or container can do is described twice:
//!
//! 1. statically, by the traits in [`cursor`] and [`container`], which the
//!    generic [`algorithm`]s use as bounds;
//! 2. at runtime, by a [`Shape`](concept::Shape) composed from the capability
//!    bundles that `#[capability]` emits for each trait impl.
//!
//! ```text
//! +-------------------------------------------------------------------+
//! |  Layer 0: Concepts                                                |
//! |  - Concept, MemberDecl, Shape, compose / ensure / conforms        |
//! +-------------------------------------------------------------------+
//!                                |
//!                                v
//! +-------------------------------------------------------------------+
//! |  Layer 1: Cursors                                                 |
//! |  - Forward, Bidirectional, Indexable, Contiguous, Output          |
//! |  - generation-checked store handles                               |
//! +-------------------------------------------------------------------+
//!                                |
//!                                v
//! +-------------------------------------------------------------------+
//! |  Layer 2: Containers                                              |
//! |  - Vector, Deque, ForwardList, ByteBuffer, Segmented              |
//! +-------------------------------------------------------------------+
//!                                |
//!                                v
//! +-------------------------------------------------------------------+
//! |  Layer 3: Algorithms                                              |
//! |  - advance, distance, find, rewind_until, copy, inserters         |
//! +-------------------------------------------------------------------+
//! ```
//!
//! ## Cursor validity
//!
//! A cursor never keeps its container alive. Structural mutation (anything
//! that moves existing elements) bumps the container's generation and every
//! older cursor then fails with `StaleCursor`. Dropping the container, or
//! disposing of it with `release`, makes them fail with `ContainerReleased`,
//! even while a byte view guard still borrows the bytes. Overwriting an
//! element in place leaves cursors valid.
//!
//! ## Quick Start
//!
//! ```
//! use tola_cursors::prelude::*;
//!
//! let v: Vector<i32> = [5, 3, 8, 1].into_iter().collect();
//! let mut cursor = v.end();
//! cursor.step_back()?;
//! assert!(rewind_until(&mut cursor, |&x| x > 6)?);
//! assert_eq!(cursor.index(), 2);
//!
//! let mut out: Vector<i32> = Vector::new();
//! copy(v.begin(), &v.end(), back_inserter(&mut out))?;
//! assert_eq!(out.to_vec(), vec![5, 3, 8, 1]);
//! # Ok::<(), tola_cursors::CursorError>(())
//! ```

// Allow `::tola_cursors` to work inside the crate itself
extern crate self as tola_cursors;

// Re-export paste for concept!
pub use paste;

// =============================================================================
// Layer 0: Concepts
// =============================================================================
pub mod concept;

/// The built-in concept markers, for `#[capability(concepts::...)]`.
pub use concept::catalog as concepts;

// =============================================================================
// Layer 1: Cursors
// =============================================================================
pub mod cursor;

// =============================================================================
// Layer 2: Containers
// =============================================================================
pub mod container;

// =============================================================================
// Layer 3: Algorithms
// =============================================================================
pub mod algorithm;

// =============================================================================
// Ambient
// =============================================================================
pub mod config;
pub mod error;

pub use config::{BufferConfig, Config, SegmentConfig};
pub use error::{CompositionError, ConfigError, CursorError, Result, Violation};

// Re-export proc-macros
pub use macros::{capability, Concept};

/// Common items for working with cursors and containers.
pub mod prelude {
    pub use crate::algorithm::{
        advance, back_inserter, copy, copy_backward, distance, find, front_inserter, iterate,
        rewind, rewind_until, try_advance, try_rewind,
    };
    pub use crate::concept::{conforms, ensure, shape_of, Composed};
    pub use crate::concepts;
    pub use crate::container::{
        ByteBuffer, ContiguousContainer, Deque, ForwardList, IndexableContainer, PrologContainer,
        RewindContainer, SegmentContainer, Segmented, SequenceContainer, Vector,
    };
    pub use crate::cursor::{
        overwrite, BidirectionalCursor, ContiguousCursor, ForwardCursor, IndexableCursor, IntLayout,
        OutputCursor,
    };
    pub use crate::error::{CursorError, Result, Violation};
    pub use macros::capability;
}
