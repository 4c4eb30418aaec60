//! The cursor and container concepts.
//!
//! Members use the Rust method names of the matching traits in
//! [`crate::cursor`] and [`crate::container`]. Setters are registered under the
//! name without the `set_` prefix, so `set_value` is `set value`.
//!
//! ```text
//! ForwardCursor ── BidirectionalCursor ── IndexableCursor ── ContiguousCursor
//! OutputCursor
//!
//! SequenceContainer ─┬─ PrologContainer
//!                    └─ RewindContainer ─┬─ IndexableContainer ── ContiguousContainer
//!                                        └─ SegmentContainer
//! ```

use crate::concept;

// =============================================================================
// Cursors
// =============================================================================

concept! {
    /// Single-step, read/write, comparable position.
    pub ForwardCursor = "ForwardCursor" {
        get value,
        set value,
        fn step,
        fn equals,
    }
}

concept! {
    /// Forward cursor that can also step back.
    pub BidirectionalCursor = "BidirectionalCursor": [ForwardCursor] {
        fn step_back,
    }
}

concept! {
    /// Bidirectional cursor with O(1) relative access.
    pub IndexableCursor = "IndexableCursor": [BidirectionalCursor] {
        fn at,
        fn set_at,
        get index,
        fn jump,
    }
}

concept! {
    /// Indexable byte cursor over a contiguous buffer.
    pub ContiguousCursor = "ContiguousCursor": [IndexableCursor] {
        fn read_at,
        fn data,
    }
}

concept! {
    /// Write-only action stream.
    pub OutputCursor = "OutputCursor" {
        fn set,
        fn step,
    }
}

// =============================================================================
// Containers
// =============================================================================

concept! {
    /// Owns elements and hands out forward cursors.
    pub SequenceContainer = "SequenceContainer" {
        fn begin,
        fn end,
        get front,
        get is_empty,
        fn unshift,
        fn shift,
    }
}

concept! {
    /// Sequence with a position before the first element.
    pub PrologContainer = "PrologContainer": [SequenceContainer] {
        fn before_begin,
        fn insert_after,
        fn erase_after,
    }
}

concept! {
    /// Sequence with back-end push/pop and bidirectional cursors.
    pub RewindContainer = "RewindContainer": [SequenceContainer] {
        get back,
        fn push,
        fn pop,
        get count,
    }
}

concept! {
    /// Random-access container.
    pub IndexableContainer = "IndexableContainer": [RewindContainer] {
        fn at,
        fn set_at,
        fn insert,
        fn remove,
    }
}

concept! {
    /// Growable byte buffer.
    pub ContiguousContainer = "ContiguousContainer": [IndexableContainer] {
        get capacity,
        fn expand,
        fn read_int,
        fn write_int,
    }
}

concept! {
    /// Container of sub-containers presenting one logical sequence.
    pub SegmentContainer = "SegmentContainer": [RewindContainer] {
        get segment_count,
        fn segment_len,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concept::{ConceptTag, MemberDecl};

    #[test]
    fn markers_point_at_their_descriptors() {
        assert!(core::ptr::eq(ForwardCursor::concept(), &FORWARD_CURSOR));
        assert!(core::ptr::eq(SegmentContainer::concept(), &SEGMENT_CONTAINER));
    }

    #[test]
    fn catalog_is_acyclic() {
        for concept in [
            &CONTIGUOUS_CURSOR,
            &OUTPUT_CURSOR,
            &PROLOG_CONTAINER,
            &CONTIGUOUS_CONTAINER,
            &SEGMENT_CONTAINER,
        ] {
            assert!(concept.flatten().is_ok(), "{} is cyclic", concept.name);
        }
    }

    #[test]
    fn contiguous_cursor_inherits_forward_members() {
        let members = CONTIGUOUS_CURSOR.flatten().unwrap();
        assert!(members.contains(&MemberDecl::setter("value")));
        assert!(members.contains(&MemberDecl::method("step_back")));
        assert!(members.contains(&MemberDecl::method("read_at")));
        assert_eq!(members.len(), 11);
    }

    #[test]
    fn indexable_container_refines_sequence() {
        assert!(INDEXABLE_CONTAINER.refines_concept(&SEQUENCE_CONTAINER));
        assert!(!SEGMENT_CONTAINER.refines_concept(&INDEXABLE_CONTAINER));
    }
}
