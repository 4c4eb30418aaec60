//! # Concepts
//!
//! A concept is a named capability contract: a set of required members plus
//! the concepts it refines. Concepts hold no state; they are checked against
//! a type's [`Shape`] and composed into it.
//!
//! ## Module Structure
//!
//! ```text
//! concept/
//! ├── mod.rs      - Concept, MemberDecl, ConceptTag, concept!
//! ├── shape.rs    - Shape (runtime member table), conforms_to, require
//! ├── compose.rs  - CapabilityImpl, attach, implement, Composed registry
//! └── catalog.rs  - the cursor and container concepts
//! ```
//!
//! Each concept has a descriptor (a `static Concept`) and a zero-sized marker
//! type implementing [`ConceptTag`], so it can be named both at runtime and in
//! `#[capability(...)]` attributes.

pub mod catalog;
pub mod compose;
pub mod shape;

use crate::error::CompositionError;

pub use compose::{
    attach, conforms, ensure, implement, shape_of, CapabilityImpl, Composed, Composer, Implements,
};
pub use shape::{conforms_to, require, MemberBody, MemberDef, Shape};

// =============================================================================
// Member Declarations
// =============================================================================

/// Kind of member a concept requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MemberKind {
    Method,
    Getter,
    Setter,
}

impl core::fmt::Display for MemberKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            MemberKind::Method => "fn",
            MemberKind::Getter => "get",
            MemberKind::Setter => "set",
        })
    }
}

/// A required member: name plus kind. `get value` and `set value` are distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MemberDecl {
    pub name: &'static str,
    pub kind: MemberKind,
}

impl MemberDecl {
    #[must_use]
    pub const fn method(name: &'static str) -> Self {
        Self { name, kind: MemberKind::Method }
    }

    #[must_use]
    pub const fn getter(name: &'static str) -> Self {
        Self { name, kind: MemberKind::Getter }
    }

    #[must_use]
    pub const fn setter(name: &'static str) -> Self {
        Self { name, kind: MemberKind::Setter }
    }
}

impl core::fmt::Display for MemberDecl {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} {}", self.kind, self.name)
    }
}

// =============================================================================
// Concept Descriptor
// =============================================================================

/// Capability contract descriptor.
///
/// Declared as a `static` (usually through [`concept!`]) so that refinements
/// can point at each other by address.
#[derive(Debug)]
pub struct Concept {
    pub name: &'static str,
    pub members: &'static [MemberDecl],
    pub refines: &'static [&'static Concept],
}

impl Concept {
    /// Every member required by this concept and the concepts it refines,
    /// deduplicated, in declaration order (refined concepts first).
    ///
    /// # Errors
    ///
    /// Returns [`CompositionError::CyclicConcept`] when the refinement graph
    /// loops back on itself.
    pub fn flatten(&'static self) -> Result<Vec<MemberDecl>, CompositionError> {
        let mut out = Vec::new();
        let mut visited: Vec<&'static Concept> = Vec::new();
        let mut path: Vec<&'static Concept> = Vec::new();
        self.collect(&mut out, &mut visited, &mut path)?;
        Ok(out)
    }

    fn collect(
        &'static self,
        out: &mut Vec<MemberDecl>,
        visited: &mut Vec<&'static Concept>,
        path: &mut Vec<&'static Concept>,
    ) -> Result<(), CompositionError> {
        if path.iter().any(|c| core::ptr::eq(*c, self)) {
            let mut names: Vec<&'static str> = path.iter().map(|c| c.name).collect();
            names.push(self.name);
            return Err(CompositionError::CyclicConcept { path: names });
        }
        if visited.iter().any(|c| core::ptr::eq(*c, self)) {
            return Ok(());
        }

        path.push(self);
        for parent in self.refines {
            parent.collect(out, visited, path)?;
        }
        path.pop();

        visited.push(self);
        for member in self.members {
            if !out.contains(member) {
                out.push(*member);
            }
        }
        Ok(())
    }

    /// Whether `member` is required by this concept or one it refines.
    ///
    /// # Errors
    ///
    /// Propagates [`CompositionError::CyclicConcept`].
    pub fn declares(&'static self, member: &MemberDecl) -> Result<bool, CompositionError> {
        Ok(self.flatten()?.contains(member))
    }

    /// Whether `other` is this concept or appears among its refinements.
    #[must_use]
    pub fn refines_concept(&'static self, other: &'static Concept) -> bool {
        let mut stack: Vec<&'static Concept> = vec![self];
        let mut seen: Vec<&'static Concept> = Vec::new();
        while let Some(current) = stack.pop() {
            if core::ptr::eq(current, other) {
                return true;
            }
            if seen.iter().any(|c| core::ptr::eq(*c, current)) {
                continue;
            }
            seen.push(current);
            stack.extend(current.refines.iter().copied());
        }
        false
    }
}

impl PartialEq for Concept {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self, other)
    }
}

impl Eq for Concept {}

/// Marker type standing for a concept.
///
/// Implemented with `#[derive(Concept)]`, which points the marker at its
/// descriptor.
pub trait ConceptTag: 'static {
    fn concept() -> &'static Concept;
}

// =============================================================================
// concept! - Declarative concept definitions
// =============================================================================

/// Declare a concept descriptor and its marker type in one go.
///
/// The descriptor static is named after the marker in `SCREAMING_SNAKE_CASE`.
///
/// # Example
///
/// ```ignore
/// concept! {
///     /// Cursors that can move backward.
///     pub BidirectionalCursor = "BidirectionalCursor": [ForwardCursor] {
///         fn step_back,
///     }
/// }
/// // Generates: pub static BIDIRECTIONAL_CURSOR: Concept
/// //            pub struct BidirectionalCursor; (ConceptTag)
/// ```
#[macro_export]
macro_rules! concept {
    (
        $(#[$meta:meta])*
        $vis:vis $marker:ident = $name:literal $(: [$($parent:ident),* $(,)?])? {
            $($kind:ident $member:ident),* $(,)?
        }
    ) => {
        $crate::paste::paste! {
            #[doc = concat!("Descriptor of the `", $name, "` concept.")]
            $vis static [<$marker:snake:upper>]: $crate::concept::Concept = $crate::concept::Concept {
                name: $name,
                members: &[$($crate::concept!(@member $kind $member)),*],
                refines: &[$($(&[<$parent:snake:upper>]),*)?],
            };

            $(#[$meta])*
            #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, $crate::Concept)]
            #[descriptor(static = [<$marker:snake:upper>])]
            $vis struct $marker;
        }
    };
    (@member fn $member:ident) => {
        $crate::concept::MemberDecl::method(stringify!($member))
    };
    (@member get $member:ident) => {
        $crate::concept::MemberDecl::getter(stringify!($member))
    };
    (@member set $member:ident) => {
        $crate::concept::MemberDecl::setter(stringify!($member))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    static BASE: Concept = Concept {
        name: "Base",
        members: &[MemberDecl::method("step"), MemberDecl::getter("value")],
        refines: &[],
    };

    static LEFT: Concept = Concept {
        name: "Left",
        members: &[MemberDecl::method("left")],
        refines: &[&BASE],
    };

    static RIGHT: Concept = Concept {
        name: "Right",
        members: &[MemberDecl::method("right"), MemberDecl::method("step")],
        refines: &[&BASE],
    };

    static DIAMOND: Concept = Concept {
        name: "Diamond",
        members: &[],
        refines: &[&LEFT, &RIGHT],
    };

    static LOOP_A: Concept = Concept {
        name: "LoopA",
        members: &[MemberDecl::method("a")],
        refines: &[&LOOP_B],
    };

    static LOOP_B: Concept = Concept {
        name: "LoopB",
        members: &[MemberDecl::method("b")],
        refines: &[&LOOP_A],
    };

    #[test]
    fn flatten_puts_refined_members_first() {
        let members = LEFT.flatten().unwrap();
        assert_eq!(
            members,
            vec![MemberDecl::method("step"), MemberDecl::getter("value"), MemberDecl::method("left")]
        );
    }

    #[test]
    fn diamond_refinement_is_not_a_cycle_and_dedups() {
        let members = DIAMOND.flatten().unwrap();
        assert_eq!(members.len(), 4);
        assert_eq!(members.iter().filter(|m| m.name == "step").count(), 1);
    }

    #[test]
    fn cyclic_refinement_reports_path() {
        let err = LOOP_A.flatten().unwrap_err();
        assert_eq!(
            err,
            CompositionError::CyclicConcept { path: vec!["LoopA", "LoopB", "LoopA"] }
        );
    }

    #[test]
    fn refines_concept_walks_the_graph() {
        assert!(DIAMOND.refines_concept(&BASE));
        assert!(LEFT.refines_concept(&LEFT));
        assert!(!BASE.refines_concept(&LEFT));
        assert!(LOOP_A.refines_concept(&LOOP_B));
    }

    #[test]
    fn getter_and_setter_of_same_name_are_distinct() {
        assert_ne!(MemberDecl::getter("value"), MemberDecl::setter("value"));
        assert_eq!(MemberDecl::setter("value").to_string(), "set value");
    }
}
