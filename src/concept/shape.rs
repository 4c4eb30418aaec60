//! Runtime member tables.
//!
//! A [`Shape`] records which concept members a concrete type provides and
//! whether each one is concrete or a stub. Shapes are built once per type by
//! the composition layer and then only read.

use std::collections::BTreeMap;
use std::fmt;

use super::{Concept, MemberDecl, MemberKind};
use crate::error::{CompositionError, CursorError};

/// Whether a member carries an implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberBody {
    Concrete,
    /// Present but abstract: calling it fails with `Unsupported`.
    Stub,
}

/// A member descriptor as carried by capability bundles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberDef {
    pub decl: MemberDecl,
    pub body: MemberBody,
}

impl MemberDef {
    #[must_use]
    pub const fn concrete(name: &'static str, kind: MemberKind) -> Self {
        Self { decl: MemberDecl { name, kind }, body: MemberBody::Concrete }
    }

    #[must_use]
    pub const fn stub(name: &'static str, kind: MemberKind) -> Self {
        Self { decl: MemberDecl { name, kind }, body: MemberBody::Stub }
    }

    #[must_use]
    pub fn is_stub(&self) -> bool {
        self.body == MemberBody::Stub
    }
}

/// Member table of one concrete type.
#[derive(Debug, Clone)]
pub struct Shape {
    type_name: &'static str,
    members: BTreeMap<MemberDecl, MemberBody>,
    bundles: Vec<(u64, &'static str)>,
    concepts: Vec<&'static Concept>,
}

impl Shape {
    #[must_use]
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            members: BTreeMap::new(),
            bundles: Vec::new(),
            concepts: Vec::new(),
        }
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[must_use]
    pub fn get(&self, decl: &MemberDecl) -> Option<MemberBody> {
        self.members.get(decl).copied()
    }

    /// Present, either concrete or stub.
    #[must_use]
    pub fn has(&self, decl: &MemberDecl) -> bool {
        self.members.contains_key(decl)
    }

    #[must_use]
    pub fn is_stub(&self, decl: &MemberDecl) -> bool {
        self.get(decl) == Some(MemberBody::Stub)
    }

    /// Declares `decl` as present-but-abstract.
    ///
    /// A concrete member is never downgraded; returns whether the table changed.
    pub fn mark_stub(&mut self, decl: MemberDecl) -> bool {
        match self.members.get(&decl) {
            Some(_) => false,
            None => {
                self.members.insert(decl, MemberBody::Stub);
                true
            }
        }
    }

    /// Members in `(name, kind)` order.
    pub fn members(&self) -> impl Iterator<Item = MemberDef> + '_ {
        self.members.iter().map(|(decl, body)| MemberDef { decl: *decl, body: *body })
    }

    /// Concepts this shape was composed against.
    #[must_use]
    pub fn concepts(&self) -> &[&'static Concept] {
        &self.concepts
    }

    pub(crate) fn insert(&mut self, def: MemberDef) {
        self.members.insert(def.decl, def.body);
    }

    pub(crate) fn has_bundle(&self, fingerprint: u64) -> bool {
        self.bundles.iter().any(|(fp, _)| *fp == fingerprint)
    }

    pub(crate) fn record_bundle(&mut self, fingerprint: u64, name: &'static str) {
        self.bundles.push((fingerprint, name));
    }

    pub(crate) fn record_concept(&mut self, concept: &'static Concept) {
        if !self.concepts.iter().any(|c| core::ptr::eq(*c, concept)) {
            self.concepts.push(concept);
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.type_name)?;
        for def in self.members() {
            let marker = if def.is_stub() { " (stub)" } else { "" };
            writeln!(f, "  {}{marker}", def.decl)?;
        }
        Ok(())
    }
}

/// Members of `concept` that `shape` lacks.
fn missing(shape: &Shape, concept: &'static Concept) -> Result<Vec<MemberDecl>, CompositionError> {
    Ok(concept
        .flatten()?
        .into_iter()
        .filter(|decl| !shape.has(decl))
        .collect())
}

/// Whether `shape` has every member `concept` requires. Stubs count as present.
#[must_use]
pub fn conforms_to(shape: &Shape, concept: &'static Concept) -> bool {
    matches!(missing(shape, concept), Ok(list) if list.is_empty())
}

/// Like [`conforms_to`], reporting what is missing.
///
/// # Errors
///
/// [`CursorError::CapabilityMismatch`] listing the absent members, or the
/// cycle error of a malformed concept.
pub fn require(shape: &Shape, concept: &'static Concept) -> Result<(), CompositionError> {
    let absent = missing(shape, concept)?;
    if absent.is_empty() {
        return Ok(());
    }
    Err(CursorError::CapabilityMismatch {
        type_name: shape.type_name,
        concept: concept.name,
        missing: absent.iter().map(ToString::to_string).collect(),
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;

    static WALK: Concept = Concept {
        name: "Walk",
        members: &[MemberDecl::method("step"), MemberDecl::getter("value"), MemberDecl::setter("value")],
        refines: &[],
    };

    fn walker() -> Shape {
        let mut shape = Shape::new("Walker");
        shape.insert(MemberDef::concrete("step", MemberKind::Method));
        shape.insert(MemberDef::concrete("value", MemberKind::Getter));
        shape
    }

    #[test]
    fn missing_setter_fails_conformance() {
        let shape = walker();
        assert!(!conforms_to(&shape, &WALK));
        let err = require(&shape, &WALK).unwrap_err();
        assert_eq!(
            err,
            CompositionError::Mismatch(CursorError::CapabilityMismatch {
                type_name: "Walker",
                concept: "Walk",
                missing: vec!["set value".to_owned()],
            })
        );
    }

    #[test]
    fn stub_counts_as_present() {
        let mut shape = walker();
        assert!(shape.mark_stub(MemberDecl::setter("value")));
        assert!(shape.is_stub(&MemberDecl::setter("value")));
        assert!(conforms_to(&shape, &WALK));
    }

    #[test]
    fn mark_stub_never_downgrades_concrete() {
        let mut shape = walker();
        assert!(!shape.mark_stub(MemberDecl::method("step")));
        assert_eq!(shape.get(&MemberDecl::method("step")), Some(MemberBody::Concrete));
    }

    #[test]
    fn getter_does_not_satisfy_method_of_same_name() {
        let mut shape = Shape::new("Odd");
        shape.insert(MemberDef::concrete("step", MemberKind::Getter));
        assert!(!shape.has(&MemberDecl::method("step")));
    }

    #[test]
    fn display_lists_members_and_stubs() {
        let mut shape = walker();
        shape.mark_stub(MemberDecl::setter("value"));
        let text = shape.to_string();
        assert!(text.starts_with("Walker\n"));
        assert!(text.contains("set value (stub)"));
        assert!(text.contains("fn step\n"));
    }
}
