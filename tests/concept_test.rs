//! User-defined concepts composed onto user types.
//!
//! Everything here goes through the public surface only: `concept!`,
//! `#[derive(Concept)]` and `#[capability]` from outside the crate.

use tola_cursors::concept::{
    conforms, ensure, shape_of, CapabilityImpl, Composed, Composer, Concept, MemberDecl, MemberDef,
    MemberKind,
};
use tola_cursors::{capability, concept, CompositionError, CursorError, Result};

concept! {
    /// Has a name and can greet.
    pub Greeter = "Greeter" {
        get name,
        fn greet,
    }
}

concept! {
    pub LoudGreeter = "LoudGreeter": [Greeter] {
        fn shout,
    }
}

static POLITE: Concept = Concept {
    name: "Polite",
    members: &[],
    refines: &[&GREETER],
};

#[derive(tola_cursors::Concept)]
#[descriptor(static = POLITE)]
struct Polite;

pub trait Greet {
    fn name(&self) -> String;

    fn greet(&self) -> Result<String>;

    fn shout(&self) -> Result<String> {
        Err(CursorError::unsupported::<Self>("shout"))
    }
}

pub trait Wave {
    fn greet(&self) -> Result<String>;
}

// =============================================================================
// Types
// =============================================================================

struct Person(&'static str);

#[capability(Greeter)]
impl Greet for Person {
    #[getter]
    fn name(&self) -> String {
        self.0.to_owned()
    }

    fn greet(&self) -> Result<String> {
        Ok(format!("hello, {}", self.0))
    }
}

impl Composed for Person {
    fn compose(composer: &mut Composer<Self>) -> std::result::Result<(), CompositionError> {
        composer.implement::<Greeter>()?;
        Ok(())
    }
}

struct Quiet;

#[capability(LoudGreeter, stubs(shout))]
impl Greet for Quiet {
    #[getter]
    fn name(&self) -> String {
        "quiet".to_owned()
    }

    fn greet(&self) -> Result<String> {
        Ok("hi".to_owned())
    }
}

impl Composed for Quiet {
    fn compose(composer: &mut Composer<Self>) -> std::result::Result<(), CompositionError> {
        composer.implement::<LoudGreeter>()?;
        Ok(())
    }
}

struct Mute;

#[capability(Greeter)]
impl Wave for Mute {
    fn greet(&self) -> Result<String> {
        Ok("*waves*".to_owned())
    }
}

impl Composed for Mute {
    fn compose(composer: &mut Composer<Self>) -> std::result::Result<(), CompositionError> {
        composer.implement::<Greeter>()?;
        Ok(())
    }
}

struct Dancer;

pub trait Dance {
    fn greet(&self) -> Result<String>;
    fn dance(&self);
}

#[capability(Greeter)]
impl Dance for Dancer {
    fn greet(&self) -> Result<String> {
        Ok("hey".to_owned())
    }

    fn dance(&self) {}
}

impl Composed for Dancer {
    fn compose(composer: &mut Composer<Self>) -> std::result::Result<(), CompositionError> {
        composer.implement::<Greeter>()?;
        Ok(())
    }
}

struct Twice;

#[capability(Greeter)]
impl Greet for Twice {
    #[getter]
    fn name(&self) -> String {
        "twice".to_owned()
    }

    fn greet(&self) -> Result<String> {
        Ok("hello".to_owned())
    }
}

static SECOND_GREET: CapabilityImpl = CapabilityImpl {
    name: "second greet",
    concept: &GREETER,
    members: &[MemberDef::concrete("greet", MemberKind::Method)],
    fingerprint: 7,
};

impl Composed for Twice {
    fn compose(composer: &mut Composer<Self>) -> std::result::Result<(), CompositionError> {
        composer.implement::<Greeter>()?.attach(&SECOND_GREET)?;
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[test]
fn composed_type_conforms_to_its_concept_and_refinements_of_it() {
    assert!(conforms::<Person, Greeter>());
    assert!(conforms::<Person, Polite>());
    assert!(!conforms::<Person, LoudGreeter>());
    assert_eq!(Person("ada").greet().unwrap(), "hello, ada");
}

#[test]
fn missing_refined_member_is_listed() {
    let err = ensure::<Person, LoudGreeter>().unwrap_err();
    let CompositionError::Mismatch(CursorError::CapabilityMismatch { concept, missing, .. }) = err else {
        panic!("expected a capability mismatch");
    };
    assert_eq!(concept, "LoudGreeter");
    assert_eq!(missing, vec!["fn shout".to_owned()]);
}

#[test]
fn stub_counts_as_present_but_fails_when_called() {
    assert!(conforms::<Quiet, LoudGreeter>());
    let shape = shape_of::<Quiet>().unwrap();
    assert!(shape.is_stub(&MemberDecl::method("shout")));
    assert!(!shape.is_stub(&MemberDecl::method("greet")));
    assert!(shape.to_string().contains("fn shout (stub)"));

    let err = Quiet.shout().unwrap_err();
    assert!(matches!(err, CursorError::Unsupported { operation: "shout", .. }));
}

#[test]
fn incomplete_bundle_fails_composition() {
    let err = shape_of::<Mute>().unwrap_err();
    let CompositionError::Mismatch(CursorError::CapabilityMismatch { missing, .. }) = err else {
        panic!("expected a capability mismatch");
    };
    assert_eq!(missing, vec!["get name".to_owned()]);
    assert!(!conforms::<Mute, Greeter>());
    assert_eq!(Mute.greet().unwrap(), "*waves*");
}

#[test]
fn member_outside_the_concept_is_rejected() {
    let err = shape_of::<Dancer>().unwrap_err();
    assert_eq!(err, CompositionError::UndeclaredMember { member: "dance", concept: "Greeter" });
    Dancer.dance();
    assert_eq!(Dancer.greet().unwrap(), "hey");
}

#[test]
fn second_concrete_member_is_an_overwrite() {
    let err = shape_of::<Twice>().unwrap_err();
    assert!(matches!(err, CompositionError::Overwrite { member: "greet", .. }), "{err}");
    assert_eq!(Twice.name(), "twice");
}

#[test]
fn concept_macro_builds_refinement_chain() {
    assert_eq!(LOUD_GREETER.flatten().unwrap().len(), 3);
    assert!(LOUD_GREETER.refines_concept(&GREETER));
    assert_eq!(<Polite as tola_cursors::concept::ConceptTag>::concept().name, "Polite");
}
