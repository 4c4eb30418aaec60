//! Capability composition.
//!
//! Bundles of member descriptors are attached to a type's [`Shape`] exactly
//! once, the first time the shape is requested. The `#[capability]` attribute
//! generates one bundle per trait `impl` block; [`Composed`] lists the bundles
//! of a concrete type.

use std::any::TypeId;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{Mutex, OnceLock, PoisonError};

use tracing::debug;

use super::shape::{require, MemberBody, MemberDef, Shape};
use super::{Concept, ConceptTag};
use crate::error::CompositionError;

/// A named, reusable bundle of member implementations targeting one concept.
#[derive(Debug, Clone, Copy)]
pub struct CapabilityImpl {
    pub name: &'static str,
    pub concept: &'static Concept,
    pub members: &'static [MemberDef],
    pub fingerprint: u64,
}

/// Implemented by `#[capability(Marker)]` for each annotated impl block.
pub trait Implements<C: ConceptTag> {
    const NAME: &'static str;
    const MEMBERS: &'static [MemberDef];
    const FINGERPRINT: u64;

    #[must_use]
    fn bundle() -> CapabilityImpl
    where
        Self: Sized,
    {
        CapabilityImpl {
            name: Self::NAME,
            concept: C::concept(),
            members: Self::MEMBERS,
            fingerprint: Self::FINGERPRINT,
        }
    }
}

/// Copies `bundle` onto `shape`.
///
/// A concrete member may replace a stub; a stub never replaces anything.
/// Replacing a concrete member with another concrete member is refused and
/// leaves `shape` untouched. Attaching the same bundle twice is a no-op.
///
/// # Errors
///
/// [`CompositionError::Overwrite`] naming the first conflicting member.
pub fn attach(shape: &mut Shape, bundle: &CapabilityImpl) -> Result<(), CompositionError> {
    if shape.has_bundle(bundle.fingerprint) {
        return Ok(());
    }

    for def in bundle.members {
        if def.body == MemberBody::Concrete && shape.get(&def.decl) == Some(MemberBody::Concrete) {
            return Err(CompositionError::Overwrite {
                member: def.decl.name,
                target: shape.type_name(),
            });
        }
    }

    for def in bundle.members {
        match def.body {
            MemberBody::Concrete => shape.insert(*def),
            MemberBody::Stub => {
                shape.mark_stub(def.decl);
            }
        }
    }
    shape.record_bundle(bundle.fingerprint, bundle.name);
    Ok(())
}

/// [`attach`], after checking that every bundle member is declared by `concept`.
///
/// # Errors
///
/// [`CompositionError::CyclicConcept`] for a malformed concept,
/// [`CompositionError::UndeclaredMember`] when the bundle would widen the
/// type's surface beyond the concept, or any [`attach`] error.
pub fn implement(
    shape: &mut Shape,
    concept: &'static Concept,
    bundle: &CapabilityImpl,
) -> Result<(), CompositionError> {
    let declared = concept.flatten()?;
    if let Some(extra) = bundle.members.iter().find(|def| !declared.contains(&def.decl)) {
        return Err(CompositionError::UndeclaredMember {
            member: extra.decl.name,
            concept: concept.name,
        });
    }
    attach(shape, bundle)?;
    shape.record_concept(concept);
    Ok(())
}

// =============================================================================
// Per-type Composition
// =============================================================================

/// Builder handed to [`Composed::compose`].
#[derive(Debug)]
pub struct Composer<T> {
    shape: Shape,
    _marker: PhantomData<fn() -> T>,
}

impl<T: 'static> Composer<T> {
    fn new() -> Self {
        Self {
            shape: Shape::new(core::any::type_name::<T>()),
            _marker: PhantomData,
        }
    }

    /// Attaches the bundle `T` generated for concept `C`.
    ///
    /// # Errors
    ///
    /// Any [`implement`] error.
    pub fn implement<C: ConceptTag>(&mut self) -> Result<&mut Self, CompositionError>
    where
        T: Implements<C>,
    {
        implement(&mut self.shape, C::concept(), &T::bundle())?;
        Ok(self)
    }

    /// Attaches a hand-built bundle, validated against its own concept.
    ///
    /// # Errors
    ///
    /// Any [`implement`] error.
    pub fn attach(&mut self, bundle: &CapabilityImpl) -> Result<&mut Self, CompositionError> {
        implement(&mut self.shape, bundle.concept, bundle)?;
        Ok(self)
    }
}

/// A concrete type whose shape is assembled from capability bundles.
pub trait Composed: 'static {
    /// Lists the bundles of `Self`. Runs once per type.
    ///
    /// # Errors
    ///
    /// Any composition failure of the listed bundles.
    fn compose(composer: &mut Composer<Self>) -> Result<(), CompositionError>
    where
        Self: Sized;
}

fn registry() -> &'static Mutex<HashMap<TypeId, &'static Shape>> {
    static REGISTRY: OnceLock<Mutex<HashMap<TypeId, &'static Shape>>> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(HashMap::new()))
}

/// The shape of `T`, composed on first use and cached afterwards.
///
/// The composed shape is checked against every concept it implemented, so a
/// hand-built bundle that leaves a required member out is caught here.
///
/// # Errors
///
/// Any composition failure, or a `CapabilityMismatch` from the final check.
/// Failures are not cached.
pub fn shape_of<T: Composed>() -> Result<&'static Shape, CompositionError> {
    let key = TypeId::of::<T>();
    let cached = registry()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
        .copied();
    if let Some(shape) = cached {
        return Ok(shape);
    }

    // Composed outside the lock: compose() may ask for other shapes.
    let mut composer = Composer::<T>::new();
    T::compose(&mut composer)?;
    let shape = composer.shape;
    for concept in shape.concepts() {
        require(&shape, *concept)?;
    }
    debug!(
        type_name = shape.type_name(),
        members = shape.len(),
        concepts = shape.concepts().len(),
        "composed capability shape"
    );

    let mut guard = registry().lock().unwrap_or_else(PoisonError::into_inner);
    Ok(*guard.entry(key).or_insert_with(|| Box::leak(Box::new(shape))))
}

/// Checks that `T` conforms to concept `C`.
///
/// # Errors
///
/// Composition failures of `T`, or `CapabilityMismatch`.
pub fn ensure<T: Composed, C: ConceptTag>() -> Result<(), CompositionError> {
    require(shape_of::<T>()?, C::concept())
}

/// Whether `T` composes cleanly and conforms to `C`.
#[must_use]
pub fn conforms<T: Composed, C: ConceptTag>() -> bool {
    ensure::<T, C>().is_ok()
}
