//! Procedural macros for the tola-cursors capability composition
//!
//! # Macro API
//!
//! | Macro | Target | Purpose |
//! |-------|--------|---------|
//! | `#[capability(Marker)]` | trait impl | Emit the capability bundle for this impl block |
//! | `#[capability(Marker, stubs(a, b))]` | trait impl | Same, declaring `a` and `b` as stubs |
//! | `#[derive(Concept)]` | unit struct | Turn a struct into a concept marker |
//!
//! ## Example
//!
//! ```ignore
//! #[capability(concepts::ForwardCursor)]
//! impl<T: Clone> ForwardCursor for ListCursor<T> {
//!     type Item = T;
//!
//!     #[getter]
//!     fn value(&self) -> Result<T> { ... }
//!
//!     #[setter]
//!     fn set_value(&mut self, value: T) -> Result<()> { ... }
//!
//!     fn step(&mut self) -> Result<()> { ... }
//!     fn equals(&self, other: &Self) -> bool { ... }
//! }
//! ```

use proc_macro::TokenStream;
use syn::parse_macro_input;

// =============================================================================
// Module Declarations (two-tier: common / user)
// =============================================================================

mod common;
mod user;

// =============================================================================
// User-facing Macros (user/)
// =============================================================================

/// Emit a capability bundle for a trait `impl` block.
///
/// Every `fn` of the block becomes a concrete member of the bundle. Methods
/// are tagged `Method` unless marked `#[getter]` or `#[setter]`; a setter
/// drops its `set_` prefix, so `set_value` registers as the setter `value`.
/// Names listed in `stubs(...)` are registered as present-but-abstract: the
/// trait's default body (which fails with `Unsupported`) stays in effect.
///
/// The impl block itself is emitted unchanged apart from the helper
/// attributes, followed by an `Implements<Marker>` impl for the self type.
///
/// # Usage
/// ```ignore
/// #[capability(concepts::SequenceContainer, stubs(unshift, shift))]
/// impl SequenceContainer for ByteBuffer { ... }
/// ```
#[proc_macro_attribute]
pub fn capability(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as user::CapabilityArgs);
    let item_impl = parse_macro_input!(item as syn::ItemImpl);
    user::expand_capability(args, item_impl).into()
}

/// Derive macro turning a unit struct into a concept marker.
///
/// Computes nothing at runtime: the generated `ConceptTag` impl just points at
/// the concept descriptor named by `#[descriptor(static = PATH)]`.
///
/// # Usage
/// ```ignore
/// pub static SORTED: Concept = Concept { name: "Sorted", members: &[], refines: &[] };
///
/// #[derive(Concept)]
/// #[descriptor(static = SORTED)]
/// pub struct Sorted;
/// ```
#[proc_macro_derive(Concept, attributes(descriptor))]
pub fn derive_concept(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as syn::DeriveInput);
    user::expand_derive_concept(input).into()
}
