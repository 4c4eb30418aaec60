//! User-facing macro implementations
//!
//! | Macro | Usage | Purpose |
//! |-------|-------|---------|
//! | `#[capability]` | on trait impl | Emit the capability bundle of the block |
//! | `#[derive(Concept)]` | on unit struct | Define a concept marker |

pub mod capability;
mod concept;

pub use capability::{expand_capability, CapabilityArgs};
pub use concept::expand_derive_concept;
