// Common utilities shared by the user-facing macros
//
// This module contains:
// - parse_utils: keyword peeking and list parsing helpers
// - fingerprint: BLAKE3 bundle fingerprints

mod fingerprint;
mod parse_utils;

pub use fingerprint::*;
pub use parse_utils::*;
