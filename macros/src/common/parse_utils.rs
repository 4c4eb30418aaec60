//! Common parsing utilities
//!
//! Shared parsing helpers for the attribute arguments.

use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    Ident, Token,
};

// =============================================================================
// Comma-separated List Parsing
// =============================================================================

/// Parse a comma-separated list of items
pub fn parse_comma_separated<T: Parse>(input: ParseStream) -> syn::Result<Vec<T>> {
    let items = Punctuated::<T, Token![,]>::parse_terminated(input)?;
    Ok(items.into_iter().collect())
}

// =============================================================================
// Keyword Detection
// =============================================================================

/// Check if the next identifier is a specific keyword
pub fn peek_keyword(input: ParseStream, keyword: &str) -> bool {
    if input.peek(Ident) {
        let fork = input.fork();
        if let Ok(ident) = fork.parse::<Ident>() {
            return ident == keyword;
        }
    }
    false
}

/// Consume an identifier if it matches the keyword
pub fn try_parse_keyword(input: ParseStream, keyword: &str) -> syn::Result<bool> {
    if peek_keyword(input, keyword) {
        let _: Ident = input.parse()?;
        Ok(true)
    } else {
        Ok(false)
    }
}

// =============================================================================
// Helper Attribute Detection
// =============================================================================

/// Remove `#[name]` from `attrs`, returning whether it was present.
pub fn take_marker_attr(attrs: &mut Vec<syn::Attribute>, name: &str) -> bool {
    let before = attrs.len();
    attrs.retain(|attr| !attr.path().is_ident(name));
    attrs.len() != before
}
