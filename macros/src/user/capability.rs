//! Capability bundle attribute: #[capability]
//!
//! # Syntax
//!
//! ```ignore
//! #[capability(concepts::RewindContainer)]
//! impl<S: ElementStore> RewindContainer for Array<S> { ... }
//!
//! // Members the block leaves to the trait's failing default body
//! #[capability(concepts::SequenceContainer, stubs(unshift, shift))]
//! impl SequenceContainer for ByteBuffer { ... }
//!
//! // Stubbed getters/setters carry their kind
//! #[capability(concepts::ForwardCursor, stubs(set value))]
//! impl ForwardCursor for ReadOnlyCursor { ... }
//! ```

use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse::{Parse, ParseStream},
    Ident, ImplItem, ItemImpl, Path, Token,
};

use crate::common::{compact, fingerprint, parse_comma_separated, peek_keyword, take_marker_attr, try_parse_keyword};

// =============================================================================
// CapabilityArgs - Attribute Arguments Parser
// =============================================================================

pub struct CapabilityArgs {
    pub concept: Path,
    pub stubs: Vec<StubEntry>,
}

impl Parse for CapabilityArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let concept: Path = input.parse()?;
        let mut stubs = Vec::new();

        while input.peek(Token![,]) {
            input.parse::<Token![,]>()?;
            if input.is_empty() {
                break;
            }
            if try_parse_keyword(input, "stubs")? {
                let content;
                syn::parenthesized!(content in input);
                stubs.extend(parse_comma_separated::<StubEntry>(&content)?);
            } else {
                return Err(input.error("expected `stubs(...)`"));
            }
        }

        Ok(CapabilityArgs { concept, stubs })
    }
}

/// Member kind as spelled in the generated bundle.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Method,
    Getter,
    Setter,
}

impl Kind {
    fn tokens(self) -> TokenStream2 {
        match self {
            Kind::Method => quote!(::tola_cursors::concept::MemberKind::Method),
            Kind::Getter => quote!(::tola_cursors::concept::MemberKind::Getter),
            Kind::Setter => quote!(::tola_cursors::concept::MemberKind::Setter),
        }
    }
}

/// One entry of `stubs(...)`: `name`, `get name` or `set name`.
pub struct StubEntry {
    pub kind: Kind,
    pub name: Ident,
}

impl Parse for StubEntry {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let kind = if peek_keyword(input, "get") && input.peek2(Ident) {
            let _: Ident = input.parse()?;
            Kind::Getter
        } else if peek_keyword(input, "set") && input.peek2(Ident) {
            let _: Ident = input.parse()?;
            Kind::Setter
        } else {
            Kind::Method
        };
        let name: Ident = input.parse()?;
        Ok(StubEntry { kind, name })
    }
}

// =============================================================================
// Expansion
// =============================================================================

pub fn expand_capability(args: CapabilityArgs, mut item_impl: ItemImpl) -> TokenStream2 {
    let Some((_, trait_path, _)) = item_impl.trait_.clone() else {
        return syn::Error::new_spanned(
            &item_impl.self_ty,
            "#[capability] must be applied to a trait impl block",
        )
        .to_compile_error();
    };

    let mut defined: Vec<(String, Kind)> = Vec::new();
    for item in &mut item_impl.items {
        let ImplItem::Fn(method) = item else { continue };
        let getter = take_marker_attr(&mut method.attrs, "getter");
        let setter = take_marker_attr(&mut method.attrs, "setter");
        let ident = method.sig.ident.to_string();
        let member = match (getter, setter) {
            (true, true) => {
                return syn::Error::new_spanned(
                    &method.sig.ident,
                    "a member cannot be both #[getter] and #[setter]",
                )
                .to_compile_error();
            }
            (true, false) => (ident, Kind::Getter),
            (false, true) => {
                let name = ident.strip_prefix("set_").unwrap_or(&ident).to_owned();
                (name, Kind::Setter)
            }
            (false, false) => (ident, Kind::Method),
        };
        defined.push(member);
    }

    for stub in &args.stubs {
        let name = stub.name.to_string();
        if defined.iter().any(|(n, k)| *n == name && *k == stub.kind) {
            return syn::Error::new_spanned(
                &stub.name,
                format!("`{name}` is implemented in this block and cannot also be a stub"),
            )
            .to_compile_error();
        }
    }

    let concrete = defined.iter().map(|(name, kind)| {
        let kind = kind.tokens();
        quote! { ::tola_cursors::concept::MemberDef::concrete(#name, #kind) }
    });
    let stubs = args.stubs.iter().map(|stub| {
        let name = stub.name.to_string();
        let kind = stub.kind.tokens();
        quote! { ::tola_cursors::concept::MemberDef::stub(#name, #kind) }
    });

    let self_ty = &item_impl.self_ty;
    let trait_name = trait_path
        .segments
        .last()
        .map_or_else(String::new, |segment| segment.ident.to_string());
    let bundle_name = format!("{} as {}", compact(&quote!(#self_ty)), trait_name);
    let concept = &args.concept;
    let key = format!("{bundle_name} :: {}", compact(&quote!(#concept)));
    let fp = fingerprint(&key);

    let (impl_generics, _, where_clause) = item_impl.generics.split_for_impl();
    quote! {
        #item_impl

        impl #impl_generics ::tola_cursors::concept::Implements<#concept> for #self_ty #where_clause {
            const NAME: &'static str = #bundle_name;
            const MEMBERS: &'static [::tola_cursors::concept::MemberDef] = &[
                #(#concrete,)*
                #(#stubs,)*
            ];
            const FINGERPRINT: u64 = #fp;
        }
    }
}
