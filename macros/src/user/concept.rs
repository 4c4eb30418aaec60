use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse::ParseStream, Data, DeriveInput, Token};

/// #[derive(Concept)] points a marker type at its concept descriptor.
pub fn expand_derive_concept(input: DeriveInput) -> TokenStream2 {
    let ident = &input.ident;

    if !matches!(input.data, Data::Struct(_)) {
        return syn::Error::new_spanned(ident, "#[derive(Concept)] only supports structs")
            .to_compile_error();
    }

    let mut target = None;
    for attr in &input.attrs {
        if !attr.path().is_ident("descriptor") {
            continue;
        }
        match attr.parse_args_with(parse_static_target) {
            Ok(path) => target = Some(path),
            Err(err) => return err.to_compile_error(),
        }
    }

    let Some(path) = target else {
        return syn::Error::new_spanned(
            ident,
            "#[derive(Concept)] requires #[descriptor(static = PATH)]",
        )
        .to_compile_error();
    };

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    quote! {
        impl #impl_generics ::tola_cursors::concept::ConceptTag for #ident #ty_generics #where_clause {
            fn concept() -> &'static ::tola_cursors::concept::Concept {
                &#path
            }
        }
    }
}

// `static = PATH`
fn parse_static_target(input: ParseStream) -> syn::Result<syn::Path> {
    input.parse::<Token![static]>()?;
    input.parse::<Token![=]>()?;
    input.parse()
}
