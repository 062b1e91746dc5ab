extern crate proc_macro;

use quote::quote;
use syn::{parse_macro_input, DeriveInput};

/// Derives a Debug-backed Display impl plus std::error::Error, which is all
/// the internal error enums in privd need; wire-facing errors write their
/// own Display because their text is part of the protocol.
#[proc_macro_derive(Error)]
pub fn derive_error(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = input.ident;

    let expanded = quote! {
        impl ::std::fmt::Display for #name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                match &*self {
                    x => write!(f, "{:?}", x),
                }
            }
        }
        impl ::std::error::Error for #name {}
    };

    proc_macro::TokenStream::from(expanded)
}
