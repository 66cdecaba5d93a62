use crate::constructible::expand_constructible;
use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput, Error};

mod attributes;
mod constructible;

#[proc_macro_derive(Constructible, attributes(constructible))]
pub fn generate_constructible(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_constructible(&input)
        .unwrap_or_else(Error::into_compile_error)
        .into()
}
