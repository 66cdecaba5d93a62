use crate::attributes::{ConstructibleAttributes, DefaultDefinition, FieldAttributes};
use itertools::Itertools;
use proc_macro2::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{Attribute, Data, DataStruct, DeriveInput, Error, Field, Fields, FieldsNamed, Result};

const CONSTRUCTIBLE: &str = "constructible";

fn field_attributes(field: &Field) -> Result<FieldAttributes> {
    FieldAttributes::from_attributes(
        field
            .attrs
            .iter()
            .filter(|attribute| attribute.path().is_ident(CONSTRUCTIBLE)),
    )
}

fn generate_parameter(field: &Field) -> Result<TokenStream> {
    let attributes = field_attributes(field)?;
    let name = field
        .ident
        .as_ref()
        .map(ToString::to_string)
        .ok_or_else(|| Error::new(field.span(), "Missing field identifier!"))?;
    let ty = &field.ty;

    let dependency = match &attributes.dependency {
        Some(dependency) => quote! { .with_dependency(#dependency) },
        None if !attributes.is_value && attributes.default.is_none() => quote! {
            .with_dependency(<#ty as wireup_di::descriptor::Injected>::dependency_name())
        },
        None => quote! {},
    };

    let default = match &attributes.default {
        Some(DefaultDefinition::Expr(path)) => quote! { .with_default(#path()) },
        Some(DefaultDefinition::Default) => {
            quote! { .with_default(<#ty as std::default::Default>::default()) }
        }
        None if attributes.is_optional => {
            quote! { .with_default(wireup_di::value::Value::Null) }
        }
        None => quote! {},
    };

    Ok(quote! {
        wireup_di::descriptor::Parameter::new(#name) #dependency #default
    })
}

fn make_named_struct(fields: &FieldsNamed) -> Result<(Vec<TokenStream>, TokenStream)> {
    let parameters: Vec<_> = fields.named.iter().map(generate_parameter).try_collect()?;
    let initializers = fields.named.iter().filter_map(|field| {
        field.ident.as_ref().map(|ident| {
            let name = ident.to_string();
            let ty = &field.ty;
            quote! {
                #ident: arguments.take::<#ty>(#name)?
            }
        })
    });

    Ok((
        parameters,
        quote! {
            Self {
                #(#initializers),*
            }
        },
    ))
}

fn extract_constructible_attributes(
    attributes: &[Attribute],
) -> Result<Option<ConstructibleAttributes>> {
    attributes
        .iter()
        .filter_map(|attribute| {
            if attribute.path().is_ident(CONSTRUCTIBLE) {
                Some(ConstructibleAttributes::try_from(attribute))
            } else {
                None
            }
        })
        .next()
        .transpose()
}

pub fn expand_constructible(input: &DeriveInput) -> Result<TokenStream> {
    if let Data::Struct(DataStruct { fields, .. }) = &input.data {
        let ident = &input.ident;
        let (parameters, generation) = match fields {
            Fields::Named(fields) => make_named_struct(fields)?,
            Fields::Unit => (vec![], quote! { Self }),
            Fields::Unnamed(_) => {
                return Err(Error::new(
                    input.span(),
                    "Can only derive Constructible on structs with named fields!",
                ))
            }
        };

        let ConstructibleAttributes { name, methods } =
            extract_constructible_attributes(&input.attrs)?.unwrap_or_default();
        let name = name
            .map(|name| name.value())
            .unwrap_or_else(|| ident.to_string());
        let methods = methods.map(|methods| {
            quote! {
                fn methods() -> Vec<wireup_di::descriptor::MethodDescriptor> {
                    #methods()
                }
            }
        });

        Ok(quote! {
            #[automatically_derived]
            impl wireup_di::descriptor::Constructible for #ident {
                const NAME: &'static str = #name;

                fn parameters() -> Vec<wireup_di::descriptor::Parameter> {
                    vec![#(#parameters),*]
                }

                #[allow(unused_variables)]
                fn construct(
                    arguments: &mut wireup_di::arguments::BoundArguments,
                ) -> std::result::Result<Self, wireup_di::instance::ErrorPtr> {
                    std::result::Result::Ok(#generation)
                }

                #methods
            }

            const _: () = {
                fn register() -> wireup_di::descriptor::TypeDescriptor {
                    wireup_di::descriptor::TypeDescriptor::of::<#ident>()
                }

                wireup_di::descriptor::internal::submit! {
                    wireup_di::descriptor::internal::TypeRegistrar {
                        register
                    }
                };
            };
        })
    } else {
        Err(Error::new(
            input.span(),
            "Can only derive Constructible on structs!",
        ))
    }
}
