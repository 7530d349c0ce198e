// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

extern crate proc_macro;

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DataEnum, DeriveInput, Fields, LitStr};

/// Options collected from `#[objmap(...)]` attributes.
#[derive(Default)]
struct Options {
    name: Option<String>,
    rename: Option<String>,
    skip: bool,
}

fn parse_options(attrs: &[Attribute]) -> syn::Result<Options> {
    let mut options = Options::default();
    for attr in attrs {
        if !attr.path().is_ident("objmap") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                options.skip = true;
                Ok(())
            } else if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                options.rename = Some(value.value());
                Ok(())
            } else if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                options.name = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("expected `name`, `rename` or `skip`"))
            }
        })?;
    }
    Ok(options)
}

/// `#[derive(Mappable)]` macro: registers an objmap schema and implements
/// `objmap::MapValue`.
///
/// Supports:
/// - Structs with named fields whose types implement `MapValue`
///   (field order is declaration order)
/// - Field-less enums (member values are the discriminants)
///
/// Attributes:
/// - `#[objmap(name = "...")]` on the type overrides the registered name
/// - `#[objmap(rename = "...")]` on a field or variant renames it
/// - `#[objmap(skip)]` on a field leaves it out of the schema; it is filled
///   with `Default::default()` when converting back
///
/// Example:
/// ```ignore
/// use objmap::Mappable;
///
/// #[derive(Mappable)]
/// #[objmap(name = "Customer")]
/// struct Customer {
///     id: i32,
///     #[objmap(rename = "FullName")]
///     name: String,
///     orders: Vec<Order>,
///     #[objmap(skip)]
///     cache: Option<String>,
/// }
/// ```
#[proc_macro_derive(Mappable, attributes(objmap))]
pub fn derive_mappable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Mappable cannot be derived for generic types",
        ));
    }

    let options = parse_options(&input.attrs)?;
    if options.rename.is_some() || options.skip {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "only `name` is allowed on the type",
        ));
    }
    let type_name = options
        .name
        .unwrap_or_else(|| input.ident.to_string());

    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => expand_struct(input, &type_name, &fields.named),
            _ => Err(syn::Error::new_spanned(
                &input.ident,
                "Only named fields are supported",
            )),
        },
        Data::Enum(data) => expand_enum(input, &type_name, data),
        Data::Union(_) => Err(syn::Error::new_spanned(
            &input.ident,
            "Unions are not supported",
        )),
    }
}

fn expand_struct(
    input: &DeriveInput,
    type_name: &str,
    fields: &syn::punctuated::Punctuated<syn::Field, syn::token::Comma>,
) -> syn::Result<proc_macro2::TokenStream> {
    let ident = &input.ident;

    let mut mapped_idents = Vec::new();
    let mut mapped_names = Vec::new();
    let mut mapped_types = Vec::new();
    let mut skipped_idents = Vec::new();

    for field in fields {
        let Some(field_ident) = field.ident.as_ref() else {
            return Err(syn::Error::new_spanned(field, "Field must have a name"));
        };
        let options = parse_options(&field.attrs)?;
        if options.name.is_some() {
            return Err(syn::Error::new_spanned(
                field_ident,
                "use `rename` on fields",
            ));
        }
        if options.skip {
            skipped_idents.push(field_ident.clone());
            continue;
        }
        mapped_names.push(
            options
                .rename
                .unwrap_or_else(|| field_ident.to_string()),
        );
        mapped_idents.push(field_ident.clone());
        mapped_types.push(field.ty.clone());
    }

    Ok(quote! {
        impl ::objmap::MapValue for #ident {
            fn type_name(
                types: &::objmap::TypeRegistry,
            ) -> ::objmap::Result<::objmap::TypeName> {
                let name = ::objmap::TypeName::new(#type_name);
                types.ensure_object(&name, |types| {
                    Ok(::objmap::types::ObjectBuilder::new(#type_name)
                        #(
                            .field(
                                #mapped_names,
                                <#mapped_types as ::objmap::MapValue>::type_name(types)?,
                            )
                        )*
                        .build())
                })
            }

            fn to_value(
                &self,
                types: &::objmap::TypeRegistry,
            ) -> ::objmap::Result<::objmap::Value> {
                let name = <Self as ::objmap::MapValue>::type_name(types)?;
                let object = types.instantiate(&name)?;
                #(
                    object.set(
                        #mapped_names,
                        ::objmap::MapValue::to_value(&self.#mapped_idents, types)?,
                    )?;
                )*
                Ok(::objmap::Value::Object(object))
            }

            fn from_value(
                value: &::objmap::Value,
                types: &::objmap::TypeRegistry,
            ) -> ::objmap::Result<Self> {
                let object = match value {
                    ::objmap::Value::Object(object) => object,
                    other => {
                        return Err(::objmap::MapError::TypeMismatch {
                            expected: #type_name.to_string(),
                            got: other.type_label(),
                        })
                    }
                };
                Ok(Self {
                    #(
                        #mapped_idents: <#mapped_types as ::objmap::MapValue>::from_value(
                            &object.get(#mapped_names)?,
                            types,
                        )?,
                    )*
                    #(
                        #skipped_idents: ::core::default::Default::default(),
                    )*
                })
            }
        }
    })
}

fn expand_enum(
    input: &DeriveInput,
    type_name: &str,
    data: &DataEnum,
) -> syn::Result<proc_macro2::TokenStream> {
    let ident = &input.ident;
    if data.variants.is_empty() {
        return Err(syn::Error::new_spanned(ident, "enum has no members"));
    }

    let mut variants = Vec::new();
    let mut variant_names = Vec::new();
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "Only field-less enums are supported",
            ));
        }
        let options = parse_options(&variant.attrs)?;
        if options.skip || options.name.is_some() {
            return Err(syn::Error::new_spanned(
                &variant.ident,
                "only `rename` is allowed on variants",
            ));
        }
        variant_names.push(
            options
                .rename
                .unwrap_or_else(|| variant.ident.to_string()),
        );
        variants.push(variant.ident.clone());
    }

    Ok(quote! {
        impl ::objmap::MapValue for #ident {
            fn type_name(
                types: &::objmap::TypeRegistry,
            ) -> ::objmap::Result<::objmap::TypeName> {
                let name = ::objmap::TypeName::new(#type_name);
                if !types.contains(&name) {
                    types.register(
                        ::objmap::types::EnumBuilder::new(#type_name)
                            #( .variant_value(#variant_names, #ident::#variants as i64) )*
                            .build(),
                    )?;
                }
                Ok(name)
            }

            fn to_value(
                &self,
                types: &::objmap::TypeRegistry,
            ) -> ::objmap::Result<::objmap::Value> {
                let name = <Self as ::objmap::MapValue>::type_name(types)?;
                let descriptor = types.get(&name)?;
                let members = descriptor.as_enum().ok_or_else(|| {
                    ::objmap::MapError::TypeMismatch {
                        expected: "enum type".to_string(),
                        got: name.to_string(),
                    }
                })?;
                let raw: i64 = match self {
                    #( Self::#variants => #ident::#variants as i64, )*
                };
                Ok(::objmap::Value::Enum(::objmap::EnumValue::new(
                    name.clone(),
                    members,
                    raw,
                )))
            }

            fn from_value(
                value: &::objmap::Value,
                _types: &::objmap::TypeRegistry,
            ) -> ::objmap::Result<Self> {
                let raw = match value {
                    ::objmap::Value::Enum(e) => e.value,
                    other => {
                        return Err(::objmap::MapError::TypeMismatch {
                            expected: #type_name.to_string(),
                            got: other.type_label(),
                        })
                    }
                };
                #(
                    if raw == #ident::#variants as i64 {
                        return Ok(Self::#variants);
                    }
                )*
                Err(::objmap::MapError::ConversionFailed {
                    from: raw.to_string(),
                    to: ::objmap::TypeName::new(#type_name),
                    reason: "value is not a member".to_string(),
                })
            }
        }
    })
}
