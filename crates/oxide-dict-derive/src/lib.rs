//! Derive macros for dialect capability sets.
//!
//! This crate provides the `#[derive(Capabilities)]` macro, which turns a
//! struct of flags, templates and limits into a name-addressable capability
//! table.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Expr, Fields, Ident, Lit, Meta, parse_macro_input};

/// Derives `CapabilityLookup` for a struct with named fields.
///
/// Every field type must have a `From<&FieldType>` conversion into
/// `CapabilityValue`.
///
/// # Field Attributes
///
/// - `#[capability(skip)]` - Leaves the field out of the lookup
/// - `#[capability(name = "capability_name")]` - Overrides the lookup name
///   (defaults to the field name)
///
/// # Generated Items
///
/// - `capability(name)` matching both the snake_case name and its camelCase
///   spelling
/// - `capability_names()` listing the snake_case names in field order
#[proc_macro_derive(Capabilities, attributes(capability))]
pub fn derive_capabilities(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive_capabilities_impl(&input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

fn derive_capabilities_impl(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Capabilities derive only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Capabilities derive only supports structs",
            ));
        }
    };

    let mut entries: Vec<CapabilityInfo> = Vec::new();
    for field in fields {
        let Some(field_name) = field.ident.as_ref() else {
            continue;
        };
        let attrs = parse_capability_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }
        let name = attrs.name.unwrap_or_else(|| field_name.to_string());
        entries.push(CapabilityInfo {
            field_name: field_name.clone(),
            camel_name: to_camel_case(&name),
            name,
        });
    }

    let match_arms: Vec<TokenStream2> = entries
        .iter()
        .map(|info| {
            let field_name = &info.field_name;
            let name = &info.name;
            let pattern = if info.camel_name == info.name {
                quote! { #name }
            } else {
                let camel = &info.camel_name;
                quote! { #name | #camel }
            };
            quote! {
                #pattern => ::core::option::Option::Some(
                    ::core::convert::From::from(&self.#field_name)
                ),
            }
        })
        .collect();

    let all_names: Vec<&str> = entries.iter().map(|c| c.name.as_str()).collect();

    let expanded = quote! {
        impl ::oxide_dict_core::capabilities::CapabilityLookup for #struct_name {
            fn capability(
                &self,
                name: &str,
            ) -> ::core::option::Option<::oxide_dict_core::capabilities::CapabilityValue<'_>> {
                match name {
                    #(#match_arms)*
                    _ => ::core::option::Option::None,
                }
            }

            fn capability_names() -> &'static [&'static str] {
                &[#(#all_names),*]
            }
        }
    };

    Ok(expanded)
}

struct CapabilityInfo {
    field_name: Ident,
    name: String,
    camel_name: String,
}

struct CapabilityAttrs {
    name: Option<String>,
    skip: bool,
}

fn parse_capability_attrs(attrs: &[Attribute]) -> syn::Result<CapabilityAttrs> {
    let mut result = CapabilityAttrs {
        name: None,
        skip: false,
    };

    for attr in attrs {
        if attr.path().is_ident("capability") {
            // Handle empty attribute like #[capability]
            if matches!(attr.meta, Meta::Path(_)) {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    result.skip = true;
                    Ok(())
                } else if meta.path.is_ident("name") {
                    let value: Expr = meta.value()?.parse()?;
                    if let Expr::Lit(lit) = value {
                        if let Lit::Str(s) = lit.lit {
                            result.name = Some(s.value());
                        }
                    }
                    Ok(())
                } else {
                    Err(meta.error("unsupported capability attribute"))
                }
            })?;
        }
    }

    Ok(result)
}

fn to_camel_case(s: &str) -> String {
    let mut result = String::new();
    let mut capitalize_next = false;
    for c in s.chars() {
        if c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::to_camel_case;

    #[test]
    fn test_to_camel_case() {
        assert_eq!(
            to_camel_case("supports_locking_with_outer_join"),
            "supportsLockingWithOuterJoin"
        );
        assert_eq!(to_camel_case("range"), "range");
    }
}
