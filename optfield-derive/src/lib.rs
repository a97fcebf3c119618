use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

mod options;

use options::{parse_serde_attrs, AbsentPolicy, Options};

/// Attribute macro that wires `Field<T>` members into serde's omit-if-default.
///
/// Place it above `#[derive(Serialize, Deserialize)]`. Every field whose type
/// is `Field<_>` gets:
/// ```ignore
/// #[serde(default, skip_serializing_if = "::optfield_core::Field::is_zero")]
/// ```
/// so an absent field is left out of the output and a missing key decodes as
/// absent, while a present field is always written, default value or not.
///
/// # Arguments
///
/// - `absent = "omit"` (default) - leave absent fields out
/// - `absent = "null"` - write absent fields as null; only `default` is added
/// - `crate = "path"` - where `Field` lives, for re-exports
///
/// Fields that already carry `default` or `skip_serializing_if` keep theirs.
/// Fields with `with`, `serialize_with`, `skip` or `flatten` are left alone.
///
/// # Example
///
/// ```ignore
/// use optfield_core::{optional_fields, Field};
///
/// #[optional_fields]
/// #[derive(serde::Serialize, serde::Deserialize)]
/// struct Person {
///     name: String,
///     age: Field<u32>,
/// }
/// ```
#[proc_macro_attribute]
pub fn optional_fields(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut options = Options::default();
    let parser = syn::meta::parser(|meta| options.parse(meta));
    parse_macro_input!(attr with parser);

    let mut input = parse_macro_input!(item as DeriveInput);

    match add_serde_attributes(&mut input, &options) {
        Ok(()) => quote! { #input }.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Add serde attributes to Field members of a struct or of every enum variant.
fn add_serde_attributes(input: &mut DeriveInput, options: &Options) -> syn::Result<()> {
    match &mut input.data {
        syn::Data::Struct(data) => {
            add_serde_attrs_to_fields(&mut data.fields, options);
        }
        syn::Data::Enum(data) => {
            for variant in &mut data.variants {
                add_serde_attrs_to_fields(&mut variant.fields, options);
            }
        }
        syn::Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "optional_fields cannot be applied to unions",
            ));
        }
    }
    Ok(())
}

fn add_serde_attrs_to_fields(fields: &mut syn::Fields, options: &Options) {
    match fields {
        syn::Fields::Named(named) => {
            for field in &mut named.named {
                add_serde_attr_to_field(field, options);
            }
        }
        syn::Fields::Unnamed(unnamed) => {
            for field in &mut unnamed.unnamed {
                add_serde_attr_to_field(field, options);
            }
        }
        syn::Fields::Unit => {}
    }
}

fn add_serde_attr_to_field(field: &mut syn::Field, options: &Options) {
    if !is_field_type(&field.ty) {
        return;
    }

    let existing = parse_serde_attrs(&field.attrs);
    if existing.custom {
        return;
    }

    if !existing.default {
        field.attrs.push(syn::parse_quote! {
            #[serde(default)]
        });
    }

    if options.absent == AbsentPolicy::Omit && !existing.skip_serializing_if {
        let krate = &options.krate;
        let is_zero = quote! { #krate::Field::is_zero }.to_string().replace(' ', "");
        field.attrs.push(syn::parse_quote! {
            #[serde(skip_serializing_if = #is_zero)]
        });
    }
}

/// Returns true for `Field<_>`, however the path to it is spelled.
fn is_field_type(ty: &syn::Type) -> bool {
    match ty {
        syn::Type::Path(type_path) if type_path.qself.is_none() => type_path
            .path
            .segments
            .last()
            .is_some_and(|segment| {
                segment.ident == "Field"
                    && matches!(segment.arguments, syn::PathArguments::AngleBracketed(_))
            }),
        syn::Type::Group(group) => is_field_type(&group.elem),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(options: &Options, input: DeriveInput) -> String {
        let mut input = input;
        add_serde_attributes(&mut input, options).unwrap();
        quote! { #input }.to_string()
    }

    #[test]
    fn adds_default_and_skip() {
        let out = expand(
            &Options::default(),
            syn::parse_quote! {
                struct Person {
                    name: String,
                    age: Field<u32>,
                }
            },
        );
        assert_eq!(out.matches("serde (default)").count(), 1);
        assert!(out.contains("skip_serializing_if = \"::optfield_core::Field::is_zero\""));
    }

    #[test]
    fn leaves_other_fields_alone() {
        let out = expand(
            &Options::default(),
            syn::parse_quote! {
                struct Person {
                    name: String,
                    tags: Vec<Field<u32>>,
                    nick: Option<String>,
                }
            },
        );
        assert!(!out.contains("serde"));
    }

    #[test]
    fn null_policy_only_adds_default() {
        let options = Options {
            absent: AbsentPolicy::Null,
            ..Options::default()
        };
        let out = expand(
            &options,
            syn::parse_quote! {
                struct Person {
                    age: optfield_core::Field<u32>,
                }
            },
        );
        assert!(out.contains("serde (default)"));
        assert!(!out.contains("skip_serializing_if"));
    }

    #[test]
    fn custom_crate_path() {
        let options = Options {
            krate: syn::parse_quote!(my_crate::reexport),
            ..Options::default()
        };
        let out = expand(
            &options,
            syn::parse_quote! {
                struct Person(Field<u32>);
            },
        );
        assert!(out.contains("\"my_crate::reexport::Field::is_zero\""));
    }

    #[test]
    fn respects_existing_attrs() {
        let out = expand(
            &Options::default(),
            syn::parse_quote! {
                struct Person {
                    #[serde(default, skip_serializing_if = "keep")]
                    age: Field<u32>,
                    #[serde(with = "custom")]
                    height: Field<u32>,
                }
            },
        );
        assert!(!out.contains("is_zero"));
        assert_eq!(out.matches("default").count(), 1);
    }

    #[test]
    fn enum_variants() {
        let out = expand(
            &Options::default(),
            syn::parse_quote! {
                enum Event {
                    Created { at: Field<u64> },
                    Deleted,
                }
            },
        );
        assert!(out.contains("is_zero"));
    }

    #[test]
    fn unions_are_rejected() {
        let mut input: DeriveInput = syn::parse_quote! {
            union Bits {
                a: u32,
                b: f32,
            }
        };
        assert!(add_serde_attributes(&mut input, &Options::default()).is_err());
    }

    #[test]
    fn field_type_detection() {
        assert!(is_field_type(&syn::parse_quote!(Field<u32>)));
        assert!(is_field_type(&syn::parse_quote!(optfield_core::Field<String>)));
        assert!(!is_field_type(&syn::parse_quote!(Field)));
        assert!(!is_field_type(&syn::parse_quote!(Option<Field<u32>>)));
        assert!(!is_field_type(&syn::parse_quote!(&Field<u32>)));
    }
}
