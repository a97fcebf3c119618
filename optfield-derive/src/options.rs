use syn::meta::ParseNestedMeta;

/// How a struct encodes its absent fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum AbsentPolicy {
    /// Leave the key out.
    #[default]
    Omit,
    /// Write the key with a null value.
    Null,
}

/// Arguments of `#[optional_fields(...)]`.
pub(crate) struct Options {
    pub absent: AbsentPolicy,
    /// Path to the crate exporting `Field`.
    pub krate: syn::Path,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            absent: AbsentPolicy::Omit,
            krate: syn::parse_quote!(::optfield_core),
        }
    }
}

impl Options {
    pub fn parse(&mut self, meta: ParseNestedMeta) -> syn::Result<()> {
        if meta.path.is_ident("absent") {
            let value: syn::LitStr = meta.value()?.parse()?;
            self.absent = match value.value().as_str() {
                "omit" => AbsentPolicy::Omit,
                "null" => AbsentPolicy::Null,
                _ => {
                    return Err(syn::Error::new_spanned(
                        value,
                        "expected `absent = \"omit\"` or `absent = \"null\"`",
                    ));
                }
            };
            Ok(())
        } else if meta.path.is_ident("crate") {
            let value: syn::LitStr = meta.value()?.parse()?;
            self.krate = value.parse()?;
            Ok(())
        } else {
            Err(meta.error("unsupported optional_fields argument"))
        }
    }
}

/// Serde attributes already present on a field.
#[derive(Default)]
pub(crate) struct SerdeAttrs {
    pub default: bool,
    pub skip_serializing_if: bool,
    /// The field's encoding is customised, so it is left alone.
    pub custom: bool,
}

pub(crate) fn parse_serde_attrs(attrs: &[syn::Attribute]) -> SerdeAttrs {
    let mut result = SerdeAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("serde") {
            continue;
        }

        let _ = attr.parse_nested_meta(|meta| {
            let path = &meta.path;
            if path.is_ident("default") {
                result.default = true;
            } else if path.is_ident("skip_serializing_if") {
                result.skip_serializing_if = true;
            } else if ["with", "serialize_with", "skip", "skip_serializing", "flatten"]
                .iter()
                .any(|name| path.is_ident(name))
            {
                result.custom = true;
            }

            // Consume `= value` or `(...)` so later entries are still seen
            if meta.input.peek(syn::Token![=]) {
                let _: syn::Expr = meta.value()?.parse()?;
            } else if meta.input.peek(syn::token::Paren) {
                let _: proc_macro2::TokenTree = meta.input.parse()?;
            }
            Ok(())
        });
    }

    result
}
