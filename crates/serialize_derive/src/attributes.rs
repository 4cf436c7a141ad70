//! Parsing of `#[serialize(...)]` attributes.

use syn::{Attribute, DataEnum, Field, Fields, Variant};

/// The customization forms a container declares.
#[derive(Debug, Default, Clone, Copy)]
pub struct Container {
    pub method: bool,
    pub associated: bool,
    pub strategy: bool,
    pub from_reader: bool,
    pub trivial: bool,
}

/// The form that wins for one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    FromReader,
    Method,
    Associated,
    Strategy,
    Trivial,
    Shape,
}

impl Container {
    pub fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut container = Self::default();

        for_each_flag(attrs, |flag| {
            let slot = match flag.to_string().as_str() {
                "method" => &mut container.method,
                "associated" => &mut container.associated,
                "strategy" => &mut container.strategy,
                "from_reader" => &mut container.from_reader,
                "trivial" => &mut container.trivial,
                _ => {
                    return Err(syn::Error::new_spanned(
                        flag,
                        "unknown container attribute, expected one of \
                         `method`, `associated`, `strategy`, `from_reader`, \
                         `trivial`",
                    ));
                }
            };
            *slot = true;
            Ok(())
        })?;

        Ok(container)
    }

    /// The form `Encode` uses. `from_reader` only affects decoding.
    pub const fn encode_form(self) -> Form {
        if self.method {
            Form::Method
        } else if self.associated {
            Form::Associated
        } else if self.strategy {
            Form::Strategy
        } else if self.trivial {
            Form::Trivial
        } else {
            Form::Shape
        }
    }

    /// The form `Decode` uses.
    pub const fn decode_form(self) -> Form {
        if self.from_reader { Form::FromReader } else { self.encode_form() }
    }
}

/// Returns `true` for fields marked `#[serialize(skip)]`.
pub fn is_skipped(field: &Field) -> syn::Result<bool> {
    let mut skip = false;

    for_each_flag(&field.attrs, |flag| {
        if flag == "skip" {
            skip = true;
            Ok(())
        } else {
            Err(syn::Error::new_spanned(
                flag,
                "unknown field attribute, expected `skip`",
            ))
        }
    })?;

    Ok(skip)
}

/// Returns `true` for the variant marked `#[serialize(empty)]`.
fn is_empty(variant: &Variant) -> syn::Result<bool> {
    let mut empty = false;

    for_each_flag(&variant.attrs, |flag| {
        if flag == "empty" {
            empty = true;
            Ok(())
        } else {
            Err(syn::Error::new_spanned(
                flag,
                "unknown variant attribute, expected `empty`",
            ))
        }
    })?;

    if empty && !matches!(variant.fields, Fields::Unit) {
        return Err(syn::Error::new_spanned(
            variant,
            "only a unit variant can be the empty state",
        ));
    }

    Ok(empty)
}

/// A variant together with the index it is written with. The empty variant
/// has no index.
pub struct IndexedVariant<'a> {
    pub variant: &'a Variant,
    pub index: Option<usize>,
}

/// Assigns indices in declaration order, skipping the empty variant.
pub fn index_variants(data: &DataEnum) -> syn::Result<Vec<IndexedVariant<'_>>> {
    let mut next = 0;
    let mut seen_empty = false;
    let mut indexed = Vec::with_capacity(data.variants.len());

    for variant in &data.variants {
        let index = if is_empty(variant)? {
            if seen_empty {
                return Err(syn::Error::new_spanned(
                    variant,
                    "at most one variant can be marked `empty`",
                ));
            }
            seen_empty = true;
            None
        } else {
            next += 1;
            Some(next - 1)
        };

        indexed.push(IndexedVariant { variant, index });
    }

    Ok(indexed)
}

fn for_each_flag(
    attrs: &[Attribute],
    mut f: impl FnMut(&syn::Ident) -> syn::Result<()>,
) -> syn::Result<()> {
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serialize")) {
        attr.parse_nested_meta(|meta| match meta.path.get_ident() {
            Some(ident) => f(ident),
            None => Err(meta.error("expected a flag")),
        })?;
    }
    Ok(())
}
