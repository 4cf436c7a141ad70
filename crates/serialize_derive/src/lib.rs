//! Derive macros for the `Encode` and `Decode` traits.
//!
//! This crate provides derive macros for automatically implementing the
//! `Encode` and `Decode` traits from the `burrow_serialize` crate. Use them
//! through the re-exports in `burrow_serialize`.
//!
//! # Built-in Shapes
//!
//! Without container attributes:
//! - structs (named, tuple, unit) become reflected aggregates: the derive
//!   implements `Members` / `MembersMut` and encodes each member in
//!   declaration order;
//! - enums become sum types: the derive implements `SumType` /
//!   `RebuildSum`, writing the variant index followed by the variant's
//!   fields.
//!
//! ```ignore
//! use burrow_serialize::{Decode, Encode};
//!
//! #[derive(Encode, Decode)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! #[derive(Encode, Decode)]
//! enum Message {
//!     Quit,
//!     Move { x: i32, y: i32 },
//!     Write(String),
//! }
//! ```
//!
//! # Container Attributes
//!
//! `#[serialize(...)]` on the type selects a customization form. When several
//! are present the highest-ranked one wins:
//!
//! | rank | flag          | encode                    | decode                       |
//! |------|---------------|---------------------------|------------------------------|
//! | 1    | `from_reader` | (ignored)                 | `FromReader::from_reader`    |
//! | 2    | `method`      | `SerializeMethod`         | `DeserializeMethod`          |
//! | 3    | `associated`  | `Strategy<Self> for Self` | `Strategy<Self> for Self`    |
//! | 4    | `strategy`    | `DeclaresStrategy`        | `DeclaresStrategy`           |
//! | 5    | `trivial`     | raw copy                  | raw copy                     |
//!
//! Forms 2 to 4 decode by filling `Default::default()` in place, so the type
//! must implement `Default`. `trivial` requires the zerocopy `FromBytes`,
//! `IntoBytes`, `Immutable` and `KnownLayout` derives.
//!
//! # Field Attributes
//!
//! `#[serialize(skip)]` leaves a field out of the encoding; decoding fills it
//! with `Default::default()`.
//!
//! # Variant Attributes
//!
//! `#[serialize(empty)]` on one unit variant makes it the valueless state. It
//! is written as the reserved empty index and does not take up an
//! alternative index.
//!
//! ```ignore
//! #[derive(Encode, Decode)]
//! enum Slot {
//!     #[serialize(empty)]
//!     Vacant,
//!     Occupied(u32), // index 0
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use syn::{DeriveInput, Generics, parse_macro_input};

mod attributes;
mod decode;
mod encode;

/// Derive macro for `Encode`.
///
/// See the crate documentation for the supported attributes.
#[proc_macro_derive(Encode, attributes(serialize))]
pub fn derive_encode(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    encode::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Derive macro for `Decode`.
///
/// See the crate documentation for the supported attributes.
#[proc_macro_derive(Decode, attributes(serialize))]
pub fn derive_decode(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    decode::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Adds `T: #bound` for every type parameter.
fn add_bounds(generics: &mut Generics, bound: &TokenStream2) {
    let params: Vec<_> =
        generics.type_params().map(|param| param.ident.clone()).collect();
    let where_clause = generics.make_where_clause();

    for ident in params {
        where_clause
            .predicates
            .push(syn::parse_quote!(#ident: #bound));
    }
}
