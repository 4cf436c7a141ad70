//! User customization forms.
//!
//! A type takes over its own encoding by implementing one of the traits below
//! and naming the form in `#[serialize(...)]` on its derive. The derive ranks
//! the forms a type declares and generates the single
//! [`Encode`](crate::Encode) / [`Decode`](crate::Decode) impl that calls the
//! winner:
//!
//! | flag          | encode                 | decode                     |
//! |---------------|------------------------|----------------------------|
//! | `method`      | [`SerializeMethod`]    | [`DeserializeMethod`]      |
//! | `associated`  | `<Self as Strategy<Self>>` | `<Self as Strategy<Self>>` |
//! | `strategy`    | [`DeclaresStrategy`]   | [`DeclaresStrategy`]       |
//! | `from_reader` | n/a                    | [`FromReader`]             |
//!
//! Decoding through `method`, `associated` or `strategy` starts from
//! `Default::default()` and fills the value in place.
//!
//! External strategies registered in a [`Registry`](crate::Registry) outrank
//! all of these and need no derive.

use crate::{BitReader, BitWriter, Result};

/// Encoding implemented as a method on the value.
pub trait SerializeMethod {
    /// Writes `self`.
    ///
    /// # Errors
    ///
    /// Propagates errors from nested strategies.
    fn serialize(&self, writer: &mut BitWriter) -> Result<()>;
}

/// Decoding implemented as a method filling an existing value.
pub trait DeserializeMethod {
    /// Overwrites `self` with a value read from `reader`.
    ///
    /// # Errors
    ///
    /// Propagates read errors.
    fn deserialize(&mut self, reader: &mut BitReader) -> Result<()>;
}

/// A stateless encode/decode pair for values of type `T`.
///
/// Implemented by a type for itself (the `associated` form), by a separate
/// marker type named through [`DeclaresStrategy`], or by the types that
/// [`members!`](crate::members!) declares.
pub trait Strategy<T: ?Sized> {
    /// Writes `value`.
    ///
    /// # Errors
    ///
    /// Propagates errors from nested strategies.
    fn serialize(writer: &mut BitWriter, value: &T) -> Result<()>;

    /// Overwrites `value` with a value read from `reader`.
    ///
    /// # Errors
    ///
    /// Propagates read errors.
    fn deserialize(reader: &mut BitReader, value: &mut T) -> Result<()>;
}

/// Names the [`Strategy`] that encodes `Self`.
pub trait DeclaresStrategy {
    /// The strategy type.
    type Strategy: Strategy<Self>;
}

/// Builds a value directly from the reader.
///
/// Used for types without a meaningful default to decode into.
pub trait FromReader: Sized {
    /// Reads a new value.
    ///
    /// # Errors
    ///
    /// Propagates read errors.
    fn from_reader(reader: &mut BitReader) -> Result<Self>;
}
