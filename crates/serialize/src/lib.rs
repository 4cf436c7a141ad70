//! Burrow Serialization Library
//!
//! A compact binary serialization engine. Values are written to a
//! [`BitWriter`] and read back from a [`BitReader`]; how a value is laid out
//! is decided per type by a small dispatch resolver.
//!
//! # Overview
//!
//! Every type that can be serialized implements [`Encode`] and [`Decode`].
//! The impl embodies one strategy, chosen in this order:
//!
//! 1. an external strategy registered in a [`Registry`] (runtime, highest
//!    priority);
//! 2. methods on the value ([`SerializeMethod`], [`DeserializeMethod`]);
//! 3. the type acting as its own [`Strategy`];
//! 4. a strategy type named by [`DeclaresStrategy`];
//! 5. construction from the reader ([`FromReader`], decode only);
//! 6. a built-in strategy: trivial copy, sequence, tuple, sum type,
//!    optional, or reflected aggregate.
//!
//! Forms 2 to 6 are ranked at build time by the derive macros. Form 1 is
//! looked up on every [`BitWriter::encode`] and [`BitReader::decode`] call,
//! so a registered strategy also applies to values nested inside containers.
//!
//! The [`capability`] module exposes the classification as `const fn`
//! predicates.
//!
//! # Derive Macros
//!
//! ```ignore
//! #[derive(Encode, Decode)]
//! struct Point { x: i32, y: i32 }
//!
//! #[derive(Encode, Decode)]
//! enum Shape {
//!     Circle { radius: f32 },
//!     Polygon(Vec<Point>),
//!     #[serialize(empty)]
//!     Nothing,
//! }
//! ```
//!
//! ## Field Attributes
//!
//! `#[serialize(skip)]` leaves a field out of the encoding. Decoding fills
//! it with `Default::default()`.
//!
//! ## Container Attributes
//!
//! `#[serialize(method)]`, `#[serialize(associated)]`,
//! `#[serialize(strategy)]`, `#[serialize(from_reader)]` and
//! `#[serialize(trivial)]` select a customization form instead of the
//! built-in shape. See [`custom`].
//!
//! # Wire Format
//!
//! Fixed-size values are their raw bytes in native byte order. Size and
//! index fields are `u64`. No type tags, versions or padding are written;
//! the format is meant for processes that share a build.
//!
//! # Example
//!
//! ```ignore
//! use burrow_serialize::{from_bytes, to_bytes};
//!
//! let bytes = to_bytes(&(42u32, String::from("answer")))?;
//! let (number, text): (u32, String) = from_bytes(&bytes)?;
//! ```

// Allow derive macros to reference this crate as `burrow_serialize` internally
extern crate self as burrow_serialize;

pub mod capability;
pub mod config;
pub mod custom;
pub mod decode;
pub mod encode;
pub mod error;
pub mod members;
pub mod pool;
pub mod reader;
pub mod registry;
pub mod strategy;
pub mod writer;

pub use burrow_serialize_derive::{Decode, Encode};
pub use config::Config;
pub use custom::{
    DeclaresStrategy, DeserializeMethod, FromReader, SerializeMethod, Strategy,
};
pub use decode::Decode;
pub use encode::Encode;
pub use error::{Error, Result};
pub use pool::BufferPool;
pub use reader::BitReader;
pub use registry::{DeserializeWith, Registry, SerializeWith};
pub use writer::BitWriter;

/// Encodes `value` into a fresh buffer.
///
/// # Errors
///
/// Propagates errors raised by user-supplied strategies.
pub fn to_bytes<T: Encode + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut writer = BitWriter::new();
    writer.encode(value)?;
    Ok(writer.into_inner())
}

/// Decodes a `T` from the front of `bytes`. Trailing bytes are ignored.
///
/// # Errors
///
/// Returns an error if `bytes` does not hold a valid `T`.
pub fn from_bytes<T: Decode + 'static>(bytes: &[u8]) -> Result<T> {
    BitReader::from_slice(bytes).decode()
}
