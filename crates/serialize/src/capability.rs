//! Capability predicates: static facts about how a type is encoded.
//!
//! Every type that implements [`Encode`] or [`Decode`] carries a [`Kind`]
//! describing the strategy that was picked for it. The shape traits in this
//! module ([`Sequence`], [`Rebuild`], [`SumType`], [`RebuildSum`],
//! [`TupleLike`], [`Members`]) describe the structure the built-in strategies
//! walk, and the `is_*` functions answer the classification questions for
//! any type without needing an instance.
//!
//! ```ignore
//! use burrow_serialize::capability::{self, Kind};
//!
//! assert!(capability::is_trivial::<u32>());
//! assert!(capability::is_sequence::<Vec<String>>());
//! assert_eq!(<Option<u8> as burrow_serialize::Encode>::KIND, Kind::Optional);
//! ```

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{BitReader, BitWriter, Decode, Encode, Result};

/// The five ways a user can take over the encoding of a type.
///
/// Listed in priority order: when a type offers several forms, the earliest
/// one wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Form {
    /// A strategy registered for the type in a [`Registry`](crate::Registry).
    External,
    /// [`SerializeMethod`](crate::SerializeMethod) /
    /// [`DeserializeMethod`](crate::DeserializeMethod) on the value.
    Method,
    /// The type is its own [`Strategy`](crate::Strategy).
    Associated,
    /// The type names a strategy through
    /// [`DeclaresStrategy`](crate::DeclaresStrategy).
    Strategy,
    /// The type is built directly from the reader with
    /// [`FromReader`](crate::FromReader). Decode only.
    FromReader,
}

/// Classification outcome for one direction (encode or decode) of a type.
///
/// A type that implements neither [`Encode`] nor [`Decode`] is unsupported;
/// that case never reaches runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Raw copy of a fixed-size representation.
    Trivial,
    /// Length field followed by the elements.
    Sequence,
    /// Fixed arity, each element in order.
    Tuple,
    /// Alternative index followed by the active payload.
    Sum,
    /// Presence flag followed by the payload, if any.
    Optional,
    /// Direct members in declaration order.
    Aggregate,
    /// A user customization.
    Custom(Form),
}

impl Kind {
    /// Returns `true` if the kind is a user customization.
    #[must_use]
    pub const fn is_customized(self) -> bool { matches!(self, Self::Custom(_)) }
}

/// A type whose bytes can be copied in and out without any construction
/// logic.
///
/// This is the checked replacement for a raw memory copy: the zerocopy
/// bounds prove at compile time that every bit pattern of the right size is
/// a valid value and that the type has no padding. Derive the zerocopy
/// traits on a `#[repr(C)]` struct and add `#[serialize(trivial)]` to opt it
/// into the trivial strategy.
pub trait Trivial: FromBytes + IntoBytes + Immutable + KnownLayout {}

impl<T: FromBytes + IntoBytes + Immutable + KnownLayout> Trivial for T {}

/// A fixed-arity heterogeneous value addressed by position.
pub trait TupleLike {
    /// Number of elements.
    const ARITY: usize;
}

/// An ordered collection with a known element type and length.
pub trait Sequence {
    /// The element type. Maps use `(key, value)` pairs.
    type Element;

    /// Number of elements that will be written.
    fn element_count(&self) -> usize;

    /// Returns the elements as one contiguous slice, if the collection is
    /// stored that way.
    fn as_contiguous(&self) -> Option<&[Self::Element]> { None }

    /// Writes every element in iteration order through the resolver.
    ///
    /// # Errors
    ///
    /// Propagates errors from element strategies.
    fn encode_elements(&self, writer: &mut BitWriter) -> Result<()>;
}

/// A collection that can be rebuilt from decoded elements.
pub trait Rebuild: Sized {
    /// The element type. Maps use `(key, value)` pairs.
    type Element;

    /// Whether [`from_vec`](Self::from_vec) adopts the vector's storage. Only
    /// such collections take the bulk-copy path.
    const CONTIGUOUS: bool;

    /// Builds the collection from elements already decoded into a vector.
    ///
    /// # Errors
    ///
    /// Fails when the elements do not form a valid collection (for example,
    /// invalid UTF-8 for strings).
    fn from_vec(items: Vec<Self::Element>) -> Result<Self>;

    /// Decodes `len` elements one at a time into a fresh collection.
    ///
    /// # Errors
    ///
    /// Propagates element decoding errors.
    fn decode_elements(reader: &mut BitReader, len: usize) -> Result<Self>
    where
        Self::Element: Decode + 'static,
    {
        let mut items =
            Vec::with_capacity(reader.capacity_hint::<Self::Element>(len));
        for _ in 0..len {
            items.push(reader.decode()?);
        }
        Self::from_vec(items)
    }
}

/// A tagged union over a fixed set of alternatives, seen from the encoding
/// side.
pub trait SumType {
    /// Number of alternatives, not counting the valueless state.
    const ALTERNATIVES: usize;

    /// Index of the active alternative, or `None` when valueless.
    fn active_index(&self) -> Option<usize>;

    /// Writes the payload of the active alternative. Writes nothing when
    /// valueless.
    ///
    /// # Errors
    ///
    /// Propagates payload encoding errors.
    fn encode_active(&self, writer: &mut BitWriter) -> Result<()>;
}

/// A tagged union that can be built from an alternative index and its
/// payload.
pub trait RebuildSum: Sized {
    /// Number of alternatives, not counting the valueless state.
    const ALTERNATIVES: usize;

    /// Builds alternative `index`, reading its payload. `index` is always
    /// below [`ALTERNATIVES`](Self::ALTERNATIVES).
    ///
    /// # Errors
    ///
    /// Propagates payload decoding errors.
    fn decode_alternative(index: usize, reader: &mut BitReader)
    -> Result<Self>;

    /// The valueless state, for types that have one.
    fn valueless() -> Option<Self> { None }
}

/// Receives the members of an aggregate, in declaration order.
pub trait MemberVisitor {
    /// Visits one member. `name` is `None` for positional members.
    ///
    /// # Errors
    ///
    /// Returning an error stops the visit.
    fn visit<F: Encode + ?Sized>(
        &mut self,
        name: Option<&'static str>,
        member: &F,
    ) -> Result<()>;
}

/// Receives mutable references to the members of an aggregate, in
/// declaration order.
pub trait MemberVisitorMut {
    /// Visits one member. `name` is `None` for positional members.
    ///
    /// # Errors
    ///
    /// Returning an error stops the visit.
    fn visit<F: Decode + 'static>(
        &mut self,
        name: Option<&'static str>,
        member: &mut F,
    ) -> Result<()>;
}

/// Structural introspection: enumerates the direct members of an aggregate.
///
/// Implemented by `#[derive(Encode)]` for structs. Skipped members are not
/// visited.
pub trait Members {
    /// Number of members visited.
    const COUNT: usize;

    /// Visits every member in declaration order.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by the visitor.
    fn visit_members<V: MemberVisitor>(&self, visitor: &mut V) -> Result<()>;
}

/// Mutable counterpart of [`Members`], implemented by `#[derive(Decode)]`.
pub trait MembersMut {
    /// Visits every member in declaration order.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by the visitor.
    fn visit_members_mut<V: MemberVisitorMut>(
        &mut self,
        visitor: &mut V,
    ) -> Result<()>;
}

/// Returns `true` if `T` is encoded as a raw copy.
#[must_use]
pub const fn is_trivial<T: Encode + ?Sized>() -> bool {
    matches!(T::KIND, Kind::Trivial)
}

/// Returns `true` if `T` is encoded as a length-prefixed sequence.
#[must_use]
pub const fn is_sequence<T: Encode + ?Sized>() -> bool {
    matches!(T::KIND, Kind::Sequence)
}

/// Returns `true` if `T` is encoded element by element with a static arity.
#[must_use]
pub const fn is_tuple_like<T: Encode + ?Sized>() -> bool {
    matches!(T::KIND, Kind::Tuple)
}

/// Returns `true` if `T` is encoded as a sum type.
#[must_use]
pub const fn is_sum_type<T: Encode + ?Sized>() -> bool {
    matches!(T::KIND, Kind::Sum)
}

/// Returns `true` if `T` is encoded as an optional.
#[must_use]
pub const fn is_optional<T: Encode + ?Sized>() -> bool {
    matches!(T::KIND, Kind::Optional)
}

/// Returns `true` if `T` is encoded through its reflected members.
#[must_use]
pub const fn is_aggregate<T: Encode + ?Sized>() -> bool {
    matches!(T::KIND, Kind::Aggregate)
}

/// Returns `true` if `T` uses a static user customization when encoding.
///
/// External strategies are attached at runtime; use
/// [`BitWriter::resolve`] to account for them.
#[must_use]
pub const fn is_customized<T: Encode + ?Sized>() -> bool {
    T::KIND.is_customized()
}
