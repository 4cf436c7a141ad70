//! The [`Encode`] trait and the transparent wrapper impls.
//!
//! Impls for the built-in shapes (trivial values, sequences, tuples, sum
//! types, optionals and aggregates) live next to their strategy in
//! [`strategy`](crate::strategy).

use std::{
    borrow::Cow,
    cmp::Reverse,
    marker::PhantomData,
    num::Wrapping,
    rc::Rc,
    sync::Arc,
};

use crate::{BitWriter, Result, capability::Kind};

/// A type that can be written to a [`BitWriter`].
///
/// There is exactly one impl per type; it embodies the strategy picked for
/// the type, and [`KIND`](Self::KIND) names that strategy. External
/// strategies registered at runtime take precedence over the impl when the
/// value is written through [`BitWriter::encode`].
///
/// Implement it with `#[derive(Encode)]`. Structs become aggregates, enums
/// become sum types, and `#[serialize(...)]` container flags pick one of the
/// customization forms instead.
///
/// # Example
///
/// ```ignore
/// use burrow_serialize::{BitWriter, Encode, Result, capability::Kind};
///
/// struct Celsius(f32);
///
/// impl Encode for Celsius {
///     const KIND: Kind = Kind::Trivial;
///
///     fn encode(&self, writer: &mut BitWriter) -> Result<()> {
///         writer.encode(&self.0)
///     }
/// }
/// ```
pub trait Encode {
    /// The strategy this impl implements.
    const KIND: Kind;

    /// Writes `self`.
    ///
    /// Nested values should be written with [`BitWriter::encode`] so that
    /// external strategies apply to them. Calling this method directly skips
    /// the external strategy lookup for `self` only.
    ///
    /// # Errors
    ///
    /// Propagates errors raised by nested strategies.
    fn encode(&self, writer: &mut BitWriter) -> Result<()>;

    /// The bytes of `items` if they can be copied as one block.
    ///
    /// Only trivially-copyable types return `Some`; the bytes must equal the
    /// concatenation of each element's encoding.
    #[doc(hidden)]
    #[must_use]
    fn raw_bytes(items: &[Self]) -> Option<&[u8]>
    where
        Self: Sized,
    {
        let _ = items;
        None
    }
}

// =============================================================================
// Transparent wrappers
// =============================================================================

macro_rules! impl_encode_deref {
    ($($ty:ty),+) => {
        $(
            impl<T: Encode + ?Sized> Encode for $ty {
                const KIND: Kind = T::KIND;

                fn encode(&self, writer: &mut BitWriter) -> Result<()> {
                    writer.encode::<T>(self)
                }
            }
        )+
    };
}

impl_encode_deref!(&T, &mut T, Box<T>, Rc<T>, Arc<T>);

impl<T> Encode for Cow<'_, T>
where
    T: Encode + ToOwned + ?Sized,
{
    const KIND: Kind = T::KIND;

    fn encode(&self, writer: &mut BitWriter) -> Result<()> {
        writer.encode::<T>(self)
    }
}

impl<T: Encode> Encode for Wrapping<T> {
    const KIND: Kind = T::KIND;

    fn encode(&self, writer: &mut BitWriter) -> Result<()> {
        writer.encode(&self.0)
    }
}

impl<T: Encode> Encode for Reverse<T> {
    const KIND: Kind = T::KIND;

    fn encode(&self, writer: &mut BitWriter) -> Result<()> {
        writer.encode(&self.0)
    }
}

// =============================================================================
// Zero-sized values
// =============================================================================

impl<T: ?Sized> Encode for PhantomData<T> {
    const KIND: Kind = Kind::Tuple;

    fn encode(&self, _writer: &mut BitWriter) -> Result<()> { Ok(()) }
}
