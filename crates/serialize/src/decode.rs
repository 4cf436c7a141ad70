//! The [`Decode`] trait and the transparent wrapper impls.

use std::{
    borrow::Cow,
    cmp::Reverse,
    marker::PhantomData,
    num::Wrapping,
    rc::Rc,
    sync::Arc,
};

use crate::{BitReader, Result, capability::Kind};

/// A type that can be read back from a [`BitReader`].
///
/// The counterpart of [`Encode`](crate::Encode). For every type implementing
/// both, decoding the bytes produced by encoding a value yields a value
/// equal to the original.
///
/// # Example
///
/// ```ignore
/// use burrow_serialize::{BitReader, Decode, Result, capability::Kind};
///
/// struct Celsius(f32);
///
/// impl Decode for Celsius {
///     const KIND: Kind = Kind::Trivial;
///
///     fn decode(reader: &mut BitReader) -> Result<Self> {
///         Ok(Self(reader.decode()?))
///     }
/// }
/// ```
pub trait Decode: Sized {
    /// The strategy this impl implements.
    const KIND: Kind;

    /// Reads a new value.
    ///
    /// Nested values should be read with [`BitReader::decode`] so that
    /// external strategies apply to them.
    ///
    /// # Errors
    ///
    /// Propagates read errors and errors raised by nested strategies.
    fn decode(reader: &mut BitReader) -> Result<Self>;

    /// Reads a value into `self`, reusing its storage where the strategy
    /// allows.
    ///
    /// # Errors
    ///
    /// Same as [`decode`](Self::decode). On error `self` is left in a valid
    /// but unspecified state.
    fn decode_into(&mut self, reader: &mut BitReader) -> Result<()> {
        *self = Self::decode(reader)?;
        Ok(())
    }

    /// Reads `len` values as one block copy, for trivially-copyable types.
    ///
    /// Returns `None` when the type has no block representation.
    #[doc(hidden)]
    fn decode_raw_vec(
        reader: &mut BitReader,
        len: usize,
    ) -> Option<Result<Vec<Self>>> {
        let _ = (reader, len);
        None
    }

    /// Overwrites `items` with one block copy, for trivially-copyable types.
    #[doc(hidden)]
    fn decode_raw_into(
        items: &mut [Self],
        reader: &mut BitReader,
    ) -> Option<Result<()>> {
        let _ = (items, reader);
        None
    }
}

// =============================================================================
// Owning wrappers
// =============================================================================

impl<T: Decode + 'static> Decode for Box<T> {
    const KIND: Kind = T::KIND;

    fn decode(reader: &mut BitReader) -> Result<Self> {
        reader.decode().map(Self::new)
    }

    fn decode_into(&mut self, reader: &mut BitReader) -> Result<()> {
        reader.decode_into::<T>(self)
    }
}

impl<T: Decode + 'static> Decode for Rc<T> {
    const KIND: Kind = T::KIND;

    fn decode(reader: &mut BitReader) -> Result<Self> {
        reader.decode().map(Self::new)
    }
}

impl<T: Decode + 'static> Decode for Arc<T> {
    const KIND: Kind = T::KIND;

    fn decode(reader: &mut BitReader) -> Result<Self> {
        reader.decode().map(Self::new)
    }
}

/// Always decodes to [`Cow::Owned`].
impl<T> Decode for Cow<'_, T>
where
    T: ToOwned + ?Sized,
    T::Owned: Decode + 'static,
{
    const KIND: Kind = <T::Owned as Decode>::KIND;

    fn decode(reader: &mut BitReader) -> Result<Self> {
        reader.decode().map(Cow::Owned)
    }
}

impl<T: Decode + 'static> Decode for Wrapping<T> {
    const KIND: Kind = T::KIND;

    fn decode(reader: &mut BitReader) -> Result<Self> {
        reader.decode().map(Wrapping)
    }

    fn decode_into(&mut self, reader: &mut BitReader) -> Result<()> {
        reader.decode_into(&mut self.0)
    }
}

impl<T: Decode + 'static> Decode for Reverse<T> {
    const KIND: Kind = T::KIND;

    fn decode(reader: &mut BitReader) -> Result<Self> {
        reader.decode().map(Reverse)
    }

    fn decode_into(&mut self, reader: &mut BitReader) -> Result<()> {
        reader.decode_into(&mut self.0)
    }
}

// =============================================================================
// Zero-sized values
// =============================================================================

impl<T: ?Sized> Decode for PhantomData<T> {
    const KIND: Kind = Kind::Tuple;

    fn decode(_reader: &mut BitReader) -> Result<Self> { Ok(Self) }
}
