//! Raw copies of fixed-size values.
//!
//! A trivially-copyable value is written as its in-memory bytes and read back
//! by copying them into place. The zerocopy bounds on these functions prove
//! that the copy is sound: [`FromBytes`] guarantees every bit pattern is a
//! valid value, [`IntoBytes`] guarantees there is no padding to leak.
//!
//! Types with invalid bit patterns (`bool`, `char`) go through the checked
//! [`TryFromBytes`] path and fail with
//! [`Error::InvalidValue`](crate::Error::InvalidValue) instead.
//!
//! Contiguous runs of trivially-copyable values are copied as one block; see
//! [`decode_vec`] and [`raw_bytes`].

use std::{
    any::type_name,
    num::{
        NonZeroI8, NonZeroI16, NonZeroI32, NonZeroI64, NonZeroI128,
        NonZeroIsize, NonZeroU8, NonZeroU16, NonZeroU32, NonZeroU64,
        NonZeroU128, NonZeroUsize,
    },
};

use zerocopy::{FromBytes, Immutable, IntoBytes, TryFromBytes};

use crate::{
    BitReader, BitWriter, Decode, Encode, Error, Result, capability::Kind,
};

/// Writes the raw bytes of `value`.
pub fn encode<T: IntoBytes + Immutable>(writer: &mut BitWriter, value: &T) {
    writer.write_raw(value.as_bytes());
}

/// The raw bytes of a run of values. Identical to encoding each one in turn.
#[must_use]
pub fn raw_bytes<T: IntoBytes + Immutable>(items: &[T]) -> &[u8] {
    items.as_bytes()
}

/// Reads one value by copying `size_of::<T>()` bytes.
///
/// # Errors
///
/// Returns [`Error::OutOfRange`] if the bytes are not there.
pub fn decode<T: FromBytes>(reader: &mut BitReader) -> Result<T> {
    let bytes = reader.read_bytes(size_of::<T>())?;
    T::read_from_bytes(bytes).map_err(|_| {
        Error::invalid_value(type_name::<T>(), "truncated value")
    })
}

/// Reads one value whose bit pattern must be validated.
///
/// # Errors
///
/// Returns [`Error::OutOfRange`] if the bytes are not there, or
/// [`Error::InvalidValue`] if they do not form a valid `T`.
pub fn decode_checked<T: TryFromBytes>(reader: &mut BitReader) -> Result<T> {
    let bytes = reader.read_bytes(size_of::<T>())?;
    T::try_read_from_bytes(bytes).map_err(|_| {
        Error::invalid_value(type_name::<T>(), "invalid bit pattern")
    })
}

/// Reads `len` values as one block copy.
///
/// The bounds check happens before anything is allocated.
///
/// # Errors
///
/// Returns [`Error::OutOfRange`] if fewer than `len` values' worth of bytes
/// remain, or [`Error::AllocationFailed`] if the vector cannot be allocated.
pub fn decode_vec<T: FromBytes + IntoBytes>(
    reader: &mut BitReader,
    len: usize,
) -> Result<Vec<T>> {
    let size = block_len::<T>(reader, len)?;
    let bytes = reader.read_bytes(size)?;
    let mut items =
        T::new_vec_zeroed(len).map_err(|_| Error::AllocationFailed { len })?;

    items.as_mut_slice().as_mut_bytes().copy_from_slice(bytes);
    Ok(items)
}

/// Overwrites `items` with one block copy.
///
/// # Errors
///
/// Returns [`Error::OutOfRange`] if the bytes are not there; `items` is not
/// touched in that case.
pub fn decode_slice_into<T: FromBytes + IntoBytes>(
    items: &mut [T],
    reader: &mut BitReader,
) -> Result<()> {
    let bytes = reader.read_bytes(size_of_val(items))?;
    items.as_mut_bytes().copy_from_slice(bytes);
    Ok(())
}

/// Reads `len` values that need validation, from one bounds-checked block.
fn decode_checked_vec<T: TryFromBytes>(
    reader: &mut BitReader,
    len: usize,
) -> Result<Vec<T>> {
    let size = block_len::<T>(reader, len)?;
    let bytes = reader.read_bytes(size)?;

    bytes
        .chunks_exact(size_of::<T>())
        .map(|chunk| {
            T::try_read_from_bytes(chunk).map_err(|_| {
                Error::invalid_value(type_name::<T>(), "invalid bit pattern")
            })
        })
        .collect()
}

fn block_len<T>(reader: &BitReader, len: usize) -> Result<usize> {
    size_of::<T>().checked_mul(len).ok_or(Error::OutOfRange {
        requested: usize::MAX,
        remaining: reader.remaining(),
    })
}

// =============================================================================
// Primitive impls
// =============================================================================

macro_rules! impl_trivial {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Encode for $ty {
                const KIND: Kind = Kind::Trivial;

                fn encode(&self, writer: &mut BitWriter) -> Result<()> {
                    self::encode(writer, self);
                    Ok(())
                }

                fn raw_bytes(items: &[Self]) -> Option<&[u8]> {
                    Some(self::raw_bytes(items))
                }
            }

            impl Decode for $ty {
                const KIND: Kind = Kind::Trivial;

                fn decode(reader: &mut BitReader) -> Result<Self> {
                    self::decode(reader)
                }

                fn decode_raw_vec(
                    reader: &mut BitReader,
                    len: usize,
                ) -> Option<Result<Vec<Self>>> {
                    Some(self::decode_vec(reader, len))
                }

                fn decode_raw_into(
                    items: &mut [Self],
                    reader: &mut BitReader,
                ) -> Option<Result<()>> {
                    Some(self::decode_slice_into(items, reader))
                }
            }
        )+
    };
}

impl_trivial!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128, f32, f64);

// `bool` and `char` have invalid bit patterns: block copies on the way out,
// validated element by element on the way in.
macro_rules! impl_checked {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Encode for $ty {
                const KIND: Kind = Kind::Trivial;

                fn encode(&self, writer: &mut BitWriter) -> Result<()> {
                    self::encode(writer, self);
                    Ok(())
                }

                fn raw_bytes(items: &[Self]) -> Option<&[u8]> {
                    Some(self::raw_bytes(items))
                }
            }

            impl Decode for $ty {
                const KIND: Kind = Kind::Trivial;

                fn decode(reader: &mut BitReader) -> Result<Self> {
                    decode_checked(reader)
                }

                fn decode_raw_vec(
                    reader: &mut BitReader,
                    len: usize,
                ) -> Option<Result<Vec<Self>>> {
                    Some(decode_checked_vec(reader, len))
                }
            }
        )+
    };
}

impl_checked!(bool, char);

// Pointer-sized integers are always 64 bits wide on the wire.
macro_rules! impl_pointer_sized {
    ($($ty:ty => $wide:ty),+ $(,)?) => {
        $(
            impl Encode for $ty {
                const KIND: Kind = Kind::Trivial;

                #[allow(clippy::cast_lossless, clippy::cast_possible_wrap)]
                fn encode(&self, writer: &mut BitWriter) -> Result<()> {
                    self::encode(writer, &(*self as $wide));
                    Ok(())
                }

                fn raw_bytes(items: &[Self]) -> Option<&[u8]> {
                    (size_of::<$ty>() == size_of::<$wide>())
                        .then(|| self::raw_bytes(items))
                }
            }

            impl Decode for $ty {
                const KIND: Kind = Kind::Trivial;

                fn decode(reader: &mut BitReader) -> Result<Self> {
                    let wide: $wide = self::decode(reader)?;
                    <$ty>::try_from(wide).map_err(|_| {
                        Error::invalid_value(
                            stringify!($ty),
                            "value exceeds the platform pointer width",
                        )
                    })
                }

                fn decode_raw_vec(
                    reader: &mut BitReader,
                    len: usize,
                ) -> Option<Result<Vec<Self>>> {
                    (size_of::<$ty>() == size_of::<$wide>())
                        .then(|| self::decode_vec(reader, len))
                }

                fn decode_raw_into(
                    items: &mut [Self],
                    reader: &mut BitReader,
                ) -> Option<Result<()>> {
                    (size_of::<$ty>() == size_of::<$wide>())
                        .then(|| self::decode_slice_into(items, reader))
                }
            }
        )+
    };
}

impl_pointer_sized!(usize => u64, isize => i64);

macro_rules! impl_nonzero {
    ($($ty:ty => $prim:ty),+ $(,)?) => {
        $(
            impl Encode for $ty {
                const KIND: Kind = Kind::Trivial;

                fn encode(&self, writer: &mut BitWriter) -> Result<()> {
                    writer.encode(&self.get())
                }
            }

            impl Decode for $ty {
                const KIND: Kind = Kind::Trivial;

                fn decode(reader: &mut BitReader) -> Result<Self> {
                    let raw: $prim = reader.decode()?;
                    <$ty>::new(raw).ok_or(Error::invalid_value(
                        stringify!($ty),
                        "zero is not a valid value",
                    ))
                }
            }
        )+
    };
}

impl_nonzero!(
    NonZeroU8 => u8,
    NonZeroU16 => u16,
    NonZeroU32 => u32,
    NonZeroU64 => u64,
    NonZeroU128 => u128,
    NonZeroUsize => usize,
    NonZeroI8 => i8,
    NonZeroI16 => i16,
    NonZeroI32 => i32,
    NonZeroI64 => i64,
    NonZeroI128 => i128,
    NonZeroIsize => isize,
);
