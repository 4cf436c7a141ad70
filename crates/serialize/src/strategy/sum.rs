//! Tagged unions.
//!
//! A sum type is written as the index of its active alternative (`u64`)
//! followed by that alternative's payload. A value with no active
//! alternative is written as [`EMPTY`] with no payload, and reads back as
//! the type's valueless state.

use std::{any::type_name, ops::Bound};

use crate::{
    BitReader, BitWriter, Decode, Encode, Error, Result,
    capability::{Kind, RebuildSum, SumType},
};

/// The index written for a value with no active alternative.
pub const EMPTY: u64 = u64::MAX;

/// Writes the active index and payload of `value`.
///
/// # Errors
///
/// Propagates payload encoding errors.
pub fn encode<S: SumType + ?Sized>(
    writer: &mut BitWriter,
    value: &S,
) -> Result<()> {
    match value.active_index() {
        Some(index) => {
            writer.write_index(index as u64);
            value.encode_active(writer)
        }
        None => {
            writer.write_index(EMPTY);
            Ok(())
        }
    }
}

/// Reads an index and builds the matching alternative.
///
/// # Errors
///
/// Returns [`Error::InvalidIndex`] if the index names no alternative, or if
/// it is [`EMPTY`] and the type has no valueless state.
pub fn decode<S: RebuildSum>(reader: &mut BitReader) -> Result<S> {
    let index = reader.read_index()?;

    if index == EMPTY
        && let Some(valueless) = S::valueless()
    {
        return Ok(valueless);
    }

    match usize::try_from(index) {
        Ok(alternative) if alternative < S::ALTERNATIVES => {
            S::decode_alternative(alternative, reader)
        }
        _ => {
            tracing::debug!(
                ty = type_name::<S>(),
                index,
                alternatives = S::ALTERNATIVES,
                "invalid sum-type index"
            );
            Err(Error::InvalidIndex { index, alternatives: S::ALTERNATIVES })
        }
    }
}

// =============================================================================
// Result
// =============================================================================

impl<T: Encode, E: Encode> SumType
    for std::result::Result<T, E>
{
    const ALTERNATIVES: usize = 2;

    fn active_index(&self) -> Option<usize> {
        Some(match self {
            Ok(_) => 0,
            Err(_) => 1,
        })
    }

    fn encode_active(&self, writer: &mut BitWriter) -> Result<()> {
        match self {
            Ok(value) => writer.encode(value),
            Err(error) => writer.encode(error),
        }
    }
}

impl<T: Decode + 'static, E: Decode + 'static> RebuildSum
    for std::result::Result<T, E>
{
    const ALTERNATIVES: usize = 2;

    fn decode_alternative(
        index: usize,
        reader: &mut BitReader,
    ) -> Result<Self> {
        if index == 0 {
            reader.decode().map(Ok)
        } else {
            reader.decode().map(Err)
        }
    }
}

impl<T: Encode, E: Encode> Encode
    for std::result::Result<T, E>
{
    const KIND: Kind = Kind::Sum;

    fn encode(&self, writer: &mut BitWriter) -> Result<()> {
        encode(writer, self)
    }
}

impl<T: Decode + 'static, E: Decode + 'static> Decode
    for std::result::Result<T, E>
{
    const KIND: Kind = Kind::Sum;

    fn decode(reader: &mut BitReader) -> Result<Self> { decode(reader) }
}

// =============================================================================
// Bound
// =============================================================================

impl<T: Encode> SumType for Bound<T> {
    const ALTERNATIVES: usize = 3;

    fn active_index(&self) -> Option<usize> {
        Some(match self {
            Bound::Unbounded => 0,
            Bound::Included(_) => 1,
            Bound::Excluded(_) => 2,
        })
    }

    fn encode_active(&self, writer: &mut BitWriter) -> Result<()> {
        match self {
            Bound::Unbounded => Ok(()),
            Bound::Included(value) | Bound::Excluded(value) => {
                writer.encode(value)
            }
        }
    }
}

impl<T: Decode + 'static> RebuildSum for Bound<T> {
    const ALTERNATIVES: usize = 3;

    fn decode_alternative(
        index: usize,
        reader: &mut BitReader,
    ) -> Result<Self> {
        Ok(match index {
            0 => Bound::Unbounded,
            1 => Bound::Included(reader.decode()?),
            _ => Bound::Excluded(reader.decode()?),
        })
    }
}

impl<T: Encode> Encode for Bound<T> {
    const KIND: Kind = Kind::Sum;

    fn encode(&self, writer: &mut BitWriter) -> Result<()> {
        encode(writer, self)
    }
}

impl<T: Decode + 'static> Decode for Bound<T> {
    const KIND: Kind = Kind::Sum;

    fn decode(reader: &mut BitReader) -> Result<Self> { decode(reader) }
}

#[cfg(test)]
mod tests {
    use std::ops::Bound;

    use super::EMPTY;
    use crate::{Error, from_bytes, to_bytes};

    type Outcome = std::result::Result<u8, String>;

    #[test]
    fn result_alternatives() {
        let mut expected = 0u64.to_ne_bytes().to_vec();
        expected.push(4);
        assert_eq!(to_bytes(&Outcome::Ok(4)).unwrap(), expected);

        let failure = Outcome::Err(String::from("no"));
        let bytes = to_bytes(&failure).unwrap();
        assert_eq!(bytes[..8], 1u64.to_ne_bytes());
        assert_eq!(from_bytes::<Outcome>(&bytes).unwrap(), failure);
    }

    #[test]
    fn sentinel_on_type_without_empty_state() {
        assert_eq!(
            from_bytes::<Outcome>(&EMPTY.to_ne_bytes()),
            Err(Error::InvalidIndex { index: EMPTY, alternatives: 2 })
        );
    }

    #[test]
    fn bounds_roundtrip() {
        let bounds =
            [Bound::Unbounded, Bound::Included(3u32), Bound::Excluded(9)];

        for bound in bounds {
            let bytes = to_bytes(&bound).unwrap();
            assert_eq!(from_bytes::<Bound<u32>>(&bytes).unwrap(), bound);
        }

        let unbounded = to_bytes(&Bound::<u32>::Unbounded).unwrap();
        assert_eq!(unbounded, 0u64.to_ne_bytes());
    }
}
