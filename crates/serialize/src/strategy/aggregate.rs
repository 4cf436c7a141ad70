//! Reflected aggregates: every direct member in declaration order, no
//! header.
//!
//! The members come from the type's [`Members`] / [`MembersMut`] impls,
//! which `#[derive(Encode, Decode)]` generates for structs.

use std::{
    ops::{
        Range, RangeFrom, RangeFull, RangeInclusive, RangeTo, RangeToInclusive,
    },
    time::Duration,
};

use crate::{
    BitReader, BitWriter, Decode, Encode, Error, Result,
    capability::{Kind, MemberVisitor, MemberVisitorMut, Members, MembersMut},
};

/// Writes each member through the resolver.
pub struct EncodeMembers<'w> {
    writer: &'w mut BitWriter,
}

impl<'w> EncodeMembers<'w> {
    /// Creates a visitor writing into `writer`.
    pub const fn new(writer: &'w mut BitWriter) -> Self { Self { writer } }
}

impl MemberVisitor for EncodeMembers<'_> {
    fn visit<F: Encode + ?Sized>(
        &mut self,
        _name: Option<&'static str>,
        member: &F,
    ) -> Result<()> {
        self.writer.encode(member)
    }
}

/// Reads each member in place through the resolver.
pub struct DecodeMembers<'r> {
    reader: &'r mut BitReader,
}

impl<'r> DecodeMembers<'r> {
    /// Creates a visitor reading from `reader`.
    pub const fn new(reader: &'r mut BitReader) -> Self { Self { reader } }
}

impl MemberVisitorMut for DecodeMembers<'_> {
    fn visit<F: Decode + 'static>(
        &mut self,
        _name: Option<&'static str>,
        member: &mut F,
    ) -> Result<()> {
        self.reader.decode_into(member)
    }
}

/// Writes the members of `value` in declaration order.
///
/// # Errors
///
/// Propagates member encoding errors.
pub fn encode<T: Members + ?Sized>(
    writer: &mut BitWriter,
    value: &T,
) -> Result<()> {
    value.visit_members(&mut EncodeMembers::new(writer))
}

/// Overwrites the members of `value` in declaration order.
///
/// # Errors
///
/// Propagates member decoding errors. Members already read stay
/// overwritten.
pub fn decode_into<T: MembersMut + ?Sized>(
    reader: &mut BitReader,
    value: &mut T,
) -> Result<()> {
    value.visit_members_mut(&mut DecodeMembers::new(reader))
}

// =============================================================================
// Ranges
// =============================================================================

macro_rules! impl_range {
    ($($ty:ident { $($field:ident),+ } => |$($var:ident),+| $build:expr;)+) => {
        $(
            impl<T: Encode> Members for $ty<T> {
                const COUNT: usize = [$(stringify!($field)),+].len();

                fn visit_members<V: MemberVisitor>(
                    &self,
                    visitor: &mut V,
                ) -> Result<()> {
                    $(visitor.visit(Some(stringify!($field)), &self.$field)?;)+
                    Ok(())
                }
            }

            impl<T: Decode + 'static> MembersMut for $ty<T> {
                fn visit_members_mut<V: MemberVisitorMut>(
                    &mut self,
                    visitor: &mut V,
                ) -> Result<()> {
                    $(
                        visitor
                            .visit(Some(stringify!($field)), &mut self.$field)?;
                    )+
                    Ok(())
                }
            }

            impl<T: Encode> Encode for $ty<T> {
                const KIND: Kind = Kind::Aggregate;

                fn encode(&self, writer: &mut BitWriter) -> Result<()> {
                    encode(writer, self)
                }
            }

            impl<T: Decode + 'static> Decode for $ty<T> {
                const KIND: Kind = Kind::Aggregate;

                fn decode(reader: &mut BitReader) -> Result<Self> {
                    $(let $var = reader.decode::<T>()?;)+
                    Ok($build)
                }

                fn decode_into(
                    &mut self,
                    reader: &mut BitReader,
                ) -> Result<()> {
                    decode_into(reader, self)
                }
            }
        )+
    };
}

impl_range! {
    Range { start, end } => |start, end| start..end;
    RangeFrom { start } => |start| start..;
    RangeTo { end } => |end| ..end;
    RangeToInclusive { end } => |end| ..=end;
}

impl<T: Encode> Encode for RangeInclusive<T> {
    const KIND: Kind = Kind::Aggregate;

    fn encode(&self, writer: &mut BitWriter) -> Result<()> {
        writer.encode(self.start())?;
        writer.encode(self.end())
    }
}

impl<T: Decode + 'static> Decode for RangeInclusive<T> {
    const KIND: Kind = Kind::Aggregate;

    fn decode(reader: &mut BitReader) -> Result<Self> {
        let start = reader.decode()?;
        let end = reader.decode()?;
        Ok(start..=end)
    }
}

impl Encode for RangeFull {
    const KIND: Kind = Kind::Aggregate;

    fn encode(&self, _writer: &mut BitWriter) -> Result<()> { Ok(()) }
}

impl Decode for RangeFull {
    const KIND: Kind = Kind::Aggregate;

    fn decode(_reader: &mut BitReader) -> Result<Self> { Ok(..) }
}

// =============================================================================
// Duration
// =============================================================================

const NANOS_PER_SEC: u32 = 1_000_000_000;

/// Whole seconds (`u64`) then the sub-second nanoseconds (`u32`).
impl Encode for Duration {
    const KIND: Kind = Kind::Aggregate;

    fn encode(&self, writer: &mut BitWriter) -> Result<()> {
        writer.encode(&self.as_secs())?;
        writer.encode(&self.subsec_nanos())
    }
}

impl Decode for Duration {
    const KIND: Kind = Kind::Aggregate;

    fn decode(reader: &mut BitReader) -> Result<Self> {
        let secs: u64 = reader.decode()?;
        let nanos: u32 = reader.decode()?;

        if nanos >= NANOS_PER_SEC {
            return Err(Error::invalid_value(
                "Duration",
                "sub-second nanoseconds out of range",
            ));
        }

        Ok(Self::new(secs, nanos))
    }
}
