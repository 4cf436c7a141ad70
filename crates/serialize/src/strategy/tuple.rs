//! Fixed-arity tuples: each element in position order, no header.
//!
//! Elements that are shared references (`&T`) can be encoded but not
//! decoded; decode such bytes into the owned equivalent instead.

use crate::{
    BitReader, BitWriter, Decode, Encode, Result,
    capability::{Kind, TupleLike},
};

impl TupleLike for () {
    const ARITY: usize = 0;
}

impl Encode for () {
    const KIND: Kind = Kind::Tuple;

    fn encode(&self, _writer: &mut BitWriter) -> Result<()> { Ok(()) }
}

impl Decode for () {
    const KIND: Kind = Kind::Tuple;

    fn decode(_reader: &mut BitReader) -> Result<Self> { Ok(()) }
}

macro_rules! count {
    () => { 0 };
    ($head:ident $($tail:ident)*) => { 1 + count!($($tail)*) };
}

macro_rules! impl_tuple {
    ($($name:ident),+) => {
        impl<$($name),+> TupleLike for ($($name,)+) {
            const ARITY: usize = count!($($name)+);
        }

        impl<$($name: Encode),+> Encode for ($($name,)+) {
            const KIND: Kind = Kind::Tuple;

            #[allow(non_snake_case)]
            fn encode(&self, writer: &mut BitWriter) -> Result<()> {
                let ($($name,)+) = self;
                $(
                    writer.encode($name)?;
                )+
                Ok(())
            }
        }

        impl<$($name: Decode + 'static),+> Decode for ($($name,)+) {
            const KIND: Kind = Kind::Tuple;

            fn decode(reader: &mut BitReader) -> Result<Self> {
                Ok(($(reader.decode::<$name>()?,)+))
            }

            #[allow(non_snake_case)]
            fn decode_into(&mut self, reader: &mut BitReader) -> Result<()> {
                let ($($name,)+) = self;
                $(
                    reader.decode_into($name)?;
                )+
                Ok(())
            }
        }
    };
}

impl_tuple!(A);
impl_tuple!(A, B);
impl_tuple!(A, B, C);
impl_tuple!(A, B, C, D);
impl_tuple!(A, B, C, D, E);
impl_tuple!(A, B, C, D, E, F);
impl_tuple!(A, B, C, D, E, F, G);
impl_tuple!(A, B, C, D, E, F, G, H);
impl_tuple!(A, B, C, D, E, F, G, H, I);
impl_tuple!(A, B, C, D, E, F, G, H, I, J);
impl_tuple!(A, B, C, D, E, F, G, H, I, J, K);
impl_tuple!(A, B, C, D, E, F, G, H, I, J, K, L);
