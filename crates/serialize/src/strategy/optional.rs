//! Values that may be absent: a flag byte (`0` or `1`), then the payload when
//! the flag is set.

use crate::{
    BitReader, BitWriter, Decode, Encode, Error, Result, capability::Kind,
};

fn write_flag(writer: &mut BitWriter, present: bool) {
    writer.write_raw(&[u8::from(present)]);
}

fn read_flag(reader: &mut BitReader) -> Result<bool> {
    match reader.read_bytes(1)? {
        [0] => Ok(false),
        [1] => Ok(true),
        _ => Err(Error::invalid_value("Option", "presence flag is not 0 or 1")),
    }
}

impl<T: Encode> Encode for Option<T> {
    const KIND: Kind = Kind::Optional;

    fn encode(&self, writer: &mut BitWriter) -> Result<()> {
        write_flag(writer, self.is_some());
        match self {
            Some(value) => writer.encode(value),
            None => Ok(()),
        }
    }
}

impl<T: Decode + 'static> Decode for Option<T> {
    const KIND: Kind = Kind::Optional;

    fn decode(reader: &mut BitReader) -> Result<Self> {
        if read_flag(reader)? { reader.decode().map(Some) } else { Ok(None) }
    }

    /// An absent flag clears the target; a present one decodes into the
    /// existing payload when there is one.
    fn decode_into(&mut self, reader: &mut BitReader) -> Result<()> {
        if !read_flag(reader)? {
            *self = None;
            return Ok(());
        }

        match self {
            Some(value) => reader.decode_into(value),
            None => {
                *self = Some(reader.decode()?);
                Ok(())
            }
        }
    }
}
