use std::sync::Arc;

use super::{DeserializeWith, Registry, SerializeWith};
use crate::{BitReader, BitWriter, Encode, Result, capability::Kind};

struct AsWide;

impl SerializeWith<u16> for AsWide {
    fn serialize(&self, writer: &mut BitWriter, value: &u16) -> Result<()> {
        writer.encode(&u64::from(*value))
    }
}

impl DeserializeWith<u16> for AsWide {
    fn deserialize(&self, reader: &mut BitReader) -> Result<u16> {
        let wide: u64 = reader.decode()?;
        u16::try_from(wide).map_err(crate::Error::custom)
    }
}

#[test]
fn empty_registry() {
    let registry = Registry::new();

    assert!(registry.is_empty());
    assert_eq!(registry.len(), 0);
    assert!(!registry.has_serializer::<u16>());
    assert!(registry.deserializer::<u16>().is_none());
}

#[test]
fn register_both_directions() {
    let mut registry = Registry::new();
    registry.register::<u16, _>(AsWide);

    assert_eq!(registry.len(), 1);
    assert!(registry.has_serializer::<u16>());
    assert!(registry.has_deserializer::<u16>());
    assert!(!registry.has_serializer::<u32>());
}

#[test]
fn one_direction_only() {
    let mut registry = Registry::new();
    registry.register_serializer::<u16, _>(AsWide);

    assert!(registry.has_serializer::<u16>());
    assert!(!registry.has_deserializer::<u16>());
    assert_eq!(registry.len(), 1);

    registry.register_deserializer::<u32, _>(ZeroU32);
    assert_eq!(registry.len(), 2);
}

struct ZeroU32;

impl DeserializeWith<u32> for ZeroU32 {
    fn deserialize(&self, _: &mut BitReader) -> Result<u32> { Ok(0) }
}

#[test]
fn strategy_is_used_by_writer_and_reader() {
    let mut registry = Registry::new();
    registry.register::<u16, _>(AsWide);
    let registry = Arc::new(registry);

    let mut writer = BitWriter::new().with_registry(registry.clone());
    writer.encode(&513u16).unwrap();
    assert_eq!(writer.len(), 8);

    let mut reader =
        BitReader::new(writer.into_inner()).with_registry(registry);
    assert_eq!(reader.decode::<u16>().unwrap(), 513);
    assert!(reader.is_exhausted());
}

#[test]
fn closures() {
    let mut registry = Registry::new();
    registry.register_fn::<bool, _, _>(
        |writer, value| writer.encode(&if *value { 0xAAu8 } else { 0x55u8 }),
        |reader| Ok(reader.decode::<u8>()? == 0xAA),
    );
    let registry = Arc::new(registry);

    let mut writer = BitWriter::new().with_registry(registry.clone());
    writer.encode(&true).unwrap();
    writer.encode(&false).unwrap();
    assert_eq!(writer.data(), &[0xAA, 0x55]);

    let mut reader =
        BitReader::new(writer.into_inner()).with_registry(registry);
    assert!(reader.decode::<bool>().unwrap());
    assert!(!reader.decode::<bool>().unwrap());
}

#[test]
fn remove_and_clear() {
    let mut registry = Registry::new();
    registry.register::<u16, _>(AsWide);
    registry.register_deserializer::<u32, _>(ZeroU32);

    assert!(registry.remove::<u16>());
    assert!(!registry.remove::<u16>());
    assert_eq!(registry.len(), 1);

    registry.clear();
    assert!(registry.is_empty());
}

#[test]
fn latest_registration_wins() {
    let mut registry = Registry::new();
    registry.register_deserializer::<u32, _>(ZeroU32);
    registry.register_fn::<u32, _, _>(
        |writer, value| writer.encode(value),
        |_| Ok(7),
    );
    let registry = Arc::new(registry);

    let mut reader = BitReader::new(vec![0u8; 4]).with_registry(registry);
    assert_eq!(reader.decode::<u32>().unwrap(), 7);
}

struct Name<'a>(&'a str);

impl Encode for Name<'_> {
    const KIND: Kind = Kind::Aggregate;

    fn encode(&self, writer: &mut BitWriter) -> Result<()> {
        writer.encode(self.0)
    }
}

struct ShortName;

impl SerializeWith<Name<'static>> for ShortName {
    fn serialize(
        &self,
        writer: &mut BitWriter,
        value: &Name<'static>,
    ) -> Result<()> {
        let len = u8::try_from(value.0.len()).map_err(crate::Error::custom)?;
        writer.encode(&len)?;
        writer.write_raw(value.0.as_bytes());
        Ok(())
    }
}

#[test]
fn serializer_applies_to_borrowed_values() {
    let mut registry = Registry::new();
    registry.register_serializer::<Name<'static>, _>(ShortName);
    let registry = Arc::new(registry);

    let owned = String::from("ada");
    let name = Name(owned.as_str());

    let mut writer = BitWriter::new().with_registry(registry);
    assert!(writer.overrides::<Name<'_>>());
    writer.encode(&name).unwrap();

    assert_eq!(writer.data(), [3, b'a', b'd', b'a']);
}
