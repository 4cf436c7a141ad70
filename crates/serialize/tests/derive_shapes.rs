use std::{collections::BTreeMap, fmt::Debug};

use burrow_serialize::{
    BitReader, BitWriter, Decode, Encode, Error, from_bytes,
    capability::{self, Kind, Members},
    to_bytes,
};

fn roundtrip<T: Encode + Decode + PartialEq + Debug + 'static>(value: &T) {
    let bytes = to_bytes(value).unwrap();
    let decoded: T = from_bytes(&bytes).unwrap();
    assert_eq!(value, &decoded);
}

#[derive(Debug, PartialEq, Encode, Decode)]
struct Point {
    x: i32,
    y: i32,
}

#[derive(Debug, PartialEq, Encode, Decode)]
struct Id(u64);

#[derive(Debug, PartialEq, Encode, Decode)]
struct Marker;

#[derive(Debug, PartialEq, Encode, Decode)]
struct Document {
    title: String,
    tags: Vec<String>,
    #[serialize(skip)]
    cache: Vec<u8>,
    origin: Option<Point>,
}

#[derive(Debug, PartialEq, Encode, Decode)]
struct Wrapper<T> {
    inner: T,
    index: BTreeMap<u32, T>,
}

#[derive(Debug, PartialEq, Encode, Decode)]
enum Message {
    Quit,
    Move { x: i32, y: i32 },
    Write(String),
    Tagged(#[serialize(skip)] u8, u16),
}

#[derive(Debug, PartialEq, Encode, Decode)]
enum Slot {
    Occupied(u32),
    #[serialize(empty)]
    Vacant,
    Reserved,
}

#[test]
fn struct_members_in_declaration_order() {
    let bytes = to_bytes(&Point { x: 1, y: -2 }).unwrap();

    let mut expected = 1i32.to_ne_bytes().to_vec();
    expected.extend((-2i32).to_ne_bytes());
    assert_eq!(bytes, expected);
}

#[test]
fn struct_shapes_roundtrip() {
    roundtrip(&Point { x: 10, y: 20 });
    roundtrip(&Id(u64::MAX));
    roundtrip(&Marker);
    roundtrip(&Wrapper {
        inner: String::from("a"),
        index: BTreeMap::from([(1, String::from("b"))]),
    });
}

#[test]
fn unit_struct_is_empty() {
    assert!(to_bytes(&Marker).unwrap().is_empty());
}

#[test]
fn skipped_field_decodes_to_default() {
    let document = Document {
        title: String::from("notes"),
        tags: vec![String::from("a"), String::from("b")],
        cache: vec![1, 2, 3],
        origin: Some(Point { x: 1, y: 1 }),
    };

    let decoded: Document = from_bytes(&to_bytes(&document).unwrap()).unwrap();

    assert_eq!(decoded.title, document.title);
    assert_eq!(decoded.tags, document.tags);
    assert!(decoded.cache.is_empty());
    assert_eq!(decoded.origin, document.origin);
}

#[test]
fn decode_into_resets_skipped_fields() {
    let source = Document {
        title: String::from("fresh"),
        tags: Vec::new(),
        cache: vec![9],
        origin: None,
    };
    let mut target = Document {
        title: String::from("stale"),
        tags: vec![String::from("old")],
        cache: vec![7, 7],
        origin: Some(Point { x: 0, y: 0 }),
    };

    let mut reader = BitReader::new(to_bytes(&source).unwrap());
    reader.decode_into(&mut target).unwrap();

    assert_eq!(target.title, "fresh");
    assert!(target.tags.is_empty());
    assert!(target.cache.is_empty());
    assert_eq!(target.origin, None);
}

#[test]
fn members_are_visible() {
    assert_eq!(<Point as Members>::COUNT, 2);
    assert_eq!(<Document as Members>::COUNT, 3);
    assert_eq!(<Marker as Members>::COUNT, 0);
}

#[test]
fn derived_kinds() {
    assert!(capability::is_aggregate::<Point>());
    assert!(capability::is_sum_type::<Message>());
    assert_eq!(<Id as Decode>::KIND, Kind::Aggregate);
}

#[test]
fn enum_variants_roundtrip() {
    roundtrip(&Message::Quit);
    roundtrip(&Message::Move { x: 3, y: 4 });
    roundtrip(&Message::Write(String::from("hello")));
}

#[test]
fn enum_writes_index_then_payload() {
    let bytes = to_bytes(&Message::Write(String::from("hi"))).unwrap();

    let mut expected = 2u64.to_ne_bytes().to_vec();
    expected.extend(2u64.to_ne_bytes());
    expected.extend(b"hi");
    assert_eq!(bytes, expected);
}

#[test]
fn skipped_variant_field() {
    let bytes = to_bytes(&Message::Tagged(5, 6)).unwrap();
    assert_eq!(bytes.len(), 8 + 2);

    let decoded: Message = from_bytes(&bytes).unwrap();
    assert_eq!(decoded, Message::Tagged(0, 6));
}

#[test]
fn empty_variant_uses_sentinel() {
    let bytes = to_bytes(&Slot::Vacant).unwrap();
    assert_eq!(bytes, u64::MAX.to_ne_bytes());
    assert_eq!(from_bytes::<Slot>(&bytes).unwrap(), Slot::Vacant);

    // `Reserved` follows the empty variant but takes index 1.
    let bytes = to_bytes(&Slot::Reserved).unwrap();
    assert_eq!(bytes, 1u64.to_ne_bytes());
    assert_eq!(from_bytes::<Slot>(&bytes).unwrap(), Slot::Reserved);

    roundtrip(&Slot::Occupied(8));
}

#[test]
fn sentinel_without_empty_variant_is_rejected() {
    let bytes = u64::MAX.to_ne_bytes();

    assert_eq!(
        from_bytes::<Message>(&bytes),
        Err(Error::InvalidIndex { index: u64::MAX, alternatives: 4 })
    );
}

#[test]
fn out_of_range_variant_is_rejected() {
    let mut writer = BitWriter::new();
    writer.write_index(2);

    let mut reader = BitReader::new(writer.into_inner());
    assert_eq!(
        reader.decode::<Slot>(),
        Err(Error::InvalidIndex { index: 2, alternatives: 2 })
    );
}
