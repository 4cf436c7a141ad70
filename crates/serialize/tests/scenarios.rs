//! End-to-end behavior of the engine on small, fully specified inputs.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use burrow_serialize::{
    BitReader, BitWriter, Decode, DeserializeMethod, Encode, Error, Registry,
    Result, SerializeMethod,
    capability::{self, Form, Kind},
    from_bytes, to_bytes,
};

#[derive(Debug, PartialEq, Encode, Decode)]
enum Animal {
    Count(u32),
    Name(String),
    #[serialize(empty)]
    Nothing,
}

#[test]
fn integer_then_string() {
    let mut writer = BitWriter::new();
    writer.encode(&5i32).unwrap();
    writer.encode("sus\n").unwrap();

    let mut reader = BitReader::new(writer.into_inner());
    assert_eq!(reader.decode::<i32>().unwrap(), 5);
    assert_eq!(reader.decode::<String>().unwrap(), "sus\n");
    assert!(reader.is_exhausted());
}

#[test]
fn integer_sequence_is_size_then_raw_block() {
    let bytes = to_bytes(&vec![1i32, 2, 3, 4]).unwrap();

    assert_eq!(bytes.len(), 8 + 16);
    assert_eq!(bytes[..8], 4u64.to_ne_bytes());
    for (i, chunk) in bytes[8..].chunks_exact(4).enumerate() {
        assert_eq!(chunk, (i as i32 + 1).to_ne_bytes());
    }
}

#[test]
fn sum_type_writes_index_then_alternative() {
    let fox = Animal::Name(String::from("Fox"));
    let bytes = to_bytes(&fox).unwrap();

    let mut expected = 1u64.to_ne_bytes().to_vec();
    expected.extend(to_bytes("Fox").unwrap());
    assert_eq!(bytes, expected);

    assert_eq!(from_bytes::<Animal>(&bytes).unwrap(), fox);
}

#[test]
fn empty_sum_type_reads_no_payload() {
    let bytes = to_bytes(&Animal::Nothing).unwrap();
    assert_eq!(bytes, u64::MAX.to_ne_bytes());

    let mut padded = bytes;
    padded.push(0xEE);
    let mut reader = BitReader::new(padded);
    assert_eq!(reader.decode::<Animal>().unwrap(), Animal::Nothing);
    assert_eq!(reader.remaining(), 1);
}

#[test]
fn invalid_sum_index_fails() {
    let mut reader = BitReader::new(7u64.to_ne_bytes());

    assert_eq!(
        reader.decode::<Animal>(),
        Err(Error::InvalidIndex { index: 7, alternatives: 2 })
    );
}

#[test]
fn fixed_array_size_mismatch() {
    let mut target = [42u32; 10];
    let mut reader = BitReader::new(to_bytes(&[1u32; 7]).unwrap());

    assert_eq!(
        reader.decode_into(&mut target),
        Err(Error::SizeMismatch { expected: 10, found: 7 })
    );
    assert_eq!(target, [42; 10]);
}

#[test]
fn empty_optional_is_one_flag_byte() {
    let bytes = to_bytes(&None::<i32>).unwrap();
    assert_eq!(bytes, [0]);

    let mut padded = bytes;
    padded.extend([1, 2, 3]);
    let mut reader = BitReader::new(padded);
    assert_eq!(reader.decode::<Option<i32>>().unwrap(), None);
    assert_eq!(reader.position(), 1);
}

#[test]
fn out_of_range_read_keeps_cursor() {
    let mut reader = BitReader::new(vec![1, 2, 3]);

    assert_eq!(
        reader.decode::<u32>(),
        Err(Error::OutOfRange { requested: 4, remaining: 3 })
    );
    assert_eq!(reader.position(), 0);
    assert_eq!(reader.decode::<u16>().unwrap(), u16::from_ne_bytes([1, 2]));
}

#[test]
fn length_field_is_authoritative() {
    // Two elements declared, three present: the third stays unread.
    let mut bytes = 2u64.to_ne_bytes().to_vec();
    bytes.extend([10, 20, 30]);

    let mut reader = BitReader::new(bytes);
    assert_eq!(reader.decode::<Vec<u8>>().unwrap(), [10, 20]);
    assert_eq!(reader.remaining(), 1);
}

#[derive(Debug, Default, PartialEq, Encode, Decode)]
#[serialize(method)]
struct Instrumented(u16);

static METHOD_CALLS: AtomicUsize = AtomicUsize::new(0);
static EXTERNAL_CALLS: AtomicUsize = AtomicUsize::new(0);

impl SerializeMethod for Instrumented {
    fn serialize(&self, writer: &mut BitWriter) -> Result<()> {
        METHOD_CALLS.fetch_add(1, Ordering::SeqCst);
        writer.encode(&self.0)
    }
}

impl DeserializeMethod for Instrumented {
    fn deserialize(&mut self, reader: &mut BitReader) -> Result<()> {
        METHOD_CALLS.fetch_add(1, Ordering::SeqCst);
        reader.decode_into(&mut self.0)
    }
}

#[test]
fn external_strategy_takes_precedence() {
    let mut registry = Registry::new();
    registry.register_fn::<Instrumented, _, _>(
        |writer, value| {
            EXTERNAL_CALLS.fetch_add(1, Ordering::SeqCst);
            writer.encode(&u32::from(value.0))
        },
        |reader| {
            EXTERNAL_CALLS.fetch_add(1, Ordering::SeqCst);
            let wide: u32 = reader.decode()?;
            u16::try_from(wide).map(Instrumented).map_err(Error::custom)
        },
    );
    let registry = Arc::new(registry);

    let values = vec![Instrumented(1), Instrumented(2)];
    let mut writer = BitWriter::new().with_registry(registry.clone());
    writer.encode(&values).unwrap();
    assert_eq!(writer.len(), 8 + 2 * 4);

    let mut reader =
        BitReader::new(writer.into_inner()).with_registry(registry);
    assert_eq!(reader.decode::<Vec<Instrumented>>().unwrap(), values);

    assert_eq!(METHOD_CALLS.load(Ordering::SeqCst), 0);
    assert_eq!(EXTERNAL_CALLS.load(Ordering::SeqCst), 4);
}

#[test]
fn reference_tuples_decode_into_owned_form() {
    let key = String::from("key");
    let bytes = to_bytes(&(key.as_str(), 9u32)).unwrap();

    let owned: (String, u32) = from_bytes(&bytes).unwrap();
    assert_eq!(owned, (key, 9));
}

#[derive(Encode)]
struct View<'a> {
    name: &'a str,
    values: &'a [u16],
}

#[derive(Debug, PartialEq, Decode)]
struct Owned {
    name: String,
    values: Vec<u16>,
}

#[test]
fn borrowed_views_encode_like_owned_values() {
    let name = String::from("local");
    let values = vec![1u16, 2, 3];
    let view = View { name: &name, values: &values };

    let bytes = to_bytes(&view).unwrap();

    assert_eq!(
        from_bytes::<Owned>(&bytes).unwrap(),
        Owned { name: name.clone(), values: values.clone() }
    );
    assert_eq!(bytes, to_bytes(&(name, values)).unwrap());
}

#[test]
fn capability_predicates() {
    assert!(capability::is_trivial::<u64>());
    assert!(capability::is_trivial::<f32>());
    assert!(!capability::is_trivial::<String>());

    assert!(capability::is_sequence::<Vec<String>>());
    assert!(capability::is_sequence::<str>());
    assert!(capability::is_sequence::<[u8; 4]>());

    assert!(capability::is_tuple_like::<(u8, String)>());
    assert!(capability::is_tuple_like::<()>());

    assert!(capability::is_sum_type::<Animal>());
    assert!(capability::is_sum_type::<std::result::Result<u8, String>>());

    assert!(capability::is_optional::<Option<u8>>());
    assert!(capability::is_aggregate::<std::ops::Range<u32>>());

    assert!(capability::is_customized::<Instrumented>());
    assert_eq!(<Instrumented as Encode>::KIND, Kind::Custom(Form::Method));

    // Smart pointers resolve to what they point at.
    assert!(capability::is_trivial::<Box<u32>>());
    assert!(capability::is_sequence::<Arc<str>>());
}

#[test]
fn nested_builtins_roundtrip() {
    type Nested = Vec<(Option<String>, std::result::Result<[u8; 2], i64>)>;

    let value: Nested =
        vec![(Some(String::from("a")), Ok([1, 2])), (None, Err(-5))];

    let bytes = to_bytes(&value).unwrap();
    assert_eq!(from_bytes::<Nested>(&bytes).unwrap(), value);
}
