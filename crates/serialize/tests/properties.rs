use std::collections::BTreeMap;

use burrow_serialize::{
    BitReader, BitWriter, Decode, Encode, Error, from_bytes, to_bytes,
};
use proptest::prelude::*;

#[derive(Debug, Clone, PartialEq, Encode, Decode)]
struct Record {
    id: u64,
    label: String,
    scores: Vec<f64>,
    parent: Option<u32>,
    attributes: BTreeMap<String, i16>,
}

#[derive(Debug, Clone, PartialEq, Encode, Decode)]
enum Event {
    Created(Record),
    Renamed { id: u64, label: String },
    Deleted(u64),
    #[serialize(empty)]
    Idle,
}

fn arb_record() -> impl Strategy<Value = Record> {
    (
        any::<u64>(),
        ".{0,16}",
        prop::collection::vec(
            any::<f64>().prop_filter("nan", |x| !x.is_nan()),
            0..8,
        ),
        any::<Option<u32>>(),
        prop::collection::btree_map(".{0,4}", any::<i16>(), 0..4),
    )
        .prop_map(|(id, label, scores, parent, attributes)| Record {
            id,
            label,
            scores,
            parent,
            attributes,
        })
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_record().prop_map(Event::Created),
        (any::<u64>(), ".{0,8}")
            .prop_map(|(id, label)| Event::Renamed { id, label }),
        any::<u64>().prop_map(Event::Deleted),
        Just(Event::Idle),
    ]
}

fn roundtrip<T: Encode + Decode + 'static>(value: &T) -> T {
    let bytes = to_bytes(value).unwrap();
    let mut reader = BitReader::new(bytes);
    let decoded = reader.decode().unwrap();
    assert!(reader.is_exhausted());
    decoded
}

proptest! {
    #[test]
    fn integers_roundtrip(
        a in any::<i128>(),
        b in any::<usize>(),
        c in any::<char>(),
    ) {
        prop_assert_eq!(roundtrip(&(a, b, c)), (a, b, c));
    }

    #[test]
    fn strings_roundtrip(s in ".*") {
        prop_assert_eq!(roundtrip(&s), s);
    }

    #[test]
    fn records_roundtrip(record in arb_record()) {
        prop_assert_eq!(roundtrip(&record), record);
    }

    #[test]
    fn events_roundtrip(events in prop::collection::vec(arb_event(), 0..6)) {
        prop_assert_eq!(roundtrip(&events), events);
    }

    /// The block copy emits exactly what writing each element would.
    #[test]
    fn block_copy_matches_element_writes(
        items in prop::collection::vec(any::<u32>(), 0..64),
    ) {
        let mut manual = BitWriter::new();
        manual.write_len(items.len());
        for item in &items {
            manual.encode(item).unwrap();
        }

        prop_assert_eq!(to_bytes(&items).unwrap(), manual.into_inner());
    }

    #[test]
    fn decoded_length_follows_length_field(
        items in prop::collection::vec(any::<u8>(), 0..32),
        extra in prop::collection::vec(any::<u8>(), 0..8),
    ) {
        let mut bytes = to_bytes(&items).unwrap();
        bytes.extend(&extra);

        let mut reader = BitReader::new(bytes);
        prop_assert_eq!(reader.decode::<Vec<u8>>().unwrap(), items);
        prop_assert_eq!(reader.remaining(), extra.len());
    }

    /// Every strict prefix of a valid encoding fails cleanly.
    #[test]
    fn truncation_is_detected(
        record in arb_record(),
        cut in any::<prop::sample::Index>(),
    ) {
        let bytes = to_bytes(&record).unwrap();
        let len = cut.index(bytes.len());

        let result = from_bytes::<Record>(&bytes[..len]);
        prop_assert!(
            matches!(result, Err(Error::OutOfRange { .. })),
            "expected out of range, got {:?}",
            result
        );
    }
}
