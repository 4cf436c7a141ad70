use super::BitReader;
use crate::{BitWriter, Config, Error};

#[test]
fn read_bytes_advances() {
    let mut reader = BitReader::new(vec![1, 2, 3, 4, 5]);

    assert_eq!(reader.read_bytes(2).unwrap(), &[1, 2]);
    assert_eq!(reader.position(), 2);
    assert_eq!(reader.remaining(), 3);
    assert_eq!(reader.rest(), &[3, 4, 5]);

    assert_eq!(reader.read_bytes(3).unwrap(), &[3, 4, 5]);
    assert!(reader.is_exhausted());
}

#[test]
fn out_of_range_read_leaves_cursor() {
    let mut reader = BitReader::new(vec![1, 2, 3]);
    reader.read_bytes(1).unwrap();

    assert_eq!(
        reader.read_bytes(3),
        Err(Error::OutOfRange { requested: 3, remaining: 2 })
    );
    assert_eq!(reader.position(), 1);
    assert_eq!(reader.read_bytes(2).unwrap(), &[2, 3]);
}

#[test]
fn zero_length_read_on_empty_input() {
    let mut reader = BitReader::default();

    assert_eq!(reader.read_bytes(0).unwrap(), &[] as &[u8]);
    assert!(reader.read_bytes(1).is_err());
}

#[test]
fn reader_owns_a_copy() {
    let mut source = vec![7u8, 8];
    let mut reader = BitReader::from_slice(&source);
    source[0] = 0;

    assert_eq!(reader.read_bytes(1).unwrap(), &[7]);
}

#[test]
fn reset_and_clear() {
    let mut reader = BitReader::new(vec![1, 2]);
    reader.read_bytes(2).unwrap();

    reader.reset(vec![9]);
    assert_eq!(reader.position(), 0);
    assert_eq!(reader.read_bytes(1).unwrap(), &[9]);

    reader.clear();
    assert!(reader.data().is_empty());
    assert!(reader.is_exhausted());
}

#[test]
fn length_field() {
    let mut writer = BitWriter::new();
    writer.write_len(300);

    let mut reader = BitReader::new(writer.into_inner());
    assert_eq!(reader.read_len().unwrap(), 300);
}

#[test]
fn truncated_length_field() {
    let mut reader = BitReader::new(vec![0u8; 5]);

    assert_eq!(
        reader.read_len(),
        Err(Error::OutOfRange { requested: 8, remaining: 5 })
    );
}

#[test]
fn capacity_hint_is_bounded() {
    let reader = BitReader::new(vec![0u8; 100])
        .with_config(Config::new().with_max_preallocation(10));

    assert_eq!(reader.capacity_hint::<u8>(5), 5);
    assert_eq!(reader.capacity_hint::<u8>(50), 10);
    assert_eq!(reader.capacity_hint::<u32>(50), 2);

    let reader = BitReader::new(vec![0u8; 3]);
    assert_eq!(reader.capacity_hint::<u8>(usize::MAX), 3);
    assert_eq!(reader.capacity_hint::<u64>(usize::MAX), 0);
    assert_eq!(reader.capacity_hint::<()>(usize::MAX), 3);
}

#[test]
fn reservation_never_exceeds_input() {
    type Block = [u64; 512];

    let mut writer = BitWriter::new();
    writer.write_len(1 << 16);
    writer.write_raw(&vec![0u8; 1 << 16]);
    let input = writer.len();

    let mut target: Vec<Block> = Vec::new();
    let mut reader = BitReader::new(writer.into_inner());
    assert!(reader.decode_into(&mut target).is_err());

    assert!(target.capacity() * size_of::<Block>() <= input);
}

#[test]
fn huge_length_fails_without_allocating() {
    let mut writer = BitWriter::new();
    writer.write_index(u64::MAX / 2);
    writer.write_raw(&[1, 2, 3]);

    let mut reader = BitReader::new(writer.into_inner());
    assert!(matches!(
        reader.decode::<Vec<String>>(),
        Err(Error::OutOfRange { .. })
    ));
}
