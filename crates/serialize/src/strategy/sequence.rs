//! Length-prefixed sequences.
//!
//! A sequence is written as its element count (`u64`) followed by each
//! element in iteration order. When the elements sit in one contiguous block,
//! are trivially copyable, and have no external strategy registered, the
//! whole block is copied at once. Both paths produce the same bytes.
//!
//! Maps are sequences of entries, each written as its key followed by its
//! value. Every key and value goes through the resolver on its own, so
//! external strategies for the key and value types apply; one registered for
//! the `(K, V)` tuple does not.

use std::{
    any::type_name,
    collections::{BTreeMap, BTreeSet, HashMap, HashSet, LinkedList, VecDeque},
    hash::{BuildHasher, Hash},
    rc::Rc,
    sync::Arc,
};

use dashmap::{DashMap, DashSet};

use crate::{
    BitReader, BitWriter, Decode, Encode, Error, Result,
    capability::{Kind, Rebuild, Sequence},
};

/// Writes the length of `sequence` followed by its elements.
///
/// # Errors
///
/// Propagates element encoding errors.
pub fn encode<S>(writer: &mut BitWriter, sequence: &S) -> Result<()>
where
    S: Sequence + ?Sized,
    S::Element: Encode,
{
    writer.write_len(sequence.element_count());
    encode_body(writer, sequence)
}

/// Writes the elements of `sequence` without a length field.
fn encode_body<S>(writer: &mut BitWriter, sequence: &S) -> Result<()>
where
    S: Sequence + ?Sized,
    S::Element: Encode,
{
    if !writer.overrides::<S::Element>()
        && let Some(bytes) = sequence
            .as_contiguous()
            .and_then(|items| <S::Element as Encode>::raw_bytes(items))
    {
        writer.write_raw(bytes);
        return Ok(());
    }

    sequence.encode_elements(writer)
}

/// Reads a length field and that many elements.
///
/// # Errors
///
/// Returns [`Error::OutOfRange`] if the stream ends early, or any element or
/// rebuild error.
pub fn decode<S>(reader: &mut BitReader) -> Result<S>
where
    S: Rebuild,
    S::Element: Decode + 'static,
{
    let len = reader.read_len()?;
    decode_body(reader, len)
}

fn decode_body<S>(reader: &mut BitReader, len: usize) -> Result<S>
where
    S: Rebuild,
    S::Element: Decode + 'static,
{
    if S::CONTIGUOUS
        && !reader.overrides::<S::Element>()
        && let Some(items) =
            <S::Element as Decode>::decode_raw_vec(reader, len)
    {
        return S::from_vec(items?);
    }

    S::decode_elements(reader, len)
}

/// Writes each item of `iter` through the resolver.
fn encode_each<'a, T, I>(writer: &mut BitWriter, iter: I) -> Result<()>
where
    T: Encode + 'a,
    I: IntoIterator<Item = &'a T>,
{
    for item in iter {
        writer.encode(item)?;
    }
    Ok(())
}

/// Writes each map entry as a key followed by a value.
fn encode_entries<'a, K, V, I>(writer: &mut BitWriter, iter: I) -> Result<()>
where
    K: Encode + 'a,
    V: Encode + 'a,
    I: IntoIterator<Item = (&'a K, &'a V)>,
{
    for (key, value) in iter {
        writer.encode(key)?;
        writer.encode(value)?;
    }
    Ok(())
}

fn decode_entries<K, V, M>(
    reader: &mut BitReader,
    len: usize,
    map: &mut M,
) -> Result<()>
where
    K: Decode + 'static,
    V: Decode + 'static,
    M: Extend<(K, V)>,
{
    for _ in 0..len {
        let key = reader.decode()?;
        let value = reader.decode()?;
        map.extend(std::iter::once((key, value)));
    }
    Ok(())
}

// =============================================================================
// Slices, vectors and arrays
// =============================================================================

impl<T: Encode> Sequence for [T] {
    type Element = T;

    fn element_count(&self) -> usize { self.len() }

    fn as_contiguous(&self) -> Option<&[T]> { Some(self) }

    fn encode_elements(&self, writer: &mut BitWriter) -> Result<()> {
        encode_each(writer, self)
    }
}

impl<T: Encode> Encode for [T] {
    const KIND: Kind = Kind::Sequence;

    fn encode(&self, writer: &mut BitWriter) -> Result<()> {
        encode(writer, self)
    }
}

impl<T: Encode> Sequence for Vec<T> {
    type Element = T;

    fn element_count(&self) -> usize { self.len() }

    fn as_contiguous(&self) -> Option<&[T]> { Some(self) }

    fn encode_elements(&self, writer: &mut BitWriter) -> Result<()> {
        encode_each(writer, self)
    }
}

impl<T> Rebuild for Vec<T> {
    type Element = T;

    const CONTIGUOUS: bool = true;

    fn from_vec(items: Vec<T>) -> Result<Self> { Ok(items) }
}

impl<T: Encode> Encode for Vec<T> {
    const KIND: Kind = Kind::Sequence;

    fn encode(&self, writer: &mut BitWriter) -> Result<()> {
        encode(writer, self)
    }
}

impl<T: Decode + 'static> Decode for Vec<T> {
    const KIND: Kind = Kind::Sequence;

    fn decode(reader: &mut BitReader) -> Result<Self> { decode(reader) }

    fn decode_into(&mut self, reader: &mut BitReader) -> Result<()> {
        let len = reader.read_len()?;
        if !reader.overrides::<T>()
            && let Some(items) = T::decode_raw_vec(reader, len)
        {
            *self = items?;
            return Ok(());
        }

        self.clear();
        self.reserve(reader.capacity_hint::<T>(len));
        for _ in 0..len {
            self.push(reader.decode()?);
        }
        Ok(())
    }
}

impl<T: Encode, const N: usize> Sequence for [T; N] {
    type Element = T;

    fn element_count(&self) -> usize { N }

    fn as_contiguous(&self) -> Option<&[T]> { Some(self) }

    fn encode_elements(&self, writer: &mut BitWriter) -> Result<()> {
        encode_each(writer, self)
    }
}

/// Fixed arrays still carry a length field, checked against `N` on decode.
impl<T: Encode, const N: usize> Encode for [T; N] {
    const KIND: Kind = Kind::Sequence;

    fn encode(&self, writer: &mut BitWriter) -> Result<()> {
        encode(writer, self)
    }
}

impl<T: Decode + 'static, const N: usize> Decode for [T; N] {
    const KIND: Kind = Kind::Sequence;

    fn decode(reader: &mut BitReader) -> Result<Self> {
        read_array_len::<T, N>(reader)?;

        let items: Vec<T> = decode_body(reader, N)?;
        items.try_into().map_err(|items: Vec<T>| Error::SizeMismatch {
            expected: N,
            found: items.len() as u64,
        })
    }

    fn decode_into(&mut self, reader: &mut BitReader) -> Result<()> {
        read_array_len::<T, N>(reader)?;

        if !reader.overrides::<T>()
            && let Some(result) = T::decode_raw_into(self, reader)
        {
            return result;
        }

        for item in self {
            reader.decode_into(item)?;
        }
        Ok(())
    }
}

fn read_array_len<T, const N: usize>(reader: &mut BitReader) -> Result<()> {
    let found = reader.read_index()?;
    if found != N as u64 {
        tracing::debug!(
            ty = type_name::<[T; N]>(),
            expected = N,
            found,
            "fixed-size array length mismatch"
        );
        return Err(Error::SizeMismatch { expected: N, found });
    }
    Ok(())
}

macro_rules! impl_shared_slice {
    ($($ptr:ident),+) => {
        $(
            impl<T: Decode + 'static> Decode for $ptr<[T]> {
                const KIND: Kind = Kind::Sequence;

                fn decode(reader: &mut BitReader) -> Result<Self> {
                    decode::<Vec<T>>(reader).map(Self::from)
                }
            }
        )+
    };
}

impl_shared_slice!(Box, Rc, Arc);

// =============================================================================
// Strings
// =============================================================================

impl Sequence for str {
    type Element = u8;

    fn element_count(&self) -> usize { self.len() }

    fn as_contiguous(&self) -> Option<&[u8]> { Some(self.as_bytes()) }

    fn encode_elements(&self, writer: &mut BitWriter) -> Result<()> {
        encode_each(writer, self.as_bytes())
    }
}

impl Encode for str {
    const KIND: Kind = Kind::Sequence;

    fn encode(&self, writer: &mut BitWriter) -> Result<()> {
        encode(writer, self)
    }
}

impl Sequence for String {
    type Element = u8;

    fn element_count(&self) -> usize { self.len() }

    fn as_contiguous(&self) -> Option<&[u8]> { Some(self.as_bytes()) }

    fn encode_elements(&self, writer: &mut BitWriter) -> Result<()> {
        self.as_str().encode_elements(writer)
    }
}

impl Rebuild for String {
    type Element = u8;

    const CONTIGUOUS: bool = true;

    fn from_vec(items: Vec<u8>) -> Result<Self> {
        Self::from_utf8(items).map_err(|error| error.utf8_error().into())
    }
}

impl Encode for String {
    const KIND: Kind = Kind::Sequence;

    fn encode(&self, writer: &mut BitWriter) -> Result<()> {
        encode(writer, self)
    }
}

impl Decode for String {
    const KIND: Kind = Kind::Sequence;

    fn decode(reader: &mut BitReader) -> Result<Self> { decode(reader) }
}

macro_rules! impl_shared_str {
    ($($ptr:ident),+) => {
        $(
            impl Decode for $ptr<str> {
                const KIND: Kind = Kind::Sequence;

                fn decode(reader: &mut BitReader) -> Result<Self> {
                    decode::<String>(reader).map(Self::from)
                }
            }
        )+
    };
}

impl_shared_str!(Box, Rc, Arc);

// =============================================================================
// Other standard collections
// =============================================================================

impl<T: Encode> Sequence for VecDeque<T> {
    type Element = T;

    fn element_count(&self) -> usize { self.len() }

    fn as_contiguous(&self) -> Option<&[T]> {
        match self.as_slices() {
            (front, []) => Some(front),
            _ => None,
        }
    }

    fn encode_elements(&self, writer: &mut BitWriter) -> Result<()> {
        encode_each(writer, self)
    }
}

impl<T> Rebuild for VecDeque<T> {
    type Element = T;

    const CONTIGUOUS: bool = true;

    fn from_vec(items: Vec<T>) -> Result<Self> { Ok(items.into()) }
}

impl<T: Encode> Sequence for LinkedList<T> {
    type Element = T;

    fn element_count(&self) -> usize { self.len() }

    fn encode_elements(&self, writer: &mut BitWriter) -> Result<()> {
        encode_each(writer, self)
    }
}

impl<T: Decode + 'static> Rebuild for LinkedList<T> {
    type Element = T;

    const CONTIGUOUS: bool = false;

    fn from_vec(items: Vec<T>) -> Result<Self> {
        Ok(items.into_iter().collect())
    }

    fn decode_elements(reader: &mut BitReader, len: usize) -> Result<Self> {
        let mut list = Self::new();
        for _ in 0..len {
            list.push_back(reader.decode()?);
        }
        Ok(list)
    }
}

impl<T: Encode + Eq + Hash, S: BuildHasher> Sequence
    for HashSet<T, S>
{
    type Element = T;

    fn element_count(&self) -> usize { self.len() }

    fn encode_elements(&self, writer: &mut BitWriter) -> Result<()> {
        encode_each(writer, self)
    }
}

impl<T, S> Rebuild for HashSet<T, S>
where
    T: Decode + Eq + Hash + 'static,
    S: BuildHasher + Default,
{
    type Element = T;

    const CONTIGUOUS: bool = false;

    fn from_vec(items: Vec<T>) -> Result<Self> {
        Ok(items.into_iter().collect())
    }

    fn decode_elements(reader: &mut BitReader, len: usize) -> Result<Self> {
        let mut set = Self::with_capacity_and_hasher(
            reader.capacity_hint::<T>(len),
            S::default(),
        );
        for _ in 0..len {
            set.insert(reader.decode()?);
        }
        Ok(set)
    }
}

impl<T: Encode + Ord> Sequence for BTreeSet<T> {
    type Element = T;

    fn element_count(&self) -> usize { self.len() }

    fn encode_elements(&self, writer: &mut BitWriter) -> Result<()> {
        encode_each(writer, self)
    }
}

impl<T: Decode + Ord + 'static> Rebuild for BTreeSet<T> {
    type Element = T;

    const CONTIGUOUS: bool = false;

    fn from_vec(items: Vec<T>) -> Result<Self> {
        Ok(items.into_iter().collect())
    }

    fn decode_elements(reader: &mut BitReader, len: usize) -> Result<Self> {
        let mut set = Self::new();
        for _ in 0..len {
            set.insert(reader.decode()?);
        }
        Ok(set)
    }
}

impl<K, V, S> Sequence for HashMap<K, V, S>
where
    K: Encode + Eq + Hash,
    V: Encode,
    S: BuildHasher,
{
    type Element = (K, V);

    fn element_count(&self) -> usize { self.len() }

    fn encode_elements(&self, writer: &mut BitWriter) -> Result<()> {
        encode_entries(writer, self)
    }
}

impl<K, V, S> Rebuild for HashMap<K, V, S>
where
    K: Decode + Eq + Hash + 'static,
    V: Decode + 'static,
    S: BuildHasher + Default,
{
    type Element = (K, V);

    const CONTIGUOUS: bool = false;

    fn from_vec(items: Vec<(K, V)>) -> Result<Self> {
        Ok(items.into_iter().collect())
    }

    fn decode_elements(reader: &mut BitReader, len: usize) -> Result<Self> {
        let mut map = Self::with_capacity_and_hasher(
            reader.capacity_hint::<(K, V)>(len),
            S::default(),
        );
        decode_entries(reader, len, &mut map)?;
        Ok(map)
    }
}

impl<K, V> Sequence for BTreeMap<K, V>
where
    K: Encode + Ord,
    V: Encode,
{
    type Element = (K, V);

    fn element_count(&self) -> usize { self.len() }

    fn encode_elements(&self, writer: &mut BitWriter) -> Result<()> {
        encode_entries(writer, self)
    }
}

impl<K, V> Rebuild for BTreeMap<K, V>
where
    K: Decode + Ord + 'static,
    V: Decode + 'static,
{
    type Element = (K, V);

    const CONTIGUOUS: bool = false;

    fn from_vec(items: Vec<(K, V)>) -> Result<Self> {
        Ok(items.into_iter().collect())
    }

    fn decode_elements(reader: &mut BitReader, len: usize) -> Result<Self> {
        let mut map = Self::new();
        decode_entries(reader, len, &mut map)?;
        Ok(map)
    }
}

// =============================================================================
// Concurrent collections
// =============================================================================

/// Each shard stays read-locked from the moment it is reached until the
/// whole map is written, so the length field always matches the entries
/// that follow it, even while other threads insert or remove.
impl<K, V, S> Encode for DashMap<K, V, S>
where
    K: Encode + Eq + Hash,
    V: Encode,
    S: BuildHasher + Clone,
{
    const KIND: Kind = Kind::Sequence;

    fn encode(&self, writer: &mut BitWriter) -> Result<()> {
        let entries: Vec<_> = self.iter().collect();

        writer.write_len(entries.len());
        for entry in &entries {
            writer.encode(entry.key())?;
            writer.encode(entry.value())?;
        }
        Ok(())
    }
}

impl<K, V, S> Decode for DashMap<K, V, S>
where
    K: Decode + Eq + Hash + 'static,
    V: Decode + 'static,
    S: BuildHasher + Default + Clone,
{
    const KIND: Kind = Kind::Sequence;

    fn decode(reader: &mut BitReader) -> Result<Self> { decode(reader) }
}

impl<K, V, S> Rebuild for DashMap<K, V, S>
where
    K: Decode + Eq + Hash + 'static,
    V: Decode + 'static,
    S: BuildHasher + Default + Clone,
{
    type Element = (K, V);

    const CONTIGUOUS: bool = false;

    fn from_vec(items: Vec<(K, V)>) -> Result<Self> {
        Ok(items.into_iter().collect())
    }

    fn decode_elements(reader: &mut BitReader, len: usize) -> Result<Self> {
        let map = Self::with_capacity_and_hasher(
            reader.capacity_hint::<(K, V)>(len),
            S::default(),
        );
        for _ in 0..len {
            let key = reader.decode()?;
            let value = reader.decode()?;
            map.insert(key, value);
        }
        Ok(map)
    }
}

/// Snapshotted like [`DashMap`].
impl<T, S> Encode for DashSet<T, S>
where
    T: Encode + Eq + Hash,
    S: BuildHasher + Clone,
{
    const KIND: Kind = Kind::Sequence;

    fn encode(&self, writer: &mut BitWriter) -> Result<()> {
        let entries: Vec<_> = self.iter().collect();

        writer.write_len(entries.len());
        for entry in &entries {
            writer.encode(entry.key())?;
        }
        Ok(())
    }
}

impl<T, S> Decode for DashSet<T, S>
where
    T: Decode + Eq + Hash + 'static,
    S: BuildHasher + Default + Clone,
{
    const KIND: Kind = Kind::Sequence;

    fn decode(reader: &mut BitReader) -> Result<Self> { decode(reader) }
}

impl<T, S> Rebuild for DashSet<T, S>
where
    T: Decode + Eq + Hash + 'static,
    S: BuildHasher + Default + Clone,
{
    type Element = T;

    const CONTIGUOUS: bool = false;

    fn from_vec(items: Vec<T>) -> Result<Self> {
        Ok(items.into_iter().collect())
    }

    fn decode_elements(reader: &mut BitReader, len: usize) -> Result<Self> {
        let set = Self::with_capacity_and_hasher(
            reader.capacity_hint::<T>(len),
            S::default(),
        );
        for _ in 0..len {
            set.insert(reader.decode()?);
        }
        Ok(set)
    }
}

// Collections whose encode side is the generic `Sequence` impl above.
macro_rules! impl_collection {
    ($(
        impl<$($param:ident),*> for $ty:ty
        where encode: [$($enc:tt)*], decode: [$($dec:tt)*];
    )+) => {
        $(
            impl<$($param),*> Encode for $ty
            where
                $($enc)*
            {
                const KIND: Kind = Kind::Sequence;

                fn encode(&self, writer: &mut BitWriter) -> Result<()> {
                    encode(writer, self)
                }
            }

            impl<$($param),*> Decode for $ty
            where
                $($dec)*
            {
                const KIND: Kind = Kind::Sequence;

                fn decode(reader: &mut BitReader) -> Result<Self> {
                    decode(reader)
                }
            }
        )+
    };
}

impl_collection! {
    impl<T> for VecDeque<T>
    where
        encode: [T: Encode],
        decode: [T: Decode + 'static];

    impl<T> for LinkedList<T>
    where
        encode: [T: Encode],
        decode: [T: Decode + 'static];

    impl<T, S> for HashSet<T, S>
    where
        encode: [T: Encode + Eq + Hash, S: BuildHasher],
        decode: [T: Decode + Eq + Hash + 'static, S: BuildHasher + Default];

    impl<T> for BTreeSet<T>
    where
        encode: [T: Encode + Ord],
        decode: [T: Decode + Ord + 'static];

    impl<K, V, S> for HashMap<K, V, S>
    where
        encode: [
            K: Encode + Eq + Hash,
            V: Encode,
            S: BuildHasher,
        ],
        decode: [
            K: Decode + Eq + Hash + 'static,
            V: Decode + 'static,
            S: BuildHasher + Default,
        ];

    impl<K, V> for BTreeMap<K, V>
    where
        encode: [K: Encode + Ord, V: Encode],
        decode: [K: Decode + Ord + 'static, V: Decode + 'static];
}
