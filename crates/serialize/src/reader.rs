//! The read half of the byte stream.

use std::{any::type_name, sync::Arc};

use zerocopy::FromBytes;

use crate::{
    Config, Decode, Error, Registry, Result,
    capability::{Form, Kind},
};

/// A cursor over an owned copy of encoded bytes.
///
/// Reads consume bytes from the front. A read that asks for more bytes than
/// remain fails with [`Error::OutOfRange`] and leaves the cursor where it
/// was.
///
/// # Example
///
/// ```ignore
/// use burrow_serialize::{BitReader, BitWriter};
///
/// let mut writer = BitWriter::new();
/// writer.encode(&vec![1u32, 2, 3])?;
///
/// let mut reader = BitReader::new(writer.into_inner());
/// let numbers: Vec<u32> = reader.decode()?;
/// assert!(reader.is_exhausted());
/// ```
#[derive(Debug, Clone, Default)]
pub struct BitReader {
    data: Vec<u8>,
    cursor: usize,
    registry: Option<Arc<Registry>>,
    config: Config,
}

impl BitReader {
    /// Creates a reader over `data`.
    #[must_use]
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            cursor: 0,
            registry: None,
            config: Config::new(),
        }
    }

    /// Creates a reader over a copy of `data`.
    #[must_use]
    pub fn from_slice(data: &[u8]) -> Self { Self::new(data.to_vec()) }

    /// Replaces the reader's configuration.
    #[must_use]
    pub const fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Attaches a table of external strategies.
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// The attached registry, if any.
    #[must_use]
    pub fn registry(&self) -> Option<&Arc<Registry>> { self.registry.as_ref() }

    /// The reader's configuration.
    #[must_use]
    pub const fn config(&self) -> &Config { &self.config }

    // =========================================================================
    // Raw reads
    // =========================================================================

    /// Consumes the next `len` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if fewer than `len` bytes remain. The
    /// cursor does not move in that case.
    pub fn read_bytes(&mut self, len: usize) -> Result<&[u8]> {
        let remaining = self.remaining();
        if len > remaining {
            tracing::debug!(
                requested = len,
                remaining,
                position = self.cursor,
                "rejected out-of-range read"
            );
            return Err(Error::OutOfRange { requested: len, remaining });
        }

        let start = self.cursor;
        self.cursor += len;
        Ok(&self.data[start..self.cursor])
    }

    /// Consumes a raw `u64` index field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if fewer than eight bytes remain.
    pub fn read_index(&mut self) -> Result<u64> {
        let bytes = self.read_bytes(size_of::<u64>())?;
        u64::read_from_bytes(bytes)
            .map_err(|_| Error::invalid_value("u64", "truncated index field"))
    }

    /// Consumes a size field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if the field is truncated, or
    /// [`Error::InvalidValue`] if the length does not fit in `usize`.
    pub fn read_len(&mut self) -> Result<usize> {
        let len = self.read_index()?;
        usize::try_from(len).map_err(|_| {
            Error::invalid_value("usize", "length exceeds the address space")
        })
    }

    // =========================================================================
    // Cursor state
    // =========================================================================

    /// Number of bytes consumed so far.
    #[must_use]
    pub const fn position(&self) -> usize { self.cursor }

    /// Number of bytes left to read.
    #[must_use]
    pub fn remaining(&self) -> usize { self.data.len() - self.cursor }

    /// Returns `true` if every byte has been consumed.
    #[must_use]
    pub fn is_exhausted(&self) -> bool { self.cursor == self.data.len() }

    /// The whole underlying buffer, including consumed bytes.
    #[must_use]
    pub fn data(&self) -> &[u8] { &self.data }

    /// The bytes not yet consumed.
    #[must_use]
    pub fn rest(&self) -> &[u8] { &self.data[self.cursor..] }

    /// Releases the data and rewinds the cursor.
    pub fn clear(&mut self) {
        self.data = Vec::new();
        self.cursor = 0;
    }

    /// Starts a new session over `data`. The registry and configuration are
    /// kept.
    pub fn reset(&mut self, data: impl Into<Vec<u8>>) {
        self.data = data.into();
        self.cursor = 0;
    }

    /// Number of `E`s to reserve before decoding a sequence that claims
    /// `len` elements.
    ///
    /// The reservation, in bytes, never exceeds the configured budget nor
    /// the input left to read, so an untrusted length cannot force a large
    /// allocation.
    #[must_use]
    pub fn capacity_hint<E>(&self, len: usize) -> usize {
        let size = size_of::<E>().max(1);
        let budget = self.config.max_preallocation().min(self.remaining());

        len.min(budget / size)
    }

    // =========================================================================
    // Resolver
    // =========================================================================

    /// Decodes a `T` with the strategy the resolver picks for it.
    ///
    /// # Errors
    ///
    /// Propagates read errors and errors raised by the chosen strategy.
    pub fn decode<T: Decode + 'static>(&mut self) -> Result<T> {
        let external = self
            .registry
            .as_ref()
            .and_then(|registry| registry.deserializer::<T>());

        if let Some(strategy) = external {
            tracing::trace!(
                ty = type_name::<T>(),
                "using external deserializer"
            );
            return strategy.deserialize(self);
        }

        T::decode(self)
    }

    /// Decodes into an existing value.
    ///
    /// Built-in strategies reuse the target's storage where they can. An
    /// external strategy always replaces the value.
    ///
    /// # Errors
    ///
    /// Propagates read errors and errors raised by the chosen strategy. On
    /// error the target may be partially overwritten but is always valid.
    pub fn decode_into<T: Decode + 'static>(
        &mut self,
        value: &mut T,
    ) -> Result<()> {
        let external = self
            .registry
            .as_ref()
            .and_then(|registry| registry.deserializer::<T>());

        if let Some(strategy) = external {
            tracing::trace!(
                ty = type_name::<T>(),
                "using external deserializer"
            );
            *value = strategy.deserialize(self)?;
            return Ok(());
        }

        value.decode_into(self)
    }

    /// Returns `true` if an external strategy overrides the decoding of `T`.
    #[must_use]
    pub fn overrides<T: ?Sized>(&self) -> bool {
        self.registry
            .as_ref()
            .is_some_and(|registry| registry.has_deserializer::<T>())
    }

    /// The strategy [`decode`](Self::decode) will use for `T`.
    #[must_use]
    pub fn resolve<T: Decode + 'static>(&self) -> Kind {
        if self.overrides::<T>() {
            Kind::Custom(Form::External)
        } else {
            T::KIND
        }
    }
}

impl From<Vec<u8>> for BitReader {
    fn from(data: Vec<u8>) -> Self { Self::new(data) }
}

impl From<&[u8]> for BitReader {
    fn from(data: &[u8]) -> Self { Self::from_slice(data) }
}

#[cfg(test)]
mod test;
