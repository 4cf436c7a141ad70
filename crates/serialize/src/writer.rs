//! The write half of the byte stream.

use std::{any::type_name, sync::Arc};

use zerocopy::IntoBytes;

use crate::{
    Config, Encode, Registry, Result,
    capability::{Form, Kind},
};

/// A growable byte buffer that values are encoded into.
///
/// Every write appends; nothing already written is ever modified. The
/// writer also carries the optional [`Registry`] of external strategies the
/// resolver consults, so nested values see the same overrides as the
/// top-level one.
///
/// # Example
///
/// ```ignore
/// use burrow_serialize::BitWriter;
///
/// let mut writer = BitWriter::new();
/// writer.encode(&(1u8, String::from("hi")))?;
/// assert_eq!(writer.len(), 1 + 8 + 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
    buffer: Vec<u8>,
    registry: Option<Arc<Registry>>,
}

impl BitWriter {
    /// Creates an empty writer.
    #[must_use]
    pub const fn new() -> Self { Self { buffer: Vec::new(), registry: None } }

    /// Creates an empty writer with room for `capacity` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { buffer: Vec::with_capacity(capacity), registry: None }
    }

    /// Creates an empty writer sized by `config`.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self::with_capacity(config.initial_capacity())
    }

    /// Creates a writer that appends to `buffer`, keeping its existing
    /// contents and allocation.
    #[must_use]
    pub const fn from_buffer(buffer: Vec<u8>) -> Self {
        Self { buffer, registry: None }
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

    // =========================================================================
    // Raw writes
    // =========================================================================

    /// Appends `len` zero bytes and returns them for the caller to fill.
    ///
    /// The buffer grows by exactly `len` bytes; everything before the new
    /// region is left untouched.
    pub fn write_bytes(&mut self, len: usize) -> &mut [u8] {
        let start = self.buffer.len();
        self.buffer.resize(start + len, 0);
        &mut self.buffer[start..]
    }

    /// Appends `bytes` verbatim.
    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Appends a size field: the length widened to `u64`, raw.
    ///
    /// Size fields never go through the resolver.
    pub fn write_len(&mut self, len: usize) { self.write_index(len as u64); }

    /// Appends a sum-type index field, raw.
    pub fn write_index(&mut self, index: u64) {
        self.write_raw(index.as_bytes());
    }

    // =========================================================================
    // Buffer access
    // =========================================================================

    /// The bytes written so far.
    #[must_use]
    pub fn data(&self) -> &[u8] { &self.buffer }

    /// Number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize { self.buffer.len() }

    /// Returns `true` if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.buffer.is_empty() }

    /// Discards the contents, keeping the allocation for reuse.
    pub fn clear(&mut self) { self.buffer.clear(); }

    /// Consumes the writer and returns its buffer.
    #[must_use]
    pub fn into_inner(self) -> Vec<u8> { self.buffer }

    // =========================================================================
    // Resolver
    // =========================================================================

    /// Encodes `value` with the strategy the resolver picks for `T`.
    ///
    /// An external strategy registered for `T` wins; otherwise the type's own
    /// [`Encode`] impl runs. Every nested value a built-in strategy writes is
    /// routed back through here.
    ///
    /// # Errors
    ///
    /// Propagates errors raised by the chosen strategy.
    pub fn encode<T: Encode + ?Sized>(&mut self, value: &T) -> Result<()> {
        let external = self
            .registry
            .as_ref()
            .and_then(|registry| registry.serializer::<T>());

        if let Some(strategy) = external {
            tracing::trace!(ty = type_name::<T>(), "using external serializer");
            // SAFETY: the strategy was stored under the lifetime-erased id of
            // `T`, so it expects a `&T`, and `value` outlives the call.
            return unsafe {
                strategy.serialize_erased(self, (&raw const value).cast())
            };
        }

        value.encode(self)
    }

    /// Returns `true` if an external strategy overrides the encoding of `T`.
    #[must_use]
    pub fn overrides<T: ?Sized>(&self) -> bool {
        self.registry
            .as_ref()
            .is_some_and(|registry| registry.has_serializer::<T>())
    }

    /// The strategy [`encode`](Self::encode) will use for `T`.
    #[must_use]
    pub fn resolve<T: Encode + ?Sized>(&self) -> Kind {
        if self.overrides::<T>() {
            Kind::Custom(Form::External)
        } else {
            T::KIND
        }
    }
}

impl From<Vec<u8>> for BitWriter {
    fn from(buffer: Vec<u8>) -> Self { Self::from_buffer(buffer) }
}

impl From<BitWriter> for Vec<u8> {
    fn from(writer: BitWriter) -> Self { writer.into_inner() }
}

impl AsRef<[u8]> for BitWriter {
    fn as_ref(&self) -> &[u8] { &self.buffer }
}
