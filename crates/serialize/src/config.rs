//! Tuning knobs for writers and readers.
//!
//! [`Config`] is a small `Copy` value handed to
//! [`BitWriter::with_config`](crate::BitWriter::with_config) and
//! [`BitReader::with_config`](crate::BitReader::with_config). Neither knob
//! changes the wire format; both only affect allocation behavior.
//!
//! ```ignore
//! use burrow_serialize::{BitReader, Config};
//!
//! let config = Config::new().with_max_preallocation(1024);
//! let reader = BitReader::new(bytes).with_config(config);
//! ```

/// Allocation settings for a serialization session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Config {
    initial_capacity: usize,
    max_preallocation: usize,
}

impl Config {
    /// The default upper bound, in bytes, on storage reserved up front when
    /// decoding a sequence.
    pub const DEFAULT_MAX_PREALLOCATION: usize = 1 << 20;

    /// Creates a configuration with the default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            initial_capacity: 0,
            max_preallocation: Self::DEFAULT_MAX_PREALLOCATION,
        }
    }

    /// Sets the number of bytes a writer reserves when it is created.
    ///
    /// # Default Value
    ///
    /// `0`: the buffer grows on the first write.
    #[must_use]
    pub const fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Sets the maximum number of bytes a reader reserves before decoding a
    /// sequence.
    ///
    /// Length fields come from untrusted input. Capping the reservation means
    /// a corrupt length fails with an out-of-range read instead of an
    /// enormous allocation. Sequences longer than the cap still decode; their
    /// storage grows as elements arrive.
    ///
    /// # Default Value
    ///
    /// [`Self::DEFAULT_MAX_PREALLOCATION`] (1 MiB).
    #[must_use]
    pub const fn with_max_preallocation(mut self, bytes: usize) -> Self {
        self.max_preallocation = bytes;
        self
    }

    /// Bytes reserved by a fresh writer.
    #[must_use]
    pub const fn initial_capacity(&self) -> usize { self.initial_capacity }

    /// Byte budget for up-front sequence reservations.
    #[must_use]
    pub const fn max_preallocation(&self) -> usize { self.max_preallocation }
}

impl Default for Config {
    fn default() -> Self { Self::new() }
}
