//! Error type shared by every encode and decode operation.

use std::str::Utf8Error;

/// Errors reported while reading from a [`BitReader`](crate::BitReader) or
/// while running an encode/decode strategy.
///
/// Encoding into a [`BitWriter`](crate::BitWriter) cannot fail on its own;
/// only user-supplied strategies produce errors on the write side.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A read asked for more bytes than remain in the buffer. The cursor was
    /// not advanced.
    #[error(
        "attempted to read {requested} bytes with only {remaining} remaining"
    )]
    OutOfRange {
        /// Number of bytes requested.
        requested: usize,
        /// Number of bytes left after the cursor.
        remaining: usize,
    },

    /// A length field does not match the fixed length of the destination
    /// array.
    #[error("expected a sequence of length {expected}, found {found}")]
    SizeMismatch {
        /// The fixed length of the destination.
        expected: usize,
        /// The length recorded in the stream.
        found: u64,
    },

    /// A sum-type tag is neither the empty sentinel nor a valid alternative.
    #[error("invalid alternative index {index} (expected 0..{alternatives})")]
    InvalidIndex {
        /// The tag read from the stream.
        index: u64,
        /// Number of alternatives of the target type.
        alternatives: usize,
    },

    /// String bytes are not valid UTF-8.
    #[error("invalid UTF-8: {0}")]
    InvalidUtf8(#[from] Utf8Error),

    /// A value's bit pattern is not valid for its type.
    #[error("invalid {type_name}: {reason}")]
    InvalidValue {
        /// Name of the type being decoded.
        type_name: &'static str,
        /// What is wrong with the value.
        reason: &'static str,
    },

    /// Storage for a decoded sequence could not be allocated.
    #[error("failed to allocate storage for {len} elements")]
    AllocationFailed {
        /// Number of elements requested.
        len: usize,
    },

    /// An error raised by a user-supplied strategy.
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Creates an [`Error::Custom`] from any displayable message.
    pub fn custom(message: impl std::fmt::Display) -> Self {
        Self::Custom(message.to_string())
    }

    pub(crate) const fn invalid_value(
        type_name: &'static str,
        reason: &'static str,
    ) -> Self {
        Self::InvalidValue { type_name, reason }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
