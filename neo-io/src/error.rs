//! Error types for binary encoding and decoding.

use thiserror::Error;

/// Errors raised while reading or writing wire data.
///
/// All of these describe malformed input: the bytes are already captured,
/// so none of them is worth retrying.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IoError {
    /// The cursor would move past the end of the buffer.
    #[error("unexpected end of input while reading {entity}: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof {
        /// What was being read.
        entity: &'static str,
        /// Bytes required.
        needed: usize,
        /// Bytes left in the buffer.
        remaining: usize,
    },

    /// A decoded value is larger than the caller allowed.
    #[error("{entity} value {value} exceeds maximum {max}")]
    ValueOutOfRange {
        /// What was being read.
        entity: &'static str,
        /// Decoded value.
        value: u64,
        /// Caller supplied maximum.
        max: u64,
    },

    /// A VarInt used a wider tag than its value needs.
    #[error("non-canonical var-int: value {value} encoded with prefix 0x{prefix:02x}")]
    NonCanonicalVarInt {
        /// The tag byte that was read.
        prefix: u8,
        /// The decoded value.
        value: u64,
    },

    /// EC point encodings must start with 0x00, 0x02, 0x03 or 0x04.
    #[error("invalid EC point prefix 0x{0:02x}")]
    InvalidEcPointPrefix(u8),

    /// A string field was not valid UTF-8.
    #[error("invalid UTF-8 in {entity}")]
    InvalidUtf8 {
        /// What was being read.
        entity: &'static str,
    },

    /// `reset` was called without a preceding `mark`.
    #[error("reset called without a mark")]
    NoMark,

    /// Structurally invalid data.
    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl IoError {
    /// Creates an [`IoError::InvalidData`] error.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData(message.into())
    }

    /// Creates an [`IoError::UnexpectedEof`] error.
    pub fn eof(entity: &'static str, needed: usize, remaining: usize) -> Self {
        Self::UnexpectedEof {
            entity,
            needed,
            remaining,
        }
    }
}

/// Result type for codec operations.
pub type IoResult<T> = Result<T, IoError>;
