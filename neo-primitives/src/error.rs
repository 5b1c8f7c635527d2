//! Errors for primitive type conversions.

use neo_io::IoError;
use thiserror::Error;

/// Errors raised when parsing or converting primitive values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PrimitiveError {
    /// Text or bytes did not have the expected shape.
    #[error("invalid format: {message}")]
    InvalidFormat { message: String },

    /// A Base58Check address could not be decoded.
    #[error("invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    /// Wire decoding failed.
    #[error(transparent)]
    Io(#[from] IoError),
}

impl PrimitiveError {
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    pub fn invalid_address(address: &str, reason: impl Into<String>) -> Self {
        Self::InvalidAddress {
            address: address.to_owned(),
            reason: reason.into(),
        }
    }
}

/// Result type for primitive operations.
pub type PrimitiveResult<T> = Result<T, PrimitiveError>;
