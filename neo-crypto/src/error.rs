//! Errors for key handling and signatures.

use neo_io::IoError;
use thiserror::Error;

/// Errors returned by key parsing and signing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("invalid private key: {reason}")]
    InvalidPrivateKey { reason: String },

    #[error("invalid public key: {reason}")]
    InvalidPublicKey { reason: String },

    #[error("invalid signature encoding")]
    InvalidSignature,

    #[error(transparent)]
    Io(#[from] IoError),
}

impl CryptoError {
    pub fn invalid_public_key(reason: impl Into<String>) -> Self {
        Self::InvalidPublicKey {
            reason: reason.into(),
        }
    }

    pub fn invalid_private_key(reason: impl Into<String>) -> Self {
        Self::InvalidPrivateKey {
            reason: reason.into(),
        }
    }
}

/// Result type for cryptographic operations.
pub type CryptoResult<T> = Result<T, CryptoError>;
