//! Error types for contract containers.

use neo_io::IoError;
use neo_vm::VmError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building, parsing or loading a NEF container.
#[derive(Error, Debug)]
pub enum ContractError {
    /// A field violates the container's format rules.
    #[error("Invalid NEF {field}: {reason}")]
    InvalidNef {
        /// Field that failed validation.
        field: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// The stored checksum does not match the content.
    #[error("NEF checksum mismatch: stored 0x{stored:08x}, computed 0x{computed:08x}")]
    ChecksumMismatch { stored: u32, computed: u32 },

    /// The serialized record exceeds the maximum container size.
    #[error("NEF record of {size} bytes exceeds the {max} byte limit")]
    RecordTooLarge { size: usize, max: usize },

    /// The script does not decode into well-formed instructions.
    #[error("Invalid NEF script: {0}")]
    Script(#[from] VmError),

    #[error(transparent)]
    Io(#[from] IoError),

    #[error("Failed to read {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid NEF JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ContractError {
    pub fn invalid_nef(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidNef {
            field,
            reason: reason.into(),
        }
    }
}

/// Result type for contract container operations.
pub type ContractResult<T> = Result<T, ContractError>;
