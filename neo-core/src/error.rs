//! Error types for the Neo Core crate
//!
//! Construction problems, collaborator failures and codec errors all surface
//! as [`CoreError`]. Signature checks on a finished transaction are not
//! errors; they return a [`WitnessVerification`](crate::tx::WitnessVerification).

use neo_crypto::CryptoError;
use neo_io::IoError;
use neo_primitives::{InvalidWitnessScopeError, PrimitiveError, UInt160};
use neo_vm::VmError;
use std::fmt;
use thiserror::Error;

/// Stage of transaction assembly an error was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Draft,
    FeeResolution,
    Signing,
    WitnessAttachment,
    Sealing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Draft => "draft",
            Stage::FeeResolution => "fee resolution",
            Stage::Signing => "signing",
            Stage::WitnessAttachment => "witness attachment",
            Stage::Sealing => "sealing",
        })
    }
}

/// Failure reported by a chain or signing collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct QueryError {
    pub message: String,
}

impl QueryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

fn signer_suffix(signer: &Option<UInt160>) -> String {
    signer
        .map(|account| format!(" (signer {account})"))
        .unwrap_or_default()
}

/// Core module errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The draft or a value in it cannot form a valid transaction.
    #[error("Invalid construction at {stage}: {reason}")]
    InvalidConstruction { stage: Stage, reason: String },

    /// A signer breaks one of its own rules.
    #[error("Invalid signer {account}: {reason}")]
    InvalidSigner { account: UInt160, reason: String },

    /// The same account was added twice.
    #[error("Duplicate signer {0}")]
    DuplicateSigner(UInt160),

    #[error("Valid-until-block {value} outside ({height}, {max}]")]
    InvalidValidUntilBlock { value: u32, height: u32, max: u32 },

    /// The script faulted during the fee dry run.
    #[error("Dry run faulted after {gas_consumed} datoshi: {}", .exception.as_deref().unwrap_or("no exception message"))]
    DryRunFault {
        gas_consumed: i64,
        exception: Option<String>,
    },

    #[error("Account {account} holds {available} datoshi, {required} required")]
    InsufficientFunds {
        account: UInt160,
        required: i64,
        available: i64,
    },

    #[error("HighPriority attribute requires a committee signer")]
    HighPriorityNotAllowed,

    /// No verification script is known, so the network fee cannot be estimated.
    #[error("No verification script for signer {0}; set the network fee explicitly")]
    UnknownVerificationScript(UInt160),

    /// The signing provider could not produce a witness for the signer.
    #[error("No signing material for signer {0}")]
    MissingSigningMaterial(UInt160),

    #[error("Witness for {account} rejected: {reason}")]
    WitnessMismatch { account: UInt160, reason: String },

    #[error("Missing witnesses for {} signer(s)", .0.len())]
    MissingWitnesses(Vec<UInt160>),

    #[error("Transaction of {size} bytes exceeds the {max} byte limit")]
    TooLarge { size: usize, max: usize },

    /// A collaborator call failed; the stage and signer say where.
    #[error("Collaborator failed during {stage}{}: {source}", signer_suffix(.signer))]
    Collaborator {
        stage: Stage,
        signer: Option<UInt160>,
        #[source]
        source: QueryError,
    },

    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    Vm(#[from] VmError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Primitive(#[from] PrimitiveError),

    #[error(transparent)]
    Scope(#[from] InvalidWitnessScopeError),
}

impl CoreError {
    pub fn invalid_construction(stage: Stage, reason: impl Into<String>) -> Self {
        Self::InvalidConstruction {
            stage,
            reason: reason.into(),
        }
    }

    pub fn invalid_signer(account: UInt160, reason: impl Into<String>) -> Self {
        Self::InvalidSigner {
            account,
            reason: reason.into(),
        }
    }

    pub fn collaborator(stage: Stage, signer: Option<UInt160>, source: QueryError) -> Self {
        Self::Collaborator {
            stage,
            signer,
            source,
        }
    }
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
