//! Errors for script building and parsing.

use crate::op_code::OpCode;
use neo_io::IoError;
use thiserror::Error;

/// Errors raised while emitting or decoding VM scripts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VmError {
    /// A byte that is not a defined opcode.
    #[error("invalid opcode 0x{0:02x}")]
    InvalidOpCode(u8),

    /// The opcode at the cursor is not of the family the caller asked for.
    #[error("expected {expected} at offset {position}, found {found}")]
    UnexpectedOpCode {
        expected: &'static str,
        found: OpCode,
        position: usize,
    },

    /// An operand runs past the end of the script.
    #[error("{opcode} at offset {position} needs {needed} operand bytes, {remaining} remaining")]
    TruncatedOperand {
        opcode: OpCode,
        position: usize,
        needed: usize,
        remaining: usize,
    },

    /// An integer does not fit the widest push opcode.
    #[error("integer needs {bytes} bytes, PUSHINT256 holds 32")]
    IntegerTooLarge { bytes: usize },

    /// A syscall name that cannot be hashed.
    #[error("invalid syscall '{name}': {reason}")]
    InvalidSyscall { name: String, reason: String },

    /// A contract parameter that has no script encoding.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Io(#[from] IoError),
}

impl VmError {
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }
}

/// Result type for VM script operations.
pub type VmResult<T> = Result<T, VmError>;
