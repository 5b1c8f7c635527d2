//! # Neo Contract
//!
//! The NEF executable container for compiled Neo N3 contracts.
//!
//! ```text
//! magic | compiler (64) | source | 0 | tokens | 0u16 | script | checksum
//! ```
//!
//! The checksum is the first four bytes of a double SHA-256 over everything
//! before it. [`NefFile::from_bytes`] and [`NefFile::from_file`] report a
//! wrong checksum as [`ContractError::ChecksumMismatch`], separately from
//! malformed input.
//!
//! ## Example
//!
//! ```rust
//! use neo_contract::NefFile;
//! use neo_vm::OpCode;
//!
//! let nef = NefFile::new("my-compiler 1.0", "", vec![], vec![OpCode::RET as u8]).unwrap();
//! assert!(nef.verify_checksum());
//! ```

pub mod error;
pub mod nef;

pub use error::{ContractError, ContractResult};
pub use nef::{MethodToken, NefFile, MAX_NEF_SIZE, NEF_MAGIC};
