//! # neo-client-core: Neo N3 client building blocks
//!
//! The pieces a wallet, SDK or deployment tool needs to talk Neo N3 without
//! running a node:
//! - Binary codec for the N3 wire format
//! - Witness scopes, hashes and addresses
//! - NeoVM script building and reading
//! - NEF contract containers
//! - Transaction assembly from draft to sealed bytes
//!
//! ## Quick Start
//!
//! ```rust
//! use neo_client_core::prelude::*;
//!
//! let mut builder = ScriptBuilder::new();
//! builder.emit_push_int(5).emit_opcode(OpCode::RET);
//! let nef = NefFile::new("test-compiler-1.0", "", vec![], builder.into_bytes()).unwrap();
//! assert!(nef.has_valid_magic());
//! assert!(nef.verify_checksum());
//! ```
//!
//! ## Architecture
//!
//! - [`neo_io`] - `MemoryReader`, `BinaryWriter` and `Serializable`
//! - [`neo_primitives`] - `UInt160`, `UInt256` and witness scopes
//! - [`neo_crypto`] - hashing, `ECPoint` and `KeyPair`
//! - [`neo_vm`] - opcodes, `ScriptBuilder` and the script reader
//! - [`neo_contract`] - `NefFile` and `MethodToken`
//! - [`neo_config`] - protocol and policy settings
//! - [`neo_core`] - transactions and the staged assembler

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

// Re-export all public APIs from the member crates
pub use neo_config as config;
pub use neo_contract as contract;
pub use neo_core as core;
pub use neo_crypto as crypto;
pub use neo_io as io;
pub use neo_primitives as primitives;
pub use neo_vm as vm;

/// Common imports for building scripts, contracts and transactions
pub mod prelude {
    pub use crate::config::{AssemblerSettings, PolicySettings, ProtocolSettings};
    pub use crate::contract::{MethodToken, NefFile};
    pub use crate::core::builder::InsufficientFundsPolicy;
    pub use crate::core::{
        ChainQuery, CoreError, InvocationReport, LocalSigner, QueryError, SealedTransaction,
        Signer, SigningProvider, Transaction, TransactionAttribute, TransactionBuilder,
        VerificationScript, VmState, Witness, WitnessRule, WitnessVerification,
    };
    pub use crate::crypto::{ECPoint, KeyPair};
    pub use crate::io::{BinaryWriter, MemoryReader, Serializable};
    pub use crate::primitives::{UInt160, UInt256, WitnessScope, WitnessScopes};
    pub use crate::vm::{CallFlags, ContractParameter, OpCode, Script, ScriptBuilder};
}
