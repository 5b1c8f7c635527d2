//! # Neo Core
//!
//! Client-side transaction model and assembly for Neo N3.
//!
//! - [`tx`]: signers, witness rules, attributes, witnesses and the
//!   [`Transaction`] codec
//! - [`contract`]: standard single- and multi-signature verification scripts
//! - [`fee`]: the network fee those scripts cost
//! - [`nep17`]: token transfer scripts and the native token hashes
//! - [`builder`]: the staged assembler, talking to the chain through
//!   [`ChainQuery`] and to keys through [`SigningProvider`]
//!
//! ## Example
//!
//! ```rust
//! use neo_core::{Signer, Transaction, TransactionAttribute};
//! use neo_io::Serializable;
//! use neo_primitives::UInt160;
//!
//! let tx = Transaction {
//!     version: 0,
//!     nonce: 7,
//!     system_fee: 0,
//!     network_fee: 0,
//!     valid_until_block: 100,
//!     signers: vec![Signer::called_by_entry(UInt160::from([1u8; 20]))],
//!     attributes: vec![TransactionAttribute::HighPriority],
//!     script: vec![0x11, 0x40],
//!     witnesses: vec![neo_core::Witness::empty()],
//! };
//! let bytes = tx.to_array().unwrap();
//! assert_eq!(Transaction::from_bytes(&bytes).unwrap(), tx);
//! ```

pub mod builder;
pub mod contract;
pub mod error;
pub mod fee;
mod json;
pub mod nep17;
pub mod tx;

pub use builder::{
    ChainQuery, FeeResolvedTransaction, InsufficientFundsPolicy, InvocationReport, LocalSigner,
    SealedTransaction, SigningProvider, TransactionBuilder, VmState, WitnessAttachedTransaction,
};
pub use contract::VerificationScript;
pub use error::{CoreError, CoreResult, QueryError, Stage};
pub use tx::{
    Signer, Transaction, TransactionAttribute, TransactionAttributeType, Witness,
    WitnessCondition, WitnessRule, WitnessRuleAction, WitnessVerification,
};
