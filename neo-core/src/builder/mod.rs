//! Transaction assembly as a chain of typed stages:
//!
//! ```text
//! TransactionBuilder --resolve_fees--> FeeResolvedTransaction
//!     --sign--> WitnessAttachedTransaction --seal--> SealedTransaction
//! ```
//!
//! Every transition validates before it moves on, and a failure leaves the
//! previous stage as the last valid state.

pub mod collaborators;
mod draft;
pub mod local_signer;
mod states;

pub use collaborators::{ChainQuery, InvocationReport, SigningProvider, VmState};
pub use draft::TransactionBuilder;
pub use local_signer::LocalSigner;
pub use states::{FeeResolvedTransaction, SealedTransaction, WitnessAttachedTransaction};

/// What fee resolution does when the sender cannot cover the fees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InsufficientFundsPolicy {
    /// Fail with [`CoreError::InsufficientFunds`](crate::CoreError::InsufficientFunds).
    #[default]
    Fail,
    /// Make the first other signer that can pay the sender.
    TryOtherSigners,
}
