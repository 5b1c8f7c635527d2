//! The outside services transaction assembly relies on.
//!
//! Implementations own their transport, timeouts and retries; the assembler
//! awaits each call once and reports failures with the stage they hit.

use crate::error::QueryError;
use crate::tx::Signer;
use async_trait::async_trait;
use neo_crypto::{ECPoint, SIGNATURE_SIZE};
use neo_primitives::UInt160;
use serde::{Deserialize, Serialize};

/// Final state of a script run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VmState {
    Halt,
    Fault,
}

/// What a dry run of the entry script reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationReport {
    pub state: VmState,
    /// Datoshi consumed by the run.
    #[serde(rename = "gasconsumed")]
    pub gas_consumed: i64,
    #[serde(default)]
    pub exception: Option<String>,
}

impl InvocationReport {
    pub fn halted(gas_consumed: i64) -> Self {
        Self {
            state: VmState::Halt,
            gas_consumed,
            exception: None,
        }
    }

    pub fn faulted(gas_consumed: i64, exception: impl Into<String>) -> Self {
        Self {
            state: VmState::Fault,
            gas_consumed,
            exception: Some(exception.into()),
        }
    }
}

/// Read access to chain state.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChainQuery: Send + Sync {
    /// Number of blocks, so the current height is one less.
    async fn block_count(&self) -> Result<u32, QueryError>;

    /// Runs `script` without persisting anything, as if witnessed by `signers`.
    async fn invoke_script(
        &self,
        script: &[u8],
        signers: &[Signer],
    ) -> Result<InvocationReport, QueryError>;

    /// GAS balance of `account` in datoshi.
    async fn gas_balance(&self, account: &UInt160) -> Result<i64, QueryError>;

    /// Public keys of the current committee.
    async fn committee(&self) -> Result<Vec<ECPoint>, QueryError>;
}

/// Produces signatures for accounts whose keys it holds.
///
/// Multi-signature accounts are signed key by key: the assembler asks for
/// each member under that key's single-signature account hash.
#[cfg_attr(test, mockall::automock)]
pub trait SigningProvider: Send + Sync {
    /// Signs `data` for `account`, or returns `None` if no key is held.
    fn sign(
        &self,
        account: &UInt160,
        data: &[u8],
    ) -> Result<Option<[u8; SIGNATURE_SIZE]>, QueryError>;
}
