//! The stages after fee resolution. Each consumes the previous one, so a
//! witness cannot be attached before fees are fixed and a sealed
//! transaction cannot change.

use super::collaborators::SigningProvider;
use crate::contract::VerificationScript;
use crate::error::{CoreError, CoreResult, Stage};
use crate::tx::{Transaction, Witness, WitnessVerification};
use base64::{engine::general_purpose, Engine as _};
use neo_io::Serializable;
use neo_primitives::{UInt160, UInt256};
use neo_vm::ScriptBuilder;
use tracing::{debug, info};

/// Fees, nonce and expiry are fixed; the signed bytes will not change.
#[derive(Debug, Clone)]
pub struct FeeResolvedTransaction {
    tx: Transaction,
    contracts: Vec<Option<VerificationScript>>,
    network: u32,
    max_size: usize,
    allow_multi_party: bool,
}

impl FeeResolvedTransaction {
    pub(super) fn new(
        tx: Transaction,
        contracts: Vec<Option<VerificationScript>>,
        network: u32,
        max_size: usize,
        allow_multi_party: bool,
    ) -> Self {
        Self {
            tx,
            contracts,
            network,
            max_size,
            allow_multi_party,
        }
    }

    pub fn transaction(&self) -> &Transaction {
        &self.tx
    }

    pub fn hash(&self) -> CoreResult<UInt256> {
        Ok(self.tx.hash()?)
    }

    /// The bytes each witness signs.
    pub fn sign_data(&self) -> CoreResult<Vec<u8>> {
        Ok(self.tx.sign_data(self.network)?)
    }

    /// Produces a witness for every signer `provider` holds keys for.
    ///
    /// Without multi-party assembly every signer must be covered.
    pub fn sign(self, provider: &dyn SigningProvider) -> CoreResult<WitnessAttachedTransaction> {
        let data = self.sign_data()?;
        let mut witnesses = Vec::with_capacity(self.tx.signers.len());
        for (signer, contract) in self.tx.signers.iter().zip(&self.contracts) {
            let account = signer.account;
            let witness = match contract {
                Some(contract) => sign_contract(provider, &account, contract, &data)?,
                None => None,
            };
            match witness {
                Some(witness) => {
                    debug!(%account, "witness created");
                    witnesses.push(Some(witness));
                }
                None if self.allow_multi_party => witnesses.push(None),
                None => return Err(CoreError::MissingSigningMaterial(account)),
            }
        }
        Ok(WitnessAttachedTransaction {
            tx: self.tx,
            witnesses,
            network: self.network,
            max_size: self.max_size,
        })
    }
}

/// Collects the signatures `contract` needs, or `None` if some are missing.
fn sign_contract(
    provider: &dyn SigningProvider,
    account: &UInt160,
    contract: &VerificationScript,
    data: &[u8],
) -> CoreResult<Option<Witness>> {
    let required = contract.signatures_required();
    let mut invocation = ScriptBuilder::new();
    let mut collected = 0;
    for key in contract.keys() {
        if collected == required {
            break;
        }
        let key_account = VerificationScript::single_sig(key.clone()).script_hash();
        let signature = provider
            .sign(&key_account, data)
            .map_err(|e| CoreError::collaborator(Stage::Signing, Some(*account), e))?;
        if let Some(signature) = signature {
            invocation.emit_push(&signature);
            collected += 1;
        }
    }
    if collected < required {
        return Ok(None);
    }
    Ok(Some(Witness::new(
        invocation.into_bytes(),
        contract.to_script(),
    )))
}

/// Signed as far as local keys allow; other parties may add witnesses.
#[derive(Debug, Clone)]
pub struct WitnessAttachedTransaction {
    tx: Transaction,
    witnesses: Vec<Option<Witness>>,
    network: u32,
    max_size: usize,
}

impl WitnessAttachedTransaction {
    pub fn transaction(&self) -> &Transaction {
        &self.tx
    }

    pub fn sign_data(&self) -> CoreResult<Vec<u8>> {
        Ok(self.tx.sign_data(self.network)?)
    }

    /// Signers still lacking a witness, in signer order.
    pub fn missing_witnesses(&self) -> Vec<UInt160> {
        self.tx
            .signers
            .iter()
            .zip(&self.witnesses)
            .filter(|(_, witness)| witness.is_none())
            .map(|(signer, _)| signer.account)
            .collect()
    }

    pub fn witness(&self, account: &UInt160) -> Option<&Witness> {
        let index = self.tx.signers.iter().position(|s| s.account == *account)?;
        self.witnesses[index].as_ref()
    }

    /// Attaches a witness produced elsewhere, replacing any existing one.
    ///
    /// An empty verification script stands for a deployed contract account
    /// and is accepted as is.
    pub fn add_witness(&mut self, account: &UInt160, witness: Witness) -> CoreResult<&mut Self> {
        let index = self
            .tx
            .signers
            .iter()
            .position(|s| s.account == *account)
            .ok_or_else(|| CoreError::WitnessMismatch {
                account: *account,
                reason: "account is not a signer".into(),
            })?;
        if !witness.verification_script.is_empty() && witness.script_hash() != *account {
            return Err(CoreError::WitnessMismatch {
                account: *account,
                reason: "verification script does not hash to the account".into(),
            });
        }
        debug!(%account, "witness attached");
        self.witnesses[index] = Some(witness);
        Ok(self)
    }

    /// Finalizes the transaction once every signer has a witness.
    pub fn seal(self) -> CoreResult<SealedTransaction> {
        let missing = self.missing_witnesses();
        if !missing.is_empty() {
            return Err(CoreError::MissingWitnesses(missing));
        }
        let mut tx = self.tx;
        tx.witnesses = self.witnesses.into_iter().flatten().collect();
        let bytes = tx.to_array()?;
        if bytes.len() > self.max_size {
            return Err(CoreError::TooLarge {
                size: bytes.len(),
                max: self.max_size,
            });
        }
        let hash = tx.hash()?;
        info!(%hash, size = bytes.len(), "transaction sealed");
        Ok(SealedTransaction {
            tx,
            hash,
            bytes,
            network: self.network,
        })
    }
}

/// A complete, immutable transaction ready to relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedTransaction {
    tx: Transaction,
    hash: UInt256,
    bytes: Vec<u8>,
    network: u32,
}

impl SealedTransaction {
    pub fn hash(&self) -> UInt256 {
        self.hash
    }

    pub fn transaction(&self) -> &Transaction {
        &self.tx
    }

    pub fn into_transaction(self) -> Transaction {
        self.tx
    }

    pub fn network(&self) -> u32 {
        self.network
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn to_array(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Base64 of the encoding, as `sendrawtransaction` expects it.
    pub fn to_base64(&self) -> String {
        general_purpose::STANDARD.encode(&self.bytes)
    }

    /// Checks the attached signatures against the sealing network.
    pub fn verify(&self) -> CoreResult<WitnessVerification> {
        Ok(self.tx.verify_witness_signatures(self.network)?)
    }
}
