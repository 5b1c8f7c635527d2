//! The draft stage: collecting what the transaction should do and who signs.

use super::collaborators::{ChainQuery, VmState};
use super::states::FeeResolvedTransaction;
use super::InsufficientFundsPolicy;
use crate::contract::VerificationScript;
use crate::error::{CoreError, CoreResult, Stage};
use crate::fee;
use crate::tx::{Signer, Transaction, TransactionAttribute, TransactionAttributeType};
use neo_config::AssemblerSettings;
use neo_crypto::ECPoint;
use neo_primitives::UInt160;
use rand::rngs::OsRng;
use rand::RngCore;
use std::collections::HashMap;
use tracing::{debug, warn};

/// A transaction being assembled, before any chain interaction.
///
/// Setters check what they can on the spot. [`resolve_fees`](Self::resolve_fees)
/// re-validates the whole draft before it contacts the chain and leaves the
/// draft untouched, so a failed resolution can be retried.
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    settings: AssemblerSettings,
    script: Vec<u8>,
    signers: Vec<Signer>,
    contracts: HashMap<UInt160, VerificationScript>,
    attributes: Vec<TransactionAttribute>,
    nonce: Option<u32>,
    system_fee: Option<i64>,
    network_fee: Option<i64>,
    additional_system_fee: i64,
    additional_network_fee: i64,
    valid_until_block: Option<u32>,
    insufficient_funds: InsufficientFundsPolicy,
    allow_multi_party: bool,
}

impl TransactionBuilder {
    pub fn new(settings: AssemblerSettings) -> Self {
        Self {
            settings,
            script: Vec::new(),
            signers: Vec::new(),
            contracts: HashMap::new(),
            attributes: Vec::new(),
            nonce: None,
            system_fee: None,
            network_fee: None,
            additional_system_fee: 0,
            additional_network_fee: 0,
            valid_until_block: None,
            insufficient_funds: InsufficientFundsPolicy::Fail,
            allow_multi_party: false,
        }
    }

    pub fn settings(&self) -> &AssemblerSettings {
        &self.settings
    }

    pub fn signers(&self) -> &[Signer] {
        &self.signers
    }

    pub fn attributes(&self) -> &[TransactionAttribute] {
        &self.attributes
    }

    /// The entry script the transaction runs.
    pub fn script(&mut self, script: impl Into<Vec<u8>>) -> &mut Self {
        self.script = script.into();
        self
    }

    fn max_entries(&self) -> usize {
        self.settings.protocol.max_transaction_attributes
    }

    /// Adds a signer whose verification script is unknown. Its network fee
    /// must then be covered by an explicit [`network_fee`](Self::network_fee).
    pub fn add_signer(&mut self, signer: Signer) -> CoreResult<&mut Self> {
        signer
            .validate()
            .map_err(|reason| CoreError::invalid_signer(signer.account, reason))?;
        if self.signers.iter().any(|s| s.account == signer.account) {
            return Err(CoreError::DuplicateSigner(signer.account));
        }
        if self.signers.len() + self.attributes.len() + 1 > self.max_entries() {
            return Err(CoreError::invalid_construction(
                Stage::Draft,
                format!(
                    "signers and attributes together exceed {}",
                    self.max_entries()
                ),
            ));
        }
        self.signers.push(signer);
        Ok(self)
    }

    /// Adds a signer backed by a standard signature contract.
    pub fn add_signer_with_script(
        &mut self,
        signer: Signer,
        contract: VerificationScript,
    ) -> CoreResult<&mut Self> {
        if contract.script_hash() != signer.account {
            return Err(CoreError::invalid_signer(
                signer.account,
                "verification script does not hash to the account",
            ));
        }
        let account = signer.account;
        self.add_signer(signer)?;
        self.contracts.insert(account, contract);
        Ok(self)
    }

    /// Moves `account` to the front, making it the fee payer.
    pub fn set_sender(&mut self, account: &UInt160) -> CoreResult<&mut Self> {
        let index = self
            .signers
            .iter()
            .position(|s| s.account == *account)
            .ok_or_else(|| {
                CoreError::invalid_construction(
                    Stage::Draft,
                    format!("sender {account} is not a signer"),
                )
            })?;
        let signer = self.signers.remove(index);
        self.signers.insert(0, signer);
        Ok(self)
    }

    pub fn add_attribute(&mut self, attribute: TransactionAttribute) -> CoreResult<&mut Self> {
        attribute
            .validate()
            .map_err(|reason| CoreError::invalid_construction(Stage::Draft, reason))?;
        let kind = attribute.attribute_type();
        if !kind.allow_multiple() && self.attributes.iter().any(|a| a.attribute_type() == kind) {
            return Err(CoreError::invalid_construction(
                Stage::Draft,
                format!("{kind} attribute may appear only once"),
            ));
        }
        if self.signers.len() + self.attributes.len() + 1 > self.max_entries() {
            return Err(CoreError::invalid_construction(
                Stage::Draft,
                format!(
                    "signers and attributes together exceed {}",
                    self.max_entries()
                ),
            ));
        }
        self.attributes.push(attribute);
        Ok(self)
    }

    pub fn nonce(&mut self, nonce: u32) -> &mut Self {
        self.nonce = Some(nonce);
        self
    }

    /// Fixes the system fee and skips the dry run.
    pub fn system_fee(&mut self, datoshi: i64) -> &mut Self {
        self.system_fee = Some(datoshi);
        self
    }

    /// Fixes the network fee instead of estimating it.
    pub fn network_fee(&mut self, datoshi: i64) -> &mut Self {
        self.network_fee = Some(datoshi);
        self
    }

    pub fn additional_system_fee(&mut self, datoshi: i64) -> &mut Self {
        self.additional_system_fee = datoshi;
        self
    }

    pub fn additional_network_fee(&mut self, datoshi: i64) -> &mut Self {
        self.additional_network_fee = datoshi;
        self
    }

    pub fn valid_until_block(&mut self, height: u32) -> &mut Self {
        self.valid_until_block = Some(height);
        self
    }

    pub fn on_insufficient_funds(&mut self, policy: InsufficientFundsPolicy) -> &mut Self {
        self.insufficient_funds = policy;
        self
    }

    /// Lets signing leave witnesses for other parties to attach.
    pub fn allow_multi_party(&mut self, allow: bool) -> &mut Self {
        self.allow_multi_party = allow;
        self
    }

    /// Checks the draft without contacting the chain.
    pub fn validate(&self) -> CoreResult<()> {
        let fail = |reason: String| Err(CoreError::invalid_construction(Stage::Draft, reason));
        if let Err(e) = self.settings.validate() {
            return fail(e.to_string());
        }
        if self.signers.is_empty() {
            return fail("transaction needs at least one signer".into());
        }
        if self.script.is_empty() {
            return fail("transaction has no script".into());
        }
        if self.signers.len() + self.attributes.len() > self.max_entries() {
            return fail(format!(
                "signers and attributes together exceed {}",
                self.max_entries()
            ));
        }
        for signer in &self.signers {
            signer
                .validate()
                .map_err(|reason| CoreError::invalid_signer(signer.account, reason))?;
        }
        let fees = [
            ("system fee", self.system_fee.unwrap_or(0)),
            ("network fee", self.network_fee.unwrap_or(0)),
            ("additional system fee", self.additional_system_fee),
            ("additional network fee", self.additional_network_fee),
        ];
        if let Some((name, _)) = fees.iter().find(|(_, value)| *value < 0) {
            return fail(format!("{name} is negative"));
        }
        Ok(())
    }

    /// Resolves height, expiry, nonce and fees against the chain.
    pub async fn resolve_fees(&self, chain: &dyn ChainQuery) -> CoreResult<FeeResolvedTransaction> {
        self.validate()?;
        let stage = Stage::FeeResolution;
        debug!(signers = self.signers.len(), "resolving fees");

        let block_count = chain
            .block_count()
            .await
            .map_err(|e| CoreError::collaborator(stage, None, e))?;
        let height = block_count.saturating_sub(1);
        let valid_until_block = self.resolve_valid_until_block(height)?;
        let nonce = self.nonce.unwrap_or_else(|| OsRng.next_u32());

        if self
            .attributes
            .iter()
            .any(|a| a.attribute_type() == TransactionAttributeType::HighPriority)
        {
            self.check_committee_signer(chain).await?;
        }

        let system_fee = match self.system_fee {
            Some(fee) => fee,
            None => self.dry_run(chain).await?,
        }
        .checked_add(self.additional_system_fee)
        .ok_or_else(|| CoreError::invalid_construction(stage, "system fee overflows"))?;

        let mut tx = Transaction {
            version: 0,
            nonce,
            system_fee,
            network_fee: 0,
            valid_until_block,
            signers: self.signers.clone(),
            attributes: self.attributes.clone(),
            script: self.script.clone(),
            witnesses: Vec::new(),
        };
        let contracts: Vec<Option<VerificationScript>> = tx
            .signers
            .iter()
            .map(|s| self.contracts.get(&s.account).cloned())
            .collect();

        let known: Option<Vec<VerificationScript>> = contracts.iter().cloned().collect();
        let network_fee = match (self.network_fee, &known) {
            (Some(fee), _) => fee,
            (None, Some(known)) => fee::calculate_network_fee(&tx, known, &self.settings.policy),
            (None, None) => {
                let account = tx
                    .signers
                    .iter()
                    .zip(&contracts)
                    .find(|(_, contract)| contract.is_none())
                    .map(|(signer, _)| signer.account)
                    .unwrap_or_default();
                return Err(CoreError::UnknownVerificationScript(account));
            }
        };
        tx.network_fee = network_fee
            .checked_add(self.additional_network_fee)
            .ok_or_else(|| CoreError::invalid_construction(stage, "network fee overflows"))?;

        let size = match &known {
            Some(known) => fee::estimated_size(&tx, known),
            None => tx.unsigned_size(),
        };
        let max = self.settings.protocol.max_transaction_size;
        if size > max {
            return Err(CoreError::TooLarge { size, max });
        }

        let (tx, contracts) = self.choose_payer(chain, tx, contracts).await?;
        debug!(
            sender = ?tx.sender(),
            system_fee = tx.system_fee,
            network_fee = tx.network_fee,
            valid_until_block = tx.valid_until_block,
            "fees resolved"
        );
        Ok(FeeResolvedTransaction::new(
            tx,
            contracts,
            self.settings.protocol.network,
            self.settings.protocol.max_transaction_size,
            self.allow_multi_party,
        ))
    }

    fn resolve_valid_until_block(&self, height: u32) -> CoreResult<u32> {
        let max = height.saturating_add(self.settings.protocol.max_valid_until_block_increment);
        match self.valid_until_block {
            None => Ok(max),
            Some(value) if value > height && value <= max => Ok(value),
            Some(value) => Err(CoreError::InvalidValidUntilBlock { value, height, max }),
        }
    }

    async fn check_committee_signer(&self, chain: &dyn ChainQuery) -> CoreResult<()> {
        let committee = chain
            .committee()
            .await
            .map_err(|e| CoreError::collaborator(Stage::FeeResolution, None, e))?;
        let Some(address) = committee_address(committee) else {
            return Err(CoreError::HighPriorityNotAllowed);
        };
        if self.signers.iter().any(|s| s.account == address) {
            Ok(())
        } else {
            Err(CoreError::HighPriorityNotAllowed)
        }
    }

    async fn dry_run(&self, chain: &dyn ChainQuery) -> CoreResult<i64> {
        let report = chain
            .invoke_script(&self.script, &self.signers)
            .await
            .map_err(|e| CoreError::collaborator(Stage::FeeResolution, None, e))?;
        match report.state {
            VmState::Halt => Ok(report.gas_consumed),
            VmState::Fault => Err(CoreError::DryRunFault {
                gas_consumed: report.gas_consumed,
                exception: report.exception,
            }),
        }
    }

    /// Checks the sender can pay, switching payer when the policy allows it.
    async fn choose_payer(
        &self,
        chain: &dyn ChainQuery,
        mut tx: Transaction,
        mut contracts: Vec<Option<VerificationScript>>,
    ) -> CoreResult<(Transaction, Vec<Option<VerificationScript>>)> {
        let required = tx.system_fee.checked_add(tx.network_fee).ok_or_else(|| {
            CoreError::invalid_construction(Stage::FeeResolution, "total fee overflows")
        })?;
        let sender = tx.signers[0].account;
        let available = self.balance_of(chain, &sender).await?;
        if available >= required {
            return Ok((tx, contracts));
        }
        if self.insufficient_funds == InsufficientFundsPolicy::TryOtherSigners {
            for index in 1..tx.signers.len() {
                let candidate = tx.signers[index].account;
                if self.balance_of(chain, &candidate).await? >= required {
                    warn!(%sender, payer = %candidate, required, "sender cannot pay, using another signer");
                    let signer = tx.signers.remove(index);
                    tx.signers.insert(0, signer);
                    let contract = contracts.remove(index);
                    contracts.insert(0, contract);
                    return Ok((tx, contracts));
                }
            }
        }
        Err(CoreError::InsufficientFunds {
            account: sender,
            required,
            available,
        })
    }

    async fn balance_of(&self, chain: &dyn ChainQuery, account: &UInt160) -> CoreResult<i64> {
        chain
            .gas_balance(account)
            .await
            .map_err(|e| CoreError::collaborator(Stage::FeeResolution, Some(*account), e))
    }
}

/// Account of the committee's majority multi-signature contract.
fn committee_address(committee: Vec<ECPoint>) -> Option<UInt160> {
    let n = committee.len();
    if n == 0 {
        return None;
    }
    let m = n - (n - 1) / 2;
    VerificationScript::multi_sig(m, committee)
        .ok()
        .map(|contract| contract.script_hash())
}
