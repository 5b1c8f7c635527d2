//! End-to-end assembly against an in-memory chain.

use async_trait::async_trait;
use neo_config::AssemblerSettings;
use neo_core::builder::InsufficientFundsPolicy;
use neo_core::nep17;
use neo_core::{
    ChainQuery, CoreError, InvocationReport, LocalSigner, QueryError, Signer, Stage, Transaction,
    TransactionBuilder, VerificationScript, Witness, WitnessVerification,
};
use neo_crypto::{ECPoint, KeyPair};
use neo_primitives::{UInt160, WitnessScope, WitnessScopes};
use std::collections::HashMap;

struct MemoryChain {
    block_count: u32,
    gas_consumed: i64,
    balances: HashMap<UInt160, i64>,
    committee: Vec<ECPoint>,
}

impl MemoryChain {
    fn new() -> Self {
        Self {
            block_count: 1_000,
            gas_consumed: 997_775,
            balances: HashMap::new(),
            committee: Vec::new(),
        }
    }

    fn fund(mut self, account: UInt160, datoshi: i64) -> Self {
        self.balances.insert(account, datoshi);
        self
    }
}

#[async_trait]
impl ChainQuery for MemoryChain {
    async fn block_count(&self) -> Result<u32, QueryError> {
        Ok(self.block_count)
    }

    async fn invoke_script(
        &self,
        _script: &[u8],
        _signers: &[Signer],
    ) -> Result<InvocationReport, QueryError> {
        Ok(InvocationReport::halted(self.gas_consumed))
    }

    async fn gas_balance(&self, account: &UInt160) -> Result<i64, QueryError> {
        Ok(self.balances.get(account).copied().unwrap_or(0))
    }

    async fn committee(&self) -> Result<Vec<ECPoint>, QueryError> {
        Ok(self.committee.clone())
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn key(seed: u8) -> KeyPair {
    KeyPair::from_private_key(&[seed; 32]).unwrap()
}

fn single(pair: &KeyPair) -> VerificationScript {
    VerificationScript::single_sig(pair.public_key().clone())
}

fn transfer_builder(from: UInt160) -> TransactionBuilder {
    let script =
        nep17::transfer_script(&nep17::gas_token(), &from, &UInt160::from([9u8; 20]), 100, None)
            .unwrap();
    let mut builder = TransactionBuilder::new(AssemblerSettings::testnet());
    builder.script(script).nonce(42);
    builder
}

#[tokio::test]
async fn test_single_signer_round_trip() {
    init_tracing();
    let pair = key(1);
    let contract = single(&pair);
    let account = contract.script_hash();
    let chain = MemoryChain::new().fund(account, 10_0000_0000);
    let wallet = LocalSigner::new().with_key(pair);

    let mut builder = transfer_builder(account);
    builder
        .add_signer_with_script(Signer::called_by_entry(account), contract.clone())
        .unwrap();

    let resolved = builder.resolve_fees(&chain).await.unwrap();
    let tx = resolved.transaction();
    assert_eq!(tx.nonce, 42);
    assert_eq!(tx.system_fee, 997_775);
    assert_eq!(tx.valid_until_block, 999 + 5_760);
    let network_fee = tx.network_fee;

    let sealed = resolved.sign(&wallet).unwrap().seal().unwrap();
    assert_eq!(sealed.transaction().network_fee, network_fee);
    assert_eq!(sealed.verify().unwrap(), WitnessVerification::Valid);

    let decoded = Transaction::from_bytes(sealed.as_bytes()).unwrap();
    assert_eq!(decoded.hash().unwrap(), sealed.hash());
    assert_eq!(&decoded, sealed.transaction());
    assert!(!sealed.to_base64().is_empty());

    let expected_fee = neo_core::fee::calculate_network_fee(
        &decoded,
        &[contract],
        &AssemblerSettings::testnet().policy,
    );
    assert_eq!(network_fee, expected_fee);
}

#[tokio::test]
async fn test_multi_sig_signer() {
    init_tracing();
    let pairs = [key(1), key(2), key(3)];
    let contract = VerificationScript::multi_sig(
        2,
        pairs.iter().map(|p| p.public_key().clone()).collect(),
    )
    .unwrap();
    let account = contract.script_hash();
    let chain = MemoryChain::new().fund(account, 10_0000_0000);
    let [first, _, third] = pairs;
    let wallet = LocalSigner::new().with_key(first).with_key(third);

    let mut builder = transfer_builder(account);
    builder
        .add_signer_with_script(Signer::called_by_entry(account), contract)
        .unwrap();
    let sealed = builder
        .resolve_fees(&chain)
        .await
        .unwrap()
        .sign(&wallet)
        .unwrap()
        .seal()
        .unwrap();
    assert_eq!(sealed.transaction().witnesses[0].invocation_script.len(), 132);
    assert!(sealed.verify().unwrap().is_valid());
}

#[tokio::test]
async fn test_missing_key_names_signer() {
    let pair = key(1);
    let contract = single(&pair);
    let account = contract.script_hash();
    let chain = MemoryChain::new().fund(account, 10_0000_0000);

    let mut builder = transfer_builder(account);
    builder
        .add_signer_with_script(Signer::called_by_entry(account), contract)
        .unwrap();
    let resolved = builder.resolve_fees(&chain).await.unwrap();
    let err = resolved.sign(&LocalSigner::new()).unwrap_err();
    assert_eq!(err, CoreError::MissingSigningMaterial(account));
}

#[tokio::test]
async fn test_multi_party_assembly() {
    init_tracing();
    let payer = key(1);
    let cosigner = key(2);
    let payer_contract = single(&payer);
    let cosigner_contract = single(&cosigner);
    let payer_account = payer_contract.script_hash();
    let cosigner_account = cosigner_contract.script_hash();
    let chain = MemoryChain::new().fund(payer_account, 10_0000_0000);

    let mut builder = transfer_builder(payer_account);
    builder
        .add_signer_with_script(Signer::called_by_entry(payer_account), payer_contract)
        .unwrap()
        .add_signer_with_script(Signer::none(cosigner_account), cosigner_contract.clone())
        .unwrap()
        .allow_multi_party(true);

    let resolved = builder.resolve_fees(&chain).await.unwrap();
    let mut attached = resolved
        .sign(&LocalSigner::new().with_key(payer))
        .unwrap();
    assert_eq!(attached.missing_witnesses(), vec![cosigner_account]);

    let wrong = Witness::new(vec![], single(&key(3)).to_script());
    assert!(matches!(
        attached.add_witness(&cosigner_account, wrong),
        Err(CoreError::WitnessMismatch { .. })
    ));

    let data = attached.sign_data().unwrap();
    let mut invocation = neo_vm::ScriptBuilder::new();
    invocation.emit_push(&cosigner.sign(&data).unwrap());
    attached
        .add_witness(
            &cosigner_account,
            Witness::new(invocation.into_bytes(), cosigner_contract.to_script()),
        )
        .unwrap();
    assert!(attached.missing_witnesses().is_empty());

    let sealed = attached.seal().unwrap();
    assert_eq!(sealed.verify().unwrap(), WitnessVerification::Valid);
}

#[tokio::test]
async fn test_seal_requires_every_witness() {
    let payer = key(1);
    let contract = single(&payer);
    let account = contract.script_hash();
    let chain = MemoryChain::new().fund(account, 10_0000_0000);

    let mut builder = transfer_builder(account);
    builder
        .add_signer_with_script(Signer::called_by_entry(account), contract)
        .unwrap()
        .allow_multi_party(true);
    let attached = builder
        .resolve_fees(&chain)
        .await
        .unwrap()
        .sign(&LocalSigner::new())
        .unwrap();
    assert_eq!(
        attached.seal().unwrap_err(),
        CoreError::MissingWitnesses(vec![account])
    );
}

#[tokio::test]
async fn test_insufficient_funds_policies() {
    init_tracing();
    let poor = key(1);
    let rich = key(2);
    let poor_contract = single(&poor);
    let rich_contract = single(&rich);
    let poor_account = poor_contract.script_hash();
    let rich_account = rich_contract.script_hash();
    let chain = MemoryChain::new()
        .fund(poor_account, 1)
        .fund(rich_account, 10_0000_0000);

    let mut builder = transfer_builder(poor_account);
    builder
        .add_signer_with_script(Signer::called_by_entry(poor_account), poor_contract)
        .unwrap()
        .add_signer_with_script(Signer::called_by_entry(rich_account), rich_contract)
        .unwrap();

    match builder.resolve_fees(&chain).await.unwrap_err() {
        CoreError::InsufficientFunds {
            account, available, ..
        } => {
            assert_eq!(account, poor_account);
            assert_eq!(available, 1);
        }
        other => panic!("unexpected error: {other}"),
    }

    builder.on_insufficient_funds(InsufficientFundsPolicy::TryOtherSigners);
    let resolved = builder.resolve_fees(&chain).await.unwrap();
    assert_eq!(resolved.transaction().sender(), Some(rich_account));
}

#[tokio::test]
async fn test_tampered_signature_is_reported() {
    let pair = key(1);
    let contract = single(&pair);
    let account = contract.script_hash();
    let chain = MemoryChain::new().fund(account, 10_0000_0000);

    let mut builder = transfer_builder(account);
    builder
        .add_signer_with_script(Signer::called_by_entry(account), contract)
        .unwrap();
    let sealed = builder
        .resolve_fees(&chain)
        .await
        .unwrap()
        .sign(&LocalSigner::new().with_key(pair))
        .unwrap()
        .seal()
        .unwrap();

    let mut tx = sealed.into_transaction();
    tx.witnesses[0].invocation_script[10] ^= 0x01;
    assert_eq!(
        tx.verify_witness_signatures(AssemblerSettings::testnet().protocol.network)
            .unwrap(),
        WitnessVerification::InvalidSignature { account }
    );
    assert_eq!(
        tx.verify_witness_signatures(0).unwrap(),
        WitnessVerification::InvalidSignature { account }
    );
}

#[test]
fn test_custom_contracts_without_list_is_rejected() {
    let account = UInt160::from([3u8; 20]);
    let scopes = WitnessScopes::from_scopes(&[WitnessScope::CustomContracts]).unwrap();
    let mut builder = TransactionBuilder::new(AssemblerSettings::testnet());
    assert!(matches!(
        builder.add_signer(Signer::new(account, scopes)),
        Err(CoreError::InvalidSigner { .. })
    ));
}

#[tokio::test]
async fn test_zero_signers_never_reach_the_chain() {
    struct UnreachableChain;

    #[async_trait]
    impl ChainQuery for UnreachableChain {
        async fn block_count(&self) -> Result<u32, QueryError> {
            panic!("chain queried for a draft without signers")
        }
        async fn invoke_script(
            &self,
            _: &[u8],
            _: &[Signer],
        ) -> Result<InvocationReport, QueryError> {
            panic!("chain queried for a draft without signers")
        }
        async fn gas_balance(&self, _: &UInt160) -> Result<i64, QueryError> {
            panic!("chain queried for a draft without signers")
        }
        async fn committee(&self) -> Result<Vec<ECPoint>, QueryError> {
            panic!("chain queried for a draft without signers")
        }
    }

    let builder = transfer_builder(UInt160::zero());
    match builder.resolve_fees(&UnreachableChain).await {
        Err(CoreError::InvalidConstruction { stage, .. }) => assert_eq!(stage, Stage::Draft),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_seal_uses_configured_size_limit() {
    let verification = vec![0x11; 1_000];
    let account = UInt160::from_script(&verification);
    let chain = MemoryChain::new().fund(account, 10_0000_0000);

    let mut settings = AssemblerSettings::testnet();
    settings.protocol.max_transaction_size = 600;
    let mut builder = TransactionBuilder::new(settings);
    builder
        .script(vec![0x11, 0x40])
        .add_signer(Signer::called_by_entry(account))
        .unwrap()
        .network_fee(1_0000_0000)
        .allow_multi_party(true);

    let mut attached = builder
        .resolve_fees(&chain)
        .await
        .unwrap()
        .sign(&LocalSigner::new())
        .unwrap();
    attached
        .add_witness(&account, Witness::new(vec![], verification))
        .unwrap();
    match attached.seal().unwrap_err() {
        CoreError::TooLarge { size, max } => {
            assert_eq!(max, 600);
            assert!(size > 1_000);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_settings_past_protocol_limits_are_rejected() {
    let mut settings = AssemblerSettings::testnet();
    settings.protocol.max_transaction_attributes = 20;
    let mut builder = TransactionBuilder::new(settings);
    builder.script(vec![0x11, 0x40]);

    let mut funded = MemoryChain::new();
    for seed in 1..=17u8 {
        let contract = single(&key(seed));
        let account = contract.script_hash();
        builder
            .add_signer_with_script(Signer::called_by_entry(account), contract)
            .unwrap();
        funded = funded.fund(account, 10_0000_0000);
    }

    let err = builder.resolve_fees(&funded).await.unwrap_err();
    assert!(matches!(
        err,
        CoreError::InvalidConstruction {
            stage: Stage::Draft,
            ..
        }
    ));
}
