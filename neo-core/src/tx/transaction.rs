//! The N3 transaction and its canonical encoding.

use super::{Signer, TransactionAttribute, Witness};
use crate::contract::VerificationScript;
use neo_crypto::{verify_signature, Crypto};
use neo_io::{
    get_var_size_bytes, get_var_size_serializable_slice, BinaryWriter, IoError, IoResult,
    MemoryReader, Serializable,
};
use neo_primitives::{UInt160, UInt256};
use neo_vm::script_reader;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Largest encoded transaction the network relays.
pub const MAX_TRANSACTION_SIZE: usize = neo_config::PROTOCOL_MAX_TRANSACTION_SIZE;

/// Most signers and attributes a transaction may carry together.
pub const MAX_TRANSACTION_ATTRIBUTES: usize = neo_config::PROTOCOL_MAX_TRANSACTION_ATTRIBUTES;

/// Version, nonce, system fee, network fee and valid-until-block.
pub const HEADER_SIZE: usize = 1 + 4 + 8 + 8 + 4;

/// Longest entry script a transaction may carry.
pub const MAX_SCRIPT_SIZE: usize = u16::MAX as usize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub struct Transaction {
    pub version: u8,
    pub nonce: u32,
    #[serde(rename = "sysfee")]
    pub system_fee: i64,
    #[serde(rename = "netfee")]
    pub network_fee: i64,
    #[serde(rename = "validuntilblock")]
    pub valid_until_block: u32,
    pub signers: Vec<Signer>,
    pub attributes: Vec<TransactionAttribute>,
    #[serde(with = "crate::json::base64_bytes")]
    pub script: Vec<u8>,
    pub witnesses: Vec<Witness>,
}

/// Result of checking the witnesses of a finished transaction.
///
/// A failed check is a value, not an error: the caller decides whether it is
/// fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WitnessVerification {
    Valid,
    CountMismatch { signers: usize, witnesses: usize },
    ScriptHashMismatch { account: UInt160 },
    /// The verification script is not a standard signature contract.
    UnsupportedScript { account: UInt160 },
    InvalidSignature { account: UInt160 },
}

impl WitnessVerification {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

impl Transaction {
    /// The fee payer: the first signer.
    pub fn sender(&self) -> Option<UInt160> {
        self.signers.first().map(|signer| signer.account)
    }

    /// SHA-256 of the unsigned encoding.
    pub fn hash(&self) -> IoResult<UInt256> {
        Ok(UInt256::from(Crypto::sha256(&self.serialize_unsigned()?)))
    }

    /// The bytes every witness signs: network magic (LE) then the hash.
    pub fn sign_data(&self, network: u32) -> IoResult<Vec<u8>> {
        let hash = self.hash()?;
        let mut data = Vec::with_capacity(4 + UInt256::LENGTH);
        data.extend_from_slice(&network.to_le_bytes());
        data.extend_from_slice(hash.as_bytes());
        Ok(data)
    }

    /// The encoding without witnesses.
    pub fn serialize_unsigned(&self) -> IoResult<Vec<u8>> {
        let mut writer = BinaryWriter::with_capacity(self.unsigned_size());
        self.write_unsigned(&mut writer)?;
        Ok(writer.into_bytes())
    }

    pub fn unsigned_size(&self) -> usize {
        HEADER_SIZE
            + get_var_size_serializable_slice(&self.signers)
            + get_var_size_serializable_slice(&self.attributes)
            + get_var_size_bytes(&self.script)
    }

    fn write_unsigned(&self, writer: &mut BinaryWriter) -> IoResult<()> {
        writer.write_u8(self.version);
        writer.write_u32(self.nonce);
        writer.write_i64(self.system_fee);
        writer.write_i64(self.network_fee);
        writer.write_u32(self.valid_until_block);
        writer.write_serializable_array(&self.signers)?;
        writer.write_serializable_array(&self.attributes)?;
        writer.write_var_bytes(&self.script);
        Ok(())
    }

    /// Decodes a complete transaction, rejecting oversized input first.
    pub fn from_bytes(data: &[u8]) -> IoResult<Self> {
        if data.len() > MAX_TRANSACTION_SIZE {
            return Err(IoError::invalid_data(format!(
                "transaction of {} bytes exceeds {MAX_TRANSACTION_SIZE}",
                data.len()
            )));
        }
        Self::from_array(data)
    }

    /// Checks every witness against its signer with the standard contracts.
    pub fn verify_witness_signatures(&self, network: u32) -> IoResult<WitnessVerification> {
        if self.signers.len() != self.witnesses.len() {
            return Ok(WitnessVerification::CountMismatch {
                signers: self.signers.len(),
                witnesses: self.witnesses.len(),
            });
        }
        let sign_data = self.sign_data(network)?;
        for (signer, witness) in self.signers.iter().zip(&self.witnesses) {
            let account = signer.account;
            if witness.script_hash() != account {
                return Ok(WitnessVerification::ScriptHashMismatch { account });
            }
            let Some(contract) = VerificationScript::parse(&witness.verification_script) else {
                return Ok(WitnessVerification::UnsupportedScript { account });
            };
            if !check_signatures(&contract, &witness.invocation_script, &sign_data) {
                return Ok(WitnessVerification::InvalidSignature { account });
            }
        }
        Ok(WitnessVerification::Valid)
    }

    fn read_unsigned(reader: &mut MemoryReader) -> IoResult<Self> {
        let version = reader.read_u8()?;
        if version > 0 {
            return Err(IoError::invalid_data(format!(
                "unsupported transaction version {version}"
            )));
        }
        let nonce = reader.read_u32()?;
        let system_fee = reader.read_i64()?;
        if system_fee < 0 {
            return Err(IoError::invalid_data("negative system fee"));
        }
        let network_fee = reader.read_i64()?;
        if network_fee < 0 {
            return Err(IoError::invalid_data("negative network fee"));
        }
        if system_fee.checked_add(network_fee).is_none() {
            return Err(IoError::invalid_data("total fee overflows"));
        }
        let valid_until_block = reader.read_u32()?;
        let signers = read_signers(reader)?;
        let attributes = read_attributes(reader, MAX_TRANSACTION_ATTRIBUTES - signers.len())?;
        let script = reader.read_var_bytes(MAX_SCRIPT_SIZE)?.to_vec();
        if script.is_empty() {
            return Err(IoError::invalid_data("empty transaction script"));
        }
        Ok(Self {
            version,
            nonce,
            system_fee,
            network_fee,
            valid_until_block,
            signers,
            attributes,
            script,
            witnesses: Vec::new(),
        })
    }
}

fn read_signers(reader: &mut MemoryReader) -> IoResult<Vec<Signer>> {
    let count = reader.read_var_int(MAX_TRANSACTION_ATTRIBUTES as u64)? as usize;
    if count == 0 {
        return Err(IoError::invalid_data("transaction has no signers"));
    }
    let mut seen = HashSet::with_capacity(count);
    let mut signers = Vec::with_capacity(count);
    for _ in 0..count {
        let signer: Signer = reader.read_serializable()?;
        if !seen.insert(signer.account) {
            return Err(IoError::invalid_data(format!(
                "duplicate signer {}",
                signer.account
            )));
        }
        signers.push(signer);
    }
    Ok(signers)
}

fn read_attributes(reader: &mut MemoryReader, max: usize) -> IoResult<Vec<TransactionAttribute>> {
    let count = reader.read_var_int(max as u64)? as usize;
    let mut seen = HashSet::new();
    let mut attributes = Vec::with_capacity(count);
    for _ in 0..count {
        let attribute: TransactionAttribute = reader.read_serializable()?;
        if !attribute.allow_multiple() && !seen.insert(attribute.attribute_type()) {
            return Err(IoError::invalid_data(format!(
                "duplicate {} attribute",
                attribute.attribute_type()
            )));
        }
        attributes.push(attribute);
    }
    Ok(attributes)
}

/// Pops pushed signatures off `invocation` and matches them to the keys in
/// order, the way `CheckMultisig` does.
fn check_signatures(contract: &VerificationScript, invocation: &[u8], data: &[u8]) -> bool {
    let mut reader = MemoryReader::new(invocation);
    let mut signatures = Vec::new();
    while !reader.is_at_end() {
        match script_reader::read_push_data(&mut reader) {
            Ok(signature) => signatures.push(signature),
            Err(_) => return false,
        }
    }
    if signatures.len() != contract.signatures_required() {
        return false;
    }
    let keys = contract.keys();
    let mut key_index = 0;
    for signature in signatures {
        loop {
            let Some(key) = keys.get(key_index) else {
                return false;
            };
            key_index += 1;
            if verify_signature(data, signature, key).unwrap_or(false) {
                break;
            }
        }
    }
    true
}

impl Serializable for Transaction {
    fn size(&self) -> usize {
        self.unsigned_size() + get_var_size_serializable_slice(&self.witnesses)
    }

    fn serialize(&self, writer: &mut BinaryWriter) -> IoResult<()> {
        self.write_unsigned(writer)?;
        writer.write_serializable_array(&self.witnesses)
    }

    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self> {
        let mut transaction = Self::read_unsigned(reader)?;
        transaction.witnesses = reader.read_serializable_array(transaction.signers.len())?;
        if transaction.witnesses.len() != transaction.signers.len() {
            return Err(IoError::invalid_data(format!(
                "{} witnesses for {} signers",
                transaction.witnesses.len(),
                transaction.signers.len()
            )));
        }
        Ok(transaction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Transaction {
        Transaction {
            version: 0,
            nonce: 0x0102_0304,
            system_fee: 100,
            network_fee: 200,
            valid_until_block: 1000,
            signers: vec![Signer::called_by_entry(UInt160::from([0x11u8; 20]))],
            attributes: vec![TransactionAttribute::HighPriority],
            script: vec![0x11, 0x40],
            witnesses: vec![Witness::new(vec![0x01], vec![0x02])],
        }
    }

    #[test]
    fn test_encoding_layout() {
        let tx = sample();
        let bytes = tx.to_array().unwrap();
        assert_eq!(bytes[0], 0);
        assert_eq!(&bytes[1..5], &[0x04, 0x03, 0x02, 0x01]);
        assert_eq!(bytes[HEADER_SIZE], 1);
        assert_eq!(bytes.len(), tx.size());
        assert_eq!(Transaction::from_bytes(&bytes).unwrap(), tx);
    }

    #[test]
    fn test_hash_ignores_witnesses() {
        let tx = sample();
        let mut unsigned = tx.clone();
        unsigned.witnesses.clear();
        assert_eq!(tx.hash().unwrap(), unsigned.hash().unwrap());
        assert_eq!(
            tx.hash().unwrap(),
            UInt256::from(Crypto::sha256(&tx.serialize_unsigned().unwrap()))
        );
    }

    #[test]
    fn test_sign_data_prefix() {
        let data = sample().sign_data(860_833_102).unwrap();
        assert_eq!(&data[..4], &860_833_102u32.to_le_bytes());
        assert_eq!(data.len(), 36);
    }

    #[test]
    fn test_decode_rejects_bad_shapes() {
        let mut no_signers = sample();
        no_signers.signers.clear();
        no_signers.witnesses.clear();
        assert!(Transaction::from_bytes(&no_signers.to_array().unwrap()).is_err());

        let mut duplicated = sample();
        duplicated.signers.push(duplicated.signers[0].clone());
        duplicated.witnesses.push(Witness::empty());
        assert!(Transaction::from_bytes(&duplicated.to_array().unwrap()).is_err());

        let mut twice = sample();
        twice.attributes.push(TransactionAttribute::HighPriority);
        assert!(Transaction::from_bytes(&twice.to_array().unwrap()).is_err());

        let mut empty_script = sample();
        empty_script.script.clear();
        assert!(Transaction::from_bytes(&empty_script.to_array().unwrap()).is_err());

        let mut negative = sample();
        negative.system_fee = -1;
        assert!(Transaction::from_bytes(&negative.to_array().unwrap()).is_err());

        let mut unwitnessed = sample();
        unwitnessed.witnesses.clear();
        assert!(Transaction::from_bytes(&unwitnessed.to_array().unwrap()).is_err());
    }

    #[test]
    fn test_conflicts_may_repeat() {
        let mut tx = sample();
        tx.attributes = vec![
            TransactionAttribute::Conflicts { hash: UInt256::zero() },
            TransactionAttribute::Conflicts {
                hash: UInt256::from([1u8; 32]),
            },
        ];
        assert!(Transaction::from_bytes(&tx.to_array().unwrap()).is_ok());
    }

    #[test]
    fn test_oversized_input_rejected() {
        assert!(Transaction::from_bytes(&vec![0u8; MAX_TRANSACTION_SIZE + 1]).is_err());
    }

    #[test]
    fn test_unsupported_witness_is_reported() {
        let mut tx = sample();
        tx.signers[0].account = UInt160::from_script(&[0x02]);
        assert_eq!(
            tx.verify_witness_signatures(0).unwrap(),
            WitnessVerification::UnsupportedScript {
                account: tx.signers[0].account
            }
        );
        tx.witnesses.clear();
        assert!(matches!(
            tx.verify_witness_signatures(0).unwrap(),
            WitnessVerification::CountMismatch { .. }
        ));
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["sysfee"], 100);
        assert_eq!(json["validuntilblock"], 1000);
        assert_eq!(json["script"], "EUA=");
    }
}
