//! Network fee estimation for standard signature contracts.
//!
//! Fees are in datoshi (1e-8 GAS).

use crate::contract::VerificationScript;
use crate::tx::Transaction;
use neo_config::PolicySettings;
use neo_io::{get_var_size_bytes, get_var_size_usize};
use neo_vm::{OpCode, ScriptBuilder};

/// Price of `System.Crypto.CheckSig`, charged once per checked key.
pub const CHECK_SIG_PRICE: i64 = 1 << 15;

fn price(op: OpCode) -> i64 {
    op.price() as i64
}

/// Price of the opcode `emit_push_int(value)` starts with.
fn push_int_price(value: i64) -> i64 {
    let mut builder = ScriptBuilder::new();
    builder.emit_push_int(value);
    builder
        .to_array()
        .first()
        .and_then(|byte| OpCode::try_from(*byte).ok())
        .map_or(0, price)
}

/// Execution cost of a single-signature verification, before the fee factor.
pub fn signature_contract_cost() -> i64 {
    price(OpCode::PUSHDATA1) * 2 + price(OpCode::SYSCALL) + CHECK_SIG_PRICE
}

/// Execution cost of an `m`-of-`n` verification, before the fee factor.
pub fn multi_signature_contract_cost(m: usize, n: usize) -> i64 {
    price(OpCode::PUSHDATA1) * (m + n) as i64
        + push_int_price(m as i64)
        + push_int_price(n as i64)
        + price(OpCode::SYSCALL)
        + CHECK_SIG_PRICE * n as i64
}

pub fn verification_cost(contract: &VerificationScript) -> i64 {
    match contract {
        VerificationScript::SingleSig(_) => signature_contract_cost(),
        VerificationScript::MultiSig { m, keys } => multi_signature_contract_cost(*m, keys.len()),
    }
}

/// Bytes one complete witness for `contract` adds to the transaction.
pub fn witness_size(contract: &VerificationScript) -> usize {
    let invocation = contract.invocation_size();
    get_var_size_usize(invocation) + invocation + get_var_size_bytes(&contract.to_script())
}

/// Network fee of `tx` once it carries one witness per entry of `contracts`.
///
/// `contracts` lists the verification scripts of the signers in signer
/// order. Any witnesses already on `tx` are ignored.
pub fn calculate_network_fee(
    tx: &Transaction,
    contracts: &[VerificationScript],
    policy: &PolicySettings,
) -> i64 {
    let size = estimated_size(tx, contracts);
    let execution: i64 = contracts.iter().map(verification_cost).sum();
    execution * i64::from(policy.exec_fee_factor) + size as i64 * policy.fee_per_byte
}

/// Encoded size of `tx` with a complete witness for every contract.
pub fn estimated_size(tx: &Transaction, contracts: &[VerificationScript]) -> usize {
    tx.unsigned_size()
        + get_var_size_usize(contracts.len())
        + contracts.iter().map(witness_size).sum::<usize>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tx::{Signer, Witness};
    use neo_crypto::KeyPair;
    use neo_io::Serializable;

    fn key(seed: u8) -> KeyPair {
        KeyPair::from_private_key(&[seed; 32]).unwrap()
    }

    #[test]
    fn test_contract_costs() {
        assert_eq!(signature_contract_cost(), 8 * 2 + 32768);
        // PUSH2 and PUSH3 cost 1 each.
        assert_eq!(multi_signature_contract_cost(2, 3), 8 * 5 + 1 + 1 + 32768 * 3);
    }

    #[test]
    fn test_single_sig_fee() {
        let pair = key(1);
        let contract = VerificationScript::single_sig(pair.public_key().clone());
        let tx = Transaction {
            version: 0,
            nonce: 1,
            system_fee: 0,
            network_fee: 0,
            valid_until_block: 10,
            signers: vec![Signer::called_by_entry(contract.script_hash())],
            attributes: vec![],
            script: vec![0x11, 0x40],
            witnesses: vec![],
        };
        let policy = PolicySettings::default();
        let fee = calculate_network_fee(&tx, std::slice::from_ref(&contract), &policy);

        let mut signed = tx.clone();
        signed.witnesses = vec![Witness::new(vec![0u8; 66], contract.to_script())];
        let expected = signature_contract_cost() * i64::from(policy.exec_fee_factor)
            + signed.size() as i64 * policy.fee_per_byte;
        assert_eq!(fee, expected);
        assert_eq!(estimated_size(&tx, &[contract]), signed.size());
    }
}
