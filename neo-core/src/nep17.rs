//! NEP-17 token calls and the native token hashes.

use neo_primitives::UInt160;
use neo_vm::{CallFlags, ContractParameter, OpCode, ScriptBuilder, VmResult};
use num_bigint::BigInt;

// Little-endian script hashes of the native contracts.
const GAS_TOKEN_HASH: [u8; 20] = [
    0xcf, 0x76, 0xe2, 0x8b, 0xd0, 0x06, 0x2c, 0x4a, 0x47, 0x8e, 0xe3, 0x55, 0x61, 0x01, 0x13, 0x19,
    0xf3, 0xcf, 0xa4, 0xd2,
];
const NEO_TOKEN_HASH: [u8; 20] = [
    0xf5, 0x63, 0xea, 0x40, 0xbc, 0x28, 0x3d, 0x4d, 0x0e, 0x05, 0xc4, 0x8e, 0xa3, 0x05, 0xb3, 0xf2,
    0xa0, 0x73, 0x40, 0xef,
];

/// `0xd2a4cff31913016155e38e474a2c06d08be276cf`
pub fn gas_token() -> UInt160 {
    UInt160::from(GAS_TOKEN_HASH)
}

/// `0xef4073a0f2b305a38ec4050e4d3d28bc40ea63f5`
pub fn neo_token() -> UInt160 {
    UInt160::from(NEO_TOKEN_HASH)
}

/// Script calling `transfer(from, to, amount, data)` on `token` and
/// asserting that it returned true.
pub fn transfer_script(
    token: &UInt160,
    from: &UInt160,
    to: &UInt160,
    amount: impl Into<BigInt>,
    data: Option<ContractParameter>,
) -> VmResult<Vec<u8>> {
    let args = [
        ContractParameter::from(*from),
        ContractParameter::from(*to),
        ContractParameter::integer(amount),
        data.unwrap_or(ContractParameter::Any),
    ];
    let mut builder = ScriptBuilder::new();
    builder
        .emit_dynamic_call(token, "transfer", CallFlags::ALL, &args)?
        .emit_opcode(OpCode::ASSERT);
    Ok(builder.into_bytes())
}

/// Script returning `balanceOf(account)` of `token`.
pub fn balance_of_script(token: &UInt160, account: &UInt160) -> VmResult<Vec<u8>> {
    let mut builder = ScriptBuilder::new();
    builder.emit_dynamic_call(
        token,
        "balanceOf",
        CallFlags::READ_ONLY,
        &[ContractParameter::from(*account)],
    )?;
    Ok(builder.into_bytes())
}
