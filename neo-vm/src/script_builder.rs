//! Emits VM bytecode, always choosing the smallest encoding for a constant.

use crate::call_flags::CallFlags;
use crate::contract_parameter::ContractParameter;
use crate::error::{VmError, VmResult};
use crate::op_code::OpCode;
use neo_io::Serializable;
use neo_primitives::UInt160;
use num_bigint::{BigInt, Sign};
use num_traits::ToPrimitive;
use sha2::{Digest, Sha256};

/// Syscall used by [`ScriptBuilder::emit_dynamic_call`].
pub const CONTRACT_CALL_SYSCALL: &str = "System.Contract.Call";

/// Longest syscall name the interop registry accepts.
const MAX_SYSCALL_NAME: usize = 252;

/// Widths of the PUSHINT family, narrowest first.
const PUSHINT_WIDTHS: [(usize, OpCode); 6] = [
    (1, OpCode::PUSHINT8),
    (2, OpCode::PUSHINT16),
    (4, OpCode::PUSHINT32),
    (8, OpCode::PUSHINT64),
    (16, OpCode::PUSHINT128),
    (32, OpCode::PUSHINT256),
];

/// Helps construct VM scripts programmatically.
#[derive(Debug, Clone, Default)]
pub struct ScriptBuilder {
    script: Vec<u8>,
}

impl ScriptBuilder {
    #[inline]
    pub fn new() -> Self {
        Self { script: Vec::new() }
    }

    /// Emits a single raw byte.
    #[inline]
    pub fn emit(&mut self, byte: u8) -> &mut Self {
        self.script.push(byte);
        self
    }

    #[inline]
    pub fn emit_opcode(&mut self, op: OpCode) -> &mut Self {
        self.script.push(op as u8);
        self
    }

    /// Emits an opcode followed by its operand bytes, unchecked.
    #[inline]
    pub fn emit_instruction(&mut self, op: OpCode, operand: &[u8]) -> &mut Self {
        self.emit_opcode(op);
        self.script.extend_from_slice(operand);
        self
    }

    /// Appends pre-built bytecode as is.
    #[inline]
    pub fn emit_raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.script.extend_from_slice(bytes);
        self
    }

    /// Pushes a byte string with the narrowest of PUSHDATA1/2/4.
    pub fn emit_push(&mut self, data: &[u8]) -> &mut Self {
        let len = data.len();
        if len <= u8::MAX as usize {
            self.emit_instruction(OpCode::PUSHDATA1, &[len as u8]);
        } else if len <= u16::MAX as usize {
            self.emit_instruction(OpCode::PUSHDATA2, &(len as u16).to_le_bytes());
        } else {
            self.emit_instruction(OpCode::PUSHDATA4, &(len as u32).to_le_bytes());
        }
        self.emit_raw(data)
    }

    #[inline]
    pub fn emit_push_string(&mut self, value: &str) -> &mut Self {
        self.emit_push(value.as_bytes())
    }

    #[inline]
    pub fn emit_push_bool(&mut self, value: bool) -> &mut Self {
        self.emit_opcode(if value { OpCode::PUSHT } else { OpCode::PUSHF })
    }

    #[inline]
    pub fn emit_push_null(&mut self) -> &mut Self {
        self.emit_opcode(OpCode::PUSHNULL)
    }

    /// Pushes an integer. `-1..=16` take a single opcode, anything else the
    /// narrowest PUSHINT that holds it.
    pub fn emit_push_int(&mut self, value: i64) -> &mut Self {
        if let Some(op) = OpCode::for_small_int(value) {
            return self.emit_opcode(op);
        }
        let bytes = BigInt::from(value).to_signed_bytes_le();
        // An i64 needs at most eight bytes, which PUSHINT64 always holds.
        let (width, op) = narrowest_pushint(bytes.len()).unwrap_or((8, OpCode::PUSHINT64));
        let padded = pad_signed(&bytes, width, value < 0);
        self.emit_instruction(op, &padded)
    }

    /// Pushes an arbitrary-precision integer; values wider than 32 bytes fail.
    pub fn emit_push_bigint(&mut self, value: &BigInt) -> VmResult<&mut Self> {
        if let Some(small) = value.to_i64() {
            return Ok(self.emit_push_int(small));
        }
        let bytes = value.to_signed_bytes_le();
        let (width, op) = narrowest_pushint(bytes.len())
            .ok_or(VmError::IntegerTooLarge { bytes: bytes.len() })?;
        let padded = pad_signed(&bytes, width, value.sign() == Sign::Minus);
        Ok(self.emit_instruction(op, &padded))
    }

    /// Pushes a typed parameter. Arrays are packed in reverse push order and
    /// maps are packed as value/key pairs.
    pub fn emit_push_parameter(&mut self, parameter: &ContractParameter) -> VmResult<&mut Self> {
        match parameter {
            ContractParameter::Any => {
                self.emit_push_null();
            }
            ContractParameter::Boolean(value) => {
                self.emit_push_bool(*value);
            }
            ContractParameter::Integer(value) => {
                self.emit_push_bigint(value)?;
            }
            ContractParameter::ByteArray(bytes) | ContractParameter::Signature(bytes) => {
                self.emit_push(bytes);
            }
            ContractParameter::String(value) => {
                self.emit_push_string(value);
            }
            ContractParameter::Hash160(hash) => {
                self.emit_push(hash.as_bytes());
            }
            ContractParameter::Hash256(hash) => {
                self.emit_push(hash.as_bytes());
            }
            ContractParameter::PublicKey(point) => {
                self.emit_push(&point.encode_compressed());
            }
            ContractParameter::Array(items) => {
                self.emit_push_array(items)?;
            }
            ContractParameter::Map(entries) => {
                if entries.is_empty() {
                    self.emit_opcode(OpCode::NEWMAP);
                } else {
                    for (key, value) in entries.iter().rev() {
                        if matches!(
                            key,
                            ContractParameter::Array(_)
                                | ContractParameter::Map(_)
                                | ContractParameter::Any
                        ) {
                            return Err(VmError::invalid_parameter(format!(
                                "{} cannot be a map key",
                                key.param_type()
                            )));
                        }
                        self.emit_push_parameter(value)?;
                        self.emit_push_parameter(key)?;
                    }
                    self.emit_push_int(entries.len() as i64);
                    self.emit_opcode(OpCode::PACKMAP);
                }
            }
        }
        Ok(self)
    }

    /// Pushes `items` as one array, or NEWARRAY0 when empty.
    pub fn emit_push_array(&mut self, items: &[ContractParameter]) -> VmResult<&mut Self> {
        if items.is_empty() {
            return Ok(self.emit_opcode(OpCode::NEWARRAY0));
        }
        for item in items.iter().rev() {
            self.emit_push_parameter(item)?;
        }
        self.emit_push_int(items.len() as i64);
        Ok(self.emit_opcode(OpCode::PACK))
    }

    /// Emits `SYSCALL` for the named interop service.
    pub fn emit_syscall(&mut self, api: &str) -> VmResult<&mut Self> {
        let hash = Self::hash_syscall(api)?;
        Ok(self.emit_syscall_hash(hash))
    }

    pub fn emit_syscall_hash(&mut self, hash: u32) -> &mut Self {
        self.emit_instruction(OpCode::SYSCALL, &hash.to_le_bytes())
    }

    /// First four bytes of SHA-256 over the ASCII name, read little-endian.
    pub fn hash_syscall(api: &str) -> VmResult<u32> {
        if api.is_empty() || !api.is_ascii() || api.len() > MAX_SYSCALL_NAME {
            return Err(VmError::InvalidSyscall {
                name: api.to_owned(),
                reason: format!("name must be 1..={MAX_SYSCALL_NAME} ASCII bytes"),
            });
        }
        let digest = Sha256::digest(api.as_bytes());
        Ok(u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]]))
    }

    /// Calls `method` on the contract `hash` through `System.Contract.Call`.
    pub fn emit_dynamic_call(
        &mut self,
        hash: &UInt160,
        method: &str,
        flags: CallFlags,
        args: &[ContractParameter],
    ) -> VmResult<&mut Self> {
        self.emit_push_array(args)?;
        self.emit_push_int(i64::from(flags.bits()));
        self.emit_push_string(method);
        self.emit_push(hash.as_bytes());
        self.emit_syscall(CONTRACT_CALL_SYSCALL)
    }

    /// Emits a jump, switching to the `_L` form when the offset needs it.
    pub fn emit_jump(&mut self, op: OpCode, offset: i32) -> VmResult<&mut Self> {
        let byte = op as u8;
        if byte < OpCode::JMP as u8 || byte > OpCode::JMPLE_L as u8 {
            return Err(VmError::invalid_parameter(format!("{op} is not a jump")));
        }
        let short = byte % 2 == 0;
        match i8::try_from(offset) {
            Ok(small) if short => Ok(self.emit_instruction(op, &[small as u8])),
            _ => {
                let long = if short { OpCode::try_from(byte + 1)? } else { op };
                Ok(self.emit_instruction(long, &offset.to_le_bytes()))
            }
        }
    }

    pub fn emit_call(&mut self, offset: i32) -> &mut Self {
        match i8::try_from(offset) {
            Ok(small) => self.emit_instruction(OpCode::CALL, &[small as u8]),
            Err(_) => self.emit_instruction(OpCode::CALL_L, &offset.to_le_bytes()),
        }
    }

    /// Pushes the wire encoding of `value`.
    pub fn emit_push_serializable<T: Serializable>(&mut self, value: &T) -> VmResult<&mut Self> {
        let bytes = value.to_array()?;
        Ok(self.emit_push(&bytes))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.script.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.script.is_empty()
    }

    #[inline]
    pub fn to_array(&self) -> Vec<u8> {
        self.script.clone()
    }

    #[inline]
    pub fn into_bytes(self) -> Vec<u8> {
        self.script
    }
}

fn narrowest_pushint(len: usize) -> Option<(usize, OpCode)> {
    PUSHINT_WIDTHS
        .iter()
        .copied()
        .find(|(width, _)| len.max(1) <= *width)
}

fn pad_signed(bytes: &[u8], target_len: usize, negative: bool) -> Vec<u8> {
    let mut padded = Vec::with_capacity(target_len);
    padded.extend_from_slice(bytes);
    padded.resize(target_len, if negative { 0xFF } else { 0x00 });
    padded
}
