//! Standard signature contracts: the verification scripts of plain accounts.

use crate::error::{CoreError, CoreResult, Stage};
use neo_crypto::ECPoint;
use neo_io::{MemoryReader, EC_POINT_COMPRESSED_SIZE};
use neo_primitives::UInt160;
use neo_vm::{script_reader, Instruction, OpCode, ScriptBuilder};
use num_traits::ToPrimitive;

/// `System.Crypto.CheckSig`.
pub const CHECK_SIG_SYSCALL: u32 = 0x27b3_e756;
/// `System.Crypto.CheckMultisig`.
pub const CHECK_MULTISIG_SYSCALL: u32 = 0x3adc_d09e;
/// Most keys a multi-signature contract may list.
pub const MAX_MULTISIG_KEYS: usize = 1024;

/// Bytes of one pushed signature in an invocation script: PUSHDATA1, 64, sig.
pub const SIGNATURE_PUSH_SIZE: usize = 2 + 64;

const SINGLE_SIG_SCRIPT_SIZE: usize = 2 + EC_POINT_COMPRESSED_SIZE + 5;

/// A recognised verification script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationScript {
    SingleSig(ECPoint),
    /// `m` signatures over `keys`, which are kept sorted.
    MultiSig { m: usize, keys: Vec<ECPoint> },
}

impl VerificationScript {
    pub fn single_sig(key: ECPoint) -> Self {
        Self::SingleSig(key)
    }

    /// An `m`-of-`keys.len()` contract; the keys are sorted here.
    pub fn multi_sig(m: usize, mut keys: Vec<ECPoint>) -> CoreResult<Self> {
        let n = keys.len();
        if m == 0 || m > n || n > MAX_MULTISIG_KEYS {
            return Err(CoreError::invalid_construction(
                Stage::Draft,
                format!("multi-signature needs 1 <= m <= n <= {MAX_MULTISIG_KEYS}, got {m} of {n}"),
            ));
        }
        keys.sort();
        Ok(Self::MultiSig { m, keys })
    }

    /// Signatures the invocation script must push.
    pub fn signatures_required(&self) -> usize {
        match self {
            Self::SingleSig(_) => 1,
            Self::MultiSig { m, .. } => *m,
        }
    }

    pub fn keys(&self) -> &[ECPoint] {
        match self {
            Self::SingleSig(key) => std::slice::from_ref(key),
            Self::MultiSig { keys, .. } => keys,
        }
    }

    pub fn to_script(&self) -> Vec<u8> {
        let mut builder = ScriptBuilder::new();
        match self {
            Self::SingleSig(key) => {
                builder
                    .emit_push(&key.encode_compressed())
                    .emit_syscall_hash(CHECK_SIG_SYSCALL);
            }
            Self::MultiSig { m, keys } => {
                builder.emit_push_int(*m as i64);
                for key in keys {
                    builder.emit_push(&key.encode_compressed());
                }
                builder
                    .emit_push_int(keys.len() as i64)
                    .emit_syscall_hash(CHECK_MULTISIG_SYSCALL);
            }
        }
        builder.into_bytes()
    }

    pub fn script_hash(&self) -> UInt160 {
        UInt160::from_script(&self.to_script())
    }

    pub fn address(&self) -> String {
        self.script_hash().to_address()
    }

    /// Size of the invocation script a complete witness carries.
    pub fn invocation_size(&self) -> usize {
        SIGNATURE_PUSH_SIZE * self.signatures_required()
    }

    /// Recognises a standard single- or multi-signature script.
    pub fn parse(script: &[u8]) -> Option<Self> {
        Self::parse_single(script).or_else(|| Self::parse_multi(script))
    }

    fn parse_single(script: &[u8]) -> Option<Self> {
        if script.len() != SINGLE_SIG_SCRIPT_SIZE
            || script[0] != OpCode::PUSHDATA1 as u8
            || script[1] != EC_POINT_COMPRESSED_SIZE as u8
            || script[35] != OpCode::SYSCALL as u8
        {
            return None;
        }
        let hash = u32::from_le_bytes([script[36], script[37], script[38], script[39]]);
        if hash != CHECK_SIG_SYSCALL {
            return None;
        }
        ECPoint::from_bytes(&script[2..35]).ok().map(Self::SingleSig)
    }

    fn parse_multi(script: &[u8]) -> Option<Self> {
        let mut reader = MemoryReader::new(script);
        let m = script_reader::read_push_integer(&mut reader).ok()?.to_usize()?;
        let mut keys = Vec::new();
        while reader.peek().ok()? == OpCode::PUSHDATA1 as u8 {
            let key = script_reader::read_push_data(&mut reader).ok()?;
            if key.len() != EC_POINT_COMPRESSED_SIZE || keys.len() == MAX_MULTISIG_KEYS {
                return None;
            }
            keys.push(ECPoint::from_bytes(key).ok()?);
        }
        let n = script_reader::read_push_integer(&mut reader).ok()?.to_usize()?;
        if n != keys.len() || m == 0 || m > n {
            return None;
        }
        let syscall = Instruction::read(&mut reader).ok()?;
        if syscall.opcode != OpCode::SYSCALL
            || syscall.operand != CHECK_MULTISIG_SYSCALL.to_le_bytes()
            || !reader.is_at_end()
        {
            return None;
        }
        // Only the canonical, sorted form produces the same script hash.
        if keys.windows(2).any(|pair| pair[0] > pair[1]) {
            return None;
        }
        Some(Self::MultiSig { m, keys })
    }
}
