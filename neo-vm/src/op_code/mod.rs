//! The Neo N3 instruction set.
//!
//! Every defined opcode carries its operand layout and base execution price.
//! Prices are in execution units; the fee actually charged is the price
//! multiplied by the network's exec fee factor.

mod operand_size;

pub use operand_size::OperandSize;

use crate::error::VmError;
use once_cell::sync::Lazy;
use std::fmt;

/// Static facts about one opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpCodeInfo {
    pub opcode: OpCode,
    pub name: &'static str,
    pub operand: OperandSize,
    pub price: u64,
}

macro_rules! define_opcodes {
    ($($name:ident = $value:literal, $price:literal, $kind:ident $(($n:literal))?;)*) => {
        /// A VM instruction byte.
        #[allow(non_camel_case_types, clippy::upper_case_acronyms)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum OpCode {
            $($name = $value,)*
        }

        /// Every defined opcode, in byte order.
        pub const DEFINITIONS: &[OpCodeInfo] = &[
            $(OpCodeInfo {
                opcode: OpCode::$name,
                name: stringify!($name),
                operand: OperandSize::$kind($($n)?),
                price: $price,
            },)*
        ];
    };
}

define_opcodes! {
    PUSHINT8 = 0x00, 1, fixed(1);
    PUSHINT16 = 0x01, 1, fixed(2);
    PUSHINT32 = 0x02, 1, fixed(4);
    PUSHINT64 = 0x03, 1, fixed(8);
    PUSHINT128 = 0x04, 4, fixed(16);
    PUSHINT256 = 0x05, 4, fixed(32);
    PUSHT = 0x08, 1, none;
    PUSHF = 0x09, 1, none;
    PUSHA = 0x0A, 4, fixed(4);
    PUSHNULL = 0x0B, 1, none;
    PUSHDATA1 = 0x0C, 8, prefix(1);
    PUSHDATA2 = 0x0D, 512, prefix(2);
    PUSHDATA4 = 0x0E, 4096, prefix(4);
    PUSHM1 = 0x0F, 1, none;
    PUSH0 = 0x10, 1, none;
    PUSH1 = 0x11, 1, none;
    PUSH2 = 0x12, 1, none;
    PUSH3 = 0x13, 1, none;
    PUSH4 = 0x14, 1, none;
    PUSH5 = 0x15, 1, none;
    PUSH6 = 0x16, 1, none;
    PUSH7 = 0x17, 1, none;
    PUSH8 = 0x18, 1, none;
    PUSH9 = 0x19, 1, none;
    PUSH10 = 0x1A, 1, none;
    PUSH11 = 0x1B, 1, none;
    PUSH12 = 0x1C, 1, none;
    PUSH13 = 0x1D, 1, none;
    PUSH14 = 0x1E, 1, none;
    PUSH15 = 0x1F, 1, none;
    PUSH16 = 0x20, 1, none;

    NOP = 0x21, 1, none;
    JMP = 0x22, 2, fixed(1);
    JMP_L = 0x23, 2, fixed(4);
    JMPIF = 0x24, 2, fixed(1);
    JMPIF_L = 0x25, 2, fixed(4);
    JMPIFNOT = 0x26, 2, fixed(1);
    JMPIFNOT_L = 0x27, 2, fixed(4);
    JMPEQ = 0x28, 2, fixed(1);
    JMPEQ_L = 0x29, 2, fixed(4);
    JMPNE = 0x2A, 2, fixed(1);
    JMPNE_L = 0x2B, 2, fixed(4);
    JMPGT = 0x2C, 2, fixed(1);
    JMPGT_L = 0x2D, 2, fixed(4);
    JMPGE = 0x2E, 2, fixed(1);
    JMPGE_L = 0x2F, 2, fixed(4);
    JMPLT = 0x30, 2, fixed(1);
    JMPLT_L = 0x31, 2, fixed(4);
    JMPLE = 0x32, 2, fixed(1);
    JMPLE_L = 0x33, 2, fixed(4);
    CALL = 0x34, 512, fixed(1);
    CALL_L = 0x35, 512, fixed(4);
    CALLA = 0x36, 512, none;
    CALLT = 0x37, 32768, fixed(2);
    ABORT = 0x38, 0, none;
    ASSERT = 0x39, 1, none;
    THROW = 0x3A, 512, none;
    TRY = 0x3B, 4, fixed(2);
    TRY_L = 0x3C, 4, fixed(8);
    ENDTRY = 0x3D, 4, fixed(1);
    ENDTRY_L = 0x3E, 4, fixed(4);
    ENDFINALLY = 0x3F, 4, none;
    RET = 0x40, 0, none;
    SYSCALL = 0x41, 0, fixed(4);

    DEPTH = 0x43, 2, none;
    DROP = 0x45, 2, none;
    NIP = 0x46, 2, none;
    XDROP = 0x48, 16, none;
    CLEAR = 0x49, 16, none;
    DUP = 0x4A, 2, none;
    OVER = 0x4B, 2, none;
    PICK = 0x4D, 2, none;
    TUCK = 0x4E, 2, none;
    SWAP = 0x50, 2, none;
    ROT = 0x51, 2, none;
    ROLL = 0x52, 16, none;
    REVERSE3 = 0x53, 2, none;
    REVERSE4 = 0x54, 2, none;
    REVERSEN = 0x55, 16, none;

    INITSSLOT = 0x56, 16, fixed(1);
    INITSLOT = 0x57, 64, fixed(2);
    LDSFLD0 = 0x58, 2, none;
    LDSFLD1 = 0x59, 2, none;
    LDSFLD2 = 0x5A, 2, none;
    LDSFLD3 = 0x5B, 2, none;
    LDSFLD4 = 0x5C, 2, none;
    LDSFLD5 = 0x5D, 2, none;
    LDSFLD6 = 0x5E, 2, none;
    LDSFLD = 0x5F, 2, fixed(1);
    STSFLD0 = 0x60, 2, none;
    STSFLD1 = 0x61, 2, none;
    STSFLD2 = 0x62, 2, none;
    STSFLD3 = 0x63, 2, none;
    STSFLD4 = 0x64, 2, none;
    STSFLD5 = 0x65, 2, none;
    STSFLD6 = 0x66, 2, none;
    STSFLD = 0x67, 2, fixed(1);
    LDLOC0 = 0x68, 2, none;
    LDLOC1 = 0x69, 2, none;
    LDLOC2 = 0x6A, 2, none;
    LDLOC3 = 0x6B, 2, none;
    LDLOC4 = 0x6C, 2, none;
    LDLOC5 = 0x6D, 2, none;
    LDLOC6 = 0x6E, 2, none;
    LDLOC = 0x6F, 2, fixed(1);
    STLOC0 = 0x70, 2, none;
    STLOC1 = 0x71, 2, none;
    STLOC2 = 0x72, 2, none;
    STLOC3 = 0x73, 2, none;
    STLOC4 = 0x74, 2, none;
    STLOC5 = 0x75, 2, none;
    STLOC6 = 0x76, 2, none;
    STLOC = 0x77, 2, fixed(1);
    LDARG0 = 0x78, 2, none;
    LDARG1 = 0x79, 2, none;
    LDARG2 = 0x7A, 2, none;
    LDARG3 = 0x7B, 2, none;
    LDARG4 = 0x7C, 2, none;
    LDARG5 = 0x7D, 2, none;
    LDARG6 = 0x7E, 2, none;
    LDARG = 0x7F, 2, fixed(1);
    STARG0 = 0x80, 2, none;
    STARG1 = 0x81, 2, none;
    STARG2 = 0x82, 2, none;
    STARG3 = 0x83, 2, none;
    STARG4 = 0x84, 2, none;
    STARG5 = 0x85, 2, none;
    STARG6 = 0x86, 2, none;
    STARG = 0x87, 2, fixed(1);

    NEWBUFFER = 0x88, 256, none;
    MEMCPY = 0x89, 2048, none;
    CAT = 0x8B, 2048, none;
    SUBSTR = 0x8C, 2048, none;
    LEFT = 0x8D, 2048, none;
    RIGHT = 0x8E, 2048, none;

    INVERT = 0x90, 4, none;
    AND = 0x91, 8, none;
    OR = 0x92, 8, none;
    XOR = 0x93, 8, none;
    EQUAL = 0x97, 32, none;
    NOTEQUAL = 0x98, 32, none;

    SIGN = 0x99, 4, none;
    ABS = 0x9A, 4, none;
    NEGATE = 0x9B, 4, none;
    INC = 0x9C, 4, none;
    DEC = 0x9D, 4, none;
    ADD = 0x9E, 8, none;
    SUB = 0x9F, 8, none;
    MUL = 0xA0, 8, none;
    DIV = 0xA1, 8, none;
    MOD = 0xA2, 8, none;
    POW = 0xA3, 64, none;
    SQRT = 0xA4, 64, none;
    MODMUL = 0xA5, 32, none;
    MODPOW = 0xA6, 2048, none;
    SHL = 0xA8, 8, none;
    SHR = 0xA9, 8, none;
    NOT = 0xAA, 4, none;
    BOOLAND = 0xAB, 8, none;
    BOOLOR = 0xAC, 8, none;
    NZ = 0xB1, 4, none;
    NUMEQUAL = 0xB3, 8, none;
    NUMNOTEQUAL = 0xB4, 8, none;
    LT = 0xB5, 8, none;
    LE = 0xB6, 8, none;
    GT = 0xB7, 8, none;
    GE = 0xB8, 8, none;
    MIN = 0xB9, 8, none;
    MAX = 0xBA, 8, none;
    WITHIN = 0xBB, 8, none;

    PACKMAP = 0xBE, 2048, none;
    PACKSTRUCT = 0xBF, 2048, none;
    PACK = 0xC0, 2048, none;
    UNPACK = 0xC1, 2048, none;
    NEWARRAY0 = 0xC2, 16, none;
    NEWARRAY = 0xC3, 512, none;
    NEWARRAY_T = 0xC4, 512, fixed(1);
    NEWSTRUCT0 = 0xC5, 16, none;
    NEWSTRUCT = 0xC6, 512, none;
    NEWMAP = 0xC8, 8, none;
    SIZE = 0xCA, 4, none;
    HASKEY = 0xCB, 64, none;
    KEYS = 0xCC, 16, none;
    VALUES = 0xCD, 8192, none;
    PICKITEM = 0xCE, 64, none;
    APPEND = 0xCF, 8192, none;
    SETITEM = 0xD0, 8192, none;
    REVERSEITEMS = 0xD1, 8192, none;
    REMOVE = 0xD2, 16, none;
    CLEARITEMS = 0xD3, 16, none;
    POPITEM = 0xD4, 16, none;

    ISNULL = 0xD8, 2, none;
    ISTYPE = 0xD9, 2, fixed(1);
    CONVERT = 0xDB, 8192, fixed(1);

    ABORTMSG = 0xE0, 0, none;
    ASSERTMSG = 0xE1, 1, none;
}

static TABLE: Lazy<[Option<&'static OpCodeInfo>; 256]> = Lazy::new(|| {
    let mut table = [None; 256];
    for info in DEFINITIONS {
        table[info.opcode as usize] = Some(info);
    }
    table
});

impl OpCode {
    /// Looks up the table entry for a raw byte.
    pub fn info_for(byte: u8) -> Option<&'static OpCodeInfo> {
        TABLE[byte as usize]
    }

    pub fn info(self) -> &'static OpCodeInfo {
        // Every variant is listed in DEFINITIONS.
        TABLE[self as usize].unwrap_or(&DEFINITIONS[0])
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn operand_size(self) -> OperandSize {
        self.info().operand
    }

    /// Base execution price, before the exec fee factor.
    pub fn price(self) -> u64 {
        self.info().price
    }

    /// The constant a `PUSHM1..=PUSH16` opcode pushes.
    pub fn push_constant(self) -> Option<i8> {
        match self {
            OpCode::PUSHM1 => Some(-1),
            op if op >= OpCode::PUSH0 && op <= OpCode::PUSH16 => {
                Some((op as u8 - OpCode::PUSH0 as u8) as i8)
            }
            _ => None,
        }
    }

    /// The opcode that pushes `value`, for `-1..=16`.
    pub fn for_small_int(value: i64) -> Option<OpCode> {
        match value {
            -1 => Some(OpCode::PUSHM1),
            0..=16 => OpCode::try_from(OpCode::PUSH0 as u8 + value as u8).ok(),
            _ => None,
        }
    }
}

impl TryFrom<u8> for OpCode {
    type Error = VmError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        OpCode::info_for(byte)
            .map(|info| info.opcode)
            .ok_or(VmError::InvalidOpCode(byte))
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
