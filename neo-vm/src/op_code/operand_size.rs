//! Operand layout of an opcode.

/// How many operand bytes follow an opcode.
///
/// Exactly one of the two fields is non-zero for opcodes that carry an
/// operand: `size` for a fixed-width operand, `size_prefix` for data whose
/// length is given by a little-endian prefix of that many bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OperandSize {
    pub size: usize,
    pub size_prefix: usize,
}

impl OperandSize {
    pub const fn none() -> Self {
        Self {
            size: 0,
            size_prefix: 0,
        }
    }

    pub const fn fixed(size: usize) -> Self {
        Self {
            size,
            size_prefix: 0,
        }
    }

    pub const fn prefix(size_prefix: usize) -> Self {
        Self {
            size: 0,
            size_prefix,
        }
    }

    pub const fn has_operand(&self) -> bool {
        self.size > 0 || self.size_prefix > 0
    }
}
