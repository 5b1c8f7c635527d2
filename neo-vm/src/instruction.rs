//! Decoding of single instructions.

use crate::error::{VmError, VmResult};
use crate::op_code::OpCode;
use neo_io::MemoryReader;
use std::fmt;

/// One decoded instruction, borrowing its operand from the script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction<'a> {
    /// Offset of the opcode byte within the script.
    pub position: usize,
    pub opcode: OpCode,
    /// Operand bytes, without any length prefix.
    pub operand: &'a [u8],
}

impl<'a> Instruction<'a> {
    /// Reads the instruction at the reader's position.
    ///
    /// Only the shape is checked: the opcode must be defined and the operand
    /// must fit in what remains of the script.
    pub fn read(reader: &mut MemoryReader<'a>) -> VmResult<Self> {
        let position = reader.position();
        let opcode = OpCode::try_from(reader.read_u8()?)?;
        let layout = opcode.operand_size();

        let truncated = |needed: usize, remaining: usize| VmError::TruncatedOperand {
            opcode,
            position,
            needed,
            remaining,
        };

        let length = match layout.size_prefix {
            0 => layout.size,
            width => {
                if reader.remaining() < width {
                    return Err(truncated(width, reader.remaining()));
                }
                match width {
                    1 => reader.read_u8()? as usize,
                    2 => reader.read_u16()? as usize,
                    _ => reader.read_u32()? as usize,
                }
            }
        };
        if reader.remaining() < length {
            return Err(truncated(length, reader.remaining()));
        }
        let operand = reader.read_bytes(length)?;
        Ok(Self {
            position,
            opcode,
            operand,
        })
    }

    /// Encoded size including the opcode byte and any length prefix.
    pub fn size(&self) -> usize {
        1 + self.opcode.operand_size().size_prefix + self.operand.len()
    }

    /// Little-endian signed operand of jump-style instructions.
    pub fn token_i32(&self) -> Option<i32> {
        match self.operand.len() {
            1 => Some(i32::from(self.operand[0] as i8)),
            4 => Some(i32::from_le_bytes([
                self.operand[0],
                self.operand[1],
                self.operand[2],
                self.operand[3],
            ])),
            _ => None,
        }
    }
}

impl fmt::Display for Instruction<'_> {
    /// `OPCODE` or `OPCODE operand-hex`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.operand.is_empty() {
            write!(f, "{}", self.opcode)
        } else {
            write!(f, "{} {}", self.opcode, hex::encode(self.operand))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_fixed_operand() {
        let script = [OpCode::JMP as u8, 0xFE, OpCode::RET as u8];
        let mut reader = MemoryReader::new(&script);
        let jump = Instruction::read(&mut reader).unwrap();
        assert_eq!(jump.opcode, OpCode::JMP);
        assert_eq!(jump.token_i32(), Some(-2));
        assert_eq!(jump.size(), 2);
        let ret = Instruction::read(&mut reader).unwrap();
        assert_eq!(ret.position, 2);
        assert!(ret.operand.is_empty());
        assert!(reader.is_at_end());
    }

    #[test]
    fn test_read_prefixed_operand() {
        let script = [OpCode::PUSHDATA2 as u8, 0x02, 0x00, 0xAA, 0xBB];
        let mut reader = MemoryReader::new(&script);
        let push = Instruction::read(&mut reader).unwrap();
        assert_eq!(push.operand, &[0xAA, 0xBB]);
        assert_eq!(push.size(), 5);
        assert_eq!(push.to_string(), "PUSHDATA2 aabb");
    }

    #[test]
    fn test_truncated_operand() {
        let script = [OpCode::PUSHDATA1 as u8, 0x05, 0x01];
        let mut reader = MemoryReader::new(&script);
        assert_eq!(
            Instruction::read(&mut reader),
            Err(VmError::TruncatedOperand {
                opcode: OpCode::PUSHDATA1,
                position: 0,
                needed: 5,
                remaining: 1,
            })
        );

        let script = [OpCode::PUSHINT32 as u8, 0x01];
        assert!(Instruction::read(&mut MemoryReader::new(&script)).is_err());
    }

    #[test]
    fn test_undefined_opcode() {
        let script = [0xFFu8];
        assert_eq!(
            Instruction::read(&mut MemoryReader::new(&script)),
            Err(VmError::InvalidOpCode(0xFF))
        );
    }
}
