//! Owned scripts and instruction iteration.

use crate::error::VmResult;
use crate::instruction::Instruction;
use neo_io::MemoryReader;
use std::fmt;

/// A VM script. Only the shape of each instruction is ever checked; jump
/// targets and stack effects are the engine's concern.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Script {
    bytes: Vec<u8>,
}

impl Script {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Builds a script, rejecting it unless every instruction parses.
    pub fn new_validated(bytes: impl Into<Vec<u8>>) -> VmResult<Self> {
        let script = Self::new(bytes);
        script.validate_shape()?;
        Ok(script)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Iterates the instructions in order. Iteration stops after the first error.
    pub fn instructions(&self) -> Instructions<'_> {
        Instructions {
            reader: MemoryReader::new(&self.bytes),
            failed: false,
        }
    }

    /// Checks that every opcode is defined and every operand is complete.
    pub fn validate_shape(&self) -> VmResult<()> {
        validate_shape(&self.bytes)
    }

    /// One line per instruction: `OPCODE` or `OPCODE operand-hex`.
    pub fn disassemble(&self) -> VmResult<String> {
        disassemble(&self.bytes)
    }
}

impl From<Vec<u8>> for Script {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl AsRef<[u8]> for Script {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.bytes))
    }
}

/// Iterator returned by [`Script::instructions`].
pub struct Instructions<'a> {
    reader: MemoryReader<'a>,
    failed: bool,
}

impl<'a> Iterator for Instructions<'a> {
    type Item = VmResult<Instruction<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.reader.is_at_end() {
            return None;
        }
        let next = Instruction::read(&mut self.reader);
        self.failed = next.is_err();
        Some(next)
    }
}

/// Shape check over borrowed bytes; see [`Script::validate_shape`].
pub fn validate_shape(script: &[u8]) -> VmResult<()> {
    let mut reader = MemoryReader::new(script);
    while !reader.is_at_end() {
        Instruction::read(&mut reader)?;
    }
    Ok(())
}

/// Disassembly over borrowed bytes; see [`Script::disassemble`].
pub fn disassemble(script: &[u8]) -> VmResult<String> {
    let mut reader = MemoryReader::new(script);
    let mut lines = Vec::new();
    while !reader.is_at_end() {
        lines.push(Instruction::read(&mut reader)?.to_string());
    }
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::op_code::OpCode;
    use crate::ScriptBuilder;

    #[test]
    fn test_instructions() {
        let mut builder = ScriptBuilder::new();
        builder.emit_push_int(100).emit_opcode(OpCode::RET);
        let script = Script::new(builder.into_bytes());
        let ops: Vec<OpCode> = script
            .instructions()
            .map(|i| i.map(|i| i.opcode))
            .collect::<VmResult<_>>()
            .unwrap();
        assert_eq!(ops, vec![OpCode::PUSHINT8, OpCode::RET]);
    }

    #[test]
    fn test_iteration_stops_on_error() {
        let script = Script::new(vec![OpCode::NOP as u8, 0xFF, OpCode::NOP as u8]);
        let results: Vec<_> = script.instructions().collect();
        assert_eq!(results.len(), 2);
        assert!(results[1].is_err());
        assert!(script.validate_shape().is_err());
        assert!(Script::new_validated(vec![0xFF]).is_err());
    }

    #[test]
    fn test_disassemble() {
        let mut builder = ScriptBuilder::new();
        builder
            .emit_push(&[0x01, 0x02])
            .emit_push_int(5)
            .emit_syscall("System.Runtime.Log")
            .unwrap();
        let text = Script::new(builder.into_bytes()).disassemble().unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "PUSHDATA1 0102");
        assert_eq!(lines[1], "PUSH5");
        assert!(lines[2].starts_with("SYSCALL "));
    }
}
