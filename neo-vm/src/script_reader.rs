//! Inverse of the push half of [`ScriptBuilder`](crate::ScriptBuilder).
//!
//! Each reader expects the cursor to sit on an opcode of one push family and
//! fails with [`VmError::UnexpectedOpCode`] otherwise, without consuming it.

use crate::error::{VmError, VmResult};
use crate::instruction::Instruction;
use crate::op_code::OpCode;
use neo_io::MemoryReader;
use num_bigint::BigInt;

fn expect_family(
    reader: &MemoryReader<'_>,
    expected: &'static str,
    accepts: impl Fn(OpCode) -> bool,
) -> VmResult<()> {
    let found = OpCode::try_from(reader.peek()?)?;
    if accepts(found) {
        Ok(())
    } else {
        Err(VmError::UnexpectedOpCode {
            expected,
            found,
            position: reader.position(),
        })
    }
}

/// Reads the bytes pushed by PUSHDATA1, PUSHDATA2 or PUSHDATA4.
pub fn read_push_data<'a>(reader: &mut MemoryReader<'a>) -> VmResult<&'a [u8]> {
    expect_family(reader, "PUSHDATA", |op| {
        matches!(op, OpCode::PUSHDATA1 | OpCode::PUSHDATA2 | OpCode::PUSHDATA4)
    })?;
    Ok(Instruction::read(reader)?.operand)
}

/// Reads a PUSHDATA operand as UTF-8 text. The reader does not move on failure.
pub fn read_push_string(reader: &mut MemoryReader<'_>) -> VmResult<String> {
    let position = reader.position();
    let mut cursor = reader.clone();
    let bytes = read_push_data(&mut cursor)?;
    let text = std::str::from_utf8(bytes).map_err(|_| {
        VmError::invalid_parameter(format!("push at offset {position} is not UTF-8"))
    })?;
    *reader = cursor;
    Ok(text.to_owned())
}

/// Reads an integer pushed by PUSHM1, PUSH0..PUSH16 or PUSHINT8..PUSHINT256.
pub fn read_push_integer(reader: &mut MemoryReader<'_>) -> VmResult<BigInt> {
    expect_family(reader, "integer push", |op| {
        op.push_constant().is_some() || (op >= OpCode::PUSHINT8 && op <= OpCode::PUSHINT256)
    })?;
    let instruction = Instruction::read(reader)?;
    Ok(match instruction.opcode.push_constant() {
        Some(constant) => BigInt::from(constant),
        None => BigInt::from_signed_bytes_le(instruction.operand),
    })
}

/// Reads PUSHT or PUSHF.
pub fn read_push_bool(reader: &mut MemoryReader<'_>) -> VmResult<bool> {
    expect_family(reader, "PUSHT or PUSHF", |op| {
        matches!(op, OpCode::PUSHT | OpCode::PUSHF)
    })?;
    Ok(Instruction::read(reader)?.opcode == OpCode::PUSHT)
}
