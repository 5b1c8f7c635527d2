//! Length and array helpers shared by every wire type.

use super::Serializable;
use crate::{BinaryWriter, IoResult, MemoryReader};

/// Returns the number of bytes `write_var_int(value)` produces.
#[inline]
pub fn get_var_size(value: u64) -> usize {
    if value < 0xfd {
        1
    } else if value <= 0xffff {
        3
    } else if value <= 0xffff_ffff {
        5
    } else {
        9
    }
}

#[inline]
pub fn get_var_size_usize(value: usize) -> usize {
    get_var_size(value as u64)
}

/// Size of `bytes` written with `write_var_bytes`.
#[inline]
pub fn get_var_size_bytes(bytes: &[u8]) -> usize {
    get_var_size_usize(bytes.len()) + bytes.len()
}

/// Size of `value` written with `write_var_string`.
#[inline]
pub fn get_var_size_str(value: &str) -> usize {
    get_var_size_bytes(value.as_bytes())
}

/// Size of a counted array of serializable items.
#[inline]
pub fn get_var_size_serializable_slice<T: Serializable>(values: &[T]) -> usize {
    get_var_size_usize(values.len()) + values.iter().map(Serializable::size).sum::<usize>()
}

/// Writes a var-int count followed by each item.
pub fn serialize_array<T: Serializable>(values: &[T], writer: &mut BinaryWriter) -> IoResult<()> {
    writer.write_var_int(values.len() as u64);
    for value in values {
        value.serialize(writer)?;
    }
    Ok(())
}

/// Reads a var-int count (at most `max`) followed by that many items.
pub fn deserialize_array<T: Serializable>(
    reader: &mut MemoryReader,
    max: usize,
) -> IoResult<Vec<T>> {
    let count = reader.read_var_int(max as u64)? as usize;
    let mut result = Vec::with_capacity(count.min(reader.remaining()));
    for _ in 0..count {
        result.push(T::deserialize(reader)?);
    }
    Ok(result)
}
