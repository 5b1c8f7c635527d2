//! The [`Serializable`] trait and its length helpers.

pub mod helper;

use crate::{BinaryWriter, IoError, IoResult, MemoryReader};

/// A value with a canonical Neo wire encoding.
pub trait Serializable: Sized {
    /// Exact number of bytes [`serialize`](Self::serialize) will produce.
    fn size(&self) -> usize;

    fn serialize(&self, writer: &mut BinaryWriter) -> IoResult<()>;

    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self>;

    /// Serializes into a fresh buffer.
    fn to_array(&self) -> IoResult<Vec<u8>> {
        let mut writer = BinaryWriter::with_capacity(self.size());
        self.serialize(&mut writer)?;
        Ok(writer.into_bytes())
    }

    /// Deserializes a value that must occupy the whole of `data`.
    fn from_array(data: &[u8]) -> IoResult<Self> {
        let mut reader = MemoryReader::new(data);
        let value = Self::deserialize(&mut reader)?;
        if !reader.is_at_end() {
            return Err(IoError::invalid_data(format!(
                "{} trailing bytes after value",
                reader.remaining()
            )));
        }
        Ok(value)
    }
}
