//! Permissions granted to a called contract.

use bitflags::bitflags;
use neo_io::{BinaryWriter, IoError, IoResult, MemoryReader, Serializable};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags! {
    /// What a contract invoked through `System.Contract.Call` may do.
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CallFlags: u8 {
        const NONE = 0b0000_0000;
        const READ_STATES = 0b0000_0001;
        const WRITE_STATES = 0b0000_0010;
        const ALLOW_CALL = 0b0000_0100;
        const ALLOW_NOTIFY = 0b0000_1000;
    }
}

impl CallFlags {
    pub const STATES: CallFlags = CallFlags::READ_STATES.union(CallFlags::WRITE_STATES);
    pub const READ_ONLY: CallFlags = CallFlags::READ_STATES.union(CallFlags::ALLOW_CALL);
    pub const ALL: CallFlags = CallFlags::STATES
        .union(CallFlags::ALLOW_CALL)
        .union(CallFlags::ALLOW_NOTIFY);

    /// Decodes a flag byte, rejecting undefined bits.
    pub fn from_byte(value: u8) -> Option<Self> {
        CallFlags::from_bits(value)
    }
}

impl Serialize for CallFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bits())
    }
}

impl<'de> Deserialize<'de> for CallFlags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = u8::deserialize(deserializer)?;
        CallFlags::from_bits(value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid call flags 0x{value:02x}")))
    }
}

impl Serializable for CallFlags {
    fn size(&self) -> usize {
        1
    }

    fn serialize(&self, writer: &mut BinaryWriter) -> IoResult<()> {
        writer.write_u8(self.bits());
        Ok(())
    }

    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self> {
        let value = reader.read_u8()?;
        CallFlags::from_bits(value)
            .ok_or_else(|| IoError::invalid_data(format!("invalid call flags 0x{value:02x}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composites() {
        assert_eq!(CallFlags::ALL.bits(), 0x0f);
        assert_eq!(CallFlags::STATES.bits(), 0x03);
        assert_eq!(CallFlags::READ_ONLY.bits(), 0x05);
    }

    #[test]
    fn test_rejects_undefined_bits() {
        assert!(CallFlags::from_byte(0x10).is_none());
        assert!(CallFlags::from_array(&[0x10]).is_err());
        assert_eq!(CallFlags::from_array(&[0x0f]).unwrap(), CallFlags::ALL);
    }
}
