//! Result codes carried by the `OracleResponse` transaction attribute.

use crate::error::PrimitiveError;
use neo_io::{BinaryWriter, IoError, IoResult, MemoryReader, Serializable};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of an oracle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum OracleResponseCode {
    Success = 0x00,
    ProtocolNotSupported = 0x10,
    ConsensusUnreachable = 0x12,
    NotFound = 0x14,
    Timeout = 0x16,
    Forbidden = 0x18,
    ResponseTooLarge = 0x1a,
    InsufficientFunds = 0x1c,
    ContentTypeNotSupported = 0x1f,
    Error = 0xff,
}

impl OracleResponseCode {
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl OracleResponseCode {
    pub fn from_byte(value: u8) -> Result<Self, PrimitiveError> {
        Ok(match value {
            0x00 => Self::Success,
            0x10 => Self::ProtocolNotSupported,
            0x12 => Self::ConsensusUnreachable,
            0x14 => Self::NotFound,
            0x16 => Self::Timeout,
            0x18 => Self::Forbidden,
            0x1a => Self::ResponseTooLarge,
            0x1c => Self::InsufficientFunds,
            0x1f => Self::ContentTypeNotSupported,
            0xff => Self::Error,
            _ => {
                return Err(PrimitiveError::invalid_format(format!(
                    "unknown oracle response code 0x{value:02x}"
                )))
            }
        })
    }
}

impl fmt::Display for OracleResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl Serializable for OracleResponseCode {
    fn size(&self) -> usize {
        1
    }

    fn serialize(&self, writer: &mut BinaryWriter) -> IoResult<()> {
        writer.write_u8(*self as u8);
        Ok(())
    }

    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self> {
        Self::from_byte(reader.read_u8()?).map_err(|e| IoError::invalid_data(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_decode() {
        assert_eq!(
            OracleResponseCode::from_array(&[0x14]).unwrap(),
            OracleResponseCode::NotFound
        );
        assert!(OracleResponseCode::from_array(&[0x13]).is_err());
        assert!(OracleResponseCode::Success.is_success());
        assert_eq!(OracleResponseCode::Timeout.to_string(), "Timeout");
    }
}
