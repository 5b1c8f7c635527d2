//! Implementation of `UInt256`, the 256-bit hash used for transactions and blocks.

use crate::constants::HASH_SIZE;
use crate::error::{PrimitiveError, PrimitiveResult};
use neo_io::{BinaryWriter, IoResult, MemoryReader, Serializable};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// The length of `UInt256` values in bytes.
pub const UINT256_SIZE: usize = HASH_SIZE;

/// A 256-bit value stored little-endian, printed big-endian with `0x`.
#[derive(Clone, Copy, Default, Eq, PartialEq, Hash)]
pub struct UInt256([u8; UINT256_SIZE]);

impl UInt256 {
    pub const LENGTH: usize = UINT256_SIZE;

    #[inline]
    #[must_use]
    pub const fn zero() -> Self {
        Self([0u8; UINT256_SIZE])
    }

    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    pub fn from_bytes(value: &[u8]) -> PrimitiveResult<Self> {
        let bytes: [u8; UINT256_SIZE] = value.try_into().map_err(|_| {
            PrimitiveError::invalid_format(format!(
                "UInt256 needs {UINT256_SIZE} bytes, got {}",
                value.len()
            ))
        })?;
        Ok(Self(bytes))
    }

    #[inline]
    #[must_use]
    pub const fn to_array(&self) -> [u8; UINT256_SIZE] {
        self.0
    }

    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; UINT256_SIZE] {
        &self.0
    }

    pub fn parse(s: &str) -> PrimitiveResult<Self> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.len() != UINT256_SIZE * 2 {
            return Err(PrimitiveError::invalid_format(format!(
                "UInt256 hex must be {} digits, got {}",
                UINT256_SIZE * 2,
                digits.len()
            )));
        }
        let mut bytes = hex::decode(digits)
            .map_err(|e| PrimitiveError::invalid_format(format!("invalid UInt256 hex: {e}")))?;
        bytes.reverse();
        Self::from_bytes(&bytes)
    }

    #[must_use]
    pub fn to_hex_string(&self) -> String {
        let mut bytes = self.0;
        bytes.reverse();
        format!("0x{}", hex::encode(bytes))
    }
}

impl FromStr for UInt256 {
    type Err = PrimitiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for UInt256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex_string())
    }
}

impl fmt::Debug for UInt256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UInt256({})", self.to_hex_string())
    }
}

impl PartialOrd for UInt256 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for UInt256 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.iter().rev().cmp(other.0.iter().rev())
    }
}

impl From<[u8; UINT256_SIZE]> for UInt256 {
    fn from(data: [u8; UINT256_SIZE]) -> Self {
        Self(data)
    }
}

impl TryFrom<&[u8]> for UInt256 {
    type Error = PrimitiveError;

    fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(data)
    }
}

impl AsRef<[u8]> for UInt256 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serializable for UInt256 {
    fn size(&self) -> usize {
        UINT256_SIZE
    }

    fn serialize(&self, writer: &mut BinaryWriter) -> IoResult<()> {
        writer.write_bytes(&self.0);
        Ok(())
    }

    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self> {
        let mut bytes = [0u8; UINT256_SIZE];
        bytes.copy_from_slice(reader.read_bytes(UINT256_SIZE)?);
        Ok(Self(bytes))
    }
}

impl Serialize for UInt256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex_string())
    }
}

impl<'de> Deserialize<'de> for UInt256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero() {
        assert!(UInt256::zero().is_zero());
        assert_eq!(
            UInt256::zero().to_string(),
            format!("0x{}", "0".repeat(64))
        );
    }

    #[test]
    fn test_parse_round_trip() {
        let text = "0x0102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f20";
        let value = UInt256::parse(text).unwrap();
        assert_eq!(value.to_array()[0], 0x20);
        assert_eq!(value.to_array()[31], 0x01);
        assert_eq!(value.to_string(), text);
    }

    #[test]
    fn test_from_bytes_length() {
        assert!(UInt256::from_bytes(&[0u8; 31]).is_err());
        assert!(UInt256::from_bytes(&[0u8; 32]).is_ok());
    }

    #[test]
    fn test_ordering() {
        let mut a = [0u8; 32];
        a[31] = 1;
        let mut b = [0xffu8; 32];
        b[31] = 0;
        assert!(UInt256::from(a) > UInt256::from(b));
    }
}
