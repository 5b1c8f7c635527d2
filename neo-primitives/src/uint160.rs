//! Implementation of `UInt160`, the 160-bit script hash.

use crate::constants::{ADDRESS_PAYLOAD_SIZE, ADDRESS_SIZE, ADDRESS_VERSION};
use crate::error::{PrimitiveError, PrimitiveResult};
use neo_io::{BinaryWriter, IoResult, MemoryReader, Serializable};
use ripemd::Ripemd160;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// The length of `UInt160` values in bytes.
pub const UINT160_SIZE: usize = ADDRESS_SIZE;

/// A 160-bit value stored little-endian, used for script hashes.
///
/// The textual form is `0x` followed by the bytes in big-endian order, which
/// is how explorers and RPC nodes print contract hashes.
#[derive(Clone, Copy, Default, Eq, PartialEq, Hash)]
pub struct UInt160([u8; UINT160_SIZE]);

impl UInt160 {
    pub const LENGTH: usize = UINT160_SIZE;

    #[inline]
    #[must_use]
    pub const fn zero() -> Self {
        Self([0u8; UINT160_SIZE])
    }

    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    /// Creates a `UInt160` from exactly 20 little-endian bytes.
    pub fn from_bytes(value: &[u8]) -> PrimitiveResult<Self> {
        let bytes: [u8; UINT160_SIZE] = value.try_into().map_err(|_| {
            PrimitiveError::invalid_format(format!(
                "UInt160 needs {UINT160_SIZE} bytes, got {}",
                value.len()
            ))
        })?;
        Ok(Self(bytes))
    }

    /// Little-endian bytes.
    #[inline]
    #[must_use]
    pub const fn to_array(&self) -> [u8; UINT160_SIZE] {
        self.0
    }

    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; UINT160_SIZE] {
        &self.0
    }

    /// Parses the `0x`-prefixed (prefix optional) big-endian hex form.
    pub fn parse(s: &str) -> PrimitiveResult<Self> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.len() != UINT160_SIZE * 2 {
            return Err(PrimitiveError::invalid_format(format!(
                "UInt160 hex must be {} digits, got {}",
                UINT160_SIZE * 2,
                digits.len()
            )));
        }
        let mut bytes = hex::decode(digits)
            .map_err(|e| PrimitiveError::invalid_format(format!("invalid UInt160 hex: {e}")))?;
        bytes.reverse();
        Self::from_bytes(&bytes)
    }

    /// Big-endian hex with a `0x` prefix.
    #[must_use]
    pub fn to_hex_string(&self) -> String {
        let mut bytes = self.0;
        bytes.reverse();
        format!("0x{}", hex::encode(bytes))
    }

    /// Hash160 of a script: RIPEMD-160 over SHA-256.
    #[must_use]
    pub fn from_script(script: &[u8]) -> Self {
        let sha = Sha256::digest(script);
        let hash = Ripemd160::digest(sha);
        let mut bytes = [0u8; UINT160_SIZE];
        bytes.copy_from_slice(&hash);
        Self(bytes)
    }

    /// Encodes this script hash as an N3 address (Base58Check, version `0x35`).
    #[must_use]
    pub fn to_address(&self) -> String {
        let mut data = Vec::with_capacity(ADDRESS_PAYLOAD_SIZE);
        data.push(ADDRESS_VERSION);
        data.extend_from_slice(&self.0);
        let checksum = address_checksum(&data);
        data.extend_from_slice(&checksum);
        bs58::encode(data).into_string()
    }

    /// Decodes an N3 address back to its script hash.
    pub fn from_address(address: &str) -> PrimitiveResult<Self> {
        let decoded = bs58::decode(address)
            .into_vec()
            .map_err(|e| PrimitiveError::invalid_address(address, e.to_string()))?;

        if decoded.len() != ADDRESS_PAYLOAD_SIZE {
            return Err(PrimitiveError::invalid_address(
                address,
                format!("decoded length {} is not {ADDRESS_PAYLOAD_SIZE}", decoded.len()),
            ));
        }
        if decoded[0] != ADDRESS_VERSION {
            return Err(PrimitiveError::invalid_address(
                address,
                format!("version byte 0x{:02x}", decoded[0]),
            ));
        }

        let (payload, checksum) = decoded.split_at(1 + UINT160_SIZE);
        if checksum != address_checksum(payload) {
            return Err(PrimitiveError::invalid_address(address, "checksum mismatch"));
        }
        Self::from_bytes(&payload[1..])
    }
}

fn address_checksum(data: &[u8]) -> [u8; 4] {
    let hash = Sha256::digest(Sha256::digest(data));
    [hash[0], hash[1], hash[2], hash[3]]
}

impl FromStr for UInt160 {
    type Err = PrimitiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for UInt160 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex_string())
    }
}

impl fmt::Debug for UInt160 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UInt160({})", self.to_hex_string())
    }
}

impl PartialOrd for UInt160 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for UInt160 {
    /// Compares as unsigned integers, most significant byte first.
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.iter().rev().cmp(other.0.iter().rev())
    }
}

impl From<[u8; UINT160_SIZE]> for UInt160 {
    fn from(data: [u8; UINT160_SIZE]) -> Self {
        Self(data)
    }
}

impl TryFrom<&[u8]> for UInt160 {
    type Error = PrimitiveError;

    fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(data)
    }
}

impl AsRef<[u8]> for UInt160 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serializable for UInt160 {
    fn size(&self) -> usize {
        UINT160_SIZE
    }

    fn serialize(&self, writer: &mut BinaryWriter) -> IoResult<()> {
        writer.write_bytes(&self.0);
        Ok(())
    }

    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self> {
        let mut bytes = [0u8; UINT160_SIZE];
        bytes.copy_from_slice(reader.read_bytes(UINT160_SIZE)?);
        Ok(Self(bytes))
    }
}

impl Serialize for UInt160 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex_string())
    }
}

impl<'de> Deserialize<'de> for UInt160 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
