//! secp256r1 public keys.

use crate::error::{CryptoError, CryptoResult};
use neo_io::{
    BinaryWriter, IoError, IoResult, MemoryReader, Serializable, EC_POINT_COMPRESSED_SIZE,
};
use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::PublicKey;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

const COORDINATE_SIZE: usize = 32;
const UNCOMPRESSED_SIZE: usize = 1 + 2 * COORDINATE_SIZE;

/// A point on secp256r1 known to lie on the curve.
///
/// Points are kept uncompressed so they can be ordered by X then Y, which is
/// the order multi-signature scripts list their keys in. On the wire and in
/// text they always appear in the 33-byte compressed form.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ECPoint([u8; UNCOMPRESSED_SIZE]);

impl ECPoint {
    /// Decodes a compressed (33-byte) or uncompressed (65-byte) SEC1 point.
    ///
    /// The point at infinity is not a valid public key and is rejected.
    pub fn from_bytes(encoded: &[u8]) -> CryptoResult<Self> {
        let key = PublicKey::from_sec1_bytes(encoded).map_err(|_| {
            CryptoError::invalid_public_key(format!(
                "{} byte encoding is not a curve point",
                encoded.len()
            ))
        })?;
        Ok(Self::from_public_key(&key))
    }

    pub(crate) fn from_public_key(key: &PublicKey) -> Self {
        let encoded = key.to_encoded_point(false);
        let mut bytes = [0u8; UNCOMPRESSED_SIZE];
        bytes.copy_from_slice(encoded.as_bytes());
        Self(bytes)
    }

    pub fn encode_compressed(&self) -> [u8; EC_POINT_COMPRESSED_SIZE] {
        let mut out = [0u8; EC_POINT_COMPRESSED_SIZE];
        out[0] = 0x02 | (self.0[UNCOMPRESSED_SIZE - 1] & 0x01);
        out[1..].copy_from_slice(self.x());
        out
    }

    pub fn encode_uncompressed(&self) -> [u8; UNCOMPRESSED_SIZE] {
        self.0
    }

    pub fn x(&self) -> &[u8] {
        &self.0[1..1 + COORDINATE_SIZE]
    }

    pub fn y(&self) -> &[u8] {
        &self.0[1 + COORDINATE_SIZE..]
    }

    pub(crate) fn to_public_key(&self) -> CryptoResult<PublicKey> {
        PublicKey::from_sec1_bytes(&self.0)
            .map_err(|_| CryptoError::invalid_public_key("stored point left the curve"))
    }

    /// Compressed form as lowercase hex without a prefix.
    pub fn to_hex(&self) -> String {
        hex::encode(self.encode_compressed())
    }
}

impl PartialOrd for ECPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ECPoint {
    fn cmp(&self, other: &Self) -> Ordering {
        self.x()
            .cmp(other.x())
            .then_with(|| self.y().cmp(other.y()))
    }
}

impl fmt::Display for ECPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ECPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ECPoint({})", self.to_hex())
    }
}

impl FromStr for ECPoint {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s.strip_prefix("0x").unwrap_or(s))
            .map_err(|e| CryptoError::invalid_public_key(e.to_string()))?;
        Self::from_bytes(&bytes)
    }
}

impl Serializable for ECPoint {
    fn size(&self) -> usize {
        EC_POINT_COMPRESSED_SIZE
    }

    fn serialize(&self, writer: &mut BinaryWriter) -> IoResult<()> {
        writer.write_ec_point(&self.encode_compressed())
    }

    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self> {
        let encoded = reader.read_ec_point()?;
        Self::from_bytes(encoded).map_err(|e| IoError::invalid_data(e.to_string()))
    }
}

impl Serialize for ECPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ECPoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Generator point of secp256r1.
    const G_COMPRESSED: &str =
        "036b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296";

    #[test]
    fn test_compressed_round_trip() {
        let point: ECPoint = G_COMPRESSED.parse().unwrap();
        assert_eq!(point.to_hex(), G_COMPRESSED);
        let uncompressed = point.encode_uncompressed();
        assert_eq!(uncompressed[0], 0x04);
        assert_eq!(ECPoint::from_bytes(&uncompressed).unwrap(), point);
    }

    #[test]
    fn test_rejects_invalid_points() {
        assert!(ECPoint::from_bytes(&[0x00]).is_err());
        assert!(ECPoint::from_bytes(&[0x05; 33]).is_err());
        assert!(ECPoint::from_bytes(&[0x02; 20]).is_err());
    }

    #[test]
    fn test_wire_form_is_compressed() {
        let point: ECPoint = G_COMPRESSED.parse().unwrap();
        let bytes = point.to_array().unwrap();
        assert_eq!(bytes.len(), 33);
        assert_eq!(ECPoint::from_array(&bytes).unwrap(), point);
    }

    #[test]
    fn test_serde_hex() {
        let point: ECPoint = G_COMPRESSED.parse().unwrap();
        let json = serde_json::to_string(&point).unwrap();
        assert_eq!(json, format!("\"{G_COMPRESSED}\""));
    }
}
