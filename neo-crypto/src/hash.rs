//! Hash functions used by Neo N3.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Static hash helpers.
pub struct Crypto;

impl Crypto {
    /// SHA-256.
    ///
    /// ```
    /// use neo_crypto::Crypto;
    /// let hash = Crypto::sha256(b"Hello, Neo!");
    /// assert_eq!(hash.len(), 32);
    /// ```
    pub fn sha256(data: &[u8]) -> [u8; 32] {
        Sha256::digest(data).into()
    }

    pub fn ripemd160(data: &[u8]) -> [u8; 20] {
        Ripemd160::digest(data).into()
    }

    /// RIPEMD-160 of SHA-256. Script hashes and addresses are built on this.
    pub fn hash160(data: &[u8]) -> [u8; 20] {
        Self::ripemd160(&Self::sha256(data))
    }

    /// Double SHA-256. Transaction hashes and NEF checksums are built on this.
    pub fn hash256(data: &[u8]) -> [u8; 32] {
        Self::sha256(&Self::sha256(data))
    }

    /// First four bytes of [`hash256`](Self::hash256) read as a little-endian `u32`.
    pub fn checksum_u32(data: &[u8]) -> u32 {
        let hash = Self::hash256(data);
        u32::from_le_bytes([hash[0], hash[1], hash[2], hash[3]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            hex::encode(Crypto::sha256(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_ripemd160_known_vector() {
        assert_eq!(
            hex::encode(Crypto::ripemd160(b"abc")),
            "8eb208f7e05d987a9b044a8e98c6b087f15a0bfc"
        );
    }

    #[test]
    fn test_composed_hashes() {
        let data = b"neo";
        assert_eq!(Crypto::hash160(data), Crypto::ripemd160(&Crypto::sha256(data)));
        assert_eq!(Crypto::hash256(data), Crypto::sha256(&Crypto::sha256(data)));
        let hash = Crypto::hash256(data);
        assert_eq!(
            Crypto::checksum_u32(data).to_le_bytes(),
            [hash[0], hash[1], hash[2], hash[3]]
        );
    }
}
