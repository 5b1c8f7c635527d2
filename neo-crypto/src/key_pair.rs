//! secp256r1 key pairs and ECDSA signatures over SHA-256.

use crate::ecc::ECPoint;
use crate::error::{CryptoError, CryptoResult};
use p256::ecdsa::signature::{Signer, Verifier};
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use std::fmt;
use zeroize::Zeroizing;

/// Size of a private key in bytes.
pub const PRIVATE_KEY_SIZE: usize = 32;

/// Size of an `r || s` signature in bytes.
pub const SIGNATURE_SIZE: usize = 64;

/// A private key together with its public point.
#[derive(Clone)]
pub struct KeyPair {
    private_key: Zeroizing<[u8; PRIVATE_KEY_SIZE]>,
    public_key: ECPoint,
}

impl KeyPair {
    /// Builds a key pair from a 32-byte big-endian scalar.
    pub fn from_private_key(private_key: &[u8]) -> CryptoResult<Self> {
        if private_key.len() != PRIVATE_KEY_SIZE {
            return Err(CryptoError::invalid_private_key(format!(
                "expected {PRIVATE_KEY_SIZE} bytes, got {}",
                private_key.len()
            )));
        }
        let signing = SigningKey::from_slice(private_key)
            .map_err(|_| CryptoError::invalid_private_key("not a valid secp256r1 scalar"))?;
        Ok(Self::from_signing_key(&signing))
    }

    /// Generates a fresh key from the operating system RNG.
    pub fn generate() -> Self {
        Self::from_signing_key(&SigningKey::random(&mut OsRng))
    }

    fn from_signing_key(signing: &SigningKey) -> Self {
        let mut private_key = Zeroizing::new([0u8; PRIVATE_KEY_SIZE]);
        private_key.copy_from_slice(&signing.to_bytes());
        let public_key =
            ECPoint::from_public_key(&p256::PublicKey::from(signing.verifying_key()));
        Self {
            private_key,
            public_key,
        }
    }

    pub fn public_key(&self) -> &ECPoint {
        &self.public_key
    }

    pub fn private_key(&self) -> &[u8; PRIVATE_KEY_SIZE] {
        &self.private_key
    }

    /// Signs `message` (hashed with SHA-256) and returns `r || s`.
    pub fn sign(&self, message: &[u8]) -> CryptoResult<[u8; SIGNATURE_SIZE]> {
        let signing = SigningKey::from_slice(self.private_key.as_slice())
            .map_err(|_| CryptoError::invalid_private_key("not a valid secp256r1 scalar"))?;
        let signature: Signature = signing.sign(message);
        let mut out = [0u8; SIGNATURE_SIZE];
        out.copy_from_slice(&signature.to_bytes());
        Ok(out)
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key)
            .field("private_key", &"***")
            .finish()
    }
}

/// Checks an `r || s` signature of `message` against `public_key`.
///
/// A malformed signature is simply not valid; only an unusable key is an error.
pub fn verify_signature(
    message: &[u8],
    signature: &[u8],
    public_key: &ECPoint,
) -> CryptoResult<bool> {
    let key = VerifyingKey::from(public_key.to_public_key()?);
    let Ok(signature) = Signature::from_slice(signature) else {
        return Ok(false);
    };
    Ok(key.verify(message, &signature).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_and_verify() {
        let pair = KeyPair::from_private_key(&[0x11; PRIVATE_KEY_SIZE]).unwrap();
        let signature = pair.sign(b"neo").unwrap();
        assert!(verify_signature(b"neo", &signature, pair.public_key()).unwrap());
        assert!(!verify_signature(b"neo!", &signature, pair.public_key()).unwrap());
        assert!(!verify_signature(b"neo", &signature[..63], pair.public_key()).unwrap());
    }

    #[test]
    fn test_private_key_round_trip() {
        let pair = KeyPair::generate();
        let restored = KeyPair::from_private_key(pair.private_key()).unwrap();
        assert_eq!(restored.public_key(), pair.public_key());
    }

    #[test]
    fn test_rejects_bad_scalars() {
        assert!(KeyPair::from_private_key(&[0u8; PRIVATE_KEY_SIZE]).is_err());
        assert!(KeyPair::from_private_key(&[0x11; 31]).is_err());
    }

    #[test]
    fn test_debug_hides_private_key() {
        let pair = KeyPair::from_private_key(&[0x22; PRIVATE_KEY_SIZE]).unwrap();
        let rendered = format!("{pair:?}");
        assert!(rendered.contains("***"));
        assert!(!rendered.contains(&hex::encode([0x22; PRIVATE_KEY_SIZE])));
    }
}
