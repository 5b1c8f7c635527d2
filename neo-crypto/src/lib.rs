//! # Neo Crypto
//!
//! Hashing and secp256r1 key material for Neo N3.
//!
//! - [`Crypto`]: SHA-256, RIPEMD-160, Hash160 and Hash256
//! - [`ECPoint`]: validated public keys, ordered the way multi-signature
//!   contracts order them
//! - [`KeyPair`]: private keys producing 64-byte `r || s` ECDSA signatures
//!
//! ```rust
//! use neo_crypto::{verify_signature, KeyPair};
//!
//! let pair = KeyPair::generate();
//! let signature = pair.sign(b"payload").unwrap();
//! assert!(verify_signature(b"payload", &signature, pair.public_key()).unwrap());
//! ```

pub mod ecc;
pub mod error;
pub mod hash;
pub mod key_pair;

pub use ecc::ECPoint;
pub use error::{CryptoError, CryptoResult};
pub use hash::Crypto;
pub use key_pair::{verify_signature, KeyPair, PRIVATE_KEY_SIZE, SIGNATURE_SIZE};
