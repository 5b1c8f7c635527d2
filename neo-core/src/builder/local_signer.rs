//! A [`SigningProvider`] over key pairs held in memory.

use super::collaborators::SigningProvider;
use crate::contract::VerificationScript;
use crate::error::QueryError;
use neo_crypto::{KeyPair, SIGNATURE_SIZE};
use neo_primitives::UInt160;
use std::collections::HashMap;
use tracing::debug;

/// Keys indexed by their single-signature account.
#[derive(Debug, Clone, Default)]
pub struct LocalSigner {
    keys: HashMap<UInt160, KeyPair>,
}

impl LocalSigner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `pair` and returns its account.
    pub fn add_key(&mut self, pair: KeyPair) -> UInt160 {
        let account = VerificationScript::single_sig(pair.public_key().clone()).script_hash();
        self.keys.insert(account, pair);
        account
    }

    pub fn with_key(mut self, pair: KeyPair) -> Self {
        self.add_key(pair);
        self
    }

    pub fn contains(&self, account: &UInt160) -> bool {
        self.keys.contains_key(account)
    }

    /// The single-signature contract of a held key.
    pub fn verification_script(&self, account: &UInt160) -> Option<VerificationScript> {
        self.keys
            .get(account)
            .map(|pair| VerificationScript::single_sig(pair.public_key().clone()))
    }
}

impl SigningProvider for LocalSigner {
    fn sign(
        &self,
        account: &UInt160,
        data: &[u8],
    ) -> Result<Option<[u8; SIGNATURE_SIZE]>, QueryError> {
        let Some(pair) = self.keys.get(account) else {
            return Ok(None);
        };
        debug!(%account, "signing with local key");
        pair.sign(data)
            .map(Some)
            .map_err(|e| QueryError::new(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neo_crypto::verify_signature;

    #[test]
    fn test_signs_only_held_accounts() {
        let pair = KeyPair::from_private_key(&[0x33; 32]).unwrap();
        let public = pair.public_key().clone();
        let signer = LocalSigner::new().with_key(pair);
        let account = VerificationScript::single_sig(public.clone()).script_hash();

        let signature = signer.sign(&account, b"data").unwrap().unwrap();
        assert!(verify_signature(b"data", &signature, &public).unwrap());
        assert_eq!(signer.sign(&UInt160::zero(), b"data").unwrap(), None);
        assert_eq!(
            signer.verification_script(&account),
            Some(VerificationScript::single_sig(public))
        );
    }
}
