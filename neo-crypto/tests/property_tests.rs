//! Property-based tests for neo-crypto

use neo_crypto::{verify_signature, Crypto, ECPoint, KeyPair};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Hash160 is RIPEMD-160 applied to SHA-256.
    #[test]
    fn test_hash160_composition(data in any::<Vec<u8>>()) {
        prop_assert_eq!(Crypto::hash160(&data), Crypto::ripemd160(&Crypto::sha256(&data)));
    }

    /// Signatures verify for the signed message and fail for any other.
    #[test]
    fn test_sign_verify(message in any::<Vec<u8>>(), other in any::<Vec<u8>>()) {
        let pair = KeyPair::generate();
        let signature = pair.sign(&message).unwrap();
        prop_assert!(verify_signature(&message, &signature, pair.public_key()).unwrap());
        if other != message {
            prop_assert!(!verify_signature(&other, &signature, pair.public_key()).unwrap());
        }
    }

    /// A point survives both SEC1 encodings.
    #[test]
    fn test_point_encodings(seed in 1u8..=255) {
        let pair = KeyPair::from_private_key(&[seed; 32]).unwrap();
        let point = pair.public_key();
        prop_assert_eq!(&ECPoint::from_bytes(&point.encode_compressed()).unwrap(), point);
        prop_assert_eq!(&ECPoint::from_bytes(&point.encode_uncompressed()).unwrap(), point);
    }
}

#[test]
fn test_points_sort_by_x_coordinate() {
    let mut points: Vec<ECPoint> = (1u8..=6)
        .map(|seed| KeyPair::from_private_key(&[seed; 32]).unwrap().public_key().clone())
        .collect();
    points.sort();
    for pair in points.windows(2) {
        assert!(pair[0].x() <= pair[1].x());
    }
}
