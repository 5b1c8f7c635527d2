//! Serde helpers shared by the JSON forms of transaction types.

/// Byte strings as standard base64 text.
pub(crate) mod base64_bytes {
    use base64::{engine::general_purpose, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&general_purpose::STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        general_purpose::STANDARD
            .decode(text)
            .map_err(serde::de::Error::custom)
    }
}
