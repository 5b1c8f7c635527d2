//! Invocation/verification script pairs.

use neo_io::{
    get_var_size_bytes, BinaryWriter, IoError, IoResult, MemoryReader, Serializable,
};
use neo_primitives::UInt160;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// Enough for an 11-of-21 committee witness: 11 * (64 + 2) = 726.
pub const MAX_INVOCATION_SCRIPT: usize = 1024;

// 1 + (2 + 33) * 21 + 2 + 1 + 5 = 744 for the same committee.
pub const MAX_VERIFICATION_SCRIPT: usize = 1024;

/// Proof that a signer authorized a transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Witness {
    pub invocation_script: Vec<u8>,
    /// Empty when the signer is a deployed contract.
    pub verification_script: Vec<u8>,
}

impl Witness {
    pub fn new(invocation_script: Vec<u8>, verification_script: Vec<u8>) -> Self {
        Self {
            invocation_script,
            verification_script,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Hash160 of the verification script.
    pub fn script_hash(&self) -> UInt160 {
        UInt160::from_script(&self.verification_script)
    }
}

impl Serializable for Witness {
    fn size(&self) -> usize {
        get_var_size_bytes(&self.invocation_script) + get_var_size_bytes(&self.verification_script)
    }

    fn serialize(&self, writer: &mut BinaryWriter) -> IoResult<()> {
        if self.invocation_script.len() > MAX_INVOCATION_SCRIPT {
            return Err(IoError::invalid_data("invocation script too long"));
        }
        if self.verification_script.len() > MAX_VERIFICATION_SCRIPT {
            return Err(IoError::invalid_data("verification script too long"));
        }
        writer.write_var_bytes(&self.invocation_script);
        writer.write_var_bytes(&self.verification_script);
        Ok(())
    }

    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self> {
        let invocation_script = reader.read_var_bytes(MAX_INVOCATION_SCRIPT)?.to_vec();
        let verification_script = reader.read_var_bytes(MAX_VERIFICATION_SCRIPT)?.to_vec();
        Ok(Self::new(invocation_script, verification_script))
    }
}

#[derive(Serialize, Deserialize)]
struct WitnessJson {
    invocation: String,
    verification: String,
}

impl Serialize for Witness {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use base64::{engine::general_purpose, Engine as _};
        WitnessJson {
            invocation: general_purpose::STANDARD.encode(&self.invocation_script),
            verification: general_purpose::STANDARD.encode(&self.verification_script),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Witness {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use base64::{engine::general_purpose, Engine as _};
        use serde::de::Error;
        let json = WitnessJson::deserialize(deserializer)?;
        let invocation_script = general_purpose::STANDARD
            .decode(&json.invocation)
            .map_err(D::Error::custom)?;
        let verification_script = general_purpose::STANDARD
            .decode(&json.verification)
            .map_err(D::Error::custom)?;
        if invocation_script.len() > MAX_INVOCATION_SCRIPT
            || verification_script.len() > MAX_VERIFICATION_SCRIPT
        {
            return Err(D::Error::custom("witness script too long"));
        }
        Ok(Self::new(invocation_script, verification_script))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_form() {
        let witness = Witness::new(vec![0x0c, 0x01, 0xaa], vec![0x40]);
        let bytes = witness.to_array().unwrap();
        assert_eq!(bytes, vec![0x03, 0x0c, 0x01, 0xaa, 0x01, 0x40]);
        assert_eq!(witness.size(), bytes.len());
        assert_eq!(Witness::from_array(&bytes).unwrap(), witness);
    }

    #[test]
    fn test_script_limits() {
        let oversized = Witness::new(vec![0; MAX_INVOCATION_SCRIPT + 1], vec![]);
        assert!(oversized.to_array().is_err());

        let mut writer = BinaryWriter::new();
        writer.write_var_bytes(&[]);
        writer.write_var_bytes(&vec![0; MAX_VERIFICATION_SCRIPT + 1]);
        assert!(Witness::from_array(writer.as_bytes()).is_err());
    }

    #[test]
    fn test_script_hash_of_empty_script() {
        assert_eq!(Witness::empty().script_hash(), UInt160::from_script(&[]));
    }

    #[test]
    fn test_json_uses_base64() {
        let witness = Witness::new(vec![0x11, 0x40], vec![]);
        let json = serde_json::to_value(&witness).unwrap();
        assert_eq!(json["invocation"], "EUA=");
        assert_eq!(json["verification"], "");
        let back: Witness = serde_json::from_value(json).unwrap();
        assert_eq!(back, witness);
    }
}
