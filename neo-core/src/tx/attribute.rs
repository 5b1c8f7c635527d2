//! Transaction attributes.

use neo_io::{get_var_size_bytes, BinaryWriter, IoError, IoResult, MemoryReader, Serializable};
use neo_primitives::{OracleResponseCode, UInt256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest oracle result an `OracleResponse` attribute may carry.
pub const MAX_ORACLE_RESULT_SIZE: usize = u16::MAX as usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum TransactionAttributeType {
    HighPriority = 0x01,
    OracleResponse = 0x11,
    NotValidBefore = 0x20,
    Conflicts = 0x21,
    NotaryAssisted = 0x22,
}

impl TransactionAttributeType {
    pub fn from_byte(value: u8) -> Option<Self> {
        Some(match value {
            0x01 => Self::HighPriority,
            0x11 => Self::OracleResponse,
            0x20 => Self::NotValidBefore,
            0x21 => Self::Conflicts,
            0x22 => Self::NotaryAssisted,
            _ => return None,
        })
    }

    /// Whether a transaction may carry several attributes of this type.
    pub fn allow_multiple(self) -> bool {
        matches!(self, Self::Conflicts)
    }
}

impl fmt::Display for TransactionAttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TransactionAttribute {
    HighPriority,
    OracleResponse {
        id: u64,
        code: OracleResponseCode,
        #[serde(with = "crate::json::base64_bytes")]
        result: Vec<u8>,
    },
    NotValidBefore {
        height: u32,
    },
    Conflicts {
        hash: UInt256,
    },
    NotaryAssisted {
        #[serde(rename = "nkeys")]
        n_keys: u8,
    },
}

impl TransactionAttribute {
    pub fn attribute_type(&self) -> TransactionAttributeType {
        match self {
            Self::HighPriority => TransactionAttributeType::HighPriority,
            Self::OracleResponse { .. } => TransactionAttributeType::OracleResponse,
            Self::NotValidBefore { .. } => TransactionAttributeType::NotValidBefore,
            Self::Conflicts { .. } => TransactionAttributeType::Conflicts,
            Self::NotaryAssisted { .. } => TransactionAttributeType::NotaryAssisted,
        }
    }

    pub fn allow_multiple(&self) -> bool {
        self.attribute_type().allow_multiple()
    }

    /// Checks the attribute's own fields.
    pub fn validate(&self) -> Result<(), String> {
        if let Self::OracleResponse { code, result, .. } = self {
            if result.len() > MAX_ORACLE_RESULT_SIZE {
                return Err(format!("oracle result of {} bytes is too large", result.len()));
            }
            if !code.is_success() && !result.is_empty() {
                return Err(format!("oracle response {code} must not carry a result"));
            }
        }
        Ok(())
    }
}

impl Serializable for TransactionAttribute {
    fn size(&self) -> usize {
        1 + match self {
            Self::HighPriority => 0,
            Self::OracleResponse { result, .. } => 8 + 1 + get_var_size_bytes(result),
            Self::NotValidBefore { .. } => 4,
            Self::Conflicts { .. } => 32,
            Self::NotaryAssisted { .. } => 1,
        }
    }

    fn serialize(&self, writer: &mut BinaryWriter) -> IoResult<()> {
        writer.write_u8(self.attribute_type() as u8);
        match self {
            Self::HighPriority => {}
            Self::OracleResponse { id, code, result } => {
                writer.write_u64(*id);
                writer.write_u8(*code as u8);
                writer.write_var_bytes(result);
            }
            Self::NotValidBefore { height } => writer.write_u32(*height),
            Self::Conflicts { hash } => writer.write_serializable(hash)?,
            Self::NotaryAssisted { n_keys } => writer.write_u8(*n_keys),
        }
        Ok(())
    }

    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self> {
        let tag = reader.read_u8()?;
        let kind = TransactionAttributeType::from_byte(tag).ok_or_else(|| {
            IoError::invalid_data(format!("unknown transaction attribute 0x{tag:02x}"))
        })?;
        let attribute = match kind {
            TransactionAttributeType::HighPriority => Self::HighPriority,
            TransactionAttributeType::OracleResponse => Self::OracleResponse {
                id: reader.read_u64()?,
                code: reader.read_serializable()?,
                result: reader.read_var_bytes(MAX_ORACLE_RESULT_SIZE)?.to_vec(),
            },
            TransactionAttributeType::NotValidBefore => Self::NotValidBefore {
                height: reader.read_u32()?,
            },
            TransactionAttributeType::Conflicts => Self::Conflicts {
                hash: reader.read_serializable()?,
            },
            TransactionAttributeType::NotaryAssisted => Self::NotaryAssisted {
                n_keys: reader.read_u8()?,
            },
        };
        attribute.validate().map_err(IoError::invalid_data)?;
        Ok(attribute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_forms() {
        assert_eq!(TransactionAttribute::HighPriority.to_array().unwrap(), vec![0x01]);
        let nvb = TransactionAttribute::NotValidBefore { height: 0x0102 };
        assert_eq!(nvb.to_array().unwrap(), vec![0x20, 0x02, 0x01, 0x00, 0x00]);

        let oracle = TransactionAttribute::OracleResponse {
            id: 7,
            code: OracleResponseCode::Success,
            result: b"ok".to_vec(),
        };
        let bytes = oracle.to_array().unwrap();
        assert_eq!(bytes.len(), oracle.size());
        assert_eq!(TransactionAttribute::from_array(&bytes).unwrap(), oracle);
    }

    #[test]
    fn test_failed_oracle_response_has_no_result() {
        let bad = TransactionAttribute::OracleResponse {
            id: 1,
            code: OracleResponseCode::Timeout,
            result: vec![1],
        };
        assert!(bad.validate().is_err());
        let bytes = bad.to_array().unwrap();
        assert!(TransactionAttribute::from_array(&bytes).is_err());
    }

    #[test]
    fn test_only_conflicts_repeat() {
        assert!(TransactionAttributeType::Conflicts.allow_multiple());
        assert!(!TransactionAttributeType::HighPriority.allow_multiple());
        assert!(!TransactionAttributeType::NotValidBefore.allow_multiple());
    }

    #[test]
    fn test_unknown_type_rejected() {
        assert!(TransactionAttribute::from_array(&[0x02]).is_err());
    }

    #[test]
    fn test_json_tagging() {
        let json = serde_json::to_value(TransactionAttribute::NotaryAssisted { n_keys: 3 }).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "NotaryAssisted", "nkeys": 3 }));
    }
}
