//! Typed arguments for contract invocations.

use neo_crypto::ECPoint;
use neo_primitives::{ContractParameterType, UInt160, UInt256};
use num_bigint::BigInt;

/// A value passed to a contract method.
///
/// Maps keep their entries as pairs so the emitted script is deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractParameter {
    Any,
    Boolean(bool),
    Integer(BigInt),
    ByteArray(Vec<u8>),
    String(String),
    Hash160(UInt160),
    Hash256(UInt256),
    PublicKey(ECPoint),
    Signature(Vec<u8>),
    Array(Vec<ContractParameter>),
    Map(Vec<(ContractParameter, ContractParameter)>),
}

impl ContractParameter {
    pub fn param_type(&self) -> ContractParameterType {
        match self {
            Self::Any => ContractParameterType::Any,
            Self::Boolean(_) => ContractParameterType::Boolean,
            Self::Integer(_) => ContractParameterType::Integer,
            Self::ByteArray(_) => ContractParameterType::ByteArray,
            Self::String(_) => ContractParameterType::String,
            Self::Hash160(_) => ContractParameterType::Hash160,
            Self::Hash256(_) => ContractParameterType::Hash256,
            Self::PublicKey(_) => ContractParameterType::PublicKey,
            Self::Signature(_) => ContractParameterType::Signature,
            Self::Array(_) => ContractParameterType::Array,
            Self::Map(_) => ContractParameterType::Map,
        }
    }

    pub fn integer(value: impl Into<BigInt>) -> Self {
        Self::Integer(value.into())
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }
}

impl From<bool> for ContractParameter {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for ContractParameter {
    fn from(value: i64) -> Self {
        Self::Integer(value.into())
    }
}

impl From<BigInt> for ContractParameter {
    fn from(value: BigInt) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for ContractParameter {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for ContractParameter {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<u8>> for ContractParameter {
    fn from(value: Vec<u8>) -> Self {
        Self::ByteArray(value)
    }
}

impl From<UInt160> for ContractParameter {
    fn from(value: UInt160) -> Self {
        Self::Hash160(value)
    }
}

impl From<UInt256> for ContractParameter {
    fn from(value: UInt256) -> Self {
        Self::Hash256(value)
    }
}

impl From<ECPoint> for ContractParameter {
    fn from(value: ECPoint) -> Self {
        Self::PublicKey(value)
    }
}

impl From<Vec<ContractParameter>> for ContractParameter {
    fn from(value: Vec<ContractParameter>) -> Self {
        Self::Array(value)
    }
}
