//! Type tags for contract invocation parameters.

use crate::error::PrimitiveError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Type of a contract parameter, as named in manifests and RPC payloads.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContractParameterType {
    #[default]
    Any = 0x00,
    Boolean = 0x10,
    Integer = 0x11,
    ByteArray = 0x12,
    String = 0x13,
    Hash160 = 0x14,
    Hash256 = 0x15,
    PublicKey = 0x16,
    Signature = 0x17,
    Array = 0x20,
    Map = 0x22,
    InteropInterface = 0x30,
    /// Only valid as a return type.
    Void = 0xff,
}

impl ContractParameterType {
    const ALL: [ContractParameterType; 13] = [
        Self::Any,
        Self::Boolean,
        Self::Integer,
        Self::ByteArray,
        Self::String,
        Self::Hash160,
        Self::Hash256,
        Self::PublicKey,
        Self::Signature,
        Self::Array,
        Self::Map,
        Self::InteropInterface,
        Self::Void,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Any => "Any",
            Self::Boolean => "Boolean",
            Self::Integer => "Integer",
            Self::ByteArray => "ByteArray",
            Self::String => "String",
            Self::Hash160 => "Hash160",
            Self::Hash256 => "Hash256",
            Self::PublicKey => "PublicKey",
            Self::Signature => "Signature",
            Self::Array => "Array",
            Self::Map => "Map",
            Self::InteropInterface => "InteropInterface",
            Self::Void => "Void",
        }
    }
}

impl TryFrom<u8> for ContractParameterType {
    type Error = PrimitiveError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|t| *t as u8 == value)
            .ok_or_else(|| {
                PrimitiveError::invalid_format(format!("unknown parameter type 0x{value:02x}"))
            })
    }
}

impl fmt::Display for ContractParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContractParameterType {
    type Err = PrimitiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| PrimitiveError::invalid_format(format!("unknown parameter type '{s}'")))
    }
}

impl Serialize for ContractParameterType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ContractParameterType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}
