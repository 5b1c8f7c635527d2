use crate::error::{ContractError, ContractResult};
use crate::nef::METHOD_NAME_MAX;
use neo_io::{get_var_size_str, BinaryWriter, IoError, IoResult, MemoryReader, Serializable};
use neo_primitives::UInt160;
use neo_vm::CallFlags;
use serde::{Deserialize, Serialize};

/// A static call from the script into another contract's method.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMethodToken")]
pub struct MethodToken {
    pub hash: UInt160,
    pub method: String,
    #[serde(rename = "paramcount")]
    pub parameters_count: u16,
    #[serde(rename = "hasreturnvalue")]
    pub has_return_value: bool,
    #[serde(rename = "callflags")]
    pub call_flags: CallFlags,
}

#[derive(Deserialize)]
struct RawMethodToken {
    hash: UInt160,
    method: String,
    paramcount: u16,
    hasreturnvalue: bool,
    callflags: CallFlags,
}

impl TryFrom<RawMethodToken> for MethodToken {
    type Error = ContractError;

    fn try_from(raw: RawMethodToken) -> ContractResult<Self> {
        Self::new(
            raw.hash,
            raw.method,
            raw.paramcount,
            raw.hasreturnvalue,
            raw.callflags,
        )
    }
}

impl MethodToken {
    pub fn new(
        hash: UInt160,
        method: impl Into<String>,
        parameters_count: u16,
        has_return_value: bool,
        call_flags: CallFlags,
    ) -> ContractResult<Self> {
        let token = Self {
            hash,
            method: method.into(),
            parameters_count,
            has_return_value,
            call_flags,
        };
        token.validate()?;
        Ok(token)
    }

    /// Checks the hash, method name and flags.
    pub fn validate(&self) -> ContractResult<()> {
        if self.hash.is_zero() {
            return Err(ContractError::invalid_nef("token hash", "must not be zero"));
        }
        validate_method_name(&self.method)?;
        if CallFlags::from_bits(self.call_flags.bits()).is_none() {
            return Err(ContractError::invalid_nef(
                "token call flags",
                format!("undefined bits 0x{:02x}", self.call_flags.bits()),
            ));
        }
        Ok(())
    }
}

pub(crate) fn validate_method_name(method: &str) -> ContractResult<()> {
    if method.is_empty() {
        return Err(ContractError::invalid_nef("token method", "must not be empty"));
    }
    if method.len() > METHOD_NAME_MAX {
        return Err(ContractError::invalid_nef(
            "token method",
            format!("{} bytes exceeds {METHOD_NAME_MAX}", method.len()),
        ));
    }
    if method.starts_with('_') {
        return Err(ContractError::invalid_nef(
            "token method",
            format!("'{method}' must not start with '_'"),
        ));
    }
    Ok(())
}

impl Serializable for MethodToken {
    fn size(&self) -> usize {
        20 + get_var_size_str(&self.method) + 2 + 1 + 1
    }

    fn serialize(&self, writer: &mut BinaryWriter) -> IoResult<()> {
        writer.write_serializable(&self.hash)?;
        writer.write_var_string(&self.method);
        writer.write_u16(self.parameters_count);
        writer.write_bool(self.has_return_value);
        writer.write_u8(self.call_flags.bits());
        Ok(())
    }

    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self> {
        let hash: UInt160 = reader.read_serializable()?;
        let method = reader.read_var_string(METHOD_NAME_MAX)?;
        let parameters_count = reader.read_u16()?;
        let has_return_value = reader.read_bool()?;
        let call_flags: CallFlags = reader.read_serializable()?;
        Self::new(hash, method, parameters_count, has_return_value, call_flags)
            .map_err(|e| IoError::invalid_data(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash() -> UInt160 {
        UInt160::from([0x42u8; 20])
    }

    #[test]
    fn test_method_name_rules() {
        assert!(MethodToken::new(hash(), "transfer", 4, true, CallFlags::ALL).is_ok());
        assert!(MethodToken::new(hash(), "", 0, false, CallFlags::ALL).is_err());
        assert!(MethodToken::new(hash(), "_deploy", 2, false, CallFlags::ALL).is_err());
        assert!(MethodToken::new(hash(), "m".repeat(33), 0, false, CallFlags::ALL).is_err());
        assert!(MethodToken::new(UInt160::zero(), "transfer", 4, true, CallFlags::ALL).is_err());
    }

    #[test]
    fn test_wire_layout() {
        let token = MethodToken::new(hash(), "symbol", 0, true, CallFlags::READ_ONLY).unwrap();
        let bytes = token.to_array().unwrap();
        assert_eq!(bytes.len(), token.size());
        assert_eq!(&bytes[20..27], b"\x06symbol");
        assert_eq!(&bytes[27..], &[0x00, 0x00, 0x01, 0x05]);
        assert_eq!(MethodToken::from_array(&bytes).unwrap(), token);
    }

    #[test]
    fn test_json_field_names() {
        let token = MethodToken::new(hash(), "symbol", 0, true, CallFlags::ALL).unwrap();
        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json["paramcount"], 0);
        assert_eq!(json["hasreturnvalue"], true);
        assert_eq!(json["callflags"], 15);
        let back: MethodToken = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(back, token);

        let mut bad = json;
        bad["method"] = "_init".into();
        assert!(serde_json::from_value::<MethodToken>(bad).is_err());
    }
}
