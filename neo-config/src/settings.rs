//! The combined settings a transaction assembler runs with.

use crate::error::{ConfigError, ConfigResult};
use crate::policy::PolicySettings;
use crate::protocol::ProtocolSettings;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Protocol and policy settings, loaded together.
///
/// ```toml
/// [protocol]
/// network = 894710606
/// max_valid_until_block_increment = 5760
///
/// [policy]
/// fee_per_byte = 1000
/// exec_fee_factor = 30
/// ```
///
/// Missing sections fall back to MainNet values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblerSettings {
    #[serde(default)]
    pub protocol: ProtocolSettings,
    #[serde(default)]
    pub policy: PolicySettings,
}

impl AssemblerSettings {
    pub fn mainnet() -> Self {
        Self {
            protocol: ProtocolSettings::mainnet(),
            policy: PolicySettings::default(),
        }
    }

    pub fn testnet() -> Self {
        Self {
            protocol: ProtocolSettings::testnet(),
            policy: PolicySettings::default(),
        }
    }

    /// Parses and validates TOML text.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let settings: Self = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml_str(&text)?;
        info!(
            path = %path.display(),
            network = settings.protocol.network,
            "loaded assembler settings"
        );
        Ok(settings)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.protocol.validate()?;
        self.policy.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_is_mainnet() {
        assert_eq!(
            AssemblerSettings::from_toml_str("").unwrap(),
            AssemblerSettings::mainnet()
        );
    }

    #[test]
    fn test_partial_sections_use_defaults() {
        let settings = AssemblerSettings::from_toml_str(
            "[protocol]\nnetwork = 894710606\n\n[policy]\nfee_per_byte = 2000\n",
        )
        .unwrap();
        assert_eq!(settings.protocol, ProtocolSettings::testnet());
        assert_eq!(settings.policy.fee_per_byte, 2000);
        assert_eq!(settings.policy.exec_fee_factor, 30);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            AssemblerSettings::from_toml_str("[policy]\nexec_fee_factor = 0\n"),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            AssemblerSettings::from_toml_str("[protocol]\nnetwork = \"x\"\n"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            AssemblerSettings::from_toml_str("[protocol]\naddress_version = 53\n"),
            Err(ConfigError::Parse(_))
        ));
    }
}
