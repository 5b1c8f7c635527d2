//! Fee policy values, normally mirrored from the chain's policy contract.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// Prices used when estimating the network fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicySettings {
    /// Datoshi charged per serialized byte
    #[serde(default = "default_fee_per_byte")]
    pub fee_per_byte: i64,

    /// Multiplier applied to opcode prices
    #[serde(default = "default_exec_fee_factor")]
    pub exec_fee_factor: u32,
}

fn default_fee_per_byte() -> i64 {
    1000
}

fn default_exec_fee_factor() -> u32 {
    30
}

impl Default for PolicySettings {
    fn default() -> Self {
        Self {
            fee_per_byte: default_fee_per_byte(),
            exec_fee_factor: default_exec_fee_factor(),
        }
    }
}

impl PolicySettings {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.fee_per_byte < 0 {
            return Err(ConfigError::invalid("fee_per_byte", "must not be negative"));
        }
        if self.exec_fee_factor == 0 {
            return Err(ConfigError::invalid("exec_fee_factor", "must be positive"));
        }
        Ok(())
    }
}
