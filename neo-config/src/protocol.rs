//! Protocol settings that shape a transaction on the wire.

use crate::error::{ConfigError, ConfigResult};
use crate::network::{NetworkType, MAINNET_MAGIC, TESTNET_MAGIC};
use serde::{Deserialize, Serialize};

/// Neo N3 protocol settings relevant to building transactions.
///
/// These must match the target network or nodes will reject the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolSettings {
    /// Network identifier (magic number), mixed into every signature
    pub network: u32,

    /// Address version byte for address encoding
    #[serde(default = "default_address_version")]
    pub address_version: u8,

    /// Milliseconds per block
    #[serde(default = "default_ms_per_block")]
    pub ms_per_block: u64,

    /// How far past the current height a transaction may stay valid
    #[serde(default = "default_max_valid_until_block_increment")]
    pub max_valid_until_block_increment: u32,

    /// Largest serialized transaction accepted, in bytes
    #[serde(default = "default_max_transaction_size")]
    pub max_transaction_size: usize,

    /// Cap on signers plus attributes
    #[serde(default = "default_max_transaction_attributes")]
    pub max_transaction_attributes: usize,
}

fn default_address_version() -> u8 {
    0x35 // 'N' prefix for Neo addresses
}

fn default_ms_per_block() -> u64 {
    15000
}

fn default_max_valid_until_block_increment() -> u32 {
    5760 // ~24 hours at 15 sec/block
}

/// Largest transaction any N3 node decodes.
pub const PROTOCOL_MAX_TRANSACTION_SIZE: usize = 102_400;

/// Most signers plus attributes any N3 node decodes.
pub const PROTOCOL_MAX_TRANSACTION_ATTRIBUTES: usize = 16;

fn default_max_transaction_size() -> usize {
    PROTOCOL_MAX_TRANSACTION_SIZE
}

fn default_max_transaction_attributes() -> usize {
    PROTOCOL_MAX_TRANSACTION_ATTRIBUTES
}

impl Default for ProtocolSettings {
    fn default() -> Self {
        Self::mainnet()
    }
}

impl ProtocolSettings {
    /// MainNet protocol settings
    pub fn mainnet() -> Self {
        Self::private(MAINNET_MAGIC)
    }

    /// TestNet protocol settings
    pub fn testnet() -> Self {
        Self::private(TESTNET_MAGIC)
    }

    /// Settings for a network identified only by its magic
    pub fn private(network_magic: u32) -> Self {
        Self {
            network: network_magic,
            address_version: default_address_version(),
            ms_per_block: default_ms_per_block(),
            max_valid_until_block_increment: default_max_valid_until_block_increment(),
            max_transaction_size: default_max_transaction_size(),
            max_transaction_attributes: default_max_transaction_attributes(),
        }
    }

    pub fn network_type(&self) -> NetworkType {
        NetworkType::from_magic(self.network)
    }

    /// Calculate time span for a given number of blocks
    pub fn time_per_block(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.ms_per_block)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.ms_per_block == 0 {
            return Err(ConfigError::invalid("ms_per_block", "must be positive"));
        }
        if self.max_valid_until_block_increment == 0 {
            return Err(ConfigError::invalid(
                "max_valid_until_block_increment",
                "must be positive",
            ));
        }
        if self.max_transaction_attributes == 0 {
            return Err(ConfigError::invalid(
                "max_transaction_attributes",
                "must allow at least one signer",
            ));
        }
        if self.max_transaction_attributes > PROTOCOL_MAX_TRANSACTION_ATTRIBUTES {
            return Err(ConfigError::invalid(
                "max_transaction_attributes",
                format!("must not exceed {PROTOCOL_MAX_TRANSACTION_ATTRIBUTES}"),
            ));
        }
        if self.max_transaction_size == 0 {
            return Err(ConfigError::invalid("max_transaction_size", "must be positive"));
        }
        if self.max_transaction_size > PROTOCOL_MAX_TRANSACTION_SIZE {
            return Err(ConfigError::invalid(
                "max_transaction_size",
                format!("must not exceed {PROTOCOL_MAX_TRANSACTION_SIZE} bytes"),
            ));
        }
        Ok(())
    }
}
