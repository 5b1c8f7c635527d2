//! Network type and magic numbers.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// MainNet magic, `"NEO3"` read little-endian.
pub const MAINNET_MAGIC: u32 = 860_833_102;
/// TestNet (T5) magic.
pub const TESTNET_MAGIC: u32 = 894_710_606;

/// Neo network type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    #[default]
    MainNet,
    TestNet,
    /// Private/local network with its own magic
    Private,
}

impl NetworkType {
    /// Magic of a public network; `None` for private networks.
    #[must_use]
    pub const fn magic(&self) -> Option<u32> {
        match self {
            Self::MainNet => Some(MAINNET_MAGIC),
            Self::TestNet => Some(TESTNET_MAGIC),
            Self::Private => None,
        }
    }

    /// Classifies a magic number.
    #[must_use]
    pub const fn from_magic(magic: u32) -> Self {
        match magic {
            MAINNET_MAGIC => Self::MainNet,
            TESTNET_MAGIC => Self::TestNet,
            _ => Self::Private,
        }
    }
}

impl std::str::FromStr for NetworkType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mainnet" | "main" => Ok(Self::MainNet),
            "testnet" | "test" => Ok(Self::TestNet),
            "private" | "local" => Ok(Self::Private),
            _ => Err(ConfigError::UnknownNetwork(s.to_owned())),
        }
    }
}

impl std::fmt::Display for NetworkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MainNet => write!(f, "mainnet"),
            Self::TestNet => write!(f, "testnet"),
            Self::Private => write!(f, "private"),
        }
    }
}
