//! # Neo Config
//!
//! Settings that decide how a transaction is assembled for a given network:
//! the [`ProtocolSettings`] every node on the network shares, and the
//! [`PolicySettings`] fee prices. [`AssemblerSettings`] bundles both and
//! loads them from TOML.
//!
//! ## Example
//!
//! ```rust
//! use neo_config::AssemblerSettings;
//!
//! let settings = AssemblerSettings::from_toml_str("[protocol]\nnetwork = 894710606\n").unwrap();
//! assert_eq!(settings.protocol.network, 894710606);
//! assert_eq!(settings.policy.fee_per_byte, 1000);
//! ```

pub mod error;
pub mod network;
pub mod policy;
pub mod protocol;
pub mod settings;

pub use error::{ConfigError, ConfigResult};
pub use network::{NetworkType, MAINNET_MAGIC, TESTNET_MAGIC};
pub use policy::PolicySettings;
pub use protocol::{
    ProtocolSettings, PROTOCOL_MAX_TRANSACTION_ATTRIBUTES, PROTOCOL_MAX_TRANSACTION_SIZE,
};
pub use settings::AssemblerSettings;
