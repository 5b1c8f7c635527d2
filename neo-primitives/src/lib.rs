//! # Neo Primitives
//!
//! Fundamental value types shared by every other crate in the workspace:
//!
//! - [`UInt160`]: script hashes and the addresses derived from them
//! - [`UInt256`]: transaction hashes
//! - [`WitnessScope`] / [`WitnessScopes`]: signer authorization breadth
//! - [`ContractParameterType`] and [`OracleResponseCode`] tags
//!
//! ## Example
//!
//! ```rust
//! use neo_primitives::{UInt160, WitnessScope, WitnessScopes};
//!
//! let hash = UInt160::parse("0x0000000000000000000000000000000000000001").unwrap();
//! assert!(!hash.is_zero());
//!
//! let scopes = WitnessScopes::from_scopes(&[WitnessScope::CalledByEntry]).unwrap();
//! assert_eq!(scopes.to_string(), "CalledByEntry");
//! ```

pub mod constants;
pub mod contract_parameter_type;
pub mod error;
pub mod oracle_response_code;
pub mod uint160;
pub mod uint256;
pub mod witness_scope;

pub use constants::*;
pub use contract_parameter_type::ContractParameterType;
pub use error::{PrimitiveError, PrimitiveResult};
pub use oracle_response_code::OracleResponseCode;
pub use uint160::{UInt160, UINT160_SIZE};
pub use uint256::{UInt256, UINT256_SIZE};
pub use witness_scope::{InvalidWitnessScopeError, WitnessScope, WitnessScopes};
