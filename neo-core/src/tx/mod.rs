//! Transaction model: signers, witness rules, attributes, witnesses and the
//! transaction itself.

pub mod attribute;
pub mod signer;
pub mod transaction;
pub mod witness;
pub mod witness_rule;

pub use attribute::{TransactionAttribute, TransactionAttributeType};
pub use signer::Signer;
pub use transaction::{
    Transaction, WitnessVerification, HEADER_SIZE, MAX_TRANSACTION_ATTRIBUTES,
    MAX_TRANSACTION_SIZE,
};
pub use witness::Witness;
pub use witness_rule::{WitnessCondition, WitnessConditionType, WitnessRule, WitnessRuleAction};
