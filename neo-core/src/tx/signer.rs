//! Transaction signers and the reach of their witnesses.

use super::witness_rule::{WitnessCondition, WitnessRule};
use neo_crypto::ECPoint;
use neo_io::{
    get_var_size_serializable_slice, BinaryWriter, IoError, IoResult, MemoryReader, Serializable,
};
use neo_primitives::{UInt160, WitnessScope, WitnessScopes};
use serde::{Deserialize, Serialize};

/// Most entries any of a signer's lists may hold.
pub const MAX_SUBITEMS: usize = 16;

/// An account authorizing a transaction, and where its witness is valid.
///
/// Each list is present exactly when its scope flag is set:
/// `allowed_contracts` with `CustomContracts`, `allowed_groups` with
/// `CustomGroups` and `rules` with `WitnessRules`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSigner", into = "RawSigner")]
pub struct Signer {
    pub account: UInt160,
    pub scopes: WitnessScopes,
    pub allowed_contracts: Vec<UInt160>,
    pub allowed_groups: Vec<ECPoint>,
    pub rules: Vec<WitnessRule>,
}

impl Signer {
    pub fn new(account: UInt160, scopes: WitnessScopes) -> Self {
        Self {
            account,
            scopes,
            allowed_contracts: Vec::new(),
            allowed_groups: Vec::new(),
            rules: Vec::new(),
        }
    }

    pub fn called_by_entry(account: UInt160) -> Self {
        Self::new(account, WitnessScopes::CALLED_BY_ENTRY)
    }

    pub fn global(account: UInt160) -> Self {
        Self::new(account, WitnessScopes::GLOBAL)
    }

    /// A fee-only signer whose witness is valid in no contract.
    pub fn none(account: UInt160) -> Self {
        Self::new(account, WitnessScopes::NONE)
    }

    /// Adds `contract` and the `CustomContracts` flag.
    pub fn with_allowed_contract(
        mut self,
        contract: UInt160,
    ) -> Result<Self, neo_primitives::InvalidWitnessScopeError> {
        self.scopes = self.scopes.with(WitnessScope::CustomContracts)?;
        self.allowed_contracts.push(contract);
        Ok(self)
    }

    /// Adds `group` and the `CustomGroups` flag.
    pub fn with_allowed_group(
        mut self,
        group: ECPoint,
    ) -> Result<Self, neo_primitives::InvalidWitnessScopeError> {
        self.scopes = self.scopes.with(WitnessScope::CustomGroups)?;
        self.allowed_groups.push(group);
        Ok(self)
    }

    /// Adds `rule` and the `WitnessRules` flag.
    pub fn with_rule(
        mut self,
        rule: WitnessRule,
    ) -> Result<Self, neo_primitives::InvalidWitnessScopeError> {
        self.scopes = self.scopes.with(WitnessScope::WitnessRules)?;
        self.rules.push(rule);
        Ok(self)
    }

    /// Checks that every list agrees with its scope flag and stays in bounds.
    pub fn validate(&self) -> Result<(), String> {
        check_list(
            "allowed contracts",
            self.scopes.contains(WitnessScope::CustomContracts),
            self.allowed_contracts.len(),
        )?;
        check_list(
            "allowed groups",
            self.scopes.contains(WitnessScope::CustomGroups),
            self.allowed_groups.len(),
        )?;
        check_list(
            "rules",
            self.scopes.contains(WitnessScope::WitnessRules),
            self.rules.len(),
        )?;
        self.rules
            .iter()
            .try_for_each(|rule| rule.condition.validate())
    }

    /// The signer's scopes expressed as witness rules, in evaluation order.
    pub fn all_rules(&self) -> Vec<WitnessRule> {
        if self.scopes.is_global() {
            return vec![WitnessRule::allow(WitnessCondition::Boolean { expression: true })];
        }
        let mut rules = Vec::new();
        if self.scopes.contains(WitnessScope::CalledByEntry) {
            rules.push(WitnessRule::allow(WitnessCondition::CalledByEntry));
        }
        rules.extend(
            self.allowed_contracts
                .iter()
                .map(|hash| WitnessRule::allow(WitnessCondition::ScriptHash { hash: *hash })),
        );
        rules.extend(self.allowed_groups.iter().map(|group| {
            WitnessRule::allow(WitnessCondition::Group {
                group: group.clone(),
            })
        }));
        rules.extend(self.rules.iter().cloned());
        rules
    }
}

fn check_list(name: &str, flagged: bool, len: usize) -> Result<(), String> {
    match (flagged, len) {
        (true, 0) => Err(format!("scope requires non-empty {name}")),
        (false, n) if n > 0 => Err(format!("{name} given without their scope flag")),
        (_, n) if n > MAX_SUBITEMS => Err(format!("{n} {name} exceed the limit of {MAX_SUBITEMS}")),
        _ => Ok(()),
    }
}

impl Serializable for Signer {
    fn size(&self) -> usize {
        let mut size = UInt160::LENGTH + 1;
        if self.scopes.contains(WitnessScope::CustomContracts) {
            size += get_var_size_serializable_slice(&self.allowed_contracts);
        }
        if self.scopes.contains(WitnessScope::CustomGroups) {
            size += get_var_size_serializable_slice(&self.allowed_groups);
        }
        if self.scopes.contains(WitnessScope::WitnessRules) {
            size += get_var_size_serializable_slice(&self.rules);
        }
        size
    }

    fn serialize(&self, writer: &mut BinaryWriter) -> IoResult<()> {
        writer.write_serializable(&self.account)?;
        writer.write_serializable(&self.scopes)?;
        if self.scopes.contains(WitnessScope::CustomContracts) {
            writer.write_serializable_array(&self.allowed_contracts)?;
        }
        if self.scopes.contains(WitnessScope::CustomGroups) {
            writer.write_serializable_array(&self.allowed_groups)?;
        }
        if self.scopes.contains(WitnessScope::WitnessRules) {
            writer.write_serializable_array(&self.rules)?;
        }
        Ok(())
    }

    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self> {
        let account = reader.read_serializable()?;
        let scopes: WitnessScopes = reader.read_serializable()?;
        let mut signer = Self::new(account, scopes);
        if scopes.contains(WitnessScope::CustomContracts) {
            signer.allowed_contracts = reader.read_serializable_array(MAX_SUBITEMS)?;
        }
        if scopes.contains(WitnessScope::CustomGroups) {
            signer.allowed_groups = reader.read_serializable_array(MAX_SUBITEMS)?;
        }
        if scopes.contains(WitnessScope::WitnessRules) {
            signer.rules = reader.read_serializable_array(MAX_SUBITEMS)?;
        }
        signer.validate().map_err(IoError::invalid_data)?;
        Ok(signer)
    }
}

#[derive(Serialize, Deserialize)]
struct RawSigner {
    account: UInt160,
    scopes: WitnessScopes,
    #[serde(rename = "allowedcontracts", default, skip_serializing_if = "Vec::is_empty")]
    allowed_contracts: Vec<UInt160>,
    #[serde(rename = "allowedgroups", default, skip_serializing_if = "Vec::is_empty")]
    allowed_groups: Vec<ECPoint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    rules: Vec<WitnessRule>,
}

impl TryFrom<RawSigner> for Signer {
    type Error = String;

    fn try_from(raw: RawSigner) -> Result<Self, Self::Error> {
        let signer = Signer {
            account: raw.account,
            scopes: raw.scopes,
            allowed_contracts: raw.allowed_contracts,
            allowed_groups: raw.allowed_groups,
            rules: raw.rules,
        };
        signer.validate()?;
        Ok(signer)
    }
}

impl From<Signer> for RawSigner {
    fn from(signer: Signer) -> Self {
        RawSigner {
            account: signer.account,
            scopes: signer.scopes,
            allowed_contracts: signer.allowed_contracts,
            allowed_groups: signer.allowed_groups,
            rules: signer.rules,
        }
    }
}
