//! Witness scopes: how far a signer's witness reaches into nested contract calls.
//!
//! A scope byte is a bit set over the named [`WitnessScope`] flags. The raw
//! helpers [`combine`], [`extract`] and [`validate`] are pure functions of
//! their input; [`WitnessScopes`] is the validated set type and
//! [`WitnessScopes::from_bits`] is the only way to build one, so a value of
//! that type always satisfies the `Global` exclusivity rule.

use neo_io::{BinaryWriter, IoError, IoResult, MemoryReader, Serializable};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A single witness scope flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum WitnessScope {
    /// No contract was witnessed; the signature only pays fees.
    None = 0x00,
    /// The witness is valid only when the entry script calls the contract directly.
    CalledByEntry = 0x01,
    /// The witness is valid in the listed contracts.
    CustomContracts = 0x10,
    /// The witness is valid in contracts belonging to the listed groups.
    CustomGroups = 0x20,
    /// The witness is valid when the signer's rules allow it.
    WitnessRules = 0x40,
    /// The witness is valid everywhere. Cannot be combined with other flags.
    Global = 0x80,
}

/// Mask of every defined flag bit.
pub const VALID_SCOPE_BITS: u8 = 0x01 | 0x10 | 0x20 | 0x40 | 0x80;

impl WitnessScope {
    /// Named flags in canonical order (every flag except `None`).
    pub const FLAGS: [WitnessScope; 5] = [
        WitnessScope::CalledByEntry,
        WitnessScope::CustomContracts,
        WitnessScope::CustomGroups,
        WitnessScope::WitnessRules,
        WitnessScope::Global,
    ];

    #[inline]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            WitnessScope::None => "None",
            WitnessScope::CalledByEntry => "CalledByEntry",
            WitnessScope::CustomContracts => "CustomContracts",
            WitnessScope::CustomGroups => "CustomGroups",
            WitnessScope::WitnessRules => "WitnessRules",
            WitnessScope::Global => "Global",
        }
    }

    /// Looks up a flag by its exact name.
    pub fn from_name(name: &str) -> Option<Self> {
        std::iter::once(WitnessScope::None)
            .chain(Self::FLAGS)
            .find(|scope| scope.name() == name)
    }
}

impl fmt::Display for WitnessScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reasons a scope byte or scope text is rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidWitnessScopeError {
    #[error("Global scope cannot be combined with other flags (0x{0:02x})")]
    GlobalCombined(u8),

    #[error("undefined witness scope bits 0x{undefined:02x} in 0x{bits:02x}")]
    UndefinedBits { bits: u8, undefined: u8 },

    #[error("unknown witness scope name '{0}'")]
    UnknownName(String),

    #[error("None cannot be combined with other scopes ('{0}')")]
    NoneCombined(String),
}

/// Bitwise OR of all `scopes`.
pub fn combine(scopes: &[WitnessScope]) -> u8 {
    scopes.iter().fold(0u8, |acc, scope| acc | scope.bits())
}

/// Splits a scope byte into its named flags in canonical order.
///
/// Zero yields `[None]`. Undefined bits are ignored here; use [`validate`]
/// to reject them.
pub fn extract(bits: u8) -> Vec<WitnessScope> {
    if bits == WitnessScope::None.bits() {
        return vec![WitnessScope::None];
    }
    WitnessScope::FLAGS
        .into_iter()
        .filter(|scope| bits & scope.bits() != 0)
        .collect()
}

/// Rejects undefined bits and `Global` mixed with any other flag.
pub fn validate(bits: u8) -> Result<(), InvalidWitnessScopeError> {
    let undefined = bits & !VALID_SCOPE_BITS;
    if undefined != 0 {
        return Err(InvalidWitnessScopeError::UndefinedBits { bits, undefined });
    }
    if bits & WitnessScope::Global.bits() != 0 && bits != WitnessScope::Global.bits() {
        return Err(InvalidWitnessScopeError::GlobalCombined(bits));
    }
    Ok(())
}

/// A validated set of witness scope flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WitnessScopes(u8);

impl WitnessScopes {
    pub const NONE: WitnessScopes = WitnessScopes(0x00);
    pub const CALLED_BY_ENTRY: WitnessScopes = WitnessScopes(0x01);
    pub const GLOBAL: WitnessScopes = WitnessScopes(0x80);

    pub fn from_bits(bits: u8) -> Result<Self, InvalidWitnessScopeError> {
        validate(bits)?;
        Ok(Self(bits))
    }

    pub fn from_scopes(scopes: &[WitnessScope]) -> Result<Self, InvalidWitnessScopeError> {
        Self::from_bits(combine(scopes))
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn contains(self, scope: WitnessScope) -> bool {
        match scope {
            WitnessScope::None => self.0 == 0,
            _ => self.0 & scope.bits() != 0,
        }
    }

    #[inline]
    pub const fn is_global(self) -> bool {
        self.0 == WitnessScope::Global as u8
    }

    /// The flags of this set in canonical order.
    pub fn scopes(self) -> Vec<WitnessScope> {
        extract(self.0)
    }

    /// Adds `scope`, re-validating the result.
    pub fn with(self, scope: WitnessScope) -> Result<Self, InvalidWitnessScopeError> {
        Self::from_bits(self.0 | scope.bits())
    }
}

impl From<WitnessScope> for WitnessScopes {
    fn from(scope: WitnessScope) -> Self {
        WitnessScopes(scope.bits())
    }
}

impl TryFrom<u8> for WitnessScopes {
    type Error = InvalidWitnessScopeError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        Self::from_bits(bits)
    }
}

impl fmt::Display for WitnessScopes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.scopes().into_iter().map(WitnessScope::name).collect();
        f.write_str(&names.join(", "))
    }
}

impl FromStr for WitnessScopes {
    type Err = InvalidWitnessScopeError;

    /// Parses `", "`-separated flag names, as printed by `Display`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut scopes = Vec::new();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let scope = WitnessScope::from_name(part)
                .ok_or_else(|| InvalidWitnessScopeError::UnknownName(part.to_owned()))?;
            scopes.push(scope);
        }
        if scopes.len() > 1 && scopes.contains(&WitnessScope::None) {
            return Err(InvalidWitnessScopeError::NoneCombined(s.to_owned()));
        }
        Self::from_scopes(&scopes)
    }
}

impl Serialize for WitnessScopes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WitnessScopes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl Serializable for WitnessScopes {
    fn size(&self) -> usize {
        1
    }

    fn serialize(&self, writer: &mut BinaryWriter) -> IoResult<()> {
        writer.write_u8(self.0);
        Ok(())
    }

    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self> {
        let bits = reader.read_u8()?;
        Self::from_bits(bits).map_err(|e| IoError::invalid_data(e.to_string()))
    }
}
