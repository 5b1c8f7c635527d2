//! Witness rules: boolean conditions deciding where a signer's witness applies.

use neo_crypto::ECPoint;
use neo_io::{BinaryWriter, IoError, IoResult, MemoryReader, Serializable};
use neo_primitives::UInt160;
use serde::{Deserialize, Serialize};

/// Deepest nesting of composite conditions a rule may contain.
pub const MAX_NESTING_DEPTH: usize = 2;
/// Most sub-conditions a composite condition may hold.
pub const MAX_SUBITEMS: usize = 16;

/// Wire tags of [`WitnessCondition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WitnessConditionType {
    Boolean = 0x00,
    Not = 0x01,
    And = 0x02,
    Or = 0x03,
    ScriptHash = 0x18,
    Group = 0x19,
    CalledByEntry = 0x20,
    CalledByContract = 0x28,
    CalledByGroup = 0x29,
}

impl WitnessConditionType {
    pub fn from_byte(value: u8) -> Option<Self> {
        Some(match value {
            0x00 => Self::Boolean,
            0x01 => Self::Not,
            0x02 => Self::And,
            0x03 => Self::Or,
            0x18 => Self::ScriptHash,
            0x19 => Self::Group,
            0x20 => Self::CalledByEntry,
            0x28 => Self::CalledByContract,
            0x29 => Self::CalledByGroup,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WitnessCondition {
    Boolean { expression: bool },
    Not { expression: Box<WitnessCondition> },
    And { expressions: Vec<WitnessCondition> },
    Or { expressions: Vec<WitnessCondition> },
    ScriptHash { hash: UInt160 },
    Group { group: ECPoint },
    CalledByEntry,
    CalledByContract { hash: UInt160 },
    CalledByGroup { group: ECPoint },
}

impl WitnessCondition {
    pub fn condition_type(&self) -> WitnessConditionType {
        match self {
            Self::Boolean { .. } => WitnessConditionType::Boolean,
            Self::Not { .. } => WitnessConditionType::Not,
            Self::And { .. } => WitnessConditionType::And,
            Self::Or { .. } => WitnessConditionType::Or,
            Self::ScriptHash { .. } => WitnessConditionType::ScriptHash,
            Self::Group { .. } => WitnessConditionType::Group,
            Self::CalledByEntry => WitnessConditionType::CalledByEntry,
            Self::CalledByContract { .. } => WitnessConditionType::CalledByContract,
            Self::CalledByGroup { .. } => WitnessConditionType::CalledByGroup,
        }
    }

    /// Checks nesting depth and sub-condition counts.
    pub fn validate(&self) -> Result<(), String> {
        self.validate_at(MAX_NESTING_DEPTH)
    }

    fn validate_at(&self, depth: usize) -> Result<(), String> {
        let children: &[WitnessCondition] = match self {
            Self::Not { expression } => std::slice::from_ref(expression.as_ref()),
            Self::And { expressions } | Self::Or { expressions } => {
                if expressions.is_empty() || expressions.len() > MAX_SUBITEMS {
                    return Err(format!(
                        "composite condition needs 1..={MAX_SUBITEMS} expressions, has {}",
                        expressions.len()
                    ));
                }
                expressions
            }
            _ => return Ok(()),
        };
        if depth == 0 {
            return Err(format!(
                "conditions nest deeper than {MAX_NESTING_DEPTH} levels"
            ));
        }
        children
            .iter()
            .try_for_each(|child| child.validate_at(depth - 1))
    }

    fn read_list(reader: &mut MemoryReader, depth: usize) -> IoResult<Vec<Self>> {
        let count = reader.read_var_int(MAX_SUBITEMS as u64)? as usize;
        if count == 0 {
            return Err(IoError::invalid_data("empty composite witness condition"));
        }
        (0..count).map(|_| Self::read_at(reader, depth)).collect()
    }

    fn read_at(reader: &mut MemoryReader, depth: usize) -> IoResult<Self> {
        let tag = reader.read_u8()?;
        let kind = WitnessConditionType::from_byte(tag)
            .ok_or_else(|| IoError::invalid_data(format!("unknown witness condition 0x{tag:02x}")))?;
        let composite = matches!(
            kind,
            WitnessConditionType::Not | WitnessConditionType::And | WitnessConditionType::Or
        );
        if composite && depth == 0 {
            return Err(IoError::invalid_data("witness condition nested too deeply"));
        }
        Ok(match kind {
            WitnessConditionType::Boolean => Self::Boolean {
                expression: reader.read_bool()?,
            },
            WitnessConditionType::Not => Self::Not {
                expression: Box::new(Self::read_at(reader, depth - 1)?),
            },
            WitnessConditionType::And => Self::And {
                expressions: Self::read_list(reader, depth - 1)?,
            },
            WitnessConditionType::Or => Self::Or {
                expressions: Self::read_list(reader, depth - 1)?,
            },
            WitnessConditionType::ScriptHash => Self::ScriptHash {
                hash: reader.read_serializable()?,
            },
            WitnessConditionType::Group => Self::Group {
                group: reader.read_serializable()?,
            },
            WitnessConditionType::CalledByEntry => Self::CalledByEntry,
            WitnessConditionType::CalledByContract => Self::CalledByContract {
                hash: reader.read_serializable()?,
            },
            WitnessConditionType::CalledByGroup => Self::CalledByGroup {
                group: reader.read_serializable()?,
            },
        })
    }
}

impl Serializable for WitnessCondition {
    fn size(&self) -> usize {
        1 + match self {
            Self::Boolean { .. } => 1,
            Self::Not { expression } => expression.size(),
            Self::And { expressions } | Self::Or { expressions } => {
                neo_io::get_var_size_serializable_slice(expressions)
            }
            Self::ScriptHash { .. } | Self::CalledByContract { .. } => 20,
            Self::Group { .. } | Self::CalledByGroup { .. } => neo_io::EC_POINT_COMPRESSED_SIZE,
            Self::CalledByEntry => 0,
        }
    }

    fn serialize(&self, writer: &mut BinaryWriter) -> IoResult<()> {
        writer.write_u8(self.condition_type() as u8);
        match self {
            Self::Boolean { expression } => writer.write_bool(*expression),
            Self::Not { expression } => writer.write_serializable(expression.as_ref())?,
            Self::And { expressions } | Self::Or { expressions } => {
                writer.write_serializable_array(expressions)?
            }
            Self::ScriptHash { hash } | Self::CalledByContract { hash } => {
                writer.write_serializable(hash)?
            }
            Self::Group { group } | Self::CalledByGroup { group } => {
                writer.write_serializable(group)?
            }
            Self::CalledByEntry => {}
        }
        Ok(())
    }

    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self> {
        Self::read_at(reader, MAX_NESTING_DEPTH)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum WitnessRuleAction {
    Deny = 0,
    Allow = 1,
}

/// An action applied when its condition holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WitnessRule {
    pub action: WitnessRuleAction,
    pub condition: WitnessCondition,
}

impl WitnessRule {
    pub fn allow(condition: WitnessCondition) -> Self {
        Self {
            action: WitnessRuleAction::Allow,
            condition,
        }
    }

    pub fn deny(condition: WitnessCondition) -> Self {
        Self {
            action: WitnessRuleAction::Deny,
            condition,
        }
    }
}

impl Serializable for WitnessRule {
    fn size(&self) -> usize {
        1 + self.condition.size()
    }

    fn serialize(&self, writer: &mut BinaryWriter) -> IoResult<()> {
        writer.write_u8(self.action as u8);
        writer.write_serializable(&self.condition)
    }

    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self> {
        let action = match reader.read_u8()? {
            0 => WitnessRuleAction::Deny,
            1 => WitnessRuleAction::Allow,
            other => {
                return Err(IoError::invalid_data(format!(
                    "unknown witness rule action {other}"
                )))
            }
        };
        Ok(Self {
            action,
            condition: reader.read_serializable()?,
        })
    }
}
