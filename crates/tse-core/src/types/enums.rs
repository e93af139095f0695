//! Enumerations used throughout the TSE option data system.

use serde::{Deserialize, Serialize};

use crate::error::TseError;

/// Side of a single option contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Tag written into the `option_type` column of the long table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Call => "call",
            Self::Put => "put",
        }
    }
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OptionType {
    type Err = TseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "call" => Ok(Self::Call),
            "put" => Ok(Self::Put),
            other => Err(TseError::InvalidParameter(format!("unknown option type: {other}"))),
        }
    }
}

/// Option-type filter for chain views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionFilter {
    Call,
    Put,
    #[default]
    Both,
}

impl OptionFilter {
    pub fn accepts(&self, option_type: OptionType) -> bool {
        match self {
            Self::Call => option_type == OptionType::Call,
            Self::Put => option_type == OptionType::Put,
            Self::Both => true,
        }
    }
}

impl std::str::FromStr for OptionFilter {
    type Err = TseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "both" => Ok(Self::Both),
            other => other.parse::<OptionType>().map(|t| match t {
                OptionType::Call => Self::Call,
                OptionType::Put => Self::Put,
            }),
        }
    }
}
