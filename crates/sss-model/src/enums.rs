//! Type-safe enumerations for Triple-S metadata.
//!
//! Triple-S carries these as attribute strings (`type="single"`,
//! `use="weight"`, `format="literal"`, ...). Parsing them once keeps the
//! generator free of string comparisons.
//!
//! # Triple-S Reference
//!
//! - Variable types and uses: Triple-S XML 2.0, section "variable"
//! - Record formats: Triple-S XML 2.0, section "record"

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Variable type per the Triple-S `type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    /// One code out of a list of values.
    Single,
    /// Multiple-response set, either spread (MC) or bitstring (MD).
    Multiple,
    /// Numeric quantity with an optional range.
    Quantity,
    /// Free character data of a declared size.
    Character,
    /// One column holding 0 or 1.
    Logical,
    /// YYYYMMDD.
    Date,
    /// HHMMSS.
    Time,
}

impl VariableType {
    /// Returns the attribute value as it appears in Triple-S.
    pub fn as_str(&self) -> &'static str {
        match self {
            VariableType::Single => "single",
            VariableType::Multiple => "multiple",
            VariableType::Quantity => "quantity",
            VariableType::Character => "character",
            VariableType::Logical => "logical",
            VariableType::Date => "date",
            VariableType::Time => "time",
        }
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VariableType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" => Ok(VariableType::Single),
            "multiple" => Ok(VariableType::Multiple),
            "quantity" => Ok(VariableType::Quantity),
            "character" => Ok(VariableType::Character),
            "logical" => Ok(VariableType::Logical),
            "date" => Ok(VariableType::Date),
            "time" => Ok(VariableType::Time),
            _ => Err(format!("Unknown variable type: {s}")),
        }
    }
}

/// Special use of a variable (`use` attribute). Defaults to regular.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableUse {
    #[default]
    Regular,
    /// The variable weights the cases.
    Weight,
    /// Case identifier.
    Serial,
    /// Any other value, kept verbatim.
    Other(String),
}

impl VariableUse {
    pub fn as_str(&self) -> &str {
        match self {
            VariableUse::Regular => "regular",
            VariableUse::Weight => "weight",
            VariableUse::Serial => "serial",
            VariableUse::Other(value) => value.as_str(),
        }
    }

    pub fn is_weight(&self) -> bool {
        matches!(self, VariableUse::Weight)
    }
}

impl fmt::Display for VariableUse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for VariableUse {
    fn from(value: &str) -> Self {
        match value.trim() {
            "regular" => VariableUse::Regular,
            "weight" => VariableUse::Weight,
            "serial" => VariableUse::Serial,
            other => VariableUse::Other(other.to_string()),
        }
    }
}

/// Storage format of a variable's codes (`format` attribute). Defaults to numeric.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableFormat {
    #[default]
    Numeric,
    /// Codes are strings and must be quoted in generated syntax.
    Literal,
    /// Any other value, treated like numeric.
    Other(String),
}

impl VariableFormat {
    pub fn as_str(&self) -> &str {
        match self {
            VariableFormat::Numeric => "numeric",
            VariableFormat::Literal => "literal",
            VariableFormat::Other(value) => value.as_str(),
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, VariableFormat::Literal)
    }
}

impl fmt::Display for VariableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for VariableFormat {
    fn from(value: &str) -> Self {
        match value.trim() {
            "numeric" => VariableFormat::Numeric,
            "literal" => VariableFormat::Literal,
            other => VariableFormat::Other(other.to_string()),
        }
    }
}

/// Physical layout of the data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordFormat {
    /// Fixed columns; positions are 1-based start/finish columns.
    #[default]
    Fixed,
    /// Comma separated; positions are 1-based field numbers.
    Csv,
}

impl RecordFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordFormat::Fixed => "fixed",
            RecordFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for RecordFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecordFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fixed" => Ok(RecordFormat::Fixed),
            "csv" => Ok(RecordFormat::Csv),
            _ => Err(format!("Unknown record format: {s}")),
        }
    }
}

/// Sub-kind of a `multiple` variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MultipleKind {
    /// Multiple category: `spread` subfields each holding a value code.
    Category,
    /// Multiple dichotomy: one 0/1 indicator per code, stored as a bitstring.
    Dichotomy,
}

impl MultipleKind {
    /// Short tag used in multiple-response terminology ("MC" / "MD").
    pub fn tag(&self) -> &'static str {
        match self {
            MultipleKind::Category => "MC",
            MultipleKind::Dichotomy => "MD",
        }
    }
}

impl fmt::Display for MultipleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variable_type_round_trips_through_str() {
        for ty in [
            VariableType::Single,
            VariableType::Multiple,
            VariableType::Quantity,
            VariableType::Character,
            VariableType::Logical,
            VariableType::Date,
            VariableType::Time,
        ] {
            assert_eq!(ty.as_str().parse::<VariableType>(), Ok(ty));
        }
    }

    #[test]
    fn variable_type_is_case_insensitive() {
        assert_eq!("Single".parse::<VariableType>(), Ok(VariableType::Single));
        assert!("grid".parse::<VariableType>().is_err());
    }

    #[test]
    fn unknown_use_is_kept() {
        assert_eq!(VariableUse::from("weight"), VariableUse::Weight);
        assert_eq!(
            VariableUse::from("id"),
            VariableUse::Other("id".to_string())
        );
        assert_eq!(VariableUse::from("id").as_str(), "id");
    }

    #[test]
    fn record_format_rejects_unknown() {
        assert_eq!("CSV".parse::<RecordFormat>(), Ok(RecordFormat::Csv));
        assert!("tab".parse::<RecordFormat>().is_err());
    }
}
