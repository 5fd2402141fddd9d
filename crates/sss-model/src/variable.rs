use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::{MultipleKind, VariableFormat, VariableType, VariableUse};

/// Start/finish pair from the `position` element.
///
/// Fixed-format records use 1-based columns; csv records use the 1-based
/// field number in `start` and leave `finish` unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub start: Option<usize>,
    pub finish: Option<usize>,
}

/// `spread` element of a multiple variable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spread {
    /// Number of subfields; present only for multiple-category sets.
    pub subfields: Option<usize>,
    /// Width of each subfield in characters.
    pub width: Option<usize>,
}

/// `range` element of a quantity variable, kept as written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// A single Triple-S variable as read from the metadata document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub ident: Option<String>,
    pub name: Option<String>,
    pub label: Option<String>,
    /// `None` when the `type` attribute is absent or not a Triple-S type.
    pub var_type: Option<VariableType>,
    #[serde(default)]
    pub usage: VariableUse,
    #[serde(default)]
    pub format: VariableFormat,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub spread: Spread,
    #[serde(default)]
    pub range: Range,
    /// Code to label text, ordered by code.
    #[serde(default)]
    pub values: BTreeMap<String, String>,
    /// Code to optional score. Every code seen in a `value` element has an entry.
    #[serde(default)]
    pub scores: BTreeMap<String, Option<String>>,
    /// Boolean expression selecting records with a valid value.
    pub filter: Option<String>,
    pub size: Option<usize>,
    /// One entry per `text` element, in document order.
    #[serde(default)]
    pub text: Vec<String>,
}

impl Variable {
    pub fn new(ident: Option<String>, var_type: Option<VariableType>) -> Self {
        Self {
            ident,
            name: None,
            label: None,
            var_type,
            usage: VariableUse::default(),
            format: VariableFormat::default(),
            position: Position::default(),
            spread: Spread::default(),
            range: Range::default(),
            values: BTreeMap::new(),
            scores: BTreeMap::new(),
            filter: None,
            size: None,
            text: Vec::new(),
        }
    }

    /// Name used in generated syntax, falling back to the ident.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.ident.as_deref())
            .unwrap_or("<unnamed>")
    }

    pub fn is_multiple(&self) -> bool {
        self.var_type == Some(VariableType::Multiple)
    }

    /// Multiple-response sub-kind, if this is a multiple variable.
    ///
    /// A `spread` with subfields makes a category set; anything else is a
    /// dichotomy bitstring.
    pub fn multiple_kind(&self) -> Option<MultipleKind> {
        if !self.is_multiple() {
            return None;
        }
        if self.spread.subfields.is_some() {
            Some(MultipleKind::Category)
        } else {
            Some(MultipleKind::Dichotomy)
        }
    }

    /// True when at least one value carries a score.
    pub fn has_scores(&self) -> bool {
        self.scores.values().any(Option::is_some)
    }

    /// Record a `value` element: label text and optional score for `code`.
    pub fn insert_value(&mut self, code: impl Into<String>, label: String, score: Option<String>) {
        let code = code.into();
        self.scores.insert(code.clone(), score);
        self.values.insert(code, label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn multiple(subfields: Option<usize>) -> Variable {
        let mut variable = Variable::new(Some("1".to_string()), Some(VariableType::Multiple));
        variable.spread.subfields = subfields;
        variable
    }

    #[test]
    fn spread_subfields_select_category_sets() {
        assert_eq!(multiple(Some(3)).multiple_kind(), Some(MultipleKind::Category));
        assert_eq!(multiple(None).multiple_kind(), Some(MultipleKind::Dichotomy));
    }

    #[test]
    fn non_multiple_has_no_kind() {
        let variable = Variable::new(None, Some(VariableType::Single));
        assert_eq!(variable.multiple_kind(), None);
    }

    #[test]
    fn display_name_prefers_name() {
        let mut variable = Variable::new(Some("7".to_string()), None);
        assert_eq!(variable.display_name(), "7");
        variable.name = Some("Q7".to_string());
        assert_eq!(variable.display_name(), "Q7");
    }

    #[test]
    fn scores_track_every_value() {
        let mut variable = Variable::new(None, Some(VariableType::Single));
        variable.insert_value("1", "Yes".to_string(), Some("10".to_string()));
        variable.insert_value("2", "No".to_string(), None);
        assert_eq!(variable.scores.len(), 2);
        assert!(variable.has_scores());
    }
}
