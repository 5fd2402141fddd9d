use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::RecordFormat;
use crate::variable::Variable;

/// Well-known datafile attributes, emitted first and in this order.
pub const PRIORITY_ATTRIBUTES: [&str; 4] = ["title", "name", "version", "date"];

/// Survey-wide attributes from the `sss` element and the `survey` children.
///
/// Attributes are keyed by name; setting an attribute twice keeps the last
/// value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Datafile {
    attributes: BTreeMap<String, String>,
}

impl Datafile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Set `name` when `value` is present; absent values leave the attribute unset.
    pub fn set_opt(&mut self, name: &str, value: Option<String>) {
        if let Some(value) = value {
            self.set(name, value);
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.values().all(String::is_empty)
    }

    /// Non-empty attributes: the priority ones first, then the rest by name.
    pub fn ordered_attributes(&self) -> Vec<(&str, &str)> {
        let mut ordered = Vec::with_capacity(self.attributes.len());
        for key in PRIORITY_ATTRIBUTES {
            if let Some(value) = self.attributes.get(key) {
                if !value.is_empty() {
                    ordered.push((key, value.as_str()));
                }
            }
        }
        for (key, value) in &self.attributes {
            if PRIORITY_ATTRIBUTES.contains(&key.as_str()) || value.is_empty() {
                continue;
            }
            ordered.push((key.as_str(), value.as_str()));
        }
        ordered
    }
}

/// Physical description of the data file (the `record` element).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub ident: Option<String>,
    #[serde(default)]
    pub format: RecordFormat,
    /// Header rows to skip before the first case.
    pub skip: Option<usize>,
    pub href: Option<String>,
}

impl Record {
    /// 1-based line number of the first case in the data file.
    pub fn first_case(&self) -> usize {
        self.skip.map_or(1, |skip| skip + 1)
    }
}

/// Everything one metadata document describes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub datafile: Datafile,
    pub record: Record,
    pub variables: Vec<Variable>,
}

impl Metadata {
    pub fn multiple_sets(&self) -> usize {
        self.variables.iter().filter(|v| v.is_multiple()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_attributes_come_first() {
        let mut datafile = Datafile::new();
        datafile.set("user", "jk");
        datafile.set("date", "2014-01-31");
        datafile.set("title", "Brand survey");
        datafile.set("languages", "en");
        datafile.set("version", "2.0");

        let keys: Vec<&str> = datafile
            .ordered_attributes()
            .into_iter()
            .map(|(key, _)| key)
            .collect();
        assert_eq!(keys, vec!["title", "version", "date", "languages", "user"]);
    }

    #[test]
    fn empty_attributes_are_skipped() {
        let mut datafile = Datafile::new();
        datafile.set("origin", "");
        datafile.set_opt("modes", None);
        assert!(datafile.is_empty());
        assert!(datafile.ordered_attributes().is_empty());
    }

    #[test]
    fn last_value_wins() {
        let mut datafile = Datafile::new();
        datafile.set("version", "2.0");
        datafile.set("version", "1.4");
        assert_eq!(datafile.get("version"), Some("1.4"));
    }

    #[test]
    fn first_case_follows_skip() {
        let mut record = Record::default();
        assert_eq!(record.first_case(), 1);
        record.skip = Some(2);
        assert_eq!(record.first_case(), 3);
    }
}
