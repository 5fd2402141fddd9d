//! Generation options.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::{Local, NaiveDateTime};

use crate::error::{Result, SyntaxError};

/// Default upper bound on the data file record length.
pub const DEFAULT_MAX_RECORD_LENGTH: usize = 50_000;

/// Encoding keyword written into the read statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataEncoding {
    Utf8,
    /// The host session's locale encoding.
    #[default]
    Locale,
}

impl DataEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataEncoding::Utf8 => "UTF8",
            DataEncoding::Locale => "LOCALE",
        }
    }
}

impl fmt::Display for DataEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DataEncoding {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "").as_str() {
            "utf8" => Ok(DataEncoding::Utf8),
            "locale" => Ok(DataEncoding::Locale),
            _ => Err(format!("Unknown data encoding: {s}")),
        }
    }
}

/// Value labels for the 0 and 1 codes of multiple dichotomy components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DichotomyLabels {
    unchecked: String,
    checked: String,
}

impl DichotomyLabels {
    /// Build from a user-supplied list, which must hold exactly two labels.
    pub fn new(labels: Vec<String>) -> Result<Self> {
        let count = labels.len();
        match <[String; 2]>::try_from(labels) {
            Ok([unchecked, checked]) => Ok(Self { unchecked, checked }),
            Err(_) => Err(SyntaxError::Configuration(format!(
                "exactly two labels must be supplied for multiple dichotomy set values, got {count}"
            ))),
        }
    }

    /// Label of code 0.
    pub fn unchecked(&self) -> &str {
        &self.unchecked
    }

    /// Label of code 1.
    pub fn checked(&self) -> &str {
        &self.checked
    }
}

impl Default for DichotomyLabels {
    fn default() -> Self {
        Self {
            unchecked: "No".to_string(),
            checked: "Yes".to_string(),
        }
    }
}

/// Everything the generator needs besides the parsed metadata.
#[derive(Debug, Clone)]
pub struct SyntaxOptions {
    /// Metadata file name echoed in the header comment.
    pub metadata_file: String,
    /// Data file path. Derived from `metadata_file` when unset.
    pub data_file: Option<String>,
    pub data_encoding: DataEncoding,
    pub max_record_length: usize,
    /// Missing-value code for literal variables without value codes.
    pub string_missing_code: String,
    /// Emit the `FullLabelText` attribute next to each variable label.
    pub full_label_attribute: bool,
    pub dichotomy_labels: DichotomyLabels,
    /// Label and recode scores instead of raw codes.
    pub score_recode: bool,
    /// Timestamp written into the header comment.
    pub generated_at: NaiveDateTime,
}

impl SyntaxOptions {
    pub fn new(metadata_file: impl Into<String>) -> Self {
        Self {
            metadata_file: metadata_file.into(),
            data_file: None,
            data_encoding: DataEncoding::default(),
            max_record_length: DEFAULT_MAX_RECORD_LENGTH,
            string_missing_code: String::new(),
            full_label_attribute: true,
            dichotomy_labels: DichotomyLabels::default(),
            score_recode: false,
            generated_at: Local::now().naive_local(),
        }
    }

    pub fn with_data_file(mut self, data_file: impl Into<String>) -> Self {
        self.data_file = Some(data_file.into());
        self
    }

    pub fn with_generated_at(mut self, generated_at: NaiveDateTime) -> Self {
        self.generated_at = generated_at;
        self
    }

    /// Data file path: explicit, or the metadata path with a `.txt` extension.
    pub fn data_file_path(&self) -> String {
        match &self.data_file {
            Some(path) => path.clone(),
            None => default_data_file(&self.metadata_file),
        }
    }
}

/// Replace the extension of `metadata_file` with `.txt`.
pub fn default_data_file(metadata_file: &str) -> String {
    Path::new(metadata_file)
        .with_extension("txt")
        .to_string_lossy()
        .into_owned()
}
