//! Error types for metadata parsing.

use std::path::PathBuf;
use thiserror::Error;

/// Structural failures while reading a Triple-S metadata document.
///
/// Every variant is fatal: parsing stops and no model is returned.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The file could not be opened or read.
    #[error("failed to read metadata file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not well-formed XML.
    #[error("malformed XML at byte {position}: {message}")]
    Xml { position: u64, message: String },

    /// A `hierarchy` element was found.
    #[error("hierarchy files are not supported")]
    Hierarchy,

    /// More than one `record` element.
    #[error("only one record element is supported (found another at byte {position})")]
    MultipleRecords { position: u64 },

    /// The document has no `record` element.
    #[error("metadata contains no record element")]
    MissingRecord,

    /// The root element is not `sss`.
    #[error("metadata root element must be sss")]
    MissingSss,

    /// An element appeared outside the context that gives it meaning.
    #[error("element <{element}> is not allowed outside {context}")]
    Misplaced {
        element: String,
        context: &'static str,
    },

    /// An attribute value could not be interpreted.
    #[error("invalid {attribute} attribute on <{element}>: {value:?}")]
    InvalidAttribute {
        element: String,
        attribute: String,
        value: String,
    },
}

impl IngestError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn xml(position: u64, message: impl ToString) -> Self {
        Self::Xml {
            position,
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
