//! Error types for a conversion run.

use std::path::PathBuf;

use thiserror::Error;

use sss_ingest::IngestError;
use sss_syntax::SyntaxError;

/// Any failure of a conversion run. All of them are fatal.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// Invalid options, score inconsistencies and layout problems.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// Generated text is not representable in the target character set.
    #[error("{message}")]
    Encoding { message: String },

    /// The host session failed to accept the statements.
    #[error("failed to submit syntax: {message}")]
    Submit { message: String },

    #[error("failed to write syntax file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConvertError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Syntax(SyntaxError::Configuration(message.into()))
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for invalid caller options.
    pub fn is_configuration(&self) -> bool {
        matches!(self, ConvertError::Syntax(SyntaxError::Configuration(_)))
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
