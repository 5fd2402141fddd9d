//! Error types for syntax generation.

use thiserror::Error;

/// Failures raised while compiling variables or emitting statements.
///
/// Each variant names the offending variable so the message can be shown
/// to the user as is.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SyntaxError {
    /// Invalid generation options.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Score recoding was requested but a value has no score.
    #[error("variable {variable} has a value, {code} for which there is no score")]
    MissingScore { variable: String, code: String },

    /// A numeric variable carries a score that is not a number.
    #[error("variable {variable} is numeric but the score {score:?} of value {code} is not")]
    ScoreType {
        variable: String,
        code: String,
        score: String,
    },

    /// The variable's position or type does not allow a data definition.
    #[error("cannot lay out variable {variable}: {reason}")]
    Layout { variable: String, reason: String },
}

impl SyntaxError {
    pub(crate) fn layout(variable: &str, reason: impl Into<String>) -> Self {
        Self::Layout {
            variable: variable.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SyntaxError>;
