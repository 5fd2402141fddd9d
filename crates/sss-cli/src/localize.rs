//! User-facing message texts and their translation hook.

use std::borrow::Cow;

pub const NOTHING_TO_DO: &str =
    "Neither a syntax file output nor execution was specified: there is nothing to do.";

pub const UNENCODABLE_SYNTAX_FILE: &str = "The metadata contains text invalid in the current character set.\n\
     The syntax file cannot be written in that character set.\n\
     Running in Unicode mode might resolve this problem.";

pub const UNENCODABLE_SUBMISSION: &str = "The metadata contains text invalid in the current character set.\n\
     The dataset cannot be created.  Running in Unicode mode might resolve this problem.";

pub const SYNTAX_FILE_CREATED: &str = "Syntax file created";

/// Translates user-facing messages before they are shown.
pub trait Localizer {
    fn localize<'a>(&self, message: &'a str) -> Cow<'a, str>;
}

/// Passes messages through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTranslation;

impl Localizer for NoTranslation {
    fn localize<'a>(&self, message: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(message)
    }
}
