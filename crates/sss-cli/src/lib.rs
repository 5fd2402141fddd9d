//! Library side of the `sss-convert` command.
//!
//! [`run_conversion`] drives one conversion against a [`HostSession`]; the
//! binary supplies a [`StandaloneSession`] writing submitted statements to
//! stdout.

pub mod convert;
pub mod error;
pub mod localize;
pub mod logging;
pub mod output;
pub mod session;

pub use convert::{
    ConversionOutcome, ConversionRequest, DEFAULT_LOCALE_ENCODING, run_conversion,
};
pub use error::{ConvertError, Result};
pub use localize::{Localizer, NoTranslation};
pub use output::{UnencodableText, encode_text, write_syntax_file};
pub use session::{FileHandles, HandleDefinition, HostSession, StandaloneSession, SubmitError};
