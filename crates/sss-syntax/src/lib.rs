//! SPSS syntax generation from Triple-S metadata.
//!
//! Each variable is first compiled into a [`CompiledVariable`] carrying its
//! derived layout; [`generate_syntax`] then walks the compiled variables once
//! and emits the statement lines of a complete program.

pub mod compile;
pub mod error;
pub mod generate;
pub mod options;
pub mod quote;
pub mod statements;
pub mod wrap;

pub use compile::{CompiledVariable, FieldSpec, SYSTEM_MISSING, base_format, missing_code};
pub use error::{Result, SyntaxError};
pub use generate::{SyntaxProgram, TIMESTAMP_FORMAT, generate_syntax, handle_name};
pub use options::{
    DEFAULT_MAX_RECORD_LENGTH, DataEncoding, DichotomyLabels, SyntaxOptions, default_data_file,
};
pub use quote::smart_quote;
pub use wrap::{WRAP_WIDTH, wrap_text};
