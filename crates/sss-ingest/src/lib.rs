//! Triple-S XML metadata parsing.
//!
//! [`parse_metadata`] reads one Triple-S 2.0 metadata document into an
//! [`sss_model::Metadata`]. Only single-record files are supported;
//! hierarchical files are rejected.

pub mod error;
pub mod parser;
pub mod text;

mod element;

pub use error::{IngestError, Result};
pub use parser::{ParseOptions, parse_metadata, parse_metadata_file, parse_metadata_str};
pub use text::{BREAK_SEPARATOR, clean_text};
