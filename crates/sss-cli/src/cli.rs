//! CLI argument definitions for the Triple-S converter.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use sss_cli::{DEFAULT_LOCALE_ENCODING, HandleDefinition};

#[derive(Parser)]
#[command(
    name = "sss-convert",
    version,
    about = "Convert Triple-S XML metadata into SPSS syntax",
    long_about = "Read a Triple-S 2.0 XML metadata file and generate the SPSS syntax\n\
                  that reads the matching fixed-format or CSV data file.\n\n\
                  The syntax can be written to a file, submitted to the session, or both."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate syntax for a metadata file.
    Convert(ConvertArgs),

    /// Print the parsed metadata as JSON.
    Inspect(InspectArgs),
}

#[derive(Parser)]
pub struct ConvertArgs {
    /// Triple-S XML metadata file. May start with a handle defined by --handle.
    #[arg(value_name = "METADATA")]
    pub metadata: String,

    /// Data file (default: the metadata path with a .txt extension).
    #[arg(long = "data", value_name = "PATH")]
    pub data: Option<String>,

    /// Write the generated syntax to this file.
    #[arg(short = 'o', long = "syntax", value_name = "PATH")]
    pub syntax: Option<String>,

    /// Submit the generated syntax to the session (written to stdout).
    #[arg(long = "execute")]
    pub execute: bool,

    /// Missing-value code for literal variables without value codes.
    #[arg(long = "string-missing-code", value_name = "CODE", default_value = "")]
    pub string_missing_code: String,

    /// Upper bound on the data record length.
    #[arg(
        long = "max-record-length",
        value_name = "N",
        default_value_t = sss_syntax::DEFAULT_MAX_RECORD_LENGTH
    )]
    pub max_record_length: usize,

    /// Encoding of the data file.
    #[arg(long = "data-encoding", value_enum, default_value = "locale")]
    pub data_encoding: DataEncodingArg,

    /// Strip HTML markup from labels and text.
    #[arg(long = "remove-html")]
    pub remove_html: bool,

    /// Skip the FullLabelText attribute for long variable labels.
    #[arg(long = "no-full-label")]
    pub no_full_label: bool,

    /// Value labels for the 0 and 1 codes of dichotomy set components.
    #[arg(
        long = "dichotomy-labels",
        value_name = "UNCHECKED,CHECKED",
        value_delimiter = ',',
        default_value = "No,Yes"
    )]
    pub dichotomy_labels: Vec<String>,

    /// Recode single variables with scores to their score values.
    #[arg(long = "score-recode")]
    pub score_recode: bool,

    /// Define a file handle usable as the first path component (NAME=PATH).
    #[arg(long = "handle", value_name = "NAME=PATH")]
    pub handles: Vec<HandleDefinition>,

    /// Run as a non-Unicode session.
    #[arg(long = "no-unicode")]
    pub no_unicode: bool,

    /// Character set used outside Unicode mode.
    #[arg(
        long = "locale-encoding",
        value_name = "LABEL",
        default_value = DEFAULT_LOCALE_ENCODING
    )]
    pub locale_encoding: String,
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Triple-S XML metadata file.
    #[arg(value_name = "METADATA")]
    pub metadata: PathBuf,

    /// Strip HTML markup from labels and text.
    #[arg(long = "remove-html")]
    pub remove_html: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DataEncodingArg {
    Utf8,
    Locale,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
