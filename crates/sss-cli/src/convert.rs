//! One conversion run: validate, parse, generate, write and submit.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use encoding_rs::Encoding;
use tracing::{info, info_span};

use sss_ingest::{ParseOptions, parse_metadata_file};
use sss_model::RecordFormat;
use sss_syntax::{
    DEFAULT_MAX_RECORD_LENGTH, DataEncoding, DichotomyLabels, SyntaxOptions, generate_syntax,
};

use crate::error::{ConvertError, Result};
use crate::localize::{
    Localizer, NOTHING_TO_DO, SYNTAX_FILE_CREATED, UNENCODABLE_SUBMISSION,
};
use crate::output::{remove_syntax_file, write_syntax_file};
use crate::session::{HostSession, SubmitError};

/// Default encoding of a session that is not in Unicode mode.
pub const DEFAULT_LOCALE_ENCODING: &str = "windows-1252";

/// Everything the caller asks of one conversion.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    /// Metadata path, possibly starting with a handle alias.
    pub metadata_file: String,
    /// Data file path; derived from the metadata path when unset.
    pub data_file: Option<String>,
    /// Where to write the syntax, if anywhere.
    pub syntax_file: Option<String>,
    /// Submit the statements to the host session.
    pub execute: bool,
    pub string_missing_code: String,
    pub max_record_length: usize,
    pub data_encoding: DataEncoding,
    pub remove_html: bool,
    pub full_label_attribute: bool,
    pub dichotomy_labels: Vec<String>,
    pub score_recode: bool,
    /// Encoding label used for the syntax file outside Unicode mode.
    pub locale_encoding: String,
    /// Header timestamp; the current local time when unset.
    pub generated_at: Option<NaiveDateTime>,
}

impl ConversionRequest {
    pub fn new(metadata_file: impl Into<String>) -> Self {
        Self {
            metadata_file: metadata_file.into(),
            data_file: None,
            syntax_file: None,
            execute: false,
            string_missing_code: String::new(),
            max_record_length: DEFAULT_MAX_RECORD_LENGTH,
            data_encoding: DataEncoding::default(),
            remove_html: false,
            full_label_attribute: true,
            dichotomy_labels: vec!["No".to_string(), "Yes".to_string()],
            score_recode: false,
            locale_encoding: DEFAULT_LOCALE_ENCODING.to_string(),
            generated_at: None,
        }
    }

    /// Check the options before anything is read. Returns the locale encoding.
    pub fn validate(&self, localizer: &dyn Localizer) -> Result<&'static Encoding> {
        if self.syntax_file.is_none() && !self.execute {
            return Err(ConvertError::configuration(localizer.localize(NOTHING_TO_DO)));
        }
        DichotomyLabels::new(self.dichotomy_labels.clone())?;
        Encoding::for_label(self.locale_encoding.trim().as_bytes()).ok_or_else(|| {
            ConvertError::configuration(format!(
                "unknown locale encoding {:?}",
                self.locale_encoding
            ))
        })
    }
}

/// What a successful conversion produced.
#[derive(Debug, Clone)]
pub struct ConversionOutcome {
    pub metadata_file: PathBuf,
    pub data_file: String,
    pub record_format: RecordFormat,
    pub variables: usize,
    pub multiple_sets: usize,
    pub statements: usize,
    pub syntax_file: Option<PathBuf>,
    pub executed: bool,
}

/// Convert one metadata file.
///
/// Options are validated before the metadata is read; any failure aborts
/// the run without writing a syntax file or submitting statements.
pub fn run_conversion(
    request: &ConversionRequest,
    session: &mut dyn HostSession,
    localizer: &dyn Localizer,
) -> Result<ConversionOutcome> {
    let locale = request.validate(localizer)?;
    let dichotomy_labels = DichotomyLabels::new(request.dichotomy_labels.clone())?;

    let metadata_file = session.resolve_path(&request.metadata_file);
    let syntax_file = request
        .syntax_file
        .as_deref()
        .map(|spec| session.resolve_path(spec));
    let data_file = request
        .data_file
        .as_deref()
        .map(|spec| session.resolve_path(spec).to_string_lossy().into_owned());

    let span = info_span!("convert", metadata = %metadata_file.display());
    let _guard = span.enter();

    let parse_options = ParseOptions::new().with_remove_html(request.remove_html);
    let metadata = parse_metadata_file(&metadata_file, &parse_options)?;

    let mut options = SyntaxOptions::new(metadata_file.to_string_lossy());
    options.data_file = data_file;
    options.data_encoding = request.data_encoding;
    options.max_record_length = request.max_record_length;
    options.string_missing_code = request.string_missing_code.clone();
    options.full_label_attribute = request.full_label_attribute;
    options.dichotomy_labels = dichotomy_labels;
    options.score_recode = request.score_recode;
    if let Some(generated_at) = request.generated_at {
        options.generated_at = generated_at;
    }
    let program = generate_syntax(&metadata, &options)?;

    if let Some(path) = &syntax_file {
        write_syntax_file(path, &program, session.is_unicode_mode(), locale, localizer)?;
    }

    if request.execute {
        if let Err(err) = session.submit(&program) {
            // A failed run leaves no syntax file behind.
            if let Some(path) = &syntax_file {
                remove_syntax_file(path);
            }
            return Err(match err {
                SubmitError::Unencodable(_) => ConvertError::Encoding {
                    message: localizer.localize(UNENCODABLE_SUBMISSION).into_owned(),
                },
                SubmitError::Io(source) => ConvertError::Submit {
                    message: source.to_string(),
                },
            });
        }
        info!(statements = program.len(), "syntax submitted");
    }

    if let Some(path) = &syntax_file {
        info!(path = %path.display(), "{}", localizer.localize(SYNTAX_FILE_CREATED));
    }

    Ok(ConversionOutcome {
        metadata_file,
        data_file: options.data_file_path(),
        record_format: metadata.record.format,
        variables: metadata.variables.len(),
        multiple_sets: metadata.multiple_sets(),
        statements: program.len(),
        syntax_file,
        executed: request.execute,
    })
}
