//! Whole-program generation.

use sha2::{Digest, Sha256};
use tracing::{info, info_span};

use sss_model::{Metadata, RecordFormat};

use crate::compile::{CompiledVariable, FieldSpec};
use crate::error::Result;
use crate::options::SyntaxOptions;
use crate::quote::terminate;
use crate::statements;

/// `time.asctime` style timestamp used in the header comment.
pub const TIMESTAMP_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// Ordered statement lines of a generated program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxProgram {
    lines: Vec<String>,
}

impl SyntaxProgram {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The program as text, each line terminated by `\n`.
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for line in &self.lines {
            text.push_str(line);
            text.push('\n');
        }
        text
    }
}

/// Handle name bound to the data file: `D` plus a digest prefix of its path.
pub fn handle_name(data_file: &str) -> String {
    let digest = Sha256::digest(data_file.as_bytes());
    format!("D{}", &hex::encode(digest)[..8])
}

/// Generate the complete syntax program for `metadata`.
///
/// Statements are produced in a fixed order: header comments, file handle,
/// read statement, delimited-set fix-ups, the datafile document, then the
/// per-variable metadata. Generating twice from the same inputs yields the
/// same lines.
pub fn generate_syntax(metadata: &Metadata, options: &SyntaxOptions) -> Result<SyntaxProgram> {
    let span = info_span!("generate_syntax", metadata_file = %options.metadata_file);
    let _enter = span.enter();

    let record_format = metadata.record.format;
    let compiled = metadata
        .variables
        .iter()
        .map(|variable| CompiledVariable::compile(variable, record_format, options))
        .collect::<Result<Vec<_>>>()?;

    let data_file = options.data_file_path();
    let handle = handle_name(&data_file);
    let mut lines = vec![
        format!(
            "* Syntax created by sss-convert on {}.",
            options.generated_at.format(TIMESTAMP_FORMAT)
        ),
        format!("* Metadata file: {}.", options.metadata_file),
        format!(
            "FILE HANDLE {handle} /NAME =\"{data_file}\" /LRECL={}.",
            options.max_record_length
        ),
    ];
    lines.extend(read_statement(metadata, &compiled, &handle, options));

    for variable in &compiled {
        lines.extend(statements::csv_fixups(variable, record_format));
    }
    lines.extend(statements::document(&metadata.datafile));

    let mut variable_lines = Vec::new();
    for variable in &compiled {
        variable_lines.extend(statements::variable_labels(variable, options));
        variable_lines.extend(statements::value_labels(variable, options.score_recode)?);
        variable_lines.extend(statements::score_attribute(variable));
        variable_lines.extend(statements::missing_values(variable));
        variable_lines.extend(statements::text_attribute(variable));
        variable_lines.extend(statements::multiple_response_set(variable));
        variable_lines.extend(statements::weight(variable));
        if options.score_recode {
            variable_lines.extend(statements::recode(variable)?);
        }
    }
    lines.extend(
        variable_lines
            .into_iter()
            .filter(|line| !line.is_empty())
            .map(|line| line.replace("&quot;", "\"\"")),
    );

    info!(
        record_format = %record_format,
        variables = compiled.len(),
        statements = lines.len(),
        "syntax generated"
    );
    Ok(SyntaxProgram { lines })
}

/// `DATA LIST` for fixed records, `GET DATA` for delimited ones.
fn read_statement(
    metadata: &Metadata,
    compiled: &[CompiledVariable<'_>],
    handle: &str,
    options: &SyntaxOptions,
) -> Vec<String> {
    let encoding = options.data_encoding;
    let mut lines = match metadata.record.format {
        RecordFormat::Fixed => {
            let mut lines = vec![format!(
                "DATA LIST FIXED FILE=\"{handle}\" ENCODING={encoding}/"
            )];
            lines.extend(compiled.iter().map(|variable| variable.field.spec().to_string()));
            lines
        }
        RecordFormat::Csv => {
            let mut lines = vec![format!(
                "GET DATA /TYPE = TXT /FILE=\"{handle}\" /ENCODING= {encoding}\n    \
                 /FIRSTCASE={} /DELIMITERS=\",\" /QUALIFIER='\"'/VARIABLES = ",
                metadata.record.first_case()
            )];
            let mut fields: Vec<(usize, &str)> = compiled
                .iter()
                .map(|variable| match &variable.field {
                    FieldSpec::Delimited { order, spec } => (*order, spec.as_str()),
                    FieldSpec::Fixed(spec) => (0, spec.as_str()),
                })
                .collect();
            // Stable: variables sharing a field number keep document order.
            fields.sort_by_key(|(order, _)| *order);
            lines.extend(fields.into_iter().map(|(_, spec)| spec.to_string()));
            lines
        }
    };
    terminate(&mut lines);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_is_stable_per_path() {
        let handle = handle_name("/data/brands.txt");
        assert_eq!(handle.len(), 9);
        assert!(handle.starts_with('D'));
        assert_eq!(handle, handle_name("/data/brands.txt"));
        assert_ne!(handle, handle_name("/data/other.txt"));
    }

    #[test]
    fn program_text_ends_each_line() {
        let program = SyntaxProgram {
            lines: vec!["A.".to_string(), "B\nC.".to_string()],
        };
        assert_eq!(program.to_text(), "A.\nB\nC.\n");
        assert_eq!(program.len(), 2);
    }
}
