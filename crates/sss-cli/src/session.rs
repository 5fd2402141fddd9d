//! The host session a conversion runs in.
//!
//! A conversion needs only three things from its host: resolving path
//! aliases, accepting the generated statements, and telling whether it runs
//! in Unicode mode.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{MAIN_SEPARATOR, PathBuf};
use std::str::FromStr;

use encoding_rs::{Encoding, UTF_8};
use thiserror::Error;
use tracing::debug;

use sss_syntax::SyntaxProgram;

use crate::output::{UnencodableText, encode_text};

/// Failure to hand statements to the host.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Unencodable(#[from] UnencodableText),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Capabilities a conversion uses from its host.
pub trait HostSession {
    /// Resolve a path that may start with a handle alias.
    fn resolve_path(&self, spec: &str) -> PathBuf;

    /// Hand the complete program to the host for execution.
    fn submit(&mut self, program: &SyntaxProgram) -> Result<(), SubmitError>;

    /// Whether the host session runs in Unicode mode.
    fn is_unicode_mode(&self) -> bool;
}

/// Case-insensitive table of path aliases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileHandles {
    handles: BTreeMap<String, String>,
}

impl FileHandles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define `name` as an alias of `path`. Trailing separators are dropped.
    pub fn insert(&mut self, name: &str, path: &str) {
        let path = normalize_separators(path.trim_end_matches(['/', '\\']));
        self.handles.insert(name.to_lowercase(), path);
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.handles.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Replace a leading handle in `spec` with its path and normalize the
    /// separators to the platform's.
    pub fn resolve(&self, spec: &str) -> PathBuf {
        let mut parts: Vec<&str> = spec.split(['/', '\\']).collect();
        if let Some(first) = parts.first_mut() {
            if let Some(path) = self.get(first) {
                debug!(handle = %first, path = %path, "resolved file handle");
                *first = path;
            }
        }
        PathBuf::from(parts.join(&MAIN_SEPARATOR.to_string()))
    }
}

impl FromIterator<(String, String)> for FileHandles {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut handles = FileHandles::new();
        for (name, path) in iter {
            handles.insert(&name, &path);
        }
        handles
    }
}

/// One `NAME=PATH` handle definition from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandleDefinition {
    pub name: String,
    pub path: String,
}

impl FromStr for HandleDefinition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((name, path)) if !name.trim().is_empty() && !path.trim().is_empty() => Ok(Self {
                name: name.trim().to_string(),
                path: path.trim().to_string(),
            }),
            _ => Err(format!("expected NAME=PATH, got {s:?}")),
        }
    }
}

fn normalize_separators(path: &str) -> String {
    path.replace(['/', '\\'], &MAIN_SEPARATOR.to_string())
}

/// A session outside any statistics host: handles come from a table and
/// submitted statements are written to `writer`.
pub struct StandaloneSession<W: Write> {
    handles: FileHandles,
    writer: W,
    unicode_mode: bool,
    locale: &'static Encoding,
}

impl<W: Write> StandaloneSession<W> {
    pub fn new(writer: W, handles: FileHandles) -> Self {
        Self {
            handles,
            writer,
            unicode_mode: true,
            locale: UTF_8,
        }
    }

    /// Run as a non-Unicode session using `locale` for submitted text.
    pub fn with_locale(mut self, locale: &'static Encoding) -> Self {
        self.unicode_mode = false;
        self.locale = locale;
        self
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<W: Write> HostSession for StandaloneSession<W> {
    fn resolve_path(&self, spec: &str) -> PathBuf {
        self.handles.resolve(spec)
    }

    fn submit(&mut self, program: &SyntaxProgram) -> Result<(), SubmitError> {
        let encoding = if self.unicode_mode { UTF_8 } else { self.locale };
        let bytes = encode_text(&program.to_text(), encoding, false)?;
        self.writer.write_all(&bytes)?;
        self.writer.flush()?;
        debug!(statements = program.len(), "submitted syntax");
        Ok(())
    }

    fn is_unicode_mode(&self) -> bool {
        self.unicode_mode
    }
}
