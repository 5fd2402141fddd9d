//! Encoding and writing generated syntax.
//!
//! Text is always encoded completely in memory first, so an unencodable
//! character never leaves a half-written file behind.

use std::fs;
use std::path::Path;

use encoding_rs::{Encoding, UTF_8};
use thiserror::Error;
use tracing::{info, warn};

use sss_syntax::SyntaxProgram;

use crate::error::{ConvertError, Result};
use crate::localize::{Localizer, UNENCODABLE_SYNTAX_FILE};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// The text holds characters the target encoding cannot represent.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("text contains characters that cannot be encoded as {encoding}")]
pub struct UnencodableText {
    pub encoding: &'static str,
}

/// Encode `text` as `encoding`, with a byte order mark for UTF-8 when `bom`.
pub fn encode_text(
    text: &str,
    encoding: &'static Encoding,
    bom: bool,
) -> std::result::Result<Vec<u8>, UnencodableText> {
    let encoding = encoding.output_encoding();
    if encoding == UTF_8 {
        let mut bytes = Vec::with_capacity(text.len() + UTF8_BOM.len());
        if bom {
            bytes.extend_from_slice(UTF8_BOM);
        }
        bytes.extend_from_slice(text.as_bytes());
        return Ok(bytes);
    }
    let (bytes, _, had_errors) = encoding.encode(text);
    if had_errors {
        return Err(UnencodableText {
            encoding: encoding.name(),
        });
    }
    Ok(bytes.into_owned())
}

/// Write `program` to `path`: UTF-8 with a byte order mark in Unicode mode,
/// the locale encoding otherwise.
pub fn write_syntax_file(
    path: &Path,
    program: &SyntaxProgram,
    unicode_mode: bool,
    locale: &'static Encoding,
    localizer: &dyn Localizer,
) -> Result<()> {
    let encoding = if unicode_mode { UTF_8 } else { locale };
    let bytes = encode_text(&program.to_text(), encoding, unicode_mode).map_err(|err| {
        warn!(path = %path.display(), %err, "syntax file not written");
        ConvertError::Encoding {
            message: localizer.localize(UNENCODABLE_SYNTAX_FILE).into_owned(),
        }
    })?;
    fs::write(path, &bytes).map_err(|err| ConvertError::io(path, err))?;
    info!(
        path = %path.display(),
        encoding = encoding.name(),
        bytes = bytes.len(),
        "syntax file written"
    );
    Ok(())
}

/// Delete a syntax file written earlier in a run that then failed.
pub(crate) fn remove_syntax_file(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => info!(path = %path.display(), "syntax file removed"),
        Err(err) => warn!(path = %path.display(), %err, "failed to remove syntax file"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::WINDOWS_1252;

    #[test]
    fn unicode_gets_byte_order_mark() {
        let bytes = encode_text("A\n", UTF_8, true).expect("utf-8");
        assert_eq!(bytes, b"\xEF\xBB\xBFA\n");
        assert_eq!(encode_text("A\n", UTF_8, false).expect("utf-8"), b"A\n");
    }

    #[test]
    fn locale_encoding_is_applied() {
        let bytes = encode_text("caf\u{e9}", WINDOWS_1252, false).expect("cp1252");
        assert_eq!(bytes, b"caf\xE9");
    }

    #[test]
    fn unrepresentable_text_is_rejected() {
        let err = encode_text("\u{3a9}", WINDOWS_1252, false).expect_err("omega");
        assert_eq!(err.encoding, "windows-1252");
    }
}
