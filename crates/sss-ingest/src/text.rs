//! Character data accumulation and cleaning.

use std::sync::LazyLock;

use regex::Regex;

/// Separator that replaces line breaks in labels and text.
pub const BREAK_SEPARATOR: &str = " - ";

static BREAK_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br/*>").expect("static break pattern"));

static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\n\s*").expect("static line break pattern"));

// Deliberately loose: anything between angle brackets goes, tag or not.
static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<.+?>").expect("static markup pattern"));

/// Which buffer character data currently flows into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TextContext {
    /// Simple scalar elements: name, label, value, filter, size, survey fields.
    Content,
    /// Inside a `text` element.
    Rich,
}

/// Chunked character data for one context.
#[derive(Debug, Default)]
pub(crate) struct TextBuffer {
    chunks: Vec<String>,
}

impl TextBuffer {
    /// Append a chunk. Whitespace-only chunks are dropped.
    pub(crate) fn push(&mut self, chunk: &str) {
        if chunk.trim_end().is_empty() {
            return;
        }
        self.chunks.push(chunk.to_string());
    }

    /// Append a line-break separator.
    pub(crate) fn push_break(&mut self) {
        self.chunks.push(BREAK_SEPARATOR.to_string());
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.chunks.clear();
    }

    /// Joined content, leaving the buffer empty.
    pub(crate) fn take(&mut self) -> String {
        let joined = self.chunks.concat();
        self.chunks.clear();
        joined
    }
}

/// Replace embedded break markup with [`BREAK_SEPARATOR`], fold source line
/// breaks and their indentation into single spaces, and, when asked, strip
/// anything shaped like a tag.
///
/// The result never spans lines, so it can be quoted into one statement.
pub fn clean_text(text: &str, remove_html: bool) -> String {
    let text = BREAK_TAG.replace_all(text, BREAK_SEPARATOR);
    let text = LINE_BREAK.replace_all(text.trim(), " ");
    if remove_html {
        HTML_TAG.replace_all(&text, "").into_owned()
    } else {
        text.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn break_markup_becomes_separator() {
        assert_eq!(clean_text("Age<br>in years", false), "Age - in years");
        assert_eq!(clean_text("Age<BR/>in years", false), "Age - in years");
        assert_eq!(clean_text("Age<br//>in years", false), "Age - in years");
    }

    #[test]
    fn markup_kept_unless_removal_requested() {
        assert_eq!(clean_text("<b>Bold</b> text", false), "<b>Bold</b> text");
        assert_eq!(clean_text("<b>Bold</b> text", true), "Bold text");
    }

    #[test]
    fn removal_also_eats_angle_bracket_prose() {
        assert_eq!(clean_text("a <not a tag> b", true), "a  b");
    }

    #[test]
    fn source_line_breaks_fold_to_spaces() {
        assert_eq!(
            clean_text("Which brand\n          do you use", false),
            "Which brand do you use"
        );
        assert_eq!(
            clean_text("\n   Read out\r\n   all brands\n  ", false),
            "Read out all brands"
        );
        assert_eq!(clean_text("Age<br/>\n  in years", false), "Age - in years");
    }

    #[test]
    fn buffer_skips_whitespace_chunks() {
        let mut buffer = TextBuffer::default();
        buffer.push("\n    ");
        buffer.push("Gender ");
        buffer.push_break();
        buffer.push("of respondent");
        assert_eq!(buffer.take(), "Gender  - of respondent");
        assert!(buffer.is_empty());
    }
}
