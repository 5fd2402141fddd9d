//! Greedy line wrapping for long labels and name lists.

/// Column width used for wrapped labels and name lists.
pub const WRAP_WIDTH: usize = 100;

/// Wrap `text` into lines of at most `width` characters.
///
/// Words are never broken, so a single word longer than `width` gets a line
/// of its own. Whitespace runs inside a line are kept (each whitespace
/// character becomes a space); whitespace at line boundaries is dropped.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_len = 0;

    for (gap, word) in words(text) {
        let word_len = word.chars().count();
        if line.is_empty() {
            line.push_str(word);
            line_len = word_len;
        } else if line_len + gap + word_len <= width {
            line.extend(std::iter::repeat_n(' ', gap));
            line.push_str(word);
            line_len += gap + word_len;
        } else {
            lines.push(std::mem::take(&mut line));
            line.push_str(word);
            line_len = word_len;
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Split into (preceding whitespace width, word) pairs.
fn words(text: &str) -> Vec<(usize, &str)> {
    let mut words = Vec::new();
    let mut gap = 0;
    let mut start = None;
    for (index, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if let Some(begin) = start.take() {
                words.push((gap, &text[begin..index]));
                gap = 0;
            }
            gap += 1;
        } else if start.is_none() {
            start = Some(index);
        }
    }
    if let Some(begin) = start {
        words.push((gap, &text[begin..]));
    }
    words
}
