//! Quoting helpers for syntax string literals.

/// Wrap `text` in double quotes, doubling any embedded double quote.
pub fn smart_quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for ch in text.chars() {
        if ch == '"' {
            quoted.push('"');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}

/// Quote a possibly multi-line value, one literal per line, with `prefix`
/// prepended to the first line only.
pub(crate) fn quote_prefixed_lines(prefix: &str, value: &str) -> Vec<String> {
    value
        .split('\n')
        .enumerate()
        .map(|(index, line)| {
            if index == 0 {
                smart_quote(&format!("{prefix}{line}"))
            } else {
                smart_quote(line)
            }
        })
        .collect()
}

/// Append the statement terminator to the last line of a block.
pub(crate) fn terminate(lines: &mut [String]) {
    if let Some(last) = lines.last_mut() {
        last.push('.');
    }
}
