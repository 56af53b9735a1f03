//! Character-safe text helpers.

/// Returns at most `max_chars` characters of `text`.
///
/// Counts Unicode scalar values, so multi-byte characters are never split.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}

/// Strips markdown emphasis, heading markers and a trailing colon around a
/// heading line.
#[must_use]
pub fn clean_heading(line: &str) -> String {
    line.trim()
        .trim_matches(|c: char| matches!(c, '*' | '_' | '#' | ':') || c.is_whitespace())
        .to_string()
}
