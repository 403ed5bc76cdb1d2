//! Char-offset helpers.
//!
//! Editable fields report cursor positions in characters, while Rust strings
//! are indexed by byte. Everything in the engine works in char offsets and
//! converts at the edges with these helpers.

/// Number of chars in `s`.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Byte offset of the char at `char_idx`. `char_idx == char_len(s)` maps to
/// `s.len()`; anything past the end is `None`.
pub fn byte_offset(s: &str, char_idx: usize) -> Option<usize> {
    if char_idx == 0 {
        return Some(0);
    }
    match s.char_indices().nth(char_idx) {
        Some((b, _)) => Some(b),
        None if char_len(s) == char_idx => Some(s.len()),
        None => None,
    }
}

/// The first `char_idx` chars of `s`.
pub fn char_prefix(s: &str, char_idx: usize) -> Option<&str> {
    byte_offset(s, char_idx).map(|b| &s[..b])
}

/// Replace chars `start..end` of `s` with `insert`.
///
/// Offsets past the end are clamped to the end of the string.
pub fn splice(s: &str, start: usize, end: usize, insert: &str) -> String {
    let start_b = byte_offset(s, start).unwrap_or(s.len());
    let end_b = byte_offset(s, end).unwrap_or(s.len()).max(start_b);
    let mut out = String::with_capacity(s.len() + insert.len());
    out.push_str(&s[..start_b]);
    out.push_str(insert);
    out.push_str(&s[end_b..]);
    out
}
