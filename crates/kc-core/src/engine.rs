//! Longest-match transliteration decision.

use crate::mapping::MappingTable;
use crate::unicode::{char_len, char_prefix, splice};

/// A decided edit: delete `remove_len` chars before the cursor and insert
/// `insert_text` in their place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub remove_len: usize,
    pub insert_text: String,
}

impl Replacement {
    /// Buffer and collapsed cursor after applying this replacement at
    /// `cursor` (char offset) of `text`.
    pub fn apply(&self, text: &str, cursor: usize) -> (String, usize) {
        let start = cursor.saturating_sub(self.remove_len);
        let out = splice(text, start, cursor, &self.insert_text);
        (out, start + char_len(&self.insert_text))
    }
}

/// Decide whether the chars ending at `cursor` form a key of `table`.
///
/// Keys are tried longest first (3, 2, then 1 chars); a key never reaches
/// before the start of the text. A cursor beyond the end of `text` never
/// matches.
pub fn decide(text: &str, cursor: usize, table: &MappingTable) -> Option<Replacement> {
    let before = char_prefix(text, cursor)?;
    let (remove_len, insert_text) = table.longest_suffix(before.chars().rev())?;
    Some(Replacement {
        remove_len,
        insert_text: insert_text.to_string(),
    })
}
