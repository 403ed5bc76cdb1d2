//! Transliteration tables.
//!
//! A table maps short keys (at most `MAX_KEY_LEN` chars) to replacement
//! text. Lookups run backwards from the cursor through a suffix trie so the
//! longest key ending at the cursor is found in a single walk.

mod config;
mod table;

pub use config::{parse_mapping_json, MappingError};
pub use table::MappingTable;

/// Longest key a mapping table may contain, in chars.
pub const MAX_KEY_LEN: usize = 3;
