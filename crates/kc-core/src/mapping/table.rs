use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use super::config::{parse_mapping_json, validate, MappingError};
use super::MAX_KEY_LEN;

/// Suffix-trie node: children are keyed by the char *preceding* the
/// already-matched tail.
#[derive(Debug, Default)]
struct Node {
    children: HashMap<char, Node>,
    replacement: Option<String>,
}

/// Immutable longest-match lookup table for one language.
#[derive(Debug)]
pub struct MappingTable {
    root: Node,
    len: usize,
}

impl MappingTable {
    /// Build from a validated key → replacement map.
    pub fn from_map(map: BTreeMap<String, String>) -> Result<Self, MappingError> {
        validate(&map)?;
        let mut table = MappingTable {
            root: Node::default(),
            len: 0,
        };
        for (key, replacement) in map {
            table.insert(&key, replacement);
        }
        debug!(keys = table.len, "mapping table built");
        Ok(table)
    }

    /// Parse and build from a JSON mapping resource.
    pub fn from_json(json: &str) -> Result<Self, MappingError> {
        Self::from_map(parse_mapping_json(json)?)
    }

    fn insert(&mut self, key: &str, replacement: String) {
        let mut node = &mut self.root;
        for c in key.chars().rev() {
            node = node.children.entry(c).or_default();
        }
        if node.replacement.replace(replacement).is_none() {
            self.len += 1;
        }
    }

    /// Exact lookup of a single key.
    pub fn get(&self, key: &str) -> Option<&str> {
        let mut node = &self.root;
        for c in key.chars().rev() {
            node = node.children.get(&c)?;
        }
        node.replacement.as_deref()
    }

    /// Longest key that is a suffix of the chars yielded by `before_cursor`,
    /// which must iterate backwards starting at the char just before the
    /// cursor. Returns the key length in chars and its replacement.
    pub fn longest_suffix<I>(&self, before_cursor: I) -> Option<(usize, &str)>
    where
        I: Iterator<Item = char>,
    {
        let mut node = &self.root;
        let mut best = None;
        for (depth, c) in before_cursor.take(MAX_KEY_LEN).enumerate() {
            match node.children.get(&c) {
                Some(child) => node = child,
                None => break,
            }
            if let Some(ref replacement) = node.replacement {
                best = Some((depth + 1, replacement.as_str()));
            }
        }
        best
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
