//! Catalog of available languages (`list.json`).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("JSON parse error: {0}")]
    Parse(String),
    #[error("catalog is empty")]
    Empty,
    #[error("entry with empty code: {0}")]
    EmptyCode(String),
    #[error("duplicate language code: {0}")]
    DuplicateCode(String),
}

/// One available language: its code, display name and flag icon file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageEntry {
    pub code: String,
    pub name: String,
    pub icon: String,
}

/// Ordered list of available languages.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<LanguageEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<LanguageEntry>) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::new();
        for entry in &entries {
            if entry.code.is_empty() {
                return Err(CatalogError::EmptyCode(entry.name.clone()));
            }
            if !seen.insert(entry.code.as_str()) {
                return Err(CatalogError::DuplicateCode(entry.code.clone()));
            }
        }
        Ok(Self { entries })
    }

    pub fn find(&self, code: &str) -> Option<&LanguageEntry> {
        self.entries.iter().find(|e| e.code == code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.find(code).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LanguageEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse the catalog resource: a JSON array of `{code, name, icon}`.
pub fn parse_catalog(json: &str) -> Result<Catalog, CatalogError> {
    let entries: Vec<LanguageEntry> =
        serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;
    let catalog = Catalog::new(entries)?;
    debug!(
        languages = catalog.len(),
        codes = ?catalog.iter().map(|e| e.code.as_str()).collect::<Vec<_>>(),
        "catalog parsed"
    );
    Ok(catalog)
}
