//! Language-independent core of the keyboard compositor.
//!
//! Holds the pieces that never touch a document: transliteration tables,
//! the longest-match `decide` engine, the language catalog and settings.

pub mod catalog;
pub mod engine;
pub mod mapping;
pub mod settings;
pub mod unicode;

pub use catalog::{parse_catalog, Catalog, CatalogError, LanguageEntry};
pub use engine::{decide, Replacement};
pub use mapping::{MappingError, MappingTable, MAX_KEY_LEN};
