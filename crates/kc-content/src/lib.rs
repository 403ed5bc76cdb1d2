//! Content layer of the keyboard compositor.
//!
//! Everything that runs against a page: the document abstraction, the
//! per-field controller with its synthetic edit protocol, the mapping cache,
//! field discovery, decoration and the override channel.

pub mod cache;
pub mod decoration;
pub mod discovery;
pub mod dom;
pub mod fetch;
pub mod field;
pub mod override_channel;

#[cfg(test)]
mod tests;

pub use cache::{LoadError, MappingCache, MappingState};
pub use decoration::Decorator;
pub use discovery::FieldDiscovery;
pub use dom::{Document, KeyEvent, MemoryDocument, NodeId, Selection};
pub use fetch::{DirFetcher, FetchError, ResourceFetcher};
pub use field::{FieldController, LanguageAttributes, Outcome, Unavailable};
pub use override_channel::{Command, LanguagePair, OverrideChannel};
