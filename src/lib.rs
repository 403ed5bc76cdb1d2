//! Keyboard compositor for web pages.
//!
//! `Compositor` wires the content layer together for one document: it loads
//! the language catalog, scans the page for fields with a known language,
//! and routes key events, DOM insertions and UI messages to the services
//! that handle them.

mod trace_init;

use std::io;
use std::sync::Arc;

use tracing::{debug, info};

pub use kc_content;
pub use kc_core;

pub use trace_init::init_tracing;

use kc_content::{
    Command, Decorator, Document, FetchError, FieldController, FieldDiscovery, KeyEvent,
    LanguageAttributes, LanguagePair, MappingCache, MemoryDocument, NodeId, Outcome,
    OverrideChannel, ResourceFetcher,
};
use kc_core::settings::Settings;
use kc_core::{parse_catalog, Catalog, CatalogError};

#[derive(Debug, thiserror::Error)]
pub enum CompositorError {
    #[error("cannot fetch catalog: {0}")]
    Fetch(#[from] FetchError),
    #[error("invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("cannot start mapping loader: {0}")]
    Spawn(#[from] io::Error),
}

/// The compositor running over one document.
///
/// All methods are meant to be called from the document's (UI) thread.
/// Mapping loads complete in the background and are applied by `poll`,
/// which `key_up` runs before handling each key.
pub struct Compositor<D: Document> {
    doc: D,
    catalog: Arc<Catalog>,
    cache: MappingCache,
    fields: FieldController,
    discovery: FieldDiscovery,
    channel: OverrideChannel,
}

impl<D: Document> Compositor<D> {
    /// Fetch the catalog, build the services and scan the whole document.
    pub fn start(
        doc: D,
        fetcher: Arc<dyn ResourceFetcher>,
        settings: &Settings,
    ) -> Result<Self, CompositorError> {
        let catalog = Arc::new(parse_catalog(&fetcher.fetch_catalog()?)?);
        info!(languages = catalog.len(), "catalog loaded");

        let attrs = LanguageAttributes::new(&settings.fields);
        let decorator = Decorator::new(&settings.decoration);
        let mut compositor = Self {
            doc,
            cache: MappingCache::new(fetcher, &settings.cache)?,
            fields: FieldController::new(&settings.fields),
            discovery: FieldDiscovery::new(
                Arc::clone(&catalog),
                attrs.clone(),
                decorator.clone(),
            ),
            channel: OverrideChannel::new(Arc::clone(&catalog), attrs, decorator),
            catalog,
        };

        let root = compositor.doc.root();
        let installed = compositor.discovery.scan(
            &mut compositor.doc,
            root,
            &mut compositor.cache,
            &mut compositor.fields,
        );
        debug!(installed, "initial scan");
        Ok(compositor)
    }

    /// Same as `start`, with the process-wide settings.
    pub fn start_default(
        doc: D,
        fetcher: Arc<dyn ResourceFetcher>,
    ) -> Result<Self, CompositorError> {
        Self::start(doc, fetcher, kc_core::settings::settings())
    }

    pub fn key_down(&mut self, el: NodeId, event: &KeyEvent) -> bool {
        self.fields.key_down(&mut self.doc, el, event)
    }

    pub fn key_up(&mut self, el: NodeId, event: &KeyEvent) -> Outcome {
        self.cache.poll();
        self.fields.key_up(&mut self.doc, &self.cache, el, event)
    }

    /// Nodes added to the document since the last call.
    pub fn nodes_inserted(&mut self, nodes: &[NodeId]) -> usize {
        self.discovery
            .nodes_inserted(&mut self.doc, nodes, &mut self.cache, &mut self.fields)
    }

    /// Handle a JSON message from the UI component, returning the JSON
    /// response if the command has one.
    pub fn handle_message(&mut self, message: &str) -> Option<String> {
        self.channel
            .handle_json(&mut self.doc, message, &mut self.cache, &mut self.fields)
    }

    pub fn dispatch(&mut self, command: Command) -> Option<LanguagePair> {
        self.channel
            .handle(&mut self.doc, command, &mut self.cache, &mut self.fields)
    }

    /// Apply finished mapping loads.
    pub fn poll(&mut self) -> usize {
        self.cache.poll()
    }

    /// Wait for every in-flight mapping load.
    pub fn settle(&mut self) {
        self.cache.settle();
    }

    pub fn document(&self) -> &D {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.doc
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cache(&self) -> &MappingCache {
        &self.cache
    }

    pub fn fields(&self) -> &FieldController {
        &self.fields
    }
}

impl Compositor<MemoryDocument> {
    /// Type `text` into `el` the way a user would: key-down, native
    /// insertion, then key-up for every char.
    pub fn type_keys(&mut self, el: NodeId, text: &str) -> Vec<Outcome> {
        text.chars()
            .map(|c| {
                let event = KeyEvent::from_char(c);
                self.key_down(el, &event);
                self.doc.type_char(el, c);
                self.key_up(el, &event)
            })
            .collect()
    }
}
