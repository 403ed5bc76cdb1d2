mod cache;
mod proptest_protocol;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use kc_core::settings::Settings;
use kc_core::{parse_catalog, Catalog};

use crate::cache::MappingCache;
use crate::decoration::Decorator;
use crate::discovery::FieldDiscovery;
use crate::dom::{Document, KeyEvent, MemoryDocument, NodeId};
use crate::fetch::{FetchError, ResourceFetcher};
use crate::field::{FieldController, LanguageAttributes, Outcome};
use crate::override_channel::{Command, LanguagePair, OverrideChannel};

pub(super) const LIST: &str = r#"[
    {"code": "ru", "name": "Русский", "icon": "ru.png"},
    {"code": "ya", "name": "Test", "icon": "ya.png"},
    {"code": "bad", "name": "Broken", "icon": "bad.png"}
]"#;

/// Chained keys: "s" → с, then "сh" → ш, then "шсh" → щ.
pub(super) const RU: &str = r#"{
    "a": "а", "b": "б", "c": "ц", "h": "х", "s": "с", "y": "ы",
    "сh": "ш", "цh": "ч", "шсh": "щ", "ыa": "я"
}"#;

pub(super) const YA: &str = r#"{"a": "а", "ya": "я"}"#;

/// In-memory resources that count mapping fetches per code.
pub(super) struct StaticFetcher {
    catalog: String,
    mappings: HashMap<String, String>,
    fetches: Mutex<HashMap<String, usize>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        let mut mappings = HashMap::new();
        mappings.insert("ru".to_string(), RU.to_string());
        mappings.insert("ya".to_string(), YA.to_string());
        mappings.insert("bad".to_string(), "{}".to_string());
        Self {
            catalog: LIST.to_string(),
            mappings,
            fetches: Mutex::new(HashMap::new()),
        }
    }

    pub fn fetch_count(&self, code: &str) -> usize {
        self.fetches
            .lock()
            .unwrap()
            .get(code)
            .copied()
            .unwrap_or(0)
    }
}

impl ResourceFetcher for StaticFetcher {
    fn fetch_catalog(&self) -> Result<String, FetchError> {
        Ok(self.catalog.clone())
    }

    fn fetch_mapping(&self, code: &str) -> Result<String, FetchError> {
        *self
            .fetches
            .lock()
            .unwrap()
            .entry(code.to_string())
            .or_insert(0) += 1;
        self.mappings
            .get(code)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(code.to_string()))
    }
}

/// All content-layer services wired together over a `MemoryDocument`.
pub(super) struct Harness {
    pub doc: MemoryDocument,
    pub cache: MappingCache,
    pub fields: FieldController,
    pub discovery: FieldDiscovery,
    pub channel: OverrideChannel,
    pub fetcher: Arc<StaticFetcher>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        let fetcher = Arc::new(StaticFetcher::new());
        let catalog: Arc<Catalog> = Arc::new(parse_catalog(LIST).unwrap());
        let attrs = LanguageAttributes::new(&settings.fields);
        let decorator = Decorator::new(&settings.decoration);
        Self {
            doc: MemoryDocument::new(),
            cache: MappingCache::new(fetcher.clone(), &settings.cache).unwrap(),
            fields: FieldController::new(&settings.fields),
            discovery: FieldDiscovery::new(catalog.clone(), attrs.clone(), decorator.clone()),
            channel: OverrideChannel::new(catalog, attrs, decorator),
            fetcher,
        }
    }

    /// Append a text area with the given `lang` to the body.
    pub fn textarea(&mut self, lang: Option<&str>) -> NodeId {
        let body = self.doc.root();
        match lang {
            Some(l) => self.doc.add_element(body, "textarea", &[("lang", l)]),
            None => self.doc.add_element(body, "textarea", &[]),
        }
    }

    pub fn scan(&mut self) -> usize {
        let root = self.doc.root();
        self.discovery
            .scan(&mut self.doc, root, &mut self.cache, &mut self.fields)
    }

    /// Scan the body and wait for every mapping to load.
    pub fn scan_and_settle(&mut self) -> usize {
        let n = self.scan();
        self.cache.settle();
        n
    }

    pub fn press(&mut self, el: NodeId, c: char) -> Outcome {
        let event = KeyEvent::from_char(c);
        self.fields.key_down(&mut self.doc, el, &event);
        self.doc.type_char(el, c);
        self.fields.key_up(&mut self.doc, &self.cache, el, &event)
    }

    pub fn type_str(&mut self, el: NodeId, s: &str) -> Vec<Outcome> {
        s.chars().map(|c| self.press(el, c)).collect()
    }

    pub fn send(&mut self, command: Command) -> Option<LanguagePair> {
        self.channel
            .handle(&mut self.doc, command, &mut self.cache, &mut self.fields)
    }

    pub fn value(&self, el: NodeId) -> String {
        self.doc.value(el).unwrap_or_default()
    }
}
