//! `kctool type`: run keystrokes through a compositor over an in-memory
//! text area.

use std::path::Path;
use std::sync::Arc;

use kc_content::dom::DispatchedEvent;
use kc_content::{Document, MemoryDocument, Outcome, ResourceFetcher};
use kc_core::settings::Settings;
use kc_core::parse_catalog;
use kc_engine::Compositor;

use super::{die, dir_fetcher, CliError};

#[derive(Debug)]
pub struct TypeResult {
    pub text: String,
    pub replacements: usize,
    pub events: Vec<DispatchedEvent>,
}

pub fn simulate(
    dir: &Path,
    lang: &str,
    keys: &str,
    settings: &Settings,
) -> Result<TypeResult, CliError> {
    let fetcher = Arc::new(dir_fetcher(dir, settings));
    let catalog = parse_catalog(&fetcher.fetch_catalog()?)?;
    if !catalog.contains(lang) {
        return Err(CliError::UnknownLanguage(lang.to_string()));
    }

    let mut doc = MemoryDocument::new();
    let body = doc.root();
    let lang_attr = settings.fields.declared_attribute.as_str();
    let el = doc.add_element(body, "textarea", &[(lang_attr, lang)]);
    let mut compositor = Compositor::start(doc, fetcher, settings)?;
    compositor.settle();

    let outcomes = compositor.type_keys(el, keys);
    let replacements = outcomes
        .iter()
        .filter(|o| matches!(o, Outcome::Replaced(_)))
        .count();
    let doc = compositor.document_mut();
    Ok(TypeResult {
        text: doc.value(el).unwrap_or_default(),
        replacements,
        events: doc.take_events(),
    })
}

pub fn type_cmd(dir: &str, lang: &str, keys: &str, events: bool, settings: &Settings) {
    let result = die!(simulate(Path::new(dir), lang, keys, settings), "Error: {}");
    if events {
        for e in &result.events {
            let line = die!(serde_json::to_string(e), "Error: {}");
            println!("{line}");
        }
    }
    println!("{}", result.text);
}
