//! Language override commands sent by the context menu.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use kc_core::Catalog;

use crate::cache::MappingCache;
use crate::decoration::Decorator;
use crate::dom::{Document, NodeId};
use crate::field::{FieldController, LanguageAttributes};

/// A message from the UI component. `element_id` is a context-menu target;
/// absent means the focused element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    GetLang {
        #[serde(rename = "elementId", default, skip_serializing_if = "Option::is_none")]
        element_id: Option<u64>,
    },
    SetLang {
        #[serde(rename = "elementId", default, skip_serializing_if = "Option::is_none")]
        element_id: Option<u64>,
        lang: String,
    },
    RemoveLang {
        #[serde(rename = "elementId", default, skip_serializing_if = "Option::is_none")]
        element_id: Option<u64>,
    },
}

impl Command {
    fn element_id(&self) -> Option<u64> {
        match self {
            Command::GetLang { element_id }
            | Command::SetLang { element_id, .. }
            | Command::RemoveLang { element_id } => *element_id,
        }
    }
}

/// GET_LANG response, serialized as `[declared, override]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguagePair(pub Option<String>, pub Option<String>);

pub struct OverrideChannel {
    catalog: Arc<Catalog>,
    attrs: LanguageAttributes,
    decorator: Decorator,
}

impl OverrideChannel {
    pub fn new(catalog: Arc<Catalog>, attrs: LanguageAttributes, decorator: Decorator) -> Self {
        Self {
            catalog,
            attrs,
            decorator,
        }
    }

    /// Resolve the element a command applies to. Inside a content-editable
    /// region this climbs to the editing host.
    pub fn resolve_target(&self, doc: &dyn Document, element_id: Option<u64>) -> Option<NodeId> {
        let mut el = match element_id {
            Some(id) => doc.target_element(id),
            None => doc.active_element(),
        }?;
        while doc.is_content_editable(el)
            && !doc
                .attribute(el, "contenteditable")
                .is_some_and(|v| v.eq_ignore_ascii_case("true"))
        {
            el = doc.parent(el)?;
        }
        Some(el)
    }

    /// Handle a command. Only GET_LANG answers; commands for an unknown
    /// target are dropped.
    pub fn handle(
        &self,
        doc: &mut dyn Document,
        command: Command,
        cache: &mut MappingCache,
        fields: &mut FieldController,
    ) -> Option<LanguagePair> {
        let Some(el) = self.resolve_target(doc, command.element_id()) else {
            debug!(?command, "no target element, dropping");
            return None;
        };
        let old_override = self.attrs.override_lang(doc, el);

        match command {
            Command::GetLang { .. } => {
                return Some(LanguagePair(self.attrs.declared(doc, el), old_override));
            }
            Command::SetLang { lang, .. } => {
                cache.load(&lang);
                self.attrs.set_override(doc, el, &lang);
                match self.catalog.find(&lang) {
                    Some(entry) => {
                        self.decorator.decorate(doc, el, entry);
                        fields.install(el);
                    }
                    None => {
                        warn!(lang = %lang, "override language not in catalog");
                        self.decorator.remove(doc, el);
                    }
                }
            }
            Command::RemoveLang { .. } => {
                if old_override.is_none() {
                    debug!(?el, "no override to remove");
                    return None;
                }
                self.attrs.clear_override(doc, el);
                let declared = self.attrs.declared(doc, el);
                match declared.as_deref().and_then(|d| self.catalog.find(d)) {
                    Some(entry) => {
                        cache.load(&entry.code);
                        self.decorator.decorate(doc, el, entry);
                    }
                    None => {
                        self.decorator.remove(doc, el);
                        fields.uninstall(el);
                    }
                }
            }
        }
        None
    }

    /// Handle a JSON-encoded message, returning the JSON-encoded response.
    /// Malformed messages are logged and dropped.
    pub fn handle_json(
        &self,
        doc: &mut dyn Document,
        message: &str,
        cache: &mut MappingCache,
        fields: &mut FieldController,
    ) -> Option<String> {
        let command: Command = match serde_json::from_str(message) {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "malformed message");
                return None;
            }
        };
        let response = self.handle(doc, command, cache, fields)?;
        match serde_json::to_string(&response) {
            Ok(json) => Some(json),
            Err(e) => {
                warn!(error = %e, "cannot encode response");
                None
            }
        }
    }
}
