//! Per-field key handling.
//!
//! `FieldController` tracks which elements have the compositor installed and
//! runs the key-down/key-up handlers for them. The effective language is
//! resolved from the element's attributes on every keystroke; nothing about
//! the language is cached on the controller.

mod protocol;

use std::collections::HashSet;

use tracing::{debug, debug_span, error, warn};

use kc_core::settings::FieldSettings;
use kc_core::{decide, Replacement};

pub use protocol::{strategy_for, BulkReplace, EditStrategy, KeystrokeReplay};

use crate::cache::{MappingCache, MappingState};
use crate::dom::{Document, KeyEvent, NodeId};

/// Names of the declared and override language attributes.
#[derive(Debug, Clone)]
pub struct LanguageAttributes {
    declared: String,
    overridden: String,
}

impl LanguageAttributes {
    pub fn new(settings: &FieldSettings) -> Self {
        Self {
            declared: settings.declared_attribute.clone(),
            overridden: settings.override_attribute.clone(),
        }
    }

    pub fn declared(&self, doc: &dyn Document, el: NodeId) -> Option<String> {
        non_empty(doc.attribute(el, &self.declared))
    }

    pub fn override_lang(&self, doc: &dyn Document, el: NodeId) -> Option<String> {
        non_empty(doc.attribute(el, &self.overridden))
    }

    /// Override language if set, else declared language.
    pub fn effective(&self, doc: &dyn Document, el: NodeId) -> Option<String> {
        self.override_lang(doc, el)
            .or_else(|| self.declared(doc, el))
    }

    pub fn set_override(&self, doc: &mut dyn Document, el: NodeId, code: &str) {
        doc.set_attribute(el, &self.overridden, code);
    }

    pub fn clear_override(&self, doc: &mut dyn Document, el: NodeId) {
        doc.remove_attribute(el, &self.overridden);
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Why a language could not be used for a keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unavailable {
    Unloaded,
    Loading,
    Failed,
}

/// What a key-up did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    NotInstalled,
    Modifier,
    NoLanguage,
    NotReady(Unavailable),
    NoSelection,
    NoValue,
    NoMatch,
    Replaced(Replacement),
}

pub struct FieldController {
    installed: HashSet<NodeId>,
    attrs: LanguageAttributes,
    enter_refocus: bool,
    strategy: Box<dyn EditStrategy>,
}

impl FieldController {
    pub fn new(settings: &FieldSettings) -> Self {
        Self {
            installed: HashSet::new(),
            attrs: LanguageAttributes::new(settings),
            enter_refocus: settings.enter_refocus,
            strategy: strategy_for(settings.replay),
        }
    }

    /// Replace the strategy used to write replacements back.
    pub fn with_strategy(mut self, strategy: Box<dyn EditStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn attributes(&self) -> &LanguageAttributes {
        &self.attrs
    }

    /// Attach the handlers to `el`. Returns false if already installed.
    pub fn install(&mut self, el: NodeId) -> bool {
        let added = self.installed.insert(el);
        if added {
            debug!(?el, "installing on element");
        }
        added
    }

    /// Detach the handlers from `el`. Returns false if not installed.
    pub fn uninstall(&mut self, el: NodeId) -> bool {
        let removed = self.installed.remove(&el);
        if removed {
            debug!(?el, "uninstalling from element");
        }
        removed
    }

    pub fn is_installed(&self, el: NodeId) -> bool {
        self.installed.contains(&el)
    }

    pub fn installed_count(&self) -> usize {
        self.installed.len()
    }

    /// Key-down handler. On Enter the field is blurred and refocused with its
    /// selection kept, which some sites need to keep tracking the cursor.
    /// Returns true when the field was refocused.
    pub fn key_down(&self, doc: &mut dyn Document, el: NodeId, event: &KeyEvent) -> bool {
        if !self.is_installed(el) || event.has_modifier() {
            return false;
        }
        if !event.is_enter() || !self.enter_refocus {
            return false;
        }

        let selection = doc.selection(el);
        doc.blur(el);
        doc.focus(el);
        doc.set_selection(el, selection);
        debug!(?el, "refocused on Enter");
        true
    }

    /// Key-up handler: remap the chars before the cursor when they form a
    /// key of the field's effective mapping.
    pub fn key_up(
        &self,
        doc: &mut dyn Document,
        cache: &MappingCache,
        el: NodeId,
        event: &KeyEvent,
    ) -> Outcome {
        if !self.is_installed(el) {
            return Outcome::NotInstalled;
        }
        if event.has_modifier() {
            return Outcome::Modifier;
        }
        let _span = debug_span!("key_up", ?el, key = %event.key).entered();

        let Some(code) = self.attrs.effective(doc, el) else {
            debug!("no language on element");
            return Outcome::NoLanguage;
        };
        let table = match cache.get(&code) {
            MappingState::Ready(table) => table,
            MappingState::Unloaded => {
                error!(code = %code, "mapping is not loading");
                return Outcome::NotReady(Unavailable::Unloaded);
            }
            MappingState::Loading => {
                warn!(code = %code, "mapping is not loaded");
                return Outcome::NotReady(Unavailable::Loading);
            }
            MappingState::Failed => {
                warn!(code = %code, "mapping failed to load");
                return Outcome::NotReady(Unavailable::Failed);
            }
        };

        let Some(cursor) = doc.selection(el).caret() else {
            debug!("selection unavailable or not collapsed");
            return Outcome::NoSelection;
        };
        let Some(text) = doc.value(el) else {
            debug!("field value unavailable");
            return Outcome::NoValue;
        };

        match decide(&text, cursor, &table) {
            Some(replacement) => {
                debug!(
                    remove = replacement.remove_len,
                    insert = %replacement.insert_text,
                    "replacing"
                );
                self.strategy
                    .apply(doc, el, event, &text, cursor, &replacement);
                Outcome::Replaced(replacement)
            }
            None => Outcome::NoMatch,
        }
    }
}
