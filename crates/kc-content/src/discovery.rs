//! Finding editable fields whose declared language has a mapping.

use std::sync::Arc;

use tracing::{debug, debug_span};

use kc_core::Catalog;

use crate::cache::MappingCache;
use crate::decoration::Decorator;
use crate::dom::{Document, NodeId, NodeKind};
use crate::field::{FieldController, LanguageAttributes};

/// Text areas, `input[type=text]` and `[contenteditable=true]` elements.
pub fn is_editable_candidate(doc: &dyn Document, node: NodeId) -> bool {
    if doc.node_kind(node) != Some(NodeKind::Element) {
        return false;
    }
    match doc.tag_name(node).as_deref() {
        Some("textarea") => return true,
        Some("input") => {
            if doc
                .attribute(node, "type")
                .is_some_and(|t| t.eq_ignore_ascii_case("text"))
            {
                return true;
            }
        }
        _ => {}
    }
    doc.attribute(node, "contenteditable")
        .is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

pub struct FieldDiscovery {
    catalog: Arc<Catalog>,
    attrs: LanguageAttributes,
    decorator: Decorator,
}

impl FieldDiscovery {
    pub fn new(catalog: Arc<Catalog>, attrs: LanguageAttributes, decorator: Decorator) -> Self {
        Self {
            catalog,
            attrs,
            decorator,
        }
    }

    /// Scan `root` and its descendants. Every candidate whose declared
    /// language is in the catalog gets its mapping loaded, the controller
    /// installed and the icon of its effective language. Returns the number of newly
    /// installed fields.
    pub fn scan(
        &self,
        doc: &mut dyn Document,
        root: NodeId,
        cache: &mut MappingCache,
        fields: &mut FieldController,
    ) -> usize {
        let _span = debug_span!("scan", ?root).entered();

        let mut nodes = vec![root];
        nodes.extend(doc.descendants(root));

        let mut installed = 0;
        for node in nodes {
            if !is_editable_candidate(doc, node) {
                continue;
            }
            let Some(code) = self.attrs.declared(doc, node) else {
                continue;
            };
            let Some(entry) = self.catalog.find(&code) else {
                continue;
            };
            cache.load(&entry.code);
            if fields.install(node) {
                installed += 1;
            }
            // The icon follows the active language, so a rescan must not
            // undo an override.
            match self.attrs.override_lang(doc, node) {
                None => {
                    self.decorator.decorate(doc, node, entry);
                }
                Some(lang) => match self.catalog.find(&lang) {
                    Some(active) => {
                        self.decorator.decorate(doc, node, active);
                    }
                    None => {
                        self.decorator.remove(doc, node);
                    }
                },
            }
        }

        debug!(installed, "scan finished");
        installed
    }

    /// Mutation notification: scan every inserted element, document or
    /// fragment node. Other node kinds are ignored.
    pub fn nodes_inserted(
        &self,
        doc: &mut dyn Document,
        nodes: &[NodeId],
        cache: &mut MappingCache,
        fields: &mut FieldController,
    ) -> usize {
        let mut installed = 0;
        for &node in nodes {
            if matches!(
                doc.node_kind(node),
                Some(NodeKind::Element | NodeKind::Document | NodeKind::Fragment)
            ) {
                installed += self.scan(doc, node, cache, fields);
            }
        }
        installed
    }
}
