//! Language icon shown next to a controlled field.

use tracing::debug;

use kc_core::settings::DecorationSettings;
use kc_core::LanguageEntry;

use crate::dom::{has_class, Document, NodeId};

pub const FLAG_CLASS: &str = "kc-flag";
pub const WRAPPER_CLASS: &str = "kc-div";

#[derive(Debug, Clone)]
pub struct Decorator {
    icon_prefix: String,
}

impl Decorator {
    pub fn new(settings: &DecorationSettings) -> Self {
        Self {
            icon_prefix: settings.icon_prefix.clone(),
        }
    }

    /// Insert the icon for `entry` right after `el`, replacing any previous
    /// one. Block-level fields get the icon wrapped in a `div`. Returns the
    /// inserted node, or `None` for a detached field.
    pub fn decorate(
        &self,
        doc: &mut dyn Document,
        el: NodeId,
        entry: &LanguageEntry,
    ) -> Option<NodeId> {
        doc.parent(el)?;
        self.remove(doc, el);

        let icon = doc.create_element("img");
        doc.set_attribute(icon, "src", &format!("{}{}", self.icon_prefix, entry.icon));
        doc.set_attribute(icon, "class", FLAG_CLASS);
        doc.set_attribute(icon, "alt", &entry.name);
        doc.set_attribute(icon, "title", &entry.name);

        let root = if doc.is_block(el) {
            doc.set_attribute(icon, "style", "vertical-align: top;");
            let wrapper = doc.create_element("div");
            doc.set_attribute(wrapper, "class", WRAPPER_CLASS);
            doc.append_child(wrapper, icon);
            wrapper
        } else {
            icon
        };

        doc.insert_after(el, root);
        debug!(?el, code = %entry.code, "decorated");
        Some(root)
    }

    /// Remove the icon (or its wrapper) following `el`, if present.
    pub fn remove(&self, doc: &mut dyn Document, el: NodeId) -> bool {
        let Some(next) = doc.next_element_sibling(el) else {
            return false;
        };
        let is_ours = match doc.tag_name(next).as_deref() {
            Some("img") => has_class(doc, next, FLAG_CLASS),
            Some("div") => has_class(doc, next, WRAPPER_CLASS),
            _ => false,
        };
        if is_ours {
            doc.remove(next);
        }
        is_ours
    }
}

#[cfg(test)]
mod tests {
    use kc_core::settings::Settings;

    use super::*;
    use crate::dom::MemoryDocument;

    fn entry() -> LanguageEntry {
        LanguageEntry {
            code: "ru".into(),
            name: "Русский".into(),
            icon: "ru.png".into(),
        }
    }

    fn decorator() -> Decorator {
        Decorator::new(&Settings::default().decoration)
    }

    #[test]
    fn test_inline_field_gets_bare_icon() {
        let mut doc = MemoryDocument::new();
        let body = doc.root();
        let input = doc.add_element(body, "input", &[("type", "text")]);
        let icon = decorator().decorate(&mut doc, input, &entry()).unwrap();
        assert_eq!(doc.next_element_sibling(input), Some(icon));
        assert_eq!(doc.tag_name(icon).as_deref(), Some("img"));
        assert_eq!(
            doc.attribute(icon, "src").as_deref(),
            Some("icons/32x32/flags/ru.png")
        );
        assert_eq!(doc.attribute(icon, "title").as_deref(), Some("Русский"));
    }

    #[test]
    fn test_block_field_gets_wrapper() {
        let mut doc = MemoryDocument::new();
        let body = doc.root();
        let area = doc.add_element(body, "textarea", &[]);
        doc.set_block(area, true);
        let wrapper = decorator().decorate(&mut doc, area, &entry()).unwrap();
        assert_eq!(doc.tag_name(wrapper).as_deref(), Some("div"));
        assert_eq!(doc.attribute(wrapper, "class").as_deref(), Some(WRAPPER_CLASS));
        let icon = doc.children(wrapper)[0];
        assert_eq!(
            doc.attribute(icon, "style").as_deref(),
            Some("vertical-align: top;")
        );
    }

    #[test]
    fn test_redecorate_replaces_icon() {
        let mut doc = MemoryDocument::new();
        let body = doc.root();
        let input = doc.add_element(body, "input", &[("type", "text")]);
        let d = decorator();
        d.decorate(&mut doc, input, &entry());
        d.decorate(&mut doc, input, &entry());
        assert_eq!(doc.children(body).len(), 2);
    }

    #[test]
    fn test_remove_leaves_foreign_sibling() {
        let mut doc = MemoryDocument::new();
        let body = doc.root();
        let input = doc.add_element(body, "input", &[("type", "text")]);
        let other = doc.add_element(body, "img", &[("class", "avatar")]);
        assert!(!decorator().remove(&mut doc, input));
        assert_eq!(doc.next_element_sibling(input), Some(other));
    }

    #[test]
    fn test_detached_field_not_decorated() {
        let mut doc = MemoryDocument::new();
        let input = doc.create_element("input");
        assert_eq!(decorator().decorate(&mut doc, input, &entry()), None);
    }
}
