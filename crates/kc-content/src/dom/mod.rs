//! Document surface the content layer runs against.
//!
//! `Document` is the narrow slice of a DOM the compositor needs: attribute
//! access, a tree walk, the editing state of a field and synthetic event
//! dispatch. Hosts implement it over their real document; `MemoryDocument`
//! is a self-contained implementation used by tests and the CLI.

mod memory;

use serde::{Deserialize, Serialize};

pub use memory::{DispatchedEvent, FocusChange, MemoryDocument};

/// Handle to a node of a `Document`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text,
    Document,
    Fragment,
}

/// Selection bounds of a field, in chars. Either bound may be unavailable
/// (e.g. a content-editable selection spanning several text nodes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: Option<usize>,
    pub end: Option<usize>,
}

impl Selection {
    pub fn collapsed(pos: usize) -> Self {
        Self {
            start: Some(pos),
            end: Some(pos),
        }
    }

    pub fn range(start: usize, end: usize) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Cursor position when both bounds are known and equal.
    pub fn caret(&self) -> Option<usize> {
        match (self.start, self.end) {
            (Some(s), Some(e)) if s == e => Some(s),
            _ => None,
        }
    }
}

/// A physical key event delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: String,
    pub code: String,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub meta: bool,
}

impl KeyEvent {
    pub fn new(key: &str, code: &str) -> Self {
        Self {
            key: key.to_string(),
            code: code.to_string(),
            ..Self::default()
        }
    }

    /// Event for typing `c` on a US layout (best-effort `code`).
    pub fn from_char(c: char) -> Self {
        let code = if c.is_ascii_alphabetic() {
            format!("Key{}", c.to_ascii_uppercase())
        } else if c.is_ascii_digit() {
            format!("Digit{c}")
        } else if c == ' ' {
            "Space".to_string()
        } else {
            String::new()
        };
        Self {
            key: c.to_string(),
            code,
            shift: c.is_uppercase(),
            ..Self::default()
        }
    }

    pub fn enter() -> Self {
        Self::new("Enter", "Enter")
    }

    /// Alt, Ctrl or Meta held. Shift alone is ordinary typing.
    pub fn has_modifier(&self) -> bool {
        self.alt || self.ctrl || self.meta
    }

    pub fn is_enter(&self) -> bool {
        self.key == "Enter"
    }
}

/// Init dictionary of a synthetic keyboard event. All synthetic events
/// bubble and are cancelable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyInit {
    pub key: String,
    pub code: String,
    pub shift: bool,
}

impl KeyInit {
    pub fn backspace() -> Self {
        Self {
            key: "Backspace".to_string(),
            code: "Backspace".to_string(),
            shift: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum InputType {
    DeleteContentBackward,
    InsertText,
    InsertReplacementText,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputInit {
    pub input_type: InputType,
    pub data: Option<String>,
}

impl InputInit {
    pub fn delete_backward() -> Self {
        Self {
            input_type: InputType::DeleteContentBackward,
            data: None,
        }
    }

    pub fn insert_text(data: &str) -> Self {
        Self {
            input_type: InputType::InsertText,
            data: Some(data.to_string()),
        }
    }

    pub fn replacement_text(data: &str) -> Self {
        Self {
            input_type: InputType::InsertReplacementText,
            data: Some(data.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SyntheticEvent {
    KeyDown(KeyInit),
    KeyPress(KeyInit),
    KeyUp(KeyInit),
    Input(InputInit),
}

/// DOM operations used by the content layer.
///
/// Attribute names are case-insensitive; implementations normalize them.
/// Text offsets are in chars.
pub trait Document {
    /// Top of the scanned tree (the body of a page).
    fn root(&self) -> NodeId;
    fn node_kind(&self, node: NodeId) -> Option<NodeKind>;
    /// Lowercase tag name of an element.
    fn tag_name(&self, node: NodeId) -> Option<String>;
    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;
    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);
    fn remove_attribute(&mut self, node: NodeId, name: &str);

    fn parent(&self, node: NodeId) -> Option<NodeId>;
    /// Element descendants of `node` in document order, excluding `node`.
    fn descendants(&self, node: NodeId) -> Vec<NodeId>;
    fn next_element_sibling(&self, node: NodeId) -> Option<NodeId>;
    fn create_element(&mut self, tag: &str) -> NodeId;
    fn append_child(&mut self, parent: NodeId, child: NodeId);
    /// Insert `node` right after `reference` under the same parent.
    fn insert_after(&mut self, reference: NodeId, node: NodeId);
    fn remove(&mut self, node: NodeId);

    /// Editable by inheritance (`isContentEditable`).
    fn is_content_editable(&self, node: NodeId) -> bool;
    /// Computed display is `block`.
    fn is_block(&self, node: NodeId) -> bool;
    fn active_element(&self) -> Option<NodeId>;
    /// Resolve a context-menu target id.
    fn target_element(&self, target_id: u64) -> Option<NodeId>;

    /// Text of an editable field; `None` when unavailable.
    fn value(&self, node: NodeId) -> Option<String>;
    fn set_value(&mut self, node: NodeId, value: &str);
    fn selection(&self, node: NodeId) -> Selection;
    fn set_selection(&mut self, node: NodeId, selection: Selection);
    fn blur(&mut self, node: NodeId);
    fn focus(&mut self, node: NodeId);
    fn dispatch(&mut self, node: NodeId, event: SyntheticEvent);
}

/// `class` attribute contains `class`.
pub fn has_class(doc: &dyn Document, node: NodeId, class: &str) -> bool {
    doc.attribute(node, "class")
        .is_some_and(|c| c.split_whitespace().any(|c| c == class))
}
