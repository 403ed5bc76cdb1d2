use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use kc_core::unicode::{char_len, splice};

use super::{Document, NodeId, NodeKind, Selection, SyntheticEvent};

/// A synthetic event together with the node it was dispatched on and the
/// node's text at dispatch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchedEvent {
    pub target: NodeId,
    #[serde(flatten)]
    pub event: SyntheticEvent,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusChange {
    Blur(NodeId),
    Focus(NodeId),
}

#[derive(Debug)]
struct Node {
    kind: NodeKind,
    tag: String,
    attrs: BTreeMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    text: String,
    selection: Selection,
    block: bool,
}

impl Node {
    fn new(kind: NodeKind, tag: &str) -> Self {
        Self {
            kind,
            tag: tag.to_ascii_lowercase(),
            attrs: BTreeMap::new(),
            parent: None,
            children: Vec::new(),
            text: String::new(),
            selection: Selection::collapsed(0),
            block: matches!(tag.to_ascii_lowercase().as_str(), "div" | "p" | "body"),
        }
    }
}

/// Arena-backed document with just enough behavior to drive the content
/// layer headlessly: fields hold their own text and selection, and every
/// synthetic event and focus change is recorded for inspection.
#[derive(Debug)]
pub struct MemoryDocument {
    nodes: Vec<Node>,
    body: NodeId,
    active: Option<NodeId>,
    targets: HashMap<u64, NodeId>,
    events: Vec<DispatchedEvent>,
    focus_log: Vec<FocusChange>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// A document node with an empty `body`.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: vec![Node::new(NodeKind::Document, "#document")],
            body: NodeId(0),
            active: None,
            targets: HashMap::new(),
            events: Vec::new(),
            focus_log: Vec::new(),
        };
        let body = doc.create_element("body");
        doc.append_child(NodeId(0), body);
        doc.body = body;
        doc
    }

    pub fn document_node(&self) -> NodeId {
        NodeId(0)
    }

    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    pub fn create_fragment(&mut self) -> NodeId {
        self.push(Node::new(NodeKind::Fragment, "#document-fragment"))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        let mut node = Node::new(NodeKind::Text, "#text");
        node.text = text.to_string();
        self.push(node)
    }

    /// Create an element with attributes and append it to `parent`.
    pub fn add_element(&mut self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let id = self.create_element(tag);
        for (name, value) in attrs {
            self.set_attribute(id, name, value);
        }
        self.append_child(parent, id);
        id
    }

    pub fn set_block(&mut self, node: NodeId, block: bool) {
        if let Some(n) = self.node_mut(node) {
            n.block = block;
        }
    }

    pub fn set_active(&mut self, node: Option<NodeId>) {
        self.active = node;
    }

    pub fn register_target(&mut self, target_id: u64, node: NodeId) {
        self.targets.insert(target_id, node);
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.node(node).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn events(&self) -> &[DispatchedEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<DispatchedEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn focus_log(&self) -> &[FocusChange] {
        &self.focus_log
    }

    /// Native insertion of a typed char: replaces the selection (or appends
    /// when the selection is unavailable) and leaves a collapsed caret after
    /// the char.
    pub fn type_char(&mut self, node: NodeId, c: char) {
        let Some(n) = self.node_mut(node) else {
            return;
        };
        let len = char_len(&n.text);
        let (start, end) = match (n.selection.start, n.selection.end) {
            (Some(s), Some(e)) => (s.min(e).min(len), s.max(e).min(len)),
            _ => (len, len),
        };
        n.text = splice(&n.text, start, end, &c.to_string());
        if n.selection.start.is_some() && n.selection.end.is_some() {
            n.selection = Selection::collapsed(start + 1);
        }
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if n == ancestor {
                return true;
            }
            cur = self.node(n).and_then(|n| n.parent);
        }
        false
    }

    fn is_text_control(&self, node: NodeId) -> bool {
        self.node(node).is_some_and(|n| {
            n.kind == NodeKind::Element && matches!(n.tag.as_str(), "textarea" | "input")
        })
    }
}

impl Document for MemoryDocument {
    fn root(&self) -> NodeId {
        self.body
    }

    fn node_kind(&self, node: NodeId) -> Option<NodeKind> {
        self.node(node).map(|n| n.kind)
    }

    fn tag_name(&self, node: NodeId) -> Option<String> {
        self.node(node)
            .filter(|n| n.kind == NodeKind::Element)
            .map(|n| n.tag.clone())
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.node(node)?
            .attrs
            .get(&name.to_ascii_lowercase())
            .cloned()
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(n) = self.node_mut(node) {
            n.attrs.insert(name.to_ascii_lowercase(), value.to_string());
        }
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Some(n) = self.node_mut(node) {
            n.attrs.remove(&name.to_ascii_lowercase());
        }
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node)?.parent
    }

    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if self.node_kind(id) == Some(NodeKind::Element) {
                out.push(id);
            }
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    fn next_element_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let siblings = self.children(parent);
        let pos = siblings.iter().position(|&c| c == node)?;
        siblings[pos + 1..]
            .iter()
            .copied()
            .find(|&c| self.node_kind(c) == Some(NodeKind::Element))
    }

    fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Node::new(NodeKind::Element, tag))
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if self.node(parent).is_none() || self.node(child).is_none() {
            return;
        }
        if self.is_inclusive_ancestor(child, parent) {
            // Would make a cycle.
            return;
        }
        self.remove(child);
        // Appending a fragment moves its children.
        if self.node_kind(child) == Some(NodeKind::Fragment) {
            let moved = std::mem::take(&mut self.nodes[child.0].children);
            for c in moved {
                self.nodes[c.0].parent = Some(parent);
                self.nodes[parent.0].children.push(c);
            }
            return;
        }
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    fn insert_after(&mut self, reference: NodeId, node: NodeId) {
        let Some(parent) = self.parent(reference) else {
            return;
        };
        if self.node(node).is_none() {
            return;
        }
        self.remove(node);
        let siblings = &mut self.nodes[parent.0].children;
        let pos = siblings
            .iter()
            .position(|&c| c == reference)
            .map_or(siblings.len(), |p| p + 1);
        siblings.insert(pos, node);
        self.nodes[node.0].parent = Some(parent);
    }

    fn remove(&mut self, node: NodeId) {
        let Some(parent) = self.parent(node) else {
            return;
        };
        self.nodes[parent.0].children.retain(|&c| c != node);
        self.nodes[node.0].parent = None;
        if self.active == Some(node) {
            self.active = None;
        }
    }

    fn is_content_editable(&self, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(id) = cur {
            match self.attribute(id, "contenteditable").as_deref() {
                Some(v) if v.eq_ignore_ascii_case("true") || v.is_empty() => return true,
                Some(v) if v.eq_ignore_ascii_case("false") => return false,
                _ => cur = self.parent(id),
            }
        }
        false
    }

    fn is_block(&self, node: NodeId) -> bool {
        self.node(node).is_some_and(|n| n.block)
    }

    fn active_element(&self) -> Option<NodeId> {
        self.active
    }

    fn target_element(&self, target_id: u64) -> Option<NodeId> {
        self.targets.get(&target_id).copied()
    }

    fn value(&self, node: NodeId) -> Option<String> {
        if self.is_text_control(node) || self.is_content_editable(node) {
            self.node(node).map(|n| n.text.clone())
        } else {
            None
        }
    }

    fn set_value(&mut self, node: NodeId, value: &str) {
        if let Some(n) = self.node_mut(node) {
            n.text = value.to_string();
            let len = char_len(value);
            n.selection.start = n.selection.start.map(|s| s.min(len));
            n.selection.end = n.selection.end.map(|e| e.min(len));
        }
    }

    fn selection(&self, node: NodeId) -> Selection {
        self.node(node).map(|n| n.selection).unwrap_or_default()
    }

    fn set_selection(&mut self, node: NodeId, selection: Selection) {
        if let Some(n) = self.node_mut(node) {
            n.selection = selection;
        }
    }

    fn blur(&mut self, node: NodeId) {
        if self.active == Some(node) {
            self.active = None;
        }
        self.focus_log.push(FocusChange::Blur(node));
    }

    fn focus(&mut self, node: NodeId) {
        self.active = Some(node);
        self.focus_log.push(FocusChange::Focus(node));
    }

    fn dispatch(&mut self, node: NodeId, event: SyntheticEvent) {
        let value = self.node(node).map(|n| n.text.clone()).unwrap_or_default();
        self.events.push(DispatchedEvent {
            target: node,
            event,
            value,
        });
    }
}
