use std::collections::HashMap;

use ego_tree::NodeRef;
use scraper::{ElementRef, Html, Node};
use serde::Serialize;

use crate::error::{FillError, Result};

pub use scraper::node::Element;

/// Node identity inside scraper's tree.
pub(crate) type TreeId = ego_tree::NodeId;

// ============================================================================
// Page document: scraper's tree plus the live form state a browser keeps
// ============================================================================

/// Position of an element in document order at parse time. `Document::ROOT`
/// (position 0) is the document node itself. Only meaningful for the
/// document that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub usize);

/// Attribute helpers shared by the classifier and the fill engines.
pub trait ControlAttrs {
    /// Lower-case tag name.
    fn tag(&self) -> &str;
    /// `name` attribute, empty when absent.
    fn field_name(&self) -> &str;
    /// `id` attribute, empty when absent.
    fn field_id(&self) -> &str;
    /// Lower-cased `type` attribute (empty when absent).
    fn input_type(&self) -> String;
    fn is_checkable(&self) -> bool;
    fn is_content_editable(&self) -> bool;
}

impl ControlAttrs for Element {
    fn tag(&self) -> &str {
        self.name()
    }

    fn field_name(&self) -> &str {
        self.attr("name").unwrap_or("")
    }

    fn field_id(&self) -> &str {
        self.attr("id").unwrap_or("")
    }

    fn input_type(&self) -> String {
        self.attr("type").unwrap_or("").trim().to_ascii_lowercase()
    }

    fn is_checkable(&self) -> bool {
        self.tag() == "input" && matches!(self.input_type().as_str(), "checkbox" | "radio")
    }

    fn is_content_editable(&self) -> bool {
        self.attr("contenteditable").is_some_and(|v| {
            matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "" | "true" | "plaintext-only"
            )
        })
    }
}

/// Live state of one input, textarea or select.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlState {
    /// Current value for inputs and textareas
    pub value: String,
    /// Checkedness for checkboxes and radios
    pub checked: bool,
    /// Selected option position for selects
    pub selected_index: Option<usize>,
}

/// Notification kinds a host page can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Focus,
    Input,
    Change,
    Click,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomEvent {
    pub target: NodeId,
    pub kind: EventKind,
}

/// Final state of one control, for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlSnapshot {
    pub tag: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct Document {
    pub url: Option<String>,
    pub(crate) html: Html,
    /// `NodeId` position -> tree node
    order: Vec<TreeId>,
    positions: HashMap<TreeId, NodeId>,
    pub(crate) controls: HashMap<TreeId, ControlState>,
    pub(crate) events: Vec<DomEvent>,
    pub(crate) focused: Option<NodeId>,
}

impl Document {
    pub const ROOT: NodeId = NodeId(0);

    /// Wrap a parsed page. Elements are numbered in document order and every
    /// input, textarea and select gets its live state seeded from markup.
    pub fn from_html(html: Html, url: Option<&str>) -> Self {
        let root = html.tree.root();
        let order: Vec<TreeId> = std::iter::once(root.id())
            .chain(root.descendants().filter(|n| n.value().is_element()).map(|n| n.id()))
            .collect();
        let positions = order
            .iter()
            .enumerate()
            .map(|(i, tid)| (*tid, NodeId(i)))
            .collect();

        let mut doc = Self {
            url: url.map(str::to_string),
            html,
            order,
            positions,
            controls: HashMap::new(),
            events: vec![],
            focused: None,
        };
        doc.seed_controls();
        doc
    }

    pub fn root(&self) -> NodeId {
        Self::ROOT
    }

    pub(crate) fn tree_id(&self, id: NodeId) -> Option<TreeId> {
        self.order.get(id.0).copied()
    }

    pub(crate) fn node_id(&self, tid: TreeId) -> Option<NodeId> {
        self.positions.get(&tid).copied()
    }

    pub(crate) fn tree_node(&self, id: NodeId) -> Option<NodeRef<'_, Node>> {
        self.html.tree.get(self.tree_id(id)?)
    }

    pub(crate) fn element_ref(&self, id: NodeId) -> Option<ElementRef<'_>> {
        ElementRef::wrap(self.tree_node(id)?)
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.element_ref(id).map(|e| e.value())
    }

    pub(crate) fn require_element(&self, id: NodeId) -> Result<&Element> {
        self.element(id).ok_or(FillError::UnknownNode(id))
    }

    pub(crate) fn control(&self, id: NodeId) -> Option<&ControlState> {
        self.controls.get(&self.tree_id(id)?)
    }

    pub(crate) fn control_mut(&mut self, id: NodeId) -> Result<&mut ControlState> {
        let tid = self.tree_id(id).ok_or(FillError::UnknownNode(id))?;
        self.controls.get_mut(&tid).ok_or(FillError::UnknownNode(id))
    }

    pub fn tag(&self, id: NodeId) -> &str {
        self.element(id).map(|e| e.tag()).unwrap_or("")
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attr(name)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.tree_node(id)?.parent()?;
        self.node_id(parent.id())
    }

    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).filter(|p| self.element(*p).is_some())
    }

    /// Element ancestors, nearest first, excluding `id` itself.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let Some(node) = self.tree_node(id) else {
            return vec![];
        };
        node.ancestors()
            .filter(|n| n.value().is_element())
            .filter_map(|n| self.node_id(n.id()))
            .collect()
    }

    /// Descendant elements of `id` in document order, excluding `id`.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let Some(node) = self.tree_node(id) else {
            return vec![];
        };
        node.descendants()
            .skip(1)
            .filter(|n| n.value().is_element())
            .filter_map(|n| self.node_id(n.id()))
            .collect()
    }

    /// Every element still attached to the document, in document order.
    pub fn elements(&self) -> Vec<NodeId> {
        self.descendants(Self::ROOT)
    }

    pub fn get_element_by_id(&self, element_id: &str) -> Option<NodeId> {
        if element_id.is_empty() {
            return None;
        }
        self.elements()
            .into_iter()
            .find(|id| self.attr(*id, "id") == Some(element_id))
    }

    /// Raw concatenated text of all descendant text nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(node) = self.tree_node(id) {
            collect_text(node, &mut out);
        }
        out
    }

    /// Rendered-ish text: whitespace collapsed and trimmed.
    pub fn inner_text(&self, id: NodeId) -> String {
        crate::text::normalize::collapse_whitespace(&self.text_content(id))
    }

    /// Notifications dispatched so far, oldest first.
    pub fn events(&self) -> &[DomEvent] {
        &self.events
    }

    pub fn events_for(&self, target: NodeId) -> Vec<EventKind> {
        self.events
            .iter()
            .filter(|e| e.target == target)
            .map(|e| e.kind)
            .collect()
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    pub fn dispatch(&mut self, target: NodeId, kind: EventKind) {
        self.events.push(DomEvent { target, kind });
    }
}

fn collect_text(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(t) => out.push_str(t),
        Node::Element(el) if matches!(el.name(), "script" | "style" | "template") => {}
        _ => {
            for child in node.children() {
                collect_text(child, out);
            }
        }
    }
}
