use serde::Serialize;

use crate::dom::dom_model::NodeId;

/// The closed set of control shapes the applicator knows how to fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ControlKind {
    Text,
    Checkbox,
    Radio,
    Select,
    ContentEditable,
}

/// One fillable control plus the text it is matched on.
///
/// Rebuilt on every fill pass; `element` is only valid against the document
/// it was indexed from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    pub element: NodeId,
    pub kind: ControlKind,
    pub name: String,
    pub id: String,
    pub label: String,
    pub search_text: String,
}
