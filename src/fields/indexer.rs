use std::sync::LazyLock;

use scraper::Selector;
use tracing::debug;

use crate::dom::dom_model::{ControlAttrs, Document, NodeId};
use crate::fields::classifier::classify_control;
use crate::fields::field_model::FieldDescriptor;
use crate::text::normalize::prettify_identifier;

static LABEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("label").expect("valid selector"));
static BLOCK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div, section, li, td, th, p").expect("valid selector"));
static CAPTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span, strong, b, p, h1, h2, h3, h4").expect("valid selector"));

/// Walk the live document and describe every fillable control, in document
/// order. Nothing is cached: the page may have re-rendered since last time.
pub fn index_fields(doc: &Document) -> Vec<FieldDescriptor> {
    let fields: Vec<FieldDescriptor> = doc
        .elements()
        .into_iter()
        .filter_map(|id| describe(doc, id))
        .collect();

    debug!(count = fields.len(), "indexed form fields");
    fields
}

fn describe(doc: &Document, id: NodeId) -> Option<FieldDescriptor> {
    let el = doc.element(id)?;
    let kind = classify_control(el)?;

    let name = el.field_name().to_string();
    let element_id = el.field_id().to_string();
    let label = resolve_label(doc, id);

    let pretty = prettify_identifier(if name.is_empty() { &element_id } else { &name });
    let search_text = [
        label.as_str(),
        el.attr("placeholder").unwrap_or(""),
        el.attr("aria-label").unwrap_or(""),
        el.attr("title").unwrap_or(""),
        name.as_str(),
        element_id.as_str(),
        pretty.as_str(),
    ]
    .iter()
    .map(|part| part.trim())
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" | ");

    Some(FieldDescriptor {
        element: id,
        kind,
        name,
        id: element_id,
        label,
        search_text,
    })
}

/// Human label of a control: `label[for]`, else the wrapping `<label>`, else
/// `aria-labelledby` targets, else the first label-ish text in the nearest
/// block container.
pub fn resolve_label(doc: &Document, id: NodeId) -> String {
    let element_id = doc.attr(id, "id").unwrap_or("");
    if let Some(label) = doc.label_for(element_id) {
        return doc.inner_text(label);
    }

    if let Some(wrapper) = doc.closest(id, &LABEL) {
        return doc.inner_text(wrapper);
    }

    if let Some(refs) = doc.attr(id, "aria-labelledby") {
        let text = refs
            .split_whitespace()
            .filter_map(|r| doc.get_element_by_id(r))
            .map(|r| doc.inner_text(r))
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !text.is_empty() {
            return text;
        }
    }

    block_label(doc, id).unwrap_or_default()
}

fn block_label(doc: &Document, id: NodeId) -> Option<String> {
    let container = doc
        .parent_element(id)
        .and_then(|parent| doc.closest(parent, &BLOCK))
        .or_else(|| doc.parent_element(id))?;

    let caption = doc
        .select_first(container, &LABEL)
        .or_else(|| doc.select_first(container, &CAPTION))?;

    Some(doc.inner_text(caption))
}
