use std::sync::LazyLock;
use std::thread;
use std::time::Duration;

use scraper::Selector;
use tracing::debug;

use crate::dom::dom_model::{ControlAttrs, Document, EventKind, NodeId};
use crate::error::Result;
use crate::fields::field_model::{ControlKind, FieldDescriptor};
use crate::fill::fill_model::FillOptions;
use crate::text::normalize::{normalize, similarity, want_tokens};

static LABEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("label").expect("valid selector"));
static QUESTION_ROW: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".form-line, .jf-question").expect("valid selector"));

// ============================================================================
// Shared setters: every value change is announced with input + change
// ============================================================================

/// Focus `id`, assign `value`, then emit `input` and `change`.
pub fn assign_text(doc: &mut Document, id: NodeId, value: &str) -> Result<()> {
    doc.focus(id);
    doc.set_value(id, value)?;
    doc.dispatch(id, EventKind::Input);
    doc.dispatch(id, EventKind::Change);
    Ok(())
}

/// Assign without focusing; used for composite sub-controls.
pub fn assign_quiet(doc: &mut Document, id: NodeId, value: &str) -> Result<()> {
    doc.set_value(id, value)?;
    doc.dispatch(id, EventKind::Input);
    doc.dispatch(id, EventKind::Change);
    Ok(())
}

/// Option position with the highest score strictly above zero; the first
/// one seen wins ties.
pub fn best_option<F>(doc: &Document, select: NodeId, score: F) -> Option<usize>
where
    F: Fn(&str, &str) -> f32,
{
    let mut best: Option<(usize, f32)> = None;
    for (index, option) in doc.options(select).into_iter().enumerate() {
        let s = score(&doc.option_text(option), &doc.option_value(option));
        if s > best.map_or(0.0, |(_, b)| b) {
            best = Some((index, s));
        }
    }
    best.map(|(index, _)| index)
}

/// Select `index` and emit `change`.
pub fn choose_option(doc: &mut Document, select: NodeId, index: usize) -> Result<()> {
    doc.select_option(select, index)?;
    doc.dispatch(select, EventKind::Change);
    Ok(())
}

/// Text naming a checkbox/radio option: `label[for]`, else the wrapping
/// label, else the whole question row.
pub fn closest_option_label(doc: &Document, input: NodeId) -> String {
    let element_id = doc.attr(input, "id").unwrap_or("");
    if let Some(label) = doc.label_for(element_id) {
        return doc.text_content(label).trim().to_string();
    }
    if let Some(wrapper) = doc.closest(input, &LABEL) {
        return doc.text_content(wrapper).trim().to_string();
    }
    if let Some(row) = doc.closest(input, &QUESTION_ROW) {
        return doc.text_content(row).trim().to_string();
    }
    String::new()
}

pub fn pace(options: &FillOptions) {
    if options.click_pacing > Duration::ZERO {
        thread::sleep(options.click_pacing);
    }
}

// ============================================================================
// Generic applicator: dispatch on the descriptor's control kind
// ============================================================================

/// Apply `value` to the matched field. Returns whether the field ended up
/// carrying the value (for choice groups: whether any option matched).
pub fn apply_value(
    doc: &mut Document,
    field: &FieldDescriptor,
    value: &str,
    options: &FillOptions,
) -> Result<bool> {
    match field.kind {
        ControlKind::Text => {
            assign_text(doc, field.element, value)?;
            Ok(true)
        }
        ControlKind::Checkbox | ControlKind::Radio => check_group(doc, field.element, value, options),
        ControlKind::Select => {
            let Some(index) = best_option(doc, field.element, |text, val| {
                similarity(text, value).max(similarity(val, value))
            }) else {
                debug!(field = %field.search_text, "no option resembles the value");
                return Ok(false);
            };
            choose_option(doc, field.element, index)?;
            Ok(true)
        }
        ControlKind::ContentEditable => {
            doc.focus(field.element);
            doc.replace_text(field.element, value)?;
            doc.dispatch(field.element, EventKind::Input);
            Ok(true)
        }
    }
}

/// Same-typed, same-named inputs; a nameless control is its own group.
pub fn find_group(doc: &Document, input: NodeId) -> Vec<NodeId> {
    let Some(el) = doc.element(input) else {
        return vec![];
    };
    let name = el.field_name().to_string();
    if name.is_empty() || !el.is_checkable() {
        return vec![input];
    }
    let input_type = el.input_type();
    doc.elements()
        .into_iter()
        .filter(|id| {
            doc.element(*id).is_some_and(|peer| {
                peer.tag() == "input" && peer.input_type() == input_type && peer.field_name() == name
            })
        })
        .collect()
}

fn check_group(doc: &mut Document, input: NodeId, value: &str, options: &FillOptions) -> Result<bool> {
    let wants = want_tokens(value);
    let mut matched = false;

    for candidate in find_group(doc, input) {
        let raw_value = doc.value(candidate);
        let mut label = closest_option_label(doc, candidate);
        if label.is_empty() {
            label = raw_value.clone();
        }
        if label.is_empty() {
            label = doc.attr(candidate, "name").unwrap_or("").to_string();
        }

        let label = normalize(&label);
        let raw_value = normalize(&raw_value);
        let wanted = wants
            .iter()
            .any(|w| label.contains(w.as_str()) || raw_value.contains(w.as_str()));

        if !wanted {
            continue;
        }
        matched = true;

        // Clicking an already-checked box would undo it
        if !doc.is_checked(candidate) {
            doc.click(candidate)?;
            pace(options);
        }
    }

    Ok(matched)
}
