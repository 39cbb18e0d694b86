use crate::dom::dom_model::{ControlAttrs, Element};
use crate::fields::field_model::ControlKind;

/// Resolve an element to the control kind the applicator dispatches on, or
/// `None` when it is not something dictation should fill.
pub fn classify_control(el: &Element) -> Option<ControlKind> {
    match el.tag() {
        "textarea" => return Some(ControlKind::Text),
        "select" => return Some(ControlKind::Select),
        "input" => {}
        _ if el.is_content_editable() => return Some(ControlKind::ContentEditable),
        _ => return None,
    }

    match el.input_type().as_str() {
        "checkbox" => Some(ControlKind::Checkbox),
        "radio" => Some(ControlKind::Radio),

        // Never filled by dictation
        "hidden" | "submit" | "button" | "reset" | "image" | "file" | "password" | "color"
        | "range" | "time" | "month" | "week" => None,

        // text/email/tel/url/number/search/date/datetime-local, and anything
        // a browser would treat as text (missing or unknown type)
        _ => Some(ControlKind::Text),
    }
}

/// Text-like inputs take a direct value assignment.
pub fn is_text_like(el: &Element) -> bool {
    classify_control(el) == Some(ControlKind::Text)
}
