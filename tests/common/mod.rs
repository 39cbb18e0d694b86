#![allow(dead_code)]

use voice_form_fill::dom::dom_model::{Document, NodeId};
use voice_form_fill::dom::parser::parse_document;
use voice_form_fill::fill::fill_model::SpokenEntry;

pub const REMODEL_URL: &str = "https://form.jotform.com/51527382823962";

pub fn fixture(name: &str) -> String {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("fixture {}: {}", path.display(), e))
}

pub fn contact_form() -> Document {
    parse_document(&fixture("contact_form.html"), Some("https://example.com/quote"))
}

pub fn remodel_form() -> Document {
    parse_document(&fixture("remodel_estimate.html"), Some(REMODEL_URL))
}

/// Element with the given `id` attribute; panics when absent.
pub fn by_id(doc: &Document, id: &str) -> NodeId {
    doc.get_element_by_id(id)
        .unwrap_or_else(|| panic!("no element with id '{}'", id))
}

/// First element with the given `name` attribute; panics when absent.
pub fn by_name(doc: &Document, name: &str) -> NodeId {
    doc.elements()
        .into_iter()
        .find(|n| doc.attr(*n, "name") == Some(name))
        .unwrap_or_else(|| panic!("no element named '{}'", name))
}

pub fn entries(pairs: &[(&str, &str)]) -> Vec<SpokenEntry> {
    pairs.iter().map(|(k, v)| SpokenEntry::new(k, v)).collect()
}
