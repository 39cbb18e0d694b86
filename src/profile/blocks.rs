use std::sync::LazyLock;

use scraper::Selector;

use crate::dom::dom_model::{Document, NodeId};

static STRUCTURAL: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".form-line, .jf-question, [data-type][data-qid]").expect("valid selector")
});
static ID_PREFIXED: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"li[id^="id_"], div[id^="id_"]"#).expect("valid selector"));
static QUESTION_LABEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".form-label, .jf-field-label, label").expect("valid selector"));

/// Question containers in document order. Known structural classes first;
/// when a page has none, fall back to `id="id_*"` list items and divs.
pub fn all_questions(doc: &Document) -> Vec<NodeId> {
    let found = doc.select_all(Document::ROOT, &STRUCTURAL);
    if !found.is_empty() {
        return found;
    }
    doc.select_all(Document::ROOT, &ID_PREFIXED)
}

/// Visible label of a question block, whitespace collapsed.
pub fn question_label_text(doc: &Document, block: NodeId) -> String {
    doc.select_first(block, &QUESTION_LABEL)
        .map(|l| doc.inner_text(l))
        .unwrap_or_default()
}

/// First question whose label contains `needle`, case-insensitively.
pub fn find_question_by_label(doc: &Document, needle: &str) -> Option<NodeId> {
    let needle = needle.to_lowercase();
    all_questions(doc)
        .into_iter()
        .find(|q| question_label_text(doc, *q).to_lowercase().contains(&needle))
}
