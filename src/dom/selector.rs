use std::sync::LazyLock;

use scraper::{ElementRef, Selector};

use crate::dom::dom_model::{Document, NodeId};
use crate::error::{FillError, Result};

static LABEL_FOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("label[for]").expect("valid selector"));

/// Compile a CSS selector list built at runtime.
pub fn compile(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| FillError::InvalidSelector {
        selector: css.to_string(),
        message: e.to_string(),
    })
}

impl Document {
    pub fn matches(&self, id: NodeId, selector: &Selector) -> bool {
        self.element_ref(id).is_some_and(|el| selector.matches(&el))
    }

    /// Descendants of `scope` matching `selector`, document order. For the
    /// document root this includes the `<html>` element itself.
    pub fn select_all(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        let found: Vec<ElementRef<'_>> = if scope == Document::ROOT {
            let html = self.html.root_element();
            std::iter::once(html)
                .filter(|el| selector.matches(el))
                .chain(html.select(selector))
                .collect()
        } else {
            match self.element_ref(scope) {
                Some(el) => el.select(selector).collect(),
                None => vec![],
            }
        };
        found
            .into_iter()
            .filter_map(|el| self.node_id(el.id()))
            .collect()
    }

    pub fn select_first(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        self.select_all(scope, selector).into_iter().next()
    }

    /// Nearest inclusive ancestor matching `selector`.
    pub fn closest(&self, id: NodeId, selector: &Selector) -> Option<NodeId> {
        let start = self.element_ref(id)?;
        std::iter::successors(Some(start), |el| el.parent().and_then(ElementRef::wrap))
            .find(|el| selector.matches(el))
            .and_then(|el| self.node_id(el.id()))
    }

    /// First `<label for="...">` pointing at `element_id`.
    pub fn label_for(&self, element_id: &str) -> Option<NodeId> {
        if element_id.is_empty() {
            return None;
        }
        self.select_all(Document::ROOT, &LABEL_FOR)
            .into_iter()
            .find(|label| self.attr(*label, "for") == Some(element_id))
    }
}
