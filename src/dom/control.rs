use scraper::Node;
use scraper::node::Text;

use crate::dom::dom_model::{ControlAttrs, ControlSnapshot, ControlState, Document, EventKind, NodeId};
use crate::error::{FillError, Result};

// ============================================================================
// Form control state: value, checkedness, selection, contenteditable text
// ============================================================================

impl Document {
    /// Seed live state from markup: input value and checkedness from their
    /// attributes, textarea value from its text, select position from
    /// `selected` options.
    pub(crate) fn seed_controls(&mut self) {
        for id in self.elements() {
            let Some(el) = self.element(id) else {
                continue;
            };
            let state = match el.tag() {
                "input" => ControlState {
                    value: match el.attr("value") {
                        Some(v) => v.to_string(),
                        None if el.is_checkable() => "on".to_string(),
                        None => String::new(),
                    },
                    checked: el.is_checkable() && el.attr("checked").is_some(),
                    selected_index: None,
                },
                "textarea" => {
                    let text = self.text_content(id);
                    ControlState {
                        value: text.strip_prefix('\n').unwrap_or(&text).to_string(),
                        ..ControlState::default()
                    }
                }
                "select" => {
                    let options = self.options(id);
                    let preselected = options
                        .iter()
                        .rposition(|o| self.attr(*o, "selected").is_some());
                    ControlState {
                        selected_index: preselected.or(if options.is_empty() { None } else { Some(0) }),
                        ..ControlState::default()
                    }
                }
                _ => continue,
            };
            if let Some(tid) = self.tree_id(id) {
                self.controls.insert(tid, state);
            }
        }
    }

    /// Current value as a script would read `.value` (selects report the
    /// selected option's value, contenteditable hosts their text).
    pub fn value(&self, id: NodeId) -> String {
        let Some(el) = self.element(id) else {
            return String::new();
        };
        match el.tag() {
            "select" => self
                .selected_index(id)
                .and_then(|i| self.options(id).get(i).copied())
                .map(|opt| self.option_value(opt))
                .unwrap_or_default(),
            _ if el.is_content_editable() => self.inner_text(id),
            _ => self.control(id).map(|c| c.value.clone()).unwrap_or_default(),
        }
    }

    pub fn is_checked(&self, id: NodeId) -> bool {
        self.control(id).is_some_and(|c| c.checked)
    }

    /// Assign `.value`. For a select this picks the first option whose value
    /// (then visible text) equals `value`; returns whether anything was set.
    pub fn set_value(&mut self, id: NodeId, value: &str) -> Result<bool> {
        let tag = self.require_element(id)?.tag().to_string();
        match tag.as_str() {
            "input" | "textarea" => {
                self.control_mut(id)?.value = value.to_string();
                Ok(true)
            }
            "select" => {
                let options = self.options(id);
                let wanted = value.trim();
                let position = options
                    .iter()
                    .position(|o| self.option_value(*o) == wanted)
                    .or_else(|| {
                        options
                            .iter()
                            .position(|o| self.option_text(*o).eq_ignore_ascii_case(wanted))
                    });
                match position {
                    Some(index) => {
                        self.control_mut(id)?.selected_index = Some(index);
                        Ok(true)
                    }
                    None => Ok(false),
                }
            }
            _ => Err(FillError::NotAControl {
                tag,
                operation: "set_value",
            }),
        }
    }

    pub fn focus(&mut self, id: NodeId) {
        self.focused = Some(id);
        self.dispatch(id, EventKind::Focus);
    }

    /// Activate an element the way a user click would. Checkboxes toggle,
    /// radios become checked and uncheck their same-named peers; a state
    /// change is followed by `input` and `change`.
    pub fn click(&mut self, id: NodeId) -> Result<()> {
        let el = self.require_element(id)?;
        let input_type = el.input_type();
        let is_input = el.tag() == "input";
        let name = el.field_name().to_string();
        let was_checked = self.is_checked(id);

        self.dispatch(id, EventKind::Click);

        if !is_input {
            return Ok(());
        }

        match input_type.as_str() {
            "checkbox" => {
                self.control_mut(id)?.checked = !was_checked;
            }
            "radio" => {
                if was_checked {
                    return Ok(());
                }
                if !name.is_empty() {
                    for peer in self.elements() {
                        let same_group = self.element(peer).is_some_and(|p| {
                            p.tag() == "input" && p.input_type() == "radio" && p.field_name() == name
                        });
                        if same_group {
                            self.control_mut(peer)?.checked = false;
                        }
                    }
                }
                self.control_mut(id)?.checked = true;
            }
            _ => return Ok(()),
        }

        self.dispatch(id, EventKind::Input);
        self.dispatch(id, EventKind::Change);
        Ok(())
    }

    /// `<option>` descendants of a select, in order.
    pub fn options(&self, select: NodeId) -> Vec<NodeId> {
        self.descendants(select)
            .into_iter()
            .filter(|id| self.tag(*id) == "option")
            .collect()
    }

    pub fn option_text(&self, option: NodeId) -> String {
        let text = self.inner_text(option);
        if text.is_empty() {
            self.attr(option, "label").unwrap_or("").trim().to_string()
        } else {
            text
        }
    }

    pub fn option_value(&self, option: NodeId) -> String {
        match self.attr(option, "value") {
            Some(v) => v.to_string(),
            None => self.option_text(option),
        }
    }

    pub fn selected_index(&self, select: NodeId) -> Option<usize> {
        self.control(select)?.selected_index
    }

    pub fn select_option(&mut self, select: NodeId, index: usize) -> Result<()> {
        let count = self.options(select).len();
        if index >= count {
            return Err(FillError::OptionOutOfRange { index, count });
        }
        self.control_mut(select)?.selected_index = Some(index);
        Ok(())
    }

    /// Replace all children of `id` with a single text node. Detached
    /// elements drop out of `elements()` and every selector query.
    pub fn replace_text(&mut self, id: NodeId, text: &str) -> Result<()> {
        self.require_element(id)?;
        let tid = self.tree_id(id).ok_or(FillError::UnknownNode(id))?;
        let children: Vec<_> = self
            .html
            .tree
            .get(tid)
            .map(|n| n.children().map(|c| c.id()).collect())
            .unwrap_or_default();
        for child in children {
            if let Some(mut node) = self.html.tree.get_mut(child) {
                node.detach();
            }
        }
        if !text.is_empty() {
            let mut host = self.html.tree.get_mut(tid).ok_or(FillError::UnknownNode(id))?;
            host.append(Node::Text(Text {
                text: text.to_string().into(),
            }));
        }
        Ok(())
    }

    /// State of every form control and contenteditable host, document order.
    pub fn snapshot(&self) -> Vec<ControlSnapshot> {
        self.elements()
            .into_iter()
            .filter_map(|id| {
                let el = self.element(id)?;
                let is_control = matches!(el.tag(), "input" | "select" | "textarea");
                if !is_control && !el.is_content_editable() {
                    return None;
                }
                let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
                Some(ControlSnapshot {
                    tag: el.tag().to_string(),
                    input_type: non_empty(&el.input_type()),
                    name: non_empty(el.field_name()),
                    id: non_empty(el.field_id()),
                    value: self.value(id),
                    checked: el.is_checkable().then(|| self.is_checked(id)),
                })
            })
            .collect()
    }
}
