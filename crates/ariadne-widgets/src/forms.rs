//! Form controls
//!
//! Inline validation for inputs marked `data-validate` (checked on blur,
//! cleared while typing) and announcements for native checkboxes, radio
//! buttons and selects.

use ariadne_a11y::{AriaState, Politeness};
use ariadne_dom::{Document, NodeId};

use crate::config::FormsConfig;
use crate::controller::{Controller, Dispatch, DocumentEvent, WidgetCx, WidgetEvent};
use crate::dom::{add_token, label_text, remove_token, trimmed_text};
use crate::error::RuntimeResult;

const ERROR_CLASS: &str = "error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Validated,
    Checkbox,
    Radio,
    Select,
}

#[derive(Debug, Clone)]
pub struct FormsController {
    controls: Vec<(NodeId, Control)>,
    min_length: usize,
}

impl FormsController {
    pub fn mount(doc: &mut Document, config: &FormsConfig) -> Option<Self> {
        let tree = &doc.tree;
        let root = tree.root();
        let mut controls = Vec::new();
        for input in tree.query_selector_all(root, "input[data-validate], input.demo-input") {
            controls.push((input, Control::Validated));
        }
        for input in tree.query_selector_all(root, "input[type=checkbox]") {
            controls.push((input, Control::Checkbox));
        }
        for input in tree.query_selector_all(root, "input[type=radio]") {
            controls.push((input, Control::Radio));
        }
        for select in tree.query_selector_all(root, "select") {
            controls.push((select, Control::Select));
        }
        (!controls.is_empty()).then_some(Self {
            controls,
            min_length: config.min_length,
        })
    }

    fn control_of(&self, target: NodeId) -> Option<Control> {
        self.controls
            .iter()
            .find_map(|&(node, kind)| (node == target).then_some(kind))
    }

    /// Error message for a value, if it is invalid
    pub fn check(&self, value: &str) -> Option<String> {
        let value = value.trim();
        if value.is_empty() {
            Some("This field is required".to_string())
        } else if value.chars().count() < self.min_length {
            Some(format!("Please enter at least {} characters", self.min_length))
        } else {
            None
        }
    }

    pub fn validate(&self, doc: &mut Document, input: NodeId) -> bool {
        let value = doc.tree.attr(input, "value").unwrap_or_default().to_string();
        match self.check(&value) {
            Some(message) => {
                show_error(doc, input, &message);
                false
            }
            None => {
                clear_error(doc, input);
                true
            }
        }
    }

    fn announce_change(&self, cx: &mut WidgetCx<'_>, target: NodeId, kind: Control) {
        let label = label_text(cx.doc, target).unwrap_or_default();
        let message = match kind {
            Control::Checkbox => {
                let state = if cx.doc.tree.has_attr(target, "checked") { "checked" } else { "unchecked" };
                format!("{label} {state}")
            }
            Control::Radio if cx.doc.tree.has_attr(target, "checked") => format!("Selected: {label}"),
            Control::Select => {
                let options = cx.doc.tree.query_selector_all(target, "option");
                let selected = options
                    .iter()
                    .copied()
                    .find(|&o| cx.doc.tree.has_attr(o, "selected"))
                    .or_else(|| options.first().copied());
                let Some(option) = selected else { return };
                format!("Selected: {}", trimmed_text(cx.doc, option))
            }
            _ => return,
        };
        cx.announce(&message, Politeness::Polite);
    }

    /// Pointer activation of a checkbox or radio button
    fn activate(&self, cx: &mut WidgetCx<'_>, target: NodeId, kind: Control) {
        match kind {
            Control::Checkbox => {
                if cx.doc.tree.remove_attr(target, "checked").is_none() {
                    cx.doc.tree.set_attr(target, "checked", "");
                }
            }
            Control::Radio => {
                if cx.doc.tree.has_attr(target, "checked") {
                    return;
                }
                let name = cx.doc.tree.attr(target, "name").map(str::to_string);
                if let Some(name) = name {
                    let group: Vec<NodeId> = self
                        .controls
                        .iter()
                        .filter(|&&(n, k)| k == Control::Radio && cx.doc.tree.attr(n, "name") == Some(name.as_str()))
                        .map(|&(n, _)| n)
                        .collect();
                    for radio in group {
                        cx.doc.tree.remove_attr(radio, "checked");
                    }
                }
                cx.doc.tree.set_attr(target, "checked", "");
            }
            _ => return,
        }
        self.announce_change(cx, target, kind);
    }
}

fn error_id(doc: &Document, input: NodeId) -> String {
    match doc.tree.attr(input, "id") {
        Some(id) => format!("{id}-error"),
        None => "input-error".to_string(),
    }
}

fn form_group(doc: &Document, input: NodeId) -> NodeId {
    doc.tree
        .closest(input, ".form-group")
        .or_else(|| doc.tree.parent(input))
        .unwrap_or(doc.body())
}

fn show_error(doc: &mut Document, input: NodeId, message: &str) {
    clear_error(doc, input);
    let id = error_id(doc, input);
    let group = form_group(doc, input);

    let error = doc.tree.create_element("div");
    doc.tree.set_attr(error, "class", "error-message");
    doc.tree.set_attr(error, "id", id.as_str());
    doc.tree.set_attr(error, "role", "alert");
    doc.tree.set_text_content(error, message);
    if let Err(err) = doc.tree.append_child(group, error) {
        tracing::warn!("validation message for {input} not attached: {err}");
    }

    doc.tree.add_class(input, ERROR_CLASS);
    AriaState::Invalid(true).apply(&mut doc.tree, input);
    add_token(doc, input, "aria-describedby", &id);
    tracing::debug!("input {input} invalid: {message}");
}

fn clear_error(doc: &mut Document, input: NodeId) {
    let id = error_id(doc, input);
    let group = form_group(doc, input);
    let stale: Vec<NodeId> = doc
        .tree
        .query_selector_all(group, ".error-message")
        .into_iter()
        .filter(|&e| doc.tree.attr(e, "id") == Some(id.as_str()))
        .collect();
    for error in stale {
        doc.remove(error);
    }
    doc.tree.remove_class(input, ERROR_CLASS);
    if doc.tree.has_attr(input, "aria-invalid") {
        AriaState::Invalid(false).apply(&mut doc.tree, input);
    }
    remove_token(doc, input, "aria-describedby", &id);
}

impl Controller for FormsController {
    fn owns(&self, _doc: &Document, target: NodeId) -> bool {
        self.control_of(target).is_some()
    }

    fn on_event(
        &mut self,
        cx: &mut WidgetCx<'_>,
        target: NodeId,
        event: WidgetEvent<'_>,
    ) -> RuntimeResult<Dispatch> {
        let Some(kind) = self.control_of(target) else {
            return Ok(Dispatch::Ignored);
        };
        match (event, kind) {
            (WidgetEvent::Input, Control::Validated) => {
                if cx.doc.tree.has_class(target, ERROR_CLASS) {
                    clear_error(cx.doc, target);
                }
                Ok(Dispatch::Handled)
            }
            (WidgetEvent::Click, Control::Checkbox | Control::Radio) => {
                self.activate(cx, target, kind);
                Ok(Dispatch::Handled)
            }
            (WidgetEvent::Change, Control::Checkbox | Control::Radio | Control::Select) => {
                self.announce_change(cx, target, kind);
                Ok(Dispatch::Handled)
            }
            _ => Ok(Dispatch::Ignored),
        }
    }

    fn on_document(&mut self, cx: &mut WidgetCx<'_>, event: DocumentEvent<'_>) -> Dispatch {
        let DocumentEvent::FocusChanged { from, .. } = event else {
            return Dispatch::Ignored;
        };
        if self.control_of(from) == Some(Control::Validated) {
            self.validate(cx.doc, from);
        }
        Dispatch::Ignored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_messages() {
        let forms = FormsController {
            controls: Vec::new(),
            min_length: 3,
        };
        assert_eq!(forms.check("   ").as_deref(), Some("This field is required"));
        assert_eq!(forms.check(" ab ").as_deref(), Some("Please enter at least 3 characters"));
        assert_eq!(forms.check("abc"), None);
    }
}
