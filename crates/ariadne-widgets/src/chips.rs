//! Chips
//!
//! Filter chips are multi-select toggles (`.chip[role=checkbox]`). Input
//! chips are created from the text typed into a `.chip-input` and carry
//! their own remove button.

use ariadne_a11y::aria::is_checked;
use ariadne_a11y::{AriaRole, AriaState, Politeness};
use ariadne_dom::{Document, Key, NodeId};

use crate::controller::{Controller, Dispatch, WidgetCx, WidgetEvent};
use crate::dom::trimmed_text;
use crate::error::RuntimeResult;

const CLOSE_ICON_PATH: &str = "M19 6.41L17.59 5 12 10.59 6.41 5 5 6.41 10.59 12 5 17.59 6.41 19 \
     12 13.41 17.59 19 19 17.59 13.41 12z";

#[derive(Debug, Clone, Default)]
pub struct ChipsController {
    /// `.chip-input` elements
    inputs: Vec<NodeId>,
}

impl ChipsController {
    pub fn mount(doc: &mut Document) -> Option<Self> {
        let root = doc.tree.root();
        let filters = doc.tree.query_selector_all(root, ".chip[role=checkbox]");
        for &chip in &filters {
            let checked = is_checked(&doc.tree, chip);
            AriaState::Checked(checked).apply(&mut doc.tree, chip);
        }
        let inputs = doc.tree.query_selector_all(root, ".chip-input");
        let has_chips = !filters.is_empty() || doc.tree.query_selector(root, ".chip").is_some();
        (has_chips || !inputs.is_empty()).then_some(Self { inputs })
    }

    /// Flip a filter chip
    pub fn toggle(&mut self, cx: &mut WidgetCx<'_>, chip: NodeId) {
        let checked = !is_checked(&cx.doc.tree, chip);
        AriaState::Checked(checked).apply(&mut cx.doc.tree, chip);
        let text = chip_text(cx.doc, chip);
        let state = if checked { "selected" } else { "unselected" };
        cx.announce(&format!("{text} filter {state}"), Politeness::Polite);
    }

    /// Create an input chip in front of `input`
    pub fn add(&mut self, cx: &mut WidgetCx<'_>, input: NodeId, text: &str) -> NodeId {
        let tree = &mut cx.doc.tree;
        let chip = tree.create_element("div");
        tree.set_attr(chip, "class", "chip input-chip");
        tree.set_attr(chip, "role", "button");
        tree.set_attr(chip, "tabindex", "-1");

        let label = tree.create_element("span");
        tree.set_attr(label, "class", "chip-text");
        tree.set_text_content(label, text);

        let remove = tree.create_element("button");
        tree.set_attr(remove, "class", "chip-remove");
        tree.set_attr(remove, "aria-label", format!("Remove {text} tag"));
        let icon = tree.create_element("svg");
        tree.set_attr(icon, "width", "16");
        tree.set_attr(icon, "height", "16");
        tree.set_attr(icon, "viewBox", "0 0 24 24");
        tree.set_attr(icon, "aria-hidden", "true");
        let path = tree.create_element("path");
        tree.set_attr(path, "d", CLOSE_ICON_PATH);

        let attached = tree
            .append_child(icon, path)
            .and_then(|_| tree.append_child(remove, icon))
            .and_then(|_| tree.append_child(chip, label))
            .and_then(|_| tree.append_child(chip, remove));
        let inserted = attached.and_then(|_| {
            let parent = tree.parent(input).unwrap_or(tree.root());
            tree.insert_before(parent, chip, Some(input))
        });
        if let Err(err) = inserted {
            tracing::warn!("chip {text:?} not inserted: {err}");
        }

        cx.announce(&format!("{text} added"), Politeness::Polite);
        chip
    }

    /// Detach an input chip
    pub fn remove(&mut self, cx: &mut WidgetCx<'_>, chip: NodeId) {
        let text = chip_text(cx.doc, chip);
        cx.doc.remove(chip);
        cx.announce(&format!("{text} removed"), Politeness::Polite);
    }
}

fn chip_text(doc: &Document, chip: NodeId) -> String {
    match doc.tree.query_selector(chip, ".chip-text") {
        Some(text) => trimmed_text(doc, text),
        None => trimmed_text(doc, chip),
    }
}

impl Controller for ChipsController {
    fn owns(&self, doc: &Document, target: NodeId) -> bool {
        self.inputs.contains(&target) || doc.tree.closest(target, ".chip").is_some()
    }

    fn on_event(
        &mut self,
        cx: &mut WidgetCx<'_>,
        target: NodeId,
        event: WidgetEvent<'_>,
    ) -> RuntimeResult<Dispatch> {
        if self.inputs.contains(&target) {
            let WidgetEvent::KeyDown(key) = event else {
                return Ok(Dispatch::Ignored);
            };
            if key.key != Key::Enter {
                return Ok(Dispatch::Ignored);
            }
            let value = cx.doc.tree.attr(target, "value").unwrap_or_default().trim().to_string();
            if value.is_empty() {
                return Ok(Dispatch::Ignored);
            }
            self.add(cx, target, &value);
            cx.doc.tree.set_attr(target, "value", "");
            return Ok(Dispatch::Handled);
        }

        let Some(chip) = cx.doc.tree.closest(target, ".chip") else {
            return Ok(Dispatch::Ignored);
        };
        let remove = cx
            .doc
            .tree
            .closest(target, ".chip-remove")
            .filter(|&r| cx.doc.tree.contains(chip, r));
        let is_filter = AriaRole::of(&cx.doc.tree, chip) == Some(AriaRole::Checkbox);

        match event {
            WidgetEvent::Click if remove.is_some() => {
                self.remove(cx, chip);
                Ok(Dispatch::Handled)
            }
            WidgetEvent::Click if is_filter => {
                self.toggle(cx, chip);
                Ok(Dispatch::Handled)
            }
            // keys on the remove button stay with the button
            WidgetEvent::KeyDown(key)
                if is_filter && target == chip && matches!(key.key, Key::Enter | Key::Space) =>
            {
                self.toggle(cx, chip);
                Ok(Dispatch::Handled)
            }
            _ => Ok(Dispatch::Ignored),
        }
    }
}
