//! Custom listbox (select-only combobox)
//!
//! A trigger button with `aria-haspopup="listbox"` and `aria-controls`
//! naming the popup list of `[role=option]` items.

use ariadne_a11y::aria::is_expanded;
use ariadne_a11y::{AriaState, Edge, Politeness, RovingTabindex};
use ariadne_dom::{Document, Key, NodeId};

use crate::controller::{Controller, Dispatch, DocumentEvent, WidgetCx, WidgetEvent};
use crate::dom::{referenced, set_shown, trimmed_text};
use crate::error::RuntimeResult;

const OPEN_CLASS: &str = "show";

#[derive(Debug, Clone)]
pub struct ListboxController {
    trigger: NodeId,
    listbox: NodeId,
    roving: RovingTabindex,
}

impl ListboxController {
    pub fn mount(doc: &mut Document) -> Vec<Self> {
        let triggers = doc
            .tree
            .query_selector_all(doc.tree.root(), "[aria-haspopup=listbox][aria-controls]");
        triggers
            .into_iter()
            .filter_map(|trigger| {
                let Some(listbox) = referenced(doc, trigger, "aria-controls") else {
                    tracing::warn!("listbox trigger {trigger} controls a missing element");
                    return None;
                };
                let options = doc.tree.query_selector_all(listbox, "[role=option]");
                if options.is_empty() {
                    tracing::warn!("listbox {listbox} has no options");
                }
                let selected = options
                    .iter()
                    .position(|&o| doc.tree.attr(o, "aria-selected") == Some("true"))
                    .unwrap_or(0);
                let mut roving = RovingTabindex::new(options, Edge::Clamp);
                roving.init(doc, selected);

                let open = doc.tree.has_class(listbox, OPEN_CLASS);
                AriaState::Expanded(open).apply(&mut doc.tree, trigger);
                set_shown(doc, listbox, OPEN_CLASS, open);
                Some(Self { trigger, listbox, roving })
            })
            .collect()
    }

    pub fn trigger(&self) -> NodeId {
        self.trigger
    }

    pub fn listbox(&self) -> NodeId {
        self.listbox
    }

    pub fn is_open(&self, doc: &Document) -> bool {
        is_expanded(&doc.tree, self.trigger)
    }

    fn selected_index(&self, doc: &Document) -> usize {
        self.roving
            .items()
            .iter()
            .position(|&o| doc.tree.attr(o, "aria-selected") == Some("true"))
            .unwrap_or(0)
    }

    /// Open the popup and focus the selected (or first) option
    pub fn open(&mut self, cx: &mut WidgetCx<'_>) {
        AriaState::Expanded(true).apply(&mut cx.doc.tree, self.trigger);
        set_shown(cx.doc, self.listbox, OPEN_CLASS, true);
        let index = self.selected_index(cx.doc);
        self.roving.set_active(cx.doc, index);
        tracing::debug!("listbox {} open", self.listbox);
    }

    pub fn close(&mut self, cx: &mut WidgetCx<'_>, refocus: bool) {
        AriaState::Expanded(false).apply(&mut cx.doc.tree, self.trigger);
        set_shown(cx.doc, self.listbox, OPEN_CLASS, false);
        if refocus {
            cx.focus(self.trigger);
        }
        tracing::debug!("listbox {} closed", self.listbox);
    }

    /// Select the option at `index`, label the trigger with it and close
    pub fn commit(&mut self, cx: &mut WidgetCx<'_>, index: usize) {
        let Some(&option) = self.roving.items().get(index) else { return };
        for (i, &other) in self.roving.items().iter().enumerate() {
            AriaState::Selected(i == index).apply(&mut cx.doc.tree, other);
        }
        self.roving.adopt(cx.doc, index);

        let text = trimmed_text(cx.doc, option);
        cx.doc.tree.set_text_content(self.trigger, &text);
        self.close(cx, true);
        cx.announce(&format!("Selected: {text}"), Politeness::Polite);
    }

    fn option_of(&self, doc: &Document, target: NodeId) -> Option<usize> {
        std::iter::once(target)
            .chain(doc.tree.ancestors(target))
            .take_while(|&n| n != self.listbox)
            .find_map(|n| self.roving.index_of(n))
    }

    fn on_trigger_key(&mut self, cx: &mut WidgetCx<'_>, key: &Key) -> Dispatch {
        match key {
            Key::ArrowDown => {
                self.open(cx);
                Dispatch::Handled
            }
            Key::Escape if self.is_open(cx.doc) => {
                self.close(cx, false);
                Dispatch::Handled
            }
            _ => Dispatch::Ignored,
        }
    }

    fn on_option_key(&mut self, cx: &mut WidgetCx<'_>, current: usize, key: &Key) -> Dispatch {
        self.roving.adopt(cx.doc, current);
        match key {
            Key::ArrowDown => {
                self.roving.next(cx.doc);
            }
            Key::ArrowUp => {
                self.roving.previous(cx.doc);
            }
            Key::Home => {
                self.roving.first(cx.doc);
            }
            Key::End => {
                self.roving.last(cx.doc);
            }
            Key::Enter | Key::Space => self.commit(cx, current),
            Key::Escape => self.close(cx, true),
            _ => return Dispatch::Ignored,
        }
        Dispatch::Handled
    }
}

impl Controller for ListboxController {
    fn owns(&self, doc: &Document, target: NodeId) -> bool {
        doc.tree.contains(self.trigger, target) || doc.tree.contains(self.listbox, target)
    }

    fn on_event(
        &mut self,
        cx: &mut WidgetCx<'_>,
        target: NodeId,
        event: WidgetEvent<'_>,
    ) -> RuntimeResult<Dispatch> {
        let on_trigger = cx.doc.tree.contains(self.trigger, target);
        let option = self.option_of(cx.doc, target);
        let dispatch = match (event, on_trigger, option) {
            (WidgetEvent::KeyDown(event), true, _) => self.on_trigger_key(cx, &event.key),
            (WidgetEvent::KeyDown(event), false, Some(current)) => {
                self.on_option_key(cx, current, &event.key)
            }
            (WidgetEvent::Click, true, _) => {
                if self.is_open(cx.doc) {
                    self.close(cx, false);
                } else {
                    self.open(cx);
                }
                Dispatch::Handled
            }
            (WidgetEvent::Click, false, Some(index)) => {
                self.commit(cx, index);
                Dispatch::Handled
            }
            _ => Dispatch::Ignored,
        };
        Ok(dispatch)
    }

    fn on_document(&mut self, cx: &mut WidgetCx<'_>, event: DocumentEvent<'_>) -> Dispatch {
        let DocumentEvent::Click(target) = event else {
            return Dispatch::Ignored;
        };
        if self.is_open(cx.doc) && !self.owns(cx.doc, target) {
            self.close(cx, false);
            return Dispatch::Handled;
        }
        Dispatch::Ignored
    }
}
