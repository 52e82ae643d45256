//! Dialog controller
//!
//! Triggers name their overlay with `data-dialog-open`; the overlay may name
//! its initial focus target with `data-initial-focus`. All focus confinement
//! is delegated to the runtime's single focus trap.

use ariadne_a11y::AriaState;
use ariadne_dom::{Document, NodeId};

use crate::controller::{Controller, Dispatch, WidgetCx, WidgetEvent};
use crate::error::RuntimeResult;

const CLOSE_ACTIONS: [&str; 4] = ["close", "cancel", "save", "confirm"];

#[derive(Debug, Clone)]
pub struct DialogController {
    overlay: NodeId,
    triggers: Vec<NodeId>,
    initial_focus: Option<NodeId>,
}

impl DialogController {
    /// One controller per overlay named by at least one trigger
    pub fn mount(doc: &mut Document) -> Vec<Self> {
        let mut dialogs: Vec<Self> = Vec::new();
        let triggers = doc.tree.query_selector_all(doc.tree.root(), "[data-dialog-open]");
        for trigger in triggers {
            let Some(overlay_id) = doc.tree.attr(trigger, "data-dialog-open") else { continue };
            let Some(overlay) = doc.tree.get_element_by_id(overlay_id) else {
                tracing::warn!("dialog trigger {trigger} names missing overlay {overlay_id:?}");
                continue;
            };
            if let Some(existing) = dialogs.iter_mut().find(|d| d.overlay == overlay) {
                existing.triggers.push(trigger);
                continue;
            }

            let initial_focus = doc
                .tree
                .attr(overlay, "data-initial-focus")
                .and_then(|id| doc.tree.get_element_by_id(id));
            if let Some(initial) = initial_focus.filter(|&n| !doc.is_focusable(n)) {
                tracing::warn!("dialog {overlay} initial focus {initial} cannot take focus");
            }
            if doc.tree.attr(overlay, "aria-hidden") != Some("false") {
                AriaState::Hidden(true).apply(&mut doc.tree, overlay);
            }
            dialogs.push(Self {
                overlay,
                triggers: vec![trigger],
                initial_focus,
            });
        }
        dialogs
    }

    pub fn overlay(&self) -> NodeId {
        self.overlay
    }

    fn close_control(&self, doc: &Document, target: NodeId) -> Option<NodeId> {
        let button = doc.tree.closest(target, "button")?;
        if !doc.tree.contains(self.overlay, button) {
            return None;
        }
        let closes = doc.tree.has_class(button, "dialog-close")
            || doc
                .tree
                .attr(button, "data-action")
                .is_some_and(|a| CLOSE_ACTIONS.contains(&a));
        closes.then_some(button)
    }
}

impl Controller for DialogController {
    fn owns(&self, doc: &Document, target: NodeId) -> bool {
        self.triggers.iter().any(|&t| doc.tree.contains(t, target))
            || doc.tree.contains(self.overlay, target)
    }

    fn on_event(
        &mut self,
        cx: &mut WidgetCx<'_>,
        target: NodeId,
        event: WidgetEvent<'_>,
    ) -> RuntimeResult<Dispatch> {
        let WidgetEvent::Click = event else {
            return Ok(Dispatch::Ignored);
        };

        let trigger = std::iter::once(target)
            .chain(cx.doc.tree.ancestors(target))
            .find(|n| self.triggers.contains(n));
        if trigger.is_some() {
            cx.open_modal(self.overlay, self.initial_focus)?;
            return Ok(Dispatch::Handled);
        }

        if self.close_control(cx.doc, target).is_some() {
            let closed = cx.close_modal(self.overlay)?;
            return Ok(Dispatch::from_handled(closed));
        }
        Ok(Dispatch::Ignored)
    }
}
