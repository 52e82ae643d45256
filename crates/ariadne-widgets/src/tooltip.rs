//! Tooltips
//!
//! A `.tooltip-trigger` names its tooltip through `aria-describedby`. The
//! tooltip is focusable so keyboard users can move into it; it stays visible
//! while focus moves between the pair.

use ariadne_a11y::positioning::clear_placement;
use ariadne_a11y::{position_floating, PlacementConfig};
use ariadne_dom::{Document, Key, NodeId};

use crate::controller::{Controller, Dispatch, DocumentEvent, WidgetCx, WidgetEvent};
use crate::dom::{referenced, set_shown};
use crate::error::RuntimeResult;

const VISIBLE_CLASS: &str = "tooltip-visible";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TooltipPair {
    trigger: NodeId,
    tooltip: NodeId,
}

#[derive(Debug, Clone)]
pub struct TooltipController {
    pairs: Vec<TooltipPair>,
    placement: PlacementConfig,
    /// Trigger refocused by Escape; its next focus must not re-show the tooltip
    dismissed: Option<NodeId>,
}

impl TooltipController {
    pub fn mount(doc: &mut Document, placement: &PlacementConfig) -> Option<Self> {
        let triggers = doc
            .tree
            .query_selector_all(doc.tree.root(), ".tooltip-trigger[aria-describedby]");
        let pairs: Vec<TooltipPair> = triggers
            .into_iter()
            .filter_map(|trigger| {
                let Some(tooltip) = referenced(doc, trigger, "aria-describedby") else {
                    tracing::warn!("tooltip trigger {trigger} describes a missing element");
                    return None;
                };
                doc.tree.set_attr(tooltip, "tabindex", "0");
                let visible = doc.tree.has_class(tooltip, VISIBLE_CLASS);
                set_shown(doc, tooltip, VISIBLE_CLASS, visible);
                Some(TooltipPair { trigger, tooltip })
            })
            .collect();

        (!pairs.is_empty()).then(|| Self {
            pairs,
            placement: placement.clone(),
            dismissed: None,
        })
    }

    pub fn is_visible(&self, doc: &Document, trigger: NodeId) -> bool {
        self.pair_of(doc, trigger)
            .is_some_and(|p| doc.tree.has_class(p.tooltip, VISIBLE_CLASS))
    }

    fn pair_of(&self, doc: &Document, target: NodeId) -> Option<TooltipPair> {
        self.pairs
            .iter()
            .copied()
            .find(|p| doc.tree.contains(p.trigger, target) || doc.tree.contains(p.tooltip, target))
    }

    fn show(&self, doc: &mut Document, pair: TooltipPair) {
        set_shown(doc, pair.tooltip, VISIBLE_CLASS, true);
        doc.tree.set_attr(pair.tooltip, "style", "opacity: 1; visibility: visible");
        position_floating(doc, pair.trigger, pair.tooltip, &self.placement);
        tracing::debug!("tooltip {} shown", pair.tooltip);
    }

    fn hide(&self, doc: &mut Document, pair: TooltipPair) {
        set_shown(doc, pair.tooltip, VISIBLE_CLASS, false);
        doc.tree.set_attr(pair.tooltip, "style", "opacity: 0; visibility: hidden");
        clear_placement(doc, pair.tooltip);
    }
}

impl Controller for TooltipController {
    fn owns(&self, doc: &Document, target: NodeId) -> bool {
        self.pair_of(doc, target).is_some()
    }

    fn on_event(
        &mut self,
        cx: &mut WidgetCx<'_>,
        target: NodeId,
        event: WidgetEvent<'_>,
    ) -> RuntimeResult<Dispatch> {
        let (WidgetEvent::KeyDown(key), Some(pair)) = (event, self.pair_of(cx.doc, target)) else {
            return Ok(Dispatch::Ignored);
        };
        let on_trigger = cx.doc.tree.contains(pair.trigger, target);
        let visible = cx.doc.tree.has_class(pair.tooltip, VISIBLE_CLASS);

        match (&key.key, on_trigger) {
            (Key::Enter | Key::Space, true) => {
                if visible {
                    self.hide(cx.doc, pair);
                } else {
                    self.show(cx.doc, pair);
                }
            }
            (Key::Escape, true) => self.hide(cx.doc, pair),
            (Key::Escape, false) => {
                self.hide(cx.doc, pair);
                self.dismissed = Some(pair.trigger);
                cx.focus(pair.trigger);
            }
            _ => return Ok(Dispatch::Ignored),
        }
        Ok(Dispatch::Handled)
    }

    fn on_document(&mut self, cx: &mut WidgetCx<'_>, event: DocumentEvent<'_>) -> Dispatch {
        match event {
            DocumentEvent::FocusChanged { from, to } => {
                let dismissed = self.dismissed.take();
                for &pair in &self.pairs {
                    let left_pair = (from == pair.trigger && to != pair.tooltip)
                        || (from == pair.tooltip && to != pair.trigger);
                    if left_pair {
                        self.hide(cx.doc, pair);
                    }
                    if to == pair.trigger && dismissed != Some(to) {
                        self.show(cx.doc, pair);
                    }
                }
                Dispatch::Ignored
            }
            DocumentEvent::Resize => {
                for &pair in &self.pairs {
                    if cx.doc.tree.has_class(pair.tooltip, VISIBLE_CLASS) {
                        position_floating(cx.doc, pair.trigger, pair.tooltip, &self.placement);
                    }
                }
                Dispatch::Ignored
            }
            _ => Dispatch::Ignored,
        }
    }
}
