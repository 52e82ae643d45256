//! Disclosure widgets: `details.wcag-details` with an ARIA mirror of the
//! open state on the summary

use ariadne_a11y::AriaState;
use ariadne_dom::{Document, NodeId};

use crate::controller::{Controller, Dispatch, WidgetCx, WidgetEvent};
use crate::error::RuntimeResult;

#[derive(Debug, Clone)]
pub struct DisclosureController {
    /// (details, summary)
    entries: Vec<(NodeId, NodeId)>,
}

impl DisclosureController {
    pub fn mount(doc: &mut Document) -> Option<Self> {
        let details = doc.tree.query_selector_all(doc.tree.root(), "details.wcag-details");
        let mut entries = Vec::new();
        for d in details {
            let Some(summary) = doc.tree.element_children(d).find(|&c| doc.tree.tag(c) == Some("summary"))
            else {
                tracing::warn!("details {d} has no summary");
                continue;
            };
            doc.tree.set_attr(summary, "role", "button");
            let open = doc.tree.has_attr(d, "open");
            AriaState::Expanded(open).apply(&mut doc.tree, summary);
            entries.push((d, summary));
        }
        (!entries.is_empty()).then_some(Self { entries })
    }

    pub fn toggle(&self, doc: &mut Document, details: NodeId, summary: NodeId) -> bool {
        let open = doc.tree.remove_attr(details, "open").is_none();
        if open {
            doc.tree.set_attr(details, "open", "");
        }
        AriaState::Expanded(open).apply(&mut doc.tree, summary);
        open
    }
}

impl Controller for DisclosureController {
    fn owns(&self, doc: &Document, target: NodeId) -> bool {
        self.entries.iter().any(|&(_, s)| doc.tree.contains(s, target))
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
        let Some(&(details, summary)) = self.entries.iter().find(|&&(_, s)| cx.doc.tree.contains(s, target))
        else {
            return Ok(Dispatch::Ignored);
        };
        self.toggle(cx.doc, details, summary);
        Ok(Dispatch::Handled)
    }
}
