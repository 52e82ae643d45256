//! Action feedback
//!
//! Demo buttons and icon buttons write a short visible status message into
//! their `.example` container, replacing the previous one. Avatar buttons
//! post a notification to the body.

use ariadne_dom::{Document, Key, NodeId};

use crate::controller::{Controller, Dispatch, WidgetCx, WidgetEvent};
use crate::dom::trimmed_text;
use crate::error::RuntimeResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    DemoButton,
    IconButton,
    Avatar,
    AvatarStack,
}

#[derive(Debug, Clone)]
pub struct FeedbackController {
    sources: Vec<(NodeId, Source)>,
    ttl_ms: u64,
}

impl FeedbackController {
    pub fn mount(doc: &mut Document, ttl_ms: u64) -> Option<Self> {
        let root = doc.tree.root();
        let mut sources = Vec::new();
        for (selector, source) in [
            (".demo-button", Source::DemoButton),
            (".icon-button", Source::IconButton),
            (".avatar-button", Source::Avatar),
            (".avatar-stack", Source::AvatarStack),
        ] {
            for node in doc.tree.query_selector_all(root, selector) {
                sources.push((node, source));
            }
        }
        for &(stack, _) in sources.iter().filter(|(_, s)| *s == Source::AvatarStack) {
            doc.tree.set_attr(stack, "tabindex", "0");
            doc.tree.set_attr(stack, "role", "button");
        }
        (!sources.is_empty()).then_some(Self { sources, ttl_ms })
    }

    fn source_of(&self, doc: &Document, target: NodeId) -> Option<(NodeId, Source)> {
        self.sources
            .iter()
            .copied()
            .find(|&(node, _)| doc.tree.contains(node, target))
    }

    fn message(doc: &Document, node: NodeId, source: Source) -> String {
        match source {
            Source::DemoButton => "Button clicked!".to_string(),
            Source::IconButton => {
                let label = doc.tree.attr(node, "aria-label").unwrap_or("Icon");
                format!("{label} button clicked!")
            }
            Source::Avatar => {
                let name = doc
                    .tree
                    .closest(node, ".avatar-item")
                    .and_then(|item| doc.tree.query_selector(item, ".avatar-name"))
                    .map(|n| trimmed_text(doc, n))
                    .unwrap_or_default();
                format!("Viewing profile for {name}")
            }
            Source::AvatarStack => {
                let team = doc
                    .tree
                    .attr(node, "aria-label")
                    .or_else(|| doc.tree.attr(node, "data-team"))
                    .unwrap_or("the team");
                format!("Viewing all members of {team}")
            }
        }
    }

    fn activate(&self, cx: &mut WidgetCx<'_>, node: NodeId, source: Source) {
        let message = Self::message(cx.doc, node, source);
        match source {
            Source::DemoButton | Source::IconButton => {
                let container = cx
                    .doc
                    .tree
                    .closest(node, ".example")
                    .or_else(|| cx.doc.tree.query_selector(cx.doc.tree.root(), ".example"))
                    .unwrap_or(cx.doc.body());
                let previous = cx.doc.tree.query_selector_all(container, "[role=status]");
                for status in previous {
                    if !cx.withdraw(status) {
                        cx.doc.remove(status);
                    }
                }
                cx.announce_into(container, &message, None, self.ttl_ms);
            }
            Source::Avatar | Source::AvatarStack => {
                let body = cx.doc.body();
                cx.announce_into(body, &message, Some("avatar-notification"), self.ttl_ms);
            }
        }
    }
}

impl Controller for FeedbackController {
    fn owns(&self, doc: &Document, target: NodeId) -> bool {
        self.source_of(doc, target).is_some()
    }

    fn on_event(
        &mut self,
        cx: &mut WidgetCx<'_>,
        target: NodeId,
        event: WidgetEvent<'_>,
    ) -> RuntimeResult<Dispatch> {
        let Some((node, source)) = self.source_of(cx.doc, target) else {
            return Ok(Dispatch::Ignored);
        };
        let activated = match event {
            WidgetEvent::Click => true,
            // the stack is a div, so it has no default key activation
            WidgetEvent::KeyDown(key) => {
                source == Source::AvatarStack && target == node && matches!(key.key, Key::Enter | Key::Space)
            }
            _ => false,
        };
        if activated {
            self.activate(cx, node, source);
        }
        Ok(Dispatch::from_handled(activated))
    }
}
