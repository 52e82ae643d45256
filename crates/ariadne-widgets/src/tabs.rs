//! Tabs controller
//!
//! Arrow keys move between tabs and activate them immediately (automatic
//! activation); exactly one tab is selected and holds the tab stop.

use ariadne_a11y::{AriaState, Edge, Politeness, RovingTabindex};
use ariadne_dom::{Document, Key, NodeId};

use crate::config::TabsConfig;
use crate::controller::{Controller, Dispatch, WidgetCx, WidgetEvent};
use crate::dom::{referenced, trimmed_text};
use crate::error::RuntimeResult;

#[derive(Debug, Clone)]
pub struct TabsController {
    tablist: NodeId,
    roving: RovingTabindex,
    panels: Vec<Option<NodeId>>,
}

impl TabsController {
    pub fn mount(doc: &mut Document, config: &TabsConfig) -> Vec<Self> {
        let edge = if config.wrap { Edge::Wrap } else { Edge::Clamp };
        let tablists = doc.tree.query_selector_all(doc.tree.root(), "[role=tablist]");
        tablists
            .into_iter()
            .filter_map(|tablist| {
                let tabs = doc.tree.query_selector_all(tablist, "[role=tab]");
                if tabs.is_empty() {
                    tracing::warn!("tablist {tablist} has no tabs");
                    return None;
                }
                let panels = tabs
                    .iter()
                    .map(|&tab| {
                        let panel = referenced(doc, tab, "aria-controls");
                        if panel.is_none() {
                            tracing::warn!("tab {tab} controls no panel");
                        }
                        panel
                    })
                    .collect();
                let selected = tabs
                    .iter()
                    .position(|&t| doc.tree.attr(t, "aria-selected") == Some("true"))
                    .unwrap_or(0);

                let mut roving = RovingTabindex::new(tabs, edge);
                roving.init(doc, selected);
                Some(Self { tablist, roving, panels })
            })
            .collect()
    }

    pub fn tablist(&self) -> NodeId {
        self.tablist
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.roving.active_node()
    }

    /// Select the tab at `index`, show its panel and focus it
    pub fn activate(&mut self, cx: &mut WidgetCx<'_>, index: usize) {
        let Some(&tab) = self.roving.items().get(index) else { return };
        for (i, &other) in self.roving.items().iter().enumerate() {
            AriaState::Selected(i == index).apply(&mut cx.doc.tree, other);
        }
        for (i, panel) in self.panels.iter().enumerate() {
            let Some(panel) = *panel else { continue };
            if i == index {
                cx.doc.tree.remove_attr(panel, "hidden");
            } else {
                cx.doc.tree.set_attr(panel, "hidden", "");
            }
        }
        self.roving.set_active(cx.doc, index);

        let name = trimmed_text(cx.doc, tab);
        tracing::debug!("tab {tab} activated");
        cx.announce(&format!("Tab {name} activated"), Politeness::Polite);
    }

    fn tab_of(&self, doc: &Document, target: NodeId) -> Option<usize> {
        std::iter::once(target)
            .chain(doc.tree.ancestors(target))
            .find_map(|n| self.roving.index_of(n))
    }
}

impl Controller for TabsController {
    fn owns(&self, doc: &Document, target: NodeId) -> bool {
        self.tab_of(doc, target).is_some()
    }

    fn on_event(
        &mut self,
        cx: &mut WidgetCx<'_>,
        target: NodeId,
        event: WidgetEvent<'_>,
    ) -> RuntimeResult<Dispatch> {
        let Some(current) = self.tab_of(cx.doc, target) else {
            return Ok(Dispatch::Ignored);
        };
        match event {
            WidgetEvent::Click => {
                self.activate(cx, current);
                Ok(Dispatch::Handled)
            }
            WidgetEvent::KeyDown(key) => {
                if !matches!(key.key, Key::ArrowRight | Key::ArrowLeft | Key::Home | Key::End) {
                    return Ok(Dispatch::Ignored);
                }
                // the focused tab may differ from the tab stop after a pointer focus
                self.roving.adopt(cx.doc, current);
                let moved = match key.key {
                    Key::ArrowRight => self.roving.next(cx.doc),
                    Key::ArrowLeft => self.roving.previous(cx.doc),
                    Key::Home => self.roving.first(cx.doc),
                    _ => self.roving.last(cx.doc),
                };
                if moved.is_some() {
                    let index = self.roving.active_index();
                    self.activate(cx, index);
                }
                Ok(Dispatch::Handled)
            }
            _ => Ok(Dispatch::Ignored),
        }
    }
}
