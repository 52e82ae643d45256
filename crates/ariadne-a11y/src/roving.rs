//! Roving Tabindex
//!
//! Keeps exactly one member of a composite widget in the Tab sequence
//! (`tabindex="0"`); every other member has `tabindex="-1"` and is reached
//! with the arrow keys.

use ariadne_dom::{Document, NodeId};

/// What happens when moving past either end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Edge {
    #[default]
    Wrap,
    Clamp,
}

/// Move the tab stop from `from` to `to` without touching focus
pub fn transfer_tab_stop(doc: &mut Document, from: Option<NodeId>, to: NodeId) {
    if let Some(from) = from.filter(|&f| f != to) {
        doc.tree.set_attr(from, "tabindex", "-1");
    }
    doc.tree.set_attr(to, "tabindex", "0");
}

/// Roving tabindex controller
#[derive(Debug, Clone)]
pub struct RovingTabindex {
    items: Vec<NodeId>,
    active: usize,
    edge: Edge,
}

impl RovingTabindex {
    pub fn new(items: Vec<NodeId>, edge: Edge) -> Self {
        Self { items, active: 0, edge }
    }

    /// Write the tabindex of every item, with `initial` as the tab stop.
    /// Does not move focus.
    pub fn init(&mut self, doc: &mut Document, initial: usize) {
        if self.items.is_empty() {
            return;
        }
        self.active = initial.min(self.items.len() - 1);
        for (i, &item) in self.items.iter().enumerate() {
            let value = if i == self.active { "0" } else { "-1" };
            doc.tree.set_attr(item, "tabindex", value);
        }
    }

    pub fn items(&self) -> &[NodeId] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn edge(&self) -> Edge {
        self.edge
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_node(&self) -> Option<NodeId> {
        self.items.get(self.active).copied()
    }

    pub fn index_of(&self, node: NodeId) -> Option<usize> {
        self.items.iter().position(|&n| n == node)
    }

    /// Make `index` the tab stop and focus it
    pub fn set_active(&mut self, doc: &mut Document, index: usize) -> Option<NodeId> {
        let target = *self.items.get(index)?;
        transfer_tab_stop(doc, self.active_node(), target);
        self.active = index;
        doc.focus(target);
        Some(target)
    }

    pub fn next(&mut self, doc: &mut Document) -> Option<NodeId> {
        let len = self.items.len();
        if len == 0 {
            return None;
        }
        let index = match self.edge {
            Edge::Wrap => (self.active + 1) % len,
            Edge::Clamp => (self.active + 1).min(len - 1),
        };
        self.set_active(doc, index)
    }

    pub fn previous(&mut self, doc: &mut Document) -> Option<NodeId> {
        let len = self.items.len();
        if len == 0 {
            return None;
        }
        let index = match (self.edge, self.active) {
            (Edge::Wrap, 0) => len - 1,
            (Edge::Clamp, 0) => 0,
            (_, i) => i - 1,
        };
        self.set_active(doc, index)
    }

    pub fn first(&mut self, doc: &mut Document) -> Option<NodeId> {
        self.set_active(doc, 0)
    }

    pub fn last(&mut self, doc: &mut Document) -> Option<NodeId> {
        let last = self.items.len().checked_sub(1)?;
        self.set_active(doc, last)
    }

    /// Make `index` the tab stop without moving focus
    pub fn adopt(&mut self, doc: &mut Document, index: usize) -> bool {
        let Some(&target) = self.items.get(index) else {
            return false;
        };
        transfer_tab_stop(doc, self.active_node(), target);
        self.active = index;
        true
    }

    /// Adopt the focused element as the tab stop if it is one of the items.
    /// Returns whether it was.
    pub fn sync_with_focus(&mut self, doc: &mut Document) -> bool {
        match self.index_of(doc.active_element()) {
            Some(index) => self.adopt(doc, index),
            None => false,
        }
    }
}
