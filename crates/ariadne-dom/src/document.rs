//! Document - High-level document API
//!
//! Wraps the [`DomTree`] with the page-level state the widgets read and
//! write: the focused element, the body scroll lock, the viewport and the
//! host-reported layout.

use crate::{DOMRect, DomTree, LayoutMap, NodeId, TabIndex, Viewport};

const SCROLL_LOCK_STYLE: &str = "overflow: hidden";

/// HTML Document
#[derive(Debug, Clone)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    html_element: NodeId,
    head_element: NodeId,
    body_element: NodeId,
    /// Focused element, `None` when focus is on the body
    active: Option<NodeId>,
    /// Holders of the body scroll lock
    scroll_locks: u32,
    viewport: Viewport,
    layout: LayoutMap,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document with an empty `html`/`head`/`body` skeleton
    pub fn new() -> Self {
        Self::from_tree(DomTree::new())
    }

    /// Adopt a parsed tree, creating whichever of `html`, `head` and `body`
    /// the markup did not produce
    pub fn from_tree(mut tree: DomTree) -> Self {
        let root = tree.root();
        let html = ensure_child(&mut tree, root, "html");
        let head = ensure_child(&mut tree, html, "head");
        let body = ensure_child(&mut tree, html, "body");

        Self {
            tree,
            html_element: html,
            head_element: head,
            body_element: body,
            active: None,
            scroll_locks: 0,
            viewport: Viewport::default(),
            layout: LayoutMap::new(),
        }
    }

    pub fn html(&self) -> NodeId {
        self.html_element
    }

    pub fn head(&self) -> NodeId {
        self.head_element
    }

    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Text of the `<title>` element
    pub fn title(&self) -> String {
        self.tree
            .query_selector(self.head_element, "title")
            .map(|t| self.tree.text_content(t).trim().to_string())
            .unwrap_or_default()
    }

    // ---- focus ----

    /// Focused element, or the body when nothing (attached) is focused
    pub fn active_element(&self) -> NodeId {
        self.active
            .filter(|&n| self.tree.is_attached(n))
            .unwrap_or(self.body_element)
    }

    pub fn has_focus(&self, node: NodeId) -> bool {
        self.active_element() == node
    }

    /// Whether the element or one of its ancestors is `hidden` or `aria-hidden="true"`
    pub fn is_hidden(&self, node: NodeId) -> bool {
        std::iter::once(node)
            .chain(self.tree.ancestors(node))
            .any(|n| self.tree.has_attr(n, "hidden") || self.tree.attr(n, "aria-hidden") == Some("true"))
    }

    /// Whether `focus` would succeed
    pub fn is_focusable(&self, node: NodeId) -> bool {
        if node == self.body_element {
            return true;
        }
        self.tree.is_attached(node)
            && self
                .tree
                .element(node)
                .is_some_and(|e| TabIndex::of(e).is_focusable())
    }

    /// Move focus to `node`. Returns false, leaving focus alone, when the node
    /// is detached or not focusable.
    pub fn focus(&mut self, node: NodeId) -> bool {
        if !self.is_focusable(node) {
            tracing::debug!("focus({node}) refused");
            return false;
        }
        self.active = (node != self.body_element).then_some(node);
        true
    }

    /// Drop focus back to the body
    pub fn blur(&mut self) {
        self.active = None;
    }

    /// Tabbable descendants of `root` in document order
    pub fn tabbable_descendants(&self, root: NodeId) -> Vec<NodeId> {
        self.tree
            .descendants(root)
            .filter(|&n| self.is_tabbable(n) && !self.has_hidden_between(root, n))
            .collect()
    }

    fn is_tabbable(&self, node: NodeId) -> bool {
        self.tree
            .element(node)
            .is_some_and(|e| TabIndex::of(e).is_sequential())
    }

    fn has_hidden_between(&self, root: NodeId, node: NodeId) -> bool {
        std::iter::once(node)
            .chain(self.tree.ancestors(node).take_while(|&a| a != root))
            .any(|n| self.tree.has_attr(n, "hidden"))
    }

    /// Sequential navigation order of the whole document: positive tabindex
    /// values ascending, then the rest in document order
    pub fn tab_order(&self) -> Vec<NodeId> {
        let mut order: Vec<(u8, i32, usize, NodeId)> = self
            .tree
            .descendants(self.tree.root())
            .enumerate()
            .filter(|&(_, n)| !self.is_hidden(n))
            .filter_map(|(pos, n)| {
                let (group, value) = TabIndex::of(self.tree.element(n)?).order_key()?;
                Some((group, value, pos, n))
            })
            .collect();
        order.sort_unstable();
        order.into_iter().map(|(.., n)| n).collect()
    }

    /// Default Tab / Shift+Tab behaviour: focus the next (or previous)
    /// element in tab order, wrapping at the ends
    pub fn sequential_focus(&mut self, backwards: bool) -> Option<NodeId> {
        let order = self.tab_order();
        if order.is_empty() {
            return None;
        }
        let current = self.active_element();
        let target = match order.iter().position(|&n| n == current) {
            Some(i) if backwards => order[(i + order.len() - 1) % order.len()],
            Some(i) => order[(i + 1) % order.len()],
            None => self.nearest_in_order(&order, current, backwards),
        };
        self.focus(target).then_some(target)
    }

    // Focus sits on something outside the tab order (the body, or a
    // tabindex=-1 item): continue from its position in the document.
    fn nearest_in_order(&self, order: &[NodeId], current: NodeId, backwards: bool) -> NodeId {
        let positions: Vec<NodeId> = self.tree.descendants(self.tree.root()).collect();
        let pos_of = |n: NodeId| positions.iter().position(|&p| p == n);
        let fallback = if backwards { order[order.len() - 1] } else { order[0] };
        let Some(here) = pos_of(current).filter(|_| current != self.body_element) else {
            return fallback;
        };
        let candidate = if backwards {
            order.iter().rev().find(|&&n| pos_of(n).is_some_and(|p| p < here))
        } else {
            order.iter().find(|&&n| pos_of(n).is_some_and(|p| p > here))
        };
        candidate.copied().unwrap_or(fallback)
    }

    // ---- structure ----

    /// Detach a node, dropping focus if it sat inside the removed subtree
    pub fn remove(&mut self, node: NodeId) -> bool {
        let had_focus = self.active.is_some_and(|a| self.tree.contains(node, a));
        let removed = self.tree.detach(node);
        if removed && had_focus {
            self.active = None;
        }
        removed
    }

    // ---- page state ----

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_locks > 0
    }

    /// Take a hold on the body scroll lock (`overflow: hidden` on the body).
    /// Scrolling comes back once every holder has released it.
    pub fn lock_scroll(&mut self) {
        self.scroll_locks += 1;
        if self.scroll_locks == 1 {
            let body = self.body_element;
            self.tree.set_attr(body, "style", SCROLL_LOCK_STYLE);
        }
    }

    /// Release one hold. Releasing an unlocked document is a no-op.
    pub fn unlock_scroll(&mut self) {
        if self.scroll_locks == 0 {
            return;
        }
        self.scroll_locks -= 1;
        let body = self.body_element;
        if self.scroll_locks == 0 && self.tree.attr(body, "style") == Some(SCROLL_LOCK_STYLE) {
            self.tree.remove_attr(body, "style");
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn layout(&self) -> &LayoutMap {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut LayoutMap {
        &mut self.layout
    }

    /// Host-reported box of the element in its current class state
    pub fn bounding_client_rect(&self, node: NodeId) -> DOMRect {
        self.layout.resolve(node, |class| self.tree.has_class(node, class))
    }
}

fn ensure_child(tree: &mut DomTree, parent: NodeId, tag: &str) -> NodeId {
    if let Some(existing) = tree.element_children(parent).find(|&c| tree.tag(c) == Some(tag)) {
        return existing;
    }
    let created = tree.create_element(tag);
    if let Err(err) = tree.append_child(parent, created) {
        tracing::warn!("could not create <{tag}>: {err}");
    }
    created
}
