//! Tree Navigator
//!
//! Hierarchical items kept in an arena. Children are owned through their
//! parent's `children` list; the `parent` index is a lookup-only back link.

use ariadne_dom::{Document, Key, KeyEvent, NodeId};

use crate::{roving::transfer_tab_stop, AriaState, InteractionCx, Politeness};

/// Index of a tree item in its [`TreeModel`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TreeItemId(u32);

impl TreeItemId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// One tree item
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Element carrying `aria-expanded`
    pub element: NodeId,
    /// Element receiving focus
    pub content: NodeId,
    pub label: String,
    /// `None` for leaves
    pub expanded: Option<bool>,
    pub parent: Option<TreeItemId>,
    pub children: Vec<TreeItemId>,
}

impl TreeNode {
    pub fn has_children(&self) -> bool {
        self.expanded.is_some()
    }
}

/// Arena of tree items
#[derive(Debug, Clone, Default)]
pub struct TreeModel {
    nodes: Vec<TreeNode>,
    roots: Vec<TreeItemId>,
}

impl TreeModel {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, node: TreeNode) -> TreeItemId {
        let id = TreeItemId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn add_root(
        &mut self,
        element: NodeId,
        content: NodeId,
        label: impl Into<String>,
        expanded: Option<bool>,
    ) -> TreeItemId {
        let id = self.push(TreeNode {
            element,
            content,
            label: label.into(),
            expanded,
            parent: None,
            children: Vec::new(),
        });
        self.roots.push(id);
        id
    }

    /// Append a child; `None` if `parent` is unknown
    pub fn add_child(
        &mut self,
        parent: TreeItemId,
        element: NodeId,
        content: NodeId,
        label: impl Into<String>,
        expanded: Option<bool>,
    ) -> Option<TreeItemId> {
        self.nodes.get(parent.index())?;
        let id = self.push(TreeNode {
            element,
            content,
            label: label.into(),
            expanded,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.index()].children.push(id);
        Some(id)
    }

    pub fn get(&self, id: TreeItemId) -> Option<&TreeNode> {
        self.nodes.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[TreeItemId] {
        &self.roots
    }

    /// Ancestors from the parent up to the root
    pub fn ancestors(&self, id: TreeItemId) -> impl Iterator<Item = TreeItemId> + '_ {
        std::iter::successors(self.get(id).and_then(|n| n.parent), |&p| {
            self.get(p).and_then(|n| n.parent)
        })
    }

    /// Every ancestor is expanded
    pub fn is_visible(&self, id: TreeItemId) -> bool {
        self.get(id).is_some()
            && self
                .ancestors(id)
                .all(|a| self.get(a).is_some_and(|n| n.expanded == Some(true)))
    }

    /// Depth-first, pre-order walk over visible items
    pub fn visible_items(&self) -> VisibleItems<'_> {
        VisibleItems {
            model: self,
            stack: self.roots.iter().rev().copied().collect(),
        }
    }

    pub fn find_by_content(&self, content: NodeId) -> Option<TreeItemId> {
        self.nodes
            .iter()
            .position(|n| n.content == content)
            .map(|i| TreeItemId(i as u32))
    }

    pub fn find_by_element(&self, element: NodeId) -> Option<TreeItemId> {
        self.nodes
            .iter()
            .position(|n| n.element == element)
            .map(|i| TreeItemId(i as u32))
    }

    /// Set the expansion of a parent item. Leaves are left alone (returns false).
    pub fn set_expanded(&mut self, id: TreeItemId, expanded: bool) -> bool {
        match self.nodes.get_mut(id.index()) {
            Some(node) if node.has_children() => {
                node.expanded = Some(expanded);
                true
            }
            _ => false,
        }
    }
}

/// Lazy visible-item iterator; call [`TreeModel::visible_items`] again to restart
pub struct VisibleItems<'a> {
    model: &'a TreeModel,
    stack: Vec<TreeItemId>,
}

impl Iterator for VisibleItems<'_> {
    type Item = TreeItemId;

    fn next(&mut self) -> Option<TreeItemId> {
        let id = self.stack.pop()?;
        if let Some(node) = self.model.get(id) {
            if node.expanded == Some(true) {
                self.stack.extend(node.children.iter().rev().copied());
            }
        }
        Some(id)
    }
}

/// Keyboard and pointer behaviour of a tree widget
#[derive(Debug, Clone)]
pub struct TreeNavigator {
    model: TreeModel,
    active: Option<TreeItemId>,
}

impl TreeNavigator {
    pub fn new(model: TreeModel) -> Self {
        let active = model.roots().first().copied();
        Self { model, active }
    }

    pub fn model(&self) -> &TreeModel {
        &self.model
    }

    /// Item holding the tab stop
    pub fn active(&self) -> Option<TreeItemId> {
        self.active
    }

    /// Tab stop on the first root, `tabindex="-1"` everywhere else
    pub fn init(&mut self, doc: &mut Document) {
        self.active = self.model.roots().first().copied();
        for (i, node) in self.model.nodes.iter().enumerate() {
            let value = if Some(TreeItemId(i as u32)) == self.active { "0" } else { "-1" };
            doc.tree.set_attr(node.content, "tabindex", value);
        }
    }

    /// Move the tab stop to `id` and focus it
    pub fn focus_item(&mut self, cx: &mut InteractionCx<'_>, id: TreeItemId) -> bool {
        let Some(target) = self.model.get(id).map(|n| n.content) else {
            return false;
        };
        let from = self.active.and_then(|a| self.model.get(a)).map(|n| n.content);
        transfer_tab_stop(cx.doc, from, target);
        self.active = Some(id);
        cx.focus(target);
        true
    }

    pub fn expand(&mut self, cx: &mut InteractionCx<'_>, id: TreeItemId) -> bool {
        self.set_expanded(cx, id, true)
    }

    pub fn collapse(&mut self, cx: &mut InteractionCx<'_>, id: TreeItemId) -> bool {
        self.set_expanded(cx, id, false)
    }

    /// Flip a parent item. Toggling a leaf is a no-op.
    pub fn toggle(&mut self, cx: &mut InteractionCx<'_>, id: TreeItemId) -> bool {
        match self.model.get(id).and_then(|n| n.expanded) {
            Some(expanded) => self.set_expanded(cx, id, !expanded),
            None => false,
        }
    }

    fn set_expanded(&mut self, cx: &mut InteractionCx<'_>, id: TreeItemId, expanded: bool) -> bool {
        if !self.model.set_expanded(id, expanded) {
            return false;
        }
        let Some(node) = self.model.get(id) else { return false };
        let (element, content) = (node.element, node.content);
        AriaState::Expanded(expanded).apply(&mut cx.doc.tree, element);
        let state = if expanded { "expanded" } else { "collapsed" };
        let message = format!("{} folder {state}", node.label);
        tracing::debug!("tree item {element} {state}");

        if !expanded {
            let hides_active = self
                .active
                .is_some_and(|a| self.model.ancestors(a).any(|anc| anc == id));
            if hides_active {
                let had_focus = self
                    .active
                    .and_then(|a| self.model.get(a))
                    .is_some_and(|n| cx.doc.has_focus(n.content));
                let from = self.active.and_then(|a| self.model.get(a)).map(|n| n.content);
                transfer_tab_stop(cx.doc, from, content);
                self.active = Some(id);
                if had_focus {
                    cx.focus(content);
                }
            }
        }

        cx.announce(&message, Politeness::Polite);
        true
    }

    /// Make the item whose content has focus the active one
    pub fn sync_with_focus(&mut self, cx: &mut InteractionCx<'_>) -> bool {
        let focused = cx.active_element();
        match self.model.find_by_content(focused) {
            Some(id) => {
                let from = self.active.and_then(|a| self.model.get(a)).map(|n| n.content);
                transfer_tab_stop(cx.doc, from, focused);
                self.active = Some(id);
                true
            }
            None => false,
        }
    }

    /// Keyboard handling on the active item. Returns whether the key was consumed.
    pub fn handle_key(&mut self, cx: &mut InteractionCx<'_>, event: &KeyEvent) -> bool {
        let Some(current) = self.active else { return false };
        let Some(node) = self.model.get(current) else { return false };
        let expanded = node.expanded;
        let first_child = node.children.first().copied();
        let parent = node.parent;

        match event.key {
            Key::ArrowDown => {
                let next = self.model.visible_items().skip_while(|&i| i != current).nth(1);
                if let Some(next) = next {
                    self.focus_item(cx, next);
                }
            }
            Key::ArrowUp => {
                let prev = self.model.visible_items().take_while(|&i| i != current).last();
                if let Some(prev) = prev {
                    self.focus_item(cx, prev);
                }
            }
            Key::ArrowRight => match expanded {
                Some(false) => {
                    self.expand(cx, current);
                }
                Some(true) => {
                    if let Some(child) = first_child {
                        self.focus_item(cx, child);
                    }
                }
                None => {}
            },
            Key::ArrowLeft => match (expanded, parent) {
                (Some(true), _) => {
                    self.collapse(cx, current);
                }
                (_, Some(parent)) => {
                    self.focus_item(cx, parent);
                }
                _ => {}
            },
            Key::Home => {
                if let Some(first) = self.model.visible_items().next() {
                    self.focus_item(cx, first);
                }
            }
            Key::End => {
                if let Some(last) = self.model.visible_items().last() {
                    self.focus_item(cx, last);
                }
            }
            Key::Enter | Key::Space => {
                self.toggle(cx, current);
            }
            _ => return false,
        }
        true
    }

    /// Pointer on an item row: focus it, and toggle it when it has children
    pub fn click_content(&mut self, cx: &mut InteractionCx<'_>, id: TreeItemId) {
        self.focus_item(cx, id);
        self.toggle(cx, id);
    }

    /// Pointer on an item's toggle button: toggle only
    pub fn click_toggle(&mut self, cx: &mut InteractionCx<'_>, id: TreeItemId) {
        self.toggle(cx, id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AnnouncerConfig, LiveAnnouncer, Scheduler};

    /// docs/ { guide/ { intro }, api }, readme
    fn fixture() -> (Document, TreeModel) {
        let mut doc = Document::new();
        let body = doc.body();
        let item = |doc: &mut Document| {
            let li = doc.tree.create_element("li");
            let content = doc.tree.create_element("div");
            doc.tree.append_child(body, li).unwrap();
            doc.tree.append_child(li, content).unwrap();
            (li, content)
        };
        let mut model = TreeModel::new();
        let (e, c) = item(&mut doc);
        let docs = model.add_root(e, c, "docs", Some(false));
        let (e, c) = item(&mut doc);
        let guide = model.add_child(docs, e, c, "guide", Some(false)).unwrap();
        let (e, c) = item(&mut doc);
        model.add_child(guide, e, c, "intro", None).unwrap();
        let (e, c) = item(&mut doc);
        model.add_child(docs, e, c, "api", None).unwrap();
        let (e, c) = item(&mut doc);
        model.add_root(e, c, "readme", None);
        (doc, model)
    }

    fn labels(model: &TreeModel) -> Vec<&str> {
        model
            .visible_items()
            .map(|id| model.get(id).unwrap().label.as_str())
            .collect()
    }

    #[test]
    fn test_visible_items_follow_expansion() {
        let (_, mut model) = fixture();
        assert_eq!(labels(&model), vec!["docs", "readme"]);

        let docs = model.roots()[0];
        model.set_expanded(docs, true);
        assert_eq!(labels(&model), vec!["docs", "guide", "api", "readme"]);

        let guide = model.get(docs).unwrap().children[0];
        model.set_expanded(guide, true);
        assert_eq!(labels(&model), vec!["docs", "guide", "intro", "api", "readme"]);

        // collapsing the root hides the whole subtree, guide keeps its own state
        model.set_expanded(docs, false);
        assert_eq!(labels(&model), vec!["docs", "readme"]);
        assert_eq!(model.get(guide).unwrap().expanded, Some(true));
    }

    #[test]
    fn test_leaf_cannot_expand() {
        let (_, mut model) = fixture();
        let readme = model.roots()[1];
        assert!(!model.set_expanded(readme, true));
        assert_eq!(model.get(readme).unwrap().expanded, None);
    }

    #[test]
    fn test_keyboard_walk() {
        let (mut doc, model) = fixture();
        let mut sched = Scheduler::new();
        let mut announcer = LiveAnnouncer::new(AnnouncerConfig::default());
        let mut cx = InteractionCx::new(&mut doc, &mut sched, &mut announcer);
        let mut nav = TreeNavigator::new(model);
        nav.init(cx.doc);
        let key = |k| KeyEvent::new(k);

        nav.handle_key(&mut cx, &key(Key::ArrowRight));
        assert_eq!(cx.announcer.last().unwrap().text, "docs folder expanded");
        nav.handle_key(&mut cx, &key(Key::ArrowRight));
        let guide = nav.active().unwrap();
        assert_eq!(nav.model().get(guide).unwrap().label, "guide");

        nav.handle_key(&mut cx, &key(Key::End));
        let readme = nav.active().unwrap();
        assert_eq!(nav.model().get(readme).unwrap().label, "readme");
        nav.handle_key(&mut cx, &key(Key::ArrowDown));
        assert_eq!(nav.active(), Some(readme));

        nav.handle_key(&mut cx, &key(Key::ArrowUp));
        nav.handle_key(&mut cx, &key(Key::ArrowLeft));
        assert_eq!(nav.model().get(nav.active().unwrap()).unwrap().label, "docs");
        assert!(cx.doc.has_focus(nav.model().get(nav.active().unwrap()).unwrap().content));
    }

    #[test]
    fn test_collapse_ancestor_moves_tab_stop() {
        let (mut doc, model) = fixture();
        let mut sched = Scheduler::new();
        let mut announcer = LiveAnnouncer::new(AnnouncerConfig::default());
        let mut cx = InteractionCx::new(&mut doc, &mut sched, &mut announcer);
        let mut nav = TreeNavigator::new(model);
        nav.init(cx.doc);

        let docs = nav.model().roots()[0];
        nav.expand(&mut cx, docs);
        let api = nav.model().get(docs).unwrap().children[1];
        nav.focus_item(&mut cx, api);
        nav.collapse(&mut cx, docs);

        assert_eq!(nav.active(), Some(docs));
        let docs_content = nav.model().get(docs).unwrap().content;
        assert!(cx.doc.has_focus(docs_content));
        assert_eq!(cx.doc.tree.attr(docs_content, "tabindex"), Some("0"));
        assert_eq!(cx.announcer.last().unwrap().text, "docs folder collapsed");
    }

    #[test]
    fn test_toggle_leaf_is_silent() {
        let (mut doc, model) = fixture();
        let mut sched = Scheduler::new();
        let mut announcer = LiveAnnouncer::new(AnnouncerConfig::default());
        let mut cx = InteractionCx::new(&mut doc, &mut sched, &mut announcer);
        let mut nav = TreeNavigator::new(model);
        let readme = nav.model().roots()[1];
        assert!(!nav.toggle(&mut cx, readme));
        assert!(cx.announcer.last().is_none());
    }
}
