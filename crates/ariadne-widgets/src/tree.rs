//! Tree view controller
//!
//! Builds a [`TreeModel`] from nested `.tree-item` markup:
//!
//! ```text
//! ul.tree
//!   li.tree-item[aria-expanded]
//!     div.tree-item-content > button.tree-toggle + span(label)
//!     ul.tree-group > li.tree-item ...
//! ```

use ariadne_a11y::aria::bool_attr;
use ariadne_a11y::{AriaState, TreeItemId, TreeModel, TreeNavigator};
use ariadne_dom::{Document, NodeId};

use crate::controller::{Controller, Dispatch, WidgetCx, WidgetEvent};
use crate::dom::trimmed_text;
use crate::error::RuntimeResult;

#[derive(Debug, Clone)]
pub struct TreeController {
    root: NodeId,
    nav: TreeNavigator,
}

impl TreeController {
    pub fn mount(doc: &mut Document) -> Vec<Self> {
        let roots = doc.tree.query_selector_all(doc.tree.root(), ".tree");
        roots
            .into_iter()
            .filter_map(|root| {
                let mut model = TreeModel::new();
                build_level(doc, &mut model, root, None);
                if model.is_empty() {
                    tracing::warn!("tree {root} has no items");
                    return None;
                }
                let mut nav = TreeNavigator::new(model);
                nav.init(doc);
                Some(Self { root, nav })
            })
            .collect()
    }

    pub fn navigator(&self) -> &TreeNavigator {
        &self.nav
    }

    fn item_of(&self, doc: &Document, target: NodeId) -> Option<TreeItemId> {
        let element = doc.tree.closest(target, ".tree-item")?;
        self.nav.model().find_by_element(element)
    }
}

fn build_level(doc: &mut Document, model: &mut TreeModel, container: NodeId, parent: Option<TreeItemId>) {
    let items: Vec<NodeId> = doc
        .tree
        .element_children(container)
        .filter(|&c| doc.tree.has_class(c, "tree-item"))
        .collect();

    for item in items {
        let Some(content) = doc
            .tree
            .element_children(item)
            .find(|&c| doc.tree.has_class(c, "tree-item-content"))
        else {
            tracing::warn!("tree item {item} has no .tree-item-content");
            continue;
        };
        let label = doc
            .tree
            .element_children(content)
            .filter(|&c| doc.tree.tag(c) == Some("span"))
            .last()
            .map(|span| trimmed_text(doc, span))
            .unwrap_or_else(|| trimmed_text(doc, content));
        for toggle in doc.tree.query_selector_all(content, ".tree-toggle") {
            doc.tree.set_attr(toggle, "tabindex", "-1");
        }
        let group = doc
            .tree
            .element_children(item)
            .find(|&c| doc.tree.has_class(c, "tree-group"));
        let has_children = group.is_some_and(|g| {
            doc.tree
                .element_children(g)
                .any(|c| doc.tree.has_class(c, "tree-item"))
        });

        let expanded = if has_children {
            let open = bool_attr(&doc.tree, item, "aria-expanded").unwrap_or(false);
            AriaState::Expanded(open).apply(&mut doc.tree, item);
            Some(open)
        } else {
            doc.tree.remove_attr(item, "aria-expanded");
            None
        };

        let id = match parent {
            Some(parent) => model.add_child(parent, item, content, label, expanded),
            None => Some(model.add_root(item, content, label, expanded)),
        };
        if let (Some(id), Some(group)) = (id, group) {
            build_level(doc, model, group, Some(id));
        }
    }
}

impl Controller for TreeController {
    fn owns(&self, doc: &Document, target: NodeId) -> bool {
        doc.tree.contains(self.root, target)
    }

    fn on_event(
        &mut self,
        cx: &mut WidgetCx<'_>,
        target: NodeId,
        event: WidgetEvent<'_>,
    ) -> RuntimeResult<Dispatch> {
        match event {
            WidgetEvent::KeyDown(key) => {
                // keys on a toggle button fall through to its default click
                if self.nav.model().find_by_content(target).is_none() {
                    return Ok(Dispatch::Ignored);
                }
                self.nav.sync_with_focus(cx);
                Ok(Dispatch::from_handled(self.nav.handle_key(cx, key)))
            }
            WidgetEvent::Click => {
                let Some(id) = self.item_of(cx.doc, target) else {
                    return Ok(Dispatch::Ignored);
                };
                if cx.doc.tree.closest(target, ".tree-toggle").is_some() {
                    self.nav.click_toggle(cx, id);
                } else if cx.doc.tree.closest(target, ".tree-item-content").is_some() {
                    self.nav.click_content(cx, id);
                } else {
                    return Ok(Dispatch::Ignored);
                }
                Ok(Dispatch::Handled)
            }
            _ => Ok(Dispatch::Ignored),
        }
    }
}
