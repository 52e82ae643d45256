//! Property tests for the roving tabindex and tree visibility invariants

use ariadne_a11y::{Edge, RovingTabindex, TreeItemId, TreeModel};
use ariadne_dom::{Document, NodeId};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum RovingOp {
    Next,
    Previous,
    First,
    Last,
    Set(usize),
    PointerFocus(usize),
}

fn roving_op() -> impl Strategy<Value = RovingOp> {
    prop_oneof![
        Just(RovingOp::Next),
        Just(RovingOp::Previous),
        Just(RovingOp::First),
        Just(RovingOp::Last),
        (0usize..12).prop_map(RovingOp::Set),
        (0usize..12).prop_map(RovingOp::PointerFocus),
    ]
}

fn items(doc: &mut Document, count: usize) -> Vec<NodeId> {
    let body = doc.body();
    (0..count)
        .map(|_| {
            let item = doc.tree.create_element("li");
            doc.tree.set_attr(item, "role", "option");
            doc.tree.append_child(body, item).unwrap();
            item
        })
        .collect()
}

#[test]
fn prop_roving_keeps_exactly_one_tab_stop() {
    proptest!(|(
        count in 1usize..8,
        initial in 0usize..8,
        wrap in any::<bool>(),
        ops in prop::collection::vec(roving_op(), 0..40),
    )| {
        let mut doc = Document::new();
        let nodes = items(&mut doc, count);
        let edge = if wrap { Edge::Wrap } else { Edge::Clamp };
        let mut roving = RovingTabindex::new(nodes.clone(), edge);
        roving.init(&mut doc, initial);

        for op in ops {
            match op {
                RovingOp::Next => { roving.next(&mut doc); }
                RovingOp::Previous => { roving.previous(&mut doc); }
                RovingOp::First => { roving.first(&mut doc); }
                RovingOp::Last => { roving.last(&mut doc); }
                RovingOp::Set(i) => { roving.set_active(&mut doc, i); }
                RovingOp::PointerFocus(i) => {
                    if let Some(&node) = nodes.get(i) {
                        doc.focus(node);
                        roving.sync_with_focus(&mut doc);
                    }
                }
            }

            let stops: Vec<NodeId> = nodes
                .iter()
                .copied()
                .filter(|&n| doc.tree.attr(n, "tabindex") == Some("0"))
                .collect();
            prop_assert_eq!(stops.len(), 1);
            prop_assert_eq!(Some(stops[0]), roving.active_node());
        }
    });
}

/// Random forest: each entry names the parent among earlier items (or none)
/// and whether the item starts expanded
fn forest() -> impl Strategy<Value = Vec<(Option<usize>, bool)>> {
    prop::collection::vec((any::<Option<prop::sample::Index>>(), any::<bool>()), 1..30).prop_map(
        |raw| {
            raw.into_iter()
                .enumerate()
                .map(|(i, (parent, open))| (parent.filter(|_| i > 0).map(|p| p.index(i)), open))
                .collect()
        },
    )
}

fn build(doc: &mut Document, shape: &[(Option<usize>, bool)]) -> (TreeModel, Vec<TreeItemId>) {
    let body = doc.body();
    let has_children: Vec<bool> = (0..shape.len())
        .map(|i| shape.iter().any(|&(p, _)| p == Some(i)))
        .collect();
    let mut model = TreeModel::new();
    let mut ids: Vec<TreeItemId> = Vec::new();
    for (i, &(parent, open)) in shape.iter().enumerate() {
        let element = doc.tree.create_element("li");
        doc.tree.append_child(body, element).unwrap();
        let expanded = has_children[i].then_some(open);
        let id = match parent {
            Some(p) => model.add_child(ids[p], element, element, format!("item {i}"), expanded).unwrap(),
            None => model.add_root(element, element, format!("item {i}"), expanded),
        };
        ids.push(id);
    }
    (model, ids)
}

#[test]
fn prop_visible_iff_all_ancestors_expanded() {
    proptest!(|(shape in forest(), flips in prop::collection::vec(0usize..30, 0..20))| {
        let mut doc = Document::new();
        let (mut model, ids) = build(&mut doc, &shape);

        for flip in flips {
            if let Some(&id) = ids.get(flip) {
                let current = model.get(id).and_then(|n| n.expanded);
                if let Some(open) = current {
                    model.set_expanded(id, !open);
                }
            }

            let visible: Vec<TreeItemId> = model.visible_items().collect();
            for &id in &ids {
                let expected = model
                    .ancestors(id)
                    .all(|a| model.get(a).and_then(|n| n.expanded) == Some(true));
                prop_assert_eq!(visible.contains(&id), expected);
                prop_assert_eq!(model.is_visible(id), expected);
            }
            // restartable: a second walk yields the same sequence
            prop_assert_eq!(model.visible_items().collect::<Vec<_>>(), visible);
        }
    });
}

#[test]
fn prop_collapse_hides_every_descendant() {
    proptest!(|(shape in forest(), pick in 0usize..30)| {
        let mut doc = Document::new();
        let (mut model, ids) = build(&mut doc, &shape);
        let Some(&target) = ids.get(pick) else { return Ok(()); };
        if model.get(target).and_then(|n| n.expanded).is_none() {
            return Ok(());
        }
        model.set_expanded(target, false);

        let visible: Vec<TreeItemId> = model.visible_items().collect();
        for &id in &ids {
            if model.ancestors(id).any(|a| a == target) {
                prop_assert!(!visible.contains(&id));
            }
        }
    });
}
