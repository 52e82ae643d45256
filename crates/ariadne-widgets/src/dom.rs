//! Markup helpers shared by the controllers

use ariadne_dom::{Document, NodeId};

/// Show or hide a popup. The class drives styling; `hidden` keeps the
/// closed popup out of the tab order the way `display: none` would.
pub(crate) fn set_shown(doc: &mut Document, node: NodeId, class: &str, shown: bool) {
    doc.tree.toggle_class(node, class, Some(shown));
    if shown {
        doc.tree.remove_attr(node, "hidden");
    } else {
        doc.tree.set_attr(node, "hidden", "");
    }
}

/// Element named by the first id token of an IDREF attribute
pub(crate) fn referenced(doc: &Document, node: NodeId, attr: &str) -> Option<NodeId> {
    let id = doc.tree.attr(node, attr)?.split_whitespace().next()?;
    doc.tree.get_element_by_id(id)
}

pub(crate) fn trimmed_text(doc: &Document, node: NodeId) -> String {
    doc.tree.text_content(node).trim().to_string()
}

/// Accessible label of a form control: `label[for]`, an enclosing label,
/// then `aria-label`
pub(crate) fn label_text(doc: &Document, control: NodeId) -> Option<String> {
    let tree = &doc.tree;
    if let Some(id) = tree.attr(control, "id") {
        let label = tree
            .query_selector_all(tree.root(), "label[for]")
            .into_iter()
            .find(|&l| tree.attr(l, "for") == Some(id));
        if let Some(label) = label {
            return Some(trimmed_text(doc, label));
        }
    }
    if let Some(label) = tree.closest(control, "label") {
        return Some(trimmed_text(doc, label));
    }
    tree.attr(control, "aria-label").map(str::to_string)
}

/// Append `token` to a space-separated attribute unless already present
pub(crate) fn add_token(doc: &mut Document, node: NodeId, attr: &str, token: &str) {
    let current = doc.tree.attr(node, attr).unwrap_or_default();
    if current.split_whitespace().any(|t| t == token) {
        return;
    }
    let value = if current.trim().is_empty() {
        token.to_string()
    } else {
        format!("{} {token}", current.trim())
    };
    doc.tree.set_attr(node, attr, value);
}

/// Drop `token` from a space-separated attribute, removing it when empty
pub(crate) fn remove_token(doc: &mut Document, node: NodeId, attr: &str, token: &str) {
    let Some(current) = doc.tree.attr(node, attr) else { return };
    let rest: Vec<&str> = current.split_whitespace().filter(|&t| t != token).collect();
    if rest.is_empty() {
        doc.tree.remove_attr(node, attr);
    } else {
        let value = rest.join(" ");
        doc.tree.set_attr(node, attr, value);
    }
}
