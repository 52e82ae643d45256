//! ARIA Support
//!
//! ARIA roles and the state attributes the widgets write back to markup.

use ariadne_dom::{DomTree, NodeId};

/// Roles the controllers inspect in markup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AriaRole {
    AlertDialog,
    Checkbox,
    Dialog,
}

impl AriaRole {
    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.trim().to_ascii_lowercase().as_str() {
            "alertdialog" => Self::AlertDialog,
            "checkbox" => Self::Checkbox,
            "dialog" => Self::Dialog,
            _ => return None,
        })
    }

    /// Role attribute of an element
    pub fn of(tree: &DomTree, node: NodeId) -> Option<Self> {
        tree.attr(node, "role").and_then(Self::parse)
    }

    /// Surfaces that open a modal session
    pub fn is_dialog(&self) -> bool {
        matches!(self, Self::Dialog | Self::AlertDialog)
    }
}

/// Politeness of a live region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Politeness {
    #[default]
    Polite,
    Assertive,
}

impl Politeness {
    /// `aria-live` value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Polite => "polite",
            Self::Assertive => "assertive",
        }
    }
}

/// ARIA state written back to an element
#[derive(Debug, Clone, PartialEq)]
pub enum AriaState {
    Checked(bool),
    Expanded(bool),
    Hidden(bool),
    Invalid(bool),
    Selected(bool),
    ValueNow(f64),
    ValueText(String),
}

impl AriaState {
    pub fn attr_name(&self) -> &'static str {
        match self {
            Self::Checked(_) => "aria-checked",
            Self::Expanded(_) => "aria-expanded",
            Self::Hidden(_) => "aria-hidden",
            Self::Invalid(_) => "aria-invalid",
            Self::Selected(_) => "aria-selected",
            Self::ValueNow(_) => "aria-valuenow",
            Self::ValueText(_) => "aria-valuetext",
        }
    }

    pub fn value(&self) -> String {
        match self {
            Self::Checked(b)
            | Self::Expanded(b)
            | Self::Hidden(b)
            | Self::Invalid(b)
            | Self::Selected(b) => b.to_string(),
            Self::ValueNow(v) => format_number(*v),
            Self::ValueText(t) => t.clone(),
        }
    }

    /// Write the state to the element's attribute
    pub fn apply(&self, tree: &mut DomTree, node: NodeId) {
        tree.set_attr(node, self.attr_name(), self.value());
    }
}

/// Read a boolean ARIA attribute (`"true"` / `"false"`)
pub fn bool_attr(tree: &DomTree, node: NodeId, name: &str) -> Option<bool> {
    match tree.attr(node, name)? {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

pub fn is_expanded(tree: &DomTree, node: NodeId) -> bool {
    bool_attr(tree, node, "aria-expanded") == Some(true)
}

pub fn is_checked(tree: &DomTree, node: NodeId) -> bool {
    bool_attr(tree, node, "aria-checked") == Some(true)
}

pub fn is_selected(tree: &DomTree, node: NodeId) -> bool {
    bool_attr(tree, node, "aria-selected") == Some(true)
}

/// Integral values print without a fraction, as the DOM does for numbers
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
