//! Focusability
//!
//! Which elements can take focus, and in what sequential order.

use crate::ElementData;

/// Tab index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabIndex {
    /// Not focusable at all
    None,
    /// Focusable by script or pointer, skipped by Tab (`tabindex="-1"`)
    Programmatic,
    /// Part of the sequential order (`tabindex="0"` or positive, or native)
    Sequential(i32),
}

impl TabIndex {
    /// Parse a `tabindex` attribute value
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().parse::<i32>() {
            Ok(n) if n < 0 => Some(Self::Programmatic),
            Ok(n) => Some(Self::Sequential(n)),
            Err(_) => None,
        }
    }

    /// Effective tab index of an element
    pub fn of(elem: &ElementData) -> Self {
        if elem.has_attr("disabled") && is_form_control(elem) {
            return Self::None;
        }
        if let Some(explicit) = elem.get_attr("tabindex").and_then(Self::parse) {
            return explicit;
        }
        if is_natively_focusable(elem) {
            Self::Sequential(0)
        } else {
            Self::None
        }
    }

    /// Reachable with Tab
    pub fn is_sequential(self) -> bool {
        matches!(self, Self::Sequential(_))
    }

    /// Can hold focus at all
    pub fn is_focusable(self) -> bool {
        !matches!(self, Self::None)
    }

    /// Ordering key among sequential elements: positive values first, then zero
    pub(crate) fn order_key(self) -> Option<(u8, i32)> {
        match self {
            Self::Sequential(0) => Some((1, 0)),
            Self::Sequential(n) => Some((0, n)),
            _ => None,
        }
    }
}

fn is_form_control(elem: &ElementData) -> bool {
    matches!(elem.tag.as_str(), "button" | "input" | "select" | "textarea")
}

fn is_natively_focusable(elem: &ElementData) -> bool {
    match elem.tag.as_str() {
        "button" | "select" | "textarea" | "summary" => true,
        "input" => elem.get_attr("type") != Some("hidden"),
        _ => elem.has_attr("href"),
    }
}
