//! Geometry APIs
//!
//! DOMRect, the viewport, and the host-supplied layout that stands in for
//! `getBoundingClientRect`. There is no layout engine here: the embedder
//! reports where elements are, optionally per class so that a placement
//! class change moves the element.

use std::collections::HashMap;

use crate::NodeId;

/// DOMRect - rectangle geometry
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DOMRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DOMRect {
    /// Create with dimensions
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Top edge (same as y)
    pub fn top(&self) -> f64 {
        self.y
    }

    /// Right edge
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Left edge (same as x)
    pub fn left(&self) -> f64 {
        self.x
    }
}

/// Visible area of the page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

/// Host-reported element boxes
#[derive(Debug, Clone, Default)]
pub struct LayoutMap {
    rects: HashMap<NodeId, DOMRect>,
    // later entries win when several classes are present
    class_rects: HashMap<NodeId, Vec<(String, DOMRect)>>,
}

impl LayoutMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Box of the element in its default state
    pub fn set_rect(&mut self, node: NodeId, rect: DOMRect) {
        self.rects.insert(node, rect);
    }

    /// Box of the element while it carries `class`
    pub fn set_rect_for_class(&mut self, node: NodeId, class: &str, rect: DOMRect) {
        let entries = self.class_rects.entry(node).or_default();
        entries.retain(|(c, _)| c != class);
        entries.push((class.to_string(), rect));
    }

    pub fn clear(&mut self, node: NodeId) {
        self.rects.remove(&node);
        self.class_rects.remove(&node);
    }

    /// Rect for a node given the classes it currently has
    pub fn resolve(&self, node: NodeId, has_class: impl Fn(&str) -> bool) -> DOMRect {
        self.class_rects
            .get(&node)
            .and_then(|entries| entries.iter().rev().find(|(class, _)| has_class(class)))
            .map(|(_, rect)| *rect)
            .or_else(|| self.rects.get(&node).copied())
            .unwrap_or_default()
    }
}
