//! Ariadne DOM - Document Object Model
//!
//! Arena-based DOM used by the widget interaction engine. Nodes are owned by
//! the [`DomTree`] arena and addressed by [`NodeId`]; every other component
//! only holds copies of ids.

mod classlist;
mod document;
mod events;
mod focus;
mod geometry;
mod node;
mod operations;
mod selector;
mod tree;

pub use classlist::ClassList;
pub use document::Document;
pub use events::{Key, KeyEvent};
pub use focus::TabIndex;
pub use geometry::{DOMRect, LayoutMap, Viewport};
pub use node::{Attribute, ElementData, Node, NodeData};
pub use operations::{DomError, DomResult};
pub use selector::{AttrMatch, CompoundSelector, Selector, SimpleSelector};
pub use tree::{Ancestors, Children, Descendants, DomTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Document node of every tree
    pub const ROOT: NodeId = NodeId(0);
    /// Absent link
    pub const NONE: NodeId = NodeId(u32::MAX);

    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Arena slot of this node
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub(crate) fn link(self) -> Option<NodeId> {
        self.is_valid().then_some(self)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            write!(f, "#{}", self.0)
        } else {
            f.write_str("#none")
        }
    }
}
