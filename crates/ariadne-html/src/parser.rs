//! HTML5 Parser implementation
//!
//! Uses html5ever's built-in RcDom and converts it to the arena DOM.

use std::io::Read;

use ariadne_dom::{Document, DomTree, NodeId};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use crate::ParseError;

/// HTML5 parser
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlParser {
    keep_comments: bool,
}

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep comment nodes instead of dropping them
    pub fn keep_comments(mut self, keep: bool) -> Self {
        self.keep_comments = keep;
        self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Document {
        let dom = parse_document(RcDom::default(), Default::default()).one(html);
        self.convert(&dom)
    }

    /// Parse UTF-8 markup from a reader
    pub fn parse_reader(&self, reader: &mut impl Read) -> Result<Document, ParseError> {
        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(reader)?;
        Ok(self.convert(&dom))
    }

    fn convert(&self, dom: &RcDom) -> Document {
        let mut tree = DomTree::new();
        let root = tree.root();
        self.convert_node(&dom.document, &mut tree, root);
        tracing::debug!("Parsed {} nodes", tree.len());
        Document::from_tree(tree)
    }

    /// Convert an RcDom node to our DOM format
    fn convert_node(&self, handle: &Handle, tree: &mut DomTree, parent: NodeId) {
        let id = match &handle.data {
            RcNodeData::Document => {
                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, parent);
                }
                return;
            }
            RcNodeData::Text { contents } => {
                let text = contents.borrow();
                // Inter-element whitespace carries no meaning for the widgets
                if text.trim().is_empty() {
                    return;
                }
                tree.create_text(text.to_string())
            }
            RcNodeData::Comment { contents } if self.keep_comments => {
                tree.create_comment(contents.to_string())
            }
            RcNodeData::Element { name, attrs, .. } => {
                let id = tree.create_element(&name.local);
                if let Some(elem) = tree.element_mut(id) {
                    for attr in attrs.borrow().iter() {
                        elem.set_attr(&attr.name.local, attr.value.to_string());
                    }
                }
                id
            }
            RcNodeData::Comment { .. }
            | RcNodeData::Doctype { .. }
            | RcNodeData::ProcessingInstruction { .. } => return,
        };

        if let Err(err) = tree.append_child(parent, id) {
            tracing::warn!("dropping node from markup: {err}");
            return;
        }
        for child in handle.children.borrow().iter() {
            self.convert_node(child, tree, id);
        }
    }
}
