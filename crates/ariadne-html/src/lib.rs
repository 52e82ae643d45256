//! Ariadne HTML Parser
//!
//! Loads page markup into an [`ariadne_dom::Document`] using html5ever.

mod parser;

pub use parser::HtmlParser;

use ariadne_dom::Document;

/// Parse an HTML string into a document
pub fn parse(html: &str) -> Document {
    HtmlParser::new().parse(html)
}

/// Parse error
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to read markup: {0}")]
    Io(#[from] std::io::Error),
}
