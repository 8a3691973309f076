//! HTML parser module for tree construction.
//!
//! [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)

/// Tree builder state, insertion modes and the token driver.
pub mod core;
/// Text dumps of parsed trees.
mod dump;
/// Element categories: special, formatting, scope boundaries.
mod elements;
/// Active formatting elements and the adoption agency algorithm.
mod formatting;
/// The fragment parsing algorithm.
mod fragment;
/// Node creation and the appropriate place for inserting a node.
mod insertion;
/// Per-insertion-mode handlers.
mod modes;
/// Stack of open elements queries and resets.
mod stack;

pub use self::core::{
    ActiveFormattingElement, HTMLParser, InsertionMode, ParseIssue, ParsedDocument, ParserOptions,
    QuirksMode,
};
pub use dump::{dump_nodes, dump_tree, print_tree};
pub use fragment::{Fragment, parse_fragment};

/// Parse a complete document with default options.
///
/// ```
/// use quill_html::parse_document;
///
/// let document = parse_document("<title>Hi</title><p>Hello");
/// let body = document.tree.body().unwrap();
/// assert_eq!(document.tree.text_content(body), "Hello");
/// ```
#[must_use]
pub fn parse_document(input: &str) -> ParsedDocument {
    parse_document_with_options(input, ParserOptions::default())
}

/// Parse a complete document.
#[must_use]
pub fn parse_document_with_options(input: &str, options: ParserOptions) -> ParsedDocument {
    HTMLParser::new(input, options).run()
}
