//! HTML tokenizer and parser for the Quill engine.
//!
//! # Scope
//!
//! This crate implements:
//! - **HTML Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - All 80 tokenizer states, including script data escapes, CDATA sections
//!     and DOCTYPE identifiers
//!   - Named and numeric character references
//!   - Pull-based: the tree builder asks for one token at a time and may
//!     switch the content model between tokens
//!
//! - **HTML Parser / Tree Builder** ([WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction))
//!   - All 23 insertion modes
//!   - Adoption agency algorithm, foster parenting, active formatting element
//!     reconstruction
//!   - Quirks mode detection from the DOCTYPE
//!
//! - **Fragment parsing** ([WHATWG § 13.4](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments))
//!
//! # Not Implemented
//!
//! - Foreign content: `<svg>` and `<math>` subtrees are parsed as HTML
//!   elements and a warning is recorded
//! - Script execution and encoding sniffing

/// HTML parser and tree construction.
pub mod parser;
/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;

pub use parser::{
    Fragment, HTMLParser, InsertionMode, ParseIssue, ParsedDocument, ParserOptions, QuirksMode,
    dump_nodes, dump_tree, parse_document, parse_document_with_options, parse_fragment,
    print_tree,
};
pub use tokenizer::{Attribute, HTMLTokenizer, Token, TokenizerState};
