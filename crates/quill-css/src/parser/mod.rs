//! CSS stylesheet and declaration parsing.

/// Rule and declaration consumption over a token list.
pub mod css_parser;

pub use css_parser::{
    AtRule, CSSParser, ComponentValue, Declaration, KeyframeRule, KeyframesRule, Rule, StyleRule,
    Stylesheet, parse_declarations, parse_stylesheet,
};
