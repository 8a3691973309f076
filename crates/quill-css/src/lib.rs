//! CSS tokenizer, selector construction and matching, and cascade for the Quill engine.
//!
//! # Scope
//!
//! This crate implements:
//! - **CSS Tokenizer** ([§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization))
//!   - All token types, comments and escapes
//!   - Pull-based `next_token()` plus batch `run()` for dumps
//!
//! - **CSS Parser** ([§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing))
//!   - Style rules, `@keyframes` and generic at-rules
//!   - Declaration lists with `!important`
//!
//! - **CSS Selectors** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - A token-driven builder state machine
//!   - Type, universal, id, class and attribute selectors
//!   - Pseudo-classes, `:not()`, the `:nth-*` family, pseudo-elements
//!   - Compound, complex and list selectors with specificity
//!
//! - **CSS Cascade** ([CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/))
//!   - A property bag per element with specificity and `!important` layers
//!   - Keyword-validated properties and `inherit`
//!
//! # Not Implemented
//!
//! - Layout, painting and computed values
//! - Media queries and conditional rules
//! - Shadow-tree and dynamic user-interaction pseudo-classes

/// CSS cascade per [CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/).
pub mod cascade;
/// CSS parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
pub mod parser;
/// Property registry and specified values.
pub mod property;
/// CSS selector construction and matching per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
pub mod selector;
/// CSS tokenizer per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
pub mod tokenizer;

pub use cascade::{CascadedValue, PropertyBag, WeightedDeclaration, compute_styles, stylesheet_from_document};
pub use parser::{
    CSSParser, ComponentValue, Declaration, Rule, StyleRule, Stylesheet, parse_declarations,
    parse_stylesheet,
};
pub use property::{KeywordProperty, Property, PropertyValue};
pub use selector::{
    KeyframeSelector, Selector, SelectorBuilder, SelectorError, Specificity, parse_selector,
};
pub use tokenizer::{CSSToken, CSSTokenizer};
