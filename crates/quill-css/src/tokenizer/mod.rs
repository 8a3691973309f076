//! CSS tokenizer module.

/// Pull-based tokenizer per [CSS Syntax Level 3 § 4.3](https://www.w3.org/TR/css-syntax-3/#tokenizer-algorithms).
pub mod css_tokenizer;
/// CSS token types per [CSS Syntax Level 3 § 4](https://www.w3.org/TR/css-syntax-3/#tokenization).
pub mod token;

pub use css_tokenizer::CSSTokenizer;
pub use token::{CSSToken, HashType, NumericType};
