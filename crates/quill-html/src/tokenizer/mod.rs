//! HTML tokenizer module.
//!
//! Implements [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//! of the WHATWG HTML Living Standard.

/// Character reference states per § 13.2.5.72.
mod character_reference;
/// Comment, bogus comment and CDATA states.
mod comment_states;
/// Tokenizer state machine and pull-based driver.
pub mod core;
/// DOCTYPE states.
mod doctype_states;
/// Helper methods for tokenizer state transitions.
mod helpers;
/// Named character reference lookup table per § 13.5.
pub mod named_character_references;
/// Tag and attribute states.
mod tag_states;
/// Data, RCDATA, RAWTEXT, PLAINTEXT and script data states.
mod text_states;
/// Token types produced by the tokenizer.
pub mod token;

pub use self::core::{HTMLTokenizer, TokenizerState};
pub use token::{Attribute, Token};
