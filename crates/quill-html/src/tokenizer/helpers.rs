//! Helper functions for the HTML tokenizer.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! State transitions, input lookahead, token emission and parse error
//! reporting shared by every state handler.

use quill_common::warning::warn_once;

use super::core::{HTMLTokenizer, TokenizerState};
use super::token::Token;

// =============================================================================
// State Transition Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Reconsume in the X state"
    ///
    /// Transitions to a new state without consuming the current character.
    pub(super) const fn reconsume_in(&mut self, new_state: TokenizerState) {
        self.reconsume = true;
        self.state = new_state;
    }

    /// Take the return state set by whoever entered a character reference.
    /// Falls back to the data state so a missing return state can never stall
    /// the machine.
    pub(super) fn take_return_state(&mut self) -> TokenizerState {
        self.return_state.take().unwrap_or(TokenizerState::Data)
    }
}

// =============================================================================
// Input/Character Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Consume the next input character"
    pub(super) fn consume(&mut self) -> Option<char> {
        let c = self.input.get(self.current_pos).copied();
        if c.is_some() {
            self.current_pos += 1;
        }
        c
    }

    /// Peek at the character `offset` positions past the next input character.
    pub(super) fn peek_codepoint(&self, offset: usize) -> Option<char> {
        self.input.get(self.current_pos + offset).copied()
    }

    /// "If the next few characters are..."
    pub(super) fn next_few_characters_are(&self, target: &str) -> bool {
        target
            .chars()
            .enumerate()
            .all(|(i, expected)| self.peek_codepoint(i) == Some(expected))
    }

    /// "ASCII case-insensitive match for the word 'DOCTYPE'"
    pub(super) fn next_few_characters_are_case_insensitive(&self, target: &str) -> bool {
        target.chars().enumerate().all(|(i, expected)| {
            self.peek_codepoint(i)
                .is_some_and(|c| c.eq_ignore_ascii_case(&expected))
        })
    }

    /// Consume the given string. Callers check it is present first.
    pub(super) fn consume_string(&mut self, target: &str) {
        self.current_pos += target.chars().count();
    }

    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
    ///
    /// The tokenizer whitespace set: tab, LF, FF and space. CR never reaches
    /// the tokenizer because preprocessing turns it into LF.
    pub(super) const fn is_whitespace_char(input_char: char) -> bool {
        matches!(input_char, ' ' | '\t' | '\n' | '\x0C')
    }
}

// =============================================================================
// Token Emission Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Emit the current token"
    pub(super) fn emit_current_token(&mut self) {
        let Some(token) = self.current_token.take() else {
            return;
        };
        match &token {
            Token::StartTag { name, .. } => {
                self.last_start_tag_name = Some(name.clone());
            }
            // "When an end tag token is emitted with attributes, that is an
            // end-tag-with-attributes parse error."
            Token::EndTag { attributes, .. } if !attributes.is_empty() => {
                self.log_parse_error("end-tag-with-attributes");
            }
            _ => {}
        }
        self.pending.push_back(token);
    }

    /// "Emit the current input character as a character token."
    pub(super) fn emit_character_token(&mut self, c: char) {
        self.pending.push_back(Token::Character { data: c });
    }

    /// Emit one character token per character of `s`.
    pub(super) fn emit_characters(&mut self, s: &str) {
        for c in s.chars() {
            self.emit_character_token(c);
        }
    }

    /// "Emit an end-of-file token."
    pub(super) fn emit_eof_token(&mut self) {
        self.pending.push_back(Token::EndOfFile);
        self.emitted_eof = true;
    }
}

// =============================================================================
// End Tag Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "An appropriate end tag token is an end tag token whose tag name matches
    /// the tag name of the last start tag to have been emitted from this
    /// tokenizer, if any. If no start tag has been emitted from this tokenizer,
    /// then no end tag token is appropriate."
    pub(super) fn is_appropriate_end_tag_token(&self) -> bool {
        match (&self.last_start_tag_name, &self.current_token) {
            (Some(last), Some(Token::EndTag { name, .. })) => name == last,
            _ => false,
        }
    }

    /// "Emit a U+003C LESS-THAN SIGN character token, a U+002F SOLIDUS
    /// character token, and a character token for each of the characters in
    /// the temporary buffer (in the order they were added to the buffer).
    /// Reconsume in the X state."
    pub(super) fn abandon_end_tag(&mut self, text_state: TokenizerState) {
        self.emit_character_token('<');
        self.emit_character_token('/');
        let buffer = std::mem::take(&mut self.temporary_buffer);
        self.emit_characters(&buffer);
        self.current_token = None;
        self.reconsume_in(text_state);
    }
}

// =============================================================================
// Error Handling
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
    ///
    /// Parse errors are never fatal; they are counted and reported once per
    /// kind through the shared warning channel.
    pub(super) fn log_parse_error(&mut self, code: &str) {
        self.parse_errors += 1;
        warn_once("HTML Tokenizer", &format!("parse error: {code}"));
    }
}
