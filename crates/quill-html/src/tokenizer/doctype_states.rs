//! DOCTYPE states (§ 13.2.5.53 to § 13.2.5.68).
//!
//! Public and system identifiers run through the same handlers, selected by
//! a `public` flag.

use super::core::{HTMLTokenizer, TokenizerState};
use super::token::Token;

impl HTMLTokenizer {
    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    pub(super) fn handle_doctype_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeDOCTYPEName);
            }
            Some('>') => self.reconsume_in(TokenizerState::BeforeDOCTYPEName),
            None => {
                self.current_token = Some(Token::new_doctype());
                self.eof_in_doctype();
            }
            Some(_) => {
                self.log_parse_error("missing-whitespace-before-doctype-name");
                self.reconsume_in(TokenizerState::BeforeDOCTYPEName);
            }
        }
    }

    /// [§ 13.2.5.54 Before DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-name-state)
    pub(super) fn handle_before_doctype_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('>') => {
                self.log_parse_error("missing-doctype-name");
                let mut token = Token::new_doctype();
                token.set_force_quirks();
                self.current_token = Some(token);
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            None => {
                self.current_token = Some(Token::new_doctype());
                self.eof_in_doctype();
            }
            Some(c) => {
                let first = if c == '\0' {
                    self.log_parse_error("unexpected-null-character");
                    '\u{FFFD}'
                } else {
                    c.to_ascii_lowercase()
                };
                let mut token = Token::new_doctype();
                token.push_doctype_name(first);
                self.current_token = Some(token);
                self.switch_to(TokenizerState::DOCTYPEName);
            }
        }
    }

    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    pub(super) fn handle_doctype_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::AfterDOCTYPEName);
            }
            Some('>') => self.emit_doctype_and_return_to_data(),
            Some('\0') => {
                self.log_parse_error("unexpected-null-character");
                self.with_doctype(|token| token.push_doctype_name('\u{FFFD}'));
            }
            None => self.eof_in_doctype(),
            Some(c) => self.with_doctype(|token| token.push_doctype_name(c.to_ascii_lowercase())),
        }
    }

    /// [§ 13.2.5.56 After DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-name-state)
    pub(super) fn handle_after_doctype_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('>') => self.emit_doctype_and_return_to_data(),
            None => self.eof_in_doctype(),
            Some(_) => {
                // "If the six characters starting from the current input
                // character are an ASCII case-insensitive match for the word
                // "PUBLIC"..."
                self.current_pos -= 1;
                if self.next_few_characters_are_case_insensitive("PUBLIC") {
                    self.consume_string("PUBLIC");
                    self.switch_to(TokenizerState::AfterDOCTYPEPublicKeyword);
                } else if self.next_few_characters_are_case_insensitive("SYSTEM") {
                    self.consume_string("SYSTEM");
                    self.switch_to(TokenizerState::AfterDOCTYPESystemKeyword);
                } else {
                    self.current_pos += 1;
                    self.log_parse_error("invalid-character-sequence-after-doctype-name");
                    self.bogus_doctype();
                }
            }
        }
    }

    /// [§ 13.2.5.57 After DOCTYPE public keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-keyword-state)
    /// and [§ 13.2.5.63 After DOCTYPE system keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-keyword-state)
    pub(super) fn handle_after_doctype_keyword_state(
        &mut self,
        before_identifier: TokenizerState,
        public: bool,
    ) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => self.switch_to(before_identifier),
            Some(quote @ ('"' | '\'')) => {
                self.log_parse_error("missing-whitespace-after-doctype-keyword");
                self.begin_identifier(public, quote);
            }
            Some('>') => self.missing_doctype_identifier(),
            None => self.eof_in_doctype(),
            Some(_) => {
                self.log_parse_error("missing-quote-before-doctype-identifier");
                self.bogus_doctype();
            }
        }
    }

    /// [§ 13.2.5.58 Before DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-public-identifier-state)
    /// and [§ 13.2.5.64 Before DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-system-identifier-state)
    pub(super) fn handle_before_doctype_identifier_state(&mut self, public: bool) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some(quote @ ('"' | '\'')) => self.begin_identifier(public, quote),
            Some('>') => self.missing_doctype_identifier(),
            None => self.eof_in_doctype(),
            Some(_) => {
                self.log_parse_error("missing-quote-before-doctype-identifier");
                self.bogus_doctype();
            }
        }
    }

    /// § 13.2.5.59, 60, 65 and 66: quoted DOCTYPE identifiers.
    pub(super) fn handle_doctype_identifier_quoted_state(&mut self, quote: char, public: bool) {
        match self.current_input_character {
            Some(c) if c == quote => {
                if public {
                    self.switch_to(TokenizerState::AfterDOCTYPEPublicIdentifier);
                } else {
                    self.switch_to(TokenizerState::AfterDOCTYPESystemIdentifier);
                }
            }
            Some('>') => {
                self.log_parse_error("abrupt-doctype-identifier");
                self.with_doctype(Token::set_force_quirks);
                self.emit_doctype_and_return_to_data();
            }
            None => self.eof_in_doctype(),
            Some(c) => {
                let c = if c == '\0' {
                    self.log_parse_error("unexpected-null-character");
                    '\u{FFFD}'
                } else {
                    c
                };
                if public {
                    self.with_doctype(|token| token.push_public_identifier(c));
                } else {
                    self.with_doctype(|token| token.push_system_identifier(c));
                }
            }
        }
    }

    /// [§ 13.2.5.61 After DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-identifier-state)
    pub(super) fn handle_after_doctype_public_identifier_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BetweenDOCTYPEPublicAndSystemIdentifiers);
            }
            Some('>') => self.emit_doctype_and_return_to_data(),
            Some(quote @ ('"' | '\'')) => {
                self.log_parse_error("missing-whitespace-between-doctype-public-and-system-identifiers");
                self.begin_identifier(false, quote);
            }
            None => self.eof_in_doctype(),
            Some(_) => {
                self.log_parse_error("missing-quote-before-doctype-system-identifier");
                self.bogus_doctype();
            }
        }
    }

    /// [§ 13.2.5.62 Between DOCTYPE public and system identifiers state](https://html.spec.whatwg.org/multipage/parsing.html#between-doctype-public-and-system-identifiers-state)
    pub(super) fn handle_between_doctype_identifiers_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('>') => self.emit_doctype_and_return_to_data(),
            Some(quote @ ('"' | '\'')) => self.begin_identifier(false, quote),
            None => self.eof_in_doctype(),
            Some(_) => {
                self.log_parse_error("missing-quote-before-doctype-system-identifier");
                self.bogus_doctype();
            }
        }
    }

    /// [§ 13.2.5.67 After DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-identifier-state)
    pub(super) fn handle_after_doctype_system_identifier_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('>') => self.emit_doctype_and_return_to_data(),
            None => self.eof_in_doctype(),
            // "This does not set the current DOCTYPE token's force-quirks flag to on."
            Some(_) => {
                self.log_parse_error("unexpected-character-after-doctype-system-identifier");
                self.reconsume_in(TokenizerState::BogusDOCTYPE);
            }
        }
    }

    /// [§ 13.2.5.68 Bogus DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-doctype-state)
    pub(super) fn handle_bogus_doctype_state(&mut self) {
        match self.current_input_character {
            Some('>') => self.emit_doctype_and_return_to_data(),
            Some('\0') => self.log_parse_error("unexpected-null-character"),
            None => {
                self.emit_current_token();
                self.emit_eof_token();
            }
            Some(_) => {}
        }
    }

    /// Set the chosen identifier to the empty string and enter its quoted state.
    fn begin_identifier(&mut self, public: bool, quote: char) {
        let state = match (public, quote) {
            (true, '"') => TokenizerState::DOCTYPEPublicIdentifierDoubleQuoted,
            (true, _) => TokenizerState::DOCTYPEPublicIdentifierSingleQuoted,
            (false, '"') => TokenizerState::DOCTYPESystemIdentifierDoubleQuoted,
            (false, _) => TokenizerState::DOCTYPESystemIdentifierSingleQuoted,
        };
        if public {
            self.with_doctype(Token::begin_public_identifier);
        } else {
            self.with_doctype(Token::begin_system_identifier);
        }
        self.switch_to(state);
    }

    /// "This is a missing-doctype-public-identifier parse error. Set the current
    /// DOCTYPE token's force-quirks flag to on. Switch to the data state. Emit
    /// the current DOCTYPE token."
    fn missing_doctype_identifier(&mut self) {
        self.log_parse_error("missing-doctype-identifier");
        self.with_doctype(Token::set_force_quirks);
        self.emit_doctype_and_return_to_data();
    }

    /// "Set the current DOCTYPE token's force-quirks flag to on. Reconsume in
    /// the bogus DOCTYPE state."
    fn bogus_doctype(&mut self) {
        self.with_doctype(Token::set_force_quirks);
        self.reconsume_in(TokenizerState::BogusDOCTYPE);
    }

    /// "This is an eof-in-doctype parse error. Set the current DOCTYPE token's
    /// force-quirks flag to on. Emit the current DOCTYPE token. Emit an
    /// end-of-file token."
    fn eof_in_doctype(&mut self) {
        self.log_parse_error("eof-in-doctype");
        self.with_doctype(Token::set_force_quirks);
        self.emit_current_token();
        self.emit_eof_token();
    }

    fn emit_doctype_and_return_to_data(&mut self) {
        self.switch_to(TokenizerState::Data);
        self.emit_current_token();
    }

    fn with_doctype(&mut self, f: impl FnOnce(&mut Token)) {
        if let Some(token) = self.current_token.as_mut() {
            f(token);
        }
    }
}
