//! Character reference states (§ 13.2.5.72 to § 13.2.5.80).

use super::core::{HTMLTokenizer, TokenizerState};
use super::named_character_references::{any_entity_has_prefix, lookup_entity};

impl HTMLTokenizer {
    /// "consumed as part of an attribute"
    pub(super) const fn is_consumed_as_part_of_attribute(&self) -> bool {
        matches!(
            self.return_state,
            Some(
                TokenizerState::AttributeValueDoubleQuoted
                    | TokenizerState::AttributeValueSingleQuoted
                    | TokenizerState::AttributeValueUnquoted
            )
        )
    }

    /// "Flush code points consumed as a character reference"
    ///
    /// "If the character reference was consumed as part of an attribute, then
    /// append each character to the current attribute's value. Otherwise,
    /// emit each character as a character token."
    pub(super) fn flush_code_points_consumed_as_character_reference(&mut self) {
        let buffer = std::mem::take(&mut self.temporary_buffer);
        if self.is_consumed_as_part_of_attribute() {
            for c in buffer.chars() {
                self.push_attribute_value(c);
            }
        } else {
            self.emit_characters(&buffer);
        }
    }

    /// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
    pub(super) fn handle_character_reference_state(&mut self) {
        self.temporary_buffer.clear();
        self.temporary_buffer.push('&');

        match self.current_input_character {
            Some(c) if c.is_ascii_alphanumeric() => {
                self.reconsume_in(TokenizerState::NamedCharacterReference);
            }
            Some('#') => {
                self.temporary_buffer.push('#');
                self.switch_to(TokenizerState::NumericCharacterReference);
            }
            _ => {
                self.flush_code_points_consumed_as_character_reference();
                let return_state = self.take_return_state();
                self.reconsume_in(return_state);
            }
        }
    }

    /// [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
    ///
    /// "Consume the maximum number of characters possible, where the consumed
    /// characters are one of the identifiers in the first column of the named
    /// character references table."
    ///
    /// The search scans ahead over the input and then rewinds to just past the
    /// longest match, so characters that did not become part of the match are
    /// consumed again by whichever state comes next.
    pub(super) fn handle_named_character_reference_state(&mut self) {
        // Entered by reconsume: the current character sits just before current_pos.
        let start = self.current_pos - 1;
        let mut end = start;
        let mut name = String::new();
        let mut longest_match: Option<(usize, &'static str)> = None;

        while let Some(&c) = self.input.get(end) {
            if !(c.is_ascii_alphanumeric() || c == ';') {
                break;
            }
            name.push(c);
            end += 1;
            if let Some(replacement) = lookup_entity(&name) {
                longest_match = Some((end, replacement));
            }
            if c == ';' || !any_entity_has_prefix(&name) {
                break;
            }
        }

        let Some((match_end, replacement)) = longest_match else {
            // "Flush code points consumed as a character reference. Switch to
            // the ambiguous ampersand state."
            self.current_pos = start;
            self.flush_code_points_consumed_as_character_reference();
            self.switch_to(TokenizerState::AmbiguousAmpersand);
            return;
        };

        self.current_pos = match_end;
        let matched: String = self.input[start..match_end].iter().collect();
        let ends_with_semicolon = matched.ends_with(';');

        // "If the character reference was consumed as part of an attribute, and
        // the last character matched is not a U+003B SEMICOLON character (;),
        // and the next input character is either a U+003D EQUALS SIGN character
        // (=) or an ASCII alphanumeric, then, for historical reasons, flush code
        // points consumed as a character reference and switch to the return
        // state."
        if self.is_consumed_as_part_of_attribute()
            && !ends_with_semicolon
            && self
                .peek_codepoint(0)
                .is_some_and(|c| c == '=' || c.is_ascii_alphanumeric())
        {
            self.temporary_buffer.push_str(&matched);
            self.flush_code_points_consumed_as_character_reference();
            let return_state = self.take_return_state();
            self.switch_to(return_state);
            return;
        }

        if !ends_with_semicolon {
            self.log_parse_error("missing-semicolon-after-character-reference");
        }

        self.temporary_buffer.clear();
        self.temporary_buffer.push_str(replacement);
        self.flush_code_points_consumed_as_character_reference();
        let return_state = self.take_return_state();
        self.switch_to(return_state);
    }

    /// [§ 13.2.5.74 Ambiguous ampersand state](https://html.spec.whatwg.org/multipage/parsing.html#ambiguous-ampersand-state)
    pub(super) fn handle_ambiguous_ampersand_state(&mut self) {
        match self.current_input_character {
            Some(c) if c.is_ascii_alphanumeric() => {
                if self.is_consumed_as_part_of_attribute() {
                    self.push_attribute_value(c);
                } else {
                    self.emit_character_token(c);
                }
            }
            Some(';') => {
                self.log_parse_error("unknown-named-character-reference");
                let return_state = self.take_return_state();
                self.reconsume_in(return_state);
            }
            _ => {
                let return_state = self.take_return_state();
                self.reconsume_in(return_state);
            }
        }
    }

    /// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
    pub(super) fn handle_numeric_character_reference_state(&mut self) {
        self.character_reference_code = 0;
        match self.current_input_character {
            Some(c @ ('x' | 'X')) => {
                self.temporary_buffer.push(c);
                self.switch_to(TokenizerState::HexadecimalCharacterReferenceStart);
            }
            _ => self.reconsume_in(TokenizerState::DecimalCharacterReferenceStart),
        }
    }

    /// [§ 13.2.5.76 Hexadecimal character reference start state](https://html.spec.whatwg.org/multipage/parsing.html#hexadecimal-character-reference-start-state)
    /// and [§ 13.2.5.77 Decimal character reference start state](https://html.spec.whatwg.org/multipage/parsing.html#decimal-character-reference-start-state)
    pub(super) fn handle_numeric_character_reference_start_state(&mut self, radix: u32) {
        if self
            .current_input_character
            .is_some_and(|c| c.is_digit(radix))
        {
            let digits = if radix == 16 {
                TokenizerState::HexadecimalCharacterReference
            } else {
                TokenizerState::DecimalCharacterReference
            };
            self.reconsume_in(digits);
        } else {
            self.log_parse_error("absence-of-digits-in-numeric-character-reference");
            self.flush_code_points_consumed_as_character_reference();
            let return_state = self.take_return_state();
            self.reconsume_in(return_state);
        }
    }

    /// [§ 13.2.5.78 Hexadecimal character reference state](https://html.spec.whatwg.org/multipage/parsing.html#hexadecimal-character-reference-state)
    /// and [§ 13.2.5.79 Decimal character reference state](https://html.spec.whatwg.org/multipage/parsing.html#decimal-character-reference-state)
    pub(super) fn handle_numeric_character_reference_digits_state(&mut self, radix: u32) {
        match self.current_input_character {
            Some(c) if c.is_digit(radix) => {
                let digit = c.to_digit(radix).unwrap_or(0);
                // Anything past 0x10FFFF is out of range anyway; saturate so
                // long digit runs cannot overflow.
                self.character_reference_code = self
                    .character_reference_code
                    .saturating_mul(radix)
                    .saturating_add(digit)
                    .min(0x0011_0000);
            }
            Some(';') => self.reconsume_in(TokenizerState::NumericCharacterReferenceEnd),
            _ => {
                self.log_parse_error("missing-semicolon-after-character-reference");
                self.reconsume_in(TokenizerState::NumericCharacterReferenceEnd);
            }
        }
    }

    /// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
    ///
    /// This state does not consume. It is always entered by reconsuming, with
    /// either the `;` that ended the digits, which is done with, or a
    /// character that still belongs to the return state.
    pub(super) fn handle_numeric_character_reference_end_state(&mut self) {
        let code = self.character_reference_code;
        let resolved = match code {
            0 => {
                self.log_parse_error("null-character-reference");
                '\u{FFFD}'
            }
            0x0011_0000.. => {
                self.log_parse_error("character-reference-outside-unicode-range");
                '\u{FFFD}'
            }
            0xD800..=0xDFFF => {
                self.log_parse_error("surrogate-character-reference");
                '\u{FFFD}'
            }
            _ => {
                if is_noncharacter(code) {
                    self.log_parse_error("noncharacter-character-reference");
                } else if code == 0x0D || (is_control(code) && !is_ascii_whitespace(code)) {
                    self.log_parse_error("control-character-reference");
                }
                windows_1252_replacement(code)
                    .or_else(|| char::from_u32(code))
                    .unwrap_or('\u{FFFD}')
            }
        };

        self.temporary_buffer.clear();
        self.temporary_buffer.push(resolved);
        self.flush_code_points_consumed_as_character_reference();

        let return_state = self.take_return_state();
        if self.current_input_character == Some(';') {
            self.switch_to(return_state);
        } else {
            self.reconsume_in(return_state);
        }
    }
}

/// [§ 13.2.5.80](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
///
/// Code points 0x80 to 0x9F that browsers historically decoded as
/// windows-1252.
const fn windows_1252_replacement(code: u32) -> Option<char> {
    let replacement = match code {
        0x80 => '\u{20AC}',
        0x82 => '\u{201A}',
        0x83 => '\u{0192}',
        0x84 => '\u{201E}',
        0x85 => '\u{2026}',
        0x86 => '\u{2020}',
        0x87 => '\u{2021}',
        0x88 => '\u{02C6}',
        0x89 => '\u{2030}',
        0x8A => '\u{0160}',
        0x8B => '\u{2039}',
        0x8C => '\u{0152}',
        0x8E => '\u{017D}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201C}',
        0x94 => '\u{201D}',
        0x95 => '\u{2022}',
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x98 => '\u{02DC}',
        0x99 => '\u{2122}',
        0x9A => '\u{0161}',
        0x9B => '\u{203A}',
        0x9C => '\u{0153}',
        0x9E => '\u{017E}',
        0x9F => '\u{0178}',
        _ => return None,
    };
    Some(replacement)
}

/// [Infra: noncharacter](https://infra.spec.whatwg.org/#noncharacter)
const fn is_noncharacter(code: u32) -> bool {
    matches!(code, 0xFDD0..=0xFDEF) || (code & 0xFFFE) == 0xFFFE
}

/// [Infra: control](https://infra.spec.whatwg.org/#control)
const fn is_control(code: u32) -> bool {
    matches!(code, 0x00..=0x1F | 0x7F..=0x9F)
}

const fn is_ascii_whitespace(code: u32) -> bool {
    matches!(code, 0x09 | 0x0A | 0x0C | 0x0D | 0x20)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows_1252_table() {
        assert_eq!(windows_1252_replacement(0x80), Some('€'));
        assert_eq!(windows_1252_replacement(0x81), None);
        assert_eq!(windows_1252_replacement(0x41), None);
    }

    #[test]
    fn test_noncharacters() {
        assert!(is_noncharacter(0xFFFE));
        assert!(is_noncharacter(0x1FFFF));
        assert!(is_noncharacter(0xFDD0));
        assert!(!is_noncharacter(0x41));
    }
}
