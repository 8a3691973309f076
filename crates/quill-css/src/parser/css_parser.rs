//! CSS Parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
//!
//! Turns a token list into style rules, `@keyframes` rules and generic
//! at-rules. A style rule whose selector does not build is dropped with a
//! warning; the rest of the sheet is unaffected.

use core::fmt;

use quill_common::warning::warn_once;

use crate::selector::{KeyframeSelector, Selector, parse_selector, parse_selector_tokens};
use crate::tokenizer::{CSSToken, CSSTokenizer};

/// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
///
/// A CSS declaration (e.g., `color: red`).
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// The property name, lower-cased.
    pub name: String,
    /// The value as component values, without `!important`.
    pub value: Vec<ComponentValue>,
    /// Whether the declaration has `!important`.
    pub important: bool,
}

impl Declaration {
    /// The value serialized with whitespace collapsed.
    #[must_use]
    pub fn value_text(&self) -> String {
        serialize_values(&self.value)
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value_text())?;
        if self.important {
            f.write_str(" !important")?;
        }
        Ok(())
    }
}

/// [§ 5.4.9 Consume a component value](https://www.w3.org/TR/css-syntax-3/#consume-component-value)
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentValue {
    /// A preserved token.
    Token(CSSToken),
    /// A function with its contents.
    Function {
        /// The function name.
        name: String,
        /// The function arguments.
        value: Vec<ComponentValue>,
    },
    /// A simple block.
    Block {
        /// The opening bracket.
        token: char,
        /// The block contents.
        value: Vec<ComponentValue>,
    },
}

impl ComponentValue {
    /// Source text of this value.
    #[must_use]
    pub fn to_css(&self) -> String {
        match self {
            Self::Token(token) => token.to_css(),
            Self::Function { name, value } => format!("{name}({})", serialize_values(value)),
            Self::Block { token, value } => {
                let close = match token {
                    '[' => ']',
                    '(' => ')',
                    _ => '}',
                };
                format!("{token}{}{close}", serialize_values(value))
            }
        }
    }
}

/// Join component values, collapsing whitespace tokens and trimming the ends.
fn serialize_values(values: &[ComponentValue]) -> String {
    let mut out = String::new();
    let mut pending_space = false;
    for value in values {
        if matches!(value, ComponentValue::Token(CSSToken::Whitespace)) {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push_str(&value.to_css());
    }
    out
}

/// A style rule: a selector and its declaration block.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    /// The rule's selector (a [`Selector::List`] for comma-separated preludes).
    pub selector: Selector,
    /// The declarations in source order.
    pub declarations: Vec<Declaration>,
}

impl StyleRule {
    /// Canonical selector text.
    #[must_use]
    pub fn selector_text(&self) -> String {
        self.selector.to_css()
    }

    /// Replace the selector. Text that does not parse is ignored and the
    /// old selector kept; returns whether the selector changed.
    pub fn set_selector_text(&mut self, text: &str) -> bool {
        match parse_selector(text) {
            Ok(selector) => {
                self.selector = selector;
                true
            }
            Err(_) => false,
        }
    }

    /// Serialize as `selector { name: value; ... }`.
    #[must_use]
    pub fn to_css(&self) -> String {
        format!(
            "{} {}",
            self.selector_text(),
            serialize_block(&self.declarations)
        )
    }
}

impl fmt::Display for StyleRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

fn serialize_block(declarations: &[Declaration]) -> String {
    if declarations.is_empty() {
        return "{ }".to_string();
    }
    let body = declarations
        .iter()
        .map(|declaration| format!("{declaration};"))
        .collect::<Vec<_>>()
        .join(" ");
    format!("{{ {body} }}")
}

/// A rule inside `@keyframes`.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeRule {
    /// The keyframe offsets.
    pub selector: KeyframeSelector,
    /// Declarations applied at those offsets.
    pub declarations: Vec<Declaration>,
}

impl KeyframeRule {
    /// Serialize as `0%, 100% { name: value; }`.
    #[must_use]
    pub fn to_css(&self) -> String {
        format!(
            "{} {}",
            self.selector.to_css(),
            serialize_block(&self.declarations)
        )
    }
}

/// [CSS Animations § 3](https://www.w3.org/TR/css-animations-1/#keyframes)
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframesRule {
    /// Animation name.
    pub name: String,
    /// Keyframes in source order.
    pub keyframes: Vec<KeyframeRule>,
}

/// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)
///
/// Any at-rule without dedicated support.
#[derive(Debug, Clone, PartialEq)]
pub struct AtRule {
    /// The at-keyword name (without the `@`).
    pub name: String,
    /// The prelude component values.
    pub prelude: Vec<ComponentValue>,
    /// The optional block contents.
    pub block: Option<Vec<ComponentValue>>,
}

/// A top-level rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// A style rule.
    Style(StyleRule),
    /// An `@keyframes` rule.
    Keyframes(KeyframesRule),
    /// Any other at-rule.
    At(AtRule),
}

/// [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stylesheet {
    /// The list of rules in the stylesheet.
    pub rules: Vec<Rule>,
}

impl Stylesheet {
    /// The style rules, in source order.
    pub fn style_rules(&self) -> impl Iterator<Item = &StyleRule> {
        self.rules.iter().filter_map(|rule| match rule {
            Rule::Style(style) => Some(style),
            Rule::Keyframes(_) | Rule::At(_) => None,
        })
    }

    /// Append the rules of `other`.
    pub fn extend(&mut self, other: Self) {
        self.rules.extend(other.rules);
    }
}

/// Tokenize and parse a stylesheet.
#[must_use]
pub fn parse_stylesheet(source: &str) -> Stylesheet {
    let mut tokenizer = CSSTokenizer::new(source);
    tokenizer.run();
    CSSParser::new(tokenizer.into_tokens()).parse_stylesheet()
}

/// Tokenize and parse the contents of a declaration block or `style`
/// attribute.
#[must_use]
pub fn parse_declarations(source: &str) -> Vec<Declaration> {
    let mut tokenizer = CSSTokenizer::new(source);
    tokenizer.run();
    CSSParser::new(tokenizer.into_tokens()).parse_declaration_list()
}

/// CSS parser over a token list.
pub struct CSSParser {
    tokens: Vec<CSSToken>,
    position: usize,
}

impl CSSParser {
    /// Create a new parser from a list of tokens.
    #[must_use]
    pub const fn new(tokens: Vec<CSSToken>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
    pub fn parse_stylesheet(&mut self) -> Stylesheet {
        Stylesheet {
            rules: self.consume_list_of_rules(),
        }
    }

    /// [§ 5.3.8 Parse a list of declarations](https://www.w3.org/TR/css-syntax-3/#parse-list-of-declarations)
    pub fn parse_declaration_list(&mut self) -> Vec<Declaration> {
        self.consume_list_of_declarations()
    }

    /// [§ 5.4.1 Consume a list of rules](https://www.w3.org/TR/css-syntax-3/#consume-list-of-rules)
    /// with the top-level flag set.
    fn consume_list_of_rules(&mut self) -> Vec<Rule> {
        let mut rules = Vec::new();
        loop {
            match self.peek() {
                None | Some(CSSToken::EOF) => return rules,
                // "<whitespace-token>", "<CDO-token>", "<CDC-token>": do nothing.
                Some(CSSToken::Whitespace | CSSToken::CDO | CSSToken::CDC) => self.advance(),
                Some(CSSToken::AtKeyword(_)) => rules.extend(self.consume_at_rule()),
                Some(_) => {
                    let Some((prelude, declarations)) = self.consume_qualified_rule() else {
                        continue;
                    };
                    match parse_selector_tokens(&prelude) {
                        Ok(selector) => rules.push(Rule::Style(StyleRule {
                            selector,
                            declarations,
                        })),
                        Err(error) => warn_once(
                            "CSS",
                            &format!(
                                "dropping rule with invalid selector '{}': {error}",
                                serialize_tokens(&prelude)
                            ),
                        ),
                    }
                }
            }
        }
    }

    /// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)
    fn consume_at_rule(&mut self) -> Option<Rule> {
        let Some(CSSToken::AtKeyword(name)) = self.consume().cloned() else {
            return None;
        };

        let mut prelude = Vec::new();
        loop {
            match self.peek() {
                Some(CSSToken::Semicolon) => {
                    self.advance();
                    break;
                }
                // "This is a parse error. Return the at-rule."
                None | Some(CSSToken::EOF) => break,
                Some(CSSToken::LeftBrace) if is_keyframes(&name) => {
                    self.advance();
                    return Some(Rule::Keyframes(KeyframesRule {
                        name: serialize_values(&prelude),
                        keyframes: self.consume_keyframe_list(),
                    }));
                }
                Some(CSSToken::LeftBrace) => {
                    let block = self.consume_simple_block();
                    return Some(Rule::At(AtRule {
                        name,
                        prelude,
                        block: Some(block),
                    }));
                }
                Some(_) => prelude.extend(self.consume_component_value()),
            }
        }
        Some(Rule::At(AtRule {
            name,
            prelude,
            block: None,
        }))
    }

    /// Rules inside `@keyframes { ... }`, up to and including the closing brace.
    fn consume_keyframe_list(&mut self) -> Vec<KeyframeRule> {
        let mut keyframes = Vec::new();
        loop {
            match self.peek() {
                None | Some(CSSToken::EOF) => return keyframes,
                Some(CSSToken::RightBrace) => {
                    self.advance();
                    return keyframes;
                }
                Some(CSSToken::Whitespace | CSSToken::Semicolon) => self.advance(),
                Some(_) => {
                    let Some((prelude, declarations)) = self.consume_qualified_rule() else {
                        continue;
                    };
                    match KeyframeSelector::from_tokens(&prelude) {
                        Some(selector) => keyframes.push(KeyframeRule {
                            selector,
                            declarations,
                        }),
                        None => warn_once(
                            "CSS",
                            &format!(
                                "dropping keyframe with invalid selector '{}'",
                                serialize_tokens(&prelude)
                            ),
                        ),
                    }
                }
            }
        }
    }

    /// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
    ///
    /// Returns the raw prelude tokens and the parsed declaration block, or
    /// `None` when input ends before the block.
    fn consume_qualified_rule(&mut self) -> Option<(Vec<CSSToken>, Vec<Declaration>)> {
        let mut prelude = Vec::new();
        loop {
            match self.peek() {
                // "This is a parse error. Return nothing."
                None | Some(CSSToken::EOF) => return None,
                Some(CSSToken::LeftBrace) => {
                    self.advance();
                    let declarations = self.consume_list_of_declarations();
                    if self.peek() == Some(&CSSToken::RightBrace) {
                        self.advance();
                    }
                    return Some((prelude, declarations));
                }
                Some(_) => prelude.extend(self.consume().cloned()),
            }
        }
    }

    /// [§ 5.4.8 Consume a simple block](https://www.w3.org/TR/css-syntax-3/#consume-simple-block)
    fn consume_simple_block(&mut self) -> Vec<ComponentValue> {
        let ending = match self.consume() {
            Some(CSSToken::LeftBrace) => CSSToken::RightBrace,
            Some(CSSToken::LeftBracket) => CSSToken::RightBracket,
            Some(CSSToken::LeftParen) => CSSToken::RightParen,
            _ => return Vec::new(),
        };

        let mut value = Vec::new();
        loop {
            match self.peek() {
                Some(token) if *token == ending => {
                    self.advance();
                    return value;
                }
                None | Some(CSSToken::EOF) => return value,
                Some(_) => value.extend(self.consume_component_value()),
            }
        }
    }

    /// [§ 5.4.5 Consume a list of declarations](https://www.w3.org/TR/css-syntax-3/#consume-list-of-declarations)
    ///
    /// Stops before a `}` so the caller can close its block.
    fn consume_list_of_declarations(&mut self) -> Vec<Declaration> {
        let mut declarations = Vec::new();
        loop {
            match self.peek() {
                Some(CSSToken::Whitespace | CSSToken::Semicolon) => self.advance(),
                None | Some(CSSToken::EOF | CSSToken::RightBrace) => return declarations,
                // Nested at-rules are consumed and discarded.
                Some(CSSToken::AtKeyword(_)) => {
                    let _ = self.consume_at_rule();
                }
                Some(CSSToken::Ident(_)) => declarations.extend(self.consume_declaration()),
                // "This is a parse error." Skip to the next semicolon.
                Some(_) => {
                    self.advance();
                    self.skip_to_declaration_end();
                }
            }
        }
    }

    fn skip_to_declaration_end(&mut self) {
        while !matches!(
            self.peek(),
            None | Some(CSSToken::Semicolon | CSSToken::RightBrace | CSSToken::EOF)
        ) {
            let _ = self.consume_component_value();
        }
    }

    /// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
    fn consume_declaration(&mut self) -> Option<Declaration> {
        let Some(CSSToken::Ident(name)) = self.consume().cloned() else {
            return None;
        };

        self.skip_whitespace();
        if self.peek() != Some(&CSSToken::Colon) {
            self.skip_to_declaration_end();
            return None;
        }
        self.advance();
        self.skip_whitespace();

        let mut value = Vec::new();
        while !matches!(
            self.peek(),
            None | Some(CSSToken::EOF | CSSToken::Semicolon | CSSToken::RightBrace)
        ) {
            value.extend(self.consume_component_value());
        }

        let important = strip_important(&mut value);
        trim_trailing_whitespace(&mut value);

        Some(Declaration {
            name: name.to_ascii_lowercase(),
            value,
            important,
        })
    }

    /// [§ 5.4.9 Consume a component value](https://www.w3.org/TR/css-syntax-3/#consume-component-value)
    fn consume_component_value(&mut self) -> Option<ComponentValue> {
        match self.peek()? {
            CSSToken::LeftBrace | CSSToken::LeftBracket | CSSToken::LeftParen => {
                let token = match self.peek() {
                    Some(CSSToken::LeftBracket) => '[',
                    Some(CSSToken::LeftParen) => '(',
                    _ => '{',
                };
                let value = self.consume_simple_block();
                Some(ComponentValue::Block { token, value })
            }
            CSSToken::Function(_) => {
                let Some(CSSToken::Function(name)) = self.consume().cloned() else {
                    return None;
                };
                let mut value = Vec::new();
                loop {
                    match self.peek() {
                        Some(CSSToken::RightParen) => {
                            self.advance();
                            break;
                        }
                        None | Some(CSSToken::EOF) => break,
                        Some(_) => value.extend(self.consume_component_value()),
                    }
                }
                Some(ComponentValue::Function { name, value })
            }
            _ => self.consume().cloned().map(ComponentValue::Token),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek() == Some(&CSSToken::Whitespace) {
            self.advance();
        }
    }

    fn consume(&mut self) -> Option<&CSSToken> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token)
    }

    const fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    fn peek(&self) -> Option<&CSSToken> {
        self.tokens.get(self.position)
    }
}

fn is_keyframes(name: &str) -> bool {
    name.eq_ignore_ascii_case("keyframes") || name.eq_ignore_ascii_case("-webkit-keyframes")
}

fn serialize_tokens(tokens: &[CSSToken]) -> String {
    let text: String = tokens.iter().map(CSSToken::to_css).collect();
    text.trim().to_string()
}

fn trim_trailing_whitespace(value: &mut Vec<ComponentValue>) {
    while matches!(
        value.last(),
        Some(ComponentValue::Token(CSSToken::Whitespace))
    ) {
        let _ = value.pop();
    }
}

/// [§ 6.4.2 Important declarations](https://www.w3.org/TR/css-cascade-4/#importance)
///
/// "A declaration is important if it has a !important annotation, i.e. if
/// the last two (non-whitespace, non-comment) tokens in its value are a
/// <delim-token> with the value "!" followed by an <ident-token> with a
/// value that is an ASCII case-insensitive match for "important"."
///
/// Removes the annotation when present.
fn strip_important(value: &mut Vec<ComponentValue>) -> bool {
    let mut end = value.len();
    let skip_whitespace = |end: &mut usize| {
        while *end > 0 && matches!(value[*end - 1], ComponentValue::Token(CSSToken::Whitespace)) {
            *end -= 1;
        }
    };

    skip_whitespace(&mut end);
    let Some(ComponentValue::Token(CSSToken::Ident(ident))) = end.checked_sub(1).map(|i| &value[i])
    else {
        return false;
    };
    if !ident.eq_ignore_ascii_case("important") {
        return false;
    }
    end -= 1;
    skip_whitespace(&mut end);
    if end == 0 || value[end - 1] != ComponentValue::Token(CSSToken::Delim('!')) {
        return false;
    }
    value.truncate(end - 1);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_important_requires_bang() {
        let declarations = parse_declarations("a: x important; b: y ! IMPORTANT");
        assert_eq!(declarations.len(), 2);
        assert!(!declarations[0].important);
        assert_eq!(declarations[0].value_text(), "x important");
        assert!(declarations[1].important);
        assert_eq!(declarations[1].value_text(), "y");
    }

    #[test]
    fn test_value_text_collapses_whitespace() {
        let declarations = parse_declarations("font-family:  a ,\n b ; margin: calc(1px  + 2px)");
        assert_eq!(declarations[0].value_text(), "a , b");
        assert_eq!(declarations[1].value_text(), "calc(1px + 2px)");
    }
}
