//! Token-driven selector construction.
//!
//! [`SelectorBuilder`] is fed CSS tokens one at a time and folds them into a
//! [`Selector`]: simple selectors accumulate into a compound, combinators
//! extend a complex chain, and commas close a list member. Any token that
//! cannot appear at the current position rejects the whole selector.

use crate::tokenizer::CSSToken;
use crate::tokenizer::token::format_number;

use super::nth::{self, Nth, NthKind};
use super::{
    AttributeOperator, AttributeSelector, Combinator, ComplexSelector, PseudoClass,
    PseudoElement, PseudoFunction, Selector,
};

/// Where the builder is within the selector text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum BuilderState {
    /// Between simple selectors.
    Data,
    /// After `[`, expecting the attribute name.
    Attribute,
    /// After the attribute name, expecting an operator or `]`.
    AttributeOperator,
    /// After the operator, expecting the value.
    AttributeValue,
    /// After the value, expecting `]`.
    AttributeEnd,
    /// After `.`, expecting the class name.
    Class,
    /// After `:`, expecting a pseudo-class name, a function or a second `:`.
    PseudoClass,
    /// Inside the parentheses of a functional pseudo-class.
    PseudoClassFunction,
    /// After the single argument of `:dir()`, `:lang()` or `:contains()`.
    PseudoClassFunctionEnd,
    /// After `::`, expecting the pseudo-element name.
    PseudoElement,
}

/// Why a selector was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    /// A token that cannot appear in the current state.
    #[error("unexpected {token} in {state} state")]
    UnexpectedToken {
        /// Canonical text of the token.
        token: String,
        /// State the builder was in.
        state: BuilderState,
    },
    /// `:name` that is neither a known pseudo-class nor a legacy pseudo-element.
    #[error("unknown pseudo-class ':{0}'")]
    UnknownPseudoClass(String),
    /// `::name` that is not a known pseudo-element.
    #[error("unknown pseudo-element '::{0}'")]
    UnknownPseudoElement(String),
    /// `:name(` for an unsupported function.
    #[error("unknown functional pseudo-class ':{0}()'")]
    UnknownFunction(String),
    /// An `An+B` argument that does not parse.
    #[error("malformed nth argument '{0}'")]
    InvalidNth(String),
    /// A combinator with nothing on one of its sides.
    #[error("combinator without a selector on both sides")]
    DanglingCombinator,
    /// `a,,b`, a leading comma or a trailing comma.
    #[error("empty selector in list")]
    EmptyListMember,
    /// A function whose argument list was empty.
    #[error("empty argument to ':{0}()'")]
    EmptyArgument(String),
    /// Input ended inside an attribute, class or pseudo-class.
    #[error("selector ended in {0} state")]
    UnexpectedEnd(BuilderState),
}

/// The functional pseudo-class whose arguments are being read.
#[derive(Debug, Clone)]
enum PendingFunction {
    /// Argument text accumulated so far.
    Nth { kind: NthKind, text: String },
    /// `:not()` feeds a nested builder until its closing parenthesis.
    Not(Box<SelectorBuilder>),
    /// `:dir()`, `:lang()` or `:contains()`.
    Argument { name: String, value: Option<String> },
}

/// State machine that assembles a [`Selector`] from CSS tokens.
#[derive(Debug, Clone)]
pub struct SelectorBuilder {
    state: BuilderState,
    /// Simple selectors of the compound under construction.
    compound: Vec<Selector>,
    /// Finished compounds of the current complex selector.
    compounds: Vec<Selector>,
    /// Combinators between the entries of `compounds`.
    combinators: Vec<Combinator>,
    /// Combinator seen after `compound`, applied once the next simple
    /// selector arrives.
    pending_combinator: Option<Combinator>,
    /// Completed members of a selector list.
    list: Vec<Selector>,
    /// A comma was seen and no member has started since.
    after_comma: bool,
    attribute_name: String,
    attribute_prefix: Option<char>,
    attribute_operator: AttributeOperator,
    attribute_value: String,
    function: Option<PendingFunction>,
    error: Option<SelectorError>,
}

impl Default for SelectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectorBuilder {
    /// Create a builder in the data state with nothing built.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: BuilderState::Data,
            compound: Vec::new(),
            compounds: Vec::new(),
            combinators: Vec::new(),
            pending_combinator: None,
            list: Vec::new(),
            after_comma: false,
            attribute_name: String::new(),
            attribute_prefix: None,
            attribute_operator: AttributeOperator::Available,
            attribute_value: String::new(),
            function: None,
            error: None,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> BuilderState {
        self.state
    }

    /// True while nothing at all has been built.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.compound.is_empty() && self.compounds.is_empty() && self.list.is_empty()
    }

    /// Feed one token.
    ///
    /// # Errors
    ///
    /// Returns an error when the token cannot appear here. The builder then
    /// stays rejected: every later call, and [`SelectorBuilder::finish`],
    /// returns the same error.
    pub fn apply(&mut self, token: CSSToken) -> Result<(), SelectorError> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        let result = self.dispatch(token);
        if let Err(error) = &result {
            self.error = Some(error.clone());
        }
        result
    }

    fn dispatch(&mut self, token: CSSToken) -> Result<(), SelectorError> {
        use BuilderState as S;

        match (self.state, token) {
            // Data: simple selectors, combinators and list separators.
            (S::Data, CSSToken::Whitespace) => {
                if !self.compound.is_empty() && self.pending_combinator.is_none() {
                    self.pending_combinator = Some(Combinator::Descendant);
                }
            }
            (S::Data, CSSToken::Ident(name)) => self.insert(Selector::Type(name.to_ascii_lowercase())),
            (S::Data, CSSToken::Delim('*')) => self.insert(Selector::Universal),
            (S::Data, CSSToken::Hash { value, .. }) => self.insert(Selector::Id(value)),
            (S::Data, CSSToken::Delim('.')) => self.state = S::Class,
            (S::Data, CSSToken::LeftBracket) => {
                self.attribute_name.clear();
                self.attribute_prefix = None;
                self.attribute_operator = AttributeOperator::Available;
                self.attribute_value.clear();
                self.state = S::Attribute;
            }
            (S::Data, CSSToken::Colon) => self.state = S::PseudoClass,
            (S::Data, CSSToken::Delim(c @ ('>' | '+' | '~'))) => {
                if self.compound.is_empty()
                    || matches!(self.pending_combinator, Some(explicit) if explicit != Combinator::Descendant)
                {
                    return Err(SelectorError::DanglingCombinator);
                }
                self.pending_combinator = Some(match c {
                    '>' => Combinator::Child,
                    '+' => Combinator::NextSibling,
                    _ => Combinator::SubsequentSibling,
                });
            }
            (S::Data, CSSToken::Comma) => {
                let member = self.take_complex()?.ok_or(SelectorError::EmptyListMember)?;
                self.list.push(member);
                self.after_comma = true;
            }

            // Class: one identifier.
            (S::Class, CSSToken::Ident(name)) => {
                self.insert(Selector::Class(name));
                self.state = S::Data;
            }

            // Attribute name, operator, value, close.
            (S::Attribute | S::AttributeValue | S::AttributeEnd, CSSToken::Whitespace) => {}
            (S::AttributeOperator, CSSToken::Whitespace) if self.attribute_prefix.is_none() => {}
            (S::Attribute, CSSToken::Ident(name)) => {
                self.attribute_name = name.to_ascii_lowercase();
                self.state = S::AttributeOperator;
            }
            (S::AttributeOperator, CSSToken::RightBracket) if self.attribute_prefix.is_none() => {
                self.insert_attribute();
            }
            (S::AttributeOperator, CSSToken::Delim(c @ ('~' | '|' | '^' | '$' | '*' | '!')))
                if self.attribute_prefix.is_none() =>
            {
                self.attribute_prefix = Some(c);
            }
            (S::AttributeOperator, CSSToken::Delim('=')) => {
                self.attribute_operator = AttributeOperator::from_prefix(self.attribute_prefix)
                    .ok_or_else(|| self.unexpected(&CSSToken::Delim('=')))?;
                self.state = S::AttributeValue;
            }
            (S::AttributeValue, CSSToken::Ident(value) | CSSToken::String(value)) => {
                self.attribute_value = value;
                self.state = S::AttributeEnd;
            }
            (
                S::AttributeValue,
                CSSToken::Number {
                    value, int_value, ..
                },
            ) => {
                self.attribute_value = format_number(value, int_value);
                self.state = S::AttributeEnd;
            }
            (S::AttributeEnd, CSSToken::RightBracket) => self.insert_attribute(),

            // Pseudo-classes, including legacy single-colon pseudo-elements.
            (S::PseudoClass, CSSToken::Colon) => self.state = S::PseudoElement,
            (S::PseudoClass, CSSToken::Ident(name)) => {
                let selector = if let Some(pseudo) = PseudoElement::from_legacy_pseudo_class(&name) {
                    Selector::PseudoElement(pseudo)
                } else {
                    let pseudo = name
                        .parse::<PseudoClass>()
                        .map_err(|_| SelectorError::UnknownPseudoClass(name.to_ascii_lowercase()))?;
                    Selector::PseudoClass(pseudo)
                };
                self.insert(selector);
                self.state = S::Data;
            }
            (S::PseudoClass, CSSToken::Function(name)) => {
                let name = name.to_ascii_lowercase();
                self.function = Some(match name.as_str() {
                    "not" => PendingFunction::Not(Box::default()),
                    "dir" | "lang" | "contains" => PendingFunction::Argument { name, value: None },
                    _ => {
                        let kind = name
                            .parse::<NthKind>()
                            .map_err(|_| SelectorError::UnknownFunction(name.clone()))?;
                        PendingFunction::Nth {
                            kind,
                            text: String::new(),
                        }
                    }
                });
                self.state = S::PseudoClassFunction;
            }
            (S::PseudoElement, CSSToken::Ident(name)) => {
                let pseudo = name
                    .parse::<PseudoElement>()
                    .map_err(|_| SelectorError::UnknownPseudoElement(name.to_ascii_lowercase()))?;
                self.insert(Selector::PseudoElement(pseudo));
                self.state = S::Data;
            }

            // Function arguments.
            (S::PseudoClassFunction, token) => self.on_function_token(token)?,
            (S::PseudoClassFunctionEnd, CSSToken::Whitespace) => {}
            (S::PseudoClassFunctionEnd, CSSToken::RightParen) => self.close_function()?,

            (_, token) => return Err(self.unexpected(&token)),
        }
        Ok(())
    }

    /// Tokens inside `(...)` of a functional pseudo-class.
    fn on_function_token(&mut self, token: CSSToken) -> Result<(), SelectorError> {
        let is_close = matches!(token, CSSToken::RightParen);
        let closes = match &self.function {
            Some(PendingFunction::Not(nested)) => is_close && nested.state() == BuilderState::Data,
            Some(PendingFunction::Nth { .. }) => is_close,
            Some(PendingFunction::Argument { name, .. }) if is_close => {
                return Err(SelectorError::EmptyArgument(name.clone()));
            }
            _ => false,
        };
        if closes {
            return self.close_function();
        }

        let unexpected = self.unexpected(&token);
        match (self.function.as_mut(), token) {
            (Some(PendingFunction::Not(nested)), token) => nested.apply(token),
            (Some(PendingFunction::Nth { .. } | PendingFunction::Argument { .. }), CSSToken::Whitespace) => Ok(()),
            (Some(PendingFunction::Nth { text, .. }), token) => {
                if nth::push_argument_token(text, &token) {
                    Ok(())
                } else {
                    Err(unexpected)
                }
            }
            (
                Some(PendingFunction::Argument { value, .. }),
                CSSToken::Ident(argument) | CSSToken::String(argument),
            ) => {
                *value = Some(argument);
                self.state = BuilderState::PseudoClassFunctionEnd;
                Ok(())
            }
            _ => Err(unexpected),
        }
    }

    /// `)` closed the pending function: insert the selector it describes.
    fn close_function(&mut self) -> Result<(), SelectorError> {
        let selector = match self.function.take() {
            Some(PendingFunction::Not(nested)) => {
                if nested.is_empty() {
                    return Err(SelectorError::EmptyArgument("not".to_string()));
                }
                Selector::Not(Box::new(nested.finish()?))
            }
            Some(PendingFunction::Nth { kind, text }) => {
                let nth = Nth::parse(&text).ok_or(SelectorError::InvalidNth(text))?;
                Selector::Nth(kind, nth)
            }
            Some(PendingFunction::Argument { name, value }) => {
                // `:contains("")` is the only argument that may be empty.
                let value = value
                    .filter(|value| !value.is_empty() || name == "contains")
                    .ok_or_else(|| SelectorError::EmptyArgument(name.clone()))?;
                match name.as_str() {
                    "dir" => Selector::PseudoFunction(PseudoFunction::Dir(value)),
                    "lang" => Selector::PseudoFunction(PseudoFunction::Lang(value)),
                    _ => Selector::PseudoFunction(PseudoFunction::Contains(value)),
                }
            }
            None => return Err(SelectorError::UnexpectedEnd(self.state)),
        };
        self.insert(selector);
        self.state = BuilderState::Data;
        Ok(())
    }

    fn insert_attribute(&mut self) {
        let attribute = AttributeSelector {
            name: core::mem::take(&mut self.attribute_name),
            operator: self.attribute_operator,
            value: core::mem::take(&mut self.attribute_value),
        };
        self.insert(Selector::Attribute(attribute));
        self.state = BuilderState::Data;
    }

    /// Add a simple selector, first committing any pending combinator.
    fn insert(&mut self, selector: Selector) {
        if let Some(combinator) = self.pending_combinator.take() {
            let compound = take_compound(&mut self.compound);
            self.compounds.extend(compound);
            self.combinators.push(combinator);
        }
        self.after_comma = false;
        self.compound.push(selector);
    }

    /// Close the complex selector under construction, or `None` when there
    /// is nothing to close.
    fn take_complex(&mut self) -> Result<Option<Selector>, SelectorError> {
        match self.pending_combinator.take() {
            Some(Combinator::Descendant) | None => {}
            Some(_) => return Err(SelectorError::DanglingCombinator),
        }
        let Some(last) = take_compound(&mut self.compound) else {
            return Ok(None);
        };
        if self.compounds.is_empty() {
            return Ok(Some(last));
        }
        let mut compounds = core::mem::take(&mut self.compounds);
        compounds.push(last);
        Ok(Some(Selector::Complex(ComplexSelector {
            compounds,
            combinators: core::mem::take(&mut self.combinators),
        })))
    }

    /// Conclude construction.
    ///
    /// The pending complex chain joins the list, a one-member list collapses
    /// to its member, and an empty builder yields [`Selector::Universal`].
    ///
    /// # Errors
    ///
    /// Returns the recorded error, or a new one when input stopped inside a
    /// construct or after a combinator or comma.
    pub fn finish(mut self) -> Result<Selector, SelectorError> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }
        if self.state != BuilderState::Data {
            return Err(SelectorError::UnexpectedEnd(self.state));
        }
        let last = self.take_complex()?;
        if self.after_comma {
            return Err(SelectorError::EmptyListMember);
        }
        let mut list = self.list;
        list.extend(last);
        Ok(match list.len() {
            0 => Selector::Universal,
            1 => list.swap_remove(0),
            _ => Selector::List(list),
        })
    }

    /// Read the selector built so far without consuming the builder.
    ///
    /// # Errors
    ///
    /// Same as [`SelectorBuilder::finish`].
    pub fn result(&self) -> Result<Selector, SelectorError> {
        self.clone().finish()
    }

    fn unexpected(&self, token: &CSSToken) -> SelectorError {
        SelectorError::UnexpectedToken {
            token: describe(token),
            state: self.state,
        }
    }
}

/// Fold the simple selectors of a compound into one selector.
fn take_compound(compound: &mut Vec<Selector>) -> Option<Selector> {
    match compound.len() {
        0 => None,
        1 => compound.pop(),
        _ => Some(Selector::Compound(core::mem::take(compound))),
    }
}

fn describe(token: &CSSToken) -> String {
    match token {
        CSSToken::Whitespace => "whitespace".to_string(),
        CSSToken::EOF => "end of input".to_string(),
        token => format!("'{}'", token.to_css()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::CSSTokenizer;

    fn build(source: &str) -> SelectorBuilder {
        let mut tokenizer = CSSTokenizer::new(source);
        let mut builder = SelectorBuilder::new();
        loop {
            let token = tokenizer.next_token();
            if token.is_eof() {
                return builder;
            }
            let _ = builder.apply(token);
        }
    }

    #[test]
    fn test_result_is_idempotent() {
        let builder = build("a b");
        let first = builder.result();
        let second = builder.result();
        assert_eq!(first, second);
        assert_eq!(builder.finish(), first);
    }

    #[test]
    fn test_empty_builder_yields_universal() {
        assert_eq!(build("").finish(), Ok(Selector::Universal));
        assert_eq!(build("  ").finish(), Ok(Selector::Universal));
    }

    #[test]
    fn test_error_is_sticky() {
        let mut builder = build("a >");
        assert!(builder.apply(CSSToken::Comma).is_err());
        assert!(builder.apply(CSSToken::ident("b")).is_err());
        assert!(builder.finish().is_err());
    }

    #[test]
    fn test_nested_not_returns_to_data() {
        let builder = build(":not(:nth-child(2)");
        assert_eq!(builder.state(), BuilderState::PseudoClassFunction);
        let builder = build(":not(:nth-child(2))");
        assert_eq!(builder.state(), BuilderState::Data);
    }
}
