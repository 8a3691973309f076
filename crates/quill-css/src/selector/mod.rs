//! CSS selectors: the selector tree, matching against a [`DomTree`], and
//! specificity, per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
//!
//! Selectors are assembled from CSS tokens by [`SelectorBuilder`]; every
//! variant of [`Selector`] can match an element, report its specificity and
//! serialize itself back to canonical text.

/// Token-driven selector construction.
pub mod builder;
/// Keyframe selectors (`from`, `to`, percentages).
pub mod keyframe;
/// The `An+B` microsyntax.
pub mod nth;

use core::fmt;

use quill_dom::{DomTree, ElementData, NodeId, NodeType};
use serde::Serialize;

use crate::tokenizer::{CSSToken, CSSTokenizer};
use crate::tokenizer::token::quote_string;

pub use builder::{BuilderState, SelectorBuilder, SelectorError};
pub use keyframe::KeyframeSelector;
pub use nth::{Nth, NthKind};

/// A selector, from a single simple selector up to a comma-separated list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector) `*`
    Universal,
    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors), lower-cased.
    Type(String),
    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    Id(String),
    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    Class(String),
    /// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    Attribute(AttributeSelector),
    /// A keyword pseudo-class such as `:first-child` or `:checked`.
    PseudoClass(PseudoClass),
    /// `:dir()`, `:lang()` or `:contains()`.
    PseudoFunction(PseudoFunction),
    /// A pseudo-element such as `::before`.
    PseudoElement(PseudoElement),
    /// `:nth-child()` and its siblings.
    Nth(NthKind, Nth),
    /// [§ 4.3 Negation](https://www.w3.org/TR/selectors-4/#negation) `:not()`
    Not(Box<Selector>),
    /// Simple selectors that must all match the same element.
    Compound(Vec<Selector>),
    /// Compound selectors joined by combinators.
    Complex(ComplexSelector),
    /// [§ 4.1 Selector lists](https://www.w3.org/TR/selectors-4/#grouping): any member matches.
    List(Vec<Selector>),
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Whitespace: an ancestor matches the left side.
    Descendant,
    /// `>`: the parent matches the left side.
    Child,
    /// `+`: the previous element sibling matches the left side.
    NextSibling,
    /// `~`: some earlier element sibling matches the left side.
    SubsequentSibling,
}

impl Combinator {
    /// Canonical text including the surrounding spaces.
    #[must_use]
    pub const fn to_css(self) -> &'static str {
        match self {
            Self::Descendant => " ",
            Self::Child => " > ",
            Self::NextSibling => " + ",
            Self::SubsequentSibling => " ~ ",
        }
    }
}

/// A chain of compound selectors read left to right.
///
/// `combinators[i]` sits between `compounds[i]` and `compounds[i + 1]`; the
/// last compound is the subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    /// Compound selectors, leftmost first.
    pub compounds: Vec<Selector>,
    /// One fewer combinator than compounds.
    pub combinators: Vec<Combinator>,
}

/// How an attribute selector compares the attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeOperator {
    /// `[attr]`
    Available,
    /// `[attr=value]`
    Match,
    /// `[attr~=value]`: whitespace-separated list contains value.
    List,
    /// `[attr|=value]`: equals value or starts with `value-`.
    Hyphen,
    /// `[attr^=value]`
    Begins,
    /// `[attr$=value]`
    Ends,
    /// `[attr*=value]`
    Contains,
    /// `[attr!=value]`: absent or different.
    NotMatch,
}

impl AttributeOperator {
    /// Operator for the delimiter written before `=`, if any.
    #[must_use]
    pub const fn from_prefix(prefix: Option<char>) -> Option<Self> {
        match prefix {
            None => Some(Self::Match),
            Some('~') => Some(Self::List),
            Some('|') => Some(Self::Hyphen),
            Some('^') => Some(Self::Begins),
            Some('$') => Some(Self::Ends),
            Some('*') => Some(Self::Contains),
            Some('!') => Some(Self::NotMatch),
            Some(_) => None,
        }
    }

    /// Operator text as written between name and value.
    #[must_use]
    pub const fn to_css(self) -> &'static str {
        match self {
            Self::Available => "",
            Self::Match => "=",
            Self::List => "~=",
            Self::Hyphen => "|=",
            Self::Begins => "^=",
            Self::Ends => "$=",
            Self::Contains => "*=",
            Self::NotMatch => "!=",
        }
    }
}

/// `[name op "value"]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSelector {
    /// Attribute name, lower-cased.
    pub name: String,
    /// Comparison.
    pub operator: AttributeOperator,
    /// Value to compare against; empty for [`AttributeOperator::Available`].
    pub value: String,
}

impl AttributeSelector {
    fn matches(&self, element: &ElementData) -> bool {
        let actual = element.attr(&self.name);
        let expected = self.value.as_str();
        match self.operator {
            AttributeOperator::Available => actual.is_some(),
            AttributeOperator::NotMatch => actual != Some(expected),
            op => actual.is_some_and(|actual| match op {
                AttributeOperator::Match => actual == expected,
                AttributeOperator::List => actual.split_ascii_whitespace().any(|t| t == expected),
                AttributeOperator::Hyphen => {
                    actual == expected
                        || actual
                            .strip_prefix(expected)
                            .is_some_and(|rest| rest.starts_with('-'))
                }
                AttributeOperator::Begins => !expected.is_empty() && actual.starts_with(expected),
                AttributeOperator::Ends => !expected.is_empty() && actual.ends_with(expected),
                AttributeOperator::Contains => !expected.is_empty() && actual.contains(expected),
                AttributeOperator::Available | AttributeOperator::NotMatch => false,
            }),
        }
    }

    fn to_css(&self) -> String {
        match self.operator {
            AttributeOperator::Available => format!("[{}]", serialize_identifier(&self.name)),
            op => format!(
                "[{}{}{}]",
                serialize_identifier(&self.name),
                op.to_css(),
                quote_string(&self.value)
            ),
        }
    }
}

/// Keyword pseudo-classes.
///
/// Structural ones look at siblings and children, state ones at attributes.
/// The dynamic group (`hover`, `visited`, ...) never matches a static tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display, strum_macros::EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum PseudoClass {
    /// `:root`
    Root,
    /// `:first-child`
    FirstChild,
    /// `:last-child`
    LastChild,
    /// `:only-child`
    OnlyChild,
    /// `:first-of-type`
    FirstOfType,
    /// `:last-of-type`
    LastOfType,
    /// `:only-of-type`
    OnlyOfType,
    /// `:empty`
    Empty,
    /// `:link`
    Link,
    /// `:visited`
    Visited,
    /// `:hover`
    Hover,
    /// `:active`
    Active,
    /// `:focus`
    Focus,
    /// `:target`
    Target,
    /// `:enabled`
    Enabled,
    /// `:disabled`
    Disabled,
    /// `:checked`
    Checked,
    /// `:unchecked`
    Unchecked,
    /// `:indeterminate`
    Indeterminate,
    /// `:default`
    Default,
    /// `:valid`
    Valid,
    /// `:invalid`
    Invalid,
    /// `:required`
    Required,
    /// `:optional`
    Optional,
    /// `:read-only`
    ReadOnly,
    /// `:read-write`
    ReadWrite,
    /// `:in-range`
    InRange,
    /// `:out-of-range`
    OutOfRange,
}

/// Functional pseudo-classes taking a single identifier or string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoFunction {
    /// `:dir(ltr)`: the inherited `dir` attribute.
    Dir(String),
    /// `:lang(en)`: the inherited `lang` attribute, with subtag prefixes.
    Lang(String),
    /// `:contains("text")`: the element's text content.
    Contains(String),
}

/// Pseudo-elements. None of them is an element, so matching only checks
/// whether the element could host the pseudo-element's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display, strum_macros::EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum PseudoElement {
    /// `::before`
    Before,
    /// `::after`
    After,
    /// `::first-line`
    FirstLine,
    /// `::first-letter`
    FirstLetter,
    /// `::selection`
    Selection,
}

impl PseudoElement {
    /// Pseudo-elements that may also be written with a single colon.
    #[must_use]
    pub fn from_legacy_pseudo_class(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "before" => Some(Self::Before),
            "after" => Some(Self::After),
            "first-line" => Some(Self::FirstLine),
            "first-letter" => Some(Self::FirstLetter),
            _ => None,
        }
    }
}

/// [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
///
/// (ids, classes/attributes/pseudo-classes, types/pseudo-elements), compared
/// lexicographically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Specificity(pub u32, pub u32, pub u32);

impl Specificity {
    /// Create a new specificity value.
    #[must_use]
    pub const fn new(a: u32, b: u32, c: u32) -> Self {
        Self(a, b, c)
    }

    /// Component-wise sum.
    #[must_use]
    pub const fn add(self, other: Self) -> Self {
        Self(self.0 + other.0, self.1 + other.1, self.2 + other.2)
    }
}

impl fmt::Display for Specificity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.0, self.1, self.2)
    }
}

impl Selector {
    /// Does this selector match `node` in `tree`? Non-elements never match.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        let Some(element) = tree.as_element(node) else {
            return false;
        };
        match self {
            Self::Universal => true,
            Self::Type(name) => element.tag_name.eq_ignore_ascii_case(name),
            Self::Id(id) => element.id().is_some_and(|value| value == id),
            Self::Class(class) => element.classes().contains(class.as_str()),
            Self::Attribute(attribute) => attribute.matches(element),
            Self::PseudoClass(pseudo) => pseudo_class_matches(*pseudo, tree, node, element),
            Self::PseudoFunction(function) => pseudo_function_matches(function, tree, node),
            Self::PseudoElement(pseudo) => pseudo_element_matches(*pseudo, tree, node),
            Self::Nth(kind, nth) => nth.matches(sibling_position(tree, node, element, *kind)),
            Self::Not(inner) => !inner.matches(tree, node),
            Self::Compound(parts) => parts.iter().all(|part| part.matches(tree, node)),
            Self::Complex(complex) => complex.matches(tree, node),
            Self::List(members) => members.iter().any(|member| member.matches(tree, node)),
        }
    }

    /// Specificity of this selector. A list reports its most specific member.
    #[must_use]
    pub fn specificity(&self) -> Specificity {
        match self {
            Self::Universal => Specificity::default(),
            Self::Id(_) => Specificity(1, 0, 0),
            Self::Class(_)
            | Self::Attribute(_)
            | Self::PseudoClass(_)
            | Self::PseudoFunction(_)
            | Self::Nth(..) => Specificity(0, 1, 0),
            Self::Type(_) | Self::PseudoElement(_) => Specificity(0, 0, 1),
            Self::Not(inner) => inner.specificity(),
            Self::Compound(parts) => parts
                .iter()
                .fold(Specificity::default(), |acc, part| acc.add(part.specificity())),
            Self::Complex(complex) => complex
                .compounds
                .iter()
                .fold(Specificity::default(), |acc, part| acc.add(part.specificity())),
            Self::List(members) => members
                .iter()
                .map(Self::specificity)
                .max()
                .unwrap_or_default(),
        }
    }

    /// Canonical serialization: lower-cased keywords, single spaces around
    /// combinators, `", "` between list members, quoted attribute values.
    #[must_use]
    pub fn to_css(&self) -> String {
        match self {
            Self::Universal => "*".to_string(),
            Self::Type(name) => serialize_identifier(name),
            Self::Id(id) => format!("#{}", serialize_identifier(id)),
            Self::Class(class) => format!(".{}", serialize_identifier(class)),
            Self::Attribute(attribute) => attribute.to_css(),
            Self::PseudoClass(pseudo) => format!(":{pseudo}"),
            Self::PseudoFunction(PseudoFunction::Dir(value)) => {
                format!(":dir({})", serialize_identifier(value))
            }
            Self::PseudoFunction(PseudoFunction::Lang(value)) => {
                format!(":lang({})", serialize_identifier(value))
            }
            Self::PseudoFunction(PseudoFunction::Contains(value)) => {
                format!(":contains({})", quote_string(value))
            }
            Self::PseudoElement(pseudo) => format!("::{pseudo}"),
            Self::Nth(kind, nth) => format!(":{kind}({nth})"),
            Self::Not(inner) => format!(":not({})", inner.to_css()),
            Self::Compound(parts) => parts.iter().map(Self::to_css).collect(),
            Self::Complex(complex) => {
                let mut out = String::new();
                for (i, compound) in complex.compounds.iter().enumerate() {
                    if i > 0
                        && let Some(combinator) = complex.combinators.get(i - 1)
                    {
                        out.push_str(combinator.to_css());
                    }
                    out.push_str(&compound.to_css());
                }
                out
            }
            Self::List(members) => members
                .iter()
                .map(Self::to_css)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

impl ComplexSelector {
    /// Match the chain with the subject at `node`, backtracking over every
    /// candidate for descendant and subsequent-sibling combinators.
    fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        self.compounds
            .len()
            .checked_sub(1)
            .is_some_and(|last| self.matches_from(tree, node, last))
    }

    fn matches_from(&self, tree: &DomTree, node: NodeId, index: usize) -> bool {
        if !self.compounds[index].matches(tree, node) {
            return false;
        }
        if index == 0 {
            return true;
        }
        let next = index - 1;
        let Some(&combinator) = self.combinators.get(next) else {
            return false;
        };
        match combinator {
            Combinator::Descendant => tree
                .ancestors(node)
                .any(|ancestor| self.matches_from(tree, ancestor, next)),
            Combinator::Child => tree
                .parent(node)
                .is_some_and(|parent| self.matches_from(tree, parent, next)),
            Combinator::NextSibling => previous_element_sibling(tree, node)
                .is_some_and(|sibling| self.matches_from(tree, sibling, next)),
            Combinator::SubsequentSibling => tree
                .preceding_siblings(node)
                .filter(|&sibling| tree.as_element(sibling).is_some())
                .any(|sibling| self.matches_from(tree, sibling, next)),
        }
    }
}

/// Parse selector text. Any malformed piece rejects the whole selector.
///
/// # Errors
///
/// Returns the first [`SelectorError`] raised while building.
pub fn parse_selector(source: &str) -> Result<Selector, SelectorError> {
    let mut tokenizer = CSSTokenizer::new(source);
    let mut builder = SelectorBuilder::new();
    loop {
        let token = tokenizer.next_token();
        if token.is_eof() {
            return builder.finish();
        }
        builder.apply(token)?;
    }
}

/// Build a selector from already tokenized text, such as a rule prelude.
///
/// # Errors
///
/// Returns the first [`SelectorError`] raised while building.
pub fn parse_selector_tokens(tokens: &[CSSToken]) -> Result<Selector, SelectorError> {
    let mut builder = SelectorBuilder::new();
    for token in tokens.iter().take_while(|token| !token.is_eof()) {
        builder.apply(token.clone())?;
    }
    builder.finish()
}

/// [CSSOM § 2.1 serialize an identifier](https://drafts.csswg.org/cssom/#serialize-an-identifier)
#[must_use]
pub fn serialize_identifier(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len());
    let first_is_dash = ident.starts_with('-');
    for (i, c) in ident.chars().enumerate() {
        let leading_digit = c.is_ascii_digit() && (i == 0 || (i == 1 && first_is_dash));
        match c {
            '\0' => out.push('\u{FFFD}'),
            '\u{1}'..='\u{1F}' | '\u{7F}' => out.push_str(&format!("\\{:x} ", u32::from(c))),
            c if leading_digit => out.push_str(&format!("\\{:x} ", u32::from(c))),
            '-' if i == 0 && ident.len() == 1 => out.push_str("\\-"),
            c if c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii() => out.push(c),
            c => {
                out.push('\\');
                out.push(c);
            }
        }
    }
    out
}

fn previous_element_sibling(tree: &DomTree, node: NodeId) -> Option<NodeId> {
    tree.preceding_siblings(node)
        .find(|&sibling| tree.as_element(sibling).is_some())
}

/// 1-based position of `node` among the siblings `kind` counts.
fn sibling_position(tree: &DomTree, node: NodeId, element: &ElementData, kind: NthKind) -> i32 {
    let counts = |sibling: &NodeId| {
        tree.as_element(*sibling).is_some_and(|other| {
            !kind.of_type() || other.tag_name.eq_ignore_ascii_case(&element.tag_name)
        })
    };
    let before = if kind.from_end() {
        tree.following_siblings(node).filter(counts).count()
    } else {
        tree.preceding_siblings(node).filter(counts).count()
    };
    i32::try_from(before).map_or(i32::MAX, |before| before.saturating_add(1))
}

/// Is `node` the only (or first / last) sibling of its kind?
fn is_edge_sibling(tree: &DomTree, node: NodeId, element: &ElementData, kind: NthKind) -> bool {
    sibling_position(tree, node, element, kind) == 1
}

fn is_form_control(element: &ElementData) -> bool {
    matches!(
        element.tag_name.as_str(),
        "button" | "input" | "select" | "textarea" | "optgroup" | "option" | "fieldset"
    )
}

fn is_checkable(element: &ElementData) -> bool {
    element.is("input")
        && element
            .attr("type")
            .is_some_and(|t| t.eq_ignore_ascii_case("checkbox") || t.eq_ignore_ascii_case("radio"))
}

fn is_text_field(element: &ElementData) -> bool {
    element.is("textarea")
        || (element.is("input")
            && element.attr("type").is_none_or(|t| {
                matches!(
                    t.to_ascii_lowercase().as_str(),
                    "text" | "search" | "url" | "tel" | "email" | "password" | "number" | "date"
                )
            }))
}

/// [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
fn pseudo_class_matches(
    pseudo: PseudoClass,
    tree: &DomTree,
    node: NodeId,
    element: &ElementData,
) -> bool {
    match pseudo {
        // The document element, or the root of a detached tree.
        PseudoClass::Root => tree
            .parent(node)
            .is_none_or(|parent| matches!(tree.node_type(parent), Some(NodeType::Document))),
        PseudoClass::FirstChild => is_edge_sibling(tree, node, element, NthKind::NthChild),
        PseudoClass::LastChild => is_edge_sibling(tree, node, element, NthKind::NthLastChild),
        PseudoClass::OnlyChild => {
            is_edge_sibling(tree, node, element, NthKind::NthChild)
                && is_edge_sibling(tree, node, element, NthKind::NthLastChild)
        }
        PseudoClass::FirstOfType => is_edge_sibling(tree, node, element, NthKind::NthOfType),
        PseudoClass::LastOfType => is_edge_sibling(tree, node, element, NthKind::NthLastOfType),
        PseudoClass::OnlyOfType => {
            is_edge_sibling(tree, node, element, NthKind::NthOfType)
                && is_edge_sibling(tree, node, element, NthKind::NthLastOfType)
        }
        // Comments do not count as content.
        PseudoClass::Empty => tree.children(node).iter().all(|&child| {
            match tree.node_type(child) {
                Some(NodeType::Comment(_)) => true,
                Some(NodeType::Text(text)) => text.is_empty(),
                _ => false,
            }
        }),
        PseudoClass::Link => {
            matches!(element.tag_name.as_str(), "a" | "area" | "link") && element.attr("href").is_some()
        }
        PseudoClass::Enabled => is_form_control(element) && element.attr("disabled").is_none(),
        PseudoClass::Disabled => is_form_control(element) && element.attr("disabled").is_some(),
        PseudoClass::Checked => {
            (is_checkable(element) && element.attr("checked").is_some())
                || (element.is("option") && element.attr("selected").is_some())
        }
        PseudoClass::Unchecked => is_checkable(element) && element.attr("checked").is_none(),
        PseudoClass::Indeterminate => {
            (element.is("progress") && element.attr("value").is_none())
                || (is_checkable(element) && element.attr("indeterminate").is_some())
        }
        PseudoClass::Default => {
            (is_checkable(element) && element.attr("checked").is_some())
                || (element.is("option") && element.attr("selected").is_some())
        }
        PseudoClass::Required => {
            matches!(element.tag_name.as_str(), "input" | "select" | "textarea")
                && element.attr("required").is_some()
        }
        PseudoClass::Optional => {
            matches!(element.tag_name.as_str(), "input" | "select" | "textarea")
                && element.attr("required").is_none()
        }
        PseudoClass::ReadWrite => is_read_write(element),
        PseudoClass::ReadOnly => !is_read_write(element),
        PseudoClass::Visited
        | PseudoClass::Hover
        | PseudoClass::Active
        | PseudoClass::Focus
        | PseudoClass::Target
        | PseudoClass::Valid
        | PseudoClass::Invalid
        | PseudoClass::InRange
        | PseudoClass::OutOfRange => false,
    }
}

fn is_read_write(element: &ElementData) -> bool {
    let editable_field = is_text_field(element)
        && element.attr("readonly").is_none()
        && element.attr("disabled").is_none();
    let content_editable = element
        .attr("contenteditable")
        .is_some_and(|v| v.is_empty() || v.eq_ignore_ascii_case("true"));
    editable_field || content_editable
}

/// Nearest value of `attribute` on `node` or its ancestors.
fn inherited_attribute<'t>(tree: &'t DomTree, node: NodeId, attribute: &str) -> Option<&'t str> {
    core::iter::once(node)
        .chain(tree.ancestors(node))
        .find_map(|id| tree.as_element(id).and_then(|element| element.attr(attribute)))
}

fn pseudo_function_matches(function: &PseudoFunction, tree: &DomTree, node: NodeId) -> bool {
    match function {
        PseudoFunction::Dir(direction) => inherited_attribute(tree, node, "dir")
            .unwrap_or("ltr")
            .eq_ignore_ascii_case(direction),
        PseudoFunction::Lang(range) => inherited_attribute(tree, node, "lang").is_some_and(|lang| {
            lang.eq_ignore_ascii_case(range)
                || (lang.len() > range.len()
                    && lang.is_char_boundary(range.len())
                    && lang[..range.len()].eq_ignore_ascii_case(range)
                    && lang[range.len()..].starts_with('-'))
        }),
        PseudoFunction::Contains(text) => tree.text_content(node).contains(text.as_str()),
    }
}

fn pseudo_element_matches(pseudo: PseudoElement, tree: &DomTree, node: NodeId) -> bool {
    let first_text = || tree.first_child(node).and_then(|child| tree.as_text(child));
    match pseudo {
        PseudoElement::FirstLine => first_text().is_some(),
        PseudoElement::FirstLetter => first_text().is_some_and(|text| !text.is_empty()),
        PseudoElement::Before | PseudoElement::After | PseudoElement::Selection => false,
    }
}
