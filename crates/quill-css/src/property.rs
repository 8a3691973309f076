//! Property registry.
//!
//! A property is a validated name/value pair with a reset / set / serialize
//! contract. A handful of keyword properties are validated against their
//! grammar; every other name is accepted and its value kept as opaque text.

use core::fmt;
use core::str::FromStr;

use quill_common::warning::warn_once;
use serde::Serialize;

/// Properties whose value is a single keyword from a fixed set.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum KeywordProperty {
    /// [CSS 2.1 § 9.5.2](https://www.w3.org/TR/CSS21/visuren.html#propdef-clear)
    Clear,
    /// [CSS Positioned Layout § 2](https://www.w3.org/TR/css-position-3/#position-property)
    Position,
    /// [CSS 2.1 § 17.4.1](https://www.w3.org/TR/CSS21/tables.html#propdef-caption-side)
    CaptionSide,
    /// [CSS Writing Modes § 2.2](https://www.w3.org/TR/css-writing-modes-3/#unicode-bidi)
    UnicodeBidi,
    /// [CSS 2.1 § 12.5.1](https://www.w3.org/TR/CSS21/generate.html#propdef-list-style-type)
    ListStyleType,
    /// [CSS 2.1 § 13.3.1](https://www.w3.org/TR/CSS21/page.html#propdef-page-break-before)
    PageBreakBefore,
    /// [CSS 2.1 § 11.2](https://www.w3.org/TR/CSS21/visufx.html#propdef-visibility)
    Visibility,
    /// [CSS Display § 2](https://www.w3.org/TR/css-display-3/#the-display-properties)
    Display,
    /// [CSS Multi-column § 4.2](https://www.w3.org/TR/css-multicol-1/#crs)
    ColumnRuleStyle,
    /// [CSS Animations § 3.5](https://www.w3.org/TR/css-animations-1/#animation-direction)
    AnimationDirection,
}

impl KeywordProperty {
    /// Every keyword the property accepts, initial value first.
    #[must_use]
    pub const fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Clear => &["none", "left", "right", "both"],
            Self::Position => &["static", "relative", "absolute", "sticky", "fixed"],
            Self::CaptionSide => &["top", "bottom"],
            Self::UnicodeBidi => &[
                "normal",
                "embed",
                "isolate",
                "bidi-override",
                "isolate-override",
                "plaintext",
            ],
            Self::ListStyleType => &[
                "disc",
                "circle",
                "square",
                "decimal",
                "decimal-leading-zero",
                "lower-roman",
                "upper-roman",
                "lower-greek",
                "lower-latin",
                "upper-latin",
                "lower-alpha",
                "upper-alpha",
                "armenian",
                "georgian",
                "none",
            ],
            Self::PageBreakBefore => &["auto", "always", "avoid", "left", "right"],
            Self::Visibility => &["visible", "hidden", "collapse"],
            Self::Display => &[
                "inline",
                "block",
                "list-item",
                "inline-block",
                "table",
                "inline-table",
                "table-row-group",
                "table-header-group",
                "table-footer-group",
                "table-row",
                "table-column-group",
                "table-column",
                "table-cell",
                "table-caption",
                "flex",
                "inline-flex",
                "grid",
                "inline-grid",
                "flow-root",
                "contents",
                "none",
            ],
            Self::ColumnRuleStyle => &[
                "none", "hidden", "dotted", "dashed", "solid", "double", "groove", "ridge",
                "inset", "outset",
            ],
            Self::AnimationDirection => &["normal", "reverse", "alternate", "alternate-reverse"],
        }
    }

    /// The initial value.
    #[must_use]
    pub const fn initial(self) -> &'static str {
        self.keywords()[0]
    }

    /// Whether the property inherits by default.
    #[must_use]
    pub const fn inherited(self) -> bool {
        matches!(self, Self::CaptionSide | Self::ListStyleType | Self::Visibility)
    }

    /// Canonical keyword for `text`, if the property accepts it.
    #[must_use]
    pub fn keyword(self, text: &str) -> Option<&'static str> {
        self.keywords()
            .iter()
            .copied()
            .find(|keyword| keyword.eq_ignore_ascii_case(text))
    }
}

/// A specified value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum PropertyValue {
    /// A validated keyword, lower-cased.
    Keyword(String),
    /// `inherit`: take the parent's value.
    Inherit,
    /// `initial`: the property's initial value.
    Initial,
    /// Text of a property this engine does not validate.
    Opaque(String),
}

impl PropertyValue {
    /// Parse `text` as a value of the property `name`.
    ///
    /// CSS-wide keywords are accepted everywhere. Keyword properties reject
    /// anything outside their keyword set; other properties keep the text
    /// verbatim.
    #[must_use]
    pub fn parse(name: &str, text: &str) -> Option<Self> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("inherit") {
            return Some(Self::Inherit);
        }
        if text.eq_ignore_ascii_case("initial") {
            return Some(Self::Initial);
        }
        match KeywordProperty::from_str(name) {
            Ok(property) => property
                .keyword(text)
                .map(|keyword| Self::Keyword(keyword.to_string())),
            Err(_) if text.is_empty() => None,
            Err(_) => Some(Self::Opaque(text.to_string())),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyword(text) | Self::Opaque(text) => f.write_str(text),
            Self::Inherit => f.write_str("inherit"),
            Self::Initial => f.write_str("initial"),
        }
    }
}

/// A property slot holding its current value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    name: String,
    kind: Option<KeywordProperty>,
    value: Option<PropertyValue>,
}

impl Property {
    /// Create a property at its reset state. Unknown names are reported once
    /// and stored as opaque properties.
    #[must_use]
    pub fn new(name: &str) -> Self {
        let name = name.to_ascii_lowercase();
        let kind = KeywordProperty::from_str(&name).ok();
        if kind.is_none() {
            warn_once("CSS", &format!("unknown property '{name}' kept as opaque text"));
        }
        let mut property = Self {
            name,
            kind,
            value: None,
        };
        property.reset();
        property
    }

    /// Property name, lower-cased.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The registered keyword property, if this is one.
    #[must_use]
    pub const fn kind(&self) -> Option<KeywordProperty> {
        self.kind
    }

    /// Current value; `None` for an opaque property that was never set.
    #[must_use]
    pub const fn value(&self) -> Option<&PropertyValue> {
        self.value.as_ref()
    }

    /// Return to the initial value.
    pub fn reset(&mut self) {
        self.value = self
            .kind
            .map(|kind| PropertyValue::Keyword(kind.initial().to_string()));
    }

    /// Validate and store `text`. An invalid value leaves the property
    /// unchanged and returns `false`.
    pub fn set(&mut self, text: &str) -> bool {
        match PropertyValue::parse(&self.name, text) {
            Some(value) => {
                self.value = Some(value);
                true
            }
            None => false,
        }
    }

    /// Serialized value, resolving `initial` for keyword properties.
    #[must_use]
    pub fn serialize(&self) -> String {
        match (&self.value, self.kind) {
            (Some(PropertyValue::Initial), Some(kind)) => kind.initial().to_string(),
            (Some(value), _) => value.to_string(),
            (None, _) => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_every_keyword_property_round_trips_its_name() {
        for property in KeywordProperty::iter() {
            let name = property.to_string();
            assert_eq!(KeywordProperty::from_str(&name), Ok(property));
            assert_eq!(property.keyword(property.initial()), Some(property.initial()));
        }
    }

    #[test]
    fn test_initial_values() {
        assert_eq!(KeywordProperty::Display.initial(), "inline");
        assert_eq!(KeywordProperty::Position.initial(), "static");
        assert_eq!(KeywordProperty::ListStyleType.initial(), "disc");
        assert_eq!(KeywordProperty::PageBreakBefore.initial(), "auto");
    }

    #[test]
    fn test_keyword_property_set_reset_serialize() {
        let mut clear = Property::new("CLEAR");
        assert_eq!(clear.name(), "clear");
        assert_eq!(clear.kind(), Some(KeywordProperty::Clear));
        assert_eq!(clear.serialize(), "none");

        assert!(clear.set("Both"));
        assert_eq!(clear.value(), Some(&PropertyValue::Keyword("both".into())));
        assert!(!clear.set("sideways"));
        assert_eq!(clear.serialize(), "both");

        assert!(clear.set("initial"));
        assert_eq!(clear.serialize(), "none");
        clear.reset();
        assert_eq!(clear.value(), Some(&PropertyValue::Keyword("none".into())));
    }

    #[test]
    fn test_unknown_property_is_opaque() {
        quill_common::warning::set_quiet(true);
        let mut color = Property::new("color");
        assert_eq!(color.kind(), None);
        assert_eq!(color.value(), None);
        assert_eq!(color.serialize(), "");

        assert!(color.set("  rgb(0, 0, 0) "));
        assert_eq!(color.serialize(), "rgb(0, 0, 0)");
        assert!(!color.set(""));
        color.reset();
        assert_eq!(color.value(), None);
    }
}
