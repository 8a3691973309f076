//! [§ 14 Child-indexed pseudo-classes](https://www.w3.org/TR/selectors-4/#child-index)
//!
//! The `An+B` microsyntax shared by `:nth-child()` and friends.

use core::fmt;

use crate::tokenizer::CSSToken;

/// Which sibling set an `An+B` index is counted over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display, strum_macros::EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum NthKind {
    /// `:nth-child()`: element siblings, counted from the start.
    NthChild,
    /// `:nth-last-child()`: element siblings, counted from the end.
    NthLastChild,
    /// `:nth-of-type()`: same-tag siblings, counted from the start.
    NthOfType,
    /// `:nth-last-of-type()`: same-tag siblings, counted from the end.
    NthLastOfType,
}

impl NthKind {
    /// Whether only siblings with the same tag name are counted.
    #[must_use]
    pub const fn of_type(self) -> bool {
        matches!(self, Self::NthOfType | Self::NthLastOfType)
    }

    /// Whether positions are counted from the last sibling.
    #[must_use]
    pub const fn from_end(self) -> bool {
        matches!(self, Self::NthLastChild | Self::NthLastOfType)
    }
}

/// An `An+B` pattern: `step` is A, `offset` is B.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nth {
    /// Coefficient of `n`.
    pub step: i32,
    /// Constant term.
    pub offset: i32,
}

impl Nth {
    /// Create a pattern from its coefficients.
    #[must_use]
    pub const fn new(step: i32, offset: i32) -> Self {
        Self { step, offset }
    }

    /// Does the 1-based `position` satisfy `position = step * n + offset`
    /// for some `n >= 0`?
    #[must_use]
    pub fn matches(self, position: i32) -> bool {
        let diff = i64::from(position) - i64::from(self.offset);
        let step = i64::from(self.step);
        if step == 0 {
            return diff == 0;
        }
        diff % step == 0 && diff / step >= 0
    }

    /// Parse the argument text of an nth pseudo-class: `odd`, `even`, an
    /// integer, or `An+B` with optional A and B.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim().to_ascii_lowercase();
        match text.as_str() {
            "odd" => return Some(Self::new(2, 1)),
            "even" => return Some(Self::new(2, 0)),
            _ => {}
        }

        let Some((a, b)) = text.split_once('n') else {
            return parse_integer(&text).map(|offset| Self::new(0, offset));
        };

        let step = match a {
            "" | "+" => 1,
            "-" => -1,
            a => parse_integer(a)?,
        };
        let offset = if b.is_empty() {
            0
        } else if b.starts_with(['+', '-']) {
            parse_integer(b)?
        } else {
            return None;
        };
        Some(Self::new(step, offset))
    }
}

/// A signed decimal integer with no stray characters.
fn parse_integer(text: &str) -> Option<i32> {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Append the text of one argument token to `text`.
///
/// The tokenizer splits `2n+1` into a dimension `2n` and a signed number
/// `+1`, and `2n + 1` into `2n`, `+`, `1`. Numbers after the first piece
/// keep an explicit sign unless a `+` or `-` delimiter already supplied one.
/// Returns `false` for tokens that cannot appear in an `An+B` argument.
pub(crate) fn push_argument_token(text: &mut String, token: &CSSToken) -> bool {
    match token {
        CSSToken::Ident(ident) => text.push_str(ident),
        CSSToken::Delim(c @ ('+' | '-')) => text.push(*c),
        CSSToken::Number {
            int_value: Some(value),
            ..
        } => {
            if text.is_empty() || text.ends_with(['+', '-']) {
                text.push_str(&value.to_string());
            } else {
                text.push_str(&format!("{value:+}"));
            }
        }
        CSSToken::Dimension {
            int_value: Some(value),
            unit,
            ..
        } => {
            text.push_str(&value.to_string());
            text.push_str(unit);
        }
        _ => return false,
    }
    true
}

impl fmt::Display for Nth {
    /// Canonical `An+B` text: `2n+1`, `-n+3`, `n`, `5`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.step == 0 {
            return write!(f, "{}", self.offset);
        }
        match self.step {
            1 => write!(f, "n")?,
            -1 => write!(f, "-n")?,
            step => write!(f, "{step}n")?,
        }
        if self.offset != 0 {
            write!(f, "{:+}", self.offset)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keywords_and_integers() {
        assert_eq!(Nth::parse("odd"), Some(Nth::new(2, 1)));
        assert_eq!(Nth::parse("EVEN"), Some(Nth::new(2, 0)));
        assert_eq!(Nth::parse("3"), Some(Nth::new(0, 3)));
        assert_eq!(Nth::parse("-2"), Some(Nth::new(0, -2)));
    }

    #[test]
    fn test_parse_an_plus_b() {
        assert_eq!(Nth::parse("2n+1"), Some(Nth::new(2, 1)));
        assert_eq!(Nth::parse("n"), Some(Nth::new(1, 0)));
        assert_eq!(Nth::parse("+n-2"), Some(Nth::new(1, -2)));
        assert_eq!(Nth::parse("-n+3"), Some(Nth::new(-1, 3)));
        assert_eq!(Nth::parse("-3n"), Some(Nth::new(-3, 0)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(Nth::parse(""), None);
        assert_eq!(Nth::parse("2n1"), None);
        assert_eq!(Nth::parse("xn+1"), None);
        assert_eq!(Nth::parse("2n+"), None);
        assert_eq!(Nth::parse("2n+-1"), None);
        assert_eq!(Nth::parse("one"), None);
    }

    #[test]
    fn test_matches_requires_non_negative_quotient() {
        let odd = Nth::new(2, 1);
        assert!(odd.matches(1) && odd.matches(3) && odd.matches(5));
        assert!(!odd.matches(2) && !odd.matches(4));

        let first_three = Nth::new(-1, 3);
        assert!(first_three.matches(1) && first_three.matches(3));
        assert!(!first_three.matches(4));

        assert!(Nth::new(0, 2).matches(2));
        assert!(!Nth::new(0, 2).matches(4));
        assert!(!Nth::new(3, 4).matches(1));
    }

    #[test]
    fn test_display_is_canonical() {
        assert_eq!(Nth::new(2, 1).to_string(), "2n+1");
        assert_eq!(Nth::new(-1, 3).to_string(), "-n+3");
        assert_eq!(Nth::new(1, 0).to_string(), "n");
        assert_eq!(Nth::new(2, -1).to_string(), "2n-1");
        assert_eq!(Nth::new(0, 5).to_string(), "5");
    }
}
