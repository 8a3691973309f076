//! [CSS Animations § 3](https://www.w3.org/TR/css-animations-1/#keyframes)
//!
//! Keyframe selectors: the `from, 50%, to` prelude of a rule inside
//! `@keyframes`.

use crate::tokenizer::CSSToken;

/// One or more keyframe offsets, kept in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeSelector {
    /// Offsets as percentages (`from` is 0, `to` is 100).
    pub stops: Vec<f64>,
}

impl KeyframeSelector {
    /// Parse a keyframe prelude. Returns `None` for anything other than a
    /// comma-separated list of `from`, `to` and percentages in `0..=100`.
    #[must_use]
    pub fn from_tokens(tokens: &[CSSToken]) -> Option<Self> {
        let mut stops = Vec::new();
        let mut expect_stop = true;
        for token in tokens {
            match token {
                CSSToken::Whitespace | CSSToken::EOF => {}
                CSSToken::Comma if !expect_stop => expect_stop = true,
                token if expect_stop => {
                    stops.push(stop_value(token)?);
                    expect_stop = false;
                }
                _ => return None,
            }
        }
        (!stops.is_empty() && !expect_stop).then_some(Self { stops })
    }

    /// Serialize as `0%, 50%, 100%`.
    #[must_use]
    pub fn to_css(&self) -> String {
        self.stops
            .iter()
            .map(|stop| format!("{stop}%"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn stop_value(token: &CSSToken) -> Option<f64> {
    match token {
        CSSToken::Ident(name) if name.eq_ignore_ascii_case("from") => Some(0.0),
        CSSToken::Ident(name) if name.eq_ignore_ascii_case("to") => Some(100.0),
        CSSToken::Percentage { value, .. } if (0.0..=100.0).contains(value) => Some(*value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::CSSTokenizer;

    fn keyframe(source: &str) -> Option<KeyframeSelector> {
        let mut tokenizer = CSSTokenizer::new(source);
        tokenizer.run();
        KeyframeSelector::from_tokens(&tokenizer.into_tokens())
    }

    #[test]
    fn test_from_and_to_keywords() {
        assert_eq!(keyframe("from").map(|k| k.to_css()).as_deref(), Some("0%"));
        assert_eq!(keyframe(" TO ").map(|k| k.to_css()).as_deref(), Some("100%"));
    }

    #[test]
    fn test_stop_list_keeps_source_order() {
        let selector = keyframe("from,to, 25%, 50%,75%").expect("valid keyframe list");
        assert_eq!(selector.to_css(), "0%, 100%, 25%, 50%, 75%");
        assert_eq!(selector.stops.len(), 5);
    }

    #[test]
    fn test_rejects_malformed_lists() {
        assert!(keyframe("").is_none());
        assert!(keyframe("50").is_none());
        assert!(keyframe("120%").is_none());
        assert!(keyframe("from,").is_none());
        assert!(keyframe("from to").is_none());
    }
}
