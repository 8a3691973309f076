//! Property tests: selector serialization is stable and the tokenizer and
//! parsers accept any input.

use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use quill_common::warning::set_quiet;
use quill_css::{CSSToken, CSSTokenizer, parse_selector, parse_stylesheet};

/// Selector fragments, valid and invalid, glued together at random.
const PIECES: &[&str] = &[
    "a", "DIV", "*", "#x", ".c", "[href]", "[lang|=en]", "[x='1 2']", "[class~=b]",
    ":first-child", ":hover", ":empty", "::before", ":after", ":nth-child(2n+1)",
    ":nth-last-of-type(-n+3)", ":nth-of-type(odd)", ":not(.a)", ":not(p, #q)", ":lang(fr)",
    ":contains(\"x y\")", ":dir(rtl)", " ", " > ", "+", " ~ ", ", ",
];

/// A random selector source built from [`PIECES`].
#[derive(Debug, Clone)]
struct SelectorSource(String);

impl Arbitrary for SelectorSource {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % 12;
        let source = (0..len)
            .filter_map(|_| g.choose(PIECES).copied())
            .collect::<String>();
        Self(source)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new(self.0.shrink().map(Self))
    }
}

#[quickcheck]
fn prop_serialization_is_idempotent(source: SelectorSource) -> bool {
    let Ok(selector) = parse_selector(&source.0) else {
        return true;
    };
    let once = selector.to_css();
    parse_selector(&once).map(|again| again.to_css()) == Ok(once)
}

#[quickcheck]
fn prop_reparsed_selector_keeps_specificity(source: SelectorSource) -> bool {
    let Ok(selector) = parse_selector(&source.0) else {
        return true;
    };
    parse_selector(&selector.to_css()).map(|again| again.specificity()) == Ok(selector.specificity())
}

#[quickcheck]
fn prop_more_ids_win(ids: u8, classes: u8, types: u8) -> bool {
    let ids = usize::from(ids % 4);
    let weaker = format!(
        "{}{}{}",
        "#a".repeat(ids),
        ".b".repeat(usize::from(classes % 30)),
        " p".repeat(usize::from(types % 30))
    );
    let weaker = weaker.trim();
    if weaker.is_empty() {
        return true;
    }
    let stronger = "#a".repeat(ids + 1);
    match (parse_selector(&stronger), parse_selector(weaker)) {
        (Ok(stronger), Ok(weaker)) => stronger.specificity() > weaker.specificity(),
        _ => false,
    }
}

#[quickcheck]
fn prop_tokenizer_ends_with_single_eof(input: String) -> bool {
    let mut tokenizer = CSSTokenizer::new(&input);
    tokenizer.run();
    let tokens = tokenizer.into_tokens();
    tokens.last().is_some_and(CSSToken::is_eof)
        && tokens.iter().filter(|token| token.is_eof()).count() == 1
}

#[quickcheck]
fn prop_arbitrary_text_never_panics(input: String) -> bool {
    set_quiet(true);
    let _ = parse_selector(&input);
    let sheet = parse_stylesheet(&input);
    sheet.style_rules().all(|rule| parse_selector(&rule.selector_text()).is_ok())
}
