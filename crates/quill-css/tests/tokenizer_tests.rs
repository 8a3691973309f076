//! Integration tests for the CSS tokenizer.

use quill_css::tokenizer::{CSSToken, CSSTokenizer, HashType, NumericType};

/// Helper to tokenize a whole string, dropping the trailing EOF
fn tokenize(css: &str) -> Vec<CSSToken> {
    let mut tokenizer = CSSTokenizer::new(css);
    tokenizer.run();
    let mut tokens = tokenizer.into_tokens();
    assert_eq!(tokens.pop(), Some(CSSToken::EOF));
    tokens
}

/// Helper to tokenize and drop whitespace tokens
fn significant(css: &str) -> Vec<CSSToken> {
    tokenize(css)
        .into_iter()
        .filter(|token| !token.is_whitespace())
        .collect()
}

#[test]
fn test_simple_rule() {
    assert_eq!(
        significant("body { color: red; }"),
        vec![
            CSSToken::ident("body"),
            CSSToken::LeftBrace,
            CSSToken::ident("color"),
            CSSToken::Colon,
            CSSToken::ident("red"),
            CSSToken::Semicolon,
            CSSToken::RightBrace,
        ]
    );
}

#[test]
fn test_comments_are_skipped() {
    assert_eq!(
        tokenize("a/* one */b/* unterminated"),
        vec![CSSToken::ident("a"), CSSToken::ident("b")]
    );
}

#[test]
fn test_hash_types() {
    assert_eq!(
        tokenize("#main"),
        vec![CSSToken::Hash {
            value: "main".to_string(),
            hash_type: HashType::Id,
        }]
    );
    assert_eq!(
        tokenize("#1a2b"),
        vec![CSSToken::Hash {
            value: "1a2b".to_string(),
            hash_type: HashType::Unrestricted,
        }]
    );
}

#[test]
fn test_numeric_tokens() {
    assert_eq!(tokenize("42"), vec![CSSToken::integer(42)]);
    assert_eq!(
        tokenize("50%"),
        vec![CSSToken::Percentage {
            value: 50.0,
            int_value: Some(50),
            numeric_type: NumericType::Integer,
        }]
    );
    assert_eq!(
        tokenize("1.5em"),
        vec![CSSToken::Dimension {
            value: 1.5,
            int_value: None,
            numeric_type: NumericType::Number,
            unit: "em".to_string(),
        }]
    );
}

#[test]
fn test_signed_numbers_and_delims() {
    // "+1" is a number; "+ 1" is a delimiter then a number.
    assert_eq!(
        tokenize("+1"),
        vec![CSSToken::Number {
            value: 1.0,
            int_value: Some(1),
            numeric_type: NumericType::Integer,
        }]
    );
    assert_eq!(
        tokenize("+ 1"),
        vec![
            CSSToken::Delim('+'),
            CSSToken::Whitespace,
            CSSToken::integer(1)
        ]
    );
}

#[test]
fn test_nth_argument_splits() {
    let tokens = tokenize("2n+1");
    assert_eq!(tokens.len(), 2);
    assert!(matches!(&tokens[0], CSSToken::Dimension { unit, .. } if unit == "n"));
    assert!(matches!(tokens[1], CSSToken::Number { int_value: Some(1), .. }));

    // The minus is an identifier code point, so it stays in the unit.
    let tokens = tokenize("2n-1");
    assert!(matches!(&tokens[..], [CSSToken::Dimension { unit, .. }] if unit == "n-1"));
}

#[test]
fn test_strings_and_escapes() {
    assert_eq!(tokenize(r#""a\"b""#), vec![CSSToken::string("a\"b")]);
    assert_eq!(tokenize("'x'"), vec![CSSToken::string("x")]);
    assert_eq!(tokenize(r"\41 bc"), vec![CSSToken::ident("Abc")]);
    assert_eq!(
        tokenize("\"broken\nx"),
        vec![CSSToken::BadString, CSSToken::Whitespace, CSSToken::ident("x")]
    );
}

#[test]
fn test_functions_and_urls() {
    assert_eq!(
        tokenize("url(a.png)"),
        vec![CSSToken::Url("a.png".to_string())]
    );
    assert_eq!(
        tokenize("url(\"a.png\")"),
        vec![
            CSSToken::Function("url".to_string()),
            CSSToken::string("a.png"),
            CSSToken::RightParen,
        ]
    );
    assert_eq!(tokenize("url(a b)"), vec![CSSToken::BadUrl]);
}

#[test]
fn test_at_keyword_and_cdo_cdc() {
    assert_eq!(
        significant("<!-- @media -->"),
        vec![
            CSSToken::CDO,
            CSSToken::AtKeyword("media".to_string()),
            CSSToken::CDC,
        ]
    );
}

#[test]
fn test_attribute_selector_tokens() {
    assert_eq!(
        tokenize("[class!=\"a\"]"),
        vec![
            CSSToken::LeftBracket,
            CSSToken::ident("class"),
            CSSToken::Delim('!'),
            CSSToken::Delim('='),
            CSSToken::string("a"),
            CSSToken::RightBracket,
        ]
    );
}

#[test]
fn test_eof_repeats() {
    let mut tokenizer = CSSTokenizer::new("a");
    assert_eq!(tokenizer.next_token(), CSSToken::ident("a"));
    assert_eq!(tokenizer.next_token(), CSSToken::EOF);
    assert_eq!(tokenizer.next_token(), CSSToken::EOF);
}

#[test]
fn test_to_css_reproduces_source() {
    let source = "a > .b:nth-child(2n-1)[x=\"y\"]";
    let text: String = tokenize(source).iter().map(CSSToken::to_css).collect();
    assert_eq!(text, source);
}
