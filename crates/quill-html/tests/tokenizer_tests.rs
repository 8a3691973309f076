//! Integration tests for the HTML tokenizer.

use quill_html::tokenizer::named_character_references::{any_entity_has_prefix, lookup_entity};
use quill_html::{HTMLTokenizer, Token, TokenizerState};

/// Helper to tokenize a string and return the tokens
fn tokenize(input: &str) -> Vec<Token> {
    let mut tokenizer = HTMLTokenizer::new(input);
    tokenizer.run();
    tokenizer.into_tokens()
}

/// Helper to concatenate the character tokens in a slice
fn text_of(tokens: &[Token]) -> String {
    tokens
        .iter()
        .filter_map(|t| {
            if let Token::Character { data } = t {
                Some(*data)
            } else {
                None
            }
        })
        .collect()
}

/// Helper to return the attributes of the first start tag
fn first_start_tag_attrs(tokens: &[Token]) -> Vec<(String, String)> {
    tokens
        .iter()
        .find(|t| matches!(t, Token::StartTag { .. }))
        .map(|t| {
            t.attributes()
                .iter()
                .map(|a| (a.name.clone(), a.value.clone()))
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn test_plain_text() {
    let tokens = tokenize("Hello");
    assert_eq!(tokens.len(), 6); // 5 chars + EOF
    assert!(matches!(tokens[0], Token::Character { data: 'H' }));
    assert!(matches!(tokens[4], Token::Character { data: 'o' }));
    assert!(matches!(tokens[5], Token::EndOfFile));
}

#[test]
fn test_empty_input() {
    let tokens = tokenize("");
    assert_eq!(tokens, vec![Token::EndOfFile]);
}

#[test]
fn test_doctype() {
    let tokens = tokenize("<!DOCTYPE html>");
    assert_eq!(tokens.len(), 2);
    match &tokens[0] {
        Token::Doctype {
            name,
            public_identifier,
            system_identifier,
            force_quirks,
        } => {
            assert_eq!(name.as_deref(), Some("html"));
            assert!(public_identifier.is_none());
            assert!(system_identifier.is_none());
            assert!(!force_quirks);
        }
        _ => panic!("Expected DOCTYPE token"),
    }
}

#[test]
fn test_doctype_with_identifiers() {
    let tokens = tokenize(
        r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd">"#,
    );
    match &tokens[0] {
        Token::Doctype {
            name,
            public_identifier,
            system_identifier,
            force_quirks,
        } => {
            assert_eq!(name.as_deref(), Some("html"));
            assert_eq!(
                public_identifier.as_deref(),
                Some("-//W3C//DTD HTML 4.01//EN")
            );
            assert_eq!(
                system_identifier.as_deref(),
                Some("http://www.w3.org/TR/html4/strict.dtd")
            );
            assert!(!force_quirks);
        }
        _ => panic!("Expected DOCTYPE token"),
    }
}

#[test]
fn test_doctype_without_name_forces_quirks() {
    let tokens = tokenize("<!DOCTYPE>");
    match &tokens[0] {
        Token::Doctype {
            name, force_quirks, ..
        } => {
            assert!(name.is_none());
            assert!(force_quirks);
        }
        _ => panic!("Expected DOCTYPE token"),
    }
}

#[test]
fn test_start_tag() {
    let tokens = tokenize("<DIV>");
    assert_eq!(tokens.len(), 2);
    match &tokens[0] {
        Token::StartTag {
            name,
            self_closing,
            attributes,
        } => {
            assert_eq!(name, "div");
            assert!(!self_closing);
            assert!(attributes.is_empty());
        }
        _ => panic!("Expected StartTag token"),
    }
}

#[test]
fn test_end_tag() {
    let tokens = tokenize("</div>");
    assert_eq!(tokens.len(), 2);
    assert!(matches!(&tokens[0], Token::EndTag { name, .. } if name == "div"));
}

#[test]
fn test_self_closing_tag() {
    let tokens = tokenize("<br/>");
    assert_eq!(tokens.len(), 2);
    assert!(matches!(
        &tokens[0],
        Token::StartTag { name, self_closing: true, .. } if name == "br"
    ));
}

#[test]
fn test_comment() {
    let tokens = tokenize("<!-- hello -->");
    assert_eq!(tokens.len(), 2);
    assert!(matches!(&tokens[0], Token::Comment { data } if data == " hello "));
}

#[test]
fn test_bogus_comment_from_processing_instruction() {
    let tokens = tokenize("<?xml version?>");
    assert!(matches!(&tokens[0], Token::Comment { data } if data == "?xml version?"));
}

#[test]
fn test_end_tag_with_no_name_is_dropped() {
    let tokens = tokenize("a</>b");
    assert_eq!(text_of(&tokens), "ab");
    assert_eq!(tokens.len(), 3);
}

#[test]
fn test_lone_less_than_is_text() {
    let tokens = tokenize("1 < 2");
    assert_eq!(text_of(&tokens), "1 < 2");
}

#[test]
fn test_attribute_quoting_styles() {
    let tokens = tokenize(r#"<div a="1" b='2' c=3 d>"#);
    assert_eq!(
        first_start_tag_attrs(&tokens),
        vec![
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string()),
            ("c".to_string(), "3".to_string()),
            ("d".to_string(), String::new()),
        ]
    );
}

#[test]
fn test_duplicate_attribute_first_wins() {
    let tokens = tokenize(r#"<div id="one" ID="two">"#);
    assert_eq!(
        first_start_tag_attrs(&tokens),
        vec![("id".to_string(), "one".to_string())]
    );
}

#[test]
fn test_tag_with_text_content() {
    let tokens = tokenize("<p>Hi</p>");
    assert_eq!(tokens.len(), 5);
    assert!(matches!(&tokens[0], Token::StartTag { name, .. } if name == "p"));
    assert!(matches!(tokens[1], Token::Character { data: 'H' }));
    assert!(matches!(tokens[2], Token::Character { data: 'i' }));
    assert!(matches!(&tokens[3], Token::EndTag { name, .. } if name == "p"));
    assert!(matches!(tokens[4], Token::EndOfFile));
}

#[test]
fn test_carriage_returns_normalized() {
    let tokens = tokenize("a\r\nb\rc");
    assert_eq!(text_of(&tokens), "a\nb\nc");
}

// ========== Raw text content models ==========

#[test]
fn test_style_with_fake_tags() {
    let tokens = tokenize("<style><div>not a tag</div></style>");
    assert!(matches!(&tokens[0], Token::StartTag { name, .. } if name == "style"));
    assert_eq!(text_of(&tokens), "<div>not a tag</div>");
    assert!(matches!(&tokens[tokens.len() - 2], Token::EndTag { name, .. } if name == "style"));
}

#[test]
fn test_style_with_wrong_end_tag() {
    let tokens = tokenize("<style>a</notastyle>b</style>");
    assert_eq!(text_of(&tokens), "a</notastyle>b");
}

#[test]
fn test_title_rcdata_decodes_references() {
    let tokens = tokenize("<title>a &lt; b <i></title>");
    assert_eq!(text_of(&tokens), "a < b <i>");
    assert!(matches!(&tokens[tokens.len() - 2], Token::EndTag { name, .. } if name == "title"));
}

#[test]
fn test_rawtext_does_not_decode_references() {
    let tokens = tokenize("<xmp>&amp;</xmp>");
    assert_eq!(text_of(&tokens), "&amp;");
}

#[test]
fn test_script_escaped_end_tag_text() {
    let tokens = tokenize("<script><!-- </b> --></script>");
    assert_eq!(text_of(&tokens), "<!-- </b> -->");
    assert!(matches!(&tokens[tokens.len() - 2], Token::EndTag { name, .. } if name == "script"));
}

#[test]
fn test_script_double_escaped_keeps_inner_end_tag() {
    let tokens = tokenize("<script><!--<script></script>--></script>");
    assert_eq!(text_of(&tokens), "<!--<script></script>-->");
}

#[test]
fn test_plaintext_consumes_everything() {
    let tokens = tokenize("<plaintext></plaintext><b>");
    assert_eq!(text_of(&tokens), "</plaintext><b>");
}

#[test]
fn test_pull_mode_state_switch() {
    let mut tokenizer = HTMLTokenizer::new("<textarea><b></textarea>");
    assert!(matches!(tokenizer.next_token(), Token::StartTag { name, .. } if name == "textarea"));
    tokenizer.switch_to(TokenizerState::RCDATA);
    let mut text = String::new();
    loop {
        match tokenizer.next_token() {
            Token::Character { data } => text.push(data),
            Token::EndTag { name, .. } => {
                assert_eq!(name, "textarea");
                break;
            }
            other => panic!("unexpected token {other:?}"),
        }
    }
    assert_eq!(text, "<b>");
    assert!(tokenizer.next_token().is_eof());
    assert!(tokenizer.next_token().is_eof());
}

#[test]
fn test_last_start_tag_for_fragment_context() {
    let mut tokenizer = HTMLTokenizer::new("x</title>");
    tokenizer.switch_to(TokenizerState::RCDATA);
    tokenizer.set_last_start_tag("title");
    assert!(matches!(tokenizer.next_token(), Token::Character { data: 'x' }));
    assert!(matches!(tokenizer.next_token(), Token::EndTag { name, .. } if name == "title"));
}

#[test]
fn test_raw_text_element_states() {
    assert_eq!(
        TokenizerState::for_raw_text_element("title", false),
        Some(TokenizerState::RCDATA)
    );
    assert_eq!(
        TokenizerState::for_raw_text_element("script", false),
        Some(TokenizerState::ScriptData)
    );
    assert_eq!(TokenizerState::for_raw_text_element("noscript", false), None);
    assert_eq!(
        TokenizerState::for_raw_text_element("noscript", true),
        Some(TokenizerState::RAWTEXT)
    );
    assert_eq!(TokenizerState::for_raw_text_element("div", true), None);
}

// ========== Character references ==========

#[test]
fn test_character_reference_bare_ampersand() {
    let tokens = tokenize("a & b");
    assert_eq!(tokens.len(), 6);
    assert_eq!(text_of(&tokens), "a & b");
}

#[test]
fn test_named_reference_longest_match() {
    assert_eq!(text_of(&tokenize("&notit;")), "\u{00AC}it;");
    assert_eq!(text_of(&tokenize("&notin;")), "\u{2209}");
}

#[test]
fn test_unknown_named_reference_is_literal() {
    assert_eq!(text_of(&tokenize("&bogus;")), "&bogus;");
}

#[test]
fn test_numeric_references() {
    assert_eq!(text_of(&tokenize("&#65;&#x42;&#X43;")), "ABC");
    assert_eq!(text_of(&tokenize("&#0;")), "\u{FFFD}");
    assert_eq!(text_of(&tokenize("&#x110000;")), "\u{FFFD}");
    assert_eq!(text_of(&tokenize("&#128;")), "\u{20AC}");
}

#[test]
fn test_attribute_reference_historical_rule() {
    let tokens = tokenize(r#"<a href="?x=1&amp=2&lt;">"#);
    assert_eq!(
        first_start_tag_attrs(&tokens),
        vec![("href".to_string(), "?x=1&amp=2<".to_string())]
    );
}

#[test]
fn test_lookup_entities() {
    assert_eq!(lookup_entity("amp;"), Some("&"));
    assert_eq!(lookup_entity("amp"), Some("&"));
    assert_eq!(lookup_entity("nbsp;"), Some("\u{00A0}"));
    assert_eq!(lookup_entity("notarealentity;"), None);
    assert_eq!(lookup_entity(""), None);
}

#[test]
fn test_entity_prefix_matching() {
    assert!(any_entity_has_prefix("am"));
    assert!(any_entity_has_prefix("amp;"));
    assert!(!any_entity_has_prefix("ampx"));
    assert!(!any_entity_has_prefix("xyz"));
}
