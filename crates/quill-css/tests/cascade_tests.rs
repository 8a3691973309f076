//! Integration tests for stylesheet parsing and the cascade.

use quill_css::parser::{Rule, parse_stylesheet};
use quill_css::{
    PropertyBag, PropertyValue, Specificity, compute_styles, parse_declarations,
    stylesheet_from_document,
};
use quill_dom::{DomTree, NodeId};
use quill_html::parse_document;

/// Helper to find an element by its id attribute
fn by_id(tree: &DomTree, id: &str) -> NodeId {
    tree.descendants(tree.root())
        .find(|&node| {
            tree.as_element(node)
                .and_then(|element| element.id())
                .is_some_and(|value| value == id)
        })
        .unwrap_or_else(|| panic!("no element with id {id}"))
}

/// Helper to cascade `css` over `html` and return the bag of element `id`
fn bag_for(html: &str, css: &str, id: &str) -> PropertyBag {
    let tree = parse_document(html).tree;
    let sheet = parse_stylesheet(css);
    let mut styles = compute_styles(&tree, &sheet);
    styles
        .remove(&by_id(&tree, id))
        .unwrap_or_else(|| panic!("no style for {id}"))
}

fn opaque(text: &str) -> PropertyValue {
    PropertyValue::Opaque(text.to_string())
}

fn keyword(text: &str) -> PropertyValue {
    PropertyValue::Keyword(text.to_string())
}

#[test]
fn test_id_beats_class_regardless_of_order() {
    let html = "<p id=x class=a>text</p>";
    for css in [
        "#x { color: red } .a { color: blue }",
        ".a { color: blue } #x { color: red }",
    ] {
        let bag = bag_for(html, css, "x");
        assert_eq!(bag.value("color"), Some(&opaque("red")), "{css}");
        let cascaded = bag.get("color").expect("color cascaded");
        assert_eq!(cascaded.specificity, Specificity::new(1, 0, 0));
    }
}

#[test]
fn test_equal_specificity_later_wins() {
    let html = "<p id=x class=\"a b\">text</p>";
    let bag = bag_for(html, ".a { color: red } .b { color: blue }", "x");
    assert_eq!(bag.value("color"), Some(&opaque("blue")));
    let bag = bag_for(html, ".b { color: blue } .a { color: red }", "x");
    assert_eq!(bag.value("color"), Some(&opaque("red")));
}

#[test]
fn test_later_declaration_in_same_rule_wins() {
    let bag = bag_for("<p id=x></p>", "p { margin: 0; margin: 4px }", "x");
    assert_eq!(bag.value("margin"), Some(&opaque("4px")));
}

#[test]
fn test_important_beats_specificity() {
    let html = "<p id=x>text</p>";
    let bag = bag_for(html, "p { color: green !important } #x { color: red }", "x");
    let cascaded = bag.get("color").expect("color cascaded");
    assert_eq!(cascaded.value, opaque("green"));
    assert!(cascaded.important);
    assert_eq!(bag.len(), 1);
}

#[test]
fn test_list_applies_with_matching_member_specificity() {
    let html = "<p id=x class=a>text</p><p id=y>text</p>";
    let bag = bag_for(html, "#y, .a { color: red } p.a { color: blue }", "x");
    assert_eq!(bag.value("color"), Some(&opaque("blue")));
    let bag = bag_for(html, "#y, .a { color: red } p.a { color: blue }", "y");
    assert_eq!(bag.value("color"), Some(&opaque("red")));
}

#[test]
fn test_keyword_properties_are_validated() {
    let bag = bag_for(
        "<p id=x>text</p>",
        "p { display: bogus; position: ABSOLUTE } p { display: block; clear: sideways }",
        "x",
    );
    assert_eq!(bag.value("display"), Some(&keyword("block")));
    assert_eq!(bag.value("position"), Some(&keyword("absolute")));
    assert_eq!(bag.value("clear"), None);
}

#[test]
fn test_inherited_keyword_properties_flow_down() {
    let html = "<div id=d><p id=x>text</p><span id=s>t</span></div>";
    let css = "div { visibility: hidden; display: block } span { visibility: visible }";
    let bag = bag_for(html, css, "x");
    assert_eq!(bag.value("visibility"), Some(&keyword("hidden")));
    assert_eq!(bag.get("visibility").map(|c| c.specificity), Some(Specificity::default()));
    assert_eq!(bag.value("display"), None);

    let bag = bag_for(html, css, "s");
    assert_eq!(bag.value("visibility"), Some(&keyword("visible")));
}

#[test]
fn test_explicit_inherit_takes_parent_value() {
    let html = "<div id=d><p id=x>text</p></div>";
    let bag = bag_for(html, "div { color: red } p { color: inherit }", "x");
    assert_eq!(bag.value("color"), Some(&opaque("red")));

    let bag = bag_for(html, "p { color: inherit }", "x");
    assert_eq!(bag.value("color"), Some(&PropertyValue::Initial));
}

#[test]
fn test_styles_from_style_elements() {
    let document = parse_document(concat!(
        "<!DOCTYPE html><html><head><style>p { color: red }</style></head>",
        "<body><style>.b { margin: 0 }</style><p id=x class=b>text</p></body></html>"
    ));
    let sheet = stylesheet_from_document(&document.tree);
    assert_eq!(sheet.style_rules().count(), 2);

    let styles = compute_styles(&document.tree, &sheet);
    let bag = &styles[&by_id(&document.tree, "x")];
    assert_eq!(bag.value("color"), Some(&opaque("red")));
    assert_eq!(bag.value("margin"), Some(&opaque("0")));
}

#[test]
fn test_invalid_selector_drops_only_that_rule() {
    let sheet = parse_stylesheet("p:bogus { color: red } a > { color: red } p { margin: 0 }");
    assert_eq!(sheet.rules.len(), 1);
    let rule = sheet.style_rules().next().expect("one style rule");
    assert_eq!(rule.selector_text(), "p");
}

#[test]
fn test_selector_text_get_and_set() {
    let mut sheet = parse_stylesheet("div>p , .a { color: red; margin: 0 !important }");
    let Some(Rule::Style(rule)) = sheet.rules.first_mut() else {
        panic!("expected a style rule");
    };
    assert_eq!(rule.selector_text(), "div > p, .a");
    assert_eq!(rule.to_css(), "div > p, .a { color: red; margin: 0 !important; }");

    assert!(!rule.set_selector_text("a >"));
    assert_eq!(rule.selector_text(), "div > p, .a");

    assert!(rule.set_selector_text("UL  LI"));
    assert_eq!(rule.selector_text(), "ul li");
    assert_eq!(rule.to_css(), "ul li { color: red; margin: 0 !important; }");
}

#[test]
fn test_empty_rule_serialization() {
    let sheet = parse_stylesheet("p {}");
    let rule = sheet.style_rules().next().expect("one style rule");
    assert!(rule.declarations.is_empty());
    assert_eq!(rule.to_css(), "p { }");
}

#[test]
fn test_keyframes_rule() {
    let sheet = parse_stylesheet(concat!(
        "@keyframes spin { from { opacity: 0 } 50%, 75% { opacity: 1 } ",
        "150% { opacity: 2 } to { opacity: 1 } } p { color: red }"
    ));
    assert_eq!(sheet.rules.len(), 2);
    let Rule::Keyframes(keyframes) = &sheet.rules[0] else {
        panic!("expected @keyframes");
    };
    assert_eq!(keyframes.name, "spin");
    let selectors: Vec<String> = keyframes
        .keyframes
        .iter()
        .map(|keyframe| keyframe.selector.to_css())
        .collect();
    assert_eq!(selectors, ["0%", "50%, 75%", "100%"]);
    assert_eq!(keyframes.keyframes[0].to_css(), "0% { opacity: 0; }");
    assert!(matches!(sheet.rules[1], Rule::Style(_)));
}

#[test]
fn test_other_at_rules_are_kept_opaque() {
    let sheet = parse_stylesheet("@import \"a.css\"; @media screen { p { color: red } } p { }");
    assert_eq!(sheet.rules.len(), 3);
    let Rule::At(import) = &sheet.rules[0] else {
        panic!("expected @import");
    };
    assert_eq!(import.name, "import");
    assert!(import.block.is_none());
    let Rule::At(media) = &sheet.rules[1] else {
        panic!("expected @media");
    };
    assert_eq!(media.name, "media");
    assert!(media.block.is_some());
}

#[test]
fn test_declaration_list() {
    let declarations = parse_declarations("color: red; ; bad; width: calc(1px + 2px) !IMPORTANT");
    let names: Vec<&str> = declarations.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, ["color", "width"]);
    assert_eq!(declarations[1].value_text(), "calc(1px + 2px)");
    assert!(declarations[1].important);
}

#[test]
fn test_declaration_stream_triples() {
    let bag = bag_for(
        "<p id=x class=a>text</p>",
        ".a { margin: 0 } #x { color: red }",
        "x",
    );
    assert_eq!(
        bag.declarations(),
        vec![
            ("color".to_string(), opaque("red"), Specificity::new(1, 0, 0)),
            ("margin".to_string(), opaque("0"), Specificity::new(0, 1, 0)),
        ]
    );
}

#[test]
fn test_bag_serializes_to_json() {
    let bag = bag_for("<p id=x>text</p>", "p { display: block }", "x");
    let json = serde_json::to_value(&bag).expect("bag serializes");
    assert_eq!(
        json,
        serde_json::json!({
            "display": {
                "value": { "kind": "keyword", "value": "block" },
                "specificity": [0, 0, 1],
                "important": false
            }
        })
    );
}
