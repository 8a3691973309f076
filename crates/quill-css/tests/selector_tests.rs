//! Integration tests for selector construction, matching and specificity.

use quill_css::selector::{BuilderState, Selector, SelectorError, Specificity, parse_selector};
use quill_dom::{DomTree, NodeId, NodeType};
use quill_html::parse_document;

const PAGE: &str = concat!(
    "<!DOCTYPE html><html><head></head><body>",
    "<div id=outer class=\"a b c\" lang=en-US dir=rtl>",
    "<p id=p1>One</p>",
    "<p id=p2 class=note>Two</p>",
    "<span id=s1></span>",
    "<p id=p3><!--x--></p>",
    "</div>",
    "<ul id=list><li>1</li><li>2</li><li>3</li><li>4</li><li>5</li><li>6</li></ul>",
    "<input id=c1 type=checkbox checked>",
    "<input id=t1 required>",
    "<a id=link href=\"/x\">x</a><a id=anchor>y</a>",
    "</body></html>"
);

/// Helper to parse the shared test page
fn page() -> DomTree {
    parse_document(PAGE).tree
}

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

/// Helper to parse a selector that must be valid
fn selector(source: &str) -> Selector {
    parse_selector(source).unwrap_or_else(|error| panic!("{source}: {error}"))
}

/// Helper to test a selector against the element with the given id
fn matches(tree: &DomTree, source: &str, id: &str) -> bool {
    selector(source).matches(tree, by_id(tree, id))
}

/// Helper for canonical serialization
fn css(source: &str) -> String {
    selector(source).to_css()
}

#[test]
fn test_nth_child_odd_positions() {
    let tree = page();
    let list = by_id(&tree, "list");
    let odd = selector("li:nth-child(2n+1)");
    let items: Vec<NodeId> = tree.children(list).to_vec();
    assert_eq!(items.len(), 6);
    for (index, &item) in items.iter().enumerate() {
        assert_eq!(odd.matches(&tree, item), index % 2 == 0, "position {}", index + 1);
    }
}

#[test]
fn test_nth_variants() {
    let tree = page();
    let items: Vec<NodeId> = tree.children(by_id(&tree, "list")).to_vec();
    let matching = |source: &str| -> Vec<usize> {
        let sel = selector(source);
        items
            .iter()
            .enumerate()
            .filter(|(_, item)| sel.matches(&tree, **item))
            .map(|(i, _)| i + 1)
            .collect()
    };
    assert_eq!(matching(":nth-child(even)"), [2, 4, 6]);
    assert_eq!(matching(":nth-child(-n+3)"), [1, 2, 3]);
    assert_eq!(matching(":nth-last-child(1)"), [6]);
    assert_eq!(matching(":nth-child( 3n + 1 )"), [1, 4]);
    assert_eq!(matching("li:nth-of-type(2n-1)"), [1, 3, 5]);
    assert_eq!(matching(":nth-last-of-type(odd)"), [2, 4, 6]);
}

#[test]
fn test_attribute_operators_on_class_list() {
    let tree = page();
    assert!(matches(&tree, "[class~=\"b\"]", "outer"));
    assert!(matches(&tree, "[class^=\"a\"]", "outer"));
    assert!(!matches(&tree, "[class$=\"d\"]", "outer"));
    assert!(!matches(&tree, "[class!=\"a b c\"]", "outer"));

    assert!(matches(&tree, "[class]", "outer"));
    assert!(matches(&tree, "[class=\"a b c\"]", "outer"));
    assert!(matches(&tree, "[class*=\" b \"]", "outer"));
    assert!(matches(&tree, "[class$=c]", "outer"));
    assert!(matches(&tree, "[lang|=en]", "outer"));
    assert!(!matches(&tree, "[lang|=e]", "outer"));
    // An absent attribute satisfies `!=` and nothing else.
    assert!(matches(&tree, "[class!=x]", "p1"));
    assert!(!matches(&tree, "[class^=x]", "p1"));
}

#[test]
fn test_empty_substring_operands_never_match() {
    let tree = page();
    assert!(!matches(&tree, "[class^=\"\"]", "outer"));
    assert!(!matches(&tree, "[class$=\"\"]", "outer"));
    assert!(!matches(&tree, "[class*=\"\"]", "outer"));
}

#[test]
fn test_simple_selectors() {
    let tree = page();
    assert!(matches(&tree, "p", "p1"));
    assert!(matches(&tree, "P", "p1"));
    assert!(matches(&tree, "*", "p1"));
    assert!(matches(&tree, "#p2", "p2"));
    assert!(matches(&tree, ".note", "p2"));
    assert!(matches(&tree, "p.note#p2", "p2"));
    assert!(!matches(&tree, "p.note", "p1"));
    assert!(!matches(&tree, "#P2", "p2"));
}

#[test]
fn test_combinators() {
    let tree = page();
    assert!(matches(&tree, "div p", "p1"));
    assert!(matches(&tree, "html p", "p1"));
    assert!(matches(&tree, "body > div > p", "p1"));
    assert!(!matches(&tree, "body > p", "p1"));
    assert!(!matches(&tree, "ul p", "p1"));
    assert!(matches(&tree, "p + p", "p2"));
    assert!(!matches(&tree, "p + p", "p1"));
    assert!(matches(&tree, "p ~ span", "s1"));
    assert!(matches(&tree, "#p1 ~ p", "p3"));
    assert!(!matches(&tree, "span + span", "s1"));
    assert!(matches(&tree, "span+p", "p3"));
}

#[test]
fn test_descendant_matching_backtracks() {
    // The nearest `.a` ancestor is not a child of `#outer`, a farther one is.
    let tree = parse_document(
        "<div id=outer><div class=a><section class=a><p id=target></p></section></div></div>",
    )
    .tree;
    assert!(matches(&tree, "#outer > .a p", "target"));
    assert!(matches(&tree, "#outer > .a > .a > p", "target"));
    assert!(matches(&tree, "#outer .a p", "target"));
    assert!(!matches(&tree, "#outer > section p", "target"));
}

#[test]
fn test_structural_pseudo_classes() {
    let tree = page();
    assert!(matches(&tree, ":first-child", "p1"));
    assert!(!matches(&tree, ":first-child", "p2"));
    assert!(matches(&tree, ":last-child", "p3"));
    assert!(matches(&tree, "span:only-of-type", "s1"));
    assert!(!matches(&tree, "p:only-of-type", "p1"));
    assert!(matches(&tree, "p:first-of-type", "p1"));
    assert!(matches(&tree, "p:last-of-type", "p3"));
    assert!(!matches(&tree, ":only-child", "list"));
    assert!(matches(&tree, ":empty", "p3"));
    assert!(matches(&tree, ":empty", "s1"));
    assert!(!matches(&tree, ":empty", "p1"));
}

#[test]
fn test_root_pseudo_class() {
    let tree = page();
    let html = tree.document_element().expect("html element");
    assert!(selector(":root").matches(&tree, html));
    assert!(!matches(&tree, ":root", "outer"));

    // A detached element is the root of its own tree.
    let mut detached = DomTree::new();
    let div = detached.alloc(NodeType::element("div"));
    assert!(selector(":root").matches(&detached, div));
}

#[test]
fn test_state_pseudo_classes() {
    let tree = page();
    assert!(matches(&tree, ":checked", "c1"));
    assert!(matches(&tree, ":default", "c1"));
    assert!(!matches(&tree, ":unchecked", "c1"));
    assert!(matches(&tree, ":required", "t1"));
    assert!(matches(&tree, ":optional", "c1"));
    assert!(matches(&tree, ":enabled", "t1"));
    assert!(!matches(&tree, ":disabled", "t1"));
    assert!(matches(&tree, ":read-write", "t1"));
    assert!(matches(&tree, ":read-only", "c1"));
    assert!(matches(&tree, ":link", "link"));
    assert!(!matches(&tree, ":link", "anchor"));
    // Dynamic states never hold in a static tree.
    assert!(!matches(&tree, ":hover", "link"));
    assert!(!matches(&tree, ":visited", "link"));
}

#[test]
fn test_functional_pseudo_classes() {
    let tree = page();
    assert!(matches(&tree, ":lang(en)", "p1"));
    assert!(matches(&tree, ":lang(en-us)", "p1"));
    assert!(!matches(&tree, ":lang(e)", "p1"));
    assert!(matches(&tree, ":dir(rtl)", "p1"));
    assert!(matches(&tree, ":dir(ltr)", "list"));
    assert!(matches(&tree, ":contains(\"Two\")", "p2"));
    assert!(matches(&tree, ":contains(Two)", "outer"));
    assert!(!matches(&tree, ":contains(\"Two\")", "p1"));
    assert!(matches(&tree, "p:not(.note)", "p1"));
    assert!(!matches(&tree, "p:not(.note)", "p2"));
    assert!(matches(&tree, ":not(span, .note)", "p3"));
}

#[test]
fn test_pseudo_elements() {
    let tree = page();
    assert!(matches(&tree, "p::first-line", "p1"));
    assert!(matches(&tree, "p:first-letter", "p1"));
    assert!(!matches(&tree, "p::first-line", "p3"));
    assert!(!matches(&tree, "p::first-letter", "s1"));
    assert!(!matches(&tree, "p::before", "p1"));
    assert!(!matches(&tree, "p::selection", "p1"));
}

#[test]
fn test_lists_match_any_member() {
    let tree = page();
    assert!(matches(&tree, "#p1, #p2", "p1"));
    assert!(matches(&tree, "#p1, #p2", "p2"));
    assert!(!matches(&tree, "#p1, #p2", "p3"));
}

#[test]
fn test_non_elements_never_match() {
    let tree = page();
    let text = tree.first_child(by_id(&tree, "p1")).expect("text child");
    assert!(!selector("*").matches(&tree, text));
    assert!(!selector(":not(p)").matches(&tree, text));
    assert!(!selector("*").matches(&tree, NodeId::ROOT));
}

#[test]
fn test_specificity() {
    assert_eq!(selector("*").specificity(), Specificity::new(0, 0, 0));
    assert_eq!(selector("#a").specificity(), Specificity::new(1, 0, 0));
    assert_eq!(selector(".a.b").specificity(), Specificity::new(0, 2, 0));
    assert_eq!(selector("div p").specificity(), Specificity::new(0, 0, 2));
    assert_eq!(selector("a:not(#x)").specificity(), Specificity::new(1, 0, 1));
    assert_eq!(selector("li::first-line").specificity(), Specificity::new(0, 0, 2));
    assert_eq!(selector("[x]:hover").specificity(), Specificity::new(0, 2, 0));
    assert_eq!(selector("li:nth-child(2)").specificity(), Specificity::new(0, 1, 1));
    assert_eq!(selector("#a, .b").specificity(), Specificity::new(1, 0, 0));
    assert_eq!(
        selector("ul#nav > li.item:first-child a[href]").specificity(),
        Specificity::new(1, 3, 3)
    );
}

#[test]
fn test_more_ids_is_strictly_greater() {
    let one_id = selector("#a").specificity();
    assert!(one_id > selector(".a.b.c.d.e.f.g.h.i.j.k").specificity());
    assert!(one_id > selector("a b c d e f g h i j k l").specificity());
    assert!(selector("#a #b").specificity() > selector("#a .b.c.d").specificity());
    assert_eq!(Specificity::new(0, 1, 2).to_string(), "(0,1,2)");
}

#[test]
fn test_canonical_serialization() {
    assert_eq!(css("DIV>P.Note"), "div > p.Note");
    assert_eq!(css("a ,  b"), "a, b");
    assert_eq!(css("  a   b  "), "a b");
    assert_eq!(css("a:FIRST-CHILD"), "a:first-child");
    assert_eq!(css("p:before"), "p::before");
    assert_eq!(css("p::BEFORE"), "p::before");
    assert_eq!(css("[DATA-x = '1']"), "[data-x=\"1\"]");
    assert_eq!(css("[x=3]"), "[x=\"3\"]");
    assert_eq!(css("[ x ]"), "[x]");
    assert_eq!(css(":nth-child( 2n + 1 )"), ":nth-child(2n+1)");
    assert_eq!(css(":nth-child(odd)"), ":nth-child(2n+1)");
    assert_eq!(css(":nth-last-of-type(-n+3)"), ":nth-last-of-type(-n+3)");
    assert_eq!(css(":not( .a , b )"), ":not(.a, b)");
    assert_eq!(css(":lang(EN)"), ":lang(EN)");
    assert_eq!(css(":contains('hi')"), ":contains(\"hi\")");
    assert_eq!(css("a ~ b + c > d e"), "a ~ b + c > d e");
}

#[test]
fn test_serialization_reparses_to_itself() {
    for source in [
        "div > p.note",
        "#a, .b:hover, [x|=\"y\"]",
        "ul li:nth-child(3n-2)::first-letter",
        ":not(:nth-of-type(2n))",
    ] {
        let once = css(source);
        assert_eq!(css(&once), once);
    }
}

#[test]
fn test_empty_input_is_universal() {
    assert_eq!(parse_selector(""), Ok(Selector::Universal));
}

#[test]
fn test_builder_errors() {
    assert_eq!(parse_selector("a >"), Err(SelectorError::DanglingCombinator));
    assert_eq!(parse_selector("> a"), Err(SelectorError::DanglingCombinator));
    assert_eq!(parse_selector("a > > b"), Err(SelectorError::DanglingCombinator));
    assert_eq!(parse_selector("a > , b"), Err(SelectorError::DanglingCombinator));
    assert_eq!(parse_selector("a,,b"), Err(SelectorError::EmptyListMember));
    assert_eq!(parse_selector(", a"), Err(SelectorError::EmptyListMember));
    assert_eq!(parse_selector("a,"), Err(SelectorError::EmptyListMember));
    assert_eq!(
        parse_selector(":bogus"),
        Err(SelectorError::UnknownPseudoClass("bogus".to_string()))
    );
    assert_eq!(
        parse_selector("::bogus"),
        Err(SelectorError::UnknownPseudoElement("bogus".to_string()))
    );
    assert_eq!(
        parse_selector(":has(a)"),
        Err(SelectorError::UnknownFunction("has".to_string()))
    );
    assert_eq!(
        parse_selector(":nth-child(x)"),
        Err(SelectorError::InvalidNth("x".to_string()))
    );
    assert_eq!(
        parse_selector(":not()"),
        Err(SelectorError::EmptyArgument("not".to_string()))
    );
    assert_eq!(
        parse_selector(":lang()"),
        Err(SelectorError::EmptyArgument("lang".to_string()))
    );
    assert_eq!(
        parse_selector("[a"),
        Err(SelectorError::UnexpectedEnd(BuilderState::AttributeOperator))
    );
    assert_eq!(
        parse_selector("a."),
        Err(SelectorError::UnexpectedEnd(BuilderState::Class))
    );
    assert!(matches!(
        parse_selector("a{"),
        Err(SelectorError::UnexpectedToken {
            state: BuilderState::Data,
            ..
        })
    ));
    assert!(matches!(
        parse_selector("[a=b c]"),
        Err(SelectorError::UnexpectedToken {
            state: BuilderState::AttributeEnd,
            ..
        })
    ));
    assert!(parse_selector("[a~~=b]").is_err());
    assert!(parse_selector(":lang(a b)").is_err());
}

#[test]
fn test_error_messages() {
    assert_eq!(
        SelectorError::UnknownPseudoClass("x".to_string()).to_string(),
        "unknown pseudo-class ':x'"
    );
    let error = parse_selector("a{").expect_err("brace is not a selector token");
    assert_eq!(error.to_string(), "unexpected '{' in data state");
}
