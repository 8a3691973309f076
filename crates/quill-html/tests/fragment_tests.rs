//! Integration tests for the fragment parsing algorithm.

use quill_html::{Fragment, ParserOptions, dump_nodes, parse_fragment};

/// Helper to parse a fragment with default options
fn fragment(input: &str, context: &str) -> Fragment {
    parse_fragment(input, context, ParserOptions::default())
}

/// Helper to dump a fragment's top-level nodes
fn fragment_dump(input: &str, context: &str) -> String {
    let parsed = fragment(input, context);
    dump_nodes(&parsed.tree, &parsed.nodes)
}

#[test]
fn test_single_element_in_body() {
    let parsed = fragment("<span>", "body");
    assert_eq!(parsed.nodes.len(), 1);
    let span = parsed.nodes[0];
    assert_eq!(parsed.tree.tag_name(span), Some("span"));
    assert!(parsed.tree.children(span).is_empty());
    assert!(
        parsed
            .tree
            .as_element(span)
            .is_some_and(|data| data.attrs.is_empty())
    );
}

#[test]
fn test_empty_input_yields_no_nodes() {
    assert!(fragment("", "div").nodes.is_empty());
}

#[test]
fn test_fragment_is_detached_from_document() {
    let parsed = fragment("<p>x", "div");
    assert!(parsed.tree.document_element().is_none());
    let root = parsed.tree.parent(parsed.nodes[0]).expect("synthetic root");
    assert_eq!(parsed.tree.tag_name(root), Some("html"));
    assert_eq!(parsed.tree.parent(root), None);
}

#[test]
fn test_mixed_content_in_div() {
    assert_eq!(
        fragment_dump("a<b>c</b><!--d-->", "div"),
        "| \"a\"\n| <b>\n|   \"c\"\n| <!-- d -->\n"
    );
}

#[test]
fn test_table_context_implies_tbody() {
    let parsed = fragment("<table><tr>", "table");
    assert_eq!(parsed.nodes.len(), 1);
    let tbody = parsed.nodes[0];
    assert_eq!(parsed.tree.tag_name(tbody), Some("tbody"));
    let rows = parsed.tree.children(tbody);
    assert_eq!(rows.len(), 1);
    assert_eq!(parsed.tree.tag_name(rows[0]), Some("tr"));
    assert!(parsed.issues.iter().any(|issue| issue.is_error));
}

#[test]
fn test_row_context_takes_cells() {
    assert_eq!(fragment_dump("<td>a", "tr"), "| <td>\n|   \"a\"\n");
}

#[test]
fn test_select_context_takes_options() {
    assert_eq!(
        fragment_dump("<option>a<option>b", "select"),
        "| <option>\n|   \"a\"\n| <option>\n|   \"b\"\n"
    );
}

#[test]
fn test_template_context() {
    assert_eq!(
        fragment_dump("<tr><td>x", "template"),
        "| <tr>\n|   <td>\n|     \"x\"\n"
    );
}

#[test]
fn test_form_context_ignores_nested_form() {
    assert_eq!(fragment_dump("<form><input>", "form"), "| <input>\n");
}

#[test]
fn test_title_context_is_rcdata() {
    assert_eq!(fragment_dump("a<b>&amp;", "title"), "| \"a<b>&\"\n");
}

#[test]
fn test_textarea_context_is_rcdata() {
    assert_eq!(fragment_dump("<p>hi</p>", "TEXTAREA"), "| \"<p>hi</p>\"\n");
}

#[test]
fn test_script_context_is_script_data() {
    assert_eq!(fragment_dump("a</b>c", "script"), "| \"a</b>c\"\n");
}

#[test]
fn test_style_context_is_rawtext() {
    assert_eq!(fragment_dump("&amp;<i>", "style"), "| \"&amp;<i>\"\n");
}

#[test]
fn test_noscript_context_is_rawtext() {
    assert_eq!(fragment_dump("<p>x</p>", "noscript"), "| \"<p>x</p>\"\n");
}

#[test]
fn test_plaintext_context() {
    assert_eq!(
        fragment_dump("</plaintext><b>", "plaintext"),
        "| \"</plaintext><b>\"\n"
    );
}

#[test]
fn test_html_attributes_merge_into_root() {
    let parsed = fragment(r#"<html lang="en"><p>"#, "body");
    assert_eq!(parsed.nodes.len(), 1);
    let root = parsed.tree.parent(parsed.nodes[0]).expect("synthetic root");
    assert_eq!(
        parsed.tree.as_element(root).and_then(|data| data.attr("lang")),
        Some("en")
    );
}
