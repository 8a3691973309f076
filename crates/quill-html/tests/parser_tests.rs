//! Integration tests for the HTML tree builder.

use quill_dom::{DomTree, NodeId, NodeType};
use quill_html::{ParsedDocument, ParserOptions, QuirksMode, dump_tree, parse_document};

/// Helper to parse a standards-mode document and dump the children of body
fn body_dump(html: &str) -> String {
    let document = parse_document(&format!("<!DOCTYPE html>{html}"));
    let body = document.tree.body().expect("document has a body");
    dump_tree(&document.tree, body)
}

/// Helper to parse HTML and dump the whole document
fn document_dump(html: &str) -> String {
    let document = parse_document(html);
    dump_tree(&document.tree, NodeId::ROOT)
}

/// Helper to get element by tag name (first match, depth-first)
fn find_element(tree: &DomTree, from: NodeId, tag: &str) -> Option<NodeId> {
    if let Some(data) = tree.as_element(from)
        && data.tag_name == tag
    {
        return Some(from);
    }
    for &child_id in tree.children(from) {
        if let Some(found) = find_element(tree, child_id, tag) {
            return Some(found);
        }
    }
    None
}

fn quirks_of(html: &str) -> QuirksMode {
    parse_document(html).quirks_mode
}

#[test]
fn test_document_structure() {
    let document = parse_document("<!DOCTYPE html><html><head></head><body></body></html>");
    let tree = &document.tree;

    assert!(matches!(
        tree.node_type(NodeId::ROOT),
        Some(NodeType::Document)
    ));
    let html = tree.document_element().expect("html element");
    assert_eq!(tree.tag_name(html), Some("html"));
    assert!(tree.head().is_some());
    assert!(tree.body().is_some());
    assert!(document.issues.is_empty());
}

#[test]
fn test_implied_structure() {
    assert_eq!(
        document_dump("<!DOCTYPE html>Hello"),
        "| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <body>\n|     \"Hello\"\n"
    );
}

#[test]
fn test_doctype_identifiers_in_dump() {
    let dump = document_dump(
        r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd">"#,
    );
    assert!(dump.starts_with(
        "| <!DOCTYPE html \"-//W3C//DTD XHTML 1.0 Strict//EN\" \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd\">\n"
    ));
}

#[test]
fn test_comments_outside_html() {
    assert_eq!(
        document_dump("<!--a--><!DOCTYPE html><html></html><!--b-->"),
        "| <!-- a -->\n| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <body>\n| <!-- b -->\n"
    );
}

#[test]
fn test_comment_after_body_goes_to_html() {
    assert_eq!(
        document_dump("<!DOCTYPE html><body></body><!--x-->"),
        "| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <body>\n|   <!-- x -->\n"
    );
}

#[test]
fn test_head_element_after_head_is_moved_into_head() {
    assert_eq!(
        document_dump("<!DOCTYPE html><head></head><title>t</title>"),
        "| <!DOCTYPE html>\n| <html>\n|   <head>\n|     <title>\n|       \"t\"\n|   <body>\n"
    );
}

#[test]
fn test_adjacent_text_is_merged() {
    assert_eq!(body_dump("a&amp;b"), "| \"a&b\"\n");
}

#[test]
fn test_attributes_are_sorted_in_dump() {
    assert_eq!(
        body_dump(r#"<div title="t" class="c" id="i"></div>"#),
        "| <div>\n|   class=\"c\"\n|   id=\"i\"\n|   title=\"t\"\n"
    );
}

// ========== Implied end tags and scopes ==========

#[test]
fn test_button_hides_paragraph_from_block_start_tags() {
    assert_eq!(
        body_dump("<p><button><div>x</div></button>y"),
        "| <p>\n|   <button>\n|     <div>\n|       \"x\"\n|   \"y\"\n"
    );
}

#[test]
fn test_paragraph_closed_after_button_closes() {
    assert_eq!(
        body_dump("<p><button></button><div>x"),
        "| <p>\n|   <button>\n| <div>\n|   \"x\"\n"
    );
}

#[test]
fn test_end_p_inside_button_inserts_empty_paragraph() {
    assert_eq!(
        body_dump("<p><button></p>x"),
        "| <p>\n|   <button>\n|     <p>\n|     \"x\"\n"
    );
}

#[test]
fn test_paragraph_reopened_after_adoption() {
    assert_eq!(
        body_dump("<b><p>a</b><div>c"),
        "| <b>\n| <p>\n|   <b>\n|     \"a\"\n| <div>\n|   <b>\n|     \"c\"\n"
    );
}

#[test]
fn test_deep_nesting_builds_a_single_chain() {
    const DEPTH: usize = 20_000;
    let html = format!("<!DOCTYPE html><p>x{}", "<div>".repeat(DEPTH));
    let document = parse_document(&html);
    let tree = &document.tree;
    let body = tree.body().expect("document has a body");

    // The first div closes the paragraph; every later one nests.
    let top: Vec<&str> = tree
        .children(body)
        .iter()
        .filter_map(|&id| tree.tag_name(id))
        .collect();
    assert_eq!(top, ["p", "div"]);

    let mut node = tree.children(body)[1];
    let mut depth = 1;
    while let Some(child) = tree.first_child(node) {
        assert_eq!(tree.tag_name(child), Some("div"));
        node = child;
        depth += 1;
    }
    assert_eq!(depth, DEPTH);
}

#[test]
fn test_paragraphs_close_each_other() {
    assert_eq!(
        body_dump("<p>1<p>2"),
        "| <p>\n|   \"1\"\n| <p>\n|   \"2\"\n"
    );
}

#[test]
fn test_list_items_close_each_other() {
    assert_eq!(
        body_dump("<ul><li>a<li>b</ul>"),
        "| <ul>\n|   <li>\n|     \"a\"\n|   <li>\n|     \"b\"\n"
    );
}

#[test]
fn test_heading_closes_open_heading() {
    assert_eq!(
        body_dump("<h1>a<h2>b"),
        "| <h1>\n|   \"a\"\n| <h2>\n|   \"b\"\n"
    );
}

#[test]
fn test_nested_buttons_are_siblings() {
    assert_eq!(body_dump("<button><button>"), "| <button>\n| <button>\n");
}

#[test]
fn test_stray_end_p_creates_paragraph() {
    let document = parse_document("<!DOCTYPE html><body></p>");
    let body = document.tree.body().expect("body");
    assert_eq!(dump_tree(&document.tree, body), "| <p>\n");
    assert_eq!(document.issues.len(), 1);
    assert!(document.issues[0].is_error);
}

#[test]
fn test_end_br_becomes_br_element() {
    assert_eq!(body_dump("</br>"), "| <br>\n");
}

#[test]
fn test_image_becomes_img() {
    assert_eq!(body_dump("<image src=a>"), "| <img>\n|   src=\"a\"\n");
}

#[test]
fn test_nested_form_is_ignored() {
    assert_eq!(
        body_dump("<form><form><input></form>"),
        "| <form>\n|   <input>\n"
    );
}

#[test]
fn test_pre_drops_leading_newline() {
    assert_eq!(body_dump("<pre>\nx</pre>"), "| <pre>\n|   \"x\"\n");
}

#[test]
fn test_textarea_is_rcdata() {
    assert_eq!(
        body_dump("<textarea>\n<b>&amp;</textarea>"),
        "| <textarea>\n|   \"<b>&\"\n"
    );
}

#[test]
fn test_script_content_is_text() {
    let document = parse_document("<!DOCTYPE html><script>if (a < b) {}</script>");
    let head = document.tree.head().expect("head");
    assert_eq!(
        dump_tree(&document.tree, head),
        "| <script>\n|   \"if (a < b) {}\"\n"
    );
}

// ========== Formatting elements ==========

#[test]
fn test_misnested_anchor_and_paragraph() {
    assert_eq!(
        body_dump("<a><p></a>"),
        "| <a>\n| <p>\n|   <a>\n"
    );
}

#[test]
fn test_adoption_agency_clones_attributes() {
    assert_eq!(
        body_dump("<a href=x>1<p>2</a>3</p>"),
        "| <a>\n|   href=\"x\"\n|   \"1\"\n| <p>\n|   <a>\n|     href=\"x\"\n|     \"2\"\n|   \"3\"\n"
    );
}

#[test]
fn test_misnested_bold_and_paragraph() {
    assert_eq!(
        body_dump("<b>1<p>2</b>3</p>"),
        "| <b>\n|   \"1\"\n| <p>\n|   <b>\n|     \"2\"\n|   \"3\"\n"
    );
}

#[test]
fn test_formatting_reconstructed_after_block_closes() {
    assert_eq!(
        body_dump("<p><b>x</p>y"),
        "| <p>\n|   <b>\n|     \"x\"\n| <b>\n|   \"y\"\n"
    );
}

#[test]
fn test_noahs_ark_limits_reconstruction() {
    assert_eq!(
        body_dump("<p><b><b><b><b>x</p>y"),
        concat!(
            "| <p>\n",
            "|   <b>\n",
            "|     <b>\n",
            "|       <b>\n",
            "|         <b>\n",
            "|           \"x\"\n",
            "| <b>\n",
            "|   <b>\n",
            "|     <b>\n",
            "|       \"y\"\n",
        )
    );
}

#[test]
fn test_nested_anchor_closes_outer() {
    assert_eq!(
        body_dump("<a>1<a>2</a>"),
        "| <a>\n|   \"1\"\n| <a>\n|   \"2\"\n"
    );
}

// ========== Tables ==========

#[test]
fn test_table_gets_implied_tbody() {
    assert_eq!(
        body_dump("<table><tr><td>a<td>b</table>"),
        concat!(
            "| <table>\n",
            "|   <tbody>\n",
            "|     <tr>\n",
            "|       <td>\n",
            "|         \"a\"\n",
            "|       <td>\n",
            "|         \"b\"\n",
        )
    );
}

#[test]
fn test_foster_parented_text() {
    assert_eq!(
        body_dump("<table>a<tr><td>b</table>"),
        concat!(
            "| \"a\"\n",
            "| <table>\n",
            "|   <tbody>\n",
            "|     <tr>\n",
            "|       <td>\n",
            "|         \"b\"\n",
        )
    );
}

#[test]
fn test_foster_parented_element() {
    assert_eq!(
        body_dump("<table><div>x</div></table>"),
        "| <div>\n|   \"x\"\n| <table>\n"
    );
}

#[test]
fn test_whitespace_stays_in_table() {
    assert_eq!(
        body_dump("<table> <tr>"),
        "| <table>\n|   \" \"\n|   <tbody>\n|     <tr>\n"
    );
}

#[test]
fn test_hidden_input_stays_in_table() {
    assert_eq!(
        body_dump("<table><input type=hidden><tr>"),
        concat!(
            "| <table>\n",
            "|   <input>\n",
            "|     type=\"hidden\"\n",
            "|   <tbody>\n",
            "|     <tr>\n",
        )
    );
}

#[test]
fn test_caption_closed_by_table_end() {
    assert_eq!(
        body_dump("<table><caption>x</table>y"),
        "| <table>\n|   <caption>\n|     \"x\"\n| \"y\"\n"
    );
}

#[test]
fn test_column_group() {
    assert_eq!(
        body_dump("<table><col><tr></table>"),
        concat!(
            "| <table>\n",
            "|   <colgroup>\n",
            "|     <col>\n",
            "|   <tbody>\n",
            "|     <tr>\n",
        )
    );
}

#[test]
fn test_table_in_paragraph_depends_on_quirks() {
    let quirks = parse_document("<p><table>");
    let body = quirks.tree.body().expect("body");
    assert_eq!(dump_tree(&quirks.tree, body), "| <p>\n|   <table>\n");

    assert_eq!(body_dump("<p><table>"), "| <p>\n| <table>\n");
}

// ========== Select ==========

#[test]
fn test_select_options() {
    assert_eq!(
        body_dump("<select><option>a<option>b</select>c"),
        concat!(
            "| <select>\n",
            "|   <option>\n",
            "|     \"a\"\n",
            "|   <option>\n",
            "|     \"b\"\n",
            "| \"c\"\n",
        )
    );
}

#[test]
fn test_select_ignores_markup() {
    assert_eq!(
        body_dump("<select><b>x</b></select>"),
        "| <select>\n|   \"x\"\n"
    );
}

#[test]
fn test_select_in_table_closed_by_cell_end() {
    assert_eq!(
        body_dump("<table><tr><td><select><option>a</td><td>b"),
        concat!(
            "| <table>\n",
            "|   <tbody>\n",
            "|     <tr>\n",
            "|       <td>\n",
            "|         <select>\n",
            "|           <option>\n",
            "|             \"a\"\n",
            "|       <td>\n",
            "|         \"b\"\n",
        )
    );
}

// ========== Template and frameset ==========

#[test]
fn test_template_contents_are_children() {
    assert_eq!(
        document_dump("<!DOCTYPE html><template><tr></tr></template>"),
        concat!(
            "| <!DOCTYPE html>\n",
            "| <html>\n",
            "|   <head>\n",
            "|     <template>\n",
            "|       <tr>\n",
            "|   <body>\n",
        )
    );
}

#[test]
fn test_unclosed_template_at_eof() {
    let document = parse_document("<!DOCTYPE html><body><template><div>");
    let template = find_element(&document.tree, NodeId::ROOT, "template").expect("template");
    let div = find_element(&document.tree, template, "div").expect("div in template");
    assert_eq!(document.tree.parent(div), Some(template));
    assert!(document.issues.iter().any(|issue| issue.is_error));
}

#[test]
fn test_frameset_document() {
    assert_eq!(
        document_dump("<!DOCTYPE html><frameset><frame></frameset>"),
        "| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <frameset>\n|     <frame>\n"
    );
}

#[test]
fn test_frameset_ignored_after_content() {
    let document = parse_document("<!DOCTYPE html><p>x</p><frameset>");
    assert!(find_element(&document.tree, NodeId::ROOT, "frameset").is_none());
    assert!(document.tree.body().is_some());
}

// ========== Quirks mode ==========

#[test]
fn test_quirks_mode_detection() {
    assert_eq!(quirks_of("<p>no doctype"), QuirksMode::Quirks);
    assert_eq!(quirks_of("<!DOCTYPE html>"), QuirksMode::NoQuirks);
    assert_eq!(
        quirks_of(r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01 Transitional//EN">"#),
        QuirksMode::Quirks
    );
    assert_eq!(
        quirks_of(
            r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01 Transitional//EN" "http://www.w3.org/TR/html4/loose.dtd">"#
        ),
        QuirksMode::LimitedQuirks
    );
    assert_eq!(
        quirks_of(r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "x">"#),
        QuirksMode::LimitedQuirks
    );
    assert_eq!(quirks_of("<!DOCTYPE svg>"), QuirksMode::Quirks);
}

// ========== Issues ==========

#[test]
fn test_foreign_content_is_a_warning() {
    let lenient = parse_document("<!DOCTYPE html><svg></svg>");
    assert_eq!(lenient.issues.len(), 1);
    assert!(!lenient.issues[0].is_error);
    assert!(find_element(&lenient.tree, NodeId::ROOT, "svg").is_some());

    let strict: ParsedDocument = quill_html::parse_document_with_options(
        "<!DOCTYPE html><svg></svg>",
        ParserOptions {
            strict: true,
            ..ParserOptions::default()
        },
    );
    assert_eq!(strict.issues.len(), 1);
    assert!(strict.issues[0].is_error);
}

#[test]
fn test_issue_records_token_index() {
    let document = parse_document("<!DOCTYPE html><p></div>");
    assert_eq!(document.issues.len(), 1);
    assert_eq!(document.issues[0].token_index, 2);
}

#[test]
fn test_noscript_with_scripting_is_raw_text() {
    let document = quill_html::parse_document_with_options(
        "<!DOCTYPE html><body><noscript><p>x</p></noscript>",
        ParserOptions {
            scripting: true,
            ..ParserOptions::default()
        },
    );
    let body = document.tree.body().expect("body");
    assert_eq!(
        dump_tree(&document.tree, body),
        "| <noscript>\n|   \"<p>x</p>\"\n"
    );
}

#[test]
fn test_noscript_without_scripting_is_markup() {
    assert_eq!(
        body_dump("<body><noscript><p>x</p></noscript>"),
        "| <noscript>\n|   <p>\n|     \"x\"\n"
    );
}
