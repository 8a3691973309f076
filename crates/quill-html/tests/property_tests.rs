//! Property tests: arbitrary input always yields a well-formed tree.

use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use quill_common::warning::set_quiet;
use quill_dom::{DomTree, NodeId};
use quill_html::{HTMLTokenizer, ParserOptions, Token, dump_tree, parse_document, parse_fragment};

/// Markup pieces that drive the tree builder through most insertion modes.
const PIECES: &[&str] = &[
    "<html>", "</html>", "<head>", "</head>", "<body>", "</body>", "<title>", "</title>",
    "<p>", "</p>", "<b>", "</b>", "<a>", "</a>", "<i>", "<nobr>", "<div>", "</div>",
    "<table>", "</table>", "<caption>", "</caption>", "<colgroup>", "<col>", "<tbody>",
    "<tr>", "</tr>", "<td>", "</td>", "<th>", "<select>", "</select>", "<option>",
    "<optgroup>", "<template>", "</template>", "<frameset>", "</frameset>", "<frame>",
    "<noframes>", "<li>", "<dd>", "<h1>", "</h1>", "<form>", "</form>", "<button>",
    "<textarea>", "<script>", "</script>", "<svg>", "<plaintext>", "<!DOCTYPE html>",
    "<!--c-->", "text", " ", "\n", "&amp;", "<br>", "</br>", "<input type=hidden>",
];

/// A random sequence of markup pieces.
#[derive(Debug, Clone)]
struct TagSoup(String);

impl Arbitrary for TagSoup {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % 40;
        let soup = (0..len)
            .filter_map(|_| g.choose(PIECES).copied())
            .collect::<String>();
        Self(soup)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new(self.0.shrink().map(Self))
    }
}

/// Every node reachable from the root has the right parent link.
fn parent_links_consistent(tree: &DomTree, id: NodeId) -> bool {
    tree.children(id)
        .iter()
        .all(|&child| tree.parent(child) == Some(id) && parent_links_consistent(tree, child))
}

#[quickcheck]
fn prop_tokenizer_ends_with_single_eof(input: String) -> bool {
    set_quiet(true);
    let mut tokenizer = HTMLTokenizer::new(&input);
    tokenizer.run();
    let tokens = tokenizer.into_tokens();
    tokens.last().is_some_and(Token::is_eof)
        && tokens.iter().filter(|token| token.is_eof()).count() == 1
}

#[quickcheck]
fn prop_arbitrary_text_builds_document(input: String) -> bool {
    set_quiet(true);
    let document = parse_document(&input);
    document.tree.document_element().is_some()
        && parent_links_consistent(&document.tree, NodeId::ROOT)
}

#[quickcheck]
fn prop_tag_soup_builds_document(soup: TagSoup) -> bool {
    set_quiet(true);
    let document = parse_document(&soup.0);
    let dump = dump_tree(&document.tree, NodeId::ROOT);
    document.tree.document_element().is_some()
        && parent_links_consistent(&document.tree, NodeId::ROOT)
        && dump.starts_with("| ")
}

#[quickcheck]
fn prop_tag_soup_fragments(soup: TagSoup, context: u8) -> bool {
    const CONTEXTS: &[&str] = &["body", "div", "table", "tr", "select", "template", "title"];
    set_quiet(true);
    let context = CONTEXTS[usize::from(context) % CONTEXTS.len()];
    let fragment = parse_fragment(&soup.0, context, ParserOptions::default());
    fragment.tree.document_element().is_none()
        && fragment.nodes.iter().all(|&node| {
            fragment
                .tree
                .parent(node)
                .is_some_and(|root| parent_links_consistent(&fragment.tree, root))
        })
}
