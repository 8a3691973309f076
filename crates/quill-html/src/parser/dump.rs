//! Text rendering of parsed trees in the html5lib test-suite format.

use std::fmt::Write as _;

use quill_dom::{DomTree, NodeId, NodeType};

/// Render the descendants of `id` one node per line, each line starting with
/// `| ` and indented two spaces per level. Attributes appear sorted by name,
/// one level deeper than their element.
///
/// ```
/// use quill_dom::NodeId;
/// use quill_html::{dump_tree, parse_document};
///
/// let document = parse_document("<!DOCTYPE html><p class=x>hi");
/// let dump = dump_tree(&document.tree, NodeId::ROOT);
/// assert!(dump.contains("|     <p>\n|       class=\"x\"\n|       \"hi\"\n"));
/// ```
#[must_use]
pub fn dump_tree(tree: &DomTree, id: NodeId) -> String {
    dump_nodes(tree, tree.children(id))
}

/// Render `nodes` and their descendants, as for a fragment's top-level list.
#[must_use]
pub fn dump_nodes(tree: &DomTree, nodes: &[NodeId]) -> String {
    let mut out = String::new();
    for &node in nodes {
        write_node(tree, node, 0, &mut out);
    }
    out
}

fn write_node(tree: &DomTree, id: NodeId, depth: usize, out: &mut String) {
    let Some(node_type) = tree.node_type(id) else {
        return;
    };
    let prefix = format!("| {}", "  ".repeat(depth));
    match node_type {
        NodeType::Document | NodeType::DocumentFragment => {}
        NodeType::DocumentType(doctype) => {
            if doctype.public_id.is_empty() && doctype.system_id.is_empty() {
                let _ = writeln!(out, "{prefix}<!DOCTYPE {}>", doctype.name);
            } else {
                let _ = writeln!(
                    out,
                    "{prefix}<!DOCTYPE {} \"{}\" \"{}\">",
                    doctype.name, doctype.public_id, doctype.system_id
                );
            }
        }
        NodeType::Element(data) => {
            let _ = writeln!(out, "{prefix}<{}>", data.tag_name);
            let mut attrs: Vec<_> = data.attrs.iter().collect();
            attrs.sort();
            for (name, value) in attrs {
                let _ = writeln!(out, "{prefix}  {name}=\"{value}\"");
            }
        }
        NodeType::Text(data) => {
            let _ = writeln!(out, "{prefix}\"{data}\"");
        }
        NodeType::Comment(data) => {
            let _ = writeln!(out, "{prefix}<!-- {data} -->");
        }
    }
    for &child in tree.children(id) {
        write_node(tree, child, depth + 1, out);
    }
}

/// Print the tree under `id` to stdout in [`dump_tree`] format.
pub fn print_tree(tree: &DomTree, id: NodeId) {
    print!("{}", dump_tree(tree, id));
}
