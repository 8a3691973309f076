//! Tests for DOM tree mutation: remove_child, insert_before, move_children,
//! checked insertion, cloning and character data.

use std::cmp::Ordering;

use quill_dom::{DomError, DomTree, ElementData, NodeId, NodeType};

/// Helper to create an element node and return its NodeId.
fn alloc_element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.alloc(NodeType::Element(ElementData::new(tag)))
}

fn alloc_text(tree: &mut DomTree, text: &str) -> NodeId {
    tree.alloc(NodeType::Text(text.to_string()))
}

// ========== remove_child ==========

#[test]
fn test_remove_child_single_child() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);

    let child = alloc_element(&mut tree, "p");
    tree.append_child(parent, child);
    assert_eq!(tree.children(parent).len(), 1);

    tree.remove_child(parent, child);

    assert!(tree.children(parent).is_empty());
    assert_eq!(tree.parent(child), None);
    assert_eq!(tree.prev_sibling(child), None);
    assert_eq!(tree.next_sibling(child), None);
}

#[test]
fn test_remove_child_middle_of_three() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);

    let a = alloc_element(&mut tree, "a");
    let b = alloc_element(&mut tree, "b");
    let c = alloc_element(&mut tree, "c");
    tree.append_child(parent, a);
    tree.append_child(parent, b);
    tree.append_child(parent, c);

    tree.remove_child(parent, b);

    // a and c are siblings now
    assert_eq!(tree.children(parent), &[a, c]);
    assert_eq!(tree.next_sibling(a), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(a));
}

#[test]
fn test_remove_child_of_other_parent_is_ignored() {
    let mut tree = DomTree::new();
    let first = alloc_element(&mut tree, "div");
    let second = alloc_element(&mut tree, "div");
    let child = alloc_element(&mut tree, "span");
    tree.append_child(first, child);

    tree.remove_child(second, child);

    assert_eq!(tree.parent(child), Some(first));
}

// ========== insert_before ==========

#[test]
fn test_insert_before_first_child() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    let existing = alloc_element(&mut tree, "p");
    tree.append_child(parent, existing);

    let new_child = alloc_element(&mut tree, "span");
    tree.insert_before(parent, new_child, Some(existing));

    assert_eq!(tree.children(parent), &[new_child, existing]);
    assert_eq!(tree.parent(new_child), Some(parent));
    assert_eq!(tree.index_of(existing), 1);
}

#[test]
fn test_insert_before_none_appends() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "ul");
    let a = alloc_element(&mut tree, "li");
    let b = alloc_element(&mut tree, "li");
    tree.append_child(parent, a);
    tree.insert_before(parent, b, None);

    assert_eq!(tree.children(parent), &[a, b]);
}

#[test]
fn test_append_child_moves_from_old_parent() {
    let mut tree = DomTree::new();
    let old_parent = alloc_element(&mut tree, "div");
    let new_parent = alloc_element(&mut tree, "section");
    let child = alloc_element(&mut tree, "p");
    tree.append_child(old_parent, child);

    tree.append_child(new_parent, child);

    assert!(tree.children(old_parent).is_empty());
    assert_eq!(tree.children(new_parent), &[child]);
}

// ========== move_children ==========

#[test]
fn test_move_children_appends_to_existing() {
    let mut tree = DomTree::new();
    let from = alloc_element(&mut tree, "div");
    let to = alloc_element(&mut tree, "div");
    let existing = alloc_element(&mut tree, "em");
    tree.append_child(to, existing);

    let a = alloc_element(&mut tree, "a");
    let b = alloc_element(&mut tree, "b");
    tree.append_child(from, a);
    tree.append_child(from, b);

    tree.move_children(from, to);

    assert!(tree.children(from).is_empty());
    assert_eq!(tree.children(to), &[existing, a, b]);
    assert_eq!(tree.parent(a), Some(to));
    assert_eq!(tree.parent(b), Some(to));
}

// ========== pre_insert ==========

#[test]
fn test_pre_insert_rejects_ancestor() {
    let mut tree = DomTree::new();
    let outer = alloc_element(&mut tree, "div");
    let inner = alloc_element(&mut tree, "div");
    tree.append_child(outer, inner);

    let result = tree.pre_insert(outer, inner, None);

    assert!(matches!(result, Err(DomError::HierarchyRequest(_))));
}

#[test]
fn test_pre_insert_rejects_text_under_document() {
    let mut tree = DomTree::new();
    let text = alloc_text(&mut tree, "stray");

    let result = tree.pre_insert(text, NodeId::ROOT, None);

    assert!(matches!(result, Err(DomError::HierarchyRequest(_))));
}

#[test]
fn test_pre_insert_reference_must_be_child() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    let stranger = alloc_element(&mut tree, "p");
    let node = alloc_element(&mut tree, "span");

    let result = tree.pre_insert(node, parent, Some(stranger));

    assert!(matches!(result, Err(DomError::NotFound(_))));
}

#[test]
fn test_pre_insert_fragment_moves_children() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    let tail = alloc_element(&mut tree, "hr");
    tree.append_child(parent, tail);

    let fragment = tree.alloc(NodeType::DocumentFragment);
    let a = alloc_element(&mut tree, "a");
    let b = alloc_element(&mut tree, "b");
    tree.append_child(fragment, a);
    tree.append_child(fragment, b);

    tree.pre_insert(fragment, parent, Some(tail)).unwrap();

    assert_eq!(tree.children(parent), &[a, b, tail]);
    assert!(tree.children(fragment).is_empty());
}

// ========== cloning and character data ==========

#[test]
fn test_clone_node_deep_copies_subtree() {
    let mut tree = DomTree::new();
    let div = alloc_element(&mut tree, "div");
    let _ = tree
        .as_element_mut(div)
        .unwrap()
        .attrs
        .insert("id".to_string(), "main".to_string());
    let text = alloc_text(&mut tree, "hi");
    tree.append_child(div, text);

    let copy = tree.clone_node(div, true).unwrap();

    assert_ne!(copy, div);
    assert_eq!(tree.parent(copy), None);
    assert_eq!(tree.as_element(copy).unwrap().id().map(String::as_str), Some("main"));
    assert_eq!(tree.text_content(copy), "hi");
    assert_ne!(tree.children(copy)[0], text);
}

#[test]
fn test_clone_node_shallow_has_no_children() {
    let mut tree = DomTree::new();
    let div = alloc_element(&mut tree, "div");
    let text = alloc_text(&mut tree, "hi");
    tree.append_child(div, text);

    let copy = tree.clone_node(div, false).unwrap();

    assert!(tree.children(copy).is_empty());
}

#[test]
fn test_clone_document_is_not_supported() {
    let mut tree = DomTree::new();
    assert!(matches!(
        tree.clone_node(NodeId::ROOT, false),
        Err(DomError::NotSupported(_))
    ));
}

#[test]
fn test_split_text_inserts_tail_after() {
    let mut tree = DomTree::new();
    let p = alloc_element(&mut tree, "p");
    let text = alloc_text(&mut tree, "Hello");
    tree.append_child(p, text);

    let tail = tree.split_text(text, 2).unwrap();

    assert_eq!(tree.as_text(text), Some("He"));
    assert_eq!(tree.as_text(tail), Some("llo"));
    assert_eq!(tree.children(p), &[text, tail]);
}

#[test]
fn test_split_text_offset_out_of_range() {
    let mut tree = DomTree::new();
    let text = alloc_text(&mut tree, "abc");

    assert_eq!(
        tree.split_text(text, 4),
        Err(DomError::IndexSize {
            offset: 4,
            length: 3
        })
    );
}

#[test]
fn test_replace_data_clamps_count() {
    let mut tree = DomTree::new();
    let text = alloc_text(&mut tree, "héllo");

    tree.replace_data(text, 1, 100, "ey").unwrap();

    assert_eq!(tree.as_text(text), Some("hey"));
    assert_eq!(tree.substring_data(text, 1, 1).unwrap(), "e");
}

#[test]
fn test_substring_data_on_element_fails() {
    let mut tree = DomTree::new();
    let div = alloc_element(&mut tree, "div");
    assert!(matches!(
        tree.substring_data(div, 0, 1),
        Err(DomError::InvalidNodeType(_))
    ));
}

// ========== tree order ==========

#[test]
fn test_tree_order_preorder() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    tree.append_child(NodeId::ROOT, html);
    let head = alloc_element(&mut tree, "head");
    let body = alloc_element(&mut tree, "body");
    tree.append_child(html, head);
    tree.append_child(html, body);
    let title = alloc_element(&mut tree, "title");
    tree.append_child(head, title);

    assert_eq!(tree.tree_order(html, title), Some(Ordering::Less));
    assert_eq!(tree.tree_order(title, body), Some(Ordering::Less));
    assert_eq!(tree.tree_order(body, head), Some(Ordering::Greater));
    assert_eq!(tree.tree_order(body, body), Some(Ordering::Equal));

    let detached = alloc_element(&mut tree, "div");
    assert_eq!(tree.tree_order(detached, body), None);
}

#[test]
fn test_descendants_are_preorder() {
    let mut tree = DomTree::new();
    let a = alloc_element(&mut tree, "a");
    let b = alloc_element(&mut tree, "b");
    let c = alloc_element(&mut tree, "c");
    let d = alloc_element(&mut tree, "d");
    tree.append_child(a, b);
    tree.append_child(b, c);
    tree.append_child(a, d);

    let order: Vec<NodeId> = tree.descendants(a).collect();

    assert_eq!(order, vec![b, c, d]);
}
