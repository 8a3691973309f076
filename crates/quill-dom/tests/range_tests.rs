//! Tests for range boundary comparison and the content algorithms.

use std::cmp::Ordering;

use quill_dom::{DoctypeData, DomError, DomTree, ElementData, HowToCompare, NodeId, NodeType, Range};

/// Nodes of the fixture tree:
/// `div > [p1 > "Hello", p2 > "World", p3 > b > "Bold"]`
struct Fixture {
    tree: DomTree,
    div: NodeId,
    p1: NodeId,
    p2: NodeId,
    p3: NodeId,
    t1: NodeId,
    t2: NodeId,
    tb: NodeId,
}

fn element(tree: &mut DomTree, parent: NodeId, tag: &str) -> NodeId {
    let id = tree.alloc(NodeType::Element(ElementData::new(tag)));
    tree.append_child(parent, id);
    id
}

fn text(tree: &mut DomTree, parent: NodeId, data: &str) -> NodeId {
    let id = tree.alloc(NodeType::Text(data.to_string()));
    tree.append_child(parent, id);
    id
}

fn fixture() -> Fixture {
    let mut tree = DomTree::new();
    let div = element(&mut tree, NodeId::ROOT, "div");
    let p1 = element(&mut tree, div, "p");
    let t1 = text(&mut tree, p1, "Hello");
    let p2 = element(&mut tree, div, "p");
    let t2 = text(&mut tree, p2, "World");
    let p3 = element(&mut tree, div, "p");
    let b = element(&mut tree, p3, "b");
    let tb = text(&mut tree, b, "Bold");
    Fixture {
        tree,
        div,
        p1,
        p2,
        p3,
        t1,
        t2,
        tb,
    }
}

fn range(f: &Fixture, start: (NodeId, usize), end: (NodeId, usize)) -> Range {
    let mut r = Range::new(NodeId::ROOT);
    r.set_end(&f.tree, end.0, end.1).unwrap();
    r.set_start(&f.tree, start.0, start.1).unwrap();
    r
}

// ========== boundaries ==========

#[test]
fn test_start_after_end_collapses() {
    let f = fixture();
    let mut r = range(&f, (f.t1, 1), (f.t2, 3));

    r.set_start(&f.tree, f.p3, 0).unwrap();

    assert!(r.collapsed());
    assert_eq!(r.end().node, f.p3);
}

#[test]
fn test_end_before_start_collapses() {
    let f = fixture();
    let mut r = range(&f, (f.t2, 1), (f.t2, 3));

    r.set_end(&f.tree, f.t1, 0).unwrap();

    assert!(r.collapsed());
    assert_eq!(r.start().node, f.t1);
}

#[test]
fn test_offset_past_length_is_index_size_error() {
    let f = fixture();
    let mut r = Range::new(NodeId::ROOT);

    assert_eq!(
        r.set_start(&f.tree, f.t1, 6),
        Err(DomError::IndexSize {
            offset: 6,
            length: 5
        })
    );
}

#[test]
fn test_doctype_boundary_is_invalid_node_type() {
    let mut f = fixture();
    let doctype = f.tree.alloc(NodeType::DocumentType(DoctypeData::default()));
    f.tree.insert_before(NodeId::ROOT, doctype, Some(f.div));
    let mut r = Range::new(NodeId::ROOT);

    assert!(matches!(
        r.set_start(&f.tree, doctype, 0),
        Err(DomError::InvalidNodeType(_))
    ));
    assert!(matches!(
        r.select_node_contents(&f.tree, doctype),
        Err(DomError::InvalidNodeType(_))
    ));
}

#[test]
fn test_select_node_uses_parent_offsets() {
    let f = fixture();
    let mut r = Range::new(NodeId::ROOT);

    r.select_node(&f.tree, f.p2).unwrap();

    assert_eq!((r.start().node, r.start().offset), (f.div, 1));
    assert_eq!((r.end().node, r.end().offset), (f.div, 2));
    assert_eq!(r.common_ancestor_container(&f.tree), f.div);
}

#[test]
fn test_select_node_without_parent_fails() {
    let mut tree = DomTree::new();
    let orphan = tree.alloc(NodeType::Element(ElementData::new("div")));
    let mut r = Range::new(NodeId::ROOT);

    assert!(matches!(
        r.select_node(&tree, orphan),
        Err(DomError::InvalidNodeType(_))
    ));
}

// ========== comparison ==========

#[test]
fn test_compare_boundary_points_uses_tree_order() {
    let f = fixture();
    let mut first = Range::new(NodeId::ROOT);
    first.select_node(&f.tree, f.p1).unwrap();
    let mut second = Range::new(NodeId::ROOT);
    second.select_node(&f.tree, f.p2).unwrap();

    let cmp = |a: &Range, how, b: &Range| a.compare_boundary_points(&f.tree, how, b).unwrap();

    assert_eq!(cmp(&first, HowToCompare::StartToStart, &second), Ordering::Less);
    assert_eq!(cmp(&first, HowToCompare::EndToStart, &second), Ordering::Less);
    // first's end (div, 1) equals second's start (div, 1)
    assert_eq!(cmp(&first, HowToCompare::StartToEnd, &second), Ordering::Equal);
    assert_eq!(cmp(&second, HowToCompare::EndToEnd, &first), Ordering::Greater);
}

#[test]
fn test_compare_boundary_points_nested_containers() {
    let f = fixture();
    // (div, 1) sits after everything inside p1 and before p2's text.
    let outer = range(&f, (f.div, 1), (f.div, 1));
    let inner_first = range(&f, (f.t1, 4), (f.t1, 4));
    let inner_second = range(&f, (f.t2, 0), (f.t2, 0));

    let how = HowToCompare::StartToStart;
    assert_eq!(
        outer.compare_boundary_points(&f.tree, how, &inner_first),
        Ok(Ordering::Greater)
    );
    assert_eq!(
        outer.compare_boundary_points(&f.tree, how, &inner_second),
        Ok(Ordering::Less)
    );
}

#[test]
fn test_compare_boundary_points_across_trees() {
    let mut f = fixture();
    let detached = f.tree.alloc(NodeType::Element(ElementData::new("div")));
    let mut other = Range::new(detached);
    other.select_node_contents(&f.tree, detached).unwrap();
    let r = range(&f, (f.t1, 0), (f.t2, 0));

    assert_eq!(
        r.compare_boundary_points(&f.tree, HowToCompare::StartToStart, &other),
        Err(DomError::WrongDocument)
    );
}

#[test]
fn test_compare_point() {
    let f = fixture();
    let mut r = Range::new(NodeId::ROOT);
    r.select_node_contents(&f.tree, f.p2).unwrap();

    assert_eq!(r.compare_point(&f.tree, f.t1, 0), Ok(Ordering::Less));
    assert_eq!(r.compare_point(&f.tree, f.t2, 2), Ok(Ordering::Equal));
    assert_eq!(r.compare_point(&f.tree, f.p3, 0), Ok(Ordering::Greater));
}

#[test]
fn test_is_point_in_range() {
    let mut f = fixture();
    let r = range(&f, (f.t1, 2), (f.t2, 3));

    assert_eq!(r.is_point_in_range(&f.tree, f.t1, 2), Ok(true));
    assert_eq!(r.is_point_in_range(&f.tree, f.t1, 1), Ok(false));
    assert_eq!(r.is_point_in_range(&f.tree, f.p2, 0), Ok(true));

    let detached = f.tree.alloc(NodeType::Text("x".to_string()));
    assert_eq!(r.is_point_in_range(&f.tree, detached, 0), Ok(false));
}

#[test]
fn test_intersects_node() {
    let f = fixture();
    let r = range(&f, (f.t1, 2), (f.t2, 3));

    assert!(r.intersects_node(&f.tree, f.p1));
    assert!(r.intersects_node(&f.tree, f.p2));
    assert!(!r.intersects_node(&f.tree, f.p3));
    assert!(r.intersects_node(&f.tree, f.div));
}

#[test]
fn test_contains_and_partially_contains() {
    let f = fixture();
    let r = range(&f, (f.t1, 2), (f.tb, 1));

    assert!(r.contains_node(&f.tree, f.p2));
    assert!(r.contains_node(&f.tree, f.t2));
    assert!(!r.contains_node(&f.tree, f.p1));
    assert!(r.partially_contains_node(&f.tree, f.p1));
    assert!(r.partially_contains_node(&f.tree, f.p3));
    assert!(!r.partially_contains_node(&f.tree, f.div));
}

// ========== content algorithms ==========

#[test]
fn test_extract_contents_splits_text_and_clones_partial_parents() {
    let mut f = fixture();
    let mut r = range(&f, (f.t1, 2), (f.t2, 3));

    let fragment = r.extract_contents(&mut f.tree).unwrap();

    let pieces = f.tree.children(fragment).to_vec();
    assert_eq!(pieces.len(), 2);
    assert!(pieces.iter().all(|&p| f.tree.is_element_named(p, "p")));
    assert_eq!(f.tree.text_content(pieces[0]), "llo");
    assert_eq!(f.tree.text_content(pieces[1]), "Wor");

    assert_eq!(f.tree.as_text(f.t1), Some("He"));
    assert_eq!(f.tree.as_text(f.t2), Some("ld"));
    assert!(r.collapsed());
    assert_eq!((r.start().node, r.start().offset), (f.div, 1));
}

#[test]
fn test_extract_contents_within_one_text_node() {
    let mut f = fixture();
    let mut r = range(&f, (f.t2, 1), (f.t2, 4));

    let fragment = r.extract_contents(&mut f.tree).unwrap();

    assert_eq!(f.tree.text_content(fragment), "orl");
    assert_eq!(f.tree.as_text(f.t2), Some("Wd"));
    assert_eq!((r.end().node, r.end().offset), (f.t2, 1));
}

#[test]
fn test_clone_contents_leaves_tree_intact() {
    let mut f = fixture();
    let r = range(&f, (f.t1, 2), (f.tb, 2));

    let fragment = r.clone_contents(&mut f.tree).unwrap();

    assert_eq!(f.tree.text_content(fragment), "lloWorldBo");
    assert_eq!(f.tree.as_text(f.t1), Some("Hello"));
    assert_eq!(f.tree.children(f.div).len(), 3);
    // p3 was cloned shallowly with a cloned b inside it
    let last = *f.tree.children(fragment).last().unwrap();
    assert!(f.tree.is_element_named(last, "p"));
    assert_ne!(last, f.p3);
}

#[test]
fn test_delete_contents() {
    let mut f = fixture();
    let mut r = range(&f, (f.t1, 1), (f.tb, 2));

    r.delete_contents(&mut f.tree).unwrap();

    assert_eq!(f.tree.children(f.div), &[f.p1, f.p3]);
    assert_eq!(f.tree.as_text(f.t1), Some("H"));
    assert_eq!(f.tree.as_text(f.tb), Some("ld"));
    assert_eq!(f.tree.parent(f.p2), None);
    assert!(r.collapsed());
}

#[test]
fn test_insert_node_splits_text() {
    let mut f = fixture();
    let mut r = range(&f, (f.t1, 2), (f.t1, 2));
    let span = f.tree.alloc(NodeType::Element(ElementData::new("span")));

    r.insert_node(&mut f.tree, span).unwrap();

    let children = f.tree.children(f.p1).to_vec();
    assert_eq!(children.len(), 3);
    assert_eq!(children[1], span);
    assert_eq!(f.tree.as_text(children[0]), Some("He"));
    assert_eq!(f.tree.as_text(children[2]), Some("llo"));
    assert_eq!((r.end().node, r.end().offset), (f.p1, 2));
}

#[test]
fn test_insert_node_into_comment_fails() {
    let mut f = fixture();
    let comment = f.tree.alloc(NodeType::Comment("note".to_string()));
    f.tree.append_child(f.div, comment);
    let mut r = range(&f, (comment, 1), (comment, 1));
    let span = f.tree.alloc(NodeType::Element(ElementData::new("span")));

    assert!(matches!(
        r.insert_node(&mut f.tree, span),
        Err(DomError::HierarchyRequest(_))
    ));
}

#[test]
fn test_surround_contents() {
    let mut f = fixture();
    let mut r = Range::new(NodeId::ROOT);
    r.select_node_contents(&f.tree, f.p2).unwrap();
    let em = f.tree.alloc(NodeType::Element(ElementData::new("em")));

    r.surround_contents(&mut f.tree, em).unwrap();

    assert_eq!(f.tree.children(f.p2), &[em]);
    assert_eq!(f.tree.children(em), &[f.t2]);
    assert_eq!((r.start().node, r.start().offset), (f.p2, 0));
    assert_eq!((r.end().node, r.end().offset), (f.p2, 1));
}

#[test]
fn test_surround_contents_partial_element_is_invalid_state() {
    let mut f = fixture();
    let mut r = range(&f, (f.t1, 2), (f.t2, 2));
    let em = f.tree.alloc(NodeType::Element(ElementData::new("em")));

    assert!(matches!(
        r.surround_contents(&mut f.tree, em),
        Err(DomError::InvalidState(_))
    ));
}

#[test]
fn test_surround_contents_with_fragment_is_invalid_node_type() {
    let mut f = fixture();
    let mut r = Range::new(NodeId::ROOT);
    r.select_node_contents(&f.tree, f.p2).unwrap();
    let fragment = f.tree.alloc(NodeType::DocumentFragment);

    assert!(matches!(
        r.surround_contents(&mut f.tree, fragment),
        Err(DomError::InvalidNodeType(_))
    ));
}

#[test]
fn test_to_string_concatenates_text_in_range() {
    let f = fixture();
    let r = range(&f, (f.t1, 2), (f.tb, 2));

    assert_eq!(r.to_string(&f.tree), "lloWorldBo");
}

#[test]
fn test_clone_range_is_independent() {
    let f = fixture();
    let original = range(&f, (f.t1, 0), (f.t2, 2));
    let mut copy = original.clone_range();
    assert_eq!(copy, original);

    copy.collapse(true);

    assert!(copy.collapsed());
    assert!(!original.collapsed());
}
