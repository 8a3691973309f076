//! DOM tree implementation for the Quill engine.
//!
//! This crate provides an arena-based DOM tree structure following the
//! [DOM Living Standard](https://dom.spec.whatwg.org/).
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships,
//! providing O(1) access and traversal without borrow checker issues. Nodes
//! that are removed from the tree stay in the arena, detached, so ids held by
//! callers never dangle.
//!
//! Element behaviour (which tags are "special", which are formatting
//! elements) is not modelled here; parsers and matchers key it off the tag
//! name.

mod error;
pub mod range;

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

pub use error::DomError;
pub use range::{BoundaryPoint, HowToCompare, Range};

/// Map of attribute names to values for an element.
pub type AttributesMap = HashMap<String, String>;

/// A type-safe index into the DOM tree.
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
/// "Each node has an associated node document..."
///
/// `NodeId` provides O(1) access to any node in the tree without borrowing issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root document node is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Node is an abstract interface that is used by all nodes in a tree."
///
/// Siblings are not stored; they are derived from the parent's child list so
/// mutation only has two places to keep consistent.
#[derive(Debug, Clone)]
pub struct Node {
    /// "Each node has an associated node type"
    pub node_type: NodeType,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-parent)
    /// "An object that participates in a tree has a parent, which is either
    /// null or an object."
    pub parent: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-child)
    /// "A node has an associated list of children"
    pub children: Vec<NodeId>,
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Each node has an associated node type"
#[derive(Debug, Clone)]
pub enum NodeType {
    /// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
    Document,
    /// [§ 4.6 Interface DocumentType](https://dom.spec.whatwg.org/#interface-documenttype)
    /// "Doctypes have an associated name, public ID, and system ID."
    DocumentType(DoctypeData),
    /// [§ 4.7 Interface DocumentFragment](https://dom.spec.whatwg.org/#interface-documentfragment)
    DocumentFragment,
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    /// "Element nodes are simply known as elements."
    Element(ElementData),
    /// [§ 4.11 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    Text(String),
    /// [§ 4.14 Interface Comment](https://dom.spec.whatwg.org/#interface-comment)
    Comment(String),
}

impl NodeType {
    /// Build an element node with no attributes.
    #[must_use]
    pub fn element(tag_name: impl Into<String>) -> Self {
        Self::Element(ElementData::new(tag_name))
    }

    /// [§ 4.10 Interface CharacterData](https://dom.spec.whatwg.org/#interface-characterdata)
    ///
    /// True for Text and Comment nodes.
    #[must_use]
    pub const fn is_character_data(&self) -> bool {
        matches!(self, Self::Text(_) | Self::Comment(_))
    }
}

/// Data carried by a DOCTYPE node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctypeData {
    /// The doctype name (`html` for standards documents).
    pub name: String,
    /// The public identifier, empty when absent.
    pub public_id: String,
    /// The system identifier, empty when absent.
    pub system_id: String,
}

/// Element-specific data.
///
/// Per [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element):
/// "When an element is created, its local name is always given."
///
/// NOTE: Only the local name and attributes are kept. Every element lives in
/// the HTML namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// "An element's local name"
    pub tag_name: String,
    /// "An element has an associated attribute list"
    pub attrs: AttributesMap,
}

impl ElementData {
    /// Create element data with an empty attribute list.
    #[must_use]
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attrs: AttributesMap::new(),
        }
    }

    /// Returns the element's id attribute value if present.
    ///
    /// Per [§ 3.2.6 Global attributes](https://html.spec.whatwg.org/multipage/dom.html#global-attributes):
    /// "The id attribute specifies its element's unique identifier (ID)."
    #[must_use]
    pub fn id(&self) -> Option<&String> {
        self.attrs.get("id")
    }

    /// Returns the set of class names from the class attribute.
    ///
    /// "The class attribute, if specified, must have a value that is a set of
    /// space-separated tokens representing the various classes that the element belongs to."
    #[must_use]
    pub fn classes(&self) -> HashSet<&str> {
        self.attrs
            .get("class")
            .map(|list| list.split_ascii_whitespace().collect())
            .unwrap_or_default()
    }

    /// Look up an attribute by name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// True if the element's local name equals `name`.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.tag_name == name
    }
}

/// Arena-based DOM tree with O(1) node access and traversal.
///
/// [§ 4 Nodes](https://dom.spec.whatwg.org/#nodes)
///
/// "The DOM represents a document as a tree. A tree is a finite hierarchical
/// tree structure."
///
/// This structure stores all nodes in a contiguous vector, using indices
/// for all relationships. The Document node is always at index 0.
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a new DOM tree with just the Document node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                node_type: NodeType::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Get the root document node ID.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a node by its ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Get the number of nodes in the arena (attached or not).
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the arena is empty (should always have at least the Document).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Node type accessor.
    #[must_use]
    pub fn node_type(&self, id: NodeId) -> Option<&NodeType> {
        self.get(id).map(|n| &n.node_type)
    }

    // ========== mutation ==========

    /// [§ 4.2.2 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// "To append a node to a parent, pre-insert node into parent before null."
    ///
    /// `child` is first removed from its current parent, if any. No hierarchy
    /// checks are made; the parser relies on this being cheap. Use
    /// [`DomTree::pre_insert`] for checked insertion.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.insert_before(parent, child, None);
    }

    /// [§ 4.2.3 Insert](https://dom.spec.whatwg.org/#concept-node-insert)
    ///
    /// Insert `child` into `parent` before `reference`, or at the end when
    /// `reference` is `None` or not a child of `parent`.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        self.detach(child);
        let position = reference.and_then(|r| self.index_of_child(parent, r));
        let children = &mut self.nodes[parent.0].children;
        match position {
            Some(index) => children.insert(index, child),
            None => children.push(child),
        }
        self.nodes[child.0].parent = Some(parent);
    }

    /// [§ 4.2.3 Remove](https://dom.spec.whatwg.org/#concept-node-remove)
    ///
    /// Remove `child` from `parent`. Does nothing if `child` is not a child of
    /// `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        if self.parent(child) == Some(parent) {
            self.detach(child);
        }
    }

    /// Remove `id` from its parent, if it has one.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        self.nodes[parent.0].children.retain(|&c| c != id);
        self.nodes[id.0].parent = None;
    }

    /// Move every child of `from` to the end of `to`, preserving order.
    pub fn move_children(&mut self, from: NodeId, to: NodeId) {
        let moved = std::mem::take(&mut self.nodes[from.0].children);
        for &child in &moved {
            self.nodes[child.0].parent = Some(to);
        }
        self.nodes[to.0].children.extend(moved);
    }

    /// Remove every child of `id`.
    pub fn remove_all_children(&mut self, id: NodeId) {
        for child in std::mem::take(&mut self.nodes[id.0].children) {
            self.nodes[child.0].parent = None;
        }
    }

    /// [§ 4.2.3 Pre-insert](https://dom.spec.whatwg.org/#concept-node-pre-insert)
    ///
    /// Checked insertion. Inserting a `DocumentFragment` moves its children
    /// and leaves the fragment empty.
    ///
    /// # Errors
    /// Fails with the error the standard's "ensure pre-insertion validity"
    /// steps prescribe.
    pub fn pre_insert(
        &mut self,
        node: NodeId,
        parent: NodeId,
        child: Option<NodeId>,
    ) -> Result<(), DomError> {
        self.ensure_pre_insertion_validity(node, parent, child)?;

        // "Let referenceChild be child. If referenceChild is node, then set
        // referenceChild to node's next sibling."
        let reference = if child == Some(node) {
            self.next_sibling(node)
        } else {
            child
        };

        if matches!(self.node_type(node), Some(NodeType::DocumentFragment)) {
            for moved in self.children(node).to_vec() {
                self.insert_before(parent, moved, reference);
            }
        } else {
            self.insert_before(parent, node, reference);
        }
        Ok(())
    }

    /// [§ 4.2.3](https://dom.spec.whatwg.org/#concept-node-ensure-pre-insertion-validity)
    ///
    /// # Errors
    /// `HierarchyRequest` for illegal parent/child kinds or cycles,
    /// `NotFound` if `child` is not a child of `parent`.
    pub fn ensure_pre_insertion_validity(
        &self,
        node: NodeId,
        parent: NodeId,
        child: Option<NodeId>,
    ) -> Result<(), DomError> {
        let parent_type = self.node_type(parent).ok_or(DomError::NotFound("parent"))?;
        let node_type = self.node_type(node).ok_or(DomError::NotFound("node"))?;

        // "If parent is not a Document, DocumentFragment, or Element node..."
        if !matches!(
            parent_type,
            NodeType::Document | NodeType::DocumentFragment | NodeType::Element(_)
        ) {
            return Err(DomError::HierarchyRequest("parent cannot have children"));
        }

        // "If node is a host-including inclusive ancestor of parent..."
        if self.is_inclusive_ancestor(node, parent) {
            return Err(DomError::HierarchyRequest("node is an ancestor of parent"));
        }

        // "If child is non-null and its parent is not parent..."
        if let Some(c) = child
            && self.parent(c) != Some(parent)
        {
            return Err(DomError::NotFound("reference child is not a child of parent"));
        }

        match node_type {
            NodeType::Document => Err(DomError::HierarchyRequest("cannot insert a document")),
            // "If either node is a Text node and parent is a document, or node
            // is a doctype and parent is not a document..."
            NodeType::Text(_) if matches!(parent_type, NodeType::Document) => Err(
                DomError::HierarchyRequest("text cannot be a child of a document"),
            ),
            NodeType::DocumentType(_) if !matches!(parent_type, NodeType::Document) => Err(
                DomError::HierarchyRequest("doctype must be a child of a document"),
            ),
            NodeType::Element(_) if matches!(parent_type, NodeType::Document) => {
                let has_element = self
                    .children(parent)
                    .iter()
                    .any(|&c| c != node && self.as_element(c).is_some());
                if has_element {
                    Err(DomError::HierarchyRequest("document already has an element"))
                } else {
                    Ok(())
                }
            }
            _ => Ok(()),
        }
    }

    // ========== navigation ==========

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Get the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    /// Get the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    /// [§ 4.2.1 Index](https://dom.spec.whatwg.org/#concept-tree-index)
    ///
    /// "The index of an object is its number of preceding siblings, or 0 if it has none."
    #[must_use]
    pub fn index_of(&self, id: NodeId) -> usize {
        self.parent(id)
            .and_then(|p| self.index_of_child(p, id))
            .unwrap_or(0)
    }

    fn index_of_child(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.children(parent).iter().position(|&c| c == child)
    }

    /// Child of `id` at `index`, if any.
    #[must_use]
    pub fn child_at(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.children(id).get(index).copied()
    }

    /// Get the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_of_child(parent, id)?;
        self.child_at(parent, index + 1)
    }

    /// Get the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_of_child(parent, id)?;
        index.checked_sub(1).and_then(|i| self.child_at(parent, i))
    }

    /// [§ 4.2.6 Descendant](https://dom.spec.whatwg.org/#concept-tree-descendant)
    ///
    /// Check if `descendant` is a descendant of `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(descendant).any(|id| id == ancestor)
    }

    /// "An inclusive ancestor is an object or one of its ancestors."
    #[must_use]
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        ancestor == node || self.is_descendant_of(node, ancestor)
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Iterate over preceding siblings (from immediately before to first child).
    #[must_use]
    pub fn preceding_siblings(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let siblings = self.parent(id).map_or(&[][..], |p| self.children(p));
        let index = siblings.iter().position(|&c| c == id).unwrap_or(0);
        siblings[..index].iter().rev().copied()
    }

    /// Iterate over following siblings (from immediately after to last child).
    #[must_use]
    pub fn following_siblings(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let siblings = self.parent(id).map_or(&[][..], |p| self.children(p));
        let start = siblings
            .iter()
            .position(|&c| c == id)
            .map_or(siblings.len(), |i| i + 1);
        siblings[start..].iter().copied()
    }

    /// Iterate over the descendants of `id` in tree order (preorder), not
    /// including `id` itself.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> DescendantIterator<'_> {
        let mut stack: Vec<NodeId> = self.children(id).to_vec();
        stack.reverse();
        DescendantIterator { tree: self, stack }
    }

    /// [§ 4.2 Root](https://dom.spec.whatwg.org/#concept-tree-root)
    ///
    /// "The root of an object is itself, if its parent is null, or else it is
    /// the root of its parent."
    #[must_use]
    pub fn root_of(&self, id: NodeId) -> NodeId {
        self.ancestors(id).last().unwrap_or(id)
    }

    /// [§ 4.2 Tree order](https://dom.spec.whatwg.org/#concept-tree-order)
    ///
    /// "An object A is preceding an object B if A and B are in the same tree
    /// and A comes before B in tree order."
    ///
    /// Returns `None` when the two nodes live in different trees.
    #[must_use]
    pub fn tree_order(&self, a: NodeId, b: NodeId) -> Option<Ordering> {
        if a == b {
            return Some(Ordering::Equal);
        }
        let path_a = self.path_from_root(a);
        let path_b = self.path_from_root(b);
        if path_a.first() != path_b.first() {
            return None;
        }

        let shared = path_a
            .iter()
            .zip(&path_b)
            .take_while(|(x, y)| x == y)
            .count();
        match (path_a.get(shared), path_b.get(shared)) {
            // One path is a prefix of the other: the ancestor comes first.
            (None, _) => Some(Ordering::Less),
            (_, None) => Some(Ordering::Greater),
            (Some(&x), Some(&y)) => Some(self.index_of(x).cmp(&self.index_of(y))),
        }
    }

    fn path_from_root(&self, id: NodeId) -> Vec<NodeId> {
        let mut path: Vec<NodeId> = self.ancestors(id).collect();
        path.reverse();
        path.push(id);
        path
    }

    // ========== typed access ==========

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        match self.node_type(id)? {
            NodeType::Element(data) => Some(data),
            _ => None,
        }
    }

    /// Get mutable element data if this node is an element.
    pub fn as_element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match &mut self.get_mut(id)?.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        }
    }

    /// Get text content if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        match self.node_type(id)? {
            NodeType::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Tag name of an element node.
    #[must_use]
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.as_element(id).map(|e| e.tag_name.as_str())
    }

    /// True if `id` is an element with local name `tag`.
    #[must_use]
    pub fn is_element_named(&self, id: NodeId, tag: &str) -> bool {
        self.tag_name(id) == Some(tag)
    }

    /// [§ 4.4 textContent](https://dom.spec.whatwg.org/#dom-node-textcontent)
    ///
    /// Concatenation of all Text descendants (or the data of a character
    /// data node).
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        match self.node_type(id) {
            Some(NodeType::Text(s) | NodeType::Comment(s)) => s.clone(),
            _ => self
                .descendants(id)
                .filter_map(|d| self.as_text(d))
                .collect(),
        }
    }

    /// [§ 4.2 Length](https://dom.spec.whatwg.org/#concept-node-length)
    ///
    /// Doctypes have length 0, character data its data length (in scalar
    /// values), every other node its number of children.
    #[must_use]
    pub fn node_length(&self, id: NodeId) -> usize {
        match self.node_type(id) {
            Some(NodeType::DocumentType(_)) | None => 0,
            Some(NodeType::Text(s) | NodeType::Comment(s)) => s.chars().count(),
            Some(_) => self.children(id).len(),
        }
    }

    /// [§ 3.1.1 The document element](https://html.spec.whatwg.org/multipage/dom.html#the-html-element-2)
    ///
    /// "The document element of a document is the element whose parent is that
    /// document, if it exists; otherwise null."
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(NodeId::ROOT)
            .iter()
            .find(|&&id| self.as_element(id).is_some())
            .copied()
    }

    /// The `head` child of the document element.
    #[must_use]
    pub fn head(&self) -> Option<NodeId> {
        let html = self.document_element()?;
        self.children(html)
            .iter()
            .find(|&&id| self.is_element_named(id, "head"))
            .copied()
    }

    /// [§ 3.1.3 The body element](https://html.spec.whatwg.org/multipage/dom.html#the-body-element-2)
    ///
    /// "The body element of a document is the first of the html element's children
    /// that is either a body element or a frameset element, or null if there is
    /// no such element."
    #[must_use]
    pub fn body(&self) -> Option<NodeId> {
        let html = self.document_element()?;
        self.children(html)
            .iter()
            .find(|&&id| self.is_element_named(id, "body") || self.is_element_named(id, "frameset"))
            .copied()
    }

    // ========== cloning and character data ==========

    /// [§ 4.4 Clone a node](https://dom.spec.whatwg.org/#concept-node-clone)
    ///
    /// Returns a detached copy of `id`; with `deep` the whole subtree is
    /// copied.
    ///
    /// # Errors
    /// `NotSupported` when asked to clone the document node, which the arena
    /// reserves for index 0.
    pub fn clone_node(&mut self, id: NodeId, deep: bool) -> Result<NodeId, DomError> {
        let node_type = match self.node_type(id) {
            Some(NodeType::Document) => {
                return Err(DomError::NotSupported("cloning the document node"));
            }
            Some(node_type) => node_type.clone(),
            None => return Err(DomError::NotFound("node")),
        };
        let copy = self.alloc(node_type);
        if deep {
            for child in self.children(id).to_vec() {
                let child_copy = self.clone_node(child, true)?;
                self.append_child(copy, child_copy);
            }
        }
        Ok(copy)
    }

    /// Data of a Text or Comment node.
    #[must_use]
    pub fn character_data(&self, id: NodeId) -> Option<&str> {
        match self.node_type(id)? {
            NodeType::Text(s) | NodeType::Comment(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// [§ 4.10 Substring data](https://dom.spec.whatwg.org/#concept-cd-substring)
    ///
    /// # Errors
    /// `InvalidNodeType` if `id` is not character data, `IndexSize` if
    /// `offset` is past the end of the data.
    pub fn substring_data(&self, id: NodeId, offset: usize, count: usize) -> Result<String, DomError> {
        let data = self
            .character_data(id)
            .ok_or(DomError::InvalidNodeType("not a character data node"))?;
        let length = data.chars().count();
        if offset > length {
            return Err(DomError::IndexSize { offset, length });
        }
        Ok(data.chars().skip(offset).take(count).collect())
    }

    /// [§ 4.10 Replace data](https://dom.spec.whatwg.org/#concept-cd-replace)
    ///
    /// "If offset plus count is greater than length, then set count to length
    /// minus offset."
    ///
    /// # Errors
    /// Same as [`DomTree::substring_data`].
    pub fn replace_data(
        &mut self,
        id: NodeId,
        offset: usize,
        count: usize,
        replacement: &str,
    ) -> Result<(), DomError> {
        let Some(Node {
            node_type: NodeType::Text(data) | NodeType::Comment(data),
            ..
        }) = self.get_mut(id)
        else {
            return Err(DomError::InvalidNodeType("not a character data node"));
        };
        let length = data.chars().count();
        if offset > length {
            return Err(DomError::IndexSize { offset, length });
        }
        let end = offset + count.min(length - offset);
        let mut rebuilt: String = data.chars().take(offset).collect();
        rebuilt.push_str(replacement);
        rebuilt.extend(data.chars().skip(end));
        *data = rebuilt;
        Ok(())
    }

    /// [§ 4.11 Split a Text node](https://dom.spec.whatwg.org/#concept-text-split)
    ///
    /// Splits `id` at `offset`; the tail becomes a new Text node inserted
    /// right after `id` (when `id` has a parent). Returns the new node.
    ///
    /// # Errors
    /// `InvalidNodeType` if `id` is not Text, `IndexSize` for a bad offset.
    pub fn split_text(&mut self, id: NodeId, offset: usize) -> Result<NodeId, DomError> {
        if self.as_text(id).is_none() {
            return Err(DomError::InvalidNodeType("only text nodes can be split"));
        }
        let length = self.node_length(id);
        let tail = self.substring_data(id, offset, length.saturating_sub(offset))?;
        let new_node = self.alloc(NodeType::Text(tail));
        if let Some(parent) = self.parent(id) {
            let after = self.next_sibling(id);
            self.insert_before(parent, new_node, after);
        }
        self.replace_data(id, offset, length - offset, "")?;
        Ok(new_node)
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Preorder iterator over the descendants of a node.
pub struct DescendantIterator<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for DescendantIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
