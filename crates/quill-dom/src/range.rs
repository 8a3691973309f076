//! [§ 5 Ranges](https://dom.spec.whatwg.org/#ranges)
//!
//! A [`Range`] is a pair of boundary points over a [`DomTree`]. Ranges do
//! not borrow the tree: every operation takes the tree it applies to, which
//! keeps the arena free for other mutation between calls.
//!
//! Ranges are not live. Mutations performed through a range leave its
//! boundary points where the standard says they end up; mutations made
//! directly on the tree do not adjust existing ranges.

use std::cmp::Ordering;

use crate::{DomError, DomTree, NodeId, NodeType};

/// [§ 5.2 Boundary point](https://dom.spec.whatwg.org/#concept-range-bp)
///
/// "A boundary point is a tuple consisting of a node (a node) and an offset
/// (a non-negative integer)."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryPoint {
    /// The container node.
    pub node: NodeId,
    /// Offset into the container: a child index, or a character offset for
    /// character data.
    pub offset: usize,
}

impl BoundaryPoint {
    /// Create a boundary point.
    #[must_use]
    pub const fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }

    /// [§ 5.2](https://dom.spec.whatwg.org/#concept-range-bp-position)
    ///
    /// Position of `self` relative to `other` in tree order.
    ///
    /// Returns `None` when the two points are in different trees.
    #[must_use]
    pub fn position(&self, tree: &DomTree, other: &Self) -> Option<Ordering> {
        // "If nodeA is nodeB, then return equal if offsetA is offsetB, before
        // if offsetA is less than offsetB, and after if offsetA is greater."
        if self.node == other.node {
            return Some(self.offset.cmp(&other.offset));
        }

        match tree.tree_order(self.node, other.node)? {
            // "If nodeA is following nodeB, then if the position of (nodeB,
            // offsetB) relative to (nodeA, offsetA) is before, return after,
            // and if it is after, return before."
            Ordering::Greater => other.position(tree, self).map(Ordering::reverse),
            _ => {
                // "If nodeA is an ancestor of nodeB: let child be nodeB; while
                // child is not a child of nodeA, set child to its parent. If
                // child's index is less than offsetA, then return after."
                if tree.is_descendant_of(other.node, self.node) {
                    let mut child = other.node;
                    while let Some(parent) = tree.parent(child)
                        && parent != self.node
                    {
                        child = parent;
                    }
                    if tree.index_of(child) < self.offset {
                        return Some(Ordering::Greater);
                    }
                }
                // "Return before."
                Some(Ordering::Less)
            }
        }
    }
}

/// How two ranges are compared by [`Range::compare_boundary_points`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HowToCompare {
    /// This range's start against the source range's start.
    StartToStart,
    /// This range's end against the source range's start.
    StartToEnd,
    /// This range's end against the source range's end.
    EndToEnd,
    /// This range's start against the source range's end.
    EndToStart,
}

/// [§ 5.5 Interface Range](https://dom.spec.whatwg.org/#interface-range)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Range {
    start: BoundaryPoint,
    end: BoundaryPoint,
}

impl Range {
    /// "The new Range() constructor steps are to set this's start and end to
    /// (current global object's associated Document, 0)."
    #[must_use]
    pub const fn new(document: NodeId) -> Self {
        let point = BoundaryPoint::new(document, 0);
        Self {
            start: point,
            end: point,
        }
    }

    /// Start boundary point.
    #[must_use]
    pub const fn start(&self) -> BoundaryPoint {
        self.start
    }

    /// End boundary point.
    #[must_use]
    pub const fn end(&self) -> BoundaryPoint {
        self.end
    }

    /// "A range is collapsed if its start node is its end node and its start
    /// offset is its end offset."
    #[must_use]
    pub fn collapsed(&self) -> bool {
        self.start == self.end
    }

    /// [§ 5.5](https://dom.spec.whatwg.org/#dom-range-clonerange)
    ///
    /// A new range with the same boundary points.
    #[must_use]
    pub const fn clone_range(&self) -> Self {
        Self {
            start: self.start,
            end: self.end,
        }
    }

    /// "The root of a live range is the root of its start node."
    #[must_use]
    pub fn root(&self, tree: &DomTree) -> NodeId {
        tree.root_of(self.start.node)
    }

    /// [§ 5.5](https://dom.spec.whatwg.org/#dom-range-commonancestorcontainer)
    ///
    /// The deepest node that is an inclusive ancestor of both boundary nodes.
    #[must_use]
    pub fn common_ancestor_container(&self, tree: &DomTree) -> NodeId {
        let mut container = self.start.node;
        while !tree.is_inclusive_ancestor(container, self.end.node) {
            match tree.parent(container) {
                Some(parent) => container = parent,
                None => break,
            }
        }
        container
    }

    // ========== setting boundaries ==========

    fn validate_point(tree: &DomTree, node: NodeId, offset: usize) -> Result<(), DomError> {
        match tree.node_type(node) {
            None => return Err(DomError::NotFound("boundary node")),
            Some(NodeType::DocumentType(_)) => {
                return Err(DomError::InvalidNodeType("boundary node is a doctype"));
            }
            Some(_) => {}
        }
        let length = tree.node_length(node);
        if offset > length {
            return Err(DomError::IndexSize { offset, length });
        }
        Ok(())
    }

    fn is_before(tree: &DomTree, a: &BoundaryPoint, b: &BoundaryPoint) -> bool {
        a.position(tree, b) == Some(Ordering::Less)
    }

    fn is_after(tree: &DomTree, a: &BoundaryPoint, b: &BoundaryPoint) -> bool {
        a.position(tree, b) == Some(Ordering::Greater)
    }

    /// [§ 5.5 Set the start](https://dom.spec.whatwg.org/#concept-range-bp-set)
    ///
    /// "If range's root is not equal to node's root, or if bp is after the
    /// range's end, set range's end to bp." A start that would pass the end
    /// therefore collapses the range.
    ///
    /// # Errors
    /// `InvalidNodeType` for a doctype, `IndexSize` for an offset past the
    /// node's length.
    pub fn set_start(&mut self, tree: &DomTree, node: NodeId, offset: usize) -> Result<(), DomError> {
        Self::validate_point(tree, node, offset)?;
        let bp = BoundaryPoint::new(node, offset);
        if self.root(tree) != tree.root_of(node) || Self::is_after(tree, &bp, &self.end) {
            self.end = bp;
        }
        self.start = bp;
        Ok(())
    }

    /// Set the end boundary; an end before the start collapses the range.
    ///
    /// # Errors
    /// Same as [`Range::set_start`].
    pub fn set_end(&mut self, tree: &DomTree, node: NodeId, offset: usize) -> Result<(), DomError> {
        Self::validate_point(tree, node, offset)?;
        let bp = BoundaryPoint::new(node, offset);
        if self.root(tree) != tree.root_of(node) || Self::is_before(tree, &bp, &self.start) {
            self.start = bp;
        }
        self.end = bp;
        Ok(())
    }

    fn parent_and_index(tree: &DomTree, node: NodeId) -> Result<(NodeId, usize), DomError> {
        let parent = tree
            .parent(node)
            .ok_or(DomError::InvalidNodeType("node has no parent"))?;
        Ok((parent, tree.index_of(node)))
    }

    /// Start the range just before `node`.
    ///
    /// # Errors
    /// `InvalidNodeType` if `node` has no parent.
    pub fn set_start_before(&mut self, tree: &DomTree, node: NodeId) -> Result<(), DomError> {
        let (parent, index) = Self::parent_and_index(tree, node)?;
        self.set_start(tree, parent, index)
    }

    /// Start the range just after `node`.
    ///
    /// # Errors
    /// `InvalidNodeType` if `node` has no parent.
    pub fn set_start_after(&mut self, tree: &DomTree, node: NodeId) -> Result<(), DomError> {
        let (parent, index) = Self::parent_and_index(tree, node)?;
        self.set_start(tree, parent, index + 1)
    }

    /// End the range just before `node`.
    ///
    /// # Errors
    /// `InvalidNodeType` if `node` has no parent.
    pub fn set_end_before(&mut self, tree: &DomTree, node: NodeId) -> Result<(), DomError> {
        let (parent, index) = Self::parent_and_index(tree, node)?;
        self.set_end(tree, parent, index)
    }

    /// End the range just after `node`.
    ///
    /// # Errors
    /// `InvalidNodeType` if `node` has no parent.
    pub fn set_end_after(&mut self, tree: &DomTree, node: NodeId) -> Result<(), DomError> {
        let (parent, index) = Self::parent_and_index(tree, node)?;
        self.set_end(tree, parent, index + 1)
    }

    /// Collapse onto the start (or the end when `to_start` is false).
    pub const fn collapse(&mut self, to_start: bool) {
        if to_start {
            self.end = self.start;
        } else {
            self.start = self.end;
        }
    }

    /// [§ 5.5 Select](https://dom.spec.whatwg.org/#concept-range-select)
    ///
    /// # Errors
    /// `InvalidNodeType` if `node` has no parent.
    pub fn select_node(&mut self, tree: &DomTree, node: NodeId) -> Result<(), DomError> {
        let (parent, index) = Self::parent_and_index(tree, node)?;
        self.start = BoundaryPoint::new(parent, index);
        self.end = BoundaryPoint::new(parent, index + 1);
        Ok(())
    }

    /// Select everything inside `node`.
    ///
    /// # Errors
    /// `InvalidNodeType` if `node` is a doctype.
    pub fn select_node_contents(&mut self, tree: &DomTree, node: NodeId) -> Result<(), DomError> {
        if matches!(tree.node_type(node), Some(NodeType::DocumentType(_))) {
            return Err(DomError::InvalidNodeType("cannot select doctype contents"));
        }
        self.start = BoundaryPoint::new(node, 0);
        self.end = BoundaryPoint::new(node, tree.node_length(node));
        Ok(())
    }

    // ========== comparison ==========

    /// [§ 5.5](https://dom.spec.whatwg.org/#dom-range-compareboundarypoints)
    ///
    /// # Errors
    /// `WrongDocument` if the two ranges have different roots.
    pub fn compare_boundary_points(
        &self,
        tree: &DomTree,
        how: HowToCompare,
        source: &Self,
    ) -> Result<Ordering, DomError> {
        if self.root(tree) != source.root(tree) {
            return Err(DomError::WrongDocument);
        }
        let (this_point, other_point) = match how {
            HowToCompare::StartToStart => (self.start, source.start),
            HowToCompare::StartToEnd => (self.end, source.start),
            HowToCompare::EndToEnd => (self.end, source.end),
            HowToCompare::EndToStart => (self.start, source.end),
        };
        this_point
            .position(tree, &other_point)
            .ok_or(DomError::WrongDocument)
    }

    /// [§ 5.5](https://dom.spec.whatwg.org/#dom-range-comparepoint)
    ///
    /// `Less` if the point is before the range, `Greater` if after it,
    /// `Equal` if inside.
    ///
    /// # Errors
    /// `WrongDocument` for a point in another tree, then the usual boundary
    /// validation errors.
    pub fn compare_point(&self, tree: &DomTree, node: NodeId, offset: usize) -> Result<Ordering, DomError> {
        if tree.root_of(node) != self.root(tree) {
            return Err(DomError::WrongDocument);
        }
        Self::validate_point(tree, node, offset)?;
        let bp = BoundaryPoint::new(node, offset);
        if Self::is_before(tree, &bp, &self.start) {
            Ok(Ordering::Less)
        } else if Self::is_after(tree, &bp, &self.end) {
            Ok(Ordering::Greater)
        } else {
            Ok(Ordering::Equal)
        }
    }

    /// [§ 5.5](https://dom.spec.whatwg.org/#dom-range-ispointinrange)
    ///
    /// # Errors
    /// Boundary validation errors for a point in the range's own tree.
    pub fn is_point_in_range(&self, tree: &DomTree, node: NodeId, offset: usize) -> Result<bool, DomError> {
        if tree.root_of(node) != self.root(tree) {
            return Ok(false);
        }
        Self::validate_point(tree, node, offset)?;
        let bp = BoundaryPoint::new(node, offset);
        Ok(!Self::is_before(tree, &bp, &self.start) && !Self::is_after(tree, &bp, &self.end))
    }

    /// [§ 5.5](https://dom.spec.whatwg.org/#dom-range-intersectsnode)
    ///
    /// True iff the node's extent overlaps the range.
    #[must_use]
    pub fn intersects_node(&self, tree: &DomTree, node: NodeId) -> bool {
        if tree.root_of(node) != self.root(tree) {
            return false;
        }
        let Some(parent) = tree.parent(node) else {
            return true;
        };
        let offset = tree.index_of(node);
        Self::is_before(tree, &BoundaryPoint::new(parent, offset), &self.end)
            && Self::is_after(tree, &BoundaryPoint::new(parent, offset + 1), &self.start)
    }

    /// [§ 5.5 Contained](https://dom.spec.whatwg.org/#contained)
    ///
    /// "A node node is contained in a live range range if node's root is
    /// range's root, and (node, 0) is after range's start, and (node, node's
    /// length) is before range's end."
    #[must_use]
    pub fn contains_node(&self, tree: &DomTree, node: NodeId) -> bool {
        tree.root_of(node) == self.root(tree)
            && Self::is_after(tree, &BoundaryPoint::new(node, 0), &self.start)
            && Self::is_before(
                tree,
                &BoundaryPoint::new(node, tree.node_length(node)),
                &self.end,
            )
    }

    /// [§ 5.5 Partially contained](https://dom.spec.whatwg.org/#partially-contained)
    ///
    /// "A node is partially contained in a live range if it's an inclusive
    /// ancestor of the live range's start node but not its end node, or vice
    /// versa."
    #[must_use]
    pub fn partially_contains_node(&self, tree: &DomTree, node: NodeId) -> bool {
        tree.is_inclusive_ancestor(node, self.start.node)
            != tree.is_inclusive_ancestor(node, self.end.node)
    }

    // ========== content algorithms ==========

    /// Children of the common ancestor split into the first partially
    /// contained child, the contained children, and the last partially
    /// contained child.
    fn partition(&self, tree: &DomTree) -> Result<Partition, DomError> {
        let common = self.common_ancestor_container(tree);

        let first_partial = if tree.is_inclusive_ancestor(self.start.node, self.end.node) {
            None
        } else {
            tree.children(common)
                .iter()
                .copied()
                .find(|&c| self.partially_contains_node(tree, c))
        };
        let last_partial = if tree.is_inclusive_ancestor(self.end.node, self.start.node) {
            None
        } else {
            tree.children(common)
                .iter()
                .rev()
                .copied()
                .find(|&c| self.partially_contains_node(tree, c))
        };
        let contained: Vec<NodeId> = tree
            .children(common)
            .iter()
            .copied()
            .filter(|&c| self.contains_node(tree, c))
            .collect();

        if contained
            .iter()
            .any(|&c| matches!(tree.node_type(c), Some(NodeType::DocumentType(_))))
        {
            return Err(DomError::HierarchyRequest("range contains a doctype"));
        }

        Ok(Partition {
            first_partial,
            contained,
            last_partial,
        })
    }

    /// The point both boundaries collapse to after extraction or deletion.
    fn collapse_point(&self, tree: &DomTree) -> BoundaryPoint {
        if tree.is_inclusive_ancestor(self.start.node, self.end.node) {
            return self.start;
        }
        let mut reference = self.start.node;
        while let Some(parent) = tree.parent(reference)
            && !tree.is_inclusive_ancestor(parent, self.end.node)
        {
            reference = parent;
        }
        let parent = tree.parent(reference).unwrap_or(reference);
        BoundaryPoint::new(parent, tree.index_of(reference) + 1)
    }

    /// Clone a character data node, keeping only `[offset, offset + count)`.
    fn clone_character_slice(
        tree: &mut DomTree,
        node: NodeId,
        offset: usize,
        count: usize,
    ) -> Result<NodeId, DomError> {
        let data = tree.substring_data(node, offset, count)?;
        let copy = tree.clone_node(node, false)?;
        let length = tree.node_length(copy);
        tree.replace_data(copy, 0, length, &data)?;
        Ok(copy)
    }

    fn sub_range(start: BoundaryPoint, end: BoundaryPoint) -> Self {
        Self { start, end }
    }

    /// [§ 5.5 Clone the contents](https://dom.spec.whatwg.org/#concept-range-clone)
    ///
    /// Returns a new `DocumentFragment` holding copies of everything in the
    /// range. Text at the edges is cut at the boundary offsets and partially
    /// contained elements are cloned shallowly with their in-range content
    /// cloned recursively.
    ///
    /// # Errors
    /// `HierarchyRequest` if a doctype is contained in the range.
    pub fn clone_contents(&self, tree: &mut DomTree) -> Result<NodeId, DomError> {
        let fragment = tree.alloc(NodeType::DocumentFragment);
        if self.collapsed() {
            return Ok(fragment);
        }

        let (start, end) = (self.start, self.end);
        if start.node == end.node && Self::is_character_data(tree, start.node) {
            let clone =
                Self::clone_character_slice(tree, start.node, start.offset, end.offset - start.offset)?;
            tree.append_child(fragment, clone);
            return Ok(fragment);
        }

        let Partition {
            first_partial,
            contained,
            last_partial,
        } = self.partition(tree)?;

        if let Some(first) = first_partial {
            if Self::is_character_data(tree, first) {
                let length = tree.node_length(start.node);
                let clone = Self::clone_character_slice(
                    tree,
                    start.node,
                    start.offset,
                    length - start.offset,
                )?;
                tree.append_child(fragment, clone);
            } else {
                let clone = tree.clone_node(first, false)?;
                tree.append_child(fragment, clone);
                let sub = Self::sub_range(start, BoundaryPoint::new(first, tree.node_length(first)));
                let sub_fragment = sub.clone_contents(tree)?;
                tree.move_children(sub_fragment, clone);
            }
        }

        for child in contained {
            let clone = tree.clone_node(child, true)?;
            tree.append_child(fragment, clone);
        }

        if let Some(last) = last_partial {
            if Self::is_character_data(tree, last) {
                let clone = Self::clone_character_slice(tree, end.node, 0, end.offset)?;
                tree.append_child(fragment, clone);
            } else {
                let clone = tree.clone_node(last, false)?;
                tree.append_child(fragment, clone);
                let sub = Self::sub_range(BoundaryPoint::new(last, 0), end);
                let sub_fragment = sub.clone_contents(tree)?;
                tree.move_children(sub_fragment, clone);
            }
        }

        Ok(fragment)
    }

    /// [§ 5.5 Extract](https://dom.spec.whatwg.org/#concept-range-extract)
    ///
    /// Moves the range's contents into a new `DocumentFragment`, splitting
    /// character data at the boundaries, then collapses the range.
    ///
    /// # Errors
    /// `HierarchyRequest` if a doctype is contained in the range.
    pub fn extract_contents(&mut self, tree: &mut DomTree) -> Result<NodeId, DomError> {
        let fragment = tree.alloc(NodeType::DocumentFragment);
        if self.collapsed() {
            return Ok(fragment);
        }

        let (start, end) = (self.start, self.end);
        if start.node == end.node && Self::is_character_data(tree, start.node) {
            let count = end.offset - start.offset;
            let clone = Self::clone_character_slice(tree, start.node, start.offset, count)?;
            tree.append_child(fragment, clone);
            tree.replace_data(start.node, start.offset, count, "")?;
            self.end = start;
            return Ok(fragment);
        }

        let Partition {
            first_partial,
            contained,
            last_partial,
        } = self.partition(tree)?;
        let new_point = self.collapse_point(tree);

        if let Some(first) = first_partial {
            if Self::is_character_data(tree, first) {
                let count = tree.node_length(start.node) - start.offset;
                let clone = Self::clone_character_slice(tree, start.node, start.offset, count)?;
                tree.append_child(fragment, clone);
                tree.replace_data(start.node, start.offset, count, "")?;
            } else {
                let clone = tree.clone_node(first, false)?;
                tree.append_child(fragment, clone);
                let mut sub = Self::sub_range(start, BoundaryPoint::new(first, tree.node_length(first)));
                let sub_fragment = sub.extract_contents(tree)?;
                tree.move_children(sub_fragment, clone);
            }
        }

        for child in contained {
            tree.append_child(fragment, child);
        }

        if let Some(last) = last_partial {
            if Self::is_character_data(tree, last) {
                let clone = Self::clone_character_slice(tree, end.node, 0, end.offset)?;
                tree.append_child(fragment, clone);
                tree.replace_data(end.node, 0, end.offset, "")?;
            } else {
                let clone = tree.clone_node(last, false)?;
                tree.append_child(fragment, clone);
                let mut sub = Self::sub_range(BoundaryPoint::new(last, 0), end);
                let sub_fragment = sub.extract_contents(tree)?;
                tree.move_children(sub_fragment, clone);
            }
        }

        self.start = new_point;
        self.end = new_point;
        Ok(fragment)
    }

    /// [§ 5.5](https://dom.spec.whatwg.org/#dom-range-deletecontents)
    ///
    /// Removes the range's contents from the tree and collapses the range.
    ///
    /// # Errors
    /// Only character data errors, which cannot occur for a valid range.
    pub fn delete_contents(&mut self, tree: &mut DomTree) -> Result<(), DomError> {
        if self.collapsed() {
            return Ok(());
        }

        let (start, end) = (self.start, self.end);
        if start.node == end.node && Self::is_character_data(tree, start.node) {
            tree.replace_data(start.node, start.offset, end.offset - start.offset, "")?;
            self.end = start;
            return Ok(());
        }

        // "Let nodes to remove be a list of all the nodes that are contained
        // in this, in tree order, omitting any node whose parent is also
        // contained in this."
        let common = self.common_ancestor_container(tree);
        let nodes_to_remove: Vec<NodeId> = tree
            .descendants(common)
            .filter(|&n| self.contains_node(tree, n))
            .filter(|&n| tree.parent(n).is_none_or(|p| !self.contains_node(tree, p)))
            .collect();
        let new_point = self.collapse_point(tree);

        if Self::is_character_data(tree, start.node) {
            let count = tree.node_length(start.node) - start.offset;
            tree.replace_data(start.node, start.offset, count, "")?;
        }
        for node in nodes_to_remove {
            tree.detach(node);
        }
        if Self::is_character_data(tree, end.node) {
            tree.replace_data(end.node, 0, end.offset, "")?;
        }

        self.start = new_point;
        self.end = new_point;
        Ok(())
    }

    /// [§ 5.5 Insert](https://dom.spec.whatwg.org/#concept-range-insert)
    ///
    /// Inserts `node` at the start of the range, splitting a Text start node
    /// at the start offset.
    ///
    /// # Errors
    /// `HierarchyRequest` when the start node cannot take the node (a comment,
    /// a parentless Text node, the node itself) or when pre-insertion
    /// validity fails.
    pub fn insert_node(&mut self, tree: &mut DomTree, node: NodeId) -> Result<(), DomError> {
        let start = self.start;
        let start_is_text = tree.as_text(start.node).is_some();
        if matches!(tree.node_type(start.node), Some(NodeType::Comment(_)))
            || (start_is_text && tree.parent(start.node).is_none())
            || start.node == node
        {
            return Err(DomError::HierarchyRequest("cannot insert at this boundary"));
        }

        let mut reference = if start_is_text {
            Some(start.node)
        } else {
            tree.child_at(start.node, start.offset)
        };
        let parent = match reference {
            Some(r) => tree.parent(r).ok_or(DomError::HierarchyRequest("orphan reference"))?,
            None => start.node,
        };
        tree.ensure_pre_insertion_validity(node, parent, reference)?;

        if start_is_text {
            // Splitting inserts the tail right after the start node, which
            // shifts or moves an end point that sat past the split.
            let text_index = tree.index_of(start.node);
            let split = tree.split_text(start.node, start.offset)?;
            if self.end.node == start.node && self.end.offset > start.offset {
                self.end = BoundaryPoint::new(split, self.end.offset - start.offset);
            } else if self.end.node == parent && self.end.offset > text_index {
                self.end.offset += 1;
            }
            reference = Some(split);
        }
        if reference == Some(node) {
            reference = tree.next_sibling(node);
        }
        if let Some(old_parent) = tree.parent(node) {
            let old_index = tree.index_of(node);
            tree.detach(node);
            for point in [&mut self.start, &mut self.end] {
                if point.node == old_parent && point.offset > old_index {
                    point.offset -= 1;
                }
            }
        }

        let index = reference.map_or_else(|| tree.node_length(parent), |r| tree.index_of(r));
        let count = if matches!(tree.node_type(node), Some(NodeType::DocumentFragment)) {
            tree.children(node).len()
        } else {
            1
        };

        tree.pre_insert(node, parent, reference)?;

        if self.collapsed() {
            self.end = BoundaryPoint::new(parent, index + count);
        } else if self.end.node == parent && self.end.offset > index {
            self.end.offset += count;
        }
        Ok(())
    }

    /// [§ 5.5](https://dom.spec.whatwg.org/#dom-range-surroundcontents)
    ///
    /// Moves the range's contents into `new_parent`, inserts `new_parent` at
    /// the range's start and selects it.
    ///
    /// # Errors
    /// `InvalidState` when a non-Text node is partially contained;
    /// `InvalidNodeType` when `new_parent` is a document, doctype or
    /// fragment.
    pub fn surround_contents(&mut self, tree: &mut DomTree, new_parent: NodeId) -> Result<(), DomError> {
        let common = self.common_ancestor_container(tree);
        let partial_non_text = tree
            .descendants(common)
            .any(|n| tree.as_text(n).is_none() && self.partially_contains_node(tree, n));
        if partial_non_text {
            return Err(DomError::InvalidState("a non-text node is partially contained"));
        }
        if matches!(
            tree.node_type(new_parent),
            Some(NodeType::Document | NodeType::DocumentType(_) | NodeType::DocumentFragment)
        ) {
            return Err(DomError::InvalidNodeType("cannot surround with this node"));
        }

        let fragment = self.extract_contents(tree)?;
        tree.remove_all_children(new_parent);
        self.insert_node(tree, new_parent)?;
        tree.pre_insert(fragment, new_parent, None)?;
        self.select_node(tree, new_parent)
    }

    /// [§ 5.5 Stringifier](https://dom.spec.whatwg.org/#dom-range-stringifier)
    ///
    /// Text of every Text node in the range, cut at the boundaries.
    #[must_use]
    pub fn to_string(&self, tree: &DomTree) -> String {
        let (start, end) = (self.start, self.end);
        if start.node == end.node
            && let Some(text) = tree.as_text(start.node)
        {
            return text
                .chars()
                .skip(start.offset)
                .take(end.offset.saturating_sub(start.offset))
                .collect();
        }

        let mut s = String::new();
        if let Some(text) = tree.as_text(start.node) {
            s.extend(text.chars().skip(start.offset));
        }
        let common = self.common_ancestor_container(tree);
        for node in tree.descendants(common) {
            if let Some(text) = tree.as_text(node)
                && self.contains_node(tree, node)
            {
                s.push_str(text);
            }
        }
        if let Some(text) = tree.as_text(end.node) {
            s.extend(text.chars().take(end.offset));
        }
        s
    }

    fn is_character_data(tree: &DomTree, node: NodeId) -> bool {
        tree.node_type(node).is_some_and(NodeType::is_character_data)
    }
}

struct Partition {
    first_partial: Option<NodeId>,
    contained: Vec<NodeId>,
    last_partial: Option<NodeId>,
}
