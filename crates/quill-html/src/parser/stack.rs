//! [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)

use core::ops::Deref;

use quill_dom::NodeId;

use super::core::{HTMLParser, InsertionMode};
use super::elements::{Scope, has_implied_end_tag, has_implied_end_tag_thoroughly};

/// What a button-scope check for `p` needs to know about an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Paragraph,
    ButtonScopeBoundary,
    Other,
}

impl EntryKind {
    fn of(tag_name: &str) -> Self {
        if tag_name == "p" {
            Self::Paragraph
        } else if Scope::Button.is_boundary(tag_name) {
            Self::ButtonScopeBoundary
        } else {
            Self::Other
        }
    }
}

/// [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
///
/// The bottommost node is the last entry. Positions of open `p` elements and
/// of button-scope boundaries are kept alongside the nodes, so "has a p
/// element in button scope" does not walk the stack. Most block start tags
/// ask that question.
#[derive(Debug, Default)]
pub(super) struct StackOfOpenElements {
    nodes: Vec<NodeId>,
    kinds: Vec<EntryKind>,
    paragraphs: Vec<usize>,
    button_scope_boundaries: Vec<usize>,
}

impl StackOfOpenElements {
    pub(super) fn push(&mut self, node: NodeId, tag_name: &str) {
        let kind = EntryKind::of(tag_name);
        match kind {
            EntryKind::Paragraph => self.paragraphs.push(self.nodes.len()),
            EntryKind::ButtonScopeBoundary => self.button_scope_boundaries.push(self.nodes.len()),
            EntryKind::Other => {}
        }
        self.nodes.push(node);
        self.kinds.push(kind);
    }

    pub(super) fn pop(&mut self) -> Option<NodeId> {
        let node = self.nodes.pop()?;
        let _ = self.kinds.pop();
        self.forget_positions_from(self.nodes.len());
        Some(node)
    }

    pub(super) fn truncate(&mut self, len: usize) {
        self.nodes.truncate(len);
        self.kinds.truncate(len);
        self.forget_positions_from(len);
    }

    pub(super) fn retain(&mut self, mut keep: impl FnMut(NodeId) -> bool) {
        let (nodes, kinds): (Vec<NodeId>, Vec<EntryKind>) = self
            .nodes
            .iter()
            .zip(&self.kinds)
            .filter(|&(&node, _)| keep(node))
            .map(|(&node, &kind)| (node, kind))
            .unzip();
        self.nodes = nodes;
        self.kinds = kinds;
        self.reindex();
    }

    pub(super) fn remove(&mut self, index: usize) -> NodeId {
        let node = self.nodes.remove(index);
        let _ = self.kinds.remove(index);
        self.reindex();
        node
    }

    pub(super) fn insert(&mut self, index: usize, node: NodeId, tag_name: &str) {
        self.nodes.insert(index, node);
        self.kinds.insert(index, EntryKind::of(tag_name));
        self.reindex();
    }

    /// Swap the node at `index` for `node`, keeping its position.
    pub(super) fn replace(&mut self, index: usize, node: NodeId, tag_name: &str) {
        if let (Some(slot), Some(kind)) = (self.nodes.get_mut(index), self.kinds.get_mut(index)) {
            *slot = node;
            *kind = EntryKind::of(tag_name);
            self.reindex();
        }
    }

    /// "has a p element in button scope": the bottommost `p` sits below the
    /// bottommost boundary.
    pub(super) fn has_paragraph_in_button_scope(&self) -> bool {
        match (self.paragraphs.last(), self.button_scope_boundaries.last()) {
            (Some(paragraph), Some(boundary)) => paragraph > boundary,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    fn forget_positions_from(&mut self, len: usize) {
        while self.paragraphs.last().is_some_and(|&index| index >= len) {
            let _ = self.paragraphs.pop();
        }
        while self
            .button_scope_boundaries
            .last()
            .is_some_and(|&index| index >= len)
        {
            let _ = self.button_scope_boundaries.pop();
        }
    }

    fn reindex(&mut self) {
        self.paragraphs.clear();
        self.button_scope_boundaries.clear();
        for (index, kind) in self.kinds.iter().enumerate() {
            match kind {
                EntryKind::Paragraph => self.paragraphs.push(index),
                EntryKind::ButtonScopeBoundary => self.button_scope_boundaries.push(index),
                EntryKind::Other => {}
            }
        }
    }
}

impl Deref for StackOfOpenElements {
    type Target = [NodeId];

    fn deref(&self) -> &[NodeId] {
        &self.nodes
    }
}

impl HTMLParser {
    /// Push `node` so that it becomes the current node.
    pub(super) fn push_open_element(&mut self, node: NodeId) {
        let tag_name = self.tree.tag_name(node).unwrap_or_default();
        self.stack_of_open_elements.push(node, tag_name);
    }

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
    ///
    /// "1. Initialize node to be the current node (the bottommost node of the
    /// stack). 2. If node is the target node, terminate in a match state.
    /// 3. Otherwise, if node is one of the element types in list, terminate
    /// in a failure state. 4. Otherwise, set node to the previous entry in the
    /// stack of open elements and return to step 2."
    fn has_in_scope(&self, scope: Scope, is_target: impl Fn(NodeId, &str) -> bool) -> bool {
        for &id in self.stack_of_open_elements.iter().rev() {
            let tag = self.tag_name_of(id);
            if is_target(id, tag) {
                return true;
            }
            if scope.is_boundary(tag) {
                return false;
            }
        }
        false
    }

    /// "has an element in ... scope" for a tag name.
    pub(super) fn has_element_in_scope(&self, tag_name: &str, scope: Scope) -> bool {
        self.has_in_scope(scope, |_, tag| tag == tag_name)
    }

    /// Scope check for any of several tag names, as used for headings and
    /// table sections.
    pub(super) fn has_any_element_in_scope(&self, tag_names: &[&str], scope: Scope) -> bool {
        self.has_in_scope(scope, |_, tag| tag_names.contains(&tag))
    }

    /// Scope check for one specific node, as used for the form element pointer.
    pub(super) fn has_node_in_scope(&self, node: NodeId, scope: Scope) -> bool {
        self.has_in_scope(scope, |id, _| id == node)
    }

    pub(super) fn stack_contains(&self, tag_name: &str) -> bool {
        self.stack_of_open_elements
            .iter()
            .any(|&id| self.tree.is_element_named(id, tag_name))
    }

    pub(super) fn stack_contains_node(&self, node: NodeId) -> bool {
        self.stack_of_open_elements.contains(&node)
    }

    pub(super) fn remove_from_stack(&mut self, node: NodeId) {
        self.stack_of_open_elements.retain(|id| id != node);
    }

    /// Pop elements until one named `tag_name` has been popped.
    pub(super) fn pop_until(&mut self, tag_name: &str) {
        self.pop_until_one_of(&[tag_name]);
    }

    /// Pop elements until one whose name is in `tag_names` has been popped.
    pub(super) fn pop_until_one_of(&mut self, tag_names: &[&str]) {
        while let Some(id) = self.stack_of_open_elements.pop() {
            if tag_names.contains(&self.tag_name_of(id)) {
                break;
            }
        }
    }

    /// [§ 13.2.6.3 Generate implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
    ///
    /// "while the current node is a dd element, a dt element, an li element,
    /// an optgroup element, an option element, a p element, an rb element, an
    /// rp element, an rt element, or an rtc element, the UA must pop the
    /// current node off the stack of open elements."
    pub(super) fn generate_implied_end_tags(&mut self, except: Option<&str>) {
        loop {
            let tag = self.current_tag_name();
            if !has_implied_end_tag(tag) || except == Some(tag) {
                break;
            }
            let _ = self.stack_of_open_elements.pop();
        }
    }

    /// [§ 13.2.6.3](https://html.spec.whatwg.org/multipage/parsing.html#generate-all-implied-end-tags-thoroughly)
    pub(super) fn generate_all_implied_end_tags_thoroughly(&mut self) {
        while has_implied_end_tag_thoroughly(self.current_tag_name()) {
            let _ = self.stack_of_open_elements.pop();
        }
    }

    /// Pop until the current node is one of `tag_names` (or html/template,
    /// which every table context list includes).
    ///
    /// [§ 13.2.6.4.9](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-context)
    pub(super) fn clear_stack_back_to(&mut self, tag_names: &[&str]) {
        while let Some(id) = self.current_node() {
            let tag = self.tag_name_of(id);
            if tag_names.contains(&tag) || matches!(tag, "html" | "template") {
                break;
            }
            let _ = self.stack_of_open_elements.pop();
        }
    }

    pub(super) fn clear_stack_back_to_table_context(&mut self) {
        self.clear_stack_back_to(&["table"]);
    }

    pub(super) fn clear_stack_back_to_table_body_context(&mut self) {
        self.clear_stack_back_to(&["tbody", "tfoot", "thead"]);
    }

    pub(super) fn clear_stack_back_to_table_row_context(&mut self) {
        self.clear_stack_back_to(&["tr"]);
    }

    /// [§ 13.2.6.4.7 Close a p element](https://html.spec.whatwg.org/multipage/parsing.html#close-a-p-element)
    pub(super) fn close_p_element(&mut self) {
        self.generate_implied_end_tags(Some("p"));
        if !self.current_node_is("p") {
            self.parse_error("p element closed while other elements were open");
        }
        self.pop_until("p");
    }

    /// "If the stack of open elements has a p element in button scope, then
    /// close a p element."
    pub(super) fn close_p_element_in_button_scope(&mut self) {
        if self.stack_of_open_elements.has_paragraph_in_button_scope() {
            self.close_p_element();
        }
    }

    /// [§ 13.2.6.4.15 Close the cell](https://html.spec.whatwg.org/multipage/parsing.html#close-the-cell)
    pub(super) fn close_the_cell(&mut self) {
        // STEP 1: "Generate implied end tags."
        self.generate_implied_end_tags(None);
        // STEP 2: "If the current node is not now a td element or a th element,
        //          then this is a parse error."
        if !matches!(self.current_tag_name(), "td" | "th") {
            self.parse_error("table cell closed while other elements were open");
        }
        // STEP 3: "Pop elements from the stack of open elements stack until a
        //          td element or a th element has been popped from the stack."
        self.pop_until_one_of(&["td", "th"]);
        // STEP 4: "Clear the list of active formatting elements up to the last
        //          marker."
        self.clear_active_formatting_elements_to_last_marker();
        // STEP 5: "Switch the insertion mode to "in row"."
        self.insertion_mode = InsertionMode::InRow;
    }

    /// [§ 13.2.4.1 Reset the insertion mode appropriately](https://html.spec.whatwg.org/multipage/parsing.html#reset-the-insertion-mode-appropriately)
    pub(super) fn reset_insertion_mode_appropriately(&mut self) {
        for index in (0..self.stack_of_open_elements.len()).rev() {
            let mut node = self.stack_of_open_elements[index];
            // "If node is the first node in the stack of open elements, then set
            // last to true, and, if the parser was created as part of the HTML
            // fragment parsing algorithm (fragment case), set node to the
            // context element passed to that algorithm."
            let last = index == 0;
            if last && let Some(context) = self.context_element {
                node = context;
            }

            let mode = match self.tag_name_of(node) {
                "select" => Some(self.select_insertion_mode(index, last)),
                "td" | "th" if !last => Some(InsertionMode::InCell),
                "tr" => Some(InsertionMode::InRow),
                "tbody" | "thead" | "tfoot" => Some(InsertionMode::InTableBody),
                "caption" => Some(InsertionMode::InCaption),
                "colgroup" => Some(InsertionMode::InColumnGroup),
                "table" => Some(InsertionMode::InTable),
                "template" => Some(
                    self.template_insertion_modes
                        .last()
                        .copied()
                        .unwrap_or(InsertionMode::InTemplate),
                ),
                "head" if !last => Some(InsertionMode::InHead),
                "body" => Some(InsertionMode::InBody),
                "frameset" => Some(InsertionMode::InFrameset),
                "html" => Some(if self.head_element_pointer.is_none() {
                    InsertionMode::BeforeHead
                } else {
                    InsertionMode::AfterHead
                }),
                _ if last => Some(InsertionMode::InBody),
                _ => None,
            };

            if let Some(mode) = mode {
                self.insertion_mode = mode;
                return;
            }
        }
        self.insertion_mode = InsertionMode::InBody;
    }

    /// "If node is a select element": walk up from node looking for a table
    /// that is not behind a template.
    fn select_insertion_mode(&self, index: usize, last: bool) -> InsertionMode {
        if !last {
            for &ancestor in self.stack_of_open_elements[..index].iter().rev() {
                match self.tag_name_of(ancestor) {
                    "template" => break,
                    "table" => return InsertionMode::InSelectInTable,
                    _ => {}
                }
            }
        }
        InsertionMode::InSelect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack_of(tags: &[&str]) -> StackOfOpenElements {
        let mut stack = StackOfOpenElements::default();
        for (index, tag) in tags.iter().enumerate() {
            stack.push(NodeId(index), tag);
        }
        stack
    }

    #[test]
    fn test_paragraph_in_button_scope_follows_mutations() {
        let mut stack = stack_of(&["html", "body", "p", "button"]);
        assert!(!stack.has_paragraph_in_button_scope());

        assert_eq!(stack.pop(), Some(NodeId(3)));
        assert!(stack.has_paragraph_in_button_scope());

        stack.push(NodeId(4), "table");
        assert!(!stack.has_paragraph_in_button_scope());

        stack.truncate(2);
        assert_eq!(&*stack, &[NodeId(0), NodeId(1)]);
        assert!(!stack.has_paragraph_in_button_scope());

        stack.insert(2, NodeId(5), "p");
        assert!(stack.has_paragraph_in_button_scope());

        stack.replace(2, NodeId(6), "div");
        assert!(!stack.has_paragraph_in_button_scope());
        stack.replace(2, NodeId(7), "p");
        assert!(stack.has_paragraph_in_button_scope());

        stack.push(NodeId(8), "td");
        assert!(!stack.has_paragraph_in_button_scope());
        assert_eq!(stack.remove(3), NodeId(8));
        assert!(stack.has_paragraph_in_button_scope());

        stack.retain(|node| node != NodeId(7));
        assert_eq!(stack.len(), 2);
        assert!(!stack.has_paragraph_in_button_scope());
    }

    #[test]
    fn test_paragraph_without_boundary_is_in_scope() {
        let mut stack = stack_of(&["p", "div", "span"]);
        assert!(stack.has_paragraph_in_button_scope());
        stack.truncate(0);
        assert!(!stack.has_paragraph_in_button_scope());
        assert_eq!(stack.pop(), None);
    }
}
