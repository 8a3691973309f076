//! [§ 13.2.6.1 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#creating-and-inserting-nodes)

use quill_dom::{AttributesMap, ElementData, NodeId, NodeType};

use super::core::HTMLParser;
use super::elements::is_table_section_or_row;
use crate::tokenizer::Token;

/// Where a node goes: inside `parent`, before `before` when set, otherwise
/// as the last child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct InsertionLocation {
    pub(super) parent: NodeId,
    pub(super) before: Option<NodeId>,
}

impl HTMLParser {
    /// "The current node is the bottommost node in this stack of open elements."
    pub(super) fn current_node(&self) -> Option<NodeId> {
        self.stack_of_open_elements.last().copied()
    }

    pub(super) fn tag_name_of(&self, id: NodeId) -> &str {
        self.tree.tag_name(id).unwrap_or_default()
    }

    /// Tag name of the current node, or the empty string with an empty stack.
    pub(super) fn current_tag_name(&self) -> &str {
        self.current_node().map_or("", |id| self.tag_name_of(id))
    }

    pub(super) fn current_node_is(&self, tag_name: &str) -> bool {
        self.current_tag_name() == tag_name
    }

    /// [§ 13.2.6.1 Appropriate place for inserting a node](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
    pub(super) fn appropriate_place_for_inserting(
        &self,
        override_target: Option<NodeId>,
    ) -> InsertionLocation {
        // STEP 1: "If there was an override target specified, then let target be
        //          the override target. Otherwise, let target be the current node."
        let target = override_target
            .or_else(|| self.current_node())
            .unwrap_or(NodeId::ROOT);

        // STEP 2: "If foster parenting is enabled and target is a table, tbody,
        //          tfoot, thead, or tr element..."
        if self.foster_parenting && is_table_section_or_row(self.tag_name_of(target)) {
            return self.foster_parent_location();
        }

        InsertionLocation {
            parent: target,
            before: None,
        }
    }

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    fn foster_parent_location(&self) -> InsertionLocation {
        let stack = &self.stack_of_open_elements;
        let last_template = stack
            .iter()
            .rposition(|&id| self.tree.is_element_named(id, "template"));
        let last_table = stack
            .iter()
            .rposition(|&id| self.tree.is_element_named(id, "table"));

        match (last_template, last_table) {
            // "If there is a last template and either there is no last table,
            // or there is one, but last template is lower (more recently
            // added) than last table in the stack of open elements, then let
            // adjusted insertion location be inside last template's template
            // contents, after its last child (if any), and abort these steps."
            (Some(template), table) if table.is_none_or(|table| template > table) => {
                InsertionLocation {
                    parent: stack[template],
                    before: None,
                }
            }
            // "If there is no last table, then let adjusted insertion location
            // be inside the first element in the stack of open elements (the
            // html element), after its last child (if any), and abort these
            // steps. (fragment case)"
            (_, None) => InsertionLocation {
                parent: stack.first().copied().unwrap_or(NodeId::ROOT),
                before: None,
            },
            (_, Some(table)) => {
                let table_id = stack[table];
                // "If last table has a parent node, then let adjusted insertion
                // location be inside last table's parent node, immediately
                // before last table, and abort these steps."
                if let Some(parent) = self.tree.parent(table_id) {
                    InsertionLocation {
                        parent,
                        before: Some(table_id),
                    }
                } else {
                    // "Let previous element be the element immediately above
                    // last table in the stack of open elements."
                    let previous = table
                        .checked_sub(1)
                        .and_then(|i| stack.get(i).copied())
                        .unwrap_or(NodeId::ROOT);
                    InsertionLocation {
                        parent: previous,
                        before: None,
                    }
                }
            }
        }
    }

    pub(super) fn insert_node_at(&mut self, location: InsertionLocation, node: NodeId) {
        self.tree.insert_before(location.parent, node, location.before);
    }

    /// [§ 13.2.6.1 Create an element for the token](https://html.spec.whatwg.org/multipage/parsing.html#create-an-element-for-the-token)
    ///
    /// The element is allocated but not inserted.
    pub(super) fn create_element_for_token(&mut self, token: &Token) -> NodeId {
        let name = token.tag_name().unwrap_or_default();
        let mut attrs = AttributesMap::new();
        for attribute in token.attributes() {
            let _ = attrs
                .entry(attribute.name.clone())
                .or_insert_with(|| attribute.value.clone());
        }
        self.tree.alloc(NodeType::Element(ElementData {
            tag_name: name.to_string(),
            attrs,
        }))
    }

    /// [§ 13.2.6.1 Insert an HTML element](https://html.spec.whatwg.org/multipage/parsing.html#insert-an-html-element)
    pub(super) fn insert_html_element(&mut self, token: &Token) -> NodeId {
        // STEP 1: "Let the adjusted insertion location be the appropriate place
        //          for inserting a node."
        let location = self.appropriate_place_for_inserting(None);
        // STEP 2: "Let element be the result of creating an element for the token"
        let element = self.create_element_for_token(token);
        // STEP 3: "insert element at the adjusted insertion location"
        self.insert_node_at(location, element);
        // STEP 4: "Push element onto the stack of open elements so that it is
        //          the new current node."
        self.push_open_element(element);
        element
    }

    /// Insert an element with no attributes for a tag the input implied.
    pub(super) fn insert_html_element_named(&mut self, tag_name: &str) -> NodeId {
        self.insert_html_element(&Token::start_tag(tag_name, Vec::new()))
    }

    /// [§ 13.2.6.1 Insert a character](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    pub(super) fn insert_character(&mut self, c: char) {
        // STEP 2: "Let the adjusted insertion location be the appropriate place
        //          for inserting a node."
        let location = self.appropriate_place_for_inserting(None);

        // STEP 3: "If the adjusted insertion location is in a Document node,
        //          then return."
        if matches!(
            self.tree.node_type(location.parent),
            Some(NodeType::Document)
        ) {
            return;
        }

        // STEP 4: "If there is a Text node immediately before the adjusted
        //          insertion location, then append data to that Text node's data."
        let previous = match location.before {
            Some(before) => self.tree.prev_sibling(before),
            None => self.tree.last_child(location.parent),
        };
        if let Some(previous) = previous
            && let Some(node) = self.tree.get_mut(previous)
            && let NodeType::Text(data) = &mut node.node_type
        {
            data.push(c);
            return;
        }

        // "Otherwise, create a new Text node whose data is data... and insert
        // the newly created node at the adjusted insertion location."
        let text = self.tree.alloc(NodeType::Text(c.to_string()));
        self.insert_node_at(location, text);
    }

    /// [§ 13.2.6.1 Insert a comment](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-comment)
    ///
    /// With `position` set, the comment becomes the last child of that node.
    pub(super) fn insert_comment(&mut self, data: &str, position: Option<NodeId>) {
        let location = position.map_or_else(
            || self.appropriate_place_for_inserting(None),
            |parent| InsertionLocation {
                parent,
                before: None,
            },
        );
        let comment = self.tree.alloc(NodeType::Comment(data.to_string()));
        self.insert_node_at(location, comment);
    }

    /// Add the token's attributes to `element` where the element lacks them.
    /// Used for stray `<html>` and `<body>` start tags.
    pub(super) fn merge_missing_attributes(&mut self, element: NodeId, token: &Token) {
        let Some(data) = self.tree.as_element_mut(element) else {
            return;
        };
        for attribute in token.attributes() {
            let _ = data
                .attrs
                .entry(attribute.name.clone())
                .or_insert_with(|| attribute.value.clone());
        }
    }
}
