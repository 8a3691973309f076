//! [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
//! and [the adoption agency algorithm](https://html.spec.whatwg.org/multipage/parsing.html#adoption-agency-algorithm).

use quill_dom::NodeId;

use super::core::{ActiveFormattingElement, HTMLParser};
use super::elements::{Scope, is_special};
use crate::tokenizer::{Attribute, Token};

impl HTMLParser {
    /// Index in the list of active formatting elements of the entry for `node`.
    pub(super) fn active_formatting_index_of(&self, node: NodeId) -> Option<usize> {
        self.active_formatting_elements.iter().position(|entry| {
            matches!(entry, ActiveFormattingElement::Element { node_id, .. } if *node_id == node)
        })
    }

    pub(super) fn remove_from_active_formatting_elements(&mut self, node: NodeId) {
        if let Some(index) = self.active_formatting_index_of(node) {
            let _ = self.active_formatting_elements.remove(index);
        }
    }

    /// The last element named `tag_name` between the end of the list and the
    /// last marker.
    pub(super) fn active_formatting_element_after_last_marker(
        &self,
        tag_name: &str,
    ) -> Option<(usize, NodeId)> {
        for (index, entry) in self.active_formatting_elements.iter().enumerate().rev() {
            match entry {
                ActiveFormattingElement::Marker => return None,
                ActiveFormattingElement::Element { node_id, .. }
                    if self.tree.is_element_named(*node_id, tag_name) =>
                {
                    return Some((index, *node_id));
                }
                ActiveFormattingElement::Element { .. } => {}
            }
        }
        None
    }

    /// "Insert a marker at the end of the list of active formatting elements."
    pub(super) fn insert_marker(&mut self) {
        self.active_formatting_elements
            .push(ActiveFormattingElement::Marker);
    }

    /// [§ 13.2.4.3 Push onto the list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#push-onto-the-list-of-active-formatting-elements)
    ///
    /// "If there are already three elements in the list of active formatting
    /// elements after the last marker, if any, or anywhere in the list if there
    /// are no markers, that have the same tag name, namespace, and attributes
    /// as element, then remove the earliest such element from the list of
    /// active formatting elements."
    pub(super) fn push_active_formatting_element(&mut self, node: NodeId, token: &Token) {
        let tag_name = token.tag_name().unwrap_or_default();
        let mut matching = Vec::new();
        for (index, entry) in self.active_formatting_elements.iter().enumerate().rev() {
            match entry {
                ActiveFormattingElement::Marker => break,
                ActiveFormattingElement::Element { token: existing, .. }
                    if existing.tag_name() == Some(tag_name)
                        && same_attributes(existing.attributes(), token.attributes()) =>
                {
                    matching.push(index);
                }
                ActiveFormattingElement::Element { .. } => {}
            }
        }
        if matching.len() >= 3
            && let Some(&earliest) = matching.last()
        {
            let _ = self.active_formatting_elements.remove(earliest);
        }

        self.active_formatting_elements
            .push(ActiveFormattingElement::Element {
                node_id: node,
                token: token.clone(),
            });
    }

    /// [§ 13.2.4.3 Reconstruct the active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#reconstruct-the-active-formatting-elements)
    pub(super) fn reconstruct_active_formatting_elements(&mut self) {
        // STEP 1: "If there are no entries in the list of active formatting
        //          elements, then there is nothing to reconstruct; stop this
        //          algorithm."
        // STEP 2: "If the last (most recently added) entry in the list of active
        //          formatting elements is a marker, or if it is an element that
        //          is in the stack of open elements, then there is nothing to
        //          reconstruct; stop this algorithm."
        let is_open = |parser: &Self, index: usize| match &parser.active_formatting_elements[index]
        {
            ActiveFormattingElement::Marker => true,
            ActiveFormattingElement::Element { node_id, .. } => {
                parser.stack_contains_node(*node_id)
            }
        };
        let Some(last) = self.active_formatting_elements.len().checked_sub(1) else {
            return;
        };
        if is_open(self, last) {
            return;
        }

        // STEPS 3-6 (Rewind): step back until an entry is a marker or open, or
        // the start of the list is reached.
        let mut index = last;
        while index > 0 {
            if is_open(self, index - 1) {
                break;
            }
            index -= 1;
        }

        // STEPS 7-10 (Advance, Create): "Insert an HTML element for the token
        // for which the element entry was created, to obtain new element.
        // Replace the entry for entry in the list with an entry for new element."
        for entry_index in index..=last {
            let ActiveFormattingElement::Element { token, .. } =
                &self.active_formatting_elements[entry_index]
            else {
                continue;
            };
            let token = token.clone();
            let new_element = self.insert_html_element(&token);
            self.active_formatting_elements[entry_index] = ActiveFormattingElement::Element {
                node_id: new_element,
                token,
            };
        }
    }

    /// [§ 13.2.4.3 Clear the list of active formatting elements up to the last marker](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-list-of-active-formatting-elements-up-to-the-last-marker)
    pub(super) fn clear_active_formatting_elements_to_last_marker(&mut self) {
        while let Some(entry) = self.active_formatting_elements.pop() {
            if matches!(entry, ActiveFormattingElement::Marker) {
                break;
            }
        }
    }

    /// [§ 13.2.6.4.7 "Any other end tag"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    pub(super) fn any_other_end_tag(&mut self, tag_name: &str) {
        for index in (0..self.stack_of_open_elements.len()).rev() {
            let node = self.stack_of_open_elements[index];
            let node_tag = self.tag_name_of(node);
            // "If node is an HTML element with the same tag name as the token..."
            if node_tag == tag_name {
                // "Generate implied end tags, except for HTML elements with the
                // same tag name as the token."
                self.generate_implied_end_tags(Some(tag_name));
                // "If node is not the current node, then this is a parse error."
                if self.current_node() != Some(node) {
                    self.parse_error("end tag closed an element with open children");
                }
                // "Pop all the nodes from the current node up to node, including
                // node, then stop these steps."
                self.stack_of_open_elements.truncate(index);
                return;
            }
            // "Otherwise, if node is in the special category, then this is a
            // parse error; ignore the token, and return."
            if is_special(node_tag) {
                self.parse_error("end tag does not match an open element");
                return;
            }
        }
    }

    /// [§ 13.2.6.4.7 Adoption agency algorithm](https://html.spec.whatwg.org/multipage/parsing.html#adoption-agency-algorithm)
    pub(super) fn run_adoption_agency(&mut self, subject: &str) {
        // STEP 2: "If the current node is an HTML element whose tag name is
        //          subject, and the current node is not in the list of active
        //          formatting elements, then pop the current node off the stack
        //          of open elements and return."
        if let Some(current) = self.current_node()
            && self.tree.is_element_named(current, subject)
            && self.active_formatting_index_of(current).is_none()
        {
            let _ = self.stack_of_open_elements.pop();
            return;
        }

        // STEPS 3-5: run the outer loop at most eight times.
        for _ in 0..8 {
            // STEP 4.3: "Let formatting element be the last element in the list
            //            of active formatting elements that is between the end of
            //            the list and the last marker in the list, if any, or the
            //            start of the list otherwise, and has the tag name subject."
            let Some((_, formatting_element)) =
                self.active_formatting_element_after_last_marker(subject)
            else {
                // "If there is no such element, then return and instead act as
                // described in the "any other end tag" entry above."
                self.any_other_end_tag(subject);
                return;
            };

            // STEP 4.4: "If formatting element is not in the stack of open
            //            elements, then this is a parse error; remove the element
            //            from the list, and return."
            let Some(formatting_stack_index) = self
                .stack_of_open_elements
                .iter()
                .position(|&id| id == formatting_element)
            else {
                self.parse_error("formatting element is not open");
                self.remove_from_active_formatting_elements(formatting_element);
                return;
            };

            // STEP 4.5: "If formatting element is in the stack of open elements,
            //            but the element is not in scope, then this is a parse
            //            error; return."
            if !self.has_node_in_scope(formatting_element, Scope::Default) {
                self.parse_error("formatting element is not in scope");
                return;
            }

            // STEP 4.6: "If formatting element is not the current node, this is a
            //            parse error. (But do not return.)"
            if self.current_node() != Some(formatting_element) {
                self.parse_error("misnested formatting element");
            }

            // STEP 4.7: "Let furthest block be the topmost node in the stack of
            //            open elements that is lower in the stack than formatting
            //            element, and is an element in the special category."
            let furthest_block_index = self.stack_of_open_elements
                [formatting_stack_index + 1..]
                .iter()
                .position(|&id| is_special(self.tag_name_of(id)))
                .map(|offset| formatting_stack_index + 1 + offset);

            // STEP 4.8: "If there is no furthest block, then the UA must first pop
            //            all the nodes from the bottom of the stack of open
            //            elements, from the current node up to and including
            //            formatting element, then remove formatting element from
            //            the list of active formatting elements, and finally
            //            return."
            let Some(furthest_block_index) = furthest_block_index else {
                self.stack_of_open_elements.truncate(formatting_stack_index);
                self.remove_from_active_formatting_elements(formatting_element);
                return;
            };
            let furthest_block = self.stack_of_open_elements[furthest_block_index];

            // STEP 4.9: "Let common ancestor be the element immediately above
            //            formatting element in the stack of open elements."
            let Some(common_ancestor) = formatting_stack_index
                .checked_sub(1)
                .map(|i| self.stack_of_open_elements[i])
            else {
                return;
            };

            // STEP 4.10: "Let a bookmark note the position of formatting element
            //             in the list of active formatting elements relative to
            //             the elements on either side of it in the list."
            let mut bookmark = self
                .active_formatting_index_of(formatting_element)
                .unwrap_or(self.active_formatting_elements.len());

            // STEP 4.11: "Let node and last node be furthest block."
            let mut node_index = furthest_block_index;
            let mut last_node = furthest_block;

            // STEP 4.13: Inner loop.
            let mut inner_loop_counter = 0;
            loop {
                inner_loop_counter += 1;

                // "Let node be the element immediately above node in the stack
                // of open elements, or if node is no longer in the stack of open
                // elements (e.g. because it got removed by this algorithm), the
                // element that was immediately above node in the stack of open
                // elements before node was removed."
                node_index -= 1;
                let node = self.stack_of_open_elements[node_index];

                // "If node is formatting element, then break."
                if node == formatting_element {
                    break;
                }

                // "If inner loop counter is greater than 3 and node is in the
                // list of active formatting elements, then remove node from the
                // list of active formatting elements."
                let mut node_entry = self.active_formatting_index_of(node);
                if inner_loop_counter > 3
                    && let Some(entry) = node_entry
                {
                    let _ = self.active_formatting_elements.remove(entry);
                    if entry < bookmark {
                        bookmark -= 1;
                    }
                    node_entry = None;
                }

                // "If node is not in the list of active formatting elements, then
                // remove node from the stack of open elements and continue."
                let Some(node_entry) = node_entry else {
                    let _ = self.stack_of_open_elements.remove(node_index);
                    continue;
                };

                // "Create an element for the token for which the element node
                // was created... replace the entry for node in the list of
                // active formatting elements with an entry for the new element,
                // replace the entry for node in the stack of open elements with
                // an entry for the new element, and let node be the new element."
                let ActiveFormattingElement::Element { token, .. } =
                    &self.active_formatting_elements[node_entry]
                else {
                    break;
                };
                let token = token.clone();
                let new_element = self.create_element_for_token(&token);
                self.active_formatting_elements[node_entry] = ActiveFormattingElement::Element {
                    node_id: new_element,
                    token,
                };
                let tag_name = self.tree.tag_name(new_element).unwrap_or_default();
                self.stack_of_open_elements
                    .replace(node_index, new_element, tag_name);

                // "If last node is furthest block, then move the aforementioned
                // bookmark to be immediately after the new node in the list of
                // active formatting elements."
                if last_node == furthest_block {
                    bookmark = node_entry + 1;
                }

                // "Append last node to node."
                self.tree.append_child(new_element, last_node);

                // "Set last node to node."
                last_node = new_element;
            }

            // STEP 4.14: "Insert whatever last node ended up being in the
            //             previous step at the appropriate place for inserting a
            //             node, but using common ancestor as the override target."
            let location = self.appropriate_place_for_inserting(Some(common_ancestor));
            self.insert_node_at(location, last_node);

            // STEP 4.15: "Create an element for the token for which formatting
            //             element was created."
            let Some(formatting_entry) = self.active_formatting_index_of(formatting_element) else {
                return;
            };
            let ActiveFormattingElement::Element { token, .. } =
                &self.active_formatting_elements[formatting_entry]
            else {
                return;
            };
            let token = token.clone();
            let new_element = self.create_element_for_token(&token);

            // STEP 4.16: "Take all of the child nodes of furthest block and append
            //             them to the element created in the last step."
            self.tree.move_children(furthest_block, new_element);

            // STEP 4.17: "Append that new element to furthest block."
            self.tree.append_child(furthest_block, new_element);

            // STEP 4.18: "Remove formatting element from the list of active
            //             formatting elements, and insert the new element into
            //             the list of active formatting elements at the position
            //             of the aforementioned bookmark."
            let _ = self.active_formatting_elements.remove(formatting_entry);
            if formatting_entry < bookmark {
                bookmark -= 1;
            }
            let bookmark = bookmark.min(self.active_formatting_elements.len());
            self.active_formatting_elements.insert(
                bookmark,
                ActiveFormattingElement::Element {
                    node_id: new_element,
                    token,
                },
            );

            // STEP 4.19: "Remove formatting element from the stack of open
            //             elements, and insert the new element into the stack of
            //             open elements immediately below the position of furthest
            //             block in that stack."
            self.remove_from_stack(formatting_element);
            let below_furthest_block = self
                .stack_of_open_elements
                .iter()
                .position(|&id| id == furthest_block)
                .map_or(self.stack_of_open_elements.len(), |i| i + 1);
            let tag_name = self.tree.tag_name(new_element).unwrap_or_default();
            self.stack_of_open_elements
                .insert(below_furthest_block, new_element, tag_name);
        }
    }
}

/// Attribute lists compare equal when they hold the same name/value pairs in
/// any order.
fn same_attributes(a: &[Attribute], b: &[Attribute]) -> bool {
    a.len() == b.len() && a.iter().all(|attr| b.contains(attr))
}
