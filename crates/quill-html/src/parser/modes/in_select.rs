//! [§ 13.2.6.4.16](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
//! and [§ 13.2.6.4.17](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)

use crate::parser::core::{HTMLParser, InsertionMode};
use crate::parser::elements::Scope;
use crate::tokenizer::Token;

impl HTMLParser {
    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    pub(in crate::parser) fn handle_in_select_mode(&mut self, token: &Token) {
        match token {
            Token::Character { data: '\0' } => self.parse_error("unexpected null character"),

            Token::Character { data } => self.insert_character(*data),

            Token::Comment { data } => self.insert_comment(data, None),

            Token::Doctype { .. } => self.parse_error("unexpected DOCTYPE in select"),

            Token::StartTag { name, .. } if name == "html" => {
                self.process_using_rules_for(InsertionMode::InBody, token);
            }

            // "A start tag whose tag name is "option""
            // "If the current node is an option element, pop that node from the
            // stack of open elements."
            Token::StartTag { name, .. } if name == "option" => {
                self.pop_if_current_is("option");
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is "optgroup""
            Token::StartTag { name, .. } if name == "optgroup" => {
                self.pop_if_current_is("option");
                self.pop_if_current_is("optgroup");
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is "hr""
            Token::StartTag { name, .. } if name == "hr" => {
                self.pop_if_current_is("option");
                self.pop_if_current_is("optgroup");
                let _ = self.insert_html_element(token);
                let _ = self.stack_of_open_elements.pop();
            }

            // "An end tag whose tag name is "optgroup""
            // "First, if the current node is an option element, and the node
            // immediately before it in the stack of open elements is an optgroup
            // element, then pop the current node from the stack of open
            // elements."
            Token::EndTag { name, .. } if name == "optgroup" => {
                let len = self.stack_of_open_elements.len();
                if self.current_node_is("option")
                    && len >= 2
                    && self
                        .tree
                        .is_element_named(self.stack_of_open_elements[len - 2], "optgroup")
                {
                    let _ = self.stack_of_open_elements.pop();
                }
                if self.current_node_is("optgroup") {
                    let _ = self.stack_of_open_elements.pop();
                } else {
                    self.parse_error("optgroup end tag without an open optgroup");
                }
            }

            // "An end tag whose tag name is "option""
            Token::EndTag { name, .. } if name == "option" => {
                if self.current_node_is("option") {
                    let _ = self.stack_of_open_elements.pop();
                } else {
                    self.parse_error("option end tag without an open option");
                }
            }

            // "An end tag whose tag name is "select""
            Token::EndTag { name, .. } if name == "select" => {
                let _ = self.close_select();
            }

            // "A start tag whose tag name is "select""
            // "Parse error."
            // "If the stack of open elements does not have a select element in
            // select scope, ignore the token. (fragment case)"
            // "Otherwise: Pop elements from the stack of open elements until a
            // select element has been popped from the stack. Reset the insertion
            // mode appropriately."
            Token::StartTag { name, .. } if name == "select" => {
                self.parse_error("nested select");
                let _ = self.close_select();
            }

            // "A start tag whose tag name is one of: "input", "keygen",
            // "textarea""
            Token::StartTag { name, .. }
                if matches!(name.as_str(), "input" | "keygen" | "textarea") =>
            {
                self.parse_error("form control inside select");
                if self.close_select() {
                    self.process_token(token);
                }
            }

            Token::StartTag { name, .. } if matches!(name.as_str(), "script" | "template") => {
                self.process_using_rules_for(InsertionMode::InHead, token);
            }
            Token::EndTag { name, .. } if name == "template" => {
                self.process_using_rules_for(InsertionMode::InHead, token);
            }

            Token::EndOfFile => self.process_using_rules_for(InsertionMode::InBody, token),

            // "Anything else"
            // "Parse error. Ignore the token."
            _ => self.parse_error("unexpected token in select"),
        }
    }

    /// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    pub(in crate::parser) fn handle_in_select_in_table_mode(&mut self, token: &Token) {
        const TABLE_TAGS: &[&str] = &[
            "caption", "table", "tbody", "tfoot", "thead", "tr", "td", "th",
        ];
        match token {
            // "A start tag whose tag name is one of: "caption", "table",
            // "tbody", "tfoot", "thead", "tr", "td", "th""
            // "Parse error."
            // "Pop elements from the stack of open elements until a select
            // element has been popped from the stack."
            // "Reset the insertion mode appropriately."
            // "Reprocess the token."
            Token::StartTag { name, .. } if TABLE_TAGS.contains(&name.as_str()) => {
                self.parse_error("table content inside select");
                self.pop_until("select");
                self.reset_insertion_mode_appropriately();
                self.process_token(token);
            }

            // "An end tag whose tag name is one of: "caption", "table",
            // "tbody", "tfoot", "thead", "tr", "td", "th""
            // "Parse error."
            // "If the stack of open elements does not have an element in table
            // scope that is an HTML element with the same tag name as that of
            // the token, then ignore the token."
            Token::EndTag { name, .. } if TABLE_TAGS.contains(&name.as_str()) => {
                self.parse_error("table end tag inside select");
                if !self.has_element_in_scope(name, Scope::Table) {
                    return;
                }
                self.pop_until("select");
                self.reset_insertion_mode_appropriately();
                self.process_token(token);
            }

            _ => self.process_using_rules_for(InsertionMode::InSelect, token),
        }
    }

    fn pop_if_current_is(&mut self, tag_name: &str) {
        if self.current_node_is(tag_name) {
            let _ = self.stack_of_open_elements.pop();
        }
    }

    /// Pop through the open select and reset the insertion mode. Returns false
    /// (after recording an error) when no select is in select scope.
    fn close_select(&mut self) -> bool {
        if !self.has_element_in_scope("select", Scope::Select) {
            self.parse_error("no open select");
            return false;
        }
        self.pop_until("select");
        self.reset_insertion_mode_appropriately();
        true
    }
}
