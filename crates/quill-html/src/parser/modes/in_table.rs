//! Table insertion modes: in table, in table text, in caption, in column
//! group, in table body, in row and in cell.

use crate::parser::core::{HTMLParser, InsertionMode};
use crate::parser::elements::{Scope, is_table_section_or_row};
use crate::tokenizer::Token;

const TABLE_SECTIONS: &[&str] = &["tbody", "tfoot", "thead"];

impl HTMLParser {
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    pub(in crate::parser) fn handle_in_table_mode(&mut self, token: &Token) {
        match token {
            // "A character token, if the current node is table, tbody,
            // template, tfoot, thead, or tr element"
            // "Let the pending table character tokens be an empty list of
            // tokens."
            // "Let the original insertion mode be the current insertion mode."
            // "Switch the insertion mode to "in table text" and reprocess the
            // token."
            Token::Character { .. }
                if is_table_section_or_row(self.current_tag_name())
                    || self.current_node_is("template") =>
            {
                self.pending_table_character_tokens.clear();
                self.original_insertion_mode = Some(self.insertion_mode);
                self.reprocess_in(InsertionMode::InTableText, token);
            }

            Token::Comment { data } => self.insert_comment(data, None),

            Token::Doctype { .. } => self.parse_error("unexpected DOCTYPE in table"),

            // "A start tag whose tag name is "caption""
            // "Clear the stack back to a table context."
            // "Insert a marker at the end of the list of active formatting
            // elements."
            // "Insert an HTML element for the token, then switch the insertion
            // mode to "in caption"."
            Token::StartTag { name, .. } if name == "caption" => {
                self.clear_stack_back_to_table_context();
                self.insert_marker();
                let _ = self.insert_html_element(token);
                self.insertion_mode = InsertionMode::InCaption;
            }

            // "A start tag whose tag name is "colgroup""
            Token::StartTag { name, .. } if name == "colgroup" => {
                self.clear_stack_back_to_table_context();
                let _ = self.insert_html_element(token);
                self.insertion_mode = InsertionMode::InColumnGroup;
            }

            // "A start tag whose tag name is "col""
            // "Insert an HTML element for a "colgroup" start tag token with no
            // attributes, then switch the insertion mode to "in column group"."
            // "Reprocess the current token."
            Token::StartTag { name, .. } if name == "col" => {
                self.clear_stack_back_to_table_context();
                let _ = self.insert_html_element_named("colgroup");
                self.reprocess_in(InsertionMode::InColumnGroup, token);
            }

            // "A start tag whose tag name is one of: "tbody", "tfoot", "thead""
            Token::StartTag { name, .. } if TABLE_SECTIONS.contains(&name.as_str()) => {
                self.clear_stack_back_to_table_context();
                let _ = self.insert_html_element(token);
                self.insertion_mode = InsertionMode::InTableBody;
            }

            // "A start tag whose tag name is one of: "td", "th", "tr""
            // "Insert an HTML element for a "tbody" start tag token with no
            // attributes, then switch the insertion mode to "in table body"."
            // "Reprocess the current token."
            Token::StartTag { name, .. } if matches!(name.as_str(), "td" | "th" | "tr") => {
                self.clear_stack_back_to_table_context();
                let _ = self.insert_html_element_named("tbody");
                self.reprocess_in(InsertionMode::InTableBody, token);
            }

            // "A start tag whose tag name is "table""
            // "Parse error."
            // "If the stack of open elements does not have a table element in
            // table scope, ignore the token."
            // "Otherwise: Pop elements from this stack until a table element
            // has been popped from the stack. Reset the insertion mode
            // appropriately. Reprocess the token."
            Token::StartTag { name, .. } if name == "table" => {
                self.parse_error("nested table");
                if self.has_element_in_scope("table", Scope::Table) {
                    self.pop_until("table");
                    self.reset_insertion_mode_appropriately();
                    self.process_token(token);
                }
            }

            // "An end tag whose tag name is "table""
            Token::EndTag { name, .. } if name == "table" => {
                if !self.has_element_in_scope("table", Scope::Table) {
                    self.parse_error("table end tag without an open table");
                    return;
                }
                self.pop_until("table");
                self.reset_insertion_mode_appropriately();
            }

            // "An end tag whose tag name is one of: "body", "caption", "col",
            // "colgroup", "html", "tbody", "td", "tfoot", "th", "thead", "tr""
            // "Parse error. Ignore the token."
            Token::EndTag { name, .. }
                if matches!(
                    name.as_str(),
                    "body"
                        | "caption"
                        | "col"
                        | "colgroup"
                        | "html"
                        | "tbody"
                        | "td"
                        | "tfoot"
                        | "th"
                        | "thead"
                        | "tr"
                ) =>
            {
                self.parse_error("unexpected end tag in table");
            }

            // "A start tag whose tag name is one of: "style", "script",
            // "template""
            // "An end tag whose tag name is "template""
            // "Process the token using the rules for the "in head" insertion mode."
            Token::StartTag { name, .. }
                if matches!(name.as_str(), "style" | "script" | "template") =>
            {
                self.process_using_rules_for(InsertionMode::InHead, token);
            }
            Token::EndTag { name, .. } if name == "template" => {
                self.process_using_rules_for(InsertionMode::InHead, token);
            }

            // "A start tag whose tag name is "input""
            // "If the token does not have an attribute with the name "type", or
            // if it does, but that attribute's value is not an ASCII
            // case-insensitive match for the string "hidden", then: act as
            // described in the "anything else" entry below."
            // "Otherwise: Parse error. Insert an HTML element for the token. Pop
            // that input element off the stack of open elements."
            Token::StartTag { name, .. }
                if name == "input"
                    && token
                        .attribute("type")
                        .is_some_and(|kind| kind.eq_ignore_ascii_case("hidden")) =>
            {
                self.parse_error("hidden input in table");
                let _ = self.insert_html_element(token);
                let _ = self.stack_of_open_elements.pop();
            }

            // "A start tag whose tag name is "form""
            // "Parse error."
            // "If there is a template element on the stack of open elements, or
            // if the form element pointer is not null, ignore the token."
            // "Otherwise: Insert an HTML element for the token, and set the form
            // element pointer to point to the element created. Pop that form
            // element off the stack of open elements."
            Token::StartTag { name, .. } if name == "form" => {
                self.parse_error("form in table");
                if self.stack_contains("template") || self.form_element_pointer.is_some() {
                    return;
                }
                let form = self.insert_html_element(token);
                self.form_element_pointer = Some(form);
                let _ = self.stack_of_open_elements.pop();
            }

            // "An end-of-file token"
            // "Process the token using the rules for the "in body" insertion mode."
            Token::EndOfFile => self.process_using_rules_for(InsertionMode::InBody, token),

            _ => self.in_table_anything_else(token),
        }
    }

    /// "Anything else"
    /// "Parse error. Enable foster parenting, process the token using the rules
    /// for the "in body" insertion mode, and then disable foster parenting."
    fn in_table_anything_else(&mut self, token: &Token) {
        self.parse_error("content foster parented out of table");
        self.process_with_foster_parenting(token);
    }

    fn process_with_foster_parenting(&mut self, token: &Token) {
        self.foster_parenting = true;
        self.process_using_rules_for(InsertionMode::InBody, token);
        self.foster_parenting = false;
    }

    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    pub(in crate::parser) fn handle_in_table_text_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Ignore the token."
            Token::Character { data: '\0' } => self.parse_error("unexpected null character"),

            // "Any other character token"
            // "Append the character token to the pending table character tokens
            // list."
            Token::Character { data } => self.pending_table_character_tokens.push(*data),

            // "Anything else"
            _ => {
                let pending = std::mem::take(&mut self.pending_table_character_tokens);
                // "If any of the tokens in the pending table character tokens
                // list are character tokens that are not ASCII whitespace, then
                // this is a parse error: reprocess the character tokens in the
                // pending table character tokens list using the rules given in
                // the "anything else" entry in the "in table" insertion mode."
                if pending.iter().any(|c| !c.is_ascii_whitespace()) {
                    self.parse_error("text foster parented out of table");
                    for data in pending {
                        self.process_with_foster_parenting(&Token::Character { data });
                    }
                } else {
                    // "Otherwise, insert the characters given by the pending
                    // table character tokens list."
                    for data in pending {
                        self.insert_character(data);
                    }
                }

                // "Switch the insertion mode to the original insertion mode and
                // reprocess the token."
                let mode = self.take_original_insertion_mode();
                self.reprocess_in(mode, token);
            }
        }
    }

    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    pub(in crate::parser) fn handle_in_caption_mode(&mut self, token: &Token) {
        match token {
            // "An end tag whose tag name is "caption""
            Token::EndTag { name, .. } if name == "caption" => {
                let _ = self.close_caption();
            }

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr""
            // "An end tag whose tag name is "table""
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption"
                        | "col"
                        | "colgroup"
                        | "tbody"
                        | "td"
                        | "tfoot"
                        | "th"
                        | "thead"
                        | "tr"
                ) =>
            {
                if self.close_caption() {
                    self.process_token(token);
                }
            }
            Token::EndTag { name, .. } if name == "table" => {
                if self.close_caption() {
                    self.process_token(token);
                }
            }

            // "An end tag whose tag name is one of: "body", "col", "colgroup",
            // "html", "tbody", "td", "tfoot", "th", "thead", "tr""
            // "Parse error. Ignore the token."
            Token::EndTag { name, .. }
                if matches!(
                    name.as_str(),
                    "body"
                        | "col"
                        | "colgroup"
                        | "html"
                        | "tbody"
                        | "td"
                        | "tfoot"
                        | "th"
                        | "thead"
                        | "tr"
                ) =>
            {
                self.parse_error("unexpected end tag in caption");
            }

            _ => self.process_using_rules_for(InsertionMode::InBody, token),
        }
    }

    /// "If the stack of open elements does not have a caption element in table
    /// scope, this is a parse error; ignore the token. (fragment case)"
    /// "Otherwise: Generate implied end tags. Now, if the current node is not a
    /// caption element, then this is a parse error. Pop elements from this
    /// stack until a caption element has been popped from the stack. Clear
    /// the list of active formatting elements up to the last marker. Switch
    /// the insertion mode to "in table"."
    ///
    /// Returns whether a caption was closed.
    fn close_caption(&mut self) -> bool {
        if !self.has_element_in_scope("caption", Scope::Table) {
            self.parse_error("caption end tag without an open caption");
            return false;
        }
        self.generate_implied_end_tags(None);
        if !self.current_node_is("caption") {
            self.parse_error("caption closed while other elements were open");
        }
        self.pop_until("caption");
        self.clear_active_formatting_elements_to_last_marker();
        self.insertion_mode = InsertionMode::InTable;
        true
    }

    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolgroup)
    pub(in crate::parser) fn handle_in_column_group_mode(&mut self, token: &Token) {
        match token {
            Token::Character { data } if token.is_whitespace_character() => {
                self.insert_character(*data);
            }

            Token::Comment { data } => self.insert_comment(data, None),

            Token::Doctype { .. } => self.parse_error("unexpected DOCTYPE in column group"),

            Token::StartTag { name, .. } if name == "html" => {
                self.process_using_rules_for(InsertionMode::InBody, token);
            }

            // "A start tag whose tag name is "col""
            // "Insert an HTML element for the token. Immediately pop the
            // current node off the stack of open elements."
            Token::StartTag { name, .. } if name == "col" => {
                let _ = self.insert_html_element(token);
                let _ = self.stack_of_open_elements.pop();
            }

            // "An end tag whose tag name is "colgroup""
            Token::EndTag { name, .. } if name == "colgroup" => {
                if !self.current_node_is("colgroup") {
                    self.parse_error("colgroup end tag without an open colgroup");
                    return;
                }
                let _ = self.stack_of_open_elements.pop();
                self.insertion_mode = InsertionMode::InTable;
            }

            // "An end tag whose tag name is "col""
            Token::EndTag { name, .. } if name == "col" => {
                self.parse_error("col end tag");
            }

            Token::StartTag { name, .. } | Token::EndTag { name, .. } if name == "template" => {
                self.process_using_rules_for(InsertionMode::InHead, token);
            }

            Token::EndOfFile => self.process_using_rules_for(InsertionMode::InBody, token),

            // "Anything else"
            // "If the current node is not a colgroup element, then this is a
            // parse error; ignore the token."
            // "Otherwise, pop the current node from the stack of open elements.
            // Switch the insertion mode to "in table". Reprocess the token."
            _ => {
                if !self.current_node_is("colgroup") {
                    self.parse_error("unexpected content in column group");
                    return;
                }
                let _ = self.stack_of_open_elements.pop();
                self.reprocess_in(InsertionMode::InTable, token);
            }
        }
    }

    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intbody)
    pub(in crate::parser) fn handle_in_table_body_mode(&mut self, token: &Token) {
        match token {
            // "A start tag whose tag name is "tr""
            Token::StartTag { name, .. } if name == "tr" => {
                self.clear_stack_back_to_table_body_context();
                let _ = self.insert_html_element(token);
                self.insertion_mode = InsertionMode::InRow;
            }

            // "A start tag whose tag name is one of: "th", "td""
            // "Parse error."
            // "Insert an HTML element for a "tr" start tag token with no
            // attributes, then switch the insertion mode to "in row"."
            // "Reprocess the current token."
            Token::StartTag { name, .. } if matches!(name.as_str(), "th" | "td") => {
                self.parse_error("table cell outside a row");
                self.clear_stack_back_to_table_body_context();
                let _ = self.insert_html_element_named("tr");
                self.reprocess_in(InsertionMode::InRow, token);
            }

            // "An end tag whose tag name is one of: "tbody", "tfoot", "thead""
            Token::EndTag { name, .. } if TABLE_SECTIONS.contains(&name.as_str()) => {
                if !self.has_element_in_scope(name, Scope::Table) {
                    self.parse_error("table section end tag without an open section");
                    return;
                }
                self.clear_stack_back_to_table_body_context();
                let _ = self.stack_of_open_elements.pop();
                self.insertion_mode = InsertionMode::InTable;
            }

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "tbody", "tfoot", "thead""
            // "An end tag whose tag name is "table""
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead"
                ) =>
            {
                self.close_table_section_and_reprocess(token);
            }
            Token::EndTag { name, .. } if name == "table" => {
                self.close_table_section_and_reprocess(token);
            }

            // "An end tag whose tag name is one of: "body", "caption", "col",
            // "colgroup", "html", "td", "th", "tr""
            Token::EndTag { name, .. }
                if matches!(
                    name.as_str(),
                    "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th" | "tr"
                ) =>
            {
                self.parse_error("unexpected end tag in table body");
            }

            _ => self.process_using_rules_for(InsertionMode::InTable, token),
        }
    }

    /// "If the stack of open elements does not have a tbody, thead, or tfoot
    /// element in table scope, this is a parse error; ignore the token."
    /// "Otherwise: Clear the stack back to a table body context. Pop the
    /// current node from the stack of open elements. Switch the insertion mode
    /// to "in table". Reprocess the token."
    fn close_table_section_and_reprocess(&mut self, token: &Token) {
        if !self.has_any_element_in_scope(TABLE_SECTIONS, Scope::Table) {
            self.parse_error("no open table section");
            return;
        }
        self.clear_stack_back_to_table_body_context();
        let _ = self.stack_of_open_elements.pop();
        self.reprocess_in(InsertionMode::InTable, token);
    }

    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intr)
    pub(in crate::parser) fn handle_in_row_mode(&mut self, token: &Token) {
        match token {
            // "A start tag whose tag name is one of: "th", "td""
            // "Clear the stack back to a table row context."
            // "Insert an HTML element for the token, then switch the insertion
            // mode to "in cell"."
            // "Insert a marker at the end of the list of active formatting
            // elements."
            Token::StartTag { name, .. } if matches!(name.as_str(), "th" | "td") => {
                self.clear_stack_back_to_table_row_context();
                let _ = self.insert_html_element(token);
                self.insertion_mode = InsertionMode::InCell;
                self.insert_marker();
            }

            // "An end tag whose tag name is "tr""
            Token::EndTag { name, .. } if name == "tr" => {
                let _ = self.close_row();
            }

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "tbody", "tfoot", "thead", "tr""
            // "An end tag whose tag name is "table""
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead" | "tr"
                ) =>
            {
                if self.close_row() {
                    self.process_token(token);
                }
            }
            Token::EndTag { name, .. } if name == "table" => {
                if self.close_row() {
                    self.process_token(token);
                }
            }

            // "An end tag whose tag name is one of: "tbody", "tfoot", "thead""
            Token::EndTag { name, .. } if TABLE_SECTIONS.contains(&name.as_str()) => {
                if !self.has_element_in_scope(name, Scope::Table) {
                    self.parse_error("table section end tag without an open section");
                    return;
                }
                if self.close_row() {
                    self.process_token(token);
                }
            }

            // "An end tag whose tag name is one of: "body", "caption", "col",
            // "colgroup", "html", "td", "th""
            Token::EndTag { name, .. }
                if matches!(
                    name.as_str(),
                    "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th"
                ) =>
            {
                self.parse_error("unexpected end tag in row");
            }

            _ => self.process_using_rules_for(InsertionMode::InTable, token),
        }
    }

    /// "If the stack of open elements does not have a tr element in table
    /// scope, this is a parse error; ignore the token."
    /// "Otherwise: Clear the stack back to a table row context. Pop the current
    /// node (which will be a tr element) from the stack of open elements.
    /// Switch the insertion mode to "in table body"."
    ///
    /// Returns whether a row was closed.
    fn close_row(&mut self) -> bool {
        if !self.has_element_in_scope("tr", Scope::Table) {
            self.parse_error("no open table row");
            return false;
        }
        self.clear_stack_back_to_table_row_context();
        let _ = self.stack_of_open_elements.pop();
        self.insertion_mode = InsertionMode::InTableBody;
        true
    }

    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intd)
    pub(in crate::parser) fn handle_in_cell_mode(&mut self, token: &Token) {
        match token {
            // "An end tag whose tag name is one of: "td", "th""
            Token::EndTag { name, .. } if matches!(name.as_str(), "td" | "th") => {
                if !self.has_element_in_scope(name, Scope::Table) {
                    self.parse_error("cell end tag without an open cell");
                    return;
                }
                self.generate_implied_end_tags(None);
                if !self.current_node_is(name) {
                    self.parse_error("cell closed while other elements were open");
                }
                self.pop_until(name);
                self.clear_active_formatting_elements_to_last_marker();
                self.insertion_mode = InsertionMode::InRow;
            }

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr""
            // "Assert: The stack of open elements has a td or th element in
            // table scope."
            // "Close the cell (see below) and reprocess the token."
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption"
                        | "col"
                        | "colgroup"
                        | "tbody"
                        | "td"
                        | "tfoot"
                        | "th"
                        | "thead"
                        | "tr"
                ) =>
            {
                if !self.has_any_element_in_scope(&["td", "th"], Scope::Table) {
                    self.parse_error("no open table cell");
                    return;
                }
                self.close_the_cell();
                self.process_token(token);
            }

            // "An end tag whose tag name is one of: "body", "caption", "col",
            // "colgroup", "html""
            Token::EndTag { name, .. }
                if matches!(
                    name.as_str(),
                    "body" | "caption" | "col" | "colgroup" | "html"
                ) =>
            {
                self.parse_error("unexpected end tag in cell");
            }

            // "An end tag whose tag name is one of: "table", "tbody", "tfoot",
            // "thead", "tr""
            // "If the stack of open elements does not have an element in table
            // scope that is an HTML element with the same tag name as that of
            // the token, then this is a parse error; ignore the token."
            // "Otherwise, close the cell (see below) and reprocess the token."
            Token::EndTag { name, .. } if is_table_section_or_row(name) => {
                if !self.has_element_in_scope(name, Scope::Table) {
                    self.parse_error("end tag without an open table element");
                    return;
                }
                self.close_the_cell();
                self.process_token(token);
            }

            _ => self.process_using_rules_for(InsertionMode::InBody, token),
        }
    }
}
