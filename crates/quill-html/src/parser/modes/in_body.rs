//! [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)

use crate::parser::core::{HTMLParser, InsertionMode, QuirksMode};
use crate::parser::elements::{Scope, is_heading, is_special, may_remain_open_at_end_of_body};
use crate::tokenizer::{Token, TokenizerState};

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

impl HTMLParser {
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    #[allow(clippy::cognitive_complexity)]
    pub(in crate::parser) fn handle_in_body_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Ignore the token."
            Token::Character { data: '\0' } => self.parse_error("unexpected null character"),

            // "A character token that is one of U+0009 CHARACTER TABULATION,
            // U+000A LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE
            // RETURN (CR), or U+0020 SPACE"
            // "Reconstruct the active formatting elements, if any."
            // "Insert the token's character."
            Token::Character { data } if token.is_whitespace_character() => {
                self.reconstruct_active_formatting_elements();
                self.insert_character(*data);
            }

            // "Any other character token"
            // "Reconstruct the active formatting elements, if any."
            // "Insert the token's character."
            // "Set the frameset-ok flag to "not ok"."
            Token::Character { data } => {
                self.reconstruct_active_formatting_elements();
                self.insert_character(*data);
                self.frameset_ok = false;
            }

            Token::Comment { data } => self.insert_comment(data, None),

            Token::Doctype { .. } => self.parse_error("unexpected DOCTYPE in body"),

            // "A start tag whose tag name is "html""
            // "Parse error."
            // "If there is a template element on the stack of open elements,
            // then ignore the token."
            // "Otherwise, for each attribute on the token, check to see if the
            // attribute is already present on the top element of the stack of
            // open elements. If it is not, add the attribute and its
            // corresponding value to that element."
            Token::StartTag { name, .. } if name == "html" => {
                self.parse_error("unexpected html start tag");
                if !self.stack_contains("template")
                    && let Some(&html) = self.stack_of_open_elements.first()
                {
                    self.merge_missing_attributes(html, token);
                }
            }

            // "A start tag whose tag name is one of: "base", "basefont",
            // "bgsound", "link", "meta", "noframes", "script", "style",
            // "template", "title""
            // "An end tag whose tag name is "template""
            // "Process the token using the rules for the "in head" insertion mode."
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "base"
                        | "basefont"
                        | "bgsound"
                        | "link"
                        | "meta"
                        | "noframes"
                        | "script"
                        | "style"
                        | "template"
                        | "title"
                ) =>
            {
                self.process_using_rules_for(InsertionMode::InHead, token);
            }
            Token::EndTag { name, .. } if name == "template" => {
                self.process_using_rules_for(InsertionMode::InHead, token);
            }

            // "A start tag whose tag name is "body""
            Token::StartTag { name, .. } if name == "body" => self.in_body_start_body(token),

            // "A start tag whose tag name is "frameset""
            Token::StartTag { name, .. } if name == "frameset" => {
                self.in_body_start_frameset(token);
            }

            // "An end-of-file token"
            Token::EndOfFile => {
                // "If the stack of template insertion modes is not empty, then
                // process the token using the rules for the "in template"
                // insertion mode."
                if !self.template_insertion_modes.is_empty() {
                    self.process_using_rules_for(InsertionMode::InTemplate, token);
                    return;
                }
                self.check_open_elements_at_end_of_body();
                self.stop_parsing();
            }

            // "An end tag whose tag name is "body""
            // "If the stack of open elements does not have a body element in
            // scope, this is a parse error; ignore the token."
            // "Switch the insertion mode to "after body"."
            Token::EndTag { name, .. } if name == "body" => {
                if !self.has_element_in_scope("body", Scope::Default) {
                    self.parse_error("body end tag without an open body");
                    return;
                }
                self.check_open_elements_at_end_of_body();
                self.insertion_mode = InsertionMode::AfterBody;
            }

            // "An end tag whose tag name is "html""
            // Same as body, then "Reprocess the token."
            Token::EndTag { name, .. } if name == "html" => {
                if !self.has_element_in_scope("body", Scope::Default) {
                    self.parse_error("html end tag without an open body");
                    return;
                }
                self.check_open_elements_at_end_of_body();
                self.reprocess_in(InsertionMode::AfterBody, token);
            }

            // "A start tag whose tag name is one of: "address", "article",
            // "aside", "blockquote", "center", "details", "dialog", "dir",
            // "div", "dl", "fieldset", "figcaption", "figure", "footer",
            // "header", "hgroup", "main", "menu", "nav", "ol", "p", "search",
            // "section", "summary", "ul""
            // "If the stack of open elements has a p element in button scope,
            // then close a p element."
            // "Insert an HTML element for the token."
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "address"
                        | "article"
                        | "aside"
                        | "blockquote"
                        | "center"
                        | "details"
                        | "dialog"
                        | "dir"
                        | "div"
                        | "dl"
                        | "fieldset"
                        | "figcaption"
                        | "figure"
                        | "footer"
                        | "header"
                        | "hgroup"
                        | "main"
                        | "menu"
                        | "nav"
                        | "ol"
                        | "p"
                        | "search"
                        | "section"
                        | "summary"
                        | "ul"
                ) =>
            {
                self.close_p_element_in_button_scope();
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is one of: "h1", "h2", "h3", "h4",
            // "h5", "h6""
            // "If the current node is an HTML element whose tag name is one of
            // "h1", "h2", "h3", "h4", "h5", or "h6", then this is a parse
            // error; pop the current node off the stack of open elements."
            Token::StartTag { name, .. } if is_heading(name) => {
                self.close_p_element_in_button_scope();
                if is_heading(self.current_tag_name()) {
                    self.parse_error("nested heading");
                    let _ = self.stack_of_open_elements.pop();
                }
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is one of: "pre", "listing""
            // "If the next token is a U+000A LINE FEED (LF) character token,
            // then ignore that token and move on to the next one."
            Token::StartTag { name, .. } if matches!(name.as_str(), "pre" | "listing") => {
                self.close_p_element_in_button_scope();
                let _ = self.insert_html_element(token);
                self.ignore_next_line_feed = true;
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "form""
            Token::StartTag { name, .. } if name == "form" => {
                let has_template = self.stack_contains("template");
                if self.form_element_pointer.is_some() && !has_template {
                    self.parse_error("nested form");
                    return;
                }
                self.close_p_element_in_button_scope();
                let form = self.insert_html_element(token);
                if !has_template {
                    self.form_element_pointer = Some(form);
                }
            }

            // "A start tag whose tag name is "li""
            Token::StartTag { name, .. } if name == "li" => {
                self.in_body_start_list_item(token, &["li"]);
            }

            // "A start tag whose tag name is one of: "dd", "dt""
            Token::StartTag { name, .. } if matches!(name.as_str(), "dd" | "dt") => {
                self.in_body_start_list_item(token, &["dd", "dt"]);
            }

            // "A start tag whose tag name is "plaintext""
            // "Switch the tokenizer to the PLAINTEXT state."
            Token::StartTag { name, .. } if name == "plaintext" => {
                self.close_p_element_in_button_scope();
                let _ = self.insert_html_element(token);
                self.switch_tokenizer_to(TokenizerState::PLAINTEXT);
            }

            // "A start tag whose tag name is "button""
            Token::StartTag { name, .. } if name == "button" => {
                if self.has_element_in_scope("button", Scope::Default) {
                    self.parse_error("nested button");
                    self.generate_implied_end_tags(None);
                    self.pop_until("button");
                }
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
                self.frameset_ok = false;
            }

            // "An end tag whose tag name is one of: "address", "article",
            // "aside", "blockquote", "button", "center", "details", "dialog",
            // "dir", "div", "dl", "fieldset", "figcaption", "figure", "footer",
            // "header", "hgroup", "listing", "main", "menu", "nav", "ol",
            // "pre", "search", "section", "summary", "ul""
            Token::EndTag { name, .. }
                if matches!(
                    name.as_str(),
                    "address"
                        | "article"
                        | "aside"
                        | "blockquote"
                        | "button"
                        | "center"
                        | "details"
                        | "dialog"
                        | "dir"
                        | "div"
                        | "dl"
                        | "fieldset"
                        | "figcaption"
                        | "figure"
                        | "footer"
                        | "header"
                        | "hgroup"
                        | "listing"
                        | "main"
                        | "menu"
                        | "nav"
                        | "ol"
                        | "pre"
                        | "search"
                        | "section"
                        | "summary"
                        | "ul"
                ) =>
            {
                let _ = self.close_block_in_scope(name, Scope::Default, None);
            }

            // "An end tag whose tag name is "form""
            Token::EndTag { name, .. } if name == "form" => self.in_body_end_form(),

            // "An end tag whose tag name is "p""
            // "If the stack of open elements does not have a p element in button
            // scope, then this is a parse error; insert an HTML element for a
            // "p" start tag token with no attributes."
            // "Close a p element."
            Token::EndTag { name, .. } if name == "p" => {
                if !self.stack_of_open_elements.has_paragraph_in_button_scope() {
                    self.parse_error("p end tag without an open p");
                    let _ = self.insert_html_element_named("p");
                }
                self.close_p_element();
            }

            // "An end tag whose tag name is "li""
            Token::EndTag { name, .. } if name == "li" => {
                let _ = self.close_block_in_scope("li", Scope::ListItem, Some("li"));
            }

            // "An end tag whose tag name is one of: "dd", "dt""
            Token::EndTag { name, .. } if matches!(name.as_str(), "dd" | "dt") => {
                let _ = self.close_block_in_scope(name, Scope::Default, Some(name.as_str()));
            }

            // "An end tag whose tag name is one of: "h1", "h2", "h3", "h4",
            // "h5", "h6""
            Token::EndTag { name, .. } if is_heading(name) => {
                if !self.has_any_element_in_scope(HEADINGS, Scope::Default) {
                    self.parse_error("heading end tag without an open heading");
                    return;
                }
                self.generate_implied_end_tags(None);
                if !self.current_node_is(name) {
                    self.parse_error("heading closed while other elements were open");
                }
                self.pop_until_one_of(HEADINGS);
            }

            // "A start tag whose tag name is "a""
            Token::StartTag { name, .. } if name == "a" => {
                // "If the list of active formatting elements contains an a
                // element between the end of the list and the last marker on
                // the list (or the start of the list if there is no marker on
                // the list), then this is a parse error; run the adoption agency
                // algorithm for the token, then remove that element from the
                // list of active formatting elements and the stack of open
                // elements if the adoption agency algorithm didn't already
                // remove it."
                if let Some((_, existing)) = self.active_formatting_element_after_last_marker("a")
                {
                    self.parse_error("nested a element");
                    self.run_adoption_agency("a");
                    self.remove_from_active_formatting_elements(existing);
                    self.remove_from_stack(existing);
                }
                self.reconstruct_active_formatting_elements();
                let element = self.insert_html_element(token);
                self.push_active_formatting_element(element, token);
            }

            // "A start tag whose tag name is one of: "b", "big", "code", "em",
            // "font", "i", "s", "small", "strike", "strong", "tt", "u""
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "b" | "big"
                        | "code"
                        | "em"
                        | "font"
                        | "i"
                        | "s"
                        | "small"
                        | "strike"
                        | "strong"
                        | "tt"
                        | "u"
                ) =>
            {
                self.reconstruct_active_formatting_elements();
                let element = self.insert_html_element(token);
                self.push_active_formatting_element(element, token);
            }

            // "A start tag whose tag name is "nobr""
            Token::StartTag { name, .. } if name == "nobr" => {
                self.reconstruct_active_formatting_elements();
                if self.has_element_in_scope("nobr", Scope::Default) {
                    self.parse_error("nested nobr");
                    self.run_adoption_agency("nobr");
                    self.reconstruct_active_formatting_elements();
                }
                let element = self.insert_html_element(token);
                self.push_active_formatting_element(element, token);
            }

            // "An end tag whose tag name is one of: "a", "b", "big", "code",
            // "em", "font", "i", "nobr", "s", "small", "strike", "strong",
            // "tt", "u""
            // "Run the adoption agency algorithm for the token."
            Token::EndTag { name, .. }
                if matches!(
                    name.as_str(),
                    "a" | "b"
                        | "big"
                        | "code"
                        | "em"
                        | "font"
                        | "i"
                        | "nobr"
                        | "s"
                        | "small"
                        | "strike"
                        | "strong"
                        | "tt"
                        | "u"
                ) =>
            {
                self.run_adoption_agency(name);
            }

            // "A start tag whose tag name is one of: "applet", "marquee", "object""
            Token::StartTag { name, .. }
                if matches!(name.as_str(), "applet" | "marquee" | "object") =>
            {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
                self.insert_marker();
                self.frameset_ok = false;
            }

            // "An end tag token whose tag name is one of: "applet", "marquee",
            // "object""
            Token::EndTag { name, .. }
                if matches!(name.as_str(), "applet" | "marquee" | "object") =>
            {
                if self.close_block_in_scope(name, Scope::Default, None) {
                    self.clear_active_formatting_elements_to_last_marker();
                }
            }

            // "A start tag whose tag name is "table""
            // "If the Document is not set to quirks mode, and the stack of open
            // elements has a p element in button scope, then close a p element."
            Token::StartTag { name, .. } if name == "table" => {
                if self.quirks_mode != QuirksMode::Quirks {
                    self.close_p_element_in_button_scope();
                }
                let _ = self.insert_html_element(token);
                self.frameset_ok = false;
                self.insertion_mode = InsertionMode::InTable;
            }

            // "An end tag whose tag name is "br""
            // "Parse error. Drop the attributes from the token, and act as
            // described in the next entry; i.e. act as if this was a "br"
            // start tag token with no attributes, rather than the end tag token
            // that it actually is."
            Token::EndTag { name, .. } if name == "br" => {
                self.parse_error("br end tag");
                self.insert_void_element(&Token::start_tag("br", Vec::new()), true);
            }

            // "A start tag whose tag name is one of: "area", "br", "embed",
            // "img", "keygen", "wbr""
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "area" | "br" | "embed" | "img" | "keygen" | "wbr"
                ) =>
            {
                self.insert_void_element(token, true);
            }

            // "A start tag whose tag name is "input""
            // "If the token does not have an attribute with the name "type", or
            // if it does, but that attribute's value is not an ASCII
            // case-insensitive match for the string "hidden", then: set the
            // frameset-ok flag to "not ok"."
            Token::StartTag { name, .. } if name == "input" => {
                let hidden = token
                    .attribute("type")
                    .is_some_and(|kind| kind.eq_ignore_ascii_case("hidden"));
                self.insert_void_element(token, !hidden);
            }

            // "A start tag whose tag name is one of: "param", "source", "track""
            Token::StartTag { name, .. }
                if matches!(name.as_str(), "param" | "source" | "track") =>
            {
                let _ = self.insert_html_element(token);
                let _ = self.stack_of_open_elements.pop();
            }

            // "A start tag whose tag name is "hr""
            Token::StartTag { name, .. } if name == "hr" => {
                self.close_p_element_in_button_scope();
                let _ = self.insert_html_element(token);
                let _ = self.stack_of_open_elements.pop();
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "image""
            // "Parse error. Change the token's tag name to "img" and reprocess
            // it. (Don't ask.)"
            Token::StartTag {
                name,
                self_closing,
                attributes,
            } if name == "image" => {
                self.parse_error("image start tag");
                let img = Token::StartTag {
                    name: "img".to_string(),
                    self_closing: *self_closing,
                    attributes: attributes.clone(),
                };
                self.process_token(&img);
            }

            // "A start tag whose tag name is "textarea""
            Token::StartTag { name, .. } if name == "textarea" => {
                let _ = self.insert_html_element(token);
                self.ignore_next_line_feed = true;
                self.switch_tokenizer_to(TokenizerState::RCDATA);
                self.original_insertion_mode = Some(self.insertion_mode);
                self.frameset_ok = false;
                self.insertion_mode = InsertionMode::Text;
            }

            // "A start tag whose tag name is "xmp""
            Token::StartTag { name, .. } if name == "xmp" => {
                self.close_p_element_in_button_scope();
                self.reconstruct_active_formatting_elements();
                self.frameset_ok = false;
                self.parse_generic_text_element(token, TokenizerState::RAWTEXT);
            }

            // "A start tag whose tag name is "iframe""
            Token::StartTag { name, .. } if name == "iframe" => {
                self.frameset_ok = false;
                self.parse_generic_text_element(token, TokenizerState::RAWTEXT);
            }

            // "A start tag whose tag name is "noembed""
            // "A start tag whose tag name is "noscript", if the scripting flag
            // is enabled"
            Token::StartTag { name, .. }
                if name == "noembed" || (name == "noscript" && self.options.scripting) =>
            {
                self.parse_generic_text_element(token, TokenizerState::RAWTEXT);
            }

            // "A start tag whose tag name is "select""
            Token::StartTag { name, .. } if name == "select" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
                self.frameset_ok = false;
                // "If the insertion mode is one of "in table", "in caption", "in
                // table body", "in row", or "in cell", then switch the insertion
                // mode to "in select in table". Otherwise, switch the insertion
                // mode to "in select"."
                self.insertion_mode = if matches!(
                    self.insertion_mode,
                    InsertionMode::InTable
                        | InsertionMode::InCaption
                        | InsertionMode::InTableBody
                        | InsertionMode::InRow
                        | InsertionMode::InCell
                ) {
                    InsertionMode::InSelectInTable
                } else {
                    InsertionMode::InSelect
                };
            }

            // "A start tag whose tag name is one of: "optgroup", "option""
            Token::StartTag { name, .. } if matches!(name.as_str(), "optgroup" | "option") => {
                if self.current_node_is("option") {
                    let _ = self.stack_of_open_elements.pop();
                }
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is one of: "rb", "rtc""
            Token::StartTag { name, .. } if matches!(name.as_str(), "rb" | "rtc") => {
                if self.has_element_in_scope("ruby", Scope::Default) {
                    self.generate_implied_end_tags(None);
                    if !self.current_node_is("ruby") {
                        self.parse_error("ruby annotation outside ruby");
                    }
                }
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is one of: "rp", "rt""
            Token::StartTag { name, .. } if matches!(name.as_str(), "rp" | "rt") => {
                if self.has_element_in_scope("ruby", Scope::Default) {
                    self.generate_implied_end_tags(Some("rtc"));
                    if !matches!(self.current_tag_name(), "ruby" | "rtc") {
                        self.parse_error("ruby annotation outside ruby");
                    }
                }
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is "math"" / "svg"
            //
            // Foreign content is kept as plain elements.
            Token::StartTag {
                name, self_closing, ..
            } if matches!(name.as_str(), "math" | "svg") => {
                self.parse_warning(&format!(
                    "<{name}> content is parsed as HTML; foreign content is not supported"
                ));
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
                if *self_closing {
                    let _ = self.stack_of_open_elements.pop();
                }
            }

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "frame", "head", "tbody", "td", "tfoot", "th",
            // "thead", "tr""
            // "Parse error. Ignore the token."
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption"
                        | "col"
                        | "colgroup"
                        | "frame"
                        | "head"
                        | "tbody"
                        | "td"
                        | "tfoot"
                        | "th"
                        | "thead"
                        | "tr"
                ) =>
            {
                self.parse_error("table content outside a table");
            }

            // "Any other start tag"
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token."
            Token::StartTag { .. } => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
            }

            // "Any other end tag"
            Token::EndTag { name, .. } => self.any_other_end_tag(name),
        }
    }

    /// "A start tag whose tag name is "body""
    fn in_body_start_body(&mut self, token: &Token) {
        self.parse_error("unexpected body start tag");
        // "If the stack of open elements has only one node on it, if the second
        // element on the stack of open elements is not a body element, or if
        // there is a template element on the stack of open elements, then
        // ignore the token. (fragment case or there is a template element on
        // the stack)"
        let Some(&body) = self.stack_of_open_elements.get(1) else {
            return;
        };
        if !self.tree.is_element_named(body, "body") || self.stack_contains("template") {
            return;
        }
        // "Otherwise, set the frameset-ok flag to "not ok"; then, for each
        // attribute on the token, check to see if the attribute is already
        // present on the body element (the second element) on the stack of
        // open elements, and if it is not, add the attribute and its
        // corresponding value to that element."
        self.frameset_ok = false;
        self.merge_missing_attributes(body, token);
    }

    /// "A start tag whose tag name is "frameset""
    fn in_body_start_frameset(&mut self, token: &Token) {
        self.parse_error("unexpected frameset start tag");
        let Some(&body) = self.stack_of_open_elements.get(1) else {
            return;
        };
        // "If the frameset-ok flag is set to "not ok", ignore the token."
        if !self.tree.is_element_named(body, "body") || !self.frameset_ok {
            return;
        }
        // "1. Remove the second element on the stack of open elements from its
        // parent node, if it has one."
        self.tree.detach(body);
        // "2. Pop all the nodes from the bottom of the stack of open elements,
        // from the current node up to, but not including, the root html
        // element."
        self.stack_of_open_elements.truncate(1);
        // "3. Insert an HTML element for the token."
        let _ = self.insert_html_element(token);
        // "4. Switch the insertion mode to "in frameset"."
        self.insertion_mode = InsertionMode::InFrameset;
    }

    /// "A start tag whose tag name is "li"" and "one of: "dd", "dt"".
    ///
    /// `closes` lists the elements an open one of which this tag implicitly
    /// ends.
    fn in_body_start_list_item(&mut self, token: &Token, closes: &[&str]) {
        // "1. Set the frameset-ok flag to "not ok"."
        self.frameset_ok = false;

        // "2. Initialize node to be the current node (the bottommost node of
        // the stack)."
        // "3. Loop: If node is an li element, then run these substeps..."
        for index in (0..self.stack_of_open_elements.len()).rev() {
            let node = self.stack_of_open_elements[index];
            let tag = self.tag_name_of(node).to_string();
            if closes.contains(&tag.as_str()) {
                self.generate_implied_end_tags(Some(&tag));
                if !self.current_node_is(&tag) {
                    self.parse_error("list item closed while other elements were open");
                }
                self.pop_until(&tag);
                break;
            }
            // "4. If node is in the special category, but is not an address,
            // div, or p element, then jump to the step labeled done below."
            if is_special(&tag) && !matches!(tag.as_str(), "address" | "div" | "p") {
                break;
            }
        }

        // "6. Done: If the stack of open elements has a p element in button
        // scope, then close a p element."
        self.close_p_element_in_button_scope();
        // "7. Finally, insert an HTML element for the token."
        let _ = self.insert_html_element(token);
    }

    /// "An end tag whose tag name is "form""
    fn in_body_end_form(&mut self) {
        if self.stack_contains("template") {
            // "If the stack of open elements does not have a form element in
            // scope, then this is a parse error; return and ignore the token."
            if !self.has_element_in_scope("form", Scope::Default) {
                self.parse_error("form end tag without an open form");
                return;
            }
            self.generate_implied_end_tags(None);
            if !self.current_node_is("form") {
                self.parse_error("form closed while other elements were open");
            }
            self.pop_until("form");
            return;
        }

        // "1. Let node be the element that the form element pointer is set to,
        // or null if it is not set to an element."
        // "2. Set the form element pointer to null."
        let node = self.form_element_pointer.take();
        // "3. If node is null or the stack of open elements does not have node
        // in scope, then this is a parse error; return and ignore the token."
        let Some(node) = node.filter(|&node| self.has_node_in_scope(node, Scope::Default)) else {
            self.parse_error("form end tag without an open form");
            return;
        };
        // "4. Generate implied end tags."
        self.generate_implied_end_tags(None);
        // "5. If the current node is not node, then this is a parse error."
        if self.current_node() != Some(node) {
            self.parse_error("form closed while other elements were open");
        }
        // "6. Remove node from the stack of open elements."
        self.remove_from_stack(node);
    }

    /// Shared end tag handling for block elements: "If the stack of open
    /// elements does not have an element in scope that is an HTML element
    /// with the same tag name as that of the token, then this is a parse
    /// error; ignore the token. Otherwise: generate implied end tags; if the
    /// current node is not an HTML element with the same tag name as that of
    /// the token, then this is a parse error; pop elements from the stack of
    /// open elements until an HTML element with the same tag name as the
    /// token has been popped from the stack."
    ///
    /// Returns whether the element was closed.
    fn close_block_in_scope(&mut self, tag_name: &str, scope: Scope, except: Option<&str>) -> bool {
        if !self.has_element_in_scope(tag_name, scope) {
            self.parse_error("end tag without a matching open element");
            return false;
        }
        self.generate_implied_end_tags(except);
        if !self.current_node_is(tag_name) {
            self.parse_error("element closed while other elements were open");
        }
        self.pop_until(tag_name);
        true
    }

    /// Void elements: insert, pop immediately, and optionally clear the
    /// frameset-ok flag.
    fn insert_void_element(&mut self, token: &Token, clears_frameset_ok: bool) {
        self.reconstruct_active_formatting_elements();
        let _ = self.insert_html_element(token);
        let _ = self.stack_of_open_elements.pop();
        if clears_frameset_ok {
            self.frameset_ok = false;
        }
    }

    /// "If there is a node in the stack of open elements that is not either a
    /// dd element, a dt element, an li element, an optgroup element, an option
    /// element, a p element, an rb element, an rp element, an rt element, an
    /// rtc element, a tbody element, a td element, a tfoot element, a th
    /// element, a thead element, a tr element, the body element, or the html
    /// element, then this is a parse error."
    fn check_open_elements_at_end_of_body(&mut self) {
        let unclosed = self
            .stack_of_open_elements
            .iter()
            .any(|&id| !may_remain_open_at_end_of_body(self.tag_name_of(id)));
        if unclosed {
            self.parse_error("elements left open at end of body");
        }
    }
}
