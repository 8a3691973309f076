//! Insertion modes that run before the body: initial through after head,
//! plus the text mode used for raw text and RCDATA elements.

use quill_dom::{DoctypeData, NodeId, NodeType};

use crate::parser::core::{HTMLParser, InsertionMode, QuirksMode};
use crate::parser::elements::QUIRKS_PUBLIC_ID_PREFIXES;
use crate::tokenizer::{Token, TokenizerState};

impl HTMLParser {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    pub(in crate::parser) fn handle_initial_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION,
            // U+000A LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE
            // RETURN (CR), or U+0020 SPACE"
            // "Ignore the token."
            _ if token.is_whitespace_character() => {}

            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data } => self.insert_comment(data, Some(NodeId::ROOT)),

            // "A DOCTYPE token"
            Token::Doctype {
                name,
                public_identifier,
                system_identifier,
                force_quirks,
            } => {
                // "If the DOCTYPE token's name is not "html", or the token's
                // public identifier is not missing, or the token's system
                // identifier is neither missing nor "about:legacy-compat", then
                // there is a parse error."
                if name.as_deref() != Some("html")
                    || public_identifier.is_some()
                    || system_identifier
                        .as_deref()
                        .is_some_and(|id| id != "about:legacy-compat")
                {
                    self.parse_error("unexpected DOCTYPE");
                }

                // "Append a DocumentType node to the Document node..."
                let doctype = self.tree.alloc(NodeType::DocumentType(DoctypeData {
                    name: name.clone().unwrap_or_default(),
                    public_id: public_identifier.clone().unwrap_or_default(),
                    system_id: system_identifier.clone().unwrap_or_default(),
                }));
                self.tree.append_child(NodeId::ROOT, doctype);

                self.quirks_mode = quirks_mode_for_doctype(
                    name.as_deref(),
                    public_identifier.as_deref(),
                    system_identifier.as_deref(),
                    *force_quirks,
                );

                // "Then, switch the insertion mode to "before html"."
                self.insertion_mode = InsertionMode::BeforeHtml;
            }

            // "Anything else"
            // "If the document is not an iframe srcdoc document, then this is
            // a parse error; if the parser cannot change the mode flag is
            // false, set the Document to quirks mode."
            // "In any case, switch the insertion mode to "before html", then
            // reprocess the token."
            _ => {
                self.parse_error("missing DOCTYPE");
                self.quirks_mode = QuirksMode::Quirks;
                self.reprocess_in(InsertionMode::BeforeHtml, token);
            }
        }
    }

    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    pub(in crate::parser) fn handle_before_html_mode(&mut self, token: &Token) {
        match token {
            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => self.parse_error("unexpected DOCTYPE"),

            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data } => self.insert_comment(data, Some(NodeId::ROOT)),

            _ if token.is_whitespace_character() => {}

            // "A start tag whose tag name is "html""
            // "Create an element for the token in the HTML namespace, with the
            // Document as the intended parent. Append it to the Document
            // object. Put this element in the stack of open elements."
            Token::StartTag { name, .. } if name == "html" => {
                let html = self.create_element_for_token(token);
                self.tree.append_child(NodeId::ROOT, html);
                self.push_open_element(html);
                self.insertion_mode = InsertionMode::BeforeHead;
            }

            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::EndTag { name, .. }
                if !matches!(name.as_str(), "head" | "body" | "html" | "br") =>
            {
                self.parse_error("unexpected end tag before html");
            }

            // "Anything else"
            // "Create an html element whose node document is the Document
            // object. Append it to the Document object. Put this element in
            // the stack of open elements."
            // "Switch the insertion mode to "before head", then reprocess the
            // token."
            _ => {
                let html = self.tree.alloc(NodeType::element("html"));
                self.tree.append_child(NodeId::ROOT, html);
                self.push_open_element(html);
                self.reprocess_in(InsertionMode::BeforeHead, token);
            }
        }
    }

    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    pub(in crate::parser) fn handle_before_head_mode(&mut self, token: &Token) {
        match token {
            _ if token.is_whitespace_character() => {}

            Token::Comment { data } => self.insert_comment(data, None),

            Token::Doctype { .. } => self.parse_error("unexpected DOCTYPE"),

            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion mode."
            Token::StartTag { name, .. } if name == "html" => {
                self.process_using_rules_for(InsertionMode::InBody, token);
            }

            // "A start tag whose tag name is "head""
            // "Insert an HTML element for the token."
            // "Set the head element pointer to the newly created head element."
            // "Switch the insertion mode to "in head"."
            Token::StartTag { name, .. } if name == "head" => {
                let head = self.insert_html_element(token);
                self.head_element_pointer = Some(head);
                self.insertion_mode = InsertionMode::InHead;
            }

            Token::EndTag { name, .. }
                if !matches!(name.as_str(), "head" | "body" | "html" | "br") =>
            {
                self.parse_error("unexpected end tag before head");
            }

            // "Anything else"
            // "Insert an HTML element for a "head" start tag token with no
            // attributes."
            // "Set the head element pointer to the newly created head element."
            // "Switch the insertion mode to "in head"."
            // "Reprocess the current token."
            _ => {
                let head = self.insert_html_element_named("head");
                self.head_element_pointer = Some(head);
                self.reprocess_in(InsertionMode::InHead, token);
            }
        }
    }

    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    pub(in crate::parser) fn handle_in_head_mode(&mut self, token: &Token) {
        match token {
            // "Insert the character."
            Token::Character { data } if token.is_whitespace_character() => {
                self.insert_character(*data);
            }

            Token::Comment { data } => self.insert_comment(data, None),

            Token::Doctype { .. } => self.parse_error("unexpected DOCTYPE"),

            Token::StartTag { name, .. } if name == "html" => {
                self.process_using_rules_for(InsertionMode::InBody, token);
            }

            // "A start tag whose tag name is one of: "base", "basefont",
            // "bgsound", "link""
            // "Insert an HTML element for the token. Immediately pop the
            // current node off the stack of open elements."
            // "Acknowledge the token's self-closing flag, if it is set."
            //
            // "A start tag whose tag name is "meta"" is handled the same way;
            // encoding changes do not apply to string input.
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "base" | "basefont" | "bgsound" | "link" | "meta"
                ) =>
            {
                let _ = self.insert_html_element(token);
                let _ = self.stack_of_open_elements.pop();
            }

            // "A start tag whose tag name is "title""
            // "Follow the generic RCDATA element parsing algorithm."
            Token::StartTag { name, .. } if name == "title" => {
                self.parse_generic_text_element(token, TokenizerState::RCDATA);
            }

            // "A start tag whose tag name is "noscript", if the scripting flag
            // is enabled"
            // "A start tag whose tag name is one of: "noframes", "style""
            // "Follow the generic raw text element parsing algorithm."
            Token::StartTag { name, .. }
                if matches!(name.as_str(), "noframes" | "style")
                    || (name == "noscript" && self.options.scripting) =>
            {
                self.parse_generic_text_element(token, TokenizerState::RAWTEXT);
            }

            // "A start tag whose tag name is "noscript", if the scripting flag
            // is disabled"
            // "Insert an HTML element for the token."
            // "Switch the insertion mode to "in head noscript"."
            Token::StartTag { name, .. } if name == "noscript" => {
                let _ = self.insert_html_element(token);
                self.insertion_mode = InsertionMode::InHeadNoscript;
            }

            // "A start tag whose tag name is "script""
            // "Insert the newly created element at the adjusted insertion
            // location. Push the element onto the stack of open elements so
            // that it is the new current node. Switch the tokenizer to the
            // script data state. Let the original insertion mode be the current
            // insertion mode. Switch the insertion mode to "text"."
            Token::StartTag { name, .. } if name == "script" => {
                self.parse_generic_text_element(token, TokenizerState::ScriptData);
            }

            // "An end tag whose tag name is "head""
            // "Pop the current node (which will be the head element) off the
            // stack of open elements."
            // "Switch the insertion mode to "after head"."
            Token::EndTag { name, .. } if name == "head" => {
                let _ = self.stack_of_open_elements.pop();
                self.insertion_mode = InsertionMode::AfterHead;
            }

            // "An end tag whose tag name is one of: "body", "html", "br""
            // "Act as described in the "anything else" entry below."
            Token::EndTag { name, .. } if matches!(name.as_str(), "body" | "html" | "br") => {
                self.in_head_anything_else(token);
            }

            // "A start tag whose tag name is "template""
            Token::StartTag { name, .. } if name == "template" => {
                let _ = self.insert_html_element(token);
                self.insert_marker();
                self.frameset_ok = false;
                self.insertion_mode = InsertionMode::InTemplate;
                self.template_insertion_modes
                    .push(InsertionMode::InTemplate);
            }

            // "An end tag whose tag name is "template""
            Token::EndTag { name, .. } if name == "template" => {
                if !self.stack_contains("template") {
                    self.parse_error("template end tag without an open template");
                    return;
                }
                self.generate_all_implied_end_tags_thoroughly();
                if !self.current_node_is("template") {
                    self.parse_error("template closed while other elements were open");
                }
                self.pop_until("template");
                self.clear_active_formatting_elements_to_last_marker();
                let _ = self.template_insertion_modes.pop();
                self.reset_insertion_mode_appropriately();
            }

            // "A start tag whose tag name is "head""
            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::StartTag { name, .. } if name == "head" => {
                self.parse_error("nested head start tag");
            }
            Token::EndTag { .. } => self.parse_error("unexpected end tag in head"),

            _ => self.in_head_anything_else(token),
        }
    }

    /// "Pop the current node (which will be the head element) off the stack of
    /// open elements. Switch the insertion mode to "after head". Reprocess the
    /// token."
    fn in_head_anything_else(&mut self, token: &Token) {
        let _ = self.stack_of_open_elements.pop();
        self.reprocess_in(InsertionMode::AfterHead, token);
    }

    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    pub(in crate::parser) fn handle_in_head_noscript_mode(&mut self, token: &Token) {
        match token {
            Token::Doctype { .. } => self.parse_error("unexpected DOCTYPE"),

            Token::StartTag { name, .. } if name == "html" => {
                self.process_using_rules_for(InsertionMode::InBody, token);
            }

            // "An end tag whose tag name is "noscript""
            // "Pop the current node (which will be a noscript element) from
            // the stack of open elements; the new current node will be a head
            // element."
            Token::EndTag { name, .. } if name == "noscript" => {
                let _ = self.stack_of_open_elements.pop();
                self.insertion_mode = InsertionMode::InHead;
            }

            // "Process the token using the rules for the "in head" insertion mode."
            _ if token.is_whitespace_character() => {
                self.process_using_rules_for(InsertionMode::InHead, token);
            }
            Token::Comment { .. } => self.process_using_rules_for(InsertionMode::InHead, token),
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "basefont" | "bgsound" | "link" | "meta" | "noframes" | "style"
                ) =>
            {
                self.process_using_rules_for(InsertionMode::InHead, token);
            }

            Token::StartTag { name, .. } if matches!(name.as_str(), "head" | "noscript") => {
                self.parse_error("unexpected start tag in noscript");
            }
            Token::EndTag { name, .. } if name != "br" => {
                self.parse_error("unexpected end tag in noscript");
            }

            // "Anything else"
            // "Parse error."
            // "Pop the current node (which will be a noscript element) from
            // the stack of open elements; the new current node will be a head
            // element."
            // "Switch the insertion mode to "in head"."
            // "Reprocess the token."
            _ => {
                self.parse_error("unexpected content in noscript");
                let _ = self.stack_of_open_elements.pop();
                self.reprocess_in(InsertionMode::InHead, token);
            }
        }
    }

    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    pub(in crate::parser) fn handle_after_head_mode(&mut self, token: &Token) {
        match token {
            Token::Character { data } if token.is_whitespace_character() => {
                self.insert_character(*data);
            }

            Token::Comment { data } => self.insert_comment(data, None),

            Token::Doctype { .. } => self.parse_error("unexpected DOCTYPE"),

            Token::StartTag { name, .. } if name == "html" => {
                self.process_using_rules_for(InsertionMode::InBody, token);
            }

            // "A start tag whose tag name is "body""
            // "Insert an HTML element for the token."
            // "Set the frameset-ok flag to "not ok"."
            // "Switch the insertion mode to "in body"."
            Token::StartTag { name, .. } if name == "body" => {
                let _ = self.insert_html_element(token);
                self.frameset_ok = false;
                self.insertion_mode = InsertionMode::InBody;
            }

            // "A start tag whose tag name is "frameset""
            Token::StartTag { name, .. } if name == "frameset" => {
                let _ = self.insert_html_element(token);
                self.insertion_mode = InsertionMode::InFrameset;
            }

            // "A start tag whose tag name is one of: "base", "basefont",
            // "bgsound", "link", "meta", "noframes", "script", "style",
            // "template", "title""
            // "Parse error."
            // "Push the node pointed to by the head element pointer onto the
            // stack of open elements."
            // "Process the token using the rules for the "in head" insertion mode."
            // "Remove the node pointed to by the head element pointer from the
            // stack of open elements. (It might not be the current node at this
            // point.)"
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
                self.parse_error("head content after head");
                let Some(head) = self.head_element_pointer else {
                    self.process_using_rules_for(InsertionMode::InHead, token);
                    return;
                };
                self.push_open_element(head);
                self.process_using_rules_for(InsertionMode::InHead, token);
                self.remove_from_stack(head);
            }

            Token::EndTag { name, .. } if name == "template" => {
                self.process_using_rules_for(InsertionMode::InHead, token);
            }

            Token::StartTag { name, .. } if name == "head" => {
                self.parse_error("head start tag after head");
            }
            Token::EndTag { name, .. }
                if !matches!(name.as_str(), "body" | "html" | "br") =>
            {
                self.parse_error("unexpected end tag after head");
            }

            // "Anything else"
            // "Insert an HTML element for a "body" start tag token with no
            // attributes."
            // "Switch the insertion mode to "in body"."
            // "Reprocess the current token."
            _ => {
                let _ = self.insert_html_element_named("body");
                self.reprocess_in(InsertionMode::InBody, token);
            }
        }
    }

    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    pub(in crate::parser) fn handle_text_mode(&mut self, token: &Token) {
        match token {
            // "Insert the token's character."
            Token::Character { data } => self.insert_character(*data),

            // "An end-of-file token"
            // "Parse error."
            // "Pop the current node off the stack of open elements."
            // "Switch the insertion mode to the original insertion mode and
            // reprocess the token."
            Token::EndOfFile => {
                self.parse_error("end of file in raw text element");
                let _ = self.stack_of_open_elements.pop();
                let mode = self.take_original_insertion_mode();
                self.reprocess_in(mode, token);
            }

            // "Any other end tag"
            // "Pop the current node off the stack of open elements."
            // "Switch the insertion mode to the original insertion mode."
            Token::EndTag { .. } => {
                let _ = self.stack_of_open_elements.pop();
                self.insertion_mode = self.take_original_insertion_mode();
            }

            // The tokenizer only produces characters and end tags in the text
            // content models.
            _ => {}
        }
    }

    /// [§ 13.2.6.2 Parsing elements that contain only text](https://html.spec.whatwg.org/multipage/parsing.html#parsing-elements-that-contain-only-text)
    ///
    /// "Insert an HTML element for the token. If the algorithm that was
    /// invoked is the generic raw text element parsing algorithm, switch the
    /// tokenizer to the RAWTEXT state; otherwise the algorithm invoked was the
    /// generic RCDATA element parsing algorithm, switch the tokenizer to the
    /// RCDATA state. Let the original insertion mode be the current insertion
    /// mode. Then, switch the insertion mode to "text"."
    pub(in crate::parser) fn parse_generic_text_element(
        &mut self,
        token: &Token,
        state: TokenizerState,
    ) {
        let _ = self.insert_html_element(token);
        self.switch_tokenizer_to(state);
        self.original_insertion_mode = Some(self.insertion_mode);
        self.insertion_mode = InsertionMode::Text;
    }

    pub(in crate::parser) fn take_original_insertion_mode(&mut self) -> InsertionMode {
        self.original_insertion_mode
            .take()
            .unwrap_or(InsertionMode::InBody)
    }
}

/// [§ 13.2.6.4.1](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
///
/// Document mode for a DOCTYPE token. Identifier comparisons are ASCII
/// case-insensitive.
fn quirks_mode_for_doctype(
    name: Option<&str>,
    public_id: Option<&str>,
    system_id: Option<&str>,
    force_quirks: bool,
) -> QuirksMode {
    let public = public_id.map(str::to_ascii_lowercase);
    let system = system_id.map(str::to_ascii_lowercase);
    let public_starts_with =
        |prefix: &str| public.as_deref().is_some_and(|id| id.starts_with(prefix));

    let quirks = force_quirks
        || name != Some("html")
        || matches!(
            public.as_deref(),
            Some("-//w3o//dtd w3 html strict 3.0//en//" | "-/w3c/dtd html 4.0 transitional/en" | "html")
        )
        || system.as_deref() == Some("http://www.ibm.com/data/dtd/v11/ibmxhtml1-transitional.dtd")
        || QUIRKS_PUBLIC_ID_PREFIXES
            .iter()
            .any(|prefix| public_starts_with(prefix))
        || (system.is_none()
            && (public_starts_with("-//w3c//dtd html 4.01 frameset//")
                || public_starts_with("-//w3c//dtd html 4.01 transitional//")));
    if quirks {
        return QuirksMode::Quirks;
    }

    let limited = public_starts_with("-//w3c//dtd xhtml 1.0 frameset//")
        || public_starts_with("-//w3c//dtd xhtml 1.0 transitional//")
        || (system.is_some()
            && (public_starts_with("-//w3c//dtd html 4.01 frameset//")
                || public_starts_with("-//w3c//dtd html 4.01 transitional//")));
    if limited {
        QuirksMode::LimitedQuirks
    } else {
        QuirksMode::NoQuirks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html5_doctype_is_no_quirks() {
        assert_eq!(
            quirks_mode_for_doctype(Some("html"), None, None, false),
            QuirksMode::NoQuirks
        );
    }

    #[test]
    fn test_transitional_doctype_modes() {
        let public = Some("-//W3C//DTD HTML 4.01 Transitional//EN");
        assert_eq!(
            quirks_mode_for_doctype(Some("html"), public, None, false),
            QuirksMode::Quirks
        );
        assert_eq!(
            quirks_mode_for_doctype(
                Some("html"),
                public,
                Some("http://www.w3.org/TR/html4/loose.dtd"),
                false
            ),
            QuirksMode::LimitedQuirks
        );
    }
}
