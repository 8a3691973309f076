//! Insertion modes after the body or frameset has closed, and the frameset
//! modes themselves.

use quill_dom::NodeId;

use crate::parser::core::{HTMLParser, InsertionMode};
use crate::tokenizer::Token;

impl HTMLParser {
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    pub(in crate::parser) fn handle_after_body_mode(&mut self, token: &Token) {
        match token {
            // "Process the token using the rules for the "in body" insertion mode."
            _ if token.is_whitespace_character() => {
                self.process_using_rules_for(InsertionMode::InBody, token);
            }

            // "A comment token"
            // "Insert a comment as the last child of the first element in the
            // stack of open elements (the html element)."
            Token::Comment { data } => {
                let html = self
                    .stack_of_open_elements
                    .first()
                    .copied()
                    .unwrap_or(NodeId::ROOT);
                self.insert_comment(data, Some(html));
            }

            Token::Doctype { .. } => self.parse_error("unexpected DOCTYPE after body"),

            Token::StartTag { name, .. } if name == "html" => {
                self.process_using_rules_for(InsertionMode::InBody, token);
            }

            // "An end tag whose tag name is "html""
            // "If the parser was created as part of the HTML fragment parsing
            // algorithm, this is a parse error; ignore the token. (fragment
            // case)"
            // "Otherwise, switch the insertion mode to "after after body"."
            Token::EndTag { name, .. } if name == "html" => {
                if self.is_fragment_case() {
                    self.parse_error("html end tag in fragment");
                    return;
                }
                self.insertion_mode = InsertionMode::AfterAfterBody;
            }

            Token::EndOfFile => self.stop_parsing(),

            // "Anything else"
            // "Parse error. Switch the insertion mode to "in body" and reprocess
            // the token."
            _ => {
                self.parse_error("content after body");
                self.reprocess_in(InsertionMode::InBody, token);
            }
        }
    }

    /// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    pub(in crate::parser) fn handle_in_frameset_mode(&mut self, token: &Token) {
        match token {
            Token::Character { data } if token.is_whitespace_character() => {
                self.insert_character(*data);
            }

            Token::Comment { data } => self.insert_comment(data, None),

            Token::Doctype { .. } => self.parse_error("unexpected DOCTYPE in frameset"),

            Token::StartTag { name, .. } if name == "html" => {
                self.process_using_rules_for(InsertionMode::InBody, token);
            }

            // "A start tag whose tag name is "frameset""
            Token::StartTag { name, .. } if name == "frameset" => {
                let _ = self.insert_html_element(token);
            }

            // "An end tag whose tag name is "frameset""
            // "If the current node is the root html element, then this is a parse
            // error; ignore the token. (fragment case)"
            // "Otherwise, pop the current node from the stack of open elements."
            // "If the parser was not created as part of the HTML fragment parsing
            // algorithm (fragment case), and the current node is no longer a
            // frameset element, then switch the insertion mode to "after
            // frameset"."
            Token::EndTag { name, .. } if name == "frameset" => {
                if self.stack_of_open_elements.len() <= 1 {
                    self.parse_error("frameset end tag at the root");
                    return;
                }
                let _ = self.stack_of_open_elements.pop();
                if !self.is_fragment_case() && !self.current_node_is("frameset") {
                    self.insertion_mode = InsertionMode::AfterFrameset;
                }
            }

            // "A start tag whose tag name is "frame""
            // "Insert an HTML element for the token. Immediately pop the
            // current node off the stack of open elements."
            Token::StartTag { name, .. } if name == "frame" => {
                let _ = self.insert_html_element(token);
                let _ = self.stack_of_open_elements.pop();
            }

            Token::StartTag { name, .. } if name == "noframes" => {
                self.process_using_rules_for(InsertionMode::InHead, token);
            }

            // "An end-of-file token"
            // "If the current node is not the root html element, then this is a
            // parse error."
            // "Stop parsing."
            Token::EndOfFile => {
                if self.stack_of_open_elements.len() > 1 {
                    self.parse_error("end of file in frameset");
                }
                self.stop_parsing();
            }

            _ => self.parse_error("unexpected token in frameset"),
        }
    }

    /// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    pub(in crate::parser) fn handle_after_frameset_mode(&mut self, token: &Token) {
        match token {
            Token::Character { data } if token.is_whitespace_character() => {
                self.insert_character(*data);
            }

            Token::Comment { data } => self.insert_comment(data, None),

            Token::Doctype { .. } => self.parse_error("unexpected DOCTYPE after frameset"),

            Token::StartTag { name, .. } if name == "html" => {
                self.process_using_rules_for(InsertionMode::InBody, token);
            }

            // "An end tag whose tag name is "html""
            // "Switch the insertion mode to "after after frameset"."
            Token::EndTag { name, .. } if name == "html" => {
                self.insertion_mode = InsertionMode::AfterAfterFrameset;
            }

            Token::StartTag { name, .. } if name == "noframes" => {
                self.process_using_rules_for(InsertionMode::InHead, token);
            }

            Token::EndOfFile => self.stop_parsing(),

            _ => self.parse_error("unexpected token after frameset"),
        }
    }

    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    pub(in crate::parser) fn handle_after_after_body_mode(&mut self, token: &Token) {
        match token {
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data } => self.insert_comment(data, Some(NodeId::ROOT)),

            // "A DOCTYPE token"
            // "A character token that is one of U+0009 CHARACTER TABULATION,
            // U+000A LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE
            // RETURN (CR), or U+0020 SPACE"
            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion mode."
            Token::Doctype { .. } => self.process_using_rules_for(InsertionMode::InBody, token),
            _ if token.is_whitespace_character() => {
                self.process_using_rules_for(InsertionMode::InBody, token);
            }
            Token::StartTag { name, .. } if name == "html" => {
                self.process_using_rules_for(InsertionMode::InBody, token);
            }

            Token::EndOfFile => self.stop_parsing(),

            // "Anything else"
            // "Parse error. Switch the insertion mode to "in body" and reprocess
            // the token."
            _ => {
                self.parse_error("content after html");
                self.reprocess_in(InsertionMode::InBody, token);
            }
        }
    }

    /// [§ 13.2.6.4.23 The "after after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
    pub(in crate::parser) fn handle_after_after_frameset_mode(&mut self, token: &Token) {
        match token {
            Token::Comment { data } => self.insert_comment(data, Some(NodeId::ROOT)),

            Token::Doctype { .. } => self.process_using_rules_for(InsertionMode::InBody, token),
            _ if token.is_whitespace_character() => {
                self.process_using_rules_for(InsertionMode::InBody, token);
            }
            Token::StartTag { name, .. } if name == "html" => {
                self.process_using_rules_for(InsertionMode::InBody, token);
            }

            Token::EndOfFile => self.stop_parsing(),

            Token::StartTag { name, .. } if name == "noframes" => {
                self.process_using_rules_for(InsertionMode::InHead, token);
            }

            _ => self.parse_error("content after frameset"),
        }
    }
}
