use strum_macros::{Display, EnumString};

use quill_common::warning::warn_once;
use quill_dom::{DomTree, NodeId};

use super::stack::StackOfOpenElements;
use crate::tokenizer::{HTMLTokenizer, Token, TokenizerState};

/// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
///
/// "The insertion mode is a state variable that controls the primary operation
/// of the tree construction stage."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum InsertionMode {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    Initial,
    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    BeforeHtml,
    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    BeforeHead,
    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    InHead,
    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    InHeadNoscript,
    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    AfterHead,
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    InBody,
    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    Text,
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    InTable,
    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    InTableText,
    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    InCaption,
    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolgroup)
    InColumnGroup,
    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intbody)
    InTableBody,
    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intr)
    InRow,
    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intd)
    InCell,
    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    InSelect,
    /// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    InSelectInTable,
    /// [§ 13.2.6.4.18 The "in template" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intemplate)
    InTemplate,
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    AfterBody,
    /// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    InFrameset,
    /// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    AfterFrameset,
    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    AfterAfterBody,
    /// [§ 13.2.6.4.23 The "after after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
    AfterAfterFrameset,
}

/// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
///
/// A recoverable problem found while building the tree. Parsing always
/// continues after an issue is recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// What went wrong.
    pub message: String,
    /// Index of the token being processed when the issue was recorded.
    pub token_index: usize,
    /// True for parse errors defined by the standard; false for warnings
    /// about content this parser handles in a simplified way. Strict mode
    /// promotes warnings to errors.
    pub is_error: bool,
}

/// [§ 7.1 Document mode](https://dom.spec.whatwg.org/#concept-document-mode)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
pub enum QuirksMode {
    /// Standards mode.
    #[default]
    NoQuirks,
    /// Limited quirks ("almost standards") mode.
    LimitedQuirks,
    /// Quirks mode.
    Quirks,
}

/// Tree builder configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserOptions {
    /// Record warnings as errors.
    pub strict: bool,
    /// [§ 13.2.4.5 The scripting flag](https://html.spec.whatwg.org/multipage/parsing.html#scripting-flag)
    ///
    /// When set, `<noscript>` content is raw text; otherwise it is parsed as
    /// markup.
    pub scripting: bool,
}

/// [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
///
/// "The list of active formatting elements... is used to handle mis-nested
/// formatting element tags."
#[derive(Debug, Clone)]
pub enum ActiveFormattingElement {
    /// A formatting element and the token it was created for, kept so the
    /// element can be recreated by reconstruction or the adoption agency.
    Element {
        /// The element in the tree.
        node_id: NodeId,
        /// The start tag that created it.
        token: Token,
    },
    /// "A marker is an entry in the list of active formatting elements that is
    /// distinct from any element."
    ///
    /// Pushed when entering applet, object, marquee, template, td, th and
    /// caption.
    Marker,
}

/// Result of parsing a complete document.
#[derive(Debug)]
pub struct ParsedDocument {
    /// The document tree; `NodeId::ROOT` is the Document node.
    pub tree: DomTree,
    /// Recoverable issues seen while parsing.
    pub issues: Vec<ParseIssue>,
    /// Document mode chosen from the DOCTYPE.
    pub quirks_mode: QuirksMode,
}

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
///
/// The tree builder. It owns the tokenizer and pulls one token at a time, so
/// tokenizer state switches it requests take effect before the next token is
/// produced.
pub struct HTMLParser {
    pub(super) tokenizer: HTMLTokenizer,
    pub(super) options: ParserOptions,

    pub(super) insertion_mode: InsertionMode,
    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#original-insertion-mode)
    pub(super) original_insertion_mode: Option<InsertionMode>,
    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#stack-of-template-insertion-modes)
    pub(super) template_insertion_modes: Vec<InsertionMode>,

    /// [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    pub(super) stack_of_open_elements: StackOfOpenElements,
    pub(super) active_formatting_elements: Vec<ActiveFormattingElement>,

    /// [§ 13.2.4.4 The element pointers](https://html.spec.whatwg.org/multipage/parsing.html#the-element-pointers)
    pub(super) head_element_pointer: Option<NodeId>,
    pub(super) form_element_pointer: Option<NodeId>,

    /// [§ 13.2.4.5 Other parsing state flags](https://html.spec.whatwg.org/multipage/parsing.html#frameset-ok-flag)
    pub(super) frameset_ok: bool,

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    pub(super) foster_parenting: bool,

    /// [§ 13.2.6.4.10](https://html.spec.whatwg.org/multipage/parsing.html#concept-pending-table-char-tokens)
    pub(super) pending_table_character_tokens: Vec<char>,

    /// Context element when parsing a fragment. It lives in `tree` but is not
    /// attached to the document.
    pub(super) context_element: Option<NodeId>,

    /// Set after `<pre>`, `<listing>` and `<textarea>`: "If the next token is a
    /// U+000A LINE FEED (LF) character token, then ignore that token."
    pub(super) ignore_next_line_feed: bool,

    /// Content model switch for the tokenizer, applied by the driver before
    /// the next token is pulled.
    pub(super) requested_tokenizer_state: Option<TokenizerState>,

    pub(super) quirks_mode: QuirksMode,
    pub(super) tree: DomTree,
    pub(super) issues: Vec<ParseIssue>,
    pub(super) token_index: usize,
    pub(super) stopped: bool,
}

impl HTMLParser {
    /// Create a parser for a complete document.
    #[must_use]
    pub fn new(input: &str, options: ParserOptions) -> Self {
        Self {
            tokenizer: HTMLTokenizer::new(input),
            options,
            insertion_mode: InsertionMode::Initial,
            original_insertion_mode: None,
            template_insertion_modes: Vec::new(),
            stack_of_open_elements: StackOfOpenElements::default(),
            active_formatting_elements: Vec::new(),
            head_element_pointer: None,
            form_element_pointer: None,
            frameset_ok: true,
            foster_parenting: false,
            pending_table_character_tokens: Vec::new(),
            context_element: None,
            ignore_next_line_feed: false,
            requested_tokenizer_state: None,
            quirks_mode: QuirksMode::NoQuirks,
            tree: DomTree::new(),
            issues: Vec::new(),
            token_index: 0,
            stopped: false,
        }
    }

    /// Run the parser to the end of input and return the document.
    #[must_use]
    pub fn run(mut self) -> ParsedDocument {
        self.drive();
        ParsedDocument {
            tree: self.tree,
            issues: self.issues,
            quirks_mode: self.quirks_mode,
        }
    }

    /// Current insertion mode.
    #[must_use]
    pub const fn insertion_mode(&self) -> InsertionMode {
        self.insertion_mode
    }

    /// Pull tokens until end of input or until parsing stops.
    ///
    /// Each token is fully processed, and any tokenizer switch it caused is
    /// applied, before the next one is requested.
    pub(super) fn drive(&mut self) {
        while !self.stopped {
            let token = self.tokenizer.next_token();
            let is_eof = token.is_eof();

            let skip = self.ignore_next_line_feed;
            self.ignore_next_line_feed = false;
            if !(skip && token == (Token::Character { data: '\n' })) {
                self.process_token(&token);
            }

            if let Some(state) = self.requested_tokenizer_state.take() {
                self.tokenizer.switch_to(state);
            }
            self.token_index += 1;

            if is_eof {
                self.stopped = true;
            }
        }
    }

    /// [§ 13.2.6 Tree construction dispatcher](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction-dispatcher)
    ///
    /// Foreign content (SVG and MathML) is not modelled, so every token goes
    /// through the rules of the current insertion mode.
    pub(super) fn process_token(&mut self, token: &Token) {
        self.process_token_in(self.insertion_mode, token);
    }

    fn process_token_in(&mut self, mode: InsertionMode, token: &Token) {
        match mode {
            InsertionMode::Initial => self.handle_initial_mode(token),
            InsertionMode::BeforeHtml => self.handle_before_html_mode(token),
            InsertionMode::BeforeHead => self.handle_before_head_mode(token),
            InsertionMode::InHead => self.handle_in_head_mode(token),
            InsertionMode::InHeadNoscript => self.handle_in_head_noscript_mode(token),
            InsertionMode::AfterHead => self.handle_after_head_mode(token),
            InsertionMode::InBody => self.handle_in_body_mode(token),
            InsertionMode::Text => self.handle_text_mode(token),
            InsertionMode::InTable => self.handle_in_table_mode(token),
            InsertionMode::InTableText => self.handle_in_table_text_mode(token),
            InsertionMode::InCaption => self.handle_in_caption_mode(token),
            InsertionMode::InColumnGroup => self.handle_in_column_group_mode(token),
            InsertionMode::InTableBody => self.handle_in_table_body_mode(token),
            InsertionMode::InRow => self.handle_in_row_mode(token),
            InsertionMode::InCell => self.handle_in_cell_mode(token),
            InsertionMode::InSelect => self.handle_in_select_mode(token),
            InsertionMode::InSelectInTable => self.handle_in_select_in_table_mode(token),
            InsertionMode::InTemplate => self.handle_in_template_mode(token),
            InsertionMode::AfterBody => self.handle_after_body_mode(token),
            InsertionMode::InFrameset => self.handle_in_frameset_mode(token),
            InsertionMode::AfterFrameset => self.handle_after_frameset_mode(token),
            InsertionMode::AfterAfterBody => self.handle_after_after_body_mode(token),
            InsertionMode::AfterAfterFrameset => self.handle_after_after_frameset_mode(token),
        }
    }

    /// "Process the token using the rules for the X insertion mode": run
    /// another mode's rules without switching to it. Mode switches made by
    /// those rules apply to the real insertion mode.
    pub(super) fn process_using_rules_for(&mut self, mode: InsertionMode, token: &Token) {
        self.process_token_in(mode, token);
    }

    /// Switch the insertion mode and reprocess the token in it.
    pub(super) fn reprocess_in(&mut self, mode: InsertionMode, token: &Token) {
        self.insertion_mode = mode;
        self.process_token(token);
    }

    /// Ask the driver to switch the tokenizer before the next token.
    pub(super) const fn switch_tokenizer_to(&mut self, state: TokenizerState) {
        self.requested_tokenizer_state = Some(state);
    }

    /// Record a parse error. Errors are logged once per message.
    pub(super) fn parse_error(&mut self, message: &str) {
        warn_once("HTML Parser", message);
        self.issues.push(ParseIssue {
            message: message.to_string(),
            token_index: self.token_index,
            is_error: true,
        });
    }

    /// Record a warning about content handled in a simplified way.
    pub(super) fn parse_warning(&mut self, message: &str) {
        warn_once("HTML Parser", message);
        self.issues.push(ParseIssue {
            message: message.to_string(),
            token_index: self.token_index,
            is_error: self.options.strict,
        });
    }

    /// "Stop parsing."
    pub(super) const fn stop_parsing(&mut self) {
        self.stopped = true;
    }

    /// Whether the parser was created for the fragment parsing algorithm.
    pub(super) const fn is_fragment_case(&self) -> bool {
        self.context_element.is_some()
    }
}
