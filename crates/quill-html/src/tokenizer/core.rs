use std::collections::VecDeque;

use strum_macros::{Display, EnumString};

use super::token::Token;

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// The tokenizer state machine. Each state corresponds to a section in § 13.2.5.
/// The tree builder may move the tokenizer into any of the content model
/// states (`Data`, `RCDATA`, `RAWTEXT`, `ScriptData`, `PLAINTEXT`) between tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum TokenizerState {
    /// § 13.2.5.1
    Data,
    /// § 13.2.5.2
    RCDATA,
    /// § 13.2.5.3
    RAWTEXT,
    /// § 13.2.5.4
    ScriptData,
    /// § 13.2.5.5
    PLAINTEXT,
    /// § 13.2.5.6
    TagOpen,
    /// § 13.2.5.7
    EndTagOpen,
    /// § 13.2.5.8
    TagName,
    /// § 13.2.5.9
    RCDATALessThanSign,
    /// § 13.2.5.10
    RCDATAEndTagOpen,
    /// § 13.2.5.11
    RCDATAEndTagName,
    /// § 13.2.5.12
    RAWTEXTLessThanSign,
    /// § 13.2.5.13
    RAWTEXTEndTagOpen,
    /// § 13.2.5.14
    RAWTEXTEndTagName,
    /// § 13.2.5.15
    ScriptDataLessThanSign,
    /// § 13.2.5.16
    ScriptDataEndTagOpen,
    /// § 13.2.5.17
    ScriptDataEndTagName,
    /// § 13.2.5.18
    ScriptDataEscapeStart,
    /// § 13.2.5.19
    ScriptDataEscapeStartDash,
    /// § 13.2.5.20
    ScriptDataEscaped,
    /// § 13.2.5.21
    ScriptDataEscapedDash,
    /// § 13.2.5.22
    ScriptDataEscapedDashDash,
    /// § 13.2.5.23
    ScriptDataEscapedLessThanSign,
    /// § 13.2.5.24
    ScriptDataEscapedEndTagOpen,
    /// § 13.2.5.25
    ScriptDataEscapedEndTagName,
    /// § 13.2.5.26
    ScriptDataDoubleEscapeStart,
    /// § 13.2.5.27
    ScriptDataDoubleEscaped,
    /// § 13.2.5.28
    ScriptDataDoubleEscapedDash,
    /// § 13.2.5.29
    ScriptDataDoubleEscapedDashDash,
    /// § 13.2.5.30
    ScriptDataDoubleEscapedLessThanSign,
    /// § 13.2.5.31
    ScriptDataDoubleEscapeEnd,
    /// § 13.2.5.32
    BeforeAttributeName,
    /// § 13.2.5.33
    AttributeName,
    /// § 13.2.5.34
    AfterAttributeName,
    /// § 13.2.5.35
    BeforeAttributeValue,
    /// § 13.2.5.36
    AttributeValueDoubleQuoted,
    /// § 13.2.5.37
    AttributeValueSingleQuoted,
    /// § 13.2.5.38
    AttributeValueUnquoted,
    /// § 13.2.5.39
    AfterAttributeValueQuoted,
    /// § 13.2.5.40
    SelfClosingStartTag,
    /// § 13.2.5.41
    BogusComment,
    /// § 13.2.5.42
    MarkupDeclarationOpen,
    /// § 13.2.5.43
    CommentStart,
    /// § 13.2.5.44
    CommentStartDash,
    /// § 13.2.5.45
    Comment,
    /// § 13.2.5.46
    CommentLessThanSign,
    /// § 13.2.5.47
    CommentLessThanSignBang,
    /// § 13.2.5.48
    CommentLessThanSignBangDash,
    /// § 13.2.5.49
    CommentLessThanSignBangDashDash,
    /// § 13.2.5.50
    CommentEndDash,
    /// § 13.2.5.51
    CommentEnd,
    /// § 13.2.5.52
    CommentEndBang,
    /// § 13.2.5.53
    DOCTYPE,
    /// § 13.2.5.54
    BeforeDOCTYPEName,
    /// § 13.2.5.55
    DOCTYPEName,
    /// § 13.2.5.56
    AfterDOCTYPEName,
    /// § 13.2.5.57
    AfterDOCTYPEPublicKeyword,
    /// § 13.2.5.58
    BeforeDOCTYPEPublicIdentifier,
    /// § 13.2.5.59
    DOCTYPEPublicIdentifierDoubleQuoted,
    /// § 13.2.5.60
    DOCTYPEPublicIdentifierSingleQuoted,
    /// § 13.2.5.61
    AfterDOCTYPEPublicIdentifier,
    /// § 13.2.5.62
    BetweenDOCTYPEPublicAndSystemIdentifiers,
    /// § 13.2.5.63
    AfterDOCTYPESystemKeyword,
    /// § 13.2.5.64
    BeforeDOCTYPESystemIdentifier,
    /// § 13.2.5.65
    DOCTYPESystemIdentifierDoubleQuoted,
    /// § 13.2.5.66
    DOCTYPESystemIdentifierSingleQuoted,
    /// § 13.2.5.67
    AfterDOCTYPESystemIdentifier,
    /// § 13.2.5.68
    BogusDOCTYPE,
    /// § 13.2.5.69
    CDATASection,
    /// § 13.2.5.70
    CDATASectionBracket,
    /// § 13.2.5.71
    CDATASectionEnd,
    /// § 13.2.5.72
    CharacterReference,
    /// § 13.2.5.73
    NamedCharacterReference,
    /// § 13.2.5.74
    AmbiguousAmpersand,
    /// § 13.2.5.75
    NumericCharacterReference,
    /// § 13.2.5.76
    HexadecimalCharacterReferenceStart,
    /// § 13.2.5.77
    DecimalCharacterReferenceStart,
    /// § 13.2.5.78
    HexadecimalCharacterReference,
    /// § 13.2.5.79
    DecimalCharacterReference,
    /// § 13.2.5.80
    NumericCharacterReferenceEnd,
}

impl TokenizerState {
    /// Content model state for an element whose text is not parsed as markup,
    /// as chosen by the tree builder for the matching start tag (and by the
    /// fragment parser for its context element).
    ///
    /// `noscript` only switches to RAWTEXT when scripting is enabled.
    #[must_use]
    pub fn for_raw_text_element(tag_name: &str, scripting: bool) -> Option<Self> {
        match tag_name {
            "title" | "textarea" => Some(Self::RCDATA),
            "style" | "xmp" | "iframe" | "noembed" | "noframes" => Some(Self::RAWTEXT),
            "noscript" if scripting => Some(Self::RAWTEXT),
            "script" => Some(Self::ScriptData),
            "plaintext" => Some(Self::PLAINTEXT),
            _ => None,
        }
    }
}

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// "Implementations must act as if they used the following state machine to tokenize HTML."
///
/// The tokenizer is pull-based: each call to [`HTMLTokenizer::next_token`]
/// advances the state machine just far enough to produce one token. Nothing
/// is tokenized ahead of the consumer, so a state switch requested between
/// two calls takes effect on the very next input character.
pub struct HTMLTokenizer {
    pub(super) state: TokenizerState,
    pub(super) return_state: Option<TokenizerState>,

    /// [§ 13.2.3.5 Preprocessing the input stream](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream)
    ///
    /// Input with CR and CRLF already normalized to LF.
    pub(super) input: Vec<char>,
    pub(super) current_pos: usize,
    pub(super) current_input_character: Option<char>,

    /// "Reconsume in the X state" leaves the current character in place for
    /// the next step.
    pub(super) reconsume: bool,

    pub(super) current_token: Option<Token>,

    /// Tokens emitted by the last step and not yet handed out.
    pub(super) pending: VecDeque<Token>,
    pub(super) emitted_eof: bool,

    /// "The last start tag token emitted is used as part of the tree
    /// construction stage and in the RCDATA, RAWTEXT, and script data states."
    pub(super) last_start_tag_name: Option<String>,

    pub(super) temporary_buffer: String,

    /// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
    pub(super) character_reference_code: u32,

    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    ///
    /// CDATA sections are only recognized when the adjusted current node is
    /// not an HTML element.
    pub(super) cdata_allowed: bool,

    pub(super) parse_errors: usize,

    /// Tokens collected by [`HTMLTokenizer::run`].
    token_stream: Vec<Token>,
}

impl HTMLTokenizer {
    /// Create a new tokenizer for the given input, starting in the data state.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self {
            state: TokenizerState::Data,
            return_state: None,
            input: Self::preprocess(input),
            current_pos: 0,
            current_input_character: None,
            reconsume: false,
            current_token: None,
            pending: VecDeque::new(),
            emitted_eof: false,
            last_start_tag_name: None,
            temporary_buffer: String::new(),
            character_reference_code: 0,
            cdata_allowed: false,
            parse_errors: 0,
            token_stream: Vec::new(),
        }
    }

    /// [§ 13.2.3.5 Preprocessing the input stream](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream)
    ///
    /// "Before the tokenization stage, the input stream must be preprocessed by
    /// normalizing newlines."
    fn preprocess(input: &str) -> Vec<char> {
        let mut chars = Vec::with_capacity(input.len());
        let mut iter = input.chars().peekable();
        while let Some(c) = iter.next() {
            if c == '\r' {
                if iter.peek() == Some(&'\n') {
                    let _ = iter.next();
                }
                chars.push('\n');
            } else {
                chars.push(c);
            }
        }
        chars
    }

    /// Produce the next token. After the end-of-file token has been returned
    /// every further call returns `EndOfFile` again.
    pub fn next_token(&mut self) -> Token {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return token;
            }
            if self.emitted_eof {
                return Token::EndOfFile;
            }
            self.step();
        }
    }

    /// Switch the content model state. Called by the tree builder between
    /// tokens, e.g. after inserting a `<title>` element.
    pub const fn switch_to(&mut self, new_state: TokenizerState) {
        self.state = new_state;
    }

    /// The state the next input character will be consumed in.
    #[must_use]
    pub const fn state(&self) -> TokenizerState {
        self.state
    }

    /// Set the tag name that an "appropriate end tag" must match. The fragment
    /// parser uses this so that `</title>` closes a `title` context.
    pub fn set_last_start_tag(&mut self, tag_name: &str) {
        self.last_start_tag_name = Some(tag_name.to_string());
    }

    /// Allow `<![CDATA[` sections. Only meaningful in foreign content.
    pub const fn set_cdata_allowed(&mut self, allowed: bool) {
        self.cdata_allowed = allowed;
    }

    /// Number of parse errors seen so far.
    #[must_use]
    pub const fn parse_error_count(&self) -> usize {
        self.parse_errors
    }

    /// Tokenize the whole input in batch mode.
    ///
    /// Without a tree builder nobody switches the content model, so this
    /// applies the raw text switches the tree builder would make for
    /// `title`, `style`, `script` and friends.
    pub fn run(&mut self) {
        loop {
            let token = self.next_token();
            if let Token::StartTag {
                name, self_closing, ..
            } = &token
                && !self_closing
                && let Some(state) = TokenizerState::for_raw_text_element(name, false)
            {
                self.switch_to(state);
            }
            let done = token.is_eof();
            self.token_stream.push(token);
            if done {
                break;
            }
        }
    }

    /// Consume the tokenizer and return the tokens collected by [`Self::run`].
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.token_stream
    }

    /// Run one step of the state machine: consume (or reconsume) a character
    /// and dispatch on the current state.
    fn step(&mut self) {
        if self.reconsume {
            self.reconsume = false;
        } else {
            self.current_input_character = self.consume();
        }

        match self.state {
            TokenizerState::Data => self.handle_data_state(),
            TokenizerState::RCDATA => self.handle_rcdata_state(),
            TokenizerState::RAWTEXT => self.handle_rawtext_state(),
            TokenizerState::ScriptData => self.handle_script_data_state(),
            TokenizerState::PLAINTEXT => self.handle_plaintext_state(),
            TokenizerState::TagOpen => self.handle_tag_open_state(),
            TokenizerState::EndTagOpen => self.handle_end_tag_open_state(),
            TokenizerState::TagName => self.handle_tag_name_state(),
            TokenizerState::RCDATALessThanSign => {
                self.handle_text_less_than_sign_state(
                    TokenizerState::RCDATAEndTagOpen,
                    TokenizerState::RCDATA,
                );
            }
            TokenizerState::RCDATAEndTagOpen => {
                self.handle_text_end_tag_open_state(
                    TokenizerState::RCDATAEndTagName,
                    TokenizerState::RCDATA,
                );
            }
            TokenizerState::RCDATAEndTagName => {
                self.handle_text_end_tag_name_state(TokenizerState::RCDATA);
            }
            TokenizerState::RAWTEXTLessThanSign => {
                self.handle_text_less_than_sign_state(
                    TokenizerState::RAWTEXTEndTagOpen,
                    TokenizerState::RAWTEXT,
                );
            }
            TokenizerState::RAWTEXTEndTagOpen => {
                self.handle_text_end_tag_open_state(
                    TokenizerState::RAWTEXTEndTagName,
                    TokenizerState::RAWTEXT,
                );
            }
            TokenizerState::RAWTEXTEndTagName => {
                self.handle_text_end_tag_name_state(TokenizerState::RAWTEXT);
            }
            TokenizerState::ScriptDataLessThanSign => {
                self.handle_script_data_less_than_sign_state();
            }
            TokenizerState::ScriptDataEndTagOpen => {
                self.handle_text_end_tag_open_state(
                    TokenizerState::ScriptDataEndTagName,
                    TokenizerState::ScriptData,
                );
            }
            TokenizerState::ScriptDataEndTagName => {
                self.handle_text_end_tag_name_state(TokenizerState::ScriptData);
            }
            TokenizerState::ScriptDataEscapeStart => self.handle_script_data_escape_start_state(),
            TokenizerState::ScriptDataEscapeStartDash => {
                self.handle_script_data_escape_start_dash_state();
            }
            TokenizerState::ScriptDataEscaped => self.handle_script_data_escaped_state(),
            TokenizerState::ScriptDataEscapedDash => self.handle_script_data_escaped_dash_state(),
            TokenizerState::ScriptDataEscapedDashDash => {
                self.handle_script_data_escaped_dash_dash_state();
            }
            TokenizerState::ScriptDataEscapedLessThanSign => {
                self.handle_script_data_escaped_less_than_sign_state();
            }
            TokenizerState::ScriptDataEscapedEndTagOpen => {
                self.handle_text_end_tag_open_state(
                    TokenizerState::ScriptDataEscapedEndTagName,
                    TokenizerState::ScriptDataEscaped,
                );
            }
            TokenizerState::ScriptDataEscapedEndTagName => {
                self.handle_text_end_tag_name_state(TokenizerState::ScriptDataEscaped);
            }
            TokenizerState::ScriptDataDoubleEscapeStart => {
                self.handle_script_data_double_escape_boundary_state(
                    TokenizerState::ScriptDataDoubleEscaped,
                    TokenizerState::ScriptDataEscaped,
                );
            }
            TokenizerState::ScriptDataDoubleEscaped => {
                self.handle_script_data_double_escaped_state();
            }
            TokenizerState::ScriptDataDoubleEscapedDash => {
                self.handle_script_data_double_escaped_dash_state();
            }
            TokenizerState::ScriptDataDoubleEscapedDashDash => {
                self.handle_script_data_double_escaped_dash_dash_state();
            }
            TokenizerState::ScriptDataDoubleEscapedLessThanSign => {
                self.handle_script_data_double_escaped_less_than_sign_state();
            }
            TokenizerState::ScriptDataDoubleEscapeEnd => {
                self.handle_script_data_double_escape_boundary_state(
                    TokenizerState::ScriptDataEscaped,
                    TokenizerState::ScriptDataDoubleEscaped,
                );
            }
            TokenizerState::BeforeAttributeName => self.handle_before_attribute_name_state(),
            TokenizerState::AttributeName => self.handle_attribute_name_state(),
            TokenizerState::AfterAttributeName => self.handle_after_attribute_name_state(),
            TokenizerState::BeforeAttributeValue => self.handle_before_attribute_value_state(),
            TokenizerState::AttributeValueDoubleQuoted => {
                self.handle_attribute_value_quoted_state('"');
            }
            TokenizerState::AttributeValueSingleQuoted => {
                self.handle_attribute_value_quoted_state('\'');
            }
            TokenizerState::AttributeValueUnquoted => self.handle_attribute_value_unquoted_state(),
            TokenizerState::AfterAttributeValueQuoted => {
                self.handle_after_attribute_value_quoted_state();
            }
            TokenizerState::SelfClosingStartTag => self.handle_self_closing_start_tag_state(),
            TokenizerState::BogusComment => self.handle_bogus_comment_state(),
            TokenizerState::MarkupDeclarationOpen => self.handle_markup_declaration_open_state(),
            TokenizerState::CommentStart => self.handle_comment_start_state(),
            TokenizerState::CommentStartDash => self.handle_comment_start_dash_state(),
            TokenizerState::Comment => self.handle_comment_state(),
            TokenizerState::CommentLessThanSign => self.handle_comment_less_than_sign_state(),
            TokenizerState::CommentLessThanSignBang => {
                self.handle_comment_less_than_sign_bang_state();
            }
            TokenizerState::CommentLessThanSignBangDash => {
                self.handle_comment_less_than_sign_bang_dash_state();
            }
            TokenizerState::CommentLessThanSignBangDashDash => {
                self.handle_comment_less_than_sign_bang_dash_dash_state();
            }
            TokenizerState::CommentEndDash => self.handle_comment_end_dash_state(),
            TokenizerState::CommentEnd => self.handle_comment_end_state(),
            TokenizerState::CommentEndBang => self.handle_comment_end_bang_state(),
            TokenizerState::DOCTYPE => self.handle_doctype_state(),
            TokenizerState::BeforeDOCTYPEName => self.handle_before_doctype_name_state(),
            TokenizerState::DOCTYPEName => self.handle_doctype_name_state(),
            TokenizerState::AfterDOCTYPEName => self.handle_after_doctype_name_state(),
            TokenizerState::AfterDOCTYPEPublicKeyword => {
                self.handle_after_doctype_keyword_state(
                    TokenizerState::BeforeDOCTYPEPublicIdentifier,
                    true,
                );
            }
            TokenizerState::BeforeDOCTYPEPublicIdentifier => {
                self.handle_before_doctype_identifier_state(true);
            }
            TokenizerState::DOCTYPEPublicIdentifierDoubleQuoted => {
                self.handle_doctype_identifier_quoted_state('"', true);
            }
            TokenizerState::DOCTYPEPublicIdentifierSingleQuoted => {
                self.handle_doctype_identifier_quoted_state('\'', true);
            }
            TokenizerState::AfterDOCTYPEPublicIdentifier => {
                self.handle_after_doctype_public_identifier_state();
            }
            TokenizerState::BetweenDOCTYPEPublicAndSystemIdentifiers => {
                self.handle_between_doctype_identifiers_state();
            }
            TokenizerState::AfterDOCTYPESystemKeyword => {
                self.handle_after_doctype_keyword_state(
                    TokenizerState::BeforeDOCTYPESystemIdentifier,
                    false,
                );
            }
            TokenizerState::BeforeDOCTYPESystemIdentifier => {
                self.handle_before_doctype_identifier_state(false);
            }
            TokenizerState::DOCTYPESystemIdentifierDoubleQuoted => {
                self.handle_doctype_identifier_quoted_state('"', false);
            }
            TokenizerState::DOCTYPESystemIdentifierSingleQuoted => {
                self.handle_doctype_identifier_quoted_state('\'', false);
            }
            TokenizerState::AfterDOCTYPESystemIdentifier => {
                self.handle_after_doctype_system_identifier_state();
            }
            TokenizerState::BogusDOCTYPE => self.handle_bogus_doctype_state(),
            TokenizerState::CDATASection => self.handle_cdata_section_state(),
            TokenizerState::CDATASectionBracket => self.handle_cdata_section_bracket_state(),
            TokenizerState::CDATASectionEnd => self.handle_cdata_section_end_state(),
            TokenizerState::CharacterReference => self.handle_character_reference_state(),
            TokenizerState::NamedCharacterReference => {
                self.handle_named_character_reference_state();
            }
            TokenizerState::AmbiguousAmpersand => self.handle_ambiguous_ampersand_state(),
            TokenizerState::NumericCharacterReference => {
                self.handle_numeric_character_reference_state();
            }
            TokenizerState::HexadecimalCharacterReferenceStart => {
                self.handle_numeric_character_reference_start_state(16);
            }
            TokenizerState::DecimalCharacterReferenceStart => {
                self.handle_numeric_character_reference_start_state(10);
            }
            TokenizerState::HexadecimalCharacterReference => {
                self.handle_numeric_character_reference_digits_state(16);
            }
            TokenizerState::DecimalCharacterReference => {
                self.handle_numeric_character_reference_digits_state(10);
            }
            TokenizerState::NumericCharacterReferenceEnd => {
                self.handle_numeric_character_reference_end_state();
            }
        }
    }
}
