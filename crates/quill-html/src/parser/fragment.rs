//! [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)

use quill_dom::{DomTree, NodeId, NodeType};

use super::core::{HTMLParser, InsertionMode, ParseIssue, ParserOptions};
use crate::tokenizer::TokenizerState;

/// Nodes produced by parsing a fragment.
///
/// The nodes live in `tree`, detached from its Document, as children of a
/// synthetic `html` root. `nodes` lists them in order; the root itself is
/// never part of the result.
#[derive(Debug)]
pub struct Fragment {
    /// The tree that owns the parsed nodes.
    pub tree: DomTree,
    /// Top-level nodes of the fragment, in source order.
    pub nodes: Vec<NodeId>,
    /// Recoverable issues seen while parsing.
    pub issues: Vec<ParseIssue>,
}

impl HTMLParser {
    /// Create a parser for the fragment parsing algorithm, with `context` as
    /// the tag name of the context element.
    #[must_use]
    pub fn new_fragment(input: &str, context: &str, options: ParserOptions) -> Self {
        let context = context.to_ascii_lowercase();
        let mut parser = Self::new(input, options);

        // STEP 4: "Set the state of the HTML parser's tokenization stage as
        //          follows, switching on the context element"
        //
        // Raw text contexts always lex as text; for noscript that means the
        // content is not treated as markup even with scripting off.
        if let Some(state) = TokenizerState::for_raw_text_element(&context, true) {
            parser.tokenizer.switch_to(state);
        }
        // "the tokenizer's last start tag is the context element"
        parser.tokenizer.set_last_start_tag(&context);

        // STEP 6-7: "Let root be the result of creating an html element...
        //            Append the element root to the Document node created
        //            above. Set up the HTML parser's stack of open elements
        //            so that it contains just the single element root."
        //
        // The root stays detached from the Document so the fragment does not
        // look like a document element.
        let root = parser.tree.alloc(NodeType::element("html"));
        parser.push_open_element(root);

        let context_element = parser.tree.alloc(NodeType::element(context.as_str()));
        parser.context_element = Some(context_element);

        // STEP 8: "If the context element is a template element, then push
        //          "in template" onto the stack of template insertion modes
        //          so that it is the new current template insertion mode."
        if context == "template" {
            parser
                .template_insertion_modes
                .push(InsertionMode::InTemplate);
        }

        // STEP 10: "Reset the parser's insertion mode appropriately."
        parser.reset_insertion_mode_appropriately();

        // STEP 11: "Set the parser's form element pointer to the nearest node
        //           to the context element that is a form element (going
        //           straight up the ancestor chain, and including the element
        //           itself, if it is a form element), if any."
        if context == "form" {
            parser.form_element_pointer = Some(context_element);
        }

        parser
    }

    /// Run a fragment parser to the end of input.
    #[must_use]
    pub fn run_fragment(mut self) -> Fragment {
        let root = self.stack_of_open_elements.first().copied();
        self.drive();
        // STEP 14: "Return root's children, in tree order."
        let nodes = root
            .map(|root| self.tree.children(root).to_vec())
            .unwrap_or_default();
        Fragment {
            tree: self.tree,
            nodes,
            issues: self.issues,
        }
    }
}

/// Parse `input` as the contents of an element named `context`.
///
/// ```
/// use quill_html::{ParserOptions, parse_fragment};
///
/// let fragment = parse_fragment("<span>", "body", ParserOptions::default());
/// assert_eq!(fragment.nodes.len(), 1);
/// assert_eq!(fragment.tree.tag_name(fragment.nodes[0]), Some("span"));
/// ```
#[must_use]
pub fn parse_fragment(input: &str, context: &str, options: ParserOptions) -> Fragment {
    HTMLParser::new_fragment(input, context, options).run_fragment()
}
