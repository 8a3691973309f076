//! Quill CLI
//!
//! Parse HTML, dump tokens, test selectors and print cascaded styles.
//!
//! Usage:
//!   quill parse page.html                  Print the DOM tree
//!   quill parse --fragment tr --html '<td>x'
//!   quill tokens page.html                 Show HTML tokens
//!   quill tokens --css style.css           Show CSS tokens
//!   quill select --selector 'ul > li' page.html
//!   quill cascade page.html --json         Property bags as JSON

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use owo_colors::OwoColorize;
use quill_common::warning::set_quiet;
use quill_css::{
    CSSTokenizer, PropertyBag, compute_styles, parse_selector, parse_stylesheet,
    stylesheet_from_document,
};
use quill_dom::{DomTree, NodeId};
use quill_html::{
    HTMLTokenizer, ParseIssue, ParserOptions, dump_nodes, parse_document_with_options,
    parse_fragment, print_tree,
};

/// Quill: HTML tree construction, CSS selectors and cascade
#[derive(Parser, Debug)]
#[command(name = "quill")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Silence engine warnings on stderr
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a document (or a fragment) and print the tree
    Parse {
        #[command(flatten)]
        input: Input,

        /// Parse as a fragment in the context of this element
        #[arg(long, value_name = "TAG")]
        fragment: Option<String>,

        /// Record simplified-handling warnings as errors
        #[arg(long)]
        strict: bool,

        /// Parse with the scripting flag set
        #[arg(long)]
        scripting: bool,

        /// List every parse issue after the tree
        #[arg(long)]
        issues: bool,
    },
    /// Dump the token stream
    Tokens {
        #[command(flatten)]
        input: Input,

        /// Tokenize the input as CSS instead of HTML
        #[arg(long)]
        css: bool,
    },
    /// Print the elements a selector matches
    Select {
        #[command(flatten)]
        input: Input,

        /// Selector to match
        #[arg(short, long)]
        selector: String,
    },
    /// Print the cascaded property bag of every styled element
    Cascade {
        #[command(flatten)]
        input: Input,

        /// Stylesheet to apply instead of the document's `<style>` elements
        #[arg(long, value_name = "FILE")]
        css: Option<PathBuf>,

        /// Emit JSON
        #[arg(long)]
        json: bool,
    },
}

/// Where the source text comes from.
#[derive(Args, Debug)]
struct Input {
    /// Path to the input file
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Use this string instead of a file
    #[arg(long, value_name = "SOURCE")]
    html: Option<String>,
}

impl Input {
    fn read(&self) -> Result<String> {
        if let Some(source) = &self.html {
            return Ok(source.clone());
        }
        let Some(path) = &self.path else {
            bail!("no input: pass a file path or --html");
        };
        fs::read_to_string(path).with_context(|| format!("failed to read '{}'", path.display()))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    set_quiet(cli.quiet);

    match cli.command {
        Command::Parse {
            input,
            fragment,
            strict,
            scripting,
            issues,
        } => {
            let options = ParserOptions { strict, scripting };
            run_parse(&input.read()?, fragment.as_deref(), options, issues);
        }
        Command::Tokens { input, css } => run_tokens(&input.read()?, css),
        Command::Select { input, selector } => run_select(&input.read()?, &selector)?,
        Command::Cascade { input, css, json } => {
            let css = css
                .map(|path| {
                    fs::read_to_string(&path)
                        .with_context(|| format!("failed to read '{}'", path.display()))
                })
                .transpose()?;
            run_cascade(&input.read()?, css.as_deref(), json)?;
        }
    }
    Ok(())
}

fn run_parse(html: &str, fragment: Option<&str>, options: ParserOptions, list_issues: bool) {
    let issues = if let Some(context) = fragment {
        let fragment = parse_fragment(html, context, options);
        print!("{}", dump_nodes(&fragment.tree, &fragment.nodes));
        fragment.issues
    } else {
        let document = parse_document_with_options(html, options);
        println!("{}", format!("=== DOM Tree ({} mode) ===", document.quirks_mode).bold());
        print_tree(&document.tree, NodeId::ROOT);
        document.issues
    };
    print_issues(&issues, list_issues);
}

fn print_issues(issues: &[ParseIssue], list: bool) {
    let errors = issues.iter().filter(|issue| issue.is_error).count();
    let summary = format!("{errors} errors, {} warnings", issues.len() - errors);
    if errors > 0 {
        eprintln!("{}", summary.red());
    } else {
        eprintln!("{}", summary.dimmed());
    }
    if list {
        for issue in issues {
            let kind = if issue.is_error { "error" } else { "warning" };
            eprintln!("  token {:4} {kind}: {}", issue.token_index, issue.message);
        }
    }
}

fn run_tokens(source: &str, css: bool) {
    if css {
        let mut tokenizer = CSSTokenizer::new(source);
        tokenizer.run();
        let tokens = tokenizer.into_tokens();
        println!("{}", format!("=== CSS Tokens ({}) ===", tokens.len()).bold());
        for (i, token) in tokens.iter().enumerate() {
            println!("  {i:3}: {token}");
        }
    } else {
        let mut tokenizer = HTMLTokenizer::new(source);
        tokenizer.run();
        let tokens = tokenizer.into_tokens();
        println!("{}", format!("=== HTML Tokens ({}) ===", tokens.len()).bold());
        for (i, token) in tokens.iter().enumerate() {
            println!("  {i:3}: {token}");
        }
    }
}

fn run_select(html: &str, source: &str) -> Result<()> {
    let selector =
        parse_selector(source).with_context(|| format!("invalid selector '{source}'"))?;
    let document = parse_document_with_options(html, ParserOptions::default());
    let tree = &document.tree;

    println!(
        "{} {}",
        selector.to_css().bold(),
        selector.specificity().dimmed()
    );
    let matched: Vec<NodeId> = tree
        .descendants(NodeId::ROOT)
        .filter(|&node| selector.matches(tree, node))
        .collect();
    for &node in &matched {
        println!("  {}", describe(tree, node).cyan());
    }
    println!("{} matches", matched.len());
    Ok(())
}

fn run_cascade(html: &str, css: Option<&str>, json: bool) -> Result<()> {
    let document = parse_document_with_options(html, ParserOptions::default());
    let tree = &document.tree;
    let stylesheet = css.map_or_else(|| stylesheet_from_document(tree), parse_stylesheet);
    let styles = compute_styles(tree, &stylesheet);

    // Tree order, skipping elements nothing applied to.
    let styled: Vec<(NodeId, &PropertyBag)> = tree
        .descendants(NodeId::ROOT)
        .filter_map(|node| styles.get(&node).map(|bag| (node, bag)))
        .filter(|(_, bag)| !bag.is_empty())
        .collect();

    if json {
        let entries: Vec<serde_json::Value> = styled
            .iter()
            .map(|(node, bag)| {
                serde_json::to_value(bag).map(|styles| {
                    serde_json::json!({
                        "node": node.0,
                        "element": describe(tree, *node),
                        "styles": styles,
                    })
                })
            })
            .collect::<Result<_, _>>()
            .context("failed to serialize property bags")?;
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!(
        "{}",
        format!("=== Cascade ({} rules) ===", stylesheet.rules.len()).bold()
    );
    for (node, bag) in styled {
        println!("{}", describe(tree, node).cyan());
        for (name, cascaded) in bag.iter() {
            let important = if cascaded.important { " !important" } else { "" };
            println!(
                "  {name}: {}{important} {}",
                cascaded.value,
                cascaded.specificity.dimmed()
            );
        }
    }
    Ok(())
}

/// `tag#id.class` label for an element.
fn describe(tree: &DomTree, node: NodeId) -> String {
    let Some(element) = tree.as_element(node) else {
        return format!("#{}", node.0);
    };
    let mut label = element.tag_name.clone();
    if let Some(id) = element.id() {
        label.push('#');
        label.push_str(id);
    }
    let mut classes: Vec<&str> = element.classes().into_iter().collect();
    classes.sort_unstable();
    for class in classes {
        label.push('.');
        label.push_str(class);
    }
    label
}
