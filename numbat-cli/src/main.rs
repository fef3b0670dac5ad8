//! Numbat CLI
//!
//! Tokenizes and parses CSS the way the AMP validator does, and prints the
//! tokens, the rule tree, selectors, urls and media queries together with
//! every error found.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::info;
use numbat_common::warning::{clear_warnings, warn_once};
use numbat_css::parser::{
    AtRule, AtRuleSpec, BlockType, Declaration, ParsedCssUrl, QualifiedRule, Rule, RuleVisitor, Stylesheet,
    TokenStream, extract_urls, parse_a_stylesheet, parse_media_queries, strip_vendor_prefix, validator_grammar,
};
use numbat_css::selector::{
    self, AttrSelector, ClassSelector, Combinator, IdSelector, PseudoSelector, SelectorVisitor, SelectorsGroup,
    SimpleSelectorSequence, TypeSelector,
};
use numbat_css::{CssError, Position, Token, tokenize};
use owo_colors::OwoColorize;

/// Numbat: position-accurate CSS tokenizer and parser
#[derive(Parser, Debug)]
#[command(name = "numbat")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the rule outline of a stylesheet
    numbat style.css

    # Print the tokens of an inline string
    numbat --tokens --css 'a { color: red }'

    # Selectors and urls as JSON
    numbat --selectors --urls --json style.css

    # Treat @gregable blocks as declarations
    numbat --at-rule gregable=declarations style.css
"#)]
struct Cli {
    /// Path to a CSS file
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Parse a CSS string directly instead of a file
    #[arg(long, value_name = "CSS")]
    css: Option<String>,

    /// Line number of the first character
    #[arg(long, default_value = "1")]
    line: u32,

    /// Column number of the first character
    #[arg(long, default_value = "0")]
    col: u32,

    /// Print the token list instead of the rule outline
    #[arg(long)]
    tokens: bool,

    /// Parse and print the selector of every qualified rule
    #[arg(long)]
    selectors: bool,

    /// Print the urls referenced from declarations
    #[arg(long)]
    urls: bool,

    /// Print the media types and features of @media rules
    #[arg(long)]
    media: bool,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,

    /// Override how an at-rule's block is parsed, e.g. `page=ignore`
    #[arg(long = "at-rule", value_name = "NAME=KIND", value_parser = parse_at_rule)]
    at_rules: Vec<(String, BlockType)>,

    /// Block type for at-rules missing from the grammar
    #[arg(long, value_name = "KIND", default_value = "ignore")]
    default_block_type: BlockType,

    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Parse `name=kind` for `--at-rule`.
fn parse_at_rule(arg: &str) -> Result<(String, BlockType), String> {
    let (name, kind) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=KIND, got `{arg}`"))?;
    let block_type = kind
        .parse::<BlockType>()
        .map_err(|_| format!("unknown block type `{kind}` (expected rules, declarations or ignore)"))?;
    Ok((strip_vendor_prefix(name).to_ascii_lowercase(), block_type))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _ = numbat_common::logging::init(cli.verbose);
    clear_warnings();

    let css = load_css(&cli)?;
    let mut errors = Vec::new();
    let tokens = tokenize(&css, cli.line, cli.col, &mut errors);
    info!("{} tokens", tokens.len());

    if cli.tokens {
        print_tokens(&tokens, cli.json)?;
    } else {
        let mut grammar = validator_grammar();
        grammar.extend(cli.at_rules.iter().cloned());
        let stylesheet = parse_a_stylesheet(&tokens, &grammar, cli.default_block_type, &mut errors);
        warn_unlisted_at_rules(&stylesheet, &grammar, cli.default_block_type);

        if !(cli.selectors || cli.urls || cli.media) {
            print_stylesheet(&stylesheet, cli.json)?;
        }
        if cli.selectors {
            print_selectors(&stylesheet, cli.json, &mut errors)?;
        }
        if cli.urls {
            let mut urls = Vec::new();
            extract_urls(&stylesheet, &mut urls, &mut errors);
            print_urls(&urls, cli.json)?;
        }
        if cli.media {
            let (mut types, mut features) = (Vec::new(), Vec::new());
            parse_media_queries(&stylesheet, &mut types, &mut features, &mut errors);
            print_media(&types, &features, cli.json)?;
        }
    }

    for error in &errors {
        eprintln!("{}", error.red());
    }
    if !errors.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}

/// Read the CSS from `--css` or the file argument.
fn load_css(cli: &Cli) -> Result<String> {
    if let Some(ref css) = cli.css {
        Ok(css.clone())
    } else if let Some(ref path) = cli.path {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    } else {
        bail!("expected a file path or --css")
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_tokens(tokens: &[Token], json: bool) -> Result<()> {
    if json {
        return print_json(tokens);
    }
    for token in tokens {
        println!("{}:{} {token}", token.line(), token.col());
    }
    Ok(())
}

fn print_stylesheet(stylesheet: &Stylesheet, json: bool) -> Result<()> {
    if json {
        return print_json(stylesheet);
    }
    let mut outline = Outline::default();
    stylesheet.accept(&mut outline);
    Ok(())
}

/// Source text of a prelude or value, without its terminator.
fn source_of(tokens: &[Token]) -> String {
    let body = tokens.split_last().map_or(tokens, |(_, body)| body);
    body.iter().map(Token::to_source).collect::<String>().trim().to_owned()
}

/// Prints one line per rule and declaration, indented by nesting depth.
#[derive(Default)]
struct Outline {
    depth: usize,
}

impl Outline {
    fn line(&self, position: Position, text: &str) {
        println!(
            "{}{text} {}",
            "  ".repeat(self.depth),
            format!("({}:{})", position.line, position.col).dimmed()
        );
    }
}

impl RuleVisitor for Outline {
    fn visit_at_rule(&mut self, at_rule: &AtRule) {
        let prelude = source_of(&at_rule.prelude);
        self.line(at_rule.position, &format!("@{} {prelude}", at_rule.name.bold()));
        self.depth += 1;
    }

    fn leave_at_rule(&mut self, _at_rule: &AtRule) {
        self.depth -= 1;
    }

    fn visit_qualified_rule(&mut self, qualified_rule: &QualifiedRule) {
        self.line(qualified_rule.position, &source_of(&qualified_rule.prelude).bold().to_string());
        self.depth += 1;
    }

    fn leave_qualified_rule(&mut self, _qualified_rule: &QualifiedRule) {
        self.depth -= 1;
    }

    fn visit_declaration(&mut self, declaration: &Declaration) {
        let important = if declaration.important { " !important" } else { "" };
        let value = source_of(&declaration.value);
        self.line(
            declaration.position,
            &format!("{}: {value}{important}", declaration.name.cyan()),
        );
    }
}

/// Collects the prelude of every qualified rule, at any depth.
#[derive(Default)]
struct Preludes<'a> {
    preludes: Vec<&'a [Token]>,
}

impl<'a> Preludes<'a> {
    fn collect(stylesheet: &'a Stylesheet) -> Vec<&'a [Token]> {
        let mut preludes = Self::default();
        for rule in &stylesheet.rules {
            preludes.walk(rule);
        }
        preludes.preludes
    }

    fn walk(&mut self, rule: &'a Rule) {
        match rule {
            Rule::Qualified(qualified) => self.preludes.push(&qualified.prelude),
            Rule::At(at_rule) => {
                for nested in &at_rule.rules {
                    self.walk(nested);
                }
            }
        }
    }
}

fn print_selectors(stylesheet: &Stylesheet, json: bool, errors: &mut Vec<CssError>) -> Result<()> {
    let mut trees = Vec::new();
    for prelude in Preludes::collect(stylesheet) {
        let mut stream = TokenStream::new(prelude);
        let _ = stream.consume();
        if let Some(tree) = selector::parse(&mut stream, errors) {
            trees.push(tree);
        }
    }
    if json {
        return print_json(&trees);
    }
    for tree in &trees {
        let root = tree.root();
        println!("{}", format!("selector at {}:{}", root.position().line, root.position().col).bold());
        selector::traverse(root, &mut SelectorLines);
    }
    Ok(())
}

/// Prints every node reached by the selector traversal.
struct SelectorLines;

impl SelectorLines {
    fn line(node: &str, position: Position, detail: &str) {
        println!("  {} {} {detail}", node.green(), format!("{}:{}", position.line, position.col).dimmed());
    }
}

impl SelectorVisitor for SelectorLines {
    fn visit_type_selector(&mut self, type_selector: &TypeSelector) {
        Self::line("TYPE_SELECTOR", type_selector.position, &type_selector.to_string());
    }

    fn visit_id_selector(&mut self, id_selector: &IdSelector) {
        Self::line("ID_SELECTOR", id_selector.position, &id_selector.to_string());
    }

    fn visit_class_selector(&mut self, class_selector: &ClassSelector) {
        Self::line("CLASS_SELECTOR", class_selector.position, &class_selector.to_string());
    }

    fn visit_attr_selector(&mut self, attr_selector: &AttrSelector) {
        Self::line("ATTR_SELECTOR", attr_selector.position, &format!("[{}]", source_of(&attr_selector.value)));
    }

    fn visit_pseudo_selector(&mut self, pseudo_selector: &PseudoSelector) {
        let colons = if pseudo_selector.is_class { ":" } else { "::" };
        Self::line("PSEUDO_SELECTOR", pseudo_selector.position, &format!("{colons}{}", pseudo_selector.name));
    }

    fn visit_simple_selector_sequence(&mut self, sequence: &SimpleSelectorSequence) {
        Self::line("SIMPLE_SELECTOR_SEQUENCE", sequence.position, "");
    }

    fn visit_combinator(&mut self, combinator: &Combinator) {
        Self::line("COMBINATOR", combinator.position, &combinator.combinator_type.to_string());
    }

    fn visit_selectors_group(&mut self, group: &SelectorsGroup) {
        Self::line("SELECTORS_GROUP", group.position, &format!("{} selectors", group.elements.len()));
    }
}

fn print_urls(urls: &[ParsedCssUrl], json: bool) -> Result<()> {
    if json {
        return print_json(urls);
    }
    for url in urls {
        let scope = if url.at_rule_scope.is_empty() {
            String::new()
        } else {
            format!(" (in @{})", url.at_rule_scope)
        };
        println!("{}:{} {}{scope}", url.position.line, url.position.col, url.utf8_url.cyan());
    }
    Ok(())
}

fn print_media(types: &[Token], features: &[Token], json: bool) -> Result<()> {
    if json {
        return print_json(&serde_json::json!({ "mediaTypes": types, "mediaFeatures": features }));
    }
    for (label, tokens) in [("type", types), ("feature", features)] {
        for token in tokens {
            println!("{}:{} media {label} {}", token.line(), token.col(), token.to_source().cyan());
        }
    }
    Ok(())
}

/// Warn once per at-rule name that falls back to the default block type.
fn warn_unlisted_at_rules(stylesheet: &Stylesheet, grammar: &AtRuleSpec, default: BlockType) {
    struct Unlisted<'a> {
        grammar: &'a AtRuleSpec,
        default: BlockType,
    }

    impl RuleVisitor for Unlisted<'_> {
        fn visit_at_rule(&mut self, at_rule: &AtRule) {
            let key = strip_vendor_prefix(&at_rule.name).to_ascii_lowercase();
            if !self.grammar.contains_key(&key) {
                let _ = warn_once(
                    "grammar",
                    &format!("@{} is not in the at-rule grammar; its block is parsed as {}", at_rule.name, self.default),
                );
            }
        }
    }

    stylesheet.accept(&mut Unlisted { grammar, default });
}
