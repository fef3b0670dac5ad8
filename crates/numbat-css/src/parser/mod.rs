//! CSS Parser per [CSS Syntax Module Level 3 § 5](https://www.w3.org/TR/css-syntax-3/#parsing).
//!
//! Turns a token list into a [`Stylesheet`] of rules and declarations, and
//! walks the result to find urls, `!important` declarations and media
//! queries.

/// Stylesheet parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
pub mod css_parser;
pub mod grammar;
pub mod media;
pub mod rules;
pub mod token_stream;
pub mod urls;

pub use css_parser::{Canonicalizer, extract_a_function, extract_a_simple_block, parse_a_stylesheet, parse_inline_style};
pub use grammar::{AtRuleSpec, BlockType, block_type_for, strip_min_max, strip_vendor_prefix, validator_grammar};
pub use media::parse_media_queries;
pub use rules::{
    AtRule, Declaration, QualifiedRule, Rule, RuleVisitor, Stylesheet, extract_important_declarations,
};
pub use token_stream::TokenStream;
pub use urls::{ParsedCssUrl, extract_urls, extract_urls_from_declaration};
