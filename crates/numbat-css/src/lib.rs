//! Position-accurate CSS tokenizer, stylesheet parser and selector parser.
//!
//! # Scope
//!
//! This crate implements:
//! - **CSS Tokenizer** ([§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization))
//!   - All token types: ident, function, at-keyword, hash, string, url, number, dimension, etc.
//!   - Comment handling
//!   - Escape sequences
//!   - Line/column positions for every token
//!
//! - **CSS Parser** ([§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing))
//!   - Stylesheet parsing driven by a per-at-rule grammar
//!   - Inline `style` attribute parsing
//!   - `!important` detection
//!   - Url extraction and media query checking
//!
//! - **CSS Selectors** ([Selectors Level 3](https://www.w3.org/TR/selectors-3/))
//!   - Type, universal, id, class, attribute and pseudo selectors
//!   - Namespace prefixes
//!   - Combinators (descendant, child, adjacent and general sibling)
//!   - Selector groups and a breadth-first visitor
//!
//! Malformed input never fails a call. Problems are appended to a
//! caller-owned list of [`CssError`]s and a best-effort result is returned.
//!
//! # Not Yet Implemented
//!
//! - Recursive parsing of `:not(...)` and other functional pseudo-class
//!   arguments (kept as raw tokens)
//! - Attribute selector operators (kept as raw tokens)
//! - Media feature values

/// Diagnostics with source positions.
pub mod error;
/// CSS parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
pub mod parser;
/// CSS selector parsing per [Selectors Level 3](https://www.w3.org/TR/selectors-3/).
pub mod selector;
/// CSS tokenizer per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
pub mod tokenizer;

// Re-exports for convenience
pub use error::{CssError, ErrorType, Position, errors_to_string};
pub use parser::{
    AtRule, AtRuleSpec, BlockType, Declaration, ParsedCssUrl, QualifiedRule, Rule, RuleVisitor, Stylesheet,
    TokenStream, parse_a_stylesheet, parse_inline_style,
};
pub use selector::{SelectorNode, SelectorTree, SelectorVisitor, traverse};
pub use tokenizer::{CSSToken, CSSTokenizer, Token, TokenType, tokenize};
