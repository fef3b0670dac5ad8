//! CSS tokenizer module.

/// Escaping and number formatting used to print tokens.
pub mod serialize;
/// CSS token types per [CSS Syntax Level 3 § 4](https://www.w3.org/TR/css-syntax-3/#tokenization).
pub mod token;
/// CSS tokenizer implementation.
pub mod tokenizer;

pub use token::{CSSToken, HashType, NumericType, Token, TokenType};
pub use tokenizer::{CSSTokenizer, tokenize};
