//! A cursor over a token list with one token of pushback.

use crate::error::Position;
use crate::tokenizer::{CSSToken, Token};

/// Returned when a stream is built over an empty list. Tokenizer output
/// always ends with an EOF token, so this only guards hand-built input.
static TRIVIAL_EOF: Token = Token {
    kind: CSSToken::EOF,
    position: Position::new(1, 0),
};

/// A token list with a current position.
///
/// The cursor starts *before* the first token, so callers `consume()` once
/// to reach it. Reads past the end return the trailing EOF token, so
/// consuming past the EOF keeps yielding EOF.
#[derive(Debug, Clone)]
pub struct TokenStream<'a> {
    tokens: &'a [Token],
    pos: isize,
    reconsumed: bool,
}

impl<'a> TokenStream<'a> {
    /// Wrap `tokens`. Lists produced by the tokenizer and the parser end
    /// with an EOF token; an at-rule prelude may end with `;` instead.
    #[must_use]
    pub const fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: -1,
            reconsumed: false,
        }
    }

    /// The token at an absolute index. Indices past the end yield the
    /// trailing EOF token, indices before the start yield the first token.
    #[must_use]
    pub fn token_at(&self, index: isize) -> &'a Token {
        let Some(last) = self.tokens.len().checked_sub(1) else {
            return &TRIVIAL_EOF;
        };
        let index = usize::try_from(index).unwrap_or(0).min(last);
        &self.tokens[index]
    }

    /// The token at the cursor.
    #[must_use]
    pub fn current(&self) -> &'a Token {
        self.token_at(self.pos)
    }

    /// The token after the cursor.
    #[must_use]
    pub fn next(&self) -> &'a Token {
        self.token_at(self.pos + 1)
    }

    /// Advance by one and return the new current token.
    pub fn consume(&mut self) -> &'a Token {
        self.pos += 1;
        self.reconsumed = false;
        self.current()
    }

    /// Step back by one. Only one step of pushback is supported between
    /// calls to [`consume`](Self::consume).
    pub fn reconsume(&mut self) {
        debug_assert!(!self.reconsumed, "reconsume called twice without consume");
        self.reconsumed = true;
        self.pos -= 1;
    }

    /// The cursor index; `-1` before the first `consume()`.
    #[must_use]
    pub const fn position(&self) -> isize {
        self.pos
    }

    /// The whole underlying token list.
    #[must_use]
    pub const fn tokens(&self) -> &'a [Token] {
        self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn tokens(css: &str) -> Vec<Token> {
        let mut errors = Vec::new();
        tokenize(css, 1, 0, &mut errors)
    }

    #[test]
    fn test_starts_before_first_token() {
        let tokens = tokens("a b");
        let mut stream = TokenStream::new(&tokens);
        assert_eq!(stream.position(), -1);
        assert_eq!(stream.current().kind, CSSToken::ident("a"));
        assert_eq!(stream.next().kind, CSSToken::ident("a"));
        assert_eq!(stream.consume().kind, CSSToken::ident("a"));
        assert_eq!(stream.next().kind, CSSToken::Whitespace);
    }

    #[test]
    fn test_consume_past_eof_keeps_returning_eof() {
        let tokens = tokens("a");
        let mut stream = TokenStream::new(&tokens);
        let _ = stream.consume();
        assert!(stream.consume().is_eof());
        assert!(stream.consume().is_eof());
        assert!(stream.next().is_eof());
    }

    #[test]
    fn test_reconsume_steps_back_once() {
        let tokens = tokens("a b");
        let mut stream = TokenStream::new(&tokens);
        let _ = stream.consume();
        let _ = stream.consume();
        stream.reconsume();
        assert_eq!(stream.current().kind, CSSToken::ident("a"));
        assert_eq!(stream.consume().kind, CSSToken::Whitespace);
    }

    #[test]
    fn test_empty_list_yields_eof() {
        let stream = TokenStream {
            tokens: &[],
            pos: -1,
            reconsumed: false,
        };
        assert!(stream.current().is_eof());
        assert_eq!(stream.current().position, Position::new(1, 0));
    }
}
