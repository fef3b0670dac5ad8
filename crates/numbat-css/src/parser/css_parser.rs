//! CSS Parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
//!
//! "The input to the parsing stage is a stream of tokens from the tokenization stage."
//!
//! The parser builds a shallow tree: rules and declarations are structured,
//! while preludes and values stay flat token lists. Every problem is
//! recorded as a PARSING error and parsing resumes at the next sync point.

use log::{debug, trace};

use super::grammar::{AtRuleSpec, BlockType, block_type_for};
use super::rules::{AtRule, Declaration, QualifiedRule, Rule, Stylesheet};
use super::token_stream::TokenStream;
use crate::error::{CssError, Position, STYLE_CONTEXT};
use crate::tokenizer::{CSSToken, Token, TokenType};

/// Deepest nesting of blocks and functions inside one component value.
const MAXIMUM_CSS_RECURSION: usize = 100;

const EXCESSIVELY_NESTED: &str = "excessively nested";

/// [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
///
/// Parse `tokens` (tokenizer output, ending in EOF) into a stylesheet. At-rule
/// blocks are parsed according to `at_rule_spec`, falling back to
/// `default_block_type` for names it does not list.
#[must_use]
pub fn parse_a_stylesheet(
    tokens: &[Token],
    at_rule_spec: &AtRuleSpec,
    default_block_type: BlockType,
    errors: &mut Vec<CssError>,
) -> Stylesheet {
    let canonicalizer = Canonicalizer::new(at_rule_spec, default_block_type);
    let rules = canonicalizer.parse_a_list_of_rules(tokens, true, errors);
    let stream = TokenStream::new(tokens);
    let eof = stream.token_at(isize::MAX).clone();
    Stylesheet {
        position: stream.token_at(0).position,
        rules,
        eof,
    }
}

/// [§ 5.3.8 Parse a list of declarations](https://www.w3.org/TR/css-syntax-3/#parse-list-of-declarations)
///
/// Parse the body of a `style` attribute.
#[must_use]
pub fn parse_inline_style(tokens: &[Token], errors: &mut Vec<CssError>) -> Vec<Declaration> {
    let spec = AtRuleSpec::new();
    Canonicalizer::new(&spec, BlockType::Declarations).parse_a_list_of_declarations(tokens, errors)
}

/// Rule-level parser, configured with how to treat at-rule blocks.
pub struct Canonicalizer<'a> {
    at_rule_spec: &'a AtRuleSpec,
    default_block_type: BlockType,
}

impl<'a> Canonicalizer<'a> {
    /// Create a parser for the given at-rule grammar.
    #[must_use]
    pub const fn new(at_rule_spec: &'a AtRuleSpec, default_block_type: BlockType) -> Self {
        Self {
            at_rule_spec,
            default_block_type,
        }
    }

    /// The block type for an at-rule called `name`.
    #[must_use]
    pub fn block_type_for(&self, name: &str) -> BlockType {
        block_type_for(self.at_rule_spec, self.default_block_type, name)
    }

    /// [§ 5.4.1 Consume a list of rules](https://www.w3.org/TR/css-syntax-3/#consume-list-of-rules)
    ///
    /// Parse `tokens` into qualified rules and at-rules. CDO and CDC are
    /// skipped only at the top level.
    pub fn parse_a_list_of_rules(
        &self,
        tokens: &[Token],
        top_level: bool,
        errors: &mut Vec<CssError>,
    ) -> Vec<Rule> {
        let mut stream = TokenStream::new(tokens);
        let mut rules = Vec::new();
        loop {
            match stream.consume().kind {
                // "<whitespace-token>"
                // "Do nothing."
                CSSToken::Whitespace => {}

                // "<EOF-token>"
                // "Return the list of rules."
                CSSToken::EOF => return rules,

                // "<CDO-token>" or "<CDC-token>"
                // "If the top-level flag is set, do nothing. Otherwise, reconsume the
                // current input token. Consume a qualified rule."
                CSSToken::CDO | CSSToken::CDC if top_level => {}

                // "<at-keyword-token>"
                // "Reconsume the current input token. Consume an at-rule, and append
                // the returned value to the list of rules."
                CSSToken::AtKeyword(_) => {
                    let rule = self.parse_an_at_rule(&mut stream, errors);
                    rules.push(Rule::At(rule));
                }

                // "anything else"
                // "Reconsume the current input token. Consume a qualified rule. If
                // anything is returned, append it to the list of rules."
                _ => {
                    if let Some(rule) = self.parse_a_qualified_rule(&mut stream, errors) {
                        rules.push(Rule::Qualified(rule));
                    }
                }
            }
        }
    }

    /// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)
    ///
    /// The stream must be positioned on the at-keyword.
    fn parse_an_at_rule(&self, stream: &mut TokenStream<'_>, errors: &mut Vec<CssError>) -> AtRule {
        let start = stream.current();
        debug_assert_eq!(start.token_type(), TokenType::AtKeyword);
        let name = start.kind.string_value().unwrap_or_default();
        let mut rule = AtRule::new(name, start.position);
        trace!("at-rule @{name} at {}:{}", start.line(), start.col());

        loop {
            let current = stream.consume();
            match current.kind {
                // "<semicolon-token>" / "<EOF-token>"
                // "Return the at-rule."
                CSSToken::Semicolon | CSSToken::EOF => {
                    rule.prelude.push(current.clone());
                    return rule;
                }

                // "<{-token>"
                // "Consume a simple block and assign it to the at-rule's block.
                // Return the at-rule."
                CSSToken::LeftBrace => {
                    rule.prelude.push(Token::eof_at(current.position));
                    let contents = extract_a_simple_block(stream, errors);
                    match self.block_type_for(&rule.name) {
                        BlockType::Rules => {
                            rule.rules = self.parse_a_list_of_rules(&contents, false, errors);
                        }
                        BlockType::Declarations => {
                            rule.declarations = self.parse_a_list_of_declarations(&contents, errors);
                        }
                        BlockType::Ignore => {}
                    }
                    return rule;
                }

                // "anything else"
                // "Reconsume the current input token. Consume a component value.
                // Append the returned value to the at-rule's prelude."
                _ => {
                    if !consume_a_component_value(stream, &mut rule.prelude, 0) {
                        excessively_nested(stream, errors);
                    }
                }
            }
        }
    }

    /// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
    ///
    /// Returns `None` when the input ends before the rule's block.
    fn parse_a_qualified_rule(
        &self,
        stream: &mut TokenStream<'_>,
        errors: &mut Vec<CssError>,
    ) -> Option<QualifiedRule> {
        let mut rule = QualifiedRule::new(stream.current().position);
        stream.reconsume();

        loop {
            let current = stream.consume();
            match current.kind {
                // "<EOF-token>"
                // "This is a parse error. Return nothing."
                CSSToken::EOF => {
                    record(
                        errors,
                        CssError::parsing(
                            rule.position,
                            "Hit EOF when trying to parse the prelude of a qualified rule.",
                        ),
                    );
                    return None;
                }

                // "<{-token>"
                // "Consume a simple block and assign it to the qualified rule's block.
                // Return the qualified rule."
                CSSToken::LeftBrace => {
                    rule.prelude.push(Token::eof_at(current.position));
                    let contents = extract_a_simple_block(stream, errors);
                    rule.declarations = self.parse_a_list_of_declarations(&contents, errors);
                    return Some(rule);
                }

                // "anything else"
                // "Reconsume the current input token. Consume a component value.
                // Append the returned value to the qualified rule's prelude."
                _ => {
                    if !consume_a_component_value(stream, &mut rule.prelude, 0) {
                        excessively_nested(stream, errors);
                    }
                }
            }
        }
    }

    /// [§ 5.4.5 Consume a list of declarations](https://www.w3.org/TR/css-syntax-3/#consume-list-of-declarations)
    ///
    /// At-rules are parsed but reported and dropped: the grammar allows none
    /// inside declaration blocks.
    pub fn parse_a_list_of_declarations(
        &self,
        tokens: &[Token],
        errors: &mut Vec<CssError>,
    ) -> Vec<Declaration> {
        let mut stream = TokenStream::new(tokens);
        let mut declarations = Vec::new();
        loop {
            let current = stream.consume();
            match current.kind {
                // "<whitespace-token>" / "<semicolon-token>"
                // "Do nothing."
                CSSToken::Whitespace | CSSToken::Semicolon => {}

                // "<EOF-token>"
                // "Return the list of declarations."
                CSSToken::EOF => return declarations,

                // "<at-keyword-token>"
                CSSToken::AtKeyword(_) => {
                    let rule = self.parse_an_at_rule(&mut stream, errors);
                    let msg = format!("@{} found inside declaration", rule.name);
                    record(
                        errors,
                        CssError::parsing(rule.position, msg).with_params([STYLE_CONTEXT, &rule.name]),
                    );
                }

                // "<ident-token>"
                CSSToken::Ident(_) => {
                    if let Some(declaration) = parse_a_declaration(&mut stream, errors) {
                        declarations.push(declaration);
                    }
                }

                // "anything else"
                // "This is a parse error. Reconsume the current input token. As long as
                // the next input token is anything other than a <semicolon-token> or
                // <EOF-token>, consume a component value and throw away the returned
                // value."
                _ => {
                    record(errors, CssError::parsing(current.position, "Invalid Declaration"));
                    stream.reconsume();
                    while !is_declaration_end(stream.next()) {
                        let _ = stream.consume();
                        let mut discarded = Vec::new();
                        if !consume_a_component_value(&mut stream, &mut discarded, 0) {
                            excessively_nested(&stream, errors);
                        }
                    }
                }
            }
        }
    }
}

/// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
///
/// The stream must be positioned on the declaration's name. Returns `None`
/// when the name is not followed by a colon.
fn parse_a_declaration(stream: &mut TokenStream<'_>, errors: &mut Vec<CssError>) -> Option<Declaration> {
    let start = stream.current();
    let mut declaration = Declaration::new(start.kind.string_value().unwrap_or_default(), start.position);

    // "While the next input token is a <whitespace-token>, consume the next input token."
    while stream.next().is_whitespace() {
        let _ = stream.consume();
    }

    // "If the next input token is anything other than a <colon-token>, this is a
    // parse error. Return nothing."
    if stream.consume().kind != CSSToken::Colon {
        record(errors, CssError::parsing(start.position, "Incomplete declaration"));
        stream.reconsume();
        while !is_declaration_end(stream.next()) {
            let _ = stream.consume();
        }
        return None;
    }

    // "As long as the next input token is anything other than an <EOF-token>,
    // consume a component value and append it to the declaration's value."
    while !is_declaration_end(stream.next()) {
        let _ = stream.consume();
        if !consume_a_component_value(stream, &mut declaration.value, 0) {
            excessively_nested(stream, errors);
        }
    }

    // "If the last two non-<whitespace-token>s in the declaration's value are a
    // <delim-token> with the value "!" followed by an <ident-token> with a value
    // that is an ASCII case-insensitive match for "important", remove them from
    // the declaration's value and set the declaration's important flag to true."
    if let Some(bang) = find_important(&declaration.value) {
        declaration.important = true;
        declaration.important_position = Some(declaration.value[bang].position);
        declaration.value.truncate(bang);
    }

    declaration.value.push(Token::eof_at(stream.next().position));
    trace!(
        "declaration {} with {} value tokens{}",
        declaration.name,
        declaration.value.len(),
        if declaration.important { " !important" } else { "" }
    );
    Some(declaration)
}

/// Index of the `!` in a trailing `! important`, scanning backwards over
/// whitespace.
fn find_important(value: &[Token]) -> Option<usize> {
    let mut found_important = false;
    for (index, token) in value.iter().enumerate().rev() {
        match &token.kind {
            CSSToken::Whitespace => {}
            CSSToken::Ident(ident) if !found_important && ident.eq_ignore_ascii_case("important") => {
                found_important = true;
            }
            CSSToken::Delim('!') if found_important => return Some(index),
            _ => return None,
        }
    }
    None
}

fn is_declaration_end(token: &Token) -> bool {
    matches!(token.kind, CSSToken::Semicolon | CSSToken::EOF)
}

fn record(errors: &mut Vec<CssError>, error: CssError) {
    debug!("{error}");
    errors.push(error);
}

fn excessively_nested(stream: &TokenStream<'_>, errors: &mut Vec<CssError>) {
    record(errors, CssError::parsing(stream.current().position, EXCESSIVELY_NESTED));
}

/// [§ 5.4.7 Consume a component value](https://www.w3.org/TR/css-syntax-3/#consume-component-value)
///
/// Appends the current token to `tokens`, or the whole block or function
/// it opens. Returns false when nesting exceeds the limit.
fn consume_a_component_value(stream: &mut TokenStream<'_>, tokens: &mut Vec<Token>, depth: usize) -> bool {
    if depth > MAXIMUM_CSS_RECURSION {
        return false;
    }
    let current = stream.current();
    match current.kind {
        // "If the current input token is a <{-token>, <[-token>, or <(-token>,
        // consume a simple block and return it."
        CSSToken::LeftBrace | CSSToken::LeftBracket | CSSToken::LeftParen => {
            consume_a_simple_block(stream, tokens, depth + 1)
        }
        // "Otherwise, if the current input token is a <function-token>, consume
        // a function and return it."
        CSSToken::Function(_) => consume_a_function(stream, tokens, depth + 1),
        // "Otherwise, return the current input token."
        _ => {
            tokens.push(current.clone());
            true
        }
    }
}

/// The closing token type matching an opening bracket.
const fn mirror(kind: &CSSToken) -> Option<TokenType> {
    match kind {
        CSSToken::LeftBrace => Some(TokenType::RightBrace),
        CSSToken::LeftBracket => Some(TokenType::RightBracket),
        CSSToken::LeftParen => Some(TokenType::RightParen),
        _ => None,
    }
}

/// [§ 5.4.8 Consume a simple block](https://www.w3.org/TR/css-syntax-3/#consume-simple-block)
///
/// Appends the opener, the contents and the matching closer (or EOF).
fn consume_a_simple_block(stream: &mut TokenStream<'_>, tokens: &mut Vec<Token>, depth: usize) -> bool {
    if depth > MAXIMUM_CSS_RECURSION {
        return false;
    }
    let start = stream.current();
    let Some(ending) = mirror(&start.kind) else {
        debug_assert!(false, "consume_a_simple_block called on {start}");
        tokens.push(start.clone());
        return true;
    };
    tokens.push(start.clone());

    loop {
        let current = stream.consume();
        // "ending token" / "<EOF-token>"
        // "Return the block."
        if current.is_eof() || current.token_type() == ending {
            tokens.push(current.clone());
            return true;
        }
        // "anything else"
        // "Reconsume the current input token. Consume a component value and append
        // it to the value of the block."
        if !consume_a_component_value(stream, tokens, depth + 1) {
            return false;
        }
    }
}

/// [§ 5.4.9 Consume a function](https://www.w3.org/TR/css-syntax-3/#consume-function)
///
/// Appends the function token, its arguments and the `)` (or EOF).
fn consume_a_function(stream: &mut TokenStream<'_>, tokens: &mut Vec<Token>, depth: usize) -> bool {
    if depth > MAXIMUM_CSS_RECURSION {
        return false;
    }
    debug_assert_eq!(stream.current().token_type(), TokenType::Function);
    tokens.push(stream.current().clone());

    loop {
        let current = stream.consume();
        // "<)-token>" / "<EOF-token>"
        // "Return the function."
        if matches!(current.kind, CSSToken::RightParen | CSSToken::EOF) {
            tokens.push(current.clone());
            return true;
        }
        if !consume_a_component_value(stream, tokens, depth + 1) {
            return false;
        }
    }
}

/// Replace the last token with an EOF at the same position, or append one
/// at `fallback` if there is none.
fn terminate_with_eof(tokens: &mut Vec<Token>, fallback: Position) {
    let end = tokens.pop().map_or(fallback, |token| token.position);
    tokens.push(Token::eof_at(end));
}

/// The contents of the simple block at the cursor, without the opening
/// bracket and with the closer (or EOF) replaced by an EOF token at the
/// same position. The stream is left on the closer.
pub fn extract_a_simple_block(stream: &mut TokenStream<'_>, errors: &mut Vec<CssError>) -> Vec<Token> {
    let mut consumed = Vec::new();
    if !consume_a_simple_block(stream, &mut consumed, 0) {
        excessively_nested(stream, errors);
    }
    let fallback = stream.current().position;
    if consumed.len() > 1 {
        let _ = consumed.remove(0);
    }
    terminate_with_eof(&mut consumed, fallback);
    consumed
}

/// The function at the cursor: the function token and its arguments, with
/// the `)` (or EOF) replaced by an EOF token at the same position. The
/// stream is left on the `)`.
pub fn extract_a_function(stream: &mut TokenStream<'_>, errors: &mut Vec<CssError>) -> Vec<Token> {
    let mut consumed = Vec::new();
    if !consume_a_function(stream, &mut consumed, 0) {
        excessively_nested(stream, errors);
    }
    let fallback = stream.current().position;
    terminate_with_eof(&mut consumed, fallback);
    consumed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn tokens(css: &str) -> Vec<Token> {
        let mut errors = Vec::new();
        let tokens = tokenize(css, 1, 0, &mut errors);
        assert!(errors.is_empty());
        tokens
    }

    fn rendered(tokens: &[Token]) -> String {
        tokens.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_extract_a_simple_block() {
        let tokens = tokens("{a [b] (c)} d");
        let mut stream = TokenStream::new(&tokens);
        let _ = stream.consume();
        let mut errors = Vec::new();
        let block = extract_a_simple_block(&mut stream, &mut errors);
        assert_eq!(rendered(&block), "IDENT(a) WS [ IDENT(b) ] WS ( IDENT(c) ) EOF_TOKEN");
        assert_eq!(block.last().map(|t| t.position), Some(Position::new(1, 10)));
        assert_eq!(stream.current().token_type(), TokenType::RightBrace);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_extract_a_simple_block_unterminated() {
        let tokens = tokens("{a");
        let mut stream = TokenStream::new(&tokens);
        let _ = stream.consume();
        let mut errors = Vec::new();
        let block = extract_a_simple_block(&mut stream, &mut errors);
        assert_eq!(rendered(&block), "IDENT(a) EOF_TOKEN");
        assert_eq!(block[1].position, Position::new(1, 2));
    }

    #[test]
    fn test_extract_a_function() {
        let tokens = tokens("lang(fr-be) x");
        let mut stream = TokenStream::new(&tokens);
        let _ = stream.consume();
        let mut errors = Vec::new();
        let function = extract_a_function(&mut stream, &mut errors);
        assert_eq!(rendered(&function), "FUNCTION_TOKEN(lang) IDENT(fr-be) EOF_TOKEN");
        assert_eq!(function[2].position, Position::new(1, 10));
        assert_eq!(stream.current().token_type(), TokenType::RightParen);
    }

    #[test]
    fn test_find_important() {
        let value = tokens(" red ! IMPORTANT ");
        assert_eq!(find_important(&value[..value.len() - 1]), Some(3));
        let value = tokens(" red important");
        assert_eq!(find_important(&value[..value.len() - 1]), None);
        let value = tokens("! important important");
        assert_eq!(find_important(&value[..value.len() - 1]), None);
    }
}
