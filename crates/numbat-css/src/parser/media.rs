//! [Media Queries Level 3 § 3 Syntax](https://www.w3.org/TR/css3-mediaqueries/#syntax)
//!
//! ```text
//! media_query_list : S* [media_query [ ',' S* media_query ]* ]?
//! media_query      : [ONLY | NOT]? S* media_type S* [ AND S* expression ]*
//!                  | expression [ AND S* expression ]*
//! expression       : '(' S* media_feature S* [ ':' S* expr ]? ')' S*
//! ```
//!
//! Only the shape of the query is checked. Feature values are skipped up to
//! the closing `)`.

use log::{debug, trace};

use super::rules::{AtRule, RuleVisitor, Stylesheet};
use super::token_stream::TokenStream;
use crate::error::CssError;
use crate::tokenizer::{CSSToken, Token};

/// Check the prelude of every `@media` rule in `stylesheet`, collecting the
/// media type and media feature IDENT tokens in source order.
///
/// A prelude that is not a media query list records a "malformed media
/// query" error at its at-rule.
pub fn parse_media_queries(
    stylesheet: &Stylesheet,
    media_types: &mut Vec<Token>,
    media_features: &mut Vec<Token>,
    errors: &mut Vec<CssError>,
) {
    stylesheet.accept(&mut MediaQueryVisitor {
        media_types,
        media_features,
        errors,
    });
}

struct MediaQueryVisitor<'a> {
    media_types: &'a mut Vec<Token>,
    media_features: &'a mut Vec<Token>,
    errors: &'a mut Vec<CssError>,
}

impl RuleVisitor for MediaQueryVisitor<'_> {
    fn visit_at_rule(&mut self, at_rule: &AtRule) {
        if !at_rule.name.eq_ignore_ascii_case("media") {
            return;
        }
        let mut stream = TokenStream::new(&at_rule.prelude);
        let _ = stream.consume();
        if self.parse_a_media_query_list(&mut stream).is_none() {
            let error = CssError::parsing(at_rule.position, "malformed media query");
            debug!("{error}");
            self.errors.push(error);
        }
    }
}

/// `None` means the query did not match. Collected tokens are kept even
/// then.
type Matched = Option<()>;

impl MediaQueryVisitor<'_> {
    fn parse_a_media_query_list(&mut self, stream: &mut TokenStream<'_>) -> Matched {
        skip_whitespace(stream);
        if !stream.current().is_eof() {
            self.parse_a_media_query(stream)?;
            while stream.current().kind == CSSToken::Comma {
                let _ = stream.consume();
                skip_whitespace(stream);
                self.parse_a_media_query(stream)?;
            }
        }
        stream.current().is_eof().then_some(())
    }

    fn parse_a_media_query(&mut self, stream: &mut TokenStream<'_>) -> Matched {
        // Expressions always start with '(', which tells the two forms apart.
        if stream.current().kind == CSSToken::LeftParen {
            self.parse_a_media_expression(stream)?;
        } else {
            let current = stream.current();
            if current.kind.is_ident_ignoring_case("only") || current.kind.is_ident_ignoring_case("not") {
                let _ = stream.consume();
            }
            skip_whitespace(stream);
            self.media_types.push(expect_ident(stream)?);
            skip_whitespace(stream);
        }
        while stream.current().kind.is_ident_ignoring_case("and") {
            let _ = stream.consume();
            skip_whitespace(stream);
            self.parse_a_media_expression(stream)?;
        }
        Some(())
    }

    fn parse_a_media_expression(&mut self, stream: &mut TokenStream<'_>) -> Matched {
        if stream.current().kind != CSSToken::LeftParen {
            return None;
        }
        let _ = stream.consume();
        skip_whitespace(stream);
        let feature = expect_ident(stream)?;
        trace!("media feature {feature}");
        self.media_features.push(feature);
        skip_whitespace(stream);
        if stream.current().kind == CSSToken::Colon {
            let _ = stream.consume();
            while !matches!(stream.current().kind, CSSToken::EOF | CSSToken::RightParen) {
                let _ = stream.consume();
            }
        }
        if stream.current().kind != CSSToken::RightParen {
            return None;
        }
        let _ = stream.consume();
        skip_whitespace(stream);
        Some(())
    }
}

/// The tokenizer collapses whitespace runs, so there is at most one.
fn skip_whitespace(stream: &mut TokenStream<'_>) {
    if stream.current().is_whitespace() {
        let _ = stream.consume();
    }
}

/// Consume and return the current token if it is an IDENT.
fn expect_ident(stream: &mut TokenStream<'_>) -> Option<Token> {
    let current = stream.current();
    if !matches!(current.kind, CSSToken::Ident(_)) {
        return None;
    }
    let _ = stream.consume();
    Some(current.clone())
}
