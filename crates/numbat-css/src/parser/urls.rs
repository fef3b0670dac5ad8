//! Finds the urls referenced from declaration values, e.g. in
//! `background: url(a.png)` or `src: url("font.woff")`.

use log::debug;
use serde::ser::{Serialize, SerializeMap, Serializer};

use super::rules::{AtRule, Declaration, QualifiedRule, RuleVisitor, Stylesheet, serialize_header};
use crate::error::{CssError, Position};
use crate::tokenizer::{CSSToken, Token, TokenType};

/// A url found in a declaration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCssUrl {
    /// Position of the URL token, or of the `url(` function token.
    pub position: Position,
    /// The url with quotes and escapes already decoded.
    pub utf8_url: String,
    /// Name of the enclosing at-rule; empty at the top level and inside
    /// qualified rules.
    pub at_rule_scope: String,
}

impl Serialize for ParsedCssUrl {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serialize_header(serializer, self.position, TokenType::ParsedCssUrl)?;
        map.serialize_entry("utf8Url", &self.utf8_url)?;
        map.serialize_entry("atRuleScope", &self.at_rule_scope)?;
        map.end()
    }
}

/// Append every url in `stylesheet` to `urls`.
///
/// A `url(` function whose argument is not a single string records a
/// "bad url" error. If any error is recorded, nothing is appended.
pub fn extract_urls(stylesheet: &Stylesheet, urls: &mut Vec<ParsedCssUrl>, errors: &mut Vec<CssError>) {
    let (old_urls, old_errors) = (urls.len(), errors.len());
    stylesheet.accept(&mut UrlVisitor::new(urls, errors));
    if errors.len() != old_errors {
        urls.truncate(old_urls);
    }
}

/// Like [`extract_urls`], for a single declaration such as one parsed from
/// a `style` attribute.
pub fn extract_urls_from_declaration(
    declaration: &Declaration,
    urls: &mut Vec<ParsedCssUrl>,
    errors: &mut Vec<CssError>,
) {
    let (old_urls, old_errors) = (urls.len(), errors.len());
    declaration.accept(&mut UrlVisitor::new(urls, errors));
    if errors.len() != old_errors {
        urls.truncate(old_urls);
    }
}

struct UrlVisitor<'a> {
    urls: &'a mut Vec<ParsedCssUrl>,
    errors: &'a mut Vec<CssError>,
    at_rule_scope: String,
}

impl<'a> UrlVisitor<'a> {
    fn new(urls: &'a mut Vec<ParsedCssUrl>, errors: &'a mut Vec<CssError>) -> Self {
        Self {
            urls,
            errors,
            at_rule_scope: String::new(),
        }
    }

    fn push(&mut self, position: Position, utf8_url: &str) {
        self.urls.push(ParsedCssUrl {
            position,
            utf8_url: utf8_url.to_owned(),
            at_rule_scope: self.at_rule_scope.clone(),
        });
    }
}

impl RuleVisitor for UrlVisitor<'_> {
    fn visit_at_rule(&mut self, at_rule: &AtRule) {
        self.at_rule_scope.clone_from(&at_rule.name);
    }

    fn leave_at_rule(&mut self, _at_rule: &AtRule) {
        self.at_rule_scope.clear();
    }

    fn visit_qualified_rule(&mut self, _qualified_rule: &QualifiedRule) {
        self.at_rule_scope.clear();
    }

    fn visit_declaration(&mut self, declaration: &Declaration) {
        let value = declaration.value.as_slice();
        let body = value.split_last().map_or(value, |(_, body)| body);
        let mut index = 0;
        while let Some(token) = body.get(index) {
            match &token.kind {
                CSSToken::Url(url) => {
                    self.push(token.position, url);
                    index += 1;
                }
                CSSToken::Function(name) if name == "url" => match url_function_argument(value, index) {
                    Some((url, next)) => {
                        self.push(token.position, url);
                        index = next;
                    }
                    None => {
                        let error = CssError::parsing(token.position, "bad url");
                        debug!("{error}");
                        self.errors.push(error);
                        return;
                    }
                },
                _ => index += 1,
            }
        }
    }
}

/// The string argument of the `url(` function token at `index`, and the
/// index just past its `)`.
fn url_function_argument(tokens: &[Token], index: usize) -> Option<(&str, usize)> {
    let skip_whitespace = |mut index: usize| {
        while tokens.get(index).is_some_and(Token::is_whitespace) {
            index += 1;
        }
        index
    };

    let index = skip_whitespace(index + 1);
    let CSSToken::String(url) = &tokens.get(index)?.kind else {
        return None;
    };
    let index = skip_whitespace(index + 1);
    (tokens.get(index)?.kind == CSSToken::RightParen).then_some((url.as_str(), index + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    #[test]
    fn test_url_function_argument() {
        let mut errors = Vec::new();
        let tokens = tokenize("url( 'a.png' ) b", 1, 0, &mut errors);
        assert_eq!(url_function_argument(&tokens, 0), Some(("a.png", 5)));

        let tokens = tokenize("url(\"a\" b)", 1, 0, &mut errors);
        assert_eq!(url_function_argument(&tokens, 0), None);
    }
}
