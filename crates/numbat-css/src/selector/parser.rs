//! Recursive descent over the selector productions of
//! [Selectors Level 3 § 10.1](https://www.w3.org/TR/selectors-3/#grammar).
//!
//! Every function expects the stream's *current* token to be the first
//! token of its production, and leaves the stream on the first token after
//! it.

use log::{debug, trace};

use super::{
    AttrSelector, ClassSelector, Combinator, CombinatorType, IdSelector, OtherSelector, PseudoSelector,
    Selector, SelectorTree, SelectorsGroup, SimpleSelectorSequence, TypeSelector,
};
use crate::error::CssError;
use crate::parser::{TokenStream, extract_a_function, extract_a_simple_block};
use crate::tokenizer::{CSSToken, Token};

const NO_SELECTOR_FOUND: &str = "no selector found";

/// Parse a selector list, e.g. a qualified rule's prelude.
///
/// Returns whatever could be parsed before the first error: `None` only
/// when not even one sequence of simple selectors was found. Tokens left
/// over after the selectors record an "unparsed input remains" error.
pub fn parse(stream: &mut TokenStream<'_>, errors: &mut Vec<CssError>) -> Option<SelectorTree> {
    let tree = parse_a_selectors_group(stream, errors);
    let current = stream.current();
    if !current.is_eof() {
        record(errors, CssError::selectors(current.position, "unparsed input remains"));
    }
    tree
}

/// `selectors_group : selector [ COMMA S* selector ]*`
///
/// A single selector is returned as is; two or more are wrapped in a
/// [`SelectorsGroup`]. Parsing stops at the first selector that records an
/// error.
pub fn parse_a_selectors_group(stream: &mut TokenStream<'_>, errors: &mut Vec<CssError>) -> Option<SelectorTree> {
    let position = stream.current().position;
    let error_count = errors.len();
    let mut elements = vec![parse_a_selector(stream, errors)?];

    while errors.len() == error_count {
        skip_whitespace(stream);
        if stream.current().kind != CSSToken::Comma {
            break;
        }
        let _ = stream.consume();
        skip_whitespace(stream);
        match parse_a_selector(stream, errors) {
            Some(selector) => elements.push(selector),
            None => break,
        }
    }

    if elements.len() == 1 {
        elements.pop().map(SelectorTree::Selector)
    } else {
        Some(SelectorTree::Group(SelectorsGroup { position, elements }))
    }
}

/// `selector : simple_selector_sequence [ combinator simple_selector_sequence ]*`
///
/// Combinators fold to the left. When the sequence after a combinator is
/// missing, the error is recorded and the selector parsed so far is
/// returned.
pub fn parse_a_selector(stream: &mut TokenStream<'_>, errors: &mut Vec<CssError>) -> Option<Selector> {
    let start = stream.current();
    if !is_simple_selector_sequence_start(start) {
        record(errors, CssError::selectors(start.position, NO_SELECTOR_FOUND));
        return None;
    }
    let mut left = match parse_a_simple_selector_sequence(stream, errors) {
        Ok(sequence) => Selector::Sequence(sequence),
        Err(error) => {
            record(errors, error);
            return None;
        }
    };

    loop {
        // Whitespace before an explicit combinator is not itself the
        // descendant combinator.
        if stream.current().is_whitespace() && !is_simple_selector_sequence_start(stream.next()) {
            let _ = stream.consume();
        }
        let combinator = stream.current();
        let combinator_type = match combinator.kind {
            CSSToken::Whitespace => CombinatorType::Descendant,
            CSSToken::Delim('>') => CombinatorType::Child,
            CSSToken::Delim('+') => CombinatorType::AdjacentSibling,
            CSSToken::Delim('~') => CombinatorType::GeneralSibling,
            _ => return Some(left),
        };
        let _ = stream.consume();
        skip_whitespace(stream);

        match parse_a_simple_selector_sequence(stream, errors) {
            Ok(right) => {
                trace!("{combinator_type} combinator at {}:{}", combinator.line(), combinator.col());
                left = Selector::Combinator(Combinator {
                    position: combinator.position,
                    combinator_type,
                    left: Box::new(left),
                    right,
                });
            }
            Err(error) => {
                record(errors, error);
                return Some(left);
            }
        }
    }
}

/// `simple_selector_sequence : [ type_selector | universal ]
///     [ HASH | class | attrib | pseudo | negation ]*
///   | [ HASH | class | attrib | pseudo | negation ]+`
///
/// A sequence without a type selector gets an implied `*` at the start of
/// the sequence.
///
/// # Errors
///
/// "no selector found" when the sequence is empty, or the error of a
/// malformed pseudo selector.
pub fn parse_a_simple_selector_sequence(
    stream: &mut TokenStream<'_>,
    errors: &mut Vec<CssError>,
) -> Result<SimpleSelectorSequence, CssError> {
    let start = stream.current();
    let type_selector = is_type_selector_start(start).then(|| parse_a_type_selector(stream));

    let mut other_selectors = Vec::new();
    loop {
        let current = stream.current();
        let selector = match current.kind {
            CSSToken::Hash { .. } => OtherSelector::Id(parse_an_id_selector(stream)),
            CSSToken::Delim('.') if matches!(stream.next().kind, CSSToken::Ident(_)) => {
                OtherSelector::Class(parse_a_class_selector(stream))
            }
            CSSToken::LeftBracket => OtherSelector::Attr(parse_an_attr_selector(stream, errors)),
            CSSToken::Colon => OtherSelector::Pseudo(parse_a_pseudo_selector(stream, errors)?),
            // Keep in sync with is_simple_selector_sequence_start.
            _ => break,
        };
        other_selectors.push(selector);
    }

    if type_selector.is_none() && other_selectors.is_empty() {
        return Err(CssError::selectors(stream.current().position, NO_SELECTOR_FOUND));
    }
    Ok(SimpleSelectorSequence {
        position: start.position,
        type_selector: type_selector.unwrap_or_else(|| TypeSelector::universal(start.position)),
        other_selectors,
    })
}

/// `type_selector : [ namespace_prefix ]? element_name` and
/// `universal : [ namespace_prefix ]? '*'`, where
/// `namespace_prefix : [ IDENT | '*' ]? '|'`.
pub fn parse_a_type_selector(stream: &mut TokenStream<'_>) -> TypeSelector {
    let start = stream.current();
    let next = stream.next();

    let namespace_prefix = match &start.kind {
        CSSToken::Delim('|') => {
            let _ = stream.consume();
            Some(String::new())
        }
        CSSToken::Delim('*') if next.is_delim('|') => {
            let _ = stream.consume();
            let _ = stream.consume();
            Some("*".to_owned())
        }
        CSSToken::Ident(prefix) if next.is_delim('|') => {
            let _ = stream.consume();
            let _ = stream.consume();
            Some(prefix.clone())
        }
        _ => None,
    };

    let element_name = match &stream.current().kind {
        CSSToken::Delim('*') => {
            let _ = stream.consume();
            "*".to_owned()
        }
        CSSToken::Ident(name) => {
            let _ = stream.consume();
            name.clone()
        }
        _ => "*".to_owned(),
    };

    TypeSelector {
        position: start.position,
        namespace_prefix,
        element_name,
    }
}

/// `HASH`; the current token must be a HASH.
pub fn parse_an_id_selector(stream: &mut TokenStream<'_>) -> IdSelector {
    let hash = stream.current();
    debug_assert!(matches!(hash.kind, CSSToken::Hash { .. }), "id selector must start with a hash");
    let _ = stream.consume();
    IdSelector {
        position: hash.position,
        value: hash.kind.string_value().unwrap_or_default().to_owned(),
    }
}

/// `class : '.' IDENT`; the current token must be the `.` and the next an
/// IDENT.
pub fn parse_a_class_selector(stream: &mut TokenStream<'_>) -> ClassSelector {
    let dot = stream.current();
    debug_assert!(dot.is_delim('.'), "class selector must start with '.'");
    let ident = stream.consume();
    debug_assert!(matches!(ident.kind, CSSToken::Ident(_)), "class selector needs a name");
    let _ = stream.consume();
    ClassSelector {
        position: dot.position,
        value: ident.kind.string_value().unwrap_or_default().to_owned(),
    }
}

/// `attrib : '[' ... ']'`; the current token must be the `[`. The contents
/// are kept as raw tokens.
pub fn parse_an_attr_selector(stream: &mut TokenStream<'_>, errors: &mut Vec<CssError>) -> AttrSelector {
    let start = stream.current();
    debug_assert_eq!(start.kind, CSSToken::LeftBracket, "attribute selector must start with '['");
    let value = extract_a_simple_block(stream, errors);
    let _ = stream.consume();
    AttrSelector {
        position: start.position,
        value,
    }
}

/// `pseudo : ':' ':'? [ IDENT | functional_pseudo ]`; the current token
/// must be the first colon. A functional pseudo keeps its tokens in
/// `func`.
///
/// # Errors
///
/// "error in pseudo selector" at the first colon when neither a name nor a
/// function follows.
pub fn parse_a_pseudo_selector(
    stream: &mut TokenStream<'_>,
    errors: &mut Vec<CssError>,
) -> Result<PseudoSelector, CssError> {
    let first_colon = stream.current();
    debug_assert_eq!(first_colon.kind, CSSToken::Colon, "pseudo selector must start with ':'");
    let mut is_class = true;
    if stream.consume().kind == CSSToken::Colon {
        is_class = false;
        let _ = stream.consume();
    }

    let (name, func) = match &stream.current().kind {
        CSSToken::Ident(name) => {
            let _ = stream.consume();
            (name.clone(), Vec::new())
        }
        CSSToken::Function(name) => {
            let func = extract_a_function(stream, errors);
            let _ = stream.consume();
            (name.clone(), func)
        }
        _ => return Err(CssError::selectors(first_colon.position, "error in pseudo selector")),
    };

    Ok(PseudoSelector {
        position: first_colon.position,
        is_class,
        name,
        func,
    })
}

fn is_type_selector_start(token: &Token) -> bool {
    matches!(token.kind, CSSToken::Delim('*' | '|') | CSSToken::Ident(_))
}

/// Whether `token` can begin a sequence of simple selectors.
fn is_simple_selector_sequence_start(token: &Token) -> bool {
    is_type_selector_start(token)
        || matches!(
            token.kind,
            CSSToken::Hash { .. } | CSSToken::Delim('.') | CSSToken::LeftBracket | CSSToken::Colon
        )
}

/// The tokenizer collapses whitespace runs, so there is at most one.
fn skip_whitespace(stream: &mut TokenStream<'_>) {
    if stream.current().is_whitespace() {
        let _ = stream.consume();
    }
}

fn record(errors: &mut Vec<CssError>, error: CssError) {
    debug!("{error}");
    errors.push(error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Position;
    use crate::tokenizer::tokenize;

    fn with_stream<T>(css: &str, f: impl FnOnce(&mut TokenStream<'_>) -> T) -> T {
        let mut errors = Vec::new();
        let tokens = tokenize(css, 1, 0, &mut errors);
        assert!(errors.is_empty());
        let mut stream = TokenStream::new(&tokens);
        let _ = stream.consume();
        f(&mut stream)
    }

    #[test]
    fn test_type_selector_forms() {
        let cases = [
            ("*", None, "*"),
            ("a", None, "a"),
            ("|a", Some(""), "a"),
            ("*|a", Some("*"), "a"),
            ("*|*", Some("*"), "*"),
            ("svg|rect", Some("svg"), "rect"),
        ];
        for (css, prefix, name) in cases {
            let selector = with_stream(css, |stream| {
                let selector = parse_a_type_selector(stream);
                assert!(stream.current().is_eof(), "{css}");
                selector
            });
            assert_eq!(selector.namespace_prefix.as_deref(), prefix, "{css}");
            assert_eq!(selector.element_name, name, "{css}");
            assert_eq!(selector.to_string(), css);
        }
    }

    #[test]
    fn test_id_and_class_selectors() {
        let id = with_stream("#main", parse_an_id_selector);
        assert_eq!(id.value, "main");
        assert_eq!(id.to_string(), "#main");

        let class = with_stream(".note", parse_a_class_selector);
        assert_eq!(class.value, "note");
        assert_eq!(class.position, Position::new(1, 0));
    }

    #[test]
    fn test_pseudo_selector_function_consumes_paren() {
        let mut errors = Vec::new();
        let pseudo = with_stream(":lang(fr) x", |stream| {
            let pseudo = parse_a_pseudo_selector(stream, &mut errors);
            assert!(stream.current().is_whitespace());
            pseudo
        });
        let pseudo = pseudo.expect("pseudo selector");
        assert!(pseudo.is_class);
        assert_eq!(pseudo.name, "lang");
        assert_eq!(pseudo.func.len(), 3);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_lone_colon_is_an_error() {
        let mut errors = Vec::new();
        let result = with_stream("a: ", |stream| {
            let _ = stream.consume();
            parse_a_pseudo_selector(stream, &mut errors)
        });
        let error = result.expect_err("lone colon");
        assert_eq!(error.to_string(), ":1:1 SELECTORS - error in pseudo selector");
    }

    #[test]
    fn test_sequence_start_tokens() {
        let starts = with_stream("* | a #b . [ :", |stream| {
            let mut starts = Vec::new();
            while !stream.current().is_eof() {
                starts.push(is_simple_selector_sequence_start(stream.current()));
                let _ = stream.consume();
            }
            starts
        });
        // Alternating with the whitespace between them.
        assert_eq!(
            starts,
            [true, false, true, false, true, false, true, false, true, false, true, false, true]
        );
    }
}
