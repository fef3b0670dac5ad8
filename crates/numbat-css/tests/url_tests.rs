//! Integration tests for url extraction.

use numbat_css::error::{CssError, Position};
use numbat_css::parser::{
    BlockType, ParsedCssUrl, Stylesheet, extract_urls, extract_urls_from_declaration, parse_a_stylesheet,
    parse_inline_style, validator_grammar,
};
use numbat_css::tokenizer::tokenize;
use serde_json::json;

fn parse(css: &str) -> Stylesheet {
    let mut errors = Vec::new();
    let tokens = tokenize(css, 1, 0, &mut errors);
    let sheet = parse_a_stylesheet(&tokens, &validator_grammar(), BlockType::Ignore, &mut errors);
    assert!(errors.is_empty(), "{errors:?}");
    sheet
}

fn summary(urls: &[ParsedCssUrl]) -> Vec<(&str, &str)> {
    urls.iter()
        .map(|url| (url.utf8_url.as_str(), url.at_rule_scope.as_str()))
        .collect()
}

fn render_errors(errors: &[CssError]) -> Vec<String> {
    errors.iter().map(ToString::to_string).collect()
}

#[test]
fn test_urls_and_scopes() {
    let sheet = parse(concat!(
        ".a { background: url(a.png) }\n",
        "@font-face { src: url('f.woff') format('woff'), url(\"g.ttf\") }\n",
        "@media print { .b { c: url(m.png) } }"
    ));
    let mut urls = Vec::new();
    let mut errors = Vec::new();
    extract_urls(&sheet, &mut urls, &mut errors);

    assert!(errors.is_empty());
    assert_eq!(
        summary(&urls),
        vec![
            ("a.png", ""),
            ("f.woff", "font-face"),
            ("g.ttf", "font-face"),
            ("m.png", "")
        ]
    );
    assert_eq!(urls[0].position, Position::new(1, 17));
    assert_eq!(urls[1].position, Position::new(2, 18));
}

#[test]
fn test_bad_url_drops_everything_from_the_call() {
    let mut urls = Vec::new();
    let mut errors = Vec::new();
    extract_urls(&parse(".a { b: url(first.png) }"), &mut urls, &mut errors);
    assert_eq!(urls.len(), 1);

    let sheet = parse(".a { c: url(ok.png); b: url('x' y) }");
    extract_urls(&sheet, &mut urls, &mut errors);
    assert_eq!(render_errors(&errors), vec![":1:24 PARSING - bad url"]);
    assert_eq!(summary(&urls), vec![("first.png", "")]);
}

#[test]
fn test_bad_url_skips_rest_of_declaration_only() {
    let sheet = parse(".a { b: url(1) url('2'); c: url('3') }");
    let mut urls = Vec::new();
    let mut errors = Vec::new();
    extract_urls(&sheet, &mut urls, &mut errors);
    assert!(errors.is_empty());
    assert_eq!(summary(&urls), vec![("1", ""), ("2", ""), ("3", "")]);

    let mut errors = Vec::new();
    let tokens = tokenize(".a { b: url(a b) }", 1, 0, &mut errors);
    assert_eq!(render_errors(&errors), vec![":1:8 TOKENIZATION - bad url"]);
    let sheet = parse_a_stylesheet(&tokens, &validator_grammar(), BlockType::Ignore, &mut errors);
    extract_urls(&sheet, &mut urls, &mut errors);
    assert_eq!(errors.len(), 1, "a BAD_URL token is reported by the tokenizer only");
    assert_eq!(urls.len(), 3);
}

#[test]
fn test_inline_style_declaration() {
    let mut errors = Vec::new();
    let tokens = tokenize("color: red; background-image: url(\"x.png\")", 1, 0, &mut errors);
    let declarations = parse_inline_style(&tokens, &mut errors);

    let mut urls = Vec::new();
    for declaration in &declarations {
        extract_urls_from_declaration(declaration, &mut urls, &mut errors);
    }
    assert!(errors.is_empty());
    assert_eq!(summary(&urls), vec![("x.png", "")]);
    assert_eq!(urls[0].position, Position::new(1, 30));
}

#[test]
fn test_url_json() {
    let mut urls = Vec::new();
    let mut errors = Vec::new();
    extract_urls(&parse(".a { background: url(a.png) }"), &mut urls, &mut errors);
    assert_eq!(
        serde_json::to_value(&urls[0]).unwrap(),
        json!({
            "line": 1, "col": 17, "tokenType": "PARSED_CSS_URL",
            "utf8Url": "a.png", "atRuleScope": ""
        })
    );
}
