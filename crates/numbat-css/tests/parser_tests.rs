//! Integration tests for the stylesheet parser.

use numbat_css::error::{CssError, ErrorType, Position};
use numbat_css::parser::{
    AtRule, AtRuleSpec, BlockType, Canonicalizer, Declaration, QualifiedRule, Rule, RuleVisitor, Stylesheet,
    extract_important_declarations, parse_a_stylesheet, parse_inline_style, validator_grammar,
};
use numbat_css::tokenizer::{Token, tokenize};
use serde_json::json;

/// Helper to tokenize and parse `css` with the validator grammar. Anything
/// it does not list falls back to `default_block_type`.
fn parse(css: &str, default_block_type: BlockType) -> (Stylesheet, Vec<CssError>) {
    let mut errors = Vec::new();
    let tokens = tokenize(css, 1, 0, &mut errors);
    let sheet = parse_a_stylesheet(&tokens, &validator_grammar(), default_block_type, &mut errors);
    (sheet, errors)
}

fn render(tokens: &[Token]) -> String {
    tokens.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
}

fn render_errors(errors: &[CssError]) -> Vec<String> {
    errors.iter().map(ToString::to_string).collect()
}

fn at_rule(rule: &Rule) -> &AtRule {
    match rule {
        Rule::At(at_rule) => at_rule,
        Rule::Qualified(_) => panic!("expected an at-rule, got {rule:?}"),
    }
}

fn qualified_rule(rule: &Rule) -> &QualifiedRule {
    match rule {
        Rule::Qualified(qualified) => qualified,
        Rule::At(_) => panic!("expected a qualified rule, got {rule:?}"),
    }
}

#[test]
fn test_unknown_at_rule_and_incomplete_declaration() {
    let (sheet, errors) = parse("@gregable {}\n.foo{prop}", BlockType::Ignore);
    assert_eq!(render_errors(&errors), vec![":2:5 PARSING - Incomplete declaration"]);
    assert_eq!(errors[0].params, vec!["style"]);

    assert_eq!(
        serde_json::to_value(&sheet).unwrap(),
        json!({
            "line": 1, "col": 0, "tokenType": "STYLESHEET",
            "rules": [
                {
                    "line": 1, "col": 0, "tokenType": "AT_RULE", "name": "gregable",
                    "prelude": [
                        {"line": 1, "col": 9, "tokenType": "WHITESPACE"},
                        {"line": 1, "col": 10, "tokenType": "EOF_TOKEN"}
                    ],
                    "rules": [],
                    "declarations": []
                },
                {
                    "line": 2, "col": 0, "tokenType": "QUALIFIED_RULE",
                    "prelude": [
                        {"line": 2, "col": 0, "tokenType": "DELIM", "value": "."},
                        {"line": 2, "col": 1, "tokenType": "IDENT", "value": "foo"},
                        {"line": 2, "col": 4, "tokenType": "EOF_TOKEN"}
                    ],
                    "declarations": []
                }
            ],
            "eof": {"line": 2, "col": 10, "tokenType": "EOF_TOKEN"}
        })
    );
}

#[test]
fn test_nested_rule_in_declarations_is_incomplete() {
    let (sheet, errors) = parse("#foo { foo.bar {} }", BlockType::Ignore);
    assert_eq!(render_errors(&errors), vec![":1:7 PARSING - Incomplete declaration"]);
    assert_eq!(sheet.rules.len(), 1);
    let rule = qualified_rule(&sheet.rules[0]);
    assert_eq!(render(&rule.prelude), "HASH(foo) WS EOF_TOKEN");
    assert!(rule.declarations.is_empty());
}

#[test]
fn test_declarations() {
    let (sheet, errors) = parse("a { color: red; margin:0 auto }", BlockType::Ignore);
    assert!(errors.is_empty());
    let rule = qualified_rule(&sheet.rules[0]);
    assert_eq!(rule.rule_name(), "a");

    let names: Vec<_> = rule.declarations.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["color", "margin"]);
    assert_eq!(render(&rule.declarations[0].value), "WS IDENT(red) EOF_TOKEN");
    assert_eq!(rule.declarations[0].position, Position::new(1, 4));
    assert_eq!(rule.declarations[0].first_ident(), "red");
    assert_eq!(render(&rule.declarations[1].value), "INT(0) WS IDENT(auto) WS EOF_TOKEN");
}

#[test]
fn test_important() {
    let (sheet, errors) = parse("a { color: red !important; margin : 0 ! IMPORTANT }", BlockType::Ignore);
    assert!(errors.is_empty());
    let rule = qualified_rule(&sheet.rules[0]);

    let color = &rule.declarations[0];
    assert!(color.important);
    assert_eq!(color.important_position, Some(Position::new(1, 15)));
    assert_eq!(render(&color.value), "WS IDENT(red) WS EOF_TOKEN");
    assert_eq!(color.value.last().map(|t| t.position), Some(Position::new(1, 25)));

    let margin = &rule.declarations[1];
    assert!(margin.important);
    assert_eq!(margin.important_position, Some(Position::new(1, 38)));
    assert_eq!(render(&margin.value), "WS INT(0) WS EOF_TOKEN");

    let important: Vec<_> = extract_important_declarations(&sheet)
        .into_iter()
        .map(|d| d.name)
        .collect();
    assert_eq!(important, vec!["color", "margin"]);
}

#[test]
fn test_important_must_be_last() {
    let (sheet, _) = parse("a { color: red !important blue }", BlockType::Ignore);
    let color = &qualified_rule(&sheet.rules[0]).declarations[0];
    assert!(!color.important);
    assert_eq!(color.important_position, None);
    assert!(extract_important_declarations(&sheet).is_empty());
}

#[test]
fn test_at_rule_block_types() {
    let css = "@media screen { a { b: c } @font-face { src: x } } @page { margin: 1in } @font-face { font-family: f }";
    let (sheet, errors) = parse(css, BlockType::Ignore);
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(sheet.rules.len(), 3);

    let media = at_rule(&sheet.rules[0]);
    assert_eq!(media.name, "media");
    assert_eq!(render(&media.prelude), "WS IDENT(screen) WS EOF_TOKEN");
    assert!(media.declarations.is_empty());
    assert_eq!(media.rules.len(), 2);
    assert_eq!(qualified_rule(&media.rules[0]).declarations[0].name, "b");
    let nested = at_rule(&media.rules[1]);
    assert_eq!(nested.name, "font-face");
    assert_eq!(nested.declarations[0].name, "src");

    let page = at_rule(&sheet.rules[1]);
    assert!(page.rules.is_empty());
    assert_eq!(page.declarations[0].name, "margin");
    assert_eq!(render(&page.declarations[0].value), "WS DIM(1,in) WS EOF_TOKEN");

    assert_eq!(at_rule(&sheet.rules[2]).declarations[0].name, "font-family");
}

#[test]
fn test_vendor_prefixed_at_rule() {
    let (sheet, errors) = parse("@-webkit-keyframes spin { from { top: 0 } }", BlockType::Ignore);
    assert!(errors.is_empty());
    let keyframes = at_rule(&sheet.rules[0]);
    assert_eq!(keyframes.name, "-webkit-keyframes");
    assert_eq!(qualified_rule(&keyframes.rules[0]).rule_name(), "from");
}

#[test]
fn test_unknown_at_rule_uses_default_block_type() {
    let (sheet, _) = parse("@foo { a: b }", BlockType::Ignore);
    let foo = at_rule(&sheet.rules[0]);
    assert!(foo.rules.is_empty() && foo.declarations.is_empty());

    let (sheet, _) = parse("@foo { a: b }", BlockType::Declarations);
    assert_eq!(at_rule(&sheet.rules[0]).declarations[0].name, "a");

    let mut spec = AtRuleSpec::new();
    let _ = spec.insert("foo".to_string(), BlockType::Rules);
    let mut errors = Vec::new();
    let tokens = tokenize("@FOO { x { y: z } }", 1, 0, &mut errors);
    let sheet = parse_a_stylesheet(&tokens, &spec, BlockType::Ignore, &mut errors);
    assert_eq!(at_rule(&sheet.rules[0]).rules.len(), 1);
}

#[test]
fn test_at_rule_without_block() {
    let (sheet, errors) = parse("@import url(x.css);\n@charset \"utf-8\"", BlockType::Ignore);
    assert!(errors.is_empty());
    assert_eq!(sheet.rules.len(), 2);
    assert_eq!(render(&at_rule(&sheet.rules[0]).prelude), "WS URL(x.css) ;");
    assert_eq!(render(&at_rule(&sheet.rules[1]).prelude), "WS \"utf-8\" EOF_TOKEN");
}

#[test]
fn test_qualified_rule_hits_eof() {
    let (sheet, errors) = parse("a { b: c }\nd e", BlockType::Ignore);
    assert_eq!(sheet.rules.len(), 1);
    assert_eq!(
        render_errors(&errors),
        vec![":2:0 PARSING - Hit EOF when trying to parse the prelude of a qualified rule."]
    );
}

#[test]
fn test_at_rule_inside_declarations() {
    let (sheet, errors) = parse("a { @media x { } color: red }", BlockType::Ignore);
    assert_eq!(render_errors(&errors), vec![":1:4 PARSING - @media found inside declaration"]);
    assert_eq!(errors[0].params, vec!["style", "media"]);
    let rule = qualified_rule(&sheet.rules[0]);
    assert_eq!(rule.declarations.len(), 1);
    assert_eq!(rule.declarations[0].name, "color");
}

#[test]
fn test_invalid_declaration_resyncs_at_semicolon() {
    let (sheet, errors) = parse("a { 1px; b: c }", BlockType::Ignore);
    assert_eq!(render_errors(&errors), vec![":1:4 PARSING - Invalid Declaration"]);
    let names: Vec<_> = qualified_rule(&sheet.rules[0])
        .declarations
        .iter()
        .map(|d| d.name.clone())
        .collect();
    assert_eq!(names, vec!["b"]);
}

#[test]
fn test_blocks_and_functions_stay_in_values() {
    let (sheet, errors) = parse("a { b: f(x, [y] {z}); c: d }", BlockType::Ignore);
    assert!(errors.is_empty());
    let rule = qualified_rule(&sheet.rules[0]);
    assert_eq!(
        render(&rule.declarations[0].value),
        "WS FUNCTION_TOKEN(f) IDENT(x) , WS [ IDENT(y) ] WS { IDENT(z) } ) EOF_TOKEN"
    );
    assert_eq!(rule.declarations[1].name, "c");
}

#[test]
fn test_excessive_nesting_is_reported() {
    let css = format!("a {{ b: {} }}", "(".repeat(200));
    let (_, errors) = parse(&css, BlockType::Ignore);
    assert!(errors.iter().any(|e| e.msg == "excessively nested"));
    assert!(errors.iter().all(|e| e.error_type == ErrorType::Parsing));
}

#[test]
fn test_cdo_cdc_skipped_at_top_level() {
    let (sheet, errors) = parse("<!-- a { b: c } -->", BlockType::Ignore);
    assert!(errors.is_empty());
    assert_eq!(sheet.rules.len(), 1);
    assert_eq!(qualified_rule(&sheet.rules[0]).rule_name(), "a");
}

#[test]
fn test_empty_stylesheet() {
    let (sheet, errors) = parse("", BlockType::Ignore);
    assert!(errors.is_empty());
    assert!(sheet.rules.is_empty());
    assert_eq!(sheet.position, Position::new(1, 0));
    assert!(sheet.eof.is_eof());
}

#[test]
fn test_inline_style() {
    let mut errors = Vec::new();
    let tokens = tokenize("color: red; width:1px !important", 1, 0, &mut errors);
    let declarations = parse_inline_style(&tokens, &mut errors);
    assert!(errors.is_empty());
    assert_eq!(declarations.len(), 2);
    assert!(!declarations[0].important);
    assert!(declarations[1].important);
    assert_eq!(render(&declarations[1].value), "DIM(1,px) WS EOF_TOKEN");
}

#[test]
fn test_canonicalizer_declarations() {
    let spec = validator_grammar();
    let canonicalizer = Canonicalizer::new(&spec, BlockType::Ignore);
    assert_eq!(canonicalizer.block_type_for("-moz-keyframes"), BlockType::Rules);
    assert_eq!(canonicalizer.block_type_for("viewport"), BlockType::Ignore);

    let mut errors = Vec::new();
    let tokens = tokenize("a:b;;c:d", 1, 0, &mut errors);
    let declarations = canonicalizer.parse_a_list_of_declarations(&tokens, &mut errors);
    assert!(errors.is_empty());
    assert_eq!(declarations.len(), 2);
}

#[test]
fn test_declaration_json() {
    let mut errors = Vec::new();
    let tokens = tokenize("a:b", 1, 0, &mut errors);
    let declarations = parse_inline_style(&tokens, &mut errors);
    assert_eq!(
        serde_json::to_value(&declarations[0]).unwrap(),
        json!({
            "line": 1, "col": 0, "tokenType": "DECLARATION", "name": "a", "important": false,
            "value": [
                {"line": 1, "col": 2, "tokenType": "IDENT", "value": "b"},
                {"line": 1, "col": 3, "tokenType": "EOF_TOKEN"}
            ]
        })
    );
}

#[derive(Default)]
struct Outline(Vec<String>);

impl RuleVisitor for Outline {
    fn visit_at_rule(&mut self, rule: &AtRule) {
        self.0.push(format!("@{}", rule.name));
    }
    fn leave_at_rule(&mut self, rule: &AtRule) {
        self.0.push(format!("/@{}", rule.name));
    }
    fn visit_qualified_rule(&mut self, rule: &QualifiedRule) {
        self.0.push(rule.rule_name());
    }
    fn visit_declaration(&mut self, declaration: &Declaration) {
        self.0.push(declaration.name.clone());
    }
}

#[test]
fn test_visitor_order() {
    let (sheet, _) = parse(".a { x: 1 } @media print { .b { y: 2; z: 3 } } .c {}", BlockType::Ignore);
    let mut outline = Outline::default();
    sheet.accept(&mut outline);
    assert_eq!(outline.0, vec![".a", "x", "@media", ".b", "y", "z", "/@media", ".c"]);
}
