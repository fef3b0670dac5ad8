//! The stylesheet tree produced by the parser, and a visitor over it.
//!
//! Preludes and declaration values are kept as flat token lists ending in
//! an EOF token; nested blocks and functions appear inline with their
//! opening and closing tokens.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::Position;
use crate::tokenizer::{CSSToken, Token, TokenType};

/// [§ 5.3.2 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
///
/// A parsed CSS stylesheet.
#[derive(Debug, Clone, PartialEq)]
pub struct Stylesheet {
    /// Position of the first token.
    pub position: Position,
    /// The top-level rules, in source order.
    pub rules: Vec<Rule>,
    /// The EOF token that ended the input.
    pub eof: Token,
}

/// A CSS rule: either a qualified rule or an at-rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// An at-rule.
    At(AtRule),
    /// A qualified rule (selector + declarations).
    Qualified(QualifiedRule),
}

/// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)
///
/// Which of `rules` and `declarations` gets filled depends on the block type
/// the grammar assigns to `name`.
#[derive(Debug, Clone, PartialEq)]
pub struct AtRule {
    /// Position of the at-keyword.
    pub position: Position,
    /// The at-keyword name (without the `@`).
    pub name: String,
    /// The prelude tokens, ending in EOF (at the `{`) or in the `;`/EOF that
    /// ended a block-less rule.
    pub prelude: Vec<Token>,
    /// Nested rules, for block type `rules`.
    pub rules: Vec<Rule>,
    /// Declarations, for block type `declarations`.
    pub declarations: Vec<Declaration>,
}

/// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
#[derive(Debug, Clone, PartialEq)]
pub struct QualifiedRule {
    /// Position of the first prelude token.
    pub position: Position,
    /// The selector tokens, ending in an EOF at the `{`.
    pub prelude: Vec<Token>,
    /// The declarations in the rule's block.
    pub declarations: Vec<Declaration>,
}

/// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
///
/// A CSS declaration (e.g., `color: red`).
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// Position of the property name.
    pub position: Position,
    /// The property name.
    pub name: String,
    /// The value tokens after the colon, without `!important`, ending in EOF.
    pub value: Vec<Token>,
    /// Whether the declaration has `!important`.
    pub important: bool,
    /// Where the `!` of `!important` was.
    pub important_position: Option<Position>,
}

impl Stylesheet {
    /// Walk the tree: the stylesheet, then each rule, then leave.
    pub fn accept<V: RuleVisitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_stylesheet(self);
        for rule in &self.rules {
            rule.accept(visitor);
        }
        visitor.leave_stylesheet(self);
    }
}

impl Rule {
    /// Position of the rule.
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::At(rule) => rule.position,
            Self::Qualified(rule) => rule.position,
        }
    }

    /// `AT_RULE` or `QUALIFIED_RULE`.
    #[must_use]
    pub const fn token_type(&self) -> TokenType {
        match self {
            Self::At(_) => TokenType::AtRule,
            Self::Qualified(_) => TokenType::QualifiedRule,
        }
    }

    /// Dispatch to the variant's `accept`.
    pub fn accept<V: RuleVisitor + ?Sized>(&self, visitor: &mut V) {
        match self {
            Self::At(rule) => rule.accept(visitor),
            Self::Qualified(rule) => rule.accept(visitor),
        }
    }
}

impl AtRule {
    /// An at-rule with an empty prelude and no block contents.
    #[must_use]
    pub fn new(name: impl Into<String>, position: Position) -> Self {
        Self {
            position,
            name: name.into(),
            prelude: Vec::new(),
            rules: Vec::new(),
            declarations: Vec::new(),
        }
    }

    /// Visit, then nested rules, then declarations, then leave.
    pub fn accept<V: RuleVisitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_at_rule(self);
        for rule in &self.rules {
            rule.accept(visitor);
        }
        for declaration in &self.declarations {
            declaration.accept(visitor);
        }
        visitor.leave_at_rule(self);
    }
}

impl QualifiedRule {
    /// A qualified rule with an empty prelude.
    #[must_use]
    pub const fn new(position: Position) -> Self {
        Self {
            position,
            prelude: Vec::new(),
            declarations: Vec::new(),
        }
    }

    /// The prelude's string and delimiter values run together, e.g. `.foo`
    /// for the prelude of `.foo {}`. Whitespace contributes nothing.
    #[must_use]
    pub fn rule_name(&self) -> String {
        let mut name = String::new();
        for token in &self.prelude {
            match &token.kind {
                CSSToken::Delim(c) => name.push(*c),
                kind => name.push_str(kind.string_value().unwrap_or_default()),
            }
        }
        name
    }

    /// Visit, then declarations, then leave.
    pub fn accept<V: RuleVisitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_qualified_rule(self);
        for declaration in &self.declarations {
            declaration.accept(visitor);
        }
        visitor.leave_qualified_rule(self);
    }
}

impl Declaration {
    /// A declaration with an empty value.
    #[must_use]
    pub fn new(name: impl Into<String>, position: Position) -> Self {
        Self {
            position,
            name: name.into(),
            value: Vec::new(),
            important: false,
            important_position: None,
        }
    }

    /// The value of the first IDENT in the value, allowing one leading
    /// whitespace token. Empty if the value does not start with an ident.
    #[must_use]
    pub fn first_ident(&self) -> &str {
        let first = match self.value.as_slice() {
            [first, ..] if !first.is_whitespace() => first,
            [_, second, ..] => second,
            _ => return "",
        };
        match &first.kind {
            CSSToken::Ident(value) => value,
            _ => "",
        }
    }

    /// Visit, then leave.
    pub fn accept<V: RuleVisitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_declaration(self);
        visitor.leave_declaration(self);
    }
}

/// A visitor over [`Stylesheet`] trees.
///
/// Each node calls `visit_*` on itself, then its children, then `leave_*`.
/// All methods default to doing nothing, so implementors override only what
/// they need.
pub trait RuleVisitor {
    /// Called before the stylesheet's rules.
    fn visit_stylesheet(&mut self, _stylesheet: &Stylesheet) {}
    /// Called after the stylesheet's rules.
    fn leave_stylesheet(&mut self, _stylesheet: &Stylesheet) {}
    /// Called before the at-rule's children.
    fn visit_at_rule(&mut self, _at_rule: &AtRule) {}
    /// Called after the at-rule's children.
    fn leave_at_rule(&mut self, _at_rule: &AtRule) {}
    /// Called before the qualified rule's declarations.
    fn visit_qualified_rule(&mut self, _qualified_rule: &QualifiedRule) {}
    /// Called after the qualified rule's declarations.
    fn leave_qualified_rule(&mut self, _qualified_rule: &QualifiedRule) {}
    /// Called for each declaration.
    fn visit_declaration(&mut self, _declaration: &Declaration) {}
    /// Called right after `visit_declaration`.
    fn leave_declaration(&mut self, _declaration: &Declaration) {}
}

/// Collects clones of every `!important` declaration.
#[derive(Default)]
struct ImportantDeclarations {
    important: Vec<Declaration>,
}

impl RuleVisitor for ImportantDeclarations {
    fn visit_declaration(&mut self, declaration: &Declaration) {
        if declaration.important {
            self.important.push(declaration.clone());
        }
    }
}

/// All declarations in `stylesheet` marked `!important`, in source order.
#[must_use]
pub fn extract_important_declarations(stylesheet: &Stylesheet) -> Vec<Declaration> {
    let mut visitor = ImportantDeclarations::default();
    stylesheet.accept(&mut visitor);
    visitor.important
}

pub(crate) fn serialize_header<S: Serializer>(
    serializer: S,
    position: Position,
    token_type: TokenType,
) -> Result<S::SerializeMap, S::Error> {
    let mut map = serializer.serialize_map(None)?;
    map.serialize_entry("line", &position.line)?;
    map.serialize_entry("col", &position.col)?;
    map.serialize_entry("tokenType", &token_type)?;
    Ok(map)
}

impl Serialize for Stylesheet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serialize_header(serializer, self.position, TokenType::Stylesheet)?;
        map.serialize_entry("rules", &self.rules)?;
        map.serialize_entry("eof", &self.eof)?;
        map.end()
    }
}

impl Serialize for Rule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::At(rule) => rule.serialize(serializer),
            Self::Qualified(rule) => rule.serialize(serializer),
        }
    }
}

impl Serialize for AtRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serialize_header(serializer, self.position, TokenType::AtRule)?;
        map.serialize_entry("name", &self.name)?;
        map.serialize_entry("prelude", &self.prelude)?;
        map.serialize_entry("rules", &self.rules)?;
        map.serialize_entry("declarations", &self.declarations)?;
        map.end()
    }
}

impl Serialize for QualifiedRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serialize_header(serializer, self.position, TokenType::QualifiedRule)?;
        map.serialize_entry("prelude", &self.prelude)?;
        map.serialize_entry("declarations", &self.declarations)?;
        map.end()
    }
}

impl Serialize for Declaration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serialize_header(serializer, self.position, TokenType::Declaration)?;
        map.serialize_entry("name", &self.name)?;
        map.serialize_entry("important", &self.important)?;
        map.serialize_entry("value", &self.value)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(kind: CSSToken, col: u32) -> Token {
        Token::new(kind, Position::new(1, col))
    }

    #[test]
    fn test_first_ident() {
        let mut decl = Declaration::new("display", Position::new(1, 0));
        assert_eq!(decl.first_ident(), "");

        decl.value = vec![token(CSSToken::ident("block"), 9), token(CSSToken::EOF, 14)];
        assert_eq!(decl.first_ident(), "block");

        decl.value = vec![
            token(CSSToken::Whitespace, 8),
            token(CSSToken::ident("none"), 9),
            token(CSSToken::EOF, 13),
        ];
        assert_eq!(decl.first_ident(), "none");

        decl.value = vec![token(CSSToken::string("x"), 9), token(CSSToken::EOF, 12)];
        assert_eq!(decl.first_ident(), "");
    }

    #[test]
    fn test_rule_name() {
        let mut rule = QualifiedRule::new(Position::new(1, 0));
        rule.prelude = vec![
            token(CSSToken::delim('.'), 0),
            token(CSSToken::ident("foo"), 1),
            token(CSSToken::Whitespace, 4),
            token(CSSToken::EOF, 5),
        ];
        assert_eq!(rule.rule_name(), ".foo");
    }

    #[derive(Default)]
    struct Trace(Vec<String>);

    impl RuleVisitor for Trace {
        fn visit_stylesheet(&mut self, _: &Stylesheet) {
            self.0.push("visit sheet".into());
        }
        fn leave_stylesheet(&mut self, _: &Stylesheet) {
            self.0.push("leave sheet".into());
        }
        fn visit_at_rule(&mut self, rule: &AtRule) {
            self.0.push(format!("visit @{}", rule.name));
        }
        fn leave_at_rule(&mut self, rule: &AtRule) {
            self.0.push(format!("leave @{}", rule.name));
        }
        fn visit_qualified_rule(&mut self, _: &QualifiedRule) {
            self.0.push("visit rule".into());
        }
        fn visit_declaration(&mut self, decl: &Declaration) {
            self.0.push(format!("decl {}", decl.name));
        }
    }

    #[test]
    fn test_accept_order() {
        let mut media = AtRule::new("media", Position::new(1, 0));
        let mut inner = QualifiedRule::new(Position::new(1, 7));
        inner.declarations.push(Declaration::new("color", Position::new(1, 10)));
        media.rules.push(Rule::Qualified(inner));
        media.declarations.push(Declaration::new("size", Position::new(1, 20)));
        let sheet = Stylesheet {
            position: Position::new(1, 0),
            rules: vec![Rule::At(media)],
            eof: token(CSSToken::EOF, 30),
        };

        let mut trace = Trace::default();
        sheet.accept(&mut trace);
        assert_eq!(
            trace.0,
            vec![
                "visit sheet",
                "visit @media",
                "visit rule",
                "decl color",
                "decl size",
                "leave @media",
                "leave sheet"
            ]
        );
    }
}
